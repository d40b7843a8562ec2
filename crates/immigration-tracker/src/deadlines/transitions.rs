use serde::Serialize;
use thiserror::Error;

use super::domain::DeadlinePriority;
use super::status::ImmigrationStatus;

use ImmigrationStatus as S;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot transition from {from} to {to}; this transition is not allowed")]
pub struct TransitionError {
    pub from: ImmigrationStatus,
    pub to: ImmigrationStatus,
}

/// Statuses reachable in one step. `Other` can move anywhere so records can
/// be corrected by hand.
pub fn next_statuses(status: ImmigrationStatus) -> &'static [ImmigrationStatus] {
    match status {
        S::F1Student => &[S::Graduated, S::OptNotApplied, S::Other],
        S::Graduated => &[S::OptNotApplied, S::OptPending, S::Other],
        S::OptNotApplied => &[S::OptPending, S::StatusExpired],
        S::OptPending => &[S::OptApproved, S::OptNotApplied, S::StatusExpired],
        S::OptApproved => &[S::EadReceived],
        S::EadReceived => &[
            S::JobSearching,
            S::JobOfferReceived,
            S::Employed,
            S::StemOptEligible,
        ],
        S::JobSearching => &[S::JobOfferReceived, S::Employed, S::StatusExpired],
        S::JobOfferReceived => &[S::Employed, S::JobSearching],
        S::Employed => &[
            S::StemOptEligible,
            S::StemOptPending,
            S::H1bPreparing,
            S::H1bRegistered,
            S::JobSearching,
            S::StatusExpired,
        ],
        S::StemOptEligible => &[S::StemOptPending, S::Employed, S::StatusExpired],
        S::StemOptPending => &[S::StemOptApproved, S::StemOptEligible, S::StatusExpired],
        S::StemOptApproved => &[S::Employed, S::H1bPreparing, S::StatusExpired],
        S::H1bPreparing => &[S::H1bRegistered, S::Employed],
        S::H1bRegistered => &[S::H1bSelected, S::H1bNotSelected],
        S::H1bSelected => &[S::H1bPetitionFiled],
        S::H1bPetitionFiled => &[S::H1bApproved, S::H1bPreparing, S::StatusExpired],
        S::H1bApproved => &[S::H1bActive],
        S::H1bActive => &[S::Other],
        S::H1bNotSelected => &[S::H1bPreparing, S::Employed, S::StatusExpired],
        S::StatusExpired => &[S::Other],
        S::Other => &ImmigrationStatus::ALL,
    }
}

/// Staying put is always allowed.
pub fn is_valid_transition(from: ImmigrationStatus, to: ImmigrationStatus) -> bool {
    from == to || next_statuses(from).contains(&to)
}

pub fn validate_transition(
    from: ImmigrationStatus,
    to: ImmigrationStatus,
) -> Result<(), TransitionError> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// The step most students take next.
pub const fn recommended_next_status(status: ImmigrationStatus) -> ImmigrationStatus {
    match status {
        S::F1Student => S::Graduated,
        S::Graduated | S::OptNotApplied => S::OptPending,
        S::OptPending => S::OptApproved,
        S::OptApproved => S::EadReceived,
        S::EadReceived => S::JobSearching,
        S::JobSearching => S::JobOfferReceived,
        S::JobOfferReceived | S::StemOptApproved => S::Employed,
        S::Employed | S::H1bNotSelected => S::H1bPreparing,
        S::StemOptEligible => S::StemOptPending,
        S::StemOptPending => S::StemOptApproved,
        S::H1bPreparing => S::H1bRegistered,
        S::H1bRegistered => S::H1bSelected,
        S::H1bSelected => S::H1bPetitionFiled,
        S::H1bPetitionFiled => S::H1bApproved,
        S::H1bApproved => S::H1bActive,
        S::H1bActive | S::StatusExpired => S::Other,
        S::Other => S::F1Student,
    }
}

/// No onward path except the catch-all `Other`.
pub fn is_terminal_status(status: ImmigrationStatus) -> bool {
    matches!(next_statuses(status), [] | [S::Other])
}

pub const fn requires_immediate_action(status: ImmigrationStatus) -> bool {
    matches!(
        status,
        S::OptNotApplied | S::Graduated | S::StatusExpired | S::H1bSelected
    )
}

pub const fn can_work(status: ImmigrationStatus) -> bool {
    matches!(
        status,
        S::EadReceived
            | S::JobSearching
            | S::JobOfferReceived
            | S::Employed
            | S::StemOptApproved
            | S::H1bActive
    )
}

pub const fn is_stem_opt_eligible(status: ImmigrationStatus, has_stem_degree: bool) -> bool {
    has_stem_degree && matches!(status, S::OptApproved | S::EadReceived | S::Employed)
}

pub const fn is_h1b_eligible(status: ImmigrationStatus, has_job_offer: bool) -> bool {
    has_job_offer && matches!(status, S::Employed | S::StemOptApproved)
}

/// The usual F-1 to H1B journey. Other starting points have no known path
/// and yield just themselves.
pub fn typical_progression_path(start: ImmigrationStatus) -> Vec<ImmigrationStatus> {
    match start {
        S::F1Student => vec![
            S::F1Student,
            S::Graduated,
            S::OptPending,
            S::OptApproved,
            S::EadReceived,
            S::Employed,
            S::H1bPreparing,
            S::H1bRegistered,
            S::H1bSelected,
            S::H1bPetitionFiled,
            S::H1bApproved,
            S::H1bActive,
        ],
        other => vec![other],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionSuggestion {
    pub status: ImmigrationStatus,
    pub reason: &'static str,
    pub priority: DeadlinePriority,
}

/// Every allowed next status, the recommended one first.
pub fn transition_suggestions(status: ImmigrationStatus) -> Vec<TransitionSuggestion> {
    let recommended = recommended_next_status(status);
    let mut suggestions: Vec<TransitionSuggestion> = next_statuses(status)
        .iter()
        .map(|&next| TransitionSuggestion {
            status: next,
            reason: suggestion_reason(next),
            priority: if next == recommended {
                DeadlinePriority::High
            } else {
                DeadlinePriority::Medium
            },
        })
        .collect();

    suggestions.sort_by_key(|suggestion| suggestion.priority != DeadlinePriority::High);
    suggestions
}

const fn suggestion_reason(status: ImmigrationStatus) -> &'static str {
    match status {
        S::OptPending => "Submit OPT application to USCIS",
        S::EadReceived => "EAD card has arrived",
        S::Employed => "Started working with valid authorization",
        S::StemOptPending => "Apply for 24-month STEM extension",
        S::H1bRegistered => "Employer registered for H1B lottery",
        S::H1bActive => "H1B status is now effective",
        _ => "Next step in immigration process",
    }
}
