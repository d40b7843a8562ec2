use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Where a student currently stands on the F-1 -> OPT -> H1B path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImmigrationStatus {
    F1Student,
    Graduated,
    OptNotApplied,
    OptPending,
    OptApproved,
    EadReceived,
    JobSearching,
    JobOfferReceived,
    Employed,
    StemOptEligible,
    StemOptPending,
    StemOptApproved,
    H1bPreparing,
    H1bRegistered,
    H1bSelected,
    H1bPetitionFiled,
    H1bApproved,
    H1bActive,
    H1bNotSelected,
    StatusExpired,
    Other,
}

impl ImmigrationStatus {
    pub const ALL: [Self; 21] = [
        Self::F1Student,
        Self::Graduated,
        Self::OptNotApplied,
        Self::OptPending,
        Self::OptApproved,
        Self::EadReceived,
        Self::JobSearching,
        Self::JobOfferReceived,
        Self::Employed,
        Self::StemOptEligible,
        Self::StemOptPending,
        Self::StemOptApproved,
        Self::H1bPreparing,
        Self::H1bRegistered,
        Self::H1bSelected,
        Self::H1bPetitionFiled,
        Self::H1bApproved,
        Self::H1bActive,
        Self::H1bNotSelected,
        Self::StatusExpired,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::F1Student => "F-1 Student",
            Self::Graduated => "Graduated",
            Self::OptNotApplied => "OPT Not Applied",
            Self::OptPending => "OPT Application Pending",
            Self::OptApproved => "OPT Approved",
            Self::EadReceived => "EAD Card Received",
            Self::JobSearching => "Job Searching",
            Self::JobOfferReceived => "Job Offer Received",
            Self::Employed => "Employed",
            Self::StemOptEligible => "STEM OPT Eligible",
            Self::StemOptPending => "STEM OPT Extension Pending",
            Self::StemOptApproved => "STEM OPT Approved (24 months)",
            Self::H1bPreparing => "Preparing for H1B",
            Self::H1bRegistered => "H1B Registered (March)",
            Self::H1bSelected => "H1B Lottery Selected",
            Self::H1bPetitionFiled => "H1B Petition Filed",
            Self::H1bApproved => "H1B Approved",
            Self::H1bActive => "H1B Work Authorization Active",
            Self::H1bNotSelected => "H1B Lottery Not Selected",
            Self::StatusExpired => "Status Expired",
            Self::Other => "Other Status",
        }
    }

    pub const fn phase(self) -> ImmigrationPhase {
        match self {
            Self::F1Student | Self::Graduated => ImmigrationPhase::Student,
            Self::OptNotApplied | Self::OptPending | Self::OptApproved | Self::EadReceived => {
                ImmigrationPhase::Opt
            }
            Self::JobSearching | Self::JobOfferReceived | Self::Employed => {
                ImmigrationPhase::Employment
            }
            Self::StemOptEligible | Self::StemOptPending | Self::StemOptApproved => {
                ImmigrationPhase::StemOpt
            }
            Self::H1bPreparing
            | Self::H1bRegistered
            | Self::H1bSelected
            | Self::H1bPetitionFiled
            | Self::H1bApproved
            | Self::H1bActive
            | Self::H1bNotSelected => ImmigrationPhase::H1b,
            Self::StatusExpired | Self::Other => ImmigrationPhase::Other,
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::F1Student => "f1_student",
            Self::Graduated => "graduated",
            Self::OptNotApplied => "opt_not_applied",
            Self::OptPending => "opt_pending",
            Self::OptApproved => "opt_approved",
            Self::EadReceived => "ead_received",
            Self::JobSearching => "job_searching",
            Self::JobOfferReceived => "job_offer_received",
            Self::Employed => "employed",
            Self::StemOptEligible => "stem_opt_eligible",
            Self::StemOptPending => "stem_opt_pending",
            Self::StemOptApproved => "stem_opt_approved",
            Self::H1bPreparing => "h1b_preparing",
            Self::H1bRegistered => "h1b_registered",
            Self::H1bSelected => "h1b_selected",
            Self::H1bPetitionFiled => "h1b_petition_filed",
            Self::H1bApproved => "h1b_approved",
            Self::H1bActive => "h1b_active",
            Self::H1bNotSelected => "h1b_not_selected",
            Self::StatusExpired => "status_expired",
            Self::Other => "other",
        }
    }

    /// Accepts the snake_case wire name, e.g. `opt_not_applied`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl fmt::Display for ImmigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown immigration status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ImmigrationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "f1_student" => Ok(Self::F1Student),
            "graduated" => Ok(Self::Graduated),
            "opt_not_applied" => Ok(Self::OptNotApplied),
            "opt_pending" => Ok(Self::OptPending),
            "opt_approved" => Ok(Self::OptApproved),
            "ead_received" => Ok(Self::EadReceived),
            "job_searching" => Ok(Self::JobSearching),
            "job_offer_received" => Ok(Self::JobOfferReceived),
            "employed" => Ok(Self::Employed),
            "stem_opt_eligible" => Ok(Self::StemOptEligible),
            "stem_opt_pending" => Ok(Self::StemOptPending),
            "stem_opt_approved" => Ok(Self::StemOptApproved),
            "h1b_preparing" => Ok(Self::H1bPreparing),
            "h1b_registered" => Ok(Self::H1bRegistered),
            "h1b_selected" => Ok(Self::H1bSelected),
            "h1b_petition_filed" => Ok(Self::H1bPetitionFiled),
            "h1b_approved" => Ok(Self::H1bApproved),
            "h1b_active" => Ok(Self::H1bActive),
            "h1b_not_selected" => Ok(Self::H1bNotSelected),
            "status_expired" => Ok(Self::StatusExpired),
            "other" => Ok(Self::Other),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImmigrationPhase {
    Student,
    Opt,
    Employment,
    StemOpt,
    H1b,
    Other,
}

impl ImmigrationPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "F-1 Student",
            Self::Opt => "OPT Phase",
            Self::Employment => "Employment",
            Self::StemOpt => "STEM OPT Extension",
            Self::H1b => "H1B Process",
            Self::Other => "Other",
        }
    }
}
