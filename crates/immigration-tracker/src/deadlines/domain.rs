use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::documents::DocumentCheck;
use super::rules::DeadlineUrgency;
use super::status::ImmigrationStatus;
use super::timeline::{ActionItem, TimelineEvent};
use super::transitions::TransitionSuggestion;

/// Dates and flags the planner needs to derive a student's deadlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub current_status: ImmigrationStatus,
    #[serde(default)]
    pub has_stem_degree: bool,
    #[serde(default)]
    pub graduation_date: Option<NaiveDate>,
    #[serde(default)]
    pub program_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub ead_received_date: Option<NaiveDate>,
    #[serde(default)]
    pub ead_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub h1b_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub passport_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub opt_application_date: Option<NaiveDate>,
    #[serde(default)]
    pub employment_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_employer: Option<String>,
    #[serde(default)]
    pub h1b_registration_date: Option<NaiveDate>,
    /// `None` until the lottery result is known.
    #[serde(default)]
    pub h1b_lottery_selected: Option<bool>,
}

impl StudentProfile {
    pub fn new(current_status: ImmigrationStatus) -> Self {
        Self {
            current_status,
            has_stem_degree: false,
            graduation_date: None,
            program_end_date: None,
            ead_received_date: None,
            ead_expiry_date: None,
            h1b_start_date: None,
            passport_expiry_date: None,
            opt_application_date: None,
            employment_start_date: None,
            current_employer: None,
            h1b_registration_date: None,
            h1b_lottery_selected: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    OptApplicationWindowStart,
    OptApplicationDeadline,
    OptGracePeriodEnd,
    Unemployment90DayLimit,
    StemOptApplicationDeadline,
    H1bRegistrationPeriod,
    H1bStartDate,
    PassportExpiry,
    EadExpiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlinePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl DeadlinePriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Upcoming,
    DueSoon,
    Overdue,
}

impl DeadlineStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::DueSoon => "Due Soon",
            Self::Overdue => "Overdue",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Upcoming | Self::DueSoon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub kind: DeadlineKind,
    pub title: &'static str,
    pub description: &'static str,
    pub due_date: NaiveDate,
    pub priority: DeadlinePriority,
    pub status: DeadlineStatus,
    pub urgency: DeadlineUrgency,
    pub related_status: Option<ImmigrationStatus>,
    pub action_required: &'static str,
    pub notification_days_before: Vec<i64>,
    pub notification_dates: Vec<NaiveDate>,
    pub days_remaining: i64,
    pub relative_due: String,
}

/// Everything derived for one profile: deadlines earliest first, the
/// actions and milestones of the journey, and document expiry checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlinePlan {
    pub evaluated_on: NaiveDate,
    pub current_status: ImmigrationStatus,
    pub deadlines: Vec<Deadline>,
    pub upcoming: Vec<Deadline>,
    pub action_items: Vec<ActionItem>,
    pub events: Vec<TimelineEvent>,
    pub next_milestone: Option<TimelineEvent>,
    pub next_steps: Vec<TransitionSuggestion>,
    pub documents: Vec<DocumentCheck>,
}

impl DeadlinePlan {
    pub fn overdue(&self) -> impl Iterator<Item = &Deadline> {
        self.deadlines
            .iter()
            .filter(|deadline| deadline.status == DeadlineStatus::Overdue)
    }

    pub fn find(&self, kind: DeadlineKind) -> Option<&Deadline> {
        self.deadlines.iter().find(|deadline| deadline.kind == kind)
    }
}
