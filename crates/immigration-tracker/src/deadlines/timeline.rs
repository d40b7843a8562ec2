use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::StudentProfile;
use super::status::ImmigrationStatus;

const FORM_I765_URL: &str = "https://www.uscis.gov/i-765";
const OPT_OVERVIEW_URL: &str = "https://studyinthestates.dhs.gov/opt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Application,
    Document,
    Information,
    Notification,
    Planning,
}

impl ActionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Document => "Document",
            Self::Information => "Information",
            Self::Notification => "Notification",
            Self::Planning => "Planning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    UscisForm,
    UscisGuide,
    DsoContact,
    ExternalGuide,
    VideoTutorial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceLink {
    pub title: &'static str,
    pub url: &'static str,
    pub kind: ResourceKind,
}

static I765_FORM: [ResourceLink; 1] = [ResourceLink {
    title: "Form I-765",
    url: FORM_I765_URL,
    kind: ResourceKind::UscisForm,
}];

static OPT_GUIDES: [ResourceLink; 2] = [
    ResourceLink {
        title: "OPT Overview",
        url: OPT_OVERVIEW_URL,
        kind: ResourceKind::UscisGuide,
    },
    ResourceLink {
        title: "OPT Timeline and Deadlines",
        url: "https://studyinthestates.dhs.gov/opt/timeline",
        kind: ResourceKind::UscisGuide,
    },
];

/// Something the student should do now, given their current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub title: &'static str,
    pub description: &'static str,
    pub category: ActionCategory,
    pub related_status: ImmigrationStatus,
    pub is_required: bool,
    pub estimated_duration: &'static str,
    pub resources: &'static [ResourceLink],
    pub order: u32,
}

/// A dated milestone on the student's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub status: ImmigrationStatus,
    pub title: &'static str,
    pub description: String,
    pub date: NaiveDate,
    pub is_completed: bool,
    pub is_current: bool,
    pub order: u32,
}

pub fn action_items(profile: &StudentProfile) -> Vec<ActionItem> {
    use ImmigrationStatus as Status;

    match profile.current_status {
        Status::F1Student if profile.graduation_date.is_some() => vec![ActionItem {
            title: "Understand OPT Requirements",
            description: "Learn about Optional Practical Training eligibility and process",
            category: ActionCategory::Information,
            related_status: Status::F1Student,
            is_required: true,
            estimated_duration: "30 minutes",
            resources: &OPT_GUIDES,
            order: 1,
        }],
        Status::Graduated | Status::OptNotApplied => vec![ActionItem {
            title: "Prepare OPT Application",
            description: "Gather required documents and complete Form I-765",
            category: ActionCategory::Application,
            related_status: Status::OptPending,
            is_required: true,
            estimated_duration: "2-3 hours",
            resources: &I765_FORM,
            order: 1,
        }],
        Status::EadReceived => vec![
            ActionItem {
                title: "Apply for Social Security Number",
                description: "Visit SSA office with EAD card and required documents",
                category: ActionCategory::Application,
                related_status: Status::EadReceived,
                is_required: true,
                estimated_duration: "1-2 hours",
                resources: &[],
                order: 1,
            },
            ActionItem {
                title: "Report Employment to DSO",
                description: "Inform your Designated School Official about your employment",
                category: ActionCategory::Notification,
                related_status: Status::Employed,
                is_required: true,
                estimated_duration: "15 minutes",
                resources: &[],
                order: 2,
            },
        ],
        Status::Employed => {
            let mut items = Vec::with_capacity(2);
            if profile.has_stem_degree {
                items.push(ActionItem {
                    title: "Consider STEM OPT Extension",
                    description: "Evaluate eligibility for 24-month STEM OPT extension",
                    category: ActionCategory::Planning,
                    related_status: Status::StemOptEligible,
                    is_required: false,
                    estimated_duration: "1 hour",
                    resources: &[],
                    order: 1,
                });
            }
            items.push(ActionItem {
                title: "Discuss H1B Sponsorship with Employer",
                description: "Talk to your employer about H1B visa sponsorship",
                category: ActionCategory::Planning,
                related_status: Status::H1bPreparing,
                is_required: false,
                estimated_duration: "30 minutes",
                resources: &[],
                order: 2,
            });
            items
        }
        Status::H1bPreparing => vec![ActionItem {
            title: "Prepare H1B Registration",
            description: "Work with employer to prepare H1B lottery registration",
            category: ActionCategory::Application,
            related_status: Status::H1bRegistered,
            is_required: true,
            estimated_duration: "2 hours",
            resources: &[],
            order: 1,
        }],
        _ => Vec::new(),
    }
}

/// Milestones for every date the profile records, in journey order.
pub fn timeline_events(profile: &StudentProfile) -> Vec<TimelineEvent> {
    use ImmigrationStatus as Status;

    let current = profile.current_status;
    let mut events: Vec<TimelineEvent> = Vec::new();
    let mut push = |status: ImmigrationStatus,
                    title: &'static str,
                    description: String,
                    date: NaiveDate,
                    is_completed: bool,
                    is_current: bool| {
        let order = events.len() as u32;
        events.push(TimelineEvent {
            status,
            title,
            description,
            date,
            is_completed,
            is_current,
            order,
        });
    };

    if let Some(date) = profile.graduation_date {
        push(
            Status::Graduated,
            "Graduate from University",
            "Complete your degree program".to_string(),
            date,
            current != Status::F1Student,
            current == Status::Graduated,
        );
    }

    if let Some(date) = profile.opt_application_date {
        push(
            Status::OptPending,
            "Apply for OPT",
            "Submit Form I-765 to USCIS".to_string(),
            date,
            current != Status::OptNotApplied,
            current == Status::OptPending,
        );
    }

    if let Some(date) = profile.ead_received_date {
        push(
            Status::EadReceived,
            "Receive EAD Card",
            "Employment Authorization Document arrived".to_string(),
            date,
            true,
            current == Status::EadReceived,
        );
    }

    if let Some(date) = profile.employment_start_date {
        let employer = profile.current_employer.as_deref().unwrap_or("employer");
        push(
            Status::Employed,
            "Start Employment",
            format!("Begin work at {employer}"),
            date,
            true,
            current == Status::Employed,
        );
    }

    if let Some(date) = profile.h1b_registration_date {
        push(
            Status::H1bRegistered,
            "H1B Registration Submitted",
            "Entered H1B lottery".to_string(),
            date,
            profile.h1b_lottery_selected.is_some(),
            current == Status::H1bRegistered,
        );
    }

    if let Some(date) = profile.h1b_start_date {
        push(
            Status::H1bActive,
            "H1B Work Authorization Begins",
            "H1B status becomes effective".to_string(),
            date,
            current == Status::H1bActive,
            current == Status::H1bActive,
        );
    }

    events
}

/// Earliest event not yet completed; ties keep journey order.
pub fn next_milestone(events: &[TimelineEvent]) -> Option<&TimelineEvent> {
    events
        .iter()
        .filter(|event| !event.is_completed)
        .min_by_key(|event| (event.date, event.order))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn student_without_graduation_date_has_no_actions() {
        let mut profile = StudentProfile::new(ImmigrationStatus::F1Student);
        assert!(action_items(&profile).is_empty());

        profile.graduation_date = Some(date(2026, 5, 15));
        let items = action_items(&profile);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, ActionCategory::Information);
        assert_eq!(items[0].resources.len(), 2);
    }

    #[test]
    fn employed_stem_graduate_gets_both_planning_items() {
        let mut profile = StudentProfile::new(ImmigrationStatus::Employed);
        assert_eq!(action_items(&profile).len(), 1);

        profile.has_stem_degree = true;
        let titles: Vec<&str> = action_items(&profile).iter().map(|item| item.title).collect();
        assert_eq!(
            titles,
            ["Consider STEM OPT Extension", "Discuss H1B Sponsorship with Employer"]
        );
    }

    #[test]
    fn opt_application_links_the_form() {
        let items = action_items(&StudentProfile::new(ImmigrationStatus::Graduated));
        assert_eq!(items[0].related_status, ImmigrationStatus::OptPending);
        assert_eq!(items[0].resources[0].url, "https://www.uscis.gov/i-765");
    }

    #[test]
    fn events_follow_journey_order_and_flag_current() {
        let mut profile = StudentProfile::new(ImmigrationStatus::Employed);
        profile.graduation_date = Some(date(2025, 5, 15));
        profile.ead_received_date = Some(date(2025, 8, 1));
        profile.employment_start_date = Some(date(2025, 8, 20));
        profile.current_employer = Some("Acme".to_string());
        profile.h1b_start_date = Some(date(2026, 10, 1));

        let events = timeline_events(&profile);
        let orders: Vec<u32> = events.iter().map(|event| event.order).collect();
        assert_eq!(orders, [0, 1, 2, 3]);
        assert_eq!(events[2].description, "Begin work at Acme");
        assert!(events[2].is_current);
        assert!(!events[3].is_completed);
        assert_eq!(
            next_milestone(&events).map(|event| event.title),
            Some("H1B Work Authorization Begins")
        );
    }

    #[test]
    fn next_milestone_picks_earliest_open_event() {
        let mut profile = StudentProfile::new(ImmigrationStatus::H1bRegistered);
        profile.h1b_registration_date = Some(date(2026, 3, 10));
        profile.h1b_start_date = Some(date(2026, 10, 1));

        let events = timeline_events(&profile);
        assert_eq!(
            next_milestone(&events).map(|event| event.status),
            Some(ImmigrationStatus::H1bRegistered)
        );

        profile.h1b_lottery_selected = Some(true);
        let events = timeline_events(&profile);
        assert_eq!(
            next_milestone(&events).map(|event| event.status),
            Some(ImmigrationStatus::H1bActive)
        );

        assert!(next_milestone(&[]).is_none());
    }
}
