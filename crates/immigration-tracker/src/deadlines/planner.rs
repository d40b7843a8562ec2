use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::documents;
use super::domain::{
    Deadline, DeadlineKind, DeadlinePlan, DeadlinePriority, DeadlineStatus, StudentProfile,
};
use super::rules;
use super::status::ImmigrationStatus;
use super::timeline;
use super::transitions;

const UPCOMING_LIMIT: usize = 5;

struct DeadlineTemplate {
    kind: DeadlineKind,
    title: &'static str,
    description: &'static str,
    priority: DeadlinePriority,
    related_status: Option<ImmigrationStatus>,
    action_required: &'static str,
    notification_days_before: &'static [i64],
}

static OPT_WINDOW_OPENS: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::OptApplicationWindowStart,
    title: "OPT Application Window Opens",
    description: "You can start applying for OPT 90 days before graduation",
    priority: DeadlinePriority::High,
    related_status: Some(ImmigrationStatus::OptPending),
    action_required: "Prepare OPT application documents (I-765 form)",
    notification_days_before: &[30, 14, 7],
};

static OPT_APPLICATION_DEADLINE: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::OptApplicationDeadline,
    title: "OPT Application Deadline",
    description: "Last day to submit OPT application (60 days after program end)",
    priority: DeadlinePriority::Critical,
    related_status: Some(ImmigrationStatus::OptPending),
    action_required: "Submit Form I-765 to USCIS immediately",
    notification_days_before: &[30, 14, 7, 3, 1],
};

static GRACE_PERIOD_END: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::OptGracePeriodEnd,
    title: "Grace Period Ends",
    description: "Must have valid status or leave the US",
    priority: DeadlinePriority::Critical,
    related_status: None,
    action_required: "Ensure you have valid immigration status",
    notification_days_before: &[30, 14, 7, 1],
};

static UNEMPLOYMENT_LIMIT: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::Unemployment90DayLimit,
    title: "90-Day Unemployment Limit",
    description: "Must find employment within 90 days of OPT start",
    priority: DeadlinePriority::Critical,
    related_status: Some(ImmigrationStatus::Employed),
    action_required: "Secure job offer and start employment",
    notification_days_before: &[60, 30, 14, 7],
};

static STEM_OPT_DEADLINE: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::StemOptApplicationDeadline,
    title: "STEM OPT Extension Deadline",
    description: "Apply for STEM OPT extension before current OPT expires",
    priority: DeadlinePriority::High,
    related_status: Some(ImmigrationStatus::StemOptPending),
    action_required: "Submit I-765 with I-983 Training Plan",
    notification_days_before: &[60, 30, 14],
};

static H1B_REGISTRATION: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::H1bRegistrationPeriod,
    title: "H1B Registration Period",
    description: "H1B lottery registration window (typically March 1-18)",
    priority: DeadlinePriority::Critical,
    related_status: Some(ImmigrationStatus::H1bRegistered),
    action_required: "Ensure employer submits H1B registration",
    notification_days_before: &[60, 30, 14, 7],
};

static H1B_START: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::H1bStartDate,
    title: "H1B Status Begins",
    description: "H1B work authorization becomes effective (October 1st)",
    priority: DeadlinePriority::High,
    related_status: Some(ImmigrationStatus::H1bActive),
    action_required: "Coordinate with employer for status change",
    notification_days_before: &[30, 14, 7],
};

static PASSPORT_EXPIRY: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::PassportExpiry,
    title: "Passport Expiration",
    description: "Renew passport before expiration",
    priority: DeadlinePriority::High,
    related_status: None,
    action_required: "Contact your country's embassy to renew passport",
    notification_days_before: &[180, 90, 60, 30],
};

static EAD_EXPIRY: DeadlineTemplate = DeadlineTemplate {
    kind: DeadlineKind::EadExpiry,
    title: "EAD Card Expiration",
    description: "Work authorization expires - apply for extension if needed",
    priority: DeadlinePriority::Critical,
    related_status: None,
    action_required: "Apply for extension or transition to H1B",
    notification_days_before: &[90, 60, 30, 14],
};

/// Builds the deadline list implied by a student's status and dates.
#[derive(Debug, Clone, Copy)]
pub struct DeadlinePlanner {
    warning_days: i64,
}

impl Default for DeadlinePlanner {
    fn default() -> Self {
        Self {
            warning_days: rules::DEFAULT_WARNING_DAYS,
        }
    }
}

impl DeadlinePlanner {
    pub fn with_warning_days(warning_days: i64) -> Self {
        Self { warning_days }
    }

    pub fn plan(&self, profile: &StudentProfile, today: NaiveDate) -> DeadlinePlan {
        let mut deadlines: Vec<Deadline> = self
            .due_dates(profile, today)
            .into_iter()
            .map(|(template, due_date)| self.materialize(template, due_date, today))
            .collect();

        deadlines.sort_by_key(|deadline| deadline.due_date);

        let upcoming = deadlines
            .iter()
            .filter(|deadline| deadline.status.is_open())
            .take(UPCOMING_LIMIT)
            .cloned()
            .collect();

        let events = timeline::timeline_events(profile);
        let next_milestone = timeline::next_milestone(&events).cloned();

        debug!(
            status = profile.current_status.label(),
            deadlines = deadlines.len(),
            events = events.len(),
            "deadline plan generated"
        );

        DeadlinePlan {
            evaluated_on: today,
            current_status: profile.current_status,
            deadlines,
            upcoming,
            action_items: timeline::action_items(profile),
            events,
            next_milestone,
            next_steps: transitions::transition_suggestions(profile.current_status),
            documents: documents::document_checks(profile, today),
        }
    }

    fn due_dates(
        &self,
        profile: &StudentProfile,
        today: NaiveDate,
    ) -> Vec<(&'static DeadlineTemplate, NaiveDate)> {
        use ImmigrationStatus as Status;

        let status = profile.current_status;
        let mut due = Vec::new();

        if let Some(graduation) = profile.graduation_date {
            if matches!(status, Status::F1Student | Status::Graduated) {
                due.push((&OPT_WINDOW_OPENS, rules::opt_application_start(graduation)));
            }
        }

        if let Some(program_end) = profile.program_end_date {
            if status == Status::OptNotApplied {
                due.push((
                    &OPT_APPLICATION_DEADLINE,
                    rules::opt_application_deadline(program_end),
                ));
            }
            due.push((&GRACE_PERIOD_END, rules::grace_period_end(program_end)));
        }

        if let Some(received) = profile.ead_received_date {
            due.push((&UNEMPLOYMENT_LIMIT, rules::unemployment_limit(received)));
        }

        if let Some(expiry) = profile.ead_expiry_date {
            if profile.has_stem_degree && status == Status::OptApproved {
                due.push((&STEM_OPT_DEADLINE, rules::stem_opt_deadline(expiry)));
            }
        }

        if matches!(status, Status::Employed | Status::H1bPreparing) {
            if let Some(window) = rules::h1b_registration_period(today.year()) {
                due.push((&H1B_REGISTRATION, window.start));
            }
        }

        if status == Status::H1bApproved {
            let year = profile
                .h1b_start_date
                .map_or(today.year(), |start| start.year());
            if let Some(start) = rules::h1b_start_date(year) {
                due.push((&H1B_START, start));
            }
        }

        if let Some(expiry) = profile.passport_expiry_date {
            due.push((&PASSPORT_EXPIRY, expiry));
        }

        if let Some(expiry) = profile.ead_expiry_date {
            due.push((&EAD_EXPIRY, expiry));
        }

        due
    }

    fn materialize(
        &self,
        template: &DeadlineTemplate,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Deadline {
        Deadline {
            kind: template.kind,
            title: template.title,
            description: template.description,
            due_date,
            priority: template.priority,
            status: self.status_for(due_date, today),
            urgency: rules::urgency(due_date, today),
            related_status: template.related_status,
            action_required: template.action_required,
            notification_days_before: template.notification_days_before.to_vec(),
            notification_dates: rules::notification_dates(
                due_date,
                template.notification_days_before,
                today,
            ),
            days_remaining: rules::days_until(due_date, today),
            relative_due: rules::relative_label(due_date, today),
        }
    }

    fn status_for(&self, due_date: NaiveDate, today: NaiveDate) -> DeadlineStatus {
        if due_date < today {
            DeadlineStatus::Overdue
        } else if rules::is_within_warning_period(due_date, today, self.warning_days) {
            DeadlineStatus::DueSoon
        } else {
            DeadlineStatus::Upcoming
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadlines::DeadlineUrgency;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn student_gets_opt_window_and_grace_period() {
        let mut profile = StudentProfile::new(ImmigrationStatus::F1Student);
        profile.graduation_date = Some(date(2026, 5, 15));
        profile.program_end_date = Some(date(2026, 5, 15));

        let plan = DeadlinePlanner::default().plan(&profile, date(2025, 12, 1));
        let kinds: Vec<DeadlineKind> = plan.deadlines.iter().map(|d| d.kind).collect();

        assert_eq!(
            kinds,
            vec![
                DeadlineKind::OptApplicationWindowStart,
                DeadlineKind::OptGracePeriodEnd
            ]
        );
        assert_eq!(plan.deadlines[0].due_date, date(2026, 2, 14));
        assert_eq!(plan.deadlines[1].due_date, date(2026, 7, 14));
        assert_eq!(plan.upcoming.len(), 2);
    }

    #[test]
    fn opt_not_applied_adds_application_deadline() {
        let mut profile = StudentProfile::new(ImmigrationStatus::OptNotApplied);
        profile.program_end_date = Some(date(2025, 9, 1));

        let plan = DeadlinePlanner::default().plan(&profile, date(2025, 10, 25));
        let deadline = plan
            .find(DeadlineKind::OptApplicationDeadline)
            .expect("application deadline");

        assert_eq!(deadline.due_date, date(2025, 10, 31));
        assert_eq!(deadline.status, DeadlineStatus::DueSoon);
        assert_eq!(deadline.urgency, DeadlineUrgency::High);
        assert_eq!(deadline.priority, DeadlinePriority::Critical);
        assert_eq!(deadline.days_remaining, 6);
        assert_eq!(
            deadline.notification_dates,
            vec![date(2025, 10, 28), date(2025, 10, 30)]
        );
    }

    #[test]
    fn past_deadlines_are_overdue_and_excluded_from_upcoming() {
        let mut profile = StudentProfile::new(ImmigrationStatus::EadReceived);
        profile.ead_received_date = Some(date(2025, 1, 1));
        profile.passport_expiry_date = Some(date(2027, 1, 1));

        let plan = DeadlinePlanner::default().plan(&profile, date(2025, 10, 1));

        let overdue: Vec<DeadlineKind> = plan.overdue().map(|d| d.kind).collect();
        assert_eq!(overdue, vec![DeadlineKind::Unemployment90DayLimit]);
        assert_eq!(plan.upcoming.len(), 1);
        assert_eq!(plan.upcoming[0].kind, DeadlineKind::PassportExpiry);
    }

    #[test]
    fn stem_deadline_requires_degree_and_approved_opt() {
        let mut profile = StudentProfile::new(ImmigrationStatus::OptApproved);
        profile.ead_expiry_date = Some(date(2026, 6, 30));

        let planner = DeadlinePlanner::default();
        let today = date(2025, 10, 1);
        assert!(planner
            .plan(&profile, today)
            .find(DeadlineKind::StemOptApplicationDeadline)
            .is_none());

        profile.has_stem_degree = true;
        let plan = planner.plan(&profile, today);
        let stem = plan
            .find(DeadlineKind::StemOptApplicationDeadline)
            .expect("stem deadline");
        assert_eq!(stem.due_date, date(2026, 5, 31));
        assert!(plan.find(DeadlineKind::EadExpiry).is_some());
    }

    #[test]
    fn h1b_dates_follow_evaluation_year() {
        let employed = StudentProfile::new(ImmigrationStatus::Employed);
        let plan = DeadlinePlanner::default().plan(&employed, date(2026, 1, 10));
        assert_eq!(
            plan.find(DeadlineKind::H1bRegistrationPeriod)
                .map(|d| d.due_date),
            Some(date(2026, 3, 1))
        );

        let mut approved = StudentProfile::new(ImmigrationStatus::H1bApproved);
        approved.h1b_start_date = Some(date(2027, 10, 1));
        let plan = DeadlinePlanner::default().plan(&approved, date(2026, 1, 10));
        assert_eq!(
            plan.find(DeadlineKind::H1bStartDate).map(|d| d.due_date),
            Some(date(2027, 10, 1))
        );
    }

    #[test]
    fn full_profile_plan_is_sorted_by_due_date() {
        let mut profile = StudentProfile::new(ImmigrationStatus::OptApproved);
        profile.has_stem_degree = true;
        profile.program_end_date = Some(date(2026, 5, 1));
        profile.ead_received_date = Some(date(2026, 1, 1));
        profile.ead_expiry_date = Some(date(2027, 1, 1));
        profile.passport_expiry_date = Some(date(2028, 1, 1));
        profile.graduation_date = Some(date(2026, 5, 1));

        let plan = DeadlinePlanner::default().plan(&profile, date(2025, 10, 1));
        assert_eq!(plan.deadlines.len(), 5);
        assert!(plan
            .deadlines
            .windows(2)
            .all(|pair| pair[0].due_date <= pair[1].due_date));
        assert_eq!(plan.upcoming.len(), 5);
    }

    #[test]
    fn plan_carries_actions_milestones_and_documents() {
        let mut profile = StudentProfile::new(ImmigrationStatus::EadReceived);
        profile.graduation_date = Some(date(2025, 5, 15));
        profile.ead_received_date = Some(date(2025, 8, 1));
        profile.ead_expiry_date = Some(date(2025, 12, 1));
        profile.h1b_start_date = Some(date(2026, 10, 1));

        let plan = DeadlinePlanner::default().plan(&profile, date(2025, 10, 1));

        assert_eq!(plan.action_items.len(), 2);
        assert_eq!(plan.events.len(), 3);
        assert_eq!(
            plan.next_milestone.as_ref().map(|event| event.date),
            Some(date(2026, 10, 1))
        );
        assert_eq!(plan.next_steps[0].status, ImmigrationStatus::JobSearching);
        assert_eq!(plan.documents.len(), 1);
        assert_eq!(plan.documents[0].document, "EAD Card");
        assert_eq!(plan.documents[0].status, crate::deadlines::DocumentStatus::ExpiringSoon);
    }
}
