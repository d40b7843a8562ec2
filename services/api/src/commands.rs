use crate::cli::{parse_profiles, ProfileList};
use crate::infra::{build_resolver, parse_date, parse_status, profile_source};
use chrono::{Local, NaiveDate};
use clap::Args;
use immigration_tracker::config::AppConfig;
use immigration_tracker::deadlines::{
    documents, transitions, DeadlinePlan, DeadlinePlanner, ImmigrationStatus, StudentProfile,
};
use immigration_tracker::error::AppError;
use immigration_tracker::profiles::{DeploymentProfile, Resolution};

#[derive(Args, Debug, Default)]
pub(crate) struct ProfilesArgs {
    /// Comma separated profiles to evaluate instead of APP_PROFILES
    #[arg(long, value_parser = parse_profiles)]
    pub(crate) profiles: Option<ProfileList>,
    /// Look up the binding of a single profile; unknown names are an error
    #[arg(long)]
    pub(crate) binding: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DeadlinesArgs {
    /// Current immigration status (e.g. f1_student, opt_approved, employed)
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: ImmigrationStatus,
    /// The degree qualifies for the STEM OPT extension
    #[arg(long)]
    pub(crate) stem: bool,
    /// Graduation date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) graduation: Option<NaiveDate>,
    /// Program end date from the I-20 (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) program_end: Option<NaiveDate>,
    /// Date the EAD card was received (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) ead_received: Option<NaiveDate>,
    /// EAD card expiry date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) ead_expiry: Option<NaiveDate>,
    /// Approved H1B start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) h1b_start: Option<NaiveDate>,
    /// Passport expiry date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) passport_expiry: Option<NaiveDate>,
    /// Date the OPT application was filed (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) opt_applied: Option<NaiveDate>,
    /// First day of employment (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) employment_start: Option<NaiveDate>,
    /// Current employer name
    #[arg(long)]
    pub(crate) employer: Option<String>,
    /// Date the H1B registration was submitted (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) h1b_registered: Option<NaiveDate>,
    /// H1B lottery outcome once known (true or false)
    #[arg(long)]
    pub(crate) h1b_selected: Option<bool>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the plan as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl DeadlinesArgs {
    fn student_profile(&self) -> StudentProfile {
        StudentProfile {
            current_status: self.status,
            has_stem_degree: self.stem,
            graduation_date: self.graduation,
            program_end_date: self.program_end,
            ead_received_date: self.ead_received,
            ead_expiry_date: self.ead_expiry,
            h1b_start_date: self.h1b_start,
            passport_expiry_date: self.passport_expiry,
            opt_application_date: self.opt_applied,
            employment_start_date: self.employment_start,
            current_employer: self.employer.clone(),
            h1b_registration_date: self.h1b_registered,
            h1b_lottery_selected: self.h1b_selected,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct TransitionsArgs {
    /// Current immigration status
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: ImmigrationStatus,
    /// Check whether moving to this status is allowed
    #[arg(long, value_parser = parse_status)]
    pub(crate) to: Option<ImmigrationStatus>,
}

pub(crate) fn run_profiles(args: ProfilesArgs) -> Result<(), AppError> {
    let overridden = match args.profiles {
        Some(ProfileList(profiles)) => Some(profiles),
        None => {
            AppConfig::load()?;
            None
        }
    };
    let resolver = build_resolver(profile_source(overridden));

    if let Some(name) = args.binding {
        let binding = resolver.require_binding(&DeploymentProfile::new(name))?;
        println!("{}", binding.database_info());
        return Ok(());
    }

    print!("{}", render_resolution(&resolver.resolve()));
    println!("\nRegistered profiles");
    for binding in resolver.registry().bindings() {
        println!(
            "- {}: {} ({})",
            binding.profile,
            binding.engine.label(),
            binding.engine.kind().label()
        );
    }
    Ok(())
}

pub(crate) fn run_deadlines(args: DeadlinesArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let profile = args.student_profile();
    let plan = DeadlinePlanner::default().plan(&profile, today);

    if args.json {
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|err| AppError::InvalidInput(err.to_string()))?;
        println!("{json}");
    } else {
        print!("{}", render_deadline_plan(&plan));
    }
    Ok(())
}

pub(crate) fn run_transitions(args: TransitionsArgs) -> Result<(), AppError> {
    if let Some(to) = args.to {
        transitions::validate_transition(args.status, to)?;
        println!("{} -> {} is allowed", args.status.label(), to.label());
        return Ok(());
    }

    print!("{}", render_transitions(args.status));
    Ok(())
}

pub(crate) fn render_resolution(resolution: &Resolution) -> String {
    let mut out = format!("{}\n", resolution.report);
    match &resolution.selected {
        Some(binding) => {
            out.push_str(&format!("{}\n", binding.database_info));
            out.push_str(&format!("Connection: {}\n", binding.connection_url));
        }
        None => out.push_str("No database binding selected\n"),
    }
    if !resolution.ignored_profiles.is_empty() {
        let ignored: Vec<&str> = resolution
            .ignored_profiles
            .iter()
            .map(DeploymentProfile::as_str)
            .collect();
        out.push_str(&format!("Ignored profiles: {}\n", ignored.join(", ")));
    }
    out
}

pub(crate) fn render_deadline_plan(plan: &DeadlinePlan) -> String {
    let mut out = format!(
        "Deadlines for {} ({}), evaluated {}\n",
        plan.current_status.label(),
        plan.current_status.phase().label(),
        plan.evaluated_on
    );

    if plan.deadlines.is_empty() {
        out.push_str("No deadlines apply to this profile\n");
    }

    for deadline in &plan.deadlines {
        out.push_str(&format!(
            "- [{}] {} due {} ({}), {} priority, {} urgency\n",
            deadline.status.label(),
            deadline.title,
            deadline.due_date,
            deadline.relative_due,
            deadline.priority.label(),
            deadline.urgency.label()
        ));
        out.push_str(&format!("    action: {}\n", deadline.action_required));
        if let Some(reminder) = deadline.notification_dates.first() {
            out.push_str(&format!("    next reminder: {reminder}\n"));
        }
    }
    render_plan_extras(plan, &mut out);
    out
}

fn render_plan_extras(plan: &DeadlinePlan, out: &mut String) {
    if !plan.action_items.is_empty() {
        out.push_str("\nAction items\n");
        for item in &plan.action_items {
            let required = if item.is_required { "required" } else { "optional" };
            out.push_str(&format!(
                "- {} ({}, {}, ~{})\n",
                item.title,
                item.category.label(),
                required,
                item.estimated_duration
            ));
        }
    }

    if let Some(milestone) = &plan.next_milestone {
        out.push_str(&format!(
            "\nNext milestone: {} on {}\n",
            milestone.title, milestone.date
        ));
    }

    if !plan.documents.is_empty() {
        out.push_str("\nDocuments\n");
        for check in &plan.documents {
            out.push_str(&format!(
                "- {}: {} (expires {})\n",
                check.document,
                check.status.label(),
                check.expiry_date
            ));
        }
    }
}

pub(crate) fn render_transitions(status: ImmigrationStatus) -> String {
    let mut out = format!("{} ({})\n", status.label(), status.phase().label());
    if transitions::is_terminal_status(status) {
        out.push_str("No further steps on the usual path\n");
    }
    if transitions::requires_immediate_action(status) {
        out.push_str("Action needed now\n");
    }
    out.push_str(&format!(
        "Work authorized: {}\n",
        if transitions::can_work(status) { "yes" } else { "no" }
    ));

    out.push_str("Next steps\n");
    for suggestion in transitions::transition_suggestions(status) {
        out.push_str(&format!(
            "- [{}] {}: {}\n",
            suggestion.priority.label(),
            suggestion.status.label(),
            suggestion.reason
        ));
    }

    out.push_str(&format!(
        "Documents to keep: {}\n",
        documents::required_documents(status).join(", ")
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn resolution_rendering_names_database_and_ignored_profiles() {
        let resolver = build_resolver(profile_source(Some(DeploymentProfile::parse_list(
            "dev,prod",
        ))));
        let rendered = render_resolution(&resolver.resolve());

        assert!(rendered.starts_with("Active profiles: dev prod \n"));
        assert!(rendered.contains("Using SQLite database for development environment"));
        assert!(rendered.contains("Ignored profiles: prod"));
    }

    #[test]
    fn resolution_rendering_without_profiles_uses_sentinel() {
        let rendered =
            render_resolution(&build_resolver(profile_source(Some(Vec::new()))).resolve());
        assert_eq!(
            rendered,
            "No active profile set - using default configuration\nNo database binding selected\n"
        );
    }

    #[test]
    fn deadline_rendering_lists_each_deadline() {
        let mut profile = StudentProfile::new(ImmigrationStatus::OptNotApplied);
        profile.program_end_date = Some(date(2026, 1, 1));
        let plan = DeadlinePlanner::default().plan(&profile, date(2026, 2, 20));

        let rendered = render_deadline_plan(&plan);
        assert!(rendered.starts_with("Deadlines for OPT Not Applied (OPT Phase)"));
        assert!(rendered.contains("- [Due Soon] OPT Application Deadline due 2026-03-02"));
        assert!(rendered.contains("action: Submit Form I-765 to USCIS immediately"));
    }

    #[test]
    fn deadline_rendering_includes_actions_and_documents() {
        let mut profile = StudentProfile::new(ImmigrationStatus::H1bPreparing);
        profile.passport_expiry_date = Some(date(2026, 4, 1));
        let plan = DeadlinePlanner::default().plan(&profile, date(2026, 2, 20));

        let rendered = render_deadline_plan(&plan);
        assert!(rendered.contains("- Prepare H1B Registration (Application, required, ~2 hours)"));
        assert!(rendered.contains("- Passport: Expiring Soon (expires 2026-04-01)"));
    }

    #[test]
    fn transition_rendering_leads_with_recommendation() {
        let rendered = render_transitions(ImmigrationStatus::H1bSelected);
        assert!(rendered.starts_with("H1B Lottery Selected (H1B Process)\nAction needed now\n"));
        assert!(rendered.contains("Work authorized: no\n"));
        assert!(rendered.contains("- [High] H1B Petition Filed: Next step in immigration process"));
        assert!(rendered.ends_with("Documents to keep: Passport, Visa, I-94\n"));
    }

    #[test]
    fn terminal_status_rendering() {
        let rendered = render_transitions(ImmigrationStatus::StatusExpired);
        assert!(rendered.contains("No further steps on the usual path"));
        assert!(rendered.contains("- [High] Other Status"));
    }

    #[test]
    fn deadline_rendering_without_matches() {
        let profile = StudentProfile::new(ImmigrationStatus::Other);
        let plan = DeadlinePlanner::default().plan(&profile, date(2026, 2, 20));
        assert!(render_deadline_plan(&plan).ends_with("No deadlines apply to this profile\n"));
    }
}
