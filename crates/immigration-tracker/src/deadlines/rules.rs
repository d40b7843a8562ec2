//! Calendar rules for OPT, STEM OPT and H1B deadlines.
//!
//! Every function is pure: the evaluation date is passed in explicitly so the
//! same inputs always give the same dates.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const OPT_EARLY_FILING_DAYS: i64 = 90;
pub const POST_COMPLETION_DAYS: i64 = 60;
pub const UNEMPLOYMENT_LIMIT_DAYS: i64 = 90;
pub const STEM_FILING_LEAD_DAYS: i64 = 30;
pub const ADDRESS_CHANGE_DAYS: i64 = 10;
pub const PREMIUM_PROCESSING_BUSINESS_DAYS: u32 = 15;
pub const STEM_REPORTING_INTERVAL_MONTHS: u32 = 6;
pub const DEFAULT_WARNING_DAYS: i64 = 14;
const REASONABLE_RANGE_DAYS: i64 = 365 * 10;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineUrgency {
    Low,
    Medium,
    High,
    Critical,
}

impl DeadlineUrgency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

pub fn opt_application_start(graduation: NaiveDate) -> NaiveDate {
    graduation - Duration::days(OPT_EARLY_FILING_DAYS)
}

pub fn opt_application_deadline(program_end: NaiveDate) -> NaiveDate {
    program_end + Duration::days(POST_COMPLETION_DAYS)
}

pub fn grace_period_end(program_end: NaiveDate) -> NaiveDate {
    program_end + Duration::days(POST_COMPLETION_DAYS)
}

pub fn unemployment_limit(opt_start: NaiveDate) -> NaiveDate {
    opt_start + Duration::days(UNEMPLOYMENT_LIMIT_DAYS)
}

/// Latest comfortable filing date for the STEM extension.
pub fn stem_opt_deadline(current_opt_expiry: NaiveDate) -> NaiveDate {
    current_opt_expiry - Duration::days(STEM_FILING_LEAD_DAYS)
}

/// Registration runs March 1 through March 18.
pub fn h1b_registration_period(year: i32) -> Option<DateWindow> {
    Some(DateWindow {
        start: NaiveDate::from_ymd_opt(year, 3, 1)?,
        end: NaiveDate::from_ymd_opt(year, 3, 18)?,
    })
}

pub fn h1b_start_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 10, 1)
}

/// Gap between OPT expiry and the October 1 H1B start, if there is one.
pub fn cap_gap_period(opt_expiry: NaiveDate, h1b_year: i32) -> Option<DateWindow> {
    let h1b_start = h1b_start_date(h1b_year)?;
    (opt_expiry < h1b_start).then_some(DateWindow {
        start: opt_expiry,
        end: h1b_start,
    })
}

pub fn address_change_deadline(move_date: NaiveDate) -> NaiveDate {
    move_date + Duration::days(ADDRESS_CHANGE_DAYS)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while is_weekend(next) {
        next += Duration::days(1);
    }
    next
}

pub fn add_business_days(start: NaiveDate, business_days: u32) -> NaiveDate {
    let mut date = start;
    for _ in 0..business_days {
        date = next_business_day(date);
    }
    date
}

pub fn processing_estimate(
    submitted: NaiveDate,
    min_months: u32,
    max_months: u32,
) -> Option<DateWindow> {
    Some(DateWindow {
        start: submitted.checked_add_months(Months::new(min_months))?,
        end: submitted.checked_add_months(Months::new(max_months))?,
    })
}

/// USCIS usually takes three to five months on an I-765.
pub fn opt_processing_estimate(applied: NaiveDate) -> Option<DateWindow> {
    processing_estimate(applied, 3, 5)
}

pub fn h1b_processing_estimate(filed: NaiveDate, premium: bool) -> Option<DateWindow> {
    if premium {
        let decision = add_business_days(filed, PREMIUM_PROCESSING_BUSINESS_DAYS);
        return Some(DateWindow {
            start: decision,
            end: decision,
        });
    }
    processing_estimate(filed, 3, 6)
}

/// Six-monthly validation reports due strictly before the STEM OPT end date.
pub fn stem_reporting_deadlines(stem_start: NaiveDate, stem_end: NaiveDate) -> Vec<NaiveDate> {
    let mut deadlines = Vec::new();
    let mut step = STEM_REPORTING_INTERVAL_MONTHS;
    while let Some(date) = stem_start.checked_add_months(Months::new(step)) {
        if date >= stem_end {
            break;
        }
        deadlines.push(date);
        step += STEM_REPORTING_INTERVAL_MONTHS;
    }
    deadlines
}

pub fn days_until(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Reminder dates still ahead of `today`, earliest first.
pub fn notification_dates(
    deadline: NaiveDate,
    days_before: &[i64],
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = days_before
        .iter()
        .map(|days| deadline - Duration::days(*days))
        .filter(|date| *date > today)
        .collect();
    dates.sort();
    dates
}

pub fn urgency(deadline: NaiveDate, today: NaiveDate) -> DeadlineUrgency {
    match days_until(deadline, today) {
        days if days <= 3 => DeadlineUrgency::Critical,
        days if days <= 7 => DeadlineUrgency::High,
        days if days <= 30 => DeadlineUrgency::Medium,
        _ => DeadlineUrgency::Low,
    }
}

pub fn is_within_warning_period(deadline: NaiveDate, today: NaiveDate, warning_days: i64) -> bool {
    (0..=warning_days).contains(&days_until(deadline, today))
}

/// Short phrase such as "in 3 days" or "2 months ago". Months are 30 days.
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    let days = days_until(date, today);

    if days < 0 {
        let elapsed = days.abs();
        return match elapsed {
            1 => "1 day ago".to_string(),
            2..=29 => format!("{elapsed} days ago"),
            _ => match elapsed / 30 {
                1 => "1 month ago".to_string(),
                months => format!("{months} months ago"),
            },
        };
    }

    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=29 => format!("in {days} days"),
        _ => match days / 30 {
            1 => "in 1 month".to_string(),
            months => format!("in {months} months"),
        },
    }
}

/// Rejects dates more than ten years away from `today` in either direction.
pub fn is_reasonable_date(date: NaiveDate, today: NaiveDate) -> bool {
    let range = Duration::days(REASONABLE_RANGE_DAYS);
    date > today - range && date < today + range
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn opt_windows_follow_day_offsets() {
        let graduation = date(2025, 5, 15);
        assert_eq!(opt_application_start(graduation), date(2025, 2, 14));
        assert_eq!(opt_application_deadline(graduation), date(2025, 7, 14));
        assert_eq!(grace_period_end(graduation), date(2025, 7, 14));
        assert_eq!(unemployment_limit(date(2025, 8, 1)), date(2025, 10, 30));
        assert_eq!(stem_opt_deadline(date(2026, 8, 1)), date(2026, 7, 2));
        assert_eq!(address_change_deadline(date(2025, 12, 28)), date(2026, 1, 7));
    }

    #[test]
    fn h1b_calendar_is_fixed_per_year() {
        let window = h1b_registration_period(2026).expect("window");
        assert_eq!(window.start, date(2026, 3, 1));
        assert_eq!(window.end, date(2026, 3, 18));
        assert!(window.contains(date(2026, 3, 18)));
        assert!(!window.contains(date(2026, 3, 19)));
        assert_eq!(h1b_start_date(2026), Some(date(2026, 10, 1)));
    }

    #[test]
    fn cap_gap_only_when_opt_expires_first() {
        let gap = cap_gap_period(date(2026, 6, 30), 2026).expect("gap needed");
        assert_eq!(gap.start, date(2026, 6, 30));
        assert_eq!(gap.end, date(2026, 10, 1));
        assert!(cap_gap_period(date(2026, 10, 1), 2026).is_none());
        assert!(cap_gap_period(date(2026, 12, 1), 2026).is_none());
    }

    #[test]
    fn business_days_skip_weekends() {
        // 2025-10-17 is a Friday.
        let friday = date(2025, 10, 17);
        assert!(is_weekend(date(2025, 10, 18)));
        assert_eq!(next_business_day(friday), date(2025, 10, 20));
        assert_eq!(add_business_days(friday, 1), date(2025, 10, 20));
        assert_eq!(add_business_days(friday, 15), date(2025, 11, 7));
    }

    #[test]
    fn processing_estimates_use_calendar_months() {
        let opt = opt_processing_estimate(date(2025, 1, 31)).expect("estimate");
        assert_eq!(opt.start, date(2025, 4, 30));
        assert_eq!(opt.end, date(2025, 6, 30));

        let regular = h1b_processing_estimate(date(2025, 4, 1), false).expect("estimate");
        assert_eq!(regular.end, date(2025, 10, 1));

        let premium = h1b_processing_estimate(date(2025, 10, 17), true).expect("estimate");
        assert_eq!(premium.start, premium.end);
        assert_eq!(premium.start, date(2025, 11, 7));
    }

    #[test]
    fn stem_reports_stop_before_end_date() {
        let reports = stem_reporting_deadlines(date(2025, 1, 1), date(2027, 1, 1));
        assert_eq!(
            reports,
            vec![date(2025, 7, 1), date(2026, 1, 1), date(2026, 7, 1)]
        );
    }

    #[test]
    fn notifications_keep_future_dates_in_order() {
        let today = date(2025, 10, 1);
        let deadline = date(2025, 10, 20);
        let dates = notification_dates(deadline, &[1, 30, 7, 14], today);
        assert_eq!(
            dates,
            vec![date(2025, 10, 6), date(2025, 10, 13), date(2025, 10, 19)]
        );
    }

    #[test]
    fn urgency_thresholds() {
        let today = date(2025, 10, 1);
        assert_eq!(urgency(date(2025, 9, 1), today), DeadlineUrgency::Critical);
        assert_eq!(urgency(date(2025, 10, 4), today), DeadlineUrgency::Critical);
        assert_eq!(urgency(date(2025, 10, 8), today), DeadlineUrgency::High);
        assert_eq!(urgency(date(2025, 10, 31), today), DeadlineUrgency::Medium);
        assert_eq!(urgency(date(2025, 11, 1), today), DeadlineUrgency::Low);
    }

    #[test]
    fn warning_period_excludes_past_dates() {
        let today = date(2025, 10, 1);
        assert!(is_within_warning_period(today, today, DEFAULT_WARNING_DAYS));
        assert!(is_within_warning_period(date(2025, 10, 15), today, 14));
        assert!(!is_within_warning_period(date(2025, 10, 16), today, 14));
        assert!(!is_within_warning_period(date(2025, 9, 30), today, 14));
    }

    #[test]
    fn relative_labels() {
        let today = date(2025, 10, 1);
        assert_eq!(relative_label(today, today), "Today");
        assert_eq!(relative_label(date(2025, 10, 2), today), "Tomorrow");
        assert_eq!(relative_label(date(2025, 10, 11), today), "in 10 days");
        assert_eq!(relative_label(date(2025, 11, 5), today), "in 1 month");
        assert_eq!(relative_label(date(2026, 1, 1), today), "in 3 months");
        assert_eq!(relative_label(date(2025, 9, 30), today), "1 day ago");
        assert_eq!(relative_label(date(2025, 9, 21), today), "10 days ago");
        assert_eq!(relative_label(date(2025, 7, 1), today), "3 months ago");
    }

    #[test]
    fn reasonable_dates_stay_within_ten_years() {
        let today = date(2025, 10, 1);
        assert!(is_reasonable_date(date(2030, 1, 1), today));
        assert!(!is_reasonable_date(date(2040, 1, 1), today));
        assert!(!is_reasonable_date(date(2010, 1, 1), today));
    }
}
