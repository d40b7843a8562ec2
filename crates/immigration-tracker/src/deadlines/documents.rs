use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::StudentProfile;
use super::rules;
use super::status::ImmigrationStatus;

/// Documents expiring within this many days are flagged.
pub const DOCUMENT_EXPIRY_WARNING_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Valid,
    ExpiringSoon,
    Expired,
    Pending,
    NotApplicable,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Expired => "Expired",
            Self::Pending => "Pending",
            Self::NotApplicable => "Not Applicable",
        }
    }
}

/// Expired once the date has passed; expiring soon up to and including the
/// last valid day.
pub fn document_status(expiry: Option<NaiveDate>, today: NaiveDate) -> DocumentStatus {
    let Some(expiry) = expiry else {
        return DocumentStatus::NotApplicable;
    };

    let days = rules::days_until(expiry, today);
    if days < 0 {
        DocumentStatus::Expired
    } else if days <= DOCUMENT_EXPIRY_WARNING_DAYS {
        DocumentStatus::ExpiringSoon
    } else {
        DocumentStatus::Valid
    }
}

pub fn is_document_expired(expiry: Option<NaiveDate>, today: NaiveDate) -> bool {
    expiry.is_some_and(|expiry| expiry < today)
}

/// Still valid for at least one more day but no more than `threshold_days`.
pub fn is_document_expiring_soon(
    expiry: Option<NaiveDate>,
    today: NaiveDate,
    threshold_days: i64,
) -> bool {
    expiry.is_some_and(|expiry| {
        let days = rules::days_until(expiry, today);
        days > 0 && days <= threshold_days
    })
}

/// Paperwork a student in `status` is expected to keep on hand.
pub const fn required_documents(status: ImmigrationStatus) -> &'static [&'static str] {
    use ImmigrationStatus as Status;

    match status {
        Status::F1Student => &["Passport", "F-1 Visa", "I-20", "I-94"],
        Status::OptPending | Status::OptApproved => &[
            "Passport",
            "F-1 Visa",
            "I-20",
            "I-94",
            "I-765 Receipt",
            "EAD Card",
        ],
        Status::StemOptPending | Status::StemOptApproved => &[
            "Passport",
            "F-1 Visa",
            "I-20",
            "EAD Card",
            "I-983 Training Plan",
            "STEM Degree Proof",
        ],
        Status::H1bPetitionFiled | Status::H1bApproved | Status::H1bActive => &[
            "Passport",
            "H-1B Visa",
            "I-129 Approval Notice",
            "I-94",
            "LCA",
        ],
        Status::Employed => &[
            "Passport",
            "EAD Card",
            "Employment Authorization Document",
            "Job Offer Letter",
        ],
        _ => &["Passport", "Visa", "I-94"],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCheck {
    pub document: &'static str,
    pub expiry_date: NaiveDate,
    pub status: DocumentStatus,
    pub days_until_expiry: i64,
}

/// Expiry checks for the dated documents on a profile, soonest first.
pub fn document_checks(profile: &StudentProfile, today: NaiveDate) -> Vec<DocumentCheck> {
    let mut checks: Vec<DocumentCheck> = [
        ("Passport", profile.passport_expiry_date),
        ("EAD Card", profile.ead_expiry_date),
    ]
    .into_iter()
    .filter_map(|(document, expiry)| {
        expiry.map(|expiry_date| DocumentCheck {
            document,
            expiry_date,
            status: document_status(Some(expiry_date), today),
            days_until_expiry: rules::days_until(expiry_date, today),
        })
    })
    .collect();

    checks.sort_by_key(|check| check.expiry_date);
    checks
}
