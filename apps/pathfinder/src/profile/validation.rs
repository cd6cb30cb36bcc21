use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::AppError;
use crate::profile::models::{Certification, SectionName};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw certification entry as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificationDraft {
    pub name: String,
    pub org: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub id: String,
    pub file_name: String,
}

/// A section payload must be a non-empty JSON object.
pub fn validate_section_data(section: SectionName, data: &Value) -> Result<(), AppError> {
    match data {
        Value::Object(map) if !map.is_empty() => Ok(()),
        _ => Err(AppError::Validation(format!(
            "Save failed: missing data in {section}"
        ))),
    }
}

/// Validates a draft and turns it into a stored certification.
///
/// Name, issuing organisation and issue date are required. Dates use
/// `YYYY-MM-DD`; an expiry date, when given, may not precede the issue date.
pub fn validate_certification(draft: &CertificationDraft) -> Result<Certification, AppError> {
    let name = draft.name.trim();
    let org = draft.org.trim();
    let issue = draft.issue_date.trim();
    if name.is_empty() || org.is_empty() || issue.is_empty() {
        return Err(AppError::Validation(
            "Please fill required fields".to_string(),
        ));
    }

    let issued = parse_date("Issue date", issue)?;
    let expiry = draft.expiry_date.trim();
    if !expiry.is_empty() {
        let expires = parse_date("Expiry date", expiry)?;
        if expires < issued {
            return Err(AppError::Validation(
                "Expiry date cannot be before the issue date".to_string(),
            ));
        }
    }

    Ok(Certification {
        name: name.to_string(),
        org: org.to_string(),
        issue_date: issue.to_string(),
        expiry_date: expiry.to_string(),
        id: draft.id.trim().to_string(),
        file_name: draft.file_name.trim().to_string(),
    })
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("{label} must be in YYYY-MM-DD format")))
}

/// Full name is the one field a wholesale save cannot go without.
pub fn require_full_name(full_name: &str) -> Result<(), AppError> {
    if full_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter your full name".to_string(),
        ));
    }
    Ok(())
}

/// Blank-value guard shared by the auth forms.
pub fn validate_credentials(fields: &[&str]) -> Result<(), AppError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::Validation("Please fill all fields".to_string()));
    }
    Ok(())
}

/// Age may arrive as free text; blank means "not given".
pub fn parse_age(raw: &str) -> Result<Option<u32>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| AppError::Validation("Age must be a whole number".to_string()))
}
