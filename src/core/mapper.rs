use crate::domain::model::{ColumnMapping, ContactField, RawRow};
use crate::utils::error::{ImportError, Result};

const PHONE_KEYWORDS: &[&str] = &["phone", "mobile", "number", "whatsapp"];
const NAME_KEYWORDS: &[&str] = &["name", "contact"];
const EMAIL_KEYWORDS: &[&str] = &["email", "mail"];
const TAG_KEYWORDS: &[&str] = &["tag", "label", "group"];

fn keywords(field: ContactField) -> &'static [&'static str] {
    match field {
        ContactField::Phone => PHONE_KEYWORDS,
        ContactField::Name => NAME_KEYWORDS,
        ContactField::Email => EMAIL_KEYWORDS,
        ContactField::Tags => TAG_KEYWORDS,
    }
}

/// Which field a header names, if any. Fields are tried in
/// phone, name, email, tags order so each column claims at most one field.
pub fn classify_header(header: &str) -> Option<ContactField> {
    let h = header.trim().to_lowercase();
    ContactField::ALL
        .into_iter()
        .find(|field| keywords(*field).iter().any(|kw| h.contains(kw)))
}

/// Best-effort mapping from header keywords. The first matching column wins.
pub fn detect_mapping(headers: &RawRow) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for (index, header) in headers.fields.iter().enumerate() {
        if let Some(field) = classify_header(header) {
            if mapping.get(field).is_none() {
                mapping.set(field, Some(index));
            }
        }
    }

    tracing::debug!(
        "Auto-detected mapping: phone={:?} name={:?} email={:?} tags={:?}",
        mapping.phone,
        mapping.name,
        mapping.email,
        mapping.tags
    );
    mapping
}

/// Resolve a user-supplied column reference: a zero-based index or the
/// header text (case-insensitive).
pub fn resolve_column(headers: &RawRow, field: ContactField, column: &str) -> Result<usize> {
    let wanted = column.trim();
    let unknown = || ImportError::UnknownColumn {
        field: field.to_string(),
        column: wanted.to_string(),
        available: headers.len(),
    };

    if let Ok(index) = wanted.parse::<usize>() {
        return if index < headers.len() {
            Ok(index)
        } else {
            Err(unknown())
        };
    }

    headers
        .fields
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(unknown)
}
