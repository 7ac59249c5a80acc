use crate::domain::model::{ColumnMapping, ContactRecord, RawRow};

fn cell(row: &RawRow, column: Option<usize>) -> &str {
    column.map(|index| row.get(index)).unwrap_or("")
}

/// Drop whitespace and `-()` from a phone number.
pub fn clean_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split on `;`, trim, drop empties and repeats. First occurrence order is kept.
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Turn a mapped row into a contact. `None` means the row has no usable phone
/// and is skipped.
pub fn normalize_row(row: &RawRow, mapping: &ColumnMapping) -> Option<ContactRecord> {
    let phone = clean_phone(cell(row, mapping.phone));
    if phone.is_empty() {
        return None;
    }

    Some(ContactRecord {
        phone,
        name: cell(row, mapping.name).trim().to_string(),
        email: cell(row, mapping.email).trim().to_string(),
        tags: split_tags(cell(row, mapping.tags)),
    })
}

/// Normalize every row, returning the contacts and the number of skipped rows.
pub fn normalize_rows<'a, I>(rows: I, mapping: &ColumnMapping) -> (Vec<ContactRecord>, usize)
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut contacts = Vec::new();
    let mut skipped = 0;

    for (line, row) in rows.into_iter().enumerate() {
        match normalize_row(row, mapping) {
            Some(contact) => contacts.push(contact),
            None => {
                skipped += 1;
                tracing::debug!("Skipping data row {}: no phone number", line + 1);
            }
        }
    }

    (contacts, skipped)
}
