use crate::utils::error::ImportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One parsed CSV line. Rows may be ragged; a missing cell reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<&str>> for RawRow {
    fn from(fields: Vec<&str>) -> Self {
        Self::new(fields.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Phone,
    Name,
    Email,
    Tags,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Phone,
        ContactField::Name,
        ContactField::Email,
        ContactField::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Phone => "phone",
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Tags => "tags",
        }
    }
}

impl FromStr for ContactField {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(ContactField::Phone),
            "name" => Ok(ContactField::Name),
            "email" => Ok(ContactField::Email),
            "tags" | "tag" => Ok(ContactField::Tags),
            other => Err(ImportError::ConfigError {
                message: format!("unknown contact field '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical field -> zero-based column index. `None` means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub phone: Option<usize>,
    pub name: Option<usize>,
    pub email: Option<usize>,
    pub tags: Option<usize>,
}

impl ColumnMapping {
    pub fn get(&self, field: ContactField) -> Option<usize> {
        match field {
            ContactField::Phone => self.phone,
            ContactField::Name => self.name,
            ContactField::Email => self.email,
            ContactField::Tags => self.tags,
        }
    }

    pub fn set(&mut self, field: ContactField, column: Option<usize>) {
        let slot = match field {
            ContactField::Phone => &mut self.phone,
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Tags => &mut self.tags,
        };
        *slot = column;
    }

    pub fn is_complete(&self) -> bool {
        self.phone.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub phone: String,
    pub name: String,
    pub email: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: u64,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

/// Terminal payload of a finished import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub source_name: String,
    pub submitted: usize,
    pub skipped: usize,
    pub imported: u64,
    pub errors: Vec<serde_json::Value>,
}

impl ImportSummary {
    pub fn failed(&self) -> usize {
        self.errors.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Result of the upload step: header, a short preview and the full text
/// kept around for the final re-parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUpload {
    pub source_name: String,
    pub text: String,
    pub headers: RawRow,
    pub preview: Vec<RawRow>,
    pub data_rows: usize,
}

impl ParsedUpload {
    pub fn header_for(&self, column: Option<usize>) -> Option<&str> {
        column.and_then(|index| self.headers.fields.get(index).map(String::as_str))
    }
}
