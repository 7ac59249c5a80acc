use crate::core::mapper::{detect_mapping, resolve_column};
use crate::core::normalizer::normalize_rows;
use crate::core::parser::{non_blank_lines, parse_line};
use crate::core::{ColumnMapping, ContactApi, ContactField, ContactRecord, Storage};
use crate::domain::model::{ImportSummary, ParsedUpload};
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::validate_file_extension;

pub const PREVIEW_ROW_LIMIT: usize = 10;

/// Where an import session currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportState {
    Upload,
    Mapping {
        upload: ParsedUpload,
        mapping: ColumnMapping,
    },
    Preview {
        upload: ParsedUpload,
        mapping: ColumnMapping,
    },
    Done(ImportSummary),
}

impl ImportState {
    pub fn name(&self) -> &'static str {
        match self {
            ImportState::Upload => "upload",
            ImportState::Mapping { .. } => "mapping",
            ImportState::Preview { .. } => "preview",
            ImportState::Done(_) => "done",
        }
    }
}

/// Split `text` into header, preview rows and a data row count.
/// A leading UTF-8 byte-order mark (as written by spreadsheet exports) is dropped.
pub fn parse_upload(source_name: &str, text: &str, preview_rows: usize) -> Result<ParsedUpload> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = non_blank_lines(text);
    let headers = lines.next().map(parse_line);
    let data: Vec<&str> = lines.collect();

    let headers = match headers {
        Some(headers) if !data.is_empty() => headers,
        _ => {
            let found = usize::from(headers.is_some()) + data.len();
            return Err(ImportError::InsufficientRows { found });
        }
    };

    let preview = data.iter().take(preview_rows).map(|l| parse_line(l)).collect();

    Ok(ParsedUpload {
        source_name: source_name.to_string(),
        text: text.to_string(),
        headers,
        preview,
        data_rows: data.len(),
    })
}

/// Re-parse the whole upload with the final mapping.
pub fn build_contacts(upload: &ParsedUpload, mapping: &ColumnMapping) -> (Vec<ContactRecord>, usize) {
    let rows: Vec<_> = non_blank_lines(&upload.text).skip(1).map(parse_line).collect();
    normalize_rows(&rows, mapping)
}

/// One CSV import, from upload to done. Each session owns its state; the
/// API client is the only shared piece.
pub struct ImportSession<A: ContactApi> {
    api: A,
    state: ImportState,
    preview_rows: usize,
}

impl<A: ContactApi> ImportSession<A> {
    pub fn new(api: A) -> Self {
        Self::with_preview_rows(api, PREVIEW_ROW_LIMIT)
    }

    pub fn with_preview_rows(api: A, preview_rows: usize) -> Self {
        Self {
            api,
            state: ImportState::Upload,
            preview_rows,
        }
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn upload(&self) -> Option<&ParsedUpload> {
        match &self.state {
            ImportState::Mapping { upload, .. } | ImportState::Preview { upload, .. } => {
                Some(upload)
            }
            _ => None,
        }
    }

    pub fn mapping(&self) -> Option<&ColumnMapping> {
        match &self.state {
            ImportState::Mapping { mapping, .. } | ImportState::Preview { mapping, .. } => {
                Some(mapping)
            }
            _ => None,
        }
    }

    fn invalid(&self, action: &'static str) -> ImportError {
        ImportError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Upload step with pasted text. On failure the session stays in Upload.
    pub fn load_text(&mut self, source_name: &str, text: &str) -> Result<&ParsedUpload> {
        if !matches!(self.state, ImportState::Upload) {
            return Err(self.invalid("upload"));
        }

        let upload = parse_upload(source_name, text, self.preview_rows)?;
        let mapping = detect_mapping(&upload.headers);
        tracing::info!(
            "Found {} contacts in {} ({} columns)",
            upload.data_rows,
            upload.source_name,
            upload.headers.len()
        );

        self.state = ImportState::Mapping { upload, mapping };
        self.upload().ok_or_else(|| self.invalid("upload"))
    }

    /// Upload step from a `.csv` file in storage.
    pub async fn load_file<S: Storage>(&mut self, storage: &S, path: &str) -> Result<&ParsedUpload> {
        if !matches!(self.state, ImportState::Upload) {
            return Err(self.invalid("upload"));
        }
        validate_file_extension(path, &["csv"])?;

        let bytes = storage.read_file(path).await?;
        let text = String::from_utf8_lossy(&bytes);
        self.load_text(path, &text)
    }

    /// Change one field's column while mapping.
    pub fn set_column(&mut self, field: ContactField, column: Option<usize>) -> Result<()> {
        match &mut self.state {
            ImportState::Mapping { upload, mapping } => {
                if let Some(index) = column {
                    if index >= upload.headers.len() {
                        return Err(ImportError::UnknownColumn {
                            field: field.to_string(),
                            column: index.to_string(),
                            available: upload.headers.len(),
                        });
                    }
                }
                mapping.set(field, column);
                tracing::debug!("Mapped {} to column {:?}", field, column);
                Ok(())
            }
            other => Err(ImportError::InvalidTransition {
                state: other.name(),
                action: "change mapping",
            }),
        }
    }

    /// Like [`set_column`](Self::set_column) but takes an index or header name.
    pub fn map_column(&mut self, field: ContactField, column: &str) -> Result<()> {
        let headers = match &self.state {
            ImportState::Mapping { upload, .. } => &upload.headers,
            _ => return Err(self.invalid("change mapping")),
        };
        let index = resolve_column(headers, field, column)?;
        self.set_column(field, Some(index))
    }

    /// Mapping -> Preview. Blocked until phone is mapped.
    pub fn proceed_to_preview(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, ImportState::Upload) {
            ImportState::Mapping { upload, mapping } if mapping.is_complete() => {
                self.state = ImportState::Preview { upload, mapping };
                tracing::debug!("Moved to preview step");
                Ok(())
            }
            ImportState::Mapping { upload, mapping } => {
                self.state = ImportState::Mapping { upload, mapping };
                Err(ImportError::PhoneColumnUnset)
            }
            other => {
                self.state = other;
                Err(self.invalid("preview"))
            }
        }
    }

    /// Preview -> Mapping, or Mapping -> Upload.
    pub fn back(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, ImportState::Upload) {
            ImportState::Preview { upload, mapping } => {
                self.state = ImportState::Mapping { upload, mapping };
            }
            ImportState::Mapping { .. } => {}
            other => {
                self.state = other;
                return Err(self.invalid("go back"));
            }
        }
        tracing::debug!("Went back to {} step", self.state.name());
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = ImportState::Upload;
    }

    /// Contacts that `submit` would send, with the skipped row count.
    pub fn pending_contacts(&self) -> Result<(Vec<ContactRecord>, usize)> {
        match &self.state {
            ImportState::Preview { upload, mapping } => Ok(build_contacts(upload, mapping)),
            _ => Err(self.invalid("build contacts")),
        }
    }

    /// Send every normalized contact in one request. Any failure leaves the
    /// session in Preview so the caller can retry.
    pub async fn submit(&mut self) -> Result<&ImportSummary> {
        let (contacts, skipped) = self.pending_contacts()?;
        if contacts.is_empty() {
            return Err(ImportError::NoValidContacts);
        }

        tracing::info!(
            "Submitting {} contacts ({} rows skipped)",
            contacts.len(),
            skipped
        );

        let result = match self.api.import_contacts(&contacts).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Import request failed: {}", e);
                return Err(e);
            }
        };

        let source_name = self
            .upload()
            .map(|u| u.source_name.clone())
            .unwrap_or_default();
        let summary = ImportSummary {
            source_name,
            submitted: contacts.len(),
            skipped,
            imported: result.imported,
            errors: result.errors,
        };

        tracing::info!("Successfully imported {} contacts", summary.imported);
        if summary.failed() > 0 {
            tracing::warn!("{} contacts failed to import", summary.failed());
        }

        self.state = ImportState::Done(summary);
        match &self.state {
            ImportState::Done(summary) => Ok(summary),
            _ => Err(self.invalid("submit")),
        }
    }
}
