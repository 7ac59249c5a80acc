pub mod export;
pub mod importer;
pub mod mapper;
pub mod normalizer;
pub mod parser;

pub use crate::domain::model::{
    ColumnMapping, ContactField, ContactRecord, ExportedContact, ImportResult, ImportSummary,
    ParsedUpload, RawRow,
};
pub use crate::domain::ports::{ConfigProvider, ContactApi, Storage};
pub use crate::utils::error::Result;
