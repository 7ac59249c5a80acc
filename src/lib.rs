pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command, ImportArgs};

pub use crate::adapters::{http::HttpContactApi, storage::LocalStorage};
pub use crate::config::ClientSettings;
pub use crate::core::importer::{ImportSession, ImportState};
pub use crate::domain::model::{
    ColumnMapping, ContactField, ContactRecord, ImportResult, ImportSummary,
};
pub use crate::utils::error::{ImportError, Result};
