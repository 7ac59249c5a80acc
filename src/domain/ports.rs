use crate::domain::model::{ContactRecord, ExportedContact, ImportResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn auth_token(&self) -> Option<&str>;
    fn preview_rows(&self) -> usize;
}

/// The backend's contact endpoints.
#[async_trait]
pub trait ContactApi: Send + Sync {
    async fn import_contacts(&self, contacts: &[ContactRecord]) -> Result<ImportResult>;
    async fn export_contacts(&self) -> Result<Vec<ExportedContact>>;
}
