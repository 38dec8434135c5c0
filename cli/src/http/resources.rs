//! Resource listing client

use openapi_client::Resource;

use crate::errors::{ClientError, ResultExt};
use crate::http::client::HttpClient;

impl HttpClient {
    /// List every resource across projects
    pub async fn list_resources(&self) -> Result<Vec<Resource>, ClientError> {
        self.get("/resources", &[]).await.context("list resources")
    }
}
