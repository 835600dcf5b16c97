use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes requests for static dataset files. Abstracted so callers can
/// wrap or replace the transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
