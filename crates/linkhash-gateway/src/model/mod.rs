mod url;

pub use url::{CreateUrlRequest, CreateUrlResponse, ALREADY_EXISTS_MESSAGE, CREATED_MESSAGE};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
