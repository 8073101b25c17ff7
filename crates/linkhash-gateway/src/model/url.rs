use linkhash_core::AllocationOutcome;
use serde::{Deserialize, Serialize};

pub const CREATED_MESSAGE: &str = "Data received successfully";
pub const ALREADY_EXISTS_MESSAGE: &str = "Data already received";

/// Body of `POST /`. A missing `url` field reads as the empty string and is
/// rejected by the allocator.
#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub key: String,
    pub short_url: String,
    pub original_url: String,
    pub outcome: AllocationOutcome,
    pub message: &'static str,
}
