use linkhash_core::ShortenerError;
use thiserror::Error;
use tonic::{Code, Status};
use tracing::error;

/// gRPC-facing wrapper around [`ShortenerError`].
#[derive(Debug, Error)]
#[error(transparent)]
pub struct GrpcError(#[from] ShortenerError);

impl From<GrpcError> for Status {
    fn from(error: GrpcError) -> Self {
        match error.0 {
            ShortenerError::InvalidArgument(message) => Status::new(Code::InvalidArgument, message),
            ShortenerError::NotFound(key) => {
                Status::new(Code::NotFound, format!("short key not found: {key}"))
            }
            exhausted @ ShortenerError::Exhausted { .. } => {
                Status::new(Code::ResourceExhausted, exhausted.to_string())
            }
            ShortenerError::Storage(source) => {
                error!(error = %source, "storage failure while serving rpc");
                Status::new(Code::Internal, "storage operation failed")
            }
        }
    }
}
