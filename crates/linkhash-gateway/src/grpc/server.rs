use std::sync::Arc;

use linkhash_core::{AllocationOutcome, Shortener};
use linkhash_proto_schema::v1::url_service_server::{UrlService, UrlServiceServer};
use linkhash_proto_schema::v1::{
    GenerateKeyRequest, GenerateKeyResponse, RedirectRequest, RedirectResponse,
};
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use crate::grpc::GrpcError;
use crate::model::{ALREADY_EXISTS_MESSAGE, CREATED_MESSAGE};

/// `UrlService` over any [`Shortener`].
///
/// `GenerateKey` answers with the bare key in `short_url`.
#[derive(Clone)]
pub struct UrlGrpcServer {
    shortener: Arc<dyn Shortener>,
}

impl UrlGrpcServer {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self { shortener }
    }

    pub fn into_service(self) -> UrlServiceServer<Self> {
        UrlServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl UrlService for UrlGrpcServer {
    async fn generate_key(
        &self,
        request: Request<GenerateKeyRequest>,
    ) -> Result<Response<GenerateKeyResponse>, Status> {
        let url = request.into_inner().url;
        let allocation = self
            .shortener
            .allocate(&url)
            .await
            .map_err(GrpcError::from)?;

        let message = match allocation.outcome {
            AllocationOutcome::Created => {
                info!(key = %allocation.key, url = %url, "short key created");
                CREATED_MESSAGE
            }
            AllocationOutcome::AlreadyExists => ALREADY_EXISTS_MESSAGE,
        };

        Ok(Response::new(GenerateKeyResponse {
            message: message.to_string(),
            short_url: allocation.key.to_string(),
        }))
    }

    async fn redirect(
        &self,
        request: Request<RedirectRequest>,
    ) -> Result<Response<RedirectResponse>, Status> {
        let key = request.into_inner().key;
        let url = self
            .shortener
            .resolve(&key)
            .await
            .map_err(GrpcError::from)?;

        debug!(key = %key, url = %url, "resolved over rpc");
        Ok(Response::new(RedirectResponse { url }))
    }
}
