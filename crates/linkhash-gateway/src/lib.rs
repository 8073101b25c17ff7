//! HTTP and gRPC transports for the linkhash shortener.
//!
//! Over HTTP, `POST /` with `{"url": "..."}` allocates a short key and
//! `GET /{key}` answers with a `302 Found` redirect to the stored URL. The
//! gRPC `UrlService` exposes the same two operations as `GenerateKey` and
//! `Redirect`.

pub mod app;
pub mod error;
pub mod grpc;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use grpc::UrlGrpcServer;
pub use state::AppState;
