mod error;
mod server;

pub use error::GrpcError;
pub use server::UrlGrpcServer;
