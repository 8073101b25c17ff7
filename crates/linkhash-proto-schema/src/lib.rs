//! Generated protobuf types and tonic stubs for the linkhash gRPC surface.

pub mod v1 {
    tonic::include_proto!("linkhash.v1");
}
