pub mod backend;
pub mod config;
pub mod docs;
pub mod error;
pub mod generation;
pub mod server;
pub mod upstream;

pub use config::{AppConfig, EndpointMode};
pub use error::GatewayError;
pub use generation::{GenerationRequest, GenerationResult, Generator};
pub use server::build_router;
