//! OTP statistics relay library.
//!
//! Forwards browser requests to a fixed upstream statistics endpoint with an
//! injected credential and reshapes the answers into a uniform JSON envelope.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
