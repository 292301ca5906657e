//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, CORS, timeout)
//!     → request.rs (request ID generation, POST body extraction)
//!     → handlers.rs (health, probe, record fetch)
//!     → upstream client (outbound call, classification)
//!     → response.rs (envelope, error mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RecordsBody, RecordsQuery, X_REQUEST_ID};
pub use response::{Envelope, HealthResponse, ProbeReport};
pub use server::{AppState, HttpServer};
