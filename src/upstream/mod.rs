//! Upstream statistics endpoint subsystem.
//!
//! # Data Flow
//! ```text
//! RecordFilter / probe strategy
//!     → request.rs (OutboundRequest: placement, params, auth, timeout)
//!     → client.rs (reqwest call against the fixed endpoint)
//!     → payload.rs (Sequence | SingleObject | ApplicationError)
//!     → error.rs on failure (Http | Unreachable | LocalRequest)
//! ```
//!
//! # Design Decisions
//! - The endpoint URL and credential are injected, never global
//! - Every call carries its own timeout; expiry counts as "no response"
//! - No retries: a failure is classified once and returned

pub mod client;
pub mod error;
pub mod payload;
pub mod request;

pub use client::{UpstreamClient, UpstreamReply};
pub use error::{UpstreamError, UpstreamResult, UNREACHABLE_MESSAGE};
pub use payload::UpstreamPayload;
pub use request::{OutboundRequest, ParamSet, Placement, RecordFilter};
