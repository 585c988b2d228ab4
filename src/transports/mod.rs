//! Transport implementations.
//!
//! Each transport implements the [`Transport`](crate::Transport) trait.
//!
//! ## Available Transports
//!
//! | Transport | Feature Flag | Description |
//! |-----------|-------------|-------------|
//! | [`HttpTransport`] | `http` | JSON over HTTP via reqwest |
//! | [`LocalTransport`] | (none) | Records calls in memory for dev/testing |
//! | [`LoggerTransport`] | (none) | Logs calls without sending |

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{HttpTransport, API_KEY_HEADER, API_SECRET_HEADER};

mod local;
pub use local::{LocalTransport, RecordedCall};

mod logger;
pub use logger::LoggerTransport;
