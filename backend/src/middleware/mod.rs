//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns:
//! trace identifiers and request/error logging.

pub mod request_log;
pub mod trace;

pub use request_log::RequestLog;
pub use trace::Trace;
