//! # brigterm-api - Remote API Capability
//!
//! The dashboard consumes the job-execution service through the
//! [`ApiClient`] trait only. This crate provides:
//!
//! - [`ApiClient`] - list/get projects and events, stream logs
//! - [`HttpApiClient`] - Brigade v2 REST implementation on reqwest
//! - [`LogStream`] - the two independently-closing sources of a log stream
//! - `MockApiClient` - scripted in-memory client (feature `test-helpers`)
//!
//! Depends on [`brigterm_core`] for domain types and error handling.

pub mod client;
pub mod http;
pub mod stream;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Public API re-exports
pub use client::{ApiClient, LocalApiClient};
pub use http::{ClientConfig, HttpApiClient};
pub use stream::{LogStream, LOG_CHANNEL_CAPACITY};
