//! Backend access for Atlas.
//!
//! Provides:
//! - [`Backend`]: the read and create operations the daily views depend on
//! - [`Client`]: the HTTP implementation against the Atlas REST API
//! - [`carry_over`]: the concurrent task carry-over workflow

mod backend;
pub mod carry_over;
mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use thiserror::Error;

pub use backend::Backend;
pub use carry_over::{BatchOutcome, CarryOverError, CarryOverOutcome, FailedCreation};
pub use client::Client;

/// Backend access errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is unusable.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// A spawned request task panicked or was cancelled.
    #[error("request task failed: {0}")]
    Task(String),
}
