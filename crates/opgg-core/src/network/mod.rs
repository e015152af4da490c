//! HTTP plumbing for the OP.GG API.
//!
//! This module provides:
//! - A shared HTTP client with timeouts and a rotating `User-Agent`
//! - The response classifier that maps status/body pairs to data or typed errors
//! - Endpoint URL construction

mod classifier;
mod client;
mod endpoints;

pub use classifier::{classify, parse_retry_after, ClassifyOptions};
pub use client::{HttpClient, RawResponse};
pub use endpoints::{Endpoints, MetadataKind};
