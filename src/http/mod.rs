//! HTTP client module with redirect handling and error classification.

mod client;

pub use client::{HttpClient, MAX_REDIRECTS};
