//! API: typed client for the custom chat backend.
//!
//! DESIGN
//! ======
//! One explicitly constructed [`ApiClient`] per process, injected into the
//! repositories. All request and response shapes live in [`types`].

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::ApiError;
