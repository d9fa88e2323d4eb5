//! devjobs-client - REST client for the DevJobs backend
//!
//! ```text
//! page ──► JobBoardApi ──► ApiClient ──► reqwest ──► backend
//!                               │
//!                               └── classify: 2xx + JSON   → payload
//!                                             non-2xx/bad body → FetchError::Response
//!                                             no reply        → FetchError::NoResponse
//!                                             not sendable    → FetchError::RequestSetup
//! ```

pub mod client;

pub use client::{classify, ApiClient};
