//! Mail delivery integration
//!
//! HTTP client for a transactional mail delivery API, implementing the
//! application layer's `MailPort`. Delivery is best-effort; the caller
//! decides how to treat failures.

pub mod client;

pub use client::{HttpMailClient, MailConfig};
