//! Caching client for the StudyHub student workspace API.
//!
//! The crate is organized as three layers:
//! - [`hub`]: the HTTP transport, typed per-domain accessors, and the
//!   [`hub::CachedHubClient`] that view code talks to
//! - [`cache`]: the domain-agnostic in-memory query cache and the persistent
//!   mirror store backing it
//! - [`session`]: observation of the backend-owned session (token decoding
//!   and routing decisions)
//!
//! The binary in `main.rs` is a thin CLI over [`hub::CachedHubClient`].

pub mod cache;
pub mod config;
pub mod hub;
pub mod session;
