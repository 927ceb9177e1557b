//! Service-specific client implementations
//!
//! This module contains the client for the bug priority service.

pub mod bugs;
mod common;

pub use common::UserAgent;
