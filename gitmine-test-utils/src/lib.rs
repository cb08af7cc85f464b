//! Test utilities shared across the gitmine workspace
//!
//! This crate provides common testing infrastructure including:
//! - HOME directory isolation ([`HomeEnvTestGuard`])
//! - Throwaway credential file locations ([`CredentialsGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod creds;
pub mod home;

// Re-export commonly used items
pub use creds::CredentialsGuard;
pub use home::HomeEnvTestGuard;
