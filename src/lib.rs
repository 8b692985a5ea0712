//! Paranoid OpenVPN: hardens OpenVPN client profiles
// (c) 2024 Ross Younger
//!
//! Commercial VPN providers ship `.ovpn` profiles with regrettably lax TLS
//! settings. This crate parses those profiles, pins the TLS control channel
//! to modern parameters, applies provider-specific fixes where asked, and
//! writes the result back out with everything else untouched.

/// Batch processing of profiles and profile trees
pub mod batch;
mod cli;
pub use cli::cli;
/// Security rewrites
pub mod harden;
/// The profile document model
pub mod profile;
/// Source resolution (local paths, URLs, zip archives)
pub mod source;
/// Utilities
pub mod util;
