// (c) 2024 Ross Younger
//! # Profile hardening
//!
//! Security rewrites applied to an OpenVPN profile document.
//!
//! The main entry point is [`harden_profile`], which pins the TLS control
//! channel to a modern parameter set chosen to match the strength of the
//! profile's own data-channel cipher. Provider-specific adjustments
//! (currently Private Internet Access, [`process_pia`]) run afterwards,
//! over the already-hardened profile.
//!
//! Every edit is bracketed by a begin/end comment pair, so a hardened
//! profile shows at a glance (or to grep) exactly what was changed.

mod pia;
pub use pia::process_pia;

mod settings;
pub use settings::{harden_profile, TlsVersion};

mod strength;
pub use strength::CipherStrength;

/// Opening line of the comment pair bracketing every edit we write.
pub(crate) const BEGIN_MARKER: &str = "# Begin Paranoid OpenVPN changes";
/// Closing line of the comment pair.
pub(crate) const END_MARKER: &str = "# End Paranoid OpenVPN changes";
