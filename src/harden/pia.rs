//! Private Internet Access provider tweaks
// (c) 2024 Ross Younger

use tracing::debug;

use super::strength::CipherStrength;
use super::{BEGIN_MARKER, END_MARKER};
use crate::profile::{Element, Profile, ProfileError};

const PIA_CIPHER_STRONG: &str = "AES-256-GCM";
const PIA_DATA_CIPHERS_STRONG: &str = "AES-256-GCM:CHACHA20-POLY1305:AES-256-CBC";
const PIA_CIPHER_BASELINE: &str = "AES-128-GCM";
const PIA_DATA_CIPHERS_BASELINE: &str = "AES-128-GCM:CHACHA20-POLY1305:AES-128-CBC";

/// Forces AES-GCM data channels the way Private Internet Access servers
/// expect, and disables cipher negotiation so they stick.
///
/// Runs over an already-hardened profile. The replacement bundle lands at
/// the position the profile's `cipher` parameter previously occupied; a
/// profile with no `cipher` parameter at all fails with
/// [`ProfileError::NotFound`] rather than being silently skipped.
pub fn process_pia(profile: &mut Profile) -> Result<(), ProfileError> {
    let strength = CipherStrength::of_profile(profile);
    let (cipher, data_ciphers) = if strength == CipherStrength::Strong {
        (PIA_CIPHER_STRONG, PIA_DATA_CIPHERS_STRONG)
    } else {
        (PIA_CIPHER_BASELINE, PIA_DATA_CIPHERS_BASELINE)
    };
    debug!("PIA tweaks at {strength} strength: forcing {cipher}");

    let anchor = profile
        .position("cipher", ..)
        .ok_or_else(|| ProfileError::NotFound("cipher".to_string()))?;
    for keyword in ["cipher", "ncp-disable", "data-ciphers"] {
        let _ = profile.remove(keyword);
    }

    // removals before the anchor shift it; clamp so the inserts stay in range
    let mut at = anchor.min(profile.len());
    for element in [
        Element::comment(BEGIN_MARKER),
        Element::param("cipher", Some(cipher)),
        Element::param("data-ciphers", Some(data_ciphers)),
        Element::param("ncp-disable", None),
        Element::comment(END_MARKER),
    ] {
        profile.insert(at, element)?;
        at += 1;
    }
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////////////
