//! Cipher strength heuristics
// (c) 2024 Ross Younger

use crate::profile::{Element, Profile};

/// Relative strength of a profile's data-channel cipher.
///
/// The ordering is meaningful: `Weak < Acceptable < Medium < Strong`.
#[derive(Copy, Clone, Debug, Eq, Ord, PartialEq, PartialOrd, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum CipherStrength {
    /// No cipher, a valueless cipher, or nothing we recognise
    Weak,
    /// 128-bit ciphers, plus SEED and SM4
    Acceptable,
    /// 192-bit ciphers
    Medium,
    /// 256-bit ciphers and `ChaCha20-Poly1305`
    Strong,
}

impl CipherStrength {
    /// Classifies the `cipher` parameter of a profile.
    ///
    /// A profile with no `cipher` parameter, or one without a value, is
    /// [`Weak`](CipherStrength::Weak).
    #[must_use]
    pub fn of_profile(profile: &Profile) -> Self {
        profile
            .get("cipher")
            .and_then(Element::value)
            .map_or(Self::Weak, |cipher| Self::of_cipher(&cipher))
    }

    /// Classifies a single cipher name.
    ///
    /// This is a dumb heuristic keyed off the common key sizes appearing in
    /// OpenSSL cipher names. It would misjudge an algorithm that doesn't
    /// put its key size in its name, which is why the named exceptions
    /// (`ChaCha20`, SEED, SM4) exist. Matching is case-insensitive and the
    /// first match wins.
    #[must_use]
    pub fn of_cipher(name: &str) -> Self {
        let name = name.to_ascii_uppercase();
        if name.contains("256") || name.contains("CHACHA20-POLY1305") {
            Self::Strong
        } else if name.contains("192") {
            Self::Medium
        } else if name.contains("128") || name.contains("SEED-") || name.contains("SM4-") {
            Self::Acceptable
        } else {
            Self::Weak
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context as _, Result};
    use assertables::assert_eq_as_result;

    use super::CipherStrength::{self, Acceptable, Medium, Strong, Weak};
    use crate::profile::Profile;

    #[test]
    fn classification() -> Result<()> {
        for (cipher, expected) in [
            ("AES-256-GCM", Strong),
            ("aes-256-gcm", Strong),
            ("CAMELLIA-256-CBC", Strong),
            ("CHACHA20-POLY1305", Strong),
            ("chacha20-poly1305", Strong),
            ("AES-192-CBC", Medium),
            ("ARIA-192-GCM", Medium),
            ("AES-128-GCM", Acceptable),
            ("SEED-CBC", Acceptable),
            ("sm4-cbc", Acceptable),
            ("BF-CBC", Weak),
            ("DES-EDE3-CBC", Weak),
            ("none", Weak),
        ] {
            assert_eq_as_result!(CipherStrength::of_cipher(cipher), expected)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("cipher {cipher} misclassified"))?;
        }
        Ok(())
    }

    #[test]
    fn profile_without_cipher_is_weak() {
        let profile = Profile::parse("client\ndev tun\n", "<string>").unwrap();
        assert_eq!(CipherStrength::of_profile(&profile), Weak);
    }

    #[test]
    fn valueless_cipher_is_weak() {
        let profile = Profile::parse("cipher\n", "<string>").unwrap();
        assert_eq!(CipherStrength::of_profile(&profile), Weak);
    }

    #[test]
    fn cipher_value_is_classified() {
        let profile = Profile::parse("cipher AES-192-CBC\n", "<string>").unwrap();
        assert_eq!(CipherStrength::of_profile(&profile), Medium);
    }

    #[test]
    fn ordering_and_display() {
        assert!(Weak < Acceptable);
        assert!(Acceptable < Medium);
        assert!(Medium < Strong);
        assert_eq!(Strong.to_string(), "STRONG");
        assert_eq!(Weak.to_string(), "WEAK");
    }
}
