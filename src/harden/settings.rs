//! TLS control-channel hardening
// (c) 2024 Ross Younger

use tracing::debug;

use super::strength::CipherStrength;
use super::{BEGIN_MARKER, END_MARKER};
use crate::profile::{Element, Profile, ProfileError};

/// Minimum TLS version to require of the control channel.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, strum::Display, strum::EnumString, clap::ValueEnum,
)]
pub enum TlsVersion {
    /// TLS 1.0; only for truly ancient servers
    #[strum(serialize = "1.0")]
    #[value(name = "1.0")]
    Tls10,
    /// TLS 1.1
    #[strum(serialize = "1.1")]
    #[value(name = "1.1")]
    Tls11,
    /// TLS 1.2
    #[strum(serialize = "1.2")]
    #[value(name = "1.2")]
    Tls12,
    /// TLS 1.3
    #[default]
    #[strum(serialize = "1.3")]
    #[value(name = "1.3")]
    Tls13,
}

// ECDHE-ECDSA suites only: the providers this tool is aimed at all use EC
// server certificates, and dropping RSA shrinks the negotiation surface.
const TLS_CIPHER_STRONG: &str = "TLS-ECDHE-ECDSA-WITH-AES-256-GCM-SHA384:TLS-ECDHE-ECDSA-WITH-CHACHA20-POLY1305-SHA256:TLS-ECDHE-ECDSA-WITH-AES-256-CBC-SHA384";
const TLS_GROUPS_STRONG: &str = "secp521r1:X448:secp384r1:secp256r1:X25519";
const TLS_CIPHERSUITES_STRONG: &str = "TLS_AES_256_GCM_SHA384:TLS_CHACHA20_POLY1305_SHA256";

const TLS_CIPHER_BASELINE: &str = "TLS-ECDHE-ECDSA-WITH-AES-128-GCM-SHA256:TLS-ECDHE-ECDSA-WITH-CHACHA20-POLY1305-SHA256:TLS-ECDHE-ECDSA-WITH-AES-128-CBC-SHA256";
const TLS_GROUPS_BASELINE: &str = "secp256r1:X25519";
const TLS_CIPHERSUITES_BASELINE: &str = "TLS_AES_128_GCM_SHA256:TLS_CHACHA20_POLY1305_SHA256";

/// The parameters to write, in the order they appear in the output.
fn security_settings(strength: CipherStrength, min_tls: TlsVersion) -> [(&'static str, String); 4] {
    let (tls_cipher, tls_groups, tls_ciphersuites) = if strength >= CipherStrength::Medium {
        (TLS_CIPHER_STRONG, TLS_GROUPS_STRONG, TLS_CIPHERSUITES_STRONG)
    } else {
        (
            TLS_CIPHER_BASELINE,
            TLS_GROUPS_BASELINE,
            TLS_CIPHERSUITES_BASELINE,
        )
    };
    [
        ("tls-cipher", tls_cipher.to_string()),
        ("tls-groups", tls_groups.to_string()),
        ("tls-ciphersuites", tls_ciphersuites.to_string()),
        ("tls-version-min", format!("{min_tls} or-highest")),
    ]
}

/// Pins a profile's TLS control channel to a hardened parameter set.
///
/// The parameter set is matched to the strength of the profile's own
/// data-channel cipher; there is no point demanding AES-256 key exchange
/// of a connection that will protect the payload with Blowfish. Profiles
/// at [`Medium`](CipherStrength::Medium) or better get the strong set,
/// everything else a 128-bit baseline set.
///
/// The new parameters land at the end of the directive section, before any
/// inline blocks, bracketed by marker comments. Any existing parameters
/// with the same names are removed, wherever they were.
///
/// Returns the strength of the profile as it stood before this call.
pub fn harden_profile(
    profile: &mut Profile,
    min_tls: TlsVersion,
) -> Result<CipherStrength, ProfileError> {
    let strength = CipherStrength::of_profile(profile);
    debug!("cipher strength {strength}; requiring TLS {min_tls} or higher");

    profile.insert(profile.last_before_inline(), Element::Blank)?;
    profile.insert(profile.last_before_inline(), Element::comment(BEGIN_MARKER))?;
    for (keyword, value) in security_settings(strength, min_tls) {
        let _ = profile.remove(keyword);
        profile.insert(
            profile.last_before_inline(),
            Element::param(keyword, Some(&value)),
        )?;
    }
    profile.insert(profile.last_before_inline(), Element::comment(END_MARKER))?;
    profile.insert(profile.last_before_inline(), Element::Blank)?;
    Ok(strength)
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::{harden_profile, TlsVersion};
    use crate::harden::CipherStrength;
    use crate::profile::Profile;

    #[test]
    fn strong_profile_layout_is_exact() {
        let mut profile = Profile::parse(
            "client
cipher AES-256-GCM
<ca>
AAA
</ca>
",
            "<string>",
        )
        .unwrap();
        let strength = harden_profile(&mut profile, TlsVersion::Tls13).unwrap();
        assert_eq!(strength, CipherStrength::Strong);
        assert_eq!(
            profile.to_string(),
            "client
cipher AES-256-GCM

# Begin Paranoid OpenVPN changes
tls-cipher TLS-ECDHE-ECDSA-WITH-AES-256-GCM-SHA384:TLS-ECDHE-ECDSA-WITH-CHACHA20-POLY1305-SHA256:TLS-ECDHE-ECDSA-WITH-AES-256-CBC-SHA384
tls-groups secp521r1:X448:secp384r1:secp256r1:X25519
tls-ciphersuites TLS_AES_256_GCM_SHA384:TLS_CHACHA20_POLY1305_SHA256
tls-version-min 1.3 or-highest
# End Paranoid OpenVPN changes

<ca>
AAA
</ca>
"
        );
    }

    #[test]
    fn weak_profile_gets_the_baseline_set() {
        let mut profile = Profile::parse("cipher BF-CBC\n", "<string>").unwrap();
        let strength = harden_profile(&mut profile, TlsVersion::Tls12).unwrap();
        assert_eq!(strength, CipherStrength::Weak);
        let text = profile.to_string();
        assert!(text.contains("tls-groups secp256r1:X25519\n"));
        assert!(text.contains("tls-ciphersuites TLS_AES_128_GCM_SHA256:TLS_CHACHA20_POLY1305_SHA256\n"));
        assert!(text.contains("tls-version-min 1.2 or-highest\n"));
    }

    #[test]
    fn medium_counts_as_strong() {
        let mut profile = Profile::parse("cipher AES-192-CBC\n", "<string>").unwrap();
        let strength = harden_profile(&mut profile, TlsVersion::Tls13).unwrap();
        assert_eq!(strength, CipherStrength::Medium);
        assert!(profile
            .to_string()
            .contains("tls-groups secp521r1:X448:secp384r1:secp256r1:X25519\n"));
    }

    #[test]
    fn block_appends_when_there_are_no_inlines() {
        let mut profile = Profile::parse("client\n", "<string>").unwrap();
        let _ = harden_profile(&mut profile, TlsVersion::Tls13).unwrap();
        assert_eq!(
            profile.to_string(),
            "client

# Begin Paranoid OpenVPN changes
tls-cipher TLS-ECDHE-ECDSA-WITH-AES-128-GCM-SHA256:TLS-ECDHE-ECDSA-WITH-CHACHA20-POLY1305-SHA256:TLS-ECDHE-ECDSA-WITH-AES-128-CBC-SHA256
tls-groups secp256r1:X25519
tls-ciphersuites TLS_AES_128_GCM_SHA256:TLS_CHACHA20_POLY1305_SHA256
tls-version-min 1.3 or-highest
# End Paranoid OpenVPN changes

"
        );
    }

    #[test]
    fn hardening_twice_is_stable_apart_from_markers() {
        let mut profile = Profile::parse("cipher BF-CBC\n", "<string>").unwrap();
        let _ = harden_profile(&mut profile, TlsVersion::Tls13).unwrap();
        let _ = harden_profile(&mut profile, TlsVersion::Tls13).unwrap();
        let text = profile.to_string();
        // delete-before-insert: one copy of each parameter, same values
        for keyword in ["tls-cipher ", "tls-groups ", "tls-ciphersuites ", "tls-version-min "] {
            assert_eq!(text.matches(keyword).count(), 1, "{keyword} duplicated");
        }
        assert!(text.contains("tls-version-min 1.3 or-highest\n"));
        // the marker comments accumulate, one pair per run
        assert_eq!(text.matches("# Begin Paranoid OpenVPN changes\n").count(), 2);
        assert_eq!(text.matches("# End Paranoid OpenVPN changes\n").count(), 2);
    }

    #[test]
    fn existing_tls_parameters_are_superseded() {
        let mut profile = Profile::parse(
            "tls-version-min 1.0
client
cipher AES-256-GCM
",
            "<string>",
        )
        .unwrap();
        let _ = harden_profile(&mut profile, TlsVersion::Tls13).unwrap();
        let text = profile.to_string();
        assert_eq!(text.matches("tls-version-min").count(), 1);
        assert!(text.contains("tls-version-min 1.3 or-highest\n"));
        // the old copy is gone from the top
        assert!(text.starts_with("client\n"));
    }

    #[test]
    fn tls_version_round_trips_as_text() {
        assert_eq!(TlsVersion::Tls13.to_string(), "1.3");
        assert_eq!("1.1".parse::<TlsVersion>().unwrap(), TlsVersion::Tls11);
        assert_eq!(TlsVersion::default(), TlsVersion::Tls13);
        assert!("1.4".parse::<TlsVersion>().is_err());
    }
}
