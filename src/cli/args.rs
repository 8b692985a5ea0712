// Top-level command-line arguments
// (c) 2024 Ross Younger

use std::path::PathBuf;

use clap::Parser;

use crate::harden::TlsVersion;

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version(env!("PARANOID_OPENVPN_VERSION_STRING")),
    about,
    before_help = "e.g.   paranoid-openvpn https://example.com/profiles.zip hardened/",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
pub(crate) struct CliArgs {
    // HARDENING OPTIONS ===================================================================
    /// Minimum TLS version to require
    ///
    /// This is written into every hardened profile as `tls-version-min`.
    #[arg(
        long,
        value_name("VERSION"),
        default_value("1.3"),
        help_heading("Hardening")
    )]
    pub min_tls: TlsVersion,

    /// Applies Private Internet Access fixes and hardening
    #[arg(long, action, help_heading("Hardening"))]
    pub pia: bool,

    // OUTPUT OPTIONS ======================================================================
    /// Quiet mode
    ///
    /// Switches off progress display; reports only errors
    #[arg(short, long, action, conflicts_with("debug"))]
    pub quiet: bool,

    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=paranoid_openvpn=debug` in the
    /// environment. If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"))]
    pub debug: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(short('l'), long, action, help_heading("Debug"), value_name("FILE"))]
    pub log_file: Option<String>,

    // POSITIONAL ARGUMENTS ================================================================
    /// The profiles to harden. This may be a local `.ovpn` file, a directory
    /// of them, a zip archive, or an HTTP(S) URL to a profile or archive.
    #[arg(required = true, value_name = "SOURCE")]
    pub source: String,

    /// Where to write the output: a file if SOURCE was a single profile,
    /// otherwise a directory.
    #[arg(required = true, value_name = "DESTINATION")]
    pub dest: PathBuf,
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::CliArgs;
    use crate::harden::TlsVersion;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        let mut argv = vec!["paranoid-openvpn"];
        argv.extend_from_slice(args);
        CliArgs::try_parse_from(argv)
    }

    #[test]
    fn defaults() {
        let args = parse(&["profiles/", "out/"]).unwrap();
        assert_eq!(args.min_tls, TlsVersion::Tls13);
        assert!(!args.pia);
        assert!(!args.quiet);
        assert!(!args.debug);
        assert_eq!(args.source, "profiles/");
    }

    #[test]
    fn min_tls_accepts_dotted_versions() {
        let args = parse(&["--min-tls", "1.1", "in.ovpn", "out.ovpn"]).unwrap();
        assert_eq!(args.min_tls, TlsVersion::Tls11);
        assert!(parse(&["--min-tls", "1.4", "in.ovpn", "out.ovpn"]).is_err());
    }

    #[test]
    fn source_and_dest_are_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["only-one"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_debug() {
        assert!(parse(&["-q", "-d", "in.ovpn", "out.ovpn"]).is_err());
    }
}
