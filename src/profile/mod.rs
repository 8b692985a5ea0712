// (c) 2024 Ross Younger
//! # OpenVPN profile documents
//!
//! An OpenVPN client profile (`.ovpn`) is a line-oriented text file.
//! This module reads one into a structured document, lets you edit it by
//! name or by position, and writes it back out without disturbing anything
//! you didn't touch.
//!
//! ## File format
//!
//! A profile is a sequence of four kinds of element:
//! * blank lines;
//! * comments, introduced by `#` or `;`;
//! * parameters, a keyword optionally followed by a value
//!   (`remote vpn.example.com 1194`);
//! * inline blocks, an XML-like tag pair wrapping opaque payload lines
//!   (typically PEM material).
//!
//! ### Example
//!
//! ```text
//! client
//! dev tun
//! remote vpn.example.com 1194
//! # Security hardening below this line
//! cipher AES-256-GCM
//!
//! <ca>
//! -----BEGIN CERTIFICATE-----
//! ...
//! -----END CERTIFICATE-----
//! </ca>
//! ```
//!
//! ## Traps and tips
//! 1. Whitespace within a line is not significant to OpenVPN, so we trim it
//!    on read. Serialisation is canonical: one element per line (or per
//!    block), no indentation, `\n` endings. A parse/serialise round trip of
//!    an already-canonical file is byte-exact.
//! 1. OpenVPN treats repeated directives in ways that vary by directive.
//!    We take the conservative position: a parameter keyword or inline tag
//!    may appear at most once per document, and a file that breaks this
//!    rule fails to parse.
//! 1. Comments share the name space used for lookups (their name is their
//!    full text, marker included), which makes checking for a previously
//!    written marker line cheap.

mod document;
pub use document::Profile;

mod element;
pub use element::Element;

mod errors;
pub use errors::ProfileError;
