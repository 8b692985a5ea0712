//! Line-group parsing internals
// (c) 2024 Ross Younger

use std::borrow::Cow;
use std::fmt;

use super::ProfileError;

/// One parsed element of an OpenVPN profile.
///
/// An element covers one or more whole lines of the source text. Variants
/// are listed in recognition order; `Param` is the catch-all for any
/// non-blank line without comment or tag syntax, so it must be tried last.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Element {
    /// A blank (or whitespace-only) line
    Blank,
    /// A whole-line comment introduced by `#` or `;`, stored with its marker
    Comment(String),
    /// A multi-line `<tag>`..`</tag>` block carrying certificate or key
    /// material
    Inline {
        /// The bracketed tag, e.g. `<ca>`
        tag: String,
        /// Body lines between the opening and closing tags
        body: Vec<String>,
    },
    /// A `keyword [value]` directive
    Param {
        /// The directive keyword
        keyword: String,
        /// Optional argument text following the keyword
        value: Option<String>,
    },
}

/// Outcome of a single parse attempt: the element and the number of input
/// lines it consumed, or `None` if the input does not start with the variant
/// being tried.
pub(crate) type ReadResult = Result<Option<(Element, usize)>, ProfileError>;

impl Element {
    /// Element readers, in recognition order.
    ///
    /// The order matters: a comment line would also parse as a parameter,
    /// so the catch-all comes last.
    pub(crate) const READERS: [fn(&[&str]) -> ReadResult; 4] = [
        Self::read_blank,
        Self::read_comment,
        Self::read_inline,
        Self::read_param,
    ];

    fn read_blank(lines: &[&str]) -> ReadResult {
        match lines.first() {
            Some(line) if line.trim().is_empty() => Ok(Some((Self::Blank, 1))),
            _ => Ok(None),
        }
    }

    fn read_comment(lines: &[&str]) -> ReadResult {
        match lines.first().map(|line| line.trim()) {
            Some(text) if text.starts_with(['#', ';']) => {
                Ok(Some((Self::Comment(text.to_string()), 1)))
            }
            _ => Ok(None),
        }
    }

    fn read_inline(lines: &[&str]) -> ReadResult {
        let Some(line) = lines.first() else {
            return Ok(None);
        };
        let Some(tag) = open_tag(line.trim()) else {
            return Ok(None);
        };
        let closer = format!("</{tag}>");
        let mut body = Vec::new();
        for line in &lines[1..] {
            if line.trim() == closer {
                let consumed = body.len() + 2;
                return Ok(Some((
                    Self::Inline {
                        tag: format!("<{tag}>"),
                        body,
                    },
                    consumed,
                )));
            }
            body.push(line.trim().to_string());
        }
        Err(ProfileError::UnterminatedBlock(format!("<{tag}>")))
    }

    fn read_param(lines: &[&str]) -> ReadResult {
        let Some(line) = lines.first() else {
            return Ok(None);
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        // Split on the first whitespace run; the keyword never contains
        // whitespace, the value may.
        let (keyword, value) = match trimmed.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, Some(rest.trim_start())),
            None => (trimmed, None),
        };
        Ok(Some((Self::param(keyword, value), 1)))
    }

    /// Creates a parameter, trimming surrounding whitespace from both parts.
    #[must_use]
    pub fn param(keyword: &str, value: Option<&str>) -> Self {
        Self::Param {
            keyword: keyword.trim().to_string(),
            value: value.map(|v| v.trim().to_string()),
        }
    }

    /// Creates a whole-line comment. The text must already carry its leading
    /// `#` or `;`.
    #[must_use]
    pub fn comment(text: &str) -> Self {
        Self::Comment(text.trim().to_string())
    }

    /// The lookup name of this element, if it has one.
    ///
    /// Comments are named by their full text, parameters by their keyword,
    /// inline blocks by their bracketed tag. Blank lines have no name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Blank => None,
            Self::Comment(text) => Some(text),
            Self::Inline { tag, .. } => Some(tag),
            Self::Param { keyword, .. } => Some(keyword),
        }
    }

    /// The value of this element, if it has one.
    ///
    /// An inline block's value is its body joined by newlines; a valueless
    /// parameter has none.
    #[must_use]
    pub fn value(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Param { value, .. } => value.as_deref().map(Cow::Borrowed),
            Self::Inline { body, .. } => Some(Cow::Owned(body.join("\n"))),
            Self::Blank | Self::Comment(_) => None,
        }
    }

    /// How many lines this element occupies when serialized.
    ///
    /// Parsing consumes a variable number of lines per element, so this is
    /// what converts an element index into a source line number.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Inline { body, .. } => body.len() + 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Element {
    /// Renders the element exactly as it appears on disk, including its
    /// terminating newline, so a document serializes by plain concatenation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("\n"),
            Self::Comment(text) => writeln!(f, "{text}"),
            Self::Inline { tag, body } => {
                writeln!(f, "{tag}")?;
                for line in body {
                    writeln!(f, "{line}")?;
                }
                writeln!(f, "</{}>", tag.trim_matches(['<', '>']))
            }
            Self::Param {
                keyword,
                value: Some(value),
            } => writeln!(f, "{keyword} {value}"),
            Self::Param {
                keyword,
                value: None,
            } => writeln!(f, "{keyword}"),
        }
    }
}

/// Extracts the tag name from an opening inline tag line, if it is one.
///
/// The whole (trimmed) line must be `<name>` where `name` is one or more of
/// lowercase alphanumerics, hyphen or underscore.
fn open_tag(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('<')?.strip_suffix('>')?;
    let valid = !inner.is_empty()
        && inner
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    valid.then_some(inner)
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context, Result};
    use assertables::{assert_contains, assert_eq_as_result};

    use super::{open_tag, Element};

    /// The inline tags OpenVPN itself uses; the grammar accepts any
    /// well-formed tag, these are the ones worth exercising.
    const INLINE_TAGS: [&str; 11] = [
        "crl-verify",
        "cert",
        "ca",
        "key",
        "tls-auth",
        "dh",
        "extra-certs",
        "pkcs12",
        "secret",
        "tls-crypt",
        "http-proxy-user-pass",
    ];

    /// Runs the reader chain against `lines` and returns the first hit.
    fn read_first(lines: &[&str]) -> (Element, usize) {
        for reader in Element::READERS {
            if let Some(hit) = reader(lines).unwrap() {
                return hit;
            }
        }
        panic!("no reader matched {lines:?}");
    }

    #[test]
    fn single_line_recognition() -> Result<()> {
        for (input, expected) in [
            ("", Element::Blank),
            ("   \t ", Element::Blank),
            ("# a comment", Element::comment("# a comment")),
            ("; other comment style", Element::comment("; other comment style")),
            ("  # indented", Element::comment("# indented")),
            ("client", Element::param("client", None)),
            ("dev tun", Element::param("dev", Some("tun"))),
            ("remote server 1194", Element::param("remote", Some("server 1194"))),
            ("resolv-retry\tinfinite", Element::param("resolv-retry", Some("infinite"))),
            ("verb  \t 3", Element::param("verb", Some("3"))),
            ("  nobind  ", Element::param("nobind", None)),
            // Tag-like lines that do not parse as inline blocks fall through
            // to the parameter catch-all.
            ("<CA>", Element::param("<CA>", None)),
            ("<ca> trailing", Element::param("<ca>", Some("trailing"))),
        ] {
            let msg = || format!("input \"{input}\" failed");
            let (element, consumed) = read_first(&[input]);
            assert_eq_as_result!(element, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
            assert_eq!(consumed, 1);
        }
        Ok(())
    }

    #[test]
    fn known_inline_tags() {
        for tag in INLINE_TAGS {
            let open = format!("<{tag}>");
            let close = format!("</{tag}>");
            let lines = [open.as_str(), "AAAA", "BBBB", close.as_str()];
            let (element, consumed) = read_first(&lines);
            assert_eq!(consumed, 4, "tag {tag}");
            assert_eq!(
                element,
                Element::Inline {
                    tag: open.clone(),
                    body: vec!["AAAA".into(), "BBBB".into()],
                }
            );
            assert_eq!(element.name(), Some(open.as_str()));
            assert_eq!(element.line_count(), 4);
        }
    }

    #[test]
    fn inline_body_is_trimmed_and_closer_may_be_indented() {
        let lines = ["<ca>", "  AAAA  ", "   </ca>"];
        let (element, consumed) = read_first(&lines);
        assert_eq!(consumed, 3);
        assert_eq!(
            element,
            Element::Inline {
                tag: "<ca>".into(),
                body: vec!["AAAA".into()],
            }
        );
    }

    #[test]
    fn unterminated_inline_block() {
        let err = Element::read_inline(&["<ca>", "AAAA"]).unwrap_err();
        assert_contains!(err.to_string(), "never closed");
        assert_contains!(err.to_string(), "<ca>");
    }

    #[test]
    fn open_tag_grammar() {
        for (input, expected) in [
            ("<ca>", Some("ca")),
            ("<tls-auth>", Some("tls-auth")),
            ("<a>", Some("a")),
            ("<x_1>", Some("x_1")),
            ("<>", None),
            ("<CA>", None),
            ("<ca", None),
            ("ca>", None),
            ("<ca> x", None),
            ("remote", None),
        ] {
            assert_eq!(open_tag(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn names_and_values() {
        let param = Element::param("remote", Some("server 1194"));
        assert_eq!(param.name(), Some("remote"));
        assert_eq!(param.value().as_deref(), Some("server 1194"));

        let bare = Element::param("nobind", None);
        assert_eq!(bare.value(), None);

        let comment = Element::comment("# hello");
        assert_eq!(comment.name(), Some("# hello"));
        assert_eq!(comment.value(), None);

        assert_eq!(Element::Blank.name(), None);

        let inline = Element::Inline {
            tag: "<ca>".into(),
            body: vec!["AAAA".into(), "BBBB".into()],
        };
        assert_eq!(inline.value().as_deref(), Some("AAAA\nBBBB"));
    }

    #[test]
    fn rendering_inverts_reading() {
        for input in [
            "\n",
            "# comment\n",
            "client\n",
            "remote server 1194\n",
            "<ca>\nAAAA\n</ca>\n",
        ] {
            let lines: Vec<&str> = input.lines().collect();
            let (element, consumed) = read_first(&lines);
            assert_eq!(consumed, lines.len());
            assert_eq!(element.to_string(), input);
        }
    }

    #[test]
    fn line_counts() {
        assert_eq!(Element::Blank.line_count(), 1);
        assert_eq!(Element::comment("# x").line_count(), 1);
        assert_eq!(Element::param("dev", Some("tun")).line_count(), 1);
        let inline = Element::Inline {
            tag: "<key>".into(),
            body: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(inline.line_count(), 5);
    }
}
