//! Error type for the profile document model
// (c) 2024 Ross Younger

use thiserror::Error;

/// Everything that can go wrong while parsing or editing a profile
#[derive(Debug, Error)]
pub enum ProfileError {
    /// An inline block's opening tag had no matching close tag before the
    /// input ran out
    #[error("inline block {0} was never closed")]
    UnterminatedBlock(String),

    /// A line matched no element grammar at all
    #[error("unrecognised line {line:?} at {origin} line {line_number}")]
    UnrecognizedLine {
        /// The offending line, verbatim
        line: String,
        /// Where the text came from (a path, or `<string>`).
        /// Not named `source`: thiserror reserves that name for a wrapped
        /// error implementing [`std::error::Error`].
        origin: String,
        /// 1-based position within the origin
        line_number: usize,
    },

    /// A named element was required but is not present
    #[error("{0} does not exist in this profile")]
    NotFound(String),

    /// Inserting this element would have duplicated a parameter or inline
    /// block name
    #[error("{0} is already present in this profile")]
    Duplicate(String),

    /// File read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
