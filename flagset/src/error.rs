//! Error types for flag registration and parsing.

use thiserror::Error;

/// Errors produced while parsing a token stream or mutating flag metadata.
///
/// Parse errors carry the exact flag spelling the user typed so callers can
/// relay them verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// A long flag token named a flag that is not registered.
    #[error("unknown flag: --{0}")]
    UnknownFlag(String),

    /// A shorthand character inside a `-abc` cluster is not registered.
    #[error("unknown shorthand flag: {0:?} in -{1}")]
    UnknownShorthand(char, String),

    /// A value-expecting long flag was the last token on the line.
    #[error("flag needs an argument: --{0}")]
    NeedsArgument(String),

    /// A value-expecting shorthand was the last token on the line.
    #[error("flag needs an argument: {0:?} in -{1}")]
    ShorthandNeedsArgument(char, String),

    /// A token looked like a flag but cannot be one (`--=x`, `---x`).
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    /// An annotation or mark referenced a flag that is not registered.
    #[error("no such flag -{0}")]
    NoSuchFlag(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FlagError>;
