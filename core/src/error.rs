//! Error types for resolution, validation and execution.
//!
//! User-input problems are values of [`CommandError`]; they are printed by
//! the execution driver (unless silenced) and never abort the process.
//! Wiring defects (dangling group members, duplicate completion hooks,
//! self-parenting) panic at configuration time instead.

use arbor_flagset::FlagError;
use thiserror::Error;

/// Errors surfaced to the embedding program.
///
/// The help variant is a sentinel, not a failure: the driver intercepts it,
/// renders help and reports success.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A leftover token at the root did not match any subcommand.
    #[error("unknown command {name:?} for {path:?}{}", format_suggestions(suggestions))]
    UnknownCommand {
        name: String,
        path: String,
        suggestions: Vec<String>,
    },

    /// A positional argument failed the only-valid-args check.
    #[error("invalid argument {arg:?} for {path:?}{}", format_suggestions(suggestions))]
    InvalidArgument {
        arg: String,
        path: String,
        suggestions: Vec<String>,
    },

    /// Too few positional arguments.
    #[error("requires at least {required} arg(s), only received {received}")]
    MinimumArgs { required: usize, received: usize },

    /// Too many positional arguments.
    #[error("accepts at most {limit} arg(s), received {received}")]
    MaximumArgs { limit: usize, received: usize },

    /// Wrong positional argument count.
    #[error("accepts {expected} arg(s), received {received}")]
    ExactArgs { expected: usize, received: usize },

    /// Positional argument count outside the accepted range.
    #[error("accepts between {min} and {max} arg(s), received {received}")]
    RangeArgs {
        min: usize,
        max: usize,
        received: usize,
    },

    /// One or more flags marked required were never set.
    #[error("required flag(s) {} not set", quote_join(names))]
    RequiredFlags { names: Vec<String> },

    /// A required-together group has set and unset members at once.
    #[error("if any flags in the group [{group}] are set they must all be set; missing {}", bracket_join(missing))]
    RequiredTogether { group: String, missing: Vec<String> },

    /// A one-required group has no set member.
    #[error("at least one of the flags in the group [{group}] is required")]
    OneRequired { group: String },

    /// A mutually-exclusive group has two or more set members.
    #[error("if any flags in the group [{group}] are set none of the others can be; {} were all set", bracket_join(set))]
    MutuallyExclusive { group: String, set: Vec<String> },

    /// Flag parsing failed at the resolved command.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// A completion request named a flag the resolved command lacks.
    #[error("subcommand {subcommand:?} does not support flag {flag:?}")]
    UnsupportedFlag { subcommand: String, flag: String },

    /// Completion could not resolve a command for the typed line.
    #[error("unable to find a command for arguments: {args:?}")]
    CompletionResolve { args: Vec<String> },

    /// Completion parsed the typed line's flags and failed.
    #[error("error while parsing flags from args {args:?}: {source}")]
    CompletionParse {
        args: Vec<String>,
        source: FlagError,
    },

    /// Free-form failure raised by a lifecycle hook.
    #[error("{0}")]
    Message(String),

    /// Help was requested; treated as success by the driver.
    #[error("help requested")]
    HelpRequested,
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        CommandError::Message(message)
    }
}

impl From<&str> for CommandError {
    fn from(message: &str) -> Self {
        CommandError::Message(message.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Renders the "did you mean" block appended to unknown-command errors.
fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n\nDid you mean this?\n");
    for s in suggestions {
        out.push('\t');
        out.push_str(s);
        out.push('\n');
    }
    out
}

/// `["a", "b"]` → `"a", "b"`.
fn quote_join(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("{n:?}")).collect();
    quoted.join(", ")
}

/// `["a", "b"]` → `[a b]`.
fn bracket_join(names: &[String]) -> String {
    format!("[{}]", names.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_rendering() {
        let err = CommandError::UnknownCommand {
            name: "lsit".into(),
            path: "demo".into(),
            suggestions: vec!["list".into()],
        };
        let text = err.to_string();
        assert!(text.starts_with("unknown command \"lsit\" for \"demo\""));
        assert!(text.contains("Did you mean this?"));
        assert!(text.contains("\tlist\n"));
    }

    #[test]
    fn test_unknown_command_without_suggestions() {
        let err = CommandError::UnknownCommand {
            name: "x".into(),
            path: "demo".into(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), "unknown command \"x\" for \"demo\"");
    }

    #[test]
    fn test_group_error_rendering() {
        let err = CommandError::RequiredTogether {
            group: "user password".into(),
            missing: vec!["password".into()],
        };
        assert_eq!(
            err.to_string(),
            "if any flags in the group [user password] are set they must all be set; missing [password]"
        );

        let err = CommandError::MutuallyExclusive {
            group: "json yaml".into(),
            set: vec!["json".into(), "yaml".into()],
        };
        assert_eq!(
            err.to_string(),
            "if any flags in the group [json yaml] are set none of the others can be; [json yaml] were all set"
        );
    }

    #[test]
    fn test_required_flags_rendering() {
        let err = CommandError::RequiredFlags {
            names: vec!["region".into(), "zone".into()],
        };
        assert_eq!(err.to_string(), "required flag(s) \"region\", \"zone\" not set");
    }

    #[test]
    fn test_flag_error_passthrough() {
        let err: CommandError = FlagError::UnknownFlag("nope".into()).into();
        assert_eq!(err.to_string(), "unknown flag: --nope");
    }
}
