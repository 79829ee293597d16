//! Environment-variable configuration for the completion protocol.
//!
//! Shell integrations flip completion behavior through variables named
//! `<PROGRAM>_<SUFFIX>`, with a global `<PREFIX>_<SUFFIX>` fallback that
//! applies to every program sharing the prefix.

use crate::tree::CommandTree;

/// Suffix of the variable controlling candidate descriptions.
pub(crate) const DESCRIPTIONS_SUFFIX: &str = "COMPLETION_DESCRIPTIONS";

/// Suffix of the variable controlling active-help messages.
pub(crate) const ACTIVE_HELP_SUFFIX: &str = "ACTIVE_HELP";

/// Builds the variable name `<NAME>_<SUFFIX>`, uppercased with every
/// character outside `[A-Z0-9_]` replaced by an underscore.
///
/// This format is user-visible and must stay stable.
pub(crate) fn config_env_var(name: &str, suffix: &str) -> String {
    format!("{name}_{suffix}")
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Picks the program-specific value unless it is absent or empty, in
/// which case the global value applies.
pub(crate) fn resolve_config(program: Option<String>, global: Option<String>) -> String {
    match program {
        Some(value) if !value.is_empty() => value,
        _ => global.unwrap_or_default(),
    }
}

/// Parses the boolean forms accepted on configuration variables:
/// `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts.
/// Anything else is no setting at all.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl CommandTree {
    /// Reads the configuration value for `suffix`, preferring the
    /// program-specific variable over the global-prefix one.
    pub(crate) fn env_config(&self, suffix: &str) -> String {
        let program = std::env::var(config_env_var(self.name(self.root_id()), suffix)).ok();
        let global = std::env::var(config_env_var(&self.config().env_prefix, suffix)).ok();
        resolve_config(program, global)
    }
}
