//! Active-help messages ride alongside completion candidates to give
//! the user usage hints while they type.
//!
//! Each message is a candidate line starting with [`ACTIVE_HELP_MARKER`]
//! so shell integrations can display it without offering it for
//! insertion. Users silence the stream per program or globally by
//! setting the matching `ACTIVE_HELP` environment variable to `0`.

use crate::tree::CommandTree;

use super::env;

/// Prefix identifying an active-help line among completion candidates.
pub const ACTIVE_HELP_MARKER: &str = "_activeHelp_ ";

/// Configuration value that turns active help off.
pub(crate) const ACTIVE_HELP_DISABLE: &str = "0";

/// Applies the precedence between the global and program variables: a
/// global `0` always wins, otherwise the program value stands as-is.
pub(crate) fn resolve_active_help(global: Option<String>, program: Option<String>) -> String {
    match global {
        Some(value) if value == ACTIVE_HELP_DISABLE => value,
        _ => program.unwrap_or_default(),
    }
}

impl CommandTree {
    /// Reads the active-help configuration for this program.
    ///
    /// Returns `"0"` when the global variable disables active help,
    /// otherwise the raw value of the program variable. Programs may
    /// define richer values than on/off; the completion engine itself
    /// only acts on `"0"`.
    pub fn active_help_config(&self) -> String {
        let global =
            std::env::var(env::config_env_var(&self.config().env_prefix, env::ACTIVE_HELP_SUFFIX))
                .ok();
        let program =
            std::env::var(env::config_env_var(self.name(self.root_id()), env::ACTIVE_HELP_SUFFIX))
                .ok();
        resolve_active_help(global, program)
    }
}
