//! Typo suggestions for unknown subcommand tokens.

use std::collections::BTreeSet;

use strsim::levenshtein;

use crate::tree::{CommandId, CommandTree};

impl CommandTree {
    /// Child commands of `id` worth offering for a mistyped `typed` token.
    ///
    /// A child qualifies when its name is within the command's edit-distance
    /// cutoff of the token (compared lowercased), when its name starts with
    /// the token ignoring case, or when the token appears verbatim in the
    /// child's suggest-for list. Hidden and deprecated children and the
    /// injected help command never qualify. The result is deduplicated and
    /// sorted, and empty when the command disables suggestions.
    pub fn suggestions_for(&self, id: CommandId, typed: &str) -> Vec<String> {
        if self.command(id).disable_suggestions() {
            return Vec::new();
        }
        let cutoff = self.command(id).suggestions_minimum_distance();
        let typed_lower = typed.to_lowercase();

        let mut out = BTreeSet::new();
        for child in self.children(id) {
            if !self.suggestable(*child) {
                continue;
            }
            let cmd = self.command(*child);
            let name_lower = cmd.name().to_lowercase();
            let by_distance = levenshtein(&typed_lower, &name_lower) <= cutoff;
            let by_prefix = name_lower.starts_with(&typed_lower);
            let by_alias = cmd
                .suggest_for()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(typed));
            if by_distance || by_prefix || by_alias {
                out.insert(cmd.name().to_string());
            }
        }
        out.into_iter().collect()
    }

    fn suggestable(&self, id: CommandId) -> bool {
        let cmd = self.command(id);
        !cmd.hidden() && cmd.deprecated().is_none() && self.help_command_id() != Some(id)
    }
}
