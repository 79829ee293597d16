//! Registry mapping flags to the hooks that complete their values.
//!
//! Flag identity rather than flag name keys the registry, so a `--config`
//! on one subcommand never collides with a `--config` on another while a
//! persistent flag keeps a single hook everywhere it is visible.

use std::collections::HashMap;
use std::rc::Rc;

use arbor_flagset::FlagId;

use crate::error::Result;
use crate::hooks::{CommandContext, SharedCompletionHook};
use crate::tree::{CommandId, CommandTree};

use super::{Completions, Directive};

#[derive(Default)]
pub(crate) struct CompletionRegistry {
    hooks: HashMap<FlagId, SharedCompletionHook>,
}

impl CompletionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, name: &str, id: FlagId, hook: SharedCompletionHook) {
        if self.hooks.insert(id, hook).is_some() {
            panic!("completion hook already registered for flag --{name}");
        }
    }

    pub(crate) fn lookup(&self, id: FlagId) -> Option<SharedCompletionHook> {
        self.hooks.get(&id).cloned()
    }
}

impl CommandTree {
    /// Registers a hook that completes values for the flag `name` as
    /// visible from command `id`, covering inherited flags too.
    ///
    /// # Panics
    ///
    /// Panics when no such flag is visible at `id` or when the flag
    /// already has a hook.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{Command, CommandTree, Flag};
    /// use arbor_core::complete::{Completions, Directive};
    ///
    /// let mut tree = CommandTree::new(
    ///     Command::new("tool").with_persistent_flag(Flag::valued("format", "text")),
    /// );
    /// let root = tree.root_id();
    /// tree.register_flag_completion(root, "format", |_ctx, to_complete| {
    ///     let mut choices = Completions::default();
    ///     for format in ["text", "json", "yaml"] {
    ///         if format.starts_with(to_complete) {
    ///             choices.push(format);
    ///         }
    ///     }
    ///     Ok((choices, Directive::NO_FILE_COMP))
    /// });
    /// ```
    pub fn register_flag_completion<F>(&mut self, id: CommandId, name: &str, hook: F)
    where
        F: Fn(&CommandContext<'_>, &str) -> Result<(Completions, Directive)> + 'static,
    {
        let Some(flag) = self.lookup_flag(id, name) else {
            panic!("cannot register a completion hook for unknown flag --{name}");
        };
        self.registry.register(&flag.name(), flag.id(), Rc::new(hook));
    }
}
