//! Argument-vector resolution.
//!
//! Two strategies select the target command from an argument vector:
//!
//! - [`CommandTree::find`] skips over flag-shaped tokens while descending,
//!   so flags may appear anywhere on the line
//! - [`CommandTree::traverse`] walks strictly left to right, parsing each
//!   level's flags at the moment descent passes it
//!
//! Both leave flag values untouched for the execution driver except where
//! traversal must parse to keep walking. Neither strategy ever guesses: a
//! token that matches no child simply ends the descent, and only the root
//! rejects leftovers as unknown commands.

use crate::error::{CommandError, Result};
use crate::tree::{CommandId, CommandTree};

/// Flag-shaped token check used while walking. A lone `-` or `--` does not
/// count; those are a positional and the parse terminator.
pub(crate) fn is_flag_arg(arg: &str) -> bool {
    let b = arg.as_bytes();
    (b.len() >= 3 && &b[0..2] == b"--") || (b.len() >= 2 && b[0] == b'-' && b[1] != b'-')
}

impl CommandTree {
    /// Resolves `args` from the root, skipping over flag tokens.
    ///
    /// Returns the deepest matched command and the argument vector that
    /// belongs to it, flags included. Fails only when leftovers remain at
    /// a root that has subcommands and no positional rule of its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::{Command, CommandTree, Flag};
    ///
    /// let mut tree = CommandTree::new(
    ///     Command::new("demo").with_persistent_flag(Flag::switch("verbose")),
    /// );
    /// let serve = tree.add_command(tree.root_id(), Command::new("serve"));
    ///
    /// let args: Vec<String> = ["--verbose", "serve", "extra"]
    ///     .iter().map(|s| s.to_string()).collect();
    /// let (target, rest) = tree.find(&args).unwrap();
    /// assert_eq!(target, serve);
    /// assert_eq!(rest, ["--verbose", "extra"]);
    /// ```
    pub fn find(&mut self, args: &[String]) -> Result<(CommandId, Vec<String>)> {
        let (target, rest) = self.find_from(self.root_id(), args);
        if self.command(target).args_validator().is_none() {
            self.reject_root_leftovers(target, &rest)?;
        }
        Ok((target, rest))
    }

    /// Read-only variant of [`Self::find`] for use inside hooks. Identical
    /// matching, but records no invocation spelling.
    pub fn locate(&self, args: &[String]) -> Result<(CommandId, Vec<String>)> {
        let (target, rest) = self.locate_from(self.root_id(), args);
        if self.command(target).args_validator().is_none() {
            self.reject_root_leftovers(target, &rest)?;
        }
        Ok((target, rest))
    }

    fn find_from(&mut self, cur: CommandId, args: &[String]) -> (CommandId, Vec<String>) {
        let stripped = self.strip_flags(cur, args);
        if stripped.is_empty() {
            return (cur, args.to_vec());
        }
        match self.match_child(cur, &stripped[0]) {
            Some((child, spelling)) => {
                self.set_called_as(child, &spelling);
                let rest = self.args_minus_first_x(cur, args, &stripped[0]);
                self.find_from(child, &rest)
            }
            None => (cur, args.to_vec()),
        }
    }

    fn locate_from(&self, cur: CommandId, args: &[String]) -> (CommandId, Vec<String>) {
        let stripped = self.strip_flags(cur, args);
        if stripped.is_empty() {
            return (cur, args.to_vec());
        }
        match self.match_child(cur, &stripped[0]) {
            Some((child, _)) => {
                let rest = self.args_minus_first_x(cur, args, &stripped[0]);
                self.locate_from(child, &rest)
            }
            None => (cur, args.to_vec()),
        }
    }

    /// Resolves `args` left to right, parsing flags at each level passed.
    ///
    /// A token is matched as a subcommand only once every flag seen so far
    /// at the current level has parsed cleanly; parse failures surface
    /// through the tree's flag-error hook.
    pub fn traverse(&mut self, args: &[String]) -> Result<(CommandId, Vec<String>)> {
        self.traverse_from(self.root_id(), args)
    }

    fn traverse_from(&mut self, cur: CommandId, args: &[String]) -> Result<(CommandId, Vec<String>)> {
        let mut flags: Vec<String> = Vec::new();
        let mut in_flag = false;

        for (i, arg) in args.iter().enumerate() {
            if arg.starts_with("--") && !arg.contains('=') {
                // A long flag without inline value takes the next token,
                // unless it can stand bare.
                in_flag = !self.long_has_bare_default(cur, &arg[2..]);
                flags.push(arg.clone());
                continue;
            }
            if arg.len() == 2
                && arg.starts_with('-')
                && !arg.contains('=')
                && !self.short_has_bare_default(cur, arg.as_bytes()[1] as char)
            {
                in_flag = true;
                flags.push(arg.clone());
                continue;
            }
            if in_flag {
                in_flag = false;
                flags.push(arg.clone());
                continue;
            }
            if is_flag_arg(arg) {
                flags.push(arg.clone());
                continue;
            }

            match self.match_child(cur, arg) {
                None => return Ok((cur, args.to_vec())),
                Some((child, spelling)) => {
                    self.set_called_as(child, &spelling);
                    if let Err(e) = self.parse_at(cur, &flags) {
                        return Err(self.map_flag_error(cur, &flags, e));
                    }
                    return self.traverse_from(child, &args[i + 1..]);
                }
            }
        }
        Ok((cur, args.to_vec()))
    }

    /// Exact name or alias match first, then a unique prefix when the tree
    /// allows it. Returns the matched spelling for invocation records: the
    /// typed token on exact matches, the full name or alias on prefix ones.
    pub(crate) fn match_child(&self, cur: CommandId, token: &str) -> Option<(CommandId, String)> {
        let ci = self.config().case_insensitive;
        for child in self.children(cur) {
            let cmd = self.command(*child);
            if crate::command::name_matches(cmd.name(), token, ci) || cmd.has_alias(token, ci) {
                return Some((*child, token.to_string()));
            }
        }
        if self.config().prefix_matching {
            let mut matches = Vec::new();
            for child in self.children(cur) {
                if let Some(spelling) = self.command(*child).name_or_alias_with_prefix(token, ci) {
                    matches.push((*child, spelling.to_string()));
                }
            }
            if matches.len() == 1 {
                return matches.pop();
            }
        }
        None
    }

    /// Non-flag tokens of `args` as seen from `id`'s flag surface. Tokens
    /// consumed as flag values are dropped, and everything after `--` is
    /// ignored.
    pub(crate) fn strip_flags(&self, id: CommandId, args: &[String]) -> Vec<String> {
        let mut commands = Vec::new();
        let mut i = 0;
        while i < args.len() {
            let s = &args[i];
            i += 1;
            if s == "--" {
                break;
            }
            if self.consumes_next_token(id, s) {
                // Skip the flag's value, or stop if nothing else follows.
                if args.len() - i <= 1 {
                    break;
                }
                i += 1;
                continue;
            }
            if !s.is_empty() && !s.starts_with('-') {
                commands.push(s.clone());
            }
        }
        commands
    }

    /// Removes the first occurrence of `x` from `args` that is not a flag
    /// value, leaving later identical tokens alone.
    pub(crate) fn args_minus_first_x(
        &self,
        id: CommandId,
        args: &[String],
        x: &str,
    ) -> Vec<String> {
        let mut pos = 0;
        while pos < args.len() {
            let s = &args[pos];
            if s == "--" {
                break;
            }
            if self.consumes_next_token(id, s) {
                pos += 2;
                continue;
            }
            if !s.starts_with('-') && s == x {
                let mut out = args[..pos].to_vec();
                out.extend_from_slice(&args[pos + 1..]);
                return out;
            }
            pos += 1;
        }
        args.to_vec()
    }

    /// True for flag tokens that take their value from the following
    /// argument: `--name` without `=` when `name` cannot stand bare, and
    /// the two-character shorthand form likewise.
    fn consumes_next_token(&self, id: CommandId, s: &str) -> bool {
        if s.starts_with("--") && !s.contains('=') {
            return !self.long_has_bare_default(id, &s[2..]);
        }
        s.len() == 2
            && s.starts_with('-')
            && !s.contains('=')
            && !self.short_has_bare_default(id, s.as_bytes()[1] as char)
    }

    fn reject_root_leftovers(&self, target: CommandId, rest: &[String]) -> Result<()> {
        if !self.has_subcommands(target) || !self.is_root(target) {
            return Ok(());
        }
        let stripped = self.strip_flags(target, rest);
        if let Some(first) = stripped.first() {
            return Err(self.unknown_command_error(target, first));
        }
        Ok(())
    }

    pub(crate) fn unknown_command_error(&self, at: CommandId, token: &str) -> CommandError {
        CommandError::UnknownCommand {
            name: token.to_string(),
            path: self.path(at),
            suggestions: self.suggestions_for(at, token),
        }
    }

    pub(crate) fn map_flag_error(
        &self,
        id: CommandId,
        args: &[String],
        err: arbor_flagset::FlagError,
    ) -> CommandError {
        match &self.flag_error_hook {
            Some(hook) => {
                let ctx = crate::hooks::CommandContext::new(self, id, args);
                hook(&ctx, err)
            }
            None => err.into(),
        }
    }
}
