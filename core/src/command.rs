//! Command declaration records.
//!
//! A [`Command`] is pure data: names, matching metadata, flag sets and
//! lifecycle hooks. It knows nothing about its position in a tree; parent
//! and child links live in [`crate::tree::CommandTree`], which owns every
//! node and hands out [`crate::tree::CommandId`] handles.

use std::rc::Rc;

use arbor_flagset::{Flag, FlagRef, FlagSet};

use crate::args::PositionalArgs;
use crate::complete::{Completions, Directive};
use crate::error::Result;
use crate::hooks::{CommandContext, SharedCompletionHook, SharedRunHook};

/// A named section used to organize a command's children in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub title: String,
}

impl Group {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Group {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One node's worth of declaration data.
///
/// The command's primary name is the first word of its use line; anything
/// after it is display-only argument syntax.
///
/// # Examples
///
/// ```
/// use arbor_core::{hooks, Command, Flag};
///
/// let serve = Command::new("serve [address]")
///     .with_short("Start the listener")
///     .with_alias("s")
///     .with_flag(Flag::valued("port", "8080").with_shorthand('p'))
///     .with_run(hooks::infallible(|ctx| {
///         println!("port {}", ctx.flag_value("port").unwrap());
///     }));
///
/// assert_eq!(serve.name(), "serve");
/// assert!(serve.has_alias("s", false));
/// ```
pub struct Command {
    use_line: String,
    aliases: Vec<String>,
    short: String,
    long: String,
    version: String,
    deprecated: Option<String>,
    hidden: bool,
    group_id: Option<String>,
    groups: Vec<Group>,
    suggest_for: Vec<String>,
    valid_args: Vec<String>,
    arg_aliases: Vec<String>,
    flags: FlagSet,
    persistent_flags: FlagSet,
    args: Option<PositionalArgs>,
    completion: Option<SharedCompletionHook>,
    pub(crate) run: Option<SharedRunHook>,
    pub(crate) pre_run: Option<SharedRunHook>,
    pub(crate) post_run: Option<SharedRunHook>,
    pub(crate) persistent_pre_run: Option<SharedRunHook>,
    pub(crate) persistent_post_run: Option<SharedRunHook>,
    disable_flag_parsing: bool,
    disable_suggestions: bool,
    suggestions_minimum_distance: usize,
    silence_errors: bool,
    silence_usage: bool,
    error_prefix: Option<String>,
}

impl Command {
    /// Creates a command from its use line.
    pub fn new(use_line: impl Into<String>) -> Self {
        let use_line = use_line.into();
        let name = first_word(&use_line).to_string();
        Command {
            use_line,
            aliases: Vec::new(),
            short: String::new(),
            long: String::new(),
            version: String::new(),
            deprecated: None,
            hidden: false,
            group_id: None,
            groups: Vec::new(),
            suggest_for: Vec::new(),
            valid_args: Vec::new(),
            arg_aliases: Vec::new(),
            flags: FlagSet::new(&name),
            persistent_flags: FlagSet::new(&name),
            args: None,
            completion: None,
            run: None,
            pre_run: None,
            post_run: None,
            persistent_pre_run: None,
            persistent_post_run: None,
            disable_flag_parsing: false,
            disable_suggestions: false,
            suggestions_minimum_distance: 0,
            silence_errors: false,
            silence_usage: false,
            error_prefix: None,
        }
    }

    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    pub fn with_long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Marks the command deprecated; the notice is printed on every use.
    pub fn with_deprecated(mut self, notice: impl Into<String>) -> Self {
        self.deprecated = Some(notice.into());
        self
    }

    /// Hides the command from suggestions, completion and listings.
    pub fn with_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Assigns the command to one of its parent's listing groups.
    pub fn with_group_id(mut self, id: impl Into<String>) -> Self {
        self.group_id = Some(id.into());
        self
    }

    /// Declares a listing group that this command's children may join.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a typo this command should be suggested for.
    pub fn with_suggest_for(mut self, typo: impl Into<String>) -> Self {
        self.suggest_for.push(typo.into());
        self
    }

    /// Sets the fixed first-argument vocabulary.
    ///
    /// Entries may carry a tab-separated description; only the part before
    /// the tab takes part in validation.
    pub fn with_valid_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets fallback completion candidates offered when no valid argument
    /// matches the typed prefix.
    pub fn with_arg_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arg_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Registers a flag local to this command.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.add(flag);
        self
    }

    /// Registers a flag inherited by every descendant.
    pub fn with_persistent_flag(mut self, flag: Flag) -> Self {
        self.persistent_flags.add(flag);
        self
    }

    /// Installs the positional-argument rule.
    pub fn with_args(mut self, rule: PositionalArgs) -> Self {
        self.args = Some(rule);
        self
    }

    /// Installs the dynamic completion hook for positionals.
    pub fn with_completion<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CommandContext<'_>, &str) -> Result<(Completions, Directive)> + 'static,
    {
        self.completion = Some(Rc::new(hook));
        self
    }

    pub fn with_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<()> + 'static,
    {
        self.run = Some(Rc::new(hook));
        self
    }

    pub fn with_pre_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<()> + 'static,
    {
        self.pre_run = Some(Rc::new(hook));
        self
    }

    pub fn with_post_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<()> + 'static,
    {
        self.post_run = Some(Rc::new(hook));
        self
    }

    pub fn with_persistent_pre_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<()> + 'static,
    {
        self.persistent_pre_run = Some(Rc::new(hook));
        self
    }

    pub fn with_persistent_post_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<()> + 'static,
    {
        self.persistent_post_run = Some(Rc::new(hook));
        self
    }

    /// Leaves the argument vector untouched so the run hook can parse it.
    pub fn with_disable_flag_parsing(mut self) -> Self {
        self.disable_flag_parsing = true;
        self
    }

    /// Suppresses typo suggestions under this command.
    pub fn with_disable_suggestions(mut self) -> Self {
        self.disable_suggestions = true;
        self
    }

    /// Overrides the edit-distance cutoff for suggestions. Zero keeps the
    /// default of two.
    pub fn with_suggestions_minimum_distance(mut self, distance: usize) -> Self {
        self.suggestions_minimum_distance = distance;
        self
    }

    /// Stops the driver from printing errors for this command.
    pub fn with_silence_errors(mut self) -> Self {
        self.silence_errors = true;
        self
    }

    /// Stops the driver from printing the usage hint after errors.
    pub fn with_silence_usage(mut self) -> Self {
        self.silence_usage = true;
        self
    }

    /// Replaces the `Error:` prefix on printed errors, for this command and
    /// its descendants.
    pub fn with_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = Some(prefix.into());
        self
    }

    /// First word of the use line.
    pub fn name(&self) -> &str {
        first_word(&self.use_line)
    }

    pub fn use_line(&self) -> &str {
        &self.use_line
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn deprecated(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut Vec<Group> {
        &mut self.groups
    }

    pub fn contains_group(&self, id: &str) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    pub fn suggest_for(&self) -> &[String] {
        &self.suggest_for
    }

    pub fn valid_args(&self) -> &[String] {
        &self.valid_args
    }

    pub fn arg_aliases(&self) -> &[String] {
        &self.arg_aliases
    }

    /// Flags declared on this command alone.
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Mutable access for registration before the command joins a tree.
    pub fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }

    /// Flags this command passes down to descendants.
    pub fn persistent_flags(&self) -> &FlagSet {
        &self.persistent_flags
    }

    pub fn persistent_flags_mut(&mut self) -> &mut FlagSet {
        &mut self.persistent_flags
    }

    /// Convenience lookup across both declaration sets.
    pub fn own_flag(&self, name: &str) -> Option<FlagRef> {
        self.flags
            .lookup(name)
            .or_else(|| self.persistent_flags.lookup(name))
    }

    pub fn args_validator(&self) -> Option<&PositionalArgs> {
        self.args.as_ref()
    }

    pub fn completion_hook(&self) -> Option<&SharedCompletionHook> {
        self.completion.as_ref()
    }

    pub fn has_run(&self) -> bool {
        self.run.is_some()
    }

    pub fn disable_flag_parsing(&self) -> bool {
        self.disable_flag_parsing
    }

    pub fn disable_suggestions(&self) -> bool {
        self.disable_suggestions
    }

    /// Effective suggestion cutoff, with zero coerced to two.
    pub fn suggestions_minimum_distance(&self) -> usize {
        if self.suggestions_minimum_distance == 0 {
            2
        } else {
            self.suggestions_minimum_distance
        }
    }

    pub fn silence_errors(&self) -> bool {
        self.silence_errors
    }

    pub fn silence_usage(&self) -> bool {
        self.silence_usage
    }

    pub fn error_prefix(&self) -> Option<&str> {
        self.error_prefix.as_deref()
    }

    /// True when `token` equals one of the aliases, optionally ignoring
    /// ASCII case.
    pub fn has_alias(&self, token: &str, case_insensitive: bool) -> bool {
        self.aliases
            .iter()
            .any(|a| name_matches(a, token, case_insensitive))
    }

    /// True when `prefix` starts the name or any alias. Records nothing;
    /// the resolver tracks which spelling matched.
    pub fn name_or_alias_with_prefix(&self, prefix: &str, case_insensitive: bool) -> Option<&str> {
        if has_prefix(self.name(), prefix, case_insensitive) {
            return Some(self.name());
        }
        self.aliases
            .iter()
            .find(|a| has_prefix(a, prefix, case_insensitive))
            .map(|a| a.as_str())
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("use_line", &self.use_line)
            .field("aliases", &self.aliases)
            .field("hidden", &self.hidden)
            .field("runnable", &self.has_run())
            .finish_non_exhaustive()
    }
}

pub(crate) fn name_matches(candidate: &str, token: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        candidate.eq_ignore_ascii_case(token)
    } else {
        candidate == token
    }
}

pub(crate) fn has_prefix(candidate: &str, prefix: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        candidate
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    } else {
        candidate.starts_with(prefix)
    }
}

fn first_word(use_line: &str) -> &str {
    use_line.split_whitespace().next().unwrap_or_default()
}
