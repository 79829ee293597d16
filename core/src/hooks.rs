//! Lifecycle hook signatures and the context handed to them.
//!
//! Every hook stage shares one fallible shape: it receives a
//! [`CommandContext`] and returns a [`Result`]. Hooks that cannot fail wrap
//! themselves with [`infallible`] instead of inventing a second signature.

use std::rc::Rc;

use arbor_flagset::FlagRef;

use crate::command::Command;
use crate::complete::{Completions, Directive};
use crate::error::Result;
use crate::tree::{CommandId, CommandTree};

/// Read access to the resolved command, its tree and its leftover
/// positionals, valid for the duration of one hook invocation.
pub struct CommandContext<'a> {
    tree: &'a CommandTree,
    id: CommandId,
    args: &'a [String],
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(tree: &'a CommandTree, id: CommandId, args: &'a [String]) -> Self {
        CommandContext { tree, id, args }
    }

    /// The tree the resolved command belongs to.
    pub fn tree(&self) -> &CommandTree {
        self.tree
    }

    /// Identifier of the resolved command.
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// The resolved command's declaration record.
    pub fn command(&self) -> &Command {
        self.tree.command(self.id)
    }

    /// Leftover positional arguments after flag parsing.
    pub fn args(&self) -> &[String] {
        self.args
    }

    /// Space-joined path from the root to the resolved command.
    pub fn path(&self) -> String {
        self.tree.path(self.id)
    }

    /// The name or alias the command was actually invoked under.
    pub fn called_as(&self) -> Option<String> {
        self.tree.called_as(self.id)
    }

    /// Looks up a flag by long name across the command's full merged view.
    pub fn flag(&self, name: &str) -> Option<FlagRef> {
        self.tree.lookup_flag(self.id, name)
    }

    /// Current value of a flag, if it is visible from this command.
    pub fn flag_value(&self, name: &str) -> Option<String> {
        self.flag(name).map(|f| f.value())
    }

    /// Whether a visible flag was explicitly set on the command line.
    pub fn flag_changed(&self, name: &str) -> bool {
        self.flag(name).map(|f| f.changed()).unwrap_or(false)
    }
}

/// Run, pre-run, post-run and their persistent variants.
pub type RunHook = dyn Fn(&CommandContext<'_>) -> Result<()>;

/// Dynamic completion hooks for flag values and positionals.
///
/// The context's [`CommandContext::args`] hold the positionals typed so far;
/// the second parameter is the partial token under the cursor.
pub type CompletionHook = dyn Fn(&CommandContext<'_>, &str) -> Result<(Completions, Directive)>;

/// Maps a flag-parse failure to the error ultimately reported. Installed
/// tree-wide; the default keeps the parse error as-is.
pub type FlagErrorHook = dyn Fn(&CommandContext<'_>, arbor_flagset::FlagError) -> crate::error::CommandError;

/// Replacement help renderer, invoked for `--help`, the help command and
/// non-runnable commands.
pub type HelpHook = dyn Fn(&CommandTree, CommandId);

/// Adapts a hook that cannot fail to the fallible hook signature.
///
/// # Examples
///
/// ```
/// use arbor_core::{hooks, Command};
///
/// let cmd = Command::new("version")
///     .with_run(hooks::infallible(|ctx| {
///         println!("{}", ctx.command().name());
///     }));
/// assert!(cmd.has_run());
/// ```
pub fn infallible<F>(hook: F) -> impl Fn(&CommandContext<'_>) -> Result<()>
where
    F: Fn(&CommandContext<'_>) + 'static,
{
    move |ctx| {
        hook(ctx);
        Ok(())
    }
}

pub(crate) type SharedRunHook = Rc<RunHook>;
pub(crate) type SharedCompletionHook = Rc<CompletionHook>;
