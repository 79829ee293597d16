//! Arena-backed command tree.
//!
//! The tree owns every [`Command`] node and hands out copyable [`CommandId`]
//! handles. Parent and child links are indices, so nodes never reference
//! each other directly and reparenting stays cheap. All tree-wide toggles
//! live in [`TreeConfig`].

use tracing::debug;

use arbor_flagset::{Flag, FlagRef, FlagSet};

use crate::command::{Command, Group};
use crate::complete::CompletionRegistry;
use crate::hooks::{FlagErrorHook, HelpHook};
use crate::merge::FlagViews;

use std::rc::Rc;

/// Stable handle for one node of a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

/// Behavior toggles shared by every command in one tree.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Allow unique name or alias prefixes to match during resolution.
    pub prefix_matching: bool,
    /// Match command names and aliases ignoring ASCII case.
    pub case_insensitive: bool,
    /// Sort child listings by name. Resolution order is never affected.
    pub command_sorting: bool,
    /// Resolve left to right, parsing each level's flags as descent passes
    /// it, instead of skipping over flag tokens.
    pub traverse_children: bool,
    /// Run every ancestor's persistent pre and post hooks instead of only
    /// the nearest declared one.
    pub traverse_run_hooks: bool,
    /// Environment variable prefix for completion configuration.
    pub env_prefix: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            prefix_matching: false,
            case_insensitive: false,
            command_sorting: true,
            traverse_children: false,
            traverse_run_hooks: false,
            env_prefix: "ARBOR".to_string(),
        }
    }
}

pub(crate) struct Node {
    pub(crate) command: Command,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
    pub(crate) called_as: Option<String>,
    pub(crate) parsed_args: Vec<String>,
    pub(crate) views: FlagViews,
}

impl Node {
    fn new(command: Command) -> Self {
        Node {
            command,
            parent: None,
            children: Vec::new(),
            called_as: None,
            parsed_args: Vec::new(),
            views: FlagViews::default(),
        }
    }
}

/// The whole command hierarchy plus its shared machinery: completion hook
/// registry, lifecycle callbacks and merged-view caches.
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
/// assert_eq!(tree.path(serve), "demo serve");
/// assert!(tree.lookup_flag(serve, "verbose").is_some());
/// ```
pub struct CommandTree {
    pub(crate) nodes: Vec<Node>,
    root: CommandId,
    config: TreeConfig,
    pub(crate) registry: CompletionRegistry,
    pub(crate) flag_epoch: u64,
    pub(crate) help_command: Option<CommandId>,
    pub(crate) complete_command: Option<CommandId>,
    pub(crate) flag_error_hook: Option<Rc<FlagErrorHook>>,
    pub(crate) help_hook: Option<Rc<HelpHook>>,
    initializers: Vec<Rc<dyn Fn()>>,
    finalizers: Vec<Rc<dyn Fn()>>,
}

impl CommandTree {
    /// Creates a tree rooted at `root`.
    pub fn new(root: Command) -> Self {
        CommandTree {
            nodes: vec![Node::new(root)],
            root: CommandId(0),
            config: TreeConfig::default(),
            registry: CompletionRegistry::new(),
            flag_epoch: 1,
            help_command: None,
            complete_command: None,
            flag_error_hook: None,
            help_hook: None,
            initializers: Vec::new(),
            finalizers: Vec::new(),
        }
    }

    /// Creates a tree with explicit configuration.
    pub fn with_config(root: Command, config: TreeConfig) -> Self {
        let mut tree = CommandTree::new(root);
        tree.config = config;
        tree
    }

    pub fn root_id(&self) -> CommandId {
        self.root
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TreeConfig {
        &mut self.config
    }

    /// Attaches `command` under `parent` and returns its handle.
    pub fn add_command(&mut self, parent: CommandId, command: Command) -> CommandId {
        let id = CommandId(self.nodes.len());
        debug!(parent = %self.path(parent), name = command.name(), "adding command");
        self.nodes.push(Node::new(command));
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        self.flag_epoch += 1;
        id
    }

    /// Detaches a previously removed node back under `parent`.
    ///
    /// Panics when the node is the tree root, is still attached, or when
    /// `parent` sits inside the node's own subtree.
    pub fn reattach_command(&mut self, parent: CommandId, id: CommandId) {
        if id == self.root {
            panic!("cannot attach the root command to a parent");
        }
        if id == parent {
            panic!("command {:?} cannot be its own parent", self.name(id));
        }
        if self.nodes[id.0].parent.is_some() {
            panic!(
                "command {:?} is already attached to {:?}",
                self.name(id),
                self.name(self.nodes[id.0].parent.unwrap())
            );
        }
        if self.is_descendant_of(parent, id) {
            panic!(
                "attaching {:?} under {:?} would create a cycle",
                self.name(id),
                self.name(parent)
            );
        }
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        self.flag_epoch += 1;
    }

    /// Detaches a node from its parent. The handle stays valid and the node
    /// can be reattached later.
    pub fn remove_command(&mut self, id: CommandId) {
        if id == self.root {
            panic!("cannot remove the root command");
        }
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
        if self.help_command == Some(id) {
            self.help_command = None;
        }
        self.flag_epoch += 1;
    }

    pub fn command(&self, id: CommandId) -> &Command {
        &self.nodes[id.0].command
    }

    pub fn name(&self, id: CommandId) -> &str {
        self.nodes[id.0].command.name()
    }

    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.nodes[id.0].parent
    }

    /// Children in insertion order. This is the order resolution scans.
    pub fn children(&self, id: CommandId) -> &[CommandId] {
        &self.nodes[id.0].children
    }

    /// Children in listing order: sorted by name when the tree's sorting
    /// toggle is on, insertion order otherwise.
    pub fn listed_children(&self, id: CommandId) -> Vec<CommandId> {
        let mut out = self.nodes[id.0].children.clone();
        if self.config.command_sorting {
            out.sort_by(|a, b| self.name(*a).cmp(self.name(*b)));
        }
        out
    }

    /// Space-joined names from the root down to `id`.
    pub fn path(&self, id: CommandId) -> String {
        let mut names = vec![self.name(id).to_string()];
        let mut cur = id;
        while let Some(parent) = self.nodes[cur.0].parent {
            names.push(self.name(parent).to_string());
            cur = parent;
        }
        names.reverse();
        names.join(" ")
    }

    /// Parent chain from the nearest ancestor up to the root.
    pub(crate) fn ancestors(&self, id: CommandId) -> Vec<CommandId> {
        let mut out = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.nodes[cur.0].parent {
            out.push(parent);
            cur = parent;
        }
        out
    }

    pub(crate) fn is_descendant_of(&self, id: CommandId, ancestor: CommandId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// The name or alias `id` was last resolved under.
    pub fn called_as(&self, id: CommandId) -> Option<String> {
        self.nodes[id.0].called_as.clone()
    }

    pub(crate) fn set_called_as(&mut self, id: CommandId, spelling: &str) {
        self.nodes[id.0].called_as = Some(spelling.to_string());
    }

    /// Positionals left over from the last flag parse at `id`.
    pub fn parsed_args(&self, id: CommandId) -> &[String] {
        &self.nodes[id.0].parsed_args
    }

    /// Registers a flag on `id` after attachment.
    pub fn add_flag(&mut self, id: CommandId, flag: Flag) -> FlagRef {
        self.flag_epoch += 1;
        self.nodes[id.0].command.flags_mut().add(flag)
    }

    /// Registers an inheritable flag on `id` after attachment.
    pub fn add_persistent_flag(&mut self, id: CommandId, flag: Flag) -> FlagRef {
        self.flag_epoch += 1;
        self.nodes[id.0].command.persistent_flags_mut().add(flag)
    }

    /// Declares a listing group on `id` for its children to join.
    pub fn add_group(&mut self, id: CommandId, group: Group) {
        self.nodes[id.0].command.groups_mut().push(group);
    }

    /// Resolves a long flag name the way `id`'s merged view would: own
    /// flags first, then own persistent flags, then each ancestor's
    /// persistent flags, nearest declaration winning.
    pub fn lookup_flag(&self, id: CommandId, name: &str) -> Option<FlagRef> {
        for set in self.flag_scope(id) {
            if let Some(flag) = set.lookup(name) {
                return Some(flag);
            }
        }
        None
    }

    /// Shorthand lookup with the same shadowing rules as [`Self::lookup_flag`]:
    /// a far declaration whose long name is shadowed nearer in cannot
    /// contribute its shorthand either.
    pub fn lookup_shorthand(&self, id: CommandId, shorthand: char) -> Option<FlagRef> {
        let mut seen = std::collections::HashSet::new();
        for set in self.flag_scope(id) {
            for flag in set.iter() {
                let name = flag.name();
                if seen.contains(&name) {
                    continue;
                }
                if flag.shorthand() == Some(shorthand) {
                    return Some(flag.clone());
                }
                seen.insert(name);
            }
        }
        None
    }

    /// Declaration sets in merge order for `id`.
    pub(crate) fn flag_scope(&self, id: CommandId) -> Vec<&FlagSet> {
        let mut sets = vec![
            self.nodes[id.0].command.flags(),
            self.nodes[id.0].command.persistent_flags(),
        ];
        for ancestor in self.ancestors(id) {
            sets.push(self.nodes[ancestor.0].command.persistent_flags());
        }
        sets
    }

    /// True when a flag spelled `--name` would take its value from the next
    /// token rather than requiring `=`.
    pub(crate) fn long_has_bare_default(&self, id: CommandId, name: &str) -> bool {
        self.lookup_flag(id, name)
            .map(|f| !f.expects_value())
            .unwrap_or(false)
    }

    pub(crate) fn short_has_bare_default(&self, id: CommandId, shorthand: char) -> bool {
        self.lookup_shorthand(id, shorthand)
            .map(|f| !f.expects_value())
            .unwrap_or(false)
    }

    /// True when the command should appear in completion candidates and
    /// non-error listings.
    pub fn is_available(&self, id: CommandId) -> bool {
        let cmd = self.command(id);
        if cmd.deprecated().is_some() || cmd.hidden() {
            return false;
        }
        if self.help_command == Some(id) {
            return false;
        }
        cmd.has_run() || self.has_available_subcommands(id)
    }

    pub fn has_available_subcommands(&self, id: CommandId) -> bool {
        self.children(id).iter().any(|c| self.is_available(*c))
    }

    pub fn has_subcommands(&self, id: CommandId) -> bool {
        !self.children(id).is_empty()
    }

    pub(crate) fn is_root(&self, id: CommandId) -> bool {
        id == self.root
    }

    /// Handle of the injected help command, once the driver has added it.
    pub fn help_command_id(&self) -> Option<CommandId> {
        self.help_command
    }

    /// Registers a callback run once before each invocation's run hook.
    pub fn on_initialize<F: Fn() + 'static>(&mut self, hook: F) {
        self.initializers.push(Rc::new(hook));
    }

    /// Registers a callback run after each invocation finishes.
    pub fn on_finalize<F: Fn() + 'static>(&mut self, hook: F) {
        self.finalizers.push(Rc::new(hook));
    }

    pub(crate) fn run_initializers(&self) {
        for hook in &self.initializers {
            hook();
        }
    }

    pub(crate) fn run_finalizers(&self) {
        for hook in &self.finalizers {
            hook();
        }
    }

    /// Replaces the mapping from flag-parse failures to reported errors.
    pub fn set_flag_error_hook<F>(&mut self, hook: F)
    where
        F: Fn(&crate::hooks::CommandContext<'_>, arbor_flagset::FlagError) -> crate::error::CommandError
            + 'static,
    {
        self.flag_error_hook = Some(Rc::new(hook));
    }

    /// Replaces the help renderer.
    pub fn set_help_hook<F>(&mut self, hook: F)
    where
        F: Fn(&CommandTree, CommandId) + 'static,
    {
        self.help_hook = Some(Rc::new(hook));
    }

    /// Panics when any command names a group its parent never declared.
    pub(crate) fn check_command_groups(&self, id: CommandId) {
        for child in self.children(id) {
            if let Some(gid) = self.command(*child).group_id() {
                if !self.command(id).contains_group(gid) {
                    panic!(
                        "group id '{}' is not defined for subcommand '{}'",
                        gid,
                        self.path(*child)
                    );
                }
            }
            self.check_command_groups(*child);
        }
    }
}
