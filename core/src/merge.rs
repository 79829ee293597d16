//! Merged flag views.
//!
//! Each command sees three derived sets assembled from the declaration
//! sets along its parent chain:
//!
//! - full: own flags, own persistent flags, then every ancestor's
//!   persistent flags
//! - local: own flags plus own persistent flags
//! - inherited: ancestors' persistent flags, minus any name the command
//!   declares itself
//!
//! Views hold clones of the shared [`arbor_flagset::FlagRef`] handles,
//! never copies of the flags themselves, so parsing at a leaf writes
//! values into the ancestor declarations. Assembly always walks
//! nearest-first and skips names already claimed, which makes the closest
//! declaration shadow farther ones. Built views are cached per node and
//! invalidated by a tree-wide epoch that bumps on any flag or command
//! registration.

use arbor_flagset::FlagSet;

use crate::tree::{CommandId, CommandTree};

pub(crate) struct CachedSet {
    epoch: u64,
    set: FlagSet,
}

#[derive(Default)]
pub(crate) struct FlagViews {
    full: Option<CachedSet>,
    local: Option<CachedSet>,
    inherited: Option<CachedSet>,
}

impl CommandTree {
    /// The complete flag surface visible at `id`.
    pub fn full_flags(&mut self, id: CommandId) -> &FlagSet {
        let epoch = self.flag_epoch;
        if self.view_stale(id, ViewKind::Full, epoch) {
            let set = self.build_full(id);
            self.nodes[id.0].views.full = Some(CachedSet { epoch, set });
        }
        &self.nodes[id.0].views.full.as_ref().unwrap().set
    }

    /// Flags declared on `id` itself, both plain and persistent.
    pub fn local_flags(&mut self, id: CommandId) -> &FlagSet {
        let epoch = self.flag_epoch;
        if self.view_stale(id, ViewKind::Local, epoch) {
            let set = self.build_local(id);
            self.nodes[id.0].views.local = Some(CachedSet { epoch, set });
        }
        &self.nodes[id.0].views.local.as_ref().unwrap().set
    }

    /// Persistent flags reaching `id` from its ancestors.
    pub fn inherited_flags(&mut self, id: CommandId) -> &FlagSet {
        let epoch = self.flag_epoch;
        if self.view_stale(id, ViewKind::Inherited, epoch) {
            let set = self.build_inherited(id);
            self.nodes[id.0].views.inherited = Some(CachedSet { epoch, set });
        }
        &self.nodes[id.0].views.inherited.as_ref().unwrap().set
    }

    /// Parses `args` against `id`'s full view and records the leftover
    /// positionals on the node.
    pub(crate) fn parse_at(
        &mut self,
        id: CommandId,
        args: &[String],
    ) -> arbor_flagset::Result<()> {
        self.full_flags(id);
        let node = &mut self.nodes[id.0];
        let cached = node.views.full.as_mut().unwrap();
        let outcome = cached.set.parse(args);
        node.parsed_args = cached.set.positionals().to_vec();
        outcome
    }

    /// Own flags that are not also declared persistent, compared by name.
    /// Completion uses this to detect interspersed local flags.
    pub(crate) fn local_non_persistent_flags(&self, id: CommandId) -> FlagSet {
        let mut out = FlagSet::new(self.name(id));
        let persistent = self.nodes[id.0].command.persistent_flags();
        for flag in self.nodes[id.0].command.flags().iter() {
            if !persistent.has(&flag.name()) {
                out.adopt(flag);
            }
        }
        out
    }

    fn view_stale(&self, id: CommandId, kind: ViewKind, epoch: u64) -> bool {
        let views = &self.nodes[id.0].views;
        let cached = match kind {
            ViewKind::Full => views.full.as_ref(),
            ViewKind::Local => views.local.as_ref(),
            ViewKind::Inherited => views.inherited.as_ref(),
        };
        cached.map(|c| c.epoch != epoch).unwrap_or(true)
    }

    fn build_full(&self, id: CommandId) -> FlagSet {
        let mut set = FlagSet::new(self.name(id));
        for scope in self.flag_scope(id) {
            set.adopt_all(scope);
        }
        set
    }

    fn build_local(&self, id: CommandId) -> FlagSet {
        let mut set = FlagSet::new(self.name(id));
        set.adopt_all(self.nodes[id.0].command.flags());
        set.adopt_all(self.nodes[id.0].command.persistent_flags());
        set
    }

    fn build_inherited(&self, id: CommandId) -> FlagSet {
        let mut set = FlagSet::new(self.name(id));
        let own = &self.nodes[id.0].command;
        for ancestor in self.ancestors(id) {
            for flag in self.nodes[ancestor.0].command.persistent_flags().iter() {
                let name = flag.name();
                // A locally redeclared name shadows the ancestor's flag
                // out of the inherited view entirely.
                if own.flags().has(&name) || own.persistent_flags().has(&name) {
                    continue;
                }
                set.adopt(flag);
            }
        }
        set
    }
}

enum ViewKind {
    Full,
    Local,
    Inherited,
}
