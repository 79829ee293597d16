//! Flag-group constraints.
//!
//! Groups are recorded as annotations on the member flags themselves: each
//! marking call appends the group's signature, the space-joined member
//! names in declaration order, under a kind-specific annotation key. A
//! group therefore travels with its flags and is enforced at whichever
//! command ends up resolving, but only when that command's merged view
//! contains every member.

use std::collections::{BTreeMap, HashSet};

use arbor_flagset::FlagRef;

use crate::complete::REQUIRED_FLAG_ANNOTATION;
use crate::error::{CommandError, Result};
use crate::tree::{CommandId, CommandTree};

pub(crate) const REQUIRED_TOGETHER_ANNOTATION: &str = "arbor_annotation_required_together";
pub(crate) const ONE_REQUIRED_ANNOTATION: &str = "arbor_annotation_one_required";
pub(crate) const MUTUALLY_EXCLUSIVE_ANNOTATION: &str = "arbor_annotation_mutually_exclusive";

type GroupStatus = BTreeMap<String, BTreeMap<String, bool>>;

impl CommandTree {
    /// Requires the named flags to be set together or not at all.
    ///
    /// Panics when any name is missing from `id`'s merged flag view.
    pub fn mark_flags_required_together(&mut self, id: CommandId, names: &[&str]) {
        self.mark_group(id, names, REQUIRED_TOGETHER_ANNOTATION, "required together");
    }

    /// Requires at least one of the named flags to be set.
    pub fn mark_flags_one_required(&mut self, id: CommandId, names: &[&str]) {
        self.mark_group(id, names, ONE_REQUIRED_ANNOTATION, "one required");
    }

    /// Forbids setting more than one of the named flags.
    pub fn mark_flags_mutually_exclusive(&mut self, id: CommandId, names: &[&str]) {
        self.mark_group(id, names, MUTUALLY_EXCLUSIVE_ANNOTATION, "mutually exclusive");
    }

    fn mark_group(&mut self, id: CommandId, names: &[&str], key: &str, kind: &str) {
        let signature = names.join(" ");
        for name in names {
            match self.lookup_flag(id, name) {
                Some(flag) => flag.append_annotation(key, &signature),
                None => panic!("failed to find flag --{name} to mark it as {kind}"),
            }
        }
    }

    /// Checks every group materialized in `id`'s merged view against the
    /// parsed flag state. Returns the first violation; the scan order is
    /// kind by kind, then group signature, so failures are deterministic.
    pub fn validate_flag_groups(&mut self, id: CommandId) -> Result<()> {
        if self.command(id).disable_flag_parsing() {
            return Ok(());
        }
        let (required_together, one_required, exclusive) = self.group_status(id);

        for (group, members) in &required_together {
            let missing: Vec<String> = members
                .iter()
                .filter(|(_, set)| !**set)
                .map(|(name, _)| name.clone())
                .collect();
            if missing.is_empty() || missing.len() == members.len() {
                continue;
            }
            return Err(CommandError::RequiredTogether {
                group: group.clone(),
                missing,
            });
        }

        for (group, members) in &one_required {
            if members.values().any(|set| *set) {
                continue;
            }
            return Err(CommandError::OneRequired {
                group: group.clone(),
            });
        }

        for (group, members) in &exclusive {
            let set: Vec<String> = members
                .iter()
                .filter(|(_, set)| **set)
                .map(|(name, _)| name.clone())
                .collect();
            if set.len() < 2 {
                continue;
            }
            return Err(CommandError::MutuallyExclusive {
                group: group.clone(),
                set,
            });
        }

        Ok(())
    }

    /// Biases completion toward satisfying group constraints: once a
    /// required-together or one-required group has a set member, its unset
    /// members are marked required so they surface first; once exactly one
    /// member of an exclusive group is set, the others are hidden.
    pub(crate) fn adjust_flag_groups_for_completion(&mut self, id: CommandId) {
        if self.command(id).disable_flag_parsing() {
            return;
        }
        let (required_together, one_required, exclusive) = self.group_status(id);

        for status in [&required_together, &one_required] {
            for (group, members) in status.iter() {
                if !members.values().any(|set| *set) {
                    continue;
                }
                for name in group.split(' ') {
                    if members.get(name) == Some(&false) {
                        if let Some(flag) = self.lookup_flag(id, name) {
                            flag.set_annotation(REQUIRED_FLAG_ANNOTATION, vec!["true".into()]);
                        }
                    }
                }
            }
        }

        for (group, members) in &exclusive {
            let set: Vec<&String> = members
                .iter()
                .filter(|(_, set)| **set)
                .map(|(name, _)| name)
                .collect();
            if set.len() != 1 {
                continue;
            }
            for name in group.split(' ') {
                if name != set[0].as_str() {
                    if let Some(flag) = self.lookup_flag(id, name) {
                        flag.set_hidden(true);
                    }
                }
            }
        }
    }

    fn group_status(&mut self, id: CommandId) -> (GroupStatus, GroupStatus, GroupStatus) {
        let flags: Vec<FlagRef> = self.full_flags(id).iter().cloned().collect();
        let names: HashSet<String> = flags.iter().map(|f| f.name()).collect();

        let mut required_together = GroupStatus::new();
        let mut one_required = GroupStatus::new();
        let mut exclusive = GroupStatus::new();
        for flag in &flags {
            collect_group_status(flag, &names, REQUIRED_TOGETHER_ANNOTATION, &mut required_together);
            collect_group_status(flag, &names, ONE_REQUIRED_ANNOTATION, &mut one_required);
            collect_group_status(flag, &names, MUTUALLY_EXCLUSIVE_ANNOTATION, &mut exclusive);
        }
        (required_together, one_required, exclusive)
    }
}

fn collect_group_status(
    flag: &FlagRef,
    visible: &HashSet<String>,
    key: &str,
    status: &mut GroupStatus,
) {
    let Some(groups) = flag.annotation(key) else {
        return;
    };
    for signature in groups {
        if !status.contains_key(&signature) {
            // A group only materializes where every member is visible.
            if !signature.split(' ').all(|m| visible.contains(m)) {
                continue;
            }
            status.insert(signature.clone(), BTreeMap::new());
        }
        status
            .get_mut(&signature)
            .unwrap()
            .insert(flag.name(), flag.changed());
    }
}
