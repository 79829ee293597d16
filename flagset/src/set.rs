//! Ordered flag collections with name and shorthand indexes.

use std::collections::HashMap;

use crate::error::{FlagError, Result};
use crate::flag::{Flag, FlagRef};

/// An ordered collection of flags.
///
/// A set either owns its declarations (command-local or persistent flags)
/// or is a merged view assembled from other sets via [`FlagSet::adopt`];
/// in both cases entries are shared [`FlagRef`] handles, so merged views
/// observe parses performed anywhere.
///
/// # Examples
///
/// ```
/// use arbor_flagset::{Flag, FlagSet};
///
/// let mut flags = FlagSet::new("serve");
/// flags.add(Flag::switch("verbose").with_shorthand('v'));
/// flags.add(Flag::valued("port", "8080").with_usage("listen port"));
///
/// let args = vec!["--port".to_string(), "9090".to_string()];
/// flags.parse(&args).unwrap();
/// assert_eq!(flags.lookup("port").unwrap().value(), "9090");
/// assert!(!flags.lookup("verbose").unwrap().changed());
/// ```
#[derive(Debug, Default)]
pub struct FlagSet {
    name: String,
    entries: Vec<FlagRef>,
    by_name: HashMap<String, usize>,
    by_shorthand: HashMap<char, usize>,
    sort_flags: bool,
    parsed: bool,
    positionals: Vec<String>,
}

impl FlagSet {
    /// Creates an empty set. `name` labels the owning command in messages.
    pub fn new(name: impl Into<String>) -> Self {
        FlagSet {
            name: name.into(),
            entries: Vec::new(),
            by_name: HashMap::new(),
            by_shorthand: HashMap::new(),
            sort_flags: true,
            parsed: false,
            positionals: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a new flag, returning its shared handle.
    ///
    /// # Panics
    ///
    /// Panics when the name or shorthand is already taken. Flag
    /// declarations are wiring, not input.
    pub fn add(&mut self, flag: Flag) -> FlagRef {
        if self.by_name.contains_key(&flag.name) {
            panic!("flag redefined: {}", flag.name);
        }
        if let Some(c) = flag.shorthand {
            if let Some(&idx) = self.by_shorthand.get(&c) {
                panic!(
                    "shorthand {:?} of flag --{} is already in use by --{}",
                    c,
                    flag.name,
                    self.entries[idx].name()
                );
            }
        }
        let handle = FlagRef::new(flag);
        self.index(handle.clone());
        handle
    }

    /// Adds a shared handle from another set, skipping names already
    /// present. Returns true when the handle was added.
    ///
    /// This is the merge primitive: a nearer declaration added first
    /// shadows any farther one offered later under the same name.
    pub fn adopt(&mut self, flag: &FlagRef) -> bool {
        if self.by_name.contains_key(&flag.name()) {
            return false;
        }
        if let Some(c) = flag.shorthand() {
            if self.by_shorthand.contains_key(&c) {
                // Name is new but the shorthand is taken; keep the flag
                // reachable by long name only.
                let idx = self.entries.len();
                self.by_name.insert(flag.name(), idx);
                self.entries.push(flag.clone());
                return true;
            }
        }
        self.index(flag.clone());
        true
    }

    /// Adopts every flag of `other` not already present, in order.
    pub fn adopt_all(&mut self, other: &FlagSet) {
        for flag in &other.entries {
            self.adopt(flag);
        }
    }

    fn index(&mut self, flag: FlagRef) {
        let idx = self.entries.len();
        self.by_name.insert(flag.name(), idx);
        if let Some(c) = flag.shorthand() {
            self.by_shorthand.insert(c, idx);
        }
        self.entries.push(flag);
    }

    /// Looks a flag up by long name.
    pub fn lookup(&self, name: &str) -> Option<FlagRef> {
        self.by_name.get(name).map(|&i| self.entries[i].clone())
    }

    /// Looks a flag up by shorthand character.
    pub fn shorthand_lookup(&self, shorthand: char) -> Option<FlagRef> {
        self.by_shorthand
            .get(&shorthand)
            .map(|&i| self.entries[i].clone())
    }

    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagRef> {
        self.entries.iter()
    }

    /// Visits every flag: lexically by name when sorting is on (the
    /// default), declaration order otherwise.
    pub fn visit_all(&self, mut visit: impl FnMut(&FlagRef)) {
        if self.sort_flags {
            let mut sorted: Vec<&FlagRef> = self.entries.iter().collect();
            sorted.sort_by_key(|f| f.name());
            for flag in sorted {
                visit(flag);
            }
        } else {
            for flag in &self.entries {
                visit(flag);
            }
        }
    }

    pub fn sort_flags(&self) -> bool {
        self.sort_flags
    }

    pub fn set_sort_flags(&mut self, sort: bool) {
        self.sort_flags = sort;
    }

    /// Replaces the annotation values of a named flag.
    pub fn set_annotation(&self, name: &str, key: &str, values: Vec<String>) -> Result<()> {
        match self.lookup(name) {
            Some(flag) => {
                flag.set_annotation(key, values);
                Ok(())
            }
            None => Err(FlagError::NoSuchFlag(name.to_string())),
        }
    }

    /// Hides a named flag from completion output.
    pub fn mark_hidden(&self, name: &str) -> Result<()> {
        match self.lookup(name) {
            Some(flag) => {
                flag.set_hidden(true);
                Ok(())
            }
            None => Err(FlagError::NoSuchFlag(name.to_string())),
        }
    }

    /// Whether [`parse`](crate::FlagSet::parse) has run on this set.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Leftover positional tokens from the last parse.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub(crate) fn set_parsed(&mut self, positionals: Vec<String>) {
        self.parsed = true;
        self.positionals = positionals;
    }
}
