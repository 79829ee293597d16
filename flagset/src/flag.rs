//! Flag records and shared flag handles.
//!
//! A [`Flag`] is a string-valued record: it stores the raw text the parser
//! assigned to it plus the metadata the resolution and completion layers
//! need (shorthand, "no value" default, annotations, visibility). Value
//! typing and coercion are deliberately left to the embedding program.
//!
//! Flags are shared between the set that declared them and any merged view
//! built on top, so a parse at one level of a command tree is visible
//! through every view. [`FlagRef`] is the shared handle.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FLAG_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a single flag declaration.
///
/// Two [`FlagRef`] handles compare equal exactly when they alias the same
/// declaration, regardless of which set or merged view they were obtained
/// from. Used as the key for per-flag completion hook registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagId(u64);

impl FlagId {
    fn next() -> Self {
        FlagId(NEXT_FLAG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single named flag.
///
/// Create with [`Flag::switch`] (value optional, toggles to a fixed text
/// when named bare) or [`Flag::valued`] (consumes the following token),
/// then chain `with_*` builder methods before adding the flag to a
/// [`FlagSet`](crate::FlagSet).
///
/// # Examples
///
/// ```
/// use arbor_flagset::Flag;
///
/// let verbose = Flag::switch("verbose")
///     .with_shorthand('v')
///     .with_usage("enable verbose output");
/// assert_eq!(verbose.name, "verbose");
/// assert_eq!(verbose.no_value_default.as_deref(), Some("true"));
///
/// let output = Flag::valued("output", "-").with_shorthand('o');
/// assert!(output.no_value_default.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Flag {
    /// Long name, without the leading dashes.
    pub name: String,
    /// Optional single-character shorthand.
    pub shorthand: Option<char>,
    /// One-line usage text, shown in completion descriptions.
    pub usage: String,
    /// Default value, kept for display and reset purposes.
    pub def_value: String,
    /// Current value as assigned by the last parse.
    pub value: String,
    /// Value applied when the flag is named without a value. `None` means
    /// the flag always consumes the following token.
    pub no_value_default: Option<String>,
    /// Set to true the first time a parse assigns this flag. Never reset
    /// except by discarding the flag set and re-parsing from scratch.
    pub changed: bool,
    /// Hidden flags parse normally but are excluded from completion.
    pub hidden: bool,
    /// Deprecation message, printed when the flag is used.
    pub deprecated: Option<String>,
    /// Free-form annotation map: key to ordered list of values.
    pub annotations: BTreeMap<String, Vec<String>>,
}

impl Flag {
    /// Creates a switch: a flag usable without a value, defaulting the
    /// value to `"true"` when named bare.
    pub fn switch(name: impl Into<String>) -> Self {
        Self::build(name.into(), "false".to_string(), Some("true".to_string()))
    }

    /// Creates a value-consuming flag with the given default.
    pub fn valued(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::build(name.into(), default.into(), None)
    }

    fn build(name: String, def_value: String, no_value_default: Option<String>) -> Self {
        Flag {
            name,
            shorthand: None,
            usage: String::new(),
            value: def_value.clone(),
            def_value,
            no_value_default,
            changed: false,
            hidden: false,
            deprecated: None,
            annotations: BTreeMap::new(),
        }
    }

    /// Sets the single-character shorthand.
    pub fn with_shorthand(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Overrides the value applied when the flag is named without a value.
    pub fn with_no_value_default(mut self, value: impl Into<String>) -> Self {
        self.no_value_default = Some(value.into());
        self
    }

    /// Hides the flag from completion output.
    pub fn with_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Marks the flag deprecated with the given notice.
    pub fn with_deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    /// True when naming the flag bare is enough (no following token).
    pub fn is_bare_usable(&self) -> bool {
        self.no_value_default.is_some()
    }
}

/// Shared handle to a [`Flag`].
///
/// Handles are cheap to clone and alias the same underlying record; a
/// value assigned through one handle is observed through all of them.
/// Equality ([`FlagRef::is`]) is identity, not field comparison.
#[derive(Debug, Clone)]
pub struct FlagRef {
    id: FlagId,
    inner: Rc<RefCell<Flag>>,
}

impl FlagRef {
    pub(crate) fn new(flag: Flag) -> Self {
        FlagRef {
            id: FlagId::next(),
            inner: Rc::new(RefCell::new(flag)),
        }
    }

    /// Stable identity of the underlying declaration.
    pub fn id(&self) -> FlagId {
        self.id
    }

    /// True when both handles alias the same declaration.
    pub fn is(&self, other: &FlagRef) -> bool {
        self.id == other.id
    }

    /// Long name, without dashes.
    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    pub fn shorthand(&self) -> Option<char> {
        self.inner.borrow().shorthand
    }

    pub fn usage(&self) -> String {
        self.inner.borrow().usage.clone()
    }

    pub fn default_value(&self) -> String {
        self.inner.borrow().def_value.clone()
    }

    /// Current value text as of the last parse (or the default).
    pub fn value(&self) -> String {
        self.inner.borrow().value.clone()
    }

    /// Whether any parse has assigned this flag.
    pub fn changed(&self) -> bool {
        self.inner.borrow().changed
    }

    pub fn hidden(&self) -> bool {
        self.inner.borrow().hidden
    }

    pub fn deprecated(&self) -> Option<String> {
        self.inner.borrow().deprecated.clone()
    }

    /// The "no value" default, when the flag is usable bare.
    pub fn no_value_default(&self) -> Option<String> {
        self.inner.borrow().no_value_default.clone()
    }

    /// True when a token naming this flag consumes the following token.
    pub fn expects_value(&self) -> bool {
        self.inner.borrow().no_value_default.is_none()
    }

    /// Assigns a value and marks the flag changed.
    pub fn assign(&self, value: impl Into<String>) {
        let mut flag = self.inner.borrow_mut();
        flag.value = value.into();
        flag.changed = true;
    }

    /// Annotation values for `key`, if any.
    pub fn annotation(&self, key: &str) -> Option<Vec<String>> {
        self.inner.borrow().annotations.get(key).cloned()
    }

    /// True when the annotation key is present, even with an empty list.
    pub fn has_annotation(&self, key: &str) -> bool {
        self.inner.borrow().annotations.contains_key(key)
    }

    /// Replaces the annotation values for `key`.
    pub fn set_annotation(&self, key: impl Into<String>, values: Vec<String>) {
        self.inner
            .borrow_mut()
            .annotations
            .insert(key.into(), values);
    }

    /// Appends one value to the annotation list for `key`.
    pub fn append_annotation(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner
            .borrow_mut()
            .annotations
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// Hides or reveals the flag in completion output.
    pub fn set_hidden(&self, hidden: bool) {
        self.inner.borrow_mut().hidden = hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_defaults() {
        let flag = Flag::switch("verbose").with_shorthand('v');
        assert_eq!(flag.def_value, "false");
        assert_eq!(flag.no_value_default.as_deref(), Some("true"));
        assert!(flag.is_bare_usable());
        assert!(!flag.changed);
    }

    #[test]
    fn test_valued_expects_value() {
        let flag = FlagRef::new(Flag::valued("output", "out.txt"));
        assert!(flag.expects_value());
        assert_eq!(flag.value(), "out.txt");
        assert_eq!(flag.default_value(), "out.txt");
    }

    #[test]
    fn test_assign_marks_changed() {
        let flag = FlagRef::new(Flag::valued("output", ""));
        assert!(!flag.changed());
        flag.assign("a.txt");
        assert!(flag.changed());
        assert_eq!(flag.value(), "a.txt");
        // Assigning again keeps the changed marker.
        flag.assign("b.txt");
        assert!(flag.changed());
    }

    #[test]
    fn test_identity_is_shared_across_clones() {
        let flag = FlagRef::new(Flag::switch("force"));
        let alias = flag.clone();
        assert!(flag.is(&alias));
        alias.assign("true");
        assert!(flag.changed());

        let other = FlagRef::new(Flag::switch("force"));
        assert!(!flag.is(&other));
    }

    #[test]
    fn test_annotations() {
        let flag = FlagRef::new(Flag::valued("config", ""));
        assert!(!flag.has_annotation("ext"));
        flag.set_annotation("ext", vec!["yaml".into(), "json".into()]);
        assert_eq!(flag.annotation("ext").unwrap(), vec!["yaml", "json"]);
        flag.append_annotation("ext", "toml");
        assert_eq!(flag.annotation("ext").unwrap().len(), 3);

        flag.set_annotation("dirs", Vec::new());
        assert!(flag.has_annotation("dirs"));
        assert!(flag.annotation("dirs").unwrap().is_empty());
    }
}
