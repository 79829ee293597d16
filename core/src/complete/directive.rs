//! Bit flags that tell a shell integration how to treat a set of
//! completion candidates.
//!
//! Directives combine with `|` and travel on the final line of the
//! completion protocol as a decimal number prefixed with `:`.
//!
//! # Example
//!
//! ```
//! use arbor_core::complete::Directive;
//!
//! let directive = Directive::NO_SPACE | Directive::NO_FILE_COMP;
//! assert_eq!(directive.bits(), 6);
//! assert!(directive.contains(Directive::NO_SPACE));
//! assert_eq!(directive.to_string(), "NoSpace, NoFileComp");
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Instructions for the shell about how to handle completion results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Directive(u32);

impl Directive {
    /// No special instructions: the shell falls back to file completion
    /// when no candidates are returned.
    pub const DEFAULT: Directive = Directive(0);

    /// An error occurred; the shell ignores the candidates entirely.
    pub const ERROR: Directive = Directive(1);

    /// Do not append a space after an inserted candidate.
    pub const NO_SPACE: Directive = Directive(1 << 1);

    /// Do not fall back to file completion when no candidates match.
    pub const NO_FILE_COMP: Directive = Directive(1 << 2);

    /// Candidates are file extensions to filter file completion with.
    pub const FILTER_FILE_EXT: Directive = Directive(1 << 3);

    /// Complete directory names only, optionally within a single
    /// candidate naming the directory to search.
    pub const FILTER_DIRS: Directive = Directive(1 << 4);

    /// Present candidates in the order provided instead of sorting.
    pub const KEEP_ORDER: Directive = Directive(1 << 5);

    /// The raw bit representation written on the protocol's `:` line.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Reports whether every bit of `other` is set in `self`.
    pub fn contains(self, other: Directive) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reports whether no bits are set.
    pub fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Directive {
    type Output = Directive;

    fn bitor(self, rhs: Directive) -> Directive {
        Directive(self.0 | rhs.0)
    }
}

impl BitOrAssign for Directive {
    fn bitor_assign(&mut self, rhs: Directive) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Directive, &str); 6] = [
            (Directive::ERROR, "Error"),
            (Directive::NO_SPACE, "NoSpace"),
            (Directive::NO_FILE_COMP, "NoFileComp"),
            (Directive::FILTER_FILE_EXT, "FilterFileExt"),
            (Directive::FILTER_DIRS, "FilterDirs"),
            (Directive::KEEP_ORDER, "KeepOrder"),
        ];

        if self.is_default() {
            return f.write_str("Default");
        }
        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_values() {
        assert_eq!(Directive::DEFAULT.bits(), 0);
        assert_eq!(Directive::ERROR.bits(), 1);
        assert_eq!(Directive::NO_SPACE.bits(), 2);
        assert_eq!(Directive::NO_FILE_COMP.bits(), 4);
        assert_eq!(Directive::FILTER_FILE_EXT.bits(), 8);
        assert_eq!(Directive::FILTER_DIRS.bits(), 16);
        assert_eq!(Directive::KEEP_ORDER.bits(), 32);
    }

    #[test]
    fn test_combination() {
        let d = Directive::NO_SPACE | Directive::NO_FILE_COMP;
        assert_eq!(d.bits(), 6);
        assert!(d.contains(Directive::NO_SPACE));
        assert!(d.contains(Directive::NO_FILE_COMP));
        assert!(!d.contains(Directive::ERROR));
        assert!(!d.is_default());
    }

    #[test]
    fn test_contains_requires_all_bits() {
        let d = Directive::NO_SPACE;
        assert!(!d.contains(Directive::NO_SPACE | Directive::ERROR));
        assert!(d.contains(Directive::DEFAULT));
    }

    #[test]
    fn test_display() {
        assert_eq!(Directive::DEFAULT.to_string(), "Default");
        assert_eq!(Directive::ERROR.to_string(), "Error");
        assert_eq!(
            (Directive::NO_FILE_COMP | Directive::KEEP_ORDER).to_string(),
            "NoFileComp, KeepOrder"
        );
        assert_eq!(
            (Directive::ERROR | Directive::NO_SPACE | Directive::FILTER_DIRS).to_string(),
            "Error, NoSpace, FilterDirs"
        );
    }

    #[test]
    fn test_or_assign() {
        let mut d = Directive::DEFAULT;
        d |= Directive::NO_FILE_COMP;
        d |= Directive::NO_SPACE;
        assert_eq!(d, Directive::NO_SPACE | Directive::NO_FILE_COMP);
    }
}
