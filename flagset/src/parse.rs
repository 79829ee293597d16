//! Token-stream parsing.
//!
//! Splits an argument vector into flag assignments and positionals:
//! `--name value`, `--name=value`, shorthand clusters (`-abc`, `-ovalue`,
//! `-o=value`, `-o value`), the `--` terminator, and bare-usable flags
//! with a "no value" default. Values stay strings; interpreting them is
//! the caller's business.

use tracing::debug;

use crate::error::{FlagError, Result};
use crate::flag::FlagRef;
use crate::set::FlagSet;

impl FlagSet {
    /// Parses an argument vector against this set.
    ///
    /// Tokens that assign flags mark them changed; everything else is
    /// collected in order as positionals, available from
    /// [`positionals`](FlagSet::positionals). A `--` token ends flag
    /// recognition for the rest of the line. Parsing may be repeated; the
    /// positional list is replaced each time while `changed` markers are
    /// kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_flagset::{Flag, FlagSet};
    ///
    /// let mut flags = FlagSet::new("demo");
    /// flags.add(Flag::switch("force").with_shorthand('f'));
    /// flags.add(Flag::valued("out", "").with_shorthand('o'));
    ///
    /// let args: Vec<String> = ["-f", "build", "--out=dist", "--", "--raw"]
    ///     .iter().map(|s| s.to_string()).collect();
    /// flags.parse(&args).unwrap();
    ///
    /// assert_eq!(flags.lookup("force").unwrap().value(), "true");
    /// assert_eq!(flags.lookup("out").unwrap().value(), "dist");
    /// assert_eq!(flags.positionals(), ["build", "--raw"]);
    /// ```
    pub fn parse(&mut self, args: &[String]) -> Result<()> {
        let mut positionals = Vec::new();
        let mut i = 0;
        while i < args.len() {
            let token = &args[i];
            i += 1;
            if token == "--" {
                positionals.extend(args[i..].iter().cloned());
                break;
            }
            if let Some(long) = token.strip_prefix("--") {
                self.parse_long(token, long, args, &mut i)?;
            } else if token.len() > 1 && token.starts_with('-') {
                self.parse_shorthands(&token[1..], args, &mut i)?;
            } else {
                positionals.push(token.clone());
            }
        }
        debug!(set = self.name(), positionals = positionals.len(), "parsed argument vector");
        self.set_parsed(positionals);
        Ok(())
    }

    fn parse_long(&self, token: &str, long: &str, args: &[String], i: &mut usize) -> Result<()> {
        if long.is_empty() || long.starts_with('-') || long.starts_with('=') {
            return Err(FlagError::BadSyntax(token.to_string()));
        }
        if let Some((name, value)) = long.split_once('=') {
            let flag = self
                .lookup(name)
                .ok_or_else(|| FlagError::UnknownFlag(name.to_string()))?;
            flag.assign(value);
            note_deprecated(&flag);
            return Ok(());
        }
        let flag = self
            .lookup(long)
            .ok_or_else(|| FlagError::UnknownFlag(long.to_string()))?;
        if let Some(bare) = flag.no_value_default() {
            flag.assign(bare);
        } else if *i < args.len() {
            flag.assign(args[*i].clone());
            *i += 1;
        } else {
            return Err(FlagError::NeedsArgument(long.to_string()));
        }
        note_deprecated(&flag);
        Ok(())
    }

    fn parse_shorthands(&self, cluster: &str, args: &[String], i: &mut usize) -> Result<()> {
        let chars: Vec<char> = cluster.chars().collect();
        let mut pos = 0;
        while pos < chars.len() {
            let c = chars[pos];
            let remaining: String = chars[pos..].iter().collect();
            let flag = self
                .shorthand_lookup(c)
                .ok_or_else(|| FlagError::UnknownShorthand(c, remaining.clone()))?;
            let rest: String = chars[pos + 1..].iter().collect();

            if let Some(value) = rest.strip_prefix('=') {
                flag.assign(value);
                note_deprecated(&flag);
                return Ok(());
            }
            if let Some(bare) = flag.no_value_default() {
                flag.assign(bare);
                note_deprecated(&flag);
                pos += 1;
                continue;
            }
            if !rest.is_empty() {
                flag.assign(rest);
                note_deprecated(&flag);
                return Ok(());
            }
            if *i < args.len() {
                flag.assign(args[*i].clone());
                *i += 1;
                note_deprecated(&flag);
                return Ok(());
            }
            return Err(FlagError::ShorthandNeedsArgument(c, remaining));
        }
        Ok(())
    }
}

fn note_deprecated(flag: &FlagRef) {
    if let Some(message) = flag.deprecated() {
        eprintln!("Flag --{} has been deprecated, {}", flag.name(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::Flag;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn demo_set() -> FlagSet {
        let mut set = FlagSet::new("demo");
        set.add(Flag::switch("verbose").with_shorthand('v'));
        set.add(Flag::valued("port", "8080").with_shorthand('p'));
        set.add(Flag::valued("out", ""));
        set
    }

    #[test]
    fn test_long_flag_consumes_next_token() {
        let mut set = demo_set();
        set.parse(&argv(&["--port", "9090", "status"])).unwrap();
        assert_eq!(set.lookup("port").unwrap().value(), "9090");
        assert_eq!(set.positionals(), ["status"]);
    }

    #[test]
    fn test_long_flag_equals_form() {
        let mut set = demo_set();
        set.parse(&argv(&["--port=9090", "--verbose=false"])).unwrap();
        assert_eq!(set.lookup("port").unwrap().value(), "9090");
        assert_eq!(set.lookup("verbose").unwrap().value(), "false");
        assert!(set.lookup("verbose").unwrap().changed());
    }

    #[test]
    fn test_switch_without_value() {
        let mut set = demo_set();
        set.parse(&argv(&["--verbose", "status"])).unwrap();
        assert_eq!(set.lookup("verbose").unwrap().value(), "true");
        assert_eq!(set.positionals(), ["status"]);
    }

    #[test]
    fn test_shorthand_cluster() {
        let mut set = demo_set();
        set.parse(&argv(&["-vp9090"])).unwrap();
        assert_eq!(set.lookup("verbose").unwrap().value(), "true");
        assert_eq!(set.lookup("port").unwrap().value(), "9090");
    }

    #[test]
    fn test_shorthand_separate_and_equals_values() {
        let mut set = demo_set();
        set.parse(&argv(&["-p", "7000"])).unwrap();
        assert_eq!(set.lookup("port").unwrap().value(), "7000");

        let mut set = demo_set();
        set.parse(&argv(&["-p=7001"])).unwrap();
        assert_eq!(set.lookup("port").unwrap().value(), "7001");
    }

    #[test]
    fn test_double_dash_terminates() {
        let mut set = demo_set();
        set.parse(&argv(&["--verbose", "--", "--port", "9090"])).unwrap();
        assert!(set.lookup("verbose").unwrap().changed());
        assert!(!set.lookup("port").unwrap().changed());
        assert_eq!(set.positionals(), ["--port", "9090"]);
    }

    #[test]
    fn test_single_dash_is_positional() {
        let mut set = demo_set();
        set.parse(&argv(&["-", "x"])).unwrap();
        assert_eq!(set.positionals(), ["-", "x"]);
    }

    #[test]
    fn test_unknown_flag_errors() {
        let mut set = demo_set();
        let err = set.parse(&argv(&["--nope"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: --nope");

        let mut set = demo_set();
        let err = set.parse(&argv(&["-vx"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown shorthand flag: 'x' in -x");
    }

    #[test]
    fn test_missing_value_errors() {
        let mut set = demo_set();
        let err = set.parse(&argv(&["--port"])).unwrap_err();
        assert_eq!(err.to_string(), "flag needs an argument: --port");

        let mut set = demo_set();
        let err = set.parse(&argv(&["-p"])).unwrap_err();
        assert_eq!(err.to_string(), "flag needs an argument: 'p' in -p");
    }

    #[test]
    fn test_bad_syntax() {
        let mut set = demo_set();
        assert!(set.parse(&argv(&["---x"])).is_err());
        let mut set = demo_set();
        assert!(set.parse(&argv(&["--=v"])).is_err());
    }

    #[test]
    fn test_changed_survives_reparse() {
        let mut set = demo_set();
        set.parse(&argv(&["--port", "9090"])).unwrap();
        assert!(set.lookup("port").unwrap().changed());
        set.parse(&argv(&["status"])).unwrap();
        assert!(set.lookup("port").unwrap().changed());
        assert_eq!(set.positionals(), ["status"]);
    }

    #[test]
    fn test_flag_value_may_look_like_flag() {
        let mut set = demo_set();
        set.parse(&argv(&["--out", "--verbose"])).unwrap();
        assert_eq!(set.lookup("out").unwrap().value(), "--verbose");
        assert!(!set.lookup("verbose").unwrap().changed());
    }

    #[test]
    fn test_deprecated_flag_still_parses() {
        let mut set = FlagSet::new("demo");
        set.add(Flag::switch("legacy").with_deprecated("use --modern"));
        set.parse(&argv(&["--legacy"])).unwrap();
        assert!(set.lookup("legacy").unwrap().changed());
    }
}
