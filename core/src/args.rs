//! Positional-argument rules.
//!
//! Each rule is a shared closure over the hook context; the driver runs
//! the resolved command's rule against its leftover positionals before any
//! lifecycle hook fires. Rules compose through [`match_all`].
//!
//! # Example
//!
//! ```
//! use arbor_core::{args, Command};
//!
//! let cmd = Command::new("copy <src> <dst>")
//!     .with_args(args::exact_args(2));
//! ```

use std::rc::Rc;

use crate::error::{CommandError, Result};
use crate::hooks::CommandContext;

/// A positional-argument rule.
pub type PositionalArgs = Rc<dyn Fn(&CommandContext<'_>) -> Result<()>>;

/// Accepts any argument list.
pub fn arbitrary_args() -> PositionalArgs {
    Rc::new(|_| Ok(()))
}

/// Rejects every positional argument.
pub fn no_args() -> PositionalArgs {
    Rc::new(|ctx| match ctx.args().first() {
        Some(first) => Err(CommandError::UnknownCommand {
            name: first.clone(),
            path: ctx.path(),
            suggestions: Vec::new(),
        }),
        None => Ok(()),
    })
}

/// Requires every positional to appear in the command's fixed vocabulary.
/// Entries may carry a tab-separated description, which is ignored here.
pub fn only_valid_args() -> PositionalArgs {
    Rc::new(|ctx| {
        let valid: Vec<&str> = ctx
            .command()
            .valid_args()
            .iter()
            .map(|v| v.split('\t').next().unwrap_or_default())
            .collect();
        if valid.is_empty() {
            return Ok(());
        }
        for arg in ctx.args() {
            if !valid.contains(&arg.as_str()) {
                return Err(CommandError::InvalidArgument {
                    arg: arg.clone(),
                    path: ctx.path(),
                    suggestions: ctx.tree().suggestions_for(ctx.id(), &ctx.args()[0]),
                });
            }
        }
        Ok(())
    })
}

/// Requires at least `n` positionals.
pub fn minimum_args(n: usize) -> PositionalArgs {
    Rc::new(move |ctx| {
        let received = ctx.args().len();
        if received < n {
            return Err(CommandError::MinimumArgs {
                required: n,
                received,
            });
        }
        Ok(())
    })
}

/// Allows at most `n` positionals.
pub fn maximum_args(n: usize) -> PositionalArgs {
    Rc::new(move |ctx| {
        let received = ctx.args().len();
        if received > n {
            return Err(CommandError::MaximumArgs { limit: n, received });
        }
        Ok(())
    })
}

/// Requires exactly `n` positionals.
pub fn exact_args(n: usize) -> PositionalArgs {
    Rc::new(move |ctx| {
        let received = ctx.args().len();
        if received != n {
            return Err(CommandError::ExactArgs {
                expected: n,
                received,
            });
        }
        Ok(())
    })
}

/// Requires between `min` and `max` positionals inclusive.
pub fn range_args(min: usize, max: usize) -> PositionalArgs {
    Rc::new(move |ctx| {
        let received = ctx.args().len();
        if received < min || received > max {
            return Err(CommandError::RangeArgs { min, max, received });
        }
        Ok(())
    })
}

/// Passes only when every given rule passes, checked in order.
pub fn match_all(rules: Vec<PositionalArgs>) -> PositionalArgs {
    Rc::new(move |ctx| {
        for rule in &rules {
            rule(ctx)?;
        }
        Ok(())
    })
}
