//! Command-tree resolution, flag inheritance, and execution.
//!
//! This crate models a CLI program as a tree of commands and turns an
//! argument vector into a resolved command, parsed flags, and leftover
//! positionals:
//!
//! - [`Command`] — one node: use line, aliases, flags, lifecycle hooks,
//!   positional-argument rules, and completion metadata.
//! - [`CommandTree`] — the arena that owns every node. Resolves argument
//!   vectors ([`find`](CommandTree::find), [`traverse`](CommandTree::traverse),
//!   [`locate`](CommandTree::locate)), parses flags through the inherited
//!   view, and drives the hook pipeline ([`execute`](CommandTree::execute)).
//! - [`Flag`], [`FlagSet`] — the flag model, re-exported from the
//!   `arbor-flagset` crate. Persistent flags declared on a command are
//!   visible to its whole subtree.
//! - [`args`] — positional-argument rules ([`args::exact_args`],
//!   [`args::minimum_args`], and friends) attached per command.
//! - [`complete`] — shell completion: typed candidates, reply
//!   [`Directive`](complete::Directive) bits, and the hidden `__complete`
//!   request command.
//!
//! Unknown command words produce "did you mean this?" suggestions based
//! on edit distance, and flags can be constrained in groups (required
//! together, one required, mutually exclusive).
//!
//! # Example
//!
//! ```
//! use arbor_core::*;
//!
//! let mut tree = CommandTree::new(
//!     Command::new("mycli")
//!         .with_persistent_flag(Flag::switch("verbose").with_shorthand('v')),
//! );
//! let root = tree.root_id();
//! tree.add_command(
//!     root,
//!     Command::new("serve [port]")
//!         .with_short("Start the server")
//!         .with_run(|ctx| {
//!             assert!(ctx.flag_changed("verbose"));
//!             Ok(())
//!         }),
//! );
//!
//! let args: Vec<String> = ["-v", "serve", "8080"]
//!     .iter().map(|s| s.to_string()).collect();
//! let target = tree.execute(&args).unwrap();
//! assert_eq!(tree.name(target), "serve");
//! assert_eq!(tree.parsed_args(target), ["8080"]);
//! ```

pub mod args;
mod command;
pub mod complete;
mod error;
mod exec;
mod groups;
pub mod hooks;
mod merge;
mod resolve;
mod suggest;
mod tree;

pub use arbor_flagset::{Flag, FlagError, FlagRef, FlagSet};
pub use command::{Command, Group};
pub use error::{CommandError, Result};
pub use tree::{CommandId, CommandTree, TreeConfig};
