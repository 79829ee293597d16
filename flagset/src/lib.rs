//! String-valued flag records and token parsing for the arbor command tree.
//!
//! This crate is the flag collaborator of [`arbor-core`]: it stores flag
//! declarations and raw string values, and splits argument vectors into
//! flag assignments and positionals. It never interprets values.
//!
//! - [`Flag`] — one declaration: name, shorthand, default, "no value"
//!   default, usage, visibility, annotations.
//! - [`FlagRef`] — shared handle; merged views alias the declaring set's
//!   storage, so an assignment anywhere is visible everywhere.
//! - [`FlagSet`] — ordered collection with name/shorthand lookup, merge
//!   via [`FlagSet::adopt`], and [`FlagSet::parse`].
//! - [`FlagError`] — structured parse and registration errors.
//!
//! # Example
//!
//! ```
//! use arbor_flagset::{Flag, FlagSet};
//!
//! let mut flags = FlagSet::new("deploy");
//! flags.add(Flag::switch("dry-run").with_usage("plan only"));
//! flags.add(Flag::valued("region", "eu-west-1").with_shorthand('r'));
//!
//! let args: Vec<String> = ["--dry-run", "-r", "us-east-2", "web"]
//!     .iter().map(|s| s.to_string()).collect();
//! flags.parse(&args).unwrap();
//!
//! assert_eq!(flags.lookup("region").unwrap().value(), "us-east-2");
//! assert!(flags.lookup("dry-run").unwrap().changed());
//! assert_eq!(flags.positionals(), ["web"]);
//! ```
//!
//! [`arbor-core`]: https://github.com/ex1tium/arbor

mod error;
mod flag;
mod parse;
mod set;

pub use error::{FlagError, Result};
pub use flag::{Flag, FlagId, FlagRef};
pub use set::FlagSet;
