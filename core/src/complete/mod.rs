//! Programmatic shell completion.
//!
//! Instead of generating static completion scripts, the program answers
//! completion requests itself. A shell integration invokes the hidden
//! [`COMPLETE_COMMAND_NAME`] subcommand with the words typed so far; the
//! engine resolves the partial command line, inspects flags and
//! subcommands, consults any registered hooks, and prints one candidate
//! per line followed by a `:<directive>` trailer:
//!
//! ```text
//! $ tool __complete remote ""
//! add	Add a remote
//! remove	Remove a remote
//! :4
//! ```
//!
//! Candidates carry optional descriptions after a tab. [`Directive`]
//! bits tell the shell how to post-process the list. Active-help lines
//! travel in the same stream, tagged with [`ACTIVE_HELP_MARKER`].
//!
//! # Example
//!
//! ```
//! use arbor_core::{Command, CommandTree};
//! use arbor_core::complete::Directive;
//!
//! let mut tree = CommandTree::new(Command::new("vault"));
//! let root = tree.root_id();
//! tree.add_command(
//!     root,
//!     Command::new("seal").with_short("Seal the vault").with_run(|_| Ok(())),
//! );
//! tree.add_command(
//!     root,
//!     Command::new("status").with_short("Show seal status").with_run(|_| Ok(())),
//! );
//!
//! let result = tree.complete(&["se".into()]);
//! let names: Vec<&str> = result.completions.candidates().map(|c| c.value.as_str()).collect();
//! assert_eq!(names, ["seal"]);
//! assert_eq!(result.directive, Directive::NO_FILE_COMP);
//! ```

mod active_help;
mod directive;
mod engine;
pub(crate) mod env;
mod registry;

pub use active_help::ACTIVE_HELP_MARKER;
pub use directive::Directive;

pub(crate) use active_help::ACTIVE_HELP_DISABLE;
pub(crate) use registry::CompletionRegistry;

use arbor_flagset::FlagError;

use crate::error::Result;
use crate::hooks::CommandContext;
use crate::tree::{CommandId, CommandTree};

/// Name of the hidden subcommand shells invoke to request completions.
pub const COMPLETE_COMMAND_NAME: &str = "__complete";

/// Alias of the request command that strips candidate descriptions, for
/// shells that cannot display them.
pub const COMPLETE_NO_DESC_COMMAND_NAME: &str = "__completeNoDesc";

/// Flag annotation marking a flag the user must set.
pub(crate) const REQUIRED_FLAG_ANNOTATION: &str = "arbor_annotation_required";

/// Flag annotation listing file extensions its value completes to.
pub(crate) const FILENAME_EXT_ANNOTATION: &str = "arbor_annotation_filename_ext";

/// Flag annotation restricting its value completion to directories.
pub(crate) const DIR_ONLY_ANNOTATION: &str = "arbor_annotation_dir_only";

/// Flag annotation identifying the automatically injected `--help` and
/// `--version` flags.
pub(crate) const AUTO_FLAG_ANNOTATION: &str = "arbor_annotation_auto_flag";

/// A single completion choice with an optional one-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub description: Option<String>,
}

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        Candidate { value: value.into(), description: None }
    }

    pub fn with_description(value: impl Into<String>, description: impl Into<String>) -> Self {
        Candidate { value: value.into(), description: Some(description.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Candidate(Candidate),
    ActiveHelp(String),
}

/// An ordered list of completion candidates and active-help messages.
///
/// Hooks build one of these and hand it back together with a
/// [`Directive`]; the protocol printer renders it line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    entries: Vec<Entry>,
}

impl Completions {
    /// Appends a candidate without a description.
    pub fn push(&mut self, value: impl Into<String>) {
        self.entries.push(Entry::Candidate(Candidate::new(value)));
    }

    /// Appends a candidate, attaching `description` unless it is empty.
    pub fn push_with_description(
        &mut self,
        value: impl Into<String>,
        description: impl Into<String>,
    ) {
        let description = description.into();
        let candidate = if description.is_empty() {
            Candidate::new(value)
        } else {
            Candidate::with_description(value, description)
        };
        self.entries.push(Entry::Candidate(candidate));
    }

    pub fn push_candidate(&mut self, candidate: Candidate) {
        self.entries.push(Entry::Candidate(candidate));
    }

    /// Appends a hint shown to the user without being insertable.
    pub fn add_active_help(&mut self, message: impl Into<String>) {
        self.entries.push(Entry::ActiveHelp(message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates the candidates, skipping active-help entries.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Candidate(candidate) => Some(candidate),
            Entry::ActiveHelp(_) => None,
        })
    }

    pub(crate) fn extend(&mut self, other: Completions) {
        self.entries.extend(other.entries);
    }

    /// Renders the protocol lines: tab-separated descriptions, one line
    /// per entry, truncated to the first line and trimmed.
    pub fn render(&self, no_descriptions: bool, no_active_help: bool) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let raw = match entry {
                Entry::Candidate(candidate) => match &candidate.description {
                    Some(description) => format!("{}\t{}", candidate.value, description),
                    None => candidate.value.clone(),
                },
                Entry::ActiveHelp(message) => {
                    if no_active_help {
                        continue;
                    }
                    format!("{ACTIVE_HELP_MARKER}{message}")
                }
            };
            let line = if no_descriptions {
                raw.split('\t').next().unwrap_or_default()
            } else {
                raw.as_str()
            };
            let line = line.lines().next().unwrap_or_default().trim();
            lines.push(line.to_string());
        }
        lines
    }
}

/// Everything the engine computed for one completion request.
#[derive(Debug)]
pub struct CompletionResult {
    /// The deepest command the typed words resolved to.
    pub target: CommandId,
    pub completions: Completions,
    pub directive: Directive,
    /// A failure the engine absorbed while still producing a usable
    /// directive, reported to the user out of band.
    pub diagnostic: Option<crate::error::CommandError>,
}

/// Builds a hook that always proposes the same candidates.
///
/// # Examples
///
/// ```
/// use arbor_core::complete::{fixed_completions, Candidate, Directive};
///
/// let hook = fixed_completions(
///     vec![Candidate::new("table"), Candidate::with_description("json", "machine readable")],
///     Directive::NO_FILE_COMP,
/// );
/// ```
pub fn fixed_completions(
    choices: Vec<Candidate>,
    directive: Directive,
) -> impl Fn(&CommandContext<'_>, &str) -> Result<(Completions, Directive)> {
    move |_ctx, _to_complete| {
        let mut completions = Completions::default();
        for choice in &choices {
            completions.push_candidate(choice.clone());
        }
        Ok((completions, directive))
    }
}

/// A hook that proposes nothing and suppresses file completion.
pub fn no_file_completions() -> impl Fn(&CommandContext<'_>, &str) -> Result<(Completions, Directive)>
{
    |_ctx, _to_complete| Ok((Completions::default(), Directive::NO_FILE_COMP))
}

impl CommandTree {
    /// Marks the flag `name`, as visible from `id`, as required. The
    /// user must set it explicitly before the command runs, and
    /// completion keeps proposing it until they do.
    pub fn mark_flag_required(&self, id: CommandId, name: &str) -> Result<()> {
        self.annotate_flag(id, name, REQUIRED_FLAG_ANNOTATION, vec!["true".into()])
    }

    /// Limits value completion for the flag to files with one of the
    /// given extensions. An empty list means any file.
    pub fn mark_flag_filename(&self, id: CommandId, name: &str, extensions: &[&str]) -> Result<()> {
        let extensions = extensions.iter().map(|ext| ext.to_string()).collect();
        self.annotate_flag(id, name, FILENAME_EXT_ANNOTATION, extensions)
    }

    /// Limits value completion for the flag to directories, optionally
    /// inside a single named directory.
    pub fn mark_flag_dirname(&self, id: CommandId, name: &str, directories: &[&str]) -> Result<()> {
        let directories = directories.iter().map(|dir| dir.to_string()).collect();
        self.annotate_flag(id, name, DIR_ONLY_ANNOTATION, directories)
    }

    fn annotate_flag(
        &self,
        id: CommandId,
        name: &str,
        key: &str,
        values: Vec<String>,
    ) -> Result<()> {
        match self.lookup_flag(id, name) {
            Some(flag) => {
                flag.set_annotation(key, values);
                Ok(())
            }
            None => Err(FlagError::NoSuchFlag(name.to_string()).into()),
        }
    }
}
