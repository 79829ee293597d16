//! The completion engine: resolves a partial command line and decides
//! which candidates to propose.
//!
//! The pipeline mirrors normal execution up to the point where a command
//! would run. The typed words are resolved to a command, flags are
//! parsed so hooks can inspect them, and then one of several candidate
//! sources applies: flag values driven by annotations or registered
//! hooks, flag names, subcommand names, a fixed vocabulary, or the
//! command's own completion hook. Failures never abort the protocol;
//! they degrade to a safe directive and surface as a diagnostic.

use arbor_flagset::FlagRef;
use tracing::{debug, warn};

use crate::args;
use crate::command::Command;
use crate::error::{CommandError, Result};
use crate::hooks::{CommandContext, SharedCompletionHook};
use crate::resolve::is_flag_arg;
use crate::tree::{CommandId, CommandTree};

use super::{
    env, Completions, CompletionResult, Directive, ACTIVE_HELP_DISABLE, AUTO_FLAG_ANNOTATION,
    COMPLETE_COMMAND_NAME, COMPLETE_NO_DESC_COMMAND_NAME, DIR_ONLY_ANNOTATION,
    FILENAME_EXT_ANNOTATION, REQUIRED_FLAG_ANNOTATION,
};

impl CommandTree {
    /// Computes completion candidates for a partial command line.
    ///
    /// The last element of `args` is the word being completed, possibly
    /// empty; everything before it is the command line typed so far.
    /// The result always carries a usable directive. Failures along the
    /// way are reported through [`CompletionResult::diagnostic`] rather
    /// than an error return, because the shell still needs a directive
    /// line to finish the protocol.
    pub fn complete(&mut self, args: &[String]) -> CompletionResult {
        let (to_complete, trimmed_args) = match args.split_last() {
            Some((last, rest)) => (last.clone(), rest.to_vec()),
            None => (String::new(), Vec::new()),
        };
        debug!(args = ?trimmed_args, to_complete = %to_complete, "computing completions");

        let root = self.root_id();
        let resolved = if self.config().traverse_children {
            self.traverse(&trimmed_args)
        } else {
            // A root whose only child is the hidden request command must
            // be treated as childless, or its own positional arguments
            // would resolve as unknown subcommands.
            let sole_child = match self.children(root) {
                [only] => Some(*only),
                _ => None,
            };
            if let Some(only) = sole_child {
                if Some(only) == self.complete_command {
                    self.remove_command(only);
                }
            }
            self.find(&trimmed_args)
        };
        let (target, mut final_args) = match resolved {
            Ok(found) => found,
            Err(_) => {
                warn!(args = ?trimmed_args, "no command resolves for completion");
                return CompletionResult {
                    target: root,
                    completions: Completions::default(),
                    directive: Directive::DEFAULT,
                    diagnostic: Some(CommandError::CompletionResolve { args: trimmed_args }),
                };
            }
        };

        let mut to_complete = to_complete;
        let mut flag: Option<FlagRef> = None;
        let mut flag_completion = true;
        let parse_enabled = !self.command(target).disable_flag_parsing();

        if parse_enabled {
            // Normal execution injects these lazily; completion has to do
            // it here so their names and values complete like any flag.
            self.init_help_flag(target);
            self.init_version_flag(target);
        }

        // Flag-value detection must run before parsing: when the cursor
        // sits on a flag's value, the dangling flag token would otherwise
        // fail the parse.
        let flag_err = match self.check_flag_completion(target, &final_args, &to_complete) {
            Ok((found, rewritten, last)) => {
                flag = found;
                final_args = rewritten;
                to_complete = last;
                None
            }
            Err(err) => Some(err),
        };

        if parse_enabled {
            // Parsing once with a trailing terminator reveals whether the
            // word under the cursor comes after a `--`: the probe then
            // yields one extra positional compared to the real parse.
            let mut probe = final_args.clone();
            probe.push("--".to_string());
            let _ = self.parse_at(target, &probe);
            let probe_count = self.parsed_args(target).len();

            if let Err(source) = self.parse_at(target, &final_args) {
                warn!(error = %source, "flag parse failed during completion");
                return CompletionResult {
                    target,
                    completions: Completions::default(),
                    directive: Directive::DEFAULT,
                    diagnostic: Some(CommandError::CompletionParse { args: final_args, source }),
                };
            }
            if self.parsed_args(target).len() < probe_count {
                flag_completion = false;
            }
        }

        if let Some(err) = flag_err {
            // Past a `--` every word is a positional, so a token that
            // merely looks like an unsupported flag is not an error.
            let ignorable =
                matches!(err, CommandError::UnsupportedFlag { .. }) && !flag_completion;
            if !ignorable {
                return CompletionResult {
                    target,
                    completions: Completions::default(),
                    directive: Directive::DEFAULT,
                    diagnostic: Some(err),
                };
            }
        }

        if self.help_or_version_flag_present(target) {
            return CompletionResult {
                target,
                completions: Completions::default(),
                directive: Directive::NO_FILE_COMP,
                diagnostic: None,
            };
        }

        if parse_enabled {
            final_args = self.parsed_args(target).to_vec();
        }

        let mut completions = Completions::default();
        let mut directive = Directive::DEFAULT;

        if let Some(value_flag) = &flag {
            if flag_completion {
                if let Some(extensions) = value_flag.annotation(FILENAME_EXT_ANNOTATION) {
                    if !extensions.is_empty() {
                        for extension in extensions {
                            completions.push(extension);
                        }
                        return CompletionResult {
                            target,
                            completions,
                            directive: Directive::FILTER_FILE_EXT,
                            diagnostic: None,
                        };
                    }
                    // An empty extension list asks for plain file
                    // completion, which is the default anyway.
                }
                if let Some(directories) = value_flag.annotation(DIR_ONLY_ANNOTATION) {
                    if directories.len() == 1 {
                        completions.push(directories[0].clone());
                    }
                    return CompletionResult {
                        target,
                        completions,
                        directive: Directive::FILTER_DIRS,
                        diagnostic: None,
                    };
                }
            }
        }

        self.adjust_flag_groups_for_completion(target);

        if flag.is_none()
            && to_complete.starts_with('-')
            && !to_complete.contains('=')
            && flag_completion
        {
            // Required flags crowd out the rest until they are all set.
            completions = self.complete_required_flags(target, &to_complete);
            if completions.is_empty() {
                let mut visible: Vec<FlagRef> = Vec::new();
                self.inherited_flags(target).visit_all(|f| visible.push(f.clone()));
                self.local_flags(target).visit_all(|f| visible.push(f.clone()));
                for candidate_flag in visible {
                    if !candidate_flag.changed() {
                        flag_name_candidates(&candidate_flag, &to_complete, &mut completions);
                    }
                }
            }
            directive = Directive::NO_FILE_COMP;
            let lone: Vec<&super::Candidate> = completions.candidates().collect();
            if lone.len() == 1 && lone[0].value.ends_with('=') {
                // A lone `--flag=` candidate must not get a trailing space.
                directive = Directive::NO_SPACE;
            }
            if parse_enabled {
                return CompletionResult { target, completions, directive, diagnostic: None };
            }
            // Commands that parse their own flags fall through: the list
            // built from declared flags may be incomplete, so their hook
            // gets the final say.
        } else if flag.is_none() {
            let mut found_local_non_persistent = false;
            if !self.config().traverse_children {
                let local_non_persistent = self.local_non_persistent_flags(target);
                found_local_non_persistent =
                    local_non_persistent.iter().any(|f| f.changed());
            }

            // Subcommands complete only at the start of the positional
            // list and only while no purely local flag is on the line.
            if final_args.is_empty() && !found_local_non_persistent {
                for child in self.listed_children(target) {
                    if self.is_available(child) || Some(child) == self.help_command {
                        if self.name(child).starts_with(&to_complete) {
                            let short = self.command(child).short().to_string();
                            completions.push_with_description(self.name(child), short);
                        }
                        directive = Directive::NO_FILE_COMP;
                    }
                }
            }

            completions.extend(self.complete_required_flags(target, &to_complete));

            if !self.command(target).valid_args().is_empty() {
                if final_args.is_empty() {
                    for valid in self.command(target).valid_args() {
                        if valid.starts_with(&to_complete) {
                            match valid.split_once('\t') {
                                Some((value, description)) => {
                                    completions.push_with_description(value, description);
                                }
                                None => completions.push(valid.clone()),
                            }
                        }
                    }
                    directive = Directive::NO_FILE_COMP;
                    if completions.is_empty() {
                        for alias in self.command(target).arg_aliases() {
                            if alias.starts_with(&to_complete) {
                                completions.push(alias.clone());
                            }
                        }
                    }
                }
                // A fixed vocabulary and a completion hook are mutually
                // exclusive; the vocabulary wins.
                return CompletionResult { target, completions, directive, diagnostic: None };
            }
        }

        let hook: Option<SharedCompletionHook> = if flag.is_some() && flag_completion {
            flag.as_ref().and_then(|f| self.registry.lookup(f.id()))
        } else {
            self.command(target).completion_hook().cloned()
        };
        if let Some(hook) = hook {
            let hook_args = final_args.clone();
            let ctx = CommandContext::new(self, target, &hook_args);
            match hook(&ctx, &to_complete) {
                Ok((extra, hook_directive)) => {
                    completions.extend(extra);
                    directive = hook_directive;
                }
                Err(diagnostic) => {
                    warn!(error = %diagnostic, "completion hook failed");
                    return CompletionResult {
                        target,
                        completions: Completions::default(),
                        directive: Directive::NO_FILE_COMP,
                        diagnostic: Some(diagnostic),
                    };
                }
            }
        }

        CompletionResult { target, completions, directive, diagnostic: None }
    }

    /// Detects whether the word under the cursor is a flag's value.
    ///
    /// Handles both `--flag=val` (value embedded in the word) and
    /// `--flag val` (previous token names the flag). In the latter case
    /// the dangling flag token is removed from the returned argument
    /// list so the later parse does not trip over it. Flags usable
    /// without a value revert to positional completion unless the `=`
    /// form forced a value.
    fn check_flag_completion(
        &self,
        id: CommandId,
        args: &[String],
        last: &str,
    ) -> Result<(Option<FlagRef>, Vec<String>, String)> {
        if self.command(id).disable_flag_parsing() {
            // The command parses its own flags; nothing to detect here.
            return Ok((None, args.to_vec(), last.to_string()));
        }

        let mut flag_name = String::new();
        let mut trimmed = args.to_vec();
        let mut last_arg = last.to_string();
        let mut flag_with_equal = false;

        if last_arg.starts_with('-') {
            if let Some(idx) = last_arg.find('=') {
                if last_arg.starts_with("--") {
                    flag_name = last_arg[2..idx].to_string();
                } else {
                    // In a shorthand cluster like `-ab=`, the flag taking
                    // the value is the last letter before the `=`.
                    flag_name = last_arg[..idx]
                        .chars()
                        .last()
                        .map(String::from)
                        .unwrap_or_default();
                }
                last_arg = last_arg[idx + 1..].to_string();
                flag_with_equal = true;
            } else {
                // No `=` yet: the user is completing the flag name itself.
                return Ok((None, trimmed, last_arg));
            }
        }

        if flag_name.is_empty() {
            if let Some(previous) = args.last() {
                if is_flag_arg(previous) && !previous.contains('=') {
                    if let Some(name) = previous.strip_prefix("--") {
                        flag_name = name.to_string();
                    } else {
                        flag_name = previous.chars().last().map(String::from).unwrap_or_default();
                    }
                    trimmed = args[..args.len() - 1].to_vec();
                }
            }
        }

        if flag_name.is_empty() {
            return Ok((None, trimmed, last_arg));
        }

        let flag = if flag_name.len() == 1 {
            flag_name.chars().next().and_then(|short| self.lookup_shorthand(id, short))
        } else {
            self.lookup_flag(id, &flag_name)
        };
        let Some(flag) = flag else {
            return Err(CommandError::UnsupportedFlag {
                subcommand: self.name(id).to_string(),
                flag: flag_name,
            });
        };

        if !flag_with_equal && !flag.expects_value() {
            // The flag stands on its own, so the cursor word is an
            // ordinary positional after all.
            return Ok((None, args.to_vec(), last.to_string()));
        }

        Ok((Some(flag), trimmed, last_arg))
    }

    /// Candidates for required flags the user has not set yet.
    fn complete_required_flags(&mut self, id: CommandId, to_complete: &str) -> Completions {
        let mut completions = Completions::default();
        let mut visible: Vec<FlagRef> = Vec::new();
        self.inherited_flags(id).visit_all(|f| visible.push(f.clone()));
        self.local_flags(id).visit_all(|f| visible.push(f.clone()));
        for flag in visible {
            if flag.has_annotation(REQUIRED_FLAG_ANNOTATION) && !flag.changed() {
                flag_name_candidates(&flag, to_complete, &mut completions);
            }
        }
        completions
    }

    /// Reports whether an automatically injected `--help` or `--version`
    /// flag was set on the line. User-declared flags with those names do
    /// not count.
    fn help_or_version_flag_present(&mut self, id: CommandId) -> bool {
        let view = self.full_flags(id);
        ["help", "version"].iter().any(|name| {
            view.lookup(name)
                .is_some_and(|flag| flag.has_annotation(AUTO_FLAG_ANNOTATION) && flag.changed())
        })
    }

    /// Attaches the hidden completion request command when `args` is a
    /// completion request, detaches it otherwise.
    ///
    /// Keeping it detached outside completion requests matters: its mere
    /// presence would give a childless root a subcommand and change how
    /// the root's positional arguments resolve.
    pub(crate) fn init_complete_command(&mut self, args: &[String]) {
        match self.complete_command {
            None => {
                let request = Command::new(format!("{COMPLETE_COMMAND_NAME} [command-line]"))
                    .with_alias(COMPLETE_NO_DESC_COMMAND_NAME)
                    .with_short("Request shell completion choices for the specified command-line")
                    .with_long(format!(
                        "{COMPLETE_COMMAND_NAME} requests completion choices for the \
                         specified command-line on behalf of a shell integration.",
                    ))
                    .with_hidden()
                    .with_disable_flag_parsing()
                    .with_args(args::minimum_args(1));
                let id = self.add_command(self.root_id(), request);
                self.complete_command = Some(id);
            }
            Some(id) => {
                if self.parent(id).is_none() {
                    self.reattach_command(self.root_id(), id);
                }
            }
        }
        let Some(request) = self.complete_command else { return };
        let invoked = matches!(self.locate(args), Ok((found, _)) if found == request);
        if !invoked {
            self.remove_command(request);
        }
    }

    /// Runs one completion request end to end: candidates and the
    /// directive line on stdout, diagnostics and the directive trace on
    /// stderr.
    pub(crate) fn run_completion_protocol(&mut self, id: CommandId, args: &[String]) -> Result<()> {
        let result = self.complete(args);
        if let Some(diagnostic) = &result.diagnostic {
            eprintln!("[Error] {diagnostic}");
        }

        let mut no_descriptions =
            self.called_as(id).as_deref() == Some(COMPLETE_NO_DESC_COMMAND_NAME);
        if !no_descriptions {
            if let Some(wanted) = env::parse_bool(&self.env_config(env::DESCRIPTIONS_SUFFIX)) {
                no_descriptions = !wanted;
            }
        }
        let no_active_help = self.active_help_config() == ACTIVE_HELP_DISABLE;

        for line in result.completions.render(no_descriptions, no_active_help) {
            println!("{line}");
        }
        println!(":{}", result.directive.bits());
        eprintln!("Completion ended with directive: {}", result.directive);
        Ok(())
    }
}

/// Appends the spellings under which `flag` can be typed: `--name`, the
/// `--name=` variant when a value is mandatory, and the shorthand.
fn flag_name_candidates(flag: &FlagRef, to_complete: &str, out: &mut Completions) {
    if flag.hidden() || flag.deprecated().is_some() {
        return;
    }
    let usage = flag.usage();
    let long = format!("--{}", flag.name());
    if long.starts_with(to_complete) {
        out.push_with_description(long.as_str(), usage.as_str());
        if flag.expects_value() {
            out.push_with_description(format!("{long}="), usage.as_str());
        }
    }
    if let Some(short) = flag.shorthand() {
        let spelled = format!("-{short}");
        if spelled.starts_with(to_complete) {
            out.push_with_description(spelled, usage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_flagset::Flag;
    use std::cell::Cell;
    use std::rc::Rc;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn values(result: &CompletionResult) -> Vec<String> {
        result.completions.candidates().map(|c| c.value.clone()).collect()
    }

    fn serve_tree() -> CommandTree {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("serve").with_short("Start the server").with_run(|_| Ok(())),
        );
        tree.add_command(
            root,
            Command::new("status").with_short("Show server status").with_run(|_| Ok(())),
        );
        tree
    }

    #[test]
    fn test_subcommand_candidates_with_descriptions() {
        let mut tree = serve_tree();
        let result = tree.complete(&strings(&["s"]));
        assert_eq!(values(&result), ["serve", "status"]);
        let described: Vec<_> =
            result.completions.candidates().map(|c| c.description.clone()).collect();
        assert_eq!(
            described,
            [Some("Start the server".to_string()), Some("Show server status".to_string())],
        );
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
        assert!(result.diagnostic.is_none());
    }

    #[test]
    fn test_hidden_subcommand_not_proposed() {
        let mut tree = serve_tree();
        let root = tree.root_id();
        tree.add_command(root, Command::new("secret").with_hidden().with_run(|_| Ok(())));
        let result = tree.complete(&strings(&["se"]));
        assert_eq!(values(&result), ["serve"]);
    }

    #[test]
    fn test_positional_suppresses_subcommands() {
        let mut tree = serve_tree();
        let root = tree.root_id();
        let serve = tree.children(root)[0];
        tree.add_command(serve, Command::new("stop").with_run(|_| Ok(())));
        let result = tree.complete(&strings(&["serve", "leftover", ""]));
        assert!(values(&result).is_empty());
        assert_eq!(result.directive, Directive::DEFAULT);
        assert!(result.diagnostic.is_none());
    }

    #[test]
    fn test_local_flag_on_line_suppresses_subcommands() {
        let mut tree = serve_tree();
        let root = tree.root_id();
        let serve = tree.children(root)[0];
        tree.add_flag(serve, Flag::switch("daemon"));
        tree.add_command(serve, Command::new("stop").with_run(|_| Ok(())));
        let result = tree.complete(&strings(&["serve", "--daemon", ""]));
        assert!(values(&result).is_empty());
        assert_eq!(result.directive, Directive::DEFAULT);
        assert!(result.diagnostic.is_none());
    }

    #[test]
    fn test_flag_name_completion() {
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_flag(
                    Flag::valued("format", "text").with_shorthand('f').with_usage("Output format"),
                )
                .with_flag(Flag::switch("verbose").with_usage("Verbose output")),
        );
        let result = tree.complete(&strings(&["--"]));
        assert_eq!(values(&result), ["--format", "--format=", "--help", "--verbose"]);
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
    }

    #[test]
    fn test_shorthand_name_completion() {
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_flag(Flag::valued("format", "text").with_shorthand('f')),
        );
        let result = tree.complete(&strings(&["-f"]));
        assert_eq!(values(&result), ["-f"]);
    }

    #[test]
    fn test_changed_and_hidden_flags_not_proposed() {
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_flag(Flag::switch("verbose"))
                .with_flag(Flag::switch("trace").with_hidden()),
        );
        let result = tree.complete(&strings(&["--verbose", "--"]));
        assert_eq!(values(&result), ["--help"]);
    }

    #[test]
    fn test_flag_value_completion_from_previous_token() {
        let mut tree = CommandTree::new(
            Command::new("tool").with_persistent_flag(Flag::valued("format", "text")),
        );
        let root = tree.root_id();
        tree.add_command(root, Command::new("render").with_run(|_| Ok(())));
        tree.register_flag_completion(root, "format", |_, to_complete| {
            let mut completions = Completions::default();
            for format in ["json", "jsonl", "yaml"] {
                if format.starts_with(to_complete) {
                    completions.push(format);
                }
            }
            Ok((completions, Directive::NO_FILE_COMP))
        });

        let result = tree.complete(&strings(&["render", "--format", "j"]));
        assert_eq!(values(&result), ["json", "jsonl"]);
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
    }

    #[test]
    fn test_flag_value_completion_with_equals() {
        let mut tree =
            CommandTree::new(Command::new("tool").with_flag(Flag::valued("format", "text")));
        let root = tree.root_id();
        tree.register_flag_completion(root, "format", |_, to_complete| {
            let mut completions = Completions::default();
            for format in ["json", "yaml"] {
                if format.starts_with(to_complete) {
                    completions.push(format);
                }
            }
            Ok((completions, Directive::NO_FILE_COMP))
        });

        let result = tree.complete(&strings(&["--format=y"]));
        assert_eq!(values(&result), ["yaml"]);
    }

    #[test]
    fn test_filename_extension_annotation() {
        let mut tree =
            CommandTree::new(Command::new("tool").with_flag(Flag::valued("config", "")));
        let root = tree.root_id();
        tree.mark_flag_filename(root, "config", &["yaml", "yml"]).unwrap();
        let result = tree.complete(&strings(&["--config", ""]));
        assert_eq!(values(&result), ["yaml", "yml"]);
        assert_eq!(result.directive, Directive::FILTER_FILE_EXT);
    }

    #[test]
    fn test_dirname_annotation() {
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_flag(Flag::valued("output", ""))
                .with_flag(Flag::valued("theme", "")),
        );
        let root = tree.root_id();
        tree.mark_flag_dirname(root, "output", &[]).unwrap();
        tree.mark_flag_dirname(root, "theme", &["themes"]).unwrap();

        let plain = tree.complete(&strings(&["--output", ""]));
        assert!(values(&plain).is_empty());
        assert_eq!(plain.directive, Directive::FILTER_DIRS);

        let rooted = tree.complete(&strings(&["--theme", ""]));
        assert_eq!(values(&rooted), ["themes"]);
        assert_eq!(rooted.directive, Directive::FILTER_DIRS);
    }

    #[test]
    fn test_required_flags_surface_without_dash() {
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_flag(Flag::valued("config", "").with_usage("Config file"))
                .with_run(|_| Ok(())),
        );
        let root = tree.root_id();
        tree.mark_flag_required(root, "config").unwrap();
        let result = tree.complete(&strings(&[""]));
        assert_eq!(values(&result), ["--config", "--config="]);
        assert_eq!(result.directive, Directive::DEFAULT);
    }

    #[test]
    fn test_required_flags_crowd_out_other_flags() {
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_flag(Flag::valued("config", ""))
                .with_flag(Flag::switch("verbose")),
        );
        let root = tree.root_id();
        tree.mark_flag_required(root, "config").unwrap();
        let result = tree.complete(&strings(&["--"]));
        assert_eq!(values(&result), ["--config", "--config="]);

        let satisfied = tree.complete(&strings(&["--config", "x", "--"]));
        assert_eq!(values(&satisfied), ["--help", "--verbose"]);
    }

    #[test]
    fn test_valid_args_suppress_completion_hook() {
        let hook_ran = Rc::new(Cell::new(false));
        let observed = hook_ran.clone();
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("render")
                .with_valid_args(["table\tPlain table", "json"])
                .with_arg_aliases(["tbl"])
                .with_completion(move |_, _| {
                    observed.set(true);
                    Ok((Completions::default(), Directive::DEFAULT))
                })
                .with_run(|_| Ok(())),
        );

        let result = tree.complete(&strings(&["render", "ta"]));
        assert_eq!(values(&result), ["table"]);
        assert_eq!(
            result.completions.candidates().next().unwrap().description.as_deref(),
            Some("Plain table"),
        );
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
        assert!(!hook_ran.get());
    }

    #[test]
    fn test_arg_aliases_back_fill_valid_args() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("render")
                .with_valid_args(["table", "json"])
                .with_arg_aliases(["tbl"])
                .with_run(|_| Ok(())),
        );
        let result = tree.complete(&strings(&["render", "tb"]));
        assert_eq!(values(&result), ["tbl"]);
    }

    #[test]
    fn test_command_hook_runs_for_positionals() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("checkout")
                .with_completion(|ctx, to_complete| {
                    let mut completions = Completions::default();
                    if ctx.args().is_empty() {
                        for branch in ["main", "maintenance"] {
                            if branch.starts_with(to_complete) {
                                completions.push(branch);
                            }
                        }
                    }
                    Ok((completions, Directive::NO_FILE_COMP))
                })
                .with_run(|_| Ok(())),
        );
        let result = tree.complete(&strings(&["checkout", "mai"]));
        assert_eq!(values(&result), ["main", "maintenance"]);
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
    }

    #[test]
    fn test_failing_hook_degrades_with_diagnostic() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("checkout")
                .with_completion(|_, _| Err(CommandError::Message("backend offline".into())))
                .with_run(|_| Ok(())),
        );
        let result = tree.complete(&strings(&["checkout", ""]));
        assert!(values(&result).is_empty());
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
        assert_eq!(result.diagnostic.unwrap().to_string(), "backend offline");
    }

    #[test]
    fn test_unresolvable_line_keeps_protocol_alive() {
        let mut tree = serve_tree();
        let result = tree.complete(&strings(&["bogus", ""]));
        assert!(values(&result).is_empty());
        assert_eq!(result.directive, Directive::DEFAULT);
        assert_eq!(
            result.diagnostic.unwrap().to_string(),
            "unable to find a command for arguments: [\"bogus\"]",
        );
    }

    #[test]
    fn test_unparsable_flags_degrade() {
        let mut tree = CommandTree::new(Command::new("tool").with_run(|_| Ok(())));
        let result = tree.complete(&strings(&["--bogus", "x", ""]));
        assert!(values(&result).is_empty());
        assert_eq!(result.directive, Directive::DEFAULT);
        assert_eq!(
            result.diagnostic.unwrap().to_string(),
            "error while parsing flags from args [\"--bogus\", \"x\"]: unknown flag: --bogus",
        );
    }

    #[test]
    fn test_unsupported_flag_value_reports_diagnostic() {
        let mut tree = CommandTree::new(Command::new("tool").with_run(|_| Ok(())));
        let result = tree.complete(&strings(&["--bogus=x"]));
        assert!(values(&result).is_empty());
        assert_eq!(
            result.diagnostic.unwrap().to_string(),
            "subcommand \"tool\" does not support flag \"bogus\"",
        );
    }

    #[test]
    fn test_help_flag_on_line_stops_completion() {
        let mut tree = serve_tree();
        let result = tree.complete(&strings(&["--help", ""]));
        assert!(values(&result).is_empty());
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
        assert!(result.diagnostic.is_none());
    }

    #[test]
    fn test_no_flag_completion_after_terminator() {
        let mut tree = serve_tree();
        let result = tree.complete(&strings(&["--", "--s"]));
        assert!(values(&result).is_empty());
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
        assert!(result.diagnostic.is_none());
    }

    #[test]
    fn test_unknown_flag_after_terminator_is_not_an_error() {
        let mut tree = serve_tree();
        let result = tree.complete(&strings(&["--", "--bogus", ""]));
        assert!(result.diagnostic.is_none());
        assert_eq!(result.directive, Directive::DEFAULT);
    }

    #[test]
    fn test_bare_usable_flag_reverts_to_positionals() {
        let mut tree = serve_tree();
        let root = tree.root_id();
        tree.add_persistent_flag(root, Flag::switch("verbose"));
        let result = tree.complete(&strings(&["--verbose", "s"]));
        assert_eq!(values(&result), ["serve", "status"]);
    }

    #[test]
    fn test_traverse_mode_completes_through_parent_flags() {
        let mut tree = CommandTree::new(Command::new("tool").with_flag(Flag::valued("level", "0")));
        tree.config_mut().traverse_children = true;
        let root = tree.root_id();
        let serve = tree.add_command(root, Command::new("serve"));
        tree.add_command(serve, Command::new("stop").with_run(|_| Ok(())));

        let result = tree.complete(&strings(&["--level", "3", "serve", ""]));
        assert_eq!(values(&result), ["stop"]);
        assert_eq!(result.directive, Directive::NO_FILE_COMP);
    }

    #[test]
    fn test_request_command_attached_only_when_invoked() {
        let mut tree = serve_tree();
        tree.init_complete_command(&strings(&["serve"]));
        let request = tree.complete_command.unwrap();
        assert!(tree.parent(request).is_none());

        tree.init_complete_command(&strings(&[COMPLETE_COMMAND_NAME, "serve", ""]));
        assert!(tree.parent(request).is_some());
    }

    #[test]
    fn test_childless_root_sheds_request_command() {
        let fixture = Rc::new(Cell::new(false));
        let observed = fixture.clone();
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_completion(move |_, to_complete| {
                    observed.set(true);
                    let mut completions = Completions::default();
                    if "fixture".starts_with(to_complete) {
                        completions.push("fixture");
                    }
                    Ok((completions, Directive::NO_FILE_COMP))
                })
                .with_run(|_| Ok(())),
        );
        tree.init_complete_command(&strings(&[COMPLETE_COMMAND_NAME, "positional", "f"]));
        let request = tree.complete_command.unwrap();
        assert!(tree.parent(request).is_some());

        let result = tree.complete(&strings(&["positional", "f"]));
        assert!(tree.parent(request).is_none());
        assert!(result.diagnostic.is_none());
        assert!(fixture.get());
        assert_eq!(values(&result), ["fixture"]);
    }
}
