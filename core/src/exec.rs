//! Execution: resolve an argument vector, parse flags, and drive the
//! resolved command through its hook chain.
//!
//! [`CommandTree::execute`] is the entry point a `main` function calls.
//! It injects the default `help` subcommand and the hidden completion
//! request command, resolves the typed words, and hands the target to
//! the hook pipeline: persistent pre-run hooks, the pre-run hook,
//! required-flag and flag-group validation, the run hook, and the
//! post-run hooks. `--help` and `--version` short-circuit before any
//! hook runs.
//!
//! # Example
//!
//! ```
//! use arbor_core::{Command, CommandTree};
//!
//! let mut tree = CommandTree::new(Command::new("greet"));
//! let root = tree.root_id();
//! tree.add_command(
//!     root,
//!     Command::new("hello [name]").with_run(|ctx| {
//!         let name = ctx.args().first().map(String::as_str).unwrap_or("world");
//!         println!("hello, {name}");
//!         Ok(())
//!     }),
//! );
//!
//! let target = tree.execute(&["hello".into(), "rust".into()]).unwrap();
//! assert_eq!(tree.name(target), "hello");
//! ```

use arbor_flagset::Flag;
use tracing::debug;

use crate::command::Command;
use crate::complete::env;
use crate::complete::{Completions, Directive, AUTO_FLAG_ANNOTATION, REQUIRED_FLAG_ANNOTATION};
use crate::error::{CommandError, Result};
use crate::hooks::CommandContext;
use crate::tree::{CommandId, CommandTree};

impl CommandTree {
    /// Resolves `args` against the tree and runs the target command.
    ///
    /// Returns the command that was resolved, also when it only rendered
    /// help. Errors are returned after being printed to stderr, so a
    /// `main` can exit on `Err` without reporting again; commands opt
    /// out of the printing with
    /// [`with_silence_errors`](Command::with_silence_errors) and
    /// [`with_silence_usage`](Command::with_silence_usage).
    pub fn execute(&mut self, args: &[String]) -> Result<CommandId> {
        debug!(?args, "executing command line");
        self.init_default_help_command();
        self.check_command_groups(self.root_id());
        self.init_complete_command(args);

        let resolved = if self.config().traverse_children {
            self.traverse(args)
        } else {
            self.find(args)
        };
        let (target, rest) = match resolved {
            Ok(found) => found,
            Err(err) => {
                let root = self.root_id();
                if !self.command(root).silence_errors() {
                    eprintln!("{} {}", self.err_prefix(root), err);
                    eprintln!("Run '{} --help' for usage.", self.path(root));
                }
                return Err(err);
            }
        };

        if self.called_as(target).is_none() {
            let name = self.name(target).to_string();
            self.set_called_as(target, &name);
        }

        match self.execute_node(target, &rest) {
            Ok(()) => Ok(target),
            Err(CommandError::HelpRequested) => {
                // Help is never an error, no matter what silencing is in
                // effect.
                self.render_help(target);
                Ok(target)
            }
            Err(err) => {
                let root = self.root_id();
                if !self.command(target).silence_errors()
                    && !self.command(root).silence_errors()
                {
                    eprintln!("{} {}", self.err_prefix(target), err);
                }
                if !self.command(target).silence_usage() && !self.command(root).silence_usage() {
                    eprintln!("Run '{} --help' for usage.", self.path(target));
                }
                Err(err)
            }
        }
    }

    /// Runs [`execute`](Self::execute) on the process arguments.
    pub fn execute_from_env(&mut self) -> Result<CommandId> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        self.execute(&args)
    }

    fn execute_node(&mut self, id: CommandId, args: &[String]) -> Result<()> {
        if let Some(notice) = self.command(id).deprecated() {
            eprintln!("Command {:?} is deprecated, {}", self.name(id), notice);
        }

        self.init_help_flag(id);
        self.init_version_flag(id);

        if !self.command(id).disable_flag_parsing() {
            if let Err(err) = self.parse_at(id, args) {
                return Err(self.map_flag_error(id, args, err));
            }
        }

        if self.auto_flag_set(id, "help") {
            return Err(CommandError::HelpRequested);
        }
        let version = self.command(id).version().to_string();
        if !version.is_empty() && self.auto_flag_set(id, "version") {
            println!("{} version {}", self.name(id), version);
            return Ok(());
        }

        if !self.runnable(id) {
            return Err(CommandError::HelpRequested);
        }

        self.run_initializers();
        let outcome = self.run_hook_chain(id, args);
        self.run_finalizers();
        outcome
    }

    fn run_hook_chain(&mut self, id: CommandId, raw_args: &[String]) -> Result<()> {
        // Commands that parse their own flags get the raw tail.
        let positionals: Vec<String> = if self.command(id).disable_flag_parsing() {
            raw_args.to_vec()
        } else {
            self.parsed_args(id).to_vec()
        };

        if let Some(rule) = self.command(id).args_validator().cloned() {
            let ctx = CommandContext::new(self, id, &positionals);
            rule(&ctx)?;
        }

        let mut pre_chain: Vec<CommandId> = vec![id];
        pre_chain.extend(self.ancestors(id));
        if self.config().traverse_run_hooks {
            // Root first, so outer setup runs before inner setup.
            pre_chain.reverse();
        }
        for node in pre_chain {
            let hook = self.command(node).persistent_pre_run.clone();
            if let Some(hook) = hook {
                let ctx = CommandContext::new(self, id, &positionals);
                hook(&ctx)?;
                if !self.config().traverse_run_hooks {
                    break;
                }
            }
        }

        if let Some(hook) = self.command(id).pre_run.clone() {
            let ctx = CommandContext::new(self, id, &positionals);
            hook(&ctx)?;
        }

        self.validate_required_flags(id)?;
        self.validate_flag_groups(id)?;

        if Some(id) == self.complete_command {
            self.run_completion_protocol(id, &positionals)?;
        } else if let Some(hook) = self.command(id).run.clone() {
            let ctx = CommandContext::new(self, id, &positionals);
            hook(&ctx)?;
        }

        if let Some(hook) = self.command(id).post_run.clone() {
            let ctx = CommandContext::new(self, id, &positionals);
            hook(&ctx)?;
        }

        let mut post_chain: Vec<CommandId> = vec![id];
        post_chain.extend(self.ancestors(id));
        for node in post_chain {
            let hook = self.command(node).persistent_post_run.clone();
            if let Some(hook) = hook {
                let ctx = CommandContext::new(self, id, &positionals);
                hook(&ctx)?;
                if !self.config().traverse_run_hooks {
                    break;
                }
            }
        }

        Ok(())
    }

    /// A command runs if it has a run hook; the hidden completion
    /// request command runs through its dedicated protocol.
    fn runnable(&self, id: CommandId) -> bool {
        self.command(id).has_run() || Some(id) == self.complete_command
    }

    fn auto_flag_set(&mut self, id: CommandId, name: &str) -> bool {
        self.full_flags(id)
            .lookup(name)
            .is_some_and(|flag| env::parse_bool(&flag.value()) == Some(true))
    }

    /// Fails unless every flag marked required was set on the line.
    pub fn validate_required_flags(&mut self, id: CommandId) -> Result<()> {
        if self.command(id).disable_flag_parsing() {
            return Ok(());
        }
        let mut missing: Vec<String> = Vec::new();
        self.full_flags(id).visit_all(|flag| {
            let Some(values) = flag.annotation(REQUIRED_FLAG_ANNOTATION) else {
                return;
            };
            if values.first().map(String::as_str) == Some("true") && !flag.changed() {
                missing.push(flag.name());
            }
        });
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CommandError::RequiredFlags { names: missing })
        }
    }

    /// The error prefix for messages about `id`: its own, else the
    /// nearest ancestor's, else `Error:`.
    pub fn err_prefix(&self, id: CommandId) -> String {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if let Some(prefix) = self.command(node).error_prefix() {
                return prefix.to_string();
            }
            cur = self.parent(node);
        }
        "Error:".to_string()
    }

    /// Renders help for `id` through the configured help hook, falling
    /// back to the built-in renderer.
    pub fn render_help(&self, id: CommandId) {
        match self.help_hook.clone() {
            Some(hook) => hook(self, id),
            None => self.default_help(id),
        }
    }

    fn default_help(&self, id: CommandId) {
        let command = self.command(id);
        let about = if command.long().is_empty() { command.short() } else { command.long() };
        if !about.is_empty() {
            println!("{about}");
            println!();
        }

        let mut usage = self.path(id);
        if let Some((_, rest)) = command.use_line().split_once(' ') {
            usage.push(' ');
            usage.push_str(rest);
        }
        println!("Usage:");
        println!("  {usage}");

        let listed: Vec<CommandId> = self
            .listed_children(id)
            .into_iter()
            .filter(|child| self.is_available(*child) || Some(*child) == self.help_command)
            .collect();
        if listed.is_empty() {
            return;
        }
        let width = listed.iter().map(|child| self.name(*child).chars().count()).max().unwrap_or(0);
        let print_section = |title: &str, members: &[CommandId]| {
            if members.is_empty() {
                return;
            }
            println!();
            println!("{title}:");
            for child in members {
                println!("  {:<width$} {}", self.name(*child), self.command(*child).short());
            }
        };

        let groups = command.groups();
        if groups.is_empty() {
            print_section("Available Commands", &listed);
        } else {
            for group in groups {
                let members: Vec<CommandId> = listed
                    .iter()
                    .copied()
                    .filter(|child| self.command(*child).group_id() == Some(group.id.as_str()))
                    .collect();
                print_section(&group.title, &members);
            }
            let ungrouped: Vec<CommandId> = listed
                .iter()
                .copied()
                .filter(|child| self.command(*child).group_id().is_none())
                .collect();
            print_section("Additional Commands", &ungrouped);
        }
        println!();
        println!(
            "Use \"{} [command] --help\" for more information about a command.",
            self.path(id),
        );
    }

    /// Adds the automatic `--help` flag to `id` unless a flag of that
    /// name is already visible there. Takes the `h` shorthand only when
    /// nothing else claimed it.
    pub(crate) fn init_help_flag(&mut self, id: CommandId) {
        let view = self.full_flags(id);
        if view.has("help") {
            return;
        }
        let shorthand_free = view.shorthand_lookup('h').is_none();
        let mut flag = Flag::switch("help").with_usage(format!("help for {}", self.name(id)));
        if shorthand_free {
            flag = flag.with_shorthand('h');
        }
        let added = self.add_flag(id, flag);
        added.set_annotation(AUTO_FLAG_ANNOTATION, vec!["true".into()]);
    }

    /// Adds the automatic `--version` flag to commands that carry a
    /// version string.
    pub(crate) fn init_version_flag(&mut self, id: CommandId) {
        if self.command(id).version().is_empty() {
            return;
        }
        let view = self.full_flags(id);
        if view.has("version") {
            return;
        }
        let shorthand_free = view.shorthand_lookup('v').is_none();
        let mut flag =
            Flag::switch("version").with_usage(format!("version for {}", self.name(id)));
        if shorthand_free {
            flag = flag.with_shorthand('v');
        }
        let added = self.add_flag(id, flag);
        added.set_annotation(AUTO_FLAG_ANNOTATION, vec!["true".into()]);
    }

    /// Injects the default `help` subcommand on roots that have
    /// subcommands, unless the program defines its own.
    fn init_default_help_command(&mut self) {
        let root = self.root_id();
        if !self.has_subcommands(root) || self.help_command.is_some() {
            return;
        }
        if self.children(root).iter().any(|child| self.name(*child) == "help") {
            return;
        }
        let root_name = self.name(root).to_string();
        let help = Command::new("help [command]")
            .with_short("Help about any command")
            .with_long(format!(
                "Help provides help for any command in the application.\n\
                 Simply type {root_name} help [path to command] for full details.",
            ))
            .with_completion(|ctx, to_complete| {
                let tree = ctx.tree();
                let mut completions = Completions::default();
                if let Ok((topic, _)) = tree.locate(ctx.args()) {
                    for child in tree.listed_children(topic) {
                        if (tree.is_available(child) || Some(child) == tree.help_command_id())
                            && tree.name(child).starts_with(to_complete)
                        {
                            completions.push_with_description(
                                tree.name(child),
                                tree.command(child).short(),
                            );
                        }
                    }
                }
                Ok((completions, Directive::NO_FILE_COMP))
            })
            .with_run(|ctx| {
                let tree = ctx.tree();
                match tree.locate(ctx.args()) {
                    Ok((topic, _)) => tree.render_help(topic),
                    Err(_) => println!("Unknown help topic {:?}", ctx.args()),
                }
                Ok(())
            });
        let id = self.add_command(root, help);
        self.help_command = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::complete::COMPLETE_COMMAND_NAME;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> impl Fn(&CommandContext<'_>) -> Result<()> + use<> {
        let log = log.clone();
        let tag = tag.to_string();
        move |_ctx| {
            log.borrow_mut().push(tag.clone());
            Ok(())
        }
    }

    #[test]
    fn test_execute_runs_target_with_positionals() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let observed = seen.clone();
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("echo").with_run(move |ctx| {
                observed.borrow_mut().extend(ctx.args().to_vec());
                Ok(())
            }),
        );

        let target = tree.execute(&strings(&["echo", "a", "b"])).unwrap();
        assert_eq!(tree.name(target), "echo");
        assert_eq!(*seen.borrow(), ["a", "b"]);
        assert_eq!(tree.called_as(target).as_deref(), Some("echo"));
    }

    #[test]
    fn test_execute_fills_called_as_for_root() {
        let mut tree = CommandTree::new(Command::new("tool").with_run(|_| Ok(())));
        let target = tree.execute(&strings(&[])).unwrap();
        assert_eq!(tree.called_as(target).as_deref(), Some("tool"));
    }

    #[test]
    fn test_resolution_error_propagates() {
        let mut tree = CommandTree::new(Command::new("tool").with_silence_errors());
        let root = tree.root_id();
        tree.add_command(root, Command::new("serve").with_run(|_| Ok(())));
        let err = tree.execute(&strings(&["nope"])).unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand { .. }));
    }

    #[test]
    fn test_help_flag_short_circuits_run() {
        let ran = Rc::new(Cell::new(false));
        let observed = ran.clone();
        let mut tree = CommandTree::new(Command::new("tool").with_run(move |_| {
            observed.set(true);
            Ok(())
        }));
        let target = tree.execute(&strings(&["--help"])).unwrap();
        assert_eq!(target, tree.root_id());
        assert!(!ran.get());
    }

    #[test]
    fn test_version_flag_short_circuits_run() {
        let ran = Rc::new(Cell::new(false));
        let observed = ran.clone();
        let mut tree = CommandTree::new(
            Command::new("tool").with_version("1.2.3").with_run(move |_| {
                observed.set(true);
                Ok(())
            }),
        );
        tree.execute(&strings(&["--version"])).unwrap();
        assert!(!ran.get());
    }

    #[test]
    fn test_user_help_flag_is_not_injected_over() {
        let seen = Rc::new(RefCell::new(String::new()));
        let observed = seen.clone();
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_flag(Flag::valued("help", "none").with_usage("Help topic"))
                .with_run(move |ctx| {
                    *observed.borrow_mut() = ctx.flag_value("help").unwrap_or_default();
                    Ok(())
                }),
        );
        tree.execute(&strings(&["--help", "topics"])).unwrap();
        assert_eq!(*seen.borrow(), "topics");
    }

    #[test]
    fn test_unrunnable_command_renders_help() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(root, Command::new("serve").with_run(|_| Ok(())));
        let target = tree.execute(&strings(&[])).unwrap();
        assert_eq!(target, root);
    }

    #[test]
    fn test_hook_order_nearest_persistent_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_persistent_pre_run(recorder(&log, "root-pre"))
                .with_persistent_post_run(recorder(&log, "root-post")),
        );
        let root = tree.root_id();
        let serve = tree.add_command(
            root,
            Command::new("serve").with_persistent_pre_run(recorder(&log, "serve-pre")),
        );
        tree.add_command(
            serve,
            Command::new("start")
                .with_pre_run(recorder(&log, "pre"))
                .with_run(recorder(&log, "run"))
                .with_post_run(recorder(&log, "post")),
        );

        tree.execute(&strings(&["serve", "start"])).unwrap();
        assert_eq!(*log.borrow(), ["serve-pre", "pre", "run", "post", "root-post"]);
    }

    #[test]
    fn test_hook_order_traverse_runs_whole_chain() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_persistent_pre_run(recorder(&log, "root-pre"))
                .with_persistent_post_run(recorder(&log, "root-post")),
        );
        tree.config_mut().traverse_run_hooks = true;
        let root = tree.root_id();
        let serve = tree.add_command(
            root,
            Command::new("serve").with_persistent_pre_run(recorder(&log, "serve-pre")),
        );
        tree.add_command(serve, Command::new("start").with_run(recorder(&log, "run")));

        tree.execute(&strings(&["serve", "start"])).unwrap();
        assert_eq!(*log.borrow(), ["root-pre", "serve-pre", "run", "root-post"]);
    }

    #[test]
    fn test_failing_pre_hook_skips_run() {
        let ran = Rc::new(Cell::new(false));
        let observed = ran.clone();
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_silence_errors()
                .with_silence_usage()
                .with_pre_run(|_| Err(CommandError::Message("not ready".into())))
                .with_run(move |_| {
                    observed.set(true);
                    Ok(())
                }),
        );
        let err = tree.execute(&strings(&[])).unwrap_err();
        assert_eq!(err.to_string(), "not ready");
        assert!(!ran.get());
    }

    #[test]
    fn test_args_validator_rejects_before_hooks() {
        let mut tree = CommandTree::new(Command::new("tool").with_silence_errors());
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("pair").with_args(args::exact_args(2)).with_run(|_| Ok(())),
        );
        let err = tree.execute(&strings(&["pair", "only"])).unwrap_err();
        assert_eq!(err.to_string(), "accepts 2 arg(s), received 1");
    }

    #[test]
    fn test_required_flag_enforced() {
        let mut tree = CommandTree::new(Command::new("tool").with_silence_errors());
        let root = tree.root_id();
        let deploy = tree.add_command(
            root,
            Command::new("deploy")
                .with_flag(Flag::valued("env", ""))
                .with_run(|_| Ok(())),
        );
        tree.mark_flag_required(deploy, "env").unwrap();

        let err = tree.execute(&strings(&["deploy"])).unwrap_err();
        assert_eq!(err.to_string(), "required flag(s) \"env\" not set");

        tree.execute(&strings(&["deploy", "--env", "prod"])).unwrap();
    }

    #[test]
    fn test_flag_groups_enforced() {
        let mut tree = CommandTree::new(
            Command::new("tool")
                .with_silence_errors()
                .with_flag(Flag::valued("user", ""))
                .with_flag(Flag::valued("password", ""))
                .with_run(|_| Ok(())),
        );
        let root = tree.root_id();
        tree.mark_flags_required_together(root, &["user", "password"]);

        let err = tree.execute(&strings(&["--user", "admin"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "if any flags in the group [user password] are set they must all be set; missing [password]",
        );
    }

    #[test]
    fn test_flag_parse_error_mapped_through_hook() {
        let mut tree = CommandTree::new(
            Command::new("tool").with_silence_errors().with_run(|_| Ok(())),
        );
        let err = tree.execute(&strings(&["--bogus"])).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag: --bogus");

        let mut custom = CommandTree::new(
            Command::new("tool").with_silence_errors().with_run(|_| Ok(())),
        );
        custom.set_flag_error_hook(|_ctx, err| CommandError::Message(format!("flag trouble: {err}")));
        let err = custom.execute(&strings(&["--bogus"])).unwrap_err();
        assert_eq!(err.to_string(), "flag trouble: unknown flag: --bogus");
    }

    #[test]
    fn test_disable_flag_parsing_passes_raw_args() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let observed = seen.clone();
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("raw").with_disable_flag_parsing().with_run(move |ctx| {
                observed.borrow_mut().extend(ctx.args().to_vec());
                Ok(())
            }),
        );
        tree.execute(&strings(&["raw", "--weird", "x"])).unwrap();
        assert_eq!(*seen.borrow(), ["--weird", "x"]);
    }

    #[test]
    fn test_initializers_and_finalizers_wrap_run_only() {
        let initialized = Rc::new(Cell::new(0));
        let finalized = Rc::new(Cell::new(0));
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(root, Command::new("serve").with_run(|_| Ok(())));
        let init = initialized.clone();
        tree.on_initialize(move || init.set(init.get() + 1));
        let done = finalized.clone();
        tree.on_finalize(move || done.set(done.get() + 1));

        tree.execute(&strings(&["--help"])).unwrap();
        assert_eq!((initialized.get(), finalized.get()), (0, 0));

        tree.execute(&strings(&["serve"])).unwrap();
        assert_eq!((initialized.get(), finalized.get()), (1, 1));
    }

    #[test]
    fn test_help_command_injected_and_runs() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(root, Command::new("serve").with_run(|_| Ok(())));

        let target = tree.execute(&strings(&["help", "serve"])).unwrap();
        assert_eq!(Some(target), tree.help_command_id());

        let unknown = tree.execute(&strings(&["help", "nope"])).unwrap();
        assert_eq!(Some(unknown), tree.help_command_id());
    }

    #[test]
    fn test_help_command_not_injected_over_user_command() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(root, Command::new("help").with_run(|_| Ok(())));
        tree.add_command(root, Command::new("serve").with_run(|_| Ok(())));
        tree.execute(&strings(&["serve"])).unwrap();
        assert!(tree.help_command_id().is_none());
    }

    #[test]
    fn test_completion_request_executes_protocol() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(root, Command::new("serve").with_run(|_| Ok(())));

        let target = tree.execute(&strings(&[COMPLETE_COMMAND_NAME, "se"])).unwrap();
        assert_eq!(Some(target), tree.complete_command);
        assert_eq!(tree.called_as(target).as_deref(), Some(COMPLETE_COMMAND_NAME));
    }

    #[test]
    fn test_deprecated_command_still_runs() {
        let ran = Rc::new(Cell::new(false));
        let observed = ran.clone();
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root_id();
        tree.add_command(
            root,
            Command::new("old").with_deprecated("use new instead").with_run(move |_| {
                observed.set(true);
                Ok(())
            }),
        );
        tree.execute(&strings(&["old"])).unwrap();
        assert!(ran.get());
    }

    #[test]
    fn test_err_prefix_inherits_from_ancestors() {
        let mut tree = CommandTree::new(Command::new("tool").with_error_prefix("tool error:"));
        let root = tree.root_id();
        let serve = tree.add_command(root, Command::new("serve").with_run(|_| Ok(())));
        assert_eq!(tree.err_prefix(serve), "tool error:");
        assert_eq!(
            tree.err_prefix(root),
            "tool error:",
        );
        let plain = CommandTree::new(Command::new("bare"));
        assert_eq!(plain.err_prefix(plain.root_id()), "Error:");
    }
}
