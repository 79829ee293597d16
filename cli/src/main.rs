//! `arbor-demo`: a small service-management CLI built on the arbor
//! command tree.
//!
//! The binary exists to exercise the engine end to end: nested
//! subcommands, inherited flags, flag groups, typo suggestions, and the
//! `__complete` shell protocol. Every feature the library exposes shows
//! up somewhere in the tree below.

use arbor_core::complete::{fixed_completions, Candidate, Completions, Directive};
use arbor_core::hooks::CommandContext;
use arbor_core::{args, Command, CommandTree, Flag, Group, Result};
use serde::Serialize;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Services the demo pretends to manage.
const SERVICES: [(&str, &str); 3] = [
    ("api", "HTTP API frontend"),
    ("worker", "Background job worker"),
    ("scheduler", "Periodic task scheduler"),
];

fn main() {
    let mut tree = build_tree();
    // Errors and usage hints are already printed by the tree.
    if tree.execute_from_env().is_err() {
        std::process::exit(1);
    }
}

fn build_tree() -> CommandTree {
    let root = Command::new("arbor-demo")
        .with_short("Toy service manager for the arbor command tree")
        .with_long(
            "arbor-demo pretends to manage a fleet of services. It exists so the\n\
             resolution, flag inheritance, and completion machinery can be driven\n\
             from a shell.",
        )
        .with_version(PACKAGE_VERSION)
        .with_group(Group::new("service", "Service Commands"))
        .with_group(Group::new("data", "Data Commands"))
        .with_persistent_flag(
            Flag::switch("verbose")
                .with_shorthand('v')
                .with_usage("Print more detail"),
        )
        .with_persistent_flag(
            Flag::valued("config", "")
                .with_shorthand('c')
                .with_usage("Path to the configuration file"),
        );

    let mut tree = CommandTree::new(root);
    let root_id = tree.root_id();
    tree.mark_flag_filename(root_id, "config", &["toml"])
        .expect("config flag is declared above");

    let serve = tree.add_command(
        root_id,
        Command::new("serve [address]")
            .with_short("Run the orchard supervisor")
            .with_alias("server")
            .with_group_id("service")
            .with_args(args::maximum_args(1))
            .with_flag(
                Flag::valued("listen", "127.0.0.1:8080")
                    .with_shorthand('l')
                    .with_usage("Address to bind"),
            )
            .with_flag(Flag::valued("log-level", "info").with_usage("Log verbosity"))
            .with_flag(Flag::valued("workers", "4").with_usage("Worker thread count"))
            .with_run(run_serve),
    );
    tree.register_flag_completion(
        serve,
        "log-level",
        fixed_completions(
            vec![
                Candidate::with_description("debug", "Everything, including wire traffic"),
                Candidate::with_description("info", "Lifecycle events"),
                Candidate::with_description("warn", "Problems that were survived"),
                Candidate::with_description("error", "Problems that were not"),
            ],
            Directive::NO_FILE_COMP,
        ),
    );

    tree.add_command(
        root_id,
        Command::new("status [service]")
            .with_short("Show service health")
            .with_alias("st")
            .with_group_id("service")
            .with_valid_args(
                SERVICES
                    .iter()
                    .map(|(name, description)| format!("{name}\t{description}")),
            )
            .with_arg_aliases(["app", "cron"])
            .with_args(args::match_all(vec![
                args::only_valid_args(),
                args::maximum_args(1),
            ]))
            .with_run(run_status),
    );

    tree.add_command(
        root_id,
        Command::new("stop <service>")
            .with_short("Stop a running service")
            .with_group_id("service")
            .with_suggest_for("halt")
            .with_suggest_for("terminate")
            .with_args(args::exact_args(1))
            .with_completion(complete_service_names)
            .with_run(|ctx| {
                println!("stopping {}", ctx.args()[0]);
                Ok(())
            }),
    );

    let export = tree.add_command(
        root_id,
        Command::new("export [service...]")
            .with_short("Export service state")
            .with_group_id("data")
            .with_flag(
                Flag::valued("format", "")
                    .with_shorthand('f')
                    .with_usage("Output format"),
            )
            .with_flag(
                Flag::valued("output", "")
                    .with_shorthand('o')
                    .with_usage("Directory to write into"),
            )
            .with_flag(Flag::switch("stdout").with_usage("Write to standard output"))
            .with_flag(Flag::switch("compress").with_usage("Gzip the result"))
            .with_run(run_export),
    );
    tree.mark_flag_required(export, "format")
        .expect("format flag is declared above");
    tree.mark_flag_dirname(export, "output", &[])
        .expect("output flag is declared above");
    tree.mark_flags_mutually_exclusive(export, &["output", "stdout"]);
    tree.register_flag_completion(
        export,
        "format",
        fixed_completions(
            vec![
                Candidate::with_description("json", "Machine readable"),
                Candidate::with_description("yaml", "Human readable"),
                Candidate::with_description("table", "Plain table"),
            ],
            Directive::NO_FILE_COMP,
        ),
    );

    let config = tree.add_command(
        root_id,
        Command::new("config")
            .with_short("Inspect or change settings")
            .with_group_id("data"),
    );
    tree.add_command(
        config,
        Command::new("get <key>")
            .with_short("Print one setting")
            .with_args(args::exact_args(1))
            .with_run(|ctx| {
                println!("{} = (unset)", ctx.args()[0]);
                Ok(())
            }),
    );
    tree.add_command(
        config,
        Command::new("set <key> <value>")
            .with_short("Change one setting")
            .with_args(args::exact_args(2))
            .with_run(|ctx| {
                println!("{} = {}", ctx.args()[0], ctx.args()[1]);
                Ok(())
            }),
    );

    tree.add_command(
        root_id,
        Command::new("dump")
            .with_short("Export everything as JSON")
            .with_deprecated("use 'export --format json' instead.")
            .with_run(|_ctx| {
                println!("{}", serde_json::json!({ "services": [] }));
                Ok(())
            }),
    );

    tree.add_command(
        root_id,
        Command::new("selftest")
            .with_short("Run internal checks")
            .with_hidden()
            .with_run(|_ctx| {
                println!("selftest ok");
                Ok(())
            }),
    );

    tree.add_command(
        root_id,
        Command::new("exec <command>...")
            .with_short("Run a command inside the service sandbox")
            .with_disable_flag_parsing()
            .with_args(args::minimum_args(1))
            .with_run(|ctx| {
                println!("exec: {}", ctx.args().join(" "));
                Ok(())
            }),
    );

    tree
}

fn run_serve(ctx: &CommandContext<'_>) -> Result<()> {
    let listen = ctx.flag_value("listen").unwrap_or_default();
    let address = ctx.args().first().cloned().unwrap_or(listen);
    if ctx.flag_changed("verbose") {
        println!(
            "log-level={} workers={}",
            ctx.flag_value("log-level").unwrap_or_default(),
            ctx.flag_value("workers").unwrap_or_default(),
        );
    }
    println!("serving on {address}");
    Ok(())
}

fn run_status(ctx: &CommandContext<'_>) -> Result<()> {
    match ctx.args().first() {
        Some(service) => println!("{service}: running"),
        None => {
            for (name, _) in SERVICES {
                println!("{name}: running");
            }
        }
    }
    Ok(())
}

/// What `export` would have written, printed instead of written.
#[derive(Debug, Serialize)]
struct ExportPlan {
    format: String,
    output: Option<String>,
    compress: bool,
    services: Vec<String>,
}

fn run_export(ctx: &CommandContext<'_>) -> Result<()> {
    let services = if ctx.args().is_empty() {
        SERVICES.iter().map(|(name, _)| name.to_string()).collect()
    } else {
        ctx.args().to_vec()
    };
    let plan = ExportPlan {
        format: ctx.flag_value("format").unwrap_or_default(),
        output: ctx.flag_value("output").filter(|dir| !dir.is_empty()),
        compress: ctx.flag_changed("compress"),
        services,
    };
    let rendered = serde_json::to_string_pretty(&plan)
        .map_err(|err| arbor_core::CommandError::Message(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn complete_service_names(
    ctx: &CommandContext<'_>,
    to_complete: &str,
) -> Result<(Completions, Directive)> {
    let mut completions = Completions::default();
    if ctx.args().is_empty() {
        for (name, description) in SERVICES {
            if name.starts_with(to_complete) {
                completions.push_with_description(name, description);
            }
        }
    }
    Ok((completions, Directive::NO_FILE_COMP))
}
