//! PLX reference host binary

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgMatches, Command};
use plx_executor::Executor;
use plx_host::{demo, logging, simulate, Settings, SimulateOptions};
use plx_registry::SchemaKind;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("plx-host")
        .version(plx_host::VERSION)
        .about("PLX reference host")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("versions").about("List installed plugin versions"))
        .subcommand(
            Command::new("schema")
                .about("Print a schema document of a plugin version")
                .arg(Arg::new("version").required(true).help("Plugin version"))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .default_value("inputs")
                        .value_parser(value_parser!(SchemaKind))
                        .help("inputs, context-inputs or outputs"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run a trace locally until it reaches a terminal state")
                .arg(Arg::new("version").required(true).help("Plugin version"))
                .arg(
                    Arg::new("trace-id")
                        .long("trace-id")
                        .help("Trace id (random when omitted)"),
                )
                .arg(
                    Arg::new("inputs")
                        .long("inputs")
                        .default_value("{}")
                        .help("Inputs as JSON"),
                )
                .arg(
                    Arg::new("context-inputs")
                        .long("context-inputs")
                        .default_value("{}")
                        .help("Context inputs as JSON"),
                )
                .arg(
                    Arg::new("max-rounds")
                        .long("max-rounds")
                        .default_value("100")
                        .value_parser(value_parser!(u32))
                        .help("Schedule rounds allowed after execute"),
                ),
        )
        .subcommand(Command::new("settings").about("Print the effective settings"))
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let settings = Settings::load().context("failed to load settings")?;
    logging::init(&settings);

    let executor = Executor::new(Arc::new(demo::registry()));

    match matches.subcommand() {
        Some(("versions", _)) => {
            let registry = executor.registry();
            for version in registry.list_versions() {
                let record = registry.lookup(version)?;
                println!("{version}\t{}", record.desc());
            }
        }
        Some(("schema", args)) => {
            let version = arg::<String>(args, "version")?;
            let kind = *arg::<SchemaKind>(args, "kind")?;
            let record = executor.registry().lookup(version)?;
            println!("{}", serde_json::to_string_pretty(record.schema(kind).json())?);
        }
        Some(("simulate", args)) => {
            let version = arg::<String>(args, "version")?;
            let trace_id = args
                .get_one::<String>("trace-id")
                .cloned()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            let mut options = SimulateOptions::new(trace_id);
            options.inputs = serde_json::from_str(arg::<String>(args, "inputs")?)
                .context("--inputs is not valid JSON")?;
            options.context_inputs = serde_json::from_str(arg::<String>(args, "context-inputs")?)
                .context("--context-inputs is not valid JSON")?;
            options.max_rounds = *arg::<u32>(args, "max-rounds")?;

            let report = simulate(&executor, version, &options);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.succeeded() {
                std::process::exit(1);
            }
        }
        Some(("settings", _)) => {
            println!("{}", serde_json::to_string_pretty(&settings.redacted())?);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

fn arg<'a, T>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    args.get_one::<T>(name)
        .ok_or_else(|| anyhow!("missing argument {name}"))
}
