//! oj-core - online judge configuration and operations CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use oj_common::OutputFormat;
use oj_config::{load_startup, ConfigOptions, LoadedConfig};
use oj_core::commands;
use oj_core::exit_codes::ExitCode;
use oj_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel,
};
use oj_core::output::{CommandResult, Failure, RunContext};

/// Online judge configuration and operations
#[derive(Parser)]
#[command(name = "oj-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Configuration file [default: $OJ_CONFIG, $OJ_DATA_DIR/config.json, ./data/config.json]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr [default: $OJ_LOG_FORMAT, human]
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and report every violation
    Check,

    /// Print the configuration, or a single key
    Show(ShowArgs),

    /// Print a snapshot of the loaded configuration
    Snapshot,

    /// Print the JSON Schema of the configuration document
    Schema(SchemaArgs),

    /// Apply a partial configuration document
    Patch(PatchArgs),

    /// Split testcases across the configured judge servers
    Distribute(DistributeArgs),

    /// Empty a directory, keeping the directory itself
    Clean(CleanArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Key to print (e.g. store_place)
    key: Option<String>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Schema of the partial update document instead
    #[arg(long)]
    patch: bool,
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// JSON file holding the fields to change
    file: PathBuf,

    /// Write the result back to the configuration file
    #[arg(long)]
    write: bool,
}

#[derive(Args, Debug)]
struct DistributeArgs {
    /// Number of testcases (ids 1..=N)
    #[arg(long)]
    testcases: u64,

    /// Report which server runs this testcase id
    #[arg(long)]
    locate: Option<u64>,
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Directory to empty
    dir: PathBuf,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Check => "check",
            Commands::Show(_) => "show",
            Commands::Snapshot => "snapshot",
            Commands::Schema(_) => "schema",
            Commands::Patch(_) => "patch",
            Commands::Distribute(_) => "distribute",
            Commands::Clean(_) => "clean",
            Commands::Version => "version",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let log_config = LogConfig::from_env(cli_level, cli.global.log_format);
    init_logging(&log_config);

    let ctx = RunContext {
        run_id: generate_run_id(),
        format: cli.global.format,
    };
    let command = cli.command.name();
    tracing::debug!(event = event_names::RUN_STARTED, run_id = %ctx.run_id, command, "starting");

    let options = ConfigOptions {
        config_path: cli.global.config.clone(),
        working_dir: None,
    };
    let result = dispatch(&cli.command, &options);

    let exit_code = match result {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            match ctx.emit(command, &output, &mut stdout).and_then(|_| stdout.flush()) {
                Ok(()) => ExitCode::Clean,
                Err(err) => {
                    tracing::error!(error = %err, "failed to write output");
                    ExitCode::IoError
                }
            }
        }
        Err(failure) => report_failure(&ctx, command, &failure),
    };

    tracing::debug!(
        event = event_names::RUN_FINISHED,
        run_id = %ctx.run_id,
        exit_code = exit_code.as_i32(),
        "finished"
    );
    std::process::exit(exit_code.as_i32());
}

fn dispatch(command: &Commands, options: &ConfigOptions) -> CommandResult {
    match command {
        Commands::Check => commands::check::run(options),
        Commands::Schema(args) => commands::schema::run(args.patch),
        Commands::Clean(args) => commands::clean::run(&args.dir),
        Commands::Version => Ok(commands::version()),
        Commands::Show(args) => {
            let loaded = load(options)?;
            commands::show::run(&loaded.config, args.key.as_deref())
        }
        Commands::Snapshot => {
            let loaded = load(options)?;
            commands::snapshot::run(&loaded)
        }
        Commands::Patch(args) => {
            let loaded = load(options)?;
            commands::patch::run(&loaded, &args.file, args.write)
        }
        Commands::Distribute(args) => {
            let loaded = load(options)?;
            commands::distribute::run(&loaded.config, args.testcases, args.locate)
        }
    }
}

fn load(options: &ConfigOptions) -> Result<LoadedConfig, Failure> {
    load_startup(options).map_err(|err| {
        tracing::debug!(event = event_names::CONFIG_ERROR, error = %err, "configuration failed to load");
        Failure::from(err)
    })
}

fn report_failure(ctx: &RunContext, command: &str, failure: &Failure) -> ExitCode {
    let mut stderr = io::stderr().lock();
    match ctx.emit_failure(command, failure, &mut stderr) {
        Ok(code) => code,
        Err(_) => failure.exit_code(),
    }
}
