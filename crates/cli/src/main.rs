mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::scaffold::ScaffoldArgs;
use commands::Project;
use hamlet_core::HamletError;
use logging::LoggingConfig;

#[derive(Parser, Debug)]
#[command(name = "hamlet")]
#[command(version)]
#[command(about = "HAML scaffold generator for Rails projects")]
struct Cli {
    /// Root directory of the Rails project
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to <root>/.hamlet/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output; repeat for more detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a HAML scaffold: model, controller, views, tests and route
    #[command(alias = "g")]
    Generate(ScaffoldArgs),

    /// Remove a previously generated scaffold and its route
    #[command(alias = "d")]
    Destroy(ScaffoldArgs),

    /// List resources declared in the routing file
    Routes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run(cli: Cli) -> Result<(), HamletError> {
    let project = Project::new(cli.root, cli.config);

    match cli.command {
        Commands::Generate(args) => commands::scaffold::generate(&project, &args),
        Commands::Destroy(args) => commands::scaffold::destroy(&project, &args),
        Commands::Routes { json } => commands::routes::list(&project, json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        verbosity: cli.verbose,
        json_format: cli.log_json,
    };
    if let Err(e) = logging::init_logging(logging) {
        eprintln!("warning: could not initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
