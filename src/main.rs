use clap::{Parser, Subcommand};
use magick_exec::config::{Config, ConfigLoader};
use magick_exec::{subprocess, ExecError, Invoker, Resolver};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Run ImageMagick tools with platform-aware executable resolution
#[derive(Parser)]
#[command(name = "magick-exec")]
#[command(about = "Run ImageMagick commands, picking the right executable on every platform", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute an ImageMagick command, e.g. `run identify -version`
    Run {
        /// Directory to run the command in
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// The command: program name followed by its parameters. Words that
        /// contain whitespace are wrapped in double quotes before the command
        /// is handed to the shell.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Print the path a program name resolves to
    Resolve {
        /// Program name, e.g. `convert`
        program: String,
    },
}

fn init_tracing(verbose: u8, config: &Config) {
    let log_level = match (verbose, config.log_level.as_deref()) {
        (0, Some(level)) => level,
        (0, None) => "info",
        (1, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(verbose >= 3) // Show line numbers for -vvv
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose, &config);

    debug!("magick-exec started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
    trace!("Configuration: {:?}", config);

    let runner = subprocess::system_runner();
    let resolver = Arc::new(Resolver::detect(
        config.search_settings(),
        Arc::clone(&runner),
    ));
    debug!("Resolving executables for platform: {}", resolver.platform());

    let result = match cli.command {
        Commands::Run { cwd, command } => {
            let mut invoker = Invoker::new(resolver, runner);
            if let Some(dir) = cwd {
                invoker = invoker.with_working_dir(dir);
            }
            run_command(&invoker, &join_words(&command)).await
        }
        Commands::Resolve { program } => resolve_program(&resolver, &program).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        if let Some(stderr) = e.stderr().filter(|s| !s.trim().is_empty()) {
            eprint!("{stderr}");
        }
        std::process::exit(1);
    }
}

/// Join CLI words into one command string, keeping spaced words together.
fn join_words(words: &[String]) -> String {
    words
        .iter()
        .map(|word| {
            if word.chars().any(char::is_whitespace) {
                format!("\"{word}\"")
            } else {
                word.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn run_command(invoker: &Invoker, command: &str) -> Result<(), ExecError> {
    let result = invoker.execute(command).await?;
    print!("{}", result.stdout);
    eprint!("{}", result.stderr);
    Ok(())
}

async fn resolve_program(resolver: &Resolver, program: &str) -> Result<(), ExecError> {
    let path = resolver.resolve(program).await?;
    println!("{path}");
    Ok(())
}
