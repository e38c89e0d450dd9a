mod commands;

use clap::Parser;
use histo_core::domain::HistoError;

pub fn run_from_env() -> i32 {
    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_histo_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            diagnostic.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("histo".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_logging(cli.log_level);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

fn init_logging(level: tracing::Level) {
    // A second initialization in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(name = "histo", about = "Inspect and edit single-spectrum histogram workspaces")]
struct Cli {
    /// Maximum log level written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the title, modes and sizes of a workspace document
    Inspect(commands::InspectArgs),
    /// Scale one bin's counts and errors by (1 - weight)
    Mask(commands::MaskArgs),
    /// Zero all counts and errors, keeping X
    Clear(commands::ClearArgs),
    /// Convert Y and E between counts and frequencies
    Convert(commands::ConvertArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Inspect(args) => commands::run_inspect_command(args.into_request()),
        CliCommand::Mask(args) => commands::run_mask_command(args.into_request()),
        CliCommand::Clear(args) => commands::run_clear_command(args.into_request()),
        CliCommand::Convert(args) => commands::run_convert_command(args.into_request()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Core(#[from] HistoError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_histo_error(&self) -> HistoError {
        match self {
            Self::Usage(message) => HistoError::invalid_argument("CLI.USAGE", message.trim_end()),
            Self::Core(error) => error.clone(),
            Self::Internal(error) => HistoError::io("CLI.INTERNAL", format!("{error:#}")),
        }
    }
}
