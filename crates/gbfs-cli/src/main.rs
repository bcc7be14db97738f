use anyhow::Result;
use clap::Parser;
use tracing::Level;

use gbfs_cli::{ByteOrder, CommandContext, Commands, OutputFormat, commands};

#[derive(Parser)]
#[command(
    name = "gbfs",
    about = "Pack, list and extract GBFS archives",
    version,
    long_about = "A command-line tool for GBFS flat file archives: bundles named binary blobs into a single file and reads them back."
)]
struct Cli {
    /// Set the logging level
    #[arg(
        short,
        long,
        value_enum,
        global = true,
        env = "GBFS_LOG_LEVEL",
        default_value = "warn"
    )]
    log_level: LogLevel,

    /// Byte order of header and directory fields
    #[arg(
        short,
        long,
        value_enum,
        global = true,
        env = "GBFS_BYTE_ORDER",
        default_value = "big"
    )]
    byte_order: ByteOrder,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so listings and JSON stay clean on stdout
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CommandContext {
        byte_order: cli.byte_order,
        format: cli.format,
    };

    match cli.command {
        Commands::Pack(args) => commands::pack::handle(args, ctx)?,
        Commands::List { archive } => commands::list::handle(&archive, ctx)?,
        Commands::Info { archive } => commands::info::handle(&archive, ctx)?,
        Commands::Extract { archive, dir } => commands::extract::handle(&archive, &dir, ctx)?,
    }

    Ok(())
}
