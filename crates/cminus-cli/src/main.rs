//! cminus - command-line driver for the C-Minus semantic analyzer
//!
//! Reads syntax trees produced by the parser, runs declaration binding and
//! type checking, and reports symbol and type errors.

mod commands;
mod logging;
mod output;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "cminus",
    author,
    version,
    about = "Scope resolution and type checking for C-Minus programs",
    long_about = "cminus analyzes C-Minus syntax trees.\n\n\
                  It builds the scope table, resolves every identifier to its declaration\n\
                  and checks expression, call and return types."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "warn",
        help = "Set the log level"
    )]
    pub log_level: LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);

    match cli.command {
        Commands::Check(args) => args.run(),
        Commands::Explain(args) => args.run(),
    }
}
