//! `linekit-calc`: an interactive calculator on top of the linekit editor.

mod calc;
mod handler;

use clap::Parser;
use handler::CalcHandler;
use linekit::{ReplConfig, ReplError, TerminalMode};
use log::info;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "linekit-calc")]
#[command(about = "Interactive calculator with line editing, history and completion")]
#[command(version)]
struct Cli {
    /// Prompt shown before each line
    #[arg(long, default_value = "calc> ")]
    prompt: String,

    /// File to load history from and save it to on exit
    #[arg(long, value_name = "PATH")]
    history_file: Option<PathBuf>,

    /// Do not flash the matching opening bracket
    #[arg(long)]
    no_highlight: bool,

    /// Leave terminal signal keys (Ctrl+C, Ctrl+Z) enabled
    #[arg(long)]
    cbreak: bool,

    /// How long the cursor rests on a matching bracket, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 150)]
    pause_ms: u64,
}

impl Cli {
    fn config(&self) -> ReplConfig {
        ReplConfig {
            highlight_pause: Duration::from_millis(self.pause_ms),
            bracket_highlight: !self.no_highlight,
            terminal_mode: if self.cbreak {
                TerminalMode::Cbreak
            } else {
                TerminalMode::Raw
            },
            ..ReplConfig::default()
        }
    }

    fn handler(&self) -> CalcHandler {
        let handler = CalcHandler::new(self.prompt.as_str());
        match &self.history_file {
            Some(path) => handler.with_history_file(path),
            None => handler,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ReplError> {
    let cli = Cli::parse();
    linekit::debug::init();

    let config = cli.config();
    info!("starting calculator in {} mode", config.terminal_mode);
    match linekit::run_with_config(config, cli.handler()) {
        Ok(_) => Ok(()),
        // Closing stdin ends the session like Ctrl+D does.
        Err(e) if e.is_end_of_stream() => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linekit::ReplHandler;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["linekit-calc"]);
        let config = cli.config();
        assert_eq!(config, ReplConfig::default());
        assert_eq!(cli.prompt, "calc> ");
        assert!(cli.history_file.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "linekit-calc",
            "--prompt",
            ">> ",
            "--no-highlight",
            "--cbreak",
            "--pause-ms",
            "0",
            "--history-file",
            "/tmp/calc-history",
        ]);
        let config = cli.config();
        assert!(!config.bracket_highlight);
        assert_eq!(config.terminal_mode, TerminalMode::Cbreak);
        assert_eq!(config.highlight_pause, Duration::ZERO);
        assert_eq!(cli.history_file, Some(PathBuf::from("/tmp/calc-history")));
        assert_eq!(cli.handler().prompt(), ">> ");
    }
}
