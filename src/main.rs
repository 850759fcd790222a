//! main.rs
//! Entry point for faro

pub(crate) mod app;
pub(crate) mod config;
pub(crate) mod core;
pub(crate) mod ui;
pub(crate) mod utils;

use crate::app::engine::BrowserEngine;
use crate::config::Config;
use crate::core::terminal;
use crate::utils::cli::{CliAction, handle_args};

use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        eprintln!("\n[faro] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();

    if let CliAction::Exit = action {
        return Ok(());
    }

    let config = Config::load();

    let mut engine = match action {
        CliAction::RunApp => BrowserEngine::new(&config)?,
        CliAction::RunAppAtPath(path_arg) => {
            let target = PathBuf::from(&path_arg);
            if !target.is_dir() {
                eprintln!("\n[faro] Error: Path '{}' is not a directory.", path_arg);
                std::process::exit(1);
            }
            BrowserEngine::from_dir(&config, target)?
        }
        CliAction::Exit => unreachable!(),
    };

    terminal::run_terminal(&mut engine)
}
