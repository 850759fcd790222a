//! Terminal rendering and event loop for faro.
//!
//! Handles setup/teardown of raw mode, alternate screen, redraws,
//! and mapping events (keypress, resize) to engine commands.

use crate::app::engine::{BrowserEngine, Command, CommandResult};
use crate::core::fileops::{Confirmer, Progress};
use crate::ui;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::Print,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode, size,
    },
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::{
    io,
    time::{Duration, Instant},
};

/// Initializes the terminal in raw mode and alternate screen and runs the
/// main event loop.
///
/// Blocks until quit. Returns an std::io::Error if terminal setup or
/// teardown fails.
pub(crate) fn run_terminal(engine: &mut BrowserEngine) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, engine);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    result
}

/// Main event loop of faro: draws UI, polls for events and dispatches them
/// to the engine. Returns on quit.
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, engine: &mut BrowserEngine) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    let mut confirmer = TerminalConfirmer;
    let mut progress = TerminalProgress::new();
    terminal.draw(|f| ui::render(f, engine))?;

    loop {
        if engine.tick() {
            terminal.draw(|f| ui::render(f, engine))?;
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(cmd) = map_key(key, engine.is_searching()) else {
                    continue;
                };
                if engine.handle(cmd, &mut confirmer, &mut progress) == CommandResult::Quit {
                    break;
                }
                // Redraw after state change
                terminal.draw(|f| ui::render(f, engine))?;
            }
            Event::Resize(_, _) => {
                terminal.draw(|f| ui::render(f, engine))?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Maps a keypress to an engine command. Search mode captures plain
/// characters for the query; everything else uses the normal keymap.
fn map_key(key: KeyEvent, searching: bool) -> Option<Command> {
    if searching {
        return match key.code {
            KeyCode::Esc => Some(Command::CancelSearch),
            KeyCode::Enter => Some(Command::NavigateInto),
            KeyCode::Backspace => Some(Command::SearchBackspace),
            KeyCode::Up => Some(Command::MoveUp),
            KeyCode::Down => Some(Command::MoveDown),
            KeyCode::Char(c) => Some(Command::SearchChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Up => Some(Command::MoveUp),
        KeyCode::Down => Some(Command::MoveDown),
        KeyCode::Enter | KeyCode::Right => Some(Command::NavigateInto),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::NavigateUp),
        KeyCode::PageUp => Some(Command::Back),
        KeyCode::PageDown => Some(Command::Forward),
        KeyCode::Char(' ') => Some(Command::ToggleSelection),
        KeyCode::Char('c') => Some(Command::Copy),
        KeyCode::Char('x') => Some(Command::Cut),
        KeyCode::Char('v') => Some(Command::Paste),
        KeyCode::Char('d') => Some(Command::Delete),
        KeyCode::Char('.') => Some(Command::ToggleHidden),
        KeyCode::Char('s') => Some(Command::CycleSort),
        KeyCode::F(5) => Some(Command::Refresh),
        KeyCode::Char('/') | KeyCode::F(6) => Some(Command::StartSearch),
        KeyCode::Char('t') | KeyCode::Tab => Some(Command::NextTab),
        KeyCode::Char('T') => Some(Command::PrevTab),
        KeyCode::Char('w') => Some(Command::CloseTab),
        _ => None,
    }
}

/// Blocking yes/no prompt drawn on the bottom terminal row. The next full
/// frame repaints over it.
struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, prompt: &str) -> bool {
        if draw_prompt(prompt).is_err() {
            return false;
        }
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => return true,
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return false,
                    _ => {}
                },
                Ok(_) => {}
                Err(_) => return false,
            }
        }
    }
}

fn draw_prompt(prompt: &str) -> io::Result<()> {
    let (_, rows) = size()?;
    execute!(
        io::stdout(),
        MoveTo(0, rows.saturating_sub(1)),
        Clear(ClearType::CurrentLine),
        Print(format!("{prompt} [y/n] "))
    )
}

/// Paints a one-line progress counter on the bottom row while a
/// multi-item operation runs, throttled so large batches do not spend
/// their time redrawing. The last item always lands.
struct TerminalProgress {
    last_draw: Option<Instant>,
}

const PROGRESS_REDRAW_EVERY: Duration = Duration::from_millis(100);

impl TerminalProgress {
    fn new() -> Self {
        Self { last_draw: None }
    }
}

impl Progress for TerminalProgress {
    fn report(&mut self, done: usize, total: usize, item: &str) {
        let due = match self.last_draw {
            Some(at) => at.elapsed() >= PROGRESS_REDRAW_EVERY,
            None => true,
        };
        if !due && done < total {
            return;
        }
        if done >= total {
            self.last_draw = None;
        } else {
            self.last_draw = Some(Instant::now());
        }

        let line = format!("{done}/{total} {item}");
        let _ = (|| -> io::Result<()> {
            let (_, rows) = size()?;
            execute!(
                io::stdout(),
                MoveTo(0, rows.saturating_sub(1)),
                Clear(ClearType::CurrentLine),
                Print(line)
            )
        })();
    }
}
