//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop.
//! The screen is split into a tab bar, a header with the current path and
//! sort mode, the entry list (or search results), and a footer carrying
//! either the transient status message or the keybind hints.
//!
//! This module stays pure rendering: it reads engine state and produces
//! widgets, without owning any browsing logic.

use crate::app::engine::{BrowserEngine, ClipboardOp};
use crate::core::fm::EntryKind;
use crate::utils::{format_entry_size, format_mtime, shorten_home_path, truncate_to_width};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

const METADATA_WIDTH: usize = 28;

fn kind_color(kind: EntryKind) -> Color {
    match kind {
        EntryKind::Directory => Color::Cyan,
        EntryKind::Executable => Color::Green,
        EntryKind::Archive => Color::Yellow,
        EntryKind::Image => Color::Magenta,
        EntryKind::Default => Color::Reset,
    }
}

/// Render function which renders the entire terminal UI for faro on each frame.
pub(crate) fn render(frame: &mut Frame, engine: &BrowserEngine) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Length(1), // header
            Constraint::Min(1),   // listing
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_tab_bar(frame, engine, chunks[0]);
    render_header(frame, engine, chunks[1]);
    if engine.is_searching() {
        render_search(frame, engine, chunks[2]);
    } else {
        render_listing(frame, engine, chunks[2]);
    }
    render_footer(frame, engine, chunks[3]);
}

fn render_tab_bar(frame: &mut Frame, engine: &BrowserEngine, area: Rect) {
    let active = engine.active_tab_idx();
    let mut spans = Vec::with_capacity(engine.tab_count() * 2);
    for idx in 0..engine.tab_count() {
        let label = format!(" {} ", idx + 1);
        let style = if idx == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_header(frame: &mut Frame, engine: &BrowserEngine, area: Rect) {
    let session = engine.session();
    let path_str = shorten_home_path(session.current_path());
    let path_width = (area.width as usize).saturating_sub(METADATA_WIDTH);

    let mut spans = vec![
        Span::styled(
            truncate_to_width(&path_str, path_width),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", session.sort_mode().label()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if session.show_hidden() {
        spans.push(Span::styled(
            " [hidden]",
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !engine.clipboard().is_empty() {
        let verb = match engine.clipboard().op() {
            Some(ClipboardOp::Cut) => "cut",
            _ => "copy",
        };
        spans.push(Span::styled(
            format!(" [{} {}]", engine.clipboard().files().len(), verb),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_listing(frame: &mut Frame, engine: &BrowserEngine, area: Rect) {
    let session = engine.session();
    let Some(listing) = session.listing() else {
        frame.render_widget(
            Paragraph::new(Span::styled("<loading>", Style::default().fg(Color::DarkGray))),
            area,
        );
        return;
    };
    if listing.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("<empty>", Style::default().fg(Color::DarkGray))),
            area,
        );
        return;
    }

    let name_width = (area.width as usize).saturating_sub(METADATA_WIDTH + 4);
    let items: Vec<ListItem> = listing
        .entries()
        .iter()
        .map(|entry| {
            let marked = session.selected_files().contains(entry.name());
            let marker = if marked { "* " } else { "  " };
            let mut name = truncate_to_width(&entry.name_str(), name_width);
            if entry.is_dir() {
                name.push('/');
            }
            let pad = name_width.saturating_sub(
                unicode_width::UnicodeWidthStr::width(name.as_str()),
            );

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{name}{}", " ".repeat(pad)),
                    Style::default().fg(kind_color(entry.kind())),
                ),
                Span::styled(
                    format!(
                        " {:>9}  {}",
                        format_entry_size(entry.size(), entry.is_dir()),
                        format_mtime(entry.modified())
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(session.selected_idx()));
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_search(frame: &mut Frame, engine: &BrowserEngine, area: Rect) {
    let session = engine.session();
    let search = session.search();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let prompt = Line::from(vec![
        Span::styled("search: ", Style::default().fg(Color::Yellow)),
        Span::raw(search.query().to_string()),
        Span::styled(
            format!("  ({} matches)", search.filtered().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(prompt), chunks[0]);

    let width = chunks[1].width as usize;
    let items: Vec<ListItem> = search
        .filtered()
        .iter()
        .map(|rel| ListItem::new(truncate_to_width(rel, width)))
        .collect();

    let mut state = ListState::default();
    state.select(Some(session.selected_idx()));
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_footer(frame: &mut Frame, engine: &BrowserEngine, area: Rect) {
    let line = if let Some(status) = engine.status_text() {
        Line::from(Span::styled(
            truncate_to_width(status, area.width as usize),
            Style::default().fg(Color::Yellow),
        ))
    } else if engine.is_searching() {
        Line::from(Span::styled(
            "type to filter | enter open | esc cancel",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            "q quit | enter open | space mark | c/x/v copy/cut/paste | d del | / find | t tab",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
