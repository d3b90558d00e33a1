mod app;

use std::{io, time::Duration};

use chrono::{DateTime, Utc};
use color_eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use ticklist_core::{
    notify::{NoticeLevel, RecordingNotifier},
    storage::KeyValueStore,
    todos::{Priority, TodoItem},
};
use ticklist_manager::TodoListManager;

use crate::dates::describe_dates;
use app::{App, Mode};

/// Interactive list. The manager must have been built with `notices` as its notifier.
/// Press `q` or `Esc` to exit.
pub fn launch<S: KeyValueStore>(
    manager: TodoListManager<S>,
    notices: RecordingNotifier,
) -> Result<()> {
    // Guard restores the terminal even if we early-return.
    let guard = TerminalGuard::enter()?;
    let mut terminal = guard.terminal()?;
    let mut app = App::new(manager, notices);

    loop {
        terminal.draw(|frame| draw(frame, &app))?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

struct Palette {
    accent: Color,
    text: Color,
    muted: Color,
    done: Color,
    highlight: Color,
}

impl Palette {
    fn for_theme(dark: bool) -> Self {
        if dark {
            Palette {
                accent: Color::Cyan,
                text: Color::White,
                muted: Color::DarkGray,
                done: Color::Green,
                highlight: Color::Rgb(40, 44, 52),
            }
        } else {
            Palette {
                accent: Color::Blue,
                text: Color::Black,
                muted: Color::Gray,
                done: Color::Rgb(22, 163, 74),
                highlight: Color::Rgb(224, 231, 255),
            }
        }
    }
}

fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let palette = Palette::for_theme(app.dark);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let stats = app.manager.stats();
    let filters = app.manager.filters();
    let mut header_spans = vec![
        Span::styled(
            "Ticklist",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} total · {} active · {} completed",
            stats.total, stats.active, stats.completed
        )),
        Span::styled(
            format!(
                "   status: {}  category: {}",
                filters.status, filters.category
            ),
            Style::default().fg(palette.muted),
        ),
    ];
    if !app.search.is_empty() {
        header_spans.push(Span::styled(
            format!("  search: \"{}\"", app.search),
            Style::default().fg(palette.muted),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(header, chunks[0]);

    let visible = app.visible();
    let items: Vec<ListItem> = if visible.is_empty() {
        vec![ListItem::new(Span::styled(
            empty_hint(app),
            Style::default().fg(palette.muted),
        ))]
    } else {
        let now = Utc::now();
        visible.iter().map(|t| todo_line(t, &palette, now)).collect()
    };
    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected));
    }
    let body = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Todos"))
        .highlight_style(Style::default().bg(palette.highlight))
        .highlight_symbol("› ");
    frame.render_stateful_widget(body, chunks[1], &mut state);

    let footer = Paragraph::new(footer_line(app, &palette)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(footer_title(app)),
    );
    frame.render_widget(footer, chunks[2]);
}

fn todo_line<'a>(todo: &'a TodoItem, palette: &Palette, now: DateTime<Utc>) -> ListItem<'a> {
    let (mark, mark_color) = if todo.completed {
        ("[x]", palette.done)
    } else {
        ("[ ]", palette.muted)
    };
    let text_style = if todo.completed {
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(palette.text)
    };
    ListItem::new(Line::from(vec![
        Span::styled(mark, Style::default().fg(mark_color)),
        Span::raw(" "),
        Span::styled(todo.text.as_str(), text_style),
        Span::styled(
            format!("  {}", todo.category),
            Style::default().fg(palette.accent),
        ),
        Span::styled(
            format!(" {}", todo.priority),
            Style::default().fg(priority_color(todo.priority)),
        ),
        Span::styled(
            format!(
                "  {}",
                describe_dates(todo.created_at, todo.completed_at, now)
            ),
            Style::default().fg(palette.muted),
        ),
    ]))
}

fn empty_hint<S: KeyValueStore>(app: &App<S>) -> &'static str {
    if app.manager.is_empty() {
        "No todos yet. Press `a` to add one."
    } else if !app.manager.filters().search().is_empty() {
        "No matches found. Try adjusting your search or filters."
    } else {
        "No todos match your filters."
    }
}

fn footer_line<'a, S: KeyValueStore>(app: &'a App<S>, palette: &Palette) -> Line<'a> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(palette.accent));
    match &app.mode {
        Mode::Adding { input, category } | Mode::Editing {
            input, category, ..
        } => Line::from(vec![
            Span::raw(format!("{input}▏")),
            Span::styled(format!("  [{category}]"), Style::default().fg(palette.muted)),
            Span::raw("   "),
            key("Enter"),
            Span::raw(" save  "),
            key("Tab"),
            Span::raw(" category  "),
            key("Esc"),
            Span::raw(" cancel"),
        ]),
        Mode::Searching => Line::from(vec![
            Span::raw(format!("/{}▏", app.search)),
            Span::raw("   "),
            key("Enter"),
            Span::raw(" keep  "),
            key("Esc"),
            Span::raw(" clear"),
        ]),
        Mode::Confirming { request, .. } => Line::from(vec![
            Span::styled(
                request.prompt(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            key("y"),
            Span::raw("/"),
            key("n"),
        ]),
        Mode::Browse => match &app.notice {
            Some(notice) => Line::from(Span::styled(
                notice.message.as_str(),
                Style::default().fg(notice_color(notice.level)),
            )),
            None => Line::from(vec![
                key("a"),
                Span::raw(" add  "),
                key("e"),
                Span::raw(" edit  "),
                key("space"),
                Span::raw(" toggle  "),
                key("d"),
                Span::raw(" delete  "),
                key("p"),
                Span::raw(" priority  "),
                key("f"),
                Span::raw(" status  "),
                key("c"),
                Span::raw(" category  "),
                key("/"),
                Span::raw(" search  "),
                key("x/X"),
                Span::raw(" clear done/all  "),
                key("t"),
                Span::raw(" theme  "),
                key("q"),
                Span::raw(" quit"),
            ]),
        },
    }
}

/// Outside browse mode the footer body holds the input line, so notices
/// (e.g. a rejected blank entry) go in the border title instead.
fn footer_title<'a, S: KeyValueStore>(app: &'a App<S>) -> Line<'a> {
    match (&app.mode, &app.notice) {
        (Mode::Browse, _) | (_, None) => Line::from("Controls"),
        (_, Some(notice)) => Line::from(Span::styled(
            notice.message.as_str(),
            Style::default()
                .fg(notice_color(notice.level))
                .add_modifier(Modifier::BOLD),
        )),
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
        NoticeLevel::Info => Color::Blue,
    }
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // Enter alternate screen to avoid polluting the shell buffer.
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }

    fn terminal(&self) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Terminal::new(backend)?)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Errors are reported but not propagated from Drop.
        if let Err(err) = disable_raw_mode() {
            eprintln!("failed to disable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture) {
            eprintln!("failed to restore terminal: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ticklist_core::storage::InMemoryStore;
    use ticklist_manager::ManagerSettings;

    use super::*;

    fn app() -> App<InMemoryStore> {
        let notices = RecordingNotifier::new();
        let manager = TodoListManager::load(
            InMemoryStore::new(),
            Box::new(notices.clone()),
            ManagerSettings::default(),
        )
        .expect("load");
        App::new(manager, notices)
    }

    fn press(app: &mut App<InMemoryStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen(app: &App<InMemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 12)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn blank_entry_warning_is_visible_while_editor_stays_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Adding { .. }));

        let text = screen(&app);
        assert!(text.contains("Please enter a todo item"), "{text}");
        assert!(text.contains("Enter save"));
    }

    #[test]
    fn browse_footer_shows_notice_and_list_shows_dates() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        for ch in "Buy milk".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);

        let text = screen(&app);
        assert!(text.contains("Todo added successfully!"), "{text}");
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Created Today"));
    }

    #[test]
    fn search_footer_echoes_term_as_typed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        for ch in "BUY".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        assert!(screen(&app).contains("/BUY"));
    }
}
