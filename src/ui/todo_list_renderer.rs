use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use std::time::{Duration, Instant};

use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::{
    todo_client::TodoApi,
    ui::app::{App, InputMode},
};

/// Runs the interactive todo list until the user quits
pub fn render_todo_list<A: TodoApi>(api: &A) -> anyhow::Result<()> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();

    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let mut app = App::new();

    let res = run_app(&mut terminal, &mut app, api, tick_rate);

    // restore terminal
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    res?;

    Ok(())
}

fn run_app<B: Backend, A: TodoApi>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    api: &A,
    tick_rate: Duration,
) -> std::io::Result<()> {
    // draw the loading state once before the first fetch blocks
    terminal.draw(|f| ui(f, app))?;
    app.load(api);

    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::None => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.todos.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.todos.previous(),
                        KeyCode::Left => app.todos.unselect(),
                        KeyCode::Char('a') => app.input_mode = InputMode::Editing,
                        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(api),
                        KeyCode::Char('x') => app.delete_selected(api),
                        KeyCode::Char('r') => app.load(api),
                        _ => {}
                    },
                    InputMode::Editing => match key.code {
                        KeyCode::Char(c) => {
                            app.input_text.push(c);
                        }
                        KeyCode::Backspace => {
                            app.input_text.pop();
                        }
                        KeyCode::Esc => {
                            app.input_mode = InputMode::None;
                        }
                        KeyCode::Enter => {
                            app.add_todo(api);
                        }
                        _ => {}
                    },
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn draw_banner<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let text = match app.banner() {
        Some(message) => Spans::from(Span::styled(message, Style::default().fg(Color::Red))),
        None => Spans::from(""),
    };

    let banner = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Todo")
            .border_style(Style::default().fg(if app.banner().is_some() {
                Color::LightRed
            } else {
                Color::LightCyan
            })),
    );

    f.render_widget(banner, area);
}

fn draw_input<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let (title, style) = match app.input_mode {
        InputMode::Editing => (
            "New todo (Enter to add, Esc to stop editing)",
            Style::default().fg(Color::Yellow),
        ),
        InputMode::None => ("Press a to add a todo", Style::default()),
    };

    let input = Paragraph::new(app.input_text.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);
}

fn draw_list<B: Backend>(f: &mut Frame<B>, app: &mut App, area: Rect) {
    if app.is_loading() {
        let loading = Paragraph::new("Loading...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));

        return f.render_widget(loading, area);
    }

    if app.todos.items.is_empty() {
        let empty = Paragraph::new(vec![
            Spans::from("All done!"),
            Spans::from("Press a to add something new"),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

        return f.render_widget(empty, area);
    }

    let items: Vec<ListItem> = app
        .todos
        .items
        .iter()
        .map(|todo| {
            let (mark, style) = if todo.completed {
                (
                    "[x] ",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ] ", Style::default())
            };

            ListItem::new(Spans::from(vec![
                Span::raw(mark),
                Span::styled(todo.title.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut app.todos.state);
}

fn draw_footer<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(
        "q quit  j/k move  space toggle  x delete  r reload",
    )];

    if !app.todos.items.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!(
                "Completed: {} / {}",
                app.completed_count(),
                app.todos.items.len()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(Paragraph::new(Spans::from(spans)), area);
}

fn ui<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    draw_banner(f, app, chunks[0]);
    draw_input(f, app, chunks[1]);
    draw_list(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);
}
