use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

use crate::app::App;
use crate::filter::{FilterChange, Visible};
use crate::status::JobStatus;
use crate::timers::Level;

const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

struct ViewState {
    selected: usize,
    scroll_offset: u16,
    mode: Mode,
    /// Ids of the visible list as of the last draw.
    ids: Vec<String>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
            mode: Mode::Browse,
            ids: Vec::new(),
        }
    }

    fn current_id(&self) -> Option<&str> {
        self.ids.get(self.selected).map(String::as_str)
    }

    fn refresh(&mut self, app: &App) {
        self.ids = app.visible().jobs().iter().map(|j| j.id.clone()).collect();
        if self.selected >= self.ids.len() {
            self.selected = self.ids.len().saturating_sub(1);
        }
    }

    fn next(&mut self) {
        if !self.ids.is_empty() && self.selected < self.ids.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }
}

pub fn run_browse(app: &mut App, today: NaiveDate) -> Result<()> {
    let mut view = ViewState::new();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, app, &mut view, today);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn set_status(app: &mut App, view: &ViewState, status: JobStatus, today: NaiveDate) {
    if let Some(id) = view.current_id() {
        app.set_status(id, status, today, Instant::now());
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    view: &mut ViewState,
    today: NaiveDate,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        view.refresh(app);
        list_state.select(if view.ids.is_empty() { None } else { Some(view.selected) });
        terminal.draw(|frame| draw(frame, app, view, &mut list_state))?;

        let timeout = app
            .debouncer()
            .remaining(Instant::now())
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let now = Instant::now();
                match view.mode {
                    Mode::Search => match key.code {
                        KeyCode::Enter | KeyCode::Esc => {
                            app.flush_filter();
                            view.mode = Mode::Browse;
                            view.reset_selection();
                        }
                        KeyCode::Backspace => {
                            let mut text = app.filter.search.clone();
                            text.pop();
                            app.update_filter(FilterChange::Search(text), now);
                        }
                        KeyCode::Char(c) => {
                            let mut text = app.filter.search.clone();
                            text.push(c);
                            app.update_filter(FilterChange::Search(text), now);
                        }
                        _ => {}
                    },
                    Mode::Browse => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Down | KeyCode::Char('j') => view.next(),
                        KeyCode::Up | KeyCode::Char('k') => view.prev(),
                        KeyCode::Char('J') | KeyCode::PageDown => view.scroll_down(),
                        KeyCode::Char('K') | KeyCode::PageUp => view.scroll_up(),
                        KeyCode::Char('/') => view.mode = Mode::Search,
                        KeyCode::Char('s') => {
                            if let Some(id) = view.current_id() {
                                let id = id.to_string();
                                app.toggle_save(&id, now);
                            }
                        }
                        KeyCode::Char('m') => {
                            app.toggle_match_filter(now);
                            view.reset_selection();
                        }
                        KeyCode::Char('o') => {
                            let next = app.filter.sort.cycle();
                            app.update_filter(FilterChange::Sort(next), now);
                            view.reset_selection();
                        }
                        KeyCode::Char('n') => set_status(app, view, JobStatus::NotApplied, today),
                        KeyCode::Char('a') => set_status(app, view, JobStatus::Applied, today),
                        KeyCode::Char('x') => set_status(app, view, JobStatus::Rejected, today),
                        KeyCode::Char('y') => set_status(app, view, JobStatus::Selected, today),
                        _ => {}
                    },
                }
            }
        }

        if app.tick(Instant::now()) {
            view.reset_selection();
        }
    }
    Ok(())
}

fn status_style(status: JobStatus) -> Style {
    match status {
        JobStatus::NotApplied => Style::default(),
        JobStatus::Applied => Style::default().fg(Color::Cyan),
        JobStatus::Rejected => Style::default().fg(Color::Red),
        JobStatus::Selected => Style::default().fg(Color::Green),
    }
}

fn score_style(score: u8) -> Style {
    match score {
        80.. => Style::default().fg(Color::Green),
        60..=79 => Style::default().fg(Color::Yellow),
        40..=59 => Style::default(),
        _ => Style::default().fg(Color::DarkGray),
    }
}

fn draw(frame: &mut Frame, app: &App, view: &ViewState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    let filter = &app.filter;
    let mut title = format!(" Jobs ({}) sort:{} ", view.ids.len(), filter.sort);
    if filter.match_only {
        title.push_str(&format!("match>={} ", app.preferences().min_match_score));
    }
    if !filter.search.is_empty() {
        title.push_str(&format!("search:\"{}\" ", filter.search));
    }
    if app.recompute_pending() {
        title.push_str("(updating) ");
    }

    // Left panel: job list or empty state
    match app.visible() {
        Visible::Jobs(jobs) => {
            let items: Vec<ListItem> = jobs
                .iter()
                .map(|job| {
                    let saved = if app.is_saved(&job.id) { "*" } else { " " };
                    let status = app.status_of(&job.id);
                    let status_icon = match status {
                        JobStatus::NotApplied => " ",
                        JobStatus::Applied => "+",
                        JobStatus::Rejected => "x",
                        JobStatus::Selected => "v",
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(saved),
                        Span::styled(status_icon, status_style(status)),
                        Span::styled(format!(" {:>3} ", job.match_score), score_style(job.match_score)),
                        Span::raw(format!("{} | {}", crate::truncate(&job.title, 26), job.company)),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[0], list_state);
        }
        empty => {
            let message = match empty {
                Visible::NoMatches { total } => format!(
                    "No jobs match your search (0 of {}).\nAdjust your filters and try again.",
                    total
                ),
                _ => "No jobs available.\nRun 'jobtrack generate' to load a dataset.".to_string(),
            };
            let widget = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(widget, chunks[0]);
        }
    }

    // Right panel: job detail
    let detail = Paragraph::new(build_detail(app, view))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((view.scroll_offset, 0));
    frame.render_widget(detail, chunks[1]);

    // Footer: search prompt, newest toast or key help
    let footer = if view.mode == Mode::Search {
        Paragraph::new(format!(" /{}_", filter.search))
    } else if let Some(toast) = app.notifications.latest() {
        let style = match toast.level {
            Level::Info => Style::default().fg(Color::Green),
            Level::Error => Style::default().fg(Color::Red),
        };
        Paragraph::new(format!(" {}", toast.message)).style(style)
    } else {
        Paragraph::new(
            " j/k:navigate J/K:scroll /:search m:matches o:sort s:save n/a/x/y:status q:quit",
        )
        .style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(footer, rows[1]);
}

fn build_detail<'a>(app: &'a App, view: &ViewState) -> Text<'a> {
    let mut lines: Vec<Line> = Vec::new();

    if !app.has_preferences() {
        lines.push(Line::from(Span::styled(
            "Set your preferences to activate intelligent matching (jobtrack prefs set).",
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
    }

    let Some(job) = view.current_id().and_then(|id| app.job(id)) else {
        lines.push(Line::from("No job selected"));
        return Text::from(lines);
    };

    // Header
    lines.push(Line::from(Span::styled(
        job.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company)));
    lines.push(Line::from(format!(
        "{} | {} | {}",
        job.location, job.mode, job.experience
    )));
    lines.push(Line::from(Span::styled(
        format!("Match: {}%", job.match_score),
        score_style(job.match_score),
    )));

    let status = app.status_of(&job.id);
    let status_line = match app.status_record(&job.id) {
        Some(record) => format!("Status: {} (since {})", record.status, record.date),
        None => format!("Status: {}", status),
    };
    lines.push(Line::from(Span::styled(status_line, status_style(status))));
    if app.is_saved(&job.id) {
        lines.push(Line::from(Span::styled("Saved", Style::default().fg(Color::Yellow))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!("Salary: {}", job.salary_range)));
    lines.push(Line::from(format!("Skills: {}", job.skills.join(", "))));
    lines.push(Line::from(format!(
        "Source: {} (posted {})",
        job.source,
        crate::posted_label(job.posted_days_ago)
    )));
    lines.push(Line::from(format!("Apply: {}", job.apply_url)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Description",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for line in textwrap::fill(&job.description, 70).lines() {
        lines.push(Line::from(format!("  {}", line)));
    }

    Text::from(lines)
}
