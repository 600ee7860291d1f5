// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use chronicle_app::{
    AppCommand, AppEvent, AppMode, AppState, Archive, ChapterLayout, ChapterRecord, ProseBlock,
    SearchState, Segment, SegmentKind, SegmenterConfig, ViewKind, format_reading_time,
    reading_time_minutes, segment_prose,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const SCROLL_PAGE_LINES: u16 = 10;
const SEARCH_RESULT_ROWS: usize = 8;

/// Presentation options resolved from config at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiOptions {
    pub segmenter: SegmenterConfig,
    pub show_reading_time: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            show_reading_time: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SearchOverlayState {
    visible: bool,
    state: SearchState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    /// Cursor into the display-ordered chapter list while browsing.
    list_cursor: usize,
    /// Vertical scroll offset of the open document.
    scroll: u16,
    search: SearchOverlayState,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app(state: &mut AppState, archive: &Archive, options: &UiOptions) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) =
            terminal.draw(|frame| render(frame, state, archive, options, &view_data))
        {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(POLL_INTERVAL).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, archive, options, &mut view_data, &internal_tx, key)
                    {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Applies state-machine events to the presentation state.
fn apply_events(view_data: &mut ViewData, events: &[AppEvent]) {
    for event in events {
        match event {
            AppEvent::ScrollReset => view_data.scroll = 0,
            AppEvent::ChapterClosed => {
                view_data.search = SearchOverlayState::default();
            }
            AppEvent::ViewChanged(_) => {
                view_data.search = SearchOverlayState::default();
                view_data.list_cursor = 0;
            }
            AppEvent::ChapterOpened { .. }
            | AppEvent::Moved { .. }
            | AppEvent::StatusUpdated(_)
            | AppEvent::StatusCleared => {}
        }
    }
}

fn dispatch(state: &mut AppState, view_data: &mut ViewData, command: AppCommand) {
    let events = state.dispatch(command);
    apply_events(view_data, &events);
}

/// Returns true when the app should quit.
fn handle_key_event(
    state: &mut AppState,
    archive: &Archive,
    options: &UiOptions,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.search.visible {
        handle_search_key(state, archive, view_data, internal_tx, key);
        return false;
    }

    match state.mode {
        AppMode::Reading { .. } => {
            handle_reading_key(state, view_data, key);
            false
        }
        AppMode::Browsing { view } => {
            handle_browsing_key(state, archive, options, view_data, internal_tx, view, key)
        }
    }
}

fn handle_reading_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            dispatch(state, view_data, AppCommand::CloseChapter);
        }
        (KeyCode::Up, _) => {
            dispatch(state, view_data, AppCommand::MoveBy(-1));
        }
        (KeyCode::Down, _) => {
            dispatch(state, view_data, AppCommand::MoveBy(1));
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) => {
            view_data.scroll = view_data.scroll.saturating_sub(1);
        }
        (KeyCode::Char('j'), KeyModifiers::NONE) => {
            view_data.scroll = view_data.scroll.saturating_add(1);
        }
        (KeyCode::PageUp, _) => {
            view_data.scroll = view_data.scroll.saturating_sub(SCROLL_PAGE_LINES);
        }
        (KeyCode::PageDown, _) => {
            view_data.scroll = view_data.scroll.saturating_add(SCROLL_PAGE_LINES);
        }
        (KeyCode::Home, _) => {
            view_data.scroll = 0;
        }
        _ => {}
    }
}

fn handle_browsing_key(
    state: &mut AppState,
    archive: &Archive,
    _options: &UiOptions,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    view: ViewKind,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('?'), KeyModifiers::NONE) => {
            view_data.help_visible = true;
        }
        (KeyCode::Tab, _) => {
            let target = match view {
                ViewKind::Chapters => ViewKind::Designs,
                ViewKind::Designs => ViewKind::Chapters,
            };
            dispatch(state, view_data, AppCommand::SwitchView(target));
        }
        (KeyCode::Char('/'), KeyModifiers::NONE) => {
            if view == ViewKind::Chapters {
                view_data.search.visible = true;
                view_data.search.state = SearchState::default();
            } else {
                emit_status(state, view_data, internal_tx, "search works in chapters view");
            }
        }
        (KeyCode::Up | KeyCode::Char('k'), _) => {
            view_data.list_cursor = view_data.list_cursor.saturating_sub(1);
        }
        (KeyCode::Down | KeyCode::Char('j'), _) => {
            if view_data.list_cursor + 1 < archive.len() {
                view_data.list_cursor += 1;
            }
        }
        (KeyCode::Home | KeyCode::Char('g'), _) => {
            view_data.list_cursor = 0;
        }
        (KeyCode::End | KeyCode::Char('G'), _) => {
            view_data.list_cursor = archive.len().saturating_sub(1);
        }
        (KeyCode::Enter, _) => {
            if view == ViewKind::Chapters && view_data.list_cursor < archive.len() {
                dispatch(
                    state,
                    view_data,
                    AppCommand::OpenChapter(view_data.list_cursor),
                );
            }
        }
        _ => {}
    }
    false
}

fn handle_search_key(
    state: &mut AppState,
    archive: &Archive,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.search = SearchOverlayState::default();
        }
        (KeyCode::Up, _) => {
            let count = archive.filter(view_data.search.state.query()).len();
            view_data.search.state.move_selection(-1, count);
        }
        (KeyCode::Char('p'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            let count = archive.filter(view_data.search.state.query()).len();
            view_data.search.state.move_selection(-1, count);
        }
        (KeyCode::Down, _) => {
            let count = archive.filter(view_data.search.state.query()).len();
            view_data.search.state.move_selection(1, count);
        }
        (KeyCode::Char('n'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            let count = archive.filter(view_data.search.state.query()).len();
            view_data.search.state.move_selection(1, count);
        }
        (KeyCode::Backspace, _) => {
            view_data.search.state.pop_char();
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.search.state.clear_query();
        }
        (KeyCode::Enter, _) => match view_data.search.state.commit(archive) {
            Some(display_index) => {
                view_data.search = SearchOverlayState::default();
                view_data.list_cursor = display_index;
                dispatch(state, view_data, AppCommand::OpenChapter(display_index));
            }
            None => {
                emit_status(state, view_data, internal_tx, "no chapters match");
            }
        },
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            view_data.search.state.push_char(ch);
        }
        _ => {}
    }
}

pub fn format_reference(chapter_number: usize) -> String {
    format!("ARCHIVE_{chapter_number:03}")
}

fn chapter_title(record: &ChapterRecord) -> &str {
    record.title.as_deref().unwrap_or("Untitled")
}

fn chapter_author(record: &ChapterRecord) -> &str {
    record.author.as_deref().unwrap_or("unknown")
}

fn chapter_date(record: &ChapterRecord) -> &str {
    record.written_date.as_deref().unwrap_or("undated")
}

/// One row of the browsing list.
fn list_row_text(record: &ChapterRecord, show_reading_time: bool) -> String {
    let number = record.source_index.chapter_number();
    let title = chapter_title(record);
    let date = chapter_date(record);
    if show_reading_time {
        let minutes = reading_time_minutes(record.text.as_deref());
        format!("CH {number:>3}  {title}  ·  {date}  ·  {}", format_reading_time(minutes))
    } else {
        format!("CH {number:>3}  {title}  ·  {date}")
    }
}

fn reader_header_text(record: &ChapterRecord, show_reading_time: bool) -> String {
    let number = record.source_index.chapter_number();
    let mut header = format!(
        "CHAPTER {number} · {} · {}",
        chapter_date(record),
        chapter_author(record),
    );
    if show_reading_time {
        let minutes = reading_time_minutes(record.text.as_deref());
        header.push_str(&format!(" · {}", format_reading_time(minutes)));
    }
    header
}

fn reader_footer_text(state: &AppState, record: &ChapterRecord) -> String {
    let mut hints = Vec::new();
    if state.has_prev() {
        hints.push("↑ prev");
    }
    if state.has_next() {
        hints.push("↓ next");
    }
    hints.push("esc close");
    format!(
        "REF_ID: {}  ·  {}",
        format_reference(record.source_index.chapter_number()),
        hints.join("  ")
    )
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    archive: &Archive,
    options: &UiOptions,
    view_data: &ViewData,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    match state.mode {
        AppMode::Browsing { view: ViewKind::Chapters } => {
            render_chapter_list(frame, chunks[0], archive, options, view_data);
        }
        AppMode::Browsing { view: ViewKind::Designs } => {
            render_designs_placeholder(frame, chunks[0]);
        }
        AppMode::Reading { display_index } => {
            render_reader(frame, chunks[0], state, archive, options, view_data, display_index);
        }
    }

    let status = state.status_line.as_deref().unwrap_or(
        "enter open · / search · tab views · ? help · ctrl-q quit",
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );

    if view_data.search.visible {
        render_search_overlay(frame, archive, options, view_data);
    }
    if view_data.help_visible {
        render_help_overlay(frame);
    }
}

fn render_chapter_list(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    archive: &Archive,
    options: &UiOptions,
    view_data: &ViewData,
) {
    let title = format!(" archive · {} chapters · latest first ", archive.len());
    let mut lines = Vec::new();

    if archive.is_empty() {
        lines.push(Line::from(Span::styled(
            "archive is empty",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the cursor visible by windowing the display-ordered list.
    let visible_rows = area.height.saturating_sub(2) as usize;
    let first_visible = view_data
        .list_cursor
        .saturating_sub(visible_rows.saturating_sub(1));
    for (display_index, record) in archive.display_order().enumerate() {
        if display_index < first_visible || display_index >= first_visible + visible_rows.max(1) {
            continue;
        }
        let row = list_row_text(record, options.show_reading_time);
        let style = if display_index == view_data.list_cursor {
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(row, style)));
    }

    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

fn render_designs_placeholder(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let widget = Paragraph::new(
        "merchandise designs, videos, and music live in the web gallery;\n\
         this reader keeps to the chapters. press tab to go back.",
    )
    .style(Style::default().fg(Color::DarkGray))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(" designs "));
    frame.render_widget(widget, area);
}

fn render_reader(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    archive: &Archive,
    options: &UiOptions,
    view_data: &ViewData,
    display_index: usize,
) {
    let Some(record) = archive.by_display(display_index) else {
        return;
    };

    let mut lines: Vec<Line<'_>> = Vec::new();
    lines.push(Line::from(Span::styled(
        reader_header_text(record, options.show_reading_time),
        Style::default().fg(Color::LightBlue),
    )));
    lines.push(Line::from(Span::styled(
        chapter_title(record).to_owned(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());

    let number = record.source_index.chapter_number();
    match options.segmenter.layout_for(number) {
        ChapterLayout::Dialogue => {
            let segments = options.segmenter.segment_dialogue(record.text.as_deref());
            push_dialogue_lines(&mut lines, &segments);
        }
        ChapterLayout::Prose => {
            let blocks = segment_prose(record.text.as_deref());
            push_prose_lines(&mut lines, &blocks);
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        reader_footer_text(state, record),
        Style::default().fg(Color::DarkGray),
    )));

    let max_scroll = (lines.len() as u16).saturating_sub(1);
    let scroll = view_data.scroll.min(max_scroll);

    let widget = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn push_dialogue_lines(lines: &mut Vec<Line<'_>>, segments: &[Segment]) {
    for segment in segments {
        match segment.kind {
            SegmentKind::Human => {
                lines.push(Line::from(Span::styled(
                    "HUMAN".to_owned(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )));
                for text in &segment.lines {
                    lines.push(Line::from(Span::styled(
                        text.clone(),
                        Style::default().fg(Color::Gray),
                    )));
                }
            }
            SegmentKind::Agent => {
                let name = segment.agent_name.as_deref().unwrap_or("AGENT");
                lines.push(Line::from(Span::styled(
                    format!("{name} RESPONSE"),
                    Style::default()
                        .fg(Color::LightCyan)
                        .add_modifier(Modifier::BOLD),
                )));
                for text in &segment.lines {
                    lines.push(Line::from(Span::styled(
                        text.clone(),
                        Style::default().fg(Color::Cyan),
                    )));
                }
            }
        }
        lines.push(Line::default());
    }
}

fn push_prose_lines(lines: &mut Vec<Line<'_>>, blocks: &[ProseBlock]) {
    for block in blocks {
        match block {
            ProseBlock::Paragraph(text) => {
                lines.push(Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }
            ProseBlock::Blank => lines.push(Line::default()),
        }
    }
}

fn render_search_overlay(
    frame: &mut ratatui::Frame<'_>,
    archive: &Archive,
    options: &UiOptions,
    view_data: &ViewData,
) {
    let area = overlay_rect(frame.area(), 70, (SEARCH_RESULT_ROWS + 5) as u16);
    frame.render_widget(Clear, area);

    let results = archive.filter(view_data.search.state.query());
    let mut lines = vec![
        Line::from(vec![
            Span::styled("search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                view_data.search.state.query().to_owned(),
                Style::default().fg(Color::White),
            ),
            Span::styled("▏", Style::default().fg(Color::LightBlue)),
        ]),
        Line::default(),
    ];

    if results.is_empty() {
        lines.push(Line::from(Span::styled(
            "no chapters found",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let selection = view_data.search.state.selection().min(results.len() - 1);
        let first_visible = selection.saturating_sub(SEARCH_RESULT_ROWS - 1);
        for (position, display_index) in results.iter().enumerate() {
            if position < first_visible || position >= first_visible + SEARCH_RESULT_ROWS {
                continue;
            }
            let Some(record) = archive.by_display(*display_index) else {
                continue;
            };
            let row = list_row_text(record, options.show_reading_time);
            let style = if position == selection {
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(row, style)));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "↑↓ navigate · enter open · esc close",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" search · {} matches ", results.len())),
    );
    frame.render_widget(widget, area);
}

fn render_help_overlay(frame: &mut ratatui::Frame<'_>) {
    let area = overlay_rect(frame.area(), 60, 13);
    frame.render_widget(Clear, area);

    let help = "browsing\n\
                  ↑/↓ or k/j   move cursor\n\
                  enter        open chapter\n\
                  /            search\n\
                  tab          chapters/designs\n\
                reading\n\
                  ↑/↓          previous/next chapter\n\
                  j/k, pgup/dn scroll\n\
                  esc          back to list\n\
                anywhere\n\
                  ctrl-q       quit";
    let widget = Paragraph::new(help)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(" keys "));
    frame.render_widget(widget, area);
}

fn overlay_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = area.width * width_percent / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let height = height.min(area.height);
    let y = area.y + (area.height.saturating_sub(height)) / 3;
    Rect {
        x,
        y,
        width,
        height,
    }
}
