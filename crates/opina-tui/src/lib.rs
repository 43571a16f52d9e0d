// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use opina_app::{
    Controller, Denylist, EditTarget, Field, IdSource, Notice, NoticeLevel, RemoteCollection,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use std::io;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const NOTICE_TTL: Duration = Duration::from_millis(2500);

/// Which pane receives keystrokes. Tab cycles through them in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Title,
    Description,
    List,
}

impl Focus {
    pub const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::List,
            Self::List => Self::Title,
        }
    }

    const fn field(self) -> Option<Field> {
        match self {
            Self::Title => Some(Field::Title),
            Self::Description => Some(Field::Description),
            Self::List => None,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Title => "name",
            Self::Description => "feedback",
            Self::List => "entries",
        }
    }
}

/// What a keystroke in list focus asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Quit,
    Reload,
    Edit,
    Delete,
    MoveUp,
    MoveDown,
}

/// Maps a list-focus key to its action. Returns None for keys the list
/// ignores; Tab and Esc are handled before this.
pub fn list_action(code: KeyCode) -> Option<ListAction> {
    match code {
        KeyCode::Char('q') => Some(ListAction::Quit),
        KeyCode::Char('r') => Some(ListAction::Reload),
        KeyCode::Char('e') | KeyCode::Enter => Some(ListAction::Edit),
        KeyCode::Char('d') => Some(ListAction::Delete),
        KeyCode::Up | KeyCode::Char('k') => Some(ListAction::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(ListAction::MoveDown),
        _ => None,
    }
}

/// Applies a field-focus keystroke to the buffered value. Returns the new
/// value, or None when the key does not change the text.
pub fn edit_value(current: &str, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(ch) => {
            let mut value = current.to_owned();
            value.push(ch);
            Some(value)
        }
        KeyCode::Backspace => {
            let mut value = current.to_owned();
            value.pop()?;
            Some(value)
        }
        _ => None,
    }
}

/// Keeps the selection inside the list after the store changes size.
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        selected.min(len - 1)
    }
}

struct ViewState {
    focus: Focus,
    selected: usize,
    notice: Option<(Notice, Instant)>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            focus: Focus::Title,
            selected: 0,
            notice: None,
        }
    }

    fn show(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    fn expire_notice(&mut self) {
        if let Some((_, shown_at)) = &self.notice
            && shown_at.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }
}

pub fn run_app<R: RemoteCollection, I: IdSource>(
    controller: &mut Controller<R, I>,
    denylist: &Denylist,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view = ViewState::new();
    drain_into_view(controller, &mut view);

    let mut result = Ok(());
    loop {
        view.expire_notice();
        view.selected = clamp_selection(view.selected, controller.store().len());

        if let Err(error) = terminal.draw(|frame| render(frame, controller, &view)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(POLL_INTERVAL).context("poll event")?;
        if !has_event {
            continue;
        }

        match event::read().context("read event")? {
            Event::Key(key) => {
                if handle_key_event(controller, denylist, &mut view, key) {
                    break;
                }
            }
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn drain_into_view<R: RemoteCollection, I: IdSource>(
    controller: &mut Controller<R, I>,
    view: &mut ViewState,
) {
    if let Some(notice) = controller.drain_notices().pop() {
        view.show(notice);
    }
}

fn handle_key_event<R: RemoteCollection, I: IdSource>(
    controller: &mut Controller<R, I>,
    denylist: &Denylist,
    view: &mut ViewState,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if key.code == KeyCode::Tab {
        view.focus = view.focus.next();
        return false;
    }

    if key.code == KeyCode::Esc {
        if controller.form().is_editing() {
            controller.cancel_edit();
            view.show(Notice::warning("edit canceled"));
        }
        return false;
    }

    match view.focus.field() {
        Some(field) => handle_field_key(controller, view, field, key.code),
        None => return handle_list_key(controller, denylist, view, key.code),
    }
    false
}

fn handle_field_key<R: RemoteCollection, I: IdSource>(
    controller: &mut Controller<R, I>,
    view: &mut ViewState,
    field: Field,
    code: KeyCode,
) {
    if code == KeyCode::Enter {
        log::debug!("submit via {} field", field.label());
        controller.submit();
        drain_into_view(controller, view);
        return;
    }

    if let Some(value) = edit_value(controller.form().field(field), code) {
        controller.set_field(field, value);
    }
}

fn handle_list_key<R: RemoteCollection, I: IdSource>(
    controller: &mut Controller<R, I>,
    denylist: &Denylist,
    view: &mut ViewState,
    code: KeyCode,
) -> bool {
    let Some(action) = list_action(code) else {
        return false;
    };

    match action {
        ListAction::Quit => return true,
        ListAction::MoveUp => {
            view.selected = view.selected.saturating_sub(1);
        }
        ListAction::MoveDown => {
            view.selected = clamp_selection(view.selected + 1, controller.store().len());
        }
        ListAction::Reload => {
            controller.load_all();
            drain_into_view(controller, view);
        }
        ListAction::Edit => {
            if let Some(notice) = protected_notice(controller, denylist, view.selected) {
                view.show(notice);
            } else if controller.begin_edit(view.selected) {
                view.focus = Focus::Title;
            }
        }
        ListAction::Delete => {
            if let Some(notice) = protected_notice(controller, denylist, view.selected) {
                view.show(notice);
            } else {
                controller.delete_at(view.selected);
                drain_into_view(controller, view);
            }
        }
    }
    false
}

fn protected_notice<R: RemoteCollection, I: IdSource>(
    controller: &Controller<R, I>,
    denylist: &Denylist,
    position: usize,
) -> Option<Notice> {
    let record = controller.store().get(position)?;
    if denylist.blocks(&record.title) {
        return Some(Notice::warning(format!(
            "entries from {} are protected",
            record.title
        )));
    }
    None
}

fn render<R: RemoteCollection, I: IdSource>(
    frame: &mut ratatui::Frame,
    controller: &Controller<R, I>,
    view: &ViewState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_field(frame, controller, view, Focus::Title, chunks[0]);
    render_field(frame, controller, view, Focus::Description, chunks[1]);
    render_list(frame, controller, view, chunks[2]);
    render_status(frame, controller, view, chunks[3]);
}

fn render_field<R: RemoteCollection, I: IdSource>(
    frame: &mut ratatui::Frame,
    controller: &Controller<R, I>,
    view: &ViewState,
    focus: Focus,
    area: Rect,
) {
    let Some(field) = focus.field() else {
        return;
    };

    let mut title = focus.label().to_owned();
    if let Some(error) = controller.form().field_error(field) {
        title = format!("{title} ({error})");
    }

    let border_style = if view.focus == focus {
        Style::default().fg(Color::Cyan)
    } else if controller.form().field_error(field).is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let widget = Paragraph::new(controller.form().field(field)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(widget, area);
}

fn render_list<R: RemoteCollection, I: IdSource>(
    frame: &mut ratatui::Frame,
    controller: &Controller<R, I>,
    view: &ViewState,
    area: Rect,
) {
    let editing = match controller.form().edit_target() {
        EditTarget::Editing(position) => Some(position),
        EditTarget::Creating => None,
    };

    let rows: Vec<Row> = controller
        .store()
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut style = Style::default();
            if view.focus == Focus::List && index == view.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if editing == Some(index) {
                style = style.add_modifier(Modifier::BOLD);
            }
            Row::new(vec![
                Cell::from(record.title.clone()),
                Cell::from(record.description.clone()),
                Cell::from(record.created_at.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();

    let border_style = if view.focus == Focus::List {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ],
    )
    .header(Row::new(vec!["name", "feedback", "created"]).style(Style::default().fg(Color::Gray)))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("entries ({})", controller.store().len())),
    );
    frame.render_widget(table, area);
}

fn render_status<R: RemoteCollection, I: IdSource>(
    frame: &mut ratatui::Frame,
    controller: &Controller<R, I>,
    view: &ViewState,
    area: Rect,
) {
    let (text, style) = match &view.notice {
        Some((notice, _)) => (notice.message.clone(), notice_style(notice.level)),
        None => {
            let hint = if controller.form().is_editing() {
                "editing: Enter saves, Esc cancels"
            } else {
                "Tab switch pane | Enter submit | e edit | d delete | r reload | q quit"
            };
            (hint.to_owned(), Style::default().fg(Color::DarkGray))
        }
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn notice_style(level: NoticeLevel) -> Style {
    match level {
        NoticeLevel::Success => Style::default().fg(Color::Green),
        NoticeLevel::Warning => Style::default().fg(Color::Yellow),
        NoticeLevel::Error => Style::default().fg(Color::Red),
    }
}
