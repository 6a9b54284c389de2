use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::allocation::{Allocation, AllocationEngine};
use crate::db::KeyValueStorage;
use crate::error::RoomError;
use crate::models::Room;
use crate::store::RoomStore;

use super::forms::{AllocateForm, ConfirmClearAll, ConfirmRoomDelete, RoomForm, SearchForm};
use super::helpers::{centered_rect, plural_rooms, room_line, stats_line, surface_error};

/// Header space for the tab bar.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages, warnings and instructions.
const FOOTER_HEIGHT: u16 = 4;
/// Height of the form panels on the search and allocate tabs.
const FORM_HEIGHT: u16 = 5;

const TAB_TITLES: [&str; 4] = ["Add Room", "View Rooms", "Search", "Allocate"];

/// Top-level views, one per tab.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Tab {
    Add,
    View,
    Search,
    Allocate,
}

impl Tab {
    fn index(self) -> usize {
        match self {
            Tab::Add => 0,
            Tab::View => 1,
            Tab::Search => 2,
            Tab::Allocate => 3,
        }
    }

    fn from_function_key(n: u8) -> Option<Self> {
        match n {
            1 => Some(Tab::Add),
            2 => Some(Tab::View),
            3 => Some(Tab::Search),
            4 => Some(Tab::Allocate),
            _ => None,
        }
    }
}

/// Modal overlays. Confirmation dialogs capture every key until answered.
enum Mode {
    Normal,
    ConfirmRoomDelete(ConfirmRoomDelete),
    ConfirmClearAll(ConfirmClearAll),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App<S> {
    store: RoomStore<S>,
    tab: Tab,
    mode: Mode,
    add_form: RoomForm,
    search_form: SearchForm,
    search_results: Option<Vec<Room>>,
    allocate_form: AllocateForm,
    allocation: Option<Result<Allocation, RoomError>>,
    selected: usize,
    status: Option<StatusMessage>,
}

impl<S: KeyValueStorage> App<S> {
    pub fn new(store: RoomStore<S>) -> Self {
        Self {
            store,
            tab: Tab::Add,
            mode: Mode::Normal,
            add_form: RoomForm::default(),
            search_form: SearchForm::default(),
            search_results: None,
            allocate_form: AllocateForm::default(),
            allocation: None,
            selected: 0,
            status: None,
        }
    }

    pub fn store(&self) -> &RoomStore<S> {
        &self.store
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::ConfirmRoomDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::ConfirmClearAll(confirm) => self.handle_confirm_clear(code, confirm),
        };

        exit
    }

    /// Ctrl+R: reset the form on the current tab.
    pub fn handle_ctrl_r(&mut self) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        match self.tab {
            Tab::Add => self.add_form = RoomForm::default(),
            Tab::Search => {
                self.search_form = SearchForm::default();
                self.search_results = None;
            }
            Tab::Allocate => {
                self.allocate_form = AllocateForm::default();
                self.allocation = None;
            }
            Tab::View => {}
        }
        self.clear_status();
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Esc => {
                *exit = true;
                return Mode::Normal;
            }
            KeyCode::F(n) => {
                if let Some(tab) = Tab::from_function_key(n) {
                    self.switch_tab(tab);
                }
                return Mode::Normal;
            }
            _ => {}
        }

        match self.tab {
            Tab::Add => self.handle_add_key(code),
            Tab::View => return self.handle_view_key(code),
            Tab::Search => self.handle_search_key(code),
            Tab::Allocate => self.handle_allocate_key(code),
        }
        Mode::Normal
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clear_status();
        match tab {
            Tab::View => self.clamp_selection(),
            Tab::Search => self.search_results = None,
            Tab::Add | Tab::Allocate => {}
        }
    }

    fn handle_add_key(&mut self, code: KeyCode) {
        let form = &mut self.add_form;
        match code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right => form.toggle(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => self.save_new_room(),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
    }

    fn save_new_room(&mut self) {
        let room = match self.add_form.parse_inputs() {
            Ok(room) => room,
            Err(err) => {
                let message = surface_error(&err);
                self.add_form.error = Some(message.clone());
                self.set_status(format!("✖  {message}"), StatusKind::Error);
                return;
            }
        };

        let room_no = room.room_no().to_string();
        match self.store.add_room(room) {
            Ok(()) => {
                info!(room_no = %room_no, "room added from form");
                self.add_form = RoomForm::default();
                self.set_status(
                    format!("✔  Room \"{room_no}\" added successfully."),
                    StatusKind::Info,
                );
            }
            Err(err) => {
                self.add_form.error = Some(err.to_string());
                self.set_status(format!("✖  {err}"), StatusKind::Error);
            }
        }
    }

    fn handle_view_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.store.len().saturating_sub(1),
            KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('-') => {
                if let Some(room) = self.current_room() {
                    self.clear_status();
                    return Mode::ConfirmRoomDelete(ConfirmRoomDelete::from(&room));
                }
                self.set_status("No room selected to remove.", StatusKind::Error);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                let count = self.store.len();
                if count > 0 {
                    self.clear_status();
                    return Mode::ConfirmClearAll(ConfirmClearAll { count });
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmRoomDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.delete_room(&confirm.room_no);
                self.clamp_selection();
                self.set_status(
                    format!("Room \"{}\" removed.", confirm.room_no),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            _ => Mode::ConfirmRoomDelete(confirm),
        }
    }

    fn handle_confirm_clear(&mut self, code: KeyCode, confirm: ConfirmClearAll) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Clear cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.clear_all();
                self.selected = 0;
                self.set_status("All rooms cleared.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmClearAll(confirm),
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let form = &mut self.search_form;
        match code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Right => form.cycle(true),
            KeyCode::Left => form.cycle(false),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => self.run_search(),
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
    }

    fn run_search(&mut self) {
        let results = self.store.filter(&self.search_form.criteria());
        let count = results.len();
        self.set_status(
            format!(
                "Found {count} {} matching your criteria.",
                plural_rooms(count)
            ),
            StatusKind::Info,
        );
        self.search_results = Some(results);
    }

    fn handle_allocate_key(&mut self, code: KeyCode) {
        let form = &mut self.allocate_form;
        match code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right => form.toggle(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => self.run_allocation(),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
    }

    fn run_allocation(&mut self) {
        let request = match self.allocate_form.parse_inputs() {
            Ok(request) => request,
            Err(err) => {
                let message = surface_error(&err);
                self.allocate_form.error = Some(message.clone());
                self.allocation = None;
                self.set_status(message, StatusKind::Error);
                return;
            }
        };

        let outcome = AllocationEngine::new(&self.store).allocate(&request);
        match &outcome {
            Ok(allocation) => {
                let room = &allocation.room;
                self.set_status(
                    format!(
                        "✔  Allocated: Room {}  |  Capacity: {}  |  AC: {}  |  Washroom: {}",
                        room.room_no(),
                        room.capacity(),
                        yes_no(room.has_ac()),
                        yes_no(room.has_attached_washroom()),
                    ),
                    StatusKind::Info,
                );
            }
            Err(err) => self.set_status(format!("✖  {err}"), StatusKind::Error),
        }
        self.allocation = Some(outcome);
    }

    fn current_room(&self) -> Option<Room> {
        self.store.get_all().into_iter().nth(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        let count = self.store.len();
        if count == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + offset;
        self.selected = next.clamp(0, count as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        match self.tab {
            Tab::Add => self.draw_add(frame, chunks[1]),
            Tab::View => self.draw_view(frame, chunks[1]),
            Tab::Search => self.draw_search(frame, chunks[1]),
            Tab::Allocate => self.draw_allocate(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Normal => {}
            Mode::ConfirmRoomDelete(confirm) => self.draw_confirm(
                frame,
                "Remove Room",
                format!("Remove room \"{}\"?", confirm.room_no),
            ),
            Mode::ConfirmClearAll(confirm) => self.draw_confirm(
                frame,
                "Clear All",
                format!(
                    "Clear ALL {} room(s)? This cannot be undone.",
                    confirm.count
                ),
            ),
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let titles = TAB_TITLES
            .iter()
            .enumerate()
            .map(|(idx, title)| Line::from(format!("F{} {title}", idx + 1)));
        let count = self.store.len();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Hostel Rooms ")
            .title_top(Line::from(format!(" {count} {} ", plural_rooms(count))).right_aligned());
        let tabs = Tabs::new(titles)
            .block(block)
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
        error: Option<&String>,
        cursor: Option<(u16, u16)>,
    ) {
        if let Some(error) = error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let inner = block.inner(area);
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if let Some((row, column)) = cursor {
            if row < inner.height {
                let x = inner.x.saturating_add(column).min(inner.right().saturating_sub(1));
                frame.set_cursor_position((x, inner.y + row));
            }
        }
    }

    fn draw_add(&self, frame: &mut Frame, area: Rect) {
        let form = &self.add_form;
        self.draw_form(
            frame,
            area,
            "Add Room",
            form.build_lines(),
            form.error.as_ref(),
            form.cursor(),
        );
    }

    fn draw_view(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let stats = Paragraph::new(stats_line(self.store.stats()))
            .block(Block::default().borders(Borders::ALL).title("Stats"));
        frame.render_widget(stats, chunks[0]);

        let rooms = self.store.get_all();
        self.render_room_list(
            frame,
            chunks[1],
            "Rooms",
            &rooms,
            Some(self.selected),
            "No rooms added yet. Press F1 to add one.",
        );
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)])
            .split(area);

        let form = &self.search_form;
        self.draw_form(
            frame,
            chunks[0],
            "Search",
            form.build_lines(),
            None,
            form.cursor(),
        );

        if let Some(results) = &self.search_results {
            self.render_room_list(
                frame,
                chunks[1],
                "Results",
                results,
                None,
                "No rooms match the selected filters.",
            );
        }
    }

    fn draw_allocate(&self, frame: &mut Frame, area: Rect) {
        let form = &self.allocate_form;
        let form_height = if form.error.is_some() {
            FORM_HEIGHT + 2
        } else {
            FORM_HEIGHT
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(form_height), Constraint::Min(0)])
            .split(area);

        self.draw_form(
            frame,
            chunks[0],
            "Allocate",
            form.build_lines(),
            form.error.as_ref(),
            form.cursor(),
        );

        let Some(outcome) = &self.allocation else {
            return;
        };
        let lines = match outcome {
            Ok(allocation) => vec![
                Line::from(Span::styled(
                    "ALLOCATED",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )),
                room_line(&allocation.room),
                Line::from(allocation.reason),
            ],
            Err(err) => vec![Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red),
            ))],
        };
        let result = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Result"))
            .wrap(Wrap { trim: true });
        frame.render_widget(result, chunks[1]);
    }

    fn render_room_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        rooms: &[Room],
        selected: Option<usize>,
        empty_message: &str,
    ) {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        if rooms.is_empty() {
            let empty = Paragraph::new(Span::styled(
                empty_message.to_string(),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = rooms.iter().map(|room| ListItem::new(room_line(room))).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(selected);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_confirm(&self, frame: &mut Frame, title: &str, question: String) {
        let area = centered_rect(60, 25, frame.area());
        frame.render_widget(Clear, area);
        let text = vec![
            Line::from(question),
            Line::from(""),
            Line::from("[y/Enter] Confirm   [n/Esc] Cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let warning_line = if self.store.persistence_degraded() {
            Line::from(Span::styled(
                "Storage unavailable - data will not persist across sessions.",
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, warning_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut spans = match (&self.mode, self.tab) {
            (Mode::ConfirmRoomDelete(_) | Mode::ConfirmClearAll(_), _) => {
                return Line::from(vec![
                    Span::styled("[y]", key_style),
                    Span::raw(" Confirm   "),
                    Span::styled("[n]", key_style),
                    Span::raw(" Cancel"),
                ]);
            }
            (Mode::Normal, Tab::View) => vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[d]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[c]", key_style),
                Span::raw(" Clear All   "),
            ],
            (Mode::Normal, _) => vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Submit   "),
                Span::styled("[Ctrl+R]", key_style),
                Span::raw(" Reset   "),
            ],
        };
        spans.push(Span::styled("[F1-F4]", key_style));
        spans.push(Span::raw(" Tabs   "));
        spans.push(Span::styled("[Esc]", key_style));
        spans.push(Span::raw(" Quit"));
        Line::from(spans)
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
