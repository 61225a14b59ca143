//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between
//! the task list, the add/edit form, and the periodic due-check tick.

use std::path::{Path, PathBuf};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::cmd::{format_due_relative, truncate};
use crate::fields::{format_priority, format_repeat};
use crate::notify::Notify;
use crate::scheduler::Scheduler;
use crate::store::TaskStore;
use crate::task::Task;
use crate::tui::task_form::{FormField, TaskForm, FIELD_ORDER};

/// Number of alert lines kept for the alerts pane.
const MAX_ALERTS: usize = 20;

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    TaskList,
    AddTask,
    EditTask,
    ConfirmDelete,
    Help,
}

/// Collects fired reminders as display lines for the alerts pane.
struct AlertNotifier<'a> {
    lines: &'a mut Vec<String>,
    fired: usize,
}

impl Notify for AlertNotifier<'_> {
    fn notify_task_due(&mut self, task: &Task) {
        self.fired += 1;
        let stamp = Local::now().format("%H:%M");
        let line = if task.description.is_empty() {
            format!("{} {}", stamp, task.name)
        } else {
            format!("{} {}: {}", stamp, task.name, task.description)
        };
        self.lines.insert(0, line);
        self.lines.truncate(MAX_ALERTS);
    }
}

/// Main application state for the terminal user interface.
pub struct App {
    pub state: AppState,
    store: TaskStore,
    db_path: PathBuf,
    list_title: String,
    table_state: TableState,
    form: TaskForm,
    status_message: String,
    alerts: Vec<String>,
}

impl App {
    /// Create a new App instance, loading the list from the given path.
    pub fn new(db_path: &Path) -> Self {
        let store = TaskStore::load(db_path);
        let list_title = db_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.strip_suffix("_reminders").unwrap_or(s).replace('_', " "))
            .unwrap_or_else(|| "reminders".to_string());

        let mut app = App {
            state: AppState::TaskList,
            store,
            db_path: db_path.to_path_buf(),
            list_title,
            table_state: TableState::default(),
            form: TaskForm::new(),
            status_message: String::new(),
            alerts: Vec::new(),
        };
        if !app.store.tasks.is_empty() {
            app.table_state.select(Some(0));
        }
        app
    }

    /// Run one due-check pass and persist any fired state changes.
    pub fn run_due_check(&mut self) {
        let fired = {
            let mut sched = Scheduler::new(AlertNotifier {
                lines: &mut self.alerts,
                fired: 0,
            });
            sched.check_due_tasks(&mut self.store.tasks, Local::now().naive_local());
            sched.notifier.fired
        };
        if fired > 0 {
            self.save_with_status();
        }
    }

    /// Save the list, reporting the outcome in the status line.
    pub fn save_with_status(&mut self) {
        match self.store.save(&self.db_path) {
            Ok(()) => self.status_message = format!("Saved {}", self.db_path.display()),
            Err(e) => self.status_message = format!("Save failed: {e}"),
        }
    }

    /// Final save when the UI exits.
    pub fn save(&self) -> std::io::Result<()> {
        self.store.save(&self.db_path)
    }

    fn selected(&self) -> Option<usize> {
        self.table_state.selected().filter(|&i| i < self.store.tasks.len())
    }

    fn move_selection(&mut self, delta: i64) {
        if self.store.tasks.is_empty() {
            self.table_state.select(None);
            return;
        }
        let len = self.store.tasks.len() as i64;
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len - 1) as usize;
        self.table_state.select(Some(next));
    }

    /// Handle a key event. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.state {
            AppState::TaskList => self.handle_list_key(key),
            AppState::AddTask | AppState::EditTask => {
                self.handle_form_key(key);
                false
            }
            AppState::ConfirmDelete => {
                self.handle_confirm_key(key);
                false
            }
            AppState::Help => {
                self.state = AppState::TaskList;
                false
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char('a') => {
                self.form = TaskForm::new();
                self.state = AppState::AddTask;
                self.status_message.clear();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(idx) = self.selected() {
                    self.form = TaskForm::for_task(idx, &self.store.tasks[idx]);
                    self.state = AppState::EditTask;
                    self.status_message.clear();
                }
            }
            KeyCode::Char('d') => {
                if self.selected().is_some() {
                    self.state = AppState::ConfirmDelete;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(idx) = self.selected() {
                    let t = &mut self.store.tasks[idx];
                    t.done = !t.done;
                    self.save_with_status();
                }
            }
            KeyCode::Char('s') => self.save_with_status(),
            KeyCode::Char('r') => {
                self.store = TaskStore::load(&self.db_path);
                if self.selected().is_none() && !self.store.tasks.is_empty() {
                    self.table_state.select(Some(0));
                }
                self.status_message = "Reloaded from file".to_string();
            }
            KeyCode::Char('c') => {
                self.run_due_check();
                if self.status_message.is_empty() {
                    self.status_message = "Due check complete".to_string();
                }
            }
            KeyCode::Char('?') | KeyCode::Char('h') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.status_message = "Cancelled".to_string();
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.handle_left(),
            KeyCode::Right => self.form.handle_right(),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        match self.form.build() {
            Ok(mut task) => {
                match self.form.editing {
                    Some(idx) if idx < self.store.tasks.len() => {
                        // Editing keeps the original done flag so a
                        // finished one-shot stays finished.
                        task.done = self.store.tasks[idx].done;
                        self.store.tasks[idx] = task;
                        self.status_message = "Updated reminder".to_string();
                    }
                    _ => {
                        self.store.tasks.push(task);
                        self.table_state.select(Some(self.store.tasks.len() - 1));
                        self.status_message = "Added reminder".to_string();
                    }
                }
                self.state = AppState::TaskList;
                self.save_with_status();
            }
            Err(e) => self.status_message = e,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(idx) = self.selected() {
                    let removed = self.store.tasks.remove(idx);
                    if self.store.tasks.is_empty() {
                        self.table_state.select(None);
                    } else if idx >= self.store.tasks.len() {
                        self.table_state.select(Some(self.store.tasks.len() - 1));
                    }
                    self.status_message = format!("Deleted '{}'", removed.name);
                    self.save_with_status();
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Esc => self.state = AppState::TaskList,
            _ => {}
        }
    }

    /// Render the whole interface for the current state.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(6),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_title(f, chunks[0]);
        match self.state {
            AppState::AddTask | AppState::EditTask => self.render_form(f, chunks[1]),
            _ => self.render_table(f, chunks[1]),
        }
        self.render_alerts(f, chunks[2]);
        self.render_status(f, chunks[3]);

        match self.state {
            AppState::ConfirmDelete => self.render_confirm(f),
            AppState::Help => self.render_help(f),
            _ => {}
        }
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let pending = self.store.tasks.iter().filter(|t| !t.done).count();
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.list_title),
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {} pending / {} total", pending, self.store.tasks.len())),
        ]);
        f.render_widget(Paragraph::new(title), area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let now = Local::now().naive_local();
        let header = Row::new(vec!["#", "Due", "Repeat", "Pri", "Category", "State", "Name"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .store
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let style = if t.done {
                    Style::default().fg(Color::DarkGray)
                } else if t.due < now {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    format!("{}", i + 1),
                    format_due_relative(t.due, now),
                    format_repeat(t.repeat).to_string(),
                    format_priority(t.priority).to_string(),
                    truncate(&t.category, 12),
                    if t.done { "done" } else { "pending" }.to_string(),
                    t.name.clone(),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(18),
                Constraint::Length(8),
                Constraint::Length(7),
                Constraint::Length(13),
                Constraint::Length(8),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Scheduled Reminders"))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_form(&self, f: &mut Frame, area: Rect) {
        let title = if self.state == AppState::EditTask { "Edit Reminder" } else { "New Reminder" };
        let mut lines = Vec::new();

        for (i, field) in FIELD_ORDER.iter().enumerate() {
            let (label, value) = match field {
                FormField::Name => ("Name", self.form.name.value.clone()),
                FormField::Date => ("Date (YYYY-MM-DD)", self.form.date.value.clone()),
                FormField::Time => ("Time (HH:MM)", self.form.time.value.clone()),
                FormField::Repeat => ("Repeat", format_repeat(self.form.repeat).to_string()),
                FormField::Description => ("Description", self.form.description.value.clone()),
                FormField::Priority => ("Priority", format_priority(self.form.priority).to_string()),
                FormField::Category => ("Category", self.form.category.value.clone()),
            };
            let focused = i == self.form.focus;
            let value_style = if focused {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<20}", label), Style::default().fg(Color::Gray)),
                Span::styled(format!(" {} ", value), value_style),
            ]));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "Tab/Arrows move, Space cycles Repeat/Priority, Enter saves, Esc cancels",
            Style::default().fg(Color::DarkGray),
        )));

        let form = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        f.render_widget(form, area);
    }

    fn render_alerts(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .alerts
            .iter()
            .map(|a| ListItem::new(Line::from(Span::styled(a.clone(), Style::default().fg(Color::Yellow)))))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Alerts"));
        f.render_widget(list, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let text = if self.status_message.is_empty() {
            match self.state {
                AppState::TaskList => {
                    "a add  e edit  d delete  space done  c check  s save  r reload  ? help  q quit"
                }
                AppState::AddTask | AppState::EditTask => "Enter save  Esc cancel",
                AppState::ConfirmDelete => "y confirm  n cancel",
                AppState::Help => "any key to close",
            }
            .to_string()
        } else {
            self.status_message.clone()
        };
        f.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
            area,
        );
    }

    fn render_confirm(&self, f: &mut Frame) {
        let name = self
            .selected()
            .map(|i| self.store.tasks[i].name.clone())
            .unwrap_or_default();
        let area = centered_rect(50, 20, f.area());
        let popup = Paragraph::new(vec![
            Line::from(""),
            Line::from(format!("Delete '{}'?", name)),
            Line::from(""),
            Line::from(Span::styled("y to confirm, n to cancel", Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Confirm Delete"));
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 60, f.area());
        let lines = vec![
            Line::from("Navigation:   Up/Down or j/k"),
            Line::from("a             add a reminder"),
            Line::from("e / Enter     edit selected reminder"),
            Line::from("d             delete selected reminder"),
            Line::from("space / x     toggle done"),
            Line::from("c             run a due check now"),
            Line::from("s             save list to file"),
            Line::from("r             reload list from file"),
            Line::from("q / Esc       save and quit"),
            Line::from(""),
            Line::from("Due reminders fire automatically every 30 seconds"),
            Line::from("and appear in the Alerts pane."),
        ];
        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

/// Compute a centered rectangle occupying the given percentages of `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
