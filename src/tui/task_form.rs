//! Add/edit form state for the terminal user interface.
//!
//! The form mirrors the fields a reminder is built from: name, date,
//! time, repeat, description, priority, category. Text fields hold their
//! own cursor; the repeat and priority fields cycle through their
//! variants. Validation happens on submit, through `Task::build`, so a
//! malformed date or time never reaches the task list.

use chrono::Local;

use crate::fields::{Priority, Repeat};
use crate::task::Task;

/// A text input with cursor position.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_offset(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset();
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }
}

/// Focusable form fields, in display order.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Date,
    Time,
    Repeat,
    Description,
    Priority,
    Category,
}

pub const FIELD_ORDER: [FormField; 7] = [
    FormField::Name,
    FormField::Date,
    FormField::Time,
    FormField::Repeat,
    FormField::Description,
    FormField::Priority,
    FormField::Category,
];

/// State for the add/edit reminder form.
pub struct TaskForm {
    pub name: InputField,
    pub date: InputField,
    pub time: InputField,
    pub repeat: Repeat,
    pub description: InputField,
    pub priority: Priority,
    pub category: InputField,
    pub focus: usize,
    /// Position of the task being edited, or None when adding.
    pub editing: Option<usize>,
}

impl TaskForm {
    /// Fresh form for adding a reminder, due today at 09:00.
    pub fn new() -> Self {
        TaskForm {
            name: InputField::default(),
            date: InputField::with_value(&Local::now().date_naive().format("%Y-%m-%d").to_string()),
            time: InputField::with_value("09:00"),
            repeat: Repeat::None,
            description: InputField::default(),
            priority: Priority::Normal,
            category: InputField::default(),
            focus: 0,
            editing: None,
        }
    }

    /// Form prefilled from an existing task, for editing in place.
    pub fn for_task(idx: usize, task: &Task) -> Self {
        TaskForm {
            name: InputField::with_value(&task.name),
            date: InputField::with_value(&task.due.format("%Y-%m-%d").to_string()),
            time: InputField::with_value(&task.due.format("%H:%M").to_string()),
            repeat: task.repeat,
            description: InputField::with_value(&task.description),
            priority: task.priority,
            category: InputField::with_value(&task.category),
            focus: 0,
            editing: Some(idx),
        }
    }

    pub fn focused(&self) -> FormField {
        FIELD_ORDER[self.focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FIELD_ORDER.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + FIELD_ORDER.len() - 1) % FIELD_ORDER.len();
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.focused() {
            FormField::Name => Some(&mut self.name),
            FormField::Date => Some(&mut self.date),
            FormField::Time => Some(&mut self.time),
            FormField::Description => Some(&mut self.description),
            FormField::Category => Some(&mut self.category),
            FormField::Repeat | FormField::Priority => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        match self.focused() {
            FormField::Repeat => {
                if c == ' ' {
                    self.cycle_forward();
                }
            }
            FormField::Priority => {
                if c == ' ' {
                    self.cycle_forward();
                }
            }
            _ => {
                if let Some(input) = self.active_input() {
                    input.handle_char(c);
                }
            }
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_backspace();
        }
    }

    /// Left arrow: cursor movement in text fields, cycling in enums.
    pub fn handle_left(&mut self) {
        match self.focused() {
            FormField::Repeat | FormField::Priority => self.cycle_backward(),
            _ => {
                if let Some(input) = self.active_input() {
                    input.move_cursor_left();
                }
            }
        }
    }

    /// Right arrow: cursor movement in text fields, cycling in enums.
    pub fn handle_right(&mut self) {
        match self.focused() {
            FormField::Repeat | FormField::Priority => self.cycle_forward(),
            _ => {
                if let Some(input) = self.active_input() {
                    input.move_cursor_right();
                }
            }
        }
    }

    fn cycle_forward(&mut self) {
        match self.focused() {
            FormField::Repeat => {
                self.repeat = match self.repeat {
                    Repeat::None => Repeat::Daily,
                    Repeat::Daily => Repeat::Weekly,
                    Repeat::Weekly => Repeat::None,
                }
            }
            FormField::Priority => {
                self.priority = match self.priority {
                    Priority::Low => Priority::Normal,
                    Priority::Normal => Priority::High,
                    Priority::High => Priority::Low,
                }
            }
            _ => {}
        }
    }

    fn cycle_backward(&mut self) {
        match self.focused() {
            FormField::Repeat => {
                self.repeat = match self.repeat {
                    Repeat::None => Repeat::Weekly,
                    Repeat::Daily => Repeat::None,
                    Repeat::Weekly => Repeat::Daily,
                }
            }
            FormField::Priority => {
                self.priority = match self.priority {
                    Priority::Low => Priority::High,
                    Priority::Normal => Priority::Low,
                    Priority::High => Priority::Normal,
                }
            }
            _ => {}
        }
    }

    /// Validate the form and build the resulting task.
    pub fn build(&self) -> Result<Task, String> {
        if self.name.value.trim().is_empty() {
            return Err("Reminder name cannot be empty".to_string());
        }
        Task::build(
            &self.name.value,
            &self.date.value,
            &self.time.value,
            self.repeat,
            &self.description.value,
            self.priority,
            &self.category.value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_field_editing() {
        let mut f = InputField::with_value("bils");
        f.move_cursor_left();
        f.handle_char('l');
        assert_eq!(f.value, "bills");
        f.handle_backspace();
        assert_eq!(f.value, "bils");
    }

    #[test]
    fn test_cycle_repeat_wraps() {
        let mut form = TaskForm::new();
        form.focus = 3; // Repeat
        form.handle_right();
        assert_eq!(form.repeat, Repeat::Daily);
        form.handle_right();
        form.handle_right();
        assert_eq!(form.repeat, Repeat::None);
        form.handle_left();
        assert_eq!(form.repeat, Repeat::Weekly);
    }

    #[test]
    fn test_build_validates() {
        let mut form = TaskForm::new();
        assert!(form.build().is_err());

        for c in "Pay bills".chars() {
            form.handle_char(c);
        }
        form.date = InputField::with_value("2025-01-01");
        form.time = InputField::with_value("09:00");
        let task = form.build().unwrap();
        assert_eq!(task.name, "Pay bills");
        assert_eq!(task.due_str(), "2025-01-01 09:00");

        form.time = InputField::with_value("25:00");
        assert!(form.build().is_err());
    }
}
