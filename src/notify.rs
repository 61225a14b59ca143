//! Notification port and the console backend.
//!
//! The scheduler never decides how an alert reaches the user; it calls
//! whatever `Notify` implementation it was constructed with. The CLI
//! `check`/`watch` commands use the console backend below; the TUI
//! supplies its own implementation that collects alert lines.

use crate::task::Task;

/// Capability interface for surfacing a due task to the user.
pub trait Notify {
    /// Called exactly once per task per due window.
    fn notify_task_due(&mut self, task: &Task);
}

/// Terminal notification backend: one alert line per fired task, with a
/// bell character so `watch` sessions get an audible cue.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    pub fired: usize,
}

impl Notify for ConsoleNotifier {
    fn notify_task_due(&mut self, task: &Task) {
        self.fired += 1;
        if task.description.is_empty() {
            println!("\x07[{}] REMINDER: {}", task.due_str(), task.name);
        } else {
            println!("\x07[{}] REMINDER: {}: {}", task.due_str(), task.name, task.description);
        }
    }
}
