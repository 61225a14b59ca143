//! Due-task scheduling engine.
//!
//! Scans a task list against a point in time, fires the notifier for
//! every task whose due timestamp has just passed, and then either
//! finalises the task (one-shot) or rolls its due timestamp forward
//! past "now" (daily/weekly).
//!
//! A task is only eligible to fire within the first `DUE_WINDOW_SECS`
//! seconds after its due timestamp. If no check runs inside that window
//! (the process was closed or suspended), the task is skipped on later
//! checks and never fires retroactively.

use chrono::{Duration, Local, NaiveDateTime};

use crate::fields::Repeat;
use crate::notify::Notify;
use crate::task::Task;

/// Width of the one-shot trigger window, in seconds.
pub const DUE_WINDOW_SECS: i64 = 60;

/// The scheduler owns only its notification backend; the task list is
/// passed to each check so the caller keeps ownership and any external
/// mutation (deletion, reload) is visible to the next scan.
pub struct Scheduler<N: Notify> {
    pub notifier: N,
}

impl<N: Notify> Scheduler<N> {
    pub fn new(notifier: N) -> Self {
        Scheduler { notifier }
    }

    /// Run one due-check pass against the current wall-clock time.
    pub fn check_now(&mut self, tasks: &mut [Task]) {
        self.check_due_tasks(tasks, Local::now().naive_local());
    }

    /// Run one due-check pass against an explicit `now`.
    ///
    /// For every unfinished task inside its due window: notify once,
    /// then apply the repeat policy. All effects are in-place mutations
    /// of task state plus notifier side effects.
    pub fn check_due_tasks(&mut self, tasks: &mut [Task], now: NaiveDateTime) {
        let window = Duration::seconds(DUE_WINDOW_SECS);
        for task in tasks.iter_mut() {
            if task.done {
                continue;
            }
            let elapsed = now.signed_duration_since(task.due);
            if elapsed < Duration::zero() || elapsed >= window {
                continue;
            }
            self.notifier.notify_task_due(task);
            advance(task, now);
        }
    }
}

/// Apply the repeat policy to a task that just fired. One-shot tasks
/// reach their terminal state; repeating tasks land on the smallest
/// occurrence strictly after `now`.
fn advance(task: &mut Task, now: NaiveDateTime) {
    match task.repeat.interval() {
        None => task.done = true,
        Some(step) => {
            let mut next = task.due;
            while next <= now {
                next = next + step;
            }
            task.due = next;
            task.done = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::task::parse_datetime;

    /// Records the names of fired tasks, in order.
    #[derive(Default)]
    struct RecordingNotifier {
        fired: Vec<String>,
    }

    impl Notify for RecordingNotifier {
        fn notify_task_due(&mut self, task: &Task) {
            self.fired.push(task.name.clone());
        }
    }

    fn task(name: &str, due: &str, repeat: Repeat) -> Task {
        Task {
            name: name.to_string(),
            due: parse_datetime(due).unwrap(),
            repeat,
            description: String::new(),
            done: false,
            priority: Priority::Normal,
            category: "General".to_string(),
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_one_shot_fires_inside_window_and_is_finalised() {
        let mut tasks = vec![task("Pay bills", "2025-01-01 09:00", Repeat::None)];
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, at("2025-01-01 09:00:30"));

        assert_eq!(sched.notifier.fired, vec!["Pay bills"]);
        assert!(tasks[0].done);
    }

    #[test]
    fn test_fires_at_exact_due_instant() {
        let mut tasks = vec![task("On the dot", "2025-01-01 09:00", Repeat::None)];
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, at("2025-01-01 09:00:00"));

        assert_eq!(sched.notifier.fired.len(), 1);
    }

    #[test]
    fn test_future_task_is_untouched() {
        let mut tasks = vec![task("Later", "2025-01-01 09:00", Repeat::None)];
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, at("2025-01-01 08:59:59"));

        assert!(sched.notifier.fired.is_empty());
        assert!(!tasks[0].done);
        assert_eq!(tasks[0].due_str(), "2025-01-01 09:00");
    }

    #[test]
    fn test_missed_window_never_fires_retroactively() {
        let mut tasks = vec![task("Missed", "2025-01-01 09:00", Repeat::None)];
        let mut sched = Scheduler::new(RecordingNotifier::default());

        // 60s after due is already outside the window.
        sched.check_due_tasks(&mut tasks, at("2025-01-01 09:01:00"));
        sched.check_due_tasks(&mut tasks, at("2025-01-03 12:00:00"));

        assert!(sched.notifier.fired.is_empty());
        assert!(!tasks[0].done);
    }

    #[test]
    fn test_done_task_is_skipped() {
        let mut tasks = vec![task("Finished", "2025-01-01 09:00", Repeat::None)];
        tasks[0].done = true;
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, at("2025-01-01 09:00:10"));

        assert!(sched.notifier.fired.is_empty());
    }

    #[test]
    fn test_daily_task_rolls_forward_one_day() {
        let mut tasks = vec![task("Pay bills", "2025-01-01 09:00", Repeat::Daily)];
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, at("2025-01-01 09:00:30"));

        assert_eq!(sched.notifier.fired, vec!["Pay bills"]);
        assert_eq!(tasks[0].due_str(), "2025-01-02 09:00");
        assert!(!tasks[0].done);
    }

    #[test]
    fn test_weekly_roll_forward_lands_strictly_after_now() {
        // Due 20 days in the past; the window rule means this can only
        // happen if due was edited, but the roll-forward loop must still
        // terminate on the first occurrence strictly after now.
        let mut tasks = vec![task("Review", "2025-01-01 09:00", Repeat::Weekly)];
        let now = at("2025-01-21 09:00:30");
        advance(&mut tasks[0], now);

        assert_eq!(tasks[0].due_str(), "2025-01-22 09:00");
        assert!(tasks[0].due > now);
        assert!(!tasks[0].done);
    }

    #[test]
    fn test_repeated_check_with_same_now_is_idempotent() {
        let mut tasks = vec![
            task("Pay bills", "2025-01-01 09:00", Repeat::Daily),
            task("One off", "2025-01-01 09:00", Repeat::None),
        ];
        let now = at("2025-01-01 09:00:30");
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, now);
        sched.check_due_tasks(&mut tasks, now);

        assert_eq!(sched.notifier.fired, vec!["Pay bills", "One off"]);
        assert_eq!(tasks[0].due_str(), "2025-01-02 09:00");
        assert!(tasks[1].done);
    }

    #[test]
    fn test_only_due_tasks_fire_in_a_mixed_list() {
        let mut tasks = vec![
            task("Due now", "2025-01-01 09:00", Repeat::None),
            task("Tomorrow", "2025-01-02 09:00", Repeat::None),
            task("Long past", "2024-12-01 09:00", Repeat::Daily),
        ];
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, at("2025-01-01 09:00:45"));

        assert_eq!(sched.notifier.fired, vec!["Due now"]);
        assert_eq!(tasks[2].due_str(), "2024-12-01 09:00");
    }

    #[test]
    fn test_daily_task_fires_again_next_day() {
        let mut tasks = vec![task("Standup", "2025-01-01 09:00", Repeat::Daily)];
        let mut sched = Scheduler::new(RecordingNotifier::default());

        sched.check_due_tasks(&mut tasks, at("2025-01-01 09:00:15"));
        sched.check_due_tasks(&mut tasks, at("2025-01-02 09:00:15"));

        assert_eq!(sched.notifier.fired.len(), 2);
        assert_eq!(tasks[0].due_str(), "2025-01-03 09:00");
    }
}
