//! Session history tracking and the back gesture.

use std::cell::Cell;

/// What a back gesture should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// Go back exactly one history entry.
    StepBack,
    /// Nothing to go back to: leave the shell.
    Exit,
}

/// Mirror of the webview's session history, updated from
/// `notify_history_changed`.
#[derive(Debug, Default)]
pub struct HistoryState {
    len: Cell<usize>,
    current: Cell<usize>,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, len: usize, current: usize) {
        self.len.set(len);
        self.current.set(current.min(len.saturating_sub(1)));
    }

    pub fn can_go_back(&self) -> bool {
        self.current.get() > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current.get() + 1 < self.len.get()
    }

    pub fn back_action(&self) -> BackAction {
        if self.can_go_back() {
            BackAction::StepBack
        } else {
            BackAction::Exit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_exits() {
        let history = HistoryState::new();
        assert_eq!(history.back_action(), BackAction::Exit);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_single_entry_exits() {
        let history = HistoryState::new();
        history.update(1, 0);
        assert_eq!(history.back_action(), BackAction::Exit);
    }

    #[test]
    fn test_entry_behind_steps_back() {
        let history = HistoryState::new();
        history.update(3, 2);
        assert_eq!(history.back_action(), BackAction::StepBack);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_back_at_start_of_history_exits() {
        let history = HistoryState::new();
        history.update(3, 0);
        assert_eq!(history.back_action(), BackAction::Exit);
        assert!(history.can_go_forward());
    }

    #[test]
    fn test_out_of_range_index_is_clamped() {
        let history = HistoryState::new();
        history.update(2, 7);
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
    }
}
