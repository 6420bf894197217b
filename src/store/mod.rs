pub mod actions;
pub mod seed;
pub mod state;

pub use actions::Action;
pub use state::{Change, ChatState};

use std::error::Error;

/// Reacts to committed mutations (persistence, theme effect, ...).
pub trait StoreSubscriber {
    fn name(&self) -> &'static str;

    fn on_commit(&mut self, state: &ChatState, change: Change) -> Result<(), Box<dyn Error>>;
}

/// Owns [`ChatState`] and notifies subscribers after every committed action.
pub struct Store {
    state: ChatState,
    subscribers: Vec<Box<dyn StoreSubscriber>>,
    failures: Vec<String>,
}

impl Store {
    pub fn new(state: ChatState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn StoreSubscriber>) {
        log::debug!("Store subscriber registered: {}", subscriber.name());
        self.subscribers.push(subscriber);
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Change {
        log::debug!("dispatch {action:?}");
        let change = self.state.apply(action);
        if change.is_empty() {
            return change;
        }

        for subscriber in &mut self.subscribers {
            if let Err(err) = subscriber.on_commit(&self.state, change) {
                log::error!("Subscriber {} failed: {err}", subscriber.name());
                self.failures.push(format!("{}: {err}", subscriber.name()));
            }
        }
        change
    }

    /// Drain subscriber failures collected since the last call.
    pub fn take_failures(&mut self) -> Vec<String> {
        std::mem::take(&mut self.failures)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recorder {
        seen: Rc<RefCell<Vec<Change>>>,
        fail: bool,
    }

    impl StoreSubscriber for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn on_commit(&mut self, _state: &ChatState, change: Change) -> Result<(), Box<dyn Error>> {
            self.seen.borrow_mut().push(change);
            if self.fail {
                return Err("disk full".into());
            }
            Ok(())
        }
    }

    #[test]
    fn subscribers_see_committed_changes_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(ChatState::new());
        store.subscribe(Box::new(Recorder {
            seen: Rc::clone(&seen),
            fail: false,
        }));

        store.dispatch(Action::ToggleDarkMode);
        store.dispatch(Action::DeleteChatroom {
            id: "missing".to_string(),
        });
        store.dispatch(Action::AddChatroom {
            title: "Trip Planning".to_string(),
        });

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].theme);
        assert!(seen[1].chatrooms);
        assert_eq!(store.state().chatrooms().len(), 1);
    }

    #[test]
    fn failures_are_collected_and_state_still_commits() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(ChatState::new());
        store.subscribe(Box::new(Recorder {
            seen: Rc::clone(&seen),
            fail: true,
        }));

        store.dispatch(Action::ToggleDarkMode);

        assert!(store.state().is_dark_mode());
        let failures = store.take_failures();
        assert_eq!(failures, vec!["recorder: disk full".to_string()]);
        assert!(store.take_failures().is_empty());
    }
}
