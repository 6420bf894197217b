use std::error::Error;

use crate::store::{Change, ChatState, StoreSubscriber};

use super::models::PersistedState;
use super::snapshot_db::SnapshotDatabase;

/// Writes the snapshot after each commit that touched a persisted slice.
pub struct PersistenceSubscriber {
    db: SnapshotDatabase,
}

impl PersistenceSubscriber {
    pub fn new(db: SnapshotDatabase) -> Self {
        Self { db }
    }
}

impl StoreSubscriber for PersistenceSubscriber {
    fn name(&self) -> &'static str {
        "persistence"
    }

    fn on_commit(&mut self, state: &ChatState, change: Change) -> Result<(), Box<dyn Error>> {
        if !change.touches_persisted() {
            return Ok(());
        }
        self.db.save_snapshot(&PersistedState::from_state(state))?;
        Ok(())
    }
}

/// Load the initial state, falling back to defaults when nothing usable is stored.
pub fn rehydrate(db: &SnapshotDatabase) -> ChatState {
    match db.load_snapshot() {
        Ok(Some(snapshot)) => {
            log::info!(
                "Rehydrated {} chatrooms (signed in: {})",
                snapshot.chatrooms.len(),
                snapshot.user.is_some()
            );
            snapshot.into_state()
        }
        Ok(None) => {
            log::info!("No stored snapshot; starting fresh");
            ChatState::new()
        }
        Err(err) => {
            log::warn!("Discarding unreadable snapshot: {err}");
            ChatState::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::snapshot_db::SNAPSHOT_KEY;
    use crate::store::{Action, Store};

    #[test]
    fn persisted_mutations_reach_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.db");

        {
            let mut store = Store::new(ChatState::new());
            store.subscribe(Box::new(PersistenceSubscriber::new(
                SnapshotDatabase::with_path(&path).unwrap(),
            )));
            store.dispatch(Action::AddChatroom {
                title: "Trip Planning".to_string(),
            });
            store.dispatch(Action::ToggleDarkMode);
            store.dispatch(Action::SetSearchQuery("trip".to_string()));
            assert!(store.take_failures().is_empty());
        }

        let state = rehydrate(&SnapshotDatabase::with_path(&path).unwrap());
        assert_eq!(state.chatrooms().len(), 1);
        assert_eq!(state.chatrooms()[0].title, "Trip Planning");
        assert!(state.is_dark_mode());
        assert_eq!(state.search_query(), "");
    }

    #[test]
    fn transient_changes_do_not_write() {
        let db = SnapshotDatabase::in_memory().unwrap();
        let mut subscriber = PersistenceSubscriber::new(db);
        let state = ChatState::new();
        subscriber
            .on_commit(
                &state,
                Change {
                    transient: true,
                    ..Change::default()
                },
            )
            .unwrap();
        assert_eq!(subscriber.db.get_value(SNAPSHOT_KEY).unwrap(), None);
    }

    #[test]
    fn unreadable_snapshot_falls_back_to_defaults() {
        let db = SnapshotDatabase::in_memory().unwrap();
        db.put_value(SNAPSHOT_KEY, "not json at all").unwrap();
        assert_eq!(rehydrate(&db), ChatState::new());
    }
}
