use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use std::path::Path;

use super::database::Database;
use super::error::StorageResult;
use super::models::PersistedState;

/// Key của bản ghi snapshot duy nhất.
pub const SNAPSHOT_KEY: &str = "gemini-chat-storage";

/// Key-value store holding the persisted application snapshot.
pub struct SnapshotDatabase {
    db: Database,
}

impl SnapshotDatabase {
    /// Initialize snapshot database at custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = Database::open(path)?;
        let snapshot_db = Self { db };
        snapshot_db.init_schema()?;
        Ok(snapshot_db)
    }

    #[cfg(test)]
    pub fn in_memory() -> StorageResult<Self> {
        let snapshot_db = Self {
            db: Database::in_memory()?,
        };
        snapshot_db.init_schema()?;
        Ok(snapshot_db)
    }

    fn init_schema(&self) -> StorageResult<()> {
        self.db.connection().execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    // ========== Raw values ==========

    pub fn put_value(&self, key: &str, value: &str) -> StorageResult<()> {
        self.db.connection().execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn delete_value(&self, key: &str) -> StorageResult<bool> {
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    // ========== Snapshot ==========

    pub fn save_snapshot(&self, snapshot: &PersistedState) -> StorageResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.put_value(SNAPSHOT_KEY, &json)
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load_snapshot(&self) -> StorageResult<Option<PersistedState>> {
        match self.get_value(SNAPSHOT_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn clear_snapshot(&self) -> StorageResult<bool> {
        self.delete_value(SNAPSHOT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::User;
    use crate::store::{Action, ChatState};

    fn populated_state() -> ChatState {
        let mut state = ChatState::new();
        state.apply(Action::SetUser(Some(User {
            id: "u-42".to_string(),
            phone: "912345678".to_string(),
            country_code: "+351".to_string(),
            is_authenticated: true,
        })));
        state.apply(Action::AddChatroom {
            title: "Trip Planning".to_string(),
        });
        state.apply(Action::AddChatroom {
            title: "Recipes".to_string(),
        });
        let id = state.chatrooms()[0].id.clone();
        state.apply(Action::AddMessage {
            chatroom_id: id.clone(),
            content: "with picture".to_string(),
            is_user: true,
            image: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
        });
        state.apply(Action::LoadMoreMessages { chatroom_id: id });
        state.apply(Action::ToggleDarkMode);
        state
    }

    #[test]
    fn empty_database_has_no_snapshot() {
        let db = SnapshotDatabase::in_memory().unwrap();
        assert_eq!(db.load_snapshot().unwrap(), None);
        assert!(!db.clear_snapshot().unwrap());
    }

    #[test]
    fn snapshot_round_trip_restores_persisted_slices() {
        let db = SnapshotDatabase::in_memory().unwrap();
        let mut state = populated_state();
        let id = state.chatrooms()[0].id.clone();
        state.apply(Action::SetCountries(vec![crate::common::Country {
            name: "Portugal".to_string(),
            code: "PT".to_string(),
            dial_code: "+351".to_string(),
            flag: "🇵🇹".to_string(),
        }]));
        state.apply(Action::SetSearchQuery("trip".to_string()));
        state.apply(Action::SetCurrentChatroom(Some(id.clone())));
        state.apply(Action::SetTyping {
            chatroom_id: id.clone(),
            typing: true,
        });

        let before = PersistedState::from_state(&state);
        db.save_snapshot(&before).unwrap();

        let restored = db.load_snapshot().unwrap().unwrap();
        assert_eq!(restored, before);

        let rehydrated = restored.into_state();
        assert_eq!(rehydrated.user(), state.user());
        assert_eq!(rehydrated.chatrooms(), state.chatrooms());
        assert_eq!(rehydrated.message_pages(), state.message_pages());
        assert!(rehydrated.is_dark_mode());
        assert!(rehydrated.countries().is_empty());
        assert_eq!(rehydrated.search_query(), "");
        assert!(!rehydrated.is_typing(&id));
        assert_eq!(rehydrated.current_chatroom_id(), None);

        let room = rehydrated.chatroom(&id).unwrap();
        assert!(
            room.messages
                .windows(2)
                .skip(20)
                .all(|pair| pair[0].timestamp <= pair[1].timestamp)
        );
        assert_eq!(room.last_message.as_ref(), room.messages.last());
    }

    #[test]
    fn snapshot_survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chat.db");
        let before = PersistedState::from_state(&populated_state());

        {
            let db = SnapshotDatabase::with_path(&path).unwrap();
            db.save_snapshot(&before).unwrap();
        }

        let db = SnapshotDatabase::with_path(&path).unwrap();
        assert_eq!(db.load_snapshot().unwrap(), Some(before));
        assert!(db.clear_snapshot().unwrap());
        assert_eq!(db.load_snapshot().unwrap(), None);
    }

    #[test]
    fn corrupt_snapshot_is_a_serialization_error() {
        let db = SnapshotDatabase::in_memory().unwrap();
        db.put_value(SNAPSHOT_KEY, "{not json").unwrap();
        assert!(matches!(
            db.load_snapshot(),
            Err(crate::storage::error::StorageError::Serialization(_))
        ));
    }
}
