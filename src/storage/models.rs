use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{Chatroom, User};
use crate::store::ChatState;

/// The persisted subset of [`ChatState`].
///
/// Countries, typing state, selection and search query are deliberately absent
/// and come back as defaults on every load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub chatrooms: Vec<Chatroom>,
    #[serde(default)]
    pub is_dark_mode: bool,
    #[serde(default)]
    pub message_pages: BTreeMap<String, u32>,
}

impl PersistedState {
    pub fn from_state(state: &ChatState) -> Self {
        Self {
            user: state.user().cloned(),
            chatrooms: state.chatrooms().to_vec(),
            is_dark_mode: state.is_dark_mode(),
            message_pages: state.message_pages().clone(),
        }
    }

    pub fn into_state(self) -> ChatState {
        ChatState::restore(
            self.user,
            self.chatrooms,
            self.is_dark_mode,
            self.message_pages,
        )
    }
}
