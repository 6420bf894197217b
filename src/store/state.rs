use std::collections::BTreeMap;

use chrono::Utc;

use crate::common::{Chatroom, Country, Message, User};

use super::actions::Action;
use super::seed::{SEED_BATCH, generate_seed_messages, new_id};

/// Which slices of state a committed action touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Change {
    pub session: bool,
    pub chatrooms: bool,
    pub theme: bool,
    pub pages: bool,
    /// Countries, selection, search query, typing: never persisted.
    pub transient: bool,
}

impl Change {
    pub fn is_empty(&self) -> bool {
        *self == Change::default()
    }

    /// True khi có slice cần ghi xuống storage.
    pub fn touches_persisted(&self) -> bool {
        self.session || self.chatrooms || self.theme || self.pages
    }
}

/// Trạng thái lõi của ứng dụng. Chỉ thay đổi qua [`ChatState::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    user: Option<User>,
    countries: Vec<Country>,
    /// Newest-created first.
    chatrooms: Vec<Chatroom>,
    current_chatroom_id: Option<String>,
    search_query: String,
    is_dark_mode: bool,
    message_pages: BTreeMap<String, u32>,
    /// Simulated replies in flight, per room.
    typing: BTreeMap<String, usize>,
    message_cap: Option<usize>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the persisted subset; everything else starts at defaults.
    pub fn restore(
        user: Option<User>,
        chatrooms: Vec<Chatroom>,
        is_dark_mode: bool,
        message_pages: BTreeMap<String, u32>,
    ) -> Self {
        Self {
            user,
            chatrooms,
            is_dark_mode,
            message_pages,
            ..Self::default()
        }
    }

    /// Giới hạn số tin nhắn mỗi phòng khi load thêm (None = không giới hạn).
    pub fn with_message_cap(mut self, cap: Option<usize>) -> Self {
        self.message_cap = cap;
        self
    }

    pub fn apply(&mut self, action: Action) -> Change {
        match action {
            Action::SetUser(user) => self.set_user(user),
            Action::Logout => self.logout(),
            Action::SetCountries(countries) => self.set_countries(countries),
            Action::AddChatroom { title } => self.add_chatroom(title),
            Action::DeleteChatroom { id } => self.delete_chatroom(&id),
            Action::SetCurrentChatroom(id) => self.set_current_chatroom(id),
            Action::SetSearchQuery(query) => self.set_search_query(query),
            Action::AddMessage {
                chatroom_id,
                content,
                is_user,
                image,
            } => self.add_message(&chatroom_id, content, is_user, image),
            Action::LoadMoreMessages { chatroom_id } => self.load_more_messages(&chatroom_id),
            Action::SetTyping {
                chatroom_id,
                typing,
            } => self.set_typing(chatroom_id, typing),
            Action::ToggleDarkMode => self.toggle_dark_mode(),
        }
    }

    fn set_user(&mut self, user: Option<User>) -> Change {
        self.user = user;
        Change {
            session: true,
            ..Change::default()
        }
    }

    fn logout(&mut self) -> Change {
        self.user = None;
        self.chatrooms.clear();
        self.current_chatroom_id = None;
        self.message_pages.clear();
        self.typing.clear();
        Change {
            session: true,
            chatrooms: true,
            pages: true,
            transient: true,
            ..Change::default()
        }
    }

    fn set_countries(&mut self, countries: Vec<Country>) -> Change {
        self.countries = countries;
        Change {
            transient: true,
            ..Change::default()
        }
    }

    fn add_chatroom(&mut self, title: String) -> Change {
        let now = Utc::now();
        let messages = generate_seed_messages(SEED_BATCH, now);
        let last_message = messages.last().cloned();
        let room = Chatroom {
            id: new_id(),
            title,
            messages,
            created_at: now,
            last_message,
        };

        self.message_pages.insert(room.id.clone(), 1);
        self.chatrooms.insert(0, room);
        Change {
            chatrooms: true,
            pages: true,
            ..Change::default()
        }
    }

    fn delete_chatroom(&mut self, id: &str) -> Change {
        let before = self.chatrooms.len();
        self.chatrooms.retain(|room| room.id != id);
        let removed_room = self.chatrooms.len() != before;
        let removed_page = self.message_pages.remove(id).is_some();
        let was_current = self.current_chatroom_id.as_deref() == Some(id);
        if was_current {
            self.current_chatroom_id = None;
        }
        let was_typing = self.typing.remove(id).is_some();

        Change {
            chatrooms: removed_room,
            pages: removed_page,
            transient: was_current || was_typing,
            ..Change::default()
        }
    }

    fn set_current_chatroom(&mut self, id: Option<String>) -> Change {
        self.current_chatroom_id = id;
        Change {
            transient: true,
            ..Change::default()
        }
    }

    fn set_search_query(&mut self, query: String) -> Change {
        self.search_query = query;
        Change {
            transient: true,
            ..Change::default()
        }
    }

    fn add_message(
        &mut self,
        chatroom_id: &str,
        content: String,
        is_user: bool,
        image: Option<String>,
    ) -> Change {
        let Some(room) = self.chatrooms.iter_mut().find(|room| room.id == chatroom_id) else {
            return Change::default();
        };

        let message = Message {
            id: new_id(),
            content,
            is_user,
            timestamp: Utc::now(),
            image,
        };
        room.last_message = Some(message.clone());
        room.messages.push(message);
        Change {
            chatrooms: true,
            ..Change::default()
        }
    }

    fn load_more_messages(&mut self, chatroom_id: &str) -> Change {
        let Some(room) = self.chatrooms.iter_mut().find(|room| room.id == chatroom_id) else {
            return Change::default();
        };

        // Batch tổng hợp, không phải lịch sử thật: chỉ dùng cho demo.
        let mut older = generate_seed_messages(SEED_BATCH, Utc::now());
        older.append(&mut room.messages);
        room.messages = older;

        if let Some(cap) = self.message_cap {
            let excess = room.messages.len().saturating_sub(cap);
            room.messages.drain(..excess);
        }

        let page = self.message_pages.entry(chatroom_id.to_string()).or_insert(1);
        *page += 1;
        Change {
            chatrooms: true,
            pages: true,
            ..Change::default()
        }
    }

    /// `true` registers one pending reply, `false` settles one.
    fn set_typing(&mut self, chatroom_id: String, typing: bool) -> Change {
        let changed = if typing {
            if self.chatroom(&chatroom_id).is_none() {
                return Change::default();
            }
            *self.typing.entry(chatroom_id).or_insert(0) += 1;
            true
        } else {
            match self.typing.get_mut(&chatroom_id) {
                Some(count) if *count > 1 => {
                    *count -= 1;
                    true
                }
                Some(_) => {
                    self.typing.remove(&chatroom_id);
                    true
                }
                None => false,
            }
        };
        Change {
            transient: changed,
            ..Change::default()
        }
    }

    fn toggle_dark_mode(&mut self) -> Change {
        self.is_dark_mode = !self.is_dark_mode;
        Change {
            theme: true,
            ..Change::default()
        }
    }

    // ========== Read views ==========

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_authenticated)
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn chatrooms(&self) -> &[Chatroom] {
        &self.chatrooms
    }

    pub fn chatroom(&self, id: &str) -> Option<&Chatroom> {
        self.chatrooms.iter().find(|room| room.id == id)
    }

    pub fn current_chatroom_id(&self) -> Option<&str> {
        self.current_chatroom_id.as_deref()
    }

    /// The selected room, if the selection still points at a live one.
    pub fn current_chatroom(&self) -> Option<&Chatroom> {
        self.current_chatroom_id
            .as_deref()
            .and_then(|id| self.chatroom(id))
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn filtered_chatrooms(&self) -> Vec<&Chatroom> {
        filter_chatrooms(&self.chatrooms, &self.search_query)
    }

    pub fn is_dark_mode(&self) -> bool {
        self.is_dark_mode
    }

    pub fn message_pages(&self) -> &BTreeMap<String, u32> {
        &self.message_pages
    }

    pub fn page_of(&self, chatroom_id: &str) -> Option<u32> {
        self.message_pages.get(chatroom_id).copied()
    }

    pub fn is_typing(&self, chatroom_id: &str) -> bool {
        self.typing.contains_key(chatroom_id)
    }
}

/// Case-insensitive substring match on titles; a blank query keeps everything.
pub fn filter_chatrooms<'a>(rooms: &'a [Chatroom], query: &str) -> Vec<&'a Chatroom> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rooms.iter().collect();
    }
    rooms
        .iter()
        .filter(|room| room.title.to_lowercase().contains(&needle))
        .collect()
}
