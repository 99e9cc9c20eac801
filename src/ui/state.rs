use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    pub fn is_complete(&self) -> bool {
        let base = !self.email.trim().is_empty() && !self.password.is_empty();
        match self.mode {
            AuthMode::Login => base,
            AuthMode::Register => base && !self.name.trim().is_empty(),
        }
    }

    pub fn clear_secrets(&mut self) {
        self.password.clear();
    }
}

/// What the new-chat dialog asks the store for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatRequest {
    pub participant_ids: Vec<String>,
    pub name: Option<String>,
    pub is_group: bool,
}

#[derive(Debug, Default)]
pub struct NewChatForm {
    pub open: bool,
    pub selected: BTreeSet<String>,
    pub name: String,
    pub filter: String,
}

impl NewChatForm {
    pub fn toggle(&mut self, user_id: &str) {
        if !self.selected.remove(user_id) {
            self.selected.insert(user_id.to_string());
        }
    }

    /// A group once more than one person is picked or a name is given.
    pub fn request(&self) -> Option<NewChatRequest> {
        if self.selected.is_empty() {
            return None;
        }
        let name = self.name.trim();
        Some(NewChatRequest {
            participant_ids: self.selected.iter().cloned().collect(),
            name: (!name.is_empty()).then(|| name.to_string()),
            is_group: self.selected.len() > 1 || !name.is_empty(),
        })
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }
}

/// Widget state that does not belong in the chat store.
#[derive(Debug, Default)]
pub struct UiState {
    pub input_text: String,
    pub auth: AuthForm,
    pub new_chat: NewChatForm,
    pub show_notices: bool,
}
