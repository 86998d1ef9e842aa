//! Message and Turn value objects.
//!
//! A session turn is exactly one system message (instructions + retrieved
//! context) followed by one user message (the question). Nothing is carried
//! from one turn to the next.

use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and grounding context
    System,
    /// The end user
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One stateless request to the language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub system: Message,
    pub user: Message,
}

impl Turn {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Message::system(system),
            user: Message::user(user),
        }
    }

    /// The messages in wire order: system first, then user.
    pub fn messages(&self) -> [&Message; 2] {
        [&self.system, &self.user]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_orders_system_before_user() {
        let turn = Turn::new("instructions", "question?");
        let [first, second] = turn.messages();
        assert_eq!(first.role, Role::System);
        assert_eq!(first.content, "instructions");
        assert_eq!(second.role, Role::User);
        assert_eq!(second.content, "question?");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
        assert_eq!(Role::System.as_str(), "system");
    }
}
