//! Domain models exchanged with the speech service API.
//!
//! These records are passed to and from the API unchanged; the client does
//! not enforce invariants on them beyond the wire shape.

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque speech identifier. The API may send it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SpeechId(String);

impl SpeechId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeechId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SpeechId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// A user-owned document with a title and a rich-text (HTML) body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speech {
    pub id: SpeechId,
    #[serde(default)]
    pub title: String,
    /// HTML markup produced by the rich-text editor.
    #[serde(default)]
    pub content: String,
}

/// Body for creating or replacing a speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechDraft {
    pub title: String,
    pub content: String,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub token: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile update request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub current_password: String,
    /// Omitted from the body when the password is not being changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}
