use serde::{Deserialize, Serialize};

/// A registered account. `password` holds the credential string, never plaintext.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Assigned by the store on first save.
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(name: impl Into<String>, credential: impl Into<String>, email: Option<String>) -> Self {
        Self { id: None, name: name.into(), password: credential.into(), email }
    }
}
