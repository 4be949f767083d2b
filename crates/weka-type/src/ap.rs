use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Incoming activity as delivered to an inbox
///
/// Only the envelope fields needed for authentication are typed.
/// Everything else stays inside the raw `object` value.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Activity {
    #[serde(default, rename = "@context")]
    pub context: Value,
    pub id: String,
    pub r#type: String,
    pub actor: ActorField,
    #[serde(default)]
    pub object: Value,
}

/// The `actor` field of an activity, either a bare URI or an embedded object
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ActorField {
    Url(String),
    Object { id: String },
}

impl ActorField {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Url(id) | Self::Object { id } => id,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(default, rename = "@context")]
    pub context: Value,
    pub id: String,
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub inbox: Option<String>,
    pub public_key: PublicKey,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKey {
    pub id: String,
    pub owner: String,
    pub public_key_pem: String,
}
