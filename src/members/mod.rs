pub mod fetch;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Opaque member identifier. The payload sends it as a string or a number;
/// we keep the textual form either way.
pub type MemberId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "id_from_json")]
    pub id: MemberId,
    #[serde(default, deserialize_with = "text_from_json")]
    pub name: String,
    #[serde(default, deserialize_with = "text_from_json")]
    pub email: String,
    #[serde(default, deserialize_with = "text_from_json")]
    pub role: String,
}

/// The three fields an inline edit can change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFields {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl Member {
    pub fn fields(&self) -> MemberFields {
        MemberFields {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }

    pub fn apply(&mut self, fields: MemberFields) {
        self.name = fields.name;
        self.email = fields.email;
        self.role = fields.role;
    }
}

fn id_from_json<'de, D>(deserializer: D) -> Result<MemberId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Text fields: `null` or any non-string value shows as empty.
fn text_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// Drop entries whose id was already seen. First occurrence wins.
pub fn dedupe_ids(members: Vec<Member>) -> Vec<Member> {
    let mut seen = HashSet::new();
    members
        .into_iter()
        .filter(|m| {
            let fresh = seen.insert(m.id.clone());
            if !fresh && m.id.is_empty() {
                tracing::warn!("Dropping member {:?} with no id; only the first id-less row is kept", m.name);
            } else if !fresh {
                tracing::warn!("Dropping member with duplicate id {:?}", m.id);
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn member(id: &str, name: &str, email: &str, role: &str) -> Member {
    Member {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
    }
}
