use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned identifier. Opaque to the client: it is only ever
/// displayed in logs and appended to the collection URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        string_or_number(deserializer).map(Self::new)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProjectId,
    pub project_name: String,
    pub client_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub deadline: String,
}

impl Project {
    /// The editable part of the record, used to seed the edit form
    pub fn input(&self) -> ProjectInput {
        ProjectInput {
            project_name: self.project_name.clone(),
            client_name: self.client_name.clone(),
            deadline: self.deadline.clone(),
        }
    }
}

/// Body of create and update calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub project_name: String,
    pub client_name: String,
    pub deadline: String,
}

impl ProjectInput {
    /// Every field must hold something other than whitespace
    pub fn is_complete(&self) -> bool {
        [&self.project_name, &self.client_name, &self.deadline]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
