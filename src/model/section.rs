use serde::{Deserialize, Serialize};

use super::id;

/// A section inside a single project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "id::deserialize")]
    pub project_id: String,
}

impl Section {
    pub fn new(id: impl Into<String>, name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Section {
            id: id.into(),
            name: name.into(),
            project_id: project_id.into(),
        }
    }
}
