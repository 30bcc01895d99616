use serde::{Deserialize, Serialize};

use super::id;

/// A personal label. Labels are flat: no project or section relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub name: String,
}

impl Label {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Label {
            id: id.into(),
            name: name.into(),
        }
    }
}
