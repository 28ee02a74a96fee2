use serde::{Deserialize, Serialize};
use toml::value::Table;

/// The plan handed to a single buildpack's build executable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BuildpackPlan {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Entry {
    pub name: String,
    #[serde(default)]
    pub metadata: Table,
}
