use crate::buildpack::BuildpackId;
use serde::{Deserialize, Serialize};
use toml::value::Table;

/// A reference to a specific version of a buildpack.
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
pub struct BuildpackRef {
    pub id: BuildpackId,
    pub version: String,
}

/// A bill-of-materials entry.
///
/// Buildpacks write these to `launch.toml` and `build.toml` without the `buildpack` key. The
/// build stage attributes each entry to the buildpack that contributed it before it ends up in
/// the build metadata.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BomEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Table::is_empty")]
    pub metadata: Table,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildpack: Option<BuildpackRef>,
}

impl BomEntry {
    /// Returns a copy of this entry attributed to the given buildpack.
    #[must_use]
    pub fn attributed_to(&self, buildpack: BuildpackRef) -> Self {
        Self {
            buildpack: Some(buildpack),
            ..self.clone()
        }
    }
}
