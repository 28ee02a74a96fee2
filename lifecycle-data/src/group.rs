use crate::buildpack::{ApiVersion, BuildpackId};
use serde::{Deserialize, Serialize};

/// Data structure for the buildpack group file (`group.toml`).
///
/// The group is the ordered list of buildpacks selected by detection. The order of
/// [`BuildpackGroup::group`] is the order in which the buildpacks are built.
///
/// # Example:
/// ```
/// use lifecycle_data::group::BuildpackGroup;
///
/// let toml_str = r#"
/// [[group]]
/// id = "heroku/jvm"
/// version = "1.0.0"
/// api = "0.9"
///
/// [[group]]
/// id = "heroku/maven"
/// version = "2.0.0"
/// api = "0.10"
/// optional = true
/// "#;
///
/// let group = toml::from_str::<BuildpackGroup>(toml_str).unwrap();
/// assert_eq!(group.group.len(), 2);
/// assert_eq!(group.group[0].id.as_str(), "heroku/jvm");
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct BuildpackGroup {
    #[serde(default)]
    pub group: Vec<GroupBuildpack>,
}

impl BuildpackGroup {
    #[must_use]
    pub fn new(group: Vec<GroupBuildpack>) -> Self {
        Self { group }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupBuildpack> {
        self.group.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.group.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }
}

impl<'a> IntoIterator for &'a BuildpackGroup {
    type Item = &'a GroupBuildpack;
    type IntoIter = std::slice::Iter<'a, GroupBuildpack>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A single buildpack reference within a [`BuildpackGroup`].
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
pub struct GroupBuildpack {
    pub id: BuildpackId,
    pub version: String,
    pub api: ApiVersion,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl GroupBuildpack {
    #[must_use]
    pub fn new(id: BuildpackId, version: impl Into<String>, api: ApiVersion) -> Self {
        Self {
            id,
            version: version.into(),
            api,
            optional: false,
            homepage: None,
        }
    }
}
