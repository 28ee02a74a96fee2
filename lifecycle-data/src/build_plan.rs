use crate::bom::BuildpackRef;
use crate::buildpack::BuildpackId;
use crate::buildpack_plan::{BuildpackPlan, Entry};
use serde::{Deserialize, Serialize};
use toml::value::Table;

/// Data structure for the build plan file (`plan.toml`) produced by detection.
///
/// Each entry records which buildpacks provide a dependency and what the requiring buildpacks
/// asked for.
///
/// # Example:
/// ```
/// use lifecycle_data::build_plan::BuildPlan;
///
/// let toml_str = r#"
/// [[entries]]
///
/// [[entries.providers]]
/// id = "heroku/jvm"
/// version = "1.0.0"
///
/// [[entries.requires]]
/// name = "jdk"
///
/// [entries.requires.metadata]
/// version = "17"
/// "#;
///
/// let plan = toml::from_str::<BuildPlan>(toml_str).unwrap();
/// let buildpack_plan = plan.for_buildpack(&"heroku/jvm".parse().unwrap());
/// assert_eq!(buildpack_plan.entries[0].name, "jdk");
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct BuildPlan {
    #[serde(default)]
    pub entries: Vec<BuildPlanEntry>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct BuildPlanEntry {
    #[serde(default)]
    pub providers: Vec<BuildpackRef>,
    #[serde(default)]
    pub requires: Vec<Require>,
}

impl BuildPlanEntry {
    fn is_provided_by(&self, buildpack_id: &BuildpackId) -> bool {
        self.providers
            .iter()
            .any(|provider| &provider.id == buildpack_id)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Require {
    pub name: String,
    /// Older platforms record a requested version outside of the metadata table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Table::is_empty")]
    pub metadata: Table,
}

impl Require {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            metadata: Table::new(),
        }
    }

    fn to_buildpack_plan_entry(&self) -> Entry {
        let mut metadata = self.metadata.clone();

        if let Some(version) = &self.version {
            metadata
                .entry("version")
                .or_insert_with(|| toml::Value::String(version.clone()));
        }

        Entry {
            name: self.name.clone(),
            metadata,
        }
    }
}

impl BuildPlan {
    /// The plan a single buildpack gets to see: all requirements of entries it provides for.
    pub fn for_buildpack(&self, buildpack_id: &BuildpackId) -> BuildpackPlan {
        BuildpackPlan {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.is_provided_by(buildpack_id))
                .flat_map(|entry| entry.requires.iter().map(Require::to_buildpack_plan_entry))
                .collect(),
        }
    }

    /// Removes the entries the given buildpack has met.
    ///
    /// An entry provided by the buildpack counts as met unless one of its requirements is named
    /// in `unmet`. Entries that are not met stay in the plan so a later provider can pick them up.
    #[must_use]
    pub fn without_met_entries(&self, buildpack_id: &BuildpackId, unmet: &[String]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| {
                    !entry.is_provided_by(buildpack_id)
                        || entry
                            .requires
                            .iter()
                            .any(|require| unmet.contains(&require.name))
                })
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str) -> BuildpackRef {
        BuildpackRef {
            id: id.parse().unwrap(),
            version: String::from("1"),
        }
    }

    fn sample_plan() -> BuildPlan {
        BuildPlan {
            entries: vec![
                BuildPlanEntry {
                    providers: vec![provider("a/a")],
                    requires: vec![Require::new("node"), Require::new("npm")],
                },
                BuildPlanEntry {
                    providers: vec![provider("a/a"), provider("b/b")],
                    requires: vec![Require::new("yarn")],
                },
                BuildPlanEntry {
                    providers: vec![provider("b/b")],
                    requires: vec![Require::new("python")],
                },
            ],
        }
    }

    #[test]
    fn it_parses_empty() {
        let plan = toml::from_str::<BuildPlan>("").unwrap();
        assert!(plan.entries.is_empty());
    }

    #[test]
    fn it_parses_with_metadata() {
        let toml_str = r#"
[[entries]]

  [[entries.providers]]
  id = "a/a"
  version = "1"

  [[entries.requires]]
  name = "rust"
  version = "1.76"

    [entries.requires.metadata]
    profile = "minimal"
"#;

        let plan = toml::from_str::<BuildPlan>(toml_str).unwrap();
        let require = &plan.entries[0].requires[0];
        assert_eq!(require.name, "rust");
        assert_eq!(require.version, Some(String::from("1.76")));
        assert_eq!(
            require.metadata.get("profile"),
            Some(&toml::Value::String(String::from("minimal")))
        );
    }

    #[test]
    fn for_buildpack_selects_provided_entries_in_order() {
        let buildpack_plan = sample_plan().for_buildpack(&"a/a".parse().unwrap());

        assert_eq!(
            buildpack_plan
                .entries
                .iter()
                .map(|entry| entry.name.as_str())
                .collect::<Vec<_>>(),
            vec!["node", "npm", "yarn"]
        );
    }

    #[test]
    fn for_buildpack_moves_version_into_metadata() {
        let mut require = Require::new("ruby");
        require.version = Some(String::from("3.3"));

        let plan = BuildPlan {
            entries: vec![BuildPlanEntry {
                providers: vec![provider("a/a")],
                requires: vec![require],
            }],
        };

        let buildpack_plan = plan.for_buildpack(&"a/a".parse().unwrap());
        assert_eq!(
            buildpack_plan.entries[0].metadata.get("version"),
            Some(&toml::Value::String(String::from("3.3")))
        );
    }

    #[test]
    fn for_unknown_buildpack_is_empty() {
        assert!(sample_plan()
            .for_buildpack(&"c/c".parse().unwrap())
            .entries
            .is_empty());
    }

    #[test]
    fn without_met_entries_keeps_unmet_entries() {
        let remaining =
            sample_plan().without_met_entries(&"a/a".parse().unwrap(), &[String::from("yarn")]);

        assert_eq!(remaining.entries.len(), 2);
        assert_eq!(remaining.entries[0].requires[0].name, "yarn");
        assert_eq!(remaining.entries[1].requires[0].name, "python");

        let for_b = remaining.for_buildpack(&"b/b".parse().unwrap());
        assert_eq!(for_b.entries.len(), 2);
    }

    #[test]
    fn without_met_entries_removes_everything_met() {
        let remaining = sample_plan().without_met_entries(&"b/b".parse().unwrap(), &[]);

        assert_eq!(remaining.entries.len(), 1);
        assert_eq!(remaining.entries[0].requires[0].name, "node");
    }
}
