use crate::bom::BomEntry;
use crate::buildpack::BuildpackId;
use crate::group::GroupBuildpack;
use crate::launch::{Label, Process, ProcessType, Slice};
use crate::layer::{LayerName, LayerTypes};
use serde::{Deserialize, Serialize};

/// The result of a successful build, persisted as `<layers>/config/metadata.toml` for the
/// export stage.
///
/// Everything buildpacks contributed is recorded in group order and attributed to the
/// contributing buildpack.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct BuildMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bom: Vec<BomEntry>,
    #[serde(default)]
    pub buildpacks: Vec<GroupBuildpack>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<ProcessMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<Slice>,
}

impl BuildMetadata {
    /// Looks up the process of the given type.
    pub fn process(&self, process_type: &ProcessType) -> Option<&ProcessMetadata> {
        self.processes
            .iter()
            .find(|process| &process.r#type == process_type)
    }
}

/// A process type definition together with the buildpack that contributed it.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct ProcessMetadata {
    pub r#type: ProcessType,
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub direct: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
    #[serde(rename = "buildpack-id")]
    pub buildpack_id: BuildpackId,
}

impl ProcessMetadata {
    pub fn from_process(process: Process, buildpack_id: BuildpackId) -> Self {
        Self {
            r#type: process.r#type,
            command: process.command,
            args: process.args,
            direct: process.direct,
            default: process.default,
            buildpack_id,
        }
    }
}

/// A layer a buildpack created, and what it is available for.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct LayerMetadata {
    #[serde(rename = "buildpack-id")]
    pub buildpack_id: BuildpackId,
    pub name: LayerName,
    #[serde(default)]
    pub types: LayerTypes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::BuildpackRef;
    use crate::buildpack::ApiVersion;
    use toml::value::Table;

    fn sample_metadata() -> BuildMetadata {
        let buildpack_id: BuildpackId = "buildpack/a".parse().unwrap();

        let mut bom_metadata = Table::new();
        bom_metadata.insert(String::from("version"), toml::Value::from("20.11.0"));

        let mut web = Process::new("web".parse().unwrap(), "node");
        web.args = vec![String::from("server.js")];
        web.default = true;

        BuildMetadata {
            bom: vec![BomEntry {
                name: String::from("node"),
                metadata: bom_metadata,
                buildpack: Some(BuildpackRef {
                    id: buildpack_id.clone(),
                    version: String::from("1"),
                }),
            }],
            buildpacks: vec![GroupBuildpack::new(
                buildpack_id.clone(),
                "1",
                ApiVersion::new(0, 9),
            )],
            labels: vec![Label {
                key: String::from("org.example.built-by"),
                value: String::from("buildpack/a"),
            }],
            layers: vec![LayerMetadata {
                buildpack_id: buildpack_id.clone(),
                name: "node".parse().unwrap(),
                types: LayerTypes {
                    launch: true,
                    build: true,
                    cache: false,
                },
            }],
            processes: vec![ProcessMetadata::from_process(web, buildpack_id)],
            slices: vec![Slice {
                path_globs: vec![String::from("static/**")],
            }],
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let metadata = sample_metadata();

        let serialized = toml::to_string(&metadata).unwrap();
        assert_eq!(
            toml::from_str::<BuildMetadata>(&serialized).unwrap(),
            metadata
        );
    }

    #[test]
    fn processes_are_attributed() {
        let serialized = toml::to_string(&sample_metadata()).unwrap();
        let value = toml::from_str::<toml::Table>(&serialized).unwrap();

        assert_eq!(
            value["processes"][0]["buildpack-id"].as_str(),
            Some("buildpack/a")
        );
        assert_eq!(value["bom"][0]["buildpack"]["id"].as_str(), Some("buildpack/a"));
    }

    #[test]
    fn empty_metadata_still_lists_buildpacks() {
        let serialized = toml::to_string(&BuildMetadata::default()).unwrap();
        assert_eq!(serialized.trim(), "buildpacks = []");
    }

    #[test]
    fn process_lookup_by_type() {
        let metadata = sample_metadata();

        assert_eq!(
            metadata
                .process(&"web".parse().unwrap())
                .map(|process| process.command.as_str()),
            Some("node")
        );
        assert!(metadata.process(&"worker".parse().unwrap()).is_none());
    }
}
