//! Loading of the build stage's configuration files.

use crate::Env;
use lifecycle_common::toml_file::{TomlFileError, read_toml_file};
use lifecycle_data::build_plan::BuildPlan;
use lifecycle_data::buildpack::ApiVersion;
use lifecycle_data::group::BuildpackGroup;
use std::path::{Path, PathBuf};

/// The resolved configuration of a single build invocation.
///
/// All paths are final, placeholders have already been resolved. The environment is the
/// snapshot taken once when the invocation started.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BuildConfig {
    pub buildpacks_dir: PathBuf,
    pub group_path: PathBuf,
    pub plan_path: PathBuf,
    pub layers_dir: PathBuf,
    pub app_dir: PathBuf,
    pub platform_dir: PathBuf,
    pub platform_api: ApiVersion,
    pub env: Env,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read buildpack group: {0}")]
    ReadGroup(#[source] TomlFileError),

    #[error("Couldn't read build plan: {0}")]
    ReadPlan(#[source] TomlFileError),
}

/// Decodes the buildpack group and build plan.
pub trait ConfigLoader {
    fn load_group(&self, path: &Path) -> Result<BuildpackGroup, ConfigError>;

    fn load_plan(&self, path: &Path) -> Result<BuildPlan, ConfigError>;
}

/// Reads `group.toml` and `plan.toml` from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlConfigLoader;

impl ConfigLoader for TomlConfigLoader {
    fn load_group(&self, path: &Path) -> Result<BuildpackGroup, ConfigError> {
        read_toml_file(path).map_err(ConfigError::ReadGroup)
    }

    fn load_plan(&self, path: &Path) -> Result<BuildPlan, ConfigError> {
        read_toml_file(path).map_err(ConfigError::ReadPlan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_group_in_order() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("group.toml");
        fs::write(
            &path,
            indoc! {r#"
                [[group]]
                id = "buildpack/b"
                version = "2"
                api = "0.10"

                [[group]]
                id = "buildpack/a"
                version = "1"
                api = "0.9"
                optional = true
            "#},
        )
        .unwrap();

        let group = TomlConfigLoader.load_group(&path).unwrap();

        assert_eq!(
            group
                .iter()
                .map(|buildpack| buildpack.id.as_str())
                .collect::<Vec<_>>(),
            vec!["buildpack/b", "buildpack/a"]
        );
        assert!(group.group[1].optional);
    }

    #[test]
    fn empty_plan_file_is_empty_plan() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("plan.toml");
        fs::write(&path, "").unwrap();

        assert_eq!(
            TomlConfigLoader.load_plan(&path).unwrap(),
            BuildPlan::default()
        );
    }

    #[test]
    fn missing_group_file() {
        let temp_dir = tempdir().unwrap();

        let error = TomlConfigLoader
            .load_group(&temp_dir.path().join("group.toml"))
            .unwrap_err();

        assert!(matches!(&error, ConfigError::ReadGroup(cause) if cause.is_not_found()));
    }

    #[test]
    fn malformed_plan_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("plan.toml");
        fs::write(&path, "[[entries]\n").unwrap();

        assert!(matches!(
            TomlConfigLoader.load_plan(&path),
            Err(ConfigError::ReadPlan(
                TomlFileError::TomlDeserializationError(..)
            ))
        ));
    }
}
