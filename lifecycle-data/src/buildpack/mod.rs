mod api;
mod id;

pub use api::*;
pub use id::*;
use serde::Deserialize;

/// Data structure for the buildpack descriptor (`buildpack.toml`).
///
/// Only the parts the build stage needs are modelled, unknown keys (stacks, targets, order,
/// metadata, ...) are ignored.
///
/// # Example:
/// ```
/// use lifecycle_data::buildpack::{ApiVersion, BuildpackDescriptor};
///
/// let toml_str = r#"
/// api = "0.9"
///
/// [buildpack]
/// id = "foo/bar"
/// name = "Bar Buildpack"
/// version = "0.0.1"
/// clear-env = true
///
/// [[stacks]]
/// id = "*"
/// "#;
///
/// let descriptor = toml::from_str::<BuildpackDescriptor>(toml_str).unwrap();
/// assert_eq!(descriptor.api, ApiVersion::new(0, 9));
/// assert!(descriptor.buildpack.clear_env);
/// ```
#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct BuildpackDescriptor {
    pub api: ApiVersion,
    pub buildpack: Buildpack,
}

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Buildpack {
    pub id: BuildpackId,
    pub name: Option<String>,
    pub version: String,
    pub homepage: Option<String>,
    #[serde(default, rename = "clear-env")]
    pub clear_env: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_descriptor() {
        let toml_str = r#"
api = "0.2"

[buildpack]
id = "foo/bar"
version = "1"
        "#;

        let descriptor = toml::from_str::<BuildpackDescriptor>(toml_str).unwrap();

        assert_eq!(descriptor.api, ApiVersion::new(0, 2));
        assert_eq!(descriptor.buildpack.id, "foo/bar".parse().unwrap());
        assert_eq!(descriptor.buildpack.version, "1");
        assert_eq!(descriptor.buildpack.name, None);
        assert_eq!(descriptor.buildpack.homepage, None);
        assert!(!descriptor.buildpack.clear_env);
    }

    #[test]
    fn reject_invalid_buildpack_id() {
        let toml_str = r#"
api = "0.9"

[buildpack]
id = "app"
version = "1"
        "#;

        assert!(toml::from_str::<BuildpackDescriptor>(toml_str).is_err());
    }
}
