use crate::bom::BomEntry;
use serde::{Deserialize, Serialize};

/// Data Structure for the `build.toml` file a buildpack writes to its layers directory.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Build {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bom: Vec<BomEntry>,
    /// Plan entries the buildpack did not satisfy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet: Vec<Unmet>,
}

impl Build {
    /// Names of all unmet plan entries.
    pub fn unmet_names(&self) -> Vec<String> {
        self.unmet.iter().map(|unmet| unmet.name.clone()).collect()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct Unmet {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_toml_with_unmet_entries() {
        let toml_str = r#"
[[unmet]]
name = "yarn"

[[unmet]]
name = "npm"
"#;

        let build = toml::from_str::<Build>(toml_str).unwrap();
        assert_eq!(build.unmet_names(), vec!["yarn", "npm"]);
        assert!(build.bom.is_empty());
    }
}
