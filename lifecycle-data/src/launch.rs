use crate::bom::BomEntry;
use crate::newtypes::lifecycle_newtype;
use serde::{Deserialize, Serialize};

/// Data Structure for the `launch.toml` file a buildpack writes to its layers directory.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Launch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bom: Vec<BomEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<Process>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<Slice>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct Label {
    pub key: String,
    pub value: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct Process {
    pub r#type: ProcessType,
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub direct: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

impl Process {
    pub fn new(r#type: ProcessType, command: impl Into<String>) -> Self {
        Self {
            r#type,
            command: command.into(),
            args: Vec::new(),
            direct: false,
            default: false,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct Slice {
    /// Path globs for this slice.
    ///
    /// These globs need to follow the pattern syntax defined in the [Go standard library](https://golang.org/pkg/path/filepath/#Match)
    /// and only match files/directories inside the application directory.
    #[serde(rename = "paths")]
    pub path_globs: Vec<String>,
}

lifecycle_newtype!(
    /// The type of a process.
    ///
    /// It MUST only contain numbers, letters, and the characters `.`, `_`, and `-`.
    ///
    /// # Examples
    /// ```
    /// use lifecycle_data::launch::ProcessType;
    ///
    /// let valid: Result<ProcessType, _> = "web".parse();
    /// assert!(valid.is_ok());
    ///
    /// let invalid: Result<ProcessType, _> = "!nv4lid".parse();
    /// assert!(invalid.is_err());
    /// ```
    ProcessType,
    ProcessTypeError,
    r"^[[:alnum:]._-]+$"
);
