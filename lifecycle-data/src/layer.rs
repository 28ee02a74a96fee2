use crate::newtypes::lifecycle_newtype;
use serde::{Deserialize, Serialize};
use toml::value::Table;

lifecycle_newtype!(
    /// The name of a layer.
    ///
    /// It can contain all characters supported by the filesystem, but MUST NOT be either `build`,
    /// `launch` or `store`.
    ///
    /// # Examples
    /// ```
    /// use lifecycle_data::layer::LayerName;
    ///
    /// let valid: Result<LayerName, _> = "gems".parse();
    /// assert!(valid.is_ok());
    ///
    /// let invalid: Result<LayerName, _> = "build".parse();
    /// assert!(invalid.is_err());
    /// ```
    LayerName,
    LayerNameError,
    r"^(?!(build|launch|store)$).+$"
);

/// Used to specify layer availability based on buildpack phase.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
pub struct LayerTypes {
    /// Whether the layer is intended for launch.
    #[serde(default)]
    pub launch: bool,

    /// Whether the layer is intended for build.
    #[serde(default)]
    pub build: bool,

    /// Whether the layer is cached.
    #[serde(default)]
    pub cache: bool,
}

/// Layer content metadata (`<layer>.toml`).
///
/// Buildpack API 0.6 moved the layer type flags into a `[types]` table; older buildpacks set
/// them at the top level. Both forms are accepted, see [`LayerContentMetadata::layer_types`].
///
/// ```
/// use lifecycle_data::layer::LayerContentMetadata;
///
/// let current = toml::from_str::<LayerContentMetadata>("[types]\nbuild = true").unwrap();
/// let legacy = toml::from_str::<LayerContentMetadata>("build = true").unwrap();
///
/// assert!(current.layer_types().build);
/// assert_eq!(current.layer_types(), legacy.layer_types());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayerContentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<LayerTypes>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub launch: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub build: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cache: bool,

    /// Metadata that describes the layer contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Table>,
}

impl LayerContentMetadata {
    /// The effective layer types, preferring the `[types]` table over the top level flags.
    pub fn layer_types(&self) -> LayerTypes {
        self.types.unwrap_or(LayerTypes {
            launch: self.launch,
            build: self.build,
            cache: self.cache,
        })
    }
}
