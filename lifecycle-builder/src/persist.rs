use lifecycle_common::toml_file::{TomlFileError, write_toml_file};
use lifecycle_data::metadata::BuildMetadata;
use std::path::{Path, PathBuf};

/// Location of the build metadata for the export stage: `<layers>/config/metadata.toml`.
pub fn metadata_path(layers_dir: &Path) -> PathBuf {
    layers_dir.join("config").join("metadata.toml")
}

/// Writes the build metadata to [`metadata_path`], creating the `config` directory if needed.
pub fn persist_metadata(metadata: &BuildMetadata, layers_dir: &Path) -> Result<PathBuf, TomlFileError> {
    let path = metadata_path(layers_dir);
    write_toml_file(metadata, &path).map(|()| path)
}
