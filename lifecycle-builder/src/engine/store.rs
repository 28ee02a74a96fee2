use lifecycle_common::toml_file::{TomlFileError, read_toml_file};
use lifecycle_data::buildpack::{BuildpackDescriptor, BuildpackId};
use std::path::PathBuf;

/// Looks up buildpacks in a directory laid out as `<dir>/<escaped id>/<version>/`.
#[derive(Debug, Clone)]
pub struct DirBuildpackStore {
    dir: PathBuf,
}

/// A buildpack found in a [`DirBuildpackStore`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StoredBuildpack {
    pub dir: PathBuf,
    pub descriptor: BuildpackDescriptor,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Couldn't read buildpack descriptor: {0}")]
    ReadDescriptor(#[source] TomlFileError),

    #[error("Buildpack descriptor in {0} declares id {1}@{2}")]
    DescriptorMismatch(PathBuf, BuildpackId, String),
}

impl DirBuildpackStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads the descriptor of the given buildpack version.
    pub fn lookup(
        &self,
        buildpack_id: &BuildpackId,
        version: &str,
    ) -> Result<StoredBuildpack, StoreError> {
        let dir = self.dir.join(buildpack_id.escaped()).join(version);

        let descriptor = read_toml_file::<BuildpackDescriptor>(dir.join("buildpack.toml"))
            .map_err(StoreError::ReadDescriptor)?;

        if &descriptor.buildpack.id != buildpack_id || descriptor.buildpack.version != version {
            return Err(StoreError::DescriptorMismatch(
                dir,
                descriptor.buildpack.id,
                descriptor.buildpack.version,
            ));
        }

        Ok(StoredBuildpack { dir, descriptor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use lifecycle_data::buildpack::ApiVersion;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_descriptor(buildpacks_dir: &Path, path: &str, contents: &str) {
        let dir = buildpacks_dir.join(path);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("buildpack.toml"), contents).unwrap();
    }

    #[test]
    fn lookup_uses_escaped_id_and_version() {
        let temp_dir = tempdir().unwrap();
        write_descriptor(
            temp_dir.path(),
            "heroku_nodejs/1.2.3",
            indoc! {r#"
                api = "0.10"

                [buildpack]
                id = "heroku/nodejs"
                version = "1.2.3"
            "#},
        );

        let store = DirBuildpackStore::new(temp_dir.path());
        let stored = store
            .lookup(&"heroku/nodejs".parse().unwrap(), "1.2.3")
            .unwrap();

        assert_eq!(stored.dir, temp_dir.path().join("heroku_nodejs/1.2.3"));
        assert_eq!(stored.descriptor.api, ApiVersion::new(0, 10));
    }

    #[test]
    fn lookup_of_missing_buildpack() {
        let temp_dir = tempdir().unwrap();
        let store = DirBuildpackStore::new(temp_dir.path());

        let error = store
            .lookup(&"heroku/nodejs".parse().unwrap(), "1.2.3")
            .unwrap_err();

        assert!(matches!(error, StoreError::ReadDescriptor(cause) if cause.is_not_found()));
    }

    #[test]
    fn lookup_with_mismatching_descriptor() {
        let temp_dir = tempdir().unwrap();
        write_descriptor(
            temp_dir.path(),
            "heroku_nodejs/1.2.3",
            indoc! {r#"
                api = "0.10"

                [buildpack]
                id = "heroku/nodejs"
                version = "2.0.0"
            "#},
        );

        let store = DirBuildpackStore::new(temp_dir.path());

        assert!(matches!(
            store.lookup(&"heroku/nodejs".parse().unwrap(), "1.2.3"),
            Err(StoreError::DescriptorMismatch(..))
        ));
    }
}
