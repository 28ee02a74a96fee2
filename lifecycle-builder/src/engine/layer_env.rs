//! Build environment contributed by layers.

use crate::Env;
use crate::env::PATH_LIST_SEPARATOR;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// The environment a build layer contributes to the buildpacks that run after it.
///
/// Consists of the standard layer paths (`bin`, `lib`, `include`, `pkgconfig`) and the
/// modifications in the layer's `env` and `env.build` directories. Launch-only modifications in
/// `env.launch` do not affect the build and are not read.
#[derive(Eq, PartialEq, Debug, Default, Clone)]
pub(crate) struct BuildLayerEnv {
    layer_paths: LayerEnvDelta,
    all: LayerEnvDelta,
    build: LayerEnvDelta,
}

impl BuildLayerEnv {
    pub(crate) fn read_from_layer_dir(layer_dir: &Path) -> io::Result<Self> {
        let mut result = Self::default();

        let layer_path_specs = [
            ("PATH", "bin"),
            ("LIBRARY_PATH", "lib"),
            ("LD_LIBRARY_PATH", "lib"),
            ("CPATH", "include"),
            ("PKG_CONFIG_PATH", "pkgconfig"),
        ];

        for (name, dir_name) in layer_path_specs {
            let path = layer_dir.join(dir_name);

            if path.is_dir() {
                result
                    .layer_paths
                    .insert(ModificationBehavior::Prepend, name, path);
                result.layer_paths.insert(
                    ModificationBehavior::Delimiter,
                    name,
                    PATH_LIST_SEPARATOR,
                );
            }
        }

        let env_path = layer_dir.join("env");
        if env_path.is_dir() {
            result.all = LayerEnvDelta::read_from_env_dir(&env_path)?;
        }

        let env_build_path = layer_dir.join("env.build");
        if env_build_path.is_dir() {
            result.build = LayerEnvDelta::read_from_env_dir(&env_build_path)?;
        }

        Ok(result)
    }

    /// Applies this layer's modifications to the given environment.
    pub(crate) fn apply(&self, env: &Env) -> Env {
        [&self.all, &self.build, &self.layer_paths]
            .iter()
            .fold(env.clone(), |env, delta| delta.apply(&env))
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
enum ModificationBehavior {
    Append,
    Default,
    Delimiter,
    Override,
    Prepend,
}

impl Ord for ModificationBehavior {
    fn cmp(&self, other: &Self) -> Ordering {
        fn index(value: &ModificationBehavior) -> i32 {
            match value {
                ModificationBehavior::Append => 0,
                ModificationBehavior::Default => 1,
                ModificationBehavior::Delimiter => 2,
                ModificationBehavior::Override => 3,
                ModificationBehavior::Prepend => 4,
            }
        }

        index(self).cmp(&index(other))
    }
}

impl PartialOrd for ModificationBehavior {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Eq, PartialEq, Debug, Default, Clone)]
struct LayerEnvDelta {
    entries: BTreeMap<(ModificationBehavior, OsString), OsString>,
}

impl LayerEnvDelta {
    fn apply(&self, env: &Env) -> Env {
        let mut result_env = env.clone();

        for ((modification_behavior, name), value) in &self.entries {
            match modification_behavior {
                ModificationBehavior::Override => {
                    result_env.insert(name.clone(), value.clone());
                }
                ModificationBehavior::Default => {
                    if !result_env.contains_key(name) {
                        result_env.insert(name.clone(), value.clone());
                    }
                }
                ModificationBehavior::Append => {
                    let mut new_value = result_env.get(name).cloned().unwrap_or_default();

                    if !new_value.is_empty() {
                        new_value.push(self.delimiter_for(name));
                    }
                    new_value.push(value);

                    result_env.insert(name.clone(), new_value);
                }
                ModificationBehavior::Prepend => {
                    let mut new_value = value.clone();

                    if let Some(previous_value) =
                        result_env.get(name).filter(|value| !value.is_empty())
                    {
                        new_value.push(self.delimiter_for(name));
                        new_value.push(previous_value);
                    }

                    result_env.insert(name.clone(), new_value);
                }
                ModificationBehavior::Delimiter => (),
            }
        }

        result_env
    }

    fn delimiter_for(&self, name: &OsString) -> OsString {
        self.entries
            .get(&(ModificationBehavior::Delimiter, name.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn read_from_env_dir(path: &Path) -> io::Result<Self> {
        let mut delta = Self::default();

        for dir_entry in fs::read_dir(path)? {
            let path = dir_entry?.path();

            if !path.is_file() {
                continue;
            }

            // File contents are used verbatim, without assuming any encoding.
            #[cfg(target_family = "unix")]
            let file_contents = {
                use std::os::unix::ffi::OsStringExt;
                OsString::from_vec(fs::read(&path)?)
            };
            #[cfg(not(target_family = "unix"))]
            let file_contents = OsString::from(fs::read_to_string(&path)?);

            let Some(file_name_stem) = path.file_stem() else {
                continue;
            };

            let modification_behavior = match path.extension().map(|extension| extension.to_str())
            {
                None => Some(ModificationBehavior::Override),
                Some(Some("append")) => Some(ModificationBehavior::Append),
                Some(Some("default")) => Some(ModificationBehavior::Default),
                Some(Some("delim")) => Some(ModificationBehavior::Delimiter),
                Some(Some("override")) => Some(ModificationBehavior::Override),
                Some(Some("prepend")) => Some(ModificationBehavior::Prepend),
                // Unknown or non-UTF-8 extension
                Some(_) => None,
            };

            if let Some(modification_behavior) = modification_behavior {
                delta.insert(modification_behavior, file_name_stem, file_contents);
            }
        }

        Ok(delta)
    }

    fn insert(
        &mut self,
        modification_behavior: ModificationBehavior,
        name: impl Into<OsString>,
        value: impl Into<OsString>,
    ) {
        self.entries
            .insert((modification_behavior, name.into()), value.into());
    }
}
