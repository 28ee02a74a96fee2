//! Default locations of the build stage's inputs.

use lifecycle_data::buildpack::ApiVersion;
use std::path::{Path, PathBuf};

pub const DEFAULT_BUILDPACKS_DIR: &str = "/cnb/buildpacks";
pub const DEFAULT_LAYERS_DIR: &str = "/layers";
pub const DEFAULT_APP_DIR: &str = "/workspace";
pub const DEFAULT_PLATFORM_DIR: &str = "/platform";
pub const DEFAULT_PLATFORM_API: &str = "0.3";

/// Stands in for the group path when none was given, see [`resolve_group_path`].
pub const PLACEHOLDER_GROUP_PATH: &str = "<layers>/group.toml";
/// Stands in for the plan path when none was given, see [`resolve_plan_path`].
pub const PLACEHOLDER_PLAN_PATH: &str = "<layers>/plan.toml";

const GROUP_FILE_NAME: &str = "group.toml";
const PLAN_FILE_NAME: &str = "plan.toml";

/// The first platform API that keeps the group and plan files in the layers directory.
const LAYERS_DIR_DEFAULTS_PLATFORM_API: ApiVersion = ApiVersion::new(0, 5);

/// Returns `group_path` unless it is the placeholder, in which case the default group path
/// for the given platform API and layers directory is returned.
pub fn resolve_group_path(
    group_path: &Path,
    platform_api: ApiVersion,
    layers_dir: &Path,
) -> PathBuf {
    if group_path == Path::new(PLACEHOLDER_GROUP_PATH) {
        default_group_path(platform_api, layers_dir)
    } else {
        group_path.to_path_buf()
    }
}

/// Returns `plan_path` unless it is the placeholder, in which case the default plan path
/// for the given platform API and layers directory is returned.
pub fn resolve_plan_path(plan_path: &Path, platform_api: ApiVersion, layers_dir: &Path) -> PathBuf {
    if plan_path == Path::new(PLACEHOLDER_PLAN_PATH) {
        default_plan_path(platform_api, layers_dir)
    } else {
        plan_path.to_path_buf()
    }
}

pub fn default_group_path(platform_api: ApiVersion, layers_dir: &Path) -> PathBuf {
    default_path(GROUP_FILE_NAME, platform_api, layers_dir)
}

pub fn default_plan_path(platform_api: ApiVersion, layers_dir: &Path) -> PathBuf {
    default_path(PLAN_FILE_NAME, platform_api, layers_dir)
}

fn default_path(file_name: &str, platform_api: ApiVersion, layers_dir: &Path) -> PathBuf {
    // Older platforms kept these files in the working directory.
    if platform_api < LAYERS_DIR_DEFAULTS_PLATFORM_API || layers_dir.as_os_str().is_empty() {
        Path::new(".").join(file_name)
    } else {
        layers_dir.join(file_name)
    }
}
