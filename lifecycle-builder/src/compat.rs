//! Platform API and Buildpack API compatibility checks.

use lifecycle_data::buildpack::{ApiVersion, ApiVersionError};
use lifecycle_data::group::{BuildpackGroup, GroupBuildpack};

/// Platform APIs this builder implements.
pub const SUPPORTED_PLATFORM_APIS: &[ApiVersion] = &[
    ApiVersion::new(0, 3),
    ApiVersion::new(0, 4),
    ApiVersion::new(0, 5),
    ApiVersion::new(0, 6),
    ApiVersion::new(0, 7),
];

/// Buildpack APIs this builder implements.
pub const SUPPORTED_BUILDPACK_APIS: &[ApiVersion] = &[
    ApiVersion::new(0, 2),
    ApiVersion::new(0, 3),
    ApiVersion::new(0, 4),
    ApiVersion::new(0, 5),
    ApiVersion::new(0, 6),
    ApiVersion::new(0, 7),
    ApiVersion::new(0, 8),
    ApiVersion::new(0, 9),
    ApiVersion::new(0, 10),
];

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum CompatibilityError {
    #[error("Invalid platform API: {0}")]
    InvalidPlatformApi(#[source] ApiVersionError),

    #[error(
        "Platform API {platform_api} is not supported, supported platform APIs: {}",
        join_versions(supported)
    )]
    UnsupportedPlatformApi {
        platform_api: ApiVersion,
        supported: Vec<ApiVersion>,
    },

    #[error(
        "Buildpack API not supported for {}, supported buildpack APIs: {}",
        describe_buildpacks(incompatible),
        join_versions(supported)
    )]
    UnsupportedBuildpackApis {
        incompatible: Vec<GroupBuildpack>,
        supported: Vec<ApiVersion>,
    },
}

/// The set of API versions a builder supports.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ApiCompatibility {
    platform_apis: Vec<ApiVersion>,
    buildpack_apis: Vec<ApiVersion>,
}

impl Default for ApiCompatibility {
    fn default() -> Self {
        Self::new(SUPPORTED_PLATFORM_APIS, SUPPORTED_BUILDPACK_APIS)
    }
}

impl ApiCompatibility {
    #[must_use]
    pub fn new(platform_apis: &[ApiVersion], buildpack_apis: &[ApiVersion]) -> Self {
        Self {
            platform_apis: platform_apis.to_vec(),
            buildpack_apis: buildpack_apis.to_vec(),
        }
    }

    /// Parses the given platform API and checks that it is supported.
    pub fn verify_platform_api(&self, platform_api: &str) -> Result<ApiVersion, CompatibilityError> {
        let platform_api = platform_api
            .parse::<ApiVersion>()
            .map_err(CompatibilityError::InvalidPlatformApi)?;

        if self.platform_apis.contains(&platform_api) {
            Ok(platform_api)
        } else {
            Err(CompatibilityError::UnsupportedPlatformApi {
                platform_api,
                supported: self.platform_apis.clone(),
            })
        }
    }

    /// Checks the declared API of every buildpack in the group.
    ///
    /// All entries are checked, the error lists every incompatible buildpack. A single
    /// incompatible buildpack fails the whole group.
    pub fn verify_buildpack_apis(&self, group: &BuildpackGroup) -> Result<(), CompatibilityError> {
        let incompatible = group
            .iter()
            .filter(|buildpack| !self.buildpack_apis.contains(&buildpack.api))
            .cloned()
            .collect::<Vec<_>>();

        if incompatible.is_empty() {
            Ok(())
        } else {
            Err(CompatibilityError::UnsupportedBuildpackApis {
                incompatible,
                supported: self.buildpack_apis.clone(),
            })
        }
    }
}

fn join_versions(versions: &[ApiVersion]) -> String {
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_buildpacks(buildpacks: &[GroupBuildpack]) -> String {
    buildpacks
        .iter()
        .map(|buildpack| {
            format!(
                "{}@{} (buildpack API {})",
                buildpack.id, buildpack.version, buildpack.api
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
