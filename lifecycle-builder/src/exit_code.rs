//! Exit codes of the build stage, as defined by the CNB platform specification.

pub const SUCCESS: i32 = 0;
pub const UNSPECIFIED_ERROR: i32 = 1;
pub const INVALID_ARGS: i32 = 3;
pub const INCOMPATIBLE_PLATFORM_API: i32 = 11;
pub const INCOMPATIBLE_BUILDPACK_API: i32 = 12;

pub const BUILD_FAILED_WITH_BUILDPACK_ERRORS: i32 = 51;
pub const BUILD_INFRASTRUCTURE_ERROR: i32 = 52;
