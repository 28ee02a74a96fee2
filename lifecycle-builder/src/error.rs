use crate::compat::CompatibilityError;
use crate::config::ConfigError;
use crate::engine::{ErrorKind, ExecutionError};
use crate::exit_code;
use crate::privilege::PrivilegeError;
use lifecycle_common::toml_file::TomlFileError;
use std::path::PathBuf;

/// An error that aborted a build invocation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unexpected positional arguments: {}", .0.join(" "))]
    UnexpectedArguments(Vec<String>),

    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Privilege(#[from] PrivilegeError),

    #[error("Couldn't resolve buildpacks directory {0}: {1}")]
    ResolveBuildpacksDir(PathBuf, #[source] std::io::Error),

    #[error("Build failed: {0}")]
    Build(#[source] ExecutionError),

    #[error("Couldn't write build metadata: {0}")]
    WriteMetadata(#[source] TomlFileError),
}

/// The operator-facing outcome of a build invocation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExitClassification {
    Success,
    InvalidArguments,
    BuildpackExecutionFailure,
    InfrastructureFailure,
}

impl Error {
    #[must_use]
    pub fn classify(&self) -> ExitClassification {
        match self {
            Self::UnexpectedArguments(_) => ExitClassification::InvalidArguments,
            Self::Build(execution_error) if execution_error.kind() == ErrorKind::Buildpack => {
                ExitClassification::BuildpackExecutionFailure
            }
            Self::Compatibility(_)
            | Self::Config(_)
            | Self::Privilege(_)
            | Self::ResolveBuildpacksDir(..)
            | Self::Build(_)
            | Self::WriteMetadata(_) => ExitClassification::InfrastructureFailure,
        }
    }

    /// The process exit code for this error.
    ///
    /// Infrastructure failures are refined further where the platform defines a dedicated code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnexpectedArguments(_) => exit_code::INVALID_ARGS,
            Self::Compatibility(
                CompatibilityError::InvalidPlatformApi(_)
                | CompatibilityError::UnsupportedPlatformApi { .. },
            ) => exit_code::INCOMPATIBLE_PLATFORM_API,
            Self::Compatibility(CompatibilityError::UnsupportedBuildpackApis { .. }) => {
                exit_code::INCOMPATIBLE_BUILDPACK_API
            }
            Self::Build(execution_error) => match execution_error.kind() {
                ErrorKind::Buildpack => exit_code::BUILD_FAILED_WITH_BUILDPACK_ERRORS,
                ErrorKind::Infrastructure => exit_code::BUILD_INFRASTRUCTURE_ERROR,
            },
            Self::ResolveBuildpacksDir(..) => exit_code::BUILD_INFRASTRUCTURE_ERROR,
            Self::Config(_) | Self::Privilege(_) | Self::WriteMetadata(_) => {
                exit_code::UNSPECIFIED_ERROR
            }
        }
    }
}

impl ExitClassification {
    /// The generic exit code for this outcome.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => exit_code::SUCCESS,
            Self::InvalidArguments => exit_code::INVALID_ARGS,
            Self::BuildpackExecutionFailure => exit_code::BUILD_FAILED_WITH_BUILDPACK_ERRORS,
            Self::InfrastructureFailure => exit_code::UNSPECIFIED_ERROR,
        }
    }
}
