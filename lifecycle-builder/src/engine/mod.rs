//! The execution engine that runs the buildpacks of a group.

mod command;
mod executor;
mod layer_env;
mod store;

pub use executor::{BuildpackExecutor, ExecutorError};
pub use store::{DirBuildpackStore, StoreError, StoredBuildpack};

use crate::Env;
use lifecycle_data::build_plan::BuildPlan;
use lifecycle_data::buildpack::ApiVersion;
use lifecycle_data::group::BuildpackGroup;
use lifecycle_data::metadata::BuildMetadata;
use std::error::Error;
use std::path::PathBuf;

/// Everything an [`ExecutionEngine`] needs to build an application.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Absolute path of the buildpacks directory.
    pub buildpacks_dir: PathBuf,
    pub app_dir: PathBuf,
    pub layers_dir: PathBuf,
    pub platform_dir: PathBuf,
    pub platform_api: ApiVersion,
    /// The environment snapshot every buildpack starts from.
    pub env: Env,
    pub group: BuildpackGroup,
    pub plan: BuildPlan,
}

/// Runs the buildpacks of a group, in order, and aggregates what they produced.
pub trait ExecutionEngine {
    /// Builds the application described by the context.
    ///
    /// # Errors
    ///
    /// Failures caused by a buildpack's own build logic must be reported with
    /// [`ErrorKind::Buildpack`], everything else with [`ErrorKind::Infrastructure`].
    fn build(&self, context: &BuildContext) -> Result<BuildMetadata, ExecutionError>;
}

/// Who is to blame for a failed build.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// A buildpack's build logic failed.
    Buildpack,
    /// The build could not be carried out, for example due to I/O errors or missing buildpacks.
    Infrastructure,
}

/// A failed build, classified by [`ErrorKind`].
#[derive(thiserror::Error, Debug)]
#[error("{cause}")]
pub struct ExecutionError {
    kind: ErrorKind,
    #[source]
    cause: Box<dyn Error + Send + Sync>,
}

impl ExecutionError {
    pub fn buildpack(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            kind: ErrorKind::Buildpack,
            cause: cause.into(),
        }
    }

    pub fn infrastructure(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            kind: ErrorKind::Infrastructure,
            cause: cause.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}
