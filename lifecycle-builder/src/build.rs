//! The build orchestrator.

use crate::cli::BuildArgs;
use crate::compat::ApiCompatibility;
use crate::config::{BuildConfig, ConfigLoader, TomlConfigLoader};
use crate::engine::{BuildContext, BuildpackExecutor, ExecutionEngine};
use crate::error::Error;
use crate::paths::{resolve_group_path, resolve_plan_path};
use crate::persist::persist_metadata;
use crate::privilege::{PrivilegeQuery, ProcessPrivileges, ensure_not_privileged};
use crate::Env;
use lifecycle_data::build_plan::BuildPlan;
use lifecycle_data::group::BuildpackGroup;
use lifecycle_data::metadata::BuildMetadata;
use log::{debug, info};
use path_absolutize::Absolutize;

/// Runs the build stage: resolves the configuration, checks all preconditions, hands the build
/// to an [`ExecutionEngine`] and persists the resulting metadata.
///
/// Every gate runs in order and any failure aborts the invocation before the next gate. The
/// engine is never invoked unless all gates passed.
pub struct Builder<L = TomlConfigLoader, P = ProcessPrivileges, E = BuildpackExecutor> {
    loader: L,
    privileges: P,
    engine: E,
    compatibility: ApiCompatibility,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(TomlConfigLoader, ProcessPrivileges, BuildpackExecutor)
    }
}

impl<L: ConfigLoader, P: PrivilegeQuery, E: ExecutionEngine> Builder<L, P, E> {
    pub fn new(loader: L, privileges: P, engine: E) -> Self {
        Self {
            loader,
            privileges,
            engine,
            compatibility: ApiCompatibility::default(),
        }
    }

    /// Replaces the supported platform and buildpack APIs.
    #[must_use]
    pub fn with_compatibility(mut self, compatibility: ApiCompatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Runs a complete build invocation.
    ///
    /// `env` is the environment snapshot all buildpacks start from.
    ///
    /// # Errors
    ///
    /// Returns the error of the first gate that failed, see [`Error::classify`].
    pub fn run(&self, args: &BuildArgs, env: Env) -> Result<BuildMetadata, Error> {
        if !args.unexpected.is_empty() {
            return Err(Error::UnexpectedArguments(args.unexpected.clone()));
        }

        let platform_api = self
            .compatibility
            .verify_platform_api(&args.platform_api)?;

        let config = BuildConfig {
            buildpacks_dir: args.buildpacks_dir.clone(),
            group_path: resolve_group_path(&args.group_path, platform_api, &args.layers_dir),
            plan_path: resolve_plan_path(&args.plan_path, platform_api, &args.layers_dir),
            layers_dir: args.layers_dir.clone(),
            app_dir: args.app_dir.clone(),
            platform_dir: args.platform_dir.clone(),
            platform_api,
            env,
        };

        debug!(
            "Reading group from {} and plan from {}",
            config.group_path.display(),
            config.plan_path.display()
        );

        let group = self.loader.load_group(&config.group_path)?;
        let plan = self.loader.load_plan(&config.plan_path)?;

        debug!("Verifying buildpack APIs of {} buildpack(s)", group.len());
        self.compatibility.verify_buildpack_apis(&group)?;

        ensure_not_privileged(&self.privileges)?;

        let metadata = self.build(&config, group, plan)?;

        let metadata_path =
            persist_metadata(&metadata, &config.layers_dir).map_err(Error::WriteMetadata)?;
        debug!("Wrote build metadata to {}", metadata_path.display());

        Ok(metadata)
    }

    /// Hands the build to the engine and returns the metadata it produced unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the buildpacks directory can't be resolved or the engine fails. The engine's
    /// classification of the failure is kept.
    pub fn build(
        &self,
        config: &BuildConfig,
        group: BuildpackGroup,
        plan: BuildPlan,
    ) -> Result<BuildMetadata, Error> {
        let buildpacks_dir = config
            .buildpacks_dir
            .absolutize()
            .map_err(|error| Error::ResolveBuildpacksDir(config.buildpacks_dir.clone(), error))?
            .into_owned();

        let context = BuildContext {
            buildpacks_dir,
            app_dir: config.app_dir.clone(),
            layers_dir: config.layers_dir.clone(),
            platform_dir: config.platform_dir.clone(),
            platform_api: config.platform_api,
            env: config.env.clone(),
            group,
            plan,
        };

        info!("Starting build of {} buildpack(s)", context.group.len());
        let metadata = self.engine.build(&context).map_err(Error::Build)?;
        info!("Build succeeded");

        Ok(metadata)
    }
}
