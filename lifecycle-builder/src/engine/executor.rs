use super::command::CommandExt;
use super::layer_env::BuildLayerEnv;
use super::store::{DirBuildpackStore, StoreError, StoredBuildpack};
use super::{BuildContext, ExecutionEngine, ExecutionError};
use crate::Env;
use lifecycle_common::toml_file::{TomlFileError, read_optional_toml_file, read_toml_file, write_toml_file};
use lifecycle_data::bom::BuildpackRef;
use lifecycle_data::build::Build;
use lifecycle_data::build_plan::BuildPlan;
use lifecycle_data::buildpack::{ApiVersion, BuildpackId};
use lifecycle_data::group::GroupBuildpack;
use lifecycle_data::launch::{Launch, ProcessType};
use lifecycle_data::layer::{LayerContentMetadata, LayerName};
use lifecycle_data::metadata::{BuildMetadata, LayerMetadata, ProcessMetadata};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The first buildpack API that passes its input locations as environment variables.
const INPUT_ENV_VARS_BUILDPACK_API: ApiVersion = ApiVersion::new(0, 8);

/// Runs the `bin/build` executable of each buildpack found in a [`DirBuildpackStore`].
///
/// Buildpacks run strictly in group order. The build environment of each buildpack includes
/// the build layers of all buildpacks that ran before it, and each buildpack only sees the plan
/// entries no earlier buildpack has met.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildpackExecutor;

#[derive(thiserror::Error, Debug)]
pub enum ExecutorError {
    #[error("Couldn't find buildpack {0}@{1}: {2}")]
    LookupBuildpack(BuildpackId, String, #[source] StoreError),

    #[error("Couldn't create layers directory {0}: {1}")]
    CreateLayersDir(PathBuf, #[source] io::Error),

    #[error("Couldn't create temporary directory for the buildpack plan: {0}")]
    CreatePlanDir(#[source] io::Error),

    #[error("Couldn't write buildpack plan: {0}")]
    WritePlan(#[source] TomlFileError),

    #[error("Couldn't read platform environment: {0}")]
    ReadPlatformEnv(#[source] io::Error),

    #[error("Couldn't run build executable {0}: {1}")]
    SpawnBuild(PathBuf, #[source] io::Error),

    #[error("{}", describe_failure(buildpack_id, *exit_code))]
    BuildpackFailed {
        buildpack_id: BuildpackId,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Couldn't read buildpack output: {0}")]
    ReadBuildpackOutput(#[source] TomlFileError),

    #[error("Couldn't read layers of buildpack in {0}: {1}")]
    ReadLayers(PathBuf, #[source] io::Error),
}

impl From<ExecutorError> for ExecutionError {
    fn from(error: ExecutorError) -> Self {
        match error {
            ExecutorError::BuildpackFailed { .. } => ExecutionError::buildpack(error),
            _ => ExecutionError::infrastructure(error),
        }
    }
}

fn describe_failure(buildpack_id: &BuildpackId, exit_code: Option<i32>) -> String {
    match exit_code {
        Some(exit_code) => format!("Buildpack {buildpack_id} failed with exit code {exit_code}"),
        None => format!("Buildpack {buildpack_id} was terminated by a signal"),
    }
}

/// What a single buildpack left behind in its layers directory.
struct BuildpackOutput {
    launch: Launch,
    build: Build,
    layers: Vec<(LayerName, LayerContentMetadata)>,
    layer_envs: Vec<BuildLayerEnv>,
}

impl ExecutionEngine for BuildpackExecutor {
    fn build(&self, context: &BuildContext) -> Result<BuildMetadata, ExecutionError> {
        let store = DirBuildpackStore::new(&context.buildpacks_dir);

        let mut env = context.env.clone();
        let mut plan = context.plan.clone();
        let mut processes = BTreeMap::<ProcessType, ProcessMetadata>::new();
        let mut metadata = BuildMetadata::default();

        for group_buildpack in &context.group {
            let stored = store
                .lookup(&group_buildpack.id, &group_buildpack.version)
                .map_err(|error| {
                    ExecutorError::LookupBuildpack(
                        group_buildpack.id.clone(),
                        group_buildpack.version.clone(),
                        error,
                    )
                })?;

            info!(
                "Running build for buildpack {}@{}",
                group_buildpack.id,
                group_buildpack.version
            );

            let output = run_buildpack(context, &stored, &env, &plan)?;

            info!("Finished running build for buildpack {}", group_buildpack.id);

            env = output
                .layer_envs
                .iter()
                .fold(env, |env, layer_env| layer_env.apply(&env));

            plan = plan.without_met_entries(&group_buildpack.id, &output.build.unmet_names());

            let buildpack_ref = BuildpackRef {
                id: group_buildpack.id.clone(),
                version: group_buildpack.version.clone(),
            };

            metadata.buildpacks.push(GroupBuildpack {
                homepage: group_buildpack
                    .homepage
                    .clone()
                    .or_else(|| stored.descriptor.buildpack.homepage.clone()),
                ..group_buildpack.clone()
            });

            metadata.bom.extend(
                output
                    .launch
                    .bom
                    .iter()
                    .map(|entry| entry.attributed_to(buildpack_ref.clone())),
            );
            metadata.labels.extend(output.launch.labels);
            metadata.slices.extend(output.launch.slices);
            metadata
                .layers
                .extend(output.layers.into_iter().map(|(name, content_metadata)| {
                    LayerMetadata {
                        buildpack_id: group_buildpack.id.clone(),
                        name,
                        types: content_metadata.layer_types(),
                    }
                }));

            // A later buildpack's process replaces an earlier one of the same type.
            for process in output.launch.processes {
                processes.insert(
                    process.r#type.clone(),
                    ProcessMetadata::from_process(process, group_buildpack.id.clone()),
                );
            }
        }

        metadata.processes = processes.into_values().collect();

        Ok(metadata)
    }
}

fn run_buildpack(
    context: &BuildContext,
    stored: &StoredBuildpack,
    env: &Env,
    plan: &BuildPlan,
) -> Result<BuildpackOutput, ExecutorError> {
    let buildpack = &stored.descriptor.buildpack;

    let buildpack_layers_dir = context.layers_dir.join(buildpack.id.escaped());
    fs::create_dir_all(&buildpack_layers_dir)
        .map_err(|error| ExecutorError::CreateLayersDir(buildpack_layers_dir.clone(), error))?;

    // The plan lives outside of the layers directory, it must not end up in the image.
    let plan_dir = tempfile::tempdir().map_err(ExecutorError::CreatePlanDir)?;
    let plan_path = plan_dir.path().join("plan.toml");
    write_toml_file(&plan.for_buildpack(&buildpack.id), &plan_path)
        .map_err(ExecutorError::WritePlan)?;

    let mut buildpack_env = if buildpack.clear_env {
        env.clone()
    } else {
        env.with_platform_env(&context.platform_dir)
            .map_err(ExecutorError::ReadPlatformEnv)?
    };

    buildpack_env.insert("CNB_BUILDPACK_DIR", &stored.dir);
    if stored.descriptor.api >= INPUT_ENV_VARS_BUILDPACK_API {
        buildpack_env.insert("CNB_LAYERS_DIR", &buildpack_layers_dir);
        buildpack_env.insert("CNB_PLATFORM_DIR", &context.platform_dir);
        buildpack_env.insert("CNB_BP_PLAN_PATH", &plan_path);
    }

    let build_executable = stored.dir.join("bin").join("build");

    let output = Command::new(&build_executable)
        .arg(&buildpack_layers_dir)
        .arg(&context.platform_dir)
        .arg(&plan_path)
        .current_dir(&context.app_dir)
        .env_clear()
        .envs(&buildpack_env)
        .output_and_write_streams(io::stdout(), io::stderr())
        .map_err(|error| ExecutorError::SpawnBuild(build_executable, error))?;

    if !output.status.success() {
        return Err(ExecutorError::BuildpackFailed {
            buildpack_id: buildpack.id.clone(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    read_buildpack_output(&buildpack_layers_dir)
}

fn read_buildpack_output(buildpack_layers_dir: &Path) -> Result<BuildpackOutput, ExecutorError> {
    let launch = read_optional_toml_file::<Launch>(buildpack_layers_dir.join("launch.toml"))
        .map_err(ExecutorError::ReadBuildpackOutput)?;

    let build = read_optional_toml_file::<Build>(buildpack_layers_dir.join("build.toml"))
        .map_err(ExecutorError::ReadBuildpackOutput)?;

    let mut layers = Vec::new();
    let mut layer_envs = Vec::new();

    for layer_name in layer_names(buildpack_layers_dir)
        .map_err(|error| ExecutorError::ReadLayers(buildpack_layers_dir.to_path_buf(), error))?
    {
        let content_metadata = read_toml_file::<LayerContentMetadata>(
            buildpack_layers_dir.join(format!("{layer_name}.toml")),
        )
        .map_err(ExecutorError::ReadBuildpackOutput)?;

        let layer_dir = buildpack_layers_dir.join(layer_name.as_str());
        if content_metadata.layer_types().build && layer_dir.is_dir() {
            layer_envs.push(
                BuildLayerEnv::read_from_layer_dir(&layer_dir)
                    .map_err(|error| ExecutorError::ReadLayers(layer_dir.clone(), error))?,
            );
        }

        layers.push((layer_name, content_metadata));
    }

    Ok(BuildpackOutput {
        launch,
        build,
        layers,
        layer_envs,
    })
}

/// Names of all layers with a `<layer>.toml` file, sorted by name.
fn layer_names(buildpack_layers_dir: &Path) -> io::Result<Vec<LayerName>> {
    let mut layer_names = Vec::new();

    for entry in fs::read_dir(buildpack_layers_dir)? {
        let path = entry?.path();

        if !path.is_file() || path.extension().and_then(|extension| extension.to_str()) != Some("toml") {
            continue;
        }

        // `launch.toml`, `build.toml` and `store.toml` are not layers and fail to parse.
        if let Some(layer_name) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<LayerName>().ok())
        {
            layer_names.push(layer_name);
        }
    }

    layer_names.sort();
    Ok(layer_names)
}
