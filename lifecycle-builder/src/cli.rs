use crate::paths::{
    DEFAULT_APP_DIR, DEFAULT_BUILDPACKS_DIR, DEFAULT_LAYERS_DIR, DEFAULT_PLATFORM_API,
    DEFAULT_PLATFORM_DIR, PLACEHOLDER_GROUP_PATH, PLACEHOLDER_PLAN_PATH,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Runs the buildpacks of a detected group against an application.
#[derive(Parser, Debug, Clone)]
#[command(name = "builder", version, about, long_about = None)]
pub struct BuildArgs {
    /// Path to the buildpacks directory
    #[arg(long = "buildpacks", env = "CNB_BUILDPACKS_DIR", default_value = DEFAULT_BUILDPACKS_DIR)]
    pub buildpacks_dir: PathBuf,
    /// Path to the group file, defaults to 'group.toml' in the layers directory
    #[arg(long = "group", env = "CNB_GROUP_PATH", default_value = PLACEHOLDER_GROUP_PATH)]
    pub group_path: PathBuf,
    /// Path to the plan file, defaults to 'plan.toml' in the layers directory
    #[arg(long = "plan", env = "CNB_PLAN_PATH", default_value = PLACEHOLDER_PLAN_PATH)]
    pub plan_path: PathBuf,
    /// Path to the layers directory
    #[arg(long = "layers", env = "CNB_LAYERS_DIR", default_value = DEFAULT_LAYERS_DIR)]
    pub layers_dir: PathBuf,
    /// Path to the application directory
    #[arg(long = "app", env = "CNB_APP_DIR", default_value = DEFAULT_APP_DIR)]
    pub app_dir: PathBuf,
    /// Path to the platform directory
    #[arg(long = "platform", env = "CNB_PLATFORM_DIR", default_value = DEFAULT_PLATFORM_DIR)]
    pub platform_dir: PathBuf,
    /// Logging level
    #[arg(long, env = "CNB_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
    /// Platform API requested by the platform
    #[arg(long, env = "CNB_PLATFORM_API", default_value = DEFAULT_PLATFORM_API, hide = true)]
    pub platform_api: String,
    /// Positional arguments are not accepted, they are collected to be rejected with a
    /// dedicated error.
    #[arg(hide = true)]
    pub unexpected: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The matching `stderrlog` verbosity.
    #[must_use]
    pub fn verbosity(self) -> usize {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_command() {
        // Trigger Clap's internal assertions that validate the command configuration.
        BuildArgs::command().debug_assert();
    }

    #[test]
    fn flags_are_parsed() {
        let args = BuildArgs::try_parse_from([
            "builder",
            "--buildpacks",
            "/tmp/buildpacks",
            "--layers",
            "/tmp/layers",
            "--group",
            "/tmp/group.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.buildpacks_dir, PathBuf::from("/tmp/buildpacks"));
        assert_eq!(args.layers_dir, PathBuf::from("/tmp/layers"));
        assert_eq!(args.group_path, PathBuf::from("/tmp/group.toml"));
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn positional_arguments_are_collected() {
        let args = BuildArgs::try_parse_from(["builder", "--layers", "/tmp", "foo", "bar"]).unwrap();

        assert_eq!(args.unexpected, vec!["foo", "bar"]);
    }
}
