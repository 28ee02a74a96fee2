#![doc = include_str!("../README.md")]

pub mod toml_file;

// Suppress warnings due to the `unused_crate_dependencies` lint not handling dev-dependencies well.
#[cfg(test)]
use tempfile as _;
