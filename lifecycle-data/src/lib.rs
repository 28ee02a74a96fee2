#![doc = include_str!("../README.md")]
#![allow(clippy::must_use_candidate)]

pub mod bom;
pub mod build;
pub mod build_plan;
pub mod buildpack;
pub mod buildpack_plan;
pub mod group;
pub mod launch;
pub mod layer;
pub mod metadata;

mod newtypes;
