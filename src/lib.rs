//! Pneumatic conditions - conditional branching rules for workflow template tasks

pub mod activation;
pub mod cloning;
pub mod commands;
pub mod config;
pub mod editor;
pub mod factory;
pub mod ids;
pub mod logging;
pub mod models;
pub mod operators;
pub mod renormalize;
pub mod template;
pub mod validation;
