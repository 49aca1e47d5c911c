//! Cookbook — a recipe registry with a flattening resolver.
//!
//! Ingredients carry a cook time; recipes reference other entries with a
//! quantity. Resolving a recipe expands the reference graph into a total
//! cook time and merged base-ingredient quantities.

pub mod cli;
pub mod core;
pub mod dispatch;
pub mod logging;
