//! Core cookbook logic — types, normalization, registry, resolution, parsing.

pub mod error;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod types;

pub use error::CookbookError;
pub use registry::Registry;
pub use resolver::ResolveOptions;
