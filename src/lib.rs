//! Recursive merging of plain option objects.
//!
//! Nested objects merge key by key; arrays, strings, numbers, booleans and
//! null replace whatever was there before. Merges always produce a new
//! object and never modify their inputs. On top of the core merge the crate
//! provides layered JSON file loading, an environment variable overlay and a
//! builder that deserializes the merged result into typed options.

pub mod env_config;
pub mod error;
pub mod file_config;
pub mod merge;
pub mod merger;

pub use env_config::{align_keys, env_overrides, env_overrides_with_env};
pub use error::{MergeOptionsError, Result};
pub use file_config::{load_json_file, merge_json_files};
pub use merge::{is_plain, merge_options, merge_options_into};
pub use merger::{merge_typed, OptionsMerger};
