//! # Breakwater AllowList
//!
//! Reloadable actor authorization set for Breakwater.
//!
//! ## Components
//!
//! - `AllowList` - Atomically swapped set of authorized actor ids
//! - `FileSource` / `StaticSource` - List source implementations

pub mod allow_list;
pub mod source;

pub use allow_list::AllowList;
pub use source::{AllowListSource, FileSource, StaticSource};
