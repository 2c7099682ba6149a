//! Small collection and I/O helpers shared by the workspace crates.

pub mod map;
pub mod ordered_set;
pub mod serialization;

pub use map::Map;
pub use ordered_set::OrderedSet;
pub use serialization::{ReaderFrom, WriterTo};
