//! Small generic structures with no knowledge of the rest of the library.

mod ordered_set;
pub use ordered_set::OrderedSet;
