//! Layout engines. Both are pure: they take a layout and return a new one,
//! leaving drag bookkeeping to the containers.

pub mod flex;
pub mod grid;
