//! Grid and flex layout containers with drag and drop between them.
//!
//! The [`layout`] engines are pure functions over item lists. The
//! [`container`] types wrap them with per-gesture state, the [`coordinator`]
//! tracks the one drag that may cross containers, and [`board::Board`] ties
//! both together behind a pointer-event API.

pub mod board;
pub mod constants;
pub mod container;
pub mod coordinator;
pub mod drag;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod tracing_sub;

pub use board::{Board, BoardEvent, Container, ContainerEvent, CrossContainerConfig};
pub use error::{LayoutError, LayoutResult};
