//! Crate-wide error type.
//!
//! Only configuration-time problems are reported through [`LayoutError`].
//! Anything that goes wrong in the middle of a pointer gesture is absorbed by
//! the engine and logged instead, since aborting a gesture would strand
//! visual state.

use thiserror::Error;

use crate::drag::{DragPhase, DragSignal};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout item at index {index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate item id `{id}` in container `{container}`")]
    DuplicateId { container: String, id: String },

    #[error("item `{id}` has {field} minimum {min} greater than maximum {max}")]
    ContradictoryConstraint {
        id: String,
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no drop target registered with id `{0}`")]
    UnknownTarget(String),

    #[error("a drop target with id `{0}` is already registered")]
    DuplicateTarget(String),

    #[error("no container with id `{0}`")]
    UnknownContainer(String),

    #[error("a drag session is already active")]
    DragAlreadyActive,

    #[error("illegal drag transition: {signal:?} while {from:?}")]
    IllegalTransition { from: DragPhase, signal: DragSignal },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
