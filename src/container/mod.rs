//! Stateful containers that drive the layout engines from pointer input.
//!
//! A container owns its committed layout plus whatever a running gesture
//! needs: the pre-drag snapshot, the live placeholder, the state of an item
//! hovering in from another container. Notifications are queued as
//! [`LayoutEvent`]s and drained by the host with `take_events`.

pub mod flex;
pub mod grid;

pub use flex::{FlexContainer, FlexEvent};
pub use grid::{GridContainer, GridEvent};

/// Payload of drag and resize notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEventData<T> {
    /// Layout as it stands after the step.
    pub layout: Vec<T>,
    /// The item as it was when the gesture started.
    pub old_item: Option<T>,
    /// The item as it is now.
    pub new_item: Option<T>,
    /// The slot being previewed, if any.
    pub placeholder: Option<T>,
}

/// Notifications a container emits while it is manipulated.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent<T> {
    /// The committed layout differs from the previous committed layout.
    LayoutChanged(Vec<T>),
    DragStart(DragEventData<T>),
    Drag(DragEventData<T>),
    DragStop(DragEventData<T>),
    ResizeStart(DragEventData<T>),
    Resize(DragEventData<T>),
    ResizeStop(DragEventData<T>),
    /// An item was dropped in. `layout` includes it.
    Drop { layout: Vec<T>, item: T },
}

impl<T> LayoutEvent<T> {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutEvent::LayoutChanged(_) => "layout-changed",
            LayoutEvent::DragStart(_) => "drag-start",
            LayoutEvent::Drag(_) => "drag",
            LayoutEvent::DragStop(_) => "drag-stop",
            LayoutEvent::ResizeStart(_) => "resize-start",
            LayoutEvent::Resize(_) => "resize",
            LayoutEvent::ResizeStop(_) => "resize-stop",
            LayoutEvent::Drop { .. } => "drop",
        }
    }
}
