use tracing::trace;

use super::collision::collides;
use super::compact::compact;
use super::item::{GridLayoutItem, position_of};
use super::moves::{MoveOptions, move_in_place};

/// Which edge or corner of an item a resize gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl ResizeEdge {
    /// Dragging this edge moves the item's left side.
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    /// Dragging this edge moves the item's top side.
    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn changes_width(self) -> bool {
        !matches!(self, ResizeEdge::Top | ResizeEdge::Bottom)
    }

    pub fn changes_height(self) -> bool {
        !matches!(self, ResizeEdge::Left | ResizeEdge::Right)
    }
}

/// Result of one resize step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeStep {
    pub layout: Vec<GridLayoutItem>,
    pub item: GridLayoutItem,
}

/// Resizes item `id` to `w` x `h` cells from the given edge.
///
/// Handles on the top or left keep the opposite edge anchored by shifting
/// the item's origin. With `prevent_collision` a size that would overlap
/// another item is reverted to the current one. The layout is recompacted
/// unless overlap is allowed. Returns `None` for an unknown id.
pub fn resize_element(
    layout: &[GridLayoutItem],
    id: &str,
    w: i32,
    h: i32,
    edge: ResizeEdge,
    options: &MoveOptions,
) -> Option<ResizeStep> {
    let mut working = layout.to_vec();
    let index = position_of(&working, id)?;
    let current = working[index].clone();

    let mut w = current.clamp_width(w, options.columns);
    let mut h = current.clamp_height(h);
    let mut x = current.x;
    let mut y = current.y;
    let mut shift_origin = false;

    if edge.moves_left() {
        x = current.x + (current.w - w);
        if x != current.x && x < 0 {
            w = current.w;
        }
        x = x.max(0);
        shift_origin = true;
    }
    if edge.moves_top() {
        y = current.y + (current.h - h);
        if y != current.y && y < 0 {
            h = current.h;
        }
        y = y.max(0);
        shift_origin = true;
    }

    if options.prevent_collision && !options.allow_overlap {
        let stretched = GridLayoutItem {
            x,
            y,
            w,
            h,
            ..current.clone()
        };
        if working.iter().any(|other| collides(other, &stretched)) {
            trace!(item = %id, "resize rejected by collision");
            x = current.x;
            y = current.y;
            w = current.w;
            h = current.h;
            shift_origin = false;
        }
    }

    working[index].w = w;
    working[index].h = h;
    if shift_origin {
        move_in_place(
            &mut working,
            index,
            Some(x),
            Some(y),
            true,
            options.prevent_collision,
            options.allow_overlap,
            options,
        );
    }

    let layout = compact(
        &working,
        options.compaction,
        options.columns,
        options.allow_overlap,
    );
    let item = layout[index].clone();
    Some(ResizeStep { layout, item })
}
