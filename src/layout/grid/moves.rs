use tracing::trace;

use super::CompactMode;
use super::collision::{collides, first_collision};
use super::compact::{compact, sorted_indices};
use super::item::{GridLayoutItem, position_of};

/// Knobs shared by every move and resize on one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    pub compaction: CompactMode,
    pub columns: i32,
    pub prevent_collision: bool,
    pub allow_overlap: bool,
}

/// Moves item `id` to the cell `(x, y)`, displaces whatever it lands on and
/// recompacts.
///
/// The target is clamped so the item stays inside the columns. With
/// `prevent_collision` a move that would hit another item is rejected and the
/// item keeps its coordinates. An unknown id returns the layout unchanged.
pub fn move_element(
    layout: &[GridLayoutItem],
    id: &str,
    x: i32,
    y: i32,
    is_user_action: bool,
    options: &MoveOptions,
) -> Vec<GridLayoutItem> {
    let mut working = layout.to_vec();
    let Some(index) = position_of(&working, id) else {
        trace!(item = %id, "move of unknown item ignored");
        return working;
    };
    let x = x.clamp(0, (options.columns - working[index].w).max(0));
    let y = y.max(0);
    move_in_place(
        &mut working,
        index,
        Some(x),
        Some(y),
        is_user_action,
        options.prevent_collision,
        options.allow_overlap,
        options,
    );
    compact(
        &working,
        options.compaction,
        options.columns,
        options.allow_overlap,
    )
}

/// Displacement step of [`move_element`] without the final compaction.
///
/// `None` for an axis keeps the item's current coordinate on it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn move_in_place(
    layout: &mut [GridLayoutItem],
    index: usize,
    x: Option<i32>,
    y: Option<i32>,
    is_user_action: bool,
    prevent_collision: bool,
    allow_overlap: bool,
    options: &MoveOptions,
) {
    let item = &layout[index];
    if item.is_static && item.is_draggable != Some(true) {
        return;
    }
    if x == Some(item.x) && y == Some(item.y) {
        return;
    }

    let (old_x, old_y) = (item.x, item.y);
    let item = &mut layout[index];
    if let Some(x) = x {
        item.x = x;
    }
    if let Some(y) = y {
        item.y = y;
    }
    item.moved = true;

    // Moving toward the origin resolves collisions from the far end first so
    // the item can slip past the ones it overtakes.
    let mut order = sorted_indices(layout, options.compaction);
    let moving_up = match options.compaction {
        CompactMode::Vertical => y.is_some_and(|y| old_y >= y),
        CompactMode::Horizontal => x.is_some_and(|x| old_x >= x),
        CompactMode::None => false,
    };
    if moving_up {
        order.reverse();
    }

    let collisions: Vec<usize> = order
        .into_iter()
        .filter(|&other| collides(&layout[other], &layout[index]))
        .collect();

    if !collisions.is_empty() && allow_overlap {
        return;
    }
    if !collisions.is_empty() && prevent_collision {
        trace!(item = %layout[index].id, "move rejected by collision");
        let item = &mut layout[index];
        item.x = old_x;
        item.y = old_y;
        item.moved = false;
        return;
    }

    for other in collisions {
        if layout[other].moved {
            continue;
        }
        if layout[other].is_static {
            move_away_from_collision(layout, other, index, is_user_action, options);
        } else {
            move_away_from_collision(layout, index, other, is_user_action, options);
        }
    }
}

/// Pushes `to_move` out of `collides_with`.
///
/// On the first step of a user gesture the displaced item may instead jump
/// over the dragged one if there is room on the other side, which is what
/// makes swapping two neighbours feel natural.
fn move_away_from_collision(
    layout: &mut [GridLayoutItem],
    collides_with: usize,
    to_move: usize,
    is_user_action: bool,
    options: &MoveOptions,
) {
    let horizontal = options.compaction == CompactMode::Horizontal;
    let vertical = options.compaction == CompactMode::Vertical;
    let prevent_collision = layout[collides_with].is_static;

    if is_user_action {
        let anchor = &layout[collides_with];
        let mover = &layout[to_move];
        let landing = GridLayoutItem {
            x: if horizontal {
                (anchor.x - mover.w).max(0)
            } else {
                mover.x
            },
            y: if vertical {
                (anchor.y - mover.h).max(0)
            } else {
                mover.y
            },
            w: mover.w,
            h: mover.h,
            ..GridLayoutItem::default()
        };

        match first_collision(layout, &landing) {
            None => {
                move_in_place(
                    layout,
                    to_move,
                    horizontal.then_some(landing.x),
                    vertical.then_some(landing.y),
                    false,
                    prevent_collision,
                    false,
                    options,
                );
                return;
            }
            Some(hit) => {
                let hit = &layout[hit];
                let anchor = &layout[collides_with];
                let north = hit.bottom() > anchor.y;
                let west = anchor.right() > hit.x;
                if north && vertical {
                    let target_y = anchor.y + 1;
                    move_in_place(
                        layout,
                        to_move,
                        None,
                        Some(target_y),
                        false,
                        prevent_collision,
                        false,
                        options,
                    );
                    return;
                }
                if north && options.compaction == CompactMode::None {
                    let mover_y = layout[to_move].y;
                    let mover_h = layout[to_move].h;
                    layout[collides_with].y = mover_y;
                    layout[to_move].y = mover_y + mover_h;
                    return;
                }
                if west && horizontal {
                    let target_x = layout[to_move].x;
                    move_in_place(
                        layout,
                        collides_with,
                        Some(target_x),
                        None,
                        false,
                        prevent_collision,
                        false,
                        options,
                    );
                    return;
                }
            }
        }
    }

    let mover = &layout[to_move];
    let new_x = horizontal.then_some(mover.x + 1);
    let new_y = vertical.then_some(mover.y + 1);
    if new_x.is_none() && new_y.is_none() {
        return;
    }
    move_in_place(
        layout,
        to_move,
        new_x,
        new_y,
        false,
        prevent_collision,
        false,
        options,
    );
}
