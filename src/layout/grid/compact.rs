use std::cmp::Ordering;

use super::CompactMode;
use super::collision::{first_collision, statics};
use super::item::GridLayoutItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Bottom-most occupied row of the layout.
pub fn bottom(layout: &[GridLayoutItem]) -> i32 {
    layout.iter().map(GridLayoutItem::bottom).max().unwrap_or(0).max(0)
}

/// Indices of `layout` in packing order.
///
/// Row-major for vertical packing, column-major for horizontal. When two
/// items share a cell the one that was just moved goes first, so it wins the
/// slot and the other is pushed.
pub fn sorted_indices(layout: &[GridLayoutItem], mode: CompactMode) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..layout.len()).collect();
    indices.sort_by(|&a, &b| compare_items(&layout[a], &layout[b], mode));
    indices
}

fn compare_items(a: &GridLayoutItem, b: &GridLayoutItem, mode: CompactMode) -> Ordering {
    let primary = match mode {
        CompactMode::Horizontal => a.x.cmp(&b.x).then(a.y.cmp(&b.y)),
        CompactMode::Vertical | CompactMode::None => a.y.cmp(&b.y).then(a.x.cmp(&b.x)),
    };
    primary.then(b.moved.cmp(&a.moved))
}

/// Packs the layout along the compaction axis.
///
/// Static items are fixed points; every other item is placed in packing
/// order, sliding toward the origin until it would hit something already
/// placed. With overlap allowed the layout is returned untouched. The result
/// keeps the input's item order and clears every `moved` flag.
pub fn compact(
    layout: &[GridLayoutItem],
    mode: CompactMode,
    columns: i32,
    allow_overlap: bool,
) -> Vec<GridLayoutItem> {
    if allow_overlap {
        return layout.to_vec();
    }
    let mut placed = statics(layout);
    let order = sorted_indices(layout, mode);
    let mut sorted: Vec<GridLayoutItem> = order.iter().map(|&i| layout[i].clone()).collect();
    let mut out = layout.to_vec();

    for pos in 0..sorted.len() {
        if !sorted[pos].is_static {
            compact_item(&placed, &mut sorted, pos, mode, columns);
            placed.push(sorted[pos].clone());
        }
        sorted[pos].moved = false;
        out[order[pos]] = sorted[pos].clone();
    }
    out
}

fn compact_item(
    placed: &[GridLayoutItem],
    sorted: &mut [GridLayoutItem],
    pos: usize,
    mode: CompactMode,
    columns: i32,
) {
    match mode {
        CompactMode::Vertical => {
            let floor = bottom(placed);
            let item = &mut sorted[pos];
            item.y = item.y.min(floor);
            while item.y > 0 && first_collision(placed, item).is_none() {
                item.y -= 1;
            }
        }
        CompactMode::Horizontal => {
            let item = &mut sorted[pos];
            while item.x > 0 && first_collision(placed, item).is_none() {
                item.x -= 1;
            }
        }
        CompactMode::None => {}
    }

    while let Some(hit) = first_collision(placed, &sorted[pos]) {
        let hit = &placed[hit];
        if mode == CompactMode::Horizontal {
            resolve_compaction_collision(sorted, pos, hit.right(), Axis::X);
        } else {
            resolve_compaction_collision(sorted, pos, hit.bottom(), Axis::Y);
        }
        if mode == CompactMode::Horizontal && sorted[pos].right() > columns {
            // Overflowed the row: wrap onto the next one and slide left again.
            let item = &mut sorted[pos];
            item.x = columns - item.w;
            item.y += 1;
            while item.x > 0 && first_collision(placed, item).is_none() {
                item.x -= 1;
            }
        }
    }

    let item = &mut sorted[pos];
    item.x = item.x.max(0);
    item.y = item.y.max(0);
}

/// Moves `sorted[index]` to `move_to` along `axis`, first pushing any later
/// item it would land on out of the way by the same amount.
fn resolve_compaction_collision(
    sorted: &mut [GridLayoutItem],
    index: usize,
    move_to: i32,
    axis: Axis,
) {
    let size = match axis {
        Axis::X => sorted[index].w,
        Axis::Y => sorted[index].h,
    };
    bump(&mut sorted[index], axis, 1);

    for other in index + 1..sorted.len() {
        if sorted[other].is_static {
            continue;
        }
        // Later items are sorted, so nothing past this row can be hit.
        if sorted[other].y > sorted[index].bottom() {
            break;
        }
        if super::collision::collides(&sorted[index], &sorted[other]) {
            resolve_compaction_collision(sorted, other, move_to + size, axis);
        }
    }

    set_axis(&mut sorted[index], axis, move_to);
}

fn bump(item: &mut GridLayoutItem, axis: Axis, by: i32) {
    match axis {
        Axis::X => item.x += by,
        Axis::Y => item.y += by,
    }
}

fn set_axis(item: &mut GridLayoutItem, axis: Axis, value: i32) {
    match axis {
        Axis::X => item.x = value,
        Axis::Y => item.y = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::grid::collision::collides;

    fn ids_at(layout: &[GridLayoutItem]) -> Vec<(String, i32, i32)> {
        layout
            .iter()
            .map(|item| (item.id.clone(), item.x, item.y))
            .collect()
    }

    #[test]
    fn vertical_compaction_removes_gaps() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 3, 2, 2),
            GridLayoutItem::new("b", 0, 9, 2, 1),
            GridLayoutItem::new("c", 4, 7, 2, 2),
        ];
        let out = compact(&layout, CompactMode::Vertical, 12, false);
        assert_eq!(
            ids_at(&out),
            vec![("a".into(), 0, 0), ("b".into(), 0, 2), ("c".into(), 4, 0)]
        );
    }

    #[test]
    fn items_compact_around_statics() {
        let layout = vec![
            GridLayoutItem::new("wall", 0, 0, 4, 2).fixed(),
            GridLayoutItem::new("a", 1, 5, 2, 1),
        ];
        let out = compact(&layout, CompactMode::Vertical, 12, false);
        assert_eq!(out[0].y, 0);
        assert_eq!(out[1].y, 2);
    }

    #[test]
    fn horizontal_compaction_slides_left_and_wraps() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 0, 3, 1),
            GridLayoutItem::new("b", 2, 0, 2, 1),
        ];
        let out = compact(&layout, CompactMode::Horizontal, 4, false);
        assert_eq!(ids_at(&out), vec![("a".into(), 0, 0), ("b".into(), 0, 1)]);
        assert!(!collides(&out[0], &out[1]));
    }

    #[test]
    fn no_compaction_keeps_positions_but_resolves_overlap() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 4, 2, 2),
            GridLayoutItem::new("b", 0, 5, 2, 2),
        ];
        let out = compact(&layout, CompactMode::None, 12, false);
        assert_eq!(out[0].y, 4);
        assert_eq!(out[1].y, 6);
    }

    #[test]
    fn overlap_mode_skips_compaction() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 4, 2, 2),
            GridLayoutItem::new("b", 0, 5, 2, 2),
        ];
        assert_eq!(compact(&layout, CompactMode::Vertical, 12, true), layout);
    }

    #[test]
    fn moved_item_wins_a_shared_cell() {
        let mut dragged = GridLayoutItem::new("dragged", 0, 0, 2, 2);
        dragged.moved = true;
        let layout = vec![GridLayoutItem::new("resident", 0, 0, 2, 2), dragged];
        let out = compact(&layout, CompactMode::Vertical, 12, false);
        assert_eq!(out[1].y, 0);
        assert_eq!(out[0].y, 2);
        assert!(out.iter().all(|item| !item.moved));
    }

    #[test]
    fn zero_sized_item_does_not_block_siblings() {
        let layout = vec![
            GridLayoutItem::new("collapsed", 0, 0, 0, 0),
            GridLayoutItem::new("below", 0, 3, 2, 2),
        ];
        let out = compact(&layout, CompactMode::Vertical, 12, false);
        assert_eq!(out[1].y, 0);
    }

    #[test]
    fn compaction_is_idempotent_for_a_mixed_layout() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 0, 4, 2),
            GridLayoutItem::new("b", 2, 1, 4, 3),
            GridLayoutItem::new("c", 5, 6, 3, 1),
            GridLayoutItem::new("s", 6, 0, 2, 2).fixed(),
        ];
        let once = compact(&layout, CompactMode::Vertical, 12, false);
        let twice = compact(&once, CompactMode::Vertical, 12, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn bottom_of_empty_layout_is_zero() {
        assert_eq!(bottom(&[]), 0);
        assert_eq!(bottom(&[GridLayoutItem::new("a", 0, 3, 1, 2)]), 5);
    }
}
