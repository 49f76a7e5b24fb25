//! Property-based invariant tests for the grid engine.
//!
//! Verifies:
//! 1. Vertical and horizontal compaction are idempotent on bounds-corrected
//!    layouts.
//! 2. Compaction with overlap disabled leaves no two visible items overlapping,
//!    along either axis or none.
//! 3. Compaction never moves static items.
//! 4. A collision-preventing move never lands an item on a static item.
//! 5. Moves keep every item inside the column range.
//! 6. Overlap mode leaves the layout untouched.

use dnd_layout::layout::grid::{
    CompactMode, GridLayoutItem, MoveOptions, collides, compact, correct_bounds, move_element,
};
use proptest::prelude::*;

const COLUMNS: i32 = 12;

// ── Helpers ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Draft {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    is_static: bool,
}

fn item_draft() -> impl Strategy<Value = Draft> {
    (0..COLUMNS, 0..20i32, 1..5i32, 1..4i32, prop::bool::weighted(0.15)).prop_map(
        |(x, y, w, h, is_static)| Draft {
            x,
            y,
            w,
            h,
            is_static,
        },
    )
}

/// A layout of unique ids, bounds-corrected so statics never overlap.
fn grid_layout(max_len: usize) -> impl Strategy<Value = Vec<GridLayoutItem>> {
    proptest::collection::vec(item_draft(), 1..max_len).prop_map(|drafts| {
        let mut layout: Vec<GridLayoutItem> = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let item = GridLayoutItem::new(format!("i{index}"), draft.x, draft.y, draft.w, draft.h);
                if draft.is_static { item.fixed() } else { item }
            })
            .collect();
        correct_bounds(&mut layout, COLUMNS);
        layout
    })
}

fn packing_axis() -> impl Strategy<Value = CompactMode> {
    prop_oneof![Just(CompactMode::Vertical), Just(CompactMode::Horizontal)]
}

fn overlapping_pairs(layout: &[GridLayoutItem]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (i, a) in layout.iter().enumerate() {
        for b in &layout[i + 1..] {
            if collides(a, b) {
                pairs.push((a.id.clone(), b.id.clone()));
            }
        }
    }
    pairs
}

fn positions(layout: &[GridLayoutItem]) -> Vec<(String, i32, i32, i32, i32)> {
    layout
        .iter()
        .map(|item| (item.id.clone(), item.x, item.y, item.w, item.h))
        .collect()
}

fn options(prevent_collision: bool) -> MoveOptions {
    MoveOptions {
        compaction: CompactMode::Vertical,
        columns: COLUMNS,
        prevent_collision,
        allow_overlap: false,
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Idempotent compaction
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compaction_is_idempotent(layout in grid_layout(24), mode in packing_axis()) {
        let once = compact(&layout, mode, COLUMNS, false);
        let twice = compact(&once, mode, COLUMNS, false);
        prop_assert_eq!(
            positions(&once),
            positions(&twice),
            "{:?} packing moved items twice",
            mode
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. No overlap after compaction
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compaction_leaves_no_overlap(layout in grid_layout(24), mode in packing_axis()) {
        let out = compact(&layout, mode, COLUMNS, false);
        let pairs = overlapping_pairs(&out);
        prop_assert!(pairs.is_empty(), "overlapping after {:?} compact: {:?}", mode, pairs);
    }

    #[test]
    fn compaction_without_axis_still_separates_items(layout in grid_layout(16)) {
        let out = compact(&layout, CompactMode::None, COLUMNS, false);
        let pairs = overlapping_pairs(&out);
        prop_assert!(pairs.is_empty(), "overlapping after compact: {:?}", pairs);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Statics are fixed points
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn compaction_keeps_statics_in_place(layout in grid_layout(24)) {
        let out = compact(&layout, CompactMode::Vertical, COLUMNS, false);
        for (before, after) in layout.iter().zip(&out) {
            if before.is_static {
                prop_assert_eq!((before.x, before.y), (after.x, after.y), "static {} moved", before.id);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Collision containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prevented_moves_never_land_on_statics(
        layout in grid_layout(16),
        pick in any::<prop::sample::Index>(),
        x in 0..COLUMNS,
        y in 0..24i32,
    ) {
        let base = compact(&layout, CompactMode::Vertical, COLUMNS, false);
        let id = base[pick.index(base.len())].id.clone();
        let out = move_element(&base, &id, x, y, true, &options(true));

        for item in &out {
            for wall in out.iter().filter(|other| other.is_static) {
                prop_assert!(
                    !collides(item, wall),
                    "{} overlaps static {} after moving {}",
                    item.id,
                    wall.id,
                    id
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Columns are respected
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_stay_inside_columns(
        layout in grid_layout(16),
        pick in any::<prop::sample::Index>(),
        x in -4..COLUMNS + 4,
        y in -4..24i32,
    ) {
        let base = compact(&layout, CompactMode::Vertical, COLUMNS, false);
        let id = base[pick.index(base.len())].id.clone();
        let out = move_element(&base, &id, x, y, true, &options(false));

        prop_assert_eq!(out.len(), base.len());
        for item in &out {
            prop_assert!(item.x >= 0 && item.y >= 0, "{} at ({}, {})", item.id, item.x, item.y);
            prop_assert!(item.right() <= COLUMNS, "{} overflows: x={} w={}", item.id, item.x, item.w);
        }
        prop_assert!(overlapping_pairs(&out).is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Overlap mode
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overlap_mode_skips_compaction(layout in grid_layout(24)) {
        let out = compact(&layout, CompactMode::Vertical, COLUMNS, true);
        prop_assert_eq!(positions(&layout), positions(&out));
    }
}
