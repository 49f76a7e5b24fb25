//! Pointer-driven reordering of a flex sequence.
//!
//! Everything here is computed against the baseline captured at drag start:
//! the committed order and the untransformed item rectangles. Nothing is
//! committed until the drag stops; in between, items are only translated.

use std::collections::BTreeMap;

use crate::constants::EXTERNAL_ITEM_PREFIX;
use crate::geometry::{Offset, Point, Rect};

use super::FlexDirection;
use super::bounds::ItemBoundsSnapshot;

/// Offsets that visually move items into their new slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReorderTransforms {
    items: BTreeMap<String, Offset>,
    /// Offset of the empty-slot indicator for the dragged item.
    pub placeholder: Offset,
}

impl ReorderTransforms {
    /// Offset for `id`, zero when the item does not move.
    pub fn offset(&self, id: &str) -> Offset {
        self.items.get(id).copied().unwrap_or(Offset::ZERO)
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, Offset)> + '_ {
        self.items.iter().map(|(id, offset)| (id.as_str(), *offset))
    }

    pub fn is_empty(&self) -> bool {
        self.placeholder.is_zero() && self.items.values().all(|offset| offset.is_zero())
    }
}

/// Item under the pointer, comparing along the main axis only.
///
/// Each item's box is extended by half the gap on both main-axis sides so
/// the gap between two items is split between them. Where extended boxes
/// overlap, the item whose centre is closest to the pointer wins; on an
/// exact tie the earlier item in baseline order wins.
pub fn find_item_at_position<'a>(
    bounds: &'a ItemBoundsSnapshot,
    pointer: Point,
    direction: FlexDirection,
    gap: f64,
) -> Option<&'a str> {
    let half_gap = gap / 2.0;
    let horizontal = direction.is_horizontal();
    let mut closest: Option<(&str, f64)> = None;

    for (id, rect) in bounds.iter() {
        let (start, end, cursor, center) = if horizontal {
            (rect.left, rect.right(), pointer.x, rect.center().x)
        } else {
            (rect.top, rect.bottom(), pointer.y, rect.center().y)
        };
        if cursor < start - half_gap || cursor > end + half_gap {
            continue;
        }
        let distance = (cursor - center).abs();
        if closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((id, distance));
        }
    }

    closest.map(|(id, _)| id)
}

/// Where the pointer sits relative to the whole sequence when it is not over
/// any item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outside {
    Before,
    After,
    Between,
}

fn outside_position(
    bounds: &ItemBoundsSnapshot,
    pointer: Point,
    direction: FlexDirection,
    gap: f64,
) -> Outside {
    let (Some(first), Some(last)) = (bounds.first(), bounds.last()) else {
        return Outside::Between;
    };
    let half_gap = gap / 2.0;
    // Reversed sequences start at the far edge, so the first item is the
    // one with the larger coordinate.
    let (low, high) = if direction.is_reversed() {
        (last, first)
    } else {
        (first, last)
    };
    let (low_bound, high_bound, cursor) = if direction.is_horizontal() {
        (low.left - half_gap, high.right() + half_gap, pointer.x)
    } else {
        (low.top - half_gap, high.bottom() + half_gap, pointer.y)
    };
    let (below, above) = if direction.is_reversed() {
        (Outside::After, Outside::Before)
    } else {
        (Outside::Before, Outside::After)
    };
    if cursor < low_bound {
        below
    } else if cursor > high_bound {
        above
    } else {
        Outside::Between
    }
}

/// New visual order for a drag of `dragged_id` with the pointer at `pointer`.
///
/// Returns `None` when the pointer is in the gap between two items, or when
/// the dragged item is not part of the baseline. Callers keep whatever order
/// they showed last in that case.
pub fn calculate_new_order(
    dragged_id: &str,
    pointer: Point,
    bounds: &ItemBoundsSnapshot,
    direction: FlexDirection,
    gap: f64,
) -> Option<Vec<String>> {
    let baseline = bounds.order();
    let dragged_index = bounds.index_of(dragged_id)?;

    if let Some(hovered) = find_item_at_position(bounds, pointer, direction, gap) {
        let target_index = bounds.index_of(hovered)?;
        if target_index == dragged_index {
            return Some(baseline.to_vec());
        }
        let mut order = baseline.to_vec();
        let dragged = order.remove(dragged_index);
        order.insert(target_index, dragged);
        return Some(order);
    }

    match outside_position(bounds, pointer, direction, gap) {
        Outside::Before => {
            let mut order = baseline.to_vec();
            let dragged = order.remove(dragged_index);
            order.insert(0, dragged);
            Some(order)
        }
        Outside::After => {
            let mut order = baseline.to_vec();
            let dragged = order.remove(dragged_index);
            order.push(dragged);
            Some(order)
        }
        Outside::Between => None,
    }
}

/// Translations that show `new_order` without committing it.
///
/// Every item whose slot changed shifts by the dragged item's size plus the
/// gap, toward the slot the dragged item vacated. The placeholder travels
/// the summed extent of the items the dragged item passed. Reversed
/// directions flip every sign. An externally inserted item is drawn where
/// its placeholder is.
pub fn calculate_transforms(
    dragged_id: &str,
    new_order: &[String],
    dragged_rect: Rect,
    bounds: &ItemBoundsSnapshot,
    direction: FlexDirection,
    gap: f64,
) -> ReorderTransforms {
    let horizontal = direction.is_horizontal();
    let flip = if direction.is_reversed() { -1.0 } else { 1.0 };
    let along = |amount: f64| {
        if horizontal {
            Offset::new(amount, 0.0)
        } else {
            Offset::new(0.0, amount)
        }
    };
    let main_size = |rect: Rect| if horizontal { rect.width } else { rect.height };
    let dragged_size = main_size(dragged_rect) + gap;
    let baseline = bounds.order();

    let mut transforms = ReorderTransforms::default();

    let old_index = bounds.index_of(dragged_id);
    let new_index = new_order.iter().position(|id| id == dragged_id);
    if let (Some(old_index), Some(new_index)) = (old_index, new_index)
        && old_index != new_index
    {
        let (start, end) = (old_index.min(new_index), old_index.max(new_index));
        let travelled: f64 = baseline[start..=end.min(baseline.len() - 1)]
            .iter()
            .filter(|id| id.as_str() != dragged_id)
            .filter_map(|id| bounds.get(id))
            .map(|rect| main_size(rect) + gap)
            .sum();
        let sign = if new_index < old_index { -1.0 } else { 1.0 };
        transforms.placeholder = along(travelled * sign * flip);
    }

    for (old, id) in baseline.iter().enumerate() {
        if id == dragged_id {
            continue;
        }
        let offset = match new_order.iter().position(|entry| entry == id) {
            Some(new) if new != old => {
                let sign = if new < old { -1.0 } else { 1.0 };
                along(sign * dragged_size * flip)
            }
            _ => Offset::ZERO,
        };
        transforms.items.insert(id.clone(), offset);
    }

    if dragged_id.starts_with(EXTERNAL_ITEM_PREFIX) {
        transforms
            .items
            .insert(dragged_id.to_string(), transforms.placeholder);
    }

    transforms
}

/// Slot for an item entering from another container.
///
/// The hovered item's baseline index, 0 before the first item, and the end
/// of the sequence after the last item or in a gap.
pub fn calculate_initial_order_for_external_item(
    pointer: Point,
    bounds: &ItemBoundsSnapshot,
    direction: FlexDirection,
    gap: f64,
) -> usize {
    if bounds.is_empty() {
        return 0;
    }
    if let Some(index) = find_item_at_position(bounds, pointer, direction, gap)
        .and_then(|hovered| bounds.index_of(hovered))
    {
        return index;
    }
    match outside_position(bounds, pointer, direction, gap) {
        Outside::Before => 0,
        Outside::After | Outside::Between => bounds.len(),
    }
}
