use std::collections::HashSet;

use crate::error::{LayoutError, LayoutResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignSelf {
    #[default]
    Auto,
    FlexStart,
    FlexEnd,
    Center,
    Stretch,
    Baseline,
}

/// One entry of a flex layout. `order` is the committed slot; sizes come
/// from grow/shrink/basis and the min/max limits.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexLayoutItem {
    pub id: String,
    pub order: i32,
    pub grow: f64,
    pub shrink: f64,
    /// Preferred main-axis size in pixels; the measurer's default when unset.
    pub basis: Option<f64>,
    pub align_self: Option<AlignSelf>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
    pub is_static: bool,
    pub is_draggable: Option<bool>,
    pub moved: bool,
    pub is_placeholder: bool,
    pub is_hidden: bool,
}

impl Default for FlexLayoutItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            order: 0,
            grow: 0.0,
            shrink: 1.0,
            basis: None,
            align_self: None,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            is_static: false,
            is_draggable: None,
            moved: false,
            is_placeholder: false,
            is_hidden: false,
        }
    }
}

impl FlexLayoutItem {
    pub fn new(id: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            order,
            ..Self::default()
        }
    }

    pub fn with_grow(mut self, grow: f64) -> Self {
        self.grow = grow;
        self
    }

    pub fn with_shrink(mut self, shrink: f64) -> Self {
        self.shrink = shrink;
        self
    }

    pub fn with_basis(mut self, basis: f64) -> Self {
        self.basis = Some(basis);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn can_drag(&self, container_default: bool) -> bool {
        if self.is_static {
            return self.is_draggable == Some(true);
        }
        self.is_draggable.unwrap_or(container_default)
    }
}

pub fn get_flex_item<'a>(layout: &'a [FlexLayoutItem], id: &str) -> Option<&'a FlexLayoutItem> {
    layout.iter().find(|item| item.id == id)
}

pub fn validate_flex_layout(container: &str, layout: &[FlexLayoutItem]) -> LayoutResult<()> {
    let mut seen = HashSet::with_capacity(layout.len());
    for (index, item) in layout.iter().enumerate() {
        if item.id.is_empty() {
            return Err(LayoutError::EmptyId { index });
        }
        if !seen.insert(item.id.as_str()) {
            return Err(LayoutError::DuplicateId {
                container: container.to_string(),
                id: item.id.clone(),
            });
        }
        if !item.grow.is_finite() || !item.shrink.is_finite() {
            return Err(LayoutError::InvalidConfig(format!(
                "item `{}` has a non-finite grow or shrink factor",
                item.id
            )));
        }
        check_limits(&item.id, "width", item.min_width, item.max_width)?;
        check_limits(&item.id, "height", item.min_height, item.max_height)?;
    }
    Ok(())
}

fn check_limits(id: &str, field: &'static str, min: Option<f64>, max: Option<f64>) -> LayoutResult<()> {
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(LayoutError::ContradictoryConstraint {
            id: id.to_string(),
            field,
            min,
            max,
        });
    }
    Ok(())
}

/// Clamps negative orders and grow factors to zero and resets a negative
/// shrink factor to the default of one.
pub fn normalize_flex_layout(layout: &[FlexLayoutItem]) -> Vec<FlexLayoutItem> {
    layout
        .iter()
        .cloned()
        .map(|mut item| {
            item.order = item.order.max(0);
            if item.grow < 0.0 {
                item.grow = 0.0;
            }
            if item.shrink < 0.0 {
                item.shrink = 1.0;
            }
            item
        })
        .collect()
}

/// Stable sort by `order`; ties keep their layout position.
pub fn sort_by_order(layout: &[FlexLayoutItem]) -> Vec<FlexLayoutItem> {
    let mut sorted = layout.to_vec();
    sorted.sort_by_key(|item| item.order);
    sorted
}

/// Rebuilds a layout for the given ids. Known ids keep their entry, new ids
/// get a default entry whose order is their position in `ids`.
pub fn synchronize_flex_layout(
    container: &str,
    layout: &[FlexLayoutItem],
    ids: &[String],
) -> LayoutResult<Vec<FlexLayoutItem>> {
    validate_flex_layout(container, layout)?;
    let out: Vec<FlexLayoutItem> = ids
        .iter()
        .enumerate()
        .map(|(index, id)| match get_flex_item(layout, id) {
            Some(existing) => existing.clone(),
            None => FlexLayoutItem::new(id.clone(), index as i32),
        })
        .collect();
    validate_flex_layout(container, &out)?;
    Ok(normalize_flex_layout(&out))
}

/// Assigns each id in `sequence` its index as order. Items not named keep
/// their order.
///
/// `sequence` lists ids from the main-start edge, the same way a bounds
/// snapshot orders them. In `row-reverse` and `column-reverse` the main-start
/// edge is the far one, which is where `order` 0 renders, so a reversed
/// direction needs no mirroring here.
pub fn apply_order(layout: &[FlexLayoutItem], sequence: &[String]) -> Vec<FlexLayoutItem> {
    layout
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if let Some(slot) = sequence.iter().position(|id| *id == item.id) {
                item.order = slot as i32;
            }
            item
        })
        .collect()
}

/// Replaces orders with their dense rank, keeping relative order and the
/// array itself untouched. Ties keep array order.
pub fn compact_orders(layout: &[FlexLayoutItem]) -> Vec<FlexLayoutItem> {
    let mut ranked: Vec<usize> = (0..layout.len()).collect();
    ranked.sort_by_key(|&index| (layout[index].order, index));
    let mut out = layout.to_vec();
    for (rank, index) in ranked.into_iter().enumerate() {
        out[index].order = rank as i32;
    }
    out
}

/// Whether the orders form exactly `0..n`.
pub fn is_dense(layout: &[FlexLayoutItem]) -> bool {
    let mut orders: Vec<i32> = layout.iter().map(|item| item.order).collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(index, order)| *order == index as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_fixes_negative_values() {
        let mut item = FlexLayoutItem::new("a", -3);
        item.grow = -1.0;
        item.shrink = -2.0;
        let out = normalize_flex_layout(&[item]);
        assert_eq!(out[0].order, 0);
        assert_eq!(out[0].grow, 0.0);
        assert_eq!(out[0].shrink, 1.0);
    }

    #[test]
    fn apply_order_maps_sequence_slots() {
        let layout = vec![
            FlexLayoutItem::new("a", 0),
            FlexLayoutItem::new("b", 1),
            FlexLayoutItem::new("c", 2),
        ];
        let sequence = vec!["b".to_string(), "c".to_string(), "a".to_string()];
        let out = apply_order(&layout, &sequence);
        assert_eq!(
            out.iter().map(|i| i.order).collect::<Vec<_>>(),
            vec![2, 0, 1]
        );
        assert!(is_dense(&out));
    }

    #[test]
    fn compact_orders_closes_holes() {
        let layout = vec![
            FlexLayoutItem::new("a", 9),
            FlexLayoutItem::new("b", 2),
            FlexLayoutItem::new("c", 5),
        ];
        let out = compact_orders(&layout);
        assert_eq!(
            out.iter().map(|i| (i.id.as_str(), i.order)).collect::<Vec<_>>(),
            vec![("a", 2), ("b", 0), ("c", 1)]
        );
    }

    #[test]
    fn synchronize_keeps_known_and_adds_new() {
        let layout = vec![FlexLayoutItem::new("a", 4).with_grow(2.0)];
        let ids = vec!["a".to_string(), "b".to_string()];
        let out = synchronize_flex_layout("row", &layout, &ids).unwrap();
        assert_eq!(out[0].grow, 2.0);
        assert_eq!(out[0].order, 4);
        assert_eq!((out[1].id.as_str(), out[1].order, out[1].shrink), ("b", 1, 1.0));
    }

    #[test]
    fn contradictory_limits_are_rejected() {
        let mut item = FlexLayoutItem::new("a", 0);
        item.min_width = Some(200.0);
        item.max_width = Some(100.0);
        assert!(matches!(
            validate_flex_layout("row", &[item]),
            Err(LayoutError::ContradictoryConstraint { field: "width", .. })
        ));
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let layout = vec![
            FlexLayoutItem::new("x", 1),
            FlexLayoutItem::new("y", 0),
            FlexLayoutItem::new("z", 1),
        ];
        let ids: Vec<_> = sort_by_order(&layout).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["y", "x", "z"]);
    }
}
