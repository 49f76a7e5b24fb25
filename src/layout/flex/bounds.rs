use std::collections::BTreeMap;

use crate::constants::EXTERNAL_ITEM_PREFIX;
use crate::geometry::Rect;

use super::item::FlexLayoutItem;

/// Source of rendered item rectangles.
///
/// Rectangles are the item's untransformed layout box. `None` means the item
/// is not rendered (yet) and is left out of the snapshot.
pub trait MeasureItems {
    fn measure(&self, id: &str) -> Option<Rect>;
}

impl<F> MeasureItems for F
where
    F: Fn(&str) -> Option<Rect>,
{
    fn measure(&self, id: &str) -> Option<Rect> {
        self(id)
    }
}

impl MeasureItems for BTreeMap<String, Rect> {
    fn measure(&self, id: &str) -> Option<Rect> {
        self.get(id).copied()
    }
}

/// Item rectangles captured at drag start, keyed by id, plus the baseline
/// order they were captured in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemBoundsSnapshot {
    bounds: BTreeMap<String, Rect>,
    order: Vec<String>,
}

impl ItemBoundsSnapshot {
    /// Measures every item of `layout` and orders them by their committed
    /// `order`, not by where they currently appear on screen.
    pub fn collect<M: MeasureItems + ?Sized>(measure: &M, layout: &[FlexLayoutItem]) -> Self {
        let mut measured: Vec<(i32, usize, &str, Rect)> = layout
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                measure
                    .measure(&item.id)
                    .map(|rect| (item.order, index, item.id.as_str(), rect))
            })
            .collect();
        measured.sort_by_key(|(order, index, _, _)| (*order, *index));

        let mut snapshot = Self::default();
        for (_, _, id, rect) in measured {
            snapshot.bounds.insert(id.to_string(), rect);
            snapshot.order.push(id.to_string());
        }
        snapshot
    }

    /// Builds a snapshot from rectangles already in baseline order.
    pub fn from_ordered<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Rect)>,
        S: Into<String>,
    {
        let mut snapshot = Self::default();
        for (id, rect) in entries {
            let id = id.into();
            snapshot.bounds.insert(id.clone(), rect);
            snapshot.order.push(id);
        }
        snapshot
    }

    /// Refreshes widths and heights while keeping every captured origin.
    ///
    /// Siblings grow and shrink as the dragged item moves around, but their
    /// origins must stay in the baseline frame. The external placeholder
    /// keeps its first measurement.
    pub fn update_item_sizes<M: MeasureItems + ?Sized>(&mut self, measure: &M) {
        for (id, rect) in self.bounds.iter_mut() {
            if id.starts_with(EXTERNAL_ITEM_PREFIX) {
                continue;
            }
            if let Some(current) = measure.measure(id) {
                rect.width = current.width;
                rect.height = current.height;
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Rect> {
        self.bounds.get(id).copied()
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|entry| entry == id)
    }

    pub fn first(&self) -> Option<Rect> {
        self.order.first().and_then(|id| self.get(id))
    }

    pub fn last(&self) -> Option<Rect> {
        self.order.last().and_then(|id| self.get(id))
    }

    /// Entries in baseline order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rect)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.bounds.get(id).map(|rect| (id.as_str(), *rect)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_orders_by_committed_order() {
        let layout = vec![
            FlexLayoutItem::new("c", 2),
            FlexLayoutItem::new("a", 0),
            FlexLayoutItem::new("b", 1),
        ];
        // Screen positions deliberately disagree with `order`.
        let measure = |id: &str| match id {
            "a" => Some(Rect::new(200.0, 0.0, 50.0, 20.0)),
            "b" => Some(Rect::new(0.0, 0.0, 50.0, 20.0)),
            "c" => Some(Rect::new(100.0, 0.0, 50.0, 20.0)),
            _ => None,
        };
        let snapshot = ItemBoundsSnapshot::collect(&measure, &layout);
        assert_eq!(snapshot.order(), ["a", "b", "c"]);
        assert_eq!(snapshot.get("a").map(|r| r.left), Some(200.0));
    }

    #[test]
    fn unmeasured_items_are_skipped() {
        let layout = vec![FlexLayoutItem::new("a", 0), FlexLayoutItem::new("ghost", 1)];
        let measure = |id: &str| (id == "a").then(|| Rect::new(0.0, 0.0, 10.0, 10.0));
        let snapshot = ItemBoundsSnapshot::collect(&measure, &layout);
        assert_eq!(snapshot.order(), ["a"]);
    }

    #[test]
    fn update_sizes_keeps_origin_and_skips_external() {
        let mut snapshot = ItemBoundsSnapshot::from_ordered([
            ("a", Rect::new(10.0, 5.0, 100.0, 20.0)),
            ("__external__x", Rect::new(120.0, 5.0, 80.0, 20.0)),
        ]);
        let measure = |_: &str| Some(Rect::new(999.0, 999.0, 60.0, 30.0));
        snapshot.update_item_sizes(&measure);
        assert_eq!(snapshot.get("a"), Some(Rect::new(10.0, 5.0, 60.0, 30.0)));
        assert_eq!(
            snapshot.get("__external__x"),
            Some(Rect::new(120.0, 5.0, 80.0, 20.0))
        );
    }
}
