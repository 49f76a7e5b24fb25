//! Reference flex flow: computes where a single-line flex container places
//! its items. Hosts without their own renderer measure against this.

use std::collections::BTreeMap;

use crate::geometry::Rect;

use super::FlexDirection;
use super::item::{AlignSelf, FlexLayoutItem, sort_by_order};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowMeasure {
    /// Container content box.
    pub container: Rect,
    pub direction: FlexDirection,
    pub gap: f64,
    /// Main-axis size of an item without a basis.
    pub default_basis: f64,
    /// Cross-axis size of an item that does not stretch.
    pub default_cross: f64,
}

impl FlowMeasure {
    pub fn new(container: Rect, direction: FlexDirection, gap: f64) -> Self {
        Self {
            container,
            direction,
            gap,
            default_basis: 10.0,
            default_cross: 3.0,
        }
    }

    /// Rectangles of every visible item, keyed by id. Hidden items take no
    /// space and are left out.
    pub fn layout(&self, layout: &[FlexLayoutItem]) -> BTreeMap<String, Rect> {
        let horizontal = self.direction.is_horizontal();
        let items: Vec<FlexLayoutItem> = sort_by_order(layout)
            .into_iter()
            .filter(|item| !item.is_hidden)
            .collect();
        let mut rects = BTreeMap::new();
        if items.is_empty() {
            return rects;
        }

        let (main_extent, cross_extent) = if horizontal {
            (self.container.width, self.container.height)
        } else {
            (self.container.height, self.container.width)
        };
        let limits = |item: &FlexLayoutItem| {
            if horizontal {
                (item.min_width, item.max_width)
            } else {
                (item.min_height, item.max_height)
            }
        };
        let clamp_main = |item: &FlexLayoutItem, size: f64| {
            let (min, max) = limits(item);
            clamp_opt(size, min, max).max(0.0)
        };

        let mut sizes: Vec<f64> = items
            .iter()
            .map(|item| clamp_main(item, item.basis.unwrap_or(self.default_basis)))
            .collect();
        let gaps = self.gap * (items.len() - 1) as f64;
        let free = main_extent - sizes.iter().sum::<f64>() - gaps;

        if free > 0.0 {
            let total_grow: f64 = items.iter().map(|item| item.grow).sum();
            if total_grow > 0.0 {
                for (size, item) in sizes.iter_mut().zip(&items) {
                    *size = clamp_main(item, *size + free * item.grow / total_grow);
                }
            }
        } else if free < 0.0 {
            let total_scaled: f64 = items
                .iter()
                .zip(&sizes)
                .map(|(item, size)| item.shrink * size)
                .sum();
            if total_scaled > 0.0 {
                let scaled: Vec<f64> = items
                    .iter()
                    .zip(&sizes)
                    .map(|(item, size)| item.shrink * size)
                    .collect();
                for ((size, item), weight) in sizes.iter_mut().zip(&items).zip(scaled) {
                    *size = clamp_main(item, *size + free * weight / total_scaled);
                }
            }
        }

        let used: f64 = sizes.iter().sum::<f64>() + gaps;
        let (main_origin, cross_origin) = if horizontal {
            (self.container.left, self.container.top)
        } else {
            (self.container.top, self.container.left)
        };
        // Reversed directions start at the far edge.
        let mut cursor = if self.direction.is_reversed() {
            main_origin + main_extent.max(used)
        } else {
            main_origin
        };

        for (item, size) in items.iter().zip(sizes) {
            let (cross_size, cross_offset) = self.cross_placement(item, cross_extent);
            let main_start = if self.direction.is_reversed() {
                cursor -= size;
                let start = cursor;
                cursor -= self.gap;
                start
            } else {
                let start = cursor;
                cursor += size + self.gap;
                start
            };
            let rect = if horizontal {
                Rect::new(main_start, cross_origin + cross_offset, size, cross_size)
            } else {
                Rect::new(cross_origin + cross_offset, main_start, cross_size, size)
            };
            rects.insert(item.id.clone(), rect);
        }
        rects
    }

    fn cross_placement(&self, item: &FlexLayoutItem, cross_extent: f64) -> (f64, f64) {
        let (min, max) = if self.direction.is_horizontal() {
            (item.min_height, item.max_height)
        } else {
            (item.min_width, item.max_width)
        };
        let align = item.align_self.unwrap_or_default();
        let natural = match align {
            AlignSelf::Auto | AlignSelf::Stretch => cross_extent,
            _ => self.default_cross.min(cross_extent),
        };
        let size = clamp_opt(natural, min, max).max(0.0);
        let offset = match align {
            AlignSelf::FlexEnd => cross_extent - size,
            AlignSelf::Center => (cross_extent - size) / 2.0,
            _ => 0.0,
        };
        (size, offset)
    }
}

fn clamp_opt(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let value = max.map_or(value, |max| value.min(max));
    min.map_or(value, |min| value.max(min))
}
