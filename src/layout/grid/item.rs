use std::collections::HashSet;

use crate::error::{LayoutError, LayoutResult};

/// One entry of a grid layout, measured in cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridLayoutItem {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub min_w: Option<i32>,
    pub max_w: Option<i32>,
    pub min_h: Option<i32>,
    pub max_h: Option<i32>,
    pub is_static: bool,
    pub is_draggable: Option<bool>,
    pub is_resizable: Option<bool>,
    pub moved: bool,
    pub is_placeholder: bool,
    pub is_hidden: bool,
}

impl GridLayoutItem {
    pub fn new(id: impl Into<String>, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            ..Self::default()
        }
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_width_limits(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_w = min;
        self.max_w = max;
        self
    }

    pub fn with_height_limits(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_h = min;
        self.max_h = max;
        self
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Whether the item takes part in collision checks at all.
    pub fn is_solid(&self) -> bool {
        !self.is_hidden && self.w > 0 && self.h > 0
    }

    /// Static items only move when they explicitly opt in.
    pub fn can_drag(&self, container_default: bool) -> bool {
        if self.is_static {
            return self.is_draggable == Some(true);
        }
        self.is_draggable.unwrap_or(container_default)
    }

    pub fn can_resize(&self, container_default: bool) -> bool {
        if self.is_static {
            return false;
        }
        self.is_resizable.unwrap_or(container_default)
    }

    /// Width clamped to the item's own limits and the column count.
    pub fn clamp_width(&self, w: i32, columns: i32) -> i32 {
        let min = self.min_w.unwrap_or(1).max(1);
        let max = self.max_w.unwrap_or(i32::MAX).min(columns).max(min);
        w.clamp(min, max)
    }

    pub fn clamp_height(&self, h: i32) -> i32 {
        let min = self.min_h.unwrap_or(1).max(1);
        let max = self.max_h.unwrap_or(i32::MAX).max(min);
        h.clamp(min, max)
    }
}

pub fn get_layout_item<'a>(layout: &'a [GridLayoutItem], id: &str) -> Option<&'a GridLayoutItem> {
    layout.iter().find(|item| item.id == id)
}

pub fn position_of(layout: &[GridLayoutItem], id: &str) -> Option<usize> {
    layout.iter().position(|item| item.id == id)
}

/// Rejects layouts the packing algorithms cannot work with: empty or
/// duplicated ids, and min/max pairs that contradict each other.
pub fn validate_layout(container: &str, layout: &[GridLayoutItem]) -> LayoutResult<()> {
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
        check_limits(&item.id, "width", item.min_w, item.max_w)?;
        check_limits(&item.id, "height", item.min_h, item.max_h)?;
    }
    Ok(())
}

fn check_limits(id: &str, field: &'static str, min: Option<i32>, max: Option<i32>) -> LayoutResult<()> {
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(LayoutError::ContradictoryConstraint {
            id: id.to_string(),
            field,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 0, 1, 1),
            GridLayoutItem::new("a", 1, 0, 1, 1),
        ];
        assert_eq!(
            validate_layout("grid", &layout),
            Err(LayoutError::DuplicateId {
                container: "grid".into(),
                id: "a".into()
            })
        );
    }

    #[test]
    fn contradictory_limits_are_rejected() {
        let layout = vec![GridLayoutItem::new("a", 0, 0, 1, 1).with_width_limits(Some(4), Some(2))];
        assert!(matches!(
            validate_layout("grid", &layout),
            Err(LayoutError::ContradictoryConstraint { field: "width", .. })
        ));
    }

    #[test]
    fn empty_id_reports_index() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 0, 1, 1),
            GridLayoutItem::new("", 0, 1, 1, 1),
        ];
        assert_eq!(
            validate_layout("grid", &layout),
            Err(LayoutError::EmptyId { index: 1 })
        );
    }

    #[test]
    fn static_items_need_explicit_opt_in_to_drag() {
        let mut item = GridLayoutItem::new("a", 0, 0, 1, 1).fixed();
        assert!(!item.can_drag(true));
        item.is_draggable = Some(true);
        assert!(item.can_drag(false));
    }

    #[test]
    fn clamp_width_respects_columns_and_limits() {
        let item = GridLayoutItem::new("a", 0, 0, 1, 1).with_width_limits(Some(2), Some(10));
        assert_eq!(item.clamp_width(1, 12), 2);
        assert_eq!(item.clamp_width(11, 12), 10);
        assert_eq!(item.clamp_width(11, 6), 6);
    }
}
