//! Cell-grid packing: collisions, compaction, moves and resizes.

pub mod collision;
pub mod compact;
pub mod item;
pub mod moves;
pub mod resize;

pub use collision::{all_collisions, collides, first_collision};
pub use compact::{bottom, compact, sorted_indices};
pub use item::{GridLayoutItem, get_layout_item, validate_layout};
pub use moves::{MoveOptions, move_element};
pub use resize::{ResizeEdge, ResizeStep, resize_element};

use crate::constants::{DEFAULT_COLUMNS, DEFAULT_MARGIN, DEFAULT_ROW_HEIGHT, DROPPING_ITEM_ID};
use crate::error::{LayoutError, LayoutResult};

/// Axis along which a grid packs its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompactMode {
    #[default]
    Vertical,
    Horizontal,
    /// Items stay where they are put; only overlaps are pushed apart.
    None,
}

/// Host environment quirks a container must work around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropCapabilities {
    /// Native drag-over events bubbling up from child elements must be
    /// ignored, only events on the container root count.
    pub filter_child_drag_events: bool,
}

/// Template for items created by a native (non cross-container) drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppingItem {
    pub id: String,
    pub w: i32,
    pub h: i32,
}

impl Default for DroppingItem {
    fn default() -> Self {
        Self {
            id: DROPPING_ITEM_ID.to_string(),
            w: 1,
            h: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub columns: i32,
    pub row_height: f64,
    /// Container width in pixels.
    pub width: f64,
    pub margin: [f64; 2],
    /// Defaults to `margin` when unset.
    pub container_padding: Option<[f64; 2]>,
    pub max_rows: i32,
    pub compaction: CompactMode,
    pub allow_overlap: bool,
    pub prevent_collision: bool,
    pub is_draggable: bool,
    pub is_resizable: bool,
    pub is_droppable: bool,
    pub dropping_item: DroppingItem,
    pub capabilities: DropCapabilities,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            row_height: DEFAULT_ROW_HEIGHT,
            width: 1200.0,
            margin: DEFAULT_MARGIN,
            container_padding: None,
            max_rows: i32::MAX,
            compaction: CompactMode::Vertical,
            allow_overlap: false,
            prevent_collision: false,
            is_draggable: true,
            is_resizable: true,
            is_droppable: false,
            dropping_item: DroppingItem::default(),
            capabilities: DropCapabilities::default(),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> LayoutResult<()> {
        if self.columns < 1 {
            return Err(LayoutError::InvalidConfig(format!(
                "columns must be at least 1, got {}",
                self.columns
            )));
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "row height must be positive, got {}",
                self.row_height
            )));
        }
        if !(self.width.is_finite() && self.width >= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "width must be non-negative, got {}",
                self.width
            )));
        }
        let padding = self.container_padding.unwrap_or(self.margin);
        if self
            .margin
            .iter()
            .chain(padding.iter())
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(LayoutError::InvalidConfig(
                "margin and padding must be non-negative".into(),
            ));
        }
        if self.max_rows < 1 {
            return Err(LayoutError::InvalidConfig(format!(
                "max rows must be at least 1, got {}",
                self.max_rows
            )));
        }
        if self.dropping_item.id.is_empty() || self.dropping_item.w < 1 || self.dropping_item.h < 1 {
            return Err(LayoutError::InvalidConfig(
                "dropping item needs an id and a size of at least 1x1".into(),
            ));
        }
        Ok(())
    }

    pub fn move_options(&self) -> MoveOptions {
        MoveOptions {
            compaction: self.compaction,
            columns: self.columns,
            prevent_collision: self.prevent_collision,
            allow_overlap: self.allow_overlap,
        }
    }

    pub fn padding(&self) -> [f64; 2] {
        self.container_padding.unwrap_or(self.margin)
    }
}

/// Pixel height the container needs to show every row of `layout`.
///
/// `skip` names an item that should not count, typically a dragged item that
/// is collapsed while it hovers another container.
pub fn container_height(layout: &[GridLayoutItem], config: &GridConfig, skip: Option<&str>) -> f64 {
    let rows = layout
        .iter()
        .filter(|item| skip != Some(item.id.as_str()))
        .map(GridLayoutItem::bottom)
        .max()
        .unwrap_or(0)
        .max(0);
    let padding = config.padding()[1];
    rows as f64 * config.row_height + (rows - 1).max(0) as f64 * config.margin[1] + padding * 2.0
}

/// Normalizes coordinates and pulls every item back inside the columns.
///
/// Items overflowing the right edge are shifted left; items with a negative
/// origin are pinned to column 0 and stretched full width. Static items that
/// land on an earlier item are pushed down until they fit.
pub fn correct_bounds(layout: &mut [GridLayoutItem], columns: i32) {
    let mut earlier: Vec<GridLayoutItem> = Vec::with_capacity(layout.len());
    for item in layout.iter_mut() {
        item.w = item.w.clamp(1, columns.max(1));
        item.h = item.h.max(1);
        item.y = item.y.max(0);
        if item.right() > columns {
            item.x = columns - item.w;
        }
        if item.x < 0 {
            item.x = 0;
            item.w = columns;
        }
        if item.is_static {
            while first_collision(&earlier, item).is_some() {
                item.y += 1;
            }
        }
        earlier.push(item.clone());
    }
}

/// Rebuilds a layout for the given set of item ids.
///
/// Known ids keep their entry, unknown ids get a 1x1 entry appended below
/// everything else, entries for ids not in `ids` are dropped. The result is
/// bounds-corrected and compacted.
pub fn synchronize_layout(
    container: &str,
    layout: &[GridLayoutItem],
    ids: &[String],
    config: &GridConfig,
) -> LayoutResult<Vec<GridLayoutItem>> {
    validate_layout(container, layout)?;
    let mut out: Vec<GridLayoutItem> = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(existing) = get_layout_item(layout, id) {
            out.push(existing.clone());
        } else {
            let floor = bottom(&out).max(bottom(layout));
            out.push(GridLayoutItem::new(id.clone(), 0, floor, 1, 1));
        }
    }
    validate_layout(container, &out)?;
    correct_bounds(&mut out, config.columns);
    Ok(compact(
        &out,
        config.compaction,
        config.columns,
        config.allow_overlap,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GridConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_columns_is_rejected() {
        let config = GridConfig {
            columns: 0,
            ..GridConfig::default()
        };
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));
    }

    #[test]
    fn container_height_counts_rows_gaps_and_padding() {
        let config = GridConfig {
            row_height: 30.0,
            margin: [10.0, 10.0],
            ..GridConfig::default()
        };
        let layout = vec![
            GridLayoutItem::new("a", 0, 0, 1, 2),
            GridLayoutItem::new("b", 0, 2, 1, 1),
        ];
        // 3 rows, 2 gaps, padding on both sides.
        assert_eq!(container_height(&layout, &config, None), 90.0 + 20.0 + 20.0);
        assert_eq!(container_height(&layout, &config, Some("b")), 60.0 + 10.0 + 20.0);
    }

    #[test]
    fn correct_bounds_pulls_items_inside() {
        let mut layout = vec![
            GridLayoutItem::new("wide", 10, 0, 4, 1),
            GridLayoutItem::new("neg", -2, 1, 2, 1),
        ];
        correct_bounds(&mut layout, 12);
        assert_eq!((layout[0].x, layout[0].w), (8, 4));
        assert_eq!((layout[1].x, layout[1].w), (0, 12));
    }

    #[test]
    fn correct_bounds_stacks_colliding_statics() {
        let mut layout = vec![
            GridLayoutItem::new("s1", 0, 0, 2, 2).fixed(),
            GridLayoutItem::new("s2", 1, 1, 2, 2).fixed(),
        ];
        correct_bounds(&mut layout, 12);
        assert_eq!(layout[0].y, 0);
        assert_eq!(layout[1].y, 2);
    }

    #[test]
    fn synchronize_adds_missing_and_drops_stale() {
        let layout = vec![
            GridLayoutItem::new("keep", 0, 0, 2, 2),
            GridLayoutItem::new("stale", 2, 0, 2, 2),
        ];
        let ids = vec!["keep".to_string(), "new".to_string()];
        let out = synchronize_layout("grid", &layout, &ids, &GridConfig::default()).unwrap();
        let got: Vec<_> = out.iter().map(|i| (i.id.as_str(), i.x, i.y)).collect();
        assert_eq!(got, vec![("keep", 0, 0), ("new", 0, 2)]);
    }

    #[test]
    fn synchronize_rejects_duplicate_ids() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 0, 1, 1),
            GridLayoutItem::new("a", 1, 0, 1, 1),
        ];
        let ids = vec!["a".to_string()];
        assert!(matches!(
            synchronize_layout("grid", &layout, &ids, &GridConfig::default()),
            Err(LayoutError::DuplicateId { .. })
        ));
    }
}
