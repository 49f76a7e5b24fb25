//! Converting an item between container coordinate systems.
//!
//! The default keeps an item's physical size: cells are turned into pixels
//! with the source geometry and back into the target's units, then clamped
//! to the item's own limits and the target's columns.

use crate::constants::FLEX_TO_GRID_FALLBACK_CELLS;
use crate::geometry::Size;
use crate::layout::flex::FlexLayoutItem;
use crate::layout::grid::GridLayoutItem;

use super::LayoutItem;
use super::registry::TargetGeometry;

/// Everything a transform gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub item: &'a LayoutItem,
    pub source: &'a TargetGeometry,
    pub target: &'a TargetGeometry,
    /// Rendered size of the item when the drag started, if known.
    pub measured_size: Option<Size>,
}

pub type TransformFn = Box<dyn Fn(&TransformContext<'_>) -> LayoutItem>;

/// Size-preserving conversion used when no override is registered.
pub fn default_transform(ctx: &TransformContext<'_>) -> LayoutItem {
    match (ctx.item, ctx.source, ctx.target) {
        (
            LayoutItem::Grid(item),
            TargetGeometry::Grid {
                columns: source_columns,
                row_height: source_row,
                width: source_width,
                ..
            },
            TargetGeometry::Grid {
                columns,
                row_height,
                width,
                ..
            },
        ) => {
            if source_columns == columns && source_row == row_height && source_width == width {
                return ctx.item.clone();
            }
            let pixel_w = cells_to_width(item.w, *source_columns, *source_width);
            let pixel_h = item.h as f64 * source_row;
            LayoutItem::Grid(resized_grid_item(
                item,
                width_to_cells(pixel_w, *columns, *width),
                height_to_cells(pixel_h, *row_height),
                *columns,
            ))
        }
        (
            LayoutItem::Grid(item),
            TargetGeometry::Grid {
                columns,
                row_height,
                width,
                ..
            },
            TargetGeometry::Flex { direction, .. },
        ) => {
            let to_width = |cells: i32| cells_to_width(cells, *columns, *width);
            let to_height = |cells: i32| cells as f64 * row_height;
            let basis = if direction.is_horizontal() {
                to_width(item.w)
            } else {
                to_height(item.h)
            };
            LayoutItem::Flex(FlexLayoutItem {
                id: item.id.clone(),
                basis: Some(basis),
                min_width: item.min_w.map(to_width),
                max_width: item.max_w.map(to_width),
                min_height: item.min_h.map(to_height),
                max_height: item.max_h.map(to_height),
                is_draggable: item.is_draggable,
                ..FlexLayoutItem::default()
            })
        }
        (
            LayoutItem::Flex(item),
            TargetGeometry::Flex { .. },
            TargetGeometry::Grid {
                columns,
                row_height,
                width,
                ..
            },
        ) => {
            let (w, h) = match ctx.measured_size {
                Some(size) => (
                    width_to_cells(size.width, *columns, *width),
                    height_to_cells(size.height, *row_height),
                ),
                None => (FLEX_TO_GRID_FALLBACK_CELLS, FLEX_TO_GRID_FALLBACK_CELLS),
            };
            let to_w = |px: f64| width_to_cells(px, *columns, *width);
            let to_h = |px: f64| height_to_cells(px, *row_height);
            let grid = GridLayoutItem {
                id: item.id.clone(),
                min_w: item.min_width.map(to_w),
                max_w: item.max_width.map(to_w),
                min_h: item.min_height.map(to_h),
                max_h: item.max_height.map(to_h),
                is_draggable: item.is_draggable,
                ..GridLayoutItem::default()
            };
            LayoutItem::Grid(resized_grid_item(&grid, w, h, *columns))
        }
        (LayoutItem::Flex(item), TargetGeometry::Flex { .. }, TargetGeometry::Flex { .. }) => {
            LayoutItem::Flex(FlexLayoutItem {
                id: item.id.clone(),
                grow: item.grow,
                shrink: item.shrink,
                align_self: item.align_self,
                min_width: item.min_width,
                max_width: item.max_width,
                min_height: item.min_height,
                max_height: item.max_height,
                is_draggable: item.is_draggable,
                ..FlexLayoutItem::default()
            })
        }
        _ => ctx.item.clone(),
    }
}

fn cells_to_width(cells: i32, columns: i32, width: f64) -> f64 {
    cells as f64 / columns.max(1) as f64 * width
}

fn width_to_cells(pixels: f64, columns: i32, width: f64) -> i32 {
    if width <= 0.0 {
        return 1;
    }
    ((pixels / width * columns as f64).round() as i32).max(1)
}

fn height_to_cells(pixels: f64, row_height: f64) -> i32 {
    if row_height <= 0.0 {
        return 1;
    }
    ((pixels / row_height).round() as i32).max(1)
}

/// `item` with a new size, clamped to its limits and the column count.
/// Position is reset; the target places the item.
fn resized_grid_item(item: &GridLayoutItem, w: i32, h: i32, columns: i32) -> GridLayoutItem {
    let mut w = w.max(1);
    let mut h = h.max(1);
    if let Some(min) = item.min_w {
        w = w.max(min);
    }
    if let Some(max) = item.max_w {
        w = w.min(max);
    }
    if let Some(min) = item.min_h {
        h = h.max(min);
    }
    if let Some(max) = item.max_h {
        h = h.min(max);
    }
    GridLayoutItem {
        w: w.min(columns),
        h,
        x: 0,
        y: 0,
        moved: false,
        is_static: false,
        is_placeholder: false,
        is_hidden: false,
        ..item.clone()
    }
}
