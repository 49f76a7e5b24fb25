//! Pixel geometry and the conversions between pixels and grid cells.

use crate::layout::grid::GridConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Translation applied to an item for visual reordering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Axis-aligned rectangle in pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn translated(&self, offset: Offset) -> Rect {
        Rect::new(
            self.left + offset.dx,
            self.top + offset.dy,
            self.width,
            self.height,
        )
    }
}

impl From<ratatui::layout::Rect> for Rect {
    fn from(rect: ratatui::layout::Rect) -> Self {
        Rect::new(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        )
    }
}

/// Pointer hit test used for drop targets. Edges are inclusive, so a pointer
/// resting exactly on the border of a target still counts as over it.
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.left && point.x <= rect.right() && point.y >= rect.top && point.y <= rect.bottom()
}

/// Everything needed to convert between pixels and cells for one grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionParams {
    pub columns: i32,
    pub row_height: f64,
    pub max_rows: i32,
    pub container_width: f64,
    pub margin: [f64; 2],
    pub container_padding: [f64; 2],
}

impl PositionParams {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            columns: config.columns,
            row_height: config.row_height,
            max_rows: config.max_rows,
            container_width: config.width,
            margin: config.margin,
            container_padding: config.container_padding.unwrap_or(config.margin),
        }
    }

    /// Width of a single column in pixels.
    pub fn column_width(&self) -> f64 {
        let columns = self.columns.max(1) as f64;
        (self.container_width
            - self.margin[0] * (columns - 1.0)
            - self.container_padding[0] * 2.0)
            / columns
    }
}

/// Pixel extent of `units` cells, including the margins between them.
pub fn cells_to_pixels(units: i32, unit_size: f64, margin: f64) -> f64 {
    (unit_size * units as f64 + (units - 1).max(0) as f64 * margin).round()
}

/// Pixel rectangle of an item placed at cell `(x, y)` with size `(w, h)`,
/// relative to the container origin.
pub fn calc_item_position(params: &PositionParams, x: i32, y: i32, w: i32, h: i32) -> Rect {
    let column_width = params.column_width();
    Rect::new(
        ((column_width + params.margin[0]) * x as f64 + params.container_padding[0]).round(),
        ((params.row_height + params.margin[1]) * y as f64 + params.container_padding[1]).round(),
        cells_to_pixels(w, column_width, params.margin[0]),
        cells_to_pixels(h, params.row_height, params.margin[1]),
    )
}

/// Cell under a pixel position, the inverse of [`calc_item_position`].
///
/// Rounds to the nearest cell and clamps so an item of size `item_w` x
/// `item_h` stays inside the column count and the row limit.
pub fn pixels_to_cell(
    params: &PositionParams,
    pixel_y: f64,
    pixel_x: f64,
    item_w: i32,
    item_h: i32,
) -> (i32, i32) {
    let column_width = params.column_width();
    let x = ((pixel_x - params.container_padding[0]) / (column_width + params.margin[0])).round();
    let y = ((pixel_y - params.container_padding[1]) / (params.row_height + params.margin[1])).round();
    let x = clamp_cell(x, 0, params.columns - item_w);
    let y = clamp_cell(y, 0, params.max_rows.saturating_sub(item_h));
    (x, y)
}

/// Cell size covering a pixel size, clamped to what fits from `(x, y)`.
pub fn calc_wh(params: &PositionParams, width: f64, height: f64, x: i32, y: i32) -> (i32, i32) {
    let column_width = params.column_width();
    let w = ((width + params.margin[0]) / (column_width + params.margin[0])).round();
    let h = ((height + params.margin[1]) / (params.row_height + params.margin[1])).round();
    let w = clamp_cell(w, 0, params.columns - x);
    let h = clamp_cell(h, 0, params.max_rows.saturating_sub(y));
    (w, h)
}

fn clamp_cell(value: f64, min: i32, max: i32) -> i32 {
    if !value.is_finite() {
        return min;
    }
    let value = value as i64;
    value.clamp(min as i64, (max as i64).max(min as i64)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PositionParams {
        // 1200px wide, 12 columns, no gutters: every column is 100px.
        PositionParams {
            columns: 12,
            row_height: 50.0,
            max_rows: i32::MAX,
            container_width: 1200.0,
            margin: [0.0, 0.0],
            container_padding: [0.0, 0.0],
        }
    }

    #[test]
    fn column_width_accounts_for_margins_and_padding() {
        let mut p = params();
        p.margin = [10.0, 10.0];
        p.container_padding = [10.0, 10.0];
        // (1200 - 110 - 20) / 12
        assert!((p.column_width() - 89.166_666).abs() < 1e-3);
    }

    #[test]
    fn pixels_to_cell_rounds_to_nearest() {
        let p = params();
        assert_eq!(pixels_to_cell(&p, 0.0, 0.0, 1, 1), (0, 0));
        assert_eq!(pixels_to_cell(&p, 74.0, 149.0, 1, 1), (1, 1));
        assert_eq!(pixels_to_cell(&p, 76.0, 151.0, 1, 1), (2, 2));
    }

    #[test]
    fn pixels_to_cell_clamps_inside_columns() {
        let p = params();
        // An item 4 wide can start no later than column 8.
        assert_eq!(pixels_to_cell(&p, 0.0, 5000.0, 4, 1), (8, 0));
        assert_eq!(pixels_to_cell(&p, -300.0, -300.0, 4, 1), (0, 0));
    }

    #[test]
    fn position_round_trips_through_cells() {
        let mut p = params();
        p.margin = [10.0, 10.0];
        p.container_padding = [10.0, 10.0];
        let rect = calc_item_position(&p, 3, 2, 2, 1);
        assert_eq!(pixels_to_cell(&p, rect.top, rect.left, 2, 1), (3, 2));
        assert_eq!(calc_wh(&p, rect.width, rect.height, 3, 2), (2, 1));
    }

    #[test]
    fn calc_wh_clamps_to_remaining_columns() {
        let p = params();
        assert_eq!(calc_wh(&p, 900.0, 100.0, 10, 0), (2, 2));
    }

    #[test]
    fn rect_contains_is_edge_inclusive() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect_contains(r, Point::new(10.0, 10.0)));
        assert!(rect_contains(r, Point::new(30.0, 30.0)));
        assert!(!rect_contains(r, Point::new(30.1, 15.0)));
    }
}
