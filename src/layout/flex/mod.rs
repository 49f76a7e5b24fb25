//! Single-line flex sequences: ordering, measurement and reorder math.

pub mod bounds;
pub mod flow;
pub mod item;
pub mod reorder;

pub use bounds::{ItemBoundsSnapshot, MeasureItems};
pub use flow::FlowMeasure;
pub use item::{
    AlignSelf, FlexLayoutItem, apply_order, compact_orders, get_flex_item, is_dense,
    normalize_flex_layout, sort_by_order, synchronize_flex_layout, validate_flex_layout,
};
pub use reorder::{
    ReorderTransforms, calculate_initial_order_for_external_item, calculate_new_order,
    calculate_transforms, find_item_at_position,
};

use crate::error::{LayoutError, LayoutResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    /// Main axis is horizontal.
    pub fn is_horizontal(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlexConfig {
    pub direction: FlexDirection,
    /// Pixels between adjacent items along the main axis.
    pub gap: f64,
    pub is_draggable: bool,
}

impl Default for FlexConfig {
    fn default() -> Self {
        Self {
            direction: FlexDirection::Row,
            gap: 0.0,
            is_draggable: true,
        }
    }
}

impl FlexConfig {
    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "gap must be non-negative, got {}",
                self.gap
            )));
        }
        Ok(())
    }
}
