//! Shared crate-wide constants.

use std::time::Duration;

/// Prefix of the temporary layout entry a container inserts while an item
/// from another container hovers over it.
///
/// The entry is finalized under the original id when the drop lands, and
/// discarded when the pointer leaves or the drag is cancelled.
pub const EXTERNAL_ITEM_PREFIX: &str = "__external__";

/// Id of the default item template used by native (non cross-container)
/// drops onto a grid.
pub const DROPPING_ITEM_ID: &str = "__dropping-elem__";

/// How long a measured container rectangle stays valid for hit testing.
///
/// Bounds queries are the expensive part of every pointer move. Containers
/// that are not moving keep the same rectangle, so a short cache avoids one
/// query per target per frame. Resizes invalidate explicitly.
pub const BOUNDS_CACHE_TTL: Duration = Duration::from_millis(100);

/// Frames to wait after a layout-affecting mutation before measuring.
///
/// One frame only guarantees the mutation is scheduled; the second one
/// guarantees it has been rendered.
pub const BOUNDS_SETTLE_FRAMES: u32 = 2;

/// Frames for which transitions stay suspended after an order commit.
pub const TRANSITION_SUSPEND_FRAMES: u32 = 1;

/// Cells used for each axis when an unmeasured flex item lands in a grid.
pub const FLEX_TO_GRID_FALLBACK_CELLS: i32 = 2;

/// Grid defaults.
pub const DEFAULT_COLUMNS: i32 = 12;
pub const DEFAULT_ROW_HEIGHT: f64 = 150.0;
pub const DEFAULT_MARGIN: [f64; 2] = [10.0, 10.0];
