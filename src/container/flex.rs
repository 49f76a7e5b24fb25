//! Flex container: live reordering by transforms, committed on drop.
//!
//! While a drag runs the committed orders never change. Siblings are shifted
//! with [`ReorderTransforms`] computed against the bounds captured at drag
//! start, and the order is only written back when the gesture ends. Pointer
//! coordinates and measured rectangles must share one coordinate space.

use crate::constants::{BOUNDS_SETTLE_FRAMES, EXTERNAL_ITEM_PREFIX, TRANSITION_SUSPEND_FRAMES};
use crate::drag::DragMachine;
use crate::error::{LayoutError, LayoutResult};
use crate::frame::FrameScheduler;
use crate::geometry::{Offset, Point, Rect};
use crate::layout::flex::{
    FlexConfig, FlexLayoutItem, ItemBoundsSnapshot, MeasureItems, ReorderTransforms, apply_order,
    calculate_initial_order_for_external_item, calculate_new_order, calculate_transforms,
    compact_orders, get_flex_item, normalize_flex_layout, synchronize_flex_layout,
    validate_flex_layout,
};

use super::{DragEventData, LayoutEvent};

pub type FlexEvent = LayoutEvent<FlexLayoutItem>;

#[derive(Debug, Clone)]
struct GestureSnapshot {
    old_layout: Vec<FlexLayoutItem>,
    old_item: FlexLayoutItem,
}

/// An item from another container inserted into this row.
#[derive(Debug, Clone)]
struct ExternalInsert {
    old_layout: Vec<FlexLayoutItem>,
    external_id: String,
    /// Pointer recorded at insertion, consumed once bounds are measured.
    pending_pointer: Option<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameTask {
    CollectExternalBounds,
    ResumeTransitions,
}

#[derive(Debug, Clone)]
pub struct FlexContainer {
    id: String,
    config: FlexConfig,
    layout: Vec<FlexLayoutItem>,
    drag: DragMachine<GestureSnapshot>,
    bounds: ItemBoundsSnapshot,
    transforms: ReorderTransforms,
    current_order: Option<Vec<String>>,
    active: Option<FlexLayoutItem>,
    external: Option<ExternalInsert>,
    transitions_suspended: bool,
    frames: FrameScheduler<FrameTask>,
    pending_layout: Option<Vec<FlexLayoutItem>>,
    events: Vec<FlexEvent>,
}

impl FlexContainer {
    pub fn new(
        id: impl Into<String>,
        config: FlexConfig,
        layout: Vec<FlexLayoutItem>,
    ) -> LayoutResult<Self> {
        let id = id.into();
        config.validate()?;
        validate_flex_layout(&id, &layout)?;
        Ok(Self {
            id,
            config,
            layout: normalize_flex_layout(&layout),
            drag: DragMachine::default(),
            bounds: ItemBoundsSnapshot::default(),
            transforms: ReorderTransforms::default(),
            current_order: None,
            active: None,
            external: None,
            transitions_suspended: false,
            frames: FrameScheduler::default(),
            pending_layout: None,
            events: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &FlexConfig {
        &self.config
    }

    pub fn layout(&self) -> &[FlexLayoutItem] {
        &self.layout
    }

    pub fn item(&self, id: &str) -> Option<&FlexLayoutItem> {
        get_flex_item(&self.layout, id)
    }

    pub fn transforms(&self) -> &ReorderTransforms {
        &self.transforms
    }

    /// Visual translation of `id` for the current frame.
    pub fn offset(&self, id: &str) -> Offset {
        self.transforms.offset(id)
    }

    /// Order being previewed, if the pointer has produced one.
    pub fn current_order(&self) -> Option<&[String]> {
        self.current_order.as_deref()
    }

    /// Bounds captured at drag start or external insertion.
    pub fn bounds(&self) -> &ItemBoundsSnapshot {
        &self.bounds
    }

    pub fn active_placeholder(&self) -> Option<&FlexLayoutItem> {
        self.active.as_ref()
    }

    /// Set right after a commit so items jump to their new slot instead of
    /// animating back from their transformed position.
    pub fn transitions_suspended(&self) -> bool {
        self.transitions_suspended
    }

    pub fn has_external_item(&self) -> bool {
        self.external.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        !self.drag.is_idle()
    }

    fn is_busy(&self) -> bool {
        self.is_dragging() || self.external.is_some()
    }

    pub fn take_events(&mut self) -> Vec<FlexEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_config(&mut self, config: FlexConfig) -> LayoutResult<()> {
        config.validate()?;
        let flipped = config.direction.is_reversed() != self.config.direction.is_reversed();
        self.config = config;
        if flipped {
            self.transforms = ReorderTransforms::default();
        }
        Ok(())
    }

    /// Replaces the layout, or holds it back until a running gesture settles.
    pub fn set_layout(&mut self, layout: Vec<FlexLayoutItem>) -> LayoutResult<()> {
        validate_flex_layout(&self.id, &layout)?;
        if self.is_busy() {
            tracing::debug!(container = %self.id, "layout update deferred until gesture settles");
            self.pending_layout = Some(layout);
            return Ok(());
        }
        let before = self.layout.clone();
        self.commit_layout(normalize_flex_layout(&layout), &before);
        Ok(())
    }

    pub fn synchronize(&mut self, ids: &[String]) -> LayoutResult<()> {
        let base = self.pending_layout.as_deref().unwrap_or(&self.layout);
        let synced = synchronize_flex_layout(&self.id, base, ids)?;
        self.set_layout(synced)
    }

    pub fn on_drag_start<M: MeasureItems + ?Sized>(&mut self, id: &str, measure: &M) -> bool {
        if self.external.is_some() {
            return false;
        }
        let Some(item) = get_flex_item(&self.layout, id).cloned() else {
            tracing::trace!(container = %self.id, item = %id, "drag start on unknown item");
            return false;
        };
        if !item.can_drag(self.config.is_draggable) {
            return false;
        }
        let snapshot = GestureSnapshot {
            old_layout: self.layout.clone(),
            old_item: item.clone(),
        };
        if let Err(err) = self.drag.start(snapshot) {
            tracing::warn!(container = %self.id, item = %id, %err, "drag start rejected");
            return false;
        }
        self.bounds = ItemBoundsSnapshot::collect(measure, &self.layout);
        self.transforms = ReorderTransforms::default();
        self.current_order = None;
        self.active = Some(as_placeholder(&item, false));
        tracing::debug!(container = %self.id, item = %id, measured = self.bounds.len(), "drag start");
        self.events.push(LayoutEvent::DragStart(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(item.clone()),
            new_item: Some(item),
            placeholder: None,
        }));
        true
    }

    /// Updates the preview for a pointer at `pointer` while `id` is dragged.
    ///
    /// `dragged_rect` is the dragged item's size, used to shift siblings.
    /// With `collapse` set the item hovers another container: its slot is
    /// hidden and siblings return to their baseline.
    pub fn on_drag<M: MeasureItems + ?Sized>(
        &mut self,
        id: &str,
        pointer: Point,
        dragged_rect: Rect,
        collapse: bool,
        measure: &M,
    ) {
        let old_item = match self.drag.on_move() {
            Ok(snapshot) => snapshot.old_item.clone(),
            Err(err) => {
                tracing::trace!(container = %self.id, item = %id, %err, "drag step ignored");
                return;
            }
        };
        if get_flex_item(&self.layout, id).is_none() || self.bounds.is_empty() {
            return;
        }

        let new_order = if collapse {
            self.bounds.order().to_vec()
        } else {
            self.bounds.update_item_sizes(measure);
            calculate_new_order(id, pointer, &self.bounds, self.config.direction, self.config.gap)
                .or_else(|| self.current_order.clone())
                .unwrap_or_else(|| self.bounds.order().to_vec())
        };
        self.transforms = calculate_transforms(
            id,
            &new_order,
            dragged_rect,
            &self.bounds,
            self.config.direction,
            self.config.gap,
        );
        self.current_order = Some(new_order);

        for item in self.layout.iter_mut().filter(|item| item.id == id) {
            item.is_hidden = collapse;
        }
        let new_item = get_flex_item(&self.layout, id).cloned();
        let placeholder = new_item.as_ref().map(|item| as_placeholder(item, collapse));
        self.active = placeholder.clone();
        tracing::trace!(container = %self.id, item = %id, collapse, "drag");
        self.events.push(LayoutEvent::Drag(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(old_item),
            new_item,
            placeholder,
        }));
    }

    /// Writes the previewed order back as committed orders.
    pub fn on_drag_stop(&mut self, id: &str) {
        let snapshot = match self.drag.stop() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::trace!(container = %self.id, item = %id, %err, "drag stop ignored");
                return;
            }
        };
        let mut layout = self.layout.clone();
        for item in layout.iter_mut().filter(|item| item.id == id) {
            item.is_hidden = snapshot.old_item.is_hidden;
        }
        if let Some(order) = self.current_order.take()
            && !order.is_empty()
        {
            layout = compact_orders(&apply_order(&layout, &order));
        }
        self.reset_preview();
        self.suspend_transitions();
        tracing::debug!(container = %self.id, item = %id, "drag stop");
        self.events.push(LayoutEvent::DragStop(DragEventData {
            layout: layout.clone(),
            old_item: Some(snapshot.old_item),
            new_item: get_flex_item(&layout, id).cloned(),
            placeholder: None,
        }));
        self.commit_layout(layout, &snapshot.old_layout);
        self.settle_drag();
    }

    /// Ends the drag without committing and puts the pre-drag layout back.
    pub fn cancel_drag(&mut self) {
        let snapshot = match self.drag.cancel() {
            Ok(snapshot) => snapshot,
            Err(_) => return,
        };
        tracing::debug!(container = %self.id, item = %snapshot.old_item.id, "drag cancelled");
        self.layout = snapshot.old_layout;
        self.current_order = None;
        self.reset_preview();
        self.suspend_transitions();
        self.events.push(LayoutEvent::DragStop(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(snapshot.old_item.clone()),
            new_item: Some(snapshot.old_item),
            placeholder: None,
        }));
        self.settle_drag();
    }

    /// Previews an item from another container at `pointer`.
    ///
    /// The first call inserts a placeholder at the end of the row; it is
    /// moved to the pointer's slot once the row has been laid out with it,
    /// [`BOUNDS_SETTLE_FRAMES`] frames later. Returns whether the preview
    /// changed.
    pub fn handle_external_drag<M: MeasureItems + ?Sized>(
        &mut self,
        item: &FlexLayoutItem,
        pointer: Point,
        measure: &M,
    ) -> bool {
        let external_id = format!("{EXTERNAL_ITEM_PREFIX}{}", item.id);
        if self
            .external
            .as_ref()
            .is_some_and(|insert| insert.external_id != external_id)
        {
            self.clear_external_drag();
        }

        let Some(insert) = self.external.as_mut() else {
            self.insert_external(item, external_id, pointer);
            return true;
        };
        if insert.pending_pointer.is_some() {
            insert.pending_pointer = Some(pointer);
            return false;
        }

        self.bounds.update_item_sizes(measure);
        let Some(dragged_rect) = self.bounds.get(&external_id) else {
            return false;
        };
        let Some(new_order) = calculate_new_order(
            &external_id,
            pointer,
            &self.bounds,
            self.config.direction,
            self.config.gap,
        ) else {
            return false;
        };
        if self.current_order.as_ref() == Some(&new_order) {
            return false;
        }
        self.transforms = calculate_transforms(
            &external_id,
            &new_order,
            dragged_rect,
            &self.bounds,
            self.config.direction,
            self.config.gap,
        );
        tracing::trace!(container = %self.id, item = %item.id, "external reorder");
        self.current_order = Some(new_order);
        true
    }

    fn insert_external(&mut self, item: &FlexLayoutItem, external_id: String, pointer: Point) {
        let old_layout = self.layout.clone();
        let entry = FlexLayoutItem {
            id: external_id.clone(),
            order: self.layout.len() as i32,
            is_placeholder: true,
            is_hidden: false,
            is_static: false,
            moved: false,
            ..item.clone()
        };
        tracing::debug!(container = %self.id, item = %item.id, "external item inserted");
        self.layout.push(entry.clone());
        self.active = Some(entry);
        self.current_order = None;
        self.transforms = ReorderTransforms::default();
        self.transitions_suspended = false;
        self.frames.cancel(FrameTask::ResumeTransitions);
        self.frames
            .schedule(FrameTask::CollectExternalBounds, BOUNDS_SETTLE_FRAMES);
        self.external = Some(ExternalInsert {
            old_layout,
            external_id,
            pending_pointer: Some(pointer),
        });
    }

    /// Removes the external placeholder and restores the layout from before
    /// it was inserted.
    pub fn clear_external_drag(&mut self) -> bool {
        let Some(insert) = self.external.take() else {
            return false;
        };
        tracing::trace!(container = %self.id, item = %insert.external_id, "external drag cleared");
        self.layout = insert.old_layout;
        self.current_order = None;
        self.frames.cancel(FrameTask::CollectExternalBounds);
        self.reset_preview();
        self.suspend_transitions();
        self.apply_pending();
        true
    }

    /// Turns the external placeholder into a real item at its previewed
    /// slot. Returns `None` without a placeholder or when the id exists.
    pub fn handle_external_drop(&mut self) -> Option<FlexLayoutItem> {
        let insert = self.external.take()?;
        let original_id = insert
            .external_id
            .strip_prefix(EXTERNAL_ITEM_PREFIX)
            .unwrap_or(&insert.external_id)
            .to_string();
        let order = self.current_order.take();
        self.frames.cancel(FrameTask::CollectExternalBounds);
        self.reset_preview();
        self.suspend_transitions();

        let placeholder = get_flex_item(&self.layout, &insert.external_id).cloned();
        let duplicate = get_flex_item(&insert.old_layout, &original_id).is_some();
        let Some(placeholder) = placeholder.filter(|_| !duplicate) else {
            if duplicate {
                let err = LayoutError::DuplicateId {
                    container: self.id.clone(),
                    id: original_id,
                };
                tracing::warn!(container = %self.id, %err, "external drop rejected");
            }
            self.layout = insert.old_layout;
            self.apply_pending();
            return None;
        };

        let mut layout = insert.old_layout.clone();
        layout.push(FlexLayoutItem {
            id: original_id.clone(),
            is_placeholder: false,
            ..placeholder
        });
        let layout = match order.filter(|order| !order.is_empty()) {
            Some(order) => {
                let order: Vec<String> = order
                    .into_iter()
                    .map(|id| {
                        if id == insert.external_id {
                            original_id.clone()
                        } else {
                            id
                        }
                    })
                    .collect();
                compact_orders(&apply_order(&layout, &order))
            }
            None => compact_orders(&layout),
        };
        let placed = get_flex_item(&layout, &original_id).cloned()?;
        tracing::debug!(container = %self.id, item = %original_id, order = placed.order, "external drop");
        self.events.push(LayoutEvent::Drop {
            layout: layout.clone(),
            item: placed.clone(),
        });
        self.commit_layout(layout, &insert.old_layout);
        self.apply_pending();
        Some(placed)
    }

    /// Removes an item that was dragged out, closing the hole in the orders.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if get_flex_item(&self.layout, id).is_none() {
            return false;
        }
        let before = self.layout.clone();
        let remaining: Vec<FlexLayoutItem> = before
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        tracing::debug!(container = %self.id, item = %id, "item removed");
        self.commit_layout(compact_orders(&remaining), &before);
        true
    }

    /// Advances one frame, running deferred measurement and re-enabling
    /// transitions when due.
    pub fn on_frame<M: MeasureItems + ?Sized>(&mut self, measure: &M) {
        for task in self.frames.tick() {
            match task {
                FrameTask::CollectExternalBounds => self.collect_external_bounds(measure),
                FrameTask::ResumeTransitions => self.transitions_suspended = false,
            }
        }
    }

    fn collect_external_bounds<M: MeasureItems + ?Sized>(&mut self, measure: &M) {
        let Some(insert) = self.external.as_mut() else {
            return;
        };
        self.bounds = ItemBoundsSnapshot::collect(measure, &self.layout);
        let Some(pointer) = insert.pending_pointer.take() else {
            return;
        };
        let external_id = insert.external_id.clone();
        let Some(dragged_rect) = self.bounds.get(&external_id) else {
            tracing::trace!(container = %self.id, item = %external_id, "external item not measured");
            return;
        };
        let initial = calculate_initial_order_for_external_item(
            pointer,
            &self.bounds,
            self.config.direction,
            self.config.gap,
        );
        let mut order: Vec<String> = self
            .bounds
            .order()
            .iter()
            .filter(|id| **id != external_id)
            .cloned()
            .collect();
        order.insert(initial.min(order.len()), external_id.clone());
        self.transforms = calculate_transforms(
            &external_id,
            &order,
            dragged_rect,
            &self.bounds,
            self.config.direction,
            self.config.gap,
        );
        tracing::trace!(container = %self.id, item = %external_id, slot = initial, "external bounds collected");
        self.current_order = Some(order);
    }

    fn reset_preview(&mut self) {
        self.transforms = ReorderTransforms::default();
        self.bounds = ItemBoundsSnapshot::default();
        self.active = None;
    }

    fn suspend_transitions(&mut self) {
        self.transitions_suspended = true;
        self.frames
            .schedule(FrameTask::ResumeTransitions, TRANSITION_SUSPEND_FRAMES);
    }

    fn settle_drag(&mut self) {
        if let Err(err) = self.drag.settle() {
            tracing::warn!(container = %self.id, %err, "drag did not settle");
            self.drag.reset();
        }
        self.apply_pending();
    }

    fn apply_pending(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Some(layout) = self.pending_layout.take() {
            let before = self.layout.clone();
            self.commit_layout(normalize_flex_layout(&layout), &before);
        }
    }

    fn commit_layout(&mut self, layout: Vec<FlexLayoutItem>, previous: &[FlexLayoutItem]) {
        if layout != previous {
            self.events.push(LayoutEvent::LayoutChanged(layout.clone()));
        }
        self.layout = layout;
    }
}

fn as_placeholder(item: &FlexLayoutItem, hidden: bool) -> FlexLayoutItem {
    FlexLayoutItem {
        is_placeholder: true,
        is_hidden: hidden,
        ..item.clone()
    }
}
