//! Grid container: drag, resize, external hover and native drop handling on
//! top of the pure grid engine.

use crate::constants::EXTERNAL_ITEM_PREFIX;
use crate::drag::DragMachine;
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{Point, PositionParams, Rect, calc_item_position, calc_wh, pixels_to_cell};
use crate::layout::grid::item::position_of;
use crate::layout::grid::{
    GridConfig, GridLayoutItem, ResizeEdge, bottom, compact, container_height, correct_bounds,
    get_layout_item, move_element, resize_element, synchronize_layout, validate_layout,
};

use super::{DragEventData, LayoutEvent};

pub type GridEvent = LayoutEvent<GridLayoutItem>;

/// State captured when a drag or resize starts.
#[derive(Debug, Clone)]
struct GestureSnapshot {
    old_layout: Vec<GridLayoutItem>,
    old_item: GridLayoutItem,
}

/// An item from another container hovering over this grid.
#[derive(Debug, Clone)]
struct ExternalHover {
    old_layout: Vec<GridLayoutItem>,
    placeholder: GridLayoutItem,
}

/// Native (non cross-container) drag-over bookkeeping.
#[derive(Debug, Clone, Default)]
struct NativeDrop {
    enter_count: u32,
    old_layout: Option<Vec<GridLayoutItem>>,
}

#[derive(Debug, Clone)]
pub struct GridContainer {
    id: String,
    config: GridConfig,
    layout: Vec<GridLayoutItem>,
    drag: DragMachine<GestureSnapshot>,
    resize: DragMachine<GestureSnapshot>,
    active: Option<GridLayoutItem>,
    external: Option<ExternalHover>,
    native: NativeDrop,
    /// Layout handed in while a gesture was running, applied once it settles.
    pending_layout: Option<Vec<GridLayoutItem>>,
    events: Vec<GridEvent>,
}

impl GridContainer {
    pub fn new(
        id: impl Into<String>,
        config: GridConfig,
        layout: Vec<GridLayoutItem>,
    ) -> LayoutResult<Self> {
        let id = id.into();
        config.validate()?;
        validate_layout(&id, &layout)?;
        let layout = normalized(layout, &config);
        Ok(Self {
            id,
            config,
            layout,
            drag: DragMachine::default(),
            resize: DragMachine::default(),
            active: None,
            external: None,
            native: NativeDrop::default(),
            pending_layout: None,
            events: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn layout(&self) -> &[GridLayoutItem] {
        &self.layout
    }

    pub fn item(&self, id: &str) -> Option<&GridLayoutItem> {
        get_layout_item(&self.layout, id)
    }

    /// Placeholder of the running drag or resize.
    pub fn active_placeholder(&self) -> Option<&GridLayoutItem> {
        self.active.as_ref()
    }

    /// Placeholder of an item hovering in from another container.
    pub fn external_placeholder(&self) -> Option<&GridLayoutItem> {
        self.external.as_ref().map(|hover| &hover.placeholder)
    }

    pub fn is_dragging(&self) -> bool {
        !self.drag.is_idle()
    }

    pub fn is_resizing(&self) -> bool {
        !self.resize.is_idle()
    }

    fn is_busy(&self) -> bool {
        self.is_dragging() || self.is_resizing() || self.external.is_some()
    }

    pub fn position_params(&self) -> PositionParams {
        PositionParams::from_config(&self.config)
    }

    /// Pixel rectangle of `item` relative to the container origin.
    pub fn item_rect(&self, item: &GridLayoutItem) -> Rect {
        calc_item_position(&self.position_params(), item.x, item.y, item.w, item.h)
    }

    /// Cell for an item of size `w` x `h` whose top-left corner sits at
    /// `top_left`, relative to the container origin.
    pub fn cell_at(&self, top_left: Point, w: i32, h: i32) -> (i32, i32) {
        pixels_to_cell(&self.position_params(), top_left.y, top_left.x, w, h)
    }

    /// Cell size covering `width` x `height` pixels from cell `(x, y)`.
    pub fn size_in_cells(&self, width: f64, height: f64, x: i32, y: i32) -> (i32, i32) {
        calc_wh(&self.position_params(), width, height, x, y)
    }

    /// Height the container needs. A collapsed dragged item does not count.
    pub fn container_height(&self) -> f64 {
        let skip = self
            .active
            .as_ref()
            .filter(|placeholder| placeholder.is_hidden)
            .map(|placeholder| placeholder.id.as_str());
        container_height(&self.layout, &self.config, skip)
    }

    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_config(&mut self, config: GridConfig) -> LayoutResult<()> {
        config.validate()?;
        let reflow = config.columns != self.config.columns
            || config.compaction != self.config.compaction
            || config.allow_overlap != self.config.allow_overlap;
        self.config = config;
        if reflow && !self.is_busy() {
            let before = self.layout.clone();
            let layout = normalized(before.clone(), &self.config);
            self.commit_layout(layout, &before);
        }
        Ok(())
    }

    /// Replaces the layout. While a gesture runs the new layout is held back
    /// and applied when it settles.
    pub fn set_layout(&mut self, layout: Vec<GridLayoutItem>) -> LayoutResult<()> {
        validate_layout(&self.id, &layout)?;
        if self.is_busy() {
            tracing::debug!(container = %self.id, "layout update deferred until gesture settles");
            self.pending_layout = Some(layout);
            return Ok(());
        }
        let before = self.layout.clone();
        let layout = normalized(layout, &self.config);
        self.commit_layout(layout, &before);
        Ok(())
    }

    /// Rebuilds the layout for the given child ids, keeping known entries.
    pub fn synchronize(&mut self, ids: &[String]) -> LayoutResult<()> {
        let base = self.pending_layout.as_deref().unwrap_or(&self.layout);
        let synced = synchronize_layout(&self.id, base, ids, &self.config)?;
        self.set_layout(synced)
    }

    pub fn on_drag_start(&mut self, id: &str) -> bool {
        if self.is_resizing() {
            return false;
        }
        let Some(item) = get_layout_item(&self.layout, id).cloned() else {
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
        tracing::debug!(container = %self.id, item = %id, "drag start");
        self.active = Some(as_placeholder(&item, false));
        self.events.push(LayoutEvent::DragStart(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(item.clone()),
            new_item: Some(item),
            placeholder: None,
        }));
        true
    }

    /// Moves the dragged item to cell `(x, y)`.
    ///
    /// With `collapse` set the item occupies no space while the layout
    /// reflows, which is how a grid looks when its dragged item hovers a
    /// different container. The item keeps its size afterwards.
    pub fn on_drag(&mut self, id: &str, x: i32, y: i32, collapse: bool) {
        let old_item = match self.drag.on_move() {
            Ok(snapshot) => snapshot.old_item.clone(),
            Err(err) => {
                tracing::trace!(container = %self.id, item = %id, %err, "drag step ignored");
                return;
            }
        };
        let Some(index) = position_of(&self.layout, id) else {
            return;
        };

        let mut working = self.layout.clone();
        let (w, h) = (working[index].w, working[index].h);
        if collapse {
            working[index].w = 0;
            working[index].h = 0;
        }
        let mut moved = move_element(&working, id, x, y, true, &self.config.move_options());
        moved[index].w = w;
        moved[index].h = h;

        let new_item = moved[index].clone();
        let placeholder = as_placeholder(&new_item, collapse);
        tracing::trace!(
            container = %self.id,
            item = %id,
            x = new_item.x,
            y = new_item.y,
            collapse,
            "drag"
        );
        self.layout = moved;
        self.active = Some(placeholder.clone());
        self.events.push(LayoutEvent::Drag(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(old_item),
            new_item: Some(new_item),
            placeholder: Some(placeholder),
        }));
    }

    /// Commits the drag with the item at `(x, y)`.
    pub fn on_drag_stop(&mut self, id: &str, x: i32, y: i32) {
        let snapshot = match self.drag.stop() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::trace!(container = %self.id, item = %id, %err, "drag stop ignored");
                return;
            }
        };
        self.active = None;
        let layout = if get_layout_item(&self.layout, id).is_some() {
            move_element(&self.layout, id, x, y, true, &self.config.move_options())
        } else {
            self.layout.clone()
        };
        tracing::debug!(container = %self.id, item = %id, x, y, "drag stop");
        self.events.push(LayoutEvent::DragStop(DragEventData {
            layout: layout.clone(),
            old_item: Some(snapshot.old_item),
            new_item: get_layout_item(&layout, id).cloned(),
            placeholder: None,
        }));
        self.commit_layout(layout, &snapshot.old_layout);
        self.settle_drag();
    }

    /// Ends the drag and puts the pre-drag layout back.
    pub fn cancel_drag(&mut self) {
        let snapshot = match self.drag.cancel() {
            Ok(snapshot) => snapshot,
            Err(_) => return,
        };
        tracing::debug!(container = %self.id, item = %snapshot.old_item.id, "drag cancelled");
        self.active = None;
        self.layout = snapshot.old_layout;
        self.events.push(LayoutEvent::DragStop(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(snapshot.old_item.clone()),
            new_item: Some(snapshot.old_item),
            placeholder: None,
        }));
        self.settle_drag();
    }

    pub fn on_resize_start(&mut self, id: &str) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(item) = get_layout_item(&self.layout, id).cloned() else {
            return false;
        };
        if !item.can_resize(self.config.is_resizable) {
            return false;
        }
        let snapshot = GestureSnapshot {
            old_layout: self.layout.clone(),
            old_item: item.clone(),
        };
        if let Err(err) = self.resize.start(snapshot) {
            tracing::warn!(container = %self.id, item = %id, %err, "resize start rejected");
            return false;
        }
        tracing::debug!(container = %self.id, item = %id, "resize start");
        self.events.push(LayoutEvent::ResizeStart(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(item.clone()),
            new_item: Some(item),
            placeholder: None,
        }));
        true
    }

    pub fn on_resize(&mut self, id: &str, w: i32, h: i32, edge: ResizeEdge) {
        let old_item = match self.resize.on_move() {
            Ok(snapshot) => snapshot.old_item.clone(),
            Err(err) => {
                tracing::trace!(container = %self.id, item = %id, %err, "resize step ignored");
                return;
            }
        };
        let Some(step) = resize_element(&self.layout, id, w, h, edge, &self.config.move_options())
        else {
            return;
        };
        let placeholder = GridLayoutItem {
            is_static: true,
            ..as_placeholder(&step.item, false)
        };
        self.layout = step.layout;
        self.active = Some(placeholder.clone());
        self.events.push(LayoutEvent::Resize(DragEventData {
            layout: self.layout.clone(),
            old_item: Some(old_item),
            new_item: Some(step.item),
            placeholder: Some(placeholder),
        }));
    }

    pub fn on_resize_stop(&mut self, id: &str) {
        let snapshot = match self.resize.stop() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::trace!(container = %self.id, item = %id, %err, "resize stop ignored");
                return;
            }
        };
        self.active = None;
        let layout = compact(
            &self.layout,
            self.config.compaction,
            self.config.columns,
            self.config.allow_overlap,
        );
        tracing::debug!(container = %self.id, item = %id, "resize stop");
        self.events.push(LayoutEvent::ResizeStop(DragEventData {
            layout: layout.clone(),
            old_item: Some(snapshot.old_item),
            new_item: get_layout_item(&layout, id).cloned(),
            placeholder: None,
        }));
        self.commit_layout(layout, &snapshot.old_layout);
        if let Err(err) = self.resize.settle() {
            tracing::warn!(container = %self.id, %err, "resize did not settle");
            self.resize.reset();
        }
        self.apply_pending();
    }

    /// Previews an item from another container at the pointer.
    ///
    /// `item` is already converted to this grid's units and carries its
    /// original id. `pointer` is relative to the container origin and
    /// `grab_offset` is where the item was grabbed, relative to its top-left
    /// corner. Returns whether the preview changed.
    pub fn handle_external_drag(
        &mut self,
        item: &GridLayoutItem,
        pointer: Point,
        grab_offset: Point,
    ) -> bool {
        let external_id = format!("{EXTERNAL_ITEM_PREFIX}{}", item.id);
        let (x, y) = self.cell_at(
            Point::new(pointer.x - grab_offset.x, pointer.y - grab_offset.y),
            item.w,
            item.h,
        );
        if self.external.is_some()
            && let Some(current) = get_layout_item(&self.layout, &external_id)
            && (current.x, current.y, current.w, current.h) == (x, y, item.w, item.h)
        {
            return false;
        }

        let base = match &self.external {
            Some(hover) => hover.old_layout.clone(),
            None => self.layout.clone(),
        };
        // A fresh placeholder enters below everything so the move onto the
        // target cell pushes the residents out of its way.
        let (start_x, start_y) = self
            .external
            .as_ref()
            .and_then(|_| get_layout_item(&self.layout, &external_id))
            .map_or_else(|| (x, bottom(&base)), |previous| (previous.x, previous.y));

        let mut working: Vec<GridLayoutItem> = base
            .iter()
            .filter(|entry| !entry.id.starts_with(EXTERNAL_ITEM_PREFIX))
            .cloned()
            .collect();
        working.push(GridLayoutItem {
            id: external_id.clone(),
            x: start_x,
            y: start_y,
            moved: false,
            is_placeholder: false,
            is_hidden: false,
            ..item.clone()
        });
        let moved = move_element(&working, &external_id, x, y, true, &self.config.move_options());
        let Some(updated) = get_layout_item(&moved, &external_id).cloned() else {
            return false;
        };
        if self.external.is_some() && moved == self.layout {
            return false;
        }
        tracing::trace!(container = %self.id, item = %item.id, x, y, "external drag");
        self.external = Some(ExternalHover {
            old_layout: base,
            placeholder: as_placeholder(&updated, false),
        });
        self.layout = moved;
        true
    }

    /// Drops the external preview and restores the layout from before it.
    pub fn clear_external_drag(&mut self) -> bool {
        let Some(hover) = self.external.take() else {
            return false;
        };
        tracing::trace!(container = %self.id, item = %hover.placeholder.id, "external drag cleared");
        self.layout = hover.old_layout;
        self.apply_pending();
        true
    }

    /// Turns the external preview into a real item. Returns the item as it
    /// was placed, or `None` without a preview or when the id already exists.
    pub fn handle_external_drop(&mut self) -> Option<GridLayoutItem> {
        let hover = self.external.take()?;
        let original_id = hover
            .placeholder
            .id
            .strip_prefix(EXTERNAL_ITEM_PREFIX)
            .unwrap_or(&hover.placeholder.id)
            .to_string();
        if get_layout_item(&hover.old_layout, &original_id).is_some() {
            let err = LayoutError::DuplicateId {
                container: self.id.clone(),
                id: original_id,
            };
            tracing::warn!(container = %self.id, %err, "external drop rejected");
            self.layout = hover.old_layout;
            self.apply_pending();
            return None;
        }

        let item = GridLayoutItem {
            id: original_id.clone(),
            is_placeholder: false,
            is_hidden: false,
            moved: false,
            ..hover.placeholder.clone()
        };
        let mut layout: Vec<GridLayoutItem> = self
            .layout
            .iter()
            .filter(|entry| !entry.id.starts_with(EXTERNAL_ITEM_PREFIX))
            .cloned()
            .collect();
        layout.push(item);
        let layout = compact(
            &layout,
            self.config.compaction,
            self.config.columns,
            self.config.allow_overlap,
        );
        let placed = get_layout_item(&layout, &original_id).cloned()?;
        tracing::debug!(
            container = %self.id,
            item = %placed.id,
            x = placed.x,
            y = placed.y,
            "external drop"
        );
        self.events.push(LayoutEvent::Drop {
            layout: layout.clone(),
            item: placed.clone(),
        });
        self.commit_layout(layout, &hover.old_layout);
        self.apply_pending();
        Some(placed)
    }

    /// Removes an item that was dragged out to another container.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if get_layout_item(&self.layout, id).is_none() {
            return false;
        }
        let before = self.layout.clone();
        let remaining: Vec<GridLayoutItem> = before
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();
        let layout = compact(
            &remaining,
            self.config.compaction,
            self.config.columns,
            self.config.allow_overlap,
        );
        tracing::debug!(container = %self.id, item = %id, "item removed");
        self.commit_layout(layout, &before);
        true
    }

    pub fn on_drop_drag_enter(&mut self) {
        self.native.enter_count += 1;
    }

    /// Native drag leaving the container or one of its children. The
    /// dropping placeholder goes away once every enter is balanced.
    pub fn on_drop_drag_leave(&mut self) {
        self.native.enter_count = self.native.enter_count.saturating_sub(1);
        if self.native.enter_count == 0 {
            self.remove_dropping_placeholder();
        }
    }

    /// Native drag over the container at `pointer` (relative to the
    /// container origin). `from_child` marks events that bubbled up from a
    /// child element; `size` overrides the dropping item's size. Returns
    /// whether the event was accepted.
    pub fn on_drop_drag_over(
        &mut self,
        pointer: Point,
        from_child: bool,
        size: Option<(i32, i32)>,
    ) -> bool {
        if !self.config.is_droppable || self.is_busy() {
            return false;
        }
        if from_child && self.config.capabilities.filter_child_drag_events {
            return false;
        }
        let drop_id = self.config.dropping_item.id.clone();
        let (w, h) = size.unwrap_or((self.config.dropping_item.w, self.config.dropping_item.h));
        let (x, y) = self.cell_at(pointer, w, h);

        let base = self
            .native
            .old_layout
            .get_or_insert_with(|| self.layout.clone())
            .clone();
        let (start_x, start_y) = get_layout_item(&self.layout, &drop_id)
            .map_or((x, y), |previous| (previous.x, previous.y));
        let mut working = base;
        working.push(GridLayoutItem {
            is_draggable: Some(true),
            ..GridLayoutItem::new(drop_id.clone(), start_x, start_y, w, h)
        });
        self.layout = move_element(&working, &drop_id, x, y, true, &self.config.move_options());
        true
    }

    /// Completes a native drop. Emits [`LayoutEvent::Drop`] with the layout
    /// still holding the dropping item so the host can place its own.
    pub fn on_drop(&mut self) -> Option<GridLayoutItem> {
        let drop_id = self.config.dropping_item.id.clone();
        let item = get_layout_item(&self.layout, &drop_id).cloned();
        let layout = self.layout.clone();
        self.native.enter_count = 0;
        self.remove_dropping_placeholder();
        let item = item?;
        tracing::debug!(container = %self.id, x = item.x, y = item.y, "native drop");
        self.events.push(LayoutEvent::Drop {
            layout,
            item: item.clone(),
        });
        Some(item)
    }

    fn remove_dropping_placeholder(&mut self) {
        if let Some(old_layout) = self.native.old_layout.take() {
            self.layout = old_layout;
        }
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
            let layout = normalized(layout, &self.config);
            self.commit_layout(layout, &before);
        }
    }

    fn commit_layout(&mut self, layout: Vec<GridLayoutItem>, previous: &[GridLayoutItem]) {
        if layout != previous {
            self.events.push(LayoutEvent::LayoutChanged(layout.clone()));
        }
        self.layout = layout;
    }
}

fn normalized(mut layout: Vec<GridLayoutItem>, config: &GridConfig) -> Vec<GridLayoutItem> {
    correct_bounds(&mut layout, config.columns);
    compact(&layout, config.compaction, config.columns, config.allow_overlap)
}

fn as_placeholder(item: &GridLayoutItem, hidden: bool) -> GridLayoutItem {
    GridLayoutItem {
        is_placeholder: true,
        is_hidden: hidden,
        ..item.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GridConfig {
        GridConfig {
            columns: 12,
            row_height: 50.0,
            width: 1200.0,
            margin: [0.0, 0.0],
            container_padding: Some([0.0, 0.0]),
            ..GridConfig::default()
        }
    }

    fn grid(layout: Vec<GridLayoutItem>) -> GridContainer {
        GridContainer::new("g", config(), layout).unwrap()
    }

    fn changed(events: &[GridEvent]) -> Option<&Vec<GridLayoutItem>> {
        events.iter().rev().find_map(|event| match event {
            LayoutEvent::LayoutChanged(layout) => Some(layout),
            _ => None,
        })
    }

    #[test]
    fn drag_moves_item_and_commits_on_stop() {
        let mut grid = grid(vec![
            GridLayoutItem::new("a", 0, 0, 2, 2),
            GridLayoutItem::new("b", 0, 2, 2, 2),
        ]);
        assert!(grid.on_drag_start("b"));
        grid.on_drag("b", 0, 0, false);
        assert_eq!(grid.active_placeholder().map(|p| (p.x, p.y)), Some((0, 0)));
        grid.on_drag_stop("b", 0, 0);
        let events = grid.take_events();
        let layout = changed(&events).unwrap();
        let b = get_layout_item(layout, "b").unwrap();
        let a = get_layout_item(layout, "a").unwrap();
        assert_eq!((b.x, b.y), (0, 0));
        assert_eq!((a.x, a.y), (0, 2));
        assert!(!grid.is_dragging());
        assert!(grid.active_placeholder().is_none());
    }

    #[test]
    fn drag_without_motion_emits_no_layout_change() {
        let mut grid = grid(vec![GridLayoutItem::new("a", 0, 0, 2, 2)]);
        assert!(grid.on_drag_start("a"));
        grid.on_drag_stop("a", 0, 0);
        let events = grid.take_events();
        assert!(changed(&events).is_none());
        assert!(matches!(events.last(), Some(LayoutEvent::DragStop(_))));
    }

    #[test]
    fn static_items_cannot_be_dragged() {
        let mut grid = grid(vec![GridLayoutItem::new("s", 0, 0, 2, 2).fixed()]);
        assert!(!grid.on_drag_start("s"));
        assert!(grid.take_events().is_empty());
    }

    #[test]
    fn collapse_lets_siblings_fill_the_gap() {
        let mut grid = grid(vec![
            GridLayoutItem::new("a", 0, 0, 2, 2),
            GridLayoutItem::new("b", 0, 2, 2, 2),
        ]);
        grid.on_drag_start("a");
        grid.on_drag("a", 0, 0, true);
        let b = grid.item("b").unwrap();
        assert_eq!(b.y, 0);
        let a = grid.item("a").unwrap();
        assert_eq!((a.w, a.h), (2, 2));
        assert!(grid.active_placeholder().unwrap().is_hidden);
        assert_eq!(grid.container_height(), 100.0);
    }

    #[test]
    fn cancel_restores_pre_drag_layout() {
        let original = vec![
            GridLayoutItem::new("a", 0, 0, 2, 2),
            GridLayoutItem::new("b", 0, 2, 2, 2),
        ];
        let mut grid = grid(original.clone());
        grid.on_drag_start("a");
        grid.on_drag("a", 0, 3, false);
        grid.cancel_drag();
        assert_eq!(grid.layout(), original.as_slice());
        assert!(changed(&grid.take_events()).is_none());
    }

    #[test]
    fn layout_update_during_drag_is_deferred() {
        let mut grid = grid(vec![GridLayoutItem::new("a", 0, 0, 2, 2)]);
        grid.on_drag_start("a");
        grid.set_layout(vec![
            GridLayoutItem::new("a", 0, 0, 2, 2),
            GridLayoutItem::new("n", 4, 0, 1, 1),
        ])
        .unwrap();
        assert!(grid.item("n").is_none());
        grid.on_drag_stop("a", 0, 0);
        assert!(grid.item("n").is_some());
    }

    #[test]
    fn synchronize_follows_children_after_the_gesture() {
        let mut grid = grid(vec![
            GridLayoutItem::new("a", 0, 0, 2, 2),
            GridLayoutItem::new("b", 2, 0, 2, 2),
        ]);
        grid.on_drag_start("a");
        grid.synchronize(&["a".to_string(), "c".to_string()]).unwrap();
        assert!(grid.item("b").is_some());
        grid.on_drag_stop("a", 0, 0);
        assert!(grid.item("b").is_none());
        assert_eq!(grid.item("c").map(|c| (c.w, c.h)), Some((1, 1)));
    }

    #[test]
    fn resize_from_left_edge_keeps_right_edge() {
        let mut grid = grid(vec![GridLayoutItem::new("a", 4, 0, 2, 1)]);
        assert!(grid.on_resize_start("a"));
        grid.on_resize("a", 4, 1, ResizeEdge::Left);
        grid.on_resize_stop("a");
        let a = grid.item("a").unwrap();
        assert_eq!((a.x, a.w), (2, 4));
        assert_eq!(a.right(), 6);
    }

    #[test]
    fn external_drag_previews_and_drop_commits() {
        let mut grid = grid(vec![GridLayoutItem::new("a", 0, 0, 2, 1)]);
        let incoming = GridLayoutItem::new("x", 0, 0, 2, 1);
        assert!(grid.handle_external_drag(&incoming, Point::new(10.0, 10.0), Point::new(0.0, 0.0)));
        assert!(!grid.handle_external_drag(&incoming, Point::new(12.0, 10.0), Point::new(0.0, 0.0)));
        assert_eq!(
            grid.external_placeholder().map(|p| p.id.as_str()),
            Some("__external__x")
        );
        let placed = grid.handle_external_drop().unwrap();
        assert_eq!(placed.id, "x");
        assert!(!placed.is_placeholder);
        assert!(grid.layout().iter().all(|i| !i.id.starts_with(EXTERNAL_ITEM_PREFIX)));
        assert!(grid.item("x").is_some());
        let events = grid.take_events();
        assert!(events.iter().any(|e| matches!(e, LayoutEvent::Drop { item, .. } if item.id == "x")));
    }

    #[test]
    fn clearing_external_restores_layout() {
        let original = vec![GridLayoutItem::new("a", 0, 0, 2, 1)];
        let mut grid = grid(original.clone());
        let incoming = GridLayoutItem::new("x", 0, 0, 2, 1);
        grid.handle_external_drag(&incoming, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(grid.item("a").unwrap().y, 1);
        assert!(grid.clear_external_drag());
        assert_eq!(grid.layout(), original.as_slice());
    }

    #[test]
    fn external_item_takes_an_occupied_cell_on_first_hover() {
        let mut grid = grid(vec![
            GridLayoutItem::new("a", 0, 0, 2, 1),
            GridLayoutItem::new("b", 4, 0, 2, 1),
        ]);
        let incoming = GridLayoutItem::new("x", 0, 0, 2, 1);
        assert!(grid.handle_external_drag(&incoming, Point::new(10.0, 10.0), Point::new(0.0, 0.0)));

        let placeholder = grid.item("__external__x").cloned().unwrap();
        assert_eq!((placeholder.x, placeholder.y), (0, 0));
        assert_eq!(grid.item("a").map(|a| (a.x, a.y)), Some((0, 1)));
        assert_eq!(grid.item("b").map(|b| (b.x, b.y)), Some((4, 0)));

        // Another pointer move inside the same cell keeps the preview.
        let before = grid.layout().to_vec();
        assert!(!grid.handle_external_drag(&incoming, Point::new(40.0, 20.0), Point::new(0.0, 0.0)));
        assert_eq!(grid.layout(), before.as_slice());
    }

    #[test]
    fn external_hover_follows_the_pointer_across_cells() {
        let mut grid = grid(vec![GridLayoutItem::new("a", 0, 0, 2, 1)]);
        let incoming = GridLayoutItem::new("x", 0, 0, 2, 1);
        assert!(grid.handle_external_drag(&incoming, Point::new(10.0, 10.0), Point::new(0.0, 0.0)));
        assert_eq!(grid.item("a").map(|a| a.y), Some(1));

        assert!(grid.handle_external_drag(&incoming, Point::new(510.0, 10.0), Point::new(0.0, 0.0)));
        let placeholder = grid.item("__external__x").cloned().unwrap();
        assert_eq!((placeholder.x, placeholder.y), (5, 0));
        assert_eq!(grid.item("a").map(|a| (a.x, a.y)), Some((0, 0)));
    }

    #[test]
    fn external_drop_with_existing_id_is_rejected() {
        let mut grid = grid(vec![GridLayoutItem::new("x", 0, 0, 1, 1)]);
        let incoming = GridLayoutItem::new("x", 0, 0, 1, 1);
        grid.handle_external_drag(&incoming, Point::new(500.0, 0.0), Point::new(0.0, 0.0));
        assert!(grid.handle_external_drop().is_none());
        assert_eq!(grid.layout().len(), 1);
    }

    #[test]
    fn remove_item_recompacts() {
        let mut grid = grid(vec![
            GridLayoutItem::new("a", 0, 0, 2, 2),
            GridLayoutItem::new("b", 0, 2, 2, 2),
        ]);
        assert!(grid.remove_item("a"));
        assert_eq!(grid.item("b").unwrap().y, 0);
        assert!(!grid.remove_item("a"));
    }

    #[test]
    fn native_drop_round_trip() {
        let mut grid = GridContainer::new(
            "g",
            GridConfig {
                is_droppable: true,
                ..config()
            },
            vec![GridLayoutItem::new("a", 0, 0, 2, 1)],
        )
        .unwrap();
        grid.on_drop_drag_enter();
        assert!(grid.on_drop_drag_over(Point::new(300.0, 0.0), false, None));
        let dropped = grid.on_drop().unwrap();
        assert_eq!((dropped.x, dropped.y), (3, 0));
        assert_eq!(grid.layout().len(), 1);
    }

    #[test]
    fn native_leave_removes_placeholder_after_balanced_leaves() {
        let mut grid = GridContainer::new(
            "g",
            GridConfig {
                is_droppable: true,
                ..config()
            },
            Vec::new(),
        )
        .unwrap();
        grid.on_drop_drag_enter();
        grid.on_drop_drag_enter();
        grid.on_drop_drag_over(Point::new(0.0, 0.0), false, None);
        grid.on_drop_drag_leave();
        assert_eq!(grid.layout().len(), 1);
        grid.on_drop_drag_leave();
        assert!(grid.layout().is_empty());
    }

    #[test]
    fn child_drag_over_is_filtered_when_required() {
        let mut grid = GridContainer::new(
            "g",
            GridConfig {
                is_droppable: true,
                capabilities: crate::layout::grid::DropCapabilities {
                    filter_child_drag_events: true,
                },
                ..config()
            },
            Vec::new(),
        )
        .unwrap();
        assert!(!grid.on_drop_drag_over(Point::new(0.0, 0.0), true, None));
        assert!(grid.on_drop_drag_over(Point::new(0.0, 0.0), false, None));
    }
}
