//! A board of containers sharing one drag coordinator.
//!
//! The board is the single entry point for pointer input. It hit tests
//! containers and items, drives the source container's gesture, feeds
//! hovered containers their external preview and turns coordinator outcomes
//! into commits, restores and removals. Pointer coordinates are board
//! coordinates; grids get them translated to their own origin.

use std::collections::BTreeMap;

use crate::container::{FlexContainer, FlexEvent, GridContainer, GridEvent};
use crate::coordinator::{
    AcceptsDrop, CoordinatorEvent, DragCoordinator, DropOutcome, DropState,
    DropTargetRegistration, DropZoneHandler, LayoutItem, TargetGeometry, TargetUpdate,
    TransformFn,
};
use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{Point, Rect, Size, rect_contains};
use crate::layout::flex::{FlexConfig, FlowMeasure};
use crate::layout::grid::{GridConfig, ResizeEdge};

/// Cross-container settings of one mounted container.
pub struct CrossContainerConfig {
    /// Items may leave this container and enter it from others.
    pub enabled: bool,
    pub accepts: AcceptsDrop,
    /// Conversion for items entering this container.
    pub transform: Option<TransformFn>,
    pub z_index: i32,
}

impl Default for CrossContainerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            accepts: AcceptsDrop::Always,
            transform: None,
            z_index: 0,
        }
    }
}

#[derive(Debug)]
pub enum Container {
    Grid(GridContainer),
    Flex(FlexContainer),
}

impl Container {
    pub fn id(&self) -> &str {
        match self {
            Container::Grid(grid) => grid.id(),
            Container::Flex(flex) => flex.id(),
        }
    }

    pub fn geometry(&self) -> TargetGeometry {
        match self {
            Container::Grid(grid) => TargetGeometry::from(grid.config()),
            Container::Flex(flex) => TargetGeometry::from(flex.config()),
        }
    }

    pub fn as_grid(&self) -> Option<&GridContainer> {
        match self {
            Container::Grid(grid) => Some(grid),
            Container::Flex(_) => None,
        }
    }

    pub fn as_flex(&self) -> Option<&FlexContainer> {
        match self {
            Container::Flex(flex) => Some(flex),
            Container::Grid(_) => None,
        }
    }

    fn cancel_drag(&mut self) {
        match self {
            Container::Grid(grid) => grid.cancel_drag(),
            Container::Flex(flex) => flex.cancel_drag(),
        }
    }

    fn clear_external_drag(&mut self) -> bool {
        match self {
            Container::Grid(grid) => grid.clear_external_drag(),
            Container::Flex(flex) => flex.clear_external_drag(),
        }
    }

    fn remove_item(&mut self, id: &str) -> bool {
        match self {
            Container::Grid(grid) => grid.remove_item(id),
            Container::Flex(flex) => flex.remove_item(id),
        }
    }

    fn handle_external_drop(&mut self) -> Option<LayoutItem> {
        match self {
            Container::Grid(grid) => grid.handle_external_drop().map(LayoutItem::Grid),
            Container::Flex(flex) => flex.handle_external_drop().map(LayoutItem::Flex),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContainerEvent {
    Grid(GridEvent),
    Flex(FlexEvent),
    /// An item was released over an external drop zone.
    ExternalDrop { item: LayoutItem, pointer: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardEvent {
    pub container: String,
    pub event: ContainerEvent,
}

#[derive(Debug)]
struct Mounted {
    container: Container,
    bounds: Rect,
}

#[derive(Debug, Clone)]
enum Gesture {
    Drag {
        container: String,
        item_id: String,
        /// Pointer relative to the item's top-left corner.
        grab_offset: Point,
        size: Size,
    },
    Resize {
        container: String,
        item_id: String,
        edge: ResizeEdge,
        start_pointer: Point,
        start_rect: Rect,
    },
}

#[derive(Default)]
pub struct Board {
    containers: Vec<Mounted>,
    coordinator: DragCoordinator,
    gesture: Option<Gesture>,
    events: Vec<BoardEvent>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coordinator(coordinator: DragCoordinator) -> Self {
        Self {
            coordinator,
            ..Self::default()
        }
    }

    pub fn mount_grid(
        &mut self,
        mut grid: GridContainer,
        bounds: Rect,
        cross: CrossContainerConfig,
    ) -> LayoutResult<()> {
        if grid.config().width != bounds.width {
            let config = GridConfig {
                width: bounds.width,
                ..grid.config().clone()
            };
            grid.set_config(config)?;
        }
        self.mount(Container::Grid(grid), bounds, cross)
    }

    pub fn mount_flex(
        &mut self,
        flex: FlexContainer,
        bounds: Rect,
        cross: CrossContainerConfig,
    ) -> LayoutResult<()> {
        self.mount(Container::Flex(flex), bounds, cross)
    }

    fn mount(
        &mut self,
        container: Container,
        bounds: Rect,
        cross: CrossContainerConfig,
    ) -> LayoutResult<()> {
        let id = container.id().to_string();
        if self.index_of(&id).is_some() {
            return Err(LayoutError::DuplicateTarget(id));
        }
        let mut registration = DropTargetRegistration::new(id.clone(), container.geometry(), bounds)
            .with_accepts(cross.accepts)
            .with_enabled(cross.enabled)
            .with_z_index(cross.z_index);
        if let Some(transform) = cross.transform {
            registration = registration.with_transform(transform);
        }
        self.coordinator.register(registration)?;
        tracing::debug!(container = %id, "container mounted");
        self.containers.push(Mounted { container, bounds });
        Ok(())
    }

    /// Registers a drop zone that is not a layout container.
    pub fn mount_drop_zone(
        &mut self,
        id: impl Into<String>,
        bounds: Rect,
        accepts: AcceptsDrop,
        handler: impl DropZoneHandler + 'static,
    ) -> LayoutResult<()> {
        let id = id.into();
        if self.index_of(&id).is_some() {
            return Err(LayoutError::DuplicateTarget(id));
        }
        self.coordinator.register(
            DropTargetRegistration::new(id, TargetGeometry::External, bounds)
                .with_accepts(accepts)
                .with_handler(handler),
        )
    }

    /// Removes a container or drop zone. A drag that started in the removed
    /// container is aborted and every preview it left behind is cleared.
    pub fn unmount(&mut self, id: &str) -> LayoutResult<Option<Container>> {
        self.coordinator.unregister(id)?;
        let removed = self
            .index_of(id)
            .map(|index| self.containers.remove(index).container);
        if removed.is_some() {
            tracing::debug!(container = %id, "container unmounted");
        }
        if self
            .gesture
            .as_ref()
            .is_some_and(|gesture| gesture_container(gesture) == id)
        {
            self.gesture = None;
            self.clear_external_previews();
        }
        self.process_coordinator_events();
        Ok(removed)
    }

    /// Moves or resizes a container or drop zone. Grids take the new width.
    pub fn set_bounds(&mut self, id: &str, bounds: Rect) -> LayoutResult<()> {
        let mut update = TargetUpdate::default().bounds(bounds);
        if let Some(index) = self.index_of(id) {
            let mounted = &mut self.containers[index];
            mounted.bounds = bounds;
            if let Container::Grid(grid) = &mut mounted.container
                && grid.config().width != bounds.width
            {
                let config = GridConfig {
                    width: bounds.width,
                    ..grid.config().clone()
                };
                grid.set_config(config)?;
            }
            update = update.geometry(mounted.container.geometry());
        }
        self.coordinator.update(id, update)
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.index_of(id).map(|index| &self.containers[index].container)
    }

    pub fn grid(&self, id: &str) -> Option<&GridContainer> {
        self.container(id).and_then(Container::as_grid)
    }

    pub fn grid_mut(&mut self, id: &str) -> Option<&mut GridContainer> {
        let index = self.index_of(id)?;
        match &mut self.containers[index].container {
            Container::Grid(grid) => Some(grid),
            Container::Flex(_) => None,
        }
    }

    pub fn flex(&self, id: &str) -> Option<&FlexContainer> {
        self.container(id).and_then(Container::as_flex)
    }

    pub fn flex_mut(&mut self, id: &str) -> Option<&mut FlexContainer> {
        let index = self.index_of(id)?;
        match &mut self.containers[index].container {
            Container::Flex(flex) => Some(flex),
            Container::Grid(_) => None,
        }
    }

    pub fn containers(&self) -> impl Iterator<Item = (&Container, Rect)> + '_ {
        self.containers
            .iter()
            .map(|mounted| (&mounted.container, mounted.bounds))
    }

    pub fn bounds(&self, id: &str) -> Option<Rect> {
        match self.index_of(id) {
            Some(index) => Some(self.containers[index].bounds),
            None => self.coordinator.target_bounds(id),
        }
    }

    pub fn coordinator(&self) -> &DragCoordinator {
        &self.coordinator
    }

    pub fn drop_state(&self, id: &str) -> DropState {
        self.coordinator.query_drop_state(id)
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Untransformed rectangles of a flex container's items, in board
    /// coordinates.
    pub fn flex_item_rects(&self, id: &str) -> Option<BTreeMap<String, Rect>> {
        let mounted = &self.containers[self.index_of(id)?];
        let flex = mounted.container.as_flex()?;
        Some(flow(mounted.bounds, flex.config()).layout(flex.layout()))
    }

    /// Pixel rectangle of a grid item in board coordinates.
    pub fn grid_item_rect(&self, id: &str, item_id: &str) -> Option<Rect> {
        let mounted = &self.containers[self.index_of(id)?];
        let grid = mounted.container.as_grid()?;
        let item = grid.item(item_id)?;
        let local = grid.item_rect(item);
        Some(Rect::new(
            local.left + mounted.bounds.left,
            local.top + mounted.bounds.top,
            local.width,
            local.height,
        ))
    }

    /// Starts a drag, or a resize when the pointer is on a grid item's
    /// bottom-right cell. Returns whether a gesture started.
    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        if self.gesture.is_some() {
            tracing::warn!("pointer down during a running gesture");
            return false;
        }
        let Some(index) = self
            .containers
            .iter()
            .rposition(|mounted| rect_contains(mounted.bounds, pointer))
        else {
            return false;
        };
        let bounds = self.containers[index].bounds;
        let container_id = self.containers[index].container.id().to_string();

        let (item, rect) = match &mut self.containers[index].container {
            Container::Grid(grid) => {
                let local = pointer.offset_from(bounds.origin());
                let Some((item, rect)) = grid
                    .layout()
                    .iter()
                    .filter(|item| !item.is_placeholder)
                    .map(|item| (item.clone(), grid.item_rect(item)))
                    .find(|(_, rect)| hit(*rect, local))
                else {
                    return false;
                };
                if on_resize_handle(rect, local) && item.can_resize(grid.config().is_resizable) {
                    if !grid.on_resize_start(&item.id) {
                        return false;
                    }
                    self.gesture = Some(Gesture::Resize {
                        container: container_id,
                        item_id: item.id.clone(),
                        edge: ResizeEdge::BottomRight,
                        start_pointer: pointer,
                        start_rect: rect,
                    });
                    return true;
                }
                if !grid.on_drag_start(&item.id) {
                    return false;
                }
                let rect = Rect::new(
                    rect.left + bounds.left,
                    rect.top + bounds.top,
                    rect.width,
                    rect.height,
                );
                (LayoutItem::Grid(item), rect)
            }
            Container::Flex(flex) => {
                let rects = flow(bounds, flex.config()).layout(flex.layout());
                let Some((id, rect)) = rects
                    .iter()
                    .find(|(_, rect)| hit(**rect, pointer))
                    .map(|(id, rect)| (id.clone(), *rect))
                else {
                    return false;
                };
                let Some(item) = flex.item(&id).cloned() else {
                    return false;
                };
                if !flex.on_drag_start(&id, &rects) {
                    return false;
                }
                (LayoutItem::Flex(item), rect)
            }
        };

        let grab_offset = pointer.offset_from(rect.origin());
        let item_id = item.id().to_string();
        let cross_enabled = self
            .coordinator
            .snapshot(&container_id)
            .is_some_and(|snapshot| snapshot.enabled);
        if cross_enabled
            && let Err(err) = self.coordinator.start_drag(
                &container_id,
                item,
                pointer,
                grab_offset,
                Some(rect.size()),
            )
        {
            tracing::warn!(container = %container_id, item = %item_id, %err, "cross-container drag not started");
        }
        self.gesture = Some(Gesture::Drag {
            container: container_id,
            item_id,
            grab_offset,
            size: rect.size(),
        });
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        let Some(gesture) = self.gesture.clone() else {
            return;
        };
        match gesture {
            Gesture::Resize {
                container,
                item_id,
                edge,
                start_pointer,
                start_rect,
            } => self.resize_to(&container, &item_id, edge, pointer, start_pointer, start_rect),
            Gesture::Drag {
                container,
                item_id,
                grab_offset,
                size,
            } => self.drag_to(&container, &item_id, pointer, grab_offset, size),
        }
    }

    pub fn pointer_up(&mut self, pointer: Point) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        match gesture {
            Gesture::Resize {
                container,
                item_id,
                edge,
                start_pointer,
                start_rect,
            } => {
                self.resize_to(&container, &item_id, edge, pointer, start_pointer, start_rect);
                if let Some(grid) = self.grid_mut(&container) {
                    grid.on_resize_stop(&item_id);
                }
            }
            Gesture::Drag {
                container,
                item_id,
                grab_offset,
                size,
            } => {
                self.drag_to(&container, &item_id, pointer, grab_offset, size);
                self.finish_drag(&container, &item_id, pointer, grab_offset);
            }
        }
        self.process_coordinator_events();
    }

    /// Abandons the running gesture. A drag is rolled back everywhere; a
    /// resize is committed as it stands.
    pub fn cancel_gesture(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        self.coordinator.abort_drag();
        let source = gesture_container(&gesture).to_string();
        self.clear_external_previews();
        if let Some(index) = self.index_of(&source) {
            match (&gesture, &mut self.containers[index].container) {
                (Gesture::Resize { item_id, .. }, Container::Grid(grid)) => {
                    grid.on_resize_stop(item_id)
                }
                (_, container) => container.cancel_drag(),
            }
        }
        self.process_coordinator_events();
    }

    /// Advances every flex container by one frame.
    pub fn on_frame(&mut self) {
        for mounted in &mut self.containers {
            if let Container::Flex(flex) = &mut mounted.container {
                let rects = flow(mounted.bounds, flex.config()).layout(flex.layout());
                flex.on_frame(&rects);
            }
        }
    }

    /// Drains queued notifications, board-level ones first.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        let mut out = std::mem::take(&mut self.events);
        for mounted in &mut self.containers {
            let container = mounted.container.id().to_string();
            match &mut mounted.container {
                Container::Grid(grid) => out.extend(grid.take_events().into_iter().map(|event| {
                    BoardEvent {
                        container: container.clone(),
                        event: ContainerEvent::Grid(event),
                    }
                })),
                Container::Flex(flex) => out.extend(flex.take_events().into_iter().map(|event| {
                    BoardEvent {
                        container: container.clone(),
                        event: ContainerEvent::Flex(event),
                    }
                })),
            }
        }
        out
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.containers
            .iter()
            .position(|mounted| mounted.container.id() == id)
    }

    fn resize_to(
        &mut self,
        container: &str,
        item_id: &str,
        edge: ResizeEdge,
        pointer: Point,
        start_pointer: Point,
        start_rect: Rect,
    ) {
        let Some(grid) = self.grid_mut(container) else {
            return;
        };
        let Some(item) = grid.item(item_id).cloned() else {
            return;
        };
        let dx = pointer.x - start_pointer.x;
        let dy = pointer.y - start_pointer.y;
        let width = if edge.moves_left() {
            start_rect.width - dx
        } else if edge.changes_width() {
            start_rect.width + dx
        } else {
            start_rect.width
        };
        let height = if edge.moves_top() {
            start_rect.height - dy
        } else if edge.changes_height() {
            start_rect.height + dy
        } else {
            start_rect.height
        };
        let (w, h) = grid.size_in_cells(width.max(0.0), height.max(0.0), item.x, item.y);
        grid.on_resize(item_id, w, h, edge);
    }

    fn drag_to(
        &mut self,
        source: &str,
        item_id: &str,
        pointer: Point,
        grab_offset: Point,
        size: Size,
    ) {
        let hovered = if self.coordinator.is_dragging() {
            self.coordinator.update_drag(pointer)
        } else {
            None
        };
        let collapse = hovered.is_some();

        for index in 0..self.containers.len() {
            let bounds = self.containers[index].bounds;
            let id = self.containers[index].container.id().to_string();
            if id == source {
                match &mut self.containers[index].container {
                    Container::Grid(grid) => {
                        let Some(item) = grid.item(item_id).cloned() else {
                            continue;
                        };
                        let top_left = pointer
                            .offset_from(bounds.origin())
                            .offset_from(grab_offset);
                        let (x, y) = grid.cell_at(top_left, item.w, item.h);
                        grid.on_drag(item_id, x, y, collapse);
                    }
                    Container::Flex(flex) => {
                        let rects = flow(bounds, flex.config()).layout(flex.layout());
                        let dragged = Rect::new(
                            pointer.x - grab_offset.x,
                            pointer.y - grab_offset.y,
                            size.width,
                            size.height,
                        );
                        flex.on_drag(item_id, pointer, dragged, collapse, &rects);
                    }
                }
                continue;
            }

            if hovered.as_deref() != Some(id.as_str()) {
                self.containers[index].container.clear_external_drag();
                continue;
            }
            let Some(incoming) = self.coordinator.transform_for(&id) else {
                continue;
            };
            match (&mut self.containers[index].container, incoming) {
                (Container::Grid(grid), LayoutItem::Grid(item)) => {
                    let local = pointer.offset_from(bounds.origin());
                    let rect = grid.item_rect(&item);
                    let grab = Point::new(
                        grab_offset.x.min((rect.width - 1.0).max(0.0)),
                        grab_offset.y.min((rect.height - 1.0).max(0.0)),
                    );
                    grid.handle_external_drag(&item, local, grab);
                }
                (Container::Flex(flex), LayoutItem::Flex(item)) => {
                    let rects = flow(bounds, flex.config()).layout(flex.layout());
                    flex.handle_external_drag(&item, pointer, &rects);
                }
                (_, item) => {
                    tracing::warn!(
                        container = %id,
                        item = %item.id(),
                        "transform produced an item of the wrong kind"
                    );
                }
            }
        }
    }

    fn finish_drag(&mut self, source: &str, item_id: &str, pointer: Point, grab_offset: Point) {
        if !self.coordinator.is_dragging() {
            self.commit_source(source, item_id, pointer, grab_offset);
            return;
        }

        let hovered = self.coordinator.hovered_target().map(str::to_string);
        if let Some(target) = hovered.as_deref()
            && let Some(index) = self.index_of(target)
        {
            let placed = self.containers[index].container.handle_external_drop();
            if placed.is_none() {
                self.coordinator.abort_drag();
                self.cancel_source(source);
            } else {
                self.coordinator.end_drag(Some(target));
                self.cancel_source(source);
            }
            self.clear_external_previews();
            return;
        }

        let dropped_on = hovered.or_else(|| {
            self.bounds(source)
                .filter(|bounds| rect_contains(*bounds, pointer))
                .map(|_| source.to_string())
        });
        match self.coordinator.end_drag(dropped_on.as_deref()) {
            Some(DropOutcome::Source { .. }) => {
                self.commit_source(source, item_id, pointer, grab_offset)
            }
            Some(DropOutcome::External { .. })
            | Some(DropOutcome::Outside { .. })
            | Some(DropOutcome::Transfer { .. })
            | None => self.cancel_source(source),
        }
        self.clear_external_previews();
    }

    fn commit_source(&mut self, source: &str, item_id: &str, pointer: Point, grab_offset: Point) {
        let Some(index) = self.index_of(source) else {
            return;
        };
        let bounds = self.containers[index].bounds;
        match &mut self.containers[index].container {
            Container::Grid(grid) => {
                let Some(item) = grid.item(item_id).cloned() else {
                    grid.cancel_drag();
                    return;
                };
                let top_left = pointer.offset_from(bounds.origin()).offset_from(grab_offset);
                let (x, y) = grid.cell_at(top_left, item.w, item.h);
                grid.on_drag_stop(item_id, x, y);
            }
            Container::Flex(flex) => flex.on_drag_stop(item_id),
        }
    }

    fn cancel_source(&mut self, source: &str) {
        if let Some(index) = self.index_of(source) {
            self.containers[index].container.cancel_drag();
        }
    }

    fn clear_external_previews(&mut self) {
        for mounted in &mut self.containers {
            mounted.container.clear_external_drag();
        }
    }

    fn process_coordinator_events(&mut self) {
        for event in self.coordinator.take_events() {
            match event {
                CoordinatorEvent::ItemRemoved { source, item_id } => {
                    if let Some(index) = self.index_of(&source) {
                        self.containers[index].container.remove_item(&item_id);
                    }
                }
                CoordinatorEvent::ExternalDrop {
                    target,
                    item,
                    pointer,
                } => self.events.push(BoardEvent {
                    container: target,
                    event: ContainerEvent::ExternalDrop { item, pointer },
                }),
                CoordinatorEvent::SessionAborted { source } => {
                    tracing::debug!(container = %source, "drag session aborted");
                    if self
                        .gesture
                        .as_ref()
                        .is_some_and(|gesture| gesture_container(gesture) == source)
                    {
                        self.gesture = None;
                    }
                    self.cancel_source(&source);
                    self.clear_external_previews();
                }
                CoordinatorEvent::HoverChanged { from, to } => {
                    tracing::trace!(?from, ?to, "hover changed");
                }
            }
        }
    }
}

fn gesture_container(gesture: &Gesture) -> &str {
    match gesture {
        Gesture::Drag { container, .. } | Gesture::Resize { container, .. } => container,
    }
}

fn flow(bounds: Rect, config: &FlexConfig) -> FlowMeasure {
    FlowMeasure::new(bounds, config.direction, config.gap)
}

/// Item hit test. Half-open, so adjacent items never share a pixel.
fn hit(rect: Rect, point: Point) -> bool {
    point.x >= rect.left && point.x < rect.right() && point.y >= rect.top && point.y < rect.bottom()
}

fn on_resize_handle(rect: Rect, point: Point) -> bool {
    point.x >= rect.right() - 1.0 && point.y >= rect.bottom() - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::grid::GridLayoutItem;

    fn grid_config() -> GridConfig {
        GridConfig {
            columns: 12,
            row_height: 10.0,
            width: 120.0,
            margin: [0.0, 0.0],
            container_padding: Some([0.0, 0.0]),
            ..GridConfig::default()
        }
    }

    fn board() -> Board {
        let mut board = Board::new();
        let grid = GridContainer::new(
            "grid",
            grid_config(),
            vec![
                GridLayoutItem::new("a", 0, 0, 2, 2),
                GridLayoutItem::new("b", 2, 0, 2, 2),
            ],
        )
        .unwrap();
        board
            .mount_grid(grid, Rect::new(0.0, 0.0, 120.0, 100.0), CrossContainerConfig::default())
            .unwrap();
        board
    }

    #[test]
    fn drag_within_grid_commits_on_release() {
        let mut board = board();
        assert!(board.pointer_down(Point::new(5.0, 5.0)));
        board.pointer_move(Point::new(65.0, 5.0));
        board.pointer_up(Point::new(65.0, 5.0));
        let a = board.grid("grid").unwrap().item("a").unwrap().clone();
        assert_eq!((a.x, a.y), (6, 0));
        assert!(!board.is_gesture_active());
        assert!(!board.coordinator().is_dragging());
    }

    #[test]
    fn bottom_right_cell_starts_a_resize() {
        let mut board = board();
        assert!(board.pointer_down(Point::new(19.0, 19.0)));
        assert!(board.grid("grid").unwrap().is_resizing());
        board.pointer_up(Point::new(39.0, 19.0));
        assert_eq!(board.grid("grid").unwrap().item("a").map(|a| a.w), Some(4));
    }

    #[test]
    fn duplicate_mount_is_rejected() {
        let mut board = board();
        let again = GridContainer::new("grid", grid_config(), Vec::new()).unwrap();
        assert_eq!(
            board
                .mount_grid(again, Rect::new(0.0, 200.0, 120.0, 100.0), CrossContainerConfig::default())
                .unwrap_err(),
            LayoutError::DuplicateTarget("grid".into())
        );
    }

    #[test]
    fn set_bounds_resizes_grid_width() {
        let mut board = board();
        board
            .set_bounds("grid", Rect::new(10.0, 10.0, 240.0, 100.0))
            .unwrap();
        assert_eq!(board.grid("grid").unwrap().config().width, 240.0);
        assert_eq!(
            board.coordinator().snapshot("grid").map(|s| s.geometry),
            Some(TargetGeometry::Grid {
                columns: 12,
                row_height: 10.0,
                width: 240.0,
                margin: [0.0, 0.0],
            })
        );
    }
}
