//! Cross-container drag coordination.
//!
//! The coordinator owns the drop-target registry and the one drag session
//! that may exist at a time. Containers talk to it with [`RegistryMessage`]s
//! and read back [`DropTargetSnapshot`]s; it never reaches into a container.
//! What a container must do in response (remove a transferred item, clear a
//! placeholder) comes out as [`CoordinatorEvent`]s and [`DropOutcome`]s.

pub mod cache;
pub mod registry;
pub mod transform;

use std::cmp::Ordering;
use std::time::Instant;

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{Point, Rect, Size, rect_contains};
use crate::layout::flex::FlexLayoutItem;
use crate::layout::grid::GridLayoutItem;

pub use cache::BoundsCache;
pub use registry::{
    AcceptsDrop, BoundsProvider, DropTargetRegistration, DropTargetRegistry, DropTargetSnapshot,
    DropZoneHandler, RegistryMessage, TargetGeometry, TargetKind, TargetUpdate,
};
pub use transform::{TransformContext, TransformFn, default_transform};

/// An item in whichever unit system its container uses.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    Grid(GridLayoutItem),
    Flex(FlexLayoutItem),
}

impl LayoutItem {
    pub fn id(&self) -> &str {
        match self {
            LayoutItem::Grid(item) => &item.id,
            LayoutItem::Flex(item) => &item.id,
        }
    }

    pub fn as_grid(&self) -> Option<&GridLayoutItem> {
        match self {
            LayoutItem::Grid(item) => Some(item),
            LayoutItem::Flex(_) => None,
        }
    }

    pub fn as_flex(&self) -> Option<&FlexLayoutItem> {
        match self {
            LayoutItem::Flex(item) => Some(item),
            LayoutItem::Grid(_) => None,
        }
    }

    pub fn into_grid(self) -> Option<GridLayoutItem> {
        match self {
            LayoutItem::Grid(item) => Some(item),
            LayoutItem::Flex(_) => None,
        }
    }

    pub fn into_flex(self) -> Option<FlexLayoutItem> {
        match self {
            LayoutItem::Flex(item) => Some(item),
            LayoutItem::Grid(_) => None,
        }
    }
}

impl From<GridLayoutItem> for LayoutItem {
    fn from(item: GridLayoutItem) -> Self {
        LayoutItem::Grid(item)
    }
}

impl From<FlexLayoutItem> for LayoutItem {
    fn from(item: FlexLayoutItem) -> Self {
        LayoutItem::Flex(item)
    }
}

/// The drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub source_id: String,
    /// The item as its source container knows it.
    pub item: LayoutItem,
    pub pointer: Point,
    /// Pointer position relative to the item's top-left corner at drag start.
    pub grab_offset: Point,
    pub measured_size: Option<Size>,
}

/// What a target should render for the current session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DropState {
    pub is_source: bool,
    /// The pointer is over this target and the target accepts the item.
    pub is_active: bool,
    pub dragged_item: Option<LayoutItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The item moves into another container. `item` is already converted to
    /// the target's units.
    Transfer {
        source: String,
        target: String,
        item: LayoutItem,
    },
    /// The item was handed to an external drop zone.
    External {
        source: String,
        target: String,
        item: LayoutItem,
    },
    /// Released over the source itself; the source commits as usual.
    Source { source: String },
    /// Released over nothing that accepts it; the source restores its
    /// pre-drag layout.
    Outside { source: String },
}

impl DropOutcome {
    pub fn source(&self) -> &str {
        match self {
            DropOutcome::Transfer { source, .. }
            | DropOutcome::External { source, .. }
            | DropOutcome::Source { source }
            | DropOutcome::Outside { source } => source,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorEvent {
    /// The source must delete `item_id`; it now lives somewhere else.
    ItemRemoved { source: String, item_id: String },
    ExternalDrop {
        target: String,
        item: LayoutItem,
        pointer: Point,
    },
    /// The session ended without a drop, e.g. its source went away.
    SessionAborted { source: String },
    HoverChanged {
        from: Option<String>,
        to: Option<String>,
    },
}

#[derive(Debug, Clone, Copy)]
enum HandlerCall {
    Enter(Point),
    Over(Point),
    Leave,
    Drop(Point),
}

/// Owner of the registry and of the single drag session.
#[derive(Default)]
pub struct DragCoordinator {
    registry: DropTargetRegistry,
    cache: BoundsCache,
    transform: Option<TransformFn>,
    session: Option<DragSession>,
    hovered: Option<String>,
    events: Vec<CoordinatorEvent>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the default size-preserving transform for every target that
    /// has no override of its own.
    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn set_transform(&mut self, transform: Option<TransformFn>) {
        self.transform = transform;
    }

    /// Applies one registry message.
    pub fn send(&mut self, message: RegistryMessage) -> LayoutResult<()> {
        match message {
            RegistryMessage::Register(registration) => {
                let id = registration.id.clone();
                let kind = registration.geometry.kind();
                self.registry.register(registration)?;
                tracing::debug!(drop_target = %id, ?kind, "drop target registered");
            }
            RegistryMessage::Update { id, update } => {
                let moves = update.moves_bounds() || update.geometry.is_some();
                self.registry.update(&id, update)?;
                if moves {
                    self.cache.invalidate(&id);
                }
                tracing::trace!(drop_target = %id, "drop target updated");
            }
            RegistryMessage::Unregister(id) => {
                self.unregister_target(&id)?;
            }
            RegistryMessage::InvalidateBounds(id) => {
                if !self.registry.contains(&id) {
                    return Err(LayoutError::UnknownTarget(id));
                }
                self.cache.invalidate(&id);
            }
        }
        Ok(())
    }

    pub fn register(&mut self, registration: DropTargetRegistration) -> LayoutResult<()> {
        self.send(RegistryMessage::Register(registration))
    }

    pub fn update(&mut self, id: impl Into<String>, update: TargetUpdate) -> LayoutResult<()> {
        self.send(RegistryMessage::Update {
            id: id.into(),
            update,
        })
    }

    pub fn unregister(&mut self, id: impl Into<String>) -> LayoutResult<()> {
        self.send(RegistryMessage::Unregister(id.into()))
    }

    pub fn invalidate_bounds(&mut self, id: impl Into<String>) -> LayoutResult<()> {
        self.send(RegistryMessage::InvalidateBounds(id.into()))
    }

    fn unregister_target(&mut self, id: &str) -> LayoutResult<()> {
        let mut registration = self.registry.unregister(id)?;
        self.cache.invalidate(id);
        tracing::debug!(drop_target = %id, "drop target unregistered");

        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
            if let (Some(handler), Some(session)) = (registration.handler.as_mut(), &self.session) {
                handler.on_drag_leave(&session.item);
            }
            self.events.push(CoordinatorEvent::HoverChanged {
                from: Some(id.to_string()),
                to: None,
            });
        }
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.source_id == id)
        {
            tracing::debug!(source = %id, "drag source unregistered mid-drag");
            self.abort_drag();
        }
        Ok(())
    }

    /// Opens a session for `item` leaving `source_id`.
    pub fn start_drag(
        &mut self,
        source_id: &str,
        item: LayoutItem,
        pointer: Point,
        grab_offset: Point,
        measured_size: Option<Size>,
    ) -> LayoutResult<()> {
        if let Some(session) = &self.session {
            tracing::warn!(
                source = %source_id,
                active = %session.source_id,
                "drag started while another drag is active"
            );
            return Err(LayoutError::DragAlreadyActive);
        }
        let Some(target) = self.registry.get(source_id) else {
            return Err(LayoutError::UnknownTarget(source_id.to_string()));
        };
        if !target.registration.enabled {
            return Err(LayoutError::InvalidConfig(format!(
                "cross-container drag is disabled for `{source_id}`"
            )));
        }
        tracing::debug!(source = %source_id, item = %item.id(), "cross-container drag started");
        self.hovered = None;
        self.session = Some(DragSession {
            source_id: source_id.to_string(),
            item,
            pointer,
            grab_offset,
            measured_size,
        });
        Ok(())
    }

    /// Hit tests `pointer` and returns the hovered target, if any.
    pub fn update_drag(&mut self, pointer: Point) -> Option<String> {
        self.update_drag_at(pointer, Instant::now())
    }

    /// [`update_drag`](Self::update_drag) against an explicit clock, for
    /// callers that drive the bounds cache themselves.
    pub fn update_drag_at(&mut self, pointer: Point, now: Instant) -> Option<String> {
        let session = self.session.as_mut()?;
        session.pointer = pointer;
        let hovered = hit_test(&self.registry, &mut self.cache, session, now);
        let session = &*session;

        if hovered != self.hovered {
            if let Some(previous) = &self.hovered {
                notify(&mut self.registry, previous, &session.item, HandlerCall::Leave);
            }
            if let Some(next) = &hovered {
                notify(&mut self.registry, next, &session.item, HandlerCall::Enter(pointer));
            }
            tracing::trace!(from = ?self.hovered, to = ?hovered, "hover changed");
            self.events.push(CoordinatorEvent::HoverChanged {
                from: self.hovered.clone(),
                to: hovered.clone(),
            });
            self.hovered = hovered.clone();
        } else if let Some(current) = &hovered {
            notify(&mut self.registry, current, &session.item, HandlerCall::Over(pointer));
        }
        hovered
    }

    /// Closes the session. `dropped_on` is the target under the pointer at
    /// release, normally [`hovered_target`](Self::hovered_target).
    pub fn end_drag(&mut self, dropped_on: Option<&str>) -> Option<DropOutcome> {
        let session = self.session.take()?;
        let hovered = self.hovered.take();
        let source = session.source_id.clone();

        if let Some(previous) = hovered.as_deref()
            && dropped_on != Some(previous)
        {
            notify(&mut self.registry, previous, &session.item, HandlerCall::Leave);
        }

        let accepting = dropped_on.filter(|target_id| {
            *target_id != source
                && self.registry.get(target_id).is_some_and(|target| {
                    target.registration.enabled
                        && target.registration.accepts.accepts(&session.item, &source)
                })
        });

        let outcome = match accepting {
            Some(target_id) => {
                let target = target_id.to_string();
                let external = self
                    .registry
                    .get(target_id)
                    .is_some_and(|t| t.registration.geometry.kind() == TargetKind::External);
                self.events.push(CoordinatorEvent::ItemRemoved {
                    source: source.clone(),
                    item_id: session.item.id().to_string(),
                });
                if external {
                    notify(
                        &mut self.registry,
                        target_id,
                        &session.item,
                        HandlerCall::Drop(session.pointer),
                    );
                    self.events.push(CoordinatorEvent::ExternalDrop {
                        target: target.clone(),
                        item: session.item.clone(),
                        pointer: session.pointer,
                    });
                    DropOutcome::External {
                        source,
                        target,
                        item: session.item,
                    }
                } else {
                    let item = self
                        .transform_session_item(&session, target_id)
                        .unwrap_or_else(|| session.item.clone());
                    DropOutcome::Transfer {
                        source,
                        target,
                        item,
                    }
                }
            }
            None if dropped_on == Some(source.as_str()) => DropOutcome::Source { source },
            None => DropOutcome::Outside { source },
        };
        tracing::debug!(?outcome, "cross-container drag ended");
        Some(outcome)
    }

    /// Ends the session without a drop. Every hovered external zone gets its
    /// leave callback.
    pub fn abort_drag(&mut self) -> Option<DragSession> {
        let session = self.session.take()?;
        if let Some(previous) = self.hovered.take() {
            notify(&mut self.registry, &previous, &session.item, HandlerCall::Leave);
        }
        tracing::debug!(source = %session.source_id, "cross-container drag aborted");
        self.events.push(CoordinatorEvent::SessionAborted {
            source: session.source_id.clone(),
        });
        Some(session)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn hovered_target(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn query_drop_state(&self, id: &str) -> DropState {
        let Some(session) = &self.session else {
            return DropState::default();
        };
        DropState {
            is_source: session.source_id == id,
            is_active: self.hovered.as_deref() == Some(id),
            dragged_item: Some(session.item.clone()),
        }
    }

    pub fn snapshot(&self, id: &str) -> Option<DropTargetSnapshot> {
        self.registry.snapshot(id)
    }

    pub fn targets(&self) -> Vec<DropTargetSnapshot> {
        self.registry.snapshots()
    }

    /// Current rectangle of a target, straight from its provider.
    pub fn target_bounds(&self, id: &str) -> Option<Rect> {
        self.registry
            .get(id)
            .and_then(|target| target.registration.bounds.bounds())
    }

    /// The dragged item converted for `target_id`, if a session is running.
    pub fn transform_for(&self, target_id: &str) -> Option<LayoutItem> {
        let session = self.session.as_ref()?;
        self.transform_session_item(session, target_id)
    }

    fn transform_session_item(&self, session: &DragSession, target_id: &str) -> Option<LayoutItem> {
        let target = self.registry.get(target_id)?;
        let Some(source) = self.registry.get(&session.source_id) else {
            return Some(session.item.clone());
        };
        let ctx = TransformContext {
            item: &session.item,
            source: &source.registration.geometry,
            target: &target.registration.geometry,
            measured_size: session.measured_size,
        };
        let item = match (&target.registration.transform, &self.transform) {
            (Some(transform), _) | (None, Some(transform)) => transform(&ctx),
            (None, None) => default_transform(&ctx),
        };
        Some(item)
    }

    pub fn take_events(&mut self) -> Vec<CoordinatorEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Best accepting target under the session pointer: highest z-index, then
/// smallest area, then earliest registration. The source never counts.
fn hit_test(
    registry: &DropTargetRegistry,
    cache: &mut BoundsCache,
    session: &DragSession,
    now: Instant,
) -> Option<String> {
    let mut best: Option<(&str, i32, f64, u64)> = None;
    for target in registry.iter() {
        let registration = &target.registration;
        if registration.id == session.source_id
            || !registration.enabled
            || !registration.accepts.accepts(&session.item, &session.source_id)
        {
            continue;
        }
        let Some(bounds) = cache.get_or_measure(&registration.id, now, || registration.bounds.bounds())
        else {
            continue;
        };
        if !rect_contains(bounds, session.pointer) {
            continue;
        }
        let candidate = (
            registration.id.as_str(),
            registration.z_index,
            bounds.area(),
            target.sequence,
        );
        let better = match best {
            None => true,
            Some(current) => compare_candidates(&candidate, &current) == Ordering::Less,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.map(|(id, ..)| id.to_string())
}

fn compare_candidates(a: &(&str, i32, f64, u64), b: &(&str, i32, f64, u64)) -> Ordering {
    b.1.cmp(&a.1)
        .then(a.2.total_cmp(&b.2))
        .then(a.3.cmp(&b.3))
}

fn notify(registry: &mut DropTargetRegistry, id: &str, item: &LayoutItem, call: HandlerCall) {
    let Some(handler) = registry
        .get_mut(id)
        .and_then(|target| target.registration.handler.as_mut())
    else {
        return;
    };
    match call {
        HandlerCall::Enter(pointer) => handler.on_drag_enter(item, pointer),
        HandlerCall::Over(pointer) => handler.on_drag_over(item, pointer),
        HandlerCall::Leave => handler.on_drag_leave(item),
        HandlerCall::Drop(pointer) => handler.on_drop(item, pointer),
    }
}
