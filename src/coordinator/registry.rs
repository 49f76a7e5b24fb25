//! Drop-target registry.
//!
//! Containers never touch the registry directly: they describe themselves in
//! a [`RegistryMessage`] and the coordinator applies it. Reads go through
//! [`DropTargetSnapshot`], a plain copy of the registration data.

use std::fmt;

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::{Point, Rect};
use crate::layout::flex::{FlexConfig, FlexDirection};
use crate::layout::grid::GridConfig;

use super::LayoutItem;
use super::transform::TransformFn;

/// Source of a target's on-screen rectangle. `None` means the target cannot
/// be measured right now and is skipped by hit testing.
pub trait BoundsProvider {
    fn bounds(&self) -> Option<Rect>;
}

impl BoundsProvider for Rect {
    fn bounds(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl BoundsProvider for Option<Rect> {
    fn bounds(&self) -> Option<Rect> {
        *self
    }
}

impl<F> BoundsProvider for F
where
    F: Fn() -> Option<Rect>,
{
    fn bounds(&self) -> Option<Rect> {
        self()
    }
}

/// Whether a target takes a given item. Predicates run on every pointer
/// move and must stay cheap.
#[derive(Default)]
pub enum AcceptsDrop {
    #[default]
    Always,
    Never,
    When(Box<dyn Fn(&LayoutItem, &str) -> bool>),
}

impl AcceptsDrop {
    pub fn when(predicate: impl Fn(&LayoutItem, &str) -> bool + 'static) -> Self {
        AcceptsDrop::When(Box::new(predicate))
    }

    pub fn accepts(&self, item: &LayoutItem, source_id: &str) -> bool {
        match self {
            AcceptsDrop::Always => true,
            AcceptsDrop::Never => false,
            AcceptsDrop::When(predicate) => predicate(item, source_id),
        }
    }
}

impl From<bool> for AcceptsDrop {
    fn from(accepts: bool) -> Self {
        if accepts {
            AcceptsDrop::Always
        } else {
            AcceptsDrop::Never
        }
    }
}

impl fmt::Debug for AcceptsDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptsDrop::Always => f.write_str("Always"),
            AcceptsDrop::Never => f.write_str("Never"),
            AcceptsDrop::When(_) => f.write_str("When(..)"),
        }
    }
}

/// Callbacks for drop zones that are not layout containers.
///
/// Enter and leave fire once per transition, over fires on every pointer
/// move in between.
pub trait DropZoneHandler {
    fn on_drag_enter(&mut self, _item: &LayoutItem, _pointer: Point) {}

    fn on_drag_over(&mut self, _item: &LayoutItem, _pointer: Point) {}

    fn on_drag_leave(&mut self, _item: &LayoutItem) {}

    fn on_drop(&mut self, _item: &LayoutItem, _pointer: Point) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Grid,
    Flex,
    External,
}

/// What a transform needs to know about a target's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetGeometry {
    Grid {
        columns: i32,
        row_height: f64,
        width: f64,
        margin: [f64; 2],
    },
    Flex {
        direction: FlexDirection,
        gap: f64,
    },
    External,
}

impl TargetGeometry {
    pub fn kind(&self) -> TargetKind {
        match self {
            TargetGeometry::Grid { .. } => TargetKind::Grid,
            TargetGeometry::Flex { .. } => TargetKind::Flex,
            TargetGeometry::External => TargetKind::External,
        }
    }
}

impl From<&GridConfig> for TargetGeometry {
    fn from(config: &GridConfig) -> Self {
        TargetGeometry::Grid {
            columns: config.columns,
            row_height: config.row_height,
            width: config.width,
            margin: config.margin,
        }
    }
}

impl From<&FlexConfig> for TargetGeometry {
    fn from(config: &FlexConfig) -> Self {
        TargetGeometry::Flex {
            direction: config.direction,
            gap: config.gap,
        }
    }
}

pub struct DropTargetRegistration {
    pub id: String,
    pub geometry: TargetGeometry,
    pub bounds: Box<dyn BoundsProvider>,
    pub accepts: AcceptsDrop,
    /// Cross-container dragging switch. A disabled target is neither a drag
    /// source for the coordinator nor a drop target.
    pub enabled: bool,
    /// Higher values win when hit zones overlap.
    pub z_index: i32,
    /// Overrides the coordinator's transform for items entering this target.
    pub transform: Option<TransformFn>,
    pub handler: Option<Box<dyn DropZoneHandler>>,
}

impl DropTargetRegistration {
    pub fn new(
        id: impl Into<String>,
        geometry: TargetGeometry,
        bounds: impl BoundsProvider + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            geometry,
            bounds: Box::new(bounds),
            accepts: AcceptsDrop::Always,
            enabled: true,
            z_index: 0,
            transform: None,
            handler: None,
        }
    }

    pub fn with_accepts(mut self, accepts: AcceptsDrop) -> Self {
        self.accepts = accepts;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_handler(mut self, handler: impl DropZoneHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for DropTargetRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTargetRegistration")
            .field("id", &self.id)
            .field("geometry", &self.geometry)
            .field("accepts", &self.accepts)
            .field("enabled", &self.enabled)
            .field("z_index", &self.z_index)
            .field("transform", &self.transform.is_some())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Partial update of a registration. Unset fields keep their value.
#[derive(Default)]
pub struct TargetUpdate {
    pub geometry: Option<TargetGeometry>,
    pub bounds: Option<Box<dyn BoundsProvider>>,
    pub accepts: Option<AcceptsDrop>,
    pub enabled: Option<bool>,
    pub z_index: Option<i32>,
}

impl TargetUpdate {
    pub fn geometry(mut self, geometry: TargetGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn bounds(mut self, bounds: impl BoundsProvider + 'static) -> Self {
        self.bounds = Some(Box::new(bounds));
        self
    }

    pub fn accepts(mut self, accepts: AcceptsDrop) -> Self {
        self.accepts = Some(accepts);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Whether applying the update can change where the target is.
    pub fn moves_bounds(&self) -> bool {
        self.bounds.is_some()
    }
}

impl fmt::Debug for TargetUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetUpdate")
            .field("geometry", &self.geometry)
            .field("bounds", &self.bounds.is_some())
            .field("accepts", &self.accepts)
            .field("enabled", &self.enabled)
            .field("z_index", &self.z_index)
            .finish()
    }
}

#[derive(Debug)]
pub enum RegistryMessage {
    Register(DropTargetRegistration),
    Update { id: String, update: TargetUpdate },
    Unregister(String),
    /// The target moved or resized without a new provider; drop any cached
    /// rectangle.
    InvalidateBounds(String),
}

/// Read-only copy of a registration.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTargetSnapshot {
    pub id: String,
    pub kind: TargetKind,
    pub geometry: TargetGeometry,
    pub enabled: bool,
    pub z_index: i32,
    /// Registration sequence number, lower registered earlier.
    pub sequence: u64,
}

pub(crate) struct RegisteredTarget {
    pub(crate) registration: DropTargetRegistration,
    pub(crate) sequence: u64,
}

impl RegisteredTarget {
    pub(crate) fn snapshot(&self) -> DropTargetSnapshot {
        let registration = &self.registration;
        DropTargetSnapshot {
            id: registration.id.clone(),
            kind: registration.geometry.kind(),
            geometry: registration.geometry,
            enabled: registration.enabled,
            z_index: registration.z_index,
            sequence: self.sequence,
        }
    }
}

/// Targets in registration order.
#[derive(Default)]
pub struct DropTargetRegistry {
    targets: Vec<RegisteredTarget>,
    next_sequence: u64,
}

impl DropTargetRegistry {
    pub fn register(&mut self, registration: DropTargetRegistration) -> LayoutResult<()> {
        if registration.id.is_empty() {
            return Err(LayoutError::InvalidConfig(
                "drop target id must not be empty".into(),
            ));
        }
        if self.contains(&registration.id) {
            return Err(LayoutError::DuplicateTarget(registration.id));
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.targets.push(RegisteredTarget {
            registration,
            sequence,
        });
        Ok(())
    }

    pub fn update(&mut self, id: &str, update: TargetUpdate) -> LayoutResult<()> {
        let target = self
            .get_mut(id)
            .ok_or_else(|| LayoutError::UnknownTarget(id.to_string()))?;
        let registration = &mut target.registration;
        if let Some(geometry) = update.geometry {
            registration.geometry = geometry;
        }
        if let Some(bounds) = update.bounds {
            registration.bounds = bounds;
        }
        if let Some(accepts) = update.accepts {
            registration.accepts = accepts;
        }
        if let Some(enabled) = update.enabled {
            registration.enabled = enabled;
        }
        if let Some(z_index) = update.z_index {
            registration.z_index = z_index;
        }
        Ok(())
    }

    pub fn unregister(&mut self, id: &str) -> LayoutResult<DropTargetRegistration> {
        let index = self
            .targets
            .iter()
            .position(|target| target.registration.id == id)
            .ok_or_else(|| LayoutError::UnknownTarget(id.to_string()))?;
        Ok(self.targets.remove(index).registration)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get(&self, id: &str) -> Option<&RegisteredTarget> {
        self.targets.iter().find(|target| target.registration.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut RegisteredTarget> {
        self.targets
            .iter_mut()
            .find(|target| target.registration.id == id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &RegisteredTarget> {
        self.targets.iter()
    }

    pub fn snapshot(&self, id: &str) -> Option<DropTargetSnapshot> {
        self.get(id).map(RegisteredTarget::snapshot)
    }

    pub fn snapshots(&self) -> Vec<DropTargetSnapshot> {
        self.targets.iter().map(RegisteredTarget::snapshot).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
