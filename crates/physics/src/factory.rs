use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle to a created body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// How the body participates in simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Static,
    Dynamic,
    Kinematic,
}

/// Shape of the single fixture attached to a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeDesc {
    Box { width: f32, height: f32 },
    Circle { radius: f32 },
    Polygon { points: Vec<Vec2> },
}

/// Category/mask collision filter, one fixture per body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: u16,
    pub mask: u16,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category: 0x0001,
            mask: 0xFFFF,
        }
    }
}

/// Everything needed to create a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: ShapeDesc,
    pub position: Vec2,
    pub filter: CollisionFilter,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, shape: ShapeDesc, position: Vec2) -> Self {
        Self {
            kind,
            shape,
            position,
            filter: CollisionFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Errors from body construction.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("shape dimensions must be positive: {0}")]
    InvalidDimensions(String),
    #[error("polygon needs at least 3 points, got {0}")]
    DegeneratePolygon(usize),
    #[error("unknown body: {0:?}")]
    UnknownBody(BodyHandle),
}

struct Body {
    desc: BodyDesc,
    position: Vec2,
}

/// Body factory. Stores handle, kind, and position; nothing else about the
/// underlying engine leaks out.
#[derive(Default)]
pub struct PhysicsWorld {
    next_handle: u64,
    bodies: BTreeMap<BodyHandle, Body>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body from a shape descriptor and placement.
    pub fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle, PhysicsError> {
        match &desc.shape {
            ShapeDesc::Box { width, height } => {
                if *width <= 0.0 || *height <= 0.0 {
                    return Err(PhysicsError::InvalidDimensions(format!(
                        "box {width}x{height}"
                    )));
                }
            }
            ShapeDesc::Circle { radius } => {
                if *radius <= 0.0 {
                    return Err(PhysicsError::InvalidDimensions(format!("circle r={radius}")));
                }
            }
            ShapeDesc::Polygon { points } => {
                if points.len() < 3 {
                    return Err(PhysicsError::DegeneratePolygon(points.len()));
                }
            }
        }

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        let position = desc.position;
        self.bodies.insert(handle, Body { desc, position });
        tracing::debug!(?handle, "body created");
        Ok(handle)
    }

    /// Current position of a body.
    pub fn position(&self, handle: BodyHandle) -> Result<Vec2, PhysicsError> {
        self.bodies
            .get(&handle)
            .map(|b| b.position)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Teleport a body. Kinematic/static placement updates go through here.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(&handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        body.position = position;
        Ok(())
    }

    pub fn body_kind(&self, handle: BodyHandle) -> Result<BodyKind, PhysicsError> {
        self.bodies
            .get(&handle)
            .map(|b| b.desc.kind)
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Destroy a body. Returns false if the handle was unknown.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        let removed = self.bodies.remove(&handle).is_some();
        if removed {
            tracing::debug!(?handle, "body destroyed");
        }
        removed
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
