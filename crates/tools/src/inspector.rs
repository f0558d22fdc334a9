use glint_render::{Compositor, ObjectId, ObjectKind};

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against a compositor for debugging and
/// development UI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(compositor: &Compositor) -> SceneSummary {
        SceneSummary {
            layers: compositor.layer_count(),
            objects: compositor.object_count(),
            spatial_records: compositor.arena().len(),
            tracked: compositor.culling().len(),
            listeners: compositor.input().listener_count(),
            disposed: compositor.is_disposed(),
        }
    }

    /// Describe one registered object.
    pub fn inspect_object(compositor: &Compositor, id: ObjectId) -> Option<ObjectInfo> {
        let entry = compositor.entry(id)?;
        Some(ObjectInfo {
            id,
            layer: compositor.find_layer(id),
            kind: entry.kind().name(),
            bounds: compositor.object_bounds(id).map(|b| [b.x, b.y, b.width, b.height]),
            listens: entry.listener().is_some(),
        })
    }

    /// List all object ids in the scene.
    pub fn list_objects(compositor: &Compositor) -> Vec<ObjectId> {
        compositor.entries().map(|(id, _)| id).collect()
    }

    /// Flag scene entries that can never appear on screen.
    pub fn validate(compositor: &Compositor) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (id, entry) in compositor.entries() {
            if matches!(entry.kind(), ObjectKind::Inert) {
                findings.push(Finding::InertObject(id));
            } else if entry.entity().is_none() {
                findings.push(Finding::Unpositioned(id));
            }
        }
        if compositor.arena().len() != compositor.culling().len() {
            findings.push(Finding::TrackingMismatch {
                spatial: compositor.arena().len(),
                tracked: compositor.culling().len(),
            });
        }
        findings
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub layers: usize,
    pub objects: usize,
    pub spatial_records: usize,
    pub tracked: usize,
    pub listeners: usize,
    pub disposed: bool,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: layers={} objects={} spatial={} tracked={} listeners={}{}",
            self.layers,
            self.objects,
            self.spatial_records,
            self.tracked,
            self.listeners,
            if self.disposed { " (disposed)" } else { "" }
        )
    }
}

/// Detailed info about a single object.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub layer: Option<i32>,
    pub kind: &'static str,
    pub bounds: Option<[f32; 4]>,
    pub listens: bool,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object #{} kind={}", self.id.0, self.kind)?;
        if let Some(layer) = self.layer {
            write!(f, " layer={layer}")?;
        }
        if let Some([x, y, w, h]) = self.bounds {
            write!(f, " bounds=({x:.2}, {y:.2}, {w:.2}x{h:.2})")?;
        }
        if self.listens {
            write!(f, " listening")?;
        }
        Ok(())
    }
}

/// One consistency problem found by [`SceneInspector::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Object has no drawing capability and will never render.
    InertObject(ObjectId),
    /// Drawable or shape without bounds; culling will never select it.
    Unpositioned(ObjectId),
    /// Arena and culling registrations disagree.
    TrackingMismatch { spatial: usize, tracked: usize },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::InertObject(id) => {
                write!(f, "object #{} is inert and will never draw", id.0)
            }
            Finding::Unpositioned(id) => {
                write!(f, "object #{} has no bounds and will never be visible", id.0)
            }
            Finding::TrackingMismatch { spatial, tracked } => write!(
                f,
                "{spatial} spatial records but {tracked} culling registrations"
            ),
        }
    }
}
