//! Graph index: identifier and relationship lookups over a model
//!
//! The index caches two maps built in one pass over [`Model::walk`]:
//! identifier → object, and concept → incident relationships. The cache is
//! stamped with the model instance and its structural version. Every read
//! compares the stamp against the model it is handed and rebuilds on
//! mismatch, so a read issued after a mutation always sees that mutation.
//!
//! Rebuilds happen off to the side and are swapped in whole under a write
//! lock; readers only ever hold a complete snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace};

use crate::model::{DiagramObjectKind, Model, Node, ObjectKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    instance: u64,
    version: u64,
}

impl Stamp {
    fn of(model: &Model) -> Self {
        Self {
            instance: model.instance(),
            version: model.version(),
        }
    }
}

#[derive(Debug)]
struct Snapshot {
    stamp: Stamp,
    by_id: HashMap<String, ObjectKey>,
    relationships: HashMap<ObjectKey, Vec<ObjectKey>>,
    views: HashMap<ObjectKey, Vec<ObjectKey>>,
}

impl Snapshot {
    fn build(model: &Model) -> Self {
        let order = model.walk();
        let mut by_id = HashMap::with_capacity(order.len());
        let mut relationships: HashMap<ObjectKey, Vec<ObjectKey>> = HashMap::new();
        let mut views: HashMap<ObjectKey, Vec<ObjectKey>> = HashMap::new();

        for key in order {
            let Some(node) = model.get(key) else {
                continue;
            };
            by_id.insert(node.id().to_string(), key);

            match node {
                Node::Concept(concept) => {
                    if let Some((source, target)) = concept.endpoints() {
                        relationships.entry(source).or_default().push(key);
                        if target != source {
                            relationships.entry(target).or_default().push(key);
                        }
                    }
                }
                Node::Object(object) => {
                    if let DiagramObjectKind::Element { concept } = object.kind() {
                        note_view(&mut views, *concept, object.view());
                    }
                }
                Node::Connection(connection) => {
                    if let Some(relationship) = connection.relationship() {
                        note_view(&mut views, relationship, connection.view());
                    }
                }
                Node::Folder(_) | Node::View(_) => {}
            }
        }

        Self {
            stamp: Stamp::of(model),
            by_id,
            relationships,
            views,
        }
    }
}

fn note_view(views: &mut HashMap<ObjectKey, Vec<ObjectKey>>, concept: ObjectKey, view: ObjectKey) {
    let entry = views.entry(concept).or_default();
    if !entry.contains(&view) {
        entry.push(view);
    }
}

/// Lazily rebuilt lookup tables for one model
///
/// The model is passed into every read. Handing the same index a different
/// model simply triggers a rebuild.
#[derive(Debug, Default)]
pub struct GraphIndex {
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    rebuilds: AtomicUsize,
}

impl GraphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an object by identifier
    ///
    /// Returns None for an empty or unknown identifier.
    pub fn by_id<'m>(&self, model: &'m Model, id: &str) -> Option<&'m Node> {
        self.key_of(model, id).and_then(|key| model.get(key))
    }

    /// Key of the object with this identifier
    pub fn key_of(&self, model: &Model, id: &str) -> Option<ObjectKey> {
        if id.is_empty() {
            return None;
        }
        self.snapshot(model).by_id.get(id).copied()
    }

    /// Relationships whose source or target is `concept`, in traversal order
    pub fn relationships_of(&self, model: &Model, concept: ObjectKey) -> Vec<ObjectKey> {
        self.snapshot(model)
            .relationships
            .get(&concept)
            .cloned()
            .unwrap_or_default()
    }

    /// Views showing `concept`, in traversal order
    pub fn referencing_views(&self, model: &Model, concept: ObjectKey) -> Vec<ObjectKey> {
        self.snapshot(model)
            .views
            .get(&concept)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of indexed identifiers
    pub fn len(&self, model: &Model) -> usize {
        self.snapshot(model).by_id.len()
    }

    pub fn is_empty(&self, model: &Model) -> bool {
        self.len(model) == 0
    }

    /// Model version the cached maps were built from, if any
    pub fn version(&self) -> Option<u64> {
        self.read().as_ref().map(|s| s.stamp.version)
    }

    /// How many times the maps have been rebuilt
    pub fn rebuilds(&self) -> usize {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Drop the cached maps; the next read rebuilds them
    pub fn invalidate(&self) {
        *self.write() = None;
    }

    fn snapshot(&self, model: &Model) -> Arc<Snapshot> {
        let stamp = Stamp::of(model);
        if let Some(current) = self.read().as_ref().filter(|s| s.stamp == stamp) {
            trace!("graph index hit at version {}", stamp.version);
            return Arc::clone(current);
        }

        let fresh = Arc::new(Snapshot::build(model));
        let mut guard = self.write();
        match guard.as_ref() {
            // Another reader finished the same rebuild first
            Some(current) if current.stamp == stamp => Arc::clone(current),
            _ => {
                debug!(
                    "rebuilt graph index at version {} ({} objects)",
                    stamp.version,
                    fresh.by_id.len()
                );
                self.rebuilds.fetch_add(1, Ordering::Relaxed);
                *guard = Some(Arc::clone(&fresh));
                fresh
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Arc<Snapshot>>> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Arc<Snapshot>>> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }
}
