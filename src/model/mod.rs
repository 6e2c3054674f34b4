//! In-memory ArchiMate model graph
//!
//! All objects of a model are nodes of one [`StableGraph`] and are addressed
//! by [`ObjectKey`]. Edges carry the structure: folders contain concepts,
//! views and subfolders; views contain a tree of diagram objects plus the
//! connections drawn between them. Relationships and attached connections
//! point at their endpoints, and diagram components point at the concept or
//! view they show.
//!
//! Every structural mutation (insert, remove, reparent, identifier change)
//! advances [`Model::version`]. Setters for names, documentation, properties
//! and note content leave it alone, as does [`Model::disconnect`], because
//! none of them change what the graph index holds.

mod concept;
mod diagram;
mod error;
mod folder;

pub use concept::{Category, Concept, ConceptKind, ElementType, Property, RelationshipType};
pub use diagram::{DiagramConnection, DiagramObject, DiagramObjectKind, Group, Note, View};
pub use error::ModelError;
pub use folder::{Folder, FolderType};

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction::{self, Incoming, Outgoing};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Handle for an object in a [`Model`]
///
/// Graph slots are reused once their object is removed, so a key also
/// carries the serial number its object was created with. A key whose object
/// is gone never resolves again, even after its slot is taken by a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    index: NodeIndex,
    serial: u64,
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index.index())
    }
}

/// Any object stored in a model
#[derive(Debug, Clone)]
pub enum Node {
    Folder(Folder),
    Concept(Concept),
    View(View),
    Object(DiagramObject),
    Connection(DiagramConnection),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Folder(f) => f.id(),
            Node::Concept(c) => c.id(),
            Node::View(v) => v.id(),
            Node::Object(o) => o.id(),
            Node::Connection(c) => c.id(),
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_concept(&self) -> Option<&Concept> {
        match self {
            Node::Concept(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            Node::View(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DiagramObject> {
        match self {
            Node::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_connection(&self) -> Option<&DiagramConnection> {
        match self {
            Node::Connection(c) => Some(c),
            _ => None,
        }
    }

    /// View a diagram component is drawn on
    fn component_view(&self) -> Option<ObjectKey> {
        match self {
            Node::Object(o) => Some(o.view),
            Node::Connection(c) => Some(c.view),
            _ => None,
        }
    }
}

/// Graph node weight
#[derive(Debug, Clone)]
struct Slot {
    serial: u64,
    node: Node,
}

/// What an edge means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    /// Owner to owned object
    Contains,
    /// Relationship, or attached connection, to its source
    Source,
    /// Relationship, or attached connection, to its target
    Target,
    /// Diagram component to the concept or view it shows
    Shows,
}

/// Graph edge weight; `order` keeps siblings in insertion order
#[derive(Debug, Clone, Copy)]
struct Edge {
    link: Link,
    order: u64,
}

/// An ArchiMate model
#[derive(Debug)]
pub struct Model {
    instance: u64,
    id: String,
    name: String,
    documentation: String,
    properties: Vec<Property>,
    graph: StableGraph<Slot, Edge>,
    top_level: Vec<(FolderType, ObjectKey)>,
    ids: HashSet<String>,
    next_id: u64,
    next_serial: u64,
    version: u64,
}

impl Clone for Model {
    /// A clone is a distinct model: it gets its own instance number so a
    /// graph index never mistakes it for the original.
    fn clone(&self) -> Self {
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            id: self.id.clone(),
            name: self.name.clone(),
            documentation: self.documentation.clone(),
            properties: self.properties.clone(),
            graph: self.graph.clone(),
            top_level: self.top_level.clone(),
            ids: self.ids.clone(),
            next_id: self.next_id,
            next_serial: self.next_serial,
            version: self.version,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("")
    }
}

impl Model {
    /// Create a model holding only the default top-level folders
    pub fn new(name: impl Into<String>) -> Self {
        let mut model = Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            id: String::new(),
            name: name.into(),
            documentation: String::new(),
            properties: Vec::new(),
            graph: StableGraph::new(),
            top_level: Vec::new(),
            ids: HashSet::new(),
            next_id: 0,
            next_serial: 0,
            version: 0,
        };
        model.id = model.generate_id();
        model.ids.insert(model.id.clone());

        for folder_type in FolderType::TOP_LEVEL {
            let id = model.generate_id();
            let key = model.insert(
                None,
                Node::Folder(Folder {
                    id,
                    name: folder_type.default_name().to_string(),
                    documentation: String::new(),
                    properties: Vec::new(),
                    folder_type,
                    root_type: folder_type,
                    parent: None,
                }),
            );
            model.top_level.push((folder_type, key));
        }
        model
    }

    // ========================================================================
    // Model attributes
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_model_documentation(&mut self, documentation: impl Into<String>) {
        self.documentation = documentation.into();
    }

    pub fn set_model_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        upsert_property(&mut self.properties, key.into(), value.into());
    }

    /// Structural version counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Process-unique number of this model instance
    pub(crate) fn instance(&self) -> u64 {
        self.instance
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn get(&self, key: ObjectKey) -> Option<&Node> {
        self.graph
            .node_weight(key.index)
            .filter(|slot| slot.serial == key.serial)
            .map(|slot| &slot.node)
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.get(key).is_some()
    }

    pub fn folder(&self, key: ObjectKey) -> Option<&Folder> {
        self.get(key).and_then(Node::as_folder)
    }

    pub fn concept(&self, key: ObjectKey) -> Option<&Concept> {
        self.get(key).and_then(Node::as_concept)
    }

    pub fn view(&self, key: ObjectKey) -> Option<&View> {
        self.get(key).and_then(Node::as_view)
    }

    pub fn diagram_object(&self, key: ObjectKey) -> Option<&DiagramObject> {
        self.get(key).and_then(Node::as_object)
    }

    pub fn connection(&self, key: ObjectKey) -> Option<&DiagramConnection> {
        self.get(key).and_then(Node::as_connection)
    }

    /// Default top-level folder of a type
    pub fn top_level_folder(&self, folder_type: FolderType) -> Option<ObjectKey> {
        self.top_level
            .iter()
            .find(|(t, _)| *t == folder_type)
            .map(|(_, key)| *key)
    }

    /// Top-level folders in creation order
    pub fn top_level_folders(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.top_level.iter().map(|(_, key)| *key)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live objects in graph slot order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &Node)> {
        self.graph.node_indices().filter_map(|index| {
            self.graph
                .node_weight(index)
                .map(|slot| (ObjectKey { index, serial: slot.serial }, &slot.node))
        })
    }

    /// Owned objects of a folder, view or diagram object, in insertion order
    ///
    /// Connections drawn on a view are not included; see
    /// [`Model::view_connections`].
    pub fn children(&self, key: ObjectKey) -> Vec<ObjectKey> {
        self.linked(key, Outgoing, Link::Contains)
            .into_iter()
            .filter(|k| self.connection(*k).is_none())
            .collect()
    }

    /// All connections drawn on a view, connected or not
    pub fn view_connections(&self, view: ObjectKey) -> Vec<ObjectKey> {
        if self.view(view).is_none() {
            return Vec::new();
        }
        self.linked(view, Outgoing, Link::Contains)
            .into_iter()
            .filter(|k| self.connection(*k).is_some())
            .collect()
    }

    /// Attached connections starting at a diagram component
    pub fn source_connections(&self, component: ObjectKey) -> Vec<ObjectKey> {
        self.attached(component, Link::Source)
    }

    /// Attached connections ending at a diagram component
    pub fn target_connections(&self, component: ObjectKey) -> Vec<ObjectKey> {
        self.attached(component, Link::Target)
    }

    fn attached(&self, component: ObjectKey, link: Link) -> Vec<ObjectKey> {
        self.linked(component, Incoming, link)
            .into_iter()
            .filter(|k| self.connection(*k).is_some())
            .collect()
    }

    /// All live objects in folder traversal order
    ///
    /// Depth-first over the top-level folders, children in insertion order.
    /// A view is followed by its diagram objects (depth-first) and then its
    /// connections.
    pub fn walk(&self) -> Vec<ObjectKey> {
        let mut out = Vec::with_capacity(self.len());
        for key in self.top_level_folders() {
            self.walk_from(key, &mut out);
        }
        out
    }

    fn walk_from(&self, key: ObjectKey, out: &mut Vec<ObjectKey>) {
        out.push(key);
        let (connections, owned): (Vec<_>, Vec<_>) = self
            .linked(key, Outgoing, Link::Contains)
            .into_iter()
            .partition(|k| self.connection(*k).is_some());
        for child in owned {
            self.walk_from(child, out);
        }
        out.extend(connections);
    }

    /// Neighbours of `key` over edges of one kind, oldest edge first
    fn linked(&self, key: ObjectKey, direction: Direction, link: Link) -> Vec<ObjectKey> {
        if !self.contains(key) {
            return Vec::new();
        }
        let mut found: Vec<(u64, NodeIndex)> = self
            .graph
            .edges_directed(key.index, direction)
            .filter(|edge| edge.weight().link == link)
            .map(|edge| {
                let other = if edge.source() == key.index {
                    edge.target()
                } else {
                    edge.source()
                };
                (edge.weight().order, other)
            })
            .collect();
        found.sort_unstable_by_key(|(order, _)| *order);
        found
            .into_iter()
            .filter_map(|(_, index)| self.key_at(index))
            .collect()
    }

    fn key_at(&self, index: NodeIndex) -> Option<ObjectKey> {
        self.graph
            .node_weight(index)
            .map(|slot| ObjectKey { index, serial: slot.serial })
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Add a user subfolder
    pub fn add_folder(
        &mut self,
        parent: ObjectKey,
        name: impl Into<String>,
    ) -> Result<ObjectKey, ModelError> {
        let root_type = self.require_folder(parent)?.root_type;
        let id = self.generate_id();
        let key = self.insert(
            Some(parent),
            Node::Folder(Folder {
                id,
                name: name.into(),
                documentation: String::new(),
                properties: Vec::new(),
                folder_type: FolderType::User,
                root_type,
                parent: Some(parent),
            }),
        );
        self.bump();
        Ok(key)
    }

    /// Add an element to the default folder of its category
    pub fn add_element(
        &mut self,
        element_type: ElementType,
        name: impl Into<String>,
    ) -> Result<ObjectKey, ModelError> {
        let folder = self.default_folder(element_type.category())?;
        self.add_element_in(folder, element_type, name)
    }

    /// Add an element to a specific folder
    pub fn add_element_in(
        &mut self,
        folder: ObjectKey,
        element_type: ElementType,
        name: impl Into<String>,
    ) -> Result<ObjectKey, ModelError> {
        self.require_accepting_folder(folder, element_type.category(), element_type.label())?;
        Ok(self.insert_concept(folder, ConceptKind::Element(element_type), name.into()))
    }

    /// Add a relationship to the Relations folder
    pub fn add_relationship(
        &mut self,
        kind: RelationshipType,
        source: ObjectKey,
        target: ObjectKey,
    ) -> Result<ObjectKey, ModelError> {
        let folder = self.default_folder(Category::Relations)?;
        self.add_relationship_in(folder, kind, source, target)
    }

    /// Add a relationship to a specific folder
    pub fn add_relationship_in(
        &mut self,
        folder: ObjectKey,
        kind: RelationshipType,
        source: ObjectKey,
        target: ObjectKey,
    ) -> Result<ObjectKey, ModelError> {
        self.require_accepting_folder(folder, Category::Relations, kind.label())?;
        self.require_concept(source)?;
        self.require_concept(target)?;
        Ok(self.insert_concept(
            folder,
            ConceptKind::Relationship {
                kind,
                source,
                target,
            },
            String::new(),
        ))
    }

    /// Add a view to the top-level Views folder
    pub fn add_view(&mut self, name: impl Into<String>) -> Result<ObjectKey, ModelError> {
        let folder = self
            .top_level_folder(FolderType::Views)
            .ok_or_else(|| ModelError::folder_mismatch("Views", "a view"))?;
        self.add_view_in(folder, name)
    }

    /// Add a view to a specific view folder
    pub fn add_view_in(
        &mut self,
        folder: ObjectKey,
        name: impl Into<String>,
    ) -> Result<ObjectKey, ModelError> {
        let target = self.require_folder(folder)?;
        if !target.is_view_folder() {
            return Err(ModelError::folder_mismatch(target.id.clone(), "a view"));
        }
        let id = self.generate_id();
        let key = self.insert(
            Some(folder),
            Node::View(View {
                id,
                name: name.into(),
                documentation: String::new(),
                properties: Vec::new(),
                folder,
            }),
        );
        self.bump();
        Ok(key)
    }

    /// Show an element on a view (or inside another diagram object)
    pub fn add_element_object(
        &mut self,
        container: ObjectKey,
        concept: ObjectKey,
    ) -> Result<ObjectKey, ModelError> {
        let c = self.require_concept(concept)?;
        if c.is_relationship() {
            return Err(ModelError::wrong_kind(c.id.clone(), "an element"));
        }
        self.insert_object(container, DiagramObjectKind::Element { concept })
    }

    pub fn add_note(
        &mut self,
        container: ObjectKey,
        content: impl Into<String>,
    ) -> Result<ObjectKey, ModelError> {
        let note = Note {
            content: content.into(),
        };
        self.insert_object(container, DiagramObjectKind::Note(note))
    }

    pub fn add_group(
        &mut self,
        container: ObjectKey,
        name: impl Into<String>,
    ) -> Result<ObjectKey, ModelError> {
        let group = Group {
            name: name.into(),
            documentation: String::new(),
        };
        self.insert_object(container, DiagramObjectKind::Group(group))
    }

    /// Show a reference to another view
    pub fn add_reference(
        &mut self,
        container: ObjectKey,
        view: ObjectKey,
    ) -> Result<ObjectKey, ModelError> {
        self.require_view(view)?;
        self.insert_object(container, DiagramObjectKind::Reference { view })
    }

    /// Draw a plain connection between two diagram components
    pub fn add_connection(
        &mut self,
        source: ObjectKey,
        target: ObjectKey,
    ) -> Result<ObjectKey, ModelError> {
        self.insert_connection(source, target, None)
    }

    /// Draw a connection for a relationship between two diagram components
    pub fn add_relationship_connection(
        &mut self,
        relationship: ObjectKey,
        source: ObjectKey,
        target: ObjectKey,
    ) -> Result<ObjectKey, ModelError> {
        let rel = self.require_concept(relationship)?;
        if !rel.is_relationship() {
            return Err(ModelError::wrong_kind(rel.id.clone(), "a relationship"));
        }
        self.insert_connection(source, target, Some(relationship))
    }

    // ========================================================================
    // Connections
    // ========================================================================

    /// Detach a connection from its endpoints
    ///
    /// Only the visual edge goes away: the connection keeps its endpoint keys
    /// and any relationship it draws stays in the model.
    pub fn disconnect(&mut self, connection: ObjectKey) -> Result<(), ModelError> {
        if !self.require_connection(connection)?.connected {
            return Ok(());
        }
        self.unlink(connection, Outgoing, Link::Source);
        self.unlink(connection, Outgoing, Link::Target);
        if let Some(Node::Connection(c)) = self.get_mut(connection) {
            c.connected = false;
        }
        Ok(())
    }

    /// Reattach a disconnected connection to its endpoints
    pub fn reconnect(&mut self, connection: ObjectKey) -> Result<(), ModelError> {
        let (source, target, connected) = {
            let c = self.require_connection(connection)?;
            (c.source, c.target, c.connected)
        };
        if connected {
            return Ok(());
        }
        self.require_component(source)?;
        self.require_component(target)?;
        self.link(connection, source, Link::Source);
        self.link(connection, target, Link::Target);
        if let Some(Node::Connection(c)) = self.get_mut(connection) {
            c.connected = true;
        }
        Ok(())
    }

    // ========================================================================
    // Setters (non-structural)
    // ========================================================================

    /// Set the display name
    ///
    /// Element objects rename their concept and references rename their view.
    pub fn set_name(&mut self, key: ObjectKey, name: impl Into<String>) -> Result<(), ModelError> {
        let key = self.named_owner(key)?;
        let name = name.into();
        match self.get_mut(key) {
            Some(Node::Folder(f)) => f.name = name,
            Some(Node::Concept(c)) => c.name = name,
            Some(Node::View(v)) => v.name = name,
            Some(Node::Connection(c)) => c.name = name,
            Some(Node::Object(DiagramObject {
                kind: DiagramObjectKind::Group(g),
                ..
            })) => g.name = name,
            Some(node) => return Err(ModelError::wrong_kind(node.id().to_string(), "nameable")),
            None => return Err(ModelError::unknown(key)),
        }
        Ok(())
    }

    /// Set the documentation text, delegating like [`Model::set_name`]
    pub fn set_documentation(
        &mut self,
        key: ObjectKey,
        documentation: impl Into<String>,
    ) -> Result<(), ModelError> {
        let key = self.named_owner(key)?;
        let documentation = documentation.into();
        match self.get_mut(key) {
            Some(Node::Folder(f)) => f.documentation = documentation,
            Some(Node::Concept(c)) => c.documentation = documentation,
            Some(Node::View(v)) => v.documentation = documentation,
            Some(Node::Connection(c)) => c.documentation = documentation,
            Some(Node::Object(DiagramObject {
                kind: DiagramObjectKind::Group(g),
                ..
            })) => g.documentation = documentation,
            Some(node) => {
                return Err(ModelError::wrong_kind(node.id().to_string(), "documentable"))
            }
            None => return Err(ModelError::unknown(key)),
        }
        Ok(())
    }

    /// Set a property, replacing the first one with the same key
    pub fn set_property(
        &mut self,
        key: ObjectKey,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        let key = self.named_owner(key)?;
        let properties = match self.get_mut(key) {
            Some(Node::Folder(f)) => &mut f.properties,
            Some(Node::Concept(c)) => &mut c.properties,
            Some(Node::View(v)) => &mut v.properties,
            Some(node) => {
                return Err(ModelError::wrong_kind(node.id().to_string(), "a property holder"))
            }
            None => return Err(ModelError::unknown(key)),
        };
        upsert_property(properties, property.into(), value.into());
        Ok(())
    }

    /// Replace the text of a note
    pub fn set_content(
        &mut self,
        note: ObjectKey,
        content: impl Into<String>,
    ) -> Result<(), ModelError> {
        match self.get_mut(note) {
            Some(Node::Object(DiagramObject {
                kind: DiagramObjectKind::Note(n),
                ..
            })) => {
                n.content = content.into();
                Ok(())
            }
            Some(node) => Err(ModelError::wrong_kind(node.id().to_string(), "a note")),
            None => Err(ModelError::unknown(note)),
        }
    }

    /// Change an object's identifier
    pub fn set_id(&mut self, key: ObjectKey, id: impl Into<String>) -> Result<(), ModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        let old = self.require(key)?.id().to_string();
        if old == id {
            return Ok(());
        }
        if self.ids.contains(&id) {
            return Err(ModelError::DuplicateId { id });
        }
        self.ids.remove(&old);
        self.ids.insert(id.clone());
        match self.get_mut(key) {
            Some(Node::Folder(f)) => f.id = id,
            Some(Node::Concept(c)) => c.id = id,
            Some(Node::View(v)) => v.id = id,
            Some(Node::Object(o)) => o.id = id,
            Some(Node::Connection(c)) => c.id = id,
            None => return Err(ModelError::unknown(key)),
        }
        self.bump();
        Ok(())
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove an object and everything that depends on it
    ///
    /// Owned children go with their owner. Removing a concept also removes
    /// the relationships attached to it and every diagram component showing
    /// it; removing a view also removes references to it.
    pub fn remove(&mut self, key: ObjectKey) -> Result<(), ModelError> {
        if let Node::Folder(f) = self.require(key)? {
            if f.is_top_level() {
                return Err(ModelError::TopLevelFolder { id: f.id.clone() });
            }
        }

        let doomed = self.collect_removal(key);
        for k in &doomed {
            if let Some(slot) = self.graph.remove_node(k.index) {
                self.ids.remove(slot.node.id());
            }
        }
        debug!("removed {} objects starting at {}", doomed.len(), key);
        self.bump();
        Ok(())
    }

    /// Everything that goes when `root` goes
    ///
    /// Dependents are found along graph edges. Disconnected connections have
    /// no endpoint edges, so they are looked up through their view.
    fn collect_removal(&self, root: ObjectKey) -> HashSet<ObjectKey> {
        let mut doomed = HashSet::new();
        let mut pending = vec![root];
        while let Some(key) = pending.pop() {
            if !doomed.insert(key) {
                continue;
            }
            let Some(node) = self.get(key) else {
                continue;
            };
            pending.extend(self.linked(key, Outgoing, Link::Contains));
            for link in [Link::Source, Link::Target, Link::Shows] {
                pending.extend(self.linked(key, Incoming, link));
            }
            if let Some(view) = node.component_view() {
                pending.extend(self.attached_connections(key, view));
            }
        }
        doomed
    }

    /// Connections on `view` that start or end at `component`, connected or not
    fn attached_connections(&self, component: ObjectKey, view: ObjectKey) -> Vec<ObjectKey> {
        self.view_connections(view)
            .into_iter()
            .filter(|c| {
                self.connection(*c)
                    .is_some_and(|c| c.source == component || c.target == component)
            })
            .collect()
    }

    // ========================================================================
    // Reparenting
    // ========================================================================

    /// Move an object to a new owner
    ///
    /// Folders, concepts and views move between folders of the same tree;
    /// diagram objects move between containers of the same view.
    pub fn move_to(&mut self, key: ObjectKey, new_parent: ObjectKey) -> Result<(), ModelError> {
        match self.require(key)? {
            Node::Folder(f) => {
                if f.is_top_level() {
                    return Err(ModelError::TopLevelFolder { id: f.id.clone() });
                }
                let target = self.require_folder(new_parent)?;
                if target.root_type != f.root_type {
                    return Err(ModelError::folder_mismatch(target.id.clone(), f.name.clone()));
                }
                if self.folder_within(new_parent, key) {
                    return Err(ModelError::Cycle { id: f.id.clone() });
                }
            }
            Node::Concept(c) => {
                self.require_accepting_folder(new_parent, c.category(), c.type_label())?;
            }
            Node::View(v) => {
                let target = self.require_folder(new_parent)?;
                if !target.is_view_folder() {
                    return Err(ModelError::folder_mismatch(target.id.clone(), v.name.clone()));
                }
            }
            Node::Object(o) => {
                let view = self.container_view(new_parent)?;
                if view != o.view {
                    return Err(ModelError::ViewMismatch {
                        source_id: o.id.clone(),
                        target_id: self.require(new_parent)?.id().to_string(),
                    });
                }
                if self.object_within(new_parent, key) {
                    return Err(ModelError::Cycle { id: o.id.clone() });
                }
            }
            Node::Connection(c) => return Err(ModelError::wrong_kind(c.id.clone(), "movable")),
        }

        self.unlink(key, Incoming, Link::Contains);
        match self.get_mut(key) {
            Some(Node::Folder(f)) => f.parent = Some(new_parent),
            Some(Node::Concept(c)) => c.folder = new_parent,
            Some(Node::View(v)) => v.folder = new_parent,
            Some(Node::Object(o)) => o.parent = new_parent,
            _ => {}
        }
        self.link(new_parent, key, Link::Contains);
        self.bump();
        Ok(())
    }

    /// Whether `folder` is `ancestor` or lies beneath it
    fn folder_within(&self, folder: ObjectKey, ancestor: ObjectKey) -> bool {
        let mut current = Some(folder);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.folder(key).and_then(|f| f.parent);
        }
        false
    }

    /// Whether `container` is `ancestor` or lies beneath it in a view tree
    fn object_within(&self, container: ObjectKey, ancestor: ObjectKey) -> bool {
        let mut current = container;
        loop {
            if current == ancestor {
                return true;
            }
            match self.diagram_object(current) {
                Some(o) => current = o.parent,
                None => return false,
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn bump(&mut self) {
        self.version += 1;
    }

    fn generate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("id-{:08x}", self.next_id);
            if !self.ids.contains(&id) {
                return id;
            }
        }
    }

    fn next_serial(&mut self) -> u64 {
        self.next_serial += 1;
        self.next_serial
    }

    /// Add a node, contained by `owner` when given
    fn insert(&mut self, owner: Option<ObjectKey>, node: Node) -> ObjectKey {
        self.ids.insert(node.id().to_string());
        let serial = self.next_serial();
        let index = self.graph.add_node(Slot { serial, node });
        let key = ObjectKey { index, serial };
        if let Some(owner) = owner {
            self.link(owner, key, Link::Contains);
        }
        key
    }

    fn link(&mut self, from: ObjectKey, to: ObjectKey, link: Link) {
        let order = self.next_serial();
        self.graph.add_edge(from.index, to.index, Edge { link, order });
    }

    /// Drop every edge of one kind touching `key` in `direction`
    fn unlink(&mut self, key: ObjectKey, direction: Direction, link: Link) {
        let edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(key.index, direction)
            .filter(|edge| edge.weight().link == link)
            .map(|edge| edge.id())
            .collect();
        for edge in edges {
            self.graph.remove_edge(edge);
        }
    }

    fn get_mut(&mut self, key: ObjectKey) -> Option<&mut Node> {
        self.graph
            .node_weight_mut(key.index)
            .filter(|slot| slot.serial == key.serial)
            .map(|slot| &mut slot.node)
    }

    fn insert_concept(&mut self, folder: ObjectKey, kind: ConceptKind, name: String) -> ObjectKey {
        let id = self.generate_id();
        let endpoints = match kind {
            ConceptKind::Relationship { source, target, .. } => Some((source, target)),
            ConceptKind::Element(_) => None,
        };
        let key = self.insert(
            Some(folder),
            Node::Concept(Concept {
                id,
                name,
                documentation: String::new(),
                properties: Vec::new(),
                kind,
                folder,
            }),
        );
        if let Some((source, target)) = endpoints {
            self.link(key, source, Link::Source);
            self.link(key, target, Link::Target);
        }
        self.bump();
        key
    }

    fn insert_object(
        &mut self,
        container: ObjectKey,
        kind: DiagramObjectKind,
    ) -> Result<ObjectKey, ModelError> {
        let view = self.container_view(container)?;
        let id = self.generate_id();
        let shown = match kind {
            DiagramObjectKind::Element { concept } => Some(concept),
            DiagramObjectKind::Reference { view } => Some(view),
            DiagramObjectKind::Note(_) | DiagramObjectKind::Group(_) => None,
        };
        let key = self.insert(
            Some(container),
            Node::Object(DiagramObject {
                id,
                kind,
                view,
                parent: container,
            }),
        );
        if let Some(shown) = shown {
            self.link(key, shown, Link::Shows);
        }
        self.bump();
        Ok(key)
    }

    fn insert_connection(
        &mut self,
        source: ObjectKey,
        target: ObjectKey,
        relationship: Option<ObjectKey>,
    ) -> Result<ObjectKey, ModelError> {
        let source_view = self.require_component(source)?;
        let target_view = self.require_component(target)?;
        if source_view != target_view {
            return Err(ModelError::ViewMismatch {
                source_id: self.require(source)?.id().to_string(),
                target_id: self.require(target)?.id().to_string(),
            });
        }
        let id = self.generate_id();
        let key = self.insert(
            Some(source_view),
            Node::Connection(DiagramConnection {
                id,
                name: String::new(),
                documentation: String::new(),
                relationship,
                view: source_view,
                source,
                target,
                connected: true,
            }),
        );
        self.link(key, source, Link::Source);
        self.link(key, target, Link::Target);
        if let Some(relationship) = relationship {
            self.link(key, relationship, Link::Shows);
        }
        self.bump();
        Ok(key)
    }

    fn default_folder(&self, category: Category) -> Result<ObjectKey, ModelError> {
        let folder_type = FolderType::for_category(category);
        self.top_level_folder(folder_type)
            .ok_or_else(|| ModelError::folder_mismatch(folder_type.default_name(), "concepts"))
    }

    /// Element objects delegate to their concept, references to their view
    fn named_owner(&self, key: ObjectKey) -> Result<ObjectKey, ModelError> {
        Ok(match self.require(key)? {
            Node::Object(DiagramObject {
                kind: DiagramObjectKind::Element { concept },
                ..
            }) => *concept,
            Node::Object(DiagramObject {
                kind: DiagramObjectKind::Reference { view },
                ..
            }) => *view,
            _ => key,
        })
    }

    /// View owning a container (a view or a diagram object)
    fn container_view(&self, container: ObjectKey) -> Result<ObjectKey, ModelError> {
        match self.require(container)? {
            Node::View(_) => Ok(container),
            Node::Object(o) => Ok(o.view),
            node => Err(ModelError::wrong_kind(
                node.id().to_string(),
                "a view or diagram object",
            )),
        }
    }

    /// View owning a connectable component
    fn require_component(&self, key: ObjectKey) -> Result<ObjectKey, ModelError> {
        match self.require(key)? {
            Node::Object(o) => Ok(o.view),
            Node::Connection(c) => Ok(c.view),
            node => Err(ModelError::wrong_kind(
                node.id().to_string(),
                "a diagram component",
            )),
        }
    }

    fn require(&self, key: ObjectKey) -> Result<&Node, ModelError> {
        self.get(key).ok_or_else(|| ModelError::unknown(key))
    }

    fn require_folder(&self, key: ObjectKey) -> Result<&Folder, ModelError> {
        let node = self.require(key)?;
        node.as_folder()
            .ok_or_else(|| ModelError::wrong_kind(node.id().to_string(), "a folder"))
    }

    fn require_concept(&self, key: ObjectKey) -> Result<&Concept, ModelError> {
        let node = self.require(key)?;
        node.as_concept()
            .ok_or_else(|| ModelError::wrong_kind(node.id().to_string(), "a concept"))
    }

    fn require_view(&self, key: ObjectKey) -> Result<&View, ModelError> {
        let node = self.require(key)?;
        node.as_view()
            .ok_or_else(|| ModelError::wrong_kind(node.id().to_string(), "a view"))
    }

    fn require_connection(&self, key: ObjectKey) -> Result<&DiagramConnection, ModelError> {
        let node = self.require(key)?;
        node.as_connection()
            .ok_or_else(|| ModelError::wrong_kind(node.id().to_string(), "a connection"))
    }

    fn require_accepting_folder(
        &self,
        folder: ObjectKey,
        category: Category,
        what: &str,
    ) -> Result<(), ModelError> {
        let target = self.require_folder(folder)?;
        if target.accepts(category) {
            Ok(())
        } else {
            Err(ModelError::folder_mismatch(target.id.clone(), what))
        }
    }
}

fn upsert_property(properties: &mut Vec<Property>, key: String, value: String) {
    match properties.iter_mut().find(|p| p.key == key) {
        Some(existing) => existing.value = value,
        None => properties.push(Property { key, value }),
    }
}
