//! Diagram (visual) objects: views, nodes and connections

use super::concept::Property;
use super::ObjectKey;

/// A diagram: the root of a containment tree of diagram objects
#[derive(Debug, Clone)]
pub struct View {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) documentation: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) folder: ObjectKey,
}

impl View {
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

    /// Folder directly containing this view
    pub fn folder(&self) -> ObjectKey {
        self.folder
    }
}

/// Free-text note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub content: String,
}

/// Visual grouping box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub documentation: String,
}

/// What a diagram object shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramObjectKind {
    /// Shows a model element
    Element { concept: ObjectKey },
    Note(Note),
    Group(Group),
    /// Shows another view
    Reference { view: ObjectKey },
}

/// A visual node on a view
#[derive(Debug, Clone)]
pub struct DiagramObject {
    pub(crate) id: String,
    pub(crate) kind: DiagramObjectKind,
    pub(crate) view: ObjectKey,
    /// View or diagram object owning this one
    pub(crate) parent: ObjectKey,
}

impl DiagramObject {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &DiagramObjectKind {
        &self.kind
    }

    /// View this object is drawn on
    pub fn view(&self) -> ObjectKey {
        self.view
    }

    pub fn parent(&self) -> ObjectKey {
        self.parent
    }

    /// Concept shown by this object, if it shows one
    pub fn concept(&self) -> Option<ObjectKey> {
        match self.kind {
            DiagramObjectKind::Element { concept } => Some(concept),
            _ => None,
        }
    }
}

/// A visual edge between two diagram components
#[derive(Debug, Clone)]
pub struct DiagramConnection {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) documentation: String,
    pub(crate) relationship: Option<ObjectKey>,
    pub(crate) view: ObjectKey,
    pub(crate) source: ObjectKey,
    pub(crate) target: ObjectKey,
    pub(crate) connected: bool,
}

impl DiagramConnection {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Relationship concept drawn by this connection
    pub fn relationship(&self) -> Option<ObjectKey> {
        self.relationship
    }

    pub fn view(&self) -> ObjectKey {
        self.view
    }

    /// Source component. Still reported after `disconnect`.
    pub fn source(&self) -> ObjectKey {
        self.source
    }

    /// Target component. Still reported after `disconnect`.
    pub fn target(&self) -> ObjectKey {
        self.target
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
