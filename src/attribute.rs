//! Attribute rendering
//!
//! Each kind of object exposes what it has through a few capability traits.
//! [`render_attribute`] picks the object a target stands for, then asks for
//! one capability per attribute. Anything an object lacks renders as the
//! empty string.
//!
//! Supported attributes: `type`, `name`, `documentation`, `id`, `content`
//! and `property:KEY`.

use crate::model::{
    Concept, DiagramConnection, DiagramObjectKind, Folder, Group, Model, Node, Note, Property,
    View,
};
use crate::navigate::Target;
use crate::template::Attribute;

/// Objects with a type label
pub trait Typed {
    fn type_label(&self) -> &str;
}

pub trait Nameable {
    fn name(&self) -> &str;
}

pub trait Documentable {
    fn documentation(&self) -> &str;
}

/// Objects carrying custom key/value properties
pub trait Propertied {
    fn properties(&self) -> &[Property];

    /// Value of the first property named `key`
    fn property(&self, key: &str) -> Option<&str> {
        self.properties()
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

impl Typed for Concept {
    fn type_label(&self) -> &str {
        Concept::type_label(self)
    }
}

impl Nameable for Concept {
    fn name(&self) -> &str {
        Concept::name(self)
    }
}

impl Documentable for Concept {
    fn documentation(&self) -> &str {
        Concept::documentation(self)
    }
}

impl Propertied for Concept {
    fn properties(&self) -> &[Property] {
        Concept::properties(self)
    }
}

impl Typed for Folder {
    fn type_label(&self) -> &str {
        "Folder"
    }
}

impl Nameable for Folder {
    fn name(&self) -> &str {
        Folder::name(self)
    }
}

impl Documentable for Folder {
    fn documentation(&self) -> &str {
        Folder::documentation(self)
    }
}

impl Propertied for Folder {
    fn properties(&self) -> &[Property] {
        Folder::properties(self)
    }
}

impl Typed for View {
    fn type_label(&self) -> &str {
        "View"
    }
}

impl Nameable for View {
    fn name(&self) -> &str {
        View::name(self)
    }
}

impl Documentable for View {
    fn documentation(&self) -> &str {
        View::documentation(self)
    }
}

impl Propertied for View {
    fn properties(&self) -> &[Property] {
        View::properties(self)
    }
}

impl Typed for Model {
    fn type_label(&self) -> &str {
        "Model"
    }
}

impl Nameable for Model {
    fn name(&self) -> &str {
        Model::name(self)
    }
}

impl Documentable for Model {
    fn documentation(&self) -> &str {
        Model::documentation(self)
    }
}

impl Propertied for Model {
    fn properties(&self) -> &[Property] {
        Model::properties(self)
    }
}

impl Typed for Note {
    fn type_label(&self) -> &str {
        "Note"
    }
}

impl Typed for Group {
    fn type_label(&self) -> &str {
        "Group"
    }
}

impl Nameable for Group {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Documentable for Group {
    fn documentation(&self) -> &str {
        &self.documentation
    }
}

impl Typed for DiagramConnection {
    fn type_label(&self) -> &str {
        "Connection"
    }
}

impl Nameable for DiagramConnection {
    fn name(&self) -> &str {
        DiagramConnection::name(self)
    }
}

impl Documentable for DiagramConnection {
    fn documentation(&self) -> &str {
        DiagramConnection::documentation(self)
    }
}

/// The object whose attributes a target renders
enum Subject<'a> {
    Model(&'a Model),
    Folder(&'a Folder),
    Concept(&'a Concept),
    View(&'a View),
    Note(&'a Note),
    Group(&'a Group),
    Connection(&'a DiagramConnection),
}

impl<'a> Subject<'a> {
    /// Element objects stand for their concept, references for their view
    /// and connections for the relationship they draw.
    fn of(model: &'a Model, target: Target) -> Option<Self> {
        let key = match target {
            Target::Model => return Some(Subject::Model(model)),
            Target::Object(key) => key,
        };
        Some(match model.get(key)? {
            Node::Folder(folder) => Subject::Folder(folder),
            Node::Concept(concept) => Subject::Concept(concept),
            Node::View(view) => Subject::View(view),
            Node::Object(object) => match object.kind() {
                DiagramObjectKind::Element { concept } => {
                    Subject::Concept(model.concept(*concept)?)
                }
                DiagramObjectKind::Reference { view } => Subject::View(model.view(*view)?),
                DiagramObjectKind::Note(note) => Subject::Note(note),
                DiagramObjectKind::Group(group) => Subject::Group(group),
            },
            Node::Connection(connection) => match connection
                .relationship()
                .and_then(|r| model.concept(r))
            {
                Some(relationship) => Subject::Concept(relationship),
                None => Subject::Connection(connection),
            },
        })
    }

    fn typed(&self) -> &'a dyn Typed {
        match *self {
            Subject::Model(m) => m,
            Subject::Folder(f) => f,
            Subject::Concept(c) => c,
            Subject::View(v) => v,
            Subject::Note(note) => note,
            Subject::Group(group) => group,
            Subject::Connection(c) => c,
        }
    }

    fn nameable(&self) -> Option<&'a dyn Nameable> {
        match *self {
            Subject::Model(m) => Some(m),
            Subject::Folder(f) => Some(f),
            Subject::Concept(c) => Some(c),
            Subject::View(v) => Some(v),
            Subject::Group(group) => Some(group),
            Subject::Connection(c) => Some(c),
            Subject::Note(_) => None,
        }
    }

    fn documentable(&self) -> Option<&'a dyn Documentable> {
        match *self {
            Subject::Model(m) => Some(m),
            Subject::Folder(f) => Some(f),
            Subject::Concept(c) => Some(c),
            Subject::View(v) => Some(v),
            Subject::Group(group) => Some(group),
            Subject::Connection(c) => Some(c),
            Subject::Note(_) => None,
        }
    }

    fn propertied(&self) -> Option<&'a dyn Propertied> {
        match *self {
            Subject::Model(m) => Some(m),
            Subject::Folder(f) => Some(f),
            Subject::Concept(c) => Some(c),
            Subject::View(v) => Some(v),
            Subject::Note(_) | Subject::Group(_) | Subject::Connection(_) => None,
        }
    }

    fn content(&self) -> Option<&'a str> {
        match *self {
            Subject::Note(note) => Some(&note.content),
            _ => None,
        }
    }
}

/// Identifier of the target itself, never of the object it stands for
fn own_id(model: &Model, target: Target) -> Option<&str> {
    match target {
        Target::Model => Some(model.id()),
        Target::Object(key) => model.get(key).map(Node::id),
    }
}

/// Render one attribute of a navigation target
///
/// Returns the empty string for a target that no longer exists, an attribute
/// the target does not have, or an unknown attribute.
pub fn render_attribute(model: &Model, target: Target, attribute: &Attribute) -> String {
    let Some(subject) = Subject::of(model, target) else {
        return String::new();
    };
    let value = match attribute {
        Attribute::Type => Some(subject.typed().type_label()),
        Attribute::Name => subject.nameable().map(|n| n.name()),
        Attribute::Documentation => subject.documentable().map(|d| d.documentation()),
        Attribute::Id => own_id(model, target),
        Attribute::Content => subject.content(),
        Attribute::Property(key) => subject.propertied().and_then(|p| p.property(key)),
        Attribute::Unknown(_) => None,
    };
    value.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementType, FolderType, ObjectKey, RelationshipType};

    fn attr(model: &Model, key: ObjectKey, attribute: Attribute) -> String {
        render_attribute(model, key.into(), &attribute)
    }

    #[test]
    fn test_type_labels() {
        let mut model = Model::new("Test");
        let actor = model.add_element(ElementType::BusinessActor, "Actor").unwrap();
        let role = model.add_element(ElementType::BusinessRole, "Role").unwrap();
        let rel = model
            .add_relationship(RelationshipType::Assignment, actor, role)
            .unwrap();
        let view = model.add_view("Main").unwrap();
        let other = model.add_view("Other").unwrap();
        let note = model.add_note(view, "text").unwrap();
        let group = model.add_group(view, "Group").unwrap();
        let reference = model.add_reference(view, other).unwrap();
        let plain = model.add_connection(note, group).unwrap();
        let folder = model.top_level_folder(FolderType::Business).unwrap();

        assert_eq!(attr(&model, actor, Attribute::Type), "Business Actor");
        assert_eq!(attr(&model, rel, Attribute::Type), "Assignment relation");
        assert_eq!(attr(&model, view, Attribute::Type), "View");
        assert_eq!(attr(&model, note, Attribute::Type), "Note");
        assert_eq!(attr(&model, group, Attribute::Type), "Group");
        assert_eq!(attr(&model, reference, Attribute::Type), "View");
        assert_eq!(attr(&model, plain, Attribute::Type), "Connection");
        assert_eq!(attr(&model, folder, Attribute::Type), "Folder");
        assert_eq!(render_attribute(&model, Target::Model, &Attribute::Type), "Model");
    }

    #[test]
    fn test_name_delegation() {
        let mut model = Model::new("Test");
        let actor = model.add_element(ElementType::BusinessActor, "Actor").unwrap();
        let view = model.add_view("Main").unwrap();
        let other = model.add_view("Other").unwrap();
        let object = model.add_element_object(view, actor).unwrap();
        let reference = model.add_reference(view, other).unwrap();
        let note = model.add_note(view, "text").unwrap();

        assert_eq!(attr(&model, object, Attribute::Name), "Actor");
        assert_eq!(attr(&model, reference, Attribute::Name), "Other");
        assert_eq!(attr(&model, note, Attribute::Name), "");
        assert_eq!(attr(&model, note, Attribute::Content), "text");
        assert_eq!(attr(&model, actor, Attribute::Content), "");
        assert_eq!(render_attribute(&model, Target::Model, &Attribute::Name), "Test");
    }

    #[test]
    fn test_documentation_and_properties() {
        let mut model = Model::new("Test");
        let actor = model.add_element(ElementType::BusinessActor, "Actor").unwrap();
        model.set_documentation(actor, "Buys things").unwrap();
        model.set_property(actor, "Owner", "Sales").unwrap();

        assert_eq!(attr(&model, actor, Attribute::Documentation), "Buys things");
        assert_eq!(
            attr(&model, actor, Attribute::Property("Owner".to_string())),
            "Sales"
        );
        assert_eq!(
            attr(&model, actor, Attribute::Property("Missing".to_string())),
            ""
        );
    }

    #[test]
    fn test_id_and_unknown() {
        let mut model = Model::new("Test");
        let actor = model.add_element(ElementType::BusinessActor, "Actor").unwrap();
        model.set_id(actor, "actor-1").unwrap();
        let view = model.add_view("Main").unwrap();
        let object = model.add_element_object(view, actor).unwrap();

        model.set_id(object, "actor-obj").unwrap();
        let note = model.add_note(view, "n").unwrap();
        let plain = model.add_connection(note, object).unwrap();
        model.set_id(plain, "plain").unwrap();

        assert_eq!(attr(&model, actor, Attribute::Id), "actor-1");
        assert_eq!(attr(&model, object, Attribute::Id), "actor-obj");
        assert_eq!(attr(&model, object, Attribute::Name), "Actor");
        assert_eq!(attr(&model, plain, Attribute::Id), "plain");
        assert_eq!(
            render_attribute(&model, Target::Model, &Attribute::Id),
            model.id()
        );
        assert_eq!(attr(&model, actor, Attribute::Unknown("colour".to_string())), "");
    }

    #[test]
    fn test_removed_target_is_empty() {
        let mut model = Model::new("Test");
        let actor = model.add_element(ElementType::BusinessActor, "Actor").unwrap();
        model.remove(actor).unwrap();
        assert_eq!(attr(&model, actor, Attribute::Type), "");
    }
}
