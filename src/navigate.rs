//! Directive navigation
//!
//! Resolves the prefix of a directive from a root object to at most one
//! target. Visual prefixes (`parent`, `vfolder`, `view`) follow the diagram
//! tree; semantic prefixes (`mfolder`, `keyword:end`) follow the concept an
//! object stands for, so they keep working after a connection is detached
//! from its endpoints.

use log::trace;

use crate::index::GraphIndex;
use crate::model::{FolderType, Model, Node, ObjectKey};
use crate::template::{End, Prefix, Relation};

/// Something a directive can render an attribute of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Object(ObjectKey),
    /// The model itself
    Model,
}

impl From<ObjectKey> for Target {
    fn from(key: ObjectKey) -> Self {
        Target::Object(key)
    }
}

/// Resolve `prefix` starting from `root`
pub fn navigate(
    model: &Model,
    index: &GraphIndex,
    root: Target,
    prefix: &Prefix,
) -> Option<Target> {
    let key = match (prefix, root) {
        (Prefix::Current, _) => return Some(root),
        (Prefix::Model, _) => return Some(Target::Model),
        (_, Target::Model) => {
            trace!("prefix '{}' has nothing to follow from the model", prefix);
            return None;
        }
        (_, Target::Object(key)) => key,
    };

    let found = match prefix {
        Prefix::Source => endpoint(model, key, End::Source),
        Prefix::Target => endpoint(model, key, End::Target),
        Prefix::Parent => model.diagram_object(key).map(|o| o.parent()),
        Prefix::ModelFolder => underlying_concept(model, key)
            .and_then(|c| model.concept(c))
            .map(|c| c.folder()),
        Prefix::ViewFolder => view_folder(model, index, key),
        Prefix::View => enclosing_view(model, index, key),
        Prefix::Related { relation, end } => related(model, index, key, relation, *end),
        Prefix::Current | Prefix::Model => None,
    };

    if found.is_none() {
        trace!("prefix '{}' resolved nothing from {}", prefix, key);
    }
    found.map(Target::Object)
}

/// The concept an object stands for
///
/// A concept stands for itself, an element object for the element it shows
/// and a connection for the relationship it draws.
pub fn underlying_concept(model: &Model, key: ObjectKey) -> Option<ObjectKey> {
    match model.get(key)? {
        Node::Concept(_) => Some(key),
        Node::Object(object) => object.concept(),
        Node::Connection(connection) => connection.relationship(),
        Node::Folder(_) | Node::View(_) => None,
    }
}

fn endpoint(model: &Model, key: ObjectKey, end: End) -> Option<ObjectKey> {
    let pick = |(source, target): (ObjectKey, ObjectKey)| match end {
        End::Source => source,
        End::Target => target,
    };

    match model.get(key)? {
        Node::Concept(concept) => concept.endpoints().map(pick),
        Node::Connection(connection) => {
            if let Some(relationship) = connection.relationship() {
                return model
                    .concept(relationship)
                    .and_then(|r| r.endpoints())
                    .map(pick);
            }
            let visual = pick((connection.source(), connection.target()));
            match model.get(visual)? {
                Node::Object(object) => Some(object.concept().unwrap_or(visual)),
                _ => Some(visual),
            }
        }
        Node::Folder(_) | Node::View(_) | Node::Object(_) => None,
    }
}

/// View an object is drawn on
///
/// A bare concept has no view of its own; the first view showing it is
/// used instead.
fn enclosing_view(model: &Model, index: &GraphIndex, key: ObjectKey) -> Option<ObjectKey> {
    match model.get(key)? {
        Node::View(_) => Some(key),
        Node::Object(object) => Some(object.view()),
        Node::Connection(connection) => Some(connection.view()),
        Node::Concept(_) => index.referencing_views(model, key).first().copied(),
        Node::Folder(_) => None,
    }
}

fn view_folder(model: &Model, index: &GraphIndex, key: ObjectKey) -> Option<ObjectKey> {
    if let Some(view) = enclosing_view(model, index, key) {
        return model.view(view).map(|v| v.folder());
    }
    match model.get(key)? {
        Node::Concept(_) => model.top_level_folder(FolderType::Views),
        _ => None,
    }
}

fn related(
    model: &Model,
    index: &GraphIndex,
    key: ObjectKey,
    relation: &Relation,
    end: End,
) -> Option<ObjectKey> {
    let Relation::Known(kind) = relation else {
        return None;
    };
    let concept = underlying_concept(model, key)?;

    index
        .relationships_of(model, concept)
        .into_iter()
        .filter_map(|r| model.concept(r))
        .find(|r| r.relationship_type() == Some(*kind))
        .and_then(|r| r.endpoints())
        .map(|(source, target)| match end {
            End::Source => source,
            End::Target => target,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementType, RelationshipType};

    struct Fixture {
        model: Model,
        actor: ObjectKey,
        role: ObjectKey,
        assignment: ObjectKey,
        view: ObjectKey,
        actor_object: ObjectKey,
        role_object: ObjectKey,
        connection: ObjectKey,
    }

    fn fixture() -> Fixture {
        let mut model = Model::new("Test");
        let actor = model.add_element(ElementType::BusinessActor, "Actor").unwrap();
        let role = model.add_element(ElementType::BusinessRole, "Role").unwrap();
        let assignment = model
            .add_relationship(RelationshipType::Assignment, actor, role)
            .unwrap();
        let view = model.add_view("View").unwrap();
        let actor_object = model.add_element_object(view, actor).unwrap();
        let role_object = model.add_element_object(view, role).unwrap();
        let connection = model
            .add_relationship_connection(assignment, actor_object, role_object)
            .unwrap();
        Fixture {
            model,
            actor,
            role,
            assignment,
            view,
            actor_object,
            role_object,
            connection,
        }
    }

    fn go(f: &Fixture, root: ObjectKey, prefix: Prefix) -> Option<Target> {
        navigate(&f.model, &GraphIndex::new(), root.into(), &prefix)
    }

    #[test]
    fn test_current_and_model() {
        let f = fixture();
        assert_eq!(go(&f, f.actor, Prefix::Current), Some(Target::Object(f.actor)));
        assert_eq!(go(&f, f.actor, Prefix::Model), Some(Target::Model));
        let index = GraphIndex::new();
        assert_eq!(
            navigate(&f.model, &index, Target::Model, &Prefix::Parent),
            None
        );
    }

    #[test]
    fn test_source_target_of_relationship_and_connection() {
        let f = fixture();
        assert_eq!(go(&f, f.assignment, Prefix::Source), Some(f.actor.into()));
        assert_eq!(go(&f, f.assignment, Prefix::Target), Some(f.role.into()));
        assert_eq!(go(&f, f.connection, Prefix::Source), Some(f.actor.into()));
        assert_eq!(go(&f, f.connection, Prefix::Target), Some(f.role.into()));
        assert_eq!(go(&f, f.actor, Prefix::Source), None);
    }

    #[test]
    fn test_plain_connection_uses_visual_endpoints() {
        let mut f = fixture();
        let note = f.model.add_note(f.view, "hello").unwrap();
        let plain = f.model.add_connection(note, f.actor_object).unwrap();
        assert_eq!(go(&f, plain, Prefix::Source), Some(note.into()));
        assert_eq!(go(&f, plain, Prefix::Target), Some(f.actor.into()));
    }

    #[test]
    fn test_parent() {
        let mut f = fixture();
        let group = f.model.add_group(f.view, "Group").unwrap();
        let nested = f.model.add_note(group, "inside").unwrap();
        assert_eq!(go(&f, f.actor_object, Prefix::Parent), Some(f.view.into()));
        assert_eq!(go(&f, nested, Prefix::Parent), Some(group.into()));
        assert_eq!(go(&f, f.actor, Prefix::Parent), None);
        assert_eq!(go(&f, f.view, Prefix::Parent), None);
    }

    #[test]
    fn test_model_folder() {
        let f = fixture();
        let business = f.model.top_level_folder(FolderType::Business).unwrap();
        let relations = f.model.top_level_folder(FolderType::Relations).unwrap();
        assert_eq!(go(&f, f.actor, Prefix::ModelFolder), Some(business.into()));
        assert_eq!(go(&f, f.actor_object, Prefix::ModelFolder), Some(business.into()));
        assert_eq!(go(&f, f.connection, Prefix::ModelFolder), Some(relations.into()));
        assert_eq!(go(&f, f.view, Prefix::ModelFolder), None);
    }

    #[test]
    fn test_view_folder() {
        let mut f = fixture();
        let views = f.model.top_level_folder(FolderType::Views).unwrap();
        let sub = f.model.add_folder(views, "Sub").unwrap();
        f.model.move_to(f.view, sub).unwrap();
        let lonely = f.model.add_element(ElementType::Goal, "Goal").unwrap();

        assert_eq!(go(&f, f.actor_object, Prefix::ViewFolder), Some(sub.into()));
        assert_eq!(go(&f, f.connection, Prefix::ViewFolder), Some(sub.into()));
        assert_eq!(go(&f, f.view, Prefix::ViewFolder), Some(sub.into()));
        assert_eq!(go(&f, f.actor, Prefix::ViewFolder), Some(sub.into()));
        assert_eq!(go(&f, lonely, Prefix::ViewFolder), Some(views.into()));
        assert_eq!(go(&f, lonely, Prefix::View), None);
    }

    #[test]
    fn test_related_survives_disconnect() {
        let mut f = fixture();
        let source = Prefix::Related {
            relation: Relation::Known(RelationshipType::Assignment),
            end: End::Source,
        };
        let target = Prefix::Related {
            relation: Relation::Known(RelationshipType::Assignment),
            end: End::Target,
        };
        assert_eq!(go(&f, f.role_object, source.clone()), Some(f.actor.into()));
        assert_eq!(go(&f, f.actor_object, target.clone()), Some(f.role.into()));

        f.model.disconnect(f.connection).unwrap();
        assert_eq!(go(&f, f.role_object, source), Some(f.actor.into()));
        assert_eq!(go(&f, f.actor_object, target), Some(f.role.into()));
    }

    #[test]
    fn test_related_unmatched() {
        let f = fixture();
        let serving = Prefix::Related {
            relation: Relation::Known(RelationshipType::Serving),
            end: End::Source,
        };
        let unknown = Prefix::Related {
            relation: Relation::Unknown("owner".to_string()),
            end: End::Source,
        };
        assert_eq!(go(&f, f.role, serving), None);
        assert_eq!(go(&f, f.role, unknown), None);
    }

    #[test]
    fn test_related_picks_first_in_traversal_order() {
        let mut f = fixture();
        let other = f
            .model
            .add_element(ElementType::BusinessActor, "Other")
            .unwrap();
        f.model
            .add_relationship(RelationshipType::Assignment, other, f.role)
            .unwrap();
        let prefix = Prefix::Related {
            relation: Relation::Known(RelationshipType::Assignment),
            end: End::Source,
        };
        assert_eq!(go(&f, f.role, prefix), Some(f.actor.into()));
    }
}
