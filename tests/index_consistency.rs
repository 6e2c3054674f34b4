//! Graph index reads always reflect the latest completed mutation

use archimate_label::model::{ElementType, FolderType, Model, RelationshipType};
use archimate_label::{GraphIndex, Renderer};
use pretty_assertions::assert_eq;

#[test]
fn test_insert_visible_on_next_read() {
    let mut model = Model::new("Test");
    let index = GraphIndex::new();
    let actor = model
        .add_element(ElementType::BusinessActor, "Actor")
        .unwrap();
    assert!(index.relationships_of(&model, actor).is_empty());

    let role = model.add_element(ElementType::BusinessRole, "Role").unwrap();
    let rel = model
        .add_relationship(RelationshipType::Assignment, actor, role)
        .unwrap();
    model.set_id(rel, "rel-1").unwrap();

    assert_eq!(index.relationships_of(&model, actor), vec![rel]);
    assert_eq!(index.key_of(&model, "rel-1"), Some(rel));
}

#[test]
fn test_removing_concept_drops_its_relationships() {
    let mut model = Model::new("Test");
    let index = GraphIndex::new();
    let actor = model
        .add_element(ElementType::BusinessActor, "Actor")
        .unwrap();
    let role = model.add_element(ElementType::BusinessRole, "Role").unwrap();
    let rel = model
        .add_relationship(RelationshipType::Assignment, actor, role)
        .unwrap();
    assert_eq!(index.relationships_of(&model, role), vec![rel]);

    model.remove(actor).unwrap();
    assert!(index.relationships_of(&model, role).is_empty());
    assert!(!model.contains(rel));
}

#[test]
fn test_relationship_on_relationship() {
    let mut model = Model::new("Test");
    let index = GraphIndex::new();
    let actor = model
        .add_element(ElementType::BusinessActor, "Actor")
        .unwrap();
    let role = model.add_element(ElementType::BusinessRole, "Role").unwrap();
    let rule = model.add_element(ElementType::Requirement, "Rule").unwrap();
    let rel = model
        .add_relationship(RelationshipType::Assignment, actor, role)
        .unwrap();
    let meta = model
        .add_relationship(RelationshipType::Association, rule, rel)
        .unwrap();

    assert_eq!(index.relationships_of(&model, rel), vec![meta]);
    model.remove(role).unwrap();
    assert!(!model.contains(meta));
    assert!(index.relationships_of(&model, rule).is_empty());
}

#[test]
fn test_move_changes_model_folder() {
    let mut model = Model::new("Test");
    let renderer = Renderer::new();
    let actor = model
        .add_element(ElementType::BusinessActor, "Actor")
        .unwrap();
    assert_eq!(renderer.render(&model, actor, "$mfolder{name}"), "Business");

    let business = model.top_level_folder(FolderType::Business).unwrap();
    let people = model.add_folder(business, "People").unwrap();
    model.move_to(actor, people).unwrap();
    assert_eq!(renderer.render(&model, actor, "$mfolder{name}"), "People");
}

#[test]
fn test_set_id_visible_through_renderer() {
    let mut model = Model::new("Test");
    let renderer = Renderer::new();
    let actor = model
        .add_element(ElementType::BusinessActor, "Actor")
        .unwrap();
    model.set_id(actor, "first").unwrap();
    assert_eq!(
        renderer.render_id(&model, "first", "${name}").as_deref(),
        Some("Actor")
    );

    model.set_id(actor, "second").unwrap();
    assert_eq!(renderer.render_id(&model, "first", "${name}"), None);
    assert_eq!(
        renderer.render_id(&model, "second", "${name}").as_deref(),
        Some("Actor")
    );
}

#[test]
fn test_rename_needs_no_rebuild() {
    let mut model = Model::new("Test");
    let renderer = Renderer::new();
    let actor = model
        .add_element(ElementType::BusinessActor, "Actor")
        .unwrap();
    let role = model.add_element(ElementType::BusinessRole, "Role").unwrap();
    model
        .add_relationship(RelationshipType::Assignment, actor, role)
        .unwrap();

    assert_eq!(
        renderer.render(&model, role, "$assignment:source{name}"),
        "Actor"
    );
    let rebuilds = renderer.index().rebuilds();

    model.set_name(actor, "Renamed").unwrap();
    assert_eq!(
        renderer.render(&model, role, "$assignment:source{name}"),
        "Renamed"
    );
    assert_eq!(renderer.index().rebuilds(), rebuilds);
}

#[test]
fn test_clone_is_indexed_separately() {
    let mut model = Model::new("Test");
    let actor = model
        .add_element(ElementType::BusinessActor, "Actor")
        .unwrap();
    model.set_id(actor, "actor").unwrap();
    let mut copy = model.clone();
    copy.remove(actor).unwrap();

    let index = GraphIndex::new();
    assert!(index.by_id(&model, "actor").is_some());
    assert!(index.by_id(&copy, "actor").is_none());
    assert!(index.by_id(&model, "actor").is_some());
}

#[test]
fn test_every_object_is_indexed() {
    let model = archimate_label::sample::sample_model().unwrap();
    let index = GraphIndex::new();
    assert_eq!(index.len(&model), model.len());
    for (key, node) in model.objects() {
        assert_eq!(index.key_of(&model, node.id()), Some(key));
    }
}
