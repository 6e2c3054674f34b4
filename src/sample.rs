//! Small model used by the command line tool and the tests

use crate::model::{ElementType, Model, ModelError, RelationshipType};

/// Build a small model with stable identifiers
///
/// | id            | object                                      |
/// |---------------|---------------------------------------------|
/// | `customer`    | Business Actor "Customer"                   |
/// | `client`      | Business Role "Client"                      |
/// | `assignment`  | Assignment relation Customer → Client       |
/// | `portal`      | Application Component "Web Portal"          |
/// | `serving`     | Serving relation Web Portal → Client        |
/// | `main-view`   | View "Main View" in the "Overview" folder   |
/// | `detail-view` | View "Details"                              |
/// | `customer-obj`, `client-obj`, `portal-obj` | element objects |
/// | `assignment-conn` | connection drawing `assignment`         |
/// | `group`       | Group "Front Office" holding `portal-obj`     |
/// | `note`        | Note on the main view                       |
/// | `note-conn`   | plain connection from `note` to `customer-obj` |
/// | `detail-ref`  | reference to `detail-view`                  |
pub fn sample_model() -> Result<Model, ModelError> {
    let mut model = Model::new("Sample");
    model.set_model_documentation("Sample model for label templates");
    model.set_model_property("Owner", "Architecture Team");

    let customer = model.add_element(ElementType::BusinessActor, "Customer")?;
    model.set_id(customer, "customer")?;
    model.set_documentation(customer, "A person buying our products")?;
    model.set_property(customer, "Segment", "Retail")?;

    let client = model.add_element(ElementType::BusinessRole, "Client")?;
    model.set_id(client, "client")?;

    let assignment = model.add_relationship(RelationshipType::Assignment, customer, client)?;
    model.set_id(assignment, "assignment")?;

    let portal = model.add_element(ElementType::ApplicationComponent, "Web Portal")?;
    model.set_id(portal, "portal")?;

    let serving = model.add_relationship(RelationshipType::Serving, portal, client)?;
    model.set_id(serving, "serving")?;

    let detail = model.add_view("Details")?;
    model.set_id(detail, "detail-view")?;
    let views = model
        .view(detail)
        .map(|v| v.folder())
        .ok_or_else(|| ModelError::unknown(detail))?;
    let overview = model.add_folder(views, "Overview")?;
    model.set_id(overview, "overview")?;

    let main = model.add_view_in(overview, "Main View")?;
    model.set_id(main, "main-view")?;

    let customer_obj = model.add_element_object(main, customer)?;
    model.set_id(customer_obj, "customer-obj")?;
    let client_obj = model.add_element_object(main, client)?;
    model.set_id(client_obj, "client-obj")?;

    let conn = model.add_relationship_connection(assignment, customer_obj, client_obj)?;
    model.set_id(conn, "assignment-conn")?;

    let group = model.add_group(main, "Front Office")?;
    model.set_id(group, "group")?;
    let portal_obj = model.add_element_object(group, portal)?;
    model.set_id(portal_obj, "portal-obj")?;

    let note = model.add_note(main, "Customers are served through the portal")?;
    model.set_id(note, "note")?;
    let note_conn = model.add_connection(note, customer_obj)?;
    model.set_id(note_conn, "note-conn")?;

    let reference = model.add_reference(main, detail)?;
    model.set_id(reference, "detail-ref")?;

    Ok(model)
}
