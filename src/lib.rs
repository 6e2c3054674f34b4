//! archimate-label - label templates for ArchiMate models
//!
//! This library renders `$prefix{attribute}` label templates against an
//! in-memory ArchiMate model: navigate from a root object to a related one,
//! then substitute one of its attributes.
//!
//! # Example
//!
//! ```rust
//! use archimate_label::model::{ElementType, Model, RelationshipType};
//! use archimate_label::render;
//!
//! let mut model = Model::new("Example");
//! let actor = model.add_element(ElementType::BusinessActor, "Alice").unwrap();
//! let role = model.add_element(ElementType::BusinessRole, "Buyer").unwrap();
//! let rel = model
//!     .add_relationship(RelationshipType::Assignment, actor, role)
//!     .unwrap();
//!
//! assert_eq!(render(&model, rel, "${type}"), "Assignment relation");
//! assert_eq!(render(&model, role, "$assignment:source{name}"), "Alice");
//! ```

pub mod attribute;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod navigate;
pub mod render;
pub mod sample;
pub mod template;

pub use config::{ConfigError, RenderConfig};
pub use error::TemplateWarning;
pub use index::GraphIndex;
pub use model::{Model, ModelError, ObjectKey};
pub use navigate::Target;
pub use render::Renderer;
pub use template::{check, parse as parse_template, Template};

/// Render a template once with a throwaway [`Renderer`]
///
/// Callers rendering many labels should keep a [`Renderer`] around so the
/// graph index is built once per model version.
pub fn render(model: &Model, root: impl Into<Target>, template: &str) -> String {
    Renderer::new().render(model, root, template)
}
