//! Label rendering
//!
//! A [`Renderer`] owns the graph index for the models it renders and,
//! optionally, a cache of parsed templates. It can be shared between
//! threads; the model is borrowed for each call.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace};

use crate::attribute::render_attribute;
use crate::config::RenderConfig;
use crate::index::GraphIndex;
use crate::model::{Model, ObjectKey};
use crate::navigate::{navigate, Target};
use crate::template::{self, Segment, Template};

#[derive(Debug, Default)]
pub struct Renderer {
    index: GraphIndex,
    config: RenderConfig,
    cache: RwLock<HashMap<String, Arc<Template>>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Graph index used for navigation
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// Render `template` with `root` as the current object
    ///
    /// Never fails. Malformed directives come out as written, directives
    /// that resolve nothing come out empty, and a root that is not in the
    /// model renders the empty string.
    pub fn render(&self, model: &Model, root: impl Into<Target>, template: &str) -> String {
        if template.is_empty() {
            return String::new();
        }
        let parsed = self.parsed(template);
        self.render_template(model, root, &parsed)
    }

    /// Render against an object key, which may be stale
    pub fn render_key(&self, model: &Model, key: ObjectKey, template: &str) -> String {
        self.render(model, key, template)
    }

    /// Render against the object with identifier `id`
    ///
    /// Returns None when no object has that identifier.
    pub fn render_id(&self, model: &Model, id: &str, template: &str) -> Option<String> {
        let key = self.index.key_of(model, id)?;
        Some(self.render(model, key, template))
    }

    /// Render an already parsed template
    pub fn render_template(
        &self,
        model: &Model,
        root: impl Into<Target>,
        template: &Template,
    ) -> String {
        let root = root.into();
        if let Target::Object(key) = root {
            if !model.contains(key) {
                debug!("render root {} is not in the model", key);
                return String::new();
            }
        }

        let mut out = String::new();
        for segment in &template.segments {
            match &segment.node {
                Segment::Literal(text) => out.push_str(text),
                Segment::Directive(directive) => {
                    if let Some(target) =
                        navigate(model, &self.index, root, &directive.prefix.node)
                    {
                        out.push_str(&render_attribute(
                            model,
                            target,
                            &directive.attribute.node,
                        ));
                    }
                }
            }
        }
        out
    }

    /// Number of cached templates
    pub fn cached_templates(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn parsed(&self, text: &str) -> Arc<Template> {
        if !self.config.cache_templates {
            return Arc::new(template::parse(text));
        }

        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
        {
            trace!("template cache hit for {:?}", text);
            return Arc::clone(hit);
        }

        let parsed = Arc::new(template::parse(text));
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= self.config.cache_capacity {
            debug!("template cache full at {} entries, clearing", cache.len());
            cache.clear();
        }
        cache.insert(text.to_string(), Arc::clone(&parsed));
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementType, RelationshipType};

    fn model() -> (Model, ObjectKey, ObjectKey) {
        let mut model = Model::new("Test");
        let actor = model.add_element(ElementType::BusinessActor, "Alice").unwrap();
        let role = model.add_element(ElementType::BusinessRole, "Buyer").unwrap();
        let rel = model
            .add_relationship(RelationshipType::Assignment, actor, role)
            .unwrap();
        (model, actor, rel)
    }

    #[test]
    fn test_render_mixed_template() {
        let (model, _, rel) = model();
        let renderer = Renderer::new();
        assert_eq!(
            renderer.render(&model, rel, "$source{name} -> $target{name} (${type})"),
            "Alice -> Buyer (Assignment relation)"
        );
    }

    #[test]
    fn test_render_empty_and_literal() {
        let (model, actor, _) = model();
        let renderer = Renderer::new();
        assert_eq!(renderer.render(&model, actor, ""), "");
        assert_eq!(renderer.render(&model, actor, "costs $5"), "costs $5");
    }

    #[test]
    fn test_unresolved_directive_is_empty() {
        let (model, actor, _) = model();
        let renderer = Renderer::new();
        assert_eq!(renderer.render(&model, actor, "[$source{name}]"), "[]");
        assert_eq!(renderer.render(&model, actor, "[${colour}]"), "[]");
    }

    #[test]
    fn test_dangling_root_renders_empty() {
        let (mut model, actor, _) = model();
        model.remove(actor).unwrap();
        let renderer = Renderer::new();
        assert_eq!(renderer.render_key(&model, actor, "text ${name}"), "");
    }

    #[test]
    fn test_stale_key_after_slot_reuse() {
        let (mut model, actor, _) = model();
        model.remove(actor).unwrap();
        let other = model.add_element(ElementType::BusinessActor, "Bob").unwrap();
        let renderer = Renderer::new();
        assert_eq!(renderer.render_key(&model, actor, "${name}"), "");
        assert_eq!(renderer.render_key(&model, other, "${name}"), "Bob");
    }

    #[test]
    fn test_render_id() {
        let (mut model, actor, _) = model();
        model.set_id(actor, "alice").unwrap();
        let renderer = Renderer::new();
        assert_eq!(
            renderer.render_id(&model, "alice", "${name}").as_deref(),
            Some("Alice")
        );
        assert_eq!(renderer.render_id(&model, "bob", "${name}"), None);
    }

    #[test]
    fn test_template_cache() {
        let (model, actor, _) = model();
        let renderer =
            Renderer::with_config(RenderConfig::new().with_cache(true).with_cache_capacity(2));
        renderer.render(&model, actor, "${name}");
        renderer.render(&model, actor, "${name}");
        assert_eq!(renderer.cached_templates(), 1);
        renderer.render(&model, actor, "${type}");
        assert_eq!(renderer.cached_templates(), 2);
        assert_eq!(
            renderer.render(&model, actor, "${id}"),
            model.concept(actor).unwrap().id()
        );
        assert_eq!(renderer.cached_templates(), 1);
    }

    #[test]
    fn test_cache_disabled_by_default() {
        let (model, actor, _) = model();
        let renderer = Renderer::new();
        renderer.render(&model, actor, "${name}");
        assert_eq!(renderer.cached_templates(), 0);
    }
}
