//! Rendering properties over the sample model

use archimate_label::sample::sample_model;
use archimate_label::{check, render, Model, RenderConfig, Renderer};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sample() -> Model {
    sample_model().expect("sample model")
}

fn labels(model: &Model, renderer: &Renderer) -> String {
    let cases = [
        ("customer", "[${type}] ${name}"),
        ("customer", "${property:Segment} / $model{property:Owner}"),
        ("customer", "$mfolder{name}"),
        ("assignment-conn", "$source{name} -> $target{name} (${type})"),
        ("client-obj", "$serving:source{name} serves ${name}"),
        ("portal-obj", "$parent{type} $parent{name} in $view{name} ($vfolder{name})"),
        ("note", "${content}"),
        ("note-conn", "$source{type} -> $target{type}"),
        ("detail-ref", "${type}: ${name} in $vfolder{name}"),
        ("serving", "$vfolder{name}"),
        ("customer", "costs $5, ${} and $foo{name}"),
    ];
    cases
        .iter()
        .map(|(id, template)| {
            let label = renderer
                .render_id(model, id, template)
                .unwrap_or_else(|| panic!("no object {}", id));
            format!("{}: {}", id, label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_sample_labels() {
    let model = sample();
    let out = labels(&model, &Renderer::new());
    insta::assert_snapshot!(out, @r"
    customer: [Business Actor] Customer
    customer: Retail / Architecture Team
    customer: Business
    assignment-conn: Customer -> Client (Assignment relation)
    client-obj: Web Portal serves Client
    portal-obj: Group Front Office in Main View (Overview)
    note: Customers are served through the portal
    note-conn: Note -> Business Actor
    detail-ref: View: Details in Overview
    serving: Views
    customer: costs $5, ${} and $foo{name}
    ");
}

#[test]
fn test_empty_template() {
    let model = sample();
    for (key, _) in model.objects() {
        assert_eq!(render(&model, key, ""), "");
    }
}

#[test]
fn test_render_is_idempotent() {
    let model = sample();
    let renderer = Renderer::new();
    let first = labels(&model, &renderer);
    let second = labels(&model, &renderer);
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_renders_agree() {
    let model = sample();
    let renderer = Renderer::with_config(RenderConfig::new().with_cache(true));
    let expected = labels(&model, &Renderer::new());

    let results: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| labels(&model, &renderer)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("render thread"))
            .collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
    assert_eq!(renderer.index().rebuilds(), 1);
}

#[test]
fn test_well_formed_templates_have_no_warnings() {
    for template in [
        "",
        "plain",
        "[${type}] ${name}",
        "$source{name} -> $target{name}",
        "$assignment:source{name} $Flow:target{id}",
        "$mfolder{name}/$vfolder{name}/$view{name}/$model{name}",
        "${property:Cost Center}",
    ] {
        assert!(check(template).is_empty(), "template: {}", template);
    }
}

proptest! {
    #[test]
    fn literal_text_passes_through(text in "[^$]*") {
        let model = sample();
        let renderer = Renderer::new();
        for id in ["customer", "note", "assignment-conn", "overview"] {
            let out = renderer.render_id(&model, id, &text);
            prop_assert_eq!(out.as_deref(), Some(text.as_str()));
        }
    }

    #[test]
    fn arbitrary_templates_render_and_repeat(text in "[a-z${}: ]{0,40}") {
        let model = sample();
        let renderer = Renderer::new();
        let first = renderer.render_id(&model, "assignment-conn", &text);
        let second = renderer.render_id(&model, "assignment-conn", &text);
        prop_assert!(first.is_some());
        prop_assert_eq!(first, second);
        check(&text);
    }

    #[test]
    fn braces_without_dollar_are_literal(text in "[a-z{}: ]{0,40}") {
        let model = sample();
        prop_assert_eq!(
            Renderer::new().render_id(&model, "customer", &text),
            Some(text.clone())
        );
    }
}
