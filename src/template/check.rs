//! Template diagnostics

use super::ast::{Attribute, Prefix, Relation};
use super::grammar;
use crate::error::TemplateWarning;

/// Report problems in a template without rendering it
///
/// Warnings come back ordered by position. A template that renders exactly
/// as written produces none.
pub fn check(input: &str) -> Vec<TemplateWarning> {
    let (template, mut warnings) = grammar::scan(input);

    for (directive, _) in template.directives() {
        if let Prefix::Related {
            relation: Relation::Unknown(keyword),
            ..
        } = &directive.prefix.node
        {
            let start = directive.prefix.span.start;
            warnings.push(TemplateWarning::UnknownRelation {
                span: start..start + keyword.len(),
                keyword: keyword.clone(),
            });
        }
        if let Attribute::Unknown(name) = &directive.attribute.node {
            warnings.push(TemplateWarning::UnknownAttribute {
                span: directive.attribute.span.clone(),
                name: name.clone(),
            });
        }
    }

    warnings.sort_by_key(|w| w.span().start);
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_template() {
        assert!(check("").is_empty());
        assert!(check("plain text").is_empty());
        assert!(check("[${type}] $assignment:source{name} $vfolder{property:Owner}").is_empty());
    }

    #[test]
    fn test_unknown_relation_and_attribute() {
        let warnings = check("$owner:source{name} ${colour}");
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            warnings[0],
            TemplateWarning::UnknownRelation {
                span: 1..6,
                keyword: "owner".to_string()
            }
        );
        assert_eq!(
            warnings[1],
            TemplateWarning::UnknownAttribute {
                span: 22..28,
                name: "colour".to_string()
            }
        );
    }

    #[test]
    fn test_warnings_sorted_by_position() {
        let warnings = check("${colour} $foo{name}");
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].span().start < warnings[1].span().start);
        assert!(matches!(warnings[0], TemplateWarning::UnknownAttribute { .. }));
        assert!(matches!(warnings[1], TemplateWarning::Malformed { .. }));
    }

    #[test]
    fn test_prices_are_not_reported() {
        assert!(check("costs $5 or $ 10").is_empty());
    }
}
