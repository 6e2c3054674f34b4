//! Syntax tree for label templates

use std::fmt;

use crate::model::RelationshipType;

/// Byte range in the template text
pub type Span = std::ops::Range<usize>;

/// Syntax node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A parsed template: literal text interleaved with directives
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub segments: Vec<Spanned<Segment>>,
}

impl Template {
    /// Directives in source order
    pub fn directives(&self) -> impl Iterator<Item = (&Directive, &Span)> {
        self.segments.iter().filter_map(|s| match &s.node {
            Segment::Directive(d) => Some((d, &s.span)),
            Segment::Literal(_) => None,
        })
    }

    /// Whether the template is plain text
    pub fn is_literal(&self) -> bool {
        self.directives().next().is_none()
    }
}

/// One piece of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied to the output verbatim
    Literal(String),
    /// `$prefix{attribute}`
    Directive(Directive),
}

/// A `$prefix{attribute}` span
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub prefix: Spanned<Prefix>,
    pub attribute: Spanned<Attribute>,
}

/// Where a directive navigates before reading its attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Prefix {
    /// No prefix: the root object itself
    Current,
    Source,
    Target,
    Parent,
    /// `mfolder`
    ModelFolder,
    /// `vfolder`
    ViewFolder,
    View,
    Model,
    /// `keyword:source` or `keyword:target`
    Related { relation: Relation, end: End },
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Current => Ok(()),
            Prefix::Source => f.write_str("source"),
            Prefix::Target => f.write_str("target"),
            Prefix::Parent => f.write_str("parent"),
            Prefix::ModelFolder => f.write_str("mfolder"),
            Prefix::ViewFolder => f.write_str("vfolder"),
            Prefix::View => f.write_str("view"),
            Prefix::Model => f.write_str("model"),
            Prefix::Related { relation, end } => write!(f, "{}:{}", relation, end),
        }
    }
}

/// Relationship keyword of a `keyword:end` prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    Known(RelationshipType),
    /// Not a relationship keyword; never matches anything
    Unknown(String),
}

impl Relation {
    pub fn parse(keyword: &str) -> Self {
        match RelationshipType::from_keyword(keyword) {
            Some(kind) => Relation::Known(kind),
            None => Relation::Unknown(keyword.to_string()),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Known(kind) => f.write_str(kind.keyword()),
            Relation::Unknown(keyword) => f.write_str(keyword),
        }
    }
}

/// Which endpoint of a matched relationship to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Source,
    Target,
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::Source => f.write_str("source"),
            End::Target => f.write_str("target"),
        }
    }
}

/// Attribute rendered from the resolved object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Type,
    Name,
    Documentation,
    Id,
    Content,
    /// `property:KEY`
    Property(String),
    /// Well-formed but unsupported; renders empty
    Unknown(String),
}

impl Attribute {
    /// Parse the text between the braces of a directive
    ///
    /// Returns None when the text cannot be an attribute name at all.
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(key) = text.strip_prefix("property:") {
            let valid = !key.is_empty() && !key.contains(['{', '}', '$']);
            return valid.then(|| Attribute::Property(key.to_string()));
        }
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(match text {
            "type" => Attribute::Type,
            "name" => Attribute::Name,
            "documentation" => Attribute::Documentation,
            "id" => Attribute::Id,
            "content" => Attribute::Content,
            other => Attribute::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Type => f.write_str("type"),
            Attribute::Name => f.write_str("name"),
            Attribute::Documentation => f.write_str("documentation"),
            Attribute::Id => f.write_str("id"),
            Attribute::Content => f.write_str("content"),
            Attribute::Property(key) => write!(f, "property:{}", key),
            Attribute::Unknown(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}{{{}}}", self.prefix.node, self.attribute.node)
    }
}
