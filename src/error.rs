//! Diagnostics for template text
//!
//! Rendering never fails; these warnings only describe the parts of a
//! template that were copied through as literal text or that can never
//! produce output.

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::model::RelationshipType;
use crate::template::lexer::Token;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateWarning {
    /// A `$` that looked like a directive but was kept as text
    #[error("malformed directive at {span:?}: {message}")]
    Malformed {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    /// Relationship keyword that matches no relationship type
    #[error("unknown relationship keyword '{keyword}' at {span:?}")]
    UnknownRelation { span: Span, keyword: String },

    /// Attribute name the renderer does not support
    #[error("unsupported attribute '{name}' at {span:?}")]
    UnknownAttribute { span: Span, name: String },
}

impl TemplateWarning {
    pub fn malformed(span: Span, message: impl Into<String>) -> Self {
        Self::Malformed {
            span,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::Malformed { span, .. }
            | Self::UnknownRelation { span, .. }
            | Self::UnknownAttribute { span, .. } => span,
        }
    }

    /// Move the span by `offset` bytes
    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        match &mut self {
            Self::Malformed { span, .. }
            | Self::UnknownRelation { span, .. }
            | Self::UnknownAttribute { span, .. } => {
                *span = span.start + offset..span.end + offset;
            }
        }
        self
    }

    /// Format the warning with template context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        // ariadne counts characters, warnings carry byte offsets
        let span = char_span(source, self.span());
        let note = match self {
            Self::Malformed { expected, .. } if !expected.is_empty() => {
                Some(format!("Expected: {}", expected.join(", ")))
            }
            Self::Malformed { .. } => None,
            Self::UnknownRelation { .. } => Some(format!(
                "Relationship keywords: {}",
                RelationshipType::ALL
                    .iter()
                    .map(|k| k.keyword())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            Self::UnknownAttribute { .. } => Some(
                "Attributes: type, name, documentation, id, content, property:KEY".to_string(),
            ),
        };

        let mut report = Report::build(ReportKind::Warning, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.label_message())
                    .with_color(Color::Yellow),
            );
        if let Some(note) = note {
            report = report.with_note(note);
        }

        let mut buf = Vec::new();
        if report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .is_err()
        {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn label_message(&self) -> String {
        match self {
            Self::Malformed { message, .. } => format!("{}; kept as text", message),
            Self::UnknownRelation { .. } => "never matches; renders empty".to_string(),
            Self::UnknownAttribute { .. } => "renders empty".to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for TemplateWarning {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("unexpected {} in prefix", format_token(tok)),
                None => "prefix ends too early".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("'{'".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("'{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        TemplateWarning::Malformed {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Convert a byte range of `source` to a character range
fn char_span(source: &str, span: &Span) -> Span {
    let chars_before = |byte: usize| source.char_indices().take_while(|(i, _)| *i < byte).count();
    chars_before(span.start)..chars_before(span.end)
}

/// Format a token for human-readable messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("'{}'", s),
        Token::Colon => "':'".to_string(),
        Token::Source => "'source'".to_string(),
        Token::Target => "'target'".to_string(),
        Token::Parent => "'parent'".to_string(),
        Token::ModelFolder => "'mfolder'".to_string(),
        Token::ViewFolder => "'vfolder'".to_string(),
        Token::View => "'view'".to_string(),
        Token::Model => "'model'".to_string(),
    }
}
