//! Template scanner and prefix parser
//!
//! Templates are scanned left to right. Each `$` is tried as the start of a
//! directive; if the prefix or attribute is not well formed the `$` is
//! copied through as text and scanning resumes right after it. Prefixes are
//! lexed with logos and parsed with chumsky.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::TemplateWarning;
use crate::template::ast::*;
use crate::template::lexer::{self, Token};

/// Parse a template into literal and directive segments
///
/// Never fails: anything that is not a directive is literal text.
pub fn parse(input: &str) -> Template {
    scan(input).0
}

/// Parse a template and collect warnings for `$` signs that did not form a
/// directive
pub(crate) fn scan(input: &str) -> (Template, Vec<TemplateWarning>) {
    let mut segments = Vec::new();
    let mut warnings = Vec::new();
    let mut literal = String::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(offset) = input[pos..].find('$') {
        let dollar = pos + offset;
        literal.push_str(&input[pos..dollar]);
        match directive_at(input, dollar) {
            Ok((directive, end)) => {
                flush_literal(&mut segments, &mut literal, literal_start..dollar);
                segments.push(Spanned::new(Segment::Directive(directive), dollar..end));
                pos = end;
                literal_start = end;
            }
            Err(warning) => {
                literal.push('$');
                warnings.extend(warning);
                pos = dollar + 1;
            }
        }
    }
    literal.push_str(&input[pos..]);
    flush_literal(&mut segments, &mut literal, literal_start..input.len());

    (Template { segments }, warnings)
}

fn flush_literal(
    segments: &mut Vec<Spanned<Segment>>,
    literal: &mut String,
    span: std::ops::Range<usize>,
) {
    if !literal.is_empty() {
        segments.push(Spanned::new(
            Segment::Literal(std::mem::take(literal)),
            span,
        ));
    }
}

/// Try to read a directive starting at the `$` at byte `dollar`
///
/// On success returns the directive and the byte just past its `}`. On
/// failure returns a warning when the text looked like an attempted
/// directive, or None when it is ordinary text such as a price.
fn directive_at(
    input: &str,
    dollar: usize,
) -> Result<(Directive, usize), Option<TemplateWarning>> {
    let prefix_start = dollar + 1;
    let Some(open_offset) = input[prefix_start..].find('{') else {
        return Err(None);
    };
    let open = prefix_start + open_offset;
    let prefix_text = &input[prefix_start..open];
    if prefix_text.contains(['$', '}']) {
        return Err(None);
    }
    let attempted = !prefix_text.chars().any(char::is_whitespace);

    let prefix = parse_prefix(prefix_text, prefix_start).map_err(|w| attempted.then_some(w))?;

    let attr_start = open + 1;
    let Some(close_offset) = input[attr_start..].find('}') else {
        return Err(Some(TemplateWarning::malformed(
            dollar..input.len(),
            "directive is missing '}'",
        )));
    };
    let close = attr_start + close_offset;
    let attr_text = &input[attr_start..close];
    let Some(attribute) = Attribute::parse(attr_text) else {
        let message = if attr_text.is_empty() {
            "empty attribute name"
        } else {
            "invalid attribute name"
        };
        return Err(Some(TemplateWarning::malformed(open..close + 1, message)));
    };

    let directive = Directive {
        prefix: Spanned::new(prefix, prefix_start..open),
        attribute: Spanned::new(attribute, attr_start..close),
    };
    Ok((directive, close + 1))
}

/// Parse the text between `$` and `{`; `offset` is its position in the
/// template, used to place warnings
fn parse_prefix(input: &str, offset: usize) -> Result<Prefix, TemplateWarning> {
    if input.is_empty() {
        return Ok(Prefix::Current);
    }

    let tokens = lexer::lex(input).map_err(|span| {
        TemplateWarning::malformed(span, format!("unexpected character in prefix '{}'", input))
            .shifted(offset)
    })?;

    let len = input.len();
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (tok, SimpleSpan::from(span)));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream =
        Stream::from_iter(token_iter).map(SimpleSpan::from(len..len), |(t, s): (_, _)| (t, s));

    prefix_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .next()
                .map(TemplateWarning::from)
                .unwrap_or_else(|| TemplateWarning::malformed(0..len, "invalid prefix"))
                .shifted(offset)
        })
}

fn prefix_parser<'a, I>() -> impl Parser<'a, I, Prefix, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let endpoint = choice((
        just(Token::Source).to(End::Source),
        just(Token::Target).to(End::Target),
    ));

    let keyword = select! {
        Token::Ident(s) => s,
    };

    // assignment:source, Flow:target, ...
    let related = keyword
        .then_ignore(just(Token::Colon))
        .then(endpoint)
        .map(|(keyword, end)| Prefix::Related {
            relation: Relation::parse(&keyword),
            end,
        });

    let navigation = choice((
        just(Token::Source).to(Prefix::Source),
        just(Token::Target).to(Prefix::Target),
        just(Token::Parent).to(Prefix::Parent),
        just(Token::ModelFolder).to(Prefix::ModelFolder),
        just(Token::ViewFolder).to(Prefix::ViewFolder),
        just(Token::View).to(Prefix::View),
        just(Token::Model).to(Prefix::Model),
    ));

    choice((related, navigation)).then_ignore(end())
}
