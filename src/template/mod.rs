//! Label templates
//!
//! A template is literal text with embedded `$prefix{attribute}`
//! directives:
//!
//! ```text
//! [${type}] ${name}
//! $source{name} -> $target{name}
//! assigned to $assignment:target{name} in $mfolder{name}
//! ```
//!
//! Parsing never fails. A `$` that does not start a well-formed directive is
//! kept as text; [`check`] reports such places.

pub mod ast;
mod check;
mod grammar;
pub mod lexer;

pub use ast::{Attribute, Directive, End, Prefix, Relation, Segment, Span, Spanned, Template};
pub use check::check;
pub use grammar::parse;
