//! Parser-independent view of a source unit.
//!
//! Analyzers only ever see these types. A backend implements
//! [`SyntaxProvider`] and fills them from its own AST; every span is a byte
//! range into the text that was handed to `parse`.

use crate::error::ParseError;
use std::path::Path;

/// Byte range into the unit text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Slices `text`, returning an empty string for out-of-range spans
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Coarse expression classification, enough for URL extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// Quoted string; holds the unquoted value
    StringLiteral(String),
    /// Backtick template, with or without substitutions
    Template,
    Identifier(String),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub kind: ExprKind,
    pub span: TextSpan,
}

impl Expression {
    /// Literal value for string literals, source text for everything else
    pub fn literal_or_text(&self, text: &str) -> String {
        match &self.kind {
            ExprKind::StringLiteral(value) => value.clone(),
            _ => self.span.slice(text).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorDecl {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub span: TextSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    /// Span of the type annotation, without the colon
    pub type_span: Option<TextSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub type_span: Option<TextSpan>,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub params: Vec<ParamDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Public,
    Protected,
    Private,
}

impl Accessibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Protected => "protected",
            Accessibility::Private => "private",
        }
    }
}

/// Call expression found inside a method body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Callee expression without type arguments, e.g. `this.http.get`
    pub callee: TextSpan,
    pub args: Vec<Expression>,
    pub span: TextSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Variable,
    Property,
}

/// Named declaration with an optional initializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub initializer: Option<Expression>,
    /// Declared directly in the module body
    pub top_level: bool,
    pub span: TextSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    /// Start of the method itself (after decorators)
    pub span: TextSpan,
    pub decorators: Vec<DecoratorDecl>,
    pub access: Option<Accessibility>,
    pub params: Vec<ParamDecl>,
    pub return_type: Option<TextSpan>,
    /// Block including braces; `None` for overload signatures and abstract methods
    pub body: Option<TextSpan>,
    /// Pre-order: a call precedes the calls nested in its callee and arguments
    pub calls: Vec<CallSite>,
    /// Variable declarations anywhere inside the body, in source order
    pub locals: Vec<Declaration>,
}

impl MethodDecl {
    /// Text between the body braces, empty when there is no body
    pub fn body_text<'a>(&self, text: &'a str) -> &'a str {
        match self.body {
            Some(span) if span.end >= span.start + 2 => {
                TextSpan::new(span.start + 1, span.end - 1).slice(text)
            }
            _ => "",
        }
    }

    /// Earliest offset belonging to the declaration, decorators included
    pub fn start_offset(&self) -> usize {
        self.decorators
            .iter()
            .map(|d| d.span.start)
            .chain(std::iter::once(self.span.start))
            .min()
            .unwrap_or(self.span.start)
    }

    pub fn local(&self, name: &str) -> Option<&Declaration> {
        self.locals.iter().find(|decl| decl.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// `None` for `export default class { ... }`
    pub name: Option<String>,
    pub span: TextSpan,
    pub decorators: Vec<DecoratorDecl>,
    pub properties: Vec<PropertyDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
}

/// Everything the analyzers need from one unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    pub classes: Vec<ClassDecl>,
    /// Every variable and property declaration in the unit, in source order
    pub declarations: Vec<Declaration>,
}

impl SyntaxTree {
    pub fn top_level_variables(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(|d| d.top_level && d.kind == DeclarationKind::Variable)
    }
}

/// Parsing backend
pub trait SyntaxProvider {
    fn parse(&self, path: &Path, text: &str) -> Result<SyntaxTree, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(body: Option<TextSpan>) -> MethodDecl {
        MethodDecl {
            name: "load".into(),
            span: TextSpan::new(20, 40),
            decorators: vec![DecoratorDecl {
                name: "HostListener".into(),
                arguments: Vec::new(),
                span: TextSpan::new(4, 18),
            }],
            access: None,
            params: Vec::new(),
            return_type: None,
            body,
            calls: Vec::new(),
            locals: Vec::new(),
        }
    }

    #[test]
    fn body_text_strips_braces() {
        let text = "{ return 1; }";
        let m = method(Some(TextSpan::new(0, text.len())));
        assert_eq!(m.body_text(text), " return 1; ");
        assert_eq!(method(None).body_text(text), "");
    }

    #[test]
    fn start_offset_includes_decorators() {
        assert_eq!(method(None).start_offset(), 4);
    }

    #[test]
    fn out_of_range_span_slices_empty() {
        assert_eq!(TextSpan::new(5, 50).slice("short"), "");
    }
}
