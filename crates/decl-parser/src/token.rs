//! Token types produced by the lexer.

use decl_core::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Punct,
    /// A whole preprocessor line, `#` through end of line.
    Directive,
}

/// A token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl Token<'_> {
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    #[must_use]
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}

/// Keywords shared by both dialects.
pub(crate) const C_KEYWORDS: &[&str] = &[
    "_Alignas",
    "_Atomic",
    "_Bool",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
    "auto",
    "break",
    "case",
    "char",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "struct",
    "switch",
    "typedef",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
];

/// Keywords that only exist in C++.
pub(crate) const CPP_KEYWORDS: &[&str] = &[
    "alignas",
    "bool",
    "char16_t",
    "char32_t",
    "class",
    "constexpr",
    "delete",
    "explicit",
    "false",
    "friend",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "nullptr",
    "operator",
    "private",
    "protected",
    "public",
    "static_assert",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "typename",
    "using",
    "virtual",
    "wchar_t",
];

/// Multi-character punctuators, longest first.
pub(crate) const MULTI_PUNCTS: &[&str] = &[
    "...", "<<=", ">>=", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##", "::",
];

pub(crate) const SINGLE_PUNCTS: &str = "(){}[];,:*&=<>+-/%!~^|?.#";
