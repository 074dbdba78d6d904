//! C++-only grammar: namespaces, access labels, base clauses, `using`
//! aliases, constructor and destructor names.

use decl_core::Visibility;

use super::Parser;
use super::declarations::Context;
use crate::ast::{BaseSpec, Decl, DeclName, NamespaceDecl, TypedefDecl};
use crate::error::ParserError;
use crate::token::TokenKind;

impl Parser<'_> {
    /// Handle declarations that only exist in C++. Returns `false` when the
    /// next declaration is shared grammar.
    pub(super) fn parse_cpp_item(&mut self, out: &mut Vec<Decl>) -> Result<bool, ParserError> {
        let Some(token) = self.peek() else {
            return Ok(false);
        };
        if token.kind != TokenKind::Keyword {
            return Ok(false);
        }
        match token.text {
            "namespace" => {
                let ns = self.parse_namespace()?;
                out.push(Decl::Namespace(ns));
            }
            "using" => {
                let alias = self.parse_using()?;
                out.push(Decl::Typedef(alias));
            }
            "template" => return Err(self.unsupported("template")),
            "inline" if self.peek_nth(1).is_some_and(|t| t.is_keyword("namespace")) => {
                return Err(self.unsupported("inline namespace"));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// `namespace a { ... }` and the nested form `namespace a::b { ... }`.
    fn parse_namespace(&mut self) -> Result<NamespaceDecl, ParserError> {
        let start = self.current_span();
        self.bump()?;
        if self.at_punct("{") {
            return Err(self.unsupported("anonymous namespace"));
        }
        let mut names = vec![self.expect_identifier()?.text.to_string()];
        while self.eat_punct("::") {
            names.push(self.expect_identifier()?.text.to_string());
        }
        if self.at_punct("=") {
            return Err(self.unsupported("namespace alias"));
        }
        self.expect_punct("{")?;

        let outer = self.scope.clone();
        self.scope.extend(names.iter().cloned());
        let mut decls = Vec::new();
        while !self.at_punct("}") {
            if self.at_eof() {
                return Err(self.unexpected("`}`"));
            }
            self.parse_external_decl(&mut decls)?;
        }
        self.expect_punct("}")?;
        self.scope.truncate(outer.len());
        let span = self.span_from(start);

        // Innermost first, so `a::b` becomes `a { b { ... } }`.
        let mut ns: Option<NamespaceDecl> = None;
        for (depth, name) in names.iter().enumerate().rev() {
            let mut scope = outer.clone();
            scope.extend(names[..depth].iter().cloned());
            let decls = match ns.take() {
                Some(inner) => vec![Decl::Namespace(inner)],
                None => std::mem::take(&mut decls),
            };
            ns = Some(NamespaceDecl {
                name: name.clone(),
                scope,
                decls,
                span,
            });
        }
        ns.ok_or_else(|| self.unexpected("namespace name"))
    }

    /// `using Name = Type;`. Directives and using-declarations are rejected.
    pub(super) fn parse_using(&mut self) -> Result<TypedefDecl, ParserError> {
        let start = self.current_span();
        self.bump()?;
        if self.at_keyword("namespace") {
            return Err(self.unsupported("using directive"));
        }
        let name = self.expect_identifier()?;
        if !self.eat_punct("=") {
            return Err(ParserError::unsupported("using declaration", self.span_from(start)));
        }
        let spec = self.parse_type_only()?;
        let mut declarator = self.parse_declarator(true)?;
        if declarator.name.is_some() {
            return Err(ParserError::UnexpectedToken {
                expected: "`;`".to_string(),
                found: declarator.name.map(|n| n.path.join("::")).unwrap_or_default(),
                span: declarator.span,
            });
        }
        declarator.name = Some(DeclName {
            path: vec![name.text.to_string()],
            span: name.span,
        });
        self.expect_punct(";")?;
        Ok(TypedefDecl {
            spec,
            declarators: vec![declarator],
            scope: self.scope.clone(),
            span: self.span_from(start),
        })
    }

    /// `public:` and friends.
    pub(super) fn parse_access_label(&mut self) -> Result<Option<Visibility>, ParserError> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        if token.kind != TokenKind::Keyword || !self.nth_is_punct(1, ":") {
            return Ok(None);
        }
        let visibility = match token.text {
            "public" => Visibility::Public,
            "protected" => Visibility::Protected,
            "private" => Visibility::Private,
            _ => return Ok(None),
        };
        self.pos += 1;
        self.expect_punct(":")?;
        Ok(Some(visibility))
    }

    /// `: [access] Base`. A second base is rejected.
    pub(super) fn parse_base_clause(&mut self) -> Result<BaseSpec, ParserError> {
        let start = self.current_span();
        self.expect_punct(":")?;
        let mut access = None;
        loop {
            if let Some(token) = self.peek().filter(|t| t.kind == TokenKind::Keyword) {
                match token.text {
                    "public" => access = Some(Visibility::Public),
                    "protected" => access = Some(Visibility::Protected),
                    "private" => access = Some(Visibility::Private),
                    "virtual" => return Err(self.unsupported("virtual inheritance")),
                    _ => break,
                }
                self.pos += 1;
            } else {
                break;
            }
        }
        let global = self.eat_punct("::");
        let mut path = vec![self.expect_identifier()?.text.to_string()];
        while self.eat_punct("::") {
            path.push(self.expect_identifier()?.text.to_string());
        }
        if self.at_punct("<") {
            return Err(self.unsupported("template base class"));
        }
        if self.at_punct(",") {
            return Err(self.unsupported("multiple inheritance"));
        }
        Ok(BaseSpec {
            access,
            path,
            global,
            span: self.span_from(start),
        })
    }

    /// Recognize a constructor or destructor name ahead of a parameter list.
    ///
    /// Inside a class body this is the class's own name; at namespace scope
    /// it is a qualified `X::X` or `X::~X`.
    pub(super) fn try_special_member_name(
        &mut self,
        ctx: &Context,
    ) -> Result<Option<DeclName>, ParserError> {
        if !self.dialect.is_cpp() {
            return Ok(None);
        }
        match ctx {
            Context::Class(Some(class)) => {
                let is_ctor = self
                    .peek()
                    .is_some_and(|t| t.is_identifier() && t.text == class.as_str())
                    && self.nth_is_punct(1, "(");
                if !is_ctor {
                    return Ok(None);
                }
                let token = self.bump()?;
                Ok(Some(DeclName {
                    path: vec![token.text.to_string()],
                    span: token.span,
                }))
            }
            Context::File => Ok(self.scan_out_of_line_special()),
            Context::Class(None) | Context::Type => Ok(None),
        }
    }

    fn scan_out_of_line_special(&mut self) -> Option<DeclName> {
        let start = self.current_span();
        let mut path = Vec::new();
        let mut n = 0;
        let first = self.peek_nth(n).filter(|t| t.is_identifier())?;
        path.push(first.text.to_string());
        while self.nth_is_punct(n + 1, "::") {
            if self.nth_is_punct(n + 2, "~") {
                let name = self.peek_nth(n + 3).filter(|t| t.is_identifier())?;
                path.push(format!("~{}", name.text));
                n += 3;
            } else {
                let name = self.peek_nth(n + 2).filter(|t| t.is_identifier())?;
                path.push(name.text.to_string());
                n += 2;
            }
        }
        if path.len() < 2 || !self.nth_is_punct(n + 1, "(") {
            return None;
        }
        let class = &path[path.len() - 2];
        let last = &path[path.len() - 1];
        if last != class && *last != format!("~{class}") {
            return None;
        }
        self.pos += n + 1;
        Some(DeclName {
            path,
            span: self.span_from(start),
        })
    }

    /// `~Name` inside a class body.
    pub(super) fn parse_destructor_name(&mut self) -> Result<DeclName, ParserError> {
        let start = self.current_span();
        self.expect_punct("~")?;
        let name = self.expect_identifier()?;
        Ok(DeclName {
            path: vec![format!("~{}", name.text)],
            span: self.span_from(start),
        })
    }
}
