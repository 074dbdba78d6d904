//! Declarations shared by both dialects: specifiers, declarators,
//! aggregates, enums, typedefs, functions and variables.

use decl_core::{Span, Tag, Visibility};

use super::Parser;
use crate::ast::{
    AggregateDecl, AggregateKind, BaseType, Decl, DeclName, DeclSuffix, Declarator, EnumDecl,
    EnumeratorDecl, FieldDecl, FunctionDecl, FunctionSuffix, Initializer, Member, MemberKind,
    ParamDecl, ParamList, PtrOp, ReturnType, Specifiers, TypeSpec, TypedefDecl, VariableDecl,
};
use crate::error::ParserError;
use crate::token::TokenKind;

/// Where a declaration is being parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Context {
    /// File or namespace scope.
    File,
    /// Inside an aggregate body; carries the aggregate's name.
    Class(Option<String>),
    /// Parameter lists, typedef and `using` targets: no declarations of
    /// constructors possible.
    Type,
}

/// What a declaration specifier sequence turned out to start.
enum Head {
    Type(TypeSpec),
    /// Constructor or destructor name: no return type.
    Special(DeclName),
}

/// A parsed simple declaration before it is filed as a namespace-level
/// declaration or a class member.
pub(super) enum Parsed {
    Type(Decl),
    Function(FunctionDecl),
    Object {
        specifiers: Specifiers,
        spec: TypeSpec,
        declarator: Declarator,
        bit_width: Option<u32>,
        has_initializer: bool,
        span: Span,
    },
}

const PRIMITIVES: &[&str] = &[
    "void", "char", "int", "float", "double", "_Bool", "bool", "wchar_t", "char16_t", "char32_t",
];

/// Accumulates primitive keywords in any order (`long unsigned int`).
#[derive(Default)]
struct PrimitiveSpec {
    sign: Option<&'static str>,
    short: bool,
    longs: u8,
    base: Option<String>,
}

impl PrimitiveSpec {
    fn is_empty(&self) -> bool {
        self.sign.is_none() && !self.short && self.longs == 0 && self.base.is_none()
    }

    fn add(&mut self, word: &str) -> bool {
        match word {
            "signed" => self.sign = Some("signed"),
            "unsigned" => self.sign = Some("unsigned"),
            "short" => self.short = true,
            "long" => self.longs += 1,
            w if PRIMITIVES.contains(&w) && self.base.is_none() => self.base = Some(w.to_string()),
            _ => return false,
        }
        true
    }

    /// Canonical spelling: `unsigned long`, `signed char`, `unsigned int`.
    fn finish(self) -> String {
        let base = self.base.unwrap_or_else(|| "int".to_string());
        let mut words: Vec<&str> = Vec::new();
        match self.sign {
            Some("unsigned") => words.push("unsigned"),
            Some("signed") if base == "char" => words.push("signed"),
            _ => {}
        }
        if self.short {
            words.push("short");
        }
        for _ in 0..self.longs {
            words.push("long");
        }
        if base != "int" || !(self.short || self.longs > 0) {
            words.push(&base);
        }
        words.join(" ")
    }
}

impl Parser<'_> {
    // ── Top level ──────────────────────────────────────────────────

    /// Parse one declaration at file or namespace scope into `out`.
    pub(super) fn parse_external_decl(&mut self, out: &mut Vec<Decl>) -> Result<(), ParserError> {
        if self.eat_punct(";") {
            return Ok(());
        }
        if self.at_keyword("_Static_assert") || self.at_keyword("static_assert") {
            return self.skip_statement();
        }
        if self.dialect.is_cpp() && self.parse_cpp_item(out)? {
            return Ok(());
        }
        if self.at_keyword("typedef") {
            let typedef = self.parse_typedef()?;
            out.append(&mut self.hoisted);
            out.push(Decl::Typedef(typedef));
            return Ok(());
        }

        let items = self.parse_simple_declaration(&Context::File)?;
        out.append(&mut self.hoisted);
        for item in items {
            match item {
                Parsed::Type(decl) => out.push(decl),
                Parsed::Function(func) => out.push(Decl::Function(func)),
                Parsed::Object {
                    specifiers,
                    spec,
                    declarator,
                    bit_width,
                    has_initializer,
                    span,
                } => {
                    if bit_width.is_some() {
                        return Err(ParserError::UnexpectedToken {
                            expected: "`;`".to_string(),
                            found: ":".to_string(),
                            span,
                        });
                    }
                    out.push(Decl::Variable(VariableDecl {
                        specifiers,
                        spec,
                        declarator,
                        has_initializer,
                        scope: self.scope.clone(),
                        span,
                    }));
                }
            }
        }
        Ok(())
    }

    /// `decl-specifiers init-declarator-list ;`, or a function definition.
    pub(super) fn parse_simple_declaration(
        &mut self,
        ctx: &Context,
    ) -> Result<Vec<Parsed>, ParserError> {
        let start = self.current_span();
        let (specifiers, head) = self.parse_decl_specifiers(ctx)?;
        let spec = match head {
            Head::Special(name) => {
                let func = self.parse_special_member(specifiers, name, start)?;
                return Ok(vec![Parsed::Function(func)]);
            }
            Head::Type(spec) => spec,
        };

        let mut items = Vec::new();
        let spec = Self::split_inline_definition(spec, &mut items)?;

        if self.eat_punct(";") {
            if items.is_empty() {
                items.push(Parsed::Type(self.forward_declaration(&spec, start)?));
            }
            return Ok(items);
        }

        loop {
            let decl_start = self.current_span();
            let declarator = self.parse_declarator(false)?;
            if let DeclSuffix::Function(_) = &declarator.suffix {
                let func = self.finish_function(specifiers, Some(spec.clone()), declarator, start)?;
                let has_body = func.has_body;
                items.push(Parsed::Function(func));
                if has_body {
                    return Ok(items);
                }
            } else {
                let bit_width = if self.eat_punct(":") { Some(self.parse_bit_width()?) } else { None };
                let has_initializer = if self.eat_punct("=") {
                    self.skip_expression()?;
                    true
                } else if self.dialect.is_cpp() && self.at_punct("{") {
                    self.skip_balanced()?;
                    true
                } else {
                    false
                };
                items.push(Parsed::Object {
                    specifiers,
                    spec: spec.clone(),
                    declarator,
                    bit_width,
                    has_initializer,
                    span: self.span_from(decl_start),
                });
            }
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(";")?;
        Ok(items)
    }

    /// Move an inline `struct S {...}` / `enum E {...}` out of a declaration
    /// into its own item, leaving a tag reference for the declarators.
    fn split_inline_definition(spec: TypeSpec, items: &mut Vec<Parsed>) -> Result<TypeSpec, ParserError> {
        let base = match spec.base {
            BaseType::Aggregate(decl) => {
                let Some(name) = decl.name.clone() else {
                    return Err(ParserError::unsupported("anonymous aggregate", decl.span));
                };
                let tag = decl.kind.tag();
                items.push(Parsed::Type(Decl::Aggregate(*decl)));
                BaseType::Named {
                    path: vec![name],
                    global: false,
                    tag: Some(tag),
                }
            }
            BaseType::Enum(decl) => {
                let Some(name) = decl.name.clone() else {
                    return Err(ParserError::unsupported("anonymous enum", decl.span));
                };
                items.push(Parsed::Type(Decl::Enum(*decl)));
                BaseType::Named {
                    path: vec![name],
                    global: false,
                    tag: Some(Tag::Enum),
                }
            }
            other => other,
        };
        Ok(TypeSpec { base, ..spec })
    }

    /// `struct S;`, `class C;`, `union U;`, `enum E;`.
    fn forward_declaration(&self, spec: &TypeSpec, start: Span) -> Result<Decl, ParserError> {
        let span = self.span_from(start);
        match &spec.base {
            BaseType::Named {
                path,
                tag: Some(tag),
                ..
            } if path.len() == 1 => {
                let name = Some(path[0].clone());
                let kind = match tag {
                    Tag::Enum => {
                        return Ok(Decl::Enum(EnumDecl {
                            name,
                            scoped: false,
                            scope: self.scope.clone(),
                            underlying: None,
                            variants: None,
                            span,
                        }));
                    }
                    Tag::Struct => AggregateKind::Struct,
                    Tag::Union => AggregateKind::Union,
                    Tag::Class => AggregateKind::Class,
                };
                Ok(Decl::Aggregate(AggregateDecl {
                    kind,
                    name,
                    scope: self.scope.clone(),
                    base: None,
                    body: None,
                    span,
                }))
            }
            _ => Err(ParserError::UnexpectedToken {
                expected: "declarator".to_string(),
                found: ";".to_string(),
                span,
            }),
        }
    }

    // ── Specifiers ─────────────────────────────────────────────────

    fn parse_decl_specifiers(&mut self, ctx: &Context) -> Result<(Specifiers, Head), ParserError> {
        let start = self.current_span();
        let mut specifiers = Specifiers::default();
        let mut is_const = false;
        let mut is_volatile = false;
        let mut primitive = PrimitiveSpec::default();
        let mut base: Option<BaseType> = None;

        while let Some(token) = self.peek() {
            let typed = base.is_some() || !primitive.is_empty();
            match (token.kind, token.text) {
                (TokenKind::Keyword, "static") => specifiers.is_static = true,
                (TokenKind::Keyword, "extern") => {
                    if self
                        .peek_nth(1)
                        .is_some_and(|t| t.kind == TokenKind::StringLiteral)
                    {
                        return Err(self.unsupported("extern \"C\" linkage block"));
                    }
                    specifiers.is_extern = true;
                }
                (TokenKind::Keyword, "register") => specifiers.is_register = true,
                (TokenKind::Keyword, "inline") => specifiers.is_inline = true,
                (TokenKind::Keyword, "virtual") => specifiers.is_virtual = true,
                (TokenKind::Keyword, "explicit") => specifiers.is_explicit = true,
                (TokenKind::Keyword, "constexpr") => specifiers.is_constexpr = true,
                (TokenKind::Keyword, "mutable") => specifiers.is_mutable = true,
                (TokenKind::Keyword, "const") => is_const = true,
                (TokenKind::Keyword, "volatile") => is_volatile = true,
                (
                    TokenKind::Keyword,
                    "restrict" | "_Noreturn" | "_Thread_local" | "thread_local" | "_Atomic",
                ) => {}
                (TokenKind::Keyword, "auto") if self.dialect.is_cpp() => {
                    return Err(self.unsupported("auto type deduction"));
                }
                (TokenKind::Keyword, "auto") => {}
                (TokenKind::Keyword, "friend") => {
                    return Err(self.unsupported("friend declaration"));
                }
                (TokenKind::Keyword, "template") => return Err(self.unsupported("template")),
                (TokenKind::Keyword, "typename") => {
                    return Err(self.unsupported("dependent type name"));
                }
                (TokenKind::Keyword, "operator") => {
                    return Err(self.unsupported("operator overloading"));
                }
                (TokenKind::Keyword, word) if base.is_none() && primitive.add(word) => {}
                (TokenKind::Keyword, "struct" | "union" | "class" | "enum") if !typed => {
                    base = Some(self.parse_tag_specifier()?);
                    continue;
                }
                (TokenKind::Punct, "[") if self.nth_is_punct(1, "[") => {
                    // `[[attribute]]`
                    self.skip_balanced()?;
                    continue;
                }
                (TokenKind::Punct, "~") if !typed && matches!(ctx, Context::Class(_)) => {
                    let name = self.parse_destructor_name()?;
                    return Ok((specifiers, Head::Special(name)));
                }
                (TokenKind::Identifier, _) | (TokenKind::Punct, "::") if !typed => {
                    if let Some(name) = self.try_special_member_name(ctx)? {
                        return Ok((specifiers, Head::Special(name)));
                    }
                    base = Some(self.parse_named_type()?);
                    continue;
                }
                _ => break,
            }
            self.pos += 1;
        }

        let base = match base {
            Some(base) => base,
            None if !primitive.is_empty() => BaseType::Primitive(primitive.finish()),
            None => return Err(self.unexpected("type specifier")),
        };
        let spec = TypeSpec {
            base,
            is_const,
            is_volatile,
            span: self.span_from(start),
        };
        Ok((specifiers, Head::Type(spec)))
    }

    /// A type where no declaration can start: parameters, aliases,
    /// underlying enum types. Storage specifiers are accepted and dropped.
    pub(super) fn parse_type_only(&mut self) -> Result<TypeSpec, ParserError> {
        match self.parse_decl_specifiers(&Context::Type)? {
            (_, Head::Type(spec)) => Ok(spec),
            (_, Head::Special(_)) => Err(self.unexpected("type specifier")),
        }
    }

    /// `a::b::C`, with an optional leading `::`.
    fn parse_named_type(&mut self) -> Result<BaseType, ParserError> {
        let global = self.dialect.is_cpp() && self.eat_punct("::");
        let mut path = vec![self.expect_identifier()?.text.to_string()];
        while self.dialect.is_cpp() && self.at_punct("::") {
            self.pos += 1;
            path.push(self.expect_identifier()?.text.to_string());
        }
        if self.dialect.is_cpp() && self.at_punct("<") {
            return Err(self.unsupported("template arguments"));
        }
        Ok(BaseType::Named {
            path,
            global,
            tag: None,
        })
    }

    // ── Aggregates ─────────────────────────────────────────────────

    /// `struct|union|class|enum [name] [: base] [{ body }]`.
    fn parse_tag_specifier(&mut self) -> Result<BaseType, ParserError> {
        let start = self.current_span();
        let keyword = self.bump()?;
        let kind = match keyword.text {
            "enum" => return self.parse_enum_specifier(start),
            "union" => AggregateKind::Union,
            "class" => AggregateKind::Class,
            _ => AggregateKind::Struct,
        };

        let path = if self.at_identifier() || (self.dialect.is_cpp() && self.at_punct("::")) {
            match self.parse_named_type()? {
                BaseType::Named { path, .. } => Some(path),
                _ => None,
            }
        } else {
            None
        };

        let base = if self.dialect.is_cpp() && self.at_punct(":") {
            Some(self.parse_base_clause()?)
        } else {
            None
        };

        if self.at_punct("{") {
            let name = match path {
                Some(path) if path.len() == 1 => path.into_iter().next(),
                Some(_) => return Err(self.unsupported("qualified aggregate definition")),
                None => None,
            };
            let body = self.parse_aggregate_body(kind, name.as_deref())?;
            return Ok(BaseType::Aggregate(Box::new(AggregateDecl {
                kind,
                name,
                scope: self.scope.clone(),
                base,
                body: Some(body),
                span: self.span_from(start),
            })));
        }

        match path {
            Some(path) if base.is_none() => Ok(BaseType::Named {
                path,
                global: false,
                tag: Some(kind.tag()),
            }),
            _ => Err(self.unexpected(&format!("{kind} name or body"))),
        }
    }

    /// Members between `{` and `}`.
    pub(super) fn parse_aggregate_body(
        &mut self,
        kind: AggregateKind,
        name: Option<&str>,
    ) -> Result<Vec<Member>, ParserError> {
        self.expect_punct("{")?;
        let scoped = self.dialect.is_cpp() && name.is_some();
        if let (true, Some(name)) = (scoped, name) {
            self.scope.push(name.to_string());
        }
        let ctx = Context::Class(name.map(str::to_string));
        let mut members = Vec::new();
        let mut access: Option<Visibility> = None;

        while !self.at_punct("}") {
            if self.at_eof() {
                return Err(self.unexpected(&format!("`}}` closing the {kind} body")));
            }
            if self.eat_punct(";") {
                continue;
            }
            if self.dialect.is_cpp() {
                if let Some(label) = self.parse_access_label()? {
                    access = Some(label);
                    continue;
                }
                if self.at_keyword("using") {
                    let alias = self.parse_using()?;
                    members.push(Member {
                        access,
                        kind: MemberKind::Nested(Decl::Typedef(alias)),
                    });
                    continue;
                }
            }
            if self.at_keyword("_Static_assert") || self.at_keyword("static_assert") {
                self.skip_statement()?;
                continue;
            }
            if self.at_keyword("typedef") {
                let typedef = self.parse_typedef()?;
                members.push(Member {
                    access,
                    kind: MemberKind::Nested(Decl::Typedef(typedef)),
                });
                continue;
            }

            for item in self.parse_simple_declaration(&ctx)? {
                match item {
                    Parsed::Type(decl) if !self.dialect.is_cpp() => self.hoisted.push(decl),
                    Parsed::Type(decl) => members.push(Member {
                        access,
                        kind: MemberKind::Nested(decl),
                    }),
                    Parsed::Function(func) if !self.dialect.is_cpp() => {
                        return Err(ParserError::unsupported(
                            "function declared inside a C struct",
                            func.span,
                        ));
                    }
                    Parsed::Function(func) => members.push(Member {
                        access,
                        kind: MemberKind::Method(func),
                    }),
                    Parsed::Object {
                        specifiers,
                        spec,
                        declarator,
                        bit_width,
                        span,
                        ..
                    } => members.push(Member {
                        access,
                        kind: MemberKind::Field(FieldDecl {
                            specifiers,
                            spec,
                            declarator,
                            bit_width,
                            span,
                        }),
                    }),
                }
            }
        }
        self.expect_punct("}")?;
        if scoped {
            self.scope.pop();
        }
        Ok(members)
    }

    fn parse_bit_width(&mut self) -> Result<u32, ParserError> {
        let token = self.peek().ok_or_else(|| self.unexpected("bit-field width"))?;
        if token.kind != TokenKind::IntLiteral {
            return Err(self.unexpected("integer bit-field width"));
        }
        let digits = token.text.trim_end_matches(['u', 'U', 'l', 'L']);
        let width = digits
            .parse()
            .map_err(|_| self.unexpected("integer bit-field width"))?;
        self.pos += 1;
        Ok(width)
    }

    // ── Enums ──────────────────────────────────────────────────────

    fn parse_enum_specifier(&mut self, start: Span) -> Result<BaseType, ParserError> {
        let scoped = self.dialect.is_cpp() && (self.eat_keyword("class") || self.eat_keyword("struct"));
        let name = if self.at_identifier() {
            Some(self.bump()?.text.to_string())
        } else {
            None
        };
        let underlying = if self.dialect.is_cpp() && self.eat_punct(":") {
            Some(self.parse_type_only()?)
        } else {
            None
        };

        let variants = if self.at_punct("{") {
            Some(self.parse_enumerators()?)
        } else if scoped || underlying.is_some() {
            None
        } else {
            let Some(name) = name else {
                return Err(self.unexpected("enum name or body"));
            };
            return Ok(BaseType::Named {
                path: vec![name],
                global: false,
                tag: Some(Tag::Enum),
            });
        };

        Ok(BaseType::Enum(Box::new(EnumDecl {
            name,
            scoped,
            scope: self.scope.clone(),
            underlying,
            variants,
            span: self.span_from(start),
        })))
    }

    fn parse_enumerators(&mut self) -> Result<Vec<EnumeratorDecl>, ParserError> {
        self.expect_punct("{")?;
        let mut variants = Vec::new();
        while !self.eat_punct("}") {
            let name = self.expect_identifier()?;
            let init = if self.eat_punct("=") {
                let init_start = self.current_span();
                let tokens = self.skip_expression()?;
                if tokens.is_empty() {
                    return Err(self.unexpected("enumerator value"));
                }
                Some(Initializer {
                    tokens: tokens.iter().map(|t| t.text.to_string()).collect(),
                    span: self.span_from(init_start),
                })
            } else {
                None
            };
            variants.push(EnumeratorDecl {
                name: name.text.to_string(),
                init,
                span: self.span_from(name.span),
            });
            if !self.eat_punct(",") {
                self.expect_punct("}")?;
                break;
            }
        }
        Ok(variants)
    }

    // ── Typedefs ───────────────────────────────────────────────────

    pub(super) fn parse_typedef(&mut self) -> Result<TypedefDecl, ParserError> {
        let start = self.current_span();
        self.bump()?;
        let spec = self.parse_type_only()?;
        let mut declarators = Vec::new();
        loop {
            let declarator = self.parse_declarator(false)?;
            if let DeclSuffix::Function(_) = declarator.suffix {
                return Err(ParserError::unsupported("function type alias", declarator.span));
            }
            declarators.push(declarator);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(";")?;
        Ok(TypedefDecl {
            spec,
            declarators,
            scope: self.scope.clone(),
            span: self.span_from(start),
        })
    }

    // ── Declarators ────────────────────────────────────────────────

    pub(super) fn parse_declarator(&mut self, abstract_ok: bool) -> Result<Declarator, ParserError> {
        let start = self.current_span();
        let ops = self.parse_ptr_ops();

        if self.at_punct("(") && (self.nth_is_punct(1, "*") || self.nth_is_punct(1, "&")) {
            return self.parse_function_pointer(ops, start, abstract_ok);
        }
        if self.at_punct("(")
            && self.dialect.is_cpp()
            && self.peek_nth(1).is_some_and(|t| t.is_identifier())
            && self.nth_is_punct(2, "::")
        {
            return Err(self.unsupported("pointer to member"));
        }

        let name = if self.at_identifier() || (self.dialect.is_cpp() && self.at_keyword("operator"))
        {
            Some(self.parse_decl_name()?)
        } else if abstract_ok {
            None
        } else {
            return Err(self.unexpected("declarator name"));
        };

        let suffix = if self.at_punct("[") {
            DeclSuffix::Array(self.parse_array_dims()?)
        } else if self.at_punct("(") && name.is_some() {
            DeclSuffix::Function(self.parse_function_suffix()?)
        } else {
            DeclSuffix::None
        };

        Ok(Declarator {
            name,
            ops,
            suffix,
            span: self.span_from(start),
        })
    }

    fn parse_function_pointer(
        &mut self,
        ops: Vec<PtrOp>,
        start: Span,
        abstract_ok: bool,
    ) -> Result<Declarator, ParserError> {
        self.expect_punct("(")?;
        let inner = self.parse_ptr_ops();
        let name = if self.at_identifier() {
            let token = self.bump()?;
            Some(DeclName {
                path: vec![token.text.to_string()],
                span: token.span,
            })
        } else if abstract_ok {
            None
        } else {
            return Err(self.unexpected("function pointer name"));
        };
        if self.at_punct("[") {
            return Err(self.unsupported("array of function pointers"));
        }
        if self.at_punct("(") {
            return Err(self.unsupported("function returning a function pointer"));
        }
        self.expect_punct(")")?;
        if !self.at_punct("(") {
            return Err(self.unsupported("pointer to array"));
        }
        self.pos += 1;
        let params = self.parse_param_list()?;
        if matches!(inner.first(), Some(PtrOp::Reference | PtrOp::RvalueReference)) {
            return Err(ParserError::unsupported("reference to function", self.span_from(start)));
        }
        Ok(Declarator {
            name,
            ops,
            suffix: DeclSuffix::FunctionPointer { inner, params },
            span: self.span_from(start),
        })
    }

    fn parse_ptr_ops(&mut self) -> Vec<PtrOp> {
        let mut ops = Vec::new();
        loop {
            if self.eat_punct("*") {
                let mut is_const = false;
                let mut is_volatile = false;
                loop {
                    if self.eat_keyword("const") {
                        is_const = true;
                    } else if self.eat_keyword("volatile") {
                        is_volatile = true;
                    } else if !self.eat_keyword("restrict") {
                        break;
                    }
                }
                ops.push(PtrOp::Pointer {
                    is_const,
                    is_volatile,
                });
            } else if self.dialect.is_cpp() && self.eat_punct("&") {
                ops.push(PtrOp::Reference);
            } else if self.dialect.is_cpp() && self.eat_punct("&&") {
                ops.push(PtrOp::RvalueReference);
            } else {
                return ops;
            }
        }
    }

    /// A declarator's name; qualified (`Point::area`, `Point::~Point`) only in C++.
    fn parse_decl_name(&mut self) -> Result<DeclName, ParserError> {
        let start = self.current_span();
        if self.at_keyword("operator") {
            return Err(self.unsupported("operator overloading"));
        }
        let mut path = vec![self.expect_identifier()?.text.to_string()];
        while self.dialect.is_cpp() && self.eat_punct("::") {
            if self.at_keyword("operator") {
                return Err(self.unsupported("operator overloading"));
            }
            if self.eat_punct("~") {
                path.push(format!("~{}", self.expect_identifier()?.text));
            } else {
                path.push(self.expect_identifier()?.text.to_string());
            }
        }
        if self.dialect.is_cpp() && self.at_punct("<") {
            return Err(self.unsupported("template specialization"));
        }
        Ok(DeclName {
            path,
            span: self.span_from(start),
        })
    }

    fn parse_array_dims(&mut self) -> Result<Vec<Option<String>>, ParserError> {
        let mut dims = Vec::new();
        while self.eat_punct("[") {
            let tokens = self.skip_expression()?;
            self.expect_punct("]")?;
            dims.push(if tokens.is_empty() {
                None
            } else {
                Some(tokens.iter().map(|t| t.text).collect::<String>())
            });
        }
        Ok(dims)
    }

    // ── Functions ──────────────────────────────────────────────────

    /// `( params ) qualifiers`.
    fn parse_function_suffix(&mut self) -> Result<FunctionSuffix, ParserError> {
        self.expect_punct("(")?;
        let params = self.parse_param_list()?;
        let mut suffix = FunctionSuffix {
            params,
            ..FunctionSuffix::default()
        };
        while let Some(token) = self.peek() {
            match (token.kind, token.text) {
                (TokenKind::Keyword, "const") => suffix.is_const = true,
                (TokenKind::Keyword, "volatile") => {}
                (TokenKind::Keyword, "noexcept") => {
                    self.pos += 1;
                    if self.at_punct("(") {
                        self.skip_balanced()?;
                    }
                    continue;
                }
                (TokenKind::Keyword, "throw") => {
                    return Err(self.unsupported("dynamic exception specification"));
                }
                (TokenKind::Identifier, "override" | "final") => {}
                (TokenKind::Punct, "->") => return Err(self.unsupported("trailing return type")),
                (TokenKind::Punct, "&" | "&&") if self.dialect.is_cpp() => {
                    return Err(self.unsupported("ref-qualified member function"));
                }
                _ => break,
            }
            self.pos += 1;
        }
        Ok(suffix)
    }

    /// Parameters after the opening `(`, through the closing `)`.
    fn parse_param_list(&mut self) -> Result<ParamList, ParserError> {
        let mut list = ParamList::default();
        if self.eat_punct(")") {
            return Ok(list);
        }
        loop {
            if self.eat_punct("...") {
                list.variadic = true;
                self.expect_punct(")")?;
                return Ok(list);
            }
            let start = self.current_span();
            let spec = self.parse_type_only()?;
            if matches!(spec.base, BaseType::Aggregate(_) | BaseType::Enum(_)) {
                return Err(ParserError::unsupported("type defined in a parameter", spec.span));
            }
            let declarator = self.parse_declarator(true)?;
            let has_default = self.eat_punct("=");
            if has_default {
                self.skip_expression()?;
            }
            list.params.push(ParamDecl {
                spec,
                declarator,
                has_default,
                span: self.span_from(start),
            });
            if !self.eat_punct(",") {
                self.expect_punct(")")?;
                return Ok(list);
            }
        }
    }

    /// Turn a function declarator into a declaration, consuming `= 0`,
    /// `= default`, a constructor initializer list and the body.
    fn finish_function(
        &mut self,
        specifiers: Specifiers,
        return_spec: Option<TypeSpec>,
        declarator: Declarator,
        start: Span,
    ) -> Result<FunctionDecl, ParserError> {
        let Declarator {
            name, ops, suffix, ..
        } = declarator;
        let DeclSuffix::Function(mut signature) = suffix else {
            return Err(self.unexpected("function declarator"));
        };
        let Some(name) = name else {
            return Err(self.unexpected("function name"));
        };

        let mut has_body = false;
        if self.dialect.is_cpp() && self.eat_punct("=") {
            let value = self.bump()?;
            match value.text {
                "0" => signature.is_pure = true,
                "default" => has_body = true,
                "delete" => {}
                _ => {
                    return Err(ParserError::UnexpectedToken {
                        expected: "`0`, `default` or `delete`".to_string(),
                        found: value.text.to_string(),
                        span: value.span,
                    });
                }
            }
        }
        if !has_body && self.dialect.is_cpp() && self.at_punct(":") {
            self.skip_member_initializers()?;
            if !self.at_punct("{") {
                return Err(self.unexpected("constructor body"));
            }
        }
        if !has_body && self.at_punct("{") {
            self.skip_balanced()?;
            has_body = true;
        } else if has_body && self.at_punct(",") {
            return Err(self.unexpected("`;`"));
        }

        Ok(FunctionDecl {
            specifiers,
            name,
            return_type: return_spec.map(|spec| ReturnType { spec, ops }),
            signature,
            scope: self.scope.clone(),
            has_body,
            span: self.span_from(start),
        })
    }

    /// Constructor or destructor: the name is already consumed.
    fn parse_special_member(
        &mut self,
        specifiers: Specifiers,
        name: DeclName,
        start: Span,
    ) -> Result<FunctionDecl, ParserError> {
        let suffix = self.parse_function_suffix()?;
        let declarator = Declarator {
            span: name.span,
            name: Some(name),
            ops: Vec::new(),
            suffix: DeclSuffix::Function(suffix),
        };
        let func = self.finish_function(specifiers, None, declarator, start)?;
        if !func.has_body {
            self.expect_punct(";")?;
        }
        Ok(func)
    }

    /// `: member(args), other{args}` up to the body.
    fn skip_member_initializers(&mut self) -> Result<(), ParserError> {
        self.expect_punct(":")?;
        loop {
            while !(self.at_punct("(") || self.at_punct("{")) {
                if self.at_eof() {
                    return Err(self.unexpected("member initializer"));
                }
                self.pos += 1;
            }
            self.skip_balanced()?;
            if !self.eat_punct(",") {
                return Ok(());
            }
        }
    }
}
