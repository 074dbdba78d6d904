//! Dialect-aware lexer.
//!
//! Turns source text into a lazy, finite stream of tokens. The lexer is an
//! [`Iterator`] that stops after the first error; it can be cloned to fork
//! the stream or [`rewind`](Lexer::rewind)ed to restart it.

use decl_core::{Dialect, Position, Span};

use crate::error::{LexError, LexErrorKind};
use crate::token::{C_KEYWORDS, CPP_KEYWORDS, MULTI_PUNCTS, SINGLE_PUNCTS, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    dialect: Dialect,
    pos: Position,
    /// Only whitespace seen since the last newline.
    line_start: bool,
    finished: bool,
}

/// Tokenize a whole source text eagerly.
///
/// # Errors
/// Returns the first `LexError` encountered.
pub fn tokenize(source: &str, dialect: Dialect) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source, dialect).collect()
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub const fn new(source: &'src str, dialect: Dialect) -> Self {
        Self {
            source,
            dialect,
            pos: Position::START,
            line_start: true,
            finished: false,
        }
    }

    /// Restart the stream from the beginning of the source.
    pub const fn rewind(&mut self) {
        self.pos = Position::START;
        self.line_start = true;
        self.finished = false;
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
            self.line_start = true;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn error(kind: LexErrorKind, position: Position) -> LexError {
        LexError { kind, position }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                self.bump_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                let start = self.pos;
                let Some(end) = rest[2..].find("*/") else {
                    return Err(Self::error(LexErrorKind::UnterminatedComment, start));
                };
                let target = self.pos.offset + 2 + end + 2;
                while self.pos.offset < target {
                    self.bump();
                }
            } else if rest.starts_with("\\\n") {
                self.bump();
                self.bump();
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn make(&self, kind: TokenKind, start: Position) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start.offset..self.pos.offset],
            span: Span::new(start, self.pos),
        }
    }

    fn next_token(&mut self) -> Option<Result<Token<'src>, LexError>> {
        if let Err(err) = self.skip_trivia() {
            return Some(Err(err));
        }
        let start = self.pos;
        let c = self.peek()?;
        let at_line_start = self.line_start;
        self.line_start = false;

        let token = match c {
            '#' if at_line_start => Ok(self.directive(start)),
            c if c.is_ascii_alphabetic() || c == '_' => self.word(start),
            c if c.is_ascii_digit() => Ok(self.number(start)),
            '.' if self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()) => Ok(self.number(start)),
            '"' => self.quoted('"', start).map(|()| self.make(TokenKind::StringLiteral, start)),
            '\'' => self.quoted('\'', start).map(|()| self.make(TokenKind::CharLiteral, start)),
            _ => self.punct(start),
        };
        Some(token)
    }

    fn directive(&mut self, start: Position) -> Token<'src> {
        loop {
            let rest = self.rest();
            if rest.starts_with("\\\n") {
                self.bump();
                self.bump();
            } else if rest.starts_with("\\\r\n") {
                self.bump();
                self.bump();
                self.bump();
            } else {
                match self.peek() {
                    None | Some('\n') => break,
                    Some(_) => {
                        self.bump();
                    }
                }
            }
        }
        self.make(TokenKind::Directive, start)
    }

    fn word(&mut self, start: Position) -> Result<Token<'src>, LexError> {
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = &self.source[start.offset..self.pos.offset];

        // Encoding prefixes glue onto the following literal.
        match (text, self.peek()) {
            ("L" | "u" | "U" | "u8", Some('"')) => {
                self.quoted('"', start)?;
                return Ok(self.make(TokenKind::StringLiteral, start));
            }
            ("L" | "u" | "U" | "u8", Some('\'')) => {
                self.quoted('\'', start)?;
                return Ok(self.make(TokenKind::CharLiteral, start));
            }
            ("R" | "LR" | "uR" | "UR" | "u8R", Some('"')) if self.dialect.is_cpp() => {
                self.raw_string(start)?;
                return Ok(self.make(TokenKind::StringLiteral, start));
            }
            _ => {}
        }

        let is_keyword = C_KEYWORDS.contains(&text)
            || (self.dialect.is_cpp() && CPP_KEYWORDS.contains(&text));
        let kind = if is_keyword { TokenKind::Keyword } else { TokenKind::Identifier };
        Ok(self.make(kind, start))
    }

    fn number(&mut self, start: Position) -> Token<'src> {
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '\'' || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.source[start.offset..self.pos.offset];
        let is_hex = text.starts_with("0x") || text.starts_with("0X");
        let is_float = text.contains('.')
            || (!is_hex && text.contains(['e', 'E']))
            || (is_hex && text.contains(['p', 'P']));
        let kind = if is_float { TokenKind::FloatLiteral } else { TokenKind::IntLiteral };
        self.make(kind, start)
    }

    fn quoted(&mut self, quote: char, start: Position) -> Result<(), LexError> {
        let kind = if quote == '"' {
            LexErrorKind::UnterminatedString
        } else {
            LexErrorKind::UnterminatedChar
        };
        self.bump_while(|c| c != quote);
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(Self::error(kind, start)),
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(Self::error(kind, start));
                    }
                }
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn raw_string(&mut self, start: Position) -> Result<(), LexError> {
        self.bump();
        let rest = self.rest();
        let Some(open) = rest.find('(') else {
            return Err(Self::error(LexErrorKind::UnterminatedString, start));
        };
        let terminator = format!("){}\"", &rest[..open]);
        let Some(close) = rest[open..].find(&terminator) else {
            return Err(Self::error(LexErrorKind::UnterminatedString, start));
        };
        let target = self.pos.offset + open + close + terminator.len();
        while self.pos.offset < target {
            self.bump();
        }
        Ok(())
    }

    fn punct(&mut self, start: Position) -> Result<Token<'src>, LexError> {
        let rest = self.rest();
        let multi = MULTI_PUNCTS
            .iter()
            .filter(|p| self.dialect.is_cpp() || **p != "::")
            .find(|p| rest.starts_with(**p));
        if let Some(p) = multi {
            for _ in 0..p.len() {
                self.bump();
            }
            return Ok(self.make(TokenKind::Punct, start));
        }
        match self.peek() {
            Some(c) if SINGLE_PUNCTS.contains(c) => {
                self.bump();
                Ok(self.make(TokenKind::Punct, start))
            }
            Some(c) => Err(Self::error(LexErrorKind::UnexpectedChar(c), start)),
            None => Err(Self::error(LexErrorKind::UnexpectedChar('\0'), start)),
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.next_token();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds_and_texts(source: &str, dialect: Dialect) -> Vec<(TokenKind, &str)> {
        tokenize(source, dialect)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn struct_definition_tokens() {
        let tokens = kinds_and_texts("struct Point { int x; };", Dialect::C);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "struct"),
                (TokenKind::Identifier, "Point"),
                (TokenKind::Punct, "{"),
                (TokenKind::Keyword, "int"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Punct, ";"),
                (TokenKind::Punct, "}"),
                (TokenKind::Punct, ";"),
            ]
        );
    }

    #[rstest]
    #[case("class", Dialect::C, TokenKind::Identifier)]
    #[case("class", Dialect::Cpp, TokenKind::Keyword)]
    #[case("namespace", Dialect::C, TokenKind::Identifier)]
    #[case("namespace", Dialect::Cpp, TokenKind::Keyword)]
    #[case("struct", Dialect::C, TokenKind::Keyword)]
    #[case("_Bool", Dialect::Cpp, TokenKind::Keyword)]
    fn keyword_sets_depend_on_dialect(
        #[case] word: &str,
        #[case] dialect: Dialect,
        #[case] expected: TokenKind,
    ) {
        assert_eq!(kinds_and_texts(word, dialect), vec![(expected, word)]);
    }

    #[test]
    fn scope_operator_is_one_token_only_in_cpp() {
        assert_eq!(
            kinds_and_texts("a::b", Dialect::Cpp),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Punct, "::"),
                (TokenKind::Identifier, "b"),
            ]
        );
        assert_eq!(
            kinds_and_texts("a::b", Dialect::C),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Punct, ":"),
                (TokenKind::Punct, ":"),
                (TokenKind::Identifier, "b"),
            ]
        );
    }

    #[rstest]
    #[case("42", TokenKind::IntLiteral)]
    #[case("0x1F", TokenKind::IntLiteral)]
    #[case("10UL", TokenKind::IntLiteral)]
    #[case("3.14", TokenKind::FloatLiteral)]
    #[case("1e-5", TokenKind::FloatLiteral)]
    #[case(".5f", TokenKind::FloatLiteral)]
    #[case("0x1p3", TokenKind::FloatLiteral)]
    fn number_literals(#[case] text: &str, #[case] kind: TokenKind) {
        assert_eq!(kinds_and_texts(text, Dialect::C), vec![(kind, text)]);
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = kinds_and_texts("int /* a\nb */ x; // trailing\n", Dialect::C);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "int"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Punct, ";"),
            ]
        );
    }

    #[test]
    fn string_and_char_literals_keep_escapes() {
        let tokens = kinds_and_texts(r#"printf("a \"b\" {\n", '}');"#, Dialect::C);
        assert_eq!(tokens[2], (TokenKind::StringLiteral, r#""a \"b\" {\n""#));
        assert_eq!(tokens[4], (TokenKind::CharLiteral, "'}'"));
    }

    #[test]
    fn prefixed_and_raw_literals() {
        let tokens = kinds_and_texts(r#"L"wide" u8"utf" R"x(a)"b)x""#, Dialect::Cpp);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::StringLiteral, r#"L"wide""#),
                (TokenKind::StringLiteral, r#"u8"utf""#),
                (TokenKind::StringLiteral, r#"R"x(a)"b)x""#),
            ]
        );
    }

    #[test]
    fn directive_only_at_line_start() {
        let tokens = kinds_and_texts("  #include \"types.h\"\nint x;", Dialect::C);
        assert_eq!(tokens[0], (TokenKind::Directive, "#include \"types.h\""));
        assert_eq!(tokens[1], (TokenKind::Keyword, "int"));
    }

    #[test]
    fn directive_follows_line_continuations() {
        let tokens = kinds_and_texts("#define LONG \\\n  1\nint", Dialect::C);
        assert_eq!(tokens[0], (TokenKind::Directive, "#define LONG \\\n  1"));
        assert_eq!(tokens[1], (TokenKind::Keyword, "int"));
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = tokenize("int\n  x;", Dialect::C).expect("tokenize");
        let x = tokens[1];
        assert_eq!(x.span.start.line, 2);
        assert_eq!(x.span.start.column, 3);
        assert_eq!(x.span.start.offset, 6);
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = tokenize("int x;\nchar* s = \"oops\n;", Dialect::C).expect_err("should fail");
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.position.line, 2);
        assert_eq!(err.position.column, 11);
        assert_eq!(err.position.offset, 17);
    }

    #[test]
    fn unterminated_char_literal() {
        let err = tokenize("char c = 'a", Dialect::C).expect_err("should fail");
        assert_eq!(err.kind, LexErrorKind::UnterminatedChar);
    }

    #[test]
    fn unterminated_block_comment() {
        let err = tokenize("int x; /* never closed", Dialect::C).expect_err("should fail");
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.position.column, 8);
    }

    #[test]
    fn unrecognized_character() {
        let err = tokenize("int @x;", Dialect::C).expect_err("should fail");
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar('@'));
        assert_eq!(err.position.offset, 4);
    }

    #[test]
    fn stream_stops_after_error_and_rewinds() {
        let mut lexer = Lexer::new("a $ b", Dialect::C);
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());

        lexer.rewind();
        let first = lexer.next().expect("token").expect("ok");
        assert_eq!(first.text, "a");
    }

    #[test]
    fn cloned_lexer_forks_the_stream() {
        let mut lexer = Lexer::new("a b c", Dialect::C);
        lexer.next();
        let fork = lexer.clone();
        let rest: Vec<_> = fork.map(|t| t.expect("ok").text).collect();
        assert_eq!(rest, vec!["b", "c"]);
        assert_eq!(lexer.next().expect("token").expect("ok").text, "b");
    }
}
