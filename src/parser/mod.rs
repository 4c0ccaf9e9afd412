pub mod ast;

use log::{debug, trace};

use crate::error::SyntaxError;
use crate::lexer::tokens::{Keyword, Position, Symbol, Token, TokenKind};
use ast::*;

/// Number of significant tokens an alternative may consume and still be
/// abandoned in favour of the next one. Past this point a failure is final.
pub const LOOKAHEAD: usize = 4;

type Production<T> = fn(&mut Parser) -> Result<T, SyntaxError>;

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    position: usize,
    consumed: usize,
    previous: Option<Position>,
}

/// Recursive-descent parser for the typedef subset of C used by the header
pub struct Parser {
    tokens: Vec<Token>,
    /// Index into `tokens`, comments included
    position: usize,
    /// Significant (non-comment) tokens consumed so far
    consumed: usize,
    /// Start of the last significant token consumed
    previous: Option<Position>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        // Comments stay: the grammar admits them in a few places
        let tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .collect();

        Self {
            tokens,
            position: 0,
            consumed: 0,
            previous: None,
        }
    }

    /// Parse a complete header
    pub fn parse(&mut self) -> Result<HeaderFile, SyntaxError> {
        let mut exprs = Vec::new();

        loop {
            if let Some(comment) = self.accept_comment() {
                exprs.push(Expr::Comment(comment));
                continue;
            }
            let Some(start) = self.peek().map(|t| t.position) else {
                break;
            };
            match self.parse_expr() {
                Ok(expr) => exprs.push(expr),
                Err(mut err) => {
                    if err.position == Some(start) {
                        err.merge(&self.error(vec!["comment".to_string()]));
                    }
                    return Err(err);
                }
            }
        }

        debug!("parsed {} top-level expressions", exprs.len());
        Ok(HeaderFile { exprs })
    }

    /// Parse a lone type, e.g. `const char *` or `void (*cb)(int)`
    pub fn parse_standalone_type(&mut self) -> Result<Type, SyntaxError> {
        let ty = self.parse_type()?;
        if self.peek().is_some() {
            return Err(self.error(vec!["end of input".to_string()]));
        }
        Ok(ty)
    }

    /// Top level: Enum ';' | Alias ';' | Function ';' | Struct ';'
    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.choose::<Expr>(&[
            Self::parse_enum_expr,
            Self::parse_alias_expr,
            Self::parse_function_expr,
            Self::parse_struct_expr,
        ])
    }

    fn parse_enum_expr(&mut self) -> Result<Expr, SyntaxError> {
        let decl = self.parse_enum()?;
        self.expect_symbol(Symbol::Semicolon)?;
        Ok(Expr::Enum(decl))
    }

    fn parse_alias_expr(&mut self) -> Result<Expr, SyntaxError> {
        let decl = self.parse_alias()?;
        self.expect_symbol(Symbol::Semicolon)?;
        Ok(Expr::Alias(decl))
    }

    fn parse_function_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.expect_keyword(Keyword::Typedef)?;
        let decl = self.parse_function_type()?;
        self.expect_symbol(Symbol::Semicolon)?;
        Ok(Expr::Function(decl))
    }

    fn parse_struct_expr(&mut self) -> Result<Expr, SyntaxError> {
        let decl = self.parse_struct()?;
        self.expect_symbol(Symbol::Semicolon)?;
        Ok(Expr::Struct(decl))
    }

    /// typedef enum { A = 1, B = A, C } Name
    fn parse_enum(&mut self) -> Result<EnumDecl, SyntaxError> {
        self.expect_keyword(Keyword::Typedef)?;
        self.expect_keyword(Keyword::Enum)?;
        self.expect_symbol(Symbol::LeftBrace)?;

        let mut values = Vec::new();

        if !self.check_symbol(Symbol::RightBrace) {
            loop {
                let mut value = self.parse_enum_value()?;
                value.comment = self.accept_trailing_comment();

                if !self.accept_symbol(Symbol::Comma) {
                    values.push(value);
                    break;
                }
                if value.comment.is_none() {
                    value.comment = self.accept_trailing_comment();
                }
                values.push(value);

                // Trailing comma before '}'
                if self.check_symbol(Symbol::RightBrace) {
                    break;
                }
            }
        }

        self.expect_symbol(Symbol::RightBrace)?;
        let name = self.accept_identifier();

        Ok(EnumDecl { name, values })
    }

    fn parse_enum_value(&mut self) -> Result<EnumValue, SyntaxError> {
        let name = self.expect_identifier()?;

        let value = if self.accept_symbol(Symbol::Equals) {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Int) => Some(EnumInitializer::Int(self.expect_int()?)),
                Some(TokenKind::Identifier) => {
                    Some(EnumInitializer::ConstRef(self.expect_identifier()?))
                }
                _ => {
                    return Err(self.error(vec![
                        TokenKind::Int.describe(),
                        TokenKind::Identifier.describe(),
                    ]))
                }
            }
        } else {
            None
        };

        Ok(EnumValue {
            name,
            value,
            comment: None,
        })
    }

    /// typedef Type Name
    fn parse_alias(&mut self) -> Result<AliasDecl, SyntaxError> {
        self.expect_keyword(Keyword::Typedef)?;
        let ty = self.parse_primitive_type()?;
        let name = self.expect_identifier()?;
        Ok(AliasDecl { ty, name })
    }

    /// Ret (*Name)(Args?)
    fn parse_function_type(&mut self) -> Result<FunctionType, SyntaxError> {
        let return_type = self.parse_primitive_type()?;
        let name = self.parse_pointer_name()?;

        self.expect_symbol(Symbol::LeftParen)?;
        let arguments = if self.check_symbol(Symbol::RightParen) {
            Vec::new()
        } else {
            self.parse_argument_list()?
        };
        self.expect_symbol(Symbol::RightParen)?;

        Ok(FunctionType {
            return_type,
            name,
            arguments,
        })
    }

    /// '(' '*' Name ')'
    fn parse_pointer_name(&mut self) -> Result<String, SyntaxError> {
        self.expect_symbol(Symbol::LeftParen)?;
        self.expect_symbol(Symbol::Star)?;
        let name = self.expect_identifier()?;
        self.expect_symbol(Symbol::RightParen)?;
        Ok(name)
    }

    /// typedef struct { fields } Name
    fn parse_struct(&mut self) -> Result<StructDecl, SyntaxError> {
        self.expect_keyword(Keyword::Typedef)?;
        self.expect_keyword(Keyword::Struct)?;
        self.expect_symbol(Symbol::LeftBrace)?;

        let mut fields = Vec::new();
        while self.peek().is_some() && !self.check_symbol(Symbol::RightBrace) {
            fields.push(self.parse_struct_field()?);
        }

        self.expect_symbol(Symbol::RightBrace)?;
        let name = self.expect_identifier()?;

        Ok(StructDecl { name, fields })
    }

    /// (Variable | Function) ';'
    fn parse_struct_field(&mut self) -> Result<StructField, SyntaxError> {
        let mut field =
            self.choose::<StructField>(&[Self::parse_struct_variable, Self::parse_struct_function])?;
        self.expect_symbol(Symbol::Semicolon)?;

        if let StructField::Function(function) = &mut field {
            if function.comment.is_none() {
                function.comment = self.accept_trailing_comment();
            }
        }

        Ok(field)
    }

    fn parse_struct_variable(&mut self) -> Result<StructField, SyntaxError> {
        let ty = self.parse_primitive_type()?;
        let name = self.expect_identifier()?;
        Ok(StructField::Variable(StructVariable { ty, name }))
    }

    /// Unlike top-level typedefs, struct members need at least one argument.
    fn parse_struct_function(&mut self) -> Result<StructField, SyntaxError> {
        let return_type = self.parse_primitive_type()?;
        let name = self.parse_pointer_name()?;

        self.expect_symbol(Symbol::LeftParen)?;
        let arguments = self.parse_argument_list()?;
        self.expect_symbol(Symbol::RightParen)?;
        let comment = self.accept_comment();

        Ok(StructField::Function(StructFunction {
            function: FunctionType {
                return_type,
                name,
                arguments,
            },
            comment,
        }))
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Argument>, SyntaxError> {
        let mut arguments = vec![self.parse_argument()?];
        while self.accept_symbol(Symbol::Comma) {
            arguments.push(self.parse_argument()?);
        }
        Ok(arguments)
    }

    /// Type Name?
    fn parse_argument(&mut self) -> Result<Argument, SyntaxError> {
        let ty = self.parse_type()?;
        let name = self.accept_identifier();
        Ok(Argument { ty, name })
    }

    /// Function pointer first: both forms begin with a primitive type.
    fn parse_type(&mut self) -> Result<Type, SyntaxError> {
        self.choose::<Type>(&[
            |p: &mut Parser| Ok(Type::Function(Box::new(p.parse_function_type()?))),
            |p: &mut Parser| Ok(Type::Primitive(p.parse_primitive_type()?)),
        ])
    }

    /// const? Ident '*'?
    fn parse_primitive_type(&mut self) -> Result<PrimitiveType, SyntaxError> {
        let is_const = self.accept_keyword(Keyword::Const);

        let name = match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => self.expect_identifier()?,
            _ => {
                let mut expected = Vec::new();
                if !is_const {
                    expected.push(TokenKind::Keyword(Keyword::Const).describe());
                }
                expected.push(TokenKind::Identifier.describe());
                return Err(self.error(expected));
            }
        };

        let is_pointer = self.accept_symbol(Symbol::Star);

        Ok(PrimitiveType {
            is_const,
            name,
            is_pointer,
        })
    }

    /// Try each alternative in order. One that fails within the lookahead
    /// budget is rewound; one that fails beyond it is committed.
    fn choose<T>(&mut self, alternatives: &[Production<T>]) -> Result<T, SyntaxError> {
        let start = self.checkpoint();
        let mut furthest: Option<SyntaxError> = None;

        for (index, alternative) in alternatives.iter().enumerate() {
            match alternative(self) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let consumed = self.consumed - start.consumed;
                    if consumed > LOOKAHEAD {
                        trace!("alternative {} committed after {} tokens", index, consumed);
                        return Err(err);
                    }
                    self.rewind(start);
                    furthest = Some(match furthest.take() {
                        None => err,
                        Some(best) if err.depth() > best.depth() => err,
                        Some(mut best) => {
                            if err.depth() == best.depth() {
                                best.merge(&err);
                            }
                            best
                        }
                    });
                }
            }
        }

        Err(furthest.unwrap_or_else(|| self.error(Vec::new())))
    }

    // Helper methods

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            consumed: self.consumed,
            previous: self.previous,
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.consumed = checkpoint.consumed;
        self.previous = checkpoint.previous;
    }

    /// Index of the next non-comment token
    fn next_significant(&self) -> usize {
        let mut index = self.position;
        while self.tokens.get(index).is_some_and(Token::is_comment) {
            index += 1;
        }
        index
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next_significant())
    }

    fn advance(&mut self) -> Option<Token> {
        let index = self.next_significant();
        let token = self.tokens.get(index).cloned()?;
        self.position = index + 1;
        self.consumed += 1;
        self.previous = Some(token.position);
        Some(token)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn check_symbol(&self, symbol: Symbol) -> bool {
        self.check(TokenKind::Symbol(symbol))
    }

    fn accept(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn accept_symbol(&mut self, symbol: Symbol) -> bool {
        self.accept(TokenKind::Symbol(symbol))
    }

    fn accept_keyword(&mut self, keyword: Keyword) -> bool {
        self.accept(TokenKind::Keyword(keyword))
    }

    fn accept_identifier(&mut self) -> Option<String> {
        if self.check(TokenKind::Identifier) {
            self.advance().map(|t| t.lexeme)
        } else {
            None
        }
    }

    /// Take the comment directly at the cursor, if any
    fn accept_comment(&mut self) -> Option<String> {
        let token = self.tokens.get(self.position).filter(|t| t.is_comment())?;
        let text = token.lexeme.clone();
        self.position += 1;
        Some(text)
    }

    /// Take a comment that starts on the line of the last consumed token
    fn accept_trailing_comment(&mut self) -> Option<String> {
        let line = self.previous?.line;
        match self.tokens.get(self.position) {
            Some(token) if token.is_comment() && token.position.line == line => {
                self.accept_comment()
            }
            _ => None,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.error(vec![kind.describe()]))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), SyntaxError> {
        self.expect(TokenKind::Keyword(keyword)).map(|_| ())
    }

    fn expect_symbol(&mut self, symbol: Symbol) -> Result<(), SyntaxError> {
        self.expect(TokenKind::Symbol(symbol)).map(|_| ())
    }

    fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        self.expect(TokenKind::Identifier).map(|t| t.lexeme)
    }

    fn expect_int(&mut self) -> Result<i64, SyntaxError> {
        let token = self.expect(TokenKind::Int)?;
        token.lexeme.parse().map_err(|_| SyntaxError {
            position: Some(token.position),
            found: format!("integer '{}'", token.lexeme),
            expected: vec!["64-bit integer".to_string()],
        })
    }

    /// Error at the next significant token
    fn error(&self, expected: Vec<String>) -> SyntaxError {
        let (position, found) = match self.peek() {
            Some(token) => (Some(token.position), describe_token(token)),
            None => (None, "end of input".to_string()),
        };
        SyntaxError {
            position,
            found,
            expected,
        }
    }
}

fn describe_token(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier => format!("identifier '{}'", token.lexeme),
        TokenKind::Int => format!("integer '{}'", token.lexeme),
        kind => kind.describe(),
    }
}
