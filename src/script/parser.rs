// Script parser - converts tokens to spanned syntax trees

use super::ast::*;
use super::error::ParseError;
use super::lexer::Lexer;
use super::span::{Position, Span};
use super::token::{SpannedToken, Token};
use crate::config::EngineConfig;
use crate::expression::{BinaryOperator, UnaryOperator};

pub struct Parser {
    source: String,
    tokens: Vec<SpannedToken>,
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::with_config(source, &EngineConfig::default())
    }

    pub fn with_config(source: &str, config: &EngineConfig) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Parser {
            source: source.to_string(),
            tokens,
            position: 0,
            depth: 0,
            max_depth: config.max_depth,
        })
    }

    /// Parse a whole script: `name := expr;` statements, the last `;` optional
    pub fn parse_script(&mut self) -> Result<Script, ParseError> {
        let mut statements = Vec::new();

        while !self.match_token(&Token::Eof) {
            statements.push(self.parse_assignment()?);

            if self.match_token(&Token::Semicolon) {
                self.advance();
            } else if !self.match_token(&Token::Eof) {
                return Err(self.unexpected("';'"));
            }
        }

        Ok(Script { statements })
    }

    /// Parse a single expression spanning the whole input
    pub fn parse_standalone_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if self.match_token(&Token::Semicolon) {
            self.advance();
        }
        self.expect_token(Token::Eof)?;
        Ok(expr)
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let start = self.current_start();
        let target = self.expect_identifier()?;
        self.expect_token(Token::Assign)?;
        let expression = self.parse_expression()?;

        Ok(Assignment {
            target,
            expression,
            span: self.span_from(start),
        })
    }

    /// Parse an expression, counting nesting against the configured limit
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.parse_or();
        self.depth -= 1;
        expr
    }

    /// Parse OR / XOR expression
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        loop {
            let op = match self.current_token() {
                Token::Or => BinaryOperator::Or,
                Token::Xor => BinaryOperator::Xor,
                _ => break,
            };
            self.advance();
            let right = self.parse_and()?;
            left = self.binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;

        while self.match_token(&Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = self.binary(BinaryOperator::And, left, right);
        }

        Ok(left)
    }

    /// Parse NOT expression
    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.match_token(&Token::Not) {
            let start = self.current_start();
            self.advance();
            self.enter()?;
            let operand = self.parse_not();
            self.depth -= 1;
            Ok(self.unary(UnaryOperator::Not, operand?, start))
        } else {
            self.parse_comparison()
        }
    }

    /// Parse comparison expression
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        let op = match self.current_token() {
            Token::Equal => BinaryOperator::Eq,
            Token::NotEqual => BinaryOperator::Ne,
            Token::Less => BinaryOperator::Lt,
            Token::LessEqual => BinaryOperator::Le,
            Token::Greater => BinaryOperator::Gt,
            Token::GreaterEqual => BinaryOperator::Ge,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_additive()?;
        Ok(self.binary(op, left, right))
    }

    /// Parse addition/subtraction/concatenation expression
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Sub,
                Token::Concat => BinaryOperator::Concat,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplication/division expression
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Mul,
                Token::Slash => BinaryOperator::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse unary expression
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current_token() {
            Token::Plus => UnaryOperator::Plus,
            Token::Minus => UnaryOperator::Minus,
            _ => return self.parse_primary(),
        };
        let start = self.current_start();
        self.advance();

        self.enter()?;
        let operand = self.parse_unary();
        self.depth -= 1;
        Ok(self.unary(op, operand?, start))
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_start();

        let kind = match self.current_token() {
            Token::Number(n) => {
                self.advance();
                ExprKind::Literal(self.parse_number(&n, start)?)
            }
            Token::String(s) => {
                self.advance();
                ExprKind::Literal(Literal::String(s))
            }
            Token::True => {
                self.advance();
                ExprKind::Literal(Literal::Boolean(true))
            }
            Token::False => {
                self.advance();
                ExprKind::Literal(Literal::Boolean(false))
            }
            Token::Null => {
                self.advance();
                ExprKind::Literal(Literal::Null)
            }
            Token::Identifier(name) => {
                self.advance();

                // Check for function call
                if self.match_token(&Token::LeftParen) {
                    self.advance();
                    let args = if self.match_token(&Token::RightParen) {
                        vec![]
                    } else {
                        self.parse_argument_list()?
                    };
                    self.expect_token(Token::RightParen)?;
                    ExprKind::Call { name, args }
                } else {
                    ExprKind::Variable(name)
                }
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(Token::RightParen)?;
                ExprKind::Parenthesized(Box::new(expr))
            }
            Token::If => return self.parse_if_expression(),
            _ => return Err(self.unexpected("expression")),
        };

        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parse `if condition then expr else expr`
    fn parse_if_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_start();
        self.expect_token(Token::If)?;
        let condition = self.parse_expression()?;
        self.expect_token(Token::Then)?;
        let then_branch = self.parse_expression()?;
        self.expect_token(Token::Else)?;
        let else_branch = self.parse_expression()?;

        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            self.span_from(start),
        ))
    }

    /// Parse call arguments; `_` marks an omitted one
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![];

        loop {
            if self.match_token(&Token::Underscore) {
                let start = self.current_start();
                self.advance();
                args.push(Expr::new(ExprKind::Omitted, self.span_from(start)));
            } else {
                args.push(self.parse_expression()?);
            }

            if !self.match_token(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(args)
    }

    fn parse_number(&self, text: &str, position: Position) -> Result<Literal, ParseError> {
        let invalid = || ParseError::InvalidNumber {
            text: text.to_string(),
            position,
        };

        if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>()
                .map(Literal::Number)
                .map_err(|_| invalid())
        } else {
            text.parse::<i64>()
                .map(Literal::Integer)
                .map_err(|_| invalid())
        }
    }

    // Helper methods

    fn binary(&self, op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        let span = Span::new(&self.source, left.span.start, right.span.end);
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    fn unary(&self, op: UnaryOperator, operand: Expr, start: Position) -> Expr {
        let span = Span::new(&self.source, start, operand.span.end);
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                position: self.current_start(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: Position) -> Span {
        let end = self
            .position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| token.end)
            .unwrap_or(start);
        Span::new(&self.source, start, end)
    }

    /// Get current token
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .map(|t| t.token.clone())
            .unwrap_or(Token::Eof)
    }

    fn current_start(&self) -> Position {
        self.tokens
            .get(self.position)
            .map(|t| t.start)
            .unwrap_or_default()
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, token: &Token) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| t.token == *token)
    }

    /// Expect a specific token
    fn expect_token(&mut self, token: Token) -> Result<(), ParseError> {
        if self.match_token(&token) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&token.to_string()))
        }
    }

    /// Expect an identifier
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.current_token() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current_token().to_string(),
            position: self.current_start(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression(source: &str) -> Expr {
        Parser::new(source)
            .unwrap()
            .parse_standalone_expression()
            .unwrap()
    }

    #[test]
    fn test_parse_script() {
        let mut parser = Parser::new("andRes := a and b;\norRes := a or b;").unwrap();
        let script = parser.parse_script().unwrap();

        assert_eq!(script.statements.len(), 2);
        assert_eq!(script.statements[0].target, "andRes");
        assert_eq!(script.statements[0].span.text, "andRes := a and b");
        assert_eq!(script.statements[1].target, "orRes");
        assert_eq!(script.statements[1].span.start.line, 2);
    }

    #[test]
    fn test_trailing_semicolon_optional() {
        let mut parser = Parser::new("var := undefinedVariable + 42").unwrap();
        let script = parser.parse_script().unwrap();
        assert_eq!(script.statements.len(), 1);
    }

    #[test]
    fn test_parse_precedence() {
        let expr = expression("a or b and not c");
        match expr.kind {
            ExprKind::Binary {
                op: BinaryOperator::Or,
                right,
                ..
            } => match right.kind {
                ExprKind::Binary {
                    op: BinaryOperator::And,
                    right,
                    ..
                } => assert!(matches!(
                    right.kind,
                    ExprKind::Unary {
                        op: UnaryOperator::Not,
                        ..
                    }
                )),
                other => panic!("Expected AND, got {:?}", other),
            },
            other => panic!("Expected OR, got {:?}", other),
        }

        let expr = expression("1 + 2 * 3 = 7");
        match expr.kind {
            ExprKind::Binary {
                op: BinaryOperator::Eq,
                left,
                ..
            } => {
                assert_eq!(left.span.text, "1 + 2 * 3");
            }
            other => panic!("Expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            expression("42").kind,
            ExprKind::Literal(Literal::Integer(42))
        );
        assert_eq!(
            expression("4.5").kind,
            ExprKind::Literal(Literal::Number(4.5))
        );
        assert_eq!(
            expression("\"abc\"").kind,
            ExprKind::Literal(Literal::String("abc".to_string()))
        );
        assert_eq!(expression("null").kind, ExprKind::Literal(Literal::Null));
        assert!(matches!(
            Parser::new("99999999999999999999")
                .unwrap()
                .parse_standalone_expression(),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_call_with_placeholder() {
        let expr = expression("substr(s, _, 3)");
        assert_eq!(expr.span.text, "substr(s, _, 3)");
        match expr.kind {
            ExprKind::Call { name, args } => {
                assert_eq!(name, "substr");
                assert_eq!(args.len(), 3);
                assert!(args[1].is_omitted());
                assert_eq!(args[2].text(), "3");
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if() {
        let expr = expression("if a > 1 then \"big\" else \"small\"");
        assert!(matches!(expr.kind, ExprKind::If { .. }));
    }

    #[test]
    fn test_parenthesized_span() {
        let expr = expression("(a + b) * 2");
        match expr.kind {
            ExprKind::Binary { left, .. } => {
                assert_eq!(left.span.text, "(a + b)");
                assert!(matches!(left.kind, ExprKind::Parenthesized(_)));
            }
            other => panic!("Expected multiplication, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Parser::new("a := ;").unwrap().parse_script(),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            Parser::new("a := 1 b := 2").unwrap().parse_script(),
            Err(ParseError::UnexpectedToken { .. })
        ));
        let err = Parser::new("a 1").unwrap().parse_script().unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected ':=', found number 1 at line 1, column 3"
        );
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        let config = EngineConfig::with_max_depth(10);
        assert!(matches!(
            Parser::with_config(&source, &config)
                .unwrap()
                .parse_standalone_expression(),
            Err(ParseError::NestingTooDeep { limit: 10, .. })
        ));

        let source = format!("{}1", "-".repeat(20));
        assert!(matches!(
            Parser::with_config(&source, &config)
                .unwrap()
                .parse_standalone_expression(),
            Err(ParseError::NestingTooDeep { .. })
        ));

        assert!(Parser::with_config("((1))", &config)
            .unwrap()
            .parse_standalone_expression()
            .is_ok());
    }
}
