// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Recursive descent parser for the search query language.
//!
//! ```text
//! expression : or_expr
//! or_expr    : and_expr (OR and_expr)*
//! and_expr   : not_expr ((AND)? not_expr)*
//! not_expr   : NOT atom | atom
//! atom       : '(' expression ')' | field_expr | WORD
//! field_expr : WORD ':' [OPERATOR] [WORD]
//! ```
//!
//! Terms written next to each other without an explicit operator are joined
//! with AND.

use crate::query::{
    QueryError,
    lexer::{Lexer, Operator, Token},
};

/// Maximum nesting of parenthesised groups.
pub(crate) const MAX_DEPTH: usize = 64;

/// Maximum number of terms and field comparisons in one query.
pub(crate) const MAX_TERMS: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Field {
        field: String,
        operator: Operator,
        value: String,
    },
    Term(String),
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
    terms: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            depth: 0,
            terms: 0,
        }
    }

    /// Parses the whole input into a single expression tree.
    ///
    /// Trailing tokens that cannot continue the expression (such as an
    /// unmatched closing parenthesis) are an error.
    pub(crate) fn parse(mut self) -> Result<Expr, QueryError> {
        let expr = self.or_expr()?;
        match self.current {
            Token::Eof => Ok(expr),
            token => Err(QueryError::UnexpectedToken(token.to_string())),
        }
    }

    fn advance(&mut self) -> Token {
        std::mem::replace(&mut self.current, self.lexer.next_token())
    }

    fn expect(&mut self, expected: Token) -> Result<(), QueryError> {
        if self.current == expected {
            self.advance();
            Ok(())
        } else {
            Err(QueryError::ExpectedToken {
                expected: expected.to_string(),
                found: self.current.to_string(),
            })
        }
    }

    fn or_expr(&mut self) -> Result<Expr, QueryError> {
        let mut node = self.and_expr()?;

        while self.current == Token::Or {
            self.advance();
            let right = self.and_expr()?;
            node = Expr::Or(Box::new(node), Box::new(right));
        }

        Ok(node)
    }

    fn and_expr(&mut self) -> Result<Expr, QueryError> {
        let mut node = self.not_expr()?;

        loop {
            match self.current {
                Token::And => {
                    self.advance();
                }
                Token::Word(_) | Token::LParen | Token::Not => {}
                _ => break,
            }

            let right = self.not_expr()?;
            node = Expr::And(Box::new(node), Box::new(right));
        }

        Ok(node)
    }

    fn not_expr(&mut self) -> Result<Expr, QueryError> {
        if self.current == Token::Not {
            self.advance();
            return Ok(Expr::Not(Box::new(self.atom()?)));
        }

        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, QueryError> {
        match self.advance() {
            Token::LParen => {
                if self.depth == MAX_DEPTH {
                    return Err(QueryError::TooDeep(MAX_DEPTH));
                }

                self.depth += 1;
                let node = self.or_expr()?;
                self.depth -= 1;

                self.expect(Token::RParen)?;
                Ok(node)
            }

            Token::Word(word) => {
                if self.terms == MAX_TERMS {
                    return Err(QueryError::TooManyTerms(MAX_TERMS));
                }
                self.terms += 1;

                if self.current != Token::Colon {
                    return Ok(Expr::Term(word));
                }
                self.advance();

                let operator = match self.current {
                    Token::Operator(op) => {
                        self.advance();
                        op
                    }
                    _ => Operator::Eq,
                };

                let value = match &mut self.current {
                    Token::Word(value) => {
                        let value = std::mem::take(value);
                        self.advance();
                        value
                    }
                    _ => String::new(),
                };

                Ok(Expr::Field {
                    field: word,
                    operator,
                    value,
                })
            }

            token => Err(QueryError::UnexpectedToken(token.to_string())),
        }
    }
}
