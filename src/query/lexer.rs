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

//! Tokenizer for the search query language.

use std::{fmt, iter::Peekable, str::Chars};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Word(String),
    LParen,
    RParen,
    Colon,
    Operator(Operator),
    And,
    Or,
    Not,
    Eof,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl Operator {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::GtEq => ">=",
            Operator::LtEq => "<=",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => write!(f, "word '{}'", word),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Colon => write!(f, "':'"),
            Token::Operator(op) => write!(f, "operator '{}'", op.as_sql()),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::Eof => write!(f, "end of query"),
        }
    }
}

pub(crate) struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    /// Returns the next token, or [`Token::Eof`] once the input is exhausted.
    ///
    /// Characters that cannot start any token are skipped.
    pub(crate) fn next_token(&mut self) -> Token {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }

            if is_word_char(c) {
                return self.word();
            }

            self.chars.next();

            match c {
                '"' => return self.quoted(),
                '(' => return Token::LParen,
                ')' => return Token::RParen,
                ':' => return Token::Colon,
                '!' => {
                    if self.chars.next_if_eq(&'=').is_some() {
                        return Token::Operator(Operator::NotEq);
                    }
                    return Token::Not;
                }
                '>' => {
                    if self.chars.next_if_eq(&'=').is_some() {
                        return Token::Operator(Operator::GtEq);
                    }
                    return Token::Operator(Operator::Gt);
                }
                '<' => {
                    if self.chars.next_if_eq(&'=').is_some() {
                        return Token::Operator(Operator::LtEq);
                    }
                    return Token::Operator(Operator::Lt);
                }
                '=' => return Token::Operator(Operator::Eq),
                _ => {}
            }
        }

        Token::Eof
    }

    fn word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(c) = self.chars.next_if(|&c| is_word_char(c)) {
            word.push(c);
        }

        match word.to_ascii_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            _ => Token::Word(word),
        }
    }

    // An unterminated quote runs to the end of the input.
    fn quoted(&mut self) -> Token {
        let mut word = String::new();
        for c in self.chars.by_ref() {
            if c == '"' {
                break;
            }
            word.push(c);
        }
        Token::Word(word)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}
