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

//! Library search query language.
//!
//! Queries combine free text terms and field comparisons with boolean
//! operators, for example:
//!
//! ```text
//! artist:"pink floyd" (year:1970s or rating:1) !live
//! ```
//!
//! A query is tokenized by the [`lexer`], turned into an expression tree by
//! the [`parser`] and finally compiled into an SQL `WHERE` fragment with
//! positional parameters by [`sql`].

mod lexer;
mod parser;
mod sql;

use thiserror::Error;

use crate::query::parser::Parser;

#[derive(Debug, Error)]
pub(crate) enum QueryError {
    #[error("unexpected {0} in query")]
    UnexpectedToken(String),

    #[error("expected {expected} in query, found {found}")]
    ExpectedToken { expected: String, found: String },

    #[error("unknown search field '{0}'")]
    UnknownField(String),

    #[error("query nests more than {0} groups")]
    TooDeep(usize),

    #[error("query has more than {0} terms")]
    TooManyTerms(usize),
}

/// A positional SQL parameter produced by query compilation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Param {
    Text(String),
    Integer(i64),
    Real(f64),
}

/// A compiled search query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledQuery {
    pub(crate) where_clause: String,
    pub(crate) params: Vec<Param>,
}

/// Compiles a query string into an SQL `WHERE` fragment.
///
/// Returns `None` for an empty (or whitespace only) query, which matches
/// every track.
///
/// # Errors
///
/// Returns a [`QueryError`] if the query cannot be parsed or refers to an
/// unknown field.
pub(crate) fn compile(text: &str) -> Result<Option<CompiledQuery>, QueryError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let expr = Parser::new(text).parse()?;
    let (where_clause, params) = sql::generate(&expr)?;

    Ok(Some(CompiledQuery {
        where_clause,
        params,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(compile("").unwrap(), None);
        assert_eq!(compile("  \t ").unwrap(), None);
    }

    #[test]
    fn test_compile_combined_query() {
        let compiled = compile(r#"artist:"pink floyd" (year:1970s or rating:1) !live"#)
            .unwrap()
            .unwrap();

        assert_eq!(
            compiled.where_clause,
            "((tr.artist LIKE ? AND ((tr.year BETWEEN ? AND ?) OR COALESCE(st.rating, 0) = ?)) \
             AND NOT ((tr.title LIKE ? OR tr.artist LIKE ? OR al.title LIKE ? OR COALESCE(tr.genre, '') LIKE ?)))"
        );
        assert_eq!(compiled.params.len(), 8);
        assert_eq!(compiled.params[0], Param::Text("%pink floyd%".to_string()));
    }

    #[test]
    fn test_errors_are_reported() {
        let err = compile("(rock").unwrap_err();
        assert_eq!(err.to_string(), "expected ')' in query, found end of query");

        let err = compile("mood:sad").unwrap_err();
        assert_eq!(err.to_string(), "unknown search field 'mood'");

        let err = compile(&("(".repeat(100_000) + "a")).unwrap_err();
        assert_eq!(err.to_string(), "query nests more than 64 groups");
    }
}
