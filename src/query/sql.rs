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

//! Translation of parsed query expressions into SQL.
//!
//! The generated fragment refers to the table aliases used by the track
//! queries in the data access layer: `tr` (tracks), `al` (albums), `ar`
//! (artists) and `st` (track statistics).

use crate::query::{
    Param, QueryError,
    lexer::Operator,
    parser::Expr,
};

/// Clause used for values that can never match, such as a malformed number.
const NEVER: &str = "1 = 0";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum FieldType {
    Text,
    Numeric,
}

/// Genre is optional, a missing genre compares as an empty string.
const GENRE: &str = "COALESCE(tr.genre, '')";

/// Columns searched by a bare term.
const TERM_COLUMNS: [&str; 4] = ["tr.title", "tr.artist", "al.title", GENRE];

fn field_column(field: &str) -> Option<(&'static str, FieldType)> {
    let column = match field.to_lowercase().as_str() {
        "title" => ("tr.title", FieldType::Text),
        "artist" => ("tr.artist", FieldType::Text),
        "albumartist" => ("ar.name", FieldType::Text),
        "album" => ("al.title", FieldType::Text),
        "genre" => (GENRE, FieldType::Text),
        "path" => ("tr.filename", FieldType::Text),

        "year" | "date" => ("tr.year", FieldType::Numeric),
        "track" => ("tr.track_number", FieldType::Numeric),
        "length" | "duration" => ("tr.duration", FieldType::Numeric),
        "bitrate" => ("tr.bitrate", FieldType::Numeric),
        "play_count" | "plays" => ("COALESCE(st.play_count, 0)", FieldType::Numeric),
        "rating" => ("COALESCE(st.rating, 0)", FieldType::Numeric),
        "last_played" => ("COALESCE(st.last_played, 0)", FieldType::Numeric),

        _ => return None,
    };

    Some(column)
}

/// Generates an SQL `WHERE` fragment and its positional parameters.
pub(crate) fn generate(expr: &Expr) -> Result<(String, Vec<Param>), QueryError> {
    let mut params = Vec::new();
    let sql = generate_node(expr, &mut params)?;
    Ok((sql, params))
}

fn generate_node(expr: &Expr, params: &mut Vec<Param>) -> Result<String, QueryError> {
    let sql = match expr {
        Expr::And(left, right) => {
            let left = generate_node(left, params)?;
            let right = generate_node(right, params)?;
            format!("({} AND {})", left, right)
        }

        Expr::Or(left, right) => {
            let left = generate_node(left, params)?;
            let right = generate_node(right, params)?;
            format!("({} OR {})", left, right)
        }

        Expr::Not(inner) => format!("NOT ({})", generate_node(inner, params)?),

        Expr::Term(value) => {
            let clauses: Vec<String> = TERM_COLUMNS
                .iter()
                .map(|column| {
                    params.push(Param::Text(format!("%{}%", value)));
                    format!("{} LIKE ?", column)
                })
                .collect();
            format!("({})", clauses.join(" OR "))
        }

        Expr::Field {
            field,
            operator,
            value,
        } => {
            let (column, field_type) =
                field_column(field).ok_or_else(|| QueryError::UnknownField(field.clone()))?;

            match field_type {
                FieldType::Text => text_clause(column, *operator, value, params),
                FieldType::Numeric => numeric_clause(column, *operator, value, params),
            }
        }
    };

    Ok(sql)
}

fn text_clause(column: &str, operator: Operator, value: &str, params: &mut Vec<Param>) -> String {
    params.push(Param::Text(format!("%{}%", value)));

    match operator {
        Operator::NotEq => format!("{} NOT LIKE ?", column),
        _ => format!("{} LIKE ?", column),
    }
}

fn numeric_clause(
    column: &str,
    operator: Operator,
    value: &str,
    params: &mut Vec<Param>,
) -> String {
    if column == "tr.year" {
        if let Some(decade) = parse_decade(value) {
            params.push(Param::Integer(decade));
            params.push(Param::Integer(decade + 9));
            return format!("({} BETWEEN ? AND ?)", column);
        }
    }

    let param = if value.contains('.') {
        value.parse::<f64>().ok().map(Param::Real)
    } else {
        value.parse::<i64>().ok().map(Param::Integer)
    };

    match param {
        Some(param) => {
            params.push(param);
            format!("{} {} ?", column, operator.as_sql())
        }
        None => NEVER.to_string(),
    }
}

/// Parses a decade written as `1980s`.
fn parse_decade(value: &str) -> Option<i64> {
    let year = value.strip_suffix('s')?.parse::<i64>().ok()?;
    (year % 10 == 0).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::Parser;

    fn sql(text: &str) -> (String, Vec<Param>) {
        generate(&Parser::new(text).parse().unwrap()).unwrap()
    }

    fn like(s: &str) -> Param {
        Param::Text(format!("%{}%", s))
    }

    #[test]
    fn test_term_searches_common_columns() {
        let (clause, params) = sql("queen");
        assert_eq!(
            clause,
            "(tr.title LIKE ? OR tr.artist LIKE ? OR al.title LIKE ? OR COALESCE(tr.genre, '') LIKE ?)"
        );
        assert_eq!(params, vec![like("queen"); 4]);
    }

    #[test]
    fn test_text_fields() {
        let (clause, params) = sql("artist:bowie album:!=live");
        assert_eq!(clause, "(tr.artist LIKE ? AND al.title NOT LIKE ?)");
        assert_eq!(params, vec![like("bowie"), like("live")]);
    }

    #[test]
    fn test_field_names_are_case_insensitive() {
        let (clause, _) = sql("GENRE:jazz");
        assert_eq!(clause, "COALESCE(tr.genre, '') LIKE ?");
    }

    #[test]
    fn test_numeric_fields() {
        let (clause, params) = sql("year:>=1990 or rating:1");
        assert_eq!(clause, "(tr.year >= ? OR COALESCE(st.rating, 0) = ?)");
        assert_eq!(params, vec![Param::Integer(1990), Param::Integer(1)]);

        let (clause, params) = sql("length:<200.5");
        assert_eq!(clause, "tr.duration < ?");
        assert_eq!(params, vec![Param::Real(200.5)]);
    }

    #[test]
    fn test_missing_statistics_count_as_zero() {
        let (clause, params) = sql("last_played:<1");
        assert_eq!(clause, "COALESCE(st.last_played, 0) < ?");
        assert_eq!(params, vec![Param::Integer(1)]);
    }

    #[test]
    fn test_decade() {
        let (clause, params) = sql("year:1980s");
        assert_eq!(clause, "(tr.year BETWEEN ? AND ?)");
        assert_eq!(params, vec![Param::Integer(1980), Param::Integer(1989)]);
    }

    #[test]
    fn test_invalid_number_never_matches() {
        let (clause, params) = sql("bitrate:high");
        assert_eq!(clause, NEVER);
        assert!(params.is_empty());
    }

    #[test]
    fn test_not() {
        let (clause, params) = sql("!genre:rock");
        assert_eq!(clause, "NOT (COALESCE(tr.genre, '') LIKE ?)");
        assert_eq!(params, vec![like("rock")]);
    }

    #[test]
    fn test_unknown_field() {
        let expr = Parser::new("mood:happy").parse().unwrap();
        assert!(matches!(generate(&expr), Err(QueryError::UnknownField(f)) if f == "mood"));
    }
}
