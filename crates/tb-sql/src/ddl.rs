//! Created-table and foreign-key extraction from DDL

use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tb_core::DdlTable;

/// What a DDL statement declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlInfo {
    /// Unqualified name of the first `CREATE TABLE`, if any
    pub created_table: Option<String>,

    /// Unqualified targets of every `REFERENCES` clause, sorted
    pub references: Vec<String>,
}

/// A disagreement between a table's DDL and its declared metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdlWarning {
    /// The DDL could not be parsed; it is still executed as written
    Unparseable { table: String, message: String },

    /// The DDL holds no `CREATE TABLE` statement
    NotCreateTable { table: String },

    /// The DDL creates a table with another name
    NameMismatch { table: String, found: String },

    /// A foreign key targets a scenario table missing from `dependencies`
    UndeclaredReference { table: String, referenced: String },
}

impl fmt::Display for DdlWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DdlWarning::Unparseable { table, message } => {
                write!(f, "table '{}': DDL could not be parsed ({})", table, message)
            }
            DdlWarning::NotCreateTable { table } => {
                write!(f, "table '{}': DDL has no CREATE TABLE statement", table)
            }
            DdlWarning::NameMismatch { table, found } => {
                write!(f, "table '{}': DDL creates '{}' instead", table, found)
            }
            DdlWarning::UndeclaredReference { table, referenced } => write!(
                f,
                "table '{}': references '{}' but does not list it in dependencies",
                table, referenced
            ),
        }
    }
}

/// Parse a DDL string and report the table it creates and the tables it references
pub fn inspect_ddl(sql: &str) -> SqlResult<DdlInfo> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(SqlError::EmptySql);
    }

    let dialect = GenericDialect {};
    let statements =
        Parser::parse_sql(&dialect, sql).map_err(|e| SqlError::ParseError(e.to_string()))?;

    let created_table = statements.iter().find_map(|stmt| match stmt {
        Statement::CreateTable(create) => Some(unqualified(&create.name.to_string())),
        _ => None,
    });

    Ok(DdlInfo {
        created_table,
        references: referenced_tables(sql)?,
    })
}

/// Targets of `REFERENCES <table>` clauses, read from the token stream
pub fn referenced_tables(sql: &str) -> SqlResult<Vec<String>> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| SqlError::TokenizeError(e.to_string()))?;

    let mut found = BTreeSet::new();
    let mut iter = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .peekable();

    while let Some(token) = iter.next() {
        let Token::Word(word) = token else {
            continue;
        };
        if word.keyword != Keyword::REFERENCES {
            continue;
        }

        let mut last = None;
        while let Some(Token::Word(part)) = iter.peek() {
            last = Some(part.value.clone());
            iter.next();
            if matches!(iter.peek(), Some(Token::Period)) {
                iter.next();
            } else {
                break;
            }
        }
        if let Some(name) = last {
            found.insert(name.to_lowercase());
        }
    }

    Ok(found.into_iter().collect())
}

/// Last dotted component with identifier quotes removed, lowercased
fn unqualified(name: &str) -> String {
    name.rsplit('.')
        .next()
        .unwrap_or(name)
        .trim_matches(|c| c == '"' || c == '`' || c == '[' || c == ']')
        .to_lowercase()
}

/// Cross-check every table's DDL against its declared name and dependencies.
///
/// Name comparison is case-insensitive. Foreign keys to tables outside the
/// scenario are ignored.
pub fn lint_tables(tables: &[DdlTable]) -> Vec<DdlWarning> {
    let known: HashSet<String> = tables.iter().map(|t| t.name.to_lowercase()).collect();
    let mut warnings = Vec::new();

    for table in tables {
        let name = table.name.to_string();
        let info = match inspect_ddl(&table.ddl) {
            Ok(info) => info,
            Err(e) => {
                warnings.push(DdlWarning::Unparseable {
                    table: name,
                    message: e.to_string(),
                });
                continue;
            }
        };

        match &info.created_table {
            None => warnings.push(DdlWarning::NotCreateTable { table: name.clone() }),
            Some(found) if *found != name.to_lowercase() => {
                warnings.push(DdlWarning::NameMismatch {
                    table: name.clone(),
                    found: found.clone(),
                })
            }
            Some(_) => {}
        }

        let declared: HashSet<String> =
            table.dependencies.iter().map(|d| d.to_lowercase()).collect();
        for referenced in info.references {
            if referenced != name.to_lowercase()
                && known.contains(&referenced)
                && !declared.contains(&referenced)
            {
                warnings.push(DdlWarning::UndeclaredReference {
                    table: name.clone(),
                    referenced,
                });
            }
        }
    }

    for warning in &warnings {
        log::debug!("DDL lint: {}", warning);
    }
    warnings
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
