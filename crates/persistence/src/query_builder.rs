//! Dynamic SET and WHERE fragments for partial updates and searches.
//!
//! Column names are compile-time constants; values never enter the SQL text.
//! Each fragment carries its values as an ordered list bound to `$n`
//! placeholders, numbered from the index the caller reserves.

use domain::models::{ClientSearchCriteria, ClientUpdate};

use crate::error::{RepositoryError, RepositoryResult};

/// A SQL fragment together with the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<String>,
}

/// Builds `a = $n, b = $n+1` from the supplied fields.
///
/// Returns `None` when no field carries a value.
pub fn set_clause(
    fields: &[(&'static str, Option<&str>)],
    first_placeholder: usize,
) -> Option<Fragment> {
    join_bound(fields, first_placeholder, ", ", false)
}

/// Builds `(a = $n) AND (b = $n+1)` from the supplied fields.
///
/// Returns `None` when no field carries a value.
pub fn where_clause(
    fields: &[(&'static str, Option<&str>)],
    first_placeholder: usize,
) -> Option<Fragment> {
    join_bound(fields, first_placeholder, " AND ", true)
}

fn join_bound(
    fields: &[(&'static str, Option<&str>)],
    first_placeholder: usize,
    separator: &str,
    parenthesize: bool,
) -> Option<Fragment> {
    let mut parts = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());

    for (column, value) in fields {
        let Some(value) = value else { continue };
        let placeholder = first_placeholder + params.len();
        if parenthesize {
            parts.push(format!("({column} = ${placeholder})"));
        } else {
            parts.push(format!("{column} = ${placeholder}"));
        }
        params.push((*value).to_string());
    }

    if parts.is_empty() {
        return None;
    }

    Some(Fragment {
        sql: parts.join(separator),
        params,
    })
}

const CLIENT_COLUMNS: &str = "id, first_name, last_name, email";

/// Parameter-bound `UPDATE client` statement for a partial update.
///
/// `$1` is reserved for the client id; the changed columns follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientUpdateQuery {
    sql: String,
    params: Vec<String>,
}

impl ClientUpdateQuery {
    /// Returns `None` if the update touches no client column.
    pub fn build(update: &ClientUpdate) -> Option<Self> {
        let fragment = set_clause(
            &[
                ("first_name", update.first_name.as_deref()),
                ("last_name", update.last_name.as_deref()),
                ("email", update.email.as_deref()),
            ],
            2,
        )?;

        Some(Self {
            sql: format!(
                "UPDATE client SET {} WHERE id = $1 RETURNING {CLIENT_COLUMNS}",
                fragment.sql
            ),
            params: fragment.params,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// Parameter-bound client search over `client LEFT JOIN phone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSearchQuery {
    sql: String,
    params: Vec<String>,
}

impl ClientSearchQuery {
    /// Fails with [`RepositoryError::InvalidArgument`] when no criterion is set.
    pub fn build(criteria: &ClientSearchCriteria) -> RepositoryResult<Self> {
        if criteria.is_empty() {
            return Err(missing_criteria());
        }

        let fragment = where_clause(
            &[
                ("c.first_name", criteria.first_name.as_deref()),
                ("c.last_name", criteria.last_name.as_deref()),
                ("c.email", criteria.email.as_deref()),
                ("p.phone_number", criteria.phone.as_deref()),
            ],
            1,
        )
        .ok_or_else(missing_criteria)?;

        Ok(Self {
            sql: format!(
                r#"
                SELECT c.id, c.first_name, c.last_name, c.email, p.phone_number
                FROM client c
                LEFT JOIN phone p ON p.client_id = c.id
                WHERE {}
                ORDER BY c.id, p.id
                "#,
                fragment.sql
            ),
            params: fragment.params,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

fn missing_criteria() -> RepositoryError {
    RepositoryError::InvalidArgument("at least one search criterion is required".into())
}
