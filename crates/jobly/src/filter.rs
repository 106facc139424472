//! WHERE clause construction for job searches.
//!
//! [`WhereBuilder`] keeps conditions and their bound values side by side and
//! numbers placeholders as values are appended, so the clause text and the
//! value list can never drift apart. [`build_where`] maps a [`JobFilter`] onto it.

use crate::value::SqlValue;
use serde::Deserialize;

/// Reusable WHERE clause builder.
///
/// Conditions are joined with `AND`. Placeholders are numbered from `$1` in
/// append order.
#[derive(Debug, Clone, Default)]
pub struct WhereBuilder {
    /// WHERE conditions (without leading AND)
    conditions: Vec<String>,
    /// Bound values, one per placeholder
    params: Vec<SqlValue>,
}

impl WhereBuilder {
    /// Create a new builder with param numbering starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the last placeholder emitted (0 if none).
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Check if any conditions have been added.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn add_condition(&mut self, col: &str, op: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.params.push(value.into());
        let idx = self.param_count();
        self.conditions.push(format!("{col} {op} ${idx}"));
        self
    }

    /// Add AND >= condition.
    pub fn and_gte(&mut self, col: &str, val: impl Into<SqlValue>) -> &mut Self {
        self.add_condition(col, ">=", val)
    }

    /// Add AND ILIKE condition.
    pub fn and_ilike(&mut self, col: &str, val: impl Into<SqlValue>) -> &mut Self {
        self.add_condition(col, "ILIKE", val)
    }

    /// Add a condition that binds no value.
    ///
    /// # Safety
    ///
    /// This directly concatenates SQL. The caller must ensure safety.
    pub fn and_raw(&mut self, sql: &str) -> &mut Self {
        self.conditions.push(sql.to_string());
        self
    }

    /// Finish building.
    pub fn build(self) -> WhereClause {
        WhereClause {
            conditions: self.conditions,
            params: self.params,
        }
    }
}

/// Output of a WHERE build: condition fragments plus the parallel value list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<String>,
    pub params: Vec<SqlValue>,
}

impl WhereClause {
    /// Check if no filtering applies.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render as `" WHERE a AND b"`, or an empty string when there are no conditions.
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Optional search criteria for job listings.
///
/// Deserializes from camelCase keys (`minSalary`, `hasEquity`, `title`), as
/// they arrive from query strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilter {
    /// Only jobs paying at least this much.
    pub min_salary: Option<i32>,
    /// `Some(true)` restricts to jobs with non-zero equity; `Some(false)` does not filter.
    pub has_equity: Option<bool>,
    /// Case-insensitive title prefix.
    pub title: Option<String>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_salary(mut self, min_salary: i32) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn has_equity(mut self, has_equity: bool) -> Self {
        self.has_equity = Some(has_equity);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Build the WHERE clause for a job search.
///
/// Criteria are applied in the order min_salary, has_equity, title, which fixes
/// the placeholder numbering. `min_salary = 0` still counts as present.
pub fn build_where(filter: &JobFilter) -> WhereClause {
    let mut wb = WhereBuilder::new();

    if let Some(min_salary) = filter.min_salary {
        wb.and_gte("salary", min_salary);
    }

    // Only an explicit `true` filters; `false` does not mean "no equity".
    if filter.has_equity == Some(true) {
        wb.and_raw("equity > 0");
    }

    if let Some(title) = &filter.title {
        wb.and_ilike("title", format!("{title}%"));
    }

    wb.build()
}
