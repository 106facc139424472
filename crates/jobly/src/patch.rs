//! SET clause construction for partial updates.
//!
//! A [`Patch`] is an explicit ordered list of `(field, value)` pairs, so the
//! placeholder numbering depends only on the order the caller set fields in.
//! [`sql_for_partial_update`] renders it as `"a = $1, b = $2"`, renaming fields
//! through a [`TranslationTable`] first.

use crate::error::{StoreError, StoreResult};
use crate::value::SqlValue;

/// A sparse, ordered set of field updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: Vec<(String, SqlValue)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    ///
    /// Setting a field that is already present replaces its value and keeps its
    /// original position.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    /// Chainable variant of [`Patch::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Set an optional field (None => skip).
    pub fn set_opt<T: Into<SqlValue>>(&mut self, field: &str, value: Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.set(field, v);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Static mapping from domain field names to storage column names.
///
/// Fields without an entry keep their name.
///
/// ```ignore
/// const COMPANY_COLUMNS: TranslationTable =
///     TranslationTable::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: &'static [(&'static str, &'static str)],
}

impl TranslationTable {
    /// The table that renames nothing.
    pub const EMPTY: TranslationTable = TranslationTable::new(&[]);

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Storage name for `field`, or `field` itself when not mapped.
    pub fn resolve<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(from, _)| *from == field)
            .map_or(field, |(_, to)| *to)
    }
}

/// Output of a partial update build: assignments plus the parallel value list.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    /// Comma-joined assignments, e.g. `"salary = $1, equity = $2"`.
    pub set_cols: String,
    pub values: Vec<SqlValue>,
}

impl SetClause {
    /// Placeholder index the caller should use for the next value (e.g. the row id).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build the SET clause for a partial update.
///
/// Placeholders are numbered from `$1` in patch order. The row identity
/// placeholder is left to the caller (see [`SetClause::next_placeholder`]).
///
/// Fails with [`StoreError::InvalidPatch`] if the patch is empty or a resolved
/// column name is not a plain SQL identifier.
pub fn sql_for_partial_update(patch: &Patch, table: &TranslationTable) -> StoreResult<SetClause> {
    if patch.is_empty() {
        return Err(StoreError::invalid_patch("no data"));
    }

    let mut assignments = Vec::with_capacity(patch.len());
    let mut values = Vec::with_capacity(patch.len());

    for (idx, (field, value)) in patch.iter().enumerate() {
        let column = table.resolve(field);
        validate_ident(column)?;
        assignments.push(format!("{} = ${}", column, idx + 1));
        values.push(value.clone());
    }

    Ok(SetClause {
        set_cols: assignments.join(", "),
        values,
    })
}

/// Column names are spliced into SQL, so only `[A-Za-z_][A-Za-z0-9_]*`
/// segments (optionally `.`-separated) are accepted.
fn validate_ident(ident: &str) -> StoreResult<()> {
    let valid = !ident.is_empty()
        && ident.split('.').all(|seg| {
            let mut chars = seg.chars();
            match chars.next() {
                Some(first) if first == '_' || first.is_ascii_alphabetic() => {
                    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
                }
                _ => false,
            }
        });

    if valid {
        Ok(())
    } else {
        Err(StoreError::invalid_patch(format!(
            "invalid column name '{ident}'"
        )))
    }
}
