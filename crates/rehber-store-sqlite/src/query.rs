//! Translation of [`InfoFilter`] into a parameterised SQL condition.
//!
//! The generated condition must agree with [`InfoFilter::matches`]. SQLite's
//! `LIKE` folds ASCII case, so string tests use `=`, `instr` and `substr`.
//! Text `=` compares bytes under the BINARY collation. `instr`, `substr` and
//! `length` count characters and stop at a NUL on text, so substring and
//! prefix tests run on both sides cast to BLOB, where they count bytes like
//! `str::contains` and `str::starts_with`. All columns involved are
//! `NOT NULL`, so `NOT` never meets a three-valued result.

use rehber_core::filter::InfoFilter;
use rusqlite::types::Value;

/// A SQL boolean expression with anonymous `?` placeholders, and the values
/// to bind to them in order.
#[derive(Debug, Default)]
pub struct Condition {
  pub sql:    String,
  pub params: Vec<Value>,
}

impl Condition {
  /// Translate `filter` against the `contact_infos` table aliased as `alias`.
  pub fn from_filter(filter: &InfoFilter, alias: &str) -> Self {
    let mut cond = Self::default();
    cond.push(filter, alias);
    cond
  }

  fn push(&mut self, filter: &InfoFilter, alias: &str) {
    match filter {
      InfoFilter::Eq(field, value) => {
        self.sql.push_str(&format!("{alias}.{} = ?", field.as_ref()));
        self.params.push(Value::Text(value.clone()));
      }
      InfoFilter::Contains(field, value) => {
        self.sql.push_str(&format!(
          "instr(CAST({alias}.{} AS BLOB), CAST(? AS BLOB)) > 0",
          field.as_ref()
        ));
        self.params.push(Value::Text(value.clone()));
      }
      InfoFilter::StartsWith(field, value) => {
        self.sql.push_str(&format!(
          "substr(CAST({alias}.{} AS BLOB), 1, length(CAST(? AS BLOB))) = CAST(? AS BLOB)",
          field.as_ref()
        ));
        self.params.push(Value::Text(value.clone()));
        self.params.push(Value::Text(value.clone()));
      }
      InfoFilter::Saved(saved) => {
        self.sql.push_str(&format!("{alias}.is_saved = ?"));
        self.params.push(Value::Integer(i64::from(*saved)));
      }
      InfoFilter::ContactId(id) => {
        self.sql.push_str(&format!("{alias}.contact_id = ?"));
        self.params.push(Value::Integer(*id));
      }
      InfoFilter::All(filters) => self.push_joined(filters, alias, " AND ", "1"),
      InfoFilter::Any(filters) => self.push_joined(filters, alias, " OR ", "0"),
      InfoFilter::Not(inner) => {
        self.sql.push_str("NOT (");
        self.push(inner, alias);
        self.sql.push(')');
      }
    }
  }

  fn push_joined(
    &mut self,
    filters: &[InfoFilter],
    alias: &str,
    op: &str,
    empty: &str,
  ) {
    if filters.is_empty() {
      self.sql.push_str(empty);
      return;
    }
    self.sql.push('(');
    for (i, filter) in filters.iter().enumerate() {
      if i > 0 {
        self.sql.push_str(op);
      }
      self.push(filter, alias);
    }
    self.sql.push(')');
  }
}
