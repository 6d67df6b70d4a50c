use bookstock_contract::columns;
use serde_json::{Map, Value};
use sqlx::Row as _;

use crate::{error::Result, ChosenRow, Error};

/// A projected row, keyed by column name. Columns the caller did not request
/// are absent, NULLs come back as `Value::Null`.
pub type ProjectedRow = Map<String, Value>;

/// A validated subset of the books schema columns. Unknown names are rejected
/// before any SQL is assembled, so requested columns can never smuggle SQL.
#[derive(Debug, Clone)]
pub struct Projection {
    columns: Vec<&'static str>,
}

impl Projection {
    /// Builds a projection from requested column names. An empty request
    /// means "all columns", matching the original null-projection behavior.
    pub fn new<I>(requested: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut selected = Vec::new();
        for name in requested {
            let name = name.as_ref();
            match columns::ALL.iter().find(|column| **column == name) {
                Some(column) => {
                    if !selected.contains(column) {
                        selected.push(*column);
                    }
                }
                None => return Err(Error::UnknownColumn(name.to_string())),
            }
        }
        if selected.is_empty() {
            return Ok(Self::all());
        }
        Ok(Self { columns: selected })
    }

    pub fn all() -> Self {
        Self {
            columns: columns::ALL.to_vec(),
        }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub(crate) fn select_clause(&self) -> String {
        self.columns.join(", ")
    }

    pub(crate) fn decode_row(&self, row: &ChosenRow) -> Result<ProjectedRow, sqlx::Error> {
        let mut decoded = Map::with_capacity(self.columns.len());
        for &name in &self.columns {
            let value = match name {
                columns::ID | columns::TYPE | columns::PRICE | columns::QUANTITY => row
                    .try_get::<Option<i64>, _>(name)?
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                _ => row
                    .try_get::<Option<String>, _>(name)?
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            };
            decoded.insert(name.to_string(), value);
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_validates_columns() {
        let projection = Projection::new(["title", "quantity"]).unwrap();
        assert_eq!(projection.columns(), &["title", "quantity"]);
        assert_eq!(projection.select_clause(), "title, quantity");

        assert!(matches!(
            Projection::new(["title", "staff"]),
            Err(Error::UnknownColumn(name)) if name == "staff"
        ));
    }

    #[test]
    fn test_empty_request_means_all() {
        let projection = Projection::new(Vec::<String>::new()).unwrap();
        assert_eq!(projection.columns(), columns::ALL);
    }

    #[test]
    fn test_duplicates_collapse() {
        let projection = Projection::new(["title", "title", "_id"]).unwrap();
        assert_eq!(projection.columns(), &["title", "_id"]);
    }
}
