//! Registration records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One registered child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub name: String,
    pub age: u8,
    /// Special needs / allergies, free text ("Ні" when none).
    pub needs: String,
}

/// A finalized registration. Immutable once created; `children` always has
/// exactly `child_count` elements, in the order they were collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationEntry {
    pub parent_name: String,
    pub parent_phone: String,
    pub child_count: u32,
    pub children: Vec<ChildRecord>,
    pub registered_at: DateTime<Utc>,
}

/// One row of the flat tabular export: child fields first, then the parent
/// context repeated on every row.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow<'a> {
    pub name: &'a str,
    pub age: u8,
    pub needs: &'a str,
    pub parent_name: &'a str,
    pub parent_phone: &'a str,
    pub child_count: u32,
}

impl RegistrationEntry {
    /// Flatten this entry into one export row per child.
    pub fn table_rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.children.iter().map(|child| TableRow {
            name: &child.name,
            age: child.age,
            needs: &child.needs,
            parent_name: &self.parent_name,
            parent_phone: &self.parent_phone,
            child_count: self.child_count,
        })
    }
}
