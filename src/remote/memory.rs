use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{Database, Filter, FilterOp, Order, Query};
use crate::error::Result;

/// In-process `Database` for tests and offline runs.
///
/// Rows are stored exactly as given. Projections are not applied, so rows
/// that stand in for embedded selects must already carry the related object
/// (e.g. `"category": {"name": "Rent"}`).
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RefCell<BTreeMap<String, Vec<Value>>>,
    next_id: Cell<u64>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        self
    }

    /// Snapshot of a table's rows in storage order
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.borrow().get(table).cloned().unwrap_or_default()
    }

    fn matching<'a>(rows: &'a [Value], filters: &'a [Filter]) -> impl Iterator<Item = &'a Value> {
        rows.iter()
            .filter(move |row| filters.iter().all(|f| matches(row, f)))
    }

    fn assign_id(&self, row: Value) -> Value {
        let Value::Object(mut fields) = row else {
            return row;
        };
        if fields.get("id").map_or(true, Value::is_null) {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            fields.insert("id".to_string(), Value::String(format!("mem-{id}")));
        }
        Value::Object(fields)
    }
}

impl Database for MemoryDatabase {
    fn select(&self, query: &Query) -> Result<Vec<Value>> {
        let tables = self.tables.borrow();
        let rows = tables
            .get(query.table_name())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut selected: Vec<Value> = Self::matching(rows, query.filters()).cloned().collect();
        selected.sort_by(|a, b| compare_rows(a, b, query.ordering()));
        if let Some(limit) = query.row_limit() {
            selected.truncate(limit);
        }
        Ok(selected)
    }

    fn count(&self, query: &Query) -> Result<u64> {
        let tables = self.tables.borrow();
        let rows = tables
            .get(query.table_name())
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(Self::matching(rows, query.filters()).count() as u64)
    }

    fn insert(&self, table: &str, rows: &[Value]) -> Result<Vec<Value>> {
        let inserted: Vec<Value> = rows.iter().cloned().map(|r| self.assign_id(r)).collect();
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn update(&self, query: &Query, patch: &Value) -> Result<Vec<Value>> {
        let mut tables = self.tables.borrow_mut();
        let Some(rows) = tables.get_mut(query.table_name()) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in rows.iter_mut() {
            if !query.filters().iter().all(|f| matches(row, f)) {
                continue;
            }
            if let (Value::Object(fields), Value::Object(changes)) = (&mut *row, patch) {
                merge(fields, changes);
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    fn delete(&self, query: &Query) -> Result<Vec<Value>> {
        let mut tables = self.tables.borrow_mut();
        let Some(rows) = tables.get_mut(query.table_name()) else {
            return Ok(Vec::new());
        };

        let (removed, kept): (Vec<Value>, Vec<Value>) = rows
            .drain(..)
            .partition(|row| query.filters().iter().all(|f| matches(row, f)));
        *rows = kept;
        Ok(removed)
    }
}

fn merge(fields: &mut Map<String, Value>, changes: &Map<String, Value>) {
    for (key, value) in changes {
        fields.insert(key.clone(), value.clone());
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let field = row.get(&filter.column).unwrap_or(&Value::Null);
    match filter.op {
        FilterOp::IsNull => field.is_null(),
        FilterOp::NotNull => !field.is_null(),
        op => compare_to_literal(field, &filter.value).is_some_and(|ord| op.accepts(ord)),
    }
}

/// Compare a stored value with a filter literal; null and mismatched types never match
fn compare_to_literal(field: &Value, literal: &str) -> Option<Ordering> {
    match field {
        Value::Number(n) => n.as_f64()?.partial_cmp(&literal.parse::<f64>().ok()?),
        Value::String(s) => Some(s.as_str().cmp(literal)),
        Value::Bool(b) => Some(b.cmp(&literal.parse::<bool>().ok()?)),
        _ => None,
    }
}

fn compare_rows(a: &Value, b: &Value, order: &[Order]) -> Ordering {
    order
        .iter()
        .map(|o| {
            let ord = compare_values(
                a.get(&o.column).unwrap_or(&Value::Null),
                b.get(&o.column).unwrap_or(&Value::Null),
            );
            if o.descending {
                ord.reverse()
            } else {
                ord
            }
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
