//! Server rejections remembered per form.
//!
//! After a 422 the rejected literal value and the server's message are kept
//! here, so typing that same value again fails locally with the same text
//! and without another request.

use std::collections::{HashMap, VecDeque};

use crate::validation::field::FieldName;

/// Bounded `value -> message` tables, one per field.
///
/// Each table holds at most `capacity` entries; the oldest rejection is
/// evicted first. Re-recording a value moves it to the newest slot.
#[derive(Debug, Clone)]
pub struct RejectionMemo {
    capacity: usize,
    tables: HashMap<FieldName, VecDeque<(String, String)>>,
}

impl RejectionMemo {
    pub const DEFAULT_CAPACITY: usize = 32;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tables: HashMap::new(),
        }
    }

    pub fn record(&mut self, field: FieldName, value: &str, message: &str) {
        let table = self.tables.entry(field).or_default();
        table.retain(|(rejected, _)| rejected != value);
        table.push_back((value.to_string(), message.to_string()));
        while table.len() > self.capacity {
            table.pop_front();
        }
    }

    /// Server message for `value`, if it was rejected before.
    pub fn lookup(&self, field: FieldName, value: &str) -> Option<&str> {
        self.tables.get(&field).and_then(|table| {
            table
                .iter()
                .rev()
                .find(|(rejected, _)| rejected == value)
                .map(|(_, message)| message.as_str())
        })
    }

    pub fn is_rejected(&self, field: FieldName, value: &str) -> bool {
        self.lookup(field, value).is_some()
    }

    pub fn len(&self, field: FieldName) -> usize {
        self.tables.get(&field).map_or(0, VecDeque::len)
    }
}

impl Default for RejectionMemo {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
