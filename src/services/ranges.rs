use crate::types::{Range, RangeField, RangeId};
use tracing::debug;

/// Ordered, never-empty list of editable page ranges.
#[derive(Debug, Clone)]
pub struct RangeList {
    ranges: Vec<Range>,
    next_id: u64,
}

impl Default for RangeList {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeList {
    /// Starts with a single range beginning at page 1.
    pub fn new() -> Self {
        Self {
            ranges: vec![Range {
                id: RangeId(1),
                start: "1".to_string(),
                end: String::new(),
            }],
            next_id: 2,
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[Range] {
        &self.ranges
    }

    pub fn get(&self, id: RangeId) -> Option<&Range> {
        self.ranges.iter().find(|r| r.id == id)
    }

    pub fn last(&self) -> Option<&Range> {
        self.ranges.last()
    }

    /// Appends a range with a fresh id. Its start is chained from the
    /// previous range's end when that end is numeric.
    pub fn create_range(&mut self) -> &Range {
        let id = RangeId(self.next_id);
        self.next_id += 1;

        let start = self
            .ranges
            .last()
            .and_then(|prev| Self::chained_start(&prev.end))
            .unwrap_or_default();

        debug!("Created range {} with start '{}'", id, start);
        self.ranges.push(Range {
            id,
            start,
            end: String::new(),
        });
        &self.ranges[self.ranges.len() - 1]
    }

    /// Replaces one field of a range. Returns false, leaving the list
    /// untouched, when the value contains a non-digit or the id is unknown.
    pub fn update_range_field(&mut self, id: RangeId, field: RangeField, value: &str) -> bool {
        if !is_digit_string(value) {
            debug!("Rejected non-numeric value '{}' for range {}", value, id);
            return false;
        }

        match self.ranges.iter_mut().find(|r| r.id == id) {
            Some(range) => {
                match field {
                    RangeField::Start => range.start = value.to_string(),
                    RangeField::End => range.end = value.to_string(),
                }
                true
            }
            None => false,
        }
    }

    /// Removes a range unless it is the only one left.
    pub fn remove_range(&mut self, id: RangeId) -> bool {
        if self.ranges.len() == 1 {
            return false;
        }

        let before = self.ranges.len();
        self.ranges.retain(|r| r.id != id);
        before != self.ranges.len()
    }

    fn chained_start(prev_end: &str) -> Option<String> {
        if prev_end.is_empty() || !is_digit_string(prev_end) {
            return None;
        }
        prev_end
            .parse::<u64>()
            .ok()
            .and_then(|end| end.checked_add(1))
            .map(|start| start.to_string())
    }
}

/// True for the empty string or a string of ASCII digits only.
pub fn is_digit_string(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}
