#![forbid(unsafe_code)]

//! Width grouping of visible fields.

use crate::field::{FieldDescriptor, FieldWidth};
use crate::value::FormValues;

/// Visible fields partitioned by [`FieldWidth`], each group in schema order.
#[derive(Debug, Clone, Default)]
pub struct FieldGroups<'a> {
    pub full: Vec<&'a FieldDescriptor>,
    pub half: Vec<&'a FieldDescriptor>,
    pub third: Vec<&'a FieldDescriptor>,
}

impl<'a> FieldGroups<'a> {
    /// The group for `width`.
    #[must_use]
    pub fn get(&self, width: FieldWidth) -> &[&'a FieldDescriptor] {
        match width {
            FieldWidth::Full => &self.full,
            FieldWidth::Half => &self.half,
            FieldWidth::Third => &self.third,
        }
    }

    /// Total number of grouped fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.full.len() + self.half.len() + self.third.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names in a group, mostly for assertions and logs.
    #[must_use]
    pub fn names(&self, width: FieldWidth) -> Vec<&'a str> {
        self.get(width).iter().map(|&f| f.name.as_str()).collect()
    }
}

/// Partition the fields visible under `values` by layout width.
///
/// Hidden fields are dropped. Relative order is preserved within each group.
#[must_use]
pub fn group_fields_by_width<'a>(
    fields: &'a [FieldDescriptor],
    values: &FormValues,
) -> FieldGroups<'a> {
    let mut groups = FieldGroups::default();
    for field in fields.iter().filter(|f| f.is_visible(values)) {
        match field.width {
            FieldWidth::Full => groups.full.push(field),
            FieldWidth::Half => groups.half.push(field),
            FieldWidth::Third => groups.third.push(field),
        }
    }
    groups
}
