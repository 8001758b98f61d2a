//! The growable LIFO stack the virtual machine is built from.
//!
//! Capacity is not part of the language semantics, so the stack grows
//! without bound; any deployment limit belongs to the host.

/// A LIFO stack of signed 64-bit integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack(Vec<i64>);

impl Stack {
    pub fn new() -> Self {
        Stack(Vec::new())
    }

    pub fn push(&mut self, value: i64) {
        self.0.push(value);
    }

    pub fn pop(&mut self) -> Option<i64> {
        self.0.pop()
    }

    /// The value at the top of the stack, if any.
    pub fn top(&self) -> Option<i64> {
        self.0.last().copied()
    }

    pub fn top_mut(&mut self) -> Option<&mut i64> {
        self.0.last_mut()
    }

    /// Number of values currently held.
    pub fn height(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the stack, yielding its values bottom-to-top.
    pub fn into_values(self) -> Vec<i64> {
        self.0
    }
}

impl From<&[i64]> for Stack {
    fn from(values: &[i64]) -> Self {
        Stack(values.to_vec())
    }
}

impl From<Vec<i64>> for Stack {
    fn from(values: Vec<i64>) -> Self {
        Stack(values)
    }
}
