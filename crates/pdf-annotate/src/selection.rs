use crate::types::{AnnotateError, Result, SequentialNumber};

/// Ordered set of selected page indices (0-based).
///
/// Insertion order is the selection order. Re-selecting a page after
/// deselecting it appends it at the end again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    order: Vec<usize>,
    page_count: usize,
}

impl Selection {
    pub fn new(page_count: usize) -> Self {
        Self {
            order: Vec::new(),
            page_count,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Remove `index` if selected, otherwise append it. Returns the new order.
    pub fn toggle(&mut self, index: usize) -> Result<&[usize]> {
        if index >= self.page_count {
            return Err(AnnotateError::PageOutOfRange {
                index,
                page_count: self.page_count,
            });
        }

        if let Some(rank) = self.rank(index) {
            self.order.remove(rank);
        } else {
            self.order.push(index);
        }
        Ok(&self.order)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.order.contains(&index)
    }

    /// Zero-based position of `index` in the selection order
    pub fn rank(&self, index: usize) -> Option<usize> {
        self.order.iter().position(|&i| i == index)
    }

    pub fn sequential_number(&self, index: usize) -> SequentialNumber {
        match self.rank(index) {
            Some(rank) => SequentialNumber::Assigned(rank + 1),
            None => SequentialNumber::Unassigned,
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
