// Bounded history - Fixed-capacity FIFO sequences owned by the store
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Ordered sequence with an enforced maximum length.
///
/// `push_back` evicts from the front (chronological histories), `push_front`
/// evicts from the back (newest-first lists such as alerts).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push_back(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    pub fn push_front(&mut self, item: T) {
        self.items.push_front(item);
        while self.items.len() > self.capacity {
            self.items.pop_back();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Replace the first element matching `predicate` in place.
    /// Returns the rejected item back if nothing matched.
    pub fn replace_where<F>(&mut self, item: T, predicate: F) -> Result<(), T>
    where
        F: Fn(&T) -> bool,
    {
        match self.items.iter_mut().find(|existing| predicate(existing)) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(item),
        }
    }
}

impl<T: Serialize> Serialize for BoundedHistory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_evicts_oldest() {
        let mut history = BoundedHistory::new(3);
        for i in 0..5 {
            history.push_back(i);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_push_front_evicts_from_back() {
        let mut history = BoundedHistory::new(2);
        history.push_front("a");
        history.push_front("b");
        history.push_front("c");
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec!["c", "b"]);
    }

    #[test]
    fn test_replace_where_keeps_position() {
        let mut history = BoundedHistory::new(4);
        history.push_back((1, "one"));
        history.push_back((2, "two"));
        history.push_back((3, "three"));

        assert!(history.replace_where((2, "TWO"), |(id, _)| *id == 2).is_ok());
        assert_eq!(history.get(1), Some(&(2, "TWO")));
        assert_eq!(history.len(), 3);

        assert_eq!(history.replace_where((9, "nine"), |(id, _)| *id == 9), Err((9, "nine")));
    }

    #[test]
    fn test_serializes_as_sequence() {
        let mut history = BoundedHistory::new(2);
        history.push_back(1);
        history.push_back(2);
        assert_eq!(serde_json::to_string(&history).unwrap(), "[1,2]");
    }
}
