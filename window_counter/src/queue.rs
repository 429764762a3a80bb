//! Persistent FIFO queue.
//!
//! A banker's queue: a front list holding the oldest elements in order and a
//! back list holding the newest elements in reverse. Both lists are shared
//! through `Arc`, so cloning a queue is O(1) and every "mutating" operation
//! returns a new queue while leaving the original intact.
//!
//! The front list is only empty when the whole queue is empty, which keeps
//! `peek` O(1).

use std::fmt;
use std::sync::Arc;

type Link<T> = Option<Arc<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// Persistent first-in first-out queue
pub struct Queue<T> {
    front: Link<T>,
    back: Link<T>,
    len: usize,
}

impl<T> Queue<T> {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self {
            front: None,
            back: None,
            len: 0,
        }
    }

    /// Returns true if the queue holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the oldest element without removing it
    pub fn peek(&self) -> Option<&T> {
        self.front.as_ref().map(|node| &node.value)
    }

    /// Iterates from the oldest element to the newest
    pub fn iter(&self) -> Iter<'_, T> {
        let mut back = Vec::with_capacity(self.len);
        let mut link = self.back.as_deref();
        while let Some(node) = link {
            back.push(&node.value);
            link = node.next.as_deref();
        }

        Iter {
            front: self.front.as_deref(),
            back,
        }
    }
}

impl<T: Clone> Queue<T> {
    /// Returns a new queue with `value` appended at the tail
    pub fn enqueue(&self, value: T) -> Self {
        if self.front.is_none() {
            return Self {
                front: Some(Arc::new(Node { value, next: None })),
                back: None,
                len: 1,
            };
        }

        Self {
            front: self.front.clone(),
            back: Some(Arc::new(Node {
                value,
                next: self.back.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Returns a new queue without its oldest element
    ///
    /// The tail of an empty queue is an empty queue.
    pub fn tail(&self) -> Self {
        let Some(head) = self.front.as_ref() else {
            return Self::new();
        };

        match head.next.clone() {
            Some(rest) => Self {
                front: Some(rest),
                back: self.back.clone(),
                len: self.len - 1,
            },
            None => Self {
                front: reverse(&self.back),
                back: None,
                len: self.len - 1,
            },
        }
    }

    /// Removes the oldest element, returning it with the remaining queue
    pub fn dequeue(&self) -> Option<(T, Self)> {
        let value = self.peek()?.clone();
        Some((value, self.tail()))
    }

    /// Collects the elements, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

fn reverse<T: Clone>(list: &Link<T>) -> Link<T> {
    let mut reversed: Link<T> = None;
    let mut link = list.as_deref();
    while let Some(node) = link {
        reversed = Some(Arc::new(Node {
            value: node.value.clone(),
            next: reversed,
        }));
        link = node.next.as_deref();
    }
    reversed
}

// Unlinks uniquely owned nodes iteratively so long lists don't recurse on drop.
fn unlink<T>(mut link: Link<T>) {
    while let Some(node) = link {
        match Arc::try_unwrap(node) {
            Ok(mut node) => link = node.next.take(),
            Err(_) => break,
        }
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        unlink(self.front.take());
        unlink(self.back.take());
    }
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |queue, value| queue.enqueue(value))
    }
}

/// Iterator over a queue, oldest element first
pub struct Iter<'a, T> {
    front: Option<&'a Node<T>>,
    back: Vec<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.front {
            Some(node) => {
                self.front = node.next.as_deref();
                Some(&node.value)
            }
            None => self.back.pop(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
