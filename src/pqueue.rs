//! A min-heap priority queue.
//!
//! Binary min-heap over a growable vector. Priorities only need a total
//! order; entries with equal priority leave in an order fixed by the
//! sequence of pushes and pops, so identical inputs always drain identically.

/// An entry in the priority queue.
#[derive(Debug, Clone)]
struct HeapEntry<P, T> {
    priority: P,
    data: T,
}

/// A min-heap priority queue that pops the lowest-priority element first.
///
/// Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2.
#[derive(Debug, Clone)]
pub struct MinHeap<P, T> {
    nodes: Vec<HeapEntry<P, T>>,
}

impl<P: Ord, T> MinHeap<P, T> {
    /// Create a new, empty min-heap.
    pub fn new() -> Self {
        MinHeap { nodes: Vec::new() }
    }

    /// Create an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Priority of the element `pop` would return next.
    pub fn peek_priority(&self) -> Option<&P> {
        self.nodes.first().map(|entry| &entry.priority)
    }

    /// Push an element onto the heap with the given priority.
    pub fn push(&mut self, priority: P, data: T) {
        self.nodes.push(HeapEntry { priority, data });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Pop the minimum-priority element from the heap.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.pop_entry().map(|(_, data)| data)
    }

    /// Pop the minimum-priority element together with its priority.
    pub fn pop_entry(&mut self) -> Option<(P, T)> {
        if self.nodes.is_empty() {
            return None;
        }
        // Swap root with last, remove last, sift down root
        let last = self.nodes.len() - 1;
        self.nodes.swap(0, last);
        let result = self.nodes.pop()?;
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some((result.priority, result.data))
    }

    /// Sift element at `index` up to maintain heap property.
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].priority < self.nodes[parent].priority {
                self.nodes.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Sift element at `index` down to maintain heap property.
    ///
    /// Strict comparisons: on a tie between the two children the left one
    /// wins, and a child equal to its parent never moves.
    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.nodes[left].priority < self.nodes[smallest].priority {
                smallest = left;
            }
            if right < len && self.nodes[right].priority < self.nodes[smallest].priority {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.nodes.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<P: Ord, T> Default for MinHeap<P, T> {
    fn default() -> Self {
        Self::new()
    }
}
