//! Balanced search tree with running count/sum aggregates.
//!
//! `OrderedAggregateTree` is an AVL tree keyed by the element's `Ord`. Each
//! node carries a numeric score alongside the element; the tree maintains a
//! running size and score sum so the mean is available in O(1) without a
//! traversal. Duplicate elements (by the ordering) are rejected outright.

use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Node<T> {
    element: T,
    score: f32,
    height: i32,
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(element: T, score: f32) -> Self {
        Self {
            element,
            score,
            height: 1,
            left: None,
            right: None,
        }
    }
}

/// AVL tree over a total order, with incremental count/sum aggregates.
#[derive(Debug, Clone)]
pub struct OrderedAggregateTree<T: Ord> {
    root: Option<Box<Node<T>>>,
    size: usize,
    sum: f32,
}

impl<T: Ord> OrderedAggregateTree<T> {
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
            sum: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Mean of all scores, `0.0` for an empty tree.
    pub fn average(&self) -> f32 {
        if self.size == 0 {
            return 0.0;
        }
        self.sum / self.size as f32
    }

    /// Inserts `element` with its score, rebalancing every ancestor on the
    /// way back up. A duplicate element leaves the tree, size and sum
    /// untouched and returns `false`.
    pub fn insert(&mut self, element: T, score: f32) -> bool {
        let (root, inserted) = Self::insert_node(self.root.take(), element, score);
        self.root = Some(root);
        if inserted {
            self.size += 1;
            self.sum += score;
        }
        inserted
    }

    fn insert_node(node: Option<Box<Node<T>>>, element: T, score: f32) -> (Box<Node<T>>, bool) {
        let Some(mut node) = node else {
            return (Box::new(Node::new(element, score)), true);
        };
        let inserted = match element.cmp(&node.element) {
            Ordering::Less => {
                let (child, inserted) = Self::insert_node(node.left.take(), element, score);
                node.left = Some(child);
                inserted
            }
            Ordering::Greater => {
                let (child, inserted) = Self::insert_node(node.right.take(), element, score);
                node.right = Some(child);
                inserted
            }
            // duplicate: the tree is left exactly as it was
            Ordering::Equal => return (node, false),
        };
        (Self::rebalance(node), inserted)
    }

    /// Removes `element` if present, returning `true` only on an actual
    /// removal. Size and sum drop by the removed node's score.
    pub fn remove(&mut self, element: &T) -> bool {
        if self.root.is_none() {
            return false;
        }
        let (root, removed) = Self::remove_node(self.root.take(), element);
        self.root = root;
        match removed {
            Some(score) => {
                self.size -= 1;
                self.sum -= score;
                true
            }
            None => false,
        }
    }

    fn remove_node(
        node: Option<Box<Node<T>>>,
        element: &T,
    ) -> (Option<Box<Node<T>>>, Option<f32>) {
        let Some(mut node) = node else {
            return (None, None);
        };
        let removed = match element.cmp(&node.element) {
            Ordering::Less => {
                let (child, removed) = Self::remove_node(node.left.take(), element);
                node.left = child;
                removed
            }
            Ordering::Greater => {
                let (child, removed) = Self::remove_node(node.right.take(), element);
                node.right = child;
                removed
            }
            Ordering::Equal => {
                let score = node.score;
                match (node.left.take(), node.right.take()) {
                    (None, None) => return (None, Some(score)),
                    (Some(only), None) | (None, Some(only)) => return (Some(only), Some(score)),
                    (Some(left), Some(right)) => {
                        // two children: the in-order successor's payload
                        // replaces this node and the successor is deleted
                        // from the right subtree
                        let (succ_element, succ_score, right) = Self::take_min(right);
                        node.element = succ_element;
                        node.score = succ_score;
                        node.left = Some(left);
                        node.right = right;
                        Some(score)
                    }
                }
            }
        };
        match removed {
            Some(_) => (Some(Self::rebalance(node)), removed),
            None => (Some(node), None),
        }
    }

    /// Detaches the minimum node of the subtree, rebalancing the path.
    fn take_min(mut node: Box<Node<T>>) -> (T, f32, Option<Box<Node<T>>>) {
        match node.left.take() {
            None => (node.element, node.score, node.right.take()),
            Some(left) => {
                let (element, score, new_left) = Self::take_min(left);
                node.left = new_left;
                (element, score, Some(Self::rebalance(node)))
            }
        }
    }

    /// O(log n) search by the element ordering.
    pub fn contains(&self, element: &T) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match element.cmp(&node.element) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Collects `score_of(element)` for every element, highest-ordered
    /// element first (reverse in-order traversal), into a fresh `Vec`.
    pub fn scores_descending<F>(&self, score_of: F) -> Vec<f32>
    where
        F: Fn(&T) -> f32,
    {
        let mut out = Vec::with_capacity(self.size);
        Self::reverse_in_order(self.root.as_deref(), &mut out, &score_of);
        out
    }

    fn reverse_in_order<F>(node: Option<&Node<T>>, out: &mut Vec<f32>, score_of: &F)
    where
        F: Fn(&T) -> f32,
    {
        if let Some(node) = node {
            Self::reverse_in_order(node.right.as_deref(), out, score_of);
            out.push(score_of(&node.element));
            Self::reverse_in_order(node.left.as_deref(), out, score_of);
        }
    }

    fn height(node: &Option<Box<Node<T>>>) -> i32 {
        node.as_ref().map_or(0, |n| n.height)
    }

    fn balance_factor(node: &Node<T>) -> i32 {
        Self::height(&node.left) - Self::height(&node.right)
    }

    fn update_height(node: &mut Node<T>) {
        node.height = 1 + Self::height(&node.left).max(Self::height(&node.right));
    }

    /// Classic AVL rebalancing: single or double rotation, chosen by the
    /// sign of the taller child's own balance factor.
    fn rebalance(mut node: Box<Node<T>>) -> Box<Node<T>> {
        Self::update_height(&mut node);
        let balance = Self::balance_factor(&node);
        if balance > 1 {
            if let Some(left) = node.left.take() {
                node.left = Some(if Self::balance_factor(&left) < 0 {
                    Self::rotate_left(left)
                } else {
                    left
                });
            }
            return Self::rotate_right(node);
        }
        if balance < -1 {
            if let Some(right) = node.right.take() {
                node.right = Some(if Self::balance_factor(&right) > 0 {
                    Self::rotate_right(right)
                } else {
                    right
                });
            }
            return Self::rotate_left(node);
        }
        node
    }

    fn rotate_right(mut node: Box<Node<T>>) -> Box<Node<T>> {
        let Some(mut pivot) = node.left.take() else {
            return node;
        };
        node.left = pivot.right.take();
        Self::update_height(&mut node);
        pivot.right = Some(node);
        Self::update_height(&mut pivot);
        pivot
    }

    fn rotate_left(mut node: Box<Node<T>>) -> Box<Node<T>> {
        let Some(mut pivot) = node.right.take() else {
            return node;
        };
        node.right = pivot.left.take();
        Self::update_height(&mut node);
        pivot.left = Some(node);
        Self::update_height(&mut pivot);
        pivot
    }

    #[cfg(test)]
    fn is_balanced(&self) -> bool {
        fn check<T>(node: Option<&Node<T>>) -> Option<i32> {
            let node = node?;
            let left = check(node.left.as_deref()).unwrap_or(0);
            let right = check(node.right.as_deref()).unwrap_or(0);
            if (left - right).abs() > 1 || node.height != 1 + left.max(right) {
                return Some(i32::MIN);
            }
            Some(1 + left.max(right))
        }
        match check(self.root.as_deref()) {
            Some(h) => h != i32::MIN,
            None => true,
        }
    }
}

impl<T: Ord> Default for OrderedAggregateTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_insert_and_contains() {
        let mut tree = OrderedAggregateTree::new();
        assert!(tree.insert(5, 1.0));
        assert!(tree.insert(3, 2.0));
        assert!(tree.insert(8, 3.0));
        assert!(tree.contains(&5));
        assert!(tree.contains(&3));
        assert!(!tree.contains(&7));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut tree = OrderedAggregateTree::new();
        assert!(tree.insert(1, 4.0));
        assert!(!tree.insert(1, 9.0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.average(), 4.0);
    }

    #[test]
    fn test_remove_leaf_and_internal() {
        let mut tree = OrderedAggregateTree::new();
        for (element, score) in [(5, 5.0), (3, 3.0), (8, 8.0), (2, 2.0), (4, 4.0)] {
            tree.insert(element, score);
        }
        assert!(tree.remove(&2)); // leaf
        assert!(tree.remove(&3)); // internal, one child after prior removal
        assert!(tree.remove(&5)); // root with two children
        assert!(!tree.remove(&99));
        assert_eq!(tree.len(), 2);
        assert!(tree.contains(&4));
        assert!(tree.contains(&8));
        assert!((tree.average() - 6.0).abs() < 1e-6);
        assert!(tree.is_balanced());
    }

    #[test]
    fn test_remove_absent_from_nonempty_is_false() {
        let mut tree = OrderedAggregateTree::new();
        tree.insert(1, 1.0);
        assert!(!tree.remove(&2));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.average(), 1.0);
    }

    #[test]
    fn test_remove_from_empty_is_false() {
        let mut tree: OrderedAggregateTree<i32> = OrderedAggregateTree::new();
        assert!(!tree.remove(&1));
    }

    #[test]
    fn test_average_empty_is_zero() {
        let tree: OrderedAggregateTree<i32> = OrderedAggregateTree::new();
        assert_eq!(tree.average(), 0.0);
    }

    #[test]
    fn test_ascending_insert_stays_balanced() {
        // the degenerate case for an unbalanced BST
        let mut tree = OrderedAggregateTree::new();
        for i in 0..1000 {
            tree.insert(i, i as f32);
        }
        assert!(tree.is_balanced());
        assert_eq!(tree.len(), 1000);
    }

    #[test]
    fn test_scores_descending_order() {
        let mut tree = OrderedAggregateTree::new();
        for (element, score) in [(2, 20.0), (1, 10.0), (3, 30.0)] {
            tree.insert(element, score);
        }
        let scores = tree.scores_descending(|e| *e as f32 * 10.0);
        assert_eq!(scores, vec![30.0, 20.0, 10.0]);
    }

    proptest! {
        #[test]
        fn prop_balance_and_aggregates(ops in proptest::collection::vec((0i32..48, any::<bool>()), 0..300)) {
            let mut tree = OrderedAggregateTree::new();
            // integral scores keep the f32 running sum exact
            let mut model: BTreeMap<i32, f32> = BTreeMap::new();

            for (element, is_insert) in ops {
                let score = (element * 3) as f32;
                if is_insert {
                    prop_assert_eq!(tree.insert(element, score), model.insert(element, score).is_none());
                } else {
                    prop_assert_eq!(tree.remove(&element), model.remove(&element).is_some());
                }
                prop_assert!(tree.is_balanced());
                prop_assert_eq!(tree.len(), model.len());

                let expected_sum: f32 = model.values().sum();
                let expected_avg = if model.is_empty() { 0.0 } else { expected_sum / model.len() as f32 };
                prop_assert!((tree.average() - expected_avg).abs() < 1e-3);
            }

            let descending = tree.scores_descending(|e| *e as f32);
            let expected: Vec<f32> = model.keys().rev().map(|k| *k as f32).collect();
            prop_assert_eq!(descending, expected);
        }
    }
}
