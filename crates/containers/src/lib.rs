//! # Containers Crate
//!
//! The generic storage substrate for the movie catalogue stores:
//!
//! - [`KeyedIndex`]: integer-keyed hash index with chained buckets and
//!   insertion-order key enumeration.
//! - [`OrderedAggregateTree`]: AVL tree maintaining running count/sum
//!   aggregates for O(1) averaging and ordered bulk extraction.
//! - [`RankPair`] + [`top_k`]: the (identifier, score) pair and
//!   partition-based selection routine behind every top-K query.
//!
//! Everything here is a pure in-memory structure: single-threaded,
//! synchronous, valid for the lifetime of one process run.

pub mod aggregate_tree;
pub mod keyed_index;
pub mod selector;

pub use aggregate_tree::OrderedAggregateTree;
pub use keyed_index::{IndexKey, KeyedIndex, string_hash_key};
pub use selector::{RankPair, top_k};
