//! Rating store: (user, movie) ratings indexed twice through aggregate
//! trees, feeding the selector for every ranking query.
//!
//! Each movie id and each user id owns one [`OrderedAggregateTree`] holding
//! that key's ratings, ordered by the full `(user_id, movie_id)` pair with
//! the score as the node payload. Trees are created lazily on the first
//! rating for a key and persist (possibly empty) afterwards, so the -1
//! sentinels below mean "key never rated", not "key currently unrated".

use crate::types::Rating;
use containers::{KeyedIndex, OrderedAggregateTree, RankPair, top_k};

/// The rating data store.
#[derive(Debug, Default)]
pub struct Ratings {
    by_movie: KeyedIndex<i32, OrderedAggregateTree<Rating>>,
    by_user: KeyedIndex<i32, OrderedAggregateTree<Rating>>,
}

impl Ratings {
    pub fn new() -> Self {
        Self {
            by_movie: KeyedIndex::new(),
            by_user: KeyedIndex::new(),
        }
    }

    /// Records a rating. Fails when the `(user, movie)` pair already
    /// exists in either tree; otherwise the rating lands in both.
    pub fn add(&mut self, user_id: i32, movie_id: i32, score: f32, timestamp: i64) -> bool {
        let rating = Rating { user_id, movie_id, score, timestamp };

        if self
            .by_movie
            .get(movie_id)
            .is_some_and(|tree| tree.contains(&rating))
        {
            return false;
        }
        if self
            .by_user
            .get(user_id)
            .is_some_and(|tree| tree.contains(&rating))
        {
            return false;
        }

        if self.by_movie.get(movie_id).is_none() {
            self.by_movie.put(movie_id, OrderedAggregateTree::new());
        }
        if let Some(tree) = self.by_movie.get_mut(movie_id) {
            tree.insert(rating, score);
        }

        if self.by_user.get(user_id).is_none() {
            self.by_user.put(user_id, OrderedAggregateTree::new());
        }
        if let Some(tree) = self.by_user.get_mut(user_id) {
            tree.insert(rating, score);
        }
        true
    }

    /// Removes the rating for a `(user, movie)` pair. The by-movie tree is
    /// consulted first; a hit there is mirrored into the by-user tree. No
    /// tree for the movie means an immediate `false`.
    pub fn remove(&mut self, user_id: i32, movie_id: i32) -> bool {
        let probe = Rating { user_id, movie_id, score: 0.0, timestamp: 0 };

        let Some(movie_tree) = self.by_movie.get_mut(movie_id) else {
            return false;
        };
        if !movie_tree.remove(&probe) {
            return false;
        }
        if let Some(user_tree) = self.by_user.get_mut(user_id) {
            user_tree.remove(&probe);
        }
        true
    }

    /// Replaces a rating: remove then add. A failed remove (no prior
    /// rating) does not stop the add.
    pub fn set(&mut self, user_id: i32, movie_id: i32, score: f32, timestamp: i64) -> bool {
        self.remove(user_id, movie_id);
        self.add(user_id, movie_id, score, timestamp)
    }

    /// All scores for a movie, highest-ordered rating first. Empty when
    /// the movie was never rated. Fresh copy.
    pub fn movie_ratings(&self, movie_id: i32) -> Vec<f32> {
        self.by_movie
            .get(movie_id)
            .map_or_else(Vec::new, |tree| tree.scores_descending(|r| r.score))
    }

    /// All scores given by a user. Empty when the user never rated.
    pub fn user_ratings(&self, user_id: i32) -> Vec<f32> {
        self.by_user
            .get(user_id)
            .map_or_else(Vec::new, |tree| tree.scores_descending(|r| r.score))
    }

    /// O(1) average score for a movie, or -1.0 when the movie was never
    /// rated. A movie whose ratings were all removed averages 0.0.
    pub fn movie_average(&self, movie_id: i32) -> f32 {
        self.by_movie.get(movie_id).map_or(-1.0, |tree| tree.average())
    }

    /// O(1) average score given by a user, or -1.0 when the user never
    /// rated.
    pub fn user_average(&self, user_id: i32) -> f32 {
        self.by_user.get(user_id).map_or(-1.0, |tree| tree.average())
    }

    /// Number of ratings for a movie, or -1 when the movie was never
    /// rated.
    pub fn num_ratings(&self, movie_id: i32) -> i32 {
        self.by_movie.get(movie_id).map_or(-1, |tree| tree.len() as i32)
    }

    /// The movie ids with the most ratings, most first, at most `n`
    /// results. Ties rank by ascending id.
    pub fn most_rated_movies(&self, n: usize) -> Vec<i32> {
        top_k(self.size_pairs(&self.by_movie), n)
    }

    /// The user ids with the most ratings, most first, at most `n`.
    pub fn most_rated_users(&self, n: usize) -> Vec<i32> {
        top_k(self.size_pairs(&self.by_user), n)
    }

    /// The movie ids with the highest average rating, highest first, at
    /// most `n`.
    pub fn top_average_rated_movies(&self, n: usize) -> Vec<i32> {
        let pairs: Vec<RankPair<i32>> = self
            .by_movie
            .keys()
            .into_iter()
            .filter_map(|id| {
                self.by_movie
                    .get(id)
                    .map(|tree| RankPair::new(id, tree.average() as f64))
            })
            .collect();
        top_k(pairs, n)
    }

    /// Total number of stored ratings, summed over the by-movie trees.
    pub fn len(&self) -> usize {
        self.by_movie
            .keys()
            .into_iter()
            .filter_map(|id| self.by_movie.get(id).map(|tree| tree.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn size_pairs(&self, index: &KeyedIndex<i32, OrderedAggregateTree<Rating>>) -> Vec<RankPair<i32>> {
        index
            .keys()
            .into_iter()
            .filter_map(|id| index.get(id).map(|tree| RankPair::new(id, tree.len() as f64)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_duplicate_pair_rejected() {
        let mut ratings = Ratings::new();
        assert!(ratings.add(101, 201, 3.5, 1_000));
        assert!(!ratings.add(101, 201, 4.5, 2_000));
        assert_eq!(ratings.num_ratings(201), 1);
        // the original score survives the rejected duplicate
        assert_eq!(ratings.movie_ratings(201), vec![3.5]);
    }

    #[test]
    fn test_remove_mirrors_both_indexes() {
        let mut ratings = Ratings::new();
        ratings.add(101, 201, 3.5, 1_000);
        assert!(ratings.remove(101, 201));
        assert!(!ratings.remove(101, 201));
        assert_eq!(ratings.movie_ratings(201), Vec::<f32>::new());
        assert_eq!(ratings.user_ratings(101), Vec::<f32>::new());
        // the trees persist empty: known-but-unrated averages 0.0
        assert_eq!(ratings.movie_average(201), 0.0);
        assert_eq!(ratings.num_ratings(201), 0);
    }

    #[test]
    fn test_remove_unknown_movie_fails_immediately() {
        let mut ratings = Ratings::new();
        assert!(!ratings.remove(101, 999));
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut ratings = Ratings::new();
        assert!(ratings.set(101, 201, 2.0, 1_000));
        assert!(ratings.set(101, 201, 2.0, 1_000));
        assert_eq!(ratings.num_ratings(201), 1);
        assert_eq!(ratings.movie_ratings(201), vec![2.0]);
        // set on a fresh pair behaves as a plain add
        assert!(ratings.set(102, 201, 4.0, 2_000));
        assert_eq!(ratings.num_ratings(201), 2);
    }

    #[test]
    fn test_set_replaces_score() {
        let mut ratings = Ratings::new();
        ratings.add(101, 201, 1.0, 1_000);
        assert!(ratings.set(101, 201, 5.0, 2_000));
        assert_eq!(ratings.movie_ratings(201), vec![5.0]);
        assert_eq!(ratings.movie_average(201), 5.0);
    }

    #[test]
    fn test_never_rated_sentinels() {
        let ratings = Ratings::new();
        assert_eq!(ratings.movie_average(999), -1.0);
        assert_eq!(ratings.user_average(999), -1.0);
        assert_eq!(ratings.num_ratings(999), -1);
        assert_eq!(ratings.movie_ratings(999), Vec::<f32>::new());
    }

    #[test]
    fn test_averages_track_running_sum() {
        let mut ratings = Ratings::new();
        ratings.add(101, 201, 2.0, 1);
        ratings.add(102, 201, 4.0, 2);
        ratings.add(101, 202, 5.0, 3);
        assert!((ratings.movie_average(201) - 3.0).abs() < 1e-6);
        assert!((ratings.user_average(101) - 3.5).abs() < 1e-6);
        assert_eq!(ratings.len(), 3);
    }

    #[test]
    fn test_ranking_clamps_to_available() {
        let mut ratings = Ratings::new();
        ratings.add(101, 201, 3.0, 1);
        ratings.add(102, 201, 3.0, 2);
        ratings.add(101, 202, 3.0, 3);
        assert_eq!(ratings.most_rated_movies(10), vec![201, 202]);
        assert_eq!(ratings.most_rated_users(10), vec![101, 102]);
        assert_eq!(ratings.top_average_rated_movies(0), Vec::<i32>::new());
    }
}
