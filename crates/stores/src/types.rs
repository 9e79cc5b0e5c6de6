//! Domain record types shared across the catalogue stores.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A film genre, as delivered by the upstream catalogue feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// A production company attached to a film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i32,
    pub name: String,
}

/// A unique person referenced from the credit cross-indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub profile_path: String,
}

/// One cast entry of a film's roster, in billing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastCredit {
    /// Person id; the key of the cast cross-index.
    pub person_id: i32,
    pub name: String,
    pub character: String,
    pub credit_id: String,
    /// Billing position, 0-based. `order <= 2` counts as starring.
    pub order: i32,
    pub profile_path: String,
}

impl CastCredit {
    pub fn person(&self) -> Person {
        Person {
            id: self.person_id,
            name: self.name.clone(),
            profile_path: self.profile_path.clone(),
        }
    }
}

/// One crew entry of a film's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewCredit {
    /// Person id; the key of the crew cross-index.
    pub person_id: i32,
    pub name: String,
    pub department: String,
    pub job: String,
    pub credit_id: String,
    pub profile_path: String,
}

impl CrewCredit {
    pub fn person(&self) -> Person {
        Person {
            id: self.person_id,
            name: self.name.clone(),
            profile_path: self.profile_path.clone(),
        }
    }
}

/// A single user's rating of a single movie.
///
/// Ordering and equality consider only the `(user_id, movie_id)` pair; the
/// score and timestamp are payload. This is what lets a zero-score probe
/// locate a stored rating inside an [`containers::OrderedAggregateTree`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: i32,
    pub movie_id: i32,
    pub score: f32,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl PartialEq for Rating {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id && self.movie_id == other.movie_id
    }
}

impl Eq for Rating {}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.user_id
            .cmp(&other.user_id)
            .then_with(|| self.movie_id.cmp(&other.movie_id))
    }
}
