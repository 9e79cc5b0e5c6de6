//! Film store: CRUD keyed by film id, plus collection grouping and
//! production company/country attachment.
//!
//! One [`KeyedIndex`] owns the films, a second owns the collections; there
//! is no shared state with the other stores. Accessors follow the sentinel
//! conventions: `Option` for object results, `-1` for numeric results,
//! `false` for booleans, an empty `Vec` for member lists. Sequence results
//! are always fresh copies.

use crate::types::{Company, Genre};
use chrono::NaiveDate;
use containers::{KeyedIndex, string_hash_key};
use serde::{Deserialize, Serialize};

/// A single film record.
///
/// The constructor covers the catalogue-feed attributes; votes, IMDb id,
/// popularity and collection membership arrive later through the store's
/// setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    pub tagline: String,
    pub status: String,
    pub genres: Vec<Genre>,
    pub release: Option<NaiveDate>,
    pub budget: i64,
    pub revenue: i64,
    pub languages: Vec<String>,
    pub original_language: String,
    pub runtime: f64,
    pub homepage: String,
    pub adult: bool,
    pub video: bool,
    pub poster: String,

    pub(crate) vote_average: f64,
    pub(crate) vote_count: i32,
    pub(crate) imdb_id: Option<String>,
    /// Defaults to 0.0 for a known film, distinguishable from the -1.0
    /// "film absent" sentinel.
    pub(crate) popularity: f64,
    pub(crate) collection_id: Option<i32>,
    #[serde(skip)]
    pub(crate) companies: KeyedIndex<i32, Company>,
    #[serde(skip)]
    pub(crate) countries: KeyedIndex<i32, String>,
}

impl Movie {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i32,
        title: impl Into<String>,
        original_title: impl Into<String>,
        overview: impl Into<String>,
        tagline: impl Into<String>,
        status: impl Into<String>,
        genres: Vec<Genre>,
        release: Option<NaiveDate>,
        budget: i64,
        revenue: i64,
        languages: Vec<String>,
        original_language: impl Into<String>,
        runtime: f64,
        homepage: impl Into<String>,
        adult: bool,
        video: bool,
        poster: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            original_title: original_title.into(),
            overview: overview.into(),
            tagline: tagline.into(),
            status: status.into(),
            genres,
            release,
            budget,
            revenue,
            languages,
            original_language: original_language.into(),
            runtime,
            homepage: homepage.into(),
            adult,
            video,
            poster: poster.into(),
            vote_average: 0.0,
            vote_count: 0,
            imdb_id: None,
            popularity: 0.0,
            collection_id: None,
            companies: KeyedIndex::new(),
            countries: KeyedIndex::new(),
        }
    }
}

/// A named group of related films sharing marketing metadata.
///
/// Created lazily the first time a film is attached to an unseen
/// collection id, and never deleted afterwards.
#[derive(Debug, Clone)]
pub struct Collection {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) poster_path: String,
    pub(crate) backdrop_path: String,
    pub(crate) films: KeyedIndex<i32, i32>,
}

impl Collection {
    pub fn id(&self) -> i32 {
        self.id
    }
}

/// The film data store.
#[derive(Debug, Default)]
pub struct Movies {
    films: KeyedIndex<i32, Movie>,
    collections: KeyedIndex<i32, Collection>,
}

impl Movies {
    pub fn new() -> Self {
        Self {
            films: KeyedIndex::new(),
            collections: KeyedIndex::new(),
        }
    }

    /// Adds a film. Returns `false` when the id is already present, in
    /// which case nothing changes.
    pub fn add(&mut self, film: Movie) -> bool {
        if self.films.contains_key(film.id) {
            return false;
        }
        tracing::debug!(film_id = film.id, "adding film");
        self.films.put(film.id, film)
    }

    /// Removes a film from the film index only. No cascade into
    /// collections or any other store.
    pub fn remove(&mut self, id: i32) -> bool {
        self.films.remove(id)
    }

    /// All stored film ids, in insertion order.
    pub fn all_ids(&self) -> Vec<i32> {
        self.films.keys()
    }

    /// Film ids released strictly between `start` and `end`: a film
    /// released exactly on either bound is excluded, as is a film with no
    /// release date.
    pub fn ids_released_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<i32> {
        self.films
            .keys()
            .into_iter()
            .filter(|id| {
                self.films
                    .get(*id)
                    .and_then(|film| film.release)
                    .is_some_and(|release| release > start && release < end)
            })
            .collect()
    }

    pub fn title(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.title.clone())
    }

    pub fn original_title(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.original_title.clone())
    }

    pub fn overview(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.overview.clone())
    }

    pub fn tagline(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.tagline.clone())
    }

    pub fn status(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.status.clone())
    }

    pub fn genres(&self, id: i32) -> Option<Vec<Genre>> {
        self.films.get(id).map(|film| film.genres.clone())
    }

    pub fn release(&self, id: i32) -> Option<NaiveDate> {
        self.films.get(id).and_then(|film| film.release)
    }

    /// Budget in US dollars, or -1 when the film is absent.
    pub fn budget(&self, id: i32) -> i64 {
        self.films.get(id).map_or(-1, |film| film.budget)
    }

    /// Revenue in US dollars, or -1 when the film is absent.
    pub fn revenue(&self, id: i32) -> i64 {
        self.films.get(id).map_or(-1, |film| film.revenue)
    }

    pub fn languages(&self, id: i32) -> Option<Vec<String>> {
        self.films.get(id).map(|film| film.languages.clone())
    }

    pub fn original_language(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.original_language.clone())
    }

    /// Runtime in minutes, or -1.0 when the film is absent.
    pub fn runtime(&self, id: i32) -> f64 {
        self.films.get(id).map_or(-1.0, |film| film.runtime)
    }

    pub fn homepage(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.homepage.clone())
    }

    /// `false` doubles as the absent-film sentinel.
    pub fn adult(&self, id: i32) -> bool {
        self.films.get(id).is_some_and(|film| film.adult)
    }

    /// `false` doubles as the absent-film sentinel.
    pub fn video(&self, id: i32) -> bool {
        self.films.get(id).is_some_and(|film| film.video)
    }

    pub fn poster(&self, id: i32) -> Option<String> {
        self.films.get(id).map(|film| film.poster.clone())
    }

    /// Records the IMDb vote average and the review count behind it.
    pub fn set_vote(&mut self, id: i32, vote_average: f64, vote_count: i32) -> bool {
        match self.films.get_mut(id) {
            Some(film) => {
                film.vote_average = vote_average;
                film.vote_count = vote_count;
                true
            }
            None => false,
        }
    }

    /// Vote average, or -1.0 when the film is absent.
    pub fn vote_average(&self, id: i32) -> f64 {
        self.films.get(id).map_or(-1.0, |film| film.vote_average)
    }

    /// Vote count, or -1 when the film is absent.
    pub fn vote_count(&self, id: i32) -> i32 {
        self.films.get(id).map_or(-1, |film| film.vote_count)
    }

    pub fn set_imdb(&mut self, id: i32, imdb_id: impl Into<String>) -> bool {
        match self.films.get_mut(id) {
            Some(film) => {
                film.imdb_id = Some(imdb_id.into());
                true
            }
            None => false,
        }
    }

    pub fn imdb(&self, id: i32) -> Option<String> {
        self.films.get(id).and_then(|film| film.imdb_id.clone())
    }

    /// Sets (or replaces) the popularity of a film.
    pub fn set_popularity(&mut self, id: i32, popularity: f64) -> bool {
        match self.films.get_mut(id) {
            Some(film) => {
                film.popularity = popularity;
                true
            }
            None => false,
        }
    }

    /// Popularity of a film: -1.0 when the film is absent, 0.0 when the
    /// film exists but popularity was never set. The two "missing" states
    /// stay distinguishable.
    pub fn popularity(&self, id: i32) -> f64 {
        self.films.get(id).map_or(-1.0, |film| film.popularity)
    }

    /// Attaches a film to a collection, creating the collection on first
    /// reference. Fails when the film is absent or the collection id is
    /// negative. Repeat calls with the same ids are idempotent.
    pub fn add_to_collection(
        &mut self,
        film_id: i32,
        collection_id: i32,
        name: impl Into<String>,
        poster_path: impl Into<String>,
        backdrop_path: impl Into<String>,
    ) -> bool {
        if self.films.get(film_id).is_none() || collection_id < 0 {
            return false;
        }
        if !self.collections.contains_key(collection_id) {
            tracing::debug!(collection_id, "creating collection");
            self.collections.put(
                collection_id,
                Collection {
                    id: collection_id,
                    name: name.into(),
                    poster_path: poster_path.into(),
                    backdrop_path: backdrop_path.into(),
                    films: KeyedIndex::new(),
                },
            );
        }
        if let Some(collection) = self.collections.get_mut(collection_id) {
            collection.films.put(film_id, film_id);
        }
        if let Some(film) = self.films.get_mut(film_id) {
            film.collection_id = Some(collection_id);
        }
        true
    }

    /// Clone of the full collection record, when the id is known.
    pub fn collection(&self, collection_id: i32) -> Option<Collection> {
        self.collections.get(collection_id).cloned()
    }

    /// Member film ids of a collection, empty when the collection is
    /// unknown or has no members.
    pub fn films_in_collection(&self, collection_id: i32) -> Vec<i32> {
        self.collections
            .get(collection_id)
            .map_or_else(Vec::new, |collection| collection.films.keys())
    }

    pub fn collection_name(&self, collection_id: i32) -> Option<String> {
        self.collections.get(collection_id).map(|c| c.name.clone())
    }

    pub fn collection_poster(&self, collection_id: i32) -> Option<String> {
        self.collections.get(collection_id).map(|c| c.poster_path.clone())
    }

    pub fn collection_backdrop(&self, collection_id: i32) -> Option<String> {
        self.collections.get(collection_id).map(|c| c.backdrop_path.clone())
    }

    /// The collection a film belongs to, or -1 when the film is absent or
    /// was never attached to one.
    pub fn collection_id(&self, film_id: i32) -> i32 {
        self.films
            .get(film_id)
            .and_then(|film| film.collection_id)
            .unwrap_or(-1)
    }

    /// Idempotent upsert of a production company, keyed by its own id.
    pub fn add_production_company(&mut self, id: i32, company: Company) -> bool {
        match self.films.get_mut(id) {
            Some(film) => {
                film.companies.put(company.id, company);
                true
            }
            None => false,
        }
    }

    /// Idempotent upsert of a production country, keyed by the hash of its
    /// ISO 3166 code.
    pub fn add_production_country(&mut self, id: i32, country: impl Into<String>) -> bool {
        match self.films.get_mut(id) {
            Some(film) => {
                let country = country.into();
                film.countries.put(string_hash_key(&country), country);
                true
            }
            None => false,
        }
    }

    pub fn production_companies(&self, id: i32) -> Option<Vec<Company>> {
        self.films.get(id).map(|film| {
            film.companies
                .keys()
                .into_iter()
                .filter_map(|key| film.companies.get(key).cloned())
                .collect()
        })
    }

    pub fn production_countries(&self, id: i32) -> Option<Vec<String>> {
        self.films.get(id).map(|film| {
            film.countries
                .keys()
                .into_iter()
                .filter_map(|key| film.countries.get(key).cloned())
                .collect()
        })
    }

    /// Film ids whose title, original title or overview contains the
    /// search term. O(n * m) substring scan, index order.
    pub fn find_films(&self, term: &str) -> Vec<i32> {
        self.films
            .keys()
            .into_iter()
            .filter(|id| {
                self.films.get(*id).is_some_and(|film| {
                    film.title.contains(term)
                        || film.original_title.contains(term)
                        || film.overview.contains(term)
                })
            })
            .collect()
    }

    /// Number of films stored.
    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}
