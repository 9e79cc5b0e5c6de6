//! Credit store: per-film cast/crew rosters plus the person cross-indexes
//! that back the "most credited" and per-person film queries.
//!
//! The roster itself is an immutable snapshot per film. The cross-indexes
//! aggregate across films: one entry per unique person, tracking the films
//! they worked on and, for cast, an appearance counter and a starred-films
//! set (top-three billing). Removing a film's roster deliberately leaves
//! the cross-indexes alone — appearance history outlives the roster.

use crate::types::{CastCredit, CrewCredit, Person};
use containers::{KeyedIndex, RankPair, top_k};

/// Immutable cast/crew snapshot for one film.
#[derive(Debug, Clone)]
pub struct Credit {
    pub(crate) cast: Vec<CastCredit>,
    pub(crate) crew: Vec<CrewCredit>,
    pub(crate) film_id: i32,
}

impl Credit {
    pub fn film_id(&self) -> i32 {
        self.film_id
    }
}

/// Cross-index entry for a unique cast member.
///
/// Appearances count per credit entry, not per film: two roles in the same
/// film are two appearances.
#[derive(Debug, Clone)]
struct CastEntry {
    person: Person,
    films: KeyedIndex<i32, i32>,
    starred: KeyedIndex<i32, i32>,
    appearances: i32,
}

/// Cross-index entry for a unique crew member. No appearance counter and
/// no starred set; billing order does not apply to crew.
#[derive(Debug, Clone)]
struct CrewEntry {
    person: Person,
    films: KeyedIndex<i32, i32>,
}

/// The credit data store.
#[derive(Debug, Default)]
pub struct Credits {
    credits: KeyedIndex<i32, Credit>,
    cast_index: KeyedIndex<i32, CastEntry>,
    crew_index: KeyedIndex<i32, CrewEntry>,
}

impl Credits {
    pub fn new() -> Self {
        Self {
            credits: KeyedIndex::new(),
            cast_index: KeyedIndex::new(),
            crew_index: KeyedIndex::new(),
        }
    }

    /// Stores the roster for a film and folds every entry into the person
    /// cross-indexes. Rejects a film id that already has a credit, in
    /// which case nothing changes.
    pub fn add(&mut self, cast: Vec<CastCredit>, crew: Vec<CrewCredit>, film_id: i32) -> bool {
        if self.credits.contains_key(film_id) {
            return false;
        }
        tracing::debug!(film_id, cast = cast.len(), crew = crew.len(), "adding film credit");

        for member in &cast {
            if self.cast_index.get(member.person_id).is_none() {
                self.cast_index.put(
                    member.person_id,
                    CastEntry {
                        person: member.person(),
                        films: KeyedIndex::new(),
                        starred: KeyedIndex::new(),
                        appearances: 0,
                    },
                );
            }
            if let Some(entry) = self.cast_index.get_mut(member.person_id) {
                entry.appearances += 1;
                entry.films.put(film_id, film_id);
                if member.order <= 2 {
                    entry.starred.put(film_id, film_id);
                }
            }
        }

        for member in &crew {
            if self.crew_index.get(member.person_id).is_none() {
                self.crew_index.put(
                    member.person_id,
                    CrewEntry {
                        person: member.person(),
                        films: KeyedIndex::new(),
                    },
                );
            }
            if let Some(entry) = self.crew_index.get_mut(member.person_id) {
                entry.films.put(film_id, film_id);
            }
        }

        self.credits.put(film_id, Credit { cast, crew, film_id })
    }

    /// Clone of the full credit snapshot for a film, when it is known.
    pub fn credit(&self, film_id: i32) -> Option<Credit> {
        self.credits.get(film_id).cloned()
    }

    /// Deletes a film's roster. The cast/crew cross-indexes keep their
    /// entries for the removed film.
    pub fn remove(&mut self, film_id: i32) -> bool {
        self.credits.remove(film_id)
    }

    /// The film's cast in roster (billing) order, empty when the film is
    /// unknown. Fresh copy.
    pub fn film_cast(&self, film_id: i32) -> Vec<CastCredit> {
        self.credits
            .get(film_id)
            .map_or_else(Vec::new, |credit| credit.cast.clone())
    }

    /// The film's crew in roster order, empty when the film is unknown.
    pub fn film_crew(&self, film_id: i32) -> Vec<CrewCredit> {
        self.credits
            .get(film_id)
            .map_or_else(Vec::new, |credit| credit.crew.clone())
    }

    /// Cast headcount for a film, or -1 when the film is unknown.
    pub fn cast_size(&self, film_id: i32) -> i32 {
        self.credits
            .get(film_id)
            .map_or(-1, |credit| credit.cast.len() as i32)
    }

    /// Crew headcount for a film, or -1 when the film is unknown.
    pub fn crew_size(&self, film_id: i32) -> i32 {
        self.credits
            .get(film_id)
            .map_or(-1, |credit| credit.crew.len() as i32)
    }

    /// Number of films with a stored roster.
    pub fn len(&self) -> usize {
        self.credits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    /// Every unique cast member seen so far, as fresh `Person` copies.
    pub fn unique_cast(&self) -> Vec<Person> {
        self.cast_index
            .keys()
            .into_iter()
            .filter_map(|id| self.cast_index.get(id).map(|entry| entry.person.clone()))
            .collect()
    }

    /// Every unique crew member seen so far.
    pub fn unique_crew(&self) -> Vec<Person> {
        self.crew_index
            .keys()
            .into_iter()
            .filter_map(|id| self.crew_index.get(id).map(|entry| entry.person.clone()))
            .collect()
    }

    /// Cast members whose name contains the search term.
    pub fn find_cast(&self, term: &str) -> Vec<Person> {
        self.unique_cast()
            .into_iter()
            .filter(|person| person.name.contains(term))
            .collect()
    }

    /// Crew members whose name contains the search term.
    pub fn find_crew(&self, term: &str) -> Vec<Person> {
        self.unique_crew()
            .into_iter()
            .filter(|person| person.name.contains(term))
            .collect()
    }

    /// The person behind a cast id, if known.
    pub fn cast_person(&self, person_id: i32) -> Option<Person> {
        self.cast_index.get(person_id).map(|entry| entry.person.clone())
    }

    /// The person behind a crew id, if known.
    pub fn crew_person(&self, person_id: i32) -> Option<Person> {
        self.crew_index.get(person_id).map(|entry| entry.person.clone())
    }

    /// Films a cast member appears in, empty when the person is unknown.
    pub fn cast_films(&self, person_id: i32) -> Vec<i32> {
        self.cast_index
            .get(person_id)
            .map_or_else(Vec::new, |entry| entry.films.keys())
    }

    /// Films a crew member worked on, empty when the person is unknown.
    pub fn crew_films(&self, person_id: i32) -> Vec<i32> {
        self.crew_index
            .get(person_id)
            .map_or_else(Vec::new, |entry| entry.films.keys())
    }

    /// Films where the cast member holds one of the top three billing
    /// positions, empty when the person is unknown.
    pub fn cast_stars_in_films(&self, person_id: i32) -> Vec<i32> {
        self.cast_index
            .get(person_id)
            .map_or_else(Vec::new, |entry| entry.starred.keys())
    }

    /// Credit count for a cast member (one per roster entry, roles not
    /// deduplicated), or -1 when the person is unknown.
    pub fn num_cast_credits(&self, person_id: i32) -> i32 {
        self.cast_index.get(person_id).map_or(-1, |entry| entry.appearances)
    }

    /// The cast members with the most credits, most first, at most `n`
    /// results. Ties rank by ascending person id.
    pub fn most_cast_credits(&self, n: usize) -> Vec<Person> {
        let pairs: Vec<RankPair<i32>> = self
            .cast_index
            .keys()
            .into_iter()
            .filter_map(|id| {
                self.cast_index
                    .get(id)
                    .map(|entry| RankPair::new(id, entry.appearances as f64))
            })
            .collect();
        top_k(pairs, n)
            .into_iter()
            .filter_map(|id| self.cast_person(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(person_id: i32, name: &str, order: i32) -> CastCredit {
        CastCredit {
            person_id,
            name: name.to_string(),
            character: format!("{name} (voice)"),
            credit_id: format!("cast-{person_id}"),
            order,
            profile_path: format!("/{name}.jpg"),
        }
    }

    fn crew(person_id: i32, name: &str, job: &str) -> CrewCredit {
        CrewCredit {
            person_id,
            name: name.to_string(),
            department: "Directing".to_string(),
            job: job.to_string(),
            credit_id: format!("crew-{person_id}"),
            profile_path: format!("/{name}.jpg"),
        }
    }

    #[test]
    fn test_add_rejects_duplicate_film() {
        let mut credits = Credits::new();
        assert!(credits.add(vec![cast(1, "Tom Hanks", 0)], vec![], 201));
        assert!(!credits.add(vec![cast(2, "Tim Allen", 0)], vec![], 201));
        // the rejected roster must not have leaked into the cross-index
        assert_eq!(credits.num_cast_credits(2), -1);
        assert_eq!(credits.len(), 1);
    }

    #[test]
    fn test_roster_order_preserved() {
        let mut credits = Credits::new();
        let roster = vec![cast(1, "Tom Hanks", 0), cast(2, "Tim Allen", 1)];
        credits.add(roster.clone(), vec![crew(10, "John Lasseter", "Director")], 201);
        assert_eq!(credits.film_cast(201), roster);
        assert_eq!(credits.cast_size(201), 2);
        assert_eq!(credits.crew_size(201), 1);
        assert_eq!(credits.film_cast(999), Vec::new());
        assert_eq!(credits.cast_size(999), -1);
    }

    #[test]
    fn test_appearances_count_per_role() {
        let mut credits = Credits::new();
        // same person, two roles in one film
        credits.add(vec![cast(1, "Mike Myers", 0), cast(1, "Mike Myers", 5)], vec![], 201);
        assert_eq!(credits.num_cast_credits(1), 2);
        // but the film appears once in their film list
        assert_eq!(credits.cast_films(1), vec![201]);
    }

    #[test]
    fn test_starred_requires_top_three_billing() {
        let mut credits = Credits::new();
        credits.add(vec![cast(1, "Star", 2), cast(2, "Extra", 3)], vec![], 201);
        assert_eq!(credits.cast_stars_in_films(1), vec![201]);
        assert_eq!(credits.cast_stars_in_films(2), Vec::<i32>::new());
    }

    #[test]
    fn test_credit_snapshot_accessor() {
        let mut credits = Credits::new();
        credits.add(vec![cast(1, "Tom Hanks", 0)], vec![], 201);
        let snapshot = credits.credit(201).unwrap();
        assert_eq!(snapshot.film_id(), 201);
        assert!(credits.credit(999).is_none());
    }

    #[test]
    fn test_remove_keeps_cross_index() {
        let mut credits = Credits::new();
        credits.add(vec![cast(1, "Tom Hanks", 0)], vec![crew(10, "John Lasseter", "Director")], 201);
        assert!(credits.remove(201));
        assert!(!credits.remove(201));
        assert_eq!(credits.film_cast(201), Vec::new());
        // historical appearance data survives the roster removal
        assert_eq!(credits.num_cast_credits(1), 1);
        assert_eq!(credits.cast_films(1), vec![201]);
        assert_eq!(credits.crew_films(10), vec![201]);
    }

    #[test]
    fn test_most_cast_credits_ranking() {
        let mut credits = Credits::new();
        for film_id in 201..=203 {
            credits.add(vec![cast(1, "Busy", 0)], vec![], film_id);
        }
        credits.add(vec![cast(2, "Occasional", 0)], vec![], 301);
        let ranked = credits.most_cast_credits(5);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Busy", "Occasional"]);
        assert_eq!(credits.most_cast_credits(1).len(), 1);
    }

    #[test]
    fn test_find_people_by_substring() {
        let mut credits = Credits::new();
        credits.add(
            vec![cast(1, "Tom Hanks", 0), cast(2, "Tim Allen", 1)],
            vec![crew(10, "John Lasseter", "Director")],
            201,
        );
        let toms = credits.find_cast("Tom");
        assert_eq!(toms.len(), 1);
        assert_eq!(toms[0].name, "Tom Hanks");
        assert!(credits.find_crew("Lasseter").len() == 1);
        assert!(credits.find_cast("Zeta").is_empty());
    }
}
