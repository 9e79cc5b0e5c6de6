//! # Stores Crate
//!
//! The domain data layer for the movie catalogue: three record stores
//! built on the `containers` substrate.
//!
//! - [`Movies`]: film CRUD, attribute accessors, collection grouping and
//!   production company/country attachment.
//! - [`Credits`]: per-film cast/crew rosters and the by-person
//!   cross-indexes behind "most credited" queries.
//! - [`Ratings`]: (user, movie) ratings indexed by movie and by user,
//!   with O(1) averages and top-K ranking queries.
//!
//! Each store owns its indexes outright; callers needing several stores
//! hold them side by side and pass shared references where read access
//! suffices. Mutation is single-threaded and synchronous. Every accessor
//! that returns a sequence returns a fresh, independently owned copy.

pub mod credits;
pub mod movies;
pub mod ratings;
pub mod types;

pub use credits::{Credit, Credits};
pub use movies::{Collection, Movie, Movies};
pub use ratings::Ratings;
pub use types::{CastCredit, Company, CrewCredit, Genre, Person, Rating};
