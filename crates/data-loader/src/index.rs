//! DataIndex building and validation.
//!
//! Loading parses both tables in parallel, fills the primary store and the
//! rating indices, then checks the preconditions the report pipeline relies
//! on: unique catalog ids, and ratings that all join to a catalog entry.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

/// Lowest and highest star values in the ratings table
pub const MIN_RATING: f32 = 0.5;
pub const MAX_RATING: f32 = 5.0;

impl DataIndex {
    /// Load the catalog and ratings from a directory holding
    /// `movies.csv` and `ratings.csv`.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading dataset from {:?}", data_dir);

        let movies_path = data_dir.join("movies.csv");
        let ratings_path = data_dir.join("ratings.csv");

        let (movies, ratings) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Loaded {} movies, {} ratings", movies.len(), ratings.len());

        let index = Self::from_parts(movies, ratings)?;
        debug!("DataIndex built and validated");
        Ok(index)
    }

    /// Build and validate an index from already-parsed tables.
    ///
    /// Fails on the first duplicate catalog id: the title of a movie must
    /// resolve to exactly one entry.
    pub fn from_parts(movies: Vec<CatalogEntry>, ratings: Vec<Rating>) -> Result<Self> {
        let mut index = DataIndex::new();

        for movie in movies {
            let id = movie.id;
            if index.insert_movie(movie).is_some() {
                return Err(DataLoadError::DuplicateKey {
                    entity: "Movie".to_string(),
                    id,
                });
            }
        }

        for rating in ratings {
            index.insert_rating(rating);
        }

        index.validate()?;
        Ok(index)
    }

    /// Check that every rating joins to a catalog entry and carries a value
    /// within the star range.
    pub fn validate(&self) -> Result<()> {
        for rating in &self.ratings {
            if !self.movies.contains_key(&rating.movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: rating.movie_id,
                });
            }
            if !(MIN_RATING..=MAX_RATING).contains(&rating.rating) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: rating.rating.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn movie(id: MovieId, title: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            title: title.to_string(),
            year: None,
            genres: vec![],
        }
    }

    fn rating(user_id: UserId, movie_id: MovieId, value: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating: value,
            timestamp: 964982703,
        }
    }

    #[test]
    fn test_duplicate_catalog_id_rejected() {
        let movies = vec![movie(1, "Toy Story (1995)"), movie(1, "Toy Story (1995)")];

        let err = DataIndex::from_parts(movies, vec![]).unwrap_err();

        assert!(matches!(err, DataLoadError::DuplicateKey { id: 1, .. }));
    }

    #[test]
    fn test_rating_without_movie_rejected() {
        let movies = vec![movie(1, "Toy Story (1995)")];
        let ratings = vec![rating(1, 1, 4.0), rating(1, 99, 3.0)];

        let err = DataIndex::from_parts(movies, ratings).unwrap_err();

        assert!(matches!(err, DataLoadError::MissingReference { id: 99, .. }));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let movies = vec![movie(1, "Toy Story (1995)")];

        let err = DataIndex::from_parts(movies, vec![rating(1, 1, 0.0)]).unwrap_err();

        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("movies.csv"),
            "movieId,title,genres\n1,Toy Story (1995),Adventure|Animation\n2,Jumanji (1995),Adventure\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("ratings.csv"),
            "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,2,3.5,964981247\n2,2,5.0,964982224\n",
        )
        .unwrap();

        let index = DataIndex::load_from_files(dir.path()).unwrap();

        assert_eq!(index.counts(), (2, 2, 3));
        assert_eq!(index.user_ids(), vec![1, 2]);
        assert_eq!(index.get_movie(2).unwrap().title, "Jumanji (1995)");
        assert_eq!(index.joined_ratings().count(), 3);
    }

    #[test]
    fn test_load_missing_directory() {
        let err = DataIndex::load_from_files(Path::new("no/such/dir")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
