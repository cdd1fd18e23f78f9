//! Parsers for the CSV inputs.
//!
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating,timestamp
//! - recommendations.csv: userId,movieId,score (an exported model output)
//!
//! All files carry a header row. Titles may be quoted and contain commas.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Genre marker MovieLens uses for movies without genres
const NO_GENRES: &str = "(no genres listed)";

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct RecommendationRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    score: f32,
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Deserialize every record of a headed CSV stream, tagging failures with
/// the file name and line number.
fn read_records<T, R>(reader: R, file: &str) -> Result<Vec<(u64, T)>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let parse_error = |line: u64, reason: String| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason,
    };

    let headers = reader
        .headers()
        .map_err(|e| parse_error(1, e.to_string()))?
        .clone();

    let mut out = Vec::new();
    let mut record = csv::StringRecord::new();
    loop {
        let more = reader.read_record(&mut record).map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            parse_error(line, e.to_string())
        })?;
        if !more {
            break;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let value = record
            .deserialize(Some(&headers))
            .map_err(|e| parse_error(line, e.to_string()))?;
        out.push((line, value));
    }
    Ok(out)
}

/// Parse the movies.csv file
///
/// The title often includes the year in parentheses: "Toy Story (1995)".
/// Genres are pipe-separated: "Adventure|Animation|Children".
pub fn parse_movies(path: &Path) -> Result<Vec<CatalogEntry>> {
    parse_movies_from(open(path)?, &file_label(path))
}

pub fn parse_movies_from<R: Read>(reader: R, file: &str) -> Result<Vec<CatalogEntry>> {
    let records: Vec<(u64, MovieRecord)> = read_records(reader, file)?;
    Ok(records
        .into_iter()
        .map(|(_, record)| CatalogEntry {
            id: record.movie_id,
            year: extract_year_from_title(&record.title),
            genres: parse_genres(&record.genres),
            title: record.title,
        })
        .collect())
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    parse_ratings_from(open(path)?, &file_label(path))
}

pub fn parse_ratings_from<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let records: Vec<(u64, RatingRecord)> = read_records(reader, file)?;
    Ok(records
        .into_iter()
        .map(|(_, record)| Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
            timestamp: record.timestamp,
        })
        .collect())
}

/// Parse an exported bulk-recommendation file
///
/// Rows must be grouped by user and listed in rank order within a group.
/// A user whose rows are split into two groups is rejected, since the rank
/// order between the groups would be ambiguous.
pub fn parse_recommendations(path: &Path) -> Result<BulkRecommendations> {
    parse_recommendations_from(open(path)?, &file_label(path))
}

pub fn parse_recommendations_from<R: Read>(reader: R, file: &str) -> Result<BulkRecommendations> {
    let records: Vec<(u64, RecommendationRecord)> = read_records(reader, file)?;

    let mut sets: Vec<UserRecommendationSet> = Vec::new();
    let mut seen: HashSet<UserId> = HashSet::new();

    for (line, record) in records {
        if !record.score.is_finite() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason: format!("Non-finite score: {}", record.score),
            });
        }
        let item = ScoredRecommendation::new(record.movie_id, record.score);
        match sets.last_mut() {
            Some(current) if current.user_id == record.user_id => current.items.push(item),
            _ => {
                if !seen.insert(record.user_id) {
                    return Err(DataLoadError::DuplicateKey {
                        entity: "recommendation set for user".to_string(),
                        id: record.user_id,
                    });
                }
                sets.push(UserRecommendationSet::new(record.user_id, vec![item]));
            }
        }
    }

    Ok(BulkRecommendations::new(sets))
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        return title[start + 1..end].trim().parse::<u16>().ok();
    }
    None
}

/// Split pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
fn parse_genres(s: &str) -> Vec<String> {
    if s.trim() == NO_GENRES {
        return Vec::new();
    }
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
