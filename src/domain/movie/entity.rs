use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::score::Score;

/// A catalogued movie together with the ratings it has received.
/// `score` and `count` are derived from `scores` and never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Internal immutable identifier
    pub id: Uuid,

    pub title: String,

    /// Release year
    pub year: i32,

    pub synopsis: Option<String>,

    /// Poster image reference (usually a URL)
    pub image: Option<String>,

    /// Arithmetic mean of all score values, absent while unrated
    pub score: Option<f64>,

    /// Number of scores the average was computed from
    pub count: u32,

    /// Ratings in submission order, at most one per user.
    /// Empty when the movie was loaded by reference.
    pub scores: Vec<Score>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Create a new, unrated Movie
    pub fn new(title: String, year: i32, synopsis: Option<String>, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            year,
            synopsis,
            image,
            score: None,
            count: 0,
            scores: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields.
    /// Identity, ratings and the creation timestamp are preserved.
    pub fn update_details(
        &mut self,
        title: String,
        year: i32,
        synopsis: Option<String>,
        image: Option<String>,
    ) {
        self.title = title;
        self.year = year;
        self.synopsis = synopsis;
        self.image = image;
        self.updated_at = Utc::now();
    }

    /// Record `value` as `user_id`'s rating.
    ///
    /// A user that already rated this movie has its existing entry
    /// overwritten in place; otherwise a new entry is appended.
    /// Returns the resulting score entry.
    pub fn upsert_score(&mut self, user_id: Uuid, value: f64) -> Score {
        match self.scores.iter_mut().find(|s| s.user_id == user_id) {
            Some(existing) => {
                existing.value = value;
                existing.clone()
            }
            None => {
                let score = Score::new(self.id, user_id, value);
                self.scores.push(score.clone());
                score
            }
        }
    }

    /// Recompute `score` and `count` from the full score collection.
    pub fn recompute_average(&mut self) {
        self.count = self.scores.len() as u32;
        self.score = average(self.scores.iter().map(|s| s.value));
        self.updated_at = Utc::now();
    }
}

/// Mean of `values`, or `None` for an empty sequence.
pub fn average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, n), v| (sum + v, n + 1));

    if n == 0 {
        None
    } else {
        Some(sum / f64::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie::new("The Witcher".to_string(), 2019, None, None)
    }

    #[test]
    fn test_new_movie_is_unrated() {
        let m = movie();
        assert_eq!(m.score, None);
        assert_eq!(m.count, 0);
        assert!(m.scores.is_empty());
    }

    #[test]
    fn test_average_of_nothing_is_absent() {
        assert_eq!(average(Vec::new()), None);
        assert_eq!(average(vec![4.0, 5.0]), Some(4.5));
    }

    #[test]
    fn test_resubmission_overwrites_instead_of_duplicating() {
        let mut m = movie();
        let alex = Uuid::new_v4();
        let maria = Uuid::new_v4();

        m.upsert_score(alex, 5.0);
        m.recompute_average();
        assert_eq!(m.score, Some(5.0));

        m.upsert_score(maria, 4.0);
        m.recompute_average();
        assert_eq!(m.score, Some(4.5));

        let updated = m.upsert_score(alex, 3.0);
        m.recompute_average();
        assert_eq!(updated.value, 3.0);
        assert_eq!(m.count, 2);
        assert_eq!(m.score, Some(3.5));
        // Submission order is kept
        assert_eq!(m.scores[0].user_id, alex);
    }

    #[test]
    fn test_update_details_preserves_identity_and_ratings() {
        let mut m = movie();
        let id = m.id;
        let created = m.created_at;
        m.upsert_score(Uuid::new_v4(), 2.0);
        m.recompute_average();

        m.update_details("Dune Part One".to_string(), 2021, Some("Spice".into()), None);

        assert_eq!(m.id, id);
        assert_eq!(m.created_at, created);
        assert_eq!(m.title, "Dune Part One");
        assert_eq!(m.score, Some(2.0));
    }
}
