//! Title entity and its derived rating.

use super::taxon::Taxon;

/// A creative work being reviewed.
#[derive(Debug, Clone)]
pub struct Title {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category: Taxon,
    pub genres: Vec<Taxon>,
    /// Rounded mean review score; `None` while the title has no reviews.
    pub rating: Option<i32>,
}

/// Input data for creating a title, with category and genres already resolved.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_id: i64,
    pub genre_ids: Vec<i64>,
}

/// Partial update of a title. `genre_ids: Some(_)` replaces the whole genre set.
#[derive(Debug, Clone, Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub genre_ids: Option<Vec<i64>>,
}

/// Listing filters; all conditions are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    pub year: Option<i32>,
}

/// Turns the `AVG(score)` aggregate into the published rating.
///
/// Halves round to the nearest even integer.
pub fn rating_from_average(average: Option<f64>) -> Option<i32> {
    average
        .filter(|avg| avg.is_finite() && *avg > 0.0)
        .map(|avg| avg.round_ties_even() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn average(scores: &[i32]) -> Option<f64> {
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<i32>() as f64 / scores.len() as f64)
    }

    #[test]
    fn test_no_reviews_means_no_rating() {
        assert_eq!(rating_from_average(average(&[])), None);
        assert_eq!(rating_from_average(None), None);
    }

    #[test]
    fn test_rating_is_rounded_mean() {
        assert_eq!(rating_from_average(average(&[8, 10])), Some(9));
        assert_eq!(rating_from_average(average(&[10])), Some(10));
        assert_eq!(rating_from_average(average(&[1, 2, 2])), Some(2));
        assert_eq!(rating_from_average(average(&[7, 8, 8])), Some(8));
    }

    #[test]
    fn test_rating_halves_round_to_even() {
        assert_eq!(rating_from_average(Some(8.5)), Some(8));
        assert_eq!(rating_from_average(Some(7.5)), Some(8));
    }

    #[test]
    fn test_title_filter_default_is_unfiltered() {
        let filter = TitleFilter::default();
        assert!(filter.category.is_none());
        assert!(filter.genre.is_none());
        assert!(filter.name.is_none());
        assert!(filter.year.is_none());
    }
}
