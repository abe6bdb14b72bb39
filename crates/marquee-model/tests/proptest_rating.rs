use chrono::Utc;
use marquee_model::{average_rating, Movie, MovieId, NewMovie, NewReview, Review};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn average_after_n_appends_equals_mean_of_ratings(
        ratings in proptest::collection::vec(1_i64..=5, 1..40)
    ) {
        let input = NewMovie::new("X", 2020, "Drama", "d", None).expect("movie");
        let mut movie = Movie::create(MovieId::generate(), input, Utc::now());
        for rating in &ratings {
            let review = NewReview::new("u", *rating, "c").expect("review");
            movie.append_review(Review::from_input(review, Utc::now()));
        }
        let expected = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
        prop_assert!((movie.average_rating - expected).abs() < 1e-9);
        prop_assert_eq!(movie.reviews.len(), ratings.len());
        prop_assert!(movie.validate().is_ok());
    }

    #[test]
    fn out_of_range_rating_never_validates(rating in prop_oneof![-100_i64..=0, 6_i64..=100]) {
        prop_assert!(NewReview::new("u", rating, "c").is_err());
    }
}

#[test]
fn empty_review_list_has_zero_average() {
    assert_eq!(average_rating(&[]), 0.0);
}
