use chrono::Utc;
use marquee_core::{env_bool, env_u64, ResultExt, DEFAULT_PORT, ENV_LOG_JSON, ENV_PORT};
use marquee_model::Movie;
use marquee_store::{CatalogStats, MovieRead, SqliteMovieStore, StoreAdmin, StoreLocation};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::fixtures::{fixture_movies, FIXTURE_COUNT};
use crate::{CliError, OutputMode};

fn open_store(store_url: &str) -> Result<(StoreLocation, SqliteMovieStore), CliError> {
    let location =
        StoreLocation::parse(store_url).map_err(|e| CliError::usage(format!("--store: {e}")))?;
    let store = SqliteMovieStore::open(&location).with_context("open store")?;
    Ok((location, store))
}

fn close_store(store: &SqliteMovieStore) {
    if let Err(e) = store.close() {
        warn!(store = %store.location(), "store close failed: {e}");
    }
}

pub(crate) fn emit_ok(output_mode: OutputMode, payload: &Value) -> Result<(), CliError> {
    let text = if output_mode.json {
        serde_json::to_string(payload)
    } else {
        serde_json::to_string_pretty(payload)
    }
    .map_err(|e| CliError::internal(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn stats_json(stats: &CatalogStats) -> Value {
    json!({
        "total_movies": stats.movie_count,
        "total_reviews": stats.review_count,
        "average_rating": stats.mean_average_rating,
    })
}

fn print_statistics(stats: &CatalogStats) {
    println!();
    println!("Database Statistics:");
    println!("   Total Movies: {}", stats.movie_count);
    println!("   Total Reviews: {}", stats.review_count);
    println!("   Average Rating: {:.2}/5", stats.mean_average_rating);
}

fn movie_line(position: usize, movie: &Movie) -> String {
    format!(
        "{position}. {} ({}) - {} - {:.1}/5",
        movie.title, movie.year, movie.genre, movie.average_rating
    )
}

pub(crate) fn run_seed(
    store_url: &str,
    recompute_ratings: bool,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let (location, store) = open_store(store_url)?;
    let result = seed_store(&store, recompute_ratings);
    close_store(&store);
    let report = result?;
    info!(
        store = %location,
        cleared = report.cleared,
        inserted = report.inserted,
        "seed completed"
    );

    if output_mode.json {
        let movies: Vec<Value> = report
            .movies
            .iter()
            .map(|m| {
                json!({
                    "_id": m.id.to_string(),
                    "title": m.title,
                    "year": m.year,
                    "genre": m.genre,
                    "averageRating": m.average_rating,
                    "reviews": m.reviews.len(),
                })
            })
            .collect();
        return emit_ok(
            output_mode,
            &json!({
                "command": "seed",
                "status": "ok",
                "store": location.to_string(),
                "cleared": report.cleared,
                "inserted": report.inserted,
                "recompute_ratings": recompute_ratings,
                "stats": stats_json(&report.stats),
                "movies": movies,
            }),
        );
    }

    println!("Connected to {location}");
    println!("Starting database seeding...");
    println!("Cleared {} existing movies", report.cleared);
    println!("Successfully seeded {} movies", report.inserted);
    print_statistics(&report.stats);
    println!();
    println!("Seeded Movies:");
    for (idx, movie) in report.movies.iter().enumerate() {
        println!("   {}", movie_line(idx + 1, movie));
    }
    println!();
    println!("Seeding completed successfully!");
    println!();
    println!("Next steps:");
    println!("   1. Run: MARQUEE_STORE_URL={location} marquee-server");
    println!(
        "   2. Open: http://localhost:{}",
        env_u64(ENV_PORT, u64::from(DEFAULT_PORT))
    );
    println!("   3. Enjoy your movie review website!");
    Ok(())
}

struct SeedReport {
    cleared: u64,
    inserted: u64,
    stats: CatalogStats,
    movies: Vec<Movie>,
}

fn seed_store(store: &SqliteMovieStore, recompute_ratings: bool) -> Result<SeedReport, CliError> {
    let movies = fixture_movies(Utc::now(), recompute_ratings)
        .map_err(|e| CliError::validation(format!("fixture catalog is invalid: {e}")))?;
    let cleared = store.delete_all().with_context("clear movies")?;
    let inserted = store.insert_many(&movies).with_context("insert fixtures")?;
    if inserted != FIXTURE_COUNT as u64 {
        return Err(CliError::internal(format!(
            "inserted {inserted} movies, expected {FIXTURE_COUNT}"
        )));
    }
    let stats = store.stats().with_context("read statistics")?;
    Ok(SeedReport {
        cleared,
        inserted,
        stats,
        movies,
    })
}

pub(crate) fn run_stats(store_url: &str, output_mode: OutputMode) -> Result<(), CliError> {
    let (location, store) = open_store(store_url)?;
    let result = store.stats().with_context("read statistics");
    close_store(&store);
    let stats = result?;

    if output_mode.json {
        let mut payload = stats_json(&stats);
        payload["command"] = json!("stats");
        payload["store"] = json!(location.to_string());
        return emit_ok(output_mode, &payload);
    }
    println!("Connected to {location}");
    print_statistics(&stats);
    Ok(())
}

pub(crate) fn run_config(store_url: &str, output_mode: OutputMode) -> Result<(), CliError> {
    let store = StoreLocation::parse(store_url)
        .map(|l| l.to_string())
        .map_err(|e| CliError::usage(format!("--store: {e}")))?;
    emit_ok(
        output_mode,
        &json!({
            "store_url": store_url,
            "store": store,
            "port": env_u64(ENV_PORT, u64::from(DEFAULT_PORT)),
            "log_json": env_bool(ENV_LOG_JSON, false),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_lines_round_ratings_to_one_decimal() {
        let movies = fixture_movies(Utc::now(), true).expect("fixtures");
        assert_eq!(
            movie_line(3, &movies[2]),
            "3. The Dark Knight (2008) - Action - 4.7/5"
        );
        assert_eq!(
            movie_line(2, &movies[1]),
            "2. The Shawshank Redemption (1994) - Drama - 5.0/5"
        );
    }

    #[test]
    fn reseeding_an_in_memory_store_replaces_the_catalog() {
        let store = SqliteMovieStore::open_in_memory().expect("store");
        let first = seed_store(&store, false).expect("first seed");
        assert_eq!(first.cleared, 0);
        let second = seed_store(&store, false).expect("second seed");
        assert_eq!(second.cleared, 10);
        assert_eq!(second.stats.movie_count, 10);
        assert_eq!(second.stats.review_count, 25);
        assert_eq!(format!("{:.2}", second.stats.mean_average_rating), "4.76");
    }

    #[test]
    fn closed_store_is_a_dependency_failure() {
        let store = SqliteMovieStore::open_in_memory().expect("store");
        store.close().expect("close");
        let err = seed_store(&store, false).err().expect("closed store");
        assert_eq!(err.exit_code, marquee_core::ExitCode::DependencyFailure);
        assert_eq!(
            err.machine.details.get("store_code").map(String::as_str),
            Some("store_unavailable")
        );
    }

    #[test]
    fn rejected_documents_exit_with_validation_code() {
        let store = SqliteMovieStore::open_in_memory().expect("store");
        let mut movie = fixture_movies(Utc::now(), false)
            .expect("fixtures")
            .remove(0);
        movie.average_rating = 9.0;
        let err: CliError = store
            .insert_many(&[movie])
            .with_context("insert fixtures")
            .err()
            .expect("invalid rating")
            .into();
        assert_eq!(err.exit_code, marquee_core::ExitCode::Validation);
        assert!(err.machine.message.starts_with("insert fixtures: "));
        assert_eq!(
            err.machine.details.get("store_code").map(String::as_str),
            Some("validation_error")
        );
    }

    #[test]
    fn open_failures_carry_the_store_code() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").expect("write");
        let url = format!("sqlite://{}", blocker.join("m.sqlite").display());
        let err = open_store(&url).err().expect("unopenable");
        assert_eq!(err.exit_code, marquee_core::ExitCode::DependencyFailure);
        assert!(err.machine.message.starts_with("open store: "));
        assert_eq!(
            err.machine.details.get("store_code").map(String::as_str),
            Some("io_error")
        );
    }
}
