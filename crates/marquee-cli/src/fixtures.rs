// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use marquee_model::{Movie, MovieId, NewMovie, NewReview, Review, ValidationError};

struct FixtureMovie {
    title: &'static str,
    year: i32,
    genre: &'static str,
    description: &'static str,
    director: &'static str,
    preset_rating: f64,
    reviews: &'static [(&'static str, i64, &'static str)],
}

const FIXTURES: &[FixtureMovie] = &[
    FixtureMovie {
        title: "Inception",
        year: 2010,
        genre: "Sci-Fi",
        description: "A thief who steals corporate secrets through the use of dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
        director: "Christopher Nolan",
        preset_rating: 4.8,
        reviews: &[
            ("MovieLover42", 5, "Mind-blowing concept and execution!"),
            ("CinemaFan", 4, "Great visuals but confusing plot"),
        ],
    },
    FixtureMovie {
        title: "The Shawshank Redemption",
        year: 1994,
        genre: "Drama",
        description: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
        director: "Frank Darabont",
        preset_rating: 4.9,
        reviews: &[
            ("ClassicFilmBuff", 5, "One of the greatest films ever made!"),
            ("TimRobbinsFan", 5, "Powerful story about hope and friendship"),
        ],
    },
    FixtureMovie {
        title: "The Dark Knight",
        year: 2008,
        genre: "Action",
        description: "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests of his ability to fight injustice.",
        director: "Christopher Nolan",
        preset_rating: 4.7,
        reviews: &[
            ("BatmanFan", 5, "Heath Ledger's Joker is legendary!"),
            ("ActionLover", 4, "Best superhero movie ever"),
            ("MovieCritic", 5, "Masterpiece of modern cinema"),
        ],
    },
    FixtureMovie {
        title: "Parasite",
        year: 2019,
        genre: "Thriller",
        description: "Greed and class discrimination threaten the newly formed symbiotic relationship between the wealthy Park family and the destitute Kim clan.",
        director: "Bong Joon Ho",
        preset_rating: 4.6,
        reviews: &[
            ("FilmStudent", 5, "Brilliant social commentary"),
            ("OscarWatcher", 4, "Deserved all the awards!"),
        ],
    },
    FixtureMovie {
        title: "Spirited Away",
        year: 2001,
        genre: "Animation",
        description: "During her family's move to the suburbs, a sullen 10-year-old girl wanders into a world ruled by gods, witches, and spirits, and where humans are changed into beasts.",
        director: "Hayao Miyazaki",
        preset_rating: 4.8,
        reviews: &[
            ("AnimeFan", 5, "Studio Ghibli at its best!"),
            ("FamilyViewer", 5, "Beautiful animation and story"),
        ],
    },
    FixtureMovie {
        title: "Interstellar",
        year: 2014,
        genre: "Sci-Fi",
        description: "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
        director: "Christopher Nolan",
        preset_rating: 4.5,
        reviews: &[
            ("SpaceGeek", 5, "Scientific accuracy mixed with great storytelling"),
            ("MusicLover", 4, "Hans Zimmer's score is incredible"),
            ("MovieBuff", 4, "Visually stunning"),
        ],
    },
    FixtureMovie {
        title: "Pulp Fiction",
        year: 1994,
        genre: "Crime",
        description: "The lives of two mob hitmen, a boxer, a gangster and his wife intertwine in four tales of violence and redemption.",
        director: "Quentin Tarantino",
        preset_rating: 4.7,
        reviews: &[
            ("TarantinoFan", 5, "Iconic dialogue and characters!"),
            ("90sKid", 4, "Changed cinema forever"),
        ],
    },
    FixtureMovie {
        title: "The Godfather",
        year: 1972,
        genre: "Crime",
        description: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
        director: "Francis Ford Coppola",
        preset_rating: 4.9,
        reviews: &[
            ("ClassicMafia", 5, "Made him an offer he couldn't refuse!"),
            ("FilmHistory", 5, "Perfect in every way"),
            ("BrandoFan", 5, "Marlon Brando is incredible"),
        ],
    },
    FixtureMovie {
        title: "Avengers: Endgame",
        year: 2019,
        genre: "Action",
        description: "After the devastating events of Avengers: Infinity War, the Avengers assemble once more in order to reverse Thanos' actions and restore balance to the universe.",
        director: "Anthony Russo, Joe Russo",
        preset_rating: 4.4,
        reviews: &[
            ("MarvelFan", 5, "Perfect conclusion to 11 years of movies!"),
            ("SuperheroLover", 4, "Epic finale"),
            ("CasualViewer", 4, "Great entertainment"),
        ],
    },
    FixtureMovie {
        title: "La La Land",
        year: 2016,
        genre: "Musical",
        description: "While navigating their careers in Los Angeles, a pianist and an actress fall in love while attempting to reconcile their aspirations for the future.",
        director: "Damien Chazelle",
        preset_rating: 4.3,
        reviews: &[
            ("MusicalFan", 5, "Beautiful music and choreography"),
            ("RyanGoslingFan", 4, "Great chemistry between leads"),
            ("Oscar2017", 4, "Should have won Best Picture!"),
        ],
    },
];

pub(crate) const FIXTURE_COUNT: usize = FIXTURES.len();

/// Builds the seed catalog through the validating constructors, stamping
/// every movie and review with `now`. Preset ratings are kept unless
/// `recompute_ratings` is set.
pub(crate) fn fixture_movies(
    now: DateTime<Utc>,
    recompute_ratings: bool,
) -> Result<Vec<Movie>, ValidationError> {
    FIXTURES
        .iter()
        .map(|fixture| {
            let input = NewMovie::new(
                fixture.title,
                fixture.year,
                fixture.genre,
                fixture.description,
                Some(fixture.director),
            )?;
            let mut movie = Movie::create(MovieId::generate(), input, now);
            for (username, rating, comment) in fixture.reviews {
                let review = NewReview::new(username, *rating, comment)?;
                movie.reviews.push(Review::from_input(review, now));
            }
            if recompute_ratings {
                movie.recompute_average();
            } else {
                movie.average_rating = fixture.preset_rating;
            }
            movie.validate()?;
            Ok(movie)
        })
        .collect()
}
