// src/main.rs
//
// Composition root: configuration, logging, store selection and
// command dispatch. Results are printed as JSON.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use moviescore::application::{self, AppState, ErrorResponse, MovieInputDto, ScoreInputDto};
use moviescore::config::AppConfig;
use moviescore::db::{
    create_connection_pool, get_connection, get_database_stats, initialize_database,
    seed_demo_data, verify_database_integrity,
};
use moviescore::domain::page::DEFAULT_PAGE_SIZE;
use moviescore::error::AppError;
use moviescore::repositories::{InMemoryStore, SqliteStore, Store};
use moviescore::services::SessionContext;

#[derive(Parser)]
#[command(name = "moviescore")]
#[command(about = "Movie catalogue with per-user ratings")]
#[command(version)]
struct Cli {
    /// Principal to act as
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search movies by title
    Movies {
        /// Case-insensitive title fragment
        #[arg(long)]
        title: Option<String>,

        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,

        /// FIELD[,asc|desc] where FIELD is title, year or score
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one movie with its ratings
    Movie { id: String },

    /// Add a movie to the catalogue
    AddMovie(MovieArgs),

    /// Replace a movie's editable fields
    UpdateMovie {
        id: String,

        #[command(flatten)]
        movie: MovieArgs,
    },

    /// Remove an unrated movie
    DeleteMovie { id: String },

    /// Rate a movie as the current user
    Rate {
        movie_id: String,

        /// Score between 0 and 5
        value: f64,
    },

    /// Show the current user
    Whoami,

    /// Look up a principal and its authorities
    User { username: String },
}

#[derive(Args)]
struct MovieArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    year: i32,

    #[arg(long)]
    synopsis: Option<String>,

    /// Poster image URL
    #[arg(long)]
    image: Option<String>,
}

impl From<MovieArgs> for MovieInputDto {
    fn from(args: MovieArgs) -> Self {
        Self {
            title: args.title,
            year: args.year,
            synopsis: args.synopsis,
            image: args.image,
        }
    }
}

fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => return fail(ErrorResponse::from_app_error(e).to_json()),
    };

    if let Err(e) = TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("logger already initialized: {}", e);
    }

    let store = match open_store(&config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("startup failed: {:#}", e);
            return fail(ErrorResponse::from_app_error(AppError::Storage(format!("{:#}", e))).to_json());
        }
    };

    let session = Arc::new(SessionContext::new());
    if let Some(username) = cli.user {
        session.sign_in(username);
    }
    let state = AppState::new(store, session);

    match dispatch(&state, cli.command) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(error_json) => fail(error_json),
    }
}

fn fail(error_json: String) -> ExitCode {
    eprintln!("{}", error_json);
    ExitCode::FAILURE
}

fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    if config.in_memory {
        let store = InMemoryStore::new();
        if config.seed {
            store.seed_demo_data()?;
        }
        log::info!("using in-memory store");
        return Ok(Arc::new(store));
    }

    let pool = create_connection_pool(&config.database_path, config.pool)
        .with_context(|| format!("opening database {}", config.database_path.display()))?;
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn).context("initializing schema")?;
        verify_database_integrity(&conn).context("checking database integrity")?;
        if config.seed {
            seed_demo_data(&conn).context("seeding demo data")?;
        }

        let stats = get_database_stats(&conn)?;
        log::debug!(
            "database {}: {} movies, {} scores, {} users, {} bytes",
            config.database_path.display(),
            stats.movie_count,
            stats.score_count,
            stats.user_count,
            stats.size_bytes
        );
    }

    Ok(Arc::new(SqliteStore::new(Arc::new(pool))))
}

fn dispatch(state: &AppState, command: Command) -> Result<String, String> {
    match command {
        Command::Movies {
            title,
            page,
            size,
            sort,
        } => render(application::list_movies(
            state,
            title.as_deref(),
            page,
            size,
            sort.as_deref(),
        )),
        Command::Movie { id } => render(application::get_movie(state, &id)),
        Command::AddMovie(movie) => render(application::create_movie(state, movie.into())),
        Command::UpdateMovie { id, movie } => {
            render(application::update_movie(state, &id, movie.into()))
        }
        Command::DeleteMovie { id } => {
            application::delete_movie(state, &id)?;
            render(Ok(serde_json::json!({ "success": true, "deleted": id })))
        }
        Command::Rate { movie_id, value } => {
            render(application::save_score(state, ScoreInputDto { movie_id, value }))
        }
        Command::Whoami => render(application::current_user(state)),
        Command::User { username } => render(application::load_user(state, &username)),
    }
}

fn render<T: Serialize>(result: Result<T, String>) -> Result<String, String> {
    let value = result?;
    serde_json::to_string_pretty(&value).map_err(|e| {
        ErrorResponse::from_app_error(AppError::Storage(format!("serialization failed: {}", e)))
            .to_json()
    })
}
