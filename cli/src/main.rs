mod transport;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use filmtrack_core::{
    Confirmation, DeleteOutcome, Film, FilmClient, FilmPatch, FilterMode, ViewSynchronizer,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::transport::UreqTransport;

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "Terminal front-end for the filmtrack record service."
)]
struct Cli {
    /// Base URL of the record service
    #[arg(long, env = "FILMTRACK_URL", default_value = "http://127.0.0.1:5000")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List films, optionally filtered and searched
    List {
        #[arg(long, default_value_t = FilterMode::All)]
        filter: FilterMode,
        /// Case-insensitive match on title or genre
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Add a film
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        genre: String,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        watched: bool,
        #[arg(long)]
        watchlist: bool,
    },
    Show {
        id: Uuid,
    },
    /// Toggle the watched flag
    Watched {
        id: Uuid,
    },
    /// Toggle the watchlist flag
    Watchlist {
        id: Uuid,
    },
    /// Change title, genre or year
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut sync = ViewSynchronizer::new(FilmClient::new(&cli.url), UreqTransport::new());
    sync.refresh()
        .with_context(|| format!("cannot load films from {}", cli.url))?;

    match cli.command {
        Command::List { filter, search } => {
            sync.set_filter(filter);
            sync.set_search(search);
            let counts = sync.counts();
            let summary: Vec<String> = FilterMode::ALL
                .iter()
                .map(|mode| format!("{mode} ({})", counts.get(*mode)))
                .collect();
            println!("{}", summary.join("  "));

            let view = sync.view();
            if view.is_empty() {
                if sync.search().is_empty() && sync.filter() == FilterMode::All {
                    println!("No films yet. Add one to get started.");
                } else {
                    println!("No films found.");
                }
            }
            for film in view {
                println!("{}", film_line(film));
            }
        }
        Command::Add {
            title,
            genre,
            year,
            watched,
            watchlist,
        } => {
            let form = sync.pending_mut();
            form.title = title;
            form.genre = genre;
            if year.is_some() {
                form.year = year;
            }
            form.watched = watched;
            form.watchlist = watchlist;
            let film = sync.create()?;
            println!("added {}", film_line(film));
        }
        Command::Show { id } => match sync.record(id) {
            Some(film) => println!("{}", film_line(film)),
            None => bail!("film {id} not found"),
        },
        Command::Watched { id } => {
            let film = sync.toggle_watched(id)?;
            println!("{}", film_line(film));
        }
        Command::Watchlist { id } => {
            let film = sync.toggle_watchlist(id)?;
            println!("{}", film_line(film));
        }
        Command::Edit {
            id,
            title,
            genre,
            year,
        } => {
            let patch = FilmPatch {
                title,
                genre,
                year,
                ..Default::default()
            };
            let film = sync.update(id, patch)?;
            println!("{}", film_line(film));
        }
        Command::Delete { id, yes } => {
            let confirmation = if yes {
                Confirmation::Confirmed
            } else {
                let label = sync
                    .record(id)
                    .map(|f| format!("\"{}\"", f.title))
                    .unwrap_or_else(|| id.to_string());
                ask(&format!("Delete {label}? [y/N] "))?
            };
            match sync.delete(id, confirmation)? {
                DeleteOutcome::Deleted(film) => println!("deleted {}", film_line(&film)),
                DeleteOutcome::Declined => println!("kept"),
            }
        }
    }

    Ok(())
}

fn ask(prompt: &str) -> io::Result<Confirmation> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(parse_answer(&answer))
}

fn parse_answer(answer: &str) -> Confirmation {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes").into()
}

fn film_line(film: &Film) -> String {
    let mut badges = String::new();
    if film.watched {
        badges.push_str(" [seen]");
    }
    if film.watchlist {
        badges.push_str(" [watchlist]");
    }
    format!(
        "{}  {} ({}) - {}{badges}",
        film.id, film.title, film.year, film.genre
    )
}
