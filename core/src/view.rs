//! Filtered and searched views over the cached film list.
//!
//! Everything here is a pure function of its inputs. Nothing is re-sorted:
//! the view keeps the order of the slice it was derived from.

use std::{fmt, str::FromStr};

use crate::types::Film;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    Watchlist,
    Seen,
    Unseen,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Watchlist,
        FilterMode::Seen,
        FilterMode::Unseen,
    ];

    pub fn matches(self, film: &Film) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Watchlist => film.watchlist,
            FilterMode::Seen => film.watched,
            FilterMode::Unseen => !film.watched,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Watchlist => "watchlist",
            FilterMode::Seen => "seen",
            FilterMode::Unseen => "unseen",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "watchlist" => Ok(FilterMode::Watchlist),
            "seen" => Ok(FilterMode::Seen),
            "unseen" => Ok(FilterMode::Unseen),
            other => Err(format!(
                "unknown filter '{other}', expected all, watchlist, seen or unseen"
            )),
        }
    }
}

/// Case-insensitive substring match on title or genre. An empty query
/// matches everything.
pub fn matches_query(film: &Film, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    film.title.to_lowercase().contains(&needle) || film.genre.to_lowercase().contains(&needle)
}

/// Films from `records` that pass `mode` and `query`, in input order.
pub fn derive_view<'a>(records: &'a [Film], mode: FilterMode, query: &str) -> Vec<&'a Film> {
    records
        .iter()
        .filter(|film| mode.matches(film))
        .filter(|film| matches_query(film, query))
        .collect()
}

/// Per-filter totals over the whole list, ignoring any search query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub all: usize,
    pub watchlist: usize,
    pub seen: usize,
    pub unseen: usize,
}

impl FilterCounts {
    pub fn tally(records: &[Film]) -> Self {
        records.iter().fold(Self::default(), |mut counts, film| {
            counts.all += 1;
            counts.watchlist += usize::from(film.watchlist);
            if film.watched {
                counts.seen += 1;
            } else {
                counts.unseen += 1;
            }
            counts
        })
    }

    pub fn get(&self, mode: FilterMode) -> usize {
        match mode {
            FilterMode::All => self.all,
            FilterMode::Watchlist => self.watchlist,
            FilterMode::Seen => self.seen,
            FilterMode::Unseen => self.unseen,
        }
    }
}
