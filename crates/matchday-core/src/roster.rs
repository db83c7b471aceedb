//! Roster sources.
//!
//! The engine asks for a roster once at startup. Three backends are
//! available, selected by configuration: a generated list of surnames, a
//! static list from the config file, and an HTTP endpoint returning a JSON
//! array of names. Dispatch is an enum rather than a trait object, so the
//! fetch future stays `Send` without boxing.

use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::config::{RosterConfig, RosterSourceKind};

/// Maximum time to wait for the HTTP roster endpoint.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while fetching a roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The HTTP request failed or returned a non-success status.
    #[error("roster request failed: {source}")]
    Http {
        /// The underlying HTTP client error.
        #[from]
        source: reqwest::Error,
    },

    /// The source produced no names.
    #[error("roster source '{source_name}' returned no players")]
    Empty {
        /// Which backend came back empty.
        source_name: &'static str,
    },
}

/// Built-in pool of surnames for the generated roster.
const SURNAME_POOL: &[&str] = &[
    "Adams", "Armstrong", "Bailey", "Bennett", "Brooks", "Carter", "Clarke",
    "Collins", "Cooper", "Davies", "Doyle", "Edwards", "Evans", "Fletcher",
    "Foster", "Graham", "Griffiths", "Hall", "Harris", "Hughes", "Jenkins",
    "Kelly", "Lewis", "Marshall", "Mason", "Morgan", "Murphy", "Palmer",
    "Parker", "Phillips", "Powell", "Reid", "Roberts", "Shaw", "Stevens",
    "Taylor", "Turner", "Walker", "Ward", "Watson", "Webb", "Wright",
];

/// Where the roster comes from.
#[derive(Debug, Clone)]
pub enum RosterSource {
    /// Random surnames from the built-in pool.
    Generated {
        /// Number of names to draw.
        size: usize,
    },
    /// A fixed list.
    Static {
        /// The names, in order.
        players: Vec<String>,
    },
    /// A JSON array of strings served over HTTP.
    Http {
        /// Shared HTTP client.
        client: reqwest::Client,
        /// Endpoint URL.
        url: String,
    },
}

impl RosterSource {
    /// Build the source selected by configuration.
    pub fn from_config(config: &RosterConfig) -> Self {
        match config.source {
            RosterSourceKind::Generated => Self::Generated { size: config.size },
            RosterSourceKind::Static => Self::Static {
                players: config.players.clone(),
            },
            RosterSourceKind::Http => Self::Http {
                client: reqwest::Client::new(),
                url: config.url.clone(),
            },
        }
    }

    /// Backend name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generated { .. } => "generated",
            Self::Static { .. } => "static",
            Self::Http { .. } => "http",
        }
    }

    /// Resolve the roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Http`] if the endpoint cannot be reached or
    /// does not return a JSON array of strings, and [`RosterError::Empty`]
    /// if the backend yields no names.
    pub async fn fetch(&self) -> Result<Vec<String>, RosterError> {
        let players = match self {
            Self::Generated { size } => {
                let mut rng = rand::rng();
                generate(&mut rng, *size)
            }
            Self::Static { players } => players.clone(),
            Self::Http { client, url } => {
                debug!(url = %url, "requesting roster");
                client
                    .get(url)
                    .timeout(HTTP_TIMEOUT)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Vec<String>>()
                    .await?
            }
        };

        if players.is_empty() {
            return Err(RosterError::Empty {
                source_name: self.name(),
            });
        }
        info!(source = self.name(), count = players.len(), "roster resolved");
        Ok(players)
    }
}

/// Draw `size` surnames, without repeats until the pool runs out.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Vec<String> {
    let mut names: Vec<String> = SURNAME_POOL
        .choose_multiple(rng, size)
        .map(|name| (*name).to_owned())
        .collect();
    while names.len() < size {
        match SURNAME_POOL.choose(rng) {
            Some(name) => names.push((*name).to_owned()),
            None => break,
        }
    }
    names
}
