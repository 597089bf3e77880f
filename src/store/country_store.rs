//! In-memory country storage with insertion order and id index

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::{seed_countries, Country, NewCountry};

/// In-memory country storage
///
/// Records keep insertion order. The id index and the id counter live under
/// the same lock as the records, so id assignment and append happen together.
pub struct CountryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    countries: Vec<Country>,
    by_id: HashMap<u64, usize>,
    next_id: u64,
}

impl CountryStore {
    /// Create a store holding `countries` in the given order
    pub fn new(countries: Vec<Country>) -> Self {
        let next_id = countries.iter().map(|c| c.id).max().map_or(1, |max| max + 1);
        let by_id = countries
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id, idx))
            .collect();

        Self {
            inner: RwLock::new(Inner {
                countries,
                by_id,
                next_id,
            }),
        }
    }

    /// Create a store holding the three seed records
    pub fn with_seed() -> Self {
        Self::new(seed_countries())
    }

    /// Get all countries in insertion order
    pub async fn list(&self) -> Vec<Country> {
        let inner = self.inner.read().await;
        inner.countries.clone()
    }

    /// Get a country by its 1-based position in insertion order
    pub async fn get_by_position(&self, position: i64) -> Result<Country> {
        let inner = self.inner.read().await;
        let len = inner.countries.len();

        usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|idx| inner.countries.get(idx))
            .cloned()
            .ok_or(Error::PositionOutOfRange { position, len })
    }

    /// Get a country by id
    pub async fn get_by_id(&self, id: u64) -> Result<Country> {
        let inner = self.inner.read().await;
        inner
            .by_id
            .get(&id)
            .map(|&idx| inner.countries[idx].clone())
            .ok_or(Error::CountryNotFound(id))
    }

    /// Append a new country with the next id
    pub async fn create(&self, new: NewCountry) -> Country {
        let mut inner = self.inner.write().await;

        let id = inner.next_id;
        if let Some(ignored) = new.id {
            tracing::debug!("Ignoring client-supplied id {} for new country", ignored);
        }
        let country = new.into_country(id);

        let idx = inner.countries.len();
        inner.countries.push(country.clone());
        inner.by_id.insert(id, idx);
        inner.next_id = id + 1;

        tracing::debug!("Created country {} ({})", country.id, country.name);
        country
    }

    /// Number of stored countries
    pub async fn len(&self) -> usize {
        self.inner.read().await.countries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for CountryStore {
    fn default() -> Self {
        Self::with_seed()
    }
}
