//! Catalog loading: the list of furniture items available for placement.
//!
//! The catalog is the only I/O boundary of the planner. A [`CatalogSource`]
//! yields the raw JSON document, [`parse_catalog`] turns it into validated
//! [`CatalogItem`]s, and the [`Picker`] remembers the last successful list
//! together with a status the host uses to render the thumbnail strip (or an
//! empty/error message in its place).
//!
//! Nothing here touches the scene. Placed items only keep the catalog id as a
//! lookup key, so reloading the catalog never invalidates a layout.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PlannerConfig;

/// Stable identifier of a catalog entry. Numeric wire ids are stringified.
pub type CatalogId = String;

/// Errors produced while loading the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Transport or parse failure; the picker should show an error state.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    /// The source was reachable but listed no items.
    #[error("catalog is empty")]
    Empty,
}

/// An entry available for placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogId,
    pub display_name: String,
    pub thumbnail_url: String,
    pub full_image_url: String,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Int(i64),
    Text(String),
}

impl WireId {
    fn into_id(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.trim().to_owned(),
        }
    }
}

#[derive(Deserialize)]
struct WireItem {
    id: WireId,
    name: String,
    thumbnail_url: String,
    image_url: String,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a catalog document: a JSON array of `{id, name, thumbnail_url, image_url}`.
///
/// Duplicate ids keep their first occurrence.
///
/// # Errors
///
/// - [`CatalogError::Unavailable`] if the text is not a valid catalog or an
///   entry has a blank id.
/// - [`CatalogError::Empty`] if the array holds no entries.
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogItem>, CatalogError> {
    let wire: Vec<WireItem> =
        serde_json::from_str(json).map_err(|e| CatalogError::Unavailable(format!("invalid catalog json: {e}")))?;

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(wire.len());
    for (index, entry) in wire.into_iter().enumerate() {
        let id = entry.id.into_id();
        if id.is_empty() {
            return Err(CatalogError::Unavailable(format!("catalog entry {index} has a blank id")));
        }
        if !seen.insert(id.clone()) {
            warn!(%id, index, "duplicate catalog id; keeping first entry");
            continue;
        }
        items.push(CatalogItem {
            id,
            display_name: entry.name,
            thumbnail_url: entry.thumbnail_url,
            full_image_url: entry.image_url,
        });
    }

    if items.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(items)
}

// =============================================================================
// SOURCES
// =============================================================================

/// Where the raw catalog document comes from.
///
/// Not `Send`: in the browser the fetch future is bound to the JS event loop.
#[async_trait(?Send)]
pub trait CatalogSource {
    /// Fetch the raw catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] on any transport failure.
    async fn fetch(&self) -> Result<String, CatalogError>;
}

/// Fetches the catalog document over HTTP.
pub struct HttpCatalogSource {
    http: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    /// Build an HTTP source from the planner configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if the HTTP client fails to build.
    pub fn new(config: &PlannerConfig) -> Result<Self, CatalogError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(std::time::Duration::from_secs(config.catalog_timeouts.request_secs))
            .connect_timeout(std::time::Duration::from_secs(config.catalog_timeouts.connect_secs));
        let http = builder
            .build()
            .map_err(|e| CatalogError::Unavailable(format!("http client build failed: {e}")))?;
        Ok(Self { http, url: config.catalog_url.clone() })
    }

    /// The URL this source fetches from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!("HTTP error! status: {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }
}

// =============================================================================
// PICKER
// =============================================================================

/// What the picker should currently display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerStatus {
    /// No load has completed yet.
    #[default]
    Idle,
    /// Thumbnails for the current list are shown.
    Ready,
    /// The source listed no items.
    Empty,
    /// The last load failed.
    Unavailable,
}

/// Last successful catalog list plus the status of the most recent load.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    items: Vec<CatalogItem>,
    status: PickerStatus,
}

impl Picker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a load.
    ///
    /// A successful list replaces the previous one wholesale. An empty catalog
    /// is a successful (if uninteresting) result and clears the list. A failed
    /// load keeps the last good list so already-known ids stay placeable.
    pub fn apply(&mut self, result: &Result<Vec<CatalogItem>, CatalogError>) {
        match result {
            Ok(items) => {
                self.items.clone_from(items);
                self.status = PickerStatus::Ready;
            }
            Err(CatalogError::Empty) => {
                self.items.clear();
                self.status = PickerStatus::Empty;
            }
            Err(CatalogError::Unavailable(_)) => {
                self.status = PickerStatus::Unavailable;
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> PickerStatus {
        self.status
    }

    /// Entries of the last successful load, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Look up an entry by catalog id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Message the host shows instead of thumbnails, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        match self.status {
            PickerStatus::Empty => Some("No furniture items available."),
            PickerStatus::Unavailable => Some("Error loading furniture. Please try again later."),
            PickerStatus::Idle | PickerStatus::Ready => None,
        }
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Loads the catalog from a source and publishes it to a [`Picker`].
pub struct CatalogLoader<S> {
    source: S,
}

impl<S: CatalogSource> CatalogLoader<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and validate the catalog without publishing it.
    ///
    /// Split from [`Self::load`] so a caller that cannot hold the picker
    /// across the await (the browser entry point) can apply the result later.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] on fetch/parse failure and
    /// [`CatalogError::Empty`] when the source lists nothing.
    pub async fn fetch_items(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let result = match self.source.fetch().await {
            Ok(text) => parse_catalog(&text),
            Err(e) => Err(e),
        };
        match &result {
            Ok(items) => info!(count = items.len(), "catalog loaded"),
            Err(CatalogError::Empty) => info!("catalog loaded with no items"),
            Err(e) => warn!(error = %e, "could not load furniture catalog"),
        }
        result
    }

    /// Fetch, validate, and publish the catalog. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_items`]. Either way the picker status is
    /// updated to match.
    pub async fn load(&self, picker: &mut Picker) -> Result<Vec<CatalogItem>, CatalogError> {
        let result = self.fetch_items().await;
        picker.apply(&result);
        result
    }
}
