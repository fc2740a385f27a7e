//! Ordered sets of documents with batched status refresh.

use chrono::Utc;
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::client::CrocodocClient;
use crate::document::Document;
use crate::error::ApiError;

// ============================================================================
// Document Set
// ============================================================================

/// Documents keyed by id, in insertion order.
///
/// Adding a document whose id is already present replaces it in place.
#[derive(Debug, Clone)]
pub struct DocumentSet {
    client: CrocodocClient,
    documents: IndexMap<String, Document>,
}

impl DocumentSet {
    /// Creates an empty set.
    pub fn new(client: &CrocodocClient) -> Self {
        Self {
            client: client.clone(),
            documents: IndexMap::new(),
        }
    }

    /// Creates a set from existing documents.
    pub fn with_documents(
        client: &CrocodocClient,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        let mut set = Self::new(client);
        set.extend(documents);
        set
    }

    /// Adds a document, replacing one with the same id.
    pub fn add(&mut self, document: Document) {
        self.documents.insert(document.id().to_string(), document);
    }

    /// Adds a document by id.
    pub fn add_by_id(&mut self, id: impl Into<String>) -> Result<&mut Document, ApiError> {
        let document = self.client.document(id)?;
        Ok(match self.documents.entry(document.id().to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(document);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(document),
        })
    }

    /// Removes a document; returns it if it was present.
    pub fn remove(&mut self, document: &Document) -> Option<Document> {
        self.remove_by_id(document.id())
    }

    /// Removes a document by id, keeping the order of the rest.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Document> {
        self.documents.shift_remove(id)
    }

    /// Returns the document with the given id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Returns the document with the given id for status refreshes.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.get_mut(id)
    }

    /// Returns true if a document with the id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Iterates mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.values_mut()
    }

    /// Returns the ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the set holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Refreshes every member's status with a single request.
    ///
    /// Records for ids not in the set are ignored. Members the reply does not
    /// mention keep their previous status. Returns how many were updated.
    #[instrument(skip(self), fields(count = self.documents.len()))]
    pub async fn refresh_all(&mut self) -> Result<usize, ApiError> {
        if self.documents.is_empty() {
            debug!("Empty set, nothing to refresh");
            return Ok(0);
        }

        let ids: Vec<&str> = self.ids().collect();
        let records = self.client.fetch_statuses(&ids).await?;

        let now = Utc::now();
        let mut updated = 0;
        for record in &records {
            match self.documents.get_mut(&record.uuid) {
                Some(document) => {
                    document.apply_status_at(record, now);
                    updated += 1;
                }
                None => debug!(uuid = %record.uuid, "Ignoring status for unknown document"),
            }
        }

        debug!(updated, "Set refreshed");
        Ok(updated)
    }
}

impl IntoIterator for DocumentSet {
    type Item = Document;
    type IntoIter = indexmap::map::IntoValues<String, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_values()
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = indexmap::map::Values<'a, String, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.values()
    }
}

impl Extend<Document> for DocumentSet {
    fn extend<T: IntoIterator<Item = Document>>(&mut self, iter: T) {
        for document in iter {
            self.add(document);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
