//! Freshness checks and the keyed record store.

use std::collections::HashMap;

use serde_json::Value;

use crate::client::Fetch;
use crate::models::{AlbumData, AlbumImageData, ImageData, Kind, Payload, Record};
use crate::{Clock, ImgurError, Result};

impl Record {
    /// Seconds left before this record needs another API query.
    ///
    /// Returns `max(0, ttl - elapsed)`; 0 means a refresh is due. A record
    /// that has never been fetched is stale for any TTL.
    pub fn seconds_remaining(&self, ttl: i64, clock: &dyn Clock) -> i64 {
        if self.last_fetch_time == 0 {
            return 0;
        }
        (ttl - (clock.now() - self.last_fetch_time)).max(0)
    }

    /// Query the API to update this record, unless it is still fresh.
    ///
    /// A fresh record is left alone and no request is sent. On a successful
    /// album refresh the returned vec holds one fully-populated image record
    /// per album member, in response order, for the caller to merge into its
    /// store; a skipped refresh returns an empty vec, never the cached
    /// members.
    ///
    /// On any error the record keeps all of its previous field values,
    /// including `last_fetch_time`.
    pub fn refresh(
        &mut self,
        fetcher: &dyn Fetch,
        clock: &dyn Clock,
        ttl: i64,
    ) -> Result<Vec<Record>> {
        let remaining = self.seconds_remaining(ttl, clock);
        if remaining > 0 {
            tracing::debug!(
                "Imgur ID {} still has {} seconds before needing refresh, skipping",
                self.imgur_id,
                remaining
            );
            return Ok(Vec::new());
        }

        let envelope = fetcher.query(&self.imgur_id, self.kind())?;
        let data = envelope.get("data").cloned().unwrap_or(Value::Null);
        let now = clock.now();

        match self.kind() {
            Kind::Image => {
                let parsed: ImageData = decode(&self.imgur_id, data)?;
                self.apply_image(parsed, now);
                Ok(Vec::new())
            }
            Kind::Album => {
                let parsed: AlbumData = decode(&self.imgur_id, data)?;
                Ok(self.apply_album(parsed, now))
            }
        }
    }

    fn apply_image(&mut self, data: ImageData, now: i64) {
        self.last_fetch_time = now.max(self.last_fetch_time);
        self.title = data.title;
        self.description = data.description;
        self.in_gallery = data.in_gallery;
        self.payload = Payload::Image {
            image_type: data.image_type,
        };
    }

    fn apply_album(&mut self, data: AlbumData, now: i64) -> Vec<Record> {
        let members: Vec<Record> = data
            .images
            .into_iter()
            .map(|entry| Record::from_member(entry, now))
            .collect();

        self.last_fetch_time = now.max(self.last_fetch_time);
        self.title = data.title;
        self.description = data.description;
        self.in_gallery = data.in_gallery;
        self.payload = Payload::Album {
            cover_id: data.cover,
            image_ids: members.iter().map(|m| m.imgur_id.clone()).collect(),
        };
        members
    }

    fn from_member(entry: AlbumImageData, now: i64) -> Self {
        Self {
            imgur_id: entry.id,
            last_fetch_time: now,
            title: entry.title,
            description: entry.description,
            in_gallery: entry.in_gallery,
            payload: Payload::Image {
                image_type: entry.image_type,
            },
        }
    }
}

/// Deserialize the envelope's `data` mapping into the typed model for one
/// record kind.
///
/// Decoding completes before any record field is touched, so a "successful"
/// response missing expected keys surfaces as an error instead of silently
/// writing partial data into the record.
fn decode<T: serde::de::DeserializeOwned>(imgur_id: &str, data: Value) -> Result<T> {
    serde_path_to_error::deserialize(data).map_err(|err| {
        let path = err.path().to_string();
        ImgurError::UnexpectedData {
            imgur_id: imgur_id.to_string(),
            path,
            source: err.into_inner(),
        }
        .raise()
    })
}

/// All metadata records known to one documentation build, keyed by Imgur ID.
///
/// The store lives in memory; persisting it across builds (and pruning IDs no
/// longer referenced) is the embedding build system's concern. [`Record`]
/// derives serde for exactly that purpose.
#[derive(Debug, Default)]
pub struct MetadataCache {
    records: HashMap<String, Record>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a cache from records persisted by an earlier build.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.imgur_id.clone(), record))
                .collect(),
        }
    }

    /// Register an Imgur ID referenced by a source document.
    ///
    /// An `a/` prefix marks the ID as an album; the prefix is stripped for
    /// storage and API paths. IDs already tracked are left as they are, so
    /// restored records keep their cached data.
    pub fn track(&mut self, imgur_id: &str) -> &Record {
        let (id, kind) = match imgur_id.strip_prefix("a/") {
            Some(stripped) => (stripped, Kind::Album),
            None => (imgur_id, Kind::Image),
        };
        self.records
            .entry(id.to_string())
            .or_insert_with(|| match kind {
                Kind::Image => Record::image(id),
                Kind::Album => Record::album(id),
            })
    }

    pub fn get(&self, imgur_id: &str) -> Option<&Record> {
        self.records.get(imgur_id)
    }

    /// All records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Refresh every stale record, one at a time.
    ///
    /// Image records discovered inside refreshed albums are merged into the
    /// store, replacing any staler entry under the same ID. The first error
    /// aborts the pass and propagates; whether that fails the whole build or
    /// is downgraded to a warning is the caller's policy.
    pub fn update(&mut self, fetcher: &dyn Fetch, clock: &dyn Clock, ttl: i64) -> Result<()> {
        let mut ids: Vec<String> = self.records.keys().cloned().collect();
        ids.sort();

        for id in ids {
            let Some(mut record) = self.records.remove(&id) else {
                continue;
            };
            let refreshed = record.refresh(fetcher, clock, ttl);
            self.records.insert(id, record);
            for member in refreshed? {
                self.records.insert(member.imgur_id.clone(), member);
            }
        }
        Ok(())
    }
}
