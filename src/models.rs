//! Data models for Imgur API responses and cached metadata records.

use serde::{Deserialize, Deserializer, Serialize};

/// Imgur resource kind. Fixed per record at construction, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Image,
    Album,
}

impl Kind {
    /// Resource path segment used in API URLs.
    pub fn resource(&self) -> &'static str {
        match self {
            Kind::Image => "image",
            Kind::Album => "album",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.resource())
    }
}

/// Require the key to be present while still accepting JSON `null`.
///
/// Plain `Option` fields are silently filled with `None` when the key is
/// absent; routing through `deserialize_with` disables that, so an absent
/// `title`/`description` is a parse error rather than a fake null.
fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

/// Image fields under the response `data` key.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(deserialize_with = "nullable")]
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<String>,
    pub in_gallery: bool,
    #[serde(rename = "type")]
    pub image_type: String,
}

/// One entry of an album's `images` list: image fields plus the member ID.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumImageData {
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<String>,
    pub in_gallery: bool,
    #[serde(rename = "type")]
    pub image_type: String,
}

/// Album fields under the response `data` key.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumData {
    #[serde(deserialize_with = "nullable")]
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<String>,
    pub in_gallery: bool,
    pub cover: String,
    pub images: Vec<AlbumImageData>,
}

/// Kind-specific part of a cached record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload {
    Image {
        /// MIME type reported by the API, e.g. "image/png".
        image_type: String,
    },
    Album {
        /// Imgur ID of the album's cover image.
        cover_id: String,
        /// Member image IDs in API response order, duplicates as given.
        image_ids: Vec<String>,
    },
}

/// Cached metadata for one Imgur ID.
///
/// A record is created once per distinct ID seen during a build (or restored
/// from a previous build) and mutated in place only by
/// [`Record::refresh`](crate::Record::refresh). A failed refresh leaves every
/// field exactly as it was.
///
/// `title` and `description` keep the scalar the API returned: `None` for
/// JSON `null`, `Some("")` for an empty string. Rendering a placeholder for
/// null is the consumer's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub(crate) imgur_id: String,
    /// Epoch seconds of the last successful fetch. 0 means never fetched,
    /// which makes the record stale for any TTL.
    pub(crate) last_fetch_time: i64,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) in_gallery: bool,
    #[serde(flatten)]
    pub(crate) payload: Payload,
}

impl Record {
    /// Create a never-fetched image record.
    pub fn image(imgur_id: impl Into<String>) -> Self {
        Self {
            imgur_id: imgur_id.into(),
            last_fetch_time: 0,
            title: None,
            description: None,
            in_gallery: false,
            payload: Payload::Image {
                image_type: String::new(),
            },
        }
    }

    /// Create a never-fetched album record.
    pub fn album(imgur_id: impl Into<String>) -> Self {
        Self {
            imgur_id: imgur_id.into(),
            last_fetch_time: 0,
            title: None,
            description: None,
            in_gallery: false,
            payload: Payload::Album {
                cover_id: String::new(),
                image_ids: Vec::new(),
            },
        }
    }

    pub fn imgur_id(&self) -> &str {
        &self.imgur_id
    }

    pub fn last_fetch_time(&self) -> i64 {
        self.last_fetch_time
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn in_gallery(&self) -> bool {
        self.in_gallery
    }

    pub fn kind(&self) -> Kind {
        match self.payload {
            Payload::Image { .. } => Kind::Image,
            Payload::Album { .. } => Kind::Album,
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Whether the image with `imgur_id` is a member of this album.
    ///
    /// Always false for image records.
    pub fn contains(&self, imgur_id: &str) -> bool {
        match &self.payload {
            Payload::Album { image_ids, .. } => image_ids.iter().any(|id| id == imgur_id),
            Payload::Image { .. } => false,
        }
    }
}
