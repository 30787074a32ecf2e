//! Imgur metadata fetching and caching.
//!
//! This crate resolves Imgur image and album IDs referenced from
//! documentation sources into cached metadata records (title, description,
//! cover, member images), re-querying the Imgur API only once a record's
//! time-to-live has run out.
//!
//! # Example
//!
//! ```ignore
//! use imgur_meta::{ImgurClient, MetadataCache, SystemClock};
//!
//! let client = ImgurClient::new("my-client-id")?;
//! let mut cache = MetadataCache::new();
//! cache.track("a/VMlM6");
//! cache.track("pc8hc");
//! cache.update(&client, &SystemClock, 3600)?;
//! ```

mod cache;
mod client;
mod clock;
mod error;
pub mod models;

pub use cache::MetadataCache;
pub use client::{Fetch, ImgurClient};
pub use clock::{Clock, SystemClock};
pub use error::ImgurError;
pub use models::{Kind, Payload, Record};

pub type Result<T> = std::result::Result<T, ImgurError>;
