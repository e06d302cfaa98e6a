//! Release metadata from the package index.
//!
//! [`ReleaseFeed`] issues the single index request; [`classify`] turns the
//! parsed records into a [`ChannelBundle`] of weekly and production builds,
//! newest first and bounded per channel.

pub mod classify;
pub mod fetcher;
pub mod parser;

pub use classify::{classify, Channel, ChannelBundle, ReleaseEntry};
pub use fetcher::{FeedError, FeedOutcome, ReleaseFeed};
pub use parser::{parse_release_map, ParseResult, ReleaseRecord};
