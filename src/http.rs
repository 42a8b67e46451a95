//! HTTP client for downloading the locations-of-interest feed.
//!
//! A single blocking fetch: the feed is small and loaded once per run, before
//! any matching begins. The URL is an explicit argument, never baked in.

use log::info;

use crate::error::Result;

/// Fetch the locations-of-interest GeoJSON document from `url`.
///
/// Non-2xx responses are load errors. The body is returned as text and fed
/// to [`crate::read_locations_of_interest`].
pub fn fetch_locations_of_interest(url: &str) -> Result<String> {
    info!("Downloading locations of interest from {url}");
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    Ok(body)
}
