//! Open-Meteo geocoding and historical archive access.
//!
//! Response parsing is plain functions over the JSON body so it can be
//! exercised without a network. The HTTP client itself lives behind the
//! `api` feature, is built from an explicit [`ClientConfig`] and carries no
//! process-wide state.
//!
//! - Geocoding: `https://geocoding-api.open-meteo.com/v1/search`
//! - Archive: `https://archive-api.open-meteo.com/v1/archive`

use crate::city::NewCity;
use crate::hourly::HourlyRecord;
use serde::Deserialize;
use std::time::Duration;
use wxs_utils::dates::parse_timestamp;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Source label stored on datasets fetched from the archive.
pub const SOURCE: &str = "open-meteo";

/// Hourly variables requested from the archive, in request order.
pub const HOURLY_VARIABLES: &str = "temperature_2m,precipitation";

/// Endpoints and retry policy for [`OpenMeteoClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub geocoding_url: String,
    pub archive_url: String,
    pub timeout: Duration,
    /// Total attempts per request, including the first.
    pub max_tries: u32,
    /// Delay before the second attempt; doubled after every failure.
    pub backoff: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            archive_url: ARCHIVE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_tries: 5,
            backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    country: Option<String>,
    country_code: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: Option<ArchiveHourly>,
}

#[derive(Debug, Deserialize)]
struct ArchiveHourly {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

/// A geocoded city together with its hourly archive for one range.
#[derive(Debug, Clone)]
pub struct CityWeather {
    pub city: NewCity,
    pub hours: Vec<HourlyRecord>,
}

/// Pick the first geocoding match for `name`.
///
/// The returned name is the geocoder's spelling when it has one, falling
/// back to the query text.
pub fn parse_geocoding(
    body: &str,
    name: &str,
    country_code: Option<&str>,
) -> anyhow::Result<NewCity> {
    let response: GeocodingResponse = serde_json::from_str(body)?;
    let first = response
        .results
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "City '{}' not found for country code '{}'.",
                name,
                country_code.unwrap_or("None")
            )
        })?;

    let (latitude, longitude) = match (first.latitude, first.longitude) {
        (Some(latitude), Some(longitude)) => (latitude, longitude),
        _ => anyhow::bail!("Geocoding response missing latitude/longitude."),
    };

    Ok(NewCity {
        name: first
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| name.to_string()),
        latitude,
        longitude,
        country_code: first.country_code.unwrap_or_default(),
        country: first.country.unwrap_or_default(),
        timezone: first.timezone.unwrap_or_default(),
    })
}

/// Turn an archive response into hourly records, ascending by timestamp.
///
/// Times are requested in GMT and parsed as UTC. Hours where either
/// variable is null are dropped with a warning.
pub fn parse_archive(body: &str) -> anyhow::Result<Vec<HourlyRecord>> {
    let response: ArchiveResponse = serde_json::from_str(body)?;
    let hourly = response
        .hourly
        .ok_or_else(|| anyhow::anyhow!("Archive response has no hourly block."))?;

    if hourly.temperature_2m.len() != hourly.time.len()
        || hourly.precipitation.len() != hourly.time.len()
    {
        anyhow::bail!(
            "Archive response column lengths differ: time={}, temperature_2m={}, precipitation={}",
            hourly.time.len(),
            hourly.temperature_2m.len(),
            hourly.precipitation.len()
        );
    }

    let mut records = Vec::with_capacity(hourly.time.len());
    let mut dropped = 0usize;
    for ((time, temperature), precipitation) in hourly
        .time
        .iter()
        .zip(hourly.temperature_2m)
        .zip(hourly.precipitation)
    {
        let timestamp = parse_timestamp(time)?;
        match (temperature, precipitation) {
            (Some(temperature), Some(precipitation)) => records.push(HourlyRecord {
                timestamp,
                temperature,
                precipitation,
            }),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        log::warn!(
            "[WXS Debug] open-meteo: dropped {} hours with missing values",
            dropped
        );
    }
    records.sort_by_key(|r| r.timestamp);
    Ok(records)
}

#[cfg(feature = "api")]
pub use client::OpenMeteoClient;

#[cfg(feature = "api")]
mod client {
    use super::{parse_archive, parse_geocoding, CityWeather, ClientConfig, HOURLY_VARIABLES};
    use crate::city::NewCity;
    use crate::date_range::DateRange;
    use crate::hourly::HourlyRecord;
    use log::{info, warn};
    use reqwest::Client;
    use wxs_utils::dates::format_date;

    /// HTTP client for the Open-Meteo geocoding and archive APIs.
    pub struct OpenMeteoClient {
        client: Client,
        config: ClientConfig,
    }

    impl OpenMeteoClient {
        pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
            let client = Client::builder().timeout(config.timeout).build()?;
            Ok(Self { client, config })
        }

        /// GET `url` with `query`, retrying with exponential backoff.
        async fn get_text(&self, url: &str, query: &[(&str, String)]) -> anyhow::Result<String> {
            let max_tries = self.config.max_tries.max(1);
            let mut backoff = self.config.backoff;
            let mut last_error = None;

            for attempt in 1..=max_tries {
                match self.client.get(url).query(query).send().await {
                    Ok(response) if response.status().is_success() => {
                        return Ok(response.text().await?);
                    }
                    Ok(response) => {
                        warn!(
                            "Attempt {}/{}: Bad response status from {}: {}",
                            attempt,
                            max_tries,
                            url,
                            response.status()
                        );
                        last_error = Some(anyhow::anyhow!(
                            "{} returned status {}",
                            url,
                            response.status()
                        ));
                    }
                    Err(e) => {
                        warn!(
                            "Attempt {}/{}: Request to {} failed: {}",
                            attempt, max_tries, url, e
                        );
                        last_error = Some(e.into());
                    }
                }

                if attempt < max_tries {
                    info!(
                        "Sleeping for {} milliseconds before retrying {}",
                        backoff.as_millis(),
                        url
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }

            Err(last_error.unwrap_or_else(|| anyhow::anyhow!("no attempts made for {}", url)))
        }

        /// Resolve a city name (optionally narrowed by country) to coordinates.
        pub async fn geocode(
            &self,
            name: &str,
            country_code: Option<&str>,
        ) -> anyhow::Result<NewCity> {
            let mut query = vec![
                ("name", name.to_string()),
                ("language", "EN".to_string()),
                ("count", "10".to_string()),
            ];
            if let Some(cc) = country_code {
                query.push(("countryCode", cc.to_string()));
            }
            let body = self
                .get_text(&self.config.geocoding_url, &query)
                .await
                .map_err(|e| {
                    anyhow::anyhow!(
                        "City '{}' not found for country code '{}'. ({})",
                        name,
                        country_code.unwrap_or("None"),
                        e
                    )
                })?;
            parse_geocoding(&body, name, country_code)
        }

        /// Fetch hourly temperature and precipitation for a location.
        pub async fn archive(
            &self,
            latitude: f64,
            longitude: f64,
            range: &DateRange,
        ) -> anyhow::Result<Vec<HourlyRecord>> {
            let query = vec![
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", format_date(&range.start())),
                ("end_date", format_date(&range.end())),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("timezone", "GMT".to_string()),
            ];
            let body = self.get_text(&self.config.archive_url, &query).await?;
            let records = parse_archive(&body)?;
            info!(
                "[WXS Debug] open-meteo: archive returned {} hours for ({}, {})",
                records.len(),
                latitude,
                longitude
            );
            Ok(records)
        }

        /// Geocode `name` and fetch its hourly archive for `range`.
        pub async fn city_weather(
            &self,
            name: &str,
            range: &DateRange,
            country_code: Option<&str>,
        ) -> anyhow::Result<CityWeather> {
            let city = self.geocode(name, country_code).await?;
            let hours = self.archive(city.latitude, city.longitude, range).await?;
            if hours.is_empty() {
                anyhow::bail!("No hourly data found for the given city and range.");
            }
            Ok(CityWeather { city, hours })
        }
    }
}
