use serde::{Deserialize, Serialize};

/// A stored city. Unique on `(name, country_code)`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO 3166-1 alpha-2 code, e.g. "ES"
    pub country_code: String,
    pub country: String,
    /// IANA zone reported by the geocoder. Informational only: days are
    /// always bucketed in UTC.
    pub timezone: String,
}

/// City metadata before it has been stored.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
    pub country: String,
    pub timezone: String,
}
