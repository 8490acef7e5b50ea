use serde::Serialize;

/// How [`Database::store_hours`](crate::Database::store_hours) treats hours already stored for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Delete every stored hour of the dataset, then insert the new batch.
    Replace,
    /// Keep stored hours; only insert timestamps not yet present.
    #[default]
    SkipExisting,
}

/// Outcome of one hourly load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoadReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// A stored dataset with its hour count, as listed by the `datasets` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub key: String,
    pub city: String,
    pub country_code: String,
    pub start_date: String,
    pub end_date: String,
    pub source: String,
    pub created_at: String,
    pub hours: i64,
}

#[cfg(test)]
pub(crate) mod tests {
    use wxs_meteo::city::NewCity;

    pub fn madrid() -> NewCity {
        NewCity {
            name: "Madrid".to_string(),
            latitude: 40.4165,
            longitude: -3.70256,
            country_code: "ES".to_string(),
            country: "Spain".to_string(),
            timezone: "Europe/Madrid".to_string(),
        }
    }

    pub fn lisbon() -> NewCity {
        NewCity {
            name: "Lisbon".to_string(),
            latitude: 38.71667,
            longitude: -9.13333,
            country_code: "PT".to_string(),
            country: "Portugal".to_string(),
            timezone: "Europe/Lisbon".to_string(),
        }
    }

    #[test]
    fn default_mode_keeps_existing_hours() {
        assert_eq!(super::LoadMode::default(), super::LoadMode::SkipExisting);
    }
}
