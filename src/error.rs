//! Error type for loading, configuring and exporting prep forecasts.

use std::path::PathBuf;

/// Everything that can go wrong outside the date mapping itself.
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// Filesystem failure on a named path.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config parsed but its values are inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown location {name:?} (known: {known})")]
    UnknownLocation { name: String, known: String },

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("buffer {pct}% outside allowed range {min}%..={max}%")]
    BufferOutOfRange { pct: i32, min: i32, max: i32 },
}

impl PrepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_out_of_range_message() {
        let e = PrepError::BufferOutOfRange { pct: 50, min: -35, max: 35 };
        assert_eq!(e.to_string(), "buffer 50% outside allowed range -35%..=35%");
    }

    #[test]
    fn invalid_date_message() {
        let e = PrepError::InvalidDate("2025-13-01".to_string());
        assert_eq!(e.to_string(), "invalid date \"2025-13-01\", expected YYYY-MM-DD");
    }

    #[test]
    fn unknown_location_message() {
        let e = PrepError::UnknownLocation {
            name: "Venice".to_string(),
            known: "Malibu, Santa Barbara".to_string(),
        };
        assert_eq!(e.to_string(), "unknown location \"Venice\" (known: Malibu, Santa Barbara)");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<PrepError>();
    }
}
