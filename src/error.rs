use thiserror::Error;

/// Failures while loading the immutable reference tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad record in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("weekday mask {mask:?} must be 7 characters of '0'/'1'")]
    BadWeekdayMask { mask: String },

    #[error("reference data names no hub airport")]
    MissingHub,

    #[error("schedule references unknown airport {code}")]
    UnknownAirport { code: String },
}

/// Failures talking to the evaluation service. These are fatal to the
/// session loop; there is no retry.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("round was played before the session was started")]
    SessionNotStarted,

    #[error("service rejected {context}: status {status}")]
    Rejected { context: String, status: u16 },
}
