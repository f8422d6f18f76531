use chrono::{DateTime, Utc};
use tabled::Table;

use crate::{config::Config, error, management::TokenStore, types::TokenTableRow};

/// Prints the status of the stored token without revealing it.
pub async fn token(config: &Config) {
    let store = TokenStore::new(config.token_file.clone());
    let record = match store.load().await {
        Ok(record) => record,
        Err(e) => error!("{}", e),
    };

    let rows = vec![
        TokenTableRow {
            field: "file".to_string(),
            value: store.path().display().to_string(),
        },
        TokenTableRow {
            field: "obtained at".to_string(),
            value: format_timestamp(record.obtained_at),
        },
        TokenTableRow {
            field: "expires at".to_string(),
            value: format_timestamp(record.expires_at()),
        },
        TokenTableRow {
            field: "scope".to_string(),
            value: record.scope.unwrap_or_else(|| "-".to_string()),
        },
    ];

    println!("{}", Table::new(rows));
}

fn format_timestamp(timestamp: Option<u64>) -> String {
    timestamp
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts as i64, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}
