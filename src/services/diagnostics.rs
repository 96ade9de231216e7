//! Operational status report. Every failure degrades to a status string.

use serde::Serialize;
use tracing::warn;

use crate::store::DocumentStore;
use crate::{truncate, MAX_DETAIL};

const MAX_COLLECTIONS: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

pub async fn diagnose(store: &dyn DocumentStore, database_url_set: bool) -> DiagnosticsReport {
    let info = store.describe();
    let mut report = DiagnosticsReport {
        backend: "running".to_string(),
        database: format!("{} available", info.backend),
        database_url: if database_url_set { "set" } else { "not set" }.to_string(),
        database_name: Some(info.database_name),
        connection_status: "connected".to_string(),
        collections: vec![],
    };
    match store.list_collections().await {
        Ok(mut collections) => {
            collections.truncate(MAX_COLLECTIONS);
            report.collections = collections;
            report.database = format!("{} connected and working", info.backend);
        }
        Err(e) => {
            warn!("diagnostics: listing collections failed: {e}");
            report.database = format!("connected but error: {}", truncate(&e.to_string(), MAX_DETAIL));
        }
    }
    report
}
