use serde::{Deserialize, Serialize};

use crate::readings::RawRecord;

pub(super) const SELECT_ALL_QUERY: &str = "SELECT * FROM c";

#[derive(Debug, Serialize)]
pub(super) struct QueryRequest<'a> {
    pub query: &'a str,
    pub parameters: Vec<serde_json::Value>,
}

impl QueryRequest<'static> {
    pub(super) fn select_all() -> Self {
        Self {
            query: SELECT_ALL_QUERY,
            parameters: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct QueryPage {
    #[serde(rename = "Documents", default)]
    pub documents: Vec<serde_json::Value>,
}

impl QueryPage {
    /// Non-object documents cannot be readings and are skipped.
    pub(super) fn into_records(self) -> Vec<RawRecord> {
        self.documents
            .into_iter()
            .filter_map(|document| match document {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()
    }
}
