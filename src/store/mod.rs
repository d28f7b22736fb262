//! Read-only access to the readings collection of the document store.

mod auth;
mod client;
mod error;
mod model;

pub use client::DocumentStoreClient;
pub use error::StoreError;

use crate::readings::RawRecord;

/// Source of raw reading documents for one report run.
pub trait ReadingSource {
    /// Returns every record in the collection. An empty collection is `Ok(vec![])`.
    async fn fetch_all_readings(&self) -> Result<Vec<RawRecord>, StoreError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{ReadingSource, StoreError};
    use crate::readings::RawRecord;

    pub(crate) struct MockReadingSource {
        result: Result<Vec<RawRecord>, String>,
        calls: AtomicUsize,
    }

    impl MockReadingSource {
        pub(crate) fn with_records(records: Vec<RawRecord>) -> Self {
            Self {
                result: Ok(records),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn unavailable(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ReadingSource for MockReadingSource {
        async fn fetch_all_readings(&self) -> Result<Vec<RawRecord>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(records) => Ok(records.clone()),
                Err(message) => Err(StoreError::Unavailable {
                    operation: "query",
                    message: message.clone(),
                }),
            }
        }
    }
}
