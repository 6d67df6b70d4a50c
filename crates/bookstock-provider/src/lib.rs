//! Router between resource addresses and book store operations. Enforces
//! which operation is valid on which kind of address, validates payloads at
//! the boundary and publishes a change event after every successful write.

pub mod error;
pub mod events;

use bookstock_contract::BookAddress;
use bookstock_dal::book::BookRepository;
use bookstock_dal::{CreateBook, ListingParams, Pool, ProjectedRow, Projection, SaleOutcome};
use garde::Validate as _;
use tokio::sync::broadcast;

pub use error::{ProviderError, Result};
pub use events::{ChangeEvent, ChangeNotifier, ChangeScope};

pub struct BookProvider {
    repository: BookRepository,
    notifier: ChangeNotifier,
}

impl BookProvider {
    pub fn new(pool: Pool) -> Self {
        Self {
            repository: BookRepository::new(pool),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Subscribes to change events published by this provider instance.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.notifier.subscribe()
    }

    /// Kind string of the addressed resource.
    pub fn resource_type(&self, address: &BookAddress) -> &'static str {
        address.content_type()
    }

    /// Queries the addressed resource: every record for a collection address,
    /// zero or one row for an item address. Columns come back projected to
    /// the requested subset.
    pub async fn query(
        &self,
        address: &BookAddress,
        projection: &Projection,
        params: ListingParams,
    ) -> Result<Vec<ProjectedRow>> {
        match *address {
            BookAddress::Collection => {
                Ok(self.repository.list_projected(projection, params).await?)
            }
            BookAddress::Item(id) => Ok(self
                .repository
                .get_projected(id, projection)
                .await?
                .into_iter()
                .collect()),
        }
    }

    /// Inserts a new book; valid only against the collection address.
    /// Returns the address of the created record.
    pub async fn insert(&self, address: &BookAddress, payload: CreateBook) -> Result<BookAddress> {
        if let BookAddress::Item(_) = address {
            return Err(ProviderError::UnsupportedOperation {
                operation: "insert",
                kind: address.kind(),
            });
        }
        payload.validate()?;
        let record = self.repository.create(payload).await?;
        self.notifier.publish(ChangeScope::Collection);
        Ok(BookAddress::Item(record.id))
    }

    /// Overwrites the addressed record; valid only against an item address.
    /// Returns the number of rows affected (always 1 on success).
    pub async fn update(&self, address: &BookAddress, payload: CreateBook) -> Result<u64> {
        let BookAddress::Item(id) = address else {
            return Err(ProviderError::UnsupportedOperation {
                operation: "update",
                kind: address.kind(),
            });
        };
        payload.validate()?;
        self.repository.update(*id, payload).await?;
        self.notifier.publish(ChangeScope::Item(*id));
        Ok(1)
    }

    /// Deletes the addressed record, or every record for the collection
    /// address. Returns rows affected; 0 means nothing matched.
    pub async fn delete(&self, address: &BookAddress) -> Result<u64> {
        match *address {
            BookAddress::Item(id) => {
                let deleted = self.repository.delete(id).await?;
                if deleted > 0 {
                    self.notifier.publish(ChangeScope::Item(id));
                }
                Ok(deleted)
            }
            BookAddress::Collection => {
                let deleted = self.repository.delete_all().await?;
                if deleted > 0 {
                    self.notifier.publish(ChangeScope::Collection);
                }
                Ok(deleted)
            }
        }
    }

    /// List-row "sell one" action; valid only against an item address.
    pub async fn sell_one(&self, address: &BookAddress) -> Result<SaleOutcome> {
        let BookAddress::Item(id) = address else {
            return Err(ProviderError::UnsupportedOperation {
                operation: "sell_one",
                kind: address.kind(),
            });
        };
        let outcome = self.repository.sell_one(*id).await?;
        if let SaleOutcome::Sold { .. } = outcome {
            self.notifier.publish(ChangeScope::Item(*id));
        }
        Ok(outcome)
    }
}
