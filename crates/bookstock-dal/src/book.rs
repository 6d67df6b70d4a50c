use bookstock_contract::{columns, BookType};
use futures::TryStreamExt as _;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row as _};
use tracing::debug;

use crate::projection::{ProjectedRow, Projection};
use crate::stock::SaleOutcome;
use crate::{error::Result, ChosenRow, Error, ListingParams};

/// Placeholder image reference stored when no image was supplied.
pub const NO_IMAGE_URI: &str = "resource://bookstock/drawable/no_image";

/// Columns accepted in an ORDER BY, checked before any SQL is assembled.
pub const VALID_ORDER_FIELDS: &[&str] = &[
    columns::ID,
    columns::TITLE,
    columns::AUTHOR,
    columns::TYPE,
    columns::PRICE,
    columns::QUANTITY,
];

/// Payload for creating a book, also used for full-overwrite updates.
/// Validated with garde at the provider boundary; the store persists what it
/// is given.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Validate)]
pub struct CreateBook {
    #[garde(length(min = 1, max = 511))]
    pub title: String,
    #[garde(length(max = 255))]
    pub author: Option<String>,
    #[garde(skip)]
    pub book_type: BookType,
    #[garde(skip)]
    pub price: i64,
    #[garde(range(min = 0))]
    pub quantity: Option<i64>,
    #[garde(length(max = 255))]
    pub supplier: Option<String>,
    #[garde(length(max = 64))]
    pub supplier_phone: Option<String>,
    #[garde(length(max = 255))]
    pub supplier_email: Option<String>,
    #[garde(length(min = 1, max = 1023))]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub book_type: BookType,
    pub price: Option<i64>,
    pub quantity: i64,
    pub supplier: Option<String>,
    pub supplier_phone: Option<String>,
    pub supplier_email: Option<String>,
    pub image: Option<String>,
}

impl sqlx::FromRow<'_, ChosenRow> for BookRecord {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let code: i64 = row.try_get(columns::TYPE)?;
        let book_type = BookType::from_code(code).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: columns::TYPE.to_string(),
            source: format!("invalid book type code {code}").into(),
        })?;
        Ok(BookRecord {
            id: row.try_get(columns::ID)?,
            title: row.try_get(columns::TITLE)?,
            author: row.try_get(columns::AUTHOR)?,
            book_type,
            price: row.try_get(columns::PRICE)?,
            quantity: row.try_get(columns::QUANTITY)?,
            supplier: row.try_get(columns::SUPPLIER)?,
            supplier_phone: row.try_get(columns::SUPPLIER_PHONE)?,
            supplier_email: row.try_get(columns::SUPPLIER_EMAIL)?,
            image: row.try_get(columns::IMAGE)?,
        })
    }
}

const SELECT_ALL: &str = "SELECT _id, title, author, type, price, quantity, \
     supplier, telephone_supplier, email_supplier, image FROM books";

pub type BookRepository = BookRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct BookRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> BookRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Inserts a new book and returns it with its assigned id. Quantity
    /// defaults to 0 and the image to the placeholder when absent.
    pub async fn create(&self, payload: CreateBook) -> Result<BookRecord> {
        let result = sqlx::query(
            "INSERT INTO books (title, author, type, price, quantity, \
             supplier, telephone_supplier, email_supplier, image) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(payload.book_type.code())
        .bind(payload.price)
        .bind(payload.quantity.unwrap_or(0))
        .bind(&payload.supplier)
        .bind(&payload.supplier_phone)
        .bind(&payload.supplier_email)
        .bind(payload.image.as_deref().unwrap_or(NO_IMAGE_URI))
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<BookRecord> {
        let sql = format!("{SELECT_ALL} WHERE _id = ?");
        sqlx::query_as::<_, BookRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or(Error::RecordNotFound(id))
    }

    /// Lists books in storage order unless an explicit ordering is requested.
    /// Each call re-runs the underlying query.
    pub async fn list(&self, params: ListingParams) -> Result<Vec<BookRecord>> {
        let ordering = params.ordering(VALID_ORDER_FIELDS)?;
        let mut sql = String::from(SELECT_ALL);
        if !ordering.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&ordering);
        }
        sql.push_str(" LIMIT ? OFFSET ?");
        let records = sqlx::query_as::<_, BookRecord>(&sql)
            .bind(params.limit)
            .bind(params.offset)
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    /// Lists books projected to the requested column subset.
    pub async fn list_projected(
        &self,
        projection: &Projection,
        params: ListingParams,
    ) -> Result<Vec<ProjectedRow>> {
        let ordering = params.ordering(VALID_ORDER_FIELDS)?;
        let mut sql = format!("SELECT {} FROM books", projection.select_clause());
        if !ordering.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&ordering);
        }
        sql.push_str(" LIMIT ? OFFSET ?");
        let rows = sqlx::query(&sql)
            .bind(params.limit)
            .bind(params.offset)
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        rows.iter()
            .map(|row| projection.decode_row(row).map_err(Error::from))
            .collect()
    }

    /// Fetches zero or one projected row for the given id.
    pub async fn get_projected(
        &self,
        id: i64,
        projection: &Projection,
    ) -> Result<Option<ProjectedRow>> {
        let sql = format!(
            "SELECT {} FROM books WHERE _id = ?",
            projection.select_clause()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?;
        row.map(|row| projection.decode_row(&row).map_err(Error::from))
            .transpose()
    }

    /// Overwrites all mutable fields of a book. Last write wins.
    pub async fn update(&self, id: i64, payload: CreateBook) -> Result<BookRecord> {
        let result = sqlx::query(
            "UPDATE books SET title = ?, author = ?, type = ?, price = ?, \
             quantity = ?, supplier = ?, telephone_supplier = ?, \
             email_supplier = ?, image = ? WHERE _id = ?",
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(payload.book_type.code())
        .bind(payload.price)
        .bind(payload.quantity.unwrap_or(0))
        .bind(&payload.supplier)
        .bind(&payload.supplier_phone)
        .bind(&payload.supplier_email)
        .bind(payload.image.as_deref().unwrap_or(NO_IMAGE_URI))
        .bind(id)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound(id))
        } else {
            self.get(id).await
        }
    }

    /// Partial update of the quantity column only.
    pub async fn update_quantity(&self, id: i64, quantity: i64) -> Result<BookRecord> {
        let result = sqlx::query("UPDATE books SET quantity = ? WHERE _id = ?")
            .bind(quantity)
            .bind(id)
            .execute(&self.executor)
            .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound(id))
        } else {
            self.get(id).await
        }
    }

    /// Decrements stock by one. At quantity 0 nothing is mutated and
    /// `OutOfStock` is reported instead of underflowing. The guard in the
    /// UPDATE keeps the floor even if another writer drained stock between
    /// the read and the write.
    pub async fn sell_one(&self, id: i64) -> Result<SaleOutcome> {
        let book = self.get(id).await?;
        if book.quantity == 0 {
            debug!(id, "book out of stock, decrement refused");
            return Ok(SaleOutcome::OutOfStock);
        }
        let result = sqlx::query("UPDATE books SET quantity = quantity - 1 WHERE _id = ? AND quantity > 0")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if result.rows_affected() == 0 {
            debug!(id, "book out of stock, decrement refused");
            Ok(SaleOutcome::OutOfStock)
        } else {
            let remaining = self.get(id).await?.quantity;
            Ok(SaleOutcome::Sold { remaining })
        }
    }

    /// Deletes one book; returns rows affected (0 when no such id).
    pub async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM books WHERE _id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Deletes every book; returns the number of rows that existed.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM books")
            .execute(&self.executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM books")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }
}
