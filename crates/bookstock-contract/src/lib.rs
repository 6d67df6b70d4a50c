//! Contract for the book inventory store: resource addressing, persisted
//! column names and the book type enumeration. Everything a caller needs to
//! talk to the store without depending on its implementation.

pub mod address;

pub use address::{AddressError, BookAddress, ResourceKind};

use serde::{Deserialize, Serialize};

/// Authority naming the whole inventory provider, the base of every address.
pub const AUTHORITY: &str = "bookstock.inventory";

/// Scheme of all inventory addresses.
pub const SCHEME: &str = "content";

/// Path segment for the book collection. `content://bookstock.inventory/books`
/// addresses all books, with an appended numeric id a single one.
pub const PATH_BOOKS: &str = "books";

/// Kind string for a collection address (a directory of records).
pub const CONTENT_LIST_TYPE: &str = "vnd.bookstock.cursor.dir/bookstock.inventory/books";

/// Kind string for an item address (a single record).
pub const CONTENT_ITEM_TYPE: &str = "vnd.bookstock.cursor.item/bookstock.inventory/books";

/// Persisted column names of the books table.
pub mod columns {
    pub const ID: &str = "_id";
    pub const TITLE: &str = "title";
    pub const AUTHOR: &str = "author";
    pub const TYPE: &str = "type";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
    pub const SUPPLIER: &str = "supplier";
    pub const SUPPLIER_PHONE: &str = "telephone_supplier";
    pub const SUPPLIER_EMAIL: &str = "email_supplier";
    pub const IMAGE: &str = "image";

    pub const ALL: &[&str] = &[
        ID,
        TITLE,
        AUTHOR,
        TYPE,
        PRICE,
        QUANTITY,
        SUPPLIER,
        SUPPLIER_PHONE,
        SUPPLIER_EMAIL,
        IMAGE,
    ];
}

/// Book type as stored in the `type` column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum BookType {
    #[default]
    Unknown,
    Novel,
    Technical,
}

impl BookType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(BookType::Unknown),
            1 => Some(BookType::Novel),
            2 => Some(BookType::Technical),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            BookType::Unknown => 0,
            BookType::Novel => 1,
            BookType::Technical => 2,
        }
    }
}

impl TryFrom<i64> for BookType {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        BookType::from_code(code).ok_or_else(|| format!("invalid book type code {code}"))
    }
}

impl From<BookType> for i64 {
    fn from(value: BookType) -> Self {
        value.code()
    }
}

/// Sole authority on type-code membership: true exactly for {0, 1, 2}.
pub fn is_valid_type(code: i64) -> bool {
    BookType::from_code(code).is_some()
}
