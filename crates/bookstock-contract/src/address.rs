use std::fmt::Display;
use std::str::FromStr;

use url::Url;

use crate::{AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, PATH_BOOKS, SCHEME};

/// Classification of an address: a directory of records or a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Collection,
    Item,
}

impl ResourceKind {
    /// MIME-style kind string callers use to interpret a result set.
    pub fn content_type(&self) -> &'static str {
        match self {
            ResourceKind::Collection => CONTENT_LIST_TYPE,
            ResourceKind::Item => CONTENT_ITEM_TYPE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("malformed address: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("unknown scheme: {0}")]
    UnknownScheme(String),

    #[error("unknown authority: {0}")]
    UnknownAuthority(String),

    #[error("unsupported path: {0}")]
    UnsupportedPath(String),

    #[error("invalid record id: {0}")]
    InvalidId(String),
}

/// A resolved inventory address, either the whole book collection or one
/// record by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAddress {
    Collection,
    Item(i64),
}

impl BookAddress {
    pub fn item(id: i64) -> Self {
        BookAddress::Item(id)
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            BookAddress::Collection => ResourceKind::Collection,
            BookAddress::Item(_) => ResourceKind::Item,
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.kind().content_type()
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            BookAddress::Collection => None,
            BookAddress::Item(id) => Some(*id),
        }
    }

    /// Parses a textual address, rejecting anything outside the contract.
    /// A trailing slash on the collection path is accepted.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let url = Url::parse(input)?;
        if url.scheme() != SCHEME {
            return Err(AddressError::UnknownScheme(url.scheme().to_string()));
        }
        if url.host_str() != Some(AUTHORITY) {
            return Err(AddressError::UnknownAuthority(
                url.host_str().unwrap_or_default().to_string(),
            ));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [PATH_BOOKS] => Ok(BookAddress::Collection),
            [PATH_BOOKS, id] => id
                .parse::<i64>()
                .map(BookAddress::Item)
                .map_err(|_| AddressError::InvalidId(id.to_string())),
            _ => Err(AddressError::UnsupportedPath(url.path().to_string())),
        }
    }
}

impl Display for BookAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookAddress::Collection => {
                write!(f, "{SCHEME}://{AUTHORITY}/{PATH_BOOKS}")
            }
            BookAddress::Item(id) => {
                write!(f, "{SCHEME}://{AUTHORITY}/{PATH_BOOKS}/{id}")
            }
        }
    }
}

impl FromStr for BookAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookAddress::parse(s)
    }
}
