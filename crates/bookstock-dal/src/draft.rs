//! Editor-side validation: turns free-form form fields into a create payload,
//! or a failure the caller surfaces to the user. The store itself does not
//! apply these rules.

use bookstock_contract::BookType;
use serde::{Deserialize, Serialize};

use crate::book::{CreateBook, NO_IMAGE_URI};

/// In-progress form state, every field as typed by the user.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub type_code: i64,
    pub price: String,
    pub quantity: String,
    pub supplier: String,
    pub supplier_phone: String,
    pub supplier_email: String,
    pub image: Option<String>,
}

impl BookDraft {
    /// True when nothing was entered at all. Callers use this to skip the
    /// save entirely instead of reporting a validation failure.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.author.trim().is_empty()
            && self.type_code == BookType::Unknown.code()
            && self.price.trim().is_empty()
            && self.quantity.trim().is_empty()
            && self.supplier.trim().is_empty()
            && self.supplier_phone.trim().is_empty()
            && self.supplier_email.trim().is_empty()
            && self.image.is_none()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("title is required")]
    MissingTitle,

    #[error("price must be a positive number")]
    InvalidPrice,

    #[error("supplier email is required")]
    MissingEmail,

    #[error("invalid book type code: {0}")]
    InvalidType(i64),

    #[error("quantity must be a non-negative number")]
    InvalidQuantity,
}

/// Non-blocking issues: the save proceeds, the caller may warn the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftWarning {
    MissingImage,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedBook {
    pub payload: CreateBook,
    pub warnings: Vec<DraftWarning>,
}

fn optional(field: &str) -> Option<String> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validates a draft and builds the payload to persist. Checks run in the
/// editor's order: title, price, supplier email, then type and quantity.
/// A missing image is a warning, not a failure; the placeholder reference is
/// substituted.
pub fn validate_and_build(draft: &BookDraft) -> Result<ValidatedBook, DraftError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(DraftError::MissingTitle);
    }

    let price: i64 = draft
        .price
        .trim()
        .parse()
        .map_err(|_| DraftError::InvalidPrice)?;
    if price <= 0 {
        return Err(DraftError::InvalidPrice);
    }

    let email = draft.supplier_email.trim();
    if email.is_empty() {
        return Err(DraftError::MissingEmail);
    }

    let book_type =
        BookType::from_code(draft.type_code).ok_or(DraftError::InvalidType(draft.type_code))?;

    // Absent quantity defaults to 0, same as the stored column default.
    let quantity = match draft.quantity.trim() {
        "" => 0,
        raw => raw.parse::<i64>().map_err(|_| DraftError::InvalidQuantity)?,
    };
    if quantity < 0 {
        return Err(DraftError::InvalidQuantity);
    }

    let mut warnings = Vec::new();
    let image = match draft.image.as_deref().map(str::trim) {
        Some(uri) if !uri.is_empty() => uri.to_string(),
        _ => {
            warnings.push(DraftWarning::MissingImage);
            NO_IMAGE_URI.to_string()
        }
    };

    Ok(ValidatedBook {
        payload: CreateBook {
            title: title.to_string(),
            author: optional(&draft.author),
            book_type,
            price,
            quantity: Some(quantity),
            supplier: optional(&draft.supplier),
            supplier_phone: optional(&draft.supplier_phone),
            supplier_email: Some(email.to_string()),
            image: Some(image),
        },
        warnings,
    })
}
