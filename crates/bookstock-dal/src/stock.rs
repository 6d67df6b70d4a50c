//! Quantity arithmetic shared by the editor stepper and the sell-one action.

use serde::{Deserialize, Serialize};

/// Result of a sell-one action on a stored book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleOutcome {
    Sold { remaining: i64 },
    OutOfStock,
}

/// Editor "+" stepper: an empty quantity field starts counting at 1.
pub fn increment(current: Option<i64>) -> i64 {
    match current {
        Some(quantity) => quantity + 1,
        None => 1,
    }
}

/// Editor "-" stepper: refuses to go below 0. `None` reports the boundary,
/// nothing negative is ever produced.
pub fn decrement(current: i64) -> Option<i64> {
    if current > 0 {
        Some(current - 1)
    } else {
        None
    }
}
