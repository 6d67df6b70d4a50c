use bookstock_contract::{AddressError, ResourceKind};

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Addressing error: {0}")]
    Address(#[from] AddressError),

    #[error("Operation {operation} not supported on a {kind:?} address")]
    UnsupportedOperation {
        operation: &'static str,
        kind: ResourceKind,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] garde::Report),

    #[error("Store error: {0}")]
    Store(#[from] bookstock_dal::Error),
}

impl ProviderError {
    /// True for failures raised before the store was invoked.
    pub fn is_addressing(&self) -> bool {
        matches!(
            self,
            ProviderError::Address(_) | ProviderError::UnsupportedOperation { .. }
        )
    }
}
