use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Errors raised while decoding or interpreting data from the ledger and the
/// membership index
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TontineError {
    // ========================================================================
    // Taxonomy Violations
    // ========================================================================

    /// Overall status code outside the known vocabulary
    #[error("Unknown overall status code {0}")]
    UnknownOverallStatus(u8),

    /// Member status code outside the known vocabulary
    #[error("Unknown member status code {0}")]
    UnknownMemberStatus(u8),

    /// Membership index lifecycle outside the known vocabulary
    #[error("Unexpected tontine state {0}")]
    UnknownBasicState(i64),

    /// Fallback policy outside the known vocabulary
    #[error("Unknown fallback policy {0}")]
    UnknownFallbackPolicy(u8),

    // ========================================================================
    // Data Errors
    // ========================================================================

    /// Resource JSON did not have the expected shape
    #[error("Invalid resource data in '{field}': {reason}")]
    InvalidResourceData { field: String, reason: String },

    /// Account address could not be parsed
    #[error("Invalid account address '{0}'")]
    InvalidAddress(String),

    /// Amount string could not be parsed
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
}

impl TontineError {
    /// Create an invalid resource data error
    pub fn invalid_resource(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidResourceData {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error means an external source used a code this client
    /// does not know about
    pub fn is_taxonomy_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownOverallStatus(_)
                | Self::UnknownMemberStatus(_)
                | Self::UnknownBasicState(_)
                | Self::UnknownFallbackPolicy(_)
        )
    }
}
