use thiserror::Error;

/// Errors raised when reading the markup currently shown by a preview host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// The embedded document has not signalled load for the current content.
    #[error("Preview has not finished loading")]
    NotLoaded,
    /// The embedded document loaded but has no content.
    #[error("Preview loaded without content")]
    EmptyContent,
    /// A component preview document lacks the component's root element.
    #[error("Component preview has no root element")]
    NoComponentRoot,
}

/// Errors raised while handing a preview to the conformance collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConformanceError {
    /// The collaborator failed (network error, audit crash).
    #[error("Conformance check failed: {0}")]
    Collaborator(String),
    /// No markup snapshot was available.
    #[error(transparent)]
    Preview(#[from] PreviewError),
}

/// Errors raised while opening the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    /// The query names no item.
    #[error("No item specified")]
    MissingItem,
    /// The catalogue has no item with that id.
    #[error("{kind} \"{id}\" not found")]
    NotFound {
        /// "Component" or "Page".
        kind: &'static str,
        /// Requested id.
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = DetailError::NotFound {
            kind: "Component",
            id: "tooltip".to_string(),
        };
        assert_eq!(err.to_string(), "Component \"tooltip\" not found");

        let err: ConformanceError = PreviewError::NotLoaded.into();
        assert_eq!(err.to_string(), "Preview has not finished loading");
    }
}
