use thiserror::Error;

use crate::state::FieldCategory;

/// Errors raised while loading the catalogue manifest or a component fragment.
///
/// Callers are expected to recover locally: an unreadable manifest becomes an
/// empty catalogue and an unreadable fragment becomes an inline error card.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The asset could not be fetched (missing file, failed request).
    #[error("Failed to load {path}: {message}")]
    Unreachable {
        /// Asset path relative to the published root.
        path: String,
        /// Reason reported by the source.
        message: String,
    },
    /// The asset was fetched but could not be decoded.
    #[error("Malformed {path}: {message}")]
    Malformed {
        /// Asset path relative to the published root.
        path: String,
        /// Decoder message.
        message: String,
    },
    /// A component schema breaks one of the field invariants.
    #[error("Invalid schema for component '{component}': {message}")]
    InvalidSchema {
        /// Component id.
        component: String,
        /// Which invariant failed.
        message: String,
    },
    /// IO error while reading from disk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Create an unreachable-asset error.
    pub fn unreachable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreachable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-asset error.
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-schema error.
    pub fn invalid_schema(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by strict state updates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The control refers to a key the component does not declare.
    #[error("Unknown {category} field '{key}'")]
    UnknownField {
        /// Namespace the key was looked up in.
        category: FieldCategory,
        /// The offending key.
        key: String,
    },
    /// The value does not fit the field's declared type.
    #[error("Field '{key}' expects {expected}")]
    TypeMismatch {
        /// Field key.
        key: String,
        /// Human readable description of the accepted values.
        expected: String,
    },
}

/// Errors raised while projecting state onto markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The fragment has no element to mutate.
    #[error("Markup fragment has no root element")]
    NoRoot,
}

/// Errors raised while parsing an override selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector or empty alternative in a selector list.
    #[error("Empty selector")]
    Empty,
    /// Character that cannot start or continue a simple selector.
    #[error("Unexpected '{found}' at offset {offset} in selector '{selector}'")]
    Unexpected {
        /// Full selector text.
        selector: String,
        /// Offending character.
        found: char,
        /// Byte offset of the character.
        offset: usize,
    },
    /// Attribute selector missing its closing bracket.
    #[error("Unterminated attribute selector in '{0}'")]
    UnterminatedAttribute(String),
}

/// Non-fatal problem found while loading a catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Component or page id the warning is about.
    pub item: String,
    /// Warning message.
    pub message: String,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item, self.message)
    }
}

/// Collection of load warnings.
#[derive(Debug, Clone, Default)]
pub struct LoadDiagnostics {
    /// Warnings in the order they were raised.
    pub warnings: Vec<LoadWarning>,
}

impl LoadDiagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning about an item.
    pub fn warn(&mut self, item: impl Into<String>, message: impl Into<String>) {
        let warning = LoadWarning {
            item: item.into(),
            message: message.into(),
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Check if any warnings were recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of recorded warnings.
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
