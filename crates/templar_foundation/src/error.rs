//! Error types for the Templar system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every kind is fatal for the operation that raised it; nothing in the
//! loader retries.

use std::fmt;

use thiserror::Error;

/// The main error type for Templar operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Appends a frame to this error's context, creating it if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates a malformed record error.
    #[must_use]
    pub fn malformed(namespace: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRecord {
            namespace: namespace.into(),
            message: message.into(),
        })
    }

    /// Creates a dangling `copy-from` reference error.
    #[must_use]
    pub fn dangling_reference(
        namespace: impl Into<String>,
        child: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::DanglingReference {
            namespace: namespace.into(),
            child: child.into(),
            parent: parent.into(),
        })
    }

    /// Creates a cyclic inheritance error from the offending path.
    #[must_use]
    pub fn cyclic_inheritance(namespace: impl Into<String>, path: Vec<String>) -> Self {
        Self::new(ErrorKind::CyclicInheritance {
            namespace: namespace.into(),
            path,
        })
    }

    /// Creates a modifier type mismatch error.
    #[must_use]
    pub fn modifier_mismatch(
        field: impl Into<String>,
        modifier: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ModifierTypeMismatch {
            field: field.into(),
            modifier: modifier.into(),
            kind: kind.into(),
        })
    }

    /// Creates a field type mismatch error.
    #[must_use]
    pub fn field_type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::FieldTypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates an invalid field value error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFieldValue {
            field: field.into(),
            message: message.into(),
        })
    }

    /// Creates a missing required field error.
    #[must_use]
    pub fn missing_field(template_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingRequiredField {
            template_type: template_type.into(),
            field: field.into(),
        })
    }

    /// Creates an unknown template error.
    #[must_use]
    pub fn unknown_template(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownTemplate {
            namespace: namespace.into(),
            id: id.into(),
        })
    }

    /// Creates an unknown namespace error.
    #[must_use]
    pub fn unknown_namespace(namespace: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownNamespace(namespace.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A record's identity fields are missing or have the wrong type.
    #[error("malformed record in {namespace}: {message}")]
    MalformedRecord {
        /// Namespace the record was filed under.
        namespace: String,
        /// What was wrong with the record.
        message: String,
    },

    /// A `copy-from` target is neither an abstract nor a concrete record.
    #[error("dangling copy-from in {namespace}: '{child}' copies from unknown '{parent}'")]
    DanglingReference {
        /// Namespace of the chain.
        namespace: String,
        /// Identifier of the record holding the reference.
        child: String,
        /// The identifier that could not be found.
        parent: String,
    },

    /// A `copy-from` chain revisits an identifier.
    #[error("cyclic inheritance in {namespace}: {}", .path.join(" -> "))]
    CyclicInheritance {
        /// Namespace of the chain.
        namespace: String,
        /// The identifiers forming the cycle, ending with the repeated one.
        path: Vec<String>,
    },

    /// A `copy-from` chain is longer than the configured limit.
    #[error("inheritance chain for '{id}' in {namespace} exceeds {limit} ancestors")]
    ChainTooDeep {
        /// Namespace of the chain.
        namespace: String,
        /// Identifier the walk started from.
        id: String,
        /// The configured limit.
        limit: usize,
    },

    /// A merge modifier was applied to an incompatible field.
    #[error("cannot apply '{modifier}' to field '{field}' of kind {kind}")]
    ModifierTypeMismatch {
        /// The field name.
        field: String,
        /// The attempted modifier.
        modifier: String,
        /// The field's declared kind.
        kind: String,
    },

    /// A merged value does not fit the field's declared kind.
    #[error("field '{field}' expects {expected}, got {actual}")]
    FieldTypeMismatch {
        /// The field name.
        field: String,
        /// The declared kind.
        expected: String,
        /// The kind of the value encountered.
        actual: String,
    },

    /// A fixed-arity list field has the wrong number of elements.
    #[error("field '{field}' expects {expected} elements, got {actual}")]
    ArityMismatch {
        /// The field name.
        field: String,
        /// Declared element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// A field value is structurally valid but semantically unusable.
    #[error("invalid value for field '{field}': {message}")]
    InvalidFieldValue {
        /// The field name.
        field: String,
        /// What was wrong.
        message: String,
    },

    /// A required field is absent from the whole ancestor chain.
    #[error("{template_type} is missing required field '{field}'")]
    MissingRequiredField {
        /// The schema type being materialized.
        template_type: String,
        /// The missing field.
        field: String,
    },

    /// Two records claim the same identifier in one namespace.
    #[error("duplicate identifier '{id}' in {namespace}")]
    DuplicateIdentifier {
        /// Namespace of the collision.
        namespace: String,
        /// The repeated identifier.
        id: String,
    },

    /// A lookup named an identifier with no backing record.
    #[error("unable to retrieve template '{id}' in {namespace}")]
    UnknownTemplate {
        /// Namespace searched.
        namespace: String,
        /// The requested identifier.
        id: String,
    },

    /// A namespace was requested that is not configured.
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    /// A record's `type` tag maps to no namespace.
    #[error("unknown type tag: {0}")]
    UnknownTypeTag(String),

    /// Saved instance data does not match the live template binding.
    #[error(
        "rehydration mismatch: expected {expected_type} '{expected_id}', found {found_type} '{found_id}'"
    )]
    RehydrationMismatch {
        /// Type name of the live binding.
        expected_type: String,
        /// Template identifier of the live binding.
        expected_id: String,
        /// Type name stored in the save data.
        found_type: String,
        /// Template identifier stored in the save data.
        found_id: String,
    },

    /// The instance serial counter has no values left.
    #[error("serial counter exhausted at {0}")]
    SerialsExhausted(u64),

    /// Record text could not be parsed.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Namespace being loaded.
    pub namespace: Option<String>,
    /// Origin of the record (usually a file name).
    pub source: Option<String>,
    /// Resolution frames, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the record origin.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a resolution frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "in {namespace}")?;
        }
        if let Some(source) = &self.source {
            write!(f, " from {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while resolving {frame}")?;
            }
        }
        Ok(())
    }
}
