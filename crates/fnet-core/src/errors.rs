//! Structured error types shared across the FNet crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FnetError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (node keys, sizes, offending values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the financial network engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FnetError {
    /// Malformed exposure matrix or node table at construction time.
    #[error("invalid topology: {0}")]
    InvalidTopology(ErrorInfo),
    /// Reference to a node key that does not exist in the graph.
    #[error("unknown node: {0}")]
    UnknownNode(ErrorInfo),
    /// Out-of-range argument (distress level, iteration cap, relevance value).
    #[error("invalid parameter: {0}")]
    InvalidParameter(ErrorInfo),
    /// Relevance total is zero or negative, so the normalized impact is undefined.
    #[error("degenerate relevance: {0}")]
    DegenerateRelevance(ErrorInfo),
    /// Serialization, configuration and IO errors at the crate boundary.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl FnetError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FnetError::InvalidTopology(info)
            | FnetError::UnknownNode(info)
            | FnetError::InvalidParameter(info)
            | FnetError::DegenerateRelevance(info)
            | FnetError::Serde(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Attaches a context entry to the payload, keeping the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            FnetError::InvalidTopology(info) => {
                FnetError::InvalidTopology(info.with_context(key, value))
            }
            FnetError::UnknownNode(info) => FnetError::UnknownNode(info.with_context(key, value)),
            FnetError::InvalidParameter(info) => {
                FnetError::InvalidParameter(info.with_context(key, value))
            }
            FnetError::DegenerateRelevance(info) => {
                FnetError::DegenerateRelevance(info.with_context(key, value))
            }
            FnetError::Serde(info) => FnetError::Serde(info.with_context(key, value)),
        }
    }

    /// Attaches a remediation hint to the payload, keeping the error family.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            FnetError::InvalidTopology(info) => FnetError::InvalidTopology(info.with_hint(hint)),
            FnetError::UnknownNode(info) => FnetError::UnknownNode(info.with_hint(hint)),
            FnetError::InvalidParameter(info) => FnetError::InvalidParameter(info.with_hint(hint)),
            FnetError::DegenerateRelevance(info) => {
                FnetError::DegenerateRelevance(info.with_hint(hint))
            }
            FnetError::Serde(info) => FnetError::Serde(info.with_hint(hint)),
        }
    }

    /// Builds an [`FnetError::InvalidTopology`] error.
    pub fn topology(code: impl Into<String>, message: impl Into<String>) -> Self {
        FnetError::InvalidTopology(ErrorInfo::new(code, message))
    }

    /// Builds an [`FnetError::UnknownNode`] error for the given key.
    pub fn unknown_node(key: impl ToString) -> Self {
        FnetError::UnknownNode(
            ErrorInfo::new("unknown-node", "node does not exist").with_context("node", key),
        )
    }

    /// Builds an [`FnetError::InvalidParameter`] error.
    pub fn parameter(code: impl Into<String>, message: impl Into<String>) -> Self {
        FnetError::InvalidParameter(ErrorInfo::new(code, message))
    }

    /// Builds an [`FnetError::DegenerateRelevance`] error.
    pub fn degenerate_relevance(total: f64) -> Self {
        FnetError::DegenerateRelevance(
            ErrorInfo::new(
                "degenerate-relevance",
                "relevance total must be strictly positive",
            )
            .with_context("total", total),
        )
    }

    /// Builds an [`FnetError::Serde`] error from any displayable cause.
    pub fn serde(code: impl Into<String>, err: impl ToString) -> Self {
        FnetError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}
