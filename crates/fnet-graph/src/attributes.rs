use std::fmt;
use std::str::FromStr;

use fnet_core::FnetError;
use serde::{Deserialize, Serialize};

/// Names of the attributes stored on every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeAttribute {
    /// Display name of the institution.
    Name,
    /// Trading currency.
    Currency,
    /// Benchmark index the institution belongs to.
    Benchmark,
    /// Economic relevance (market capitalization in a common currency).
    Relevance,
    /// DebtRank centrality written by the centrality pass.
    Centrality,
    /// Final distress level written by a shock what-if.
    InducedStress,
}

impl NodeAttribute {
    /// All attributes in declaration order.
    pub const ALL: [NodeAttribute; 6] = [
        NodeAttribute::Name,
        NodeAttribute::Currency,
        NodeAttribute::Benchmark,
        NodeAttribute::Relevance,
        NodeAttribute::Centrality,
        NodeAttribute::InducedStress,
    ];

    /// Returns the canonical label of the attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeAttribute::Name => "name",
            NodeAttribute::Currency => "currency",
            NodeAttribute::Benchmark => "benchmark",
            NodeAttribute::Relevance => "relevance",
            NodeAttribute::Centrality => "centrality",
            NodeAttribute::InducedStress => "induced_stress",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            NodeAttribute::Relevance | NodeAttribute::Centrality | NodeAttribute::InducedStress
        )
    }

    /// Checks that `value` can be stored in this attribute.
    pub fn check(&self, value: &AttributeValue) -> Result<(), FnetError> {
        let ok = match (self, value) {
            (NodeAttribute::Name, AttributeValue::Text(_)) => true,
            (NodeAttribute::Name, _) => false,
            (attr, AttributeValue::Number(_)) => attr.is_numeric(),
            (attr, AttributeValue::Text(_)) => !attr.is_numeric(),
            (_, AttributeValue::Absent) => true,
        };
        if ok {
            Ok(())
        } else {
            Err(
                FnetError::parameter("attribute-type", "value does not fit the attribute")
                    .with_context("attribute", self.as_str())
                    .with_context("value", value),
            )
        }
    }
}

impl fmt::Display for NodeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeAttribute {
    type Err = FnetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(attribute) = NodeAttribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == value)
        {
            return Ok(attribute);
        }
        match value {
            "mktCap" | "market_cap" => Ok(NodeAttribute::Relevance),
            "debtRankCentrality" => Ok(NodeAttribute::Centrality),
            "inducedStress" => Ok(NodeAttribute::InducedStress),
            other => Err(
                FnetError::parameter("unknown-attribute", "unrecognised node attribute")
                    .with_context("attribute", other),
            ),
        }
    }
}

/// Value read from or written to a node attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Numeric attribute value.
    Number(f64),
    /// Textual attribute value.
    Text(String),
    /// The attribute is not set.
    Absent,
}

impl AttributeValue {
    /// Returns the numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the textual payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(value) => write!(f, "{value}"),
            AttributeValue::Text(value) => f.write_str(value),
            AttributeValue::Absent => f.write_str("<absent>"),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Absent)
    }
}

/// Fixed attribute record stored on every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Display name of the institution.
    pub name: String,
    /// Trading currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Benchmark index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
    /// Economic relevance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    /// DebtRank centrality, populated only after a centrality pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centrality: Option<f64>,
    /// Final distress level of the latest what-if; never persisted.
    #[serde(skip)]
    pub induced_stress: Option<f64>,
}

impl NodeAttributes {
    /// Creates a record with the given name and every optional field absent.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency: None,
            benchmark: None,
            relevance: None,
            centrality: None,
            induced_stress: None,
        }
    }

    /// Reads the named attribute.
    pub fn get(&self, attribute: NodeAttribute) -> AttributeValue {
        match attribute {
            NodeAttribute::Name => AttributeValue::Text(self.name.clone()),
            NodeAttribute::Currency => self.currency.clone().into(),
            NodeAttribute::Benchmark => self.benchmark.clone().into(),
            NodeAttribute::Relevance => self.relevance.into(),
            NodeAttribute::Centrality => self.centrality.into(),
            NodeAttribute::InducedStress => self.induced_stress.into(),
        }
    }

    /// Writes the named attribute after checking the value type.
    pub fn set(&mut self, attribute: NodeAttribute, value: AttributeValue) -> Result<(), FnetError> {
        attribute.check(&value)?;
        match attribute {
            NodeAttribute::Name => {
                if let AttributeValue::Text(name) = value {
                    self.name = name;
                }
            }
            NodeAttribute::Currency => self.currency = value.as_str().map(str::to_string),
            NodeAttribute::Benchmark => self.benchmark = value.as_str().map(str::to_string),
            NodeAttribute::Relevance => self.relevance = value.as_f64(),
            NodeAttribute::Centrality => self.centrality = value.as_f64(),
            NodeAttribute::InducedStress => self.induced_stress = value.as_f64(),
        }
        Ok(())
    }
}
