//! Maps an arbitrary input schema onto the semantic roles the estimator needs.
//!
//! Column names are not fixed. Each role has a keyword set, and the first
//! column (in input order) whose lower-cased name contains every keyword of
//! that set fills the role. Resolution happens once per batch and the result
//! is a plain [`FieldMapping`] consumed by the rest of the pipeline.
use crate::error::EngineError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    Identity,
    Quantity,
    Stock,
    DisplayName,
    Description,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Identity => "identity",
            FieldRole::Quantity => "quantity",
            FieldRole::Stock => "stock",
            FieldRole::DisplayName => "display_name",
            FieldRole::Description => "description",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct DiscoveryRule {
    role: FieldRole,
    keywords: &'static [&'static str],
}

// Evaluated in this order; each role is resolved independently.
const DISCOVERY_RULES: [DiscoveryRule; 5] = [
    DiscoveryRule { role: FieldRole::Identity, keywords: &["item", "number"] },
    DiscoveryRule { role: FieldRole::Quantity, keywords: &["req", "qty"] },
    DiscoveryRule { role: FieldRole::Stock, keywords: &["hand"] },
    DiscoveryRule { role: FieldRole::DisplayName, keywords: &["part", "name"] },
    DiscoveryRule { role: FieldRole::Description, keywords: &["description", "2"] },
];

/// Role to column-name mapping. Unresolved roles are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pub identity: Option<String>,
    pub quantity: Option<String>,
    pub stock: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl FieldMapping {
    pub fn resolve<S: AsRef<str>>(columns: &[S]) -> Self {
        let lowered: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();
        let mut mapping = FieldMapping::default();

        for rule in DISCOVERY_RULES.iter() {
            let found = lowered
                .iter()
                .position(|name| rule.keywords.iter().all(|kw| name.contains(kw)))
                .map(|idx| columns[idx].as_ref().to_string());
            *mapping.slot_mut(rule.role) = found;
        }

        tracing::debug!(?mapping, "Resolved field roles");
        mapping
    }

    pub fn get(&self, role: FieldRole) -> Option<&str> {
        match role {
            FieldRole::Identity => self.identity.as_deref(),
            FieldRole::Quantity => self.quantity.as_deref(),
            FieldRole::Stock => self.stock.as_deref(),
            FieldRole::DisplayName => self.display_name.as_deref(),
            FieldRole::Description => self.description.as_deref(),
        }
    }

    fn slot_mut(&mut self, role: FieldRole) -> &mut Option<String> {
        match role {
            FieldRole::Identity => &mut self.identity,
            FieldRole::Quantity => &mut self.quantity,
            FieldRole::Stock => &mut self.stock,
            FieldRole::DisplayName => &mut self.display_name,
            FieldRole::Description => &mut self.description,
        }
    }

    pub fn unresolved_required(&self) -> Vec<FieldRole> {
        [FieldRole::Identity, FieldRole::Quantity]
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// Fails with `MissingRequiredField` when identity or quantity is unresolved.
    pub fn require(self) -> Result<ResolvedFields, EngineError> {
        let missing = self.unresolved_required();
        match (self.identity, self.quantity) {
            (Some(identity), Some(quantity)) => Ok(ResolvedFields {
                identity,
                quantity,
                stock: self.stock,
                display_name: self.display_name,
                description: self.description,
            }),
            _ => Err(EngineError::MissingRequiredField(missing)),
        }
    }
}

/// A mapping whose required roles are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    pub identity: String,
    pub quantity: String,
    pub stock: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}
