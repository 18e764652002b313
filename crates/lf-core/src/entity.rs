//! Entity kinds handled by the warehouse.
//!
//! [`EntityKind`] is the load-control key component; [`DimensionKind`] and
//! [`FactKind`] narrow it to what the respective loader entry points accept.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every staged entity type the warehouse consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Category,
    CategoryDre,
    Person,
    CostCenter,
    Payable,
    Receivable,
    Sale,
    Contract,
    AccountBalance,
}

impl EntityKind {
    /// Stable string form used in the load-control table and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::CategoryDre => "category_dre",
            EntityKind::Person => "person",
            EntityKind::CostCenter => "cost_center",
            EntityKind::Payable => "payable",
            EntityKind::Receivable => "receivable",
            EntityKind::Sale => "sale",
            EntityKind::Contract => "contract",
            EntityKind::AccountBalance => "account_balance",
        }
    }

    /// Parse the stable string form back into a kind.
    pub fn parse(name: &str) -> CoreResult<Self> {
        match name {
            "category" => Ok(EntityKind::Category),
            "category_dre" => Ok(EntityKind::CategoryDre),
            "person" => Ok(EntityKind::Person),
            "cost_center" => Ok(EntityKind::CostCenter),
            "payable" => Ok(EntityKind::Payable),
            "receivable" => Ok(EntityKind::Receivable),
            "sale" => Ok(EntityKind::Sale),
            "contract" => Ok(EntityKind::Contract),
            "account_balance" => Ok(EntityKind::AccountBalance),
            other => Err(CoreError::UnknownEntityKind {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities loaded into dimension tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    Category,
    CategoryDre,
    Person,
    CostCenter,
}

impl DimensionKind {
    pub fn entity(self) -> EntityKind {
        match self {
            DimensionKind::Category => EntityKind::Category,
            DimensionKind::CategoryDre => EntityKind::CategoryDre,
            DimensionKind::Person => EntityKind::Person,
            DimensionKind::CostCenter => EntityKind::CostCenter,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.entity().as_str()
    }

    /// All dimension kinds in the order the orchestrator loads them.
    pub fn all() -> [DimensionKind; 4] {
        [
            DimensionKind::Category,
            DimensionKind::CategoryDre,
            DimensionKind::Person,
            DimensionKind::CostCenter,
        ]
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities loaded into fact tables.
///
/// `Ledger` covers both payable and receivable staging families; the loader
/// unions them into one fact discriminated by direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    Ledger,
    Sale,
    Contract,
    AccountBalance,
}

impl FactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FactKind::Ledger => "ledger",
            FactKind::Sale => "sale",
            FactKind::Contract => "contract",
            FactKind::AccountBalance => "account_balance",
        }
    }

    /// All fact kinds in the order the orchestrator loads them.
    pub fn all() -> [FactKind; 4] {
        [
            FactKind::Ledger,
            FactKind::Sale,
            FactKind::Contract,
            FactKind::AccountBalance,
        ]
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod tests;
