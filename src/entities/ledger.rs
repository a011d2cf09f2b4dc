// 📒 Ledger - Append-only transaction log per user
//
// Newest-first singly linked list. Records are immutable once created,
// never removed individually, and freed in bulk with their owner.

use crate::error::{check_amount, check_field, WealthResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// INVESTMENT KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentKind {
    Property,
    Stocks,
    Gold,
    Others,
}

impl InvestmentKind {
    pub const ALL: [InvestmentKind; 4] = [
        InvestmentKind::Property,
        InvestmentKind::Stocks,
        InvestmentKind::Gold,
        InvestmentKind::Others,
    ];

    /// Name of the asset leaf this kind accumulates into
    pub fn node_name(&self) -> &'static str {
        match self {
            InvestmentKind::Property => "real estate",
            InvestmentKind::Stocks => "stock",
            InvestmentKind::Gold => "gold",
            InvestmentKind::Others => "others",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentKind::Property => "Property",
            InvestmentKind::Stocks => "Stocks",
            InvestmentKind::Gold => "Gold",
            InvestmentKind::Others => "Others",
        }
    }
}

/// Marks a transaction as an asset purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentTag {
    pub kind: InvestmentKind,

    /// Named position under the kind (e.g. a ticker), created on first purchase
    pub holding: Option<String>,
}

impl InvestmentTag {
    pub fn new(kind: InvestmentKind) -> Self {
        InvestmentTag { kind, holding: None }
    }

    pub fn holding(kind: InvestmentKind, holding: impl Into<String>) -> Self {
        InvestmentTag {
            kind,
            holding: Some(holding.into()),
        }
    }
}

// ============================================================================
// LEDGER RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    category: String,
    description: String,
    amount: f64,
    recorded_at: DateTime<Utc>,
    tag: Option<InvestmentTag>,
}

impl LedgerRecord {
    /// Validated record stamped with the current time
    pub fn new(
        category: &str,
        description: &str,
        amount: f64,
        tag: Option<InvestmentTag>,
    ) -> WealthResult<Self> {
        let category = check_field("category", category)?;
        let description = check_field("description", description)?;
        let amount = check_amount(amount)?;

        Ok(LedgerRecord {
            category: category.to_string(),
            description: description.to_string(),
            amount,
            recorded_at: Utc::now(),
            tag,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn tag(&self) -> Option<&InvestmentTag> {
        self.tag.as_ref()
    }

    pub fn kind(&self) -> Option<InvestmentKind> {
        self.tag.as_ref().map(|tag| tag.kind)
    }

    /// Case-insensitive match on category, description or holding
    pub fn refers_to(&self, name: &str) -> bool {
        let target = name.to_lowercase();
        self.category.to_lowercase() == target
            || self.description.to_lowercase() == target
            || self
                .tag
                .as_ref()
                .and_then(|tag| tag.holding.as_deref())
                .map_or(false, |holding| holding.to_lowercase() == target)
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug)]
struct LedgerLink {
    record: LedgerRecord,
    next: Option<Box<LedgerLink>>,
}

#[derive(Debug, Default)]
pub struct Ledger {
    head: Option<Box<LedgerLink>>,
    len: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger { head: None, len: 0 }
    }

    /// Validate and push a new head record. O(1).
    pub fn append(
        &mut self,
        category: &str,
        description: &str,
        amount: f64,
        tag: Option<InvestmentTag>,
    ) -> WealthResult<&LedgerRecord> {
        let record = LedgerRecord::new(category, description, amount, tag)?;
        Ok(self.push(record))
    }

    pub fn push(&mut self, record: LedgerRecord) -> &LedgerRecord {
        let link = Box::new(LedgerLink {
            record,
            next: self.head.take(),
        });
        self.len += 1;
        &self.head.insert(link).record
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&LedgerRecord> {
        self.head.as_ref().map(|link| &link.record)
    }

    /// Newest-first traversal; each call restarts from the head
    pub fn iter(&self) -> LedgerIter<'_> {
        LedgerIter {
            next: self.head.as_deref(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Total amount of records referring to `name` (case-insensitive)
    pub fn cost_basis(&self, name: &str) -> f64 {
        self.iter()
            .filter(|record| record.refers_to(name))
            .map(LedgerRecord::amount)
            .sum()
    }

    /// Total amount of purchases tagged with `kind`
    pub fn cost_basis_for_kind(&self, kind: InvestmentKind) -> f64 {
        self.iter()
            .filter(|record| record.kind() == Some(kind))
            .map(LedgerRecord::amount)
            .sum()
    }
}

impl Drop for Ledger {
    // Unlink iteratively so long ledgers don't recurse on drop
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut link) = cursor {
            cursor = link.next.take();
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerRecord;
    type IntoIter = LedgerIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct LedgerIter<'a> {
    next: Option<&'a LedgerLink>,
}

impl<'a> Iterator for LedgerIter<'a> {
    type Item = &'a LedgerRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|link| {
            self.next = link.next.as_deref();
            &link.record
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WealthError;

    #[test]
    fn test_append_is_newest_first() {
        let mut ledger = Ledger::new();
        ledger.append("health", "checkup", 20.0, None).unwrap();
        ledger.append("travel", "train", 15.0, None).unwrap();
        ledger.append("regular", "groceries", 42.5, None).unwrap();

        let descriptions: Vec<&str> = ledger.iter().map(|r| r.description()).collect();
        assert_eq!(descriptions, vec!["groceries", "train", "checkup"]);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.latest().unwrap().category(), "regular");
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut ledger = Ledger::new();
        ledger.append("health", "checkup", 20.0, None).unwrap();
        ledger.append("travel", "train", 15.0, None).unwrap();

        let first: f64 = ledger.iter().map(|r| r.amount()).sum();
        let second: f64 = (&ledger).into_iter().map(|r| r.amount()).sum();
        assert_eq!(first, 35.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_append_rejects_invalid_input() {
        let mut ledger = Ledger::new();

        assert_eq!(
            ledger.append("health", "checkup", -1.0, None).unwrap_err(),
            WealthError::InvalidAmount { amount: -1.0 }
        );
        assert_eq!(
            ledger.append("", "checkup", 1.0, None).unwrap_err(),
            WealthError::EmptyField { field: "category" }
        );
        assert_eq!(
            ledger.append("health", "  ", 1.0, None).unwrap_err(),
            WealthError::EmptyField { field: "description" }
        );
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_zero_amount_is_accepted() {
        let mut ledger = Ledger::new();
        assert!(ledger.append("regular", "free sample", 0.0, None).is_ok());
    }

    #[test]
    fn test_record_is_timestamped() {
        let before = Utc::now();
        let mut ledger = Ledger::new();
        let record = ledger.append("health", "checkup", 20.0, None).unwrap();
        assert!(record.recorded_at() >= before);
        assert!(record.recorded_at() <= Utc::now());
    }

    #[test]
    fn test_cost_basis_is_case_insensitive() {
        let mut ledger = Ledger::new();
        ledger
            .append("investment", "AAPL", 100.0, Some(InvestmentTag::new(InvestmentKind::Stocks)))
            .unwrap();
        ledger
            .append("investment", "aapl", 50.0, Some(InvestmentTag::new(InvestmentKind::Stocks)))
            .unwrap();
        ledger
            .append(
                "investment",
                "10 shares",
                25.0,
                Some(InvestmentTag::holding(InvestmentKind::Stocks, "Aapl")),
            )
            .unwrap();
        ledger.append("health", "dentist", 80.0, None).unwrap();

        assert_eq!(ledger.cost_basis("AAPL"), 175.0);
        assert_eq!(ledger.cost_basis("HEALTH"), 80.0);
        assert_eq!(ledger.cost_basis("msft"), 0.0);
    }

    #[test]
    fn test_cost_basis_for_kind() {
        let mut ledger = Ledger::new();
        ledger
            .append("investment", "bars", 300.0, Some(InvestmentTag::new(InvestmentKind::Gold)))
            .unwrap();
        ledger
            .append("investment", "coins", 20.0, Some(InvestmentTag::new(InvestmentKind::Gold)))
            .unwrap();
        ledger
            .append("investment", "flat", 900.0, Some(InvestmentTag::new(InvestmentKind::Property)))
            .unwrap();
        ledger.append("regular", "gold paint", 5.0, None).unwrap();

        assert_eq!(ledger.cost_basis_for_kind(InvestmentKind::Gold), 320.0);
        assert_eq!(ledger.cost_basis_for_kind(InvestmentKind::Property), 900.0);
        assert_eq!(ledger.cost_basis_for_kind(InvestmentKind::Others), 0.0);
    }

    #[test]
    fn test_long_ledger_drops_without_recursion() {
        let mut ledger = Ledger::new();
        for i in 0..200_000 {
            ledger.append("regular", "coffee", i as f64, None).unwrap();
        }
        assert_eq!(ledger.len(), 200_000);
        drop(ledger);
    }

    #[test]
    fn test_kind_node_names() {
        let names: Vec<&str> = InvestmentKind::ALL.iter().map(|k| k.node_name()).collect();
        assert_eq!(names, vec!["real estate", "stock", "gold", "others"]);
    }
}
