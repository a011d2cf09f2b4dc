// 📈 Portfolio - Cost basis (ledger) vs market value (tree)
//
// Cost basis: what was paid, summed from the ledger.
// Market value: what it is worth now, read from the tree.

use crate::entities::{InvestmentKind, UserProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRow {
    pub name: String,
    pub kind: InvestmentKind,

    /// Named position under a kind (e.g. a ticker) rather than the kind itself
    pub is_holding: bool,

    pub cost_basis: f64,
    pub market_value: f64,
}

impl PortfolioRow {
    pub fn gain(&self) -> f64 {
        self.market_value - self.cost_basis
    }

    /// Gain relative to cost; `None` when nothing was paid
    pub fn gain_percent(&self) -> Option<f64> {
        if self.cost_basis > 0.0 {
            Some(self.gain() / self.cost_basis * 100.0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub user: String,
    pub rows: Vec<PortfolioRow>,

    /// Totals over kind rows only (holdings are already inside them)
    pub total_cost: f64,
    pub total_market: f64,

    pub generated_at: DateTime<Utc>,
}

impl PortfolioReport {
    pub fn build(profile: &UserProfile) -> Self {
        let tree = profile.tree();
        let ledger = profile.ledger();
        let mut rows = Vec::new();

        for kind in InvestmentKind::ALL {
            let Some(node) = tree.find(kind.node_name()) else {
                continue;
            };

            rows.push(PortfolioRow {
                name: node.name().to_string(),
                kind,
                is_holding: false,
                cost_basis: ledger.cost_basis_for_kind(kind),
                market_value: node.value(),
            });

            for holding in node.children() {
                rows.push(PortfolioRow {
                    name: holding.name().to_string(),
                    kind,
                    is_holding: true,
                    cost_basis: ledger.cost_basis(holding.name()),
                    market_value: holding.value(),
                });
            }
        }

        let kinds = rows.iter().filter(|row| !row.is_holding);
        let (total_cost, total_market) = kinds.fold((0.0, 0.0), |(cost, market), row| {
            (cost + row.cost_basis, market + row.market_value)
        });

        PortfolioReport {
            user: profile.name().to_string(),
            rows,
            total_cost,
            total_market,
            generated_at: Utc::now(),
        }
    }

    pub fn total_gain(&self) -> f64 {
        self.total_market - self.total_cost
    }

    pub fn row(&self, name: &str) -> Option<&PortfolioRow> {
        self.rows.iter().find(|row| row.name.eq_ignore_ascii_case(name))
    }

    pub fn summary(&self) -> String {
        format!(
            "Portfolio for {}: invested {:.2}, market value {:.2}, gain {:+.2}",
            self.user,
            self.total_cost,
            self.total_market,
            self.total_gain()
        )
    }
}
