// Wealth Tracker - Core Library
// Per-user wealth trees and ledgers, plus a max-heap that always knows
// who is currently wealthiest.

pub mod error;
pub mod config;
pub mod entities;
pub mod heap;
pub mod reconciliation;
pub mod portfolio;
pub mod directory;

// Re-export commonly used types
pub use error::{WealthError, WealthResult};
pub use config::WealthConfig;
pub use entities::{
    GroupTemplate, Polarity, TreeTemplate, WealthNode, WealthTree,
    InvestmentKind, InvestmentTag, Ledger, LedgerIter, LedgerRecord,
    SyncState, UserId, UserProfile,
};
pub use heap::{heap_order, RankLookup, Shift, Standing, WealthHeap};
pub use reconciliation::{reconcile, ReconcileOutcome, UserStore};
pub use portfolio::{PortfolioReport, PortfolioRow};
pub use directory::{ShutdownSummary, UserSummary, WealthDirectory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
