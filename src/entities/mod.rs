// Entity Models
//
// Each user owns:
// - a WealthTree (hierarchical, aggregated bottom-up)
// - a Ledger (linear, newest-first)
// - a cached net worth tied to a stable UserId

pub mod wealth_tree;
pub mod ledger;
pub mod user;

pub use wealth_tree::{GroupTemplate, Polarity, TreeTemplate, WealthNode, WealthTree};
pub use ledger::{InvestmentKind, InvestmentTag, Ledger, LedgerIter, LedgerRecord};
pub use user::{SyncState, UserId, UserProfile};
