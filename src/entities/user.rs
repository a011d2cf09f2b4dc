// 👤 User Profile - One tree, one ledger, one cached net worth
//
// Identity is the UserId handle, not the name. The heap and every lookup
// compare handles; the name is display data plus a case-insensitive index.

use super::ledger::Ledger;
use super::wealth_tree::{TreeTemplate, WealthTree};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// USER ID
// ============================================================================

/// Stable handle for a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        UserId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SYNC STATE
// ============================================================================

/// Dirty between a tree mutation and the reconciliation that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncState {
    Clean,
    Dirty,
}

// ============================================================================
// USER PROFILE
// ============================================================================

#[derive(Debug)]
pub struct UserProfile {
    id: UserId,
    name: String,

    /// Cache of the tree-root aggregate, refreshed by reconciliation
    net_worth: f64,

    tree: WealthTree,
    ledger: Ledger,
    state: SyncState,
    registered_at: DateTime<Utc>,
}

impl UserProfile {
    /// Fresh profile with the template tree, empty ledger, net worth 0
    pub fn new(name: &str, template: &TreeTemplate) -> Self {
        UserProfile {
            id: UserId::new(),
            name: name.to_string(),
            net_worth: 0.0,
            tree: WealthTree::from_template(name, template),
            ledger: Ledger::new(),
            state: SyncState::Clean,
            registered_at: Utc::now(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn net_worth(&self) -> f64 {
        self.net_worth
    }

    pub fn tree(&self) -> &WealthTree {
        &self.tree
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn sync_state(&self) -> SyncState {
        self.state
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    /// Mutable access to the tree; marks the profile Dirty
    pub fn tree_mut(&mut self) -> &mut WealthTree {
        self.state = SyncState::Dirty;
        &mut self.tree
    }

    /// Mutable access to the ledger; marks the profile Dirty
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        self.state = SyncState::Dirty;
        &mut self.ledger
    }

    /// Recompute net worth from the tree root, mark Clean, return the old value
    pub(crate) fn refresh_net_worth(&mut self) -> f64 {
        let previous = self.net_worth;
        self.net_worth = self.tree.aggregate();
        self.state = SyncState::Clean;
        previous
    }

    /// Parts freed at teardown: (tree nodes, ledger records)
    pub(crate) fn footprint(&self) -> (usize, usize) {
        (self.tree.node_count(), self.ledger.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_clean_and_zero() {
        let user = UserProfile::new("Alice", &TreeTemplate::default());

        assert_eq!(user.name(), "Alice");
        assert_eq!(user.net_worth(), 0.0);
        assert_eq!(user.sync_state(), SyncState::Clean);
        assert_eq!(user.tree().root().name(), "Alice");
        assert!(user.ledger().is_empty());
    }

    #[test]
    fn test_id_is_a_v4_uuid() {
        let id = UserId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_registration_is_timestamped() {
        let before = Utc::now();
        let user = UserProfile::new("Alice", &TreeTemplate::default());
        assert!(user.registered_at() >= before);
        assert!(user.registered_at() <= Utc::now());
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = UserProfile::new("Same", &TreeTemplate::default());
        let b = UserProfile::new("Same", &TreeTemplate::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_mutation_marks_dirty_until_refresh() {
        let mut user = UserProfile::new("Alice", &TreeTemplate::default());
        user.tree_mut().find_mut("gold").unwrap().set_value(100.0);
        assert_eq!(user.sync_state(), SyncState::Dirty);
        // Cache is not trusted until refreshed
        assert_eq!(user.net_worth(), 0.0);

        let previous = user.refresh_net_worth();
        assert_eq!(previous, 0.0);
        assert_eq!(user.net_worth(), 100.0);
        assert_eq!(user.sync_state(), SyncState::Clean);
    }

    #[test]
    fn test_matches_name_ignores_case() {
        let user = UserProfile::new("Alice", &TreeTemplate::default());
        assert!(user.matches_name("alice"));
        assert!(user.matches_name(" ALICE "));
        assert!(!user.matches_name("Alicia"));
    }
}
