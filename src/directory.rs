// 🗂️ Wealth Directory - The session context the outer layers call into
//
// Owns every user profile and the heap of handles. Every mutation:
//   validate -> resolve target node -> mutate tree (+ ledger) -> reconcile
// Validation and resolution happen before anything is written, so a
// rejected call leaves no trace.

use crate::config::WealthConfig;
use crate::entities::{
    InvestmentTag, Ledger, LedgerRecord, UserId, UserProfile, WealthNode, WealthTree,
};
use crate::error::{check_amount, check_field, WealthError, WealthResult};
use crate::heap::WealthHeap;
use crate::portfolio::PortfolioReport;
use crate::reconciliation::{reconcile, ReconcileOutcome, UserStore};
use serde::Serialize;
use tracing::{info, warn};

// ============================================================================
// QUERY RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub net_worth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShutdownSummary {
    pub users: usize,
    pub tree_nodes: usize,
    pub ledger_records: usize,
}

/// Where a transaction's amount lands in the tree
enum Target {
    Leaf(String),
    NewHolding { parent: String, name: String },
}

// ============================================================================
// WEALTH DIRECTORY
// ============================================================================

pub struct WealthDirectory {
    config: WealthConfig,
    store: UserStore,
    heap: WealthHeap<UserId>,
}

impl WealthDirectory {
    pub fn new() -> Self {
        Self::with_config(WealthConfig::default())
    }

    pub fn with_config(config: WealthConfig) -> Self {
        let heap = WealthHeap::with_capacity(config.initial_capacity);
        WealthDirectory {
            config,
            store: UserStore::new(),
            heap,
        }
    }

    pub fn config(&self) -> &WealthConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    // ========================================================================
    // REGISTRATION & LOOKUP
    // ========================================================================

    /// Register a user with the default tree and a zero net worth
    pub fn register_user(&mut self, name: &str) -> WealthResult<UserId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(rejected("register", WealthError::EmptyName));
        }
        if self.config.is_reserved(name) {
            return Err(rejected("register", WealthError::ReservedName(name.to_string())));
        }
        if self.find_user_by_name(name).is_some() {
            return Err(rejected("register", WealthError::DuplicateName(name.to_string())));
        }

        let profile = UserProfile::new(name, &self.config.template);
        let id = self.store.insert(profile);
        let index = self.heap.insert(id, &self.store);

        info!(user = %name, id = %id, index, "registered user");
        Ok(id)
    }

    /// Case-insensitive linear scan in heap order
    pub fn find_user_by_name(&self, name: &str) -> Option<UserId> {
        self.heap.as_slice().iter().copied().find(|id| {
            self.store
                .get(*id)
                .map_or(false, |profile| profile.matches_name(name))
        })
    }

    pub fn user(&self, user: UserId) -> WealthResult<&UserProfile> {
        self.store
            .get(user)
            .ok_or_else(|| WealthError::UserNotFound(user.to_string()))
    }

    fn user_mut(&mut self, user: UserId) -> WealthResult<&mut UserProfile> {
        self.store
            .get_mut(user)
            .ok_or_else(|| WealthError::UserNotFound(user.to_string()))
    }

    // ========================================================================
    // MUTATIONS (each ends in exactly one reconciliation)
    // ========================================================================

    /// Log a transaction and apply it to the tree.
    ///
    /// Untagged: `category` names the leaf to increment (expense category,
    /// income source, ...). Tagged: the kind's asset leaf is incremented, or
    /// the named holding under it (created on first purchase).
    pub fn record_transaction(
        &mut self,
        user: UserId,
        category: &str,
        description: &str,
        amount: f64,
        tag: Option<InvestmentTag>,
    ) -> WealthResult<ReconcileOutcome> {
        self.apply_transaction(user, category, description, amount, tag)
            .map_err(|err| rejected("record_transaction", err))?;
        reconcile(&mut self.store, &mut self.heap, user)
    }

    fn apply_transaction(
        &mut self,
        user: UserId,
        category: &str,
        description: &str,
        amount: f64,
        tag: Option<InvestmentTag>,
    ) -> WealthResult<()> {
        let record = LedgerRecord::new(category, description, amount, tag)?;
        let profile = self.user_mut(user)?;
        let target = resolve_target(profile, &record)?;
        let owner = profile.name().to_string();
        let amount = record.amount();

        commit_staged(profile, amount, |tree| {
            match target {
                Target::Leaf(name) => tree
                    .find_mut(&name)
                    .ok_or(WealthError::NodeNotFound { owner, name })?
                    .add_value(amount),
                Target::NewHolding { parent, name } => {
                    tree.find_mut(&parent)
                        .ok_or(WealthError::NodeNotFound { owner, name: parent })?
                        .adopt(WealthNode::new(name, amount));
                }
            }
            Ok(())
        })?;

        profile.ledger_mut().push(record);
        Ok(())
    }

    /// Overwrite a leaf's value (market revaluation)
    pub fn set_asset_value(
        &mut self,
        user: UserId,
        asset: &str,
        value: f64,
    ) -> WealthResult<ReconcileOutcome> {
        check_amount(value)
            .and_then(|value| {
                let profile = self.user_mut(user)?;
                check_leaf(profile, asset)?;
                let owner = profile.name().to_string();
                commit_staged(profile, value, |tree| {
                    tree.find_mut(asset)
                        .ok_or_else(|| WealthError::NodeNotFound {
                            owner,
                            name: asset.to_string(),
                        })?
                        .set_value(value);
                    Ok(())
                })
            })
            .map_err(|err| rejected("set_asset_value", err))?;
        reconcile(&mut self.store, &mut self.heap, user)
    }

    /// Set a leaf's interest rate (percent per period)
    pub fn set_asset_rate(
        &mut self,
        user: UserId,
        asset: &str,
        rate: f64,
    ) -> WealthResult<ReconcileOutcome> {
        if !rate.is_finite() {
            return Err(rejected("set_asset_rate", WealthError::InvalidAmount { amount: rate }));
        }
        self.user_mut(user)
            .and_then(|profile| {
                leaf_mut(profile, asset)?.set_interest_rate(Some(rate));
                Ok(())
            })
            .map_err(|err| rejected("set_asset_rate", err))?;
        reconcile(&mut self.store, &mut self.heap, user)
    }

    /// Add a zero-valued leaf `name` under `parent`
    pub fn add_node(
        &mut self,
        user: UserId,
        parent: &str,
        name: &str,
    ) -> WealthResult<ReconcileOutcome> {
        self.attach_node(user, parent, name)
            .map_err(|err| rejected("add_node", err))?;
        reconcile(&mut self.store, &mut self.heap, user)
    }

    fn attach_node(&mut self, user: UserId, parent: &str, name: &str) -> WealthResult<()> {
        let name = check_field("name", name)?;
        let profile = self.user_mut(user)?;
        let owner = profile.name().to_string();

        let parent_node = profile.tree().find(parent).ok_or_else(|| WealthError::NodeNotFound {
            owner: owner.clone(),
            name: parent.to_string(),
        })?;
        check_can_adopt(parent_node)?;
        if profile.tree().find(name).is_some() {
            return Err(WealthError::DuplicateNode {
                owner,
                name: name.to_string(),
            });
        }

        profile
            .tree_mut()
            .find_mut(parent)
            .ok_or(WealthError::NodeNotFound {
                owner,
                name: parent.to_string(),
            })?
            .adopt(WealthNode::new(name, 0.0));
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Current wealthiest user; `None` when nobody is registered
    pub fn top_user(&self) -> Option<&UserProfile> {
        self.heap.peek().and_then(|id| self.store.get(*id))
    }

    /// Every user in heap-array order (not sorted)
    pub fn all_users(&self) -> Vec<UserSummary> {
        self.heap
            .as_slice()
            .iter()
            .filter_map(|id| self.store.get(*id))
            .map(|profile| UserSummary {
                id: profile.id(),
                name: profile.name().to_string(),
                net_worth: profile.net_worth(),
            })
            .collect()
    }

    pub fn net_worth(&self, user: UserId) -> WealthResult<f64> {
        Ok(self.user(user)?.net_worth())
    }

    pub fn portfolio(&self, user: UserId) -> WealthResult<PortfolioReport> {
        Ok(PortfolioReport::build(self.user(user)?))
    }

    /// Net worth after `years` periods of compounding at each leaf's rate
    pub fn projected_net_worth(&self, user: UserId, years: u32) -> WealthResult<f64> {
        Ok(self.user(user)?.tree().projected(years))
    }

    pub fn tree(&self, user: UserId) -> WealthResult<&WealthTree> {
        Ok(self.user(user)?.tree())
    }

    pub fn ledger(&self, user: UserId) -> WealthResult<&Ledger> {
        Ok(self.user(user)?.ledger())
    }

    /// Heap order holds for every slot
    pub fn is_consistent(&self) -> bool {
        self.heap.is_valid(&self.store)
    }

    // ========================================================================
    // TEARDOWN
    // ========================================================================

    /// Free every user, tree and ledger, then the heap itself
    pub fn shutdown(mut self) -> ShutdownSummary {
        let mut summary = ShutdownSummary {
            users: 0,
            tree_nodes: 0,
            ledger_records: 0,
        };

        let tracked: Vec<UserId> = self.heap.drain().collect();
        for id in tracked {
            if let Some(profile) = self.store.take(id) {
                let (nodes, records) = profile.footprint();
                summary.users += 1;
                summary.tree_nodes += nodes;
                summary.ledger_records += records;
            }
        }

        if !self.store.is_empty() {
            warn!(stray = self.store.len(), "profiles owned outside the heap at shutdown");
        }

        info!(
            users = summary.users,
            tree_nodes = summary.tree_nodes,
            ledger_records = summary.ledger_records,
            "directory shut down"
        );
        summary
    }
}

impl Default for WealthDirectory {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn rejected(operation: &'static str, err: WealthError) -> WealthError {
    if err.is_rejection() {
        warn!(operation, error = %err, "rejected");
    }
    err
}

/// Run `change` against a copy of the tree and keep the copy only when
/// the recomputed aggregate is still finite. A non-finite aggregate means
/// some balance overflowed, so the call is refused with `amount`.
fn commit_staged<F>(profile: &mut UserProfile, amount: f64, change: F) -> WealthResult<()>
where
    F: FnOnce(&mut WealthTree) -> WealthResult<()>,
{
    let mut staged = profile.tree().clone();
    change(&mut staged)?;
    if !staged.aggregate().is_finite() {
        return Err(WealthError::InvalidAmount { amount });
    }
    *profile.tree_mut() = staged;
    Ok(())
}

/// A node can take children unless it is a leaf still holding a value
fn check_can_adopt(node: &WealthNode) -> WealthResult<()> {
    if node.is_leaf() && node.value() != 0.0 {
        return Err(WealthError::LeafHasValue {
            name: node.name().to_string(),
            value: node.value(),
        });
    }
    Ok(())
}

fn check_leaf(profile: &UserProfile, name: &str) -> WealthResult<()> {
    match profile.tree().find(name) {
        None => Err(WealthError::NodeNotFound {
            owner: profile.name().to_string(),
            name: name.to_string(),
        }),
        Some(node) if !node.is_leaf() => Err(WealthError::NotALeaf(name.to_string())),
        Some(_) => Ok(()),
    }
}

/// Checked before `tree_mut` so a failed lookup doesn't mark the user Dirty
fn leaf_mut<'a>(profile: &'a mut UserProfile, name: &str) -> WealthResult<&'a mut WealthNode> {
    check_leaf(profile, name)?;
    let owner = profile.name().to_string();
    profile
        .tree_mut()
        .find_mut(name)
        .ok_or_else(|| WealthError::NodeNotFound {
            owner,
            name: name.to_string(),
        })
}

fn resolve_target(profile: &UserProfile, record: &LedgerRecord) -> WealthResult<Target> {
    let tree = profile.tree();
    let owner = || profile.name().to_string();

    let Some(tag) = record.tag() else {
        check_leaf(profile, record.category())?;
        return Ok(Target::Leaf(record.category().to_string()));
    };

    let kind_name = tag.kind.node_name();
    let kind_node = tree.find(kind_name).ok_or_else(|| WealthError::NodeNotFound {
        owner: owner(),
        name: kind_name.to_string(),
    })?;

    let Some(holding) = tag.holding.as_deref() else {
        if !kind_node.is_leaf() {
            return Err(WealthError::NotALeaf(kind_name.to_string()));
        }
        return Ok(Target::Leaf(kind_name.to_string()));
    };

    let holding = check_field("holding", holding)?;
    if let Some(existing) = kind_node.find_child(holding) {
        if !existing.is_leaf() {
            return Err(WealthError::NotALeaf(holding.to_string()));
        }
        return Ok(Target::Leaf(holding.to_string()));
    }
    if tree.find(holding).is_some() {
        return Err(WealthError::DuplicateNode {
            owner: owner(),
            name: holding.to_string(),
        });
    }
    check_can_adopt(kind_node)?;

    Ok(Target::NewHolding {
        parent: kind_name.to_string(),
        name: holding.to_string(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
