// ⚖️ Reconciliation - Keep the heap in step with every tree mutation
//
// After any mutation of user U's tree:
//   1. snapshot U's cached net worth
//   2. recompute net worth from the tree root
//   3. locate U in the heap by identity
//   4. sift up if it grew, sift down if it shrank, nothing if unchanged
//   5. U is Clean again
//
// Skipping 3/4 leaves the heap invariant broken and the top user wrong.
// Runs exactly once per logical transaction, after all value changes.

use crate::entities::{UserId, UserProfile};
use crate::error::{WealthError, WealthResult};
use crate::heap::{RankLookup, Shift, Standing, WealthHeap};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error};

// ============================================================================
// USER STORE
// ============================================================================

/// Owner of every registered profile, keyed by handle
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<UserId, UserProfile>,
}

impl UserStore {
    pub fn new() -> Self {
        UserStore {
            users: HashMap::new(),
        }
    }

    pub fn insert(&mut self, profile: UserProfile) -> UserId {
        let id = profile.id();
        self.users.insert(id, profile);
        id
    }

    pub fn get(&self, id: UserId) -> Option<&UserProfile> {
        self.users.get(&id)
    }

    pub fn get_mut(&mut self, id: UserId) -> Option<&mut UserProfile> {
        self.users.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &UserProfile> {
        self.users.values()
    }

    pub(crate) fn take(&mut self, id: UserId) -> Option<UserProfile> {
        self.users.remove(&id)
    }
}

impl RankLookup<UserId> for UserStore {
    fn standing(&self, handle: &UserId) -> Option<Standing<'_>> {
        self.users.get(handle).map(|user| Standing {
            net_worth: user.net_worth(),
            name: user.name(),
        })
    }
}

// ============================================================================
// RECONCILE OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    pub user: UserId,
    pub previous: f64,
    pub current: f64,
    pub shift: Shift,

    /// Heap index after repair
    pub index: usize,
}

impl ReconcileOutcome {
    pub fn delta(&self) -> f64 {
        self.current - self.previous
    }

    pub fn changed(&self) -> bool {
        self.shift != Shift::Stay
    }

    pub fn summary(&self) -> String {
        format!(
            "net worth {:.2} -> {:.2} ({:+.2}), {:?} to heap index {}",
            self.previous,
            self.current,
            self.delta(),
            self.shift,
            self.index
        )
    }
}

// ============================================================================
// PROTOCOL
// ============================================================================

/// Recompute `user`'s net worth and repair its heap position.
///
/// `NotInHeap` means the profile was refreshed but the heap does not
/// track the handle; net worth is current, heap order may not be.
pub fn reconcile(
    store: &mut UserStore,
    heap: &mut WealthHeap<UserId>,
    user: UserId,
) -> WealthResult<ReconcileOutcome> {
    let (previous, current) = {
        let profile = store
            .get_mut(user)
            .ok_or_else(|| WealthError::UserNotFound(user.to_string()))?;
        let previous = profile.refresh_net_worth();
        (previous, profile.net_worth())
    };

    let shift = Shift::between(previous, current);

    let Some(index) = heap.reposition(&user, shift, &*store) else {
        let name = store.get(user).map_or_else(|| user.to_string(), |p| p.name().to_string());
        error!(user = %name, previous, current, "reconciled user is not tracked by the heap");
        return Err(WealthError::NotInHeap(name));
    };

    let outcome = ReconcileOutcome {
        user,
        previous,
        current,
        shift,
        index,
    };
    debug!(user = %user, "{}", outcome.summary());
    Ok(outcome)
}

// ============================================================================
// TESTS
// ============================================================================
