// 🌳 Wealth Tree - Variadic tree of named monetary nodes
//
// Leaves hold raw balances, interior nodes hold the aggregated sum of
// their subtree. Each user owns exactly one tree:
//
//   <user>
//   ├── Income       (+)  salary, business, other income
//   ├── Expenses     (-)  health, travel, regular, investment
//   └── Investments  (+)  gold, stock, real estate, others
//
// Aggregation is always a full post-order recomputation, never an
// incremental patch.

use serde::{Deserialize, Serialize};

// ============================================================================
// POLARITY
// ============================================================================

/// How a node's aggregate contributes to its parent's sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Adds to the parent (assets, income)
    #[default]
    Positive,

    /// Subtracts from the parent (expenses, liabilities)
    Negative,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }

    /// Signed contribution of a magnitude
    pub fn apply(&self, magnitude: f64) -> f64 {
        match self {
            Polarity::Positive => magnitude,
            Polarity::Negative => -magnitude,
        }
    }
}

// ============================================================================
// WEALTH NODE
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct WealthNode {
    name: String,

    /// Leaf: balance set by mutation. Interior: last aggregated magnitude.
    value: f64,

    /// Percent per period, only meaningful on asset leaves
    interest_rate: Option<f64>,

    polarity: Polarity,

    children: Vec<WealthNode>,
}

impl WealthNode {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        WealthNode {
            name: name.into(),
            value,
            interest_rate: None,
            polarity: Polarity::Positive,
            children: Vec::new(),
        }
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn interest_rate(&self) -> Option<f64> {
        self.interest_rate
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn children(&self) -> &[WealthNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn add_value(&mut self, amount: f64) {
        self.value += amount;
    }

    pub fn set_interest_rate(&mut self, rate: Option<f64>) {
        self.interest_rate = rate;
    }

    /// Append `child` after the existing children.
    /// No duplicate-name checks; callers enforce uniqueness.
    pub fn attach_child(&mut self, child: WealthNode) -> &mut WealthNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Attach `child` under this node. A rated leaf hands its rate to the
    /// new child, because rates only compound on leaves.
    pub fn adopt(&mut self, mut child: WealthNode) -> &mut WealthNode {
        if self.is_leaf() {
            if let Some(rate) = self.interest_rate.take() {
                if child.interest_rate.is_none() {
                    child = child.with_rate(rate);
                }
            }
        }
        self.attach_child(child)
    }

    /// Depth-first search of this node's own subtree (self first).
    ///
    /// Siblings of `self` are never searched. Use `find_child` for a
    /// lookup restricted to direct children.
    pub fn find(&self, name: &str) -> Option<&WealthNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut WealthNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }

    pub fn find_child(&self, name: &str) -> Option<&WealthNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut WealthNode> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Post-order recomputation of the subtree.
    ///
    /// Interior nodes store the positive sum of their children's
    /// contributions. The returned value is that sum with this node's
    /// polarity applied, so a negative node keeps its magnitude for display
    /// while subtracting from its parent.
    pub fn aggregate(&mut self) -> f64 {
        if !self.children.is_empty() {
            self.value = self.children.iter_mut().map(WealthNode::aggregate).sum();
        }
        self.polarity.apply(self.value)
    }

    /// Signed contribution after `years` periods of compounding.
    ///
    /// Leaves grow as `value * (1 + rate/100)^years`; leaves without a rate
    /// stay flat. Nothing is written back.
    pub fn projected(&self, years: u32) -> f64 {
        let magnitude = if self.children.is_empty() {
            match self.interest_rate {
                Some(rate) => self.value * (1.0 + rate / 100.0).powf(f64::from(years)),
                None => self.value,
            }
        } else {
            self.children.iter().map(|child| child.projected(years)).sum()
        };
        self.polarity.apply(magnitude)
    }

    /// Number of nodes in this subtree, self included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(WealthNode::node_count).sum::<usize>()
    }

    /// Pre-order walk with depth (root = 0), for display layers
    pub fn walk(&self) -> Vec<(usize, &WealthNode)> {
        let mut out = Vec::with_capacity(self.node_count());
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a WealthNode)>) {
        out.push((depth, self));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }
}

// ============================================================================
// TREE TEMPLATE
// ============================================================================

/// One top-level branch of the default tree shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTemplate {
    pub name: String,

    #[serde(default)]
    pub polarity: Polarity,

    #[serde(default)]
    pub leaves: Vec<String>,
}

impl GroupTemplate {
    pub fn new(name: &str, polarity: Polarity, leaves: &[&str]) -> Self {
        GroupTemplate {
            name: name.to_string(),
            polarity,
            leaves: leaves.iter().map(|leaf| leaf.to_string()).collect(),
        }
    }
}

/// Shape every freshly registered user starts with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeTemplate {
    pub groups: Vec<GroupTemplate>,
}

impl TreeTemplate {
    /// All group and leaf names, in template order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flat_map(|group| {
            std::iter::once(group.name.as_str()).chain(group.leaves.iter().map(String::as_str))
        })
    }
}

impl Default for TreeTemplate {
    fn default() -> Self {
        TreeTemplate {
            groups: vec![
                GroupTemplate::new(
                    "Income",
                    Polarity::Positive,
                    &["salary", "business", "other income"],
                ),
                GroupTemplate::new(
                    "Expenses",
                    Polarity::Negative,
                    &["health", "travel", "regular", "investment"],
                ),
                GroupTemplate::new(
                    "Investments",
                    Polarity::Positive,
                    &["gold", "stock", "real estate", "others"],
                ),
            ],
        }
    }
}

// ============================================================================
// WEALTH TREE
// ============================================================================

/// A user's tree; the root is labelled with the owner's name
#[derive(Debug, Clone, Serialize)]
pub struct WealthTree {
    root: WealthNode,
}

impl WealthTree {
    pub fn new(root: WealthNode) -> Self {
        WealthTree { root }
    }

    /// Build the default shape with every value at zero
    pub fn from_template(owner: &str, template: &TreeTemplate) -> Self {
        let mut root = WealthNode::new(owner, 0.0);
        for group in &template.groups {
            let branch = root.attach_child(
                WealthNode::new(group.name.as_str(), 0.0).with_polarity(group.polarity),
            );
            for leaf in &group.leaves {
                branch.attach_child(WealthNode::new(leaf.as_str(), 0.0));
            }
        }
        WealthTree { root }
    }

    pub fn root(&self) -> &WealthNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut WealthNode {
        &mut self.root
    }

    pub fn find(&self, name: &str) -> Option<&WealthNode> {
        self.root.find(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut WealthNode> {
        self.root.find_mut(name)
    }

    /// Recompute every interior node; returns the signed root total
    pub fn aggregate(&mut self) -> f64 {
        self.root.aggregate()
    }

    pub fn projected(&self, years: u32) -> f64 {
        self.root.projected(years)
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

// ============================================================================
// TESTS
// ============================================================================
