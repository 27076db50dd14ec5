/// Reward points. Signed because earn-side credits accept negative deltas
/// without a lower bound; only spends are guarded.
pub type Points = i64;

/// Balance seeded on first access to an empty ledger or cache.
pub const DEFAULT_BALANCE: Points = 1500;

/// Fixed cost of planting one tree.
pub const TREE_COST: Points = 1000;
