//! Ensemble regression model
//!
//! The regressor is fitted outside this crate; these types only evaluate it.
//! Trees are stored as flat node arrays, so tree depth never bounds how
//! deeply the artifact nests.

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeArrays, TREE_LEAF, TREE_UNDEFINED};
pub use random_forest::{EnsemblePrediction, RandomForestRegressor};
