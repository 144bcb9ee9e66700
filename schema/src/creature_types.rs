use serde::{Deserialize, Serialize};
use std::fmt;

/// Elemental classification of a species.
///
/// Purely descriptive: the battle engine never reads it, there is no
/// effectiveness table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ElementType {
    Fire,
    Water,
    Earth,
    Electric,
    Ice,
    Dark,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
