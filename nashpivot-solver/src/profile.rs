//! Equilibrium profiles produced by the solvers.

use std::fmt;

/// A mixed-strategy profile of a strategic game: one probability per
/// pure strategy, per player.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedProfile<V> {
    pub strategies: [Vec<V>; 2],
}

impl<V: fmt::Display> fmt::Display for MixedProfile<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (player, probs) in self.strategies.iter().enumerate() {
            if player > 0 {
                write!(f, "; ")?;
            }
            for (i, p) in probs.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{p}")?;
            }
        }
        Ok(())
    }
}

/// A behavior-strategy profile of an extensive game: one probability
/// per action, grouped by information set, per player.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorProfile<V> {
    pub actions: [Vec<Vec<V>>; 2],
}

impl<V: fmt::Display> fmt::Display for BehaviorProfile<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (player, infosets) in self.actions.iter().enumerate() {
            if player > 0 {
                write!(f, "; ")?;
            }
            for (h, probs) in infosets.iter().enumerate() {
                if h > 0 {
                    write!(f, " | ")?;
                }
                for (i, p) in probs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{p}")?;
                }
            }
        }
        Ok(())
    }
}
