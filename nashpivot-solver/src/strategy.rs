//! Mixed-strategy equilibria of strategic games via Lemke-Howson.
//!
//! Payoffs are shifted so every entry is strictly positive; the
//! equilibrium set is invariant under the shift and the best-response
//! polytopes stay bounded. The two polytope tableaus are then paired
//! and the path search enumerates complementary bases. Each basis
//! normalizes to a mixed profile.

use crate::config::SolverConfig;
use crate::error::SolveResult;
use crate::game::StrategicGame;
use crate::lemke::{LemkeTableau, PathOutcome};
use crate::lemke_howson::LhTableau;
use crate::profile::MixedProfile;
use crate::search::{EquilibriumSearch, SearchConfig};
use nashpivot_math::{Scalar, Tableau};
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::marker::PhantomData;
use tracing::debug;

/// Lemke-Howson solver, generic over tableau precision.
#[derive(Debug, Clone)]
pub struct StrategySolver<T: Tableau> {
    config: SolverConfig,
    _tableau: PhantomData<T>,
}

impl<T: Tableau> Default for StrategySolver<T> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<T: Tableau> StrategySolver<T> {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            _tableau: PhantomData,
        }
    }

    /// Find equilibria of `game`. `render` is called once per
    /// equilibrium as it is found, tagged `"NE"`; the full list is
    /// also returned.
    pub fn solve(
        &self,
        game: &StrategicGame,
        mut render: impl FnMut(&MixedProfile<T::Value>, &str),
    ) -> SolveResult<Vec<MixedProfile<T::Value>>> {
        let machine = self.build(game)?;
        let mut found = Vec::new();
        if self.config.stop_after == 1 {
            let mut machine = machine;
            debug!("following a single Lemke-Howson path");
            if machine.lemke_path(1)? == PathOutcome::Complementary {
                if let Some(profile) = normalize(&machine) {
                    render(&profile, "NE");
                    found.push(profile);
                }
            }
            return Ok(found);
        }
        let mut search = EquilibriumSearch::new(SearchConfig {
            max_depth: self.config.max_depth,
        });
        let limit = self.config.stop_after;
        search.run(machine, |machine| match normalize(machine) {
            Some(profile) => {
                render(&profile, "NE");
                found.push(profile);
                limit == 0 || found.len() < limit
            }
            // Degenerate all-zero vertex: not a profile, keep going.
            None => true,
        })?;
        let stats = search.stats();
        debug!(
            paths = stats.paths,
            rays = stats.rays,
            duplicates = stats.duplicates,
            accepted = stats.accepted,
            "strategic search finished"
        );
        Ok(found)
    }

    /// Pair the two best-response polytope tableaus, payoffs shifted
    /// strictly positive.
    fn build(&self, game: &StrategicGame) -> SolveResult<LhTableau<T>> {
        let n1 = game.strategies(0);
        let n2 = game.strategies(1);
        let shift = BigRational::one() - game.min_payoff();
        let p1_rows: Vec<Vec<BigRational>> = (0..n2)
            .map(|j| (0..n1).map(|i| game.payoff(i, j, 1) + &shift).collect())
            .collect();
        let p2_rows: Vec<Vec<BigRational>> = (0..n1)
            .map(|i| (0..n2).map(|j| game.payoff(i, j, 0) + &shift).collect())
            .collect();
        let p1 = LemkeTableau::from_parts(
            p1_rows,
            vec![BigRational::one(); n2],
            self.config.tableau.clone(),
            self.config.max_steps,
        )?;
        let p2 = LemkeTableau::from_parts(
            p2_rows,
            vec![BigRational::one(); n1],
            self.config.tableau.clone(),
            self.config.max_steps,
        )?;
        Ok(LhTableau::new(p1, p2, self.config.max_steps))
    }
}

/// Scale each player's basic weights to a probability vector. `None`
/// when a player has no support (the artificial all-slack vertex).
fn normalize<T: Tableau>(machine: &LhTableau<T>) -> Option<MixedProfile<T::Value>> {
    let mut strategies: [Vec<T::Value>; 2] = [Vec::new(), Vec::new()];
    for (player, out) in strategies.iter_mut().enumerate() {
        let raw = machine.strategy_values(player);
        let mut sum = T::Value::zero();
        for v in &raw {
            sum = sum + v.clone();
        }
        if sum.is_negligible() {
            return None;
        }
        *out = raw.into_iter().map(|v| v / sum.clone()).collect();
    }
    Some(MixedProfile { strategies })
}
