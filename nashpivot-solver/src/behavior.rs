//! Behavior-strategy equilibria of extensive games via Lemke.
//!
//! The game is encoded as a sequence-form linear complementarity
//! problem in the realization plans of both players (Koller, Megiddo
//! and von Stengel): `z = (x, y, u, v)` stacks the two plans with the
//! dual variables of their flow constraints, payoffs are shifted
//! strictly negative so the duals stay feasible, and the root
//! constraints put `-1` entries in `q`, so the covering path of
//! Lemke's algorithm does the work. Every complementary basis is an
//! equilibrium; behavior probabilities are the ratios of realization
//! weights, uniform at information sets the plan never reaches.

use crate::config::SolverConfig;
use crate::error::SolveResult;
use crate::game::{ExtensiveGame, GameNode};
use crate::lemke::LemkeTableau;
use crate::profile::BehaviorProfile;
use crate::search::{EquilibriumSearch, PathMachine, SearchConfig, StartState};
use nashpivot_math::{Label, Scalar, Tableau};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::marker::PhantomData;
use tracing::debug;

/// Sequence-form Lemke solver, generic over tableau precision.
#[derive(Debug, Clone)]
pub struct BehaviorSolver<T: Tableau> {
    config: SolverConfig,
    _tableau: PhantomData<T>,
}

impl<T: Tableau> Default for BehaviorSolver<T> {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl<T: Tableau> BehaviorSolver<T> {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            _tableau: PhantomData,
        }
    }

    /// Find behavior equilibria of `game`. `render` is called once per
    /// equilibrium, tagged `"NE"`; the full list is also returned.
    pub fn solve(
        &self,
        game: &ExtensiveGame,
        mut render: impl FnMut(&BehaviorProfile<T::Value>, &str),
    ) -> SolveResult<Vec<BehaviorProfile<T::Value>>> {
        let (m, q) = build_lcp(game);
        debug!(dim = m.len(), "sequence-form LCP assembled");
        let machine: LemkeTableau<T> = LemkeTableau::with_covering(
            &m,
            q,
            self.config.tableau.clone(),
            self.config.max_steps,
        )?;
        let mut found = Vec::new();
        if self.config.stop_after == 1 {
            let mut machine = machine;
            if machine.start()? == StartState::Solved {
                let profile = extract(game, &machine);
                render(&profile, "NE");
                found.push(profile);
            }
            return Ok(found);
        }
        let mut search = EquilibriumSearch::new(SearchConfig {
            max_depth: self.config.max_depth,
        });
        let limit = self.config.stop_after;
        search.run(machine, |machine| {
            let profile = extract(game, machine);
            render(&profile, "NE");
            found.push(profile);
            limit == 0 || found.len() < limit
        })?;
        let stats = search.stats();
        debug!(
            paths = stats.paths,
            rays = stats.rays,
            duplicates = stats.duplicates,
            accepted = stats.accepted,
            "behavior search finished"
        );
        Ok(found)
    }
}

/// Assemble `M` and `q` of the sequence-form LCP.
fn build_lcp(game: &ExtensiveGame) -> (Vec<Vec<BigRational>>, Vec<BigRational>) {
    let ns = [game.num_sequences(0), game.num_sequences(1)];
    let nu = [game.num_infosets(0) + 1, game.num_infosets(1) + 1];
    let n = ns[0] + ns[1] + nu[0] + nu[1];
    let x = |s: usize| s;
    let y = |s: usize| ns[0] + s;
    let u = |k: usize| ns[0] + ns[1] + k;
    let v = |k: usize| ns[0] + ns[1] + nu[0] + k;

    let one = BigRational::one();
    let mut m = vec![vec![BigRational::zero(); n]; n];
    let mut q = vec![BigRational::zero(); n];

    // Root flow: x_0 = 1 and y_0 = 1.
    q[u(0)] = -one.clone();
    q[v(0)] = -one.clone();
    m[u(0)][x(0)] = one.clone();
    m[x(0)][u(0)] = -one.clone();
    m[v(0)][y(0)] = one.clone();
    m[y(0)][v(0)] = -one.clone();

    // Flow conservation at every information set: the mass entering
    // through the parent sequence splits over the actions.
    for player in 0..2 {
        let col = |s: usize| if player == 0 { x(s) } else { y(s) };
        for h in 0..game.num_infosets(player) {
            let row = if player == 0 { u(h + 1) } else { v(h + 1) };
            let parent = game.parent_sequence(player, h);
            m[row][col(parent)] = -one.clone();
            m[col(parent)][row] = one.clone();
            for a in 0..game.num_actions(player, h) {
                let s = game.sequence(player, h, a);
                m[row][col(s)] = one.clone();
                m[col(s)][row] = -one.clone();
            }
        }
    }

    // Payoff blocks, shifted so every effective payoff is <= -1.
    let shift = game.max_payoff() + one;
    fill_payoffs(game, game.root(), [0, 0], BigRational::one(), &shift, ns[0], &mut m);
    (m, q)
}

fn fill_payoffs(
    game: &ExtensiveGame,
    node: &GameNode,
    seqs: [usize; 2],
    prob: BigRational,
    shift: &BigRational,
    ns1: usize,
    m: &mut [Vec<BigRational>],
) {
    match node {
        GameNode::Terminal { payoffs } => {
            m[seqs[0]][ns1 + seqs[1]] += &prob * (shift - &payoffs[0]);
            m[ns1 + seqs[1]][seqs[0]] += &prob * (shift - &payoffs[1]);
        }
        GameNode::Chance { branches } => {
            for (weight, child) in branches {
                fill_payoffs(game, child, seqs, &prob * weight, shift, ns1, m);
            }
        }
        GameNode::Decision {
            player,
            infoset,
            children,
        } => {
            for (action, child) in children.iter().enumerate() {
                let mut next = seqs;
                next[*player] = game.sequence(*player, *infoset, action);
                fill_payoffs(game, child, next, prob.clone(), shift, ns1, m);
            }
        }
    }
}

/// Read a behavior profile off a complementary basis.
fn extract<T: Tableau>(
    game: &ExtensiveGame,
    machine: &LemkeTableau<T>,
) -> BehaviorProfile<T::Value> {
    let bfs = machine.tableau().bfs();
    let ns1 = game.num_sequences(0);
    let realization = |player: usize, seq: usize| -> T::Value {
        let label = if player == 0 {
            seq as Label + 1
        } else {
            (ns1 + seq) as Label + 1
        };
        bfs.get(label).cloned().unwrap_or_else(T::Value::zero)
    };
    let mut actions: [Vec<Vec<T::Value>>; 2] = [Vec::new(), Vec::new()];
    for (player, out) in actions.iter_mut().enumerate() {
        for h in 0..game.num_infosets(player) {
            let count = game.num_actions(player, h);
            let parent = realization(player, game.parent_sequence(player, h));
            let probs = if parent.is_negligible() {
                // Unreached information set: report the uniform choice.
                let uniform = T::Value::from_rational(&BigRational::new(
                    BigInt::one(),
                    BigInt::from(count),
                ));
                vec![uniform; count]
            } else {
                (0..count)
                    .map(|a| {
                        realization(player, game.sequence(player, h, a)) / parent.clone()
                    })
                    .collect()
            };
            out.push(probs);
        }
    }
    BehaviorProfile { actions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nashpivot_math::ExactTableau;

    fn rat(n: i64) -> BigRational {
        BigRational::from(BigInt::from(n))
    }

    fn half() -> BigRational {
        BigRational::new(BigInt::from(1), BigInt::from(2))
    }

    fn leaf(a: i64, b: i64) -> GameNode {
        GameNode::Terminal {
            payoffs: [rat(a), rat(b)],
        }
    }

    fn pennies_tree() -> ExtensiveGame {
        let root = GameNode::Decision {
            player: 0,
            infoset: 0,
            children: vec![
                GameNode::Decision {
                    player: 1,
                    infoset: 0,
                    children: vec![leaf(1, -1), leaf(-1, 1)],
                },
                GameNode::Decision {
                    player: 1,
                    infoset: 0,
                    children: vec![leaf(-1, 1), leaf(1, -1)],
                },
            ],
        };
        ExtensiveGame::new(root, [vec![2], vec![2]]).unwrap()
    }

    #[test]
    fn test_pennies_uniform_equilibrium() {
        let solver: BehaviorSolver<ExactTableau> = BehaviorSolver::default();
        let found = solver.solve(&pennies_tree(), |_, _| {}).unwrap();
        assert_eq!(found.len(), 1);
        let profile = &found[0];
        assert_eq!(profile.actions[0][0], vec![half(), half()]);
        assert_eq!(profile.actions[1][0], vec![half(), half()]);
    }

    #[test]
    fn test_dominant_choice_after_chance() {
        // A coin flip, then player 1 picks in one information set; the
        // first action dominates in both branches.
        let choice = |hi: i64| GameNode::Decision {
            player: 0,
            infoset: 0,
            children: vec![leaf(hi, 0), leaf(0, 0)],
        };
        let root = GameNode::Chance {
            branches: vec![(half(), choice(2)), (half(), choice(1))],
        };
        let game = ExtensiveGame::new(root, [vec![2], vec![]]).unwrap();
        let solver: BehaviorSolver<ExactTableau> = BehaviorSolver::default();
        let found = solver.solve(&game, |_, _| {}).unwrap();
        assert!(!found.is_empty());
        assert_eq!(found[0].actions[0][0], vec![rat(1), rat(0)]);
    }

    #[test]
    fn test_sequential_game_backward_induction() {
        // Player 1 takes the safe branch: the reached subgame would
        // pay out less once player 2 responds.
        let root = GameNode::Decision {
            player: 0,
            infoset: 0,
            children: vec![
                leaf(3, 1),
                GameNode::Decision {
                    player: 1,
                    infoset: 0,
                    children: vec![leaf(1, 0), leaf(2, 2)],
                },
            ],
        };
        let game = ExtensiveGame::new(root, [vec![2], vec![2]]).unwrap();
        let config = SolverConfig {
            stop_after: 1,
            ..SolverConfig::default()
        };
        let solver: BehaviorSolver<ExactTableau> = BehaviorSolver::new(config);
        let found = solver.solve(&game, |_, _| {}).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].actions[0][0], vec![rat(1), rat(0)]);
    }

    #[test]
    fn test_render_tag() {
        let solver: BehaviorSolver<ExactTableau> = BehaviorSolver::default();
        let mut tags = Vec::new();
        solver
            .solve(&pennies_tree(), |_, tag| tags.push(tag.to_string()))
            .unwrap();
        assert_eq!(tags, vec!["NE".to_string()]);
    }
}
