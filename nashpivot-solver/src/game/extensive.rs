//! Two-player extensive games in sequence form.
//!
//! Sequences of a player are numbered densely: 0 is the empty
//! sequence, and information set `h` with `k` actions owns the block
//! `offset(h) .. offset(h) + k`, one id per action. Validation checks
//! shape, chance probabilities, and perfect recall: every node of an
//! information set must be reached by the same owner sequence,
//! otherwise realization plans are not well defined.

use crate::error::{SolveError, SolveResult};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// A node of the game tree.
#[derive(Debug, Clone)]
pub enum GameNode {
    /// Leaf with one exact payoff per player.
    Terminal { payoffs: [BigRational; 2] },
    /// Nature moves with fixed probabilities; they must be positive
    /// and sum to one.
    Chance {
        branches: Vec<(BigRational, GameNode)>,
    },
    /// A player moves; `infoset` indexes into that player's
    /// information sets and the children are ordered by action.
    Decision {
        player: usize,
        infoset: usize,
        children: Vec<GameNode>,
    },
}

/// A validated extensive game with its sequence numbering.
#[derive(Debug, Clone)]
pub struct ExtensiveGame {
    root: GameNode,
    /// Actions per information set, per player.
    actions: [Vec<usize>; 2],
    /// First sequence id owned by each information set.
    seq_offset: [Vec<usize>; 2],
    /// Owner's sequence leading to each information set.
    parent_seq: [Vec<usize>; 2],
    num_sequences: [usize; 2],
}

impl ExtensiveGame {
    /// Validate `root` against the per-player information-set action
    /// counts and number all sequences.
    pub fn new(root: GameNode, actions: [Vec<usize>; 2]) -> SolveResult<Self> {
        let mut seq_offset = [Vec::new(), Vec::new()];
        let mut num_sequences = [1usize, 1usize];
        for player in 0..2 {
            for &count in &actions[player] {
                if count == 0 {
                    return Err(SolveError::InvalidGame(
                        "information set with no actions".into(),
                    ));
                }
                seq_offset[player].push(num_sequences[player]);
                num_sequences[player] += count;
            }
        }
        let mut parent_seq = [
            vec![None; actions[0].len()],
            vec![None; actions[1].len()],
        ];
        check_node(&root, [0, 0], &actions, &seq_offset, &mut parent_seq)?;
        let parent_seq = [
            parent_seq[0].iter().map(|p| p.unwrap_or(0)).collect(),
            parent_seq[1].iter().map(|p| p.unwrap_or(0)).collect(),
        ];
        Ok(Self {
            root,
            actions,
            seq_offset,
            parent_seq,
            num_sequences,
        })
    }

    /// Root of the game tree.
    pub fn root(&self) -> &GameNode {
        &self.root
    }

    /// Number of sequences of `player`, the empty sequence included.
    pub fn num_sequences(&self, player: usize) -> usize {
        self.num_sequences[player]
    }

    /// Number of information sets of `player`.
    pub fn num_infosets(&self, player: usize) -> usize {
        self.actions[player].len()
    }

    /// Number of actions at information set `infoset` of `player`.
    pub fn num_actions(&self, player: usize, infoset: usize) -> usize {
        self.actions[player][infoset]
    }

    /// Sequence id for taking `action` at `infoset`.
    pub fn sequence(&self, player: usize, infoset: usize, action: usize) -> usize {
        debug_assert!(action < self.actions[player][infoset]);
        self.seq_offset[player][infoset] + action
    }

    /// The owner's sequence leading into `infoset`.
    pub fn parent_sequence(&self, player: usize, infoset: usize) -> usize {
        self.parent_seq[player][infoset]
    }

    /// Largest payoff at any leaf, for either player.
    pub fn max_payoff(&self) -> BigRational {
        fn walk(node: &GameNode, best: &mut Option<BigRational>) {
            match node {
                GameNode::Terminal { payoffs } => {
                    for p in payoffs {
                        if best.as_ref().map_or(true, |b| p > b) {
                            *best = Some(p.clone());
                        }
                    }
                }
                GameNode::Chance { branches } => {
                    for (_, child) in branches {
                        walk(child, best);
                    }
                }
                GameNode::Decision { children, .. } => {
                    for child in children {
                        walk(child, best);
                    }
                }
            }
        }
        let mut best = None;
        walk(&self.root, &mut best);
        best.unwrap_or_else(BigRational::zero)
    }
}

fn check_node(
    node: &GameNode,
    seqs: [usize; 2],
    actions: &[Vec<usize>; 2],
    seq_offset: &[Vec<usize>; 2],
    parent_seq: &mut [Vec<Option<usize>>; 2],
) -> SolveResult<()> {
    match node {
        GameNode::Terminal { .. } => Ok(()),
        GameNode::Chance { branches } => {
            if branches.is_empty() {
                return Err(SolveError::InvalidGame("chance node with no branches".into()));
            }
            let mut total = BigRational::zero();
            for (prob, child) in branches {
                if !prob.is_positive() {
                    return Err(SolveError::InvalidGame(
                        "chance probability must be positive".into(),
                    ));
                }
                total += prob;
                check_node(child, seqs, actions, seq_offset, parent_seq)?;
            }
            if !total.is_one() {
                return Err(SolveError::InvalidGame(
                    "chance probabilities must sum to one".into(),
                ));
            }
            Ok(())
        }
        GameNode::Decision {
            player,
            infoset,
            children,
        } => {
            let player = *player;
            let infoset = *infoset;
            if player > 1 {
                return Err(SolveError::InvalidGame("player out of range".into()));
            }
            if infoset >= actions[player].len() {
                return Err(SolveError::InvalidGame("information set out of range".into()));
            }
            if children.len() != actions[player][infoset] {
                return Err(SolveError::InvalidGame(
                    "node action count differs from its information set".into(),
                ));
            }
            match parent_seq[player][infoset] {
                None => parent_seq[player][infoset] = Some(seqs[player]),
                Some(recorded) if recorded != seqs[player] => {
                    return Err(SolveError::ImperfectRecall)
                }
                Some(_) => {}
            }
            for (action, child) in children.iter().enumerate() {
                let mut next = seqs;
                next[player] = seq_offset[player][infoset] + action;
                check_node(child, next, actions, seq_offset, parent_seq)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64) -> BigRational {
        BigRational::from(BigInt::from(n))
    }

    fn leaf(a: i64, b: i64) -> GameNode {
        GameNode::Terminal {
            payoffs: [rat(a), rat(b)],
        }
    }

    /// Player 1 moves, then player 2 moves without observing the
    /// choice: matching pennies as a tree.
    fn pennies_tree() -> GameNode {
        GameNode::Decision {
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
        }
    }

    #[test]
    fn test_sequence_numbering() {
        let game = ExtensiveGame::new(pennies_tree(), [vec![2], vec![2]]).unwrap();
        assert_eq!(game.num_sequences(0), 3);
        assert_eq!(game.num_sequences(1), 3);
        assert_eq!(game.sequence(0, 0, 0), 1);
        assert_eq!(game.sequence(0, 0, 1), 2);
        assert_eq!(game.parent_sequence(1, 0), 0);
        assert_eq!(game.max_payoff(), rat(1));
    }

    #[test]
    fn test_rejects_imperfect_recall() {
        // Player 1 moves twice but the second move's information set
        // merges histories reached by different own sequences.
        let tree = GameNode::Decision {
            player: 0,
            infoset: 0,
            children: vec![
                GameNode::Decision {
                    player: 0,
                    infoset: 1,
                    children: vec![leaf(0, 0), leaf(1, 1)],
                },
                GameNode::Decision {
                    player: 0,
                    infoset: 1,
                    children: vec![leaf(2, 2), leaf(3, 3)],
                },
            ],
        };
        let err = ExtensiveGame::new(tree, [vec![2, 2], vec![]]).unwrap_err();
        assert!(matches!(err, SolveError::ImperfectRecall));
    }

    #[test]
    fn test_rejects_bad_chance_weights() {
        let tree = GameNode::Chance {
            branches: vec![(rat(1) / rat(2), leaf(0, 0)), (rat(1) / rat(4), leaf(1, 1))],
        };
        let err = ExtensiveGame::new(tree, [vec![], vec![]]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidGame(_)));
    }

    #[test]
    fn test_rejects_action_count_mismatch() {
        let tree = GameNode::Decision {
            player: 0,
            infoset: 0,
            children: vec![leaf(0, 0)],
        };
        let err = ExtensiveGame::new(tree, [vec![2], vec![]]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidGame(_)));
    }
}
