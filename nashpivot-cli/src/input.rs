//! JSON game descriptions.
//!
//! Payoffs and chance weights are written either as JSON integers or
//! as strings in `"p/q"` form, so inputs stay exact.

use anyhow::{bail, Context, Result};
use nashpivot_solver::{ExtensiveGame, GameNode, StrategicGame};
use num_bigint::BigInt;
use num_rational::BigRational;
use serde::Deserialize;
use std::str::FromStr;

/// Top-level game file, dispatched on the `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GameFile {
    Strategic(StrategicInput),
    Extensive(ExtensiveInput),
}

/// An exact number: integer or `"p/q"` string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payoff {
    Int(i64),
    Text(String),
}

impl Payoff {
    pub fn to_rational(&self) -> Result<BigRational> {
        match self {
            Payoff::Int(n) => Ok(BigRational::from(BigInt::from(*n))),
            Payoff::Text(s) => {
                let mut parts = s.splitn(2, '/');
                let numer = parts.next().unwrap_or("");
                let numer = BigInt::from_str(numer.trim())
                    .with_context(|| format!("bad numerator in {s:?}"))?;
                let denom = match parts.next() {
                    None => BigInt::from(1),
                    Some(d) => BigInt::from_str(d.trim())
                        .with_context(|| format!("bad denominator in {s:?}"))?,
                };
                if denom == BigInt::from(0) {
                    bail!("zero denominator in {s:?}");
                }
                Ok(BigRational::new(numer, denom))
            }
        }
    }
}

/// Bimatrix game: one payoff table per player.
#[derive(Debug, Deserialize)]
pub struct StrategicInput {
    pub payoffs1: Vec<Vec<Payoff>>,
    pub payoffs2: Vec<Vec<Payoff>>,
}

impl StrategicInput {
    pub fn build(&self) -> Result<StrategicGame> {
        let convert = |table: &[Vec<Payoff>]| -> Result<Vec<Vec<BigRational>>> {
            table
                .iter()
                .map(|row| row.iter().map(Payoff::to_rational).collect())
                .collect()
        };
        Ok(StrategicGame::new(
            convert(&self.payoffs1)?,
            convert(&self.payoffs2)?,
        )?)
    }
}

/// Extensive game: a tree plus per-player information-set sizes.
#[derive(Debug, Deserialize)]
pub struct ExtensiveInput {
    /// Actions per information set, for each player.
    pub actions: [Vec<usize>; 2],
    pub root: NodeInput,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeInput {
    Terminal {
        payoffs: [Payoff; 2],
    },
    Chance {
        branches: Vec<BranchInput>,
    },
    Decision {
        player: usize,
        infoset: usize,
        children: Vec<NodeInput>,
    },
}

#[derive(Debug, Deserialize)]
pub struct BranchInput {
    pub prob: Payoff,
    pub node: NodeInput,
}

impl NodeInput {
    fn build(&self) -> Result<GameNode> {
        Ok(match self {
            NodeInput::Terminal { payoffs } => GameNode::Terminal {
                payoffs: [payoffs[0].to_rational()?, payoffs[1].to_rational()?],
            },
            NodeInput::Chance { branches } => GameNode::Chance {
                branches: branches
                    .iter()
                    .map(|b| Ok((b.prob.to_rational()?, b.node.build()?)))
                    .collect::<Result<_>>()?,
            },
            NodeInput::Decision {
                player,
                infoset,
                children,
            } => GameNode::Decision {
                player: *player,
                infoset: *infoset,
                children: children.iter().map(NodeInput::build).collect::<Result<_>>()?,
            },
        })
    }
}

impl ExtensiveInput {
    pub fn build(&self) -> Result<ExtensiveGame> {
        Ok(ExtensiveGame::new(self.root.build()?, self.actions.clone())?)
    }
}
