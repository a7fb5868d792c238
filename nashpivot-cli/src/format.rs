//! Output rendering for equilibrium lists.

use nashpivot_solver::{BehaviorProfile, MixedProfile};
use serde_json::json;

/// How equilibria are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `NE,...` line per equilibrium, probabilities comma-joined.
    Text,
    /// A JSON document with one entry per equilibrium.
    Json,
}

/// Mixed profiles rendered to strings, one `[player 1, player 2]`
/// pair per equilibrium.
pub fn mixed_rows<V>(
    profiles: &[MixedProfile<V>],
    fmt: impl Fn(&V) -> String,
) -> Vec<[Vec<String>; 2]> {
    profiles
        .iter()
        .map(|p| {
            [
                p.strategies[0].iter().map(&fmt).collect(),
                p.strategies[1].iter().map(&fmt).collect(),
            ]
        })
        .collect()
}

/// Behavior profiles rendered to strings, grouped by information set.
pub fn behavior_rows<V>(
    profiles: &[BehaviorProfile<V>],
    fmt: impl Fn(&V) -> String,
) -> Vec<[Vec<Vec<String>>; 2]> {
    profiles
        .iter()
        .map(|p| {
            [
                p.actions[0]
                    .iter()
                    .map(|h| h.iter().map(&fmt).collect())
                    .collect(),
                p.actions[1]
                    .iter()
                    .map(|h| h.iter().map(&fmt).collect())
                    .collect(),
            ]
        })
        .collect()
}

pub fn print_mixed(rows: &[[Vec<String>; 2]], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for row in rows {
                println!("NE,{},{}", row[0].join(","), row[1].join(","));
            }
        }
        OutputFormat::Json => {
            let doc = json!({
                "equilibria": rows
                    .iter()
                    .map(|row| json!({"player1": row[0], "player2": row[1]}))
                    .collect::<Vec<_>>(),
            });
            println!("{doc:#}");
        }
    }
}

pub fn print_behavior(rows: &[[Vec<Vec<String>>; 2]], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for row in rows {
                let flat: Vec<String> = row
                    .iter()
                    .flat_map(|infosets| infosets.iter().flatten().cloned())
                    .collect();
                println!("NE,{}", flat.join(","));
            }
        }
        OutputFormat::Json => {
            let doc = json!({
                "equilibria": rows
                    .iter()
                    .map(|row| json!({"player1": row[0], "player2": row[1]}))
                    .collect::<Vec<_>>(),
            });
            println!("{doc:#}");
        }
    }
}

/// Fixed-precision rendering for floating-point runs.
pub fn float_formatter(decimals: usize) -> impl Fn(&f64) -> String {
    move |v: &f64| format!("{v:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    #[test]
    fn test_mixed_rows_exact() {
        let half = BigRational::new(BigInt::from(1), BigInt::from(2));
        let profile = MixedProfile {
            strategies: [vec![half.clone(), half], vec![BigRational::from(BigInt::from(1))]],
        };
        let rows = mixed_rows(&[profile], |v: &BigRational| v.to_string());
        assert_eq!(rows[0][0], vec!["1/2", "1/2"]);
        assert_eq!(rows[0][1], vec!["1"]);
    }

    #[test]
    fn test_float_formatter_decimals() {
        let fmt = float_formatter(3);
        assert_eq!(fmt(&0.5), "0.500");
        assert_eq!(fmt(&(1.0 / 3.0)), "0.333");
    }
}
