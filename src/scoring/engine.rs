use std::cmp::Ordering;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::config::WeightMap;
use super::criteria::{Criterion, CRITERIA_COUNT};
use super::error::ScoreError;
use super::weights::Weights;
use crate::dataset::Entity;

/// An entity with its derived scores and 1-based position in the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntity {
    pub rank: usize,
    pub entity: Entity,
    pub composite: f64,
    pub pairwise_wins: usize,
}

impl Serialize for RankedEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entity.len() + 3))?;
        map.serialize_entry("Rank", &self.rank)?;
        for (key, value) in self.entity.fields() {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("Composite", &self.composite)?;
        map.serialize_entry("PairwiseWins", &self.pairwise_wins)?;
        map.end()
    }
}

/// Score and rank a table of entities.
///
/// `Composite` is the weighted criterion sum divided by the weight total
/// (or by 1 when the total is not positive). `PairwiseWins` counts the other
/// entities this one beats on a strict majority of weighted criteria.
/// Output is sorted by composite then wins, both descending, with NaN
/// composites last; full ties keep input order. The input is never modified.
pub fn compute_scores(
    entities: &[Entity],
    weights: &WeightMap,
) -> Result<Vec<RankedEntity>, ScoreError> {
    let weights = Weights::from_map(weights)?;
    let normalizer = weights.normalizer();

    let weighted: Vec<[f64; CRITERIA_COUNT]> = entities
        .iter()
        .enumerate()
        .map(|(idx, entity)| criterion_values(entity, idx + 1).map(|v| weights.apply(&v)))
        .collect::<Result<_, _>>()?;

    let composites: Vec<f64> = weighted
        .iter()
        .map(|row| row.iter().sum::<f64>() / normalizer)
        .collect();
    let wins = pairwise_wins(&weighted);

    let mut order: Vec<usize> = (0..entities.len()).collect();
    // Stable sort: full ties keep input order
    order.sort_by(|&a, &b| {
        composite_desc(composites[a], composites[b]).then_with(|| wins[b].cmp(&wins[a]))
    });

    tracing::debug!(
        entities = entities.len(),
        normalizer,
        "computed composite scores and pairwise wins"
    );

    Ok(order
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| RankedEntity {
            rank: pos + 1,
            entity: entities[idx].clone(),
            composite: composites[idx],
            pairwise_wins: wins[idx],
        })
        .collect())
}

/// Descending order on composites with NaN after every number.
///
/// Overflowing criteria (`inf + -inf`) produce NaN even from finite input,
/// so the comparison must stay total for `sort_by`.
fn composite_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Count, for every row, the other rows it beats on a strict majority of
/// criteria. Each ordered pair is evaluated on its own, so a win for `i`
/// says nothing about `j`'s tally.
pub fn pairwise_wins(weighted: &[[f64; CRITERIA_COUNT]]) -> Vec<usize> {
    let mut wins = vec![0usize; weighted.len()];
    for (i, row_i) in weighted.iter().enumerate() {
        for (j, row_j) in weighted.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut gt = 0usize;
            let mut lt = 0usize;
            for k in 0..CRITERIA_COUNT {
                if row_i[k] > row_j[k] {
                    gt += 1;
                } else if row_i[k] < row_j[k] {
                    lt += 1;
                }
            }
            if gt > lt {
                wins[i] += 1;
            }
        }
    }
    wins
}

fn criterion_values(entity: &Entity, row: usize) -> Result<[f64; CRITERIA_COUNT], ScoreError> {
    let mut values = [0.0; CRITERIA_COUNT];
    for criterion in Criterion::ALL {
        let value = entity
            .get(criterion.name())
            .ok_or(ScoreError::MissingCriterion { row, criterion })?;
        values[criterion.index()] = numeric(value).ok_or_else(|| ScoreError::NonNumeric {
            row,
            criterion,
            value: value.to_string(),
        })?;
    }
    Ok(values)
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
