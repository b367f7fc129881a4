use super::config::WeightMap;
use super::criteria::{Criterion, CRITERIA_COUNT};
use super::error::ScoreError;

/// Resolved weight vector in criterion column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights([f64; CRITERIA_COUNT]);

impl Weights {
    /// Resolve all six criteria from a name map. Extra names are ignored.
    pub fn from_map(map: &WeightMap) -> Result<Self, ScoreError> {
        let mut values = [0.0; CRITERIA_COUNT];
        for c in Criterion::ALL {
            values[c.index()] = *map.get(c.name()).ok_or(ScoreError::MissingWeight(c))?;
        }
        Ok(Self(values))
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0[criterion.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Divisor for the composite: the weight total, or 1 when it is not
    /// strictly positive.
    pub fn normalizer(&self) -> f64 {
        let total = self.total();
        if total > 0.0 {
            total
        } else {
            1.0
        }
    }

    /// Element-wise product with a row of raw criterion values.
    pub fn apply(&self, values: &[f64; CRITERIA_COUNT]) -> [f64; CRITERIA_COUNT] {
        let mut out = [0.0; CRITERIA_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = values[i] * self.0[i];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::default_weights;

    #[test]
    fn test_from_map_all_present() {
        let weights = Weights::from_map(&default_weights()).unwrap();
        assert_eq!(weights.total(), 30.0);
        assert_eq!(weights.get(Criterion::Nqs), 5.0);
    }

    #[test]
    fn test_from_map_missing_key() {
        let mut map = default_weights();
        map.remove("Reputation");
        assert_eq!(
            Weights::from_map(&map),
            Err(ScoreError::MissingWeight(Criterion::Reputation))
        );
    }

    #[test]
    fn test_from_map_ignores_extra_keys() {
        let mut map = default_weights();
        map.insert("Parking".to_string(), 100.0);
        let weights = Weights::from_map(&map).unwrap();
        assert_eq!(weights.total(), 30.0);
    }

    #[test]
    fn test_normalizer_zero_total_is_one() {
        let map: WeightMap = Criterion::ALL
            .iter()
            .map(|c| (c.name().to_string(), 0.0))
            .collect();
        let weights = Weights::from_map(&map).unwrap();
        assert_eq!(weights.total(), 0.0);
        assert_eq!(weights.normalizer(), 1.0);
    }

    #[test]
    fn test_normalizer_negative_total_is_one() {
        let mut map = default_weights();
        map.insert("Cost".to_string(), -100.0);
        let weights = Weights::from_map(&map).unwrap();
        assert_eq!(weights.normalizer(), 1.0);
    }

    #[test]
    fn test_apply() {
        let mut map = default_weights();
        map.insert("Cost".to_string(), 2.0);
        let weights = Weights::from_map(&map).unwrap();
        let weighted = weights.apply(&[1.0, 1.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(weighted, [2.0, 5.0, 5.0, 5.0, 5.0, 10.0]);
    }
}
