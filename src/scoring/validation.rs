use super::config::WeightMap;
use super::criteria::Criterion;

/// Validate configured weights at startup.
/// Returns all validation errors at once (not just the first).
///
/// Missing criteria are not reported here: defaults fill them before
/// scoring, and the engine rejects anything still absent.
pub fn validate_weights(weights: &WeightMap) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, value) in weights {
        if Criterion::parse(name).is_none() {
            let known: Vec<&str> = Criterion::ALL.iter().map(|c| c.name()).collect();
            errors.push(format!(
                "weights.{}: unknown criterion (expected one of {})",
                name,
                known.join(", ")
            ));
            continue;
        }
        if !value.is_finite() {
            errors.push(format!("weights.{}: must be a finite number", name));
        } else if *value < 0.0 {
            errors.push(format!("weights.{}: must be non-negative", name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::default_weights;

    #[test]
    fn test_valid_weights() {
        assert!(validate_weights(&default_weights()).is_ok());
    }

    #[test]
    fn test_empty_weights() {
        assert!(validate_weights(&WeightMap::new()).is_ok());
    }

    #[test]
    fn test_all_zero_weights_are_valid() {
        let weights: WeightMap = Criterion::ALL
            .iter()
            .map(|c| (c.name().to_string(), 0.0))
            .collect();
        assert!(validate_weights(&weights).is_ok());
    }

    #[test]
    fn test_negative_weight() {
        let mut weights = default_weights();
        weights.insert("Cost".to_string(), -1.0);
        let errors = validate_weights(&weights).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("weights.Cost"));
        assert!(errors[0].contains("non-negative"));
    }

    #[test]
    fn test_non_finite_weight() {
        let mut weights = default_weights();
        weights.insert("Staff".to_string(), f64::NAN);
        let errors = validate_weights(&weights).unwrap_err();
        assert!(errors[0].contains("weights.Staff"));
        assert!(errors[0].contains("finite"));
    }

    #[test]
    fn test_unknown_criterion() {
        let mut weights = default_weights();
        weights.insert("nqs".to_string(), 1.0);
        let errors = validate_weights(&weights).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("weights.nqs: unknown criterion"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut weights = default_weights();
        weights.insert("Cost".to_string(), -2.0); // Error 1
        weights.insert("Parking".to_string(), 3.0); // Error 2
        weights.insert("NQS".to_string(), f64::INFINITY); // Error 3
        let errors = validate_weights(&weights).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
