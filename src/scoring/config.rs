use std::collections::BTreeMap;

use super::criteria::Criterion;

/// Weight per criterion name, as read from config or the command line.
///
/// Example YAML:
/// ```yaml
/// weights:
///   Cost: 8
///   Education: 5
///   Staff: 5
///   Facilities: 3
///   Reputation: 5
///   NQS: 10
/// ```
pub type WeightMap = BTreeMap<String, f64>;

/// Weight given to every criterion when nothing else is configured.
pub const DEFAULT_WEIGHT: f64 = 5.0;

/// Upper end of the weight scale offered by the init wizard.
pub const MAX_SUGGESTED_WEIGHT: f64 = 10.0;

/// Every criterion at [`DEFAULT_WEIGHT`].
pub fn default_weights() -> WeightMap {
    Criterion::ALL
        .iter()
        .map(|c| (c.name().to_string(), DEFAULT_WEIGHT))
        .collect()
}

/// Defaults overlaid with whatever the config file sets.
pub fn merge_weights(configured: Option<&WeightMap>) -> WeightMap {
    let mut weights = default_weights();
    if let Some(configured) = configured {
        for (name, value) in configured {
            weights.insert(name.clone(), *value);
        }
    }
    weights
}

/// Parse a `NAME=VALUE` command-line override, e.g. `Cost=8`.
pub fn parse_weight_override(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing criterion name in '{}'", s));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}' for {}", value.trim(), name))?;
    Ok((name.to_string(), value))
}

/// Apply command-line overrides in order; later entries win.
pub fn apply_overrides(weights: &mut WeightMap, overrides: &[(String, f64)]) {
    for (name, value) in overrides {
        weights.insert(name.clone(), *value);
    }
}
