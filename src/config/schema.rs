use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::export::{BadNumberPolicy, ExportSettings, KeyStyle};
use crate::scoring::{merge_weights, WeightMap};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default CSV for `rank`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Weight per criterion; unset criteria fall back to the default weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_style: Option<KeyStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_bad_number: Option<BadNumberPolicy>,
}

impl Config {
    /// Defaults overlaid with the configured weights.
    pub fn effective_weights(&self) -> WeightMap {
        merge_weights(self.weights.as_ref())
    }

    /// Export settings with defaults filled in.
    pub fn export_settings(&self) -> ExportSettings {
        let mut settings = ExportSettings::default();
        if let Some(export) = &self.export {
            if let Some(input) = &export.input {
                settings.input = input.clone();
            }
            if let Some(output) = &export.output {
                settings.output = output.clone();
            }
            if let Some(style) = export.key_style {
                settings.key_style = style;
            }
            if let Some(policy) = export.on_bad_number {
                settings.on_bad_number = policy;
            }
        }
        settings
    }
}
