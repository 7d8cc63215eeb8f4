use serde::{Deserialize, Serialize};

use super::conversions::{default_mix, find_mix, AsphaltMix};
use super::entities::ContactInfo;

/// User preferences applied to new jobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimatorSettings {
    /// Printed at the top of every quote.
    pub company_contact: ContactInfo,
    pub default_terms: String,
    pub default_markup_pct: f64,
    pub default_depth_inches: f64,
    pub default_mix: String,
    pub default_num_trucks: u32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            company_contact: ContactInfo::default(),
            default_terms: "Quote valid for 30 days. Payment due within 30 days of completion."
                .to_string(),
            default_markup_pct: 0.0,
            default_depth_inches: 2.0,
            default_mix: default_mix().name.to_string(),
            default_num_trucks: 1,
        }
    }
}

impl EstimatorSettings {
    /// The configured mix, falling back to the standard mix for unknown names.
    pub fn mix(&self) -> &'static AsphaltMix {
        find_mix(&self.default_mix).unwrap_or_else(default_mix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: EstimatorSettings =
            serde_json::from_str(r#"{"defaultMarkupPct": 12.5}"#).unwrap();
        assert_eq!(settings.default_markup_pct, 12.5);
        assert_eq!(settings.default_depth_inches, 2.0);
        assert_eq!(settings.mix().name, "Standard Mix");
    }

    #[test]
    fn unknown_mix_uses_standard_density() {
        let settings = EstimatorSettings {
            default_mix: "Rubberized".to_string(),
            ..EstimatorSettings::default()
        };
        assert_eq!(settings.mix().density_pcf, 145.0);
    }
}
