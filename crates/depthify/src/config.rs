//! Top-level configuration bundle.

use std::path::Path;

use crate::compose::ComposeConfig;
use crate::error::DepthifyError;
use crate::interpolate::InterpolationConfig;
use crate::preview::PreviewConfig;

/// Every tunable of the interpolate -> compose -> preview chain.
///
/// All sections default, so a JSON file only needs the fields it changes:
///
/// ```
/// let cfg: depthify::DepthifyConfig =
///     serde_json::from_str(r#"{ "compose": { "fill_value": 7 } }"#).unwrap();
/// assert_eq!(cfg.compose.fill_value, 7);
/// assert_eq!(cfg.interpolation, depthify::InterpolationConfig::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepthifyConfig {
    /// Interpolation engine settings.
    pub interpolation: InterpolationConfig,
    /// Channel compositor settings.
    pub compose: ComposeConfig,
    /// Preview rendering settings.
    pub preview: PreviewConfig,
}

impl DepthifyConfig {
    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section without running anything.
    pub fn validate(&self) -> Result<(), DepthifyError> {
        self.interpolation.validate()?;
        self.compose.normalization.validate()?;
        self.preview.normalization.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Normalization;
    use crate::interpolate::{Extrapolation, InterpolationMethod};

    #[test]
    fn json_roundtrip_keeps_nested_enums() {
        let cfg = DepthifyConfig {
            interpolation: InterpolationConfig {
                method: InterpolationMethod::Linear,
                extrapolation: Extrapolation::Constant { value: 255.0 },
                empty_fallback: Some(255.0),
            },
            compose: ComposeConfig {
                normalization: Normalization::Fixed {
                    min: 0.0,
                    max: 255.0,
                },
                invert_depth: true,
                fill_value: 0,
            },
            preview: PreviewConfig::default(),
        };
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let back: DepthifyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn enum_spelling_is_snake_case() {
        let cfg: DepthifyConfig = serde_json::from_str(
            r#"{
                "interpolation": {
                    "method": "nearest",
                    "extrapolation": { "constant": { "value": 1.5 } }
                },
                "compose": { "normalization": "min_max" }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.interpolation.method, InterpolationMethod::Nearest);
        assert_eq!(
            cfg.interpolation.extrapolation,
            Extrapolation::Constant { value: 1.5 }
        );
        assert_eq!(cfg.interpolation.empty_fallback, None);
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        assert!(serde_json::from_str::<DepthifyConfig>(r#"{ "interp": {} }"#).is_err());
    }

    #[test]
    fn unknown_section_field_is_rejected() {
        for json in [
            r#"{ "compose": { "fil_value": 7 } }"#,
            r#"{ "interpolation": { "methd": "nearest" } }"#,
            r#"{ "preview": { "marker_raduis": 2 } }"#,
        ] {
            assert!(serde_json::from_str::<DepthifyConfig>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn validate_reports_bad_fixed_range() {
        let mut cfg = DepthifyConfig::default();
        cfg.preview.normalization = Normalization::Fixed { min: 2.0, max: 1.0 };
        assert!(matches!(cfg.validate(), Err(DepthifyError::InvalidConfig(_))));
    }
}
