use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reveal::{RevealEffect, RevealSpec};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field}: threshold {value} must be within 0..=1")]
    ThresholdOutOfRange { field: &'static str, value: f64 },
    #[error("{field}: class name must not be empty")]
    EmptySelector { field: &'static str },
    #[error("{field}: class name {value:?} must be a single token without whitespace")]
    InvalidClass { field: &'static str, value: String },
    #[error("{field}: {value} must be a finite, non-negative number")]
    InvalidLength { field: &'static str, value: f64 },
}

/// Tunables for every enhancement. The defaults reproduce the stock site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub nav: NavConfig,
    pub skills: SkillConfig,
    pub fade: FadeConfig,
    pub scroll: ScrollConfig,
}

impl EnhanceConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        class_name("nav.link_class", &self.nav.link_class)?;
        class_name("nav.active_class", &self.nav.active_class)?;
        class_name("skills.class", &self.skills.class)?;
        non_empty("skills.attribute", &self.skills.attribute)?;
        if self.fade.classes.is_empty() {
            return Err(ConfigError::EmptySelector {
                field: "fade.classes",
            });
        }
        for class in &self.fade.classes {
            class_name("fade.classes", class)?;
        }
        class_name("scroll.nav_class", &self.scroll.nav_class)?;

        threshold("skills.threshold", self.skills.threshold)?;
        threshold("fade.threshold", self.fade.threshold)?;

        length("fade.offset_px", self.fade.offset_px)?;
        length("fade.duration_s", self.fade.duration_s)?;
        // The scroll threshold is compared against raw offsets and may be negative.
        if !self.scroll.threshold_px.is_finite() {
            return Err(ConfigError::InvalidLength {
                field: "scroll.threshold_px",
                value: self.scroll.threshold_px,
            });
        }
        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptySelector { field });
    }
    Ok(())
}

/// Class-list tokens cannot contain whitespace; such a name would never
/// match in a browser.
fn class_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    non_empty(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidClass {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ThresholdOutOfRange { field, value });
    }
    Ok(())
}

fn length(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidLength { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub link_class: String,
    pub active_class: String,
    /// Page name assumed when the path ends in `/`.
    pub home_page: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            link_class: "nav-link".into(),
            active_class: "active".into(),
            home_page: "index.html".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub class: String,
    /// Attribute holding the bar's target percentage.
    pub attribute: String,
    pub threshold: f64,
    pub delay_ms: u32,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            class: "skill-progress".into(),
            attribute: "data-progress".into(),
            threshold: 0.5,
            delay_ms: 100,
        }
    }
}

impl SkillConfig {
    pub fn reveal_spec(&self) -> RevealSpec {
        RevealSpec {
            threshold: self.threshold,
            delay_ms: self.delay_ms,
            effect: RevealEffect::SkillFill {
                attribute: self.attribute.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    pub classes: Vec<String>,
    pub threshold: f64,
    pub delay_ms: u32,
    /// Starting downward offset of the fade.
    pub offset_px: f64,
    pub duration_s: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            classes: vec![
                "timeline-item".into(),
                "project-card".into(),
                "skills-category".into(),
                "expertise-card".into(),
            ],
            threshold: 0.1,
            delay_ms: 50,
            offset_px: 20.0,
            duration_s: 0.6,
        }
    }
}

impl FadeConfig {
    pub fn reveal_spec(&self) -> RevealSpec {
        RevealSpec {
            threshold: self.threshold,
            delay_ms: self.delay_ms,
            effect: RevealEffect::FadeIn {
                offset_px: self.offset_px,
                duration_s: self.duration_s,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub nav_class: String,
    /// Offsets strictly above this switch the border tone.
    pub threshold_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            nav_class: "nav".into(),
            threshold_px: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EnhanceConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EnhanceConfig::from_json(r#"{"scroll": {"threshold_px": 40}}"#).unwrap();
        assert_eq!(config.scroll.threshold_px, 40.0);
        assert_eq!(config.scroll.nav_class, "nav");
        assert_eq!(config.skills, SkillConfig::default());
        assert_eq!(config.nav.home_page, "index.html");
    }

    #[test]
    fn rejects_threshold_above_one() {
        let err = EnhanceConfig::from_json(r#"{"fade": {"threshold": 1.5}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ThresholdOutOfRange {
                field: "fade.threshold",
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_class() {
        let err = EnhanceConfig::from_json(r#"{"nav": {"link_class": " "}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EmptySelector {
                field: "nav.link_class"
            }
        ));

        let err = EnhanceConfig::from_json(r#"{"fade": {"classes": []}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySelector { .. }));
    }

    #[test]
    fn rejects_class_with_whitespace() {
        let err = EnhanceConfig::from_json(r#"{"scroll": {"nav_class": "site nav"}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidClass {
                field: "scroll.nav_class",
                ..
            }
        ));
    }

    #[test]
    fn digit_leading_class_is_accepted() {
        // Escaped when turned into a selector.
        let config = EnhanceConfig::from_json(r#"{"skills": {"class": "1col"}}"#).unwrap();
        assert_eq!(config.skills.class, "1col");
    }

    #[test]
    fn rejects_negative_duration() {
        let err = EnhanceConfig::from_json(r#"{"fade": {"duration_s": -1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLength { .. }));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = EnhanceConfig::from_json("{nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid config json"));
    }

    #[test]
    fn specs_follow_config() {
        let spec = SkillConfig::default().reveal_spec();
        assert_eq!(spec.threshold, 0.5);
        assert_eq!(spec.delay_ms, 100);
        let spec = FadeConfig::default().reveal_spec();
        assert_eq!(spec.threshold, 0.1);
        assert_eq!(spec.delay_ms, 50);
    }
}
