//! Container configuration
//!
//! A [`SwitchConfig`] can be built in code or loaded from TOML:
//!
//! ```toml
//! animation = "shift_left"
//! transition_duration = 0.4
//! animate_forwarding_changes = true
//!
//! [forwarding]
//! status_bar_style = true
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::forwarding::ForwardingFlags;
use crate::transition::AnimationKind;

/// Settings of a switch container
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    /// Animation used by [`switch_view_with`](crate::SwitchContainer::switch_view_with)
    pub animation: AnimationKind,
    /// Playback time in seconds; `None` uses each strategy's default
    pub transition_duration: Option<f64>,
    /// Presentation questions delegated to the current child
    pub forwarding: ForwardingFlags,
    /// Whether presentation updates request an animated re-evaluation
    pub animate_forwarding_changes: bool,
}

impl SwitchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: SwitchConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.transition_duration {
            Some(secs) if !secs.is_finite() || secs < 0.0 => {
                Err(ConfigError::InvalidDuration(secs))
            }
            _ => Ok(()),
        }
    }

    /// The configured playback time, if any
    pub fn duration(&self) -> Option<Duration> {
        self.transition_duration
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
    }

    pub fn with_animation(mut self, animation: AnimationKind) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = Some(duration.as_secs_f64());
        self
    }

    pub fn with_forwarding(mut self, forwarding: ForwardingFlags) -> Self {
        self.forwarding = forwarding;
        self
    }

    pub fn with_animated_forwarding(mut self, animated: bool) -> Self {
        self.animate_forwarding_changes = animated;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SwitchConfig::default();
        assert_eq!(config.animation, AnimationKind::None);
        assert_eq!(config.duration(), None);
        assert_eq!(config.forwarding, ForwardingFlags::default());
        assert!(!config.animate_forwarding_changes);
    }

    #[test]
    fn test_from_toml() {
        let config = SwitchConfig::from_toml(
            r#"
            animation = "anti_fade"
            transition_duration = 0.5

            [forwarding]
            home_indicator_auto_hidden = true
            "#,
        )
        .unwrap();

        assert_eq!(config.animation, AnimationKind::AntiFade);
        assert_eq!(config.duration(), Some(Duration::from_millis(500)));
        assert!(config.forwarding.home_indicator_auto_hidden);
        assert!(!config.forwarding.status_bar_style);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(SwitchConfig::from_toml("").unwrap(), SwitchConfig::default());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = SwitchConfig::from_toml("transition_duration = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration(d) if d == -1.0));
    }

    #[test]
    fn test_unknown_animation_rejected() {
        let err = SwitchConfig::from_toml(r#"animation = "wobble""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_builder() {
        let config = SwitchConfig::new()
            .with_animation(AnimationKind::FlipFromLeft)
            .with_duration(Duration::from_millis(250))
            .with_forwarding(ForwardingFlags::all())
            .with_animated_forwarding(true);
        assert_eq!(config.animation, AnimationKind::FlipFromLeft);
        assert_eq!(config.duration(), Some(Duration::from_millis(250)));
        assert!(config.validate().is_ok());
    }
}
