use serde::{Deserialize, Serialize};

/// Transition style between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationVariant {
    #[default]
    Slide,
    Fade,
    Zoom,
}

/// Where the Previous/Next controls sit relative to the step body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPosition {
    Top,
    Between,
    #[default]
    Bottom,
}

/// Presentation switches for a [`StepController`](crate::StepController).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    pub show_step_indicator: bool,
    pub show_navigation: bool,
    pub animation_variant: AnimationVariant,
    pub navigation_position: NavigationPosition,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            show_step_indicator: true,
            show_navigation: true,
            animation_variant: AnimationVariant::Slide,
            navigation_position: NavigationPosition::Bottom,
        }
    }
}

impl StepperConfig {
    pub fn show_step_indicator(mut self, show: bool) -> Self {
        self.show_step_indicator = show;
        self
    }

    pub fn show_navigation(mut self, show: bool) -> Self {
        self.show_navigation = show;
        self
    }

    pub fn animation_variant(mut self, variant: AnimationVariant) -> Self {
        self.animation_variant = variant;
        self
    }

    pub fn navigation_position(mut self, position: NavigationPosition) -> Self {
        self.navigation_position = position;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_lowercase_enums_with_defaults() {
        let config: StepperConfig =
            serde_json::from_str(r#"{"animation_variant": "zoom", "navigation_position": "top"}"#)
                .unwrap();
        assert_eq!(config.animation_variant, AnimationVariant::Zoom);
        assert_eq!(config.navigation_position, NavigationPosition::Top);
        assert!(config.show_step_indicator);
        assert!(config.show_navigation);
    }
}
