//! Pluggable visual transition between steps.
//!
//! The controller updates its state first and only then asks the
//! [`TransitionAnimator`] to play the change; nothing waits on the
//! animation. [`NoopAnimator`] is the default, so controllers run headless.

use std::time::Duration;

use serde::Serialize;

use crate::config::AnimationVariant;

/// Length of one step transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// One animation pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keyframe {
    pub opacity: f32,
    /// Horizontal offset in percent of the container width.
    pub x_percent: f32,
    pub scale: f32,
}

impl Keyframe {
    const REST: Keyframe = Keyframe {
        opacity: 1.0,
        x_percent: 0.0,
        scale: 1.0,
    };
}

/// Poses for an entering step (`hidden` to `visible`) and a leaving one
/// (`visible` to `exit`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantKeyframes {
    pub hidden: Keyframe,
    pub visible: Keyframe,
    pub exit: Keyframe,
}

impl AnimationVariant {
    pub fn keyframes(self) -> VariantKeyframes {
        match self {
            Self::Slide => VariantKeyframes {
                hidden: Keyframe {
                    opacity: 0.0,
                    x_percent: 100.0,
                    ..Keyframe::REST
                },
                visible: Keyframe::REST,
                exit: Keyframe {
                    opacity: 0.0,
                    x_percent: -100.0,
                    ..Keyframe::REST
                },
            },
            Self::Fade => VariantKeyframes {
                hidden: Keyframe {
                    opacity: 0.0,
                    ..Keyframe::REST
                },
                visible: Keyframe::REST,
                exit: Keyframe {
                    opacity: 0.0,
                    ..Keyframe::REST
                },
            },
            Self::Zoom => VariantKeyframes {
                hidden: Keyframe {
                    opacity: 0.0,
                    scale: 0.8,
                    ..Keyframe::REST
                },
                visible: Keyframe::REST,
                exit: Keyframe {
                    opacity: 0.0,
                    scale: 0.8,
                    ..Keyframe::REST
                },
            },
        }
    }
}

/// A completed step change, handed to the animator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepTransition {
    pub from: usize,
    pub to: usize,
    pub variant: AnimationVariant,
    pub keyframes: VariantKeyframes,
    pub duration: Duration,
}

impl StepTransition {
    pub fn new(from: usize, to: usize, variant: AnimationVariant) -> Self {
        Self {
            from,
            to,
            variant,
            keyframes: variant.keyframes(),
            duration: TRANSITION_DURATION,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.to > self.from
    }
}

/// Plays step transitions. Must tolerate being called at any rate.
pub trait TransitionAnimator {
    fn animate(&mut self, transition: &StepTransition);
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnimator;

impl TransitionAnimator for NoopAnimator {
    fn animate(&mut self, _transition: &StepTransition) {}
}

impl<F> TransitionAnimator for F
where
    F: FnMut(&StepTransition),
{
    fn animate(&mut self, transition: &StepTransition) {
        self(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_enters_from_right_and_exits_left() {
        let frames = AnimationVariant::Slide.keyframes();
        assert_eq!(frames.hidden.x_percent, 100.0);
        assert_eq!(frames.exit.x_percent, -100.0);
        assert_eq!(frames.visible, Keyframe::REST);
    }

    #[test]
    fn zoom_scales_and_fade_only_fades() {
        let zoom = AnimationVariant::Zoom.keyframes();
        assert_eq!(zoom.hidden.scale, 0.8);
        assert_eq!(zoom.hidden.opacity, 0.0);

        let fade = AnimationVariant::Fade.keyframes();
        assert_eq!(fade.hidden.scale, 1.0);
        assert_eq!(fade.hidden.x_percent, 0.0);
        assert_eq!(fade.exit.opacity, 0.0);
    }

    #[test]
    fn transition_direction() {
        assert!(StepTransition::new(0, 1, AnimationVariant::Fade).is_forward());
        assert!(!StepTransition::new(2, 0, AnimationVariant::Fade).is_forward());
        assert_eq!(
            StepTransition::new(0, 1, AnimationVariant::Fade).duration,
            TRANSITION_DURATION
        );
    }

    #[test]
    fn closures_are_animators() {
        let mut seen = Vec::new();
        {
            let mut record = |t: &StepTransition| seen.push((t.from, t.to));
            record.animate(&StepTransition::new(0, 1, AnimationVariant::Slide));
            NoopAnimator.animate(&StepTransition::new(1, 2, AnimationVariant::Slide));
        }
        assert_eq!(seen, vec![(0, 1)]);
    }
}
