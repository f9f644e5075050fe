//! Render-ready view of a controller: step indicator, navigation buttons and
//! the progress line. Pure functions of controller state.

use serde::Serialize;

use crate::config::{AnimationVariant, NavigationPosition};
use crate::context::StepContext;
use crate::controller::ControllerCore;

pub const PREVIOUS_LABEL: &str = "Previous";
pub const NEXT_LABEL: &str = "Next";
pub const COMPLETE_LABEL: &str = "Complete";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorItem {
    pub index: usize,
    /// One-based, as shown to the user.
    pub number: usize,
    pub state: StepState,
    /// Connector to the next item. `None` on the last item.
    pub connector_filled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepIndicator {
    pub items: Vec<IndicatorItem>,
}

impl StepIndicator {
    /// Steps before `current` count as completed whether or not they were
    /// ever validated; `go_to_step` can skip ahead.
    pub fn new(current: usize, total: usize) -> Self {
        let items = (0..total)
            .map(|index| IndicatorItem {
                index,
                number: index + 1,
                state: match index.cmp(&current) {
                    std::cmp::Ordering::Less => StepState::Completed,
                    std::cmp::Ordering::Equal => StepState::Current,
                    std::cmp::Ordering::Greater => StepState::Upcoming,
                },
                connector_filled: (index + 1 < total).then_some(index < current),
            })
            .collect();
        Self { items }
    }
}

/// "Step X of Y".
pub fn progress_label(current: usize, total: usize) -> String {
    format!("Step {} of {}", current + 1, total)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavButton {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    pub previous: NavButton,
    pub next: NavButton,
    pub position: NavigationPosition,
}

impl NavigationView {
    pub fn new(ctx: &dyn StepContext, position: NavigationPosition) -> Self {
        let current = ctx.current_step();
        Self {
            previous: NavButton {
                label: PREVIOUS_LABEL,
                enabled: !ctx.is_first_step(),
            },
            next: NavButton {
                label: if ctx.is_last_step() {
                    COMPLETE_LABEL
                } else {
                    NEXT_LABEL
                },
                enabled: ctx.is_step_valid(current),
            },
            position,
        }
    }
}

/// Everything a front end needs to draw the controller chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerView {
    pub current_step: usize,
    pub total_steps: usize,
    /// `None` when hidden by config.
    pub indicator: Option<StepIndicator>,
    /// `None` when hidden by config.
    pub navigation: Option<NavigationView>,
    pub progress: String,
    pub validation_message: Option<String>,
    pub animation: AnimationVariant,
}

impl ControllerView {
    pub fn of(core: &ControllerCore) -> Self {
        let config = core.config();
        let current = core.current_step();
        let total = core.total_steps();
        Self {
            current_step: current,
            total_steps: total,
            indicator: config
                .show_step_indicator
                .then(|| StepIndicator::new(current, total)),
            navigation: config
                .show_navigation
                .then(|| NavigationView::new(core, config.navigation_position)),
            progress: progress_label(current, total),
            validation_message: core.validation_message(),
            animation: config.animation_variant,
        }
    }
}
