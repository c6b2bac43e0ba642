use crate::flow::step_model::{IntentKind, Step, StepDetail, TestValue};
use crate::locator::locator_model::Locator;
use crate::replay::page::{ActionCommand, ElementProbe};

/// Build the page command for a resolved step.
///
/// Returns `None` when the page already matches the recorded target state
/// (a toggle/radio whose probed state equals the recorded one); the step
/// passes without dispatching anything.
pub fn command_for(step: &Step, locator: &Locator, probe: &ElementProbe) -> Option<ActionCommand> {
    let locator = locator.clone();

    match step.intent {
        IntentKind::Click => Some(ActionCommand::Click { locator }),

        IntentKind::TypeText | IntentKind::PickFile => Some(ActionCommand::SetValue {
            locator,
            value: text_value(step),
        }),

        IntentKind::SelectOption => Some(ActionCommand::SelectOption {
            locator,
            value: text_value(step),
        }),

        IntentKind::Toggle | IntentKind::RadioSelect => {
            let target = step.test_data.value.as_flag().unwrap_or(true);
            if probe.checked == Some(target) {
                // Already in the recorded state; clicking would undo it
                None
            } else {
                Some(ActionCommand::Click { locator })
            }
        }

        IntentKind::SetSlider => {
            let value = match step.test_data.value {
                TestValue::Number(n) => n,
                _ => 0.0,
            };
            Some(ActionCommand::SetSlider { locator, value })
        }

        IntentKind::Submit => Some(ActionCommand::Submit { locator }),

        IntentKind::Hover => Some(ActionCommand::Hover { locator }),

        IntentKind::Drag => {
            let (dx, dy) = match step.detail {
                Some(StepDetail::Drag { dx, dy }) => (dx, dy),
                _ => (0, 0),
            };
            Some(ActionCommand::DragBy { locator, dx, dy })
        }

        IntentKind::Scroll => {
            let (dx, dy) = match step.detail {
                Some(StepDetail::Scroll { dx, dy }) => (dx, dy),
                _ => (0, 0),
            };
            Some(ActionCommand::ScrollBy { dx, dy })
        }

        IntentKind::Modal => {
            let accept = match step.detail {
                Some(StepDetail::Modal { accept }) => accept,
                _ => step.test_data.value.as_flag().unwrap_or(true),
            };
            Some(ActionCommand::Modal { accept })
        }

        // Navigation never reaches action dispatch; the executor handles
        // it without locator resolution.
        IntentKind::Navigate => None,
    }
}

fn text_value(step: &Step) -> String {
    step.test_data
        .value
        .as_text()
        .unwrap_or_default()
        .to_string()
}
