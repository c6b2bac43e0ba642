use crate::element::element_model::ControlKind;
use crate::flow::step_model::IntentKind;
use crate::record::event_model::{ActionKind, InteractionType};

/// Map a raw event to the intent behind it.
///
/// The table is keyed by {action, control, interaction} with the more
/// specific rows first; classification is total, with a generic `Click`
/// fallback for anything a control kind cannot sharpen.
pub fn classify(
    action: ActionKind,
    control: ControlKind,
    interaction: InteractionType,
) -> IntentKind {
    use ActionKind::*;
    use ControlKind::*;

    match (action, control) {
        // Clicks sharpened by the control under the pointer
        (Click, Checkbox) => IntentKind::Toggle,
        (Click, Radio) => IntentKind::RadioSelect,
        (Click, Slider) if interaction == InteractionType::Pointer => IntentKind::SetSlider,
        (Click, _) => IntentKind::Click,

        // Value notifications
        (Input | Change, ControlKind::Select) => IntentKind::SelectOption,
        (Change, Checkbox) => IntentKind::Toggle,
        (Change, Radio) => IntentKind::RadioSelect,
        (Input | Change, Slider) => IntentKind::SetSlider,
        (Change, File) => IntentKind::PickFile,
        (Input | Change, _) => IntentKind::TypeText,

        // Already intent-shaped notifications
        (ActionKind::Select, _) => IntentKind::SelectOption,
        (Toggle, Radio) => IntentKind::RadioSelect,
        (Toggle, _) => IntentKind::Toggle,
        (Submit, _) => IntentKind::Submit,
        (Scroll, _) => IntentKind::Scroll,
        (Hover, _) => IntentKind::Hover,
        (Drag, _) => IntentKind::Drag,
        (Modal, _) => IntentKind::Modal,
        (Navigate, _) => IntentKind::Navigate,
    }
}
