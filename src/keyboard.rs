use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::content::InviteSlot;

/// One-time reply keyboard offering the current step's options, one per
/// row, mirroring the option set the state machine validates against.
pub(crate) fn options_keyboard(options: &[String]) -> KeyboardMarkup {
    let keyboard: Vec<Vec<KeyboardButton>> = options
        .iter()
        .map(|option| vec![KeyboardButton::new(option)])
        .collect();

    KeyboardMarkup::new(keyboard)
        .resize_keyboard()
        .one_time_keyboard()
}

/// Inline keyboard for the delayed invite; button payloads are the
/// invite slot tokens the callback handler recognises.
pub(crate) fn invite_keyboard(slots: &[InviteSlot]) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = slots
        .iter()
        .map(|slot| {
            vec![InlineKeyboardButton::callback(
                slot.label.clone(),
                slot.token.clone(),
            )]
        })
        .collect();

    InlineKeyboardMarkup::new(keyboard)
}
