use super::SharedSession;
use crate::{logic_cb, slint_generatedAppWindow::AppWindow};
use slint::{ComponentHandle, SharedString, platform::Key};

const MODIFIERS: [Key; 9] = [
    Key::Shift,
    Key::ShiftR,
    Key::Control,
    Key::ControlR,
    Key::Alt,
    Key::AltGr,
    Key::Meta,
    Key::MetaR,
    Key::CapsLock,
];

pub fn init(ui: &AppWindow, session: &SharedSession) {
    logic_cb!(key_pressed, ui, session, text);
}

fn key_pressed(ui: &AppWindow, session: &SharedSession, text: SharedString) {
    if is_modifier(&text) {
        return;
    }

    let mut session = session.borrow_mut();
    let outcome = match session.controller.handle_key(text.as_str()) {
        Ok(None) => return,
        Ok(Some(end)) => Ok(end),
        Err(e) => Err(e),
    };

    log::debug!("key {:?} ends the session", text.as_str());
    session.finish(ui, outcome);
}

fn is_modifier(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => MODIFIERS.into_iter().any(|key| char::from(key) == c),
        _ => false,
    }
}
