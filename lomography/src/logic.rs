//! UI logic and callback management module
//!
//! Connects the Slint `Logic` callbacks to the filter controller. All state
//! lives in one [`Session`] shared by the callbacks on the UI thread.

use crate::{
    Error, Result,
    controller::{Controller, SessionEnd},
    slint_generatedAppWindow::AppWindow,
};
use slint::ComponentHandle;
use std::{cell::RefCell, rc::Rc};

mod preview;
mod shortcut;

pub type SharedSession = Rc<RefCell<Session>>;

#[derive(Debug)]
pub struct Session {
    pub controller: Controller,
    pub outcome: Option<Result<SessionEnd>>,
}

impl Session {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            outcome: None,
        }
    }

    /// Ends the session with `outcome` and closes the window.
    fn finish(&mut self, ui: &AppWindow, outcome: Result<SessionEnd>) {
        if let Err(e) = &outcome {
            log::warn!("{e}");
        }

        self.outcome = Some(outcome);
        _ = ui.hide();
    }

    fn fail(&mut self, ui: &AppWindow, err: Error) {
        self.finish(ui, Err(err));
    }
}

/// Macro to access the global Store component
///
/// # Parameters
/// - `$ui`: AppWindow instance
///
/// # Returns
/// - Reference to the global Store component
#[macro_export]
macro_rules! global_store {
    ($ui:expr) => {
        $ui.global::<crate::slint_generatedAppWindow::Store>()
    };
}

/// Macro to access the global Logic component
///
/// # Parameters
/// - `$ui`: AppWindow instance
///
/// # Returns
/// - Reference to the global Logic component
#[macro_export]
macro_rules! global_logic {
    ($ui:expr) => {
        $ui.global::<crate::slint_generatedAppWindow::Logic>()
    };
}

/// Macro to connect Slint callbacks to Rust functions
///
/// The handler receives the window, the shared session and the callback
/// arguments. Only a weak window reference is captured.
///
/// # Parameters
/// - `$callback_name`: Name of the callback function
/// - `$ui`: AppWindow instance
/// - `$session`: Shared session state
/// - `$($arg:ident),*`: Callback arguments
#[macro_export]
macro_rules! logic_cb {
    ($callback_name:ident, $ui:expr, $session:expr, $($arg:ident),*) => {
        {{
            let ui_weak = $ui.as_weak();
            let session = $session.clone();
            paste::paste! {
                crate::global_logic!($ui)
                    .[<on_ $callback_name>](move |$($arg),*| {
                        $callback_name(&ui_weak.unwrap(), &session, $($arg),*)
                    });
            }
        }}
    };
}

/// Initializes all UI logic modules
///
/// # Parameters
/// - `ui`: Reference to the application window
/// - `session`: State shared by every callback
pub fn init(ui: &AppWindow, session: &SharedSession) {
    preview::init(ui, session);
    shortcut::init(ui, session);
}
