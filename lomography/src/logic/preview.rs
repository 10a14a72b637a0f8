use super::SharedSession;
use crate::{global_store, logic_cb, slint_generatedAppWindow::AppWindow};
use image::RgbImage;
use slint::{ComponentHandle, Image, Rgb8Pixel, SharedPixelBuffer};

pub fn init(ui: &AppWindow, session: &SharedSession) {
    {
        let session = session.borrow();
        let controller = &session.controller;

        global_store!(ui).set_strength(controller.curve().strength());
        global_store!(ui).set_radius(controller.vignette().radius());
        global_store!(ui).set_preview(to_slint_image(controller.displayed()));
    }

    logic_cb!(color_curve_changed, ui, session, value);
    logic_cb!(vignette_changed, ui, session, value);
}

fn color_curve_changed(ui: &AppWindow, session: &SharedSession, value: f32) {
    let mut session = session.borrow_mut();
    let result = session
        .controller
        .on_color_curve_changed(value.round() as i32)
        .map(to_slint_image);

    match result {
        Ok(img) => global_store!(ui).set_preview(img),
        Err(e) => session.fail(ui, e),
    }
}

fn vignette_changed(ui: &AppWindow, session: &SharedSession, value: f32) {
    let mut session = session.borrow_mut();
    let result = session
        .controller
        .on_vignette_changed(value.round() as i32)
        .map(to_slint_image);

    match result {
        Ok(img) => global_store!(ui).set_preview(img),
        Err(e) => session.fail(ui, e),
    }
}

fn to_slint_image(img: &RgbImage) -> Image {
    let buffer =
        SharedPixelBuffer::<Rgb8Pixel>::clone_from_slice(img.as_raw(), img.width(), img.height());
    Image::from_rgb8(buffer)
}
