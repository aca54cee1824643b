use web_sys::{CanvasRenderingContext2d, HtmlButtonElement, HtmlCanvasElement, HtmlElement};

use crate::controller::Controller;
use crate::render;

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub controller: Controller,
    pub board_width: f64,
    pub board_height: f64,
}

impl State {
    pub fn redraw(&self) {
        render::redraw(
            &self.ctx,
            self.board_width,
            self.board_height,
            self.controller.strokes(),
            self.controller.in_progress(),
            self.controller.style(),
        );
    }
}

/// Page elements the controller state is reflected into.
#[derive(Clone)]
pub struct Ui {
    pub toolbar: HtmlElement,
    pub undo_button: HtmlButtonElement,
    pub redo_button: HtmlButtonElement,
    pub clear_button: HtmlButtonElement,
    pub submit_button: HtmlButtonElement,
    pub confirm_modal: HtmlElement,
    pub confirm_yes: HtmlButtonElement,
    pub confirm_no: HtmlButtonElement,
    pub lookup_modal: HtmlElement,
    pub lookup_title: HtmlElement,
    pub lookup_body: HtmlElement,
    pub lookup_actions: HtmlElement,
}
