use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement, PointerEvent,
    Window,
};

use shapepad_shared::Point;

use crate::controller::{Controller, ControlsVisibility, Modal};
use crate::lookup_view::{LookupAction, LookupView};
use crate::state::{State, Ui};

pub const PASSWORD_INPUT_ID: &str = "shape-password";

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn resize_canvas(window: &Window, state: &mut State) {
    let rect = state.canvas.get_bounding_client_rect();
    let dpr = window.device_pixel_ratio();
    state.canvas.set_width((rect.width() * dpr) as u32);
    state.canvas.set_height((rect.height() * dpr) as u32);
    let _ = state.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    state.board_width = rect.width();
    state.board_height = rect.height();
    state.redraw();
}

pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point {
        x: (event.client_x() as f64 - rect.left()) as f32,
        y: (event.client_y() as f64 - rect.top()) as f32,
    }
}

fn set_class(element: &Element, class: &str, enabled: bool) {
    let _ = element.class_list().toggle_with_force(class, enabled);
}

fn set_disabled(button: &HtmlButtonElement, disabled: bool) {
    button.set_disabled(disabled);
}

/// Reflects the controller into buttons, toolbar and modals.
pub fn sync_ui(document: &Document, ui: &Ui, controller: &Controller) {
    let affordances = controller.affordances();
    set_disabled(&ui.undo_button, !affordances.undo);
    set_disabled(&ui.redo_button, !affordances.redo);
    set_disabled(&ui.clear_button, !affordances.clear);

    let loading = controller.modal() == &Modal::Lookup(LookupView::Loading);
    set_disabled(&ui.submit_button, !affordances.submit || loading);

    set_class(
        &ui.toolbar,
        "visible",
        controller.controls() == ControlsVisibility::Visible,
    );

    match controller.modal() {
        Modal::None => {
            set_class(&ui.confirm_modal, "hidden", true);
            set_class(&ui.lookup_modal, "hidden", true);
        }
        Modal::ConfirmClear => {
            set_class(&ui.lookup_modal, "hidden", true);
            set_class(&ui.confirm_modal, "hidden", false);
        }
        Modal::Lookup(view) => {
            set_class(&ui.confirm_modal, "hidden", true);
            render_lookup(document, ui, view);
            set_class(&ui.lookup_modal, "hidden", false);
        }
    }
}

fn render_lookup(document: &Document, ui: &Ui, view: &LookupView) {
    ui.lookup_title.set_text_content(Some(view.title()));
    ui.lookup_body.set_inner_html("");
    ui.lookup_actions.set_inner_html("");

    if let Ok(message) = document.create_element("p") {
        message.set_class_name(if matches!(view, LookupView::Failed) {
            "modal-text error"
        } else {
            "modal-text"
        });
        message.set_text_content(Some(&view.message()));
        let _ = ui.lookup_body.append_child(&message);
    }

    if let Some(svg) = view.thumbnail_svg() {
        if let Ok(preview) = document.create_element("div") {
            preview.set_class_name("thumbnail-preview");
            preview.set_inner_html(svg);
            let _ = ui.lookup_body.append_child(&preview);
        }
    }

    if let Some(placeholder) = view.password_prompt() {
        if let Ok(element) = document.create_element("input") {
            if let Ok(input) = element.dyn_into::<HtmlInputElement>() {
                input.set_type("password");
                input.set_id(PASSWORD_INPUT_ID);
                input.set_class_name("password-input");
                input.set_placeholder(placeholder);
                let _ = ui.lookup_body.append_child(&input);
            }
        }
    }

    for action in view.actions() {
        let Ok(element) = document.create_element("button") else {
            continue;
        };
        let Ok(button) = element.dyn_into::<HtmlButtonElement>() else {
            continue;
        };
        let _ = button.set_attribute("type", "button");
        let _ = button.set_attribute("data-action", action.as_str());
        button.set_class_name(if action.is_primary() {
            "modal-button-primary"
        } else {
            "modal-button-secondary"
        });
        button.set_text_content(Some(action.label()));
        let _ = ui.lookup_actions.append_child(&button);
    }
}

pub fn lookup_action_from_event(event: &Event) -> Option<LookupAction> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(action) = element.get_attribute("data-action") {
            return LookupAction::parse(&action);
        }
        current = element.parent_element();
    }
    None
}

pub fn password_value(document: &Document) -> Option<String> {
    let input: HtmlInputElement = get_element(document, PASSWORD_INPUT_ID).ok()?;
    let value = input.value();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
