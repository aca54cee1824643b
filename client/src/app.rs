use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, PointerEvent, Window};

use crate::controller::{Controller, Release};
use crate::dom::{
    event_to_point, get_element, lookup_action_from_event, password_value, resize_canvas, sync_ui,
};
use crate::lookup_view::LookupAction;
use crate::net::{lookup_shape, register_shape};
use crate::render::draw_segment;
use crate::state::{State, Ui};

type Shared = Rc<RefCell<State>>;

fn document_ready_state(document: &Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

fn add_listener<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    name: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn lookup_ui(document: &Document) -> Result<Ui, JsValue> {
    Ok(Ui {
        toolbar: get_element(document, "toolbar")?,
        undo_button: get_element(document, "undo-btn")?,
        redo_button: get_element(document, "redo-btn")?,
        clear_button: get_element(document, "clear-btn")?,
        submit_button: get_element(document, "submit-btn")?,
        confirm_modal: get_element(document, "confirm-modal")?,
        confirm_yes: get_element(document, "confirm-yes")?,
        confirm_no: get_element(document, "confirm-no")?,
        lookup_modal: get_element(document, "lookup-modal")?,
        lookup_title: get_element(document, "lookup-title")?,
        lookup_body: get_element(document, "lookup-body")?,
        lookup_actions: get_element(document, "lookup-actions")?,
    })
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    add_listener::<Event>(window.as_ref(), "load", move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    })
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "drawing-canvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let ui = Rc::new(lookup_ui(&document)?);

    let state: Shared = Rc::new(RefCell::new(State {
        canvas: canvas.clone(),
        ctx,
        controller: Controller::default(),
        board_width: 0.0,
        board_height: 0.0,
    }));

    resize_canvas(&window, &mut state.borrow_mut());
    sync_ui(&document, &ui, &state.borrow().controller);

    {
        let state = state.clone();
        let window_cb = window.clone();
        add_listener::<Event>(window.as_ref(), "resize", move |_| {
            resize_canvas(&window_cb, &mut state.borrow_mut());
        })?;
    }

    {
        let state = state.clone();
        add_listener::<PointerEvent>(canvas.as_ref(), "pointerdown", move |event| {
            let mut state = state.borrow_mut();
            let point = event_to_point(&state.canvas, &event);
            if state.controller.pointer_down(event.pointer_id(), point) {
                event.prevent_default();
                let _ = state.canvas.set_pointer_capture(event.pointer_id());
            }
        })?;
    }

    {
        let state = state.clone();
        add_listener::<PointerEvent>(canvas.as_ref(), "pointermove", move |event| {
            let mut state = state.borrow_mut();
            if !state.controller.is_drawing() {
                return;
            }
            event.prevent_default();
            let point = event_to_point(&state.canvas, &event);
            if let Some((from, to)) = state.controller.pointer_move(event.pointer_id(), point) {
                draw_segment(&state.ctx, from, to, state.controller.style());
            }
        })?;
    }

    for name in ["pointerup", "pointercancel", "pointerleave"] {
        let state = state.clone();
        let document = document.clone();
        let ui = ui.clone();
        add_listener::<PointerEvent>(canvas.as_ref(), name, move |event| {
            let mut state = state.borrow_mut();
            match state.controller.pointer_up(event.pointer_id()) {
                Release::Idle => return,
                Release::Committed => {}
                // The partial stroke was painted while moving.
                Release::Discarded => state.redraw(),
            }
            sync_ui(&document, &ui, &state.controller);
        })?;
    }

    {
        let state = state.clone();
        let document = document.clone();
        let ui_cb = ui.clone();
        add_listener::<Event>(ui.undo_button.as_ref(), "click", move |_| {
            let mut state = state.borrow_mut();
            if state.controller.undo() {
                state.redraw();
            }
            sync_ui(&document, &ui_cb, &state.controller);
        })?;
    }

    {
        let state = state.clone();
        let document = document.clone();
        let ui_cb = ui.clone();
        add_listener::<Event>(ui.redo_button.as_ref(), "click", move |_| {
            let mut state = state.borrow_mut();
            if state.controller.redo() {
                state.redraw();
            }
            sync_ui(&document, &ui_cb, &state.controller);
        })?;
    }

    {
        let state = state.clone();
        let document = document.clone();
        let ui_cb = ui.clone();
        add_listener::<Event>(ui.clear_button.as_ref(), "click", move |_| {
            let mut state = state.borrow_mut();
            state.controller.request_clear();
            sync_ui(&document, &ui_cb, &state.controller);
        })?;
    }

    {
        let state = state.clone();
        let document = document.clone();
        let ui_cb = ui.clone();
        add_listener::<Event>(ui.confirm_yes.as_ref(), "click", move |_| {
            let mut state = state.borrow_mut();
            if state.controller.confirm_clear() {
                state.redraw();
            }
            sync_ui(&document, &ui_cb, &state.controller);
        })?;
    }

    {
        let state = state.clone();
        let document = document.clone();
        let ui_cb = ui.clone();
        add_listener::<Event>(ui.confirm_no.as_ref(), "click", move |_| {
            let mut state = state.borrow_mut();
            state.controller.cancel_clear();
            sync_ui(&document, &ui_cb, &state.controller);
        })?;
    }

    {
        let state = state.clone();
        let document = document.clone();
        let window = window.clone();
        let ui_cb = ui.clone();
        add_listener::<Event>(ui.submit_button.as_ref(), "click", move |_| {
            submit_drawing(&window, &document, &ui_cb, &state);
        })?;
    }

    {
        let state = state.clone();
        let document = document.clone();
        let window = window.clone();
        let ui_cb = ui.clone();
        add_listener::<Event>(ui.lookup_actions.as_ref(), "click", move |event| {
            let Some(action) = lookup_action_from_event(&event) else {
                return;
            };
            handle_lookup_action(&window, &document, &ui_cb, &state, action);
        })?;
    }

    Ok(())
}

fn submit_drawing(window: &Window, document: &Document, ui: &Rc<Ui>, state: &Shared) {
    let request = {
        let mut state = state.borrow_mut();
        let request = state.controller.begin_lookup();
        sync_ui(document, ui, &state.controller);
        request
    };
    let Some((request_id, request)) = request else {
        log("Canvas is empty. Nothing to submit.");
        return;
    };
    log(&format!(
        "Submitting drawing strokes={} svg_bytes={}",
        request.strokes.len(),
        request.svg.len()
    ));

    let window = window.clone();
    let document = document.clone();
    let ui = ui.clone();
    let state = state.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = lookup_shape(&window, &request).await;
        if let Err(error) = &outcome {
            web_sys::console::error_1(&format!("Lookup failed: {error}").into());
        }
        let mut state = state.borrow_mut();
        if state.controller.finish_lookup(request_id, outcome) {
            sync_ui(&document, &ui, &state.controller);
        }
    });
}

fn register_drawing(window: &Window, document: &Document, ui: &Rc<Ui>, state: &Shared) {
    let request = {
        let mut state = state.borrow_mut();
        let request = state.controller.begin_registration(password_value(document));
        sync_ui(document, ui, &state.controller);
        request
    };
    let Some((request_id, request)) = request else {
        return;
    };

    let window = window.clone();
    let document = document.clone();
    let ui = ui.clone();
    let state = state.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = register_shape(&window, &request).await;
        if let Err(error) = &outcome {
            web_sys::console::error_1(&format!("Registration failed: {error}").into());
        }
        let mut state = state.borrow_mut();
        if state.controller.finish_registration(request_id, outcome) {
            sync_ui(&document, &ui, &state.controller);
        }
    });
}

fn handle_lookup_action(
    window: &Window,
    document: &Document,
    ui: &Rc<Ui>,
    state: &Shared,
    action: LookupAction,
) {
    let shape_id = match state.borrow().controller.modal() {
        crate::controller::Modal::Lookup(view) => view.shape().map(|shape| shape.id.clone()),
        _ => None,
    };
    match action {
        LookupAction::Close | LookupAction::Retry => {
            let mut state = state.borrow_mut();
            state.controller.close_modal();
            sync_ui(document, ui, &state.controller);
        }
        LookupAction::Register => register_drawing(window, document, ui, state),
        LookupAction::Unlock => {
            let has_password = password_value(document).is_some();
            log(&format!(
                "Unlock requested for shape {} password_entered={has_password}",
                shape_id.unwrap_or_default()
            ));
        }
        LookupAction::Open => {
            log(&format!(
                "Redirecting to view shape with ID: {}",
                shape_id.unwrap_or_default()
            ));
        }
    }
}
