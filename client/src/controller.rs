//! Input handling for one drawing session, kept free of DOM types so it can
//! be driven directly from tests.

use shapepad_shared::normalize::prepare_for_lookup;
use shapepad_shared::svg::{to_svg, StrokeStyle};
use shapepad_shared::{
    History, LookupRequest, LookupResponse, Point, RegisterRequest, ShapeSummary, Stroke,
    StrokeBuilder,
};

use crate::lookup_view::{LookupError, LookupView};

/// Toolbar visibility. Shown on the first committed stroke of a session and
/// hidden again when the drawing is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlsVisibility {
    Hidden,
    Visible,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Modal {
    None,
    ConfirmClear,
    Lookup(LookupView),
}

/// Which buttons are enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Affordances {
    pub undo: bool,
    pub redo: bool,
    pub clear: bool,
    pub submit: bool,
}

/// Identifies one lookup or registration request. Only the most recent
/// request may fill the result modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// No stroke was in progress.
    Idle,
    Discarded,
    Committed,
}

pub struct Controller {
    history: History<Stroke>,
    active: Option<StrokeBuilder>,
    pointer: Option<i32>,
    controls: ControlsVisibility,
    modal: Modal,
    pending: Option<RequestId>,
    next_request: u64,
    style: StrokeStyle,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(StrokeStyle::default())
    }
}

impl Controller {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            history: History::new(),
            active: None,
            pointer: None,
            controls: ControlsVisibility::Hidden,
            modal: Modal::None,
            pending: None,
            next_request: 0,
            style,
        }
    }

    pub fn history(&self) -> &History<Stroke> {
        &self.history
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.history.current_state()
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn controls(&self) -> ControlsVisibility {
        self.controls
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn in_progress(&self) -> Option<&[Point]> {
        self.active.as_ref().map(|builder| builder.points())
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a stroke for `pointer_id`. Ignored while a modal covers the
    /// canvas or another pointer is already drawing.
    pub fn pointer_down(&mut self, pointer_id: i32, point: Point) -> bool {
        if self.modal != Modal::None || self.active.is_some() {
            return false;
        }
        self.active = StrokeBuilder::begin(point);
        if self.active.is_some() {
            self.pointer = Some(pointer_id);
        }
        self.active.is_some()
    }

    pub fn pointer_move(&mut self, pointer_id: i32, point: Point) -> Option<(Point, Point)> {
        if self.pointer != Some(pointer_id) {
            return None;
        }
        self.active.as_mut()?.push(point)
    }

    /// Ends the stroke in progress, committing it when it has enough points.
    /// Releases from any other pointer are ignored.
    pub fn pointer_up(&mut self, pointer_id: i32) -> Release {
        if self.pointer != Some(pointer_id) {
            return Release::Idle;
        }
        self.pointer = None;
        let Some(builder) = self.active.take() else {
            return Release::Idle;
        };
        match builder.finish() {
            Some(stroke) => {
                self.history.append(stroke);
                self.controls = ControlsVisibility::Visible;
                Release::Committed
            }
            None => Release::Discarded,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Opens the clear confirmation when there is anything to clear.
    pub fn request_clear(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        self.modal = Modal::ConfirmClear;
        true
    }

    pub fn confirm_clear(&mut self) -> bool {
        if self.modal != Modal::ConfirmClear {
            return false;
        }
        self.history.reset();
        self.active = None;
        self.pointer = None;
        self.controls = ControlsVisibility::Hidden;
        self.modal = Modal::None;
        true
    }

    pub fn cancel_clear(&mut self) {
        if self.modal == Modal::ConfirmClear {
            self.modal = Modal::None;
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::None;
        self.pending = None;
    }

    /// The lookup payload for the drawing as currently shown.
    pub fn submission(&self) -> Option<LookupRequest> {
        let strokes = self.strokes();
        let svg = to_svg(strokes, &self.style, true)?;
        Some(LookupRequest {
            svg,
            strokes: prepare_for_lookup(strokes),
        })
    }

    pub fn registration(&self, password: Option<String>) -> Option<RegisterRequest> {
        if self.strokes().is_empty() {
            return None;
        }
        Some(RegisterRequest {
            strokes: prepare_for_lookup(self.strokes()),
            password: password.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Shows the loading state and hands back the request to send, tagged
    /// with the id its answer must carry.
    pub fn begin_lookup(&mut self) -> Option<(RequestId, LookupRequest)> {
        let request = self.submission()?;
        Some((self.start_request(), request))
    }

    pub fn begin_registration(
        &mut self,
        password: Option<String>,
    ) -> Option<(RequestId, RegisterRequest)> {
        let request = self.registration(password)?;
        Some((self.start_request(), request))
    }

    fn start_request(&mut self) -> RequestId {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.pending = Some(id);
        self.modal = Modal::Lookup(LookupView::Loading);
        id
    }

    /// Applies a lookup answer unless the modal was closed or a newer request
    /// was started meanwhile.
    pub fn finish_lookup(
        &mut self,
        id: RequestId,
        outcome: Result<LookupResponse, LookupError>,
    ) -> bool {
        self.finish_request(id, LookupView::from_outcome(outcome))
    }

    pub fn finish_registration(
        &mut self,
        id: RequestId,
        outcome: Result<ShapeSummary, LookupError>,
    ) -> bool {
        self.finish_request(id, LookupView::from_registration(outcome))
    }

    fn finish_request(&mut self, id: RequestId, view: LookupView) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        self.modal = Modal::Lookup(view);
        true
    }

    pub fn affordances(&self) -> Affordances {
        let has_drawing = !self.strokes().is_empty();
        Affordances {
            undo: self.history.can_undo(),
            redo: self.history.can_redo(),
            clear: !self.history.is_empty(),
            submit: has_drawing,
        }
    }
}
