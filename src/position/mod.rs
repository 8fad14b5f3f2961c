//! Dot position math and interaction modes
//!
//! Maps pointer coordinates relative to the displayed image's bounding
//! box to normalized percentages, and runs the two interaction modes:
//!
//! - placement: a dot with no position; one click commits and exits
//! - drag: a dot with a position; pointer moves update a local,
//!   uncommitted position and only the release commits, and only when
//!   the total travel exceeds the click/drag threshold
//!
//! Each commit is exactly one store mutation. Intermediate drag frames
//! never reach the store.

use serde::{Deserialize, Serialize};

/// Travel below this many pixels between press and release is a click,
/// not a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Bounding box of the rendered image, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A committed position for one dot, formatted for the data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCommit {
    pub sku: String,
    pub top: String,
    pub left: String,
}

/// Convert a pointer coordinate to clamped `(top, left)` percentages.
pub fn point_to_percent(x: f64, y: f64, image_box: &ImageBox) -> (f64, f64) {
    let top = clamp_percent(ratio(y - image_box.top, image_box.height) * 100.0);
    let left = clamp_percent(ratio(x - image_box.left, image_box.width) * 100.0);
    (top, left)
}

fn ratio(offset: f64, size: f64) -> f64 {
    if size <= 0.0 {
        return 0.0;
    }
    offset / size
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Two decimal places with a `%` suffix, e.g. `"42.50%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Parse a stored position value for rendering. Handles `"50"`, `"50%"`,
/// `"50.5%"`; anything unparseable renders at 0.
pub fn parse_percent(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// An in-flight drag of one dot.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    sku: String,
    origin: (f64, f64),
    /// Local, uncommitted `(top, left)` percentages for visual feedback.
    local: Option<(f64, f64)>,
}

impl DragSession {
    pub fn new(sku: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            sku: sku.into(),
            origin: (x, y),
            local: None,
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Update the local position from a pointer move.
    pub fn update(&mut self, x: f64, y: f64, image_box: &ImageBox) -> (f64, f64) {
        let position = point_to_percent(x, y, image_box);
        self.local = Some(position);
        position
    }

    fn travel(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.origin.0;
        let dy = y - self.origin.1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Finish the drag. Returns the commit only when the pointer
    /// travelled more than the threshold; a stationary press-release is
    /// a click and must not mutate anything.
    pub fn finish(self, x: f64, y: f64, image_box: &ImageBox) -> Option<PositionCommit> {
        if self.travel(x, y) <= DRAG_THRESHOLD_PX {
            return None;
        }

        // If no move event fired, compute from the release point.
        let (top, left) = self
            .local
            .unwrap_or_else(|| point_to_percent(x, y, image_box));

        Some(PositionCommit {
            sku: self.sku,
            top: format_percent(top),
            left: format_percent(left),
        })
    }
}

/// Editor interaction mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorMode {
    #[default]
    Idle,
    Placement {
        sku: String,
    },
    Dragging(DragSession),
}

/// Mode machine for the interactive position editor.
#[derive(Debug, Clone, Default)]
pub struct PositionEditor {
    mode: EditorMode,
}

impl PositionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Enter placement mode for an unplaced dot.
    pub fn begin_placement(&mut self, sku: impl Into<String>) {
        self.mode = EditorMode::Placement { sku: sku.into() };
    }

    /// SKU currently awaiting placement, if any.
    pub fn placement_sku(&self) -> Option<&str> {
        match &self.mode {
            EditorMode::Placement { sku } => Some(sku),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.mode = EditorMode::Idle;
    }

    /// A click on the image. In placement mode this commits the clicked
    /// position and exits the mode; otherwise it is ignored.
    pub fn image_click(&mut self, x: f64, y: f64, image_box: &ImageBox) -> Option<PositionCommit> {
        let EditorMode::Placement { sku } = std::mem::take(&mut self.mode) else {
            return None;
        };
        let (top, left) = point_to_percent(x, y, image_box);
        Some(PositionCommit {
            sku,
            top: format_percent(top),
            left: format_percent(left),
        })
    }

    /// Pointer down on an already-placed dot starts a drag. Ignored in
    /// placement mode.
    pub fn begin_drag(&mut self, sku: impl Into<String>, x: f64, y: f64) {
        if matches!(self.mode, EditorMode::Placement { .. }) {
            return;
        }
        self.mode = EditorMode::Dragging(DragSession::new(sku, x, y));
    }

    /// Pointer move during a drag; returns the local `(top, left)`
    /// percentages for rendering, without touching the data model.
    pub fn drag_move(&mut self, x: f64, y: f64, image_box: &ImageBox) -> Option<(f64, f64)> {
        match &mut self.mode {
            EditorMode::Dragging(session) => Some(session.update(x, y, image_box)),
            _ => None,
        }
    }

    /// Pointer release. Exits drag mode either way; the commit is only
    /// produced past the drag threshold.
    pub fn end_drag(&mut self, x: f64, y: f64, image_box: &ImageBox) -> Option<PositionCommit> {
        match std::mem::take(&mut self.mode) {
            EditorMode::Dragging(session) => session.finish(x, y, image_box),
            other => {
                self.mode = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_box() -> ImageBox {
        ImageBox {
            left: 100.0,
            top: 50.0,
            width: 400.0,
            height: 200.0,
        }
    }

    #[test]
    fn test_point_to_percent() {
        let (top, left) = point_to_percent(300.0, 150.0, &image_box());
        assert_eq!(top, 50.0);
        assert_eq!(left, 50.0);
    }

    #[test]
    fn test_point_outside_box_clamps() {
        let (top, left) = point_to_percent(0.0, 0.0, &image_box());
        assert_eq!((top, left), (0.0, 0.0));

        let (top, left) = point_to_percent(1000.0, 1000.0, &image_box());
        assert_eq!((top, left), (100.0, 100.0));
    }

    #[test]
    fn test_degenerate_box() {
        let degenerate = ImageBox {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
        assert_eq!(point_to_percent(10.0, 10.0, &degenerate), (0.0, 0.0));
    }

    #[test]
    fn test_format_and_parse_percent() {
        assert_eq!(format_percent(42.5), "42.50%");
        assert_eq!(parse_percent("42.50%"), 42.5);
        assert_eq!(parse_percent("50"), 50.0);
        assert_eq!(parse_percent(""), 0.0);
        assert_eq!(parse_percent("abc"), 0.0);
    }

    #[test]
    fn test_placement_click_commits_and_exits() {
        let mut editor = PositionEditor::new();
        editor.begin_placement("dot1");
        assert_eq!(editor.placement_sku(), Some("dot1"));

        let commit = editor.image_click(300.0, 150.0, &image_box()).unwrap();
        assert_eq!(commit.sku, "dot1");
        assert_eq!(commit.top, "50.00%");
        assert_eq!(commit.left, "50.00%");

        // Mode exited: the next click does nothing.
        assert!(editor.image_click(300.0, 150.0, &image_box()).is_none());
    }

    #[test]
    fn test_click_without_placement_mode_is_ignored() {
        let mut editor = PositionEditor::new();
        assert!(editor.image_click(300.0, 150.0, &image_box()).is_none());
    }

    #[test]
    fn test_drag_below_threshold_commits_nothing() {
        let mut editor = PositionEditor::new();
        editor.begin_drag("dot1", 200.0, 100.0);
        editor.drag_move(202.0, 101.0, &image_box());
        assert!(editor.end_drag(202.0, 101.0, &image_box()).is_none());
        assert_eq!(editor.mode(), &EditorMode::Idle);
    }

    #[test]
    fn test_drag_past_threshold_commits_final_position() {
        let mut editor = PositionEditor::new();
        editor.begin_drag("dot1", 200.0, 100.0);
        let local = editor.drag_move(300.0, 150.0, &image_box()).unwrap();
        assert_eq!(local, (50.0, 50.0));

        let commit = editor.end_drag(300.0, 150.0, &image_box()).unwrap();
        assert_eq!(commit.top, "50.00%");
        assert_eq!(commit.left, "50.00%");
    }

    #[test]
    fn test_drag_without_move_uses_release_point() {
        let mut editor = PositionEditor::new();
        editor.begin_drag("dot1", 200.0, 100.0);
        let commit = editor.end_drag(300.0, 150.0, &image_box()).unwrap();
        assert_eq!(commit.top, "50.00%");
        assert_eq!(commit.left, "50.00%");
    }

    #[test]
    fn test_begin_drag_ignored_during_placement() {
        let mut editor = PositionEditor::new();
        editor.begin_placement("dot1");
        editor.begin_drag("dot2", 0.0, 0.0);
        assert_eq!(editor.placement_sku(), Some("dot1"));
    }
}
