//! Selection state machine.
//!
//! Window events are translated into [`SelectionEvent`]s and fed through
//! [`SelectionState::step`], which returns the next state together with the
//! single side effect the overlay has to perform. Nothing here touches a
//! window, so the whole interaction is testable headless.

/// Pointer position in overlay pixels. The overlay covers the snapshot 1:1,
/// so these are snapshot coordinates as well.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Region of the snapshot to save, already clamped and normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SelectionState {
    /// No button held.
    #[default]
    Idle,
    /// Primary button held: `anchor` stays put, `current` follows the pointer.
    Selecting { anchor: Point, current: Point },
    /// Pan key held while selecting: both corners move with the pointer.
    /// `reference` is the pointer position the next delta is measured from.
    Panning {
        anchor: Point,
        current: Point,
        reference: Point,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionEvent {
    PointerPressed(Point),
    PointerMoved(Point),
    PointerReleased(Point),
    PanKeyDown,
    PanKeyUp,
    CancelKey,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    None,
    Redraw,
    /// Selection started: grab the pointer and redraw.
    CapturePointer,
    /// Button released: release the pointer, save the region if there is one
    /// and close the overlay.
    Commit(Option<ExportRect>),
    /// Close without saving.
    Cancel,
}

/// Text shown next to the pointer while selecting.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

const LABEL_ABOVE: f64 = 30.0;
const LABEL_BELOW: f64 = 20.0;

impl SelectionState {
    /// Advance the machine. `bounds` is the snapshot size used to clamp the
    /// committed rectangle.
    pub fn step(self, event: SelectionEvent, bounds: (u32, u32)) -> (SelectionState, Effect) {
        use SelectionEvent::*;
        use SelectionState::*;
        match (self, event) {
            (_, CancelKey) => (Idle, Effect::Cancel),
            (Idle, PointerPressed(p)) => (
                Selecting {
                    anchor: p,
                    current: p,
                },
                Effect::CapturePointer,
            ),
            (Selecting { anchor, .. }, PointerMoved(p)) => (
                Selecting {
                    anchor,
                    current: p,
                },
                Effect::Redraw,
            ),
            (Selecting { anchor, current }, PanKeyDown) => (
                Panning {
                    anchor,
                    current,
                    reference: current,
                },
                Effect::Redraw,
            ),
            (
                Panning {
                    anchor, reference, ..
                },
                PointerMoved(p),
            ) => {
                let (dx, dy) = (p.x - reference.x, p.y - reference.y);
                (
                    Panning {
                        anchor: anchor.translate(dx, dy),
                        current: p,
                        reference: p,
                    },
                    Effect::Redraw,
                )
            }
            (Panning { anchor, current, .. }, PanKeyUp) => {
                (Selecting { anchor, current }, Effect::Redraw)
            }
            (Selecting { anchor, .. } | Panning { anchor, .. }, PointerReleased(p)) => (
                Idle,
                Effect::Commit(normalize(anchor, p, bounds.0, bounds.1)),
            ),
            (state, _) => (state, Effect::None),
        }
    }

    pub fn corners(&self) -> Option<(Point, Point)> {
        match *self {
            SelectionState::Idle => None,
            SelectionState::Selecting { anchor, current }
            | SelectionState::Panning {
                anchor, current, ..
            } => Some((anchor, current)),
        }
    }

    /// Live rectangle as (x, y, w, h) in whole pixels, unclamped.
    pub fn live_rect(&self) -> Option<(i32, i32, u32, u32)> {
        let (a, c) = self.corners()?;
        let (ax, ay) = (a.x.floor(), a.y.floor());
        let (cx, cy) = (c.x.floor(), c.y.floor());
        Some((
            ax.min(cx) as i32,
            ay.min(cy) as i32,
            (cx - ax).abs() as u32,
            (cy - ay).abs() as u32,
        ))
    }

    /// Pointer coordinates while panning, the rectangle size otherwise. Sits
    /// above the pointer when dragging upwards so it does not cover the
    /// selection, below it otherwise.
    pub fn label(&self) -> Option<Label> {
        let (anchor, current) = self.corners()?;
        let text = match self {
            SelectionState::Panning { .. } => {
                format!("({}, {})", current.x.floor(), current.y.floor())
            }
            _ => {
                let (_, _, w, h) = self.live_rect()?;
                format!("{w}x{h}")
            }
        };
        let y = if current.y <= anchor.y {
            current.y - LABEL_ABOVE
        } else {
            current.y + LABEL_BELOW
        };
        Some(Label {
            text,
            x: current.x,
            y,
        })
    }
}

/// Clamp both corners into `[0, width) x [0, height)`, then take min/max so
/// any drag direction yields the same rectangle. `None` when the result has
/// no area.
pub fn normalize(start: Point, end: Point, width: u32, height: u32) -> Option<ExportRect> {
    if width == 0 || height == 0 {
        return None;
    }
    let clamp = |v: f64, len: u32| v.clamp(0.0, (len - 1) as f64).floor() as u32;
    let (sx, sy) = (clamp(start.x, width), clamp(start.y, height));
    let (ex, ey) = (clamp(end.x, width), clamp(end.y, height));
    let rect = ExportRect {
        x: sx.min(ex),
        y: sy.min(ey),
        width: sx.abs_diff(ex),
        height: sy.abs_diff(ey),
    };
    if rect.width == 0 || rect.height == 0 {
        None
    } else {
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: (u32, u32) = (1920, 1080);

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn run(events: &[SelectionEvent]) -> (SelectionState, Vec<Effect>) {
        let mut state = SelectionState::Idle;
        let mut effects = Vec::new();
        for &ev in events {
            let (next, effect) = state.step(ev, BOUNDS);
            state = next;
            effects.push(effect);
        }
        (state, effects)
    }

    fn committed(effects: &[Effect]) -> Option<ExportRect> {
        match effects.last() {
            Some(Effect::Commit(rect)) => *rect,
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn press_starts_selection_at_pointer() {
        let (state, effects) = run(&[SelectionEvent::PointerPressed(p(5.0, 6.0))]);
        assert_eq!(
            state,
            SelectionState::Selecting {
                anchor: p(5.0, 6.0),
                current: p(5.0, 6.0)
            }
        );
        assert_eq!(effects, vec![Effect::CapturePointer]);
    }

    #[test]
    fn reverse_drag_is_normalized() {
        use SelectionEvent::*;
        let (state, effects) = run(&[
            PointerPressed(p(100.0, 100.0)),
            PointerMoved(p(50.0, 50.0)),
            PointerReleased(p(50.0, 50.0)),
        ]);
        assert_eq!(state, SelectionState::Idle);
        assert_eq!(
            committed(&effects),
            Some(ExportRect {
                x: 50,
                y: 50,
                width: 50,
                height: 50
            })
        );
    }

    #[test]
    fn pan_moves_rectangle_without_resizing() {
        use SelectionEvent::*;
        let (_, effects) = run(&[
            PointerPressed(p(10.0, 10.0)),
            PointerMoved(p(30.0, 40.0)),
            PanKeyDown,
            PointerMoved(p(35.0, 45.0)),
            PanKeyUp,
            PointerReleased(p(35.0, 45.0)),
        ]);
        assert_eq!(
            committed(&effects),
            Some(ExportRect {
                x: 15,
                y: 15,
                width: 20,
                height: 30
            })
        );
    }

    #[test]
    fn pan_accumulates_over_several_moves() {
        use SelectionEvent::*;
        let (state, _) = run(&[
            PointerPressed(p(10.0, 10.0)),
            PointerMoved(p(20.0, 20.0)),
            PanKeyDown,
            PointerMoved(p(23.0, 21.0)),
            PointerMoved(p(30.0, 17.0)),
        ]);
        match state {
            SelectionState::Panning {
                anchor, current, ..
            } => {
                assert_eq!(anchor, p(20.0, 7.0));
                assert_eq!(current, p(30.0, 17.0));
            }
            other => panic!("expected panning, got {other:?}"),
        }
    }

    #[test]
    fn release_while_panning_commits_translated_rect() {
        use SelectionEvent::*;
        let (_, effects) = run(&[
            PointerPressed(p(0.0, 0.0)),
            PointerMoved(p(40.0, 10.0)),
            PanKeyDown,
            PointerMoved(p(50.0, 30.0)),
            PointerReleased(p(50.0, 30.0)),
        ]);
        assert_eq!(
            committed(&effects),
            Some(ExportRect {
                x: 10,
                y: 20,
                width: 40,
                height: 10
            })
        );
    }

    #[test]
    fn repeated_pan_key_keeps_reference() {
        use SelectionEvent::*;
        let (state, effects) = run(&[
            PointerPressed(p(0.0, 0.0)),
            PointerMoved(p(10.0, 10.0)),
            PanKeyDown,
            PointerMoved(p(12.0, 12.0)),
            PanKeyDown,
        ]);
        assert_eq!(effects.last(), Some(&Effect::None));
        assert!(matches!(
            state,
            SelectionState::Panning { reference, .. } if reference == p(12.0, 12.0)
        ));
    }

    #[test]
    fn resize_resumes_after_pan_key_up() {
        use SelectionEvent::*;
        let (state, _) = run(&[
            PointerPressed(p(0.0, 0.0)),
            PointerMoved(p(10.0, 10.0)),
            PanKeyDown,
            PointerMoved(p(15.0, 15.0)),
            PanKeyUp,
            PointerMoved(p(30.0, 30.0)),
        ]);
        assert_eq!(
            state,
            SelectionState::Selecting {
                anchor: p(5.0, 5.0),
                current: p(30.0, 30.0)
            }
        );
    }

    #[test]
    fn cancel_from_any_state() {
        use SelectionEvent::*;
        for prefix in [
            vec![],
            vec![PointerPressed(p(1.0, 1.0))],
            vec![PointerPressed(p(1.0, 1.0)), PanKeyDown],
        ] {
            let mut events = prefix;
            events.push(CancelKey);
            let (state, effects) = run(&events);
            assert_eq!(state, SelectionState::Idle);
            assert_eq!(effects.last(), Some(&Effect::Cancel));
        }
    }

    #[test]
    fn idle_ignores_moves_releases_and_pan() {
        use SelectionEvent::*;
        let (state, effects) = run(&[
            PointerMoved(p(3.0, 3.0)),
            PanKeyDown,
            PanKeyUp,
            PointerReleased(p(3.0, 3.0)),
        ]);
        assert_eq!(state, SelectionState::Idle);
        assert!(effects.iter().all(|e| *e == Effect::None));
    }

    #[test]
    fn zero_area_release_commits_nothing() {
        use SelectionEvent::*;
        let (_, effects) = run(&[
            PointerPressed(p(10.0, 10.0)),
            PointerMoved(p(60.0, 10.0)),
            PointerReleased(p(60.0, 10.0)),
        ]);
        assert_eq!(committed(&effects), None);
    }

    #[test]
    fn normalize_clamps_into_snapshot() {
        let rect = normalize(p(-20.0, -5.0), p(5000.0, 3000.0), 1920, 1080).unwrap();
        assert_eq!(
            rect,
            ExportRect {
                x: 0,
                y: 0,
                width: 1919,
                height: 1079
            }
        );
    }

    #[test]
    fn normalize_is_direction_independent() {
        let corners = [p(10.0, 20.0), p(110.0, 70.0)];
        let expected = normalize(corners[0], corners[1], 500, 500);
        assert_eq!(normalize(corners[1], corners[0], 500, 500), expected);
        assert_eq!(
            normalize(p(10.0, 70.0), p(110.0, 20.0), 500, 500),
            expected
        );
        assert_eq!(
            expected,
            Some(ExportRect {
                x: 10,
                y: 20,
                width: 100,
                height: 50
            })
        );
    }

    #[test]
    fn normalize_collapsed_by_clamping_is_empty() {
        // both corners left of the snapshot collapse onto x = 0
        assert_eq!(normalize(p(-50.0, 0.0), p(-10.0, 40.0), 100, 100), None);
        assert_eq!(normalize(p(0.0, 0.0), p(10.0, 10.0), 0, 100), None);
    }

    #[test]
    fn label_shows_size_below_when_dragging_down() {
        let state = SelectionState::Selecting {
            anchor: p(10.0, 10.0),
            current: p(110.0, 60.0),
        };
        assert_eq!(
            state.label(),
            Some(Label {
                text: "100x50".into(),
                x: 110.0,
                y: 80.0
            })
        );
    }

    #[test]
    fn label_goes_above_when_dragging_up() {
        let state = SelectionState::Selecting {
            anchor: p(100.0, 100.0),
            current: p(40.0, 70.0),
        };
        let label = state.label().unwrap();
        assert_eq!(label.text, "60x30");
        assert_eq!(label.y, 40.0);
    }

    #[test]
    fn label_shows_coordinates_while_panning() {
        let state = SelectionState::Panning {
            anchor: p(0.0, 0.0),
            current: p(12.7, 34.2),
            reference: p(12.7, 34.2),
        };
        assert_eq!(state.label().unwrap().text, "(12, 34)");
        assert_eq!(SelectionState::Idle.label(), None);
    }

    #[test]
    fn live_rect_tracks_pointer() {
        let state = SelectionState::Selecting {
            anchor: p(50.0, 20.0),
            current: p(10.5, 80.9),
        };
        assert_eq!(state.live_rect(), Some((10, 20, 40, 60)));
    }
}
