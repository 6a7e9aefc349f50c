//! Input fusion
//!
//! Maps the pose signal (when the camera produced one this tick) or the
//! keyboard and mouse (when it did not) onto the [`TickInput`] shape each
//! game expects. The choice is made per tick.

use glam::Vec2;

use crate::motion::PoseSignal;
use crate::platform::{Key, ManualInput};
use crate::settings::Settings;
use crate::sim::{AxisControl, DrawControl, GameKind, TickInput};
use crate::to_screen;

/// Pickleball maps the arm onto `[PADDLE_TOP, height - PADDLE_BAND_TRIM + PADDLE_TOP]`
const PADDLE_TOP: f32 = 60.0;
const PADDLE_BAND_TRIM: f32 = 200.0;
const PICKLEBALL_NUDGE: f32 = 10.0;
const TENNIS_NUDGE: f32 = 8.0;
const ARCHERY_NUDGE: f32 = 5.0;
/// Keyboard-driven hand speed (pixels per tick)
const HAND_NUDGE: f32 = 10.0;

/// Arm movement per tick that counts as pulling the string
pub const DRAW_START_DELTA: f32 = 0.02;
/// Arm movement per tick below which a drawn bow is considered held still
pub const DRAW_HOLD_DELTA: f32 = 0.01;
/// Minimum draw for a gesture release
pub const DRAW_RELEASE_MIN: f32 = 0.3;
/// Draw gained per tick while the draw key is held
pub const KEY_DRAW_RATE: f32 = 0.02;

/// Bow draw state machine shared by camera and keyboard control
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawGesture {
    pub drawing: bool,
    /// Power in [0, 1]
    pub amount: f32,
}

impl DrawGesture {
    /// Advance one tick. Returns the draw amount when the arrow should be
    /// released.
    pub fn update(&mut self, draw: &DrawControl, flying: bool, arrows_left: u32) -> Option<f32> {
        if draw.pressed && !flying && arrows_left > 0 {
            self.drawing = true;
        }
        if draw.released && self.drawing && !flying && arrows_left > 0 {
            return Some(self.release());
        }

        match draw.arm_delta {
            Some(delta) => {
                if delta > DRAW_START_DELTA && !flying {
                    self.drawing = true;
                    self.amount = (self.amount + delta * 2.0).min(1.0);
                } else if self.drawing
                    && self.amount > DRAW_RELEASE_MIN
                    && delta < DRAW_HOLD_DELTA
                    && !flying
                    && arrows_left > 0
                {
                    return Some(self.release());
                }
            }
            None => {
                if self.drawing {
                    self.amount = (self.amount + KEY_DRAW_RATE).min(1.0);
                }
            }
        }
        None
    }

    fn release(&mut self) -> f32 {
        let amount = self.amount;
        self.drawing = false;
        self.amount = 0.0;
        log::debug!("Bow released at {:.2}", amount);
        amount
    }
}

/// Per-game translation of camera or manual input into tick commands
#[derive(Debug, Clone)]
pub struct InputFusion {
    width: f32,
    height: f32,
    dt: f32,
    /// Arm height seen on the previous camera tick (archery draw)
    prev_arm_y: f32,
    /// Keyboard-steered left hand, playfield pixels
    left_hand: Vec2,
    /// Mouse-steered right hand, playfield pixels
    right_hand: Vec2,
}

impl InputFusion {
    pub fn new(settings: &Settings) -> Self {
        let width = settings.playfield.width;
        let height = settings.playfield.height;
        Self {
            width,
            height,
            dt: settings.tick_seconds,
            prev_arm_y: crate::consts::NEUTRAL,
            left_hand: Vec2::new(width * 0.3, height * 0.5),
            right_hand: Vec2::new(width * 0.7, height * 0.5),
        }
    }

    /// Forget per-game state (call when a game starts)
    pub fn reset(&mut self) {
        self.prev_arm_y = crate::consts::NEUTRAL;
        self.left_hand = Vec2::new(self.width * 0.3, self.height * 0.5);
        self.right_hand = Vec2::new(self.width * 0.7, self.height * 0.5);
    }

    /// Build this tick's input for `kind`. `signal` is None when no camera
    /// frame was available this tick.
    pub fn fuse(
        &mut self,
        kind: GameKind,
        signal: Option<&PoseSignal>,
        manual: &ManualInput,
    ) -> TickInput {
        let mut input = TickInput {
            dt: self.dt,
            ..Default::default()
        };

        match kind {
            GameKind::Pickleball => {
                input.serve = manual.was_pressed(Key::Space);
                input.axis = match signal {
                    Some(s) => AxisControl::Track(
                        s.arm_center_y * (self.height - PADDLE_BAND_TRIM) + PADDLE_TOP,
                    ),
                    None => vertical_nudge(manual, PICKLEBALL_NUDGE),
                };
            }
            GameKind::Tennis => {
                input.axis = match signal {
                    Some(s) => AxisControl::Track(s.arm_center_y * self.height),
                    None => vertical_nudge(manual, TENNIS_NUDGE),
                };
            }
            GameKind::Archery => {
                input.axis = match signal {
                    Some(s) => AxisControl::Track(s.arm_center_y * self.height),
                    None => vertical_nudge(manual, ARCHERY_NUDGE),
                };
                input.draw = DrawControl {
                    pressed: manual.was_pressed(Key::Space),
                    released: manual.was_released(Key::Space),
                    arm_delta: signal.map(|s| {
                        let delta = (s.arm_center_y - self.prev_arm_y).abs();
                        self.prev_arm_y = s.arm_center_y;
                        delta
                    }),
                };
            }
            GameKind::Boxing | GameKind::Rhythm => {
                let (left, right) = match signal {
                    Some(s) => (
                        to_screen(s.left_hand, self.width, self.height),
                        to_screen(s.right_hand, self.width, self.height),
                    ),
                    None => self.manual_hands(manual),
                };
                input.left_hand = left;
                input.right_hand = right;
            }
        }
        input
    }

    fn manual_hands(&mut self, manual: &ManualInput) -> (Vec2, Vec2) {
        if let Some(mouse) = manual.mouse() {
            self.right_hand = mouse;
        }
        let mut step = Vec2::ZERO;
        if manual.is_held(Key::W) {
            step.y -= HAND_NUDGE;
        }
        if manual.is_held(Key::S) {
            step.y += HAND_NUDGE;
        }
        if manual.is_held(Key::A) {
            step.x -= HAND_NUDGE;
        }
        if manual.is_held(Key::D) {
            step.x += HAND_NUDGE;
        }
        self.left_hand = (self.left_hand + step).clamp(Vec2::ZERO, Vec2::new(self.width, self.height));
        (self.left_hand, self.right_hand)
    }
}

/// Up/W and Down/S as a relative step
fn vertical_nudge(manual: &ManualInput, step: f32) -> AxisControl {
    let mut dy = 0.0;
    if manual.any_held(Key::W, Key::Up) {
        dy -= step;
    }
    if manual.any_held(Key::S, Key::Down) {
        dy += step;
    }
    if dy == 0.0 {
        AxisControl::Hold
    } else {
        AxisControl::Nudge(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::InputEvent;

    fn signal(arm: f32) -> PoseSignal {
        PoseSignal {
            arm_center_y: arm,
            ..Default::default()
        }
    }

    fn camera_draw(delta: f32) -> DrawControl {
        DrawControl {
            arm_delta: Some(delta),
            ..Default::default()
        }
    }

    #[test]
    fn test_gesture_draw_then_hold_releases() {
        let mut g = DrawGesture::default();
        assert_eq!(g.update(&camera_draw(0.1), false, 10), None);
        assert!(g.drawing);
        assert!((g.amount - 0.2).abs() < 1e-6);
        assert_eq!(g.update(&camera_draw(0.1), false, 10), None);
        // 0.4 > 0.3 and the arm is still
        let released = g.update(&camera_draw(0.005), false, 10);
        assert!(released.is_some_and(|a| (a - 0.4).abs() < 1e-6));
        assert!(!g.drawing);
        assert_eq!(g.amount, 0.0);
    }

    #[test]
    fn test_gesture_needs_enough_draw() {
        let mut g = DrawGesture::default();
        g.update(&camera_draw(0.05), false, 10);
        assert_eq!(g.update(&camera_draw(0.0), false, 10), None);
        assert!(g.drawing);
    }

    #[test]
    fn test_gesture_caps_at_full_draw() {
        let mut g = DrawGesture::default();
        for _ in 0..10 {
            g.update(&camera_draw(0.3), false, 10);
        }
        assert_eq!(g.amount, 1.0);
    }

    #[test]
    fn test_gesture_blocked_while_flying_or_empty() {
        let mut g = DrawGesture::default();
        g.update(&camera_draw(0.3), true, 10);
        assert!(!g.drawing);

        g.drawing = true;
        g.amount = 0.8;
        assert_eq!(g.update(&camera_draw(0.0), false, 0), None);
    }

    #[test]
    fn test_pickleball_camera_band() {
        let settings = Settings::default();
        let mut fusion = InputFusion::new(&settings);
        let manual = ManualInput::new();
        let top = fusion.fuse(GameKind::Pickleball, Some(&signal(0.0)), &manual);
        let bottom = fusion.fuse(GameKind::Pickleball, Some(&signal(1.0)), &manual);
        assert_eq!(top.axis, AxisControl::Track(60.0));
        assert_eq!(bottom.axis, AxisControl::Track(460.0));
    }

    #[test]
    fn test_keyboard_fallback_per_tick() {
        let settings = Settings::default();
        let mut fusion = InputFusion::new(&settings);
        let mut manual = ManualInput::new();
        manual.handle(InputEvent::KeyDown(Key::Up));
        let with_camera = fusion.fuse(GameKind::Tennis, Some(&signal(0.5)), &manual);
        assert_eq!(with_camera.axis, AxisControl::Track(300.0));
        let without = fusion.fuse(GameKind::Tennis, None, &manual);
        assert_eq!(without.axis, AxisControl::Nudge(-TENNIS_NUDGE));
    }

    #[test]
    fn test_archery_delta_from_previous_camera_tick() {
        let settings = Settings::default();
        let mut fusion = InputFusion::new(&settings);
        let manual = ManualInput::new();
        let first = fusion.fuse(GameKind::Archery, Some(&signal(0.6)), &manual);
        assert!(first.draw.arm_delta.is_some_and(|d| (d - 0.1).abs() < 1e-6));
        let second = fusion.fuse(GameKind::Archery, Some(&signal(0.55)), &manual);
        assert!(second.draw.arm_delta.is_some_and(|d| (d - 0.05).abs() < 1e-6));
        let keyboard = fusion.fuse(GameKind::Archery, None, &manual);
        assert_eq!(keyboard.draw.arm_delta, None);
    }

    #[test]
    fn test_manual_hands() {
        let settings = Settings::default();
        let mut fusion = InputFusion::new(&settings);
        let mut manual = ManualInput::new();
        manual.handle(InputEvent::MouseMove(Vec2::new(500.0, 100.0)));
        manual.handle(InputEvent::KeyDown(Key::A));
        let input = fusion.fuse(GameKind::Boxing, None, &manual);
        assert_eq!(input.right_hand, Vec2::new(500.0, 100.0));
        assert!(input.left_hand.abs_diff_eq(Vec2::new(230.0, 300.0), 1e-3));

        for _ in 0..100 {
            fusion.fuse(GameKind::Boxing, None, &manual);
        }
        let input = fusion.fuse(GameKind::Rhythm, None, &manual);
        assert_eq!(input.left_hand.x, 0.0);
    }

    #[test]
    fn test_camera_hands_to_screen() {
        let settings = Settings::default();
        let mut fusion = InputFusion::new(&settings);
        let s = PoseSignal {
            arm_center_y: 0.5,
            left_hand: Vec2::new(0.25, 0.5),
            right_hand: Vec2::new(0.75, 0.1),
        };
        let input = fusion.fuse(GameKind::Rhythm, Some(&s), &ManualInput::new());
        assert_eq!(input.left_hand, Vec2::new(200.0, 300.0));
        assert_eq!(input.right_hand, Vec2::new(600.0, 60.0));
    }
}
