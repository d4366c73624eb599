//! Unified input sampling
//!
//! Keyboard keys and pointer/touch contacts are mapped to seven logical
//! buttons. Raw events may arrive at any time; `sample()` folds them into the
//! current snapshot once per tick and `end_frame()` copies it into the
//! previous snapshot after the tick's logic has run. Press/release edges are
//! derived from the two snapshots on demand.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::consts::*;
use crate::sim::collision::distance;

/// Logical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// Primary action
    A,
    /// Secondary action
    B,
    Pause,
}

impl Button {
    pub const ALL: [Button; 7] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::Pause,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::A => "a",
            Button::B => "b",
            Button::Pause => "pause",
        }
    }
}

/// Fixed key table (web `KeyboardEvent.code` names)
pub fn button_for_key(code: &str) -> Option<Button> {
    match code {
        "ArrowUp" | "KeyW" => Some(Button::Up),
        "ArrowDown" | "KeyS" => Some(Button::Down),
        "ArrowLeft" | "KeyA" => Some(Button::Left),
        "ArrowRight" | "KeyD" => Some(Button::Right),
        "Space" | "KeyZ" => Some(Button::A),
        "ShiftLeft" | "ShiftRight" => Some(Button::B),
        "KeyP" => Some(Button::Pause),
        _ => None,
    }
}

/// Snapshot of every logical button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState([bool; 7]);

impl ButtonState {
    #[inline]
    pub fn get(&self, b: Button) -> bool {
        self.0[b.index()]
    }

    #[inline]
    pub fn set(&mut self, b: Button, down: bool) {
        self.0[b.index()] = down;
    }
}

/// What a touch contact controls, fixed at press time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRole {
    Joystick,
    ButtonA,
    ButtonB,
    /// Landed in the game area; ignored
    None,
}

/// Virtual joystick driven by a drag in the input bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    pub origin: Vec2,
    pub current: Vec2,
    pub active: bool,
    pub deadzone: f32,
    pub max_radius: f32,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            current: Vec2::ZERO,
            active: false,
            deadzone: JOYSTICK_DEADZONE,
            max_radius: JOYSTICK_MAX_RADIUS,
        }
    }
}

impl Joystick {
    /// Record the neutral point at press start
    pub fn start(&mut self, at: Vec2) {
        self.origin = at;
        self.current = at;
        self.active = true;
    }

    pub fn move_to(&mut self, at: Vec2) {
        if self.active {
            self.current = at;
        }
    }

    pub fn release(&mut self) {
        self.active = false;
        self.current = self.origin;
    }

    /// Raw drag delta (unclamped)
    pub fn delta(&self) -> Vec2 {
        if self.active {
            self.current - self.origin
        } else {
            Vec2::ZERO
        }
    }

    /// Knob position for drawing, clamped to `max_radius`
    pub fn knob(&self) -> Vec2 {
        self.origin + self.delta().clamp_length_max(self.max_radius)
    }

    /// Directional booleans from the raw delta against the deadzone
    pub fn directions(&self) -> (bool, bool, bool, bool) {
        let d = self.delta();
        (
            d.y < -self.deadzone,
            d.y > self.deadzone,
            d.x < -self.deadzone,
            d.x > self.deadzone,
        )
    }
}

/// Which region of the input bar a point falls in
pub fn hit_test_input_bar(p: Vec2) -> PointerRole {
    if p.y < SCREEN_HEIGHT || p.y >= HOST_HEIGHT || p.x < 0.0 || p.x >= SCREEN_WIDTH {
        return PointerRole::None;
    }
    let (bx, by) = BUTTON_B_CENTER;
    if distance(p.x, p.y, bx, by) <= BUTTON_B_RADIUS {
        PointerRole::ButtonB
    } else if p.y < TOUCH_ZONE_TOP {
        PointerRole::None
    } else if p.x < SCREEN_WIDTH / 2.0 {
        PointerRole::Joystick
    } else {
        PointerRole::ButtonA
    }
}

/// Canonical input state for one game
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: ButtonState,
    previous: ButtonState,
    keys_down: HashSet<String>,
    pointers: HashMap<u64, PointerRole>,
    joystick: Joystick,
    joystick_pointer: Option<u64>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override joystick radii (from settings)
    pub fn with_joystick(mut self, deadzone: f32, max_radius: f32) -> Self {
        self.joystick.deadzone = deadzone.max(0.0);
        self.joystick.max_radius = max_radius.max(0.0);
        self
    }

    // === Raw events ===

    pub fn key_down(&mut self, code: &str) {
        if button_for_key(code).is_some() {
            self.keys_down.insert(code.to_string());
        }
    }

    pub fn key_up(&mut self, code: &str) {
        self.keys_down.remove(code);
    }

    pub fn pointer_down(&mut self, id: u64, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        let role = hit_test_input_bar(p);
        if role == PointerRole::Joystick {
            if self.joystick_pointer.is_some() {
                // Second drag in the stick zone while one is live: ignore it
                self.pointers.insert(id, PointerRole::None);
                return;
            }
            self.joystick.start(p);
            self.joystick_pointer = Some(id);
            log::debug!("Joystick engaged at ({:.0}, {:.0})", x, y);
        }
        self.pointers.insert(id, role);
    }

    pub fn pointer_move(&mut self, id: u64, x: f32, y: f32) {
        if self.joystick_pointer == Some(id) {
            self.joystick.move_to(Vec2::new(x, y));
        }
    }

    pub fn pointer_up(&mut self, id: u64) {
        self.pointers.remove(&id);
        if self.joystick_pointer == Some(id) {
            self.joystick_pointer = None;
            self.joystick.release();
        }
    }

    /// Drop every held key and contact (focus loss)
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.pointers.clear();
        self.joystick_pointer = None;
        self.joystick.release();
    }

    // === Per-tick bookkeeping ===

    /// Fold raw sources into the current snapshot
    pub fn sample(&mut self) {
        let mut state = ButtonState::default();
        for code in &self.keys_down {
            if let Some(b) = button_for_key(code) {
                state.set(b, true);
            }
        }
        for role in self.pointers.values() {
            match role {
                PointerRole::ButtonA => state.set(Button::A, true),
                PointerRole::ButtonB => state.set(Button::B, true),
                PointerRole::Joystick | PointerRole::None => {}
            }
        }
        let (up, down, left, right) = self.joystick.directions();
        for (b, on) in [
            (Button::Up, up),
            (Button::Down, down),
            (Button::Left, left),
            (Button::Right, right),
        ] {
            if on {
                state.set(b, true);
            }
        }
        self.current = state;
    }

    /// Advance the previous snapshot; call once per tick after all reads
    pub fn end_frame(&mut self) {
        self.previous = self.current;
    }

    /// Swallow any pending edge so a held button does not re-trigger
    pub fn reset_edges(&mut self) {
        self.previous = self.current;
    }

    // === Queries ===

    pub fn is_pressed(&self, b: Button) -> bool {
        self.current.get(b)
    }

    pub fn is_just_pressed(&self, b: Button) -> bool {
        self.current.get(b) && !self.previous.get(b)
    }

    pub fn is_just_released(&self, b: Button) -> bool {
        !self.current.get(b) && self.previous.get(b)
    }

    /// True if any button went down this tick
    pub fn any_just_pressed(&self) -> bool {
        Button::ALL.iter().any(|&b| self.is_just_pressed(b))
    }

    /// -1 (left), 0, or 1 (right)
    pub fn horizontal(&self) -> i32 {
        self.current.get(Button::Right) as i32 - self.current.get(Button::Left) as i32
    }

    /// -1 (up), 0, or 1 (down)
    pub fn vertical(&self) -> i32 {
        self.current.get(Button::Down) as i32 - self.current.get(Button::Up) as i32
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tick(input: &mut InputState) {
        input.sample();
    }

    #[test]
    fn test_key_table() {
        assert_eq!(button_for_key("KeyW"), Some(Button::Up));
        assert_eq!(button_for_key("ArrowRight"), Some(Button::Right));
        assert_eq!(button_for_key("KeyZ"), Some(Button::A));
        assert_eq!(button_for_key("ShiftRight"), Some(Button::B));
        assert_eq!(button_for_key("KeyP"), Some(Button::Pause));
        assert_eq!(button_for_key("KeyQ"), None);
    }

    #[test]
    fn test_just_pressed_lasts_one_tick() {
        let mut input = InputState::new();
        input.key_down("Space");
        tick(&mut input);
        assert!(input.is_just_pressed(Button::A));
        input.end_frame();
        tick(&mut input);
        assert!(input.is_pressed(Button::A));
        assert!(!input.is_just_pressed(Button::A));
        input.end_frame();
        input.key_up("Space");
        tick(&mut input);
        assert!(input.is_just_released(Button::A));
        assert!(!input.is_just_pressed(Button::A));
    }

    #[test]
    fn test_two_keys_same_button() {
        let mut input = InputState::new();
        input.key_down("ArrowLeft");
        input.key_down("KeyA");
        input.key_up("KeyA");
        tick(&mut input);
        assert!(input.is_pressed(Button::Left));
        assert_eq!(input.horizontal(), -1);
    }

    #[test]
    fn test_axes() {
        let mut input = InputState::new();
        input.key_down("ArrowLeft");
        input.key_down("ArrowRight");
        input.key_down("ArrowDown");
        tick(&mut input);
        assert_eq!(input.horizontal(), 0);
        assert_eq!(input.vertical(), 1);
    }

    #[test]
    fn test_event_between_samples_not_visible_until_sample() {
        let mut input = InputState::new();
        tick(&mut input);
        input.key_down("KeyP");
        assert!(!input.is_pressed(Button::Pause));
        tick(&mut input);
        assert!(input.is_just_pressed(Button::Pause));
    }

    #[test]
    fn test_hit_test_zones() {
        assert_eq!(hit_test_input_bar(Vec2::new(40.0, 600.0)), PointerRole::Joystick);
        assert_eq!(hit_test_input_bar(Vec2::new(320.0, 600.0)), PointerRole::ButtonA);
        assert_eq!(hit_test_input_bar(Vec2::new(250.0, 590.0)), PointerRole::ButtonB);
        // B wins over the A quarter it overlaps
        assert_eq!(hit_test_input_bar(Vec2::new(240.0, 610.0)), PointerRole::ButtonB);
        assert_eq!(hit_test_input_bar(Vec2::new(100.0, 300.0)), PointerRole::None);
    }

    #[test]
    fn test_upper_half_of_bar_has_no_role() {
        assert_eq!(hit_test_input_bar(Vec2::new(40.0, 560.0)), PointerRole::None);
        assert_eq!(hit_test_input_bar(Vec2::new(330.0, 589.0)), PointerRole::None);
        assert_eq!(hit_test_input_bar(Vec2::new(40.0, TOUCH_ZONE_TOP)), PointerRole::Joystick);
        assert_eq!(hit_test_input_bar(Vec2::new(330.0, TOUCH_ZONE_TOP)), PointerRole::ButtonA);

        let mut input = InputState::new();
        input.pointer_down(1, 40.0, 560.0);
        input.pointer_down(2, 330.0, 560.0);
        tick(&mut input);
        assert!(!input.joystick().active);
        assert!(!input.any_just_pressed());
    }

    #[test]
    fn test_release_all_drops_keys_and_contacts() {
        let mut input = InputState::new();
        input.key_down("ArrowLeft");
        input.pointer_down(1, 330.0, 620.0);
        input.pointer_down(2, 60.0, 620.0);
        input.pointer_move(2, 10.0, 620.0);
        tick(&mut input);
        assert!(input.any_just_pressed());
        assert!(input.is_pressed(Button::A));
        assert_eq!(input.horizontal(), -1);
        input.end_frame();

        input.release_all();
        tick(&mut input);
        assert!(!input.any_just_pressed());
        assert!(input.is_just_released(Button::A));
        assert_eq!(input.horizontal(), 0);
        assert!(!input.joystick().active);

        // A fresh contact can take the stick again
        input.pointer_down(3, 60.0, 620.0);
        assert!(input.joystick().active);
    }

    #[test]
    fn test_touch_buttons() {
        let mut input = InputState::new();
        input.pointer_down(1, 330.0, 620.0);
        input.pointer_down(2, 250.0, 590.0);
        tick(&mut input);
        assert!(input.is_just_pressed(Button::A));
        assert!(input.is_just_pressed(Button::B));
        input.end_frame();
        input.pointer_up(1);
        tick(&mut input);
        assert!(input.is_just_released(Button::A));
        assert!(input.is_pressed(Button::B));
    }

    #[test]
    fn test_joystick_deadzone_uses_raw_delta() {
        let mut input = InputState::new();
        input.pointer_down(7, 80.0, 610.0);
        input.pointer_move(7, 95.0, 610.0);
        tick(&mut input);
        assert_eq!(input.horizontal(), 0);

        input.pointer_move(7, 180.0, 580.0);
        tick(&mut input);
        assert_eq!(input.horizontal(), 1);
        assert_eq!(input.vertical(), -1);
        // Indicator clamped, thresholding not
        let knob = input.joystick().knob();
        assert!((knob - Vec2::new(80.0, 610.0)).length() <= JOYSTICK_MAX_RADIUS + 1e-3);

        input.pointer_up(7);
        tick(&mut input);
        assert_eq!(input.horizontal(), 0);
        assert!(!input.joystick().active);
    }

    #[test]
    fn test_joystick_keeps_role_outside_zone() {
        let mut input = InputState::new();
        input.pointer_down(1, 60.0, 600.0);
        // Dragging across into the A quarter still steers
        input.pointer_move(1, 300.0, 600.0);
        tick(&mut input);
        assert!(input.is_pressed(Button::Right));
        assert!(!input.is_pressed(Button::A));
    }

    #[test]
    fn test_reset_edges() {
        let mut input = InputState::new();
        input.key_down("Space");
        tick(&mut input);
        input.reset_edges();
        assert!(!input.is_just_pressed(Button::A));
        assert!(input.is_pressed(Button::A));
    }

    proptest! {
        #[test]
        fn prop_just_pressed_is_single_tick_edge(seq in prop::collection::vec(any::<bool>(), 1..60)) {
            let mut input = InputState::new();
            let mut prev = false;
            let mut last_edge = false;
            for held in seq {
                if held { input.key_down("KeyZ") } else { input.key_up("KeyZ") }
                input.sample();
                let edge = input.is_just_pressed(Button::A);
                prop_assert_eq!(edge, held && !prev);
                prop_assert!(!(edge && last_edge));
                if !held {
                    prop_assert!(!edge);
                }
                last_edge = edge;
                prev = held;
                input.end_frame();
            }
        }
    }
}
