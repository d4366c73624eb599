//! Runtime-owned overlays
//!
//! Everything the driver draws on its own: loading bar, title, pause and
//! result screens, the touch input bar, and the FPS counter.

use glam::Vec2;

use crate::consts::*;
use crate::input::InputState;
use crate::renderer::{Surface, TextAlign, colors};
use crate::Rect;

/// Blink period for "press" prompts (ms)
const BLINK_MS: f64 = 500.0;

const PROGRESS_BAR_WIDTH: f32 = 240.0;
const PROGRESS_BAR_HEIGHT: f32 = 12.0;

/// Middle of the lower half of the bar, where the touch quarters sit
const CONTROL_ROW_Y: f32 = SCREEN_HEIGHT + INPUT_BAR_HEIGHT * 0.75;

/// Joystick base position when no drag is in progress
const JOYSTICK_REST_CENTER: Vec2 = Vec2::new(90.0, CONTROL_ROW_Y);
const BUTTON_A_CENTER: Vec2 = Vec2::new(315.0, CONTROL_ROW_Y);
const BUTTON_A_RADIUS: f32 = 22.0;

fn center_x() -> f32 {
    SCREEN_WIDTH / 2.0
}

fn overlay(surface: &mut dyn Surface) {
    surface.fill_rect(
        Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
        colors::OVERLAY,
    );
}

fn centered(surface: &mut dyn Surface, text: &str, y: f32, size: f32, color: crate::Color) {
    surface.draw_text(text, Vec2::new(center_x(), y), size, color, TextAlign::Center);
}

/// True during the visible half of the blink cycle
pub fn blink_visible(time_ms: f64) -> bool {
    (time_ms.max(0.0) / BLINK_MS) as u64 % 2 == 0
}

/// Progress bar with a percentage label
pub fn draw_loading(surface: &mut dyn Surface, progress: f32) {
    let progress = progress.clamp(0.0, 1.0);
    let x = center_x() - PROGRESS_BAR_WIDTH / 2.0;
    let y = SCREEN_HEIGHT / 2.0;

    centered(surface, "LOADING", y - 30.0, 20.0, colors::TEXT);
    surface.fill_rect(
        Rect::new(x, y, PROGRESS_BAR_WIDTH, PROGRESS_BAR_HEIGHT),
        colors::PROGRESS_TRACK,
    );
    if progress > 0.0 {
        surface.fill_rect(
            Rect::new(x, y, PROGRESS_BAR_WIDTH * progress, PROGRESS_BAR_HEIGHT),
            colors::PROGRESS_FILL,
        );
    }
    let label = format!("{}%", (progress * 100.0).round() as u32);
    centered(surface, &label, y + 36.0, 14.0, colors::TEXT);
}

/// Game title with a blinking start prompt
pub fn draw_title(surface: &mut dyn Surface, title: &str, time_ms: f64) {
    centered(surface, title, SCREEN_HEIGHT * 0.35, 36.0, colors::ACCENT);
    if blink_visible(time_ms) {
        centered(surface, "PRESS A TO START", SCREEN_HEIGHT * 0.6, 16.0, colors::TEXT);
    }
}

pub fn draw_pause(surface: &mut dyn Surface) {
    overlay(surface);
    centered(surface, "PAUSED", SCREEN_HEIGHT / 2.0 - 10.0, 32.0, colors::TEXT);
    centered(surface, "PRESS P TO RESUME", SCREEN_HEIGHT / 2.0 + 30.0, 14.0, colors::TEXT);
}

pub fn draw_stage_clear(surface: &mut dyn Surface, stage: u32, score: u64, bonus: u64) {
    overlay(surface);
    let y = SCREEN_HEIGHT / 2.0;
    centered(surface, &format!("STAGE {} CLEAR", stage), y - 50.0, 28.0, colors::ACCENT);
    centered(surface, &format!("BONUS {}", bonus), y, 18.0, colors::TEXT);
    centered(surface, &format!("SCORE {}", score), y + 28.0, 18.0, colors::TEXT);
    centered(surface, "PRESS A TO CONTINUE", y + 80.0, 14.0, colors::TEXT);
}

/// Result screen; the restart prompt only appears once restarts are accepted
fn draw_result(surface: &mut dyn Surface, heading: &str, color: crate::Color, score: u64, can_restart: bool) {
    overlay(surface);
    let y = SCREEN_HEIGHT / 2.0;
    centered(surface, heading, y - 40.0, 32.0, color);
    centered(surface, &format!("SCORE {}", score), y + 4.0, 18.0, colors::TEXT);
    if can_restart {
        centered(surface, "PRESS A TO RESTART", y + 60.0, 14.0, colors::TEXT);
    }
}

pub fn draw_game_over(surface: &mut dyn Surface, score: u64, can_restart: bool) {
    draw_result(surface, "GAME OVER", colors::WARNING, score, can_restart);
}

pub fn draw_game_clear(surface: &mut dyn Surface, score: u64, can_restart: bool) {
    draw_result(surface, "GAME CLEAR", colors::ACCENT, score, can_restart);
}

pub fn draw_fps(surface: &mut dyn Surface, fps: u32) {
    surface.draw_text(
        &format!("FPS {}", fps),
        Vec2::new(SCREEN_WIDTH - 6.0, 6.0),
        12.0,
        colors::TEXT,
        TextAlign::Right,
    );
}

/// Touch controls below the game area
pub fn draw_input_bar(surface: &mut dyn Surface, input: &InputState) {
    surface.fill_rect(
        Rect::new(0.0, SCREEN_HEIGHT, SCREEN_WIDTH, INPUT_BAR_HEIGHT),
        colors::INPUT_BAR,
    );

    let stick = input.joystick();
    let (base, knob) = if stick.active {
        (stick.origin, stick.knob())
    } else {
        (JOYSTICK_REST_CENTER, JOYSTICK_REST_CENTER)
    };
    surface.fill_circle(base, stick.max_radius, colors::JOYSTICK_BASE);
    surface.fill_circle(knob, stick.max_radius * 0.45, colors::JOYSTICK_KNOB);

    let (bx, by) = BUTTON_B_CENTER;
    surface.fill_circle(Vec2::new(bx, by), BUTTON_B_RADIUS, colors::BUTTON_B);
    surface.fill_circle(BUTTON_A_CENTER, BUTTON_A_RADIUS, colors::BUTTON_A);
    surface.draw_text("B", Vec2::new(bx, by), 14.0, colors::TEXT, TextAlign::Center);
    surface.draw_text("A", BUTTON_A_CENTER, 14.0, colors::TEXT, TextAlign::Center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandBuffer, DrawCommand};

    #[test]
    fn test_loading_bar_width_tracks_progress() {
        let mut s = CommandBuffer::host();
        draw_loading(&mut s, 0.5);
        let fills: Vec<Rect> = s
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[1].w, PROGRESS_BAR_WIDTH / 2.0);
        assert!(s.has_text("50%"));
    }

    #[test]
    fn test_empty_progress_draws_track_only() {
        let mut s = CommandBuffer::host();
        draw_loading(&mut s, 0.0);
        let fills = s
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        assert_eq!(fills, 1);
    }

    #[test]
    fn test_title_prompt_blinks() {
        let mut s = CommandBuffer::host();
        draw_title(&mut s, "ARCADE", 100.0);
        assert!(s.has_text("PRESS A"));

        s.begin_frame();
        draw_title(&mut s, "ARCADE", 700.0);
        assert!(s.has_text("ARCADE"));
        assert!(!s.has_text("PRESS A"));
    }

    #[test]
    fn test_restart_prompt_only_after_debounce() {
        let mut s = CommandBuffer::host();
        draw_game_over(&mut s, 1200, false);
        assert!(s.has_text("GAME OVER"));
        assert!(s.has_text("1200"));
        assert!(!s.has_text("RESTART"));

        s.begin_frame();
        draw_game_clear(&mut s, 1200, true);
        assert!(s.has_text("GAME CLEAR"));
        assert!(s.has_text("RESTART"));
    }

    #[test]
    fn test_input_bar_follows_active_joystick() {
        let mut input = InputState::new();
        input.pointer_down(1, 60.0, 615.0);
        input.pointer_move(1, 160.0, 615.0);
        input.sample();

        let mut s = CommandBuffer::host();
        draw_input_bar(&mut s, &input);
        let circles: Vec<(Vec2, f32)> = s
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect();
        assert_eq!(circles[0].0, Vec2::new(60.0, 615.0));
        // Knob clamped to the max radius
        assert_eq!(circles[1].0, Vec2::new(60.0 + JOYSTICK_MAX_RADIUS, 615.0));
    }

    #[test]
    fn test_idle_controls_sit_in_their_touch_quarters() {
        use crate::input::{PointerRole, hit_test_input_bar};
        assert_eq!(hit_test_input_bar(JOYSTICK_REST_CENTER), PointerRole::Joystick);
        assert_eq!(hit_test_input_bar(BUTTON_A_CENTER), PointerRole::ButtonA);
        assert!(BUTTON_A_CENTER.y + BUTTON_A_RADIUS <= HOST_HEIGHT);
    }
}
