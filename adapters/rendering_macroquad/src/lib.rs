#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Star Taxi.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The play area has a fixed size in world units. It is scaled uniformly to
//! fit the window and centred, and the pointer is mapped back into world units
//! before it reaches the simulation.

use anyhow::Result;
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::BLACK,
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
    },
};
use star_taxi_core::{Appearance, FrameInput, Key, KeySet, ScreenBounds};
use star_taxi_rendering::{Color, Palette, Presentation, RenderingBackend, Scene, SpritePresentation};
use std::{
    collections::VecDeque,
    f32::consts::{FRAC_PI_4, TAU},
    ops::ControlFlow,
    time::{Duration, Instant},
};
use tracing::info;

/// Keys whose held state steers the taxi.
const HELD_KEYS: [(KeyCode, Key); 8] = [
    (KeyCode::Right, Key::Right),
    (KeyCode::Left, Key::Left),
    (KeyCode::Up, Key::Up),
    (KeyCode::Down, Key::Down),
    (KeyCode::D, Key::D),
    (KeyCode::A, Key::A),
    (KeyCode::W, Key::W),
    (KeyCode::S, Key::S),
];

const HUD_FONT_SIZE: f32 = 22.0;
const BANNER_FONT_SIZE: f32 = 48.0;
const HUD_MARGIN: f32 = 10.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` closes the window immediately.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = self.render_accum / self.frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> ControlFlow<()> + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            palette,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(scene.bounds.width()).unwrap_or(i32::MAX),
            window_height: i32::try_from(scene.bounds.height()).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let play_area = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if KeyboardShortcuts::poll().quit_requested {
                    info!("window closed from keyboard");
                    break;
                }

                macroquad::window::clear_background(BLACK);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_bounds(scene.bounds, screen_width, screen_height);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(&metrics);

                if update_scene(frame_dt, frame_input, &mut scene).is_break() {
                    break;
                }

                let render_start = Instant::now();
                macroquad::shapes::draw_rectangle(
                    metrics.offset_x,
                    metrics.offset_y,
                    metrics.width_scaled,
                    metrics.height_scaled,
                    play_area,
                );
                for sprite in &scene.sprites {
                    draw_sprite(sprite, &metrics);
                }
                draw_letterbox(&metrics, screen_width, screen_height);
                draw_hud(&scene.hud, &metrics, &palette);
                if let Some(banner) = &scene.banner {
                    draw_banner(banner, &metrics, &palette);
                }
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(frame_dt, render_duration);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            fps = per_second,
                            fps_10s = trailing_ten_seconds,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and centring offsets that fit the play area inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    width_scaled: f32,
    height_scaled: f32,
}

impl SceneMetrics {
    fn from_bounds(bounds: ScreenBounds, screen_width: f32, screen_height: f32) -> Self {
        let world = bounds.size();
        let scale = if world.x <= f32::EPSILON || world.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world.x).min(screen_height / world.y).max(0.0)
        };

        let width_scaled = world.x * scale;
        let height_scaled = world.y * scale;

        Self {
            scale,
            offset_x: ((screen_width - width_scaled) * 0.5).max(0.0),
            offset_y: ((screen_height - height_scaled) * 0.5).max(0.0),
            width_scaled,
            height_scaled,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + world.x * self.scale,
            self.offset_y + world.y * self.scale,
        )
    }

    /// Maps a window position into world units. Returns `None` for a degenerate scale.
    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }

        Some(Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        ))
    }
}

fn gather_frame_input(metrics: &SceneMetrics) -> FrameInput {
    let held = HELD_KEYS
        .iter()
        .filter(|(code, _)| is_key_down(*code))
        .map(|(_, key)| *key)
        .collect();

    let mut pressed = KeySet::empty();
    if is_key_pressed(KeyCode::Space) {
        pressed.insert(Key::Space);
    }
    if is_mouse_button_pressed(MouseButton::Left) {
        pressed.insert(Key::Pointer);
    }

    let (cursor_x, cursor_y) = mouse_position();
    gather_frame_input_from_observations(metrics, held, pressed, Vec2::new(cursor_x, cursor_y))
}

fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    held: KeySet,
    pressed: KeySet,
    cursor_position: Vec2,
) -> FrameInput {
    let Some(pointer) = metrics.to_world(cursor_position) else {
        // Without a play area the pointer cannot hit anything.
        let confirm_only = if pressed.contains(Key::Space) {
            KeySet::empty().with(Key::Space)
        } else {
            KeySet::empty()
        };
        return FrameInput {
            held,
            pressed: confirm_only,
            ..FrameInput::default()
        };
    };

    FrameInput {
        held,
        pressed,
        pointer,
    }
}

fn draw_sprite(sprite: &SpritePresentation, metrics: &SceneMetrics) {
    let center = metrics.to_screen(sprite.position);
    let radius = sprite.radius * metrics.scale;
    if radius <= f32::EPSILON {
        return;
    }

    let color = to_macroquad_color(sprite.color);
    match sprite.appearance {
        Appearance::Planet => {
            macroquad::shapes::draw_circle(center.x, center.y, radius, color);
        }
        Appearance::Destination => {
            macroquad::shapes::draw_circle(center.x, center.y, radius, color);
            let ring = to_macroquad_color(sprite.color.lighten(0.6));
            macroquad::shapes::draw_circle_lines(
                center.x,
                center.y,
                radius + 4.0 * metrics.scale,
                2.0 * metrics.scale,
                ring,
            );
        }
        Appearance::GasCloud => draw_gas_cloud(center, radius, sprite.heading, color),
        Appearance::WarpStar => draw_warp_star(center, radius, metrics.scale, color),
        Appearance::Taxi => draw_taxi(center, radius, sprite.facing(), color),
        Appearance::Explosion => draw_explosion(center, radius, metrics.scale, sprite.color),
    }
}

/// Puffs placed around the centre and rotated with the cloud's heading.
fn draw_gas_cloud(center: Vec2, radius: f32, heading: f32, color: macroquad::color::Color) {
    const PUFFS: usize = 5;

    macroquad::shapes::draw_circle(center.x, center.y, radius * 0.55, color);
    for puff in 0..PUFFS {
        let angle = heading + puff as f32 * TAU / PUFFS as f32;
        let offset = Vec2::new(angle.cos(), -angle.sin()) * radius * 0.5;
        macroquad::shapes::draw_circle(
            center.x + offset.x,
            center.y + offset.y,
            radius * 0.45,
            color,
        );
    }
}

fn draw_warp_star(center: Vec2, radius: f32, scale: f32, color: macroquad::color::Color) {
    let thickness = (1.5 * scale).max(1.0);
    for spoke in 0..4 {
        let angle = spoke as f32 * FRAC_PI_4;
        let reach = Vec2::new(angle.cos(), angle.sin()) * radius;
        macroquad::shapes::draw_line(
            center.x - reach.x,
            center.y - reach.y,
            center.x + reach.x,
            center.y + reach.y,
            thickness,
            color,
        );
    }
    macroquad::shapes::draw_circle(center.x, center.y, radius * 0.35, color);
}

/// Arrow-shaped hull pointing along `facing`.
fn draw_taxi(center: Vec2, radius: f32, facing: Vec2, color: macroquad::color::Color) {
    let direction = if facing.length_squared() <= f32::EPSILON {
        Vec2::X
    } else {
        facing.normalize()
    };
    let perpendicular = Vec2::new(-direction.y, direction.x);

    let nose = center + direction * radius;
    let tail = center - direction * radius * 0.7;
    let left = tail + perpendicular * radius * 0.8;
    let right = tail - perpendicular * radius * 0.8;

    macroquad::shapes::draw_triangle(
        MacroquadVec2::new(nose.x, nose.y),
        MacroquadVec2::new(left.x, left.y),
        MacroquadVec2::new(right.x, right.y),
        color,
    );
}

fn draw_explosion(center: Vec2, radius: f32, scale: f32, color: Color) {
    const SHARDS: usize = 8;

    let core = to_macroquad_color(color.lighten(0.5));
    let shard_color = to_macroquad_color(color);
    let thickness = (2.0 * scale).max(1.0);
    for shard in 0..SHARDS {
        let angle = shard as f32 * TAU / SHARDS as f32;
        let reach = Vec2::new(angle.cos(), angle.sin()) * radius * 1.3;
        macroquad::shapes::draw_line(
            center.x,
            center.y,
            center.x + reach.x,
            center.y + reach.y,
            thickness,
            shard_color,
        );
    }
    macroquad::shapes::draw_circle(center.x, center.y, radius * 0.6, core);
}

/// Covers whatever spilled outside the play area with the window background.
fn draw_letterbox(metrics: &SceneMetrics, screen_width: f32, screen_height: f32) {
    let right = metrics.offset_x + metrics.width_scaled;
    let bottom = metrics.offset_y + metrics.height_scaled;

    macroquad::shapes::draw_rectangle(0.0, 0.0, metrics.offset_x, screen_height, BLACK);
    macroquad::shapes::draw_rectangle(right, 0.0, screen_width - right, screen_height, BLACK);
    macroquad::shapes::draw_rectangle(0.0, 0.0, screen_width, metrics.offset_y, BLACK);
    macroquad::shapes::draw_rectangle(0.0, bottom, screen_width, screen_height - bottom, BLACK);
}

fn draw_hud(hud: &str, metrics: &SceneMetrics, palette: &Palette) {
    let font_size = (HUD_FONT_SIZE * metrics.scale).max(1.0);
    let color = to_macroquad_color(palette.hud_text);
    let left = metrics.offset_x + HUD_MARGIN * metrics.scale;
    let mut baseline = metrics.offset_y + HUD_MARGIN * metrics.scale + font_size;

    for line in hud.lines() {
        let _ = macroquad::text::draw_text(line, left, baseline, font_size, color);
        baseline += font_size * 1.1;
    }
}

fn draw_banner(banner: &str, metrics: &SceneMetrics, palette: &Palette) {
    let font_size = (BANNER_FONT_SIZE * metrics.scale).max(1.0);
    let color = to_macroquad_color(palette.banner_text);
    let dimensions = macroquad::text::measure_text(banner, None, font_size as u16, 1.0);
    let center = metrics.to_screen(Vec2::ZERO)
        + Vec2::new(metrics.width_scaled, metrics.height_scaled) * 0.5;

    let _ = macroquad::text::draw_text(
        banner,
        center.x - dimensions.width * 0.5,
        center.y + dimensions.offset_y * 0.5,
        font_size,
        color,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn scene_metrics_letterbox_wide_windows() {
        let metrics = SceneMetrics::from_bounds(ScreenBounds::new(800, 600), 1600.0, 600.0);

        assert!((metrics.scale - 1.0).abs() <= f32::EPSILON);
        assert!((metrics.offset_x - 400.0).abs() <= f32::EPSILON);
        assert!(metrics.offset_y.abs() <= f32::EPSILON);
        assert!((metrics.width_scaled - 800.0).abs() <= f32::EPSILON);
    }

    #[test]
    fn scene_metrics_letterbox_tall_windows() {
        let metrics = SceneMetrics::from_bounds(ScreenBounds::new(800, 600), 400.0, 900.0);

        assert!((metrics.scale - 0.5).abs() <= f32::EPSILON);
        assert!(metrics.offset_x.abs() <= f32::EPSILON);
        assert!((metrics.offset_y - 300.0).abs() <= f32::EPSILON);
        assert!((metrics.height_scaled - 300.0).abs() <= f32::EPSILON);
    }

    #[test]
    fn world_and_screen_mappings_are_inverse() {
        let metrics = SceneMetrics::from_bounds(ScreenBounds::new(800, 600), 1000.0, 1000.0);
        let world = Vec2::new(123.0, 456.0);

        let screen = metrics.to_screen(world);
        let back = metrics.to_world(screen).expect("non-degenerate scale");

        assert_vec2_close(back, world);
    }

    #[test]
    fn pointer_is_mapped_into_world_units() {
        let metrics = SceneMetrics::from_bounds(ScreenBounds::new(800, 600), 1600.0, 1200.0);
        let input = gather_frame_input_from_observations(
            &metrics,
            KeySet::empty().with(Key::Right),
            KeySet::empty().with(Key::Pointer),
            Vec2::new(600.0, 800.0),
        );

        assert_vec2_close(input.pointer, Vec2::new(300.0, 400.0));
        assert!(input.held.contains(Key::Right));
        assert!(input.trigger_pressed());
    }

    #[test]
    fn degenerate_window_drops_pointer_trigger_but_keeps_confirm() {
        let metrics = SceneMetrics::from_bounds(ScreenBounds::new(800, 600), 0.0, 0.0);
        let input = gather_frame_input_from_observations(
            &metrics,
            KeySet::empty(),
            KeySet::empty().with(Key::Pointer).with(Key::Space),
            Vec2::new(10.0, 10.0),
        );

        assert!(!input.trigger_pressed());
        assert!(input.confirm_pressed());
        assert_eq!(input.pointer, Vec2::ZERO);
    }

    #[test]
    fn held_key_table_covers_every_steering_key_once() {
        let keys: KeySet = HELD_KEYS.iter().map(|(_, key)| *key).collect();

        for key in [
            Key::Right,
            Key::Left,
            Key::Up,
            Key::Down,
            Key::D,
            Key::A,
            Key::W,
            Key::S,
        ] {
            assert!(keys.contains(key));
        }
        assert!(!keys.contains(Key::Space));
        assert!(!keys.contains(Key::Pointer));
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        for _ in 0..3 {
            assert!(counter
                .record_frame(frame, Duration::from_millis(1))
                .is_none());
        }
        let metrics = counter
            .record_frame(frame, Duration::from_millis(5))
            .expect("one second elapsed");

        assert!((metrics.per_second - 4.0).abs() < 1e-4);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() < 1e-4);
        assert_eq!(metrics.avg_render, Duration::from_millis(2));
    }
}
