//! Benchmark session driver.
//!
//! Owns the catalog cursor and the sequence generator, applies the baseline
//! theme, loads scenes on a repeating timer and keeps the performance readout
//! current. All state lives in [`BenchmarkSession`]; nothing is process-wide.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::readout;
use crate::scenes::{self, SceneContext};
use crate::sequence::SequenceGenerator;
use crate::toolkit::{
    AnimationHandle, Color, Layout, Length, Toolkit, ToolkitEvent, TimerHandle, WidgetId,
    OPA_COVER, OPA_TRANSP,
};

/// What the driver does once the catalog runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedPolicy {
    /// Keep ticking past the sentinel; every further tick is a no-op and the
    /// screen stays blank.
    #[default]
    Idle,
    /// Cancel the advance timer once the sentinel is reached.
    Stop,
    /// Wrap back to scene 0 and reset the sequence generator so every cycle
    /// replays identically.
    WrapToStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long each scene runs before the driver advances.
    #[serde(default = "SessionConfig::default_scene_time_ms")]
    pub scene_time_ms: u64,
    #[serde(default)]
    pub on_catalog_exhausted: ExhaustedPolicy,
}

impl SessionConfig {
    const fn default_scene_time_ms() -> u64 {
        5000
    }

    pub fn scene_time(&self) -> Duration {
        Duration::from_millis(self.scene_time_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scene_time_ms: Self::default_scene_time_ms(),
            on_catalog_exhausted: ExhaustedPolicy::default(),
        }
    }
}

/// Driver state: catalog cursor, generator, the handles of the animations the
/// current scene started, the advance timer and the readout label.
pub struct BenchmarkSession {
    config: SessionConfig,
    scene_index: usize,
    rng: SequenceGenerator,
    active: SmallVec<[AnimationHandle; 16]>,
    timer: Option<TimerHandle>,
    title: WidgetId,
}

impl BenchmarkSession {
    /// Initialize the session: apply the baseline theme, build the title
    /// overlay, load scene 0 immediately and arm the advance timer.
    ///
    /// The performance readout updates on every
    /// [`ToolkitEvent::PerfPublished`] the host forwards to
    /// [`handle_event`](Self::handle_event).
    pub fn start<T: Toolkit>(ui: &mut T, config: SessionConfig) -> Self {
        let screen = ui.screen();
        ui.reset_style(screen);
        ui.set_bg_opacity(screen, OPA_COVER);

        let title = ui.create_label(ui.overlay());
        ui.set_bg_opacity(title, OPA_COVER);
        ui.set_bg_color(title, Color::WHITE);
        ui.set_text_color(title, Color::BLACK);
        ui.set_width(title, Length::Pct(100));
        ui.set_text(title, "-");

        let timer = ui.create_timer(config.scene_time());

        let mut session = Self {
            config,
            scene_index: 0,
            rng: SequenceGenerator::new(),
            active: SmallVec::new(),
            timer: Some(timer),
            title,
        };
        session.load_scene(ui);
        session
    }

    /// Explicit teardown half of the start/stop pair: cancels the advance
    /// timer and any animations the current scene still runs.
    pub fn stop<T: Toolkit>(&mut self, ui: &mut T) {
        if let Some(timer) = self.timer.take() {
            ui.cancel_timer(timer);
        }
        for handle in self.active.drain(..) {
            ui.cancel_animation(handle);
        }
    }

    /// Dispatch one toolkit event. Timer ticks from foreign timers are
    /// ignored; only the session's own advance timer moves the catalog.
    pub fn handle_event<T: Toolkit>(&mut self, ui: &mut T, event: ToolkitEvent) {
        match event {
            ToolkitEvent::TimerFired(handle) if self.timer == Some(handle) => self.advance(ui),
            ToolkitEvent::TimerFired(_) => {}
            ToolkitEvent::PerfPublished(sample) => {
                let text = readout::format_sample(&sample);
                ui.set_text(self.title, &text);
            }
        }
    }

    /// Move to the next catalog entry and load it.
    pub fn advance<T: Toolkit>(&mut self, ui: &mut T) {
        self.scene_index += 1;
        match self.config.on_catalog_exhausted {
            ExhaustedPolicy::Idle => {}
            ExhaustedPolicy::WrapToStart => {
                if self.scene_index >= scenes::SCENE_COUNT {
                    self.scene_index = 0;
                    self.rng.reset();
                }
            }
            ExhaustedPolicy::Stop => {
                if self.scene_index >= scenes::SCENE_COUNT {
                    self.scene_index = scenes::SCENE_COUNT;
                    if let Some(timer) = self.timer.take() {
                        ui.cancel_timer(timer);
                    }
                }
            }
        }
        self.load_scene(ui);
    }

    /// Tear down the previous scene and run the constructor at the current
    /// index. Past the catalog end this degrades to clearing the screen.
    fn load_scene<T: Toolkit>(&mut self, ui: &mut T) {
        for handle in self.active.drain(..) {
            ui.cancel_animation(handle);
        }

        let screen = ui.screen();
        ui.remove_children(screen);
        ui.set_bg_color(screen, Color::LIGHT_GREY);
        ui.set_text_color(screen, Color::BLACK);
        ui.set_pad_all(screen, 8);
        ui.set_pad_top(screen, 48);
        ui.set_pad_gap(screen, 8);
        ui.set_layout(screen, Layout::None);

        ui.set_bg_opacity(ui.overlay(), OPA_TRANSP);

        let catalog = scenes::catalog::<T>();
        match catalog.get(self.scene_index) {
            Some(descriptor) if descriptor.construct.is_some() => {
                log::debug!("loading scene {}: {}", self.scene_index, descriptor.name);
                if let Some(construct) = descriptor.construct {
                    let mut ctx = SceneContext::new(ui, &mut self.rng);
                    construct(&mut ctx);
                    self.active = ctx.finish();
                }
            }
            _ => {
                log::debug!("catalog exhausted at index {}", self.scene_index);
            }
        }
    }

    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    /// Name of the current catalog entry; the sentinel and anything past it
    /// report the empty string.
    pub fn scene_name(&self) -> &'static str {
        scenes::SCENE_NAMES
            .get(self.scene_index)
            .copied()
            .unwrap_or("")
    }

    /// The overlay label the readout writes into.
    pub fn title(&self) -> WidgetId {
        self.title
    }

    /// Handles of the animations started by the current scene.
    pub fn active_animations(&self) -> &[AnimationHandle] {
        &self.active
    }

    /// True once the advance timer has been cancelled (`Stop` policy or an
    /// explicit [`stop`](Self::stop)).
    pub fn stopped(&self) -> bool {
        self.timer.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;

    fn tick(ui: &mut HeadlessToolkit, session: &mut BenchmarkSession) {
        for event in ui.advance(session.config.scene_time()) {
            session.handle_event(ui, event);
        }
    }

    #[test]
    fn baseline_theme_is_restored_between_scenes() {
        let mut ui = HeadlessToolkit::default();
        let mut session = BenchmarkSession::start(&mut ui, SessionConfig::default());
        let screen = ui.screen();

        assert_eq!(ui.bg_color(screen), Some(Color::LIGHT_GREY));
        assert_eq!(ui.pad_all(screen), 8);
        assert_eq!(ui.pad_top(screen), 48);
        assert_eq!(ui.pad_gap(screen), 8);
        assert_eq!(ui.layout_of(screen), Layout::None);

        // The wallpaper scene zeroes the screen padding.
        tick(&mut ui, &mut session);
        assert_eq!(session.scene_name(), "Moving wallpaper");
        assert_eq!(ui.pad_all(screen), 0);

        // The next transition restores the baseline before constructing.
        tick(&mut ui, &mut session);
        assert_eq!(session.scene_name(), "Single rectangle");
        assert_eq!(ui.pad_all(screen), 8);
        assert_eq!(ui.layout_of(screen), Layout::None);
    }

    #[test]
    fn config_defaults_match_the_suite() {
        let config = SessionConfig::default();
        assert_eq!(config.scene_time_ms, 5000);
        assert_eq!(config.on_catalog_exhausted, ExhaustedPolicy::Idle);
    }

    #[test]
    fn idle_policy_keeps_ticking_past_the_catalog() {
        let mut ui = HeadlessToolkit::default();
        let mut session = BenchmarkSession::start(&mut ui, SessionConfig::default());
        for _ in 0..scenes::SCENE_COUNT + 3 {
            tick(&mut ui, &mut session);
        }
        assert!(session.scene_index() > scenes::SCENE_COUNT);
        assert_eq!(session.scene_name(), "");
        assert!(!session.stopped());
        assert_eq!(ui.child_count(ui.screen()), 0);
    }

    #[test]
    fn stop_policy_cancels_the_timer_at_the_sentinel() {
        let mut ui = HeadlessToolkit::default();
        let config = SessionConfig {
            on_catalog_exhausted: ExhaustedPolicy::Stop,
            ..SessionConfig::default()
        };
        let mut session = BenchmarkSession::start(&mut ui, config);
        for _ in 0..scenes::SCENE_COUNT {
            tick(&mut ui, &mut session);
        }
        assert_eq!(session.scene_index(), scenes::SCENE_COUNT);
        assert!(session.stopped());

        // Further time produces no timer events, so the index is pinned.
        tick(&mut ui, &mut session);
        assert_eq!(session.scene_index(), scenes::SCENE_COUNT);
    }

    #[test]
    fn wrap_policy_replays_from_scene_zero() {
        let mut ui = HeadlessToolkit::default();
        let config = SessionConfig {
            on_catalog_exhausted: ExhaustedPolicy::WrapToStart,
            ..SessionConfig::default()
        };
        let mut session = BenchmarkSession::start(&mut ui, config);
        for _ in 0..scenes::SCENE_COUNT {
            tick(&mut ui, &mut session);
        }
        assert_eq!(session.scene_index(), 0);
        assert_eq!(session.scene_name(), "Empty screen");
    }

    #[test]
    fn foreign_timers_do_not_advance_the_catalog() {
        let mut ui = HeadlessToolkit::default();
        let mut session = BenchmarkSession::start(&mut ui, SessionConfig::default());
        let foreign = ui.create_timer(Duration::from_millis(1000));
        for event in ui.advance(Duration::from_millis(1000)) {
            session.handle_event(&mut ui, event);
        }
        assert_eq!(session.scene_index(), 0);
        ui.cancel_timer(foreign);
    }

    #[test]
    fn stop_is_idempotent_teardown() {
        let mut ui = HeadlessToolkit::default();
        let mut session = BenchmarkSession::start(&mut ui, SessionConfig::default());
        session.stop(&mut ui);
        assert!(session.stopped());
        assert!(session.active_animations().is_empty());
        session.stop(&mut ui);
    }

    #[test]
    fn session_config_round_trips_through_json() {
        let config = SessionConfig {
            scene_time_ms: 250,
            on_catalog_exhausted: ExhaustedPolicy::WrapToStart,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("wrap_to_start"));
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
