//! Deterministic in-memory toolkit backend.
//!
//! Implements the full [`Toolkit`] seam without a display: an object tree,
//! a manual clock with closed-form animation evaluation, a timer queue and a
//! synthetic performance publisher. The host moves time forward with
//! [`HeadlessToolkit::advance`] and forwards the returned events to the
//! session.
//!
//! Layout here is bookkeeping, not geometry: flex settings and alignment are
//! recorded but never positioned. Only text measurement resolves to real
//! sizes, with a fixed per-font-size character model, so content heights are
//! reproducible across runs and platforms.

use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::toolkit::{
    Align, Animation, AnimationHandle, AnimationKind, Color, ImageAsset, Layout, Length,
    PerfSample, Repeat, TimerHandle, Toolkit, ToolkitEvent, WidgetId,
};

/// Display geometry the backend reports through the metrics queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySpec {
    pub width: i32,
    pub height: i32,
    pub dpi: i32,
}

impl Default for DisplaySpec {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            dpi: 160,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Container,
    Image,
    Label,
    Arc,
    Button,
}

#[derive(Debug, Clone)]
struct Style {
    bg_color: Option<Color>,
    bg_opacity: u8,
    text_color: Option<Color>,
    opacity: u8,
    layered_opacity: u8,
    pad_all: i32,
    pad_top: i32,
    pad_row: i32,
    pad_gap: i32,
    margin: i32,
    translate_y: i32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bg_color: None,
            bg_opacity: 0,
            text_color: None,
            opacity: 255,
            layered_opacity: 255,
            pad_all: 0,
            pad_top: 0,
            pad_row: 0,
            pad_gap: 0,
            margin: 0,
            translate_y: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ArcState {
    start_angle: u16,
    end_angle: u16,
    value: i32,
    indicator_width: i32,
    rounded: bool,
    color: Option<Color>,
    arc_opacity: u8,
    knob_opacity: u8,
}

#[derive(Debug)]
struct Widget {
    kind: WidgetKind,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    style: Style,
    width: Option<Length>,
    height: Option<Length>,
    pos: (i32, i32),
    align: Option<Align>,
    new_flex_track: bool,
    layout: Layout,
    scroll_y: i32,
    text: Option<String>,
    font_size: u16,
    image: Option<ImageAsset>,
    rotation: i32,
    arc: ArcState,
}

impl Widget {
    fn new(kind: WidgetKind, parent: Option<WidgetId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            style: Style::default(),
            width: None,
            height: None,
            pos: (0, 0),
            align: None,
            new_flex_track: false,
            layout: Layout::None,
            scroll_y: 0,
            text: None,
            font_size: DEFAULT_FONT_SIZE,
            image: None,
            rotation: 0,
            arc: ArcState::default(),
        }
    }
}

#[derive(Debug)]
struct ActiveAnimation {
    spec: Animation,
    started_at_ms: u64,
}

#[derive(Debug)]
struct TimerState {
    period_ms: u64,
    next_fire_ms: u64,
}

const DEFAULT_FONT_SIZE: u16 = 14;

/// The synthetic performance publisher emits one sample per second.
const PERF_PERIOD_MS: u64 = 1000;

/// Color-jitter animations pick a new color every step, at a nominal 60 Hz.
const JITTER_STEP_MS: u64 = 16;

pub struct HeadlessToolkit {
    display: DisplaySpec,
    widgets: FxHashMap<WidgetId, Widget>,
    screen: WidgetId,
    overlay: WidgetId,
    next_widget_id: u32,
    animations: FxHashMap<AnimationHandle, ActiveAnimation>,
    next_animation_id: u32,
    timers: FxHashMap<TimerHandle, TimerState>,
    next_timer_id: u32,
    clock_ms: u64,
    next_perf_ms: u64,
}

impl Default for HeadlessToolkit {
    fn default() -> Self {
        Self::new(DisplaySpec::default())
    }
}

enum Fire {
    Perf,
    Timer(TimerHandle),
}

impl HeadlessToolkit {
    pub fn new(display: DisplaySpec) -> Self {
        let screen = WidgetId(0);
        let overlay = WidgetId(1);
        let mut widgets = FxHashMap::default();
        widgets.insert(screen, Widget::new(WidgetKind::Container, None));
        widgets.insert(overlay, Widget::new(WidgetKind::Container, None));
        Self {
            display,
            widgets,
            screen,
            overlay,
            next_widget_id: 2,
            animations: FxHashMap::default(),
            next_animation_id: 0,
            timers: FxHashMap::default(),
            next_timer_id: 0,
            clock_ms: 0,
            next_perf_ms: PERF_PERIOD_MS,
        }
    }

    /// Move the clock forward and return the timer and performance-publisher
    /// events that fired, in chronological order. Animation state is current
    /// as of each event and again at the end of the step.
    pub fn advance(&mut self, dt: Duration) -> Vec<ToolkitEvent> {
        let target = self.clock_ms + dt.as_millis() as u64;
        let mut events = Vec::new();

        while let Some((time, fire)) = self.next_fire(target) {
            self.clock_ms = time;
            self.apply_animations();
            match fire {
                Fire::Perf => {
                    events.push(ToolkitEvent::PerfPublished(self.sample()));
                    self.next_perf_ms += PERF_PERIOD_MS;
                }
                Fire::Timer(handle) => {
                    events.push(ToolkitEvent::TimerFired(handle));
                    if let Some(timer) = self.timers.get_mut(&handle) {
                        timer.next_fire_ms += timer.period_ms;
                    }
                }
            }
        }

        self.clock_ms = target;
        self.apply_animations();
        events
    }

    pub fn clock(&self) -> Duration {
        Duration::from_millis(self.clock_ms)
    }

    pub fn active_animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn active_timer_count(&self) -> usize {
        self.timers.len()
    }

    // --- inspection helpers (tests and hosts) ---

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.widgets.get(&id).map_or(&[], |w| w.children.as_slice())
    }

    pub fn widget_kind(&self, id: WidgetId) -> WidgetKind {
        self.widget(id).kind
    }

    pub fn bg_color(&self, id: WidgetId) -> Option<Color> {
        self.widget(id).style.bg_color
    }

    pub fn bg_opacity(&self, id: WidgetId) -> u8 {
        self.widget(id).style.bg_opacity
    }

    pub fn opacity(&self, id: WidgetId) -> u8 {
        self.widget(id).style.opacity
    }

    pub fn layered_opacity(&self, id: WidgetId) -> u8 {
        self.widget(id).style.layered_opacity
    }

    pub fn position(&self, id: WidgetId) -> (i32, i32) {
        self.widget(id).pos
    }

    pub fn translate_y(&self, id: WidgetId) -> i32 {
        self.widget(id).style.translate_y
    }

    pub fn scroll_y(&self, id: WidgetId) -> i32 {
        self.widget(id).scroll_y
    }

    pub fn image_rotation(&self, id: WidgetId) -> i32 {
        self.widget(id).rotation
    }

    pub fn arc_value(&self, id: WidgetId) -> i32 {
        self.widget(id).arc.value
    }

    pub fn layout_of(&self, id: WidgetId) -> Layout {
        self.widget(id).layout
    }

    pub fn starts_new_flex_track(&self, id: WidgetId) -> bool {
        self.widget(id).new_flex_track
    }

    pub fn alignment(&self, id: WidgetId) -> Option<Align> {
        self.widget(id).align
    }

    pub fn image_source(&self, id: WidgetId) -> Option<ImageAsset> {
        self.widget(id).image
    }

    pub fn text_color(&self, id: WidgetId) -> Option<Color> {
        self.widget(id).style.text_color
    }

    pub fn pad_all(&self, id: WidgetId) -> i32 {
        self.widget(id).style.pad_all
    }

    pub fn pad_top(&self, id: WidgetId) -> i32 {
        self.widget(id).style.pad_top
    }

    pub fn pad_row(&self, id: WidgetId) -> i32 {
        self.widget(id).style.pad_row
    }

    pub fn pad_gap(&self, id: WidgetId) -> i32 {
        self.widget(id).style.pad_gap
    }

    pub fn margin(&self, id: WidgetId) -> i32 {
        self.widget(id).style.margin
    }

    pub fn arc_angles(&self, id: WidgetId) -> (u16, u16) {
        let arc = self.widget(id).arc;
        (arc.start_angle, arc.end_angle)
    }

    pub fn arc_indicator_width(&self, id: WidgetId) -> i32 {
        self.widget(id).arc.indicator_width
    }

    pub fn arc_rounded(&self, id: WidgetId) -> bool {
        self.widget(id).arc.rounded
    }

    pub fn arc_color(&self, id: WidgetId) -> Option<Color> {
        self.widget(id).arc.color
    }

    pub fn arc_opacity(&self, id: WidgetId) -> u8 {
        self.widget(id).arc.arc_opacity
    }

    pub fn knob_opacity(&self, id: WidgetId) -> u8 {
        self.widget(id).arc.knob_opacity
    }

    // --- internals ---

    fn widget(&self, id: WidgetId) -> &Widget {
        self.widgets.get(&id).expect("unknown widget handle")
    }

    fn widget_mut(&mut self, id: WidgetId) -> &mut Widget {
        self.widgets.get_mut(&id).expect("unknown widget handle")
    }

    fn alloc(&mut self, kind: WidgetKind, parent: WidgetId) -> WidgetId {
        let id = WidgetId(self.next_widget_id);
        self.next_widget_id += 1;
        self.widgets.insert(id, Widget::new(kind, Some(parent)));
        if let Some(p) = self.widgets.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Earliest pending fire up to `target`. Equal-time fires resolve as
    /// perf-before-timer, then by timer creation order, so event streams are
    /// reproducible.
    fn next_fire(&self, target: u64) -> Option<(u64, Fire)> {
        let mut best_timer: Option<(u64, u32)> = None;
        for (&TimerHandle(id), timer) in &self.timers {
            if timer.next_fire_ms <= target
                && best_timer.is_none_or(|best| (timer.next_fire_ms, id) < best)
            {
                best_timer = Some((timer.next_fire_ms, id));
            }
        }

        let perf = (self.next_perf_ms <= target).then_some(self.next_perf_ms);
        match (perf, best_timer) {
            (Some(p), Some((t, _))) if p <= t => Some((p, Fire::Perf)),
            (_, Some((t, id))) => Some((t, Fire::Timer(TimerHandle(id)))),
            (Some(p), None) => Some((p, Fire::Perf)),
            (None, None) => None,
        }
    }

    fn apply_animations(&mut self) {
        let now = self.clock_ms;
        let mut finished = Vec::new();
        for (&handle, anim) in &self.animations {
            let elapsed = now.saturating_sub(anim.started_at_ms);
            let (value, done) = evaluate(&anim.spec, elapsed);
            if let Some(widget) = self.widgets.get_mut(&anim.spec.target) {
                match anim.spec.kind {
                    AnimationKind::TranslateY => widget.style.translate_y = value,
                    AnimationKind::ScrollY => widget.scroll_y = value,
                    AnimationKind::ArcSweep => widget.arc.value = value,
                    AnimationKind::ColorJitter => {
                        let step = elapsed / JITTER_STEP_MS;
                        widget.style.bg_color = Some(jitter_color(handle.0, step));
                        widget.style.text_color = Some(jitter_color(handle.0 ^ 0x5bd1, step));
                    }
                }
            }
            if done {
                finished.push(handle);
            }
        }
        for handle in finished {
            self.animations.remove(&handle);
        }
    }

    fn sample(&self) -> PerfSample {
        // Synthetic: load tracks the number of running animations. A stand-in
        // for a real monitor, not a measurement.
        let active = self.animations.len() as u32;
        PerfSample {
            fps: 60u32.saturating_sub(active.min(45)),
            cpu_percent: (10 + active * 3).min(100),
            render_time_ms: 1 + active / 4,
            flush_time_ms: 1 + active / 8,
        }
    }

    fn resolve_width(&self, id: WidgetId) -> i32 {
        let w = self.widget(id);
        let parent_w = match w.parent {
            Some(parent) => self.resolve_width(parent),
            None => self.display.width,
        };
        match w.width {
            Some(Length::Px(v)) => v,
            Some(Length::Pct(p)) => parent_w * p / 100,
            // Unsized widgets span their parent in this model.
            None => parent_w,
        }
    }

    fn resolve_height(&self, id: WidgetId) -> i32 {
        let w = self.widget(id);
        let parent_h = match w.parent {
            Some(parent) => self.resolve_height(parent),
            None => self.display.height,
        };
        match w.height {
            Some(Length::Px(v)) => v,
            Some(Length::Pct(p)) => parent_h * p / 100,
            None => parent_h,
        }
    }

    fn wrapped_text_height(&self, id: WidgetId) -> i32 {
        let w = self.widget(id);
        let Some(text) = w.text.as_deref() else {
            return 0;
        };
        let avail = self.resolve_width(id).max(1);
        let chars_per_line = (avail / char_width(w.font_size)).max(1) as usize;
        let lines: usize = text
            .split('\n')
            .map(|line| line.chars().count().div_ceil(chars_per_line).max(1))
            .sum();
        lines as i32 * line_height(w.font_size)
    }
}

fn char_width(font_size: u16) -> i32 {
    (i32::from(font_size) + 1) / 2
}

fn line_height(font_size: u16) -> i32 {
    i32::from(font_size) + 8
}

/// Closed-form animation value at `elapsed_ms`: forward leg, optional
/// playback (return) leg, repeating as configured. The second value reports
/// whether a finite animation has completed.
fn evaluate(spec: &Animation, elapsed_ms: u64) -> (i32, bool) {
    let forward = (spec.duration.as_millis() as u64).max(1);
    let back = spec.playback.map(|d| (d.as_millis() as u64).max(1));
    let period = forward + back.unwrap_or(0);

    let phase = match spec.repeat {
        Repeat::Infinite => elapsed_ms % period,
        Repeat::Count(n) => {
            let total = period * u64::from(n);
            if elapsed_ms >= total {
                let final_value = if back.is_some() { spec.start } else { spec.end };
                return (final_value, true);
            }
            elapsed_ms % period
        }
    };

    let value = if phase < forward {
        lerp(spec.start, spec.end, phase, forward)
    } else {
        lerp(spec.end, spec.start, phase - forward, back.unwrap_or(1))
    };
    (value, false)
}

fn lerp(a: i32, b: i32, num: u64, den: u64) -> i32 {
    a + ((i64::from(b - a) * num as i64) / den as i64) as i32
}

/// Deterministic stand-in for the toolkit's own color randomization: mixes
/// the animation handle and the step counter into a 12-bit hue.
fn jitter_color(seed: u32, step: u64) -> Color {
    let mut x = seed ^ (step as u32).wrapping_mul(0x9e37_79b9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    Color::from_hex3(0x00f + (x % u32::from(0xff0u16 - 0x00f)) as u16)
}

impl Toolkit for HeadlessToolkit {
    fn screen(&self) -> WidgetId {
        self.screen
    }

    fn overlay(&self) -> WidgetId {
        self.overlay
    }

    fn create_container(&mut self, parent: WidgetId) -> WidgetId {
        self.alloc(WidgetKind::Container, parent)
    }

    fn create_image(&mut self, parent: WidgetId) -> WidgetId {
        self.alloc(WidgetKind::Image, parent)
    }

    fn create_label(&mut self, parent: WidgetId) -> WidgetId {
        self.alloc(WidgetKind::Label, parent)
    }

    fn create_arc(&mut self, parent: WidgetId) -> WidgetId {
        self.alloc(WidgetKind::Arc, parent)
    }

    fn create_button(&mut self, parent: WidgetId) -> WidgetId {
        self.alloc(WidgetKind::Button, parent)
    }

    fn remove_children(&mut self, id: WidgetId) {
        let Some(widget) = self.widgets.get_mut(&id) else {
            return;
        };
        let mut stack = std::mem::take(&mut widget.children);
        let mut removed = FxHashSet::default();
        while let Some(child) = stack.pop() {
            if let Some(w) = self.widgets.remove(&child) {
                stack.extend(w.children);
                removed.insert(child);
            }
        }
        // Animations bound to destroyed widgets die with them.
        self.animations
            .retain(|_, anim| !removed.contains(&anim.spec.target));
    }

    fn child_count(&self, id: WidgetId) -> usize {
        self.children(id).len()
    }

    fn set_size(&mut self, id: WidgetId, width: Length, height: Length) {
        let w = self.widget_mut(id);
        w.width = Some(width);
        w.height = Some(height);
    }

    fn set_width(&mut self, id: WidgetId, width: Length) {
        self.widget_mut(id).width = Some(width);
    }

    fn set_pos(&mut self, id: WidgetId, x: i32, y: i32) {
        self.widget_mut(id).pos = (x, y);
    }

    fn align(&mut self, id: WidgetId, align: Align) {
        self.widget_mut(id).align = Some(align);
    }

    fn content_height(&self, id: WidgetId) -> i32 {
        match self.widget(id).kind {
            WidgetKind::Label => self.wrapped_text_height(id),
            _ => self.resolve_height(id),
        }
    }

    fn scroll_to_y(&mut self, id: WidgetId, y: i32) {
        self.widget_mut(id).scroll_y = y;
    }

    fn reset_style(&mut self, id: WidgetId) {
        self.widget_mut(id).style = Style::default();
    }

    fn set_bg_color(&mut self, id: WidgetId, color: Color) {
        self.widget_mut(id).style.bg_color = Some(color);
    }

    fn set_bg_opacity(&mut self, id: WidgetId, opacity: u8) {
        self.widget_mut(id).style.bg_opacity = opacity;
    }

    fn set_text_color(&mut self, id: WidgetId, color: Color) {
        self.widget_mut(id).style.text_color = Some(color);
    }

    fn set_opacity(&mut self, id: WidgetId, opacity: u8) {
        self.widget_mut(id).style.opacity = opacity;
    }

    fn set_layered_opacity(&mut self, id: WidgetId, opacity: u8) {
        self.widget_mut(id).style.layered_opacity = opacity;
    }

    fn set_pad_all(&mut self, id: WidgetId, pad: i32) {
        self.widget_mut(id).style.pad_all = pad;
    }

    fn set_pad_top(&mut self, id: WidgetId, pad: i32) {
        self.widget_mut(id).style.pad_top = pad;
    }

    fn set_pad_row(&mut self, id: WidgetId, pad: i32) {
        self.widget_mut(id).style.pad_row = pad;
    }

    fn set_pad_gap(&mut self, id: WidgetId, pad: i32) {
        self.widget_mut(id).style.pad_gap = pad;
    }

    fn set_margin_all(&mut self, id: WidgetId, margin: i32) {
        self.widget_mut(id).style.margin = margin;
    }

    fn set_translate_y(&mut self, id: WidgetId, y: i32) {
        self.widget_mut(id).style.translate_y = y;
    }

    fn set_layout(&mut self, id: WidgetId, layout: Layout) {
        self.widget_mut(id).layout = layout;
    }

    fn start_new_flex_track(&mut self, id: WidgetId) {
        self.widget_mut(id).new_flex_track = true;
    }

    fn set_image_source(&mut self, id: WidgetId, asset: ImageAsset) {
        self.widget_mut(id).image = Some(asset);
    }

    fn set_image_rotation(&mut self, id: WidgetId, centi_degrees: i32) {
        self.widget_mut(id).rotation = centi_degrees;
    }

    fn set_text(&mut self, id: WidgetId, text: &str) {
        self.widget_mut(id).text = Some(text.to_owned());
    }

    fn set_text_font_size(&mut self, id: WidgetId, size: u16) {
        self.widget_mut(id).font_size = size;
    }

    fn text(&self, id: WidgetId) -> Option<&str> {
        self.widget(id).text.as_deref()
    }

    fn text_size(&self, text: &str, font_size: u16) -> (i32, i32) {
        let longest = text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.split('\n').count().max(1);
        (
            longest as i32 * char_width(font_size),
            lines as i32 * line_height(font_size),
        )
    }

    fn set_arc_angles(&mut self, id: WidgetId, start: u16, end: u16) {
        let arc = &mut self.widget_mut(id).arc;
        arc.start_angle = start;
        arc.end_angle = end;
    }

    fn set_arc_value(&mut self, id: WidgetId, value: i32) {
        self.widget_mut(id).arc.value = value;
    }

    fn set_arc_indicator_width(&mut self, id: WidgetId, width: i32) {
        self.widget_mut(id).arc.indicator_width = width;
    }

    fn set_arc_rounded(&mut self, id: WidgetId, rounded: bool) {
        self.widget_mut(id).arc.rounded = rounded;
    }

    fn set_arc_color(&mut self, id: WidgetId, color: Color) {
        self.widget_mut(id).arc.color = Some(color);
    }

    fn set_arc_opacity(&mut self, id: WidgetId, opacity: u8) {
        self.widget_mut(id).arc.arc_opacity = opacity;
    }

    fn set_knob_opacity(&mut self, id: WidgetId, opacity: u8) {
        self.widget_mut(id).arc.knob_opacity = opacity;
    }

    fn horizontal_resolution(&self) -> i32 {
        self.display.width
    }

    fn vertical_resolution(&self) -> i32 {
        self.display.height
    }

    fn dpx(&self, px: i32) -> i32 {
        if px <= 0 {
            return px;
        }
        ((px * self.display.dpi + 80) / 160).max(1)
    }

    fn animate(&mut self, animation: Animation) -> AnimationHandle {
        let handle = AnimationHandle(self.next_animation_id);
        self.next_animation_id += 1;
        self.animations.insert(
            handle,
            ActiveAnimation {
                spec: animation,
                started_at_ms: self.clock_ms,
            },
        );
        // First application happens on the next clock step, like a
        // just-registered animation waiting for its first tick.
        handle
    }

    fn cancel_animation(&mut self, handle: AnimationHandle) {
        self.animations.remove(&handle);
    }

    fn animation_running(&self, handle: AnimationHandle) -> bool {
        self.animations.contains_key(&handle)
    }

    fn create_timer(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_timer_id);
        self.next_timer_id += 1;
        let period_ms = (period.as_millis() as u64).max(1);
        self.timers.insert(
            handle,
            TimerState {
                period_ms,
                next_fire_ms: self.clock_ms + period_ms,
            },
        );
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}
