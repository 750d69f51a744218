//! Toolkit abstraction that allows defining benchmark scenes once and running
//! them against any widget-toolkit backend.
//!
//! The benchmark never talks to a concrete toolkit directly: everything it
//! needs — object-tree construction, styling, flex layout, value animations,
//! repeating timers, display metrics and the performance publisher — goes
//! through the [`Toolkit`] trait. The deterministic in-memory backend lives in
//! [`crate::headless`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque handle to a widget in the toolkit's object tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u32);

/// Opaque handle to a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub(crate) u32);

/// Opaque handle to a repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub(crate) u32);

/// Fully opaque paint color (no alpha; opacity is a separate style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Baseline screen background of the benchmark theme.
    pub const LIGHT_GREY: Self = Self::rgb(0xe7, 0xe9, 0xec);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Expand a 12-bit `0xRGB` value into a full color, nibble-doubled
    /// (`0xf80` becomes `#ff8800`).
    pub const fn from_hex3(v: u16) -> Self {
        let r = ((v >> 8) & 0xf) as u8;
        let g = ((v >> 4) & 0xf) as u8;
        let b = (v & 0xf) as u8;
        Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b)
    }
}

/// Fully covering opacity.
pub const OPA_COVER: u8 = 255;
/// Fully transparent.
pub const OPA_TRANSP: u8 = 0;
/// Half opacity, used by the compositing stress scenes.
pub const OPA_50: u8 = 128;

/// A widget dimension: absolute pixels or a percentage of the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Px(i32),
    Pct(i32),
}

/// Alignment of a widget within its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Center,
    LeftMid,
}

/// Flex-flow direction for container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexFlow {
    #[default]
    Row,
    Column,
    RowWrap,
}

/// Flex alignment policy for the main axis, cross axis and track placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexAlign {
    #[default]
    Start,
    Center,
    End,
    SpaceEvenly,
}

/// Layout applied to a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Children keep their explicit positions.
    #[default]
    None,
    Flex {
        flow: FlexFlow,
        main: FlexAlign,
        cross: FlexAlign,
        track: FlexAlign,
    },
}

/// Bitmap assets the toolkit knows how to decode and blit. Scenes reference
/// them symbolically; the backend owns the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAsset {
    /// Opaque RGB gear bitmap used by the blitting scenes.
    GearOpaque,
    /// The same gear with an alpha channel, for the compositing scenes.
    GearAlpha,
    /// Small avatar photo used by the card scenes.
    Avatar,
}

/// The widget property an [`Animation`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Re-randomize background and text color on every animation step.
    ColorJitter,
    /// Vertical style translation of the target.
    TranslateY,
    /// Vertical scroll position of the target.
    ScrollY,
    /// Indicator value of an arc widget.
    ArcSweep,
}

/// Repeat behavior of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Count(u32),
    Infinite,
}

/// A value-interpolation task bound to a target widget.
///
/// The toolkit interpolates from `start` to `end` over `duration`; when a
/// `playback` duration is set, the value then runs back from `end` to `start`
/// over that time before the next repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub target: WidgetId,
    pub kind: AnimationKind,
    pub start: i32,
    pub end: i32,
    pub duration: Duration,
    pub playback: Option<Duration>,
    pub repeat: Repeat,
}

impl Animation {
    pub fn new(
        target: WidgetId,
        kind: AnimationKind,
        start: i32,
        end: i32,
        duration: Duration,
    ) -> Self {
        Self {
            target,
            kind,
            start,
            end,
            duration,
            playback: None,
            repeat: Repeat::Count(1),
        }
    }

    pub fn playback(mut self, duration: Duration) -> Self {
        self.playback = Some(duration);
        self
    }

    pub fn repeat_infinite(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }
}

/// One published snapshot from the toolkit's performance monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfSample {
    pub fps: u32,
    pub cpu_percent: u32,
    pub render_time_ms: u32,
    pub flush_time_ms: u32,
}

/// Callback-style notifications from the toolkit's event loop.
///
/// The benchmark registers interest (a timer, the performance publisher) and
/// the host forwards the resulting events to
/// [`BenchmarkSession::handle_event`](crate::session::BenchmarkSession::handle_event).
/// This is the ownership-safe rendition of callback registration: dispatch
/// stays on the toolkit's single logical thread and the session never polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolkitEvent {
    TimerFired(TimerHandle),
    PerfPublished(PerfSample),
}

/// The widget toolkit seam.
///
/// Backends implement object-tree mutation, styling, layout, animations,
/// timers and display metrics. All operations are in-memory object-graph
/// mutations on toolkit-guaranteed-valid handles, so they are infallible.
pub trait Toolkit {
    // --- object tree ---

    /// Root canvas that scenes populate.
    fn screen(&self) -> WidgetId;
    /// Always-on-top layer used for the title overlay and full-screen tints.
    fn overlay(&self) -> WidgetId;

    fn create_container(&mut self, parent: WidgetId) -> WidgetId;
    fn create_image(&mut self, parent: WidgetId) -> WidgetId;
    fn create_label(&mut self, parent: WidgetId) -> WidgetId;
    fn create_arc(&mut self, parent: WidgetId) -> WidgetId;
    fn create_button(&mut self, parent: WidgetId) -> WidgetId;

    /// Destroy all children of `id` (not `id` itself).
    fn remove_children(&mut self, id: WidgetId);
    fn child_count(&self, id: WidgetId) -> usize;

    // --- geometry ---

    fn set_size(&mut self, id: WidgetId, width: Length, height: Length);
    fn set_width(&mut self, id: WidgetId, width: Length);
    fn set_pos(&mut self, id: WidgetId, x: i32, y: i32);
    fn align(&mut self, id: WidgetId, align: Align);
    /// Height of the widget's laid-out content in pixels.
    fn content_height(&self, id: WidgetId) -> i32;
    fn scroll_to_y(&mut self, id: WidgetId, y: i32);

    // --- style ---

    /// Drop every local style property, returning the widget to the bare
    /// toolkit defaults.
    fn reset_style(&mut self, id: WidgetId);
    fn set_bg_color(&mut self, id: WidgetId, color: Color);
    fn set_bg_opacity(&mut self, id: WidgetId, opacity: u8);
    fn set_text_color(&mut self, id: WidgetId, color: Color);
    /// Uniform opacity applied to the widget and each child independently.
    fn set_opacity(&mut self, id: WidgetId, opacity: u8);
    /// Opacity applied after the widget subtree is flattened into one layer.
    fn set_layered_opacity(&mut self, id: WidgetId, opacity: u8);
    fn set_pad_all(&mut self, id: WidgetId, pad: i32);
    fn set_pad_top(&mut self, id: WidgetId, pad: i32);
    fn set_pad_row(&mut self, id: WidgetId, pad: i32);
    fn set_pad_gap(&mut self, id: WidgetId, pad: i32);
    fn set_margin_all(&mut self, id: WidgetId, margin: i32);
    fn set_translate_y(&mut self, id: WidgetId, y: i32);

    // --- layout ---

    fn set_layout(&mut self, id: WidgetId, layout: Layout);
    /// Force this child to start a new flex track (row/column).
    fn start_new_flex_track(&mut self, id: WidgetId);

    // --- widget-specific ---

    fn set_image_source(&mut self, id: WidgetId, asset: ImageAsset);
    /// Rotation in hundredths of a degree.
    fn set_image_rotation(&mut self, id: WidgetId, centi_degrees: i32);

    fn set_text(&mut self, id: WidgetId, text: &str);
    fn set_text_font_size(&mut self, id: WidgetId, size: u16);
    fn text(&self, id: WidgetId) -> Option<&str>;
    /// Measure a single-line string at the given font size: `(width, height)`.
    fn text_size(&self, text: &str, font_size: u16) -> (i32, i32);

    fn set_arc_angles(&mut self, id: WidgetId, start: u16, end: u16);
    fn set_arc_value(&mut self, id: WidgetId, value: i32);
    fn set_arc_indicator_width(&mut self, id: WidgetId, width: i32);
    fn set_arc_rounded(&mut self, id: WidgetId, rounded: bool);
    fn set_arc_color(&mut self, id: WidgetId, color: Color);
    /// Opacity of the background arc track.
    fn set_arc_opacity(&mut self, id: WidgetId, opacity: u8);
    /// Opacity of the arc knob.
    fn set_knob_opacity(&mut self, id: WidgetId, opacity: u8);

    // --- display metrics ---

    fn horizontal_resolution(&self) -> i32;
    fn vertical_resolution(&self) -> i32;
    /// Scale a 160-dpi-design pixel count to the display's density.
    fn dpx(&self, px: i32) -> i32;

    // --- animations & timers ---

    fn animate(&mut self, animation: Animation) -> AnimationHandle;
    fn cancel_animation(&mut self, handle: AnimationHandle);
    fn animation_running(&self, handle: AnimationHandle) -> bool;

    fn create_timer(&mut self, period: Duration) -> TimerHandle;
    fn cancel_timer(&mut self, handle: TimerHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex3_expands_nibbles() {
        assert_eq!(Color::from_hex3(0xf00), Color::rgb(0xff, 0, 0));
        assert_eq!(Color::from_hex3(0x0f0), Color::rgb(0, 0xff, 0));
        assert_eq!(Color::from_hex3(0x00f), Color::rgb(0, 0, 0xff));
        assert_eq!(Color::from_hex3(0xf80), Color::rgb(0xff, 0x88, 0));
    }

    #[test]
    fn animation_builder_defaults() {
        let a = Animation::new(
            WidgetId(1),
            AnimationKind::TranslateY,
            0,
            50,
            Duration::from_millis(300),
        );
        assert_eq!(a.playback, None);
        assert_eq!(a.repeat, Repeat::Count(1));

        let a = a.playback(Duration::from_millis(700)).repeat_infinite();
        assert_eq!(a.playback, Some(Duration::from_millis(700)));
        assert_eq!(a.repeat, Repeat::Infinite);
    }
}
