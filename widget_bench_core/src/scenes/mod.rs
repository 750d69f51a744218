//! Benchmark scene catalog and constructors.
//!
//! Each scene is a zero-argument constructor that assumes a freshly cleared
//! canvas and populates it with widgets exercising one rendering path. Scene
//! files are organised by workload family:
//! - [`rects`] — flat-fill scenes.
//! - [`images`] — image blitting, alpha compositing and rotation.
//! - [`text`] — tiled labels and scrolling paragraph text.
//! - [`arcs`] — animated vector arcs.
//! - [`containers`] — composite "card" widgets and overlay/opacity variants.
//!
//! To add a new scene, write a constructor in the matching sub-module and
//! register it in the [`register_scenes!`] invocation at the bottom of this
//! file. The catalog order is the order scenes run in.

pub mod arcs;
pub mod containers;
pub mod images;
pub mod rects;
pub mod text;

use std::time::Duration;

use smallvec::SmallVec;

use crate::sequence::SequenceGenerator;
use crate::toolkit::{Animation, AnimationHandle, AnimationKind, Color, Toolkit, WidgetId};

/// A scene constructor. Receives the construction context and builds the
/// widget tree for its workload.
pub type ConstructFn<T> = fn(&mut SceneContext<'_, T>);

/// One catalog entry: a display name plus the constructor. The catalog is
/// terminated by [`SceneDescriptor::SENTINEL`], whose constructor is absent.
pub struct SceneDescriptor<T: Toolkit> {
    pub name: &'static str,
    pub construct: Option<ConstructFn<T>>,
}

impl<T: Toolkit> SceneDescriptor<T> {
    /// Terminating entry: empty name, no constructor, loading it is a no-op.
    pub const SENTINEL: Self = Self {
        name: "",
        construct: None,
    };
}

/// Construction context handed to scene constructors.
///
/// Every animation a constructor starts is recorded here, so the driver can
/// cancel exactly that set when the scene is torn down — including animations
/// attached to widgets other than the canvas root.
pub struct SceneContext<'a, T: Toolkit> {
    pub ui: &'a mut T,
    pub rng: &'a mut SequenceGenerator,
    handles: SmallVec<[AnimationHandle; 16]>,
}

impl<'a, T: Toolkit> SceneContext<'a, T> {
    pub fn new(ui: &'a mut T, rng: &'a mut SequenceGenerator) -> Self {
        Self {
            ui,
            rng,
            handles: SmallVec::new(),
        }
    }

    /// Start an animation and record its handle for scene teardown.
    pub fn animate(&mut self, animation: Animation) -> AnimationHandle {
        let handle = self.ui.animate(animation);
        self.handles.push(handle);
        handle
    }

    /// The handles of every animation this scene started.
    pub fn finish(self) -> SmallVec<[AnimationHandle; 16]> {
        self.handles
    }

    /// A color with a random hue, avoiding near-black and near-white.
    pub fn random_color(&mut self) -> Color {
        Color::from_hex3(self.rng.next(0x00f, 0xff0) as u16)
    }

    /// Re-randomize the target's background and text color every step.
    pub fn color_anim(&mut self, target: WidgetId) {
        self.animate(
            Animation::new(
                target,
                AnimationKind::ColorJitter,
                0,
                100,
                Duration::from_millis(100),
            )
            .repeat_infinite(),
        );
    }

    /// Translate the target up and down by `y_max`, with randomized forward
    /// and return durations.
    pub fn shake_anim(&mut self, target: WidgetId, y_max: i32) {
        let t1 = self.rng.next(300, 3000) as u64;
        let t2 = self.rng.next(300, 3000) as u64;
        self.animate(
            Animation::new(
                target,
                AnimationKind::TranslateY,
                0,
                y_max,
                Duration::from_millis(t1),
            )
            .playback(Duration::from_millis(t2))
            .repeat_infinite(),
        );
    }

    /// Auto-scroll the target between 0 and `y_max`.
    pub fn scroll_anim(&mut self, target: WidgetId, y_max: i32) {
        let t1 = self.rng.next(1000, 3000) as u64;
        let t2 = self.rng.next(1000, 3000) as u64;
        self.animate(
            Animation::new(
                target,
                AnimationKind::ScrollY,
                0,
                y_max,
                Duration::from_millis(t1),
            )
            .playback(Duration::from_millis(t2))
            .repeat_infinite(),
        );
    }

    /// Sweep an arc's indicator value back and forth between 0 and 100.
    pub fn arc_anim(&mut self, target: WidgetId) {
        let t1 = self.rng.next(1000, 3000) as u64;
        let t2 = self.rng.next(1000, 3000) as u64;
        self.animate(
            Animation::new(
                target,
                AnimationKind::ArcSweep,
                0,
                100,
                Duration::from_millis(t1),
            )
            .playback(Duration::from_millis(t2))
            .repeat_infinite(),
        );
    }
}

// ===========================================================================
// Registration macro & catalog
// ===========================================================================

/// Register all benchmark scenes, in run order. The macro generates:
/// - `SCENE_NAMES` — every catalog name, sentinel included;
/// - `SCENE_COUNT` — number of real scenes;
/// - `catalog<T>()` — the ordered descriptor list for a backend.
macro_rules! register_scenes {
    ($(($name:expr, $construct:path)),* $(,)?) => {
        /// Names of all catalog entries, terminated by the sentinel's empty
        /// name.
        pub const SCENE_NAMES: &[&str] = &[$($name,)* ""];

        /// Number of real scenes (the sentinel is not counted).
        pub const SCENE_COUNT: usize = SCENE_NAMES.len() - 1;

        /// Build the ordered scene catalog for a backend.
        pub fn catalog<T: Toolkit>() -> Vec<SceneDescriptor<T>> {
            vec![
                $(SceneDescriptor { name: $name, construct: Some($construct) },)*
                SceneDescriptor::SENTINEL,
            ]
        }
    };
}

register_scenes!(
    ("Empty screen", rects::empty_screen),
    ("Moving wallpaper", images::moving_wallpaper),
    ("Single rectangle", rects::single_rectangle),
    ("Multiple rectangles", rects::multiple_rectangles),
    ("Multiple opaque images", images::multiple_opaque_images),
    ("Multiple alpha images", images::multiple_alpha_images),
    ("Rotated alpha images", images::rotated_alpha_images),
    ("Multiple labels", text::multiple_labels),
    ("Screen sized text", text::screen_sized_text),
    ("Multiple arcs", arcs::multiple_arcs),
    ("Containers", containers::containers),
    ("Containers with overlay", containers::containers_with_overlay),
    ("Containers with opacity", containers::containers_with_opacity),
    ("Containers with layered opacity", containers::containers_with_layered_opacity),
    ("Containers with scrolling", containers::containers_with_scrolling),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;

    #[test]
    fn catalog_has_fifteen_scenes_and_a_sentinel() {
        let catalog = catalog::<HeadlessToolkit>();
        assert_eq!(catalog.len(), SCENE_COUNT + 1);
        assert_eq!(SCENE_COUNT, 15);

        let sentinel = catalog.last().unwrap();
        assert_eq!(sentinel.name, "");
        assert!(sentinel.construct.is_none());

        for descriptor in &catalog[..SCENE_COUNT] {
            assert!(!descriptor.name.is_empty());
            assert!(descriptor.construct.is_some());
        }
    }

    #[test]
    fn scene_names_are_unique() {
        let mut names: Vec<&str> = SCENE_NAMES[..SCENE_COUNT].to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SCENE_COUNT);
    }

    #[test]
    fn every_scene_constructs_and_records_its_animations() {
        let mut ui = HeadlessToolkit::default();
        let mut rng = SequenceGenerator::new();
        for descriptor in catalog::<HeadlessToolkit>() {
            ui.remove_children(ui.screen());
            let Some(construct) = descriptor.construct else {
                continue;
            };
            let mut ctx = SceneContext::new(&mut ui, &mut rng);
            construct(&mut ctx);
            let handles = ctx.finish();
            for handle in handles {
                assert!(
                    ui.animation_running(handle),
                    "stale handle from {:?}",
                    descriptor.name
                );
            }
        }
    }
}
