//! Image blitting scenes: full-bleed wallpaper, tiled grids in opaque and
//! alpha-blended variants, and the rotated-transform stress case.

use crate::toolkit::{FlexAlign, FlexFlow, ImageAsset, Layout, Length, Toolkit};

use super::SceneContext;

/// Grid cell used by the tiled image scenes; the workload scales with the
/// display resolution.
const IMAGE_CELL: i32 = 116;

/// A full-bleed image translated vertically in a shake motion.
pub(super) fn moving_wallpaper<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    let screen = ctx.ui.screen();
    ctx.ui.set_pad_all(screen, 0);

    let img = ctx.ui.create_image(screen);
    ctx.ui.set_size(img, Length::Pct(150), Length::Pct(150));
    ctx.ui.set_image_source(img, ImageAsset::GearOpaque);
    let y_max = -ctx.ui.vertical_resolution() / 3;
    ctx.shake_anim(img, y_max);
}

pub(super) fn multiple_opaque_images<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    image_grid(ctx, ImageAsset::GearOpaque, false);
}

pub(super) fn multiple_alpha_images<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    image_grid(ctx, ImageAsset::GearAlpha, false);
}

pub(super) fn rotated_alpha_images<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    image_grid(ctx, ImageAsset::GearAlpha, true);
}

/// Tile the visible area with shaking images; optionally give each a random
/// rotation in `[100, 3500)` hundredths of a degree.
fn image_grid<T: Toolkit>(ctx: &mut SceneContext<'_, T>, asset: ImageAsset, rotated: bool) {
    let screen = ctx.ui.screen();
    ctx.ui.set_layout(
        screen,
        Layout::Flex {
            flow: FlexFlow::RowWrap,
            main: FlexAlign::SpaceEvenly,
            cross: FlexAlign::Start,
            track: FlexAlign::Start,
        },
    );
    ctx.ui.set_pad_row(screen, 20);

    let hor_cnt = (ctx.ui.horizontal_resolution() - 16) / IMAGE_CELL;
    let ver_cnt = (ctx.ui.vertical_resolution() - IMAGE_CELL) / IMAGE_CELL;

    for _y in 0..ver_cnt {
        for x in 0..hor_cnt {
            let img = ctx.ui.create_image(screen);
            ctx.ui.set_image_source(img, asset);
            if x == 0 {
                ctx.ui.start_new_flex_track(img);
            }
            if rotated {
                let angle = ctx.rng.next(100, 3500);
                ctx.ui.set_image_rotation(img, angle);
            }
            ctx.shake_anim(img, 80);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DisplaySpec, HeadlessToolkit};
    use crate::sequence::SequenceGenerator;

    fn grid_count(width: i32, height: i32) -> usize {
        let hor = (width - 16) / IMAGE_CELL;
        let ver = (height - IMAGE_CELL) / IMAGE_CELL;
        (hor * ver) as usize
    }

    #[test]
    fn grid_scales_with_display_resolution() {
        for (w, h) in [(800, 480), (320, 240), (1280, 720)] {
            let mut ui = HeadlessToolkit::new(DisplaySpec {
                width: w,
                height: h,
                dpi: 160,
            });
            let mut rng = SequenceGenerator::new();
            let mut ctx = SceneContext::new(&mut ui, &mut rng);
            multiple_opaque_images(&mut ctx);
            let handles = ctx.finish();
            assert_eq!(ui.child_count(ui.screen()), grid_count(w, h));
            assert_eq!(handles.len(), grid_count(w, h));
        }
    }

    #[test]
    fn grid_rows_wrap_on_explicit_track_breaks() {
        let mut ui = HeadlessToolkit::default();
        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        multiple_alpha_images(&mut ctx);
        ctx.finish();

        assert_eq!(ui.pad_row(ui.screen()), 20);
        let per_row = ((ui.horizontal_resolution() - 16) / IMAGE_CELL) as usize;
        for (i, &img) in ui.children(ui.screen()).iter().enumerate() {
            assert_eq!(ui.image_source(img), Some(ImageAsset::GearAlpha));
            assert_eq!(ui.starts_new_flex_track(img), i % per_row == 0);
        }
    }

    #[test]
    fn rotation_is_bounded_and_reproducible() {
        let build = || {
            let mut ui = HeadlessToolkit::default();
            let mut rng = SequenceGenerator::new();
            let mut ctx = SceneContext::new(&mut ui, &mut rng);
            rotated_alpha_images(&mut ctx);
            ctx.finish();
            ui
        };
        let a = build();
        let b = build();
        let screen = a.screen();
        for (&child_a, &child_b) in a.children(screen).iter().zip(b.children(screen)) {
            let rot_a = a.image_rotation(child_a);
            assert!((100..3500).contains(&rot_a), "rotation {rot_a} out of range");
            assert_eq!(rot_a, b.image_rotation(child_b));
        }
    }

    #[test]
    fn wallpaper_is_a_single_oversized_image() {
        let mut ui = HeadlessToolkit::default();
        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        moving_wallpaper(&mut ctx);
        assert_eq!(ctx.finish().len(), 1);
        assert_eq!(ui.child_count(ui.screen()), 1);
    }
}
