//! Flat-fill scenes: plain rectangles with cycling colors.

use crate::toolkit::{
    Align, FlexAlign, FlexFlow, Layout, Length, Toolkit, OPA_COVER,
};

use super::SceneContext;

/// Nothing but the screen itself, with background and text color
/// re-randomized continuously.
pub(super) fn empty_screen<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    let screen = ctx.ui.screen();
    ctx.color_anim(screen);
}

/// One large centered rectangle with a cycling fill.
pub(super) fn single_rectangle<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    let screen = ctx.ui.screen();
    let obj = ctx.ui.create_container(screen);
    ctx.ui.reset_style(obj);
    ctx.ui.set_bg_opacity(obj, OPA_COVER);
    ctx.ui.align(obj, Align::Center);
    ctx.ui.set_size(obj, Length::Pct(30), Length::Pct(30));
    ctx.color_anim(obj);
}

/// Nine flat rectangles in a wrapped grid, each independently color-cycled.
pub(super) fn multiple_rectangles<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    let screen = ctx.ui.screen();
    ctx.ui.set_layout(
        screen,
        Layout::Flex {
            flow: FlexFlow::RowWrap,
            main: FlexAlign::SpaceEvenly,
            cross: FlexAlign::Center,
            track: FlexAlign::SpaceEvenly,
        },
    );

    for _ in 0..9 {
        let obj = ctx.ui.create_container(screen);
        ctx.ui.reset_style(obj);
        ctx.ui.set_bg_opacity(obj, OPA_COVER);
        ctx.ui.set_size(obj, Length::Pct(25), Length::Pct(25));
        ctx.color_anim(obj);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;
    use crate::sequence::SequenceGenerator;

    #[test]
    fn multiple_rectangles_creates_nine_animated_children() {
        let mut ui = HeadlessToolkit::default();
        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        multiple_rectangles(&mut ctx);
        let handles = ctx.finish();
        assert_eq!(handles.len(), 9);
        assert_eq!(ui.child_count(ui.screen()), 9);
        assert!(matches!(
            ui.layout_of(ui.screen()),
            Layout::Flex {
                flow: FlexFlow::RowWrap,
                ..
            }
        ));
    }

    #[test]
    fn empty_screen_adds_no_children() {
        let mut ui = HeadlessToolkit::default();
        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        empty_screen(&mut ctx);
        assert_eq!(ctx.finish().len(), 1);
        assert_eq!(ui.child_count(ui.screen()), 0);
    }
}
