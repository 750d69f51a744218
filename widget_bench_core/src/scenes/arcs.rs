//! Animated vector arcs: a grid of ring indicators sweeping back and forth.

use crate::toolkit::{Align, FlexAlign, FlexFlow, Layout, Length, Toolkit, OPA_TRANSP};

use super::SceneContext;

pub(super) fn multiple_arcs<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    let screen = ctx.ui.screen();
    ctx.ui.set_layout(
        screen,
        Layout::Flex {
            flow: FlexFlow::RowWrap,
            main: FlexAlign::SpaceEvenly,
            cross: FlexAlign::Start,
            track: FlexAlign::SpaceEvenly,
        },
    );

    let cell = ctx.ui.dpx(160);
    let hor_cnt = (ctx.ui.horizontal_resolution() - 16) / cell;
    let ver_cnt = (ctx.ui.vertical_resolution() - 16) / cell;

    for _y in 0..ver_cnt {
        for x in 0..hor_cnt {
            let arc = ctx.ui.create_arc(screen);
            if x == 0 {
                ctx.ui.start_new_flex_track(arc);
            }
            let side = ctx.ui.dpx(100);
            ctx.ui.set_size(arc, Length::Px(side), Length::Px(side));
            ctx.ui.align(arc, Align::Center);

            ctx.ui.set_arc_angles(arc, 0, 360);

            let margin = ctx.ui.dpx(20);
            ctx.ui.set_margin_all(arc, margin);
            // Only the indicator is visible: the track and knob are hidden so
            // the workload is one swept arc per widget.
            ctx.ui.set_arc_opacity(arc, OPA_TRANSP);
            ctx.ui.set_knob_opacity(arc, OPA_TRANSP);
            ctx.ui.set_arc_indicator_width(arc, 10);
            ctx.ui.set_arc_rounded(arc, false);
            let color = ctx.random_color();
            ctx.ui.set_arc_color(arc, color);
            ctx.arc_anim(arc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DisplaySpec, HeadlessToolkit};
    use crate::sequence::SequenceGenerator;

    #[test]
    fn one_animation_per_arc_and_counts_follow_density() {
        let spec = DisplaySpec {
            width: 800,
            height: 480,
            dpi: 320,
        };
        let mut ui = HeadlessToolkit::new(spec);
        let cell = ui.dpx(160);
        let expected = ((800 - 16) / cell) * ((480 - 16) / cell);

        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        multiple_arcs(&mut ctx);
        let handles = ctx.finish();

        assert_eq!(ui.child_count(ui.screen()) as i32, expected);
        assert_eq!(handles.len() as i32, expected);
    }

    #[test]
    fn arcs_show_only_a_flat_colored_indicator() {
        let mut ui = HeadlessToolkit::default();
        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        multiple_arcs(&mut ctx);
        ctx.finish();

        let margin = ui.dpx(20);
        for &arc in ui.children(ui.screen()) {
            assert_eq!(ui.arc_angles(arc), (0, 360));
            assert_eq!(ui.arc_indicator_width(arc), 10);
            assert!(!ui.arc_rounded(arc));
            assert_eq!(ui.arc_opacity(arc), OPA_TRANSP);
            assert_eq!(ui.knob_opacity(arc), OPA_TRANSP);
            assert_eq!(ui.margin(arc), margin);
            assert_eq!(ui.alignment(arc), Some(Align::Center));
            assert!(ui.arc_color(arc).is_some());
        }
    }
}
