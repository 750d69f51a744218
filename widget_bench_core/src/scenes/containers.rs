//! Composite "card" scenes: image + text + button widgets arranged in a
//! grid, with overlay, uniform-opacity and layered-opacity compositing
//! variants, plus a positional overflow case.

use crate::toolkit::{
    Align, FlexAlign, FlexFlow, ImageAsset, Layout, Length, Toolkit, WidgetId, OPA_50,
};

use super::SceneContext;

/// Card footprint used to derive the grid density from the resolution.
const CARD_CELL_W: i32 = 300;
const CARD_CELL_H: i32 = 150;

/// How each card in the grid is composited.
enum CardMode {
    Plain,
    /// 50% opacity applied to the card and each child independently.
    UniformOpacity,
    /// Card subtree flattened into one layer, then blended at 50%.
    LayeredOpacity,
}

/// An avatar, two labels and a button on a fixed-size panel.
fn card<T: Toolkit>(ctx: &mut SceneContext<'_, T>) -> WidgetId {
    let panel = ctx.ui.create_container(ctx.ui.screen());
    ctx.ui.set_size(panel, Length::Px(270), Length::Px(120));
    ctx.ui.set_pad_all(panel, 8);

    let avatar = ctx.ui.create_image(panel);
    ctx.ui.align(avatar, Align::LeftMid);
    ctx.ui.set_image_source(avatar, ImageAsset::Avatar);

    let name = ctx.ui.create_label(panel);
    ctx.ui.set_text(name, "John Smith");
    ctx.ui.set_text_font_size(name, 24);
    ctx.ui.set_pos(name, 100, 0);

    let subtitle = ctx.ui.create_label(panel);
    ctx.ui.set_text(subtitle, "A DIY enthusiast");
    ctx.ui.set_text_font_size(subtitle, 14);
    ctx.ui.set_pos(subtitle, 100, 30);

    let button = ctx.ui.create_button(panel);
    ctx.ui.set_pos(button, 100, 50);

    let button_label = ctx.ui.create_label(button);
    ctx.ui.set_text(button_label, "Connect");

    panel
}

/// Fill the screen with shaking cards, composited per `mode`.
fn card_grid<T: Toolkit>(ctx: &mut SceneContext<'_, T>, mode: CardMode) {
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

    let hor_cnt = (ctx.ui.horizontal_resolution() - 16) / CARD_CELL_W;
    let ver_cnt = (ctx.ui.vertical_resolution() - 16) / CARD_CELL_H;

    for _y in 0..ver_cnt {
        for x in 0..hor_cnt {
            let panel = card(ctx);
            if x == 0 {
                ctx.ui.start_new_flex_track(panel);
            }
            match mode {
                CardMode::Plain => {}
                CardMode::UniformOpacity => ctx.ui.set_opacity(panel, OPA_50),
                CardMode::LayeredOpacity => ctx.ui.set_layered_opacity(panel, OPA_50),
            }
            ctx.shake_anim(panel, 50);
        }
    }
}

pub(super) fn containers<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    card_grid(ctx, CardMode::Plain);
}

/// Cards plus a semi-transparent, color-cycled tint over the whole screen.
pub(super) fn containers_with_overlay<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    card_grid(ctx, CardMode::Plain);

    let overlay = ctx.ui.overlay();
    ctx.ui.set_bg_opacity(overlay, OPA_50);
    ctx.color_anim(overlay);
}

pub(super) fn containers_with_opacity<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    card_grid(ctx, CardMode::UniformOpacity);
}

pub(super) fn containers_with_layered_opacity<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    card_grid(ctx, CardMode::LayeredOpacity);
}

/// A single plain container at a randomized position; stresses scrolling and
/// overflow handling rather than compositing, so nothing animates.
pub(super) fn containers_with_scrolling<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    let obj = ctx.ui.create_container(ctx.ui.screen());
    let x = ctx.rng.next(0, 300);
    let y = ctx.rng.next(0, 300);
    ctx.ui.set_pos(obj, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessToolkit, WidgetKind};
    use crate::sequence::SequenceGenerator;

    fn construct(f: fn(&mut SceneContext<'_, HeadlessToolkit>)) -> (HeadlessToolkit, usize) {
        let mut ui = HeadlessToolkit::default();
        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        f(&mut ctx);
        let handles = ctx.finish().len();
        (ui, handles)
    }

    #[test]
    fn card_is_image_two_labels_and_a_button() {
        let (ui, _) = construct(containers);
        let first_card = ui.children(ui.screen())[0];
        let children = ui.children(first_card);
        assert_eq!(children.len(), 4);
        assert_eq!(ui.widget_kind(children[0]), WidgetKind::Image);
        assert_eq!(ui.image_source(children[0]), Some(ImageAsset::Avatar));
        assert_eq!(ui.alignment(children[0]), Some(Align::LeftMid));
        assert_eq!(ui.widget_kind(children[1]), WidgetKind::Label);
        assert_eq!(ui.widget_kind(children[2]), WidgetKind::Label);
        assert_eq!(ui.widget_kind(children[3]), WidgetKind::Button);
        // The button carries its own label.
        let button_children = ui.children(children[3]);
        assert_eq!(button_children.len(), 1);
        assert_eq!(ui.text(button_children[0]), Some("Connect"));
    }

    #[test]
    fn overlay_variant_tints_the_top_layer() {
        let (ui, handles) = construct(containers_with_overlay);
        assert_eq!(ui.bg_opacity(ui.overlay()), OPA_50);
        // One shake per card plus the overlay color cycle.
        assert_eq!(handles, ui.child_count(ui.screen()) + 1);
    }

    #[test]
    fn opacity_variants_mark_every_card() {
        let (ui, _) = construct(containers_with_opacity);
        for &panel in ui.children(ui.screen()) {
            assert_eq!(ui.opacity(panel), OPA_50);
        }

        let (ui, _) = construct(containers_with_layered_opacity);
        for &panel in ui.children(ui.screen()) {
            assert_eq!(ui.layered_opacity(panel), OPA_50);
        }
    }

    #[test]
    fn scrolling_variant_is_one_unanimated_container_within_bounds() {
        let (ui, handles) = construct(containers_with_scrolling);
        assert_eq!(handles, 0);
        let children = ui.children(ui.screen());
        assert_eq!(children.len(), 1);
        let (x, y) = ui.position(children[0]);
        assert!((0..300).contains(&x));
        assert!((0..300).contains(&y));
    }
}
