//! Text layout scenes: a wall of small labels and a scrolling paragraph
//! block.

use crate::toolkit::{FlexAlign, FlexFlow, Layout, Length, Toolkit};

use super::SceneContext;

/// Short string tiled across the screen by `multiple_labels`.
const LABEL_TEXT: &str = "Hello world!";

/// Base font size the tiled labels are measured at.
const LABEL_FONT_SIZE: u16 = 14;

/// Displays with fewer pixels than this get the 3-paragraph text; larger ones
/// get twice as much so the scroll workload stays proportionate.
const SMALL_DISPLAY_PIXELS: i32 = 150_000;

const PARAGRAPHS: [&str; 3] = [
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nulla nec rhoncus arcu, in consectetur orci. Sed vitae dolor sed nisi ultrices vehicula quis ac dolor. Vivamus hendrerit hendrerit lectus, sed tempus velit suscipit in. Fusce eu tristique arcu. Sed et molestie leo, in lacinia nunc. Quisque semper lorem sed ante feugiat, at molestie risus blandit. Maecenas lobortis urna in diam feugiat porta. Ut facilisis mauris eget nibh posuere aliquet. Proin facilisis egestas magna, id vulputate massa bibendum a. Etiam gravida metus non egestas suscipit. Sed sollicitudin mollis nisi, eu fringilla leo vestibulum posuere. Donec et ex nulla. Phasellus et ornare justo, vel hendrerit justo. Curabitur pulvinar nunc sed tincidunt dignissim. Praesent eleifend lectus velit, id malesuada ante placerat id. Fusce massa erat, egestas vel venenatis eu, tempus nec est.",
    "Phasellus iaculis malesuada molestie. Cras ullamcorper justo a dolor dignissim tincidunt. Mauris euismod risus quis lobortis mollis. Ut vitae placerat massa, aliquet varius lectus. Nulla ac ornare purus, quis auctor velit. Donec posuere dolor rhoncus efficitur dictum. Integer venenatis aliquet nunc eu convallis. Nunc quis varius velit. Suspendisse enim metus, molestie eget mauris sit amet, euismod volutpat turpis. Duis rhoncus commodo gravida. Pellentesque velit mi, dictum id consequat placerat, condimentum ac elit. Duis aliquet leo eu dolor cursus rhoncus. Quisque aliquam sapien ut purus hendrerit laoreet. Ut venenatis venenatis risus, a vestibulum enim lobortis a. Maecenas auctor tortor lorem, quis laoreet nulla aliquet a. Sed ipsum lorem, facilisis in congue a, dictum ut ligula.",
    "Aliquam id tellus in enim hendrerit mattis. Sed ipsum arcu, feugiat sed eros quis, vulputate facilisis turpis. Quisque venenatis risus massa. Proin lacinia, nunc non ultrices commodo, ligula dolor lobortis lectus, iaculis pulvinar metus orci eu elit. Donec tincidunt lacinia semper. Class aptent taciti sociosqu ad litora torquent per conubia nostra, per inceptos himenaeos. Donec vitae odio risus. Donec sodales sed nulla sit amet iaculis. Duis lacinia mauris dictum, fermentum nibh eget, convallis tellus. Sed congue luctus purus non scelerisque. Etiam fermentum lacus mauris, at bibendum nunc aliquam at. Vivamus accumsan vestibulum pharetra. Proin rhoncus nisi purus, vel blandit metus auctor eget. Fusce dictum sed lectus sed aliquam. Praesent lobortis quam sed pretium tincidunt.",
];

/// `count` lorem paragraphs separated by blank lines, cycling over the three
/// bases.
fn lorem_text(count: usize) -> String {
    let parts: Vec<&str> = PARAGRAPHS.iter().copied().cycle().take(count).collect();
    parts.join("\n\n")
}

/// A short text string repeated to fill the visible area, each instance
/// color-cycled.
pub(super) fn multiple_labels<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
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
    ctx.ui.set_pad_row(screen, 80);

    let (text_w, text_h) = ctx.ui.text_size(LABEL_TEXT, LABEL_FONT_SIZE);
    let per_row = (ctx.ui.horizontal_resolution() - 16) / (text_w + 30);
    let rows = (ctx.ui.vertical_resolution() - 200) / (text_h + 50);
    let count = per_row * rows;

    for _ in 0..count {
        let label = ctx.ui.create_label(screen);
        ctx.ui.set_text(label, LABEL_TEXT);
        ctx.color_anim(label);
    }
}

/// One paragraph-scale text block; the screen auto-scrolls over it.
pub(super) fn screen_sized_text<T: Toolkit>(ctx: &mut SceneContext<'_, T>) {
    let screen = ctx.ui.screen();
    let label = ctx.ui.create_label(screen);
    ctx.ui.set_width(label, Length::Pct(100));

    let pixels = ctx.ui.horizontal_resolution() * ctx.ui.vertical_resolution();
    let paragraphs = if pixels < SMALL_DISPLAY_PIXELS { 3 } else { 6 };
    ctx.ui.set_text(label, &lorem_text(paragraphs));

    let y_max = ctx.ui.content_height(label) - ctx.ui.vertical_resolution();
    ctx.scroll_anim(screen, y_max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{DisplaySpec, HeadlessToolkit};
    use crate::sequence::SequenceGenerator;
    use crate::toolkit::WidgetId;

    fn build(spec: DisplaySpec, construct: fn(&mut SceneContext<'_, HeadlessToolkit>)) -> HeadlessToolkit {
        let mut ui = HeadlessToolkit::new(spec);
        let mut rng = SequenceGenerator::new();
        let mut ctx = SceneContext::new(&mut ui, &mut rng);
        construct(&mut ctx);
        ctx.finish();
        ui
    }

    #[test]
    fn label_count_follows_measured_text_size() {
        let ui = HeadlessToolkit::default();
        let (w, h) = ui.text_size(LABEL_TEXT, LABEL_FONT_SIZE);
        let expected = ((ui.horizontal_resolution() - 16) / (w + 30))
            * ((ui.vertical_resolution() - 200) / (h + 50));

        let ui = build(DisplaySpec::default(), multiple_labels);
        assert_eq!(ui.child_count(ui.screen()) as i32, expected);
    }

    #[test]
    fn small_displays_get_three_paragraphs_large_get_six() {
        let small = build(
            DisplaySpec {
                width: 320,
                height: 240,
                dpi: 160,
            },
            screen_sized_text,
        );
        let large = build(DisplaySpec::default(), screen_sized_text);

        let text_of = |ui: &HeadlessToolkit| {
            let label: WidgetId = ui.children(ui.screen())[0];
            ui.text(label).unwrap().to_string()
        };
        let small_text = text_of(&small);
        let large_text = text_of(&large);
        assert_eq!(small_text.matches("\n\n").count(), 2);
        assert_eq!(large_text.matches("\n\n").count(), 5);
        assert!(large_text.len() > small_text.len());
    }
}
