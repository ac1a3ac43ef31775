//! Headless demo: bitmap text drawn through the [`Text`] component with an
//! inline BMFont definition.
//!
//! Run with `cargo run --example bitmap_text`.

use std::sync::Arc;

use ember::prelude::*;

const FONT_DATA: &str = "\
info face=\"demo\" size=32
common lineHeight=36 base=28 scaleW=128 scaleH=128
chars count=3
char id=72 x=0 y=0 width=12 height=24 xoffset=1 yoffset=4 xadvance=13
char id=73 x=12 y=0 width=4 height=24 xoffset=1 yoffset=4 xadvance=6
char id=33 x=16 y=0 width=4 height=24 xoffset=1 yoffset=4 xadvance=6
kernings count=1
kerning first=72 second=73 amount=-1
";

fn main() {
    env_logger::init();

    let mut graphics = Graphics::new(Box::new(RecordingBackend::new(800, 600)));
    let mut scene = Scene::with_default_systems(&mut graphics);

    // A white 128x128 page stands in for a real font atlas here.
    let page = graphics.create_texture(128, 128, &[255u8; 128 * 128 * 4]);
    let font = Arc::new(BitmapFont::new(page, FONT_DATA).expect("font data parses"));

    println!("'HI!' measures {}x{}", font.width("HI!"), font.line_height());

    let label_font = font.clone();
    scene.add_entity(move |e| {
        e.add_component(Transform::from_xy(400.0, 300.0));
        let mut text = Text::new(label_font, "HI!");
        text.anchor = Vec2::new(0.5, 0.5);
        e.add_component(text);
    });

    scene.update(1.0 / 60.0);
    scene.render(&mut graphics);

    let backend = graphics.backend_as::<RecordingBackend>().unwrap();
    for call in &backend.calls {
        println!(
            "target {:?}: {} glyph quads",
            call.target,
            call.index_count / 6
        );
    }
}
