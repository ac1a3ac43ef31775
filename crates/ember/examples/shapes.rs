//! Headless demo: a scene of layered shape entities rendered through the
//! recording backend, printing what each frame batched.
//!
//! Run with `cargo run --example shapes`.

use ember::prelude::*;

fn main() {
    env_logger::init();

    let mut graphics = Graphics::new(Box::new(RecordingBackend::new(800, 600)));
    let mut scene = Scene::with_default_systems(&mut graphics);

    scene.add_entity(|e| {
        e.add_component(Transform::from_xy(400.0, 300.0));
        let mut shape = BoxShape::new(200.0, 120.0);
        shape.fill_color = Color::rgb(0.2, 0.3, 0.8);
        e.add_component(shape);
    });
    scene.add_entity(|e| {
        e.set_layer(1);
        e.add_component(Transform::from_xy(400.0, 300.0).with_rotation(30.0));
        let mut shape = BoxShape::new(80.0, 80.0);
        shape.fill_color = Color::rgb(0.9, 0.6, 0.1);
        e.add_component(shape);
    });
    scene.add_entity(|e| {
        e.set_layer(2);
        e.add_component(Transform::from_xy(400.0, 300.0));
        let mut shape = CircleShape::new(24.0);
        shape.filled = false;
        shape.stroke = true;
        shape.stroke_color = Color::WHITE;
        e.add_component(shape);
    });

    for frame in 0..3 {
        scene.update(1.0 / 60.0);
        scene.render(&mut graphics);

        let backend = graphics.backend_as::<RecordingBackend>().unwrap();
        println!(
            "frame {frame}: {} draw calls, {} clears",
            backend.calls.len(),
            backend.clears.len()
        );
        for call in &backend.calls {
            println!(
                "  target {:?}, binding {:?}, {} indices",
                call.target, call.binding, call.index_count
            );
        }
        graphics.backend_as_mut::<RecordingBackend>().unwrap().clear_recording();
    }
}
