//! Demo viewer: a toy barrel detector with a few tracks.
//!
//! Usage: `detview [options.toml]`

use std::path::Path;

use detview::{
    options::Options,
    scene::{Geometry, LightKind, Node, Scene},
    Viewer,
};
use glam::{Quat, Vec3};

const BARREL_LAYERS: usize = 4;
const MODULES_PER_LAYER: usize = 16;

/// A toy barrel detector with a handful of helix-free tracks.
fn demo_event() -> Scene {
    let mut scene = Scene::new();
    let _ = scene.add_to_root(Node::light("Ambient", LightKind::Ambient));
    let _ = scene.add_to_root(Node::helper(
        "Axes",
        Some(Geometry::line_segments(&[
            [Vec3::ZERO, Vec3::X * 50.0],
            [Vec3::ZERO, Vec3::Y * 50.0],
            [Vec3::ZERO, Vec3::Z * 50.0],
        ])),
    ));

    let barrel = scene.add_to_root(Node::group("Barrel"));
    for layer in 0..BARREL_LAYERS {
        let radius = 30.0 + 18.0 * layer as f32;
        let shade = 0.35 + 0.15 * layer as f32;
        for module in 0..MODULES_PER_LAYER {
            let phi = module as f32 / MODULES_PER_LAYER as f32
                * std::f32::consts::TAU;
            let position = Vec3::new(radius * phi.cos(), radius * phi.sin(), 0.0);
            let width = radius * std::f32::consts::TAU / MODULES_PER_LAYER as f32;
            let _ = scene.add(
                barrel,
                Node::mesh(
                    &format!("Module L{layer} M{module}"),
                    Geometry::cuboid(4.0, width * 0.9, 120.0),
                    [shade, 0.55, 0.9 - shade * 0.5, 1.0],
                )
                .with_position(position)
                .with_rotation(Quat::from_rotation_z(phi))
                .with_user_data("layer", layer as u64)
                .with_user_data("module", module as u64)
                .with_user_data("subdetector", "pixel"),
            );
        }
    }

    let tracks = scene.add_to_root(Node::group("Tracks"));
    for (i, (phi, eta)) in [(0.3f32, 0.1f32), (1.9, -0.4), (3.4, 0.7), (5.0, -0.1)]
        .into_iter()
        .enumerate()
    {
        let direction = Vec3::new(phi.cos(), phi.sin(), eta.sinh()).normalize();
        let _ = scene.add(
            tracks,
            Node::line_segments(
                &format!("Track {i}"),
                Geometry::line_segments(&[[Vec3::ZERO, direction * 110.0]]),
                [1.0, 0.85, 0.2, 1.0],
            )
            .with_user_data("pt_gev", f64::from(12.5 + 7.0 * i as f32)),
        );
    }
    scene
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder()
        .with_scene(demo_event())
        .with_options(options)
        .with_title("detview")
        .build()
        .run()
    {
        log::error!("{e}");
        std::process::exit(1);
    }
}
