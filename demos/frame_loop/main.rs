//! Headless frame loop.
//!
//! Builds a small scene, then replays a pointer drag over a few frames and
//! logs what the editor commits and picks.
//!
//! ```text
//! cargo run --example frame_loop
//! RUST_LOG=cadbane=debug cargo run --example frame_loop
//! ```

use cadbane::config::EditorConfig;
use cadbane::editor::Editor;
use cadbane::geometry::Continuity;
use cadbane::math::Point3;

fn main() {
    // Default: WARN for everything, INFO for cadbane and this demo.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("frame_loop=info".parse().unwrap_or_default())
        .add_directive("cadbane=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut editor = Editor::new(&EditorConfig::default());
    let viewport = editor.viewport();
    let cx = f64::from(viewport.width) / 2.0;
    let cy = f64::from(viewport.height) / 2.0;

    editor.scene_mut().set_cursor(Point3::new(0.0, -1.0, 0.0));
    editor.add_surface(Continuity::C2, 6, 6, 1.0);
    editor.scene_mut().set_cursor(Point3::new(1.5, 0.0, 0.0));
    editor.add_ellipsoid(0.5, 0.75, 0.5);
    editor.scene_mut().set_cursor(Point3::origin());
    editor.add_point_at_cursor();

    // Nothing is pickable before the first commit.
    tracing::info!(hit = ?editor.pick(cx, cy), "pick before first frame");
    let report = editor.end_frame();
    tracing::info!(committed = report.committed.len(), "first frame");

    let Some(grabbed) = editor.pointer_pressed(cx, cy) else {
        tracing::warn!("nothing under the pointer");
        return;
    };
    tracing::info!(id = %grabbed, "grabbed");

    for step in 1..=5 {
        editor.pointer_moved(cx + 20.0 * f64::from(step), cy);
        let report = editor.end_frame();
        tracing::info!(
            frame = editor.frame(),
            committed = report.committed.len(),
            block = editor.raster().block_size(),
            "drag frame"
        );
    }
    editor.pointer_released();

    if let Some(hit) = editor.pick(cx + 100.0, cy) {
        tracing::info!(id = %hit.object, distance = hit.distance, "picked after drag");
    }

    while !editor.raster().is_complete() {
        editor.end_frame();
    }
    tracing::info!(frames = editor.frame(), "ellipsoid raster complete");
}
