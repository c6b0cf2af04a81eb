mod color;
mod geometry;
mod gpu;
mod interactive;
mod light;
mod obstacle;
mod render;

#[cfg(test)]
mod tests;

use glam::DVec2;

// Re-export public API
pub use color::{RGBA, RayColor};
pub use geometry::{Circle, Line, VectorExt, angle_dif, from_angle, wrap_angle, wrap_angle_about};
pub use light::{
    BEYOND_RANGE, CLIP_EPSILON, CastMode, DEFAULT_RANGE, DEPTH_LIMIT, LightTree, Sector, SectorId, SectorSeed,
    VISIBILITY_CUTOFF,
};
pub use obstacle::{FilterLine, Obstacle, ObstacleId, ReflectLine, SolidCircle, SolidLine, SolidRect};
pub use render::{Canvas, Primitive, RenderTarget};
pub use interactive::{GpuViewerConfig, InteractiveViewer, ViewerConfig, run_gpu_viewer};

fn main() {
    env_logger::try_init().ok();

    // Check for command line arguments
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--interactive") => run_interactive(),
        Some("--gpu") => run_gpu(),
        Some("--benchmark") => run_benchmark(),
        Some("--snapshot") => {
            let filename = args.get(2).map(String::as_str).unwrap_or("torchlight.ppm");
            run_snapshot(filename);
        }
        _ => {
            println!("Torchlight");
            println!("Run with --interactive for minifb viewer");
            println!("Run with --gpu for the wgpu viewer");
            println!("Run with --benchmark to test performance");
            println!("Run with --snapshot [file.ppm] to render the demo scene");
        }
    }
}

/// Fixed scene used by the benchmark and snapshot: a room of walls,
/// two mirrors, a filter pane and some solid shapes.
fn demo_scene() -> Vec<Box<dyn Obstacle>> {
    vec![
        Box::new(SolidLine::from_coords(40.0, 40.0, 760.0, 40.0)),
        Box::new(SolidLine::from_coords(40.0, 560.0, 760.0, 560.0)),
        Box::new(SolidLine::from_coords(760.0, 40.0, 760.0, 560.0)),
        Box::new(ReflectLine::from_coords(600.0, 120.0, 700.0, 260.0)),
        Box::new(ReflectLine::with_filter(
            DVec2::new(560.0, 480.0),
            DVec2::new(700.0, 380.0),
            RayColor::RED | RayColor::BLUE,
        )),
        Box::new(FilterLine::with_filter(DVec2::new(420.0, 200.0), DVec2::new(440.0, 420.0), RayColor::GREEN)),
        Box::new(SolidRect::from_size(300.0, 120.0, 60.0, 40.0)),
        Box::new(SolidCircle::new(DVec2::new(340.0, 420.0), 30.0)),
    ]
}

fn demo_torch(mode: CastMode) -> LightTree {
    LightTree::aimed_at(DVec2::new(200.0, 300.0), DVec2::new(650.0, 300.0), 90f64.to_radians(), RayColor::WHITE)
        .with_mode(mode)
}

fn run_benchmark() {
    use std::time::Instant;

    println!("=== Light Cast Benchmark ===\n");

    let obstacles = demo_scene();
    let iterations = 200;

    for fov in [45.0f64, 90.0, 180.0, 360.0] {
        println!("Field of view: {} deg, {} obstacles", fov, obstacles.len());
        println!("-----------------------");

        let mut timings = Vec::new();
        for mode in [CastMode::Sequential, CastMode::Parallel] {
            let mut tree = demo_torch(mode);
            tree.set_direction(0.0, fov.to_radians());

            let start = Instant::now();
            for _ in 0..iterations {
                tree.cast(&obstacles);
            }
            let avg_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;
            timings.push(avg_ms);

            println!(
                "  {:<10} {:.3} ms/cast ({} sectors, depth {})",
                format!("{:?}:", mode),
                avg_ms,
                tree.len(),
                tree.max_depth()
            );
        }

        println!("  Speedup: {:.2}x", timings[0] / timings[1]);
        println!();
    }

    // Render cost on top of a cast
    let mut tree = demo_torch(CastMode::Parallel);
    tree.cast(&obstacles);
    let mut canvas = Canvas::new(800, 600);

    let start = Instant::now();
    for _ in 0..iterations / 10 {
        canvas.clear();
        tree.render(&mut canvas);
    }
    let avg_render_ms = start.elapsed().as_secs_f64() * 1000.0 / (iterations / 10) as f64;

    println!("=== Software Render (800x600) ===");
    println!("  {:.3} ms/frame", avg_render_ms);
    println!("  Estimated max FPS: {:.1}", 1000.0 / avg_render_ms);
}

fn run_snapshot(filename: &str) {
    let obstacles = demo_scene();
    let mut tree = demo_torch(CastMode::Parallel);
    tree.cast(&obstacles);

    let mut canvas = Canvas::new(800, 600);
    tree.render(&mut canvas);
    for obstacle in &obstacles {
        obstacle.render(&mut canvas);
    }

    match canvas.save_ppm(filename) {
        Ok(()) => println!("Saved {} ({} sectors)", filename, tree.len()),
        Err(e) => eprintln!("Failed to save {}: {}", filename, e),
    }
}

fn run_interactive() {
    let config = ViewerConfig::default();

    match InteractiveViewer::new(config) {
        Ok(mut viewer) => {
            if let Err(e) = viewer.run() {
                eprintln!("Error: {}", e);
            }
        }
        Err(e) => {
            eprintln!("Failed to create viewer: {}", e);
        }
    }
}

fn run_gpu() {
    if let Err(e) = run_gpu_viewer(GpuViewerConfig::default()) {
        eprintln!("Error: {}", e);
    }
}
