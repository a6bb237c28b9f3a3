// External crates
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};
use raylib::prelude::*;

// STD library
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

// Internal imports
use rusterizer::camera::Camera;
use rusterizer::obj;
use rusterizer::pipeline::{DrawStats, render_scene};
use rusterizer::point3d::Point3D;
use rusterizer::scene::{Scene, SceneObject};
use rusterizer::screen::ScreenSpace;
use rusterizer::settings::{DebugView, RenderSettings};
use rusterizer::transform::Transform;
use rusterizer::triangle::Mesh;

#[derive(Parser, Debug)]
#[command(name = "rusterizer", about = "Real-time software triangle rasterizer")]
struct Args {
    /// Render width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,
    /// Render height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Wavefront OBJ to draw. A textured quad is drawn without one.
    #[arg(long)]
    obj: Option<PathBuf>,
    /// Image applied to the mesh
    #[arg(long)]
    texture: Option<PathBuf>,
    /// Texture weight against vertex colour, 0..1
    #[arg(long)]
    mix: Option<f32>,
    /// Distance from the camera to the object
    #[arg(long, default_value_t = 3.0)]
    distance: f32,
    /// Uniform object scale
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
    /// Yaw added to the object every frame, in radians
    #[arg(long, default_value_t = 0.01)]
    spin: f32,
    /// Give every triangle a random flat colour
    #[arg(long)]
    random_colours: bool,
    /// Start with the wireframe overlay on
    #[arg(long)]
    wireframe: bool,
    /// Render this many frames without a window, save the last one and exit
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
    /// Where screenshots and headless frames are written
    #[arg(long, default_value = "screenshot.bmp")]
    screenshot: PathBuf,
    /// error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(level: &str) -> Result<()> {
    let filter = LevelFilter::from_str(level).map_err(|_| anyhow!("unknown log level '{level}'"))?;
    log::set_logger(&LOGGER).map_err(|e| anyhow!("installing logger: {e}"))?;
    log::set_max_level(filter);
    Ok(())
}

fn build_scene(args: &Args) -> Result<Scene> {
    let mut scene = Scene::new();
    let texture_index = match &args.texture {
        Some(path) => scene.load_texture(path),
        // Slot with nothing in it samples the placeholder
        None => 0,
    };

    let mut mesh = match &args.obj {
        Some(path) => obj::load_mesh(path, texture_index).with_context(|| format!("loading mesh {}", path.display()))?,
        None => Mesh::quad(1.0, texture_index),
    };
    if args.random_colours {
        obj::randomise_colours(&mut mesh.triangles);
    }

    let mut object = SceneObject::new(mesh, Transform::new(0.0, 0.0, Point3D::new(0.0, 0.0, args.distance)));
    object.scale = args.scale;
    scene.add_object(object);
    log::info!("scene ready: {} triangles", scene.triangle_count());
    Ok(scene)
}

fn build_settings(args: &Args) -> RenderSettings {
    let default_mix = if args.random_colours { 0.0 } else { 1.0 };
    RenderSettings { wireframe: args.wireframe, ..Default::default() }.with_mix_factor(args.mix.unwrap_or(default_mix))
}

fn spin(scene: &mut Scene, amount: f32) {
    for object in &mut scene.objects {
        let t = object.transform;
        object.transform.update_transform(t.yaw + amount, t.pitch, t.position);
    }
}

fn run_headless(args: &Args, mut scene: Scene, settings: &RenderSettings, frames: u32) -> Result<()> {
    let mut screen = ScreenSpace::new(args.width, args.height);
    let cam = Camera::default();
    let view = cam.view_params(args.width, args.height);
    let frames = frames.max(1);
    let start = Instant::now();
    let mut stats = DrawStats::default();
    for _ in 0..frames {
        spin(&mut scene, args.spin);
        stats = render_scene(&mut screen, &scene, &view, settings);
    }
    log::info!("rendered {frames} frames in {:.2?}, last frame: {stats:?}", start.elapsed());
    screen.write_bmp(&args.screenshot)?;
    log::info!("saved {}", args.screenshot.display());
    Ok(())
}

fn run_window(args: &Args, mut scene: Scene, mut settings: RenderSettings) -> Result<()> {
    let (width, height) = (args.width, args.height);
    let mut screen = ScreenSpace::new(width, height);
    let image = Image::gen_image_color(width as i32, height as i32, Color::BLACK);

    // Create raylib handle
    let (mut r1, thread) = raylib::init()
        .size(width as i32, height as i32)
        .title("Rusterizer")
        .resizable()
        .build();
    r1.set_target_fps(240);
    r1.set_exit_key(None);
    let mut texture = r1
        .load_texture_from_image(&thread, &image)
        .map_err(|e| anyhow!("raylib texture creation failed: {e}"))?;

    let mut cam = Camera::default();

    while !r1.window_should_close() {
        if r1.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            break;
        }
        if r1.is_key_pressed(KeyboardKey::KEY_ONE) {
            settings.view = DebugView::Shaded;
        }
        if r1.is_key_pressed(KeyboardKey::KEY_TWO) {
            settings.view = DebugView::Depth;
        }
        if r1.is_key_pressed(KeyboardKey::KEY_THREE) {
            settings.view = DebugView::Normals;
        }
        if r1.is_key_pressed(KeyboardKey::KEY_F) {
            settings.wireframe = !settings.wireframe;
        }

        cam.camera_update(&r1);

        let frame_start = Instant::now();
        spin(&mut scene, args.spin);
        let stats = render_scene(&mut screen, &scene, &cam.view_params(width, height), &settings);
        let frame_time = frame_start.elapsed();

        if r1.is_key_pressed(KeyboardKey::KEY_P) {
            match screen.write_bmp(&args.screenshot) {
                Ok(()) => log::info!("saved {}", args.screenshot.display()),
                Err(e) => log::warn!("screenshot failed: {e:#}"),
            }
        }

        // Put it in a window!
        if let Err(e) = texture.update_texture(&screen.rgba) {
            log::warn!("frame upload failed: {e}");
        }
        let window_width = r1.get_screen_width();
        let window_height = r1.get_screen_height();

        let mut d = r1.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_pro(
            &texture,
            Rectangle { x: 0.0, y: 0.0, width: width as f32, height: height as f32 },
            Rectangle { x: 0.0, y: 0.0, width: window_width as f32, height: window_height as f32 },
            Vector2 { x: 0.0, y: 0.0 },
            0.0,
            Color::WHITE,
        );
        // Perf stats
        d.draw_text(
            &format!(
                "Frame time: {:.2?}\nTriangles: {} drawn, {} culled, {} clipped\nView: {:?}",
                frame_time, stats.rasterized, stats.culled, stats.clipped_away, settings.view
            ),
            10,
            10,
            20,
            Color::LIME,
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let scene = build_scene(&args)?;
    let settings = build_settings(&args);

    match args.headless {
        Some(frames) => run_headless(&args, scene, &settings, frames),
        None => run_window(&args, scene, settings),
    }
}
