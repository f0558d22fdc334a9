use clap::{Parser, Subcommand};
use glam::Vec2;
use glint_anim::{Animation, PlayMode};
use glint_assets::{ResourceStore, TextureDesc};
use glint_common::{Color, Rect, TexRegion};
use glint_cull::BruteForceCulling;
use glint_render::{
    AnimatedSprite, Compositor, ObjectDesc, RecordingBackend, RectShape, Sprite,
};
use glint_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glint-cli", about = "CLI tool for glint scene operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run a headless scene and print per-frame statistics
    Demo {
        /// Number of frames to render
        #[arg(short, long, default_value = "10")]
        frames: u32,
        /// Grid side length; the scene holds side^2 sprites
        #[arg(short, long, default_value = "8")]
        side: u32,
        /// Use brute-force culling instead of zone culling
        #[arg(long)]
        brute: bool,
    },
    /// Build the demo scene and run consistency checks on it
    Validate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("glint-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", glint_render::crate_info());
            println!("cull: {}", glint_cull::crate_info());
            println!("anim: {}", glint_anim::crate_info());
            println!("assets: {}", glint_assets::crate_info());
            println!("input: {}", glint_input::crate_info());
            println!("tools: {}", glint_tools::crate_info());
        }
        Commands::Demo { frames, side, brute } => {
            println!("Headless demo: {frames} frames, {} sprites", side * side);
            let mut compositor = demo_scene(side);
            if brute {
                compositor.set_culling(Box::new(BruteForceCulling::new()));
                println!("Culling: brute force");
            }

            let dt = 1.0 / 60.0;
            for frame in 0..frames {
                // Pan right so the visible set changes across frames.
                compositor.camera_mut().translate(Vec2::new(40.0, 0.0));
                let summary = compositor.render(dt)?;
                println!("frame {frame:>3}: {summary}");
            }
            compositor.dispose()?;
            println!("Scene disposed");
        }
        Commands::Validate => {
            let compositor = demo_scene(4);
            let findings = SceneInspector::validate(&compositor);
            println!("{}", SceneInspector::summary(&compositor));
            if findings.is_empty() {
                println!("No findings");
            } else {
                for finding in &findings {
                    println!("finding: {finding}");
                }
            }
        }
    }

    Ok(())
}

/// A grid of sprites with a shape layer above and an animated sprite on top,
/// mirroring a typical layered game scene.
fn demo_scene(side: u32) -> Compositor {
    let mut store = ResourceStore::new();
    let tiles = store.register_texture(TextureDesc {
        name: "tiles".into(),
        width: 256,
        height: 256,
    });
    let walker = store.register_texture(TextureDesc {
        name: "walker".into(),
        width: 128,
        height: 32,
    });

    let mut compositor = Compositor::new(800.0, 600.0, Box::new(RecordingBackend::new()));
    compositor.background_mut().set_color(Color::rgb(0.1, 0.1, 0.15));

    for i in 0..side {
        for j in 0..side {
            let sprite = Sprite::new(tiles, TexRegion::new(0, 0, 32, 32))
                .with_transparency((i + j) % 3 == 0);
            let bounds = Rect::new(i as f32 * 48.0, j as f32 * 48.0, 32.0, 32.0);
            compositor.add(ObjectDesc::sprite(sprite, bounds));
        }
    }

    compositor.add_to(
        1,
        ObjectDesc::shape(
            RectShape::new(Color::rgba(1.0, 0.2, 0.2, 0.5)),
            Rect::new(60.0, 60.0, 120.0, 40.0),
        ),
    );

    let strip = Animation::new(
        (0..4).map(|i| TexRegion::new(i * 32, 0, 32, 32)).collect(),
        0.2,
        PlayMode::Loop,
    );
    compositor.add_to(
        2,
        ObjectDesc::sprite(
            AnimatedSprite::new(walker, strip).with_transparency(true),
            Rect::new(100.0, 100.0, 32.0, 32.0),
        )
        .with_listener(),
    );

    compositor
}
