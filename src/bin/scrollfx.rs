use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scrollfx::{LabelPainter, Scene, SceneConfig};

#[derive(Parser, Debug)]
#[command(name = "scrollfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the frame sequence at one document progress and write a PNG.
    Frame(FrameArgs),
    /// Write one PNG per evenly spaced progress step.
    Scrub(ScrubArgs),
    /// Run the scene timeline (or one scroll position) and print snapshots as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Scene JSON. Frame paths resolve relative to its directory.
    #[arg(long)]
    scene: PathBuf,

    /// TTF/OTF font for placeholder labels, replacing the bundled DejaVu Sans.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seconds to wait for frame loads.
    #[arg(long, default_value_t = 30.0)]
    load_timeout: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Whole-document progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Number of progress steps, including both ends.
    #[arg(long, default_value_t = 24)]
    steps: u32,

    /// Output directory for `step_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Scroll here and print a single snapshot instead of running the timeline.
    #[arg(long)]
    scroll_y: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn assets_root(scene: &Path) -> &Path {
    scene.parent().unwrap_or_else(|| Path::new("."))
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<Scene> {
    let config = SceneConfig::from_path(&args.scene)?;
    if config.sequence.is_none() {
        anyhow::bail!("scene '{}' has no frame sequence", args.scene.display());
    }
    let mut scene = Scene::new(&config, assets_root(&args.scene))?;
    if let Some(font) = &args.font {
        let labels = LabelPainter::from_path(font)
            .with_context(|| format!("load label font '{}'", font.display()))?;
        scene.set_label_painter(labels);
    }

    let timeout = Duration::try_from_secs_f64(args.load_timeout.max(0.0))
        .context("invalid --load-timeout")?;
    if !scene.wait_for_frames(timeout)? {
        tracing::warn!("frame loads still pending after timeout, drawing placeholders");
    }
    Ok(scene)
}

fn write_frame(scene: &Scene, out: &Path) -> anyhow::Result<()> {
    let frame = scene
        .frame()
        .context("scene has no frame surface to read back")?;
    frame
        .save_png(out)
        .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.scene)?;
    scene.scroll_to_progress(args.progress)?;
    write_frame(&scene, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    if args.steps == 0 {
        anyhow::bail!("--steps must be > 0");
    }
    let mut scene = load_scene(&args.scene)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let denom = f64::from(args.steps.saturating_sub(1).max(1));
    for step in 0..args.steps {
        let progress = f64::from(step) / denom;
        scene.scroll_to_progress(progress)?;
        let out = args.out_dir.join(format!("step_{step:04}.png"));
        write_frame(&scene, &out)?;
    }
    eprintln!(
        "wrote {} frames to {}",
        args.steps,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = SceneConfig::from_path(&args.scene)?;
    let mut scene = Scene::new(&config, assets_root(&args.scene))?;

    let json = match args.scroll_y {
        Some(y) => {
            scene.scroll_to(y)?;
            serde_json::to_string_pretty(&scene.snapshot()?)?
        }
        None => serde_json::to_string_pretty(&scene.run_timeline()?)?,
    };
    println!("{json}");
    Ok(())
}
