use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context as _};
use clap::{ArgAction, Parser, Subcommand};

use crumple_engine::config::EngineConfig;
use crumple_engine::coords::{Rect, Vec2, Viewport};
use crumple_engine::lens::Lens;
use crumple_engine::logging::{init_logging, LoggingConfig};
use crumple_engine::raster::Rasterizer;
use crumple_engine::warp::screen_to_source;
use crumple_ui::{Surface, SurfaceId};

#[derive(Parser, Debug)]
#[command(name = "crumple", version, about = "Lens-warp a still image from the command line")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Warp an image through a lens field and write a PNG.
    Render(RenderArgs),
    /// Print the source coordinate a screen point forwards to.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct LensArgs {
    /// Engine configuration JSON. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Uniform pre-warp zoom in (0, 1].
    #[arg(long)]
    base_scale: Option<f32>,

    /// Lens as `x,y,sigma_px,strength` with x, y in [0,1] (top-left origin).
    /// Repeat for more lenses; later lenses act on earlier ones' output.
    #[arg(long = "lens")]
    lenses: Vec<LensSpec>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image.
    #[arg(long = "input")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long = "output")]
    out: PathBuf,

    /// Logical output size `WxH`. Defaults to the image size over the scale factor.
    #[arg(long)]
    size: Option<Size>,

    /// Device pixel ratio of the output.
    #[arg(long, default_value_t = 1.0)]
    scale_factor: f32,

    /// Multiply the frame by the reveal mask.
    #[arg(long, default_value_t = false)]
    reveal: bool,

    /// Reveal mask softness.
    #[arg(long)]
    softness: Option<f32>,

    #[command(flatten)]
    lens: LensArgs,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Logical surface size `WxH`.
    #[arg(long)]
    size: Size,

    /// Source size in device-independent pixels `WxH`. Defaults to the surface size.
    #[arg(long)]
    source_size: Option<Size>,

    /// Screen point `X,Y` in logical pixels. Repeatable.
    #[arg(long = "point", required = true)]
    points: Vec<Point>,

    #[command(flatten)]
    lens: LensArgs,
}

// ── argument types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Size {
    w: f32,
    h: f32,
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WxH, got '{s}'"))?;
        let w: f32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
        let h: f32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
        if !(w > 0.0 && h > 0.0) {
            return Err(format!("size must be positive, got '{s}'"));
        }
        Ok(Size { w, h })
    }
}

#[derive(Debug, Clone, Copy)]
struct Point(Vec2);

impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_floats(s)?.as_slice() {
            [x, y] => Ok(Point(Vec2::new(*x, *y))),
            _ => Err(format!("expected X,Y, got '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LensSpec {
    center: Vec2,
    sigma_px: f32,
    strength: f32,
}

impl FromStr for LensSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_floats(s)?.as_slice() {
            [x, y, sigma_px, strength] => Ok(LensSpec {
                center: Vec2::new(*x, *y),
                sigma_px: *sigma_px,
                strength: *strength,
            }),
            _ => Err(format!("expected x,y,sigma_px,strength, got '{s}'")),
        }
    }
}

fn parse_floats(s: &str) -> Result<Vec<f32>, String> {
    s.split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("bad number '{part}': {e}")))
        .collect()
}

// ── commands ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => EngineConfig::default(),
    };
    config.validate().context("invalid engine configuration")?;
    Ok(config)
}

/// Builds a surface carrying the lenses and base scale from `args`.
fn build_surface(args: &LensArgs, viewport: Viewport) -> anyhow::Result<Surface> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(base_scale) = args.base_scale {
        config.base_scale = base_scale;
    }
    if args.lenses.len() > config.lens_capacity {
        log::warn!(
            "{} lenses given, capacity {}: the oldest will be evicted",
            args.lenses.len(),
            config.lens_capacity
        );
    }

    let mut surface = Surface::new(SurfaceId(1), config, viewport).context("create surface")?;
    for spec in &args.lenses {
        let sigma = viewport.normalize_len(spec.sigma_px);
        surface.add_lens(Lens::new(spec.center, sigma, spec.strength));
    }
    Ok(surface)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let source = image::open(&args.in_path)
        .with_context(|| format!("decode image '{}'", args.in_path.display()))?
        .to_rgba8();

    let size = args.size.unwrap_or(Size {
        w: source.width() as f32 / args.scale_factor,
        h: source.height() as f32 / args.scale_factor,
    });
    let viewport = Viewport::with_scale_factor(size.w, size.h, args.scale_factor);
    if !viewport.is_valid() {
        bail!("invalid output size {}x{} @ {}x", size.w, size.h, args.scale_factor);
    }

    let mut surface = build_surface(&args.lens, viewport)?;
    surface.set_image(source, 1.0);
    surface.set_reveal(args.reveal);
    if let Some(softness) = args.softness {
        surface.set_softness(softness);
    }

    let rasterizer = Rasterizer::new(surface.config().max_raster_lenses);
    let frame = surface.render(&rasterizer).context("rasterize frame")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    log::info!("{}", surface.status());
    eprintln!("wrote {} ({}x{})", args.out.display(), frame.width(), frame.height());
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let viewport = Viewport::new(args.size.w, args.size.h);
    let surface = build_surface(&args.lens, viewport)?;
    let source = args.source_size.unwrap_or(args.size);
    let source_box = Rect::from_size(source.w, source.h);
    let warp = surface.warp();

    for Point(pos) in &args.points {
        let mapped = screen_to_source(*pos, viewport, &warp, source_box);
        let line = serde_json::json!({
            "screen": [pos.x, pos.y],
            "source": [mapped.x, mapped.y],
        });
        println!("{line}");
    }
    Ok(())
}
