use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use sha2::Digest as _;

use motionchart::{
    Chart, ChartError, ChartResult, ChartSurface, FoldedLabels, Fps, FrameRGBA, ManualClock,
    NestedPie, OrbitMap, RadialFan, RingBars, SurfaceConfig, charts::datasets,
};

#[derive(Parser, Debug)]
#[command(name = "motionchart", version)]
struct Cli {
    /// Log animation and repaint events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one or more datasets in order and write every animation frame as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Chart to draw.
    #[arg(long, value_enum)]
    chart: ChartChoice,

    /// Dataset JSON files, rendered one after another on the same surface.
    #[arg(long, required = true, num_args = 1..)]
    data: Vec<PathBuf>,

    /// Configuration JSON: `{ "surface": {...}, "chart": {...} }`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second used to sample the animation.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Upper bound on frames per dataset.
    #[arg(long, default_value_t = 10_000)]
    max_frames: u64,

    /// Print the SHA-256 of every frame's straight-alpha pixels.
    #[arg(long)]
    digest: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartChoice {
    FoldedLabels,
    NestedPie,
    RadialFan,
    RingBars,
    OrbitMap,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    surface: SurfaceConfig,
    chart: serde_json::Value,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg: ConfigFile = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse config '{}'", path.display()))?;
    Ok(cfg)
}

fn chart_options<T: Default + serde::de::DeserializeOwned>(
    value: &serde_json::Value,
) -> anyhow::Result<T> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value.clone()).with_context(|| "parse chart options")
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let frames = match args.chart {
        ChartChoice::FoldedLabels => drive(
            FoldedLabels::new(chart_options(&cfg.chart)?),
            datasets::pairs,
            cfg.surface,
            &args,
        )?,
        ChartChoice::NestedPie => drive(
            NestedPie::new(chart_options(&cfg.chart)?),
            datasets::triples,
            cfg.surface,
            &args,
        )?,
        ChartChoice::RadialFan => drive(
            RadialFan::new(chart_options(&cfg.chart)?),
            datasets::pairs,
            cfg.surface,
            &args,
        )?,
        ChartChoice::RingBars => drive(
            RingBars::new(chart_options(&cfg.chart)?),
            datasets::pairs,
            cfg.surface,
            &args,
        )?,
        ChartChoice::OrbitMap => drive(
            OrbitMap::new(chart_options(&cfg.chart)?),
            datasets::pairs,
            cfg.surface,
            &args,
        )?,
    };

    eprintln!("wrote {frames} frames to {}", args.out.display());
    Ok(())
}

fn drive<C: Chart>(
    chart: C,
    parse: fn(&serde_json::Value) -> ChartResult<Vec<C::Datum>>,
    surface: SurfaceConfig,
    args: &RenderArgs,
) -> anyhow::Result<u64> {
    let clock = ManualClock::new();
    let mut surface = ChartSurface::with_clock(chart, surface, clock.clone())?;
    let fps = Fps::new(args.fps, 1)?;

    let mut written = 0u64;
    for path in &args.data {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read dataset '{}'", path.display()))?;
        let value = datasets::from_json_str(&text)
            .with_context(|| format!("parse dataset '{}'", path.display()))?;
        surface
            .render(parse(&value)?)
            .with_context(|| format!("render dataset '{}'", path.display()))?;

        surface.run_until_idle(&clock, fps, args.max_frames, |_, frame| {
            write_frame(&args.out, written, frame, args.digest).map_err(ChartError::from)?;
            written += 1;
            Ok(())
        })?;
    }
    Ok(written)
}

fn write_frame(dir: &Path, index: u64, frame: &FrameRGBA, digest: bool) -> anyhow::Result<()> {
    let name = format!("frame_{index:05}.png");
    let path = dir.join(&name);
    let pixels = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        &path,
        &pixels,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    if digest {
        println!("{name} {}", sha256_hex(&pixels));
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
