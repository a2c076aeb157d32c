use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sha2::Digest as _;
use slidecast::{
    FfmpegAssembler, LayoutPolicy, SlideRenderer, SlidecastConfig, VideoAssembler, parse_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slidecast", version)]
struct Cli {
    /// JSON config file (canvas, layout, fonts, video).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured layout policy.
    #[arg(long, global = true, value_enum)]
    layout: Option<LayoutChoice>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a markup file and print the slides as JSON.
    Parse(ParseArgs),
    /// Render every slide of a markup file to `slide_NNN.png`.
    Render(RenderArgs),
    /// Render a markup file and assemble an MP4 slideshow (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Print which fonts the rasterizer resolved (family, weight, SHA-256 of font bytes).
    Fonts,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input markup file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input markup file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for slide images.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Input markup file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Where to keep the rendered slides (defaults to `<out stem>_slides` next to the video).
    #[arg(long)]
    frames_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    Structured,
    Wrapped,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref(), cli.layout)?;
    match cli.cmd {
        Command::Parse(args) => cmd_parse(args),
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Video(args) => cmd_video(&cfg, args),
        Command::Fonts => cmd_fonts(&cfg),
    }
}

fn load_config(
    path: Option<&Path>,
    layout: Option<LayoutChoice>,
) -> anyhow::Result<SlidecastConfig> {
    let mut cfg = match path {
        Some(p) => SlidecastConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => SlidecastConfig::default(),
    };
    match (layout, cfg.layout) {
        (Some(LayoutChoice::Structured), _) => cfg.layout = LayoutPolicy::Structured,
        (Some(LayoutChoice::Wrapped), LayoutPolicy::Structured) => {
            cfg.layout = LayoutPolicy::wrapped();
        }
        _ => {}
    }
    Ok(cfg)
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let slides = parse_file(&args.in_path)?;
    let json = serde_json::to_string_pretty(&slides).context("serialize slides")?;
    println!("{json}");
    Ok(())
}

fn cmd_render(cfg: &SlidecastConfig, args: RenderArgs) -> anyhow::Result<()> {
    let slides = parse_file(&args.in_path)?;
    let renderer = SlideRenderer::from_config(cfg)?;
    let paths = renderer.render_all(&slides, &args.out_dir)?;
    for p in &paths {
        println!("{}", p.display());
    }
    eprintln!("wrote {} slide(s) to {}", paths.len(), args.out_dir.display());
    Ok(())
}

fn cmd_video(cfg: &SlidecastConfig, args: VideoArgs) -> anyhow::Result<()> {
    let slides = parse_file(&args.in_path)?;
    let frames_dir = args
        .frames_dir
        .clone()
        .unwrap_or_else(|| default_frames_dir(&args.out));

    let renderer = SlideRenderer::from_config(cfg)?;
    let paths = renderer.render_all(&slides, &frames_dir)?;

    let mut assembler = FfmpegAssembler::new(cfg.video.clone());
    let out = assembler.assemble(&paths, &args.out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn default_frames_dir(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_owned());
    out.with_file_name(format!("{stem}_slides"))
}

fn cmd_fonts(cfg: &SlidecastConfig) -> anyhow::Result<()> {
    let renderer = SlideRenderer::from_config(cfg)?;
    let db = renderer.rasterizer().fontdb();
    let fonts = renderer.rasterizer().fonts();

    println!("font faces: {}", db.len());
    println!("provider:   {}", fonts.provider);
    for (role, font) in [("title", &fonts.title), ("body", &fonts.body)] {
        let sha = font
            .face
            .and_then(|id| db.with_face_data(id, |data, _index| sha256_hex(data)))
            .unwrap_or_else(|| "-".to_owned());
        println!("{role}:");
        println!("  family: {}", font.family);
        println!("  weight: {}", font.weight);
        println!("  sha256: {sha}");
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
