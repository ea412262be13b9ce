use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "enframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a photo beneath a frame and write a JPEG.
    Compose(ComposeArgs),
    /// List the frames available in a frames directory.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input photo path.
    #[arg(long)]
    photo: PathBuf,

    /// Frame image path (raster or SVG).
    #[arg(long, conflicts_with_all = ["frames_dir", "frame_id"])]
    frame: Option<PathBuf>,

    /// Frames directory to resolve --frame-id against.
    #[arg(long, requires = "frame_id")]
    frames_dir: Option<PathBuf>,

    /// Frame identifier inside --frames-dir.
    #[arg(long, requires = "frames_dir")]
    frame_id: Option<String>,

    /// Placement mode.
    #[arg(long, value_enum, default_value_t = ModeChoice::Crop)]
    mode: ModeChoice,

    /// Uniform scale factor (free mode).
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Clockwise rotation in degrees (free mode).
    #[arg(long, default_value_t = 0.0)]
    rotate: f64,

    /// Horizontal offset in pixels from the centered position (free mode).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_x: i32,

    /// Vertical offset in pixels from the centered position (free mode).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_y: i32,

    /// Flatten background as RRGGBB hex.
    #[arg(long, default_value = "000000")]
    background: String,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 85)]
    quality: u8,

    /// Output JPEG path. When omitted the result goes into --results-dir.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Result store directory used when --out is not given.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Frames directory to list.
    #[arg(long)]
    frames_dir: PathBuf,

    /// Emit the listing as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    /// Center-crop the photo to a square and stretch it to the frame.
    Crop,
    /// Resize to the frame, then apply scale/rotate/offset.
    Free,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let photo_bytes = fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;
    let photo = enframe::decode::decode_rgba8(&photo_bytes, "photo")?;
    let frame = load_frame(&args)?;

    let mode = match args.mode {
        ModeChoice::Crop => enframe::ComposeMode::CenterCrop,
        ModeChoice::Free => enframe::ComposeMode::Freeform(enframe::Transform {
            scale: args.scale,
            rotation_degrees: args.rotate,
            offset_x: args.offset_x,
            offset_y: args.offset_y,
        }),
    };
    let opts = enframe::ComposeOptions {
        background: parse_background(&args.background)?,
        jpeg_quality: args.quality,
    };

    let canvas = enframe::compose_rgba(&photo, &frame, &mode)?;
    let encoded = enframe::finish_jpeg(&canvas, &opts)?;

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("create output dir '{}'", parent.display()))?;
                }
            }
            fs::write(out, &encoded)
                .with_context(|| format!("write jpeg '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let store = enframe::ResultStore::open(&args.results_dir)?;
            let id = store.put(&encoded)?;
            let path = store.path_for(&id.to_string())?;
            println!("{id}");
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn load_frame(args: &ComposeArgs) -> anyhow::Result<image::RgbaImage> {
    if let Some(path) = &args.frame {
        let bytes =
            fs::read(path).with_context(|| format!("read frame '{}'", path.display()))?;
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        let frame = if is_svg {
            enframe::rasterize_svg(&bytes, &enframe::RasterOptions::default())?
        } else {
            enframe::decode::decode_rgba8(&bytes, "frame")?
        };
        return Ok(frame);
    }

    match (&args.frames_dir, &args.frame_id) {
        (Some(dir), Some(id)) => {
            let library = enframe::FrameLibrary::open(dir)?;
            Ok(library.load(id)?)
        }
        _ => anyhow::bail!("either --frame or --frames-dir with --frame-id is required"),
    }
}

fn parse_background(hex: &str) -> anyhow::Result<[u8; 3]> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("background must be 6 hex digits (RRGGBB), got '{hex}'");
    }
    let channel = |range: std::ops::Range<usize>| -> anyhow::Result<u8> {
        u8::from_str_radix(&hex[range], 16).context("parse background channel")
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let library = enframe::FrameLibrary::open(&args.frames_dir)?;
    let entries = library.list()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let kind = match entry.kind {
            enframe::FrameKind::Raster => "raster",
            enframe::FrameKind::Vector => "vector",
        };
        println!("{}\t{kind}", entry.id);
    }
    Ok(())
}
