use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::{Rgb, RgbImage};
use layer_snap::{
    Diagnostic, Error as SnapError, Geometries, Image, ImageOutputter, ImageRecord, OverlapPolicy,
    PIA, PixelGrid, Point2, SnapConfig, SnapResult, WM, check_inputs, make_scale_transform,
    rasterize_rings, snap_polygons,
};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Upper bound on rendered image pixels.
const MAX_IMAGE_PIXELS: usize = 1 << 26;

#[derive(Parser, Debug)]
#[command(name = "layer_snap")]
#[command(about = "Snap cortical layer polygons between the pia and white-matter surfaces")]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and write the snapped geometry as JSON
    #[command(name = "snap")]
    Snap(SnapArgs),
    /// Validate an input file without rasterizing anything
    #[command(name = "check")]
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct SnapArgs {
    #[arg(long)]
    input: PathBuf,
    /// Output JSON path; printed to stdout when absent
    #[arg(long)]
    output: Option<PathBuf>,
    /// Overrides the input file's working scale
    #[arg(long)]
    working_scale: Option<f64>,
    #[arg(long, value_enum, default_value_t = PolicyArg::ClearAll)]
    overlap_policy: PolicyArg,
    #[arg(long)]
    max_raster_pixels: Option<usize>,
    /// Directory for before.png / after.png; overrides the input file's `images.dir`
    #[arg(long)]
    images: Option<PathBuf>,
    /// Image pixels per world unit [default: 1]; overrides `images.scale`
    #[arg(long)]
    image_scale: Option<f64>,
}

#[derive(Args, Debug, Clone)]
struct CheckArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    working_scale: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyArg {
    ClearAll,
    Priority,
}

impl From<PolicyArg> for OverlapPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::ClearAll => OverlapPolicy::ClearAll,
            PolicyArg::Priority => OverlapPolicy::Priority,
        }
    }
}

type Xy = [f64; 2];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedPathDto {
    name: String,
    path: Vec<Xy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurfaceDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    path: Vec<Xy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InputDto {
    layer_polygons: Vec<NamedPathDto>,
    pia_surface: SurfaceDto,
    wm_surface: SurfaceDto,
    #[serde(default)]
    layer_order: Vec<String>,
    #[serde(default = "default_working_scale")]
    working_scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<ImagesDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImagesDto {
    dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale: Option<f64>,
}

fn default_working_scale() -> f64 {
    SnapConfig::default().working_scale
}

#[derive(Debug, Clone, Serialize)]
struct PartDto {
    exterior: Vec<Xy>,
    holes: Vec<Vec<Xy>>,
}

#[derive(Debug, Clone, Serialize)]
struct PolygonDto {
    name: String,
    parts: Vec<PartDto>,
}

#[derive(Debug, Clone, Serialize)]
struct BoundaryDto {
    upper: String,
    lower: String,
    path: Vec<Xy>,
}

#[derive(Debug, Clone, Serialize)]
struct DiagnosticDto {
    kind: &'static str,
    layers: Vec<String>,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct ImageDto {
    name: String,
    path: String,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Serialize)]
struct OutputDto<'a> {
    polygons: Vec<PolygonDto>,
    surfaces: Vec<NamedPathDto>,
    boundaries: Vec<BoundaryDto>,
    diagnostics: Vec<DiagnosticDto>,
    images: Vec<ImageDto>,
    contested_pixels: usize,
    inputs: &'a InputDto,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Snap(args) => run_snap(args),
        Command::Check(args) => run_check(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run_snap(args: SnapArgs) -> Result<()> {
    let input: InputDto = read_json(&args.input)?;
    let raw = build_geometries(&input)?;
    let mut config = SnapConfig {
        working_scale: args.working_scale.unwrap_or(input.working_scale),
        overlap_policy: args.overlap_policy.into(),
        ..SnapConfig::default()
    };
    if let Some(max) = args.max_raster_pixels {
        config.max_raster_pixels = max;
    }

    let mut png = match image_settings(&args, &input) {
        Some((dir, scale)) => Some(PngOutputter::new(dir, scale)?),
        None => None,
    };
    let result = snap_polygons(
        &raw,
        &input.layer_order,
        &config,
        png.as_mut().map(|o| o as &mut dyn ImageOutputter),
    )
    .with_context(|| format!("snapping {}", args.input.display()))?;

    let output = output_dto(&result, &input);
    match &args.output {
        Some(path) => {
            write_json(path, &output)?;
            log::info!("results written to {}", path.display());
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&output).context("serializing results")?
        ),
    }
    Ok(())
}

/// Image directory and scale. Flags win over the input file.
fn image_settings(args: &SnapArgs, input: &InputDto) -> Option<(PathBuf, f64)> {
    let from_input = input.images.as_ref();
    let dir = args
        .images
        .clone()
        .or_else(|| from_input.map(|i| i.dir.clone()))?;
    let scale = args
        .image_scale
        .or_else(|| from_input.and_then(|i| i.scale))
        .unwrap_or(1.0);
    Some((dir, scale))
}

fn run_check(args: CheckArgs) -> Result<()> {
    let input: InputDto = read_json(&args.input)?;
    let raw = build_geometries(&input)?;
    let config = SnapConfig::with_scale(args.working_scale.unwrap_or(input.working_scale));
    let plan = check_inputs(&raw, &input.layer_order, &config)
        .with_context(|| format!("checking {}", args.input.display()))?;

    println!(
        "{}: ok, {} layers ({} ordered), working scale {}",
        args.input.display(),
        plan.ranks.len(),
        plan.order.len(),
        config.working_scale
    );
    Ok(())
}

fn build_geometries(input: &InputDto) -> Result<Geometries> {
    let mut raw = Geometries::new();
    raw.register_polygons(
        input
            .layer_polygons
            .iter()
            .map(|l| (l.name.clone(), to_points(&l.path))),
    )
    .context("registering layer polygons")?;
    raw.register_surfaces([
        (PIA, to_points(&input.pia_surface.path)),
        (WM, to_points(&input.wm_surface.path)),
    ])
    .context("registering pia/wm surfaces")?;
    Ok(raw)
}

fn to_points(path: &[Xy]) -> Vec<Point2> {
    path.iter().map(|&[x, y]| Point2::new(x, y)).collect()
}

fn to_xy(points: &[Point2]) -> Vec<Xy> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn output_dto<'a>(result: &SnapResult, input: &'a InputDto) -> OutputDto<'a> {
    let polygons = result
        .geometries
        .polygons()
        .map(|(name, area)| PolygonDto {
            name: name.to_owned(),
            parts: area
                .parts()
                .iter()
                .map(|p| PartDto {
                    exterior: to_xy(&p.exterior.points),
                    holes: p.holes.iter().map(|h| to_xy(&h.points)).collect(),
                })
                .collect(),
        })
        .collect();

    let surfaces = result
        .geometries
        .surfaces()
        .map(|(name, curve)| NamedPathDto {
            name: name.to_owned(),
            path: to_xy(&curve.points),
        })
        .collect();

    let boundaries = result
        .boundaries
        .iter()
        .map(|b| BoundaryDto {
            upper: b.upper.clone(),
            lower: b.lower.clone(),
            path: to_xy(&b.path.points),
        })
        .collect();

    let diagnostics = result
        .diagnostics
        .iter()
        .map(|d| DiagnosticDto {
            kind: diagnostic_kind(d),
            layers: d.layers().into_iter().map(str::to_owned).collect(),
            message: d.to_string(),
        })
        .collect();

    let images = result
        .images
        .iter()
        .map(|r| ImageDto {
            name: r.name.clone(),
            path: r.path.clone(),
            width: r.width,
            height: r.height,
        })
        .collect();

    OutputDto {
        polygons,
        surfaces,
        boundaries,
        diagnostics,
        images,
        contested_pixels: result.contested_pixels,
        inputs: input,
    }
}

fn diagnostic_kind(d: &Diagnostic) -> &'static str {
    match d {
        Diagnostic::SelfIntersectingLayer { .. } => "SelfIntersectingLayer",
        Diagnostic::EmptyLayer { .. } => "EmptyLayer",
        Diagnostic::FragmentedLayer { .. } => "FragmentedLayer",
        Diagnostic::FragmentedBoundary { .. } => "FragmentedBoundary",
        Diagnostic::DetachedSurface { .. } => "DetachedSurface",
    }
}

/// Writes `before.png` (input rasters, contested pixels highlighted) and
/// `after.png` (snapped layers with their side surfaces) on a shared grid.
struct PngOutputter {
    dir: PathBuf,
    scale: f64,
}

const BACKGROUND_COLOR: Rgb<u8> = Rgb([24, 24, 24]);
const CONTESTED_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const SURFACE_COLOR: Rgb<u8> = Rgb([255, 64, 64]);
const PALETTE: [[u8; 3]; 8] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [188, 189, 34],
    [23, 190, 207],
];

impl PngOutputter {
    fn new(dir: PathBuf, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            bail!("image scale must be positive and finite, got {scale}");
        }
        Ok(Self { dir, scale })
    }

    fn save(&self, img: &RgbImage, name: &str) -> Result<ImageRecord, SnapError> {
        let path = self.dir.join(format!("{name}.png"));
        img.save(&path)
            .map_err(|e| SnapError::ImageOutput(format!("{}: {e}", path.display())))?;
        log::debug!("wrote {}", path.display());
        Ok(ImageRecord {
            name: name.to_owned(),
            path: path.display().to_string(),
            width: img.width(),
            height: img.height(),
        })
    }
}

impl ImageOutputter for PngOutputter {
    fn write_images(&mut self, raw: &Geometries, snapped: &Geometries) -> Result<Vec<ImageRecord>, SnapError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| SnapError::ImageOutput(format!("{}: {e}", self.dir.display())))?;
        let to_image = make_scale_transform(self.scale);

        let raw = raw.transform(to_image);
        let before = raw.rasterize(MAX_IMAGE_PIXELS)?;
        let grid = before.grid;

        let mut img = canvas(&grid);
        for (i, plane) in before.planes.iter().enumerate() {
            paint_mask(&mut img, plane, layer_color(i));
        }
        let claims = before.claim_counts();
        paint_mask(&mut img, &claims.map(|&c| c > 1), CONTESTED_COLOR);
        for (_, curve) in raw.surfaces() {
            draw_polyline(&mut img, &grid, &curve.points, SURFACE_COLOR);
        }
        let mut records = vec![self.save(&img, "before")?];

        let snapped = snapped.transform(to_image);
        let mut img = canvas(&grid);
        for (i, (_, area)) in snapped.polygons().enumerate() {
            paint_mask(&mut img, &rasterize_rings(area.rings(), &grid), layer_color(i));
        }
        for (_, curve) in snapped.surfaces() {
            draw_polyline(&mut img, &grid, &curve.points, SURFACE_COLOR);
        }
        records.push(self.save(&img, "after")?);

        Ok(records)
    }
}

fn layer_color(i: usize) -> Rgb<u8> {
    Rgb(PALETTE[i % PALETTE.len()])
}

fn canvas(grid: &PixelGrid) -> RgbImage {
    RgbImage::from_pixel(grid.width as u32, grid.height as u32, BACKGROUND_COLOR)
}

fn paint_mask(img: &mut RgbImage, mask: &Image<bool>, color: Rgb<u8>) {
    let width = mask.width();
    for (i, _) in mask.data().iter().enumerate().filter(|(_, set)| **set) {
        img.put_pixel((i % width) as u32, (i / width) as u32, color);
    }
}

fn draw_polyline(img: &mut RgbImage, grid: &PixelGrid, points: &[Point2], color: Rgb<u8>) {
    for seg in points.windows(2) {
        let (a, b) = (grid.to_local(seg[0]), grid.to_local(seg[1]));
        let steps = (a.distance(b) * 2.0).ceil().max(1.0) as usize;
        for s in 0..=steps {
            let p = a.lerp(b, s as f64 / steps as f64);
            put_clamped(img, p.x.floor(), p.y.floor(), color);
        }
    }
}

fn put_clamped(img: &mut RgbImage, x: f64, y: f64, color: Rgb<u8>) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }
    let x = x.clamp(0.0, (img.width() - 1) as f64) as u32;
    let y = y.clamp(0.0, (img.height() - 1) as f64) as u32;
    img.put_pixel(x, y, color);
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let data = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}
