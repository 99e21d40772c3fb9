//! Example: snap a synthetic stack of hand-drawn cortical layers.
//!
//! Builds `--layers` wavy bands between a curved pia and white-matter surface.
//! Neighboring bands overlap on one side of the section and leave a gap on the
//! other, the way hand tracings usually do. The stack is snapped at
//! `--working-scale` and a per-boundary summary is printed; the full result
//! goes to a JSON file.
//!
//! Run from the workspace root:
//!   cargo run -p layer-snap --example synthetic_cortex -- --help
//!   cargo run -p layer-snap --example synthetic_cortex -- --layers 6

use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use layer_snap::{Geometries, PIA, Point2, SnapConfig, WM, snap_polygons};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Snap a synthetic stack of overlapping cortical layers")]
struct Args {
    /// Number of layers between pia and white matter
    #[arg(long, default_value_t = 6)]
    layers: usize,

    /// Section width in world units
    #[arg(long, default_value_t = 200.0)]
    width: f64,

    /// Cortical thickness in world units
    #[arg(long, default_value_t = 60.0)]
    thickness: f64,

    /// Working pixels per world unit
    #[arg(long, default_value_t = 4.0)]
    working_scale: f64,

    /// Output JSON path
    #[arg(long, default_value = "synthetic_cortex.json")]
    out: String,
}

#[derive(Serialize)]
struct BoundaryDto {
    upper: String,
    lower: String,
    length: f64,
    points: Vec<[f64; 2]>,
}

#[derive(Serialize)]
struct LayerDto {
    name: String,
    area: f64,
    parts: usize,
}

#[derive(Serialize)]
struct Report {
    elapsed_ms: f64,
    contested_pixels: usize,
    layers: Vec<LayerDto>,
    boundaries: Vec<BoundaryDto>,
    diagnostics: Vec<String>,
}

/// Depth of the pia surface below y = 0 at `x`.
fn pia_depth(x: f64, width: f64) -> f64 {
    4.0 * (x / width * std::f64::consts::PI).sin()
}

/// Tracing error of boundary `k` at `x`: positive on the left, negative on the
/// right, so neighbors overlap on one side and leave a gap on the other.
fn tracing_error(k: usize, x: f64, width: f64) -> f64 {
    let phase = k as f64 * 0.7;
    1.2 * (1.0 - 2.0 * x / width) + 0.4 * (x / width * 9.0 + phase).sin()
}

fn build(args: &Args) -> Result<(Geometries, Vec<String>)> {
    let samples = 64;
    let xs: Vec<f64> = (0..=samples)
        .map(|i| args.width * i as f64 / samples as f64)
        .collect();
    let band = args.thickness / args.layers as f64;
    // Nominal depth of boundary k (0 = pia, layers = wm) at x.
    let depth = |k: usize, x: f64| pia_depth(x, args.width) + band * k as f64;

    let mut raw = Geometries::new();
    let mut order = Vec::with_capacity(args.layers);
    let mut batch = Vec::with_capacity(args.layers);
    for layer in 0..args.layers {
        let name = format!("L{}", layer + 1);
        let top = |x: f64| {
            let d = depth(layer, x);
            if layer == 0 { d - 1.0 } else { d - tracing_error(layer, x, args.width) }
        };
        let bottom = |x: f64| {
            let d = depth(layer + 1, x);
            if layer + 1 == args.layers { d + 1.0 } else { d + tracing_error(layer + 1, x, args.width) }
        };

        let mut path: Vec<Point2> = xs.iter().map(|&x| Point2::new(x, top(x))).collect();
        path.extend(xs.iter().rev().map(|&x| Point2::new(x, bottom(x))));
        batch.push((name.clone(), path));
        order.push(name);
    }
    raw.register_polygons(batch).context("registering layers")?;

    let pia: Vec<Point2> = xs.iter().map(|&x| Point2::new(x, depth(0, x))).collect();
    let wm: Vec<Point2> = xs
        .iter()
        .map(|&x| Point2::new(x, depth(args.layers, x)))
        .collect();
    raw.register_surfaces([(PIA, pia), (WM, wm)])
        .context("registering surfaces")?;
    Ok((raw, order))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();
    if args.layers == 0 {
        bail!("--layers must be at least 1");
    }

    let (raw, order) = build(&args)?;
    let config = SnapConfig::with_scale(args.working_scale);

    let t0 = Instant::now();
    let result = snap_polygons(&raw, &order, &config, None).context("snapping layers")?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    println!(
        "snapped {} layers at scale {} in {elapsed_ms:.2} ms ({} contested pixels)",
        args.layers, args.working_scale, result.contested_pixels
    );
    for b in &result.boundaries {
        println!(
            "  {:>4} / {:<4} {:>4} points, length {:.2}",
            b.upper,
            b.lower,
            b.path.len(),
            b.path.length()
        );
    }

    let report = Report {
        elapsed_ms,
        contested_pixels: result.contested_pixels,
        layers: result
            .geometries
            .polygons()
            .map(|(name, area)| LayerDto {
                name: name.to_owned(),
                area: area.area(),
                parts: area.num_parts(),
            })
            .collect(),
        boundaries: result
            .boundaries
            .iter()
            .map(|b| BoundaryDto {
                upper: b.upper.clone(),
                lower: b.lower.clone(),
                length: b.path.length(),
                points: b.path.points.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect(),
        diagnostics: result.diagnostics.iter().map(ToString::to_string).collect(),
    };

    let out_file =
        std::fs::File::create(&args.out).with_context(|| format!("creating {}", args.out))?;
    serde_json::to_writer_pretty(out_file, &report)
        .with_context(|| format!("writing JSON to {}", args.out))?;
    println!("results written to {}", args.out);
    Ok(())
}
