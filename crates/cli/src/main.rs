//! Corrozone CLI - coastal corrosion distance zones

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use corrozone_algorithms::vector::{area, bounding_box, length, BoundingBox};
use corrozone_algorithms::zones::{derive_zones, ZoneParams};
use corrozone_colormap::{styled_features, MapView, ZonePalette, DEFAULT_ZOOM};
use corrozone_core::io::{
    export, load_boundary, load_features, write_feature_collection, ExportFormat,
};
use corrozone_core::{BandSet, Boundary, FeatureCollection, ZoneCollection, CRS};
use geo_types::Geometry;

const ZONES_STEM: &str = "zonas_corrosao";
const STYLED_FILE: &str = "zonas_corrosao_styled.geojson";
const MAP_VIEW_FILE: &str = "map_view.json";

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "corrozone")]
#[command(author, version, about = "Coastal corrosion distance zones", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive distance zones from a coastline and write them to a directory
    Zones {
        /// Coastline GeoJSON file
        coastline: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
        /// Boundary GeoJSON file; zones are clipped to it
        #[arg(short, long)]
        boundary: Option<PathBuf>,
        /// Keep only boundary features with this attribute, e.g. SIGLA_UF=AL
        #[arg(long, requires = "boundary")]
        boundary_filter: Option<String>,
        /// JSON file with [{"label", "inner", "outer"}, ...] in metres
        #[arg(long)]
        bands: Option<PathBuf>,
        /// EPSG code of the projected CRS used for buffering
        #[arg(long, default_value = "32724")]
        metric_epsg: u32,
        /// EPSG code of the written zones (must be geographic)
        #[arg(long, default_value = "4326")]
        output_epsg: u32,
        /// Edges per quarter circle of every buffer
        #[arg(long, default_value = "16")]
        quadrant_segments: usize,
        /// Initial zoom of the map view
        #[arg(long, default_value_t = DEFAULT_ZOOM)]
        zoom: u8,
    },
    /// Show the band table in effect
    Bands {
        /// JSON band file (default: corrosion classes C5-C2)
        #[arg(long)]
        bands: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show information about a GeoJSON file
    Info {
        /// Input GeoJSON file
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn read_bands(path: Option<&Path>) -> Result<BandSet> {
    match path {
        None => Ok(BandSet::corrosion_default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read band file {}", path.display()))?;
            BandSet::from_json(&text)
                .with_context(|| format!("Invalid band file {}", path.display()))
        }
    }
}

fn parse_filter(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => anyhow::bail!("Boundary filter must be KEY=VALUE, got: {}", s),
    }
}

fn read_coastline(path: &Path) -> Result<FeatureCollection> {
    let pb = spinner("Reading coastline...")?;
    let features = load_features(path).context("Failed to read coastline")?;
    pb.finish_and_clear();
    info!("Coastline: {} feature(s) in {}", features.len(), features.crs());
    Ok(features)
}

fn read_boundary(path: Option<&Path>, filter: Option<&str>) -> Result<Boundary> {
    let Some(path) = path else {
        return Ok(Boundary::Unbounded);
    };
    let filter = filter.map(parse_filter).transpose()?;
    let pb = spinner("Reading boundary...")?;
    let boundary = load_boundary(
        path,
        filter.as_ref().map(|(k, v)| (k.as_str(), v.as_str())),
    )
    .context("Failed to read boundary")?;
    pb.finish_and_clear();
    Ok(boundary)
}

fn print_summary(zones: &ZoneCollection, bands: &BandSet, metric_crs: &CRS) -> Result<()> {
    let metric = zones
        .reproject(metric_crs)
        .context("Failed to reproject zones for the summary")?;
    println!("\n{:<20} {:>12} {:>7} {:>12}", "Zone", "Range (m)", "Parts", "Area (km²)");
    for band in bands.iter() {
        println!(
            "{:<20} {:>12} {:>7} {:>12.2}",
            band.label(),
            format!("{}-{}", band.inner(), band.outer()),
            metric.count_for(band.label()),
            metric.area_for(band.label()) / 1e6
        );
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Zones ────────────────────────────────────────────────────
        Commands::Zones {
            coastline,
            output,
            boundary,
            boundary_filter,
            bands,
            metric_epsg,
            output_epsg,
            quadrant_segments,
            zoom,
        } => {
            let output_crs = CRS::from_epsg(output_epsg);
            if !output_crs.is_geographic() {
                anyhow::bail!(
                    "Output CRS {} is not geographic; GeoJSON and KML need longitude/latitude",
                    output_crs
                );
            }
            let params = ZoneParams {
                bands: read_bands(bands.as_deref())?,
                metric_crs: CRS::from_epsg(metric_epsg),
                output_crs: output_crs.clone(),
                quadrant_segments,
            };
            params.validate().context("Invalid zone parameters")?;

            let coast = read_coastline(&coastline)?;
            let region = read_boundary(boundary.as_deref(), boundary_filter.as_deref())?;

            let pb = spinner("Building zones...")?;
            let start = Instant::now();
            let zones =
                derive_zones(&coast, &region, &params).context("Failed to derive zones")?;
            pb.finish_and_clear();
            let elapsed = start.elapsed();

            std::fs::create_dir_all(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;

            let mut written = Vec::with_capacity(ExportFormat::ALL.len());
            for format in ExportFormat::ALL {
                let path = output.join(format!("{}.{}", ZONES_STEM, format.extension()));
                export(&zones, &output_crs, &path, format)
                    .with_context(|| format!("Failed to write {} zones", format))?;
                written.push((format, path));
            }

            let palette = ZonePalette::for_bands(&params.bands, &[]);
            let styled_path = output.join(STYLED_FILE);
            write_feature_collection(styled_features(&zones, &palette), zones.crs(), &styled_path)
                .context("Failed to write styled zones")?;

            let view = MapView::from_zones(&zones, &params.bands, &palette, zoom)
                .context("Failed to build map view")?;
            let view_path = output.join(MAP_VIEW_FILE);
            std::fs::write(&view_path, view.to_json()?)
                .with_context(|| format!("Failed to write {}", view_path.display()))?;

            println!("Processing time: {:.2?}", elapsed);
            for (format, path) in &written {
                println!("{} zones saved to: {}", format, path.display());
            }
            println!("Styled zones saved to: {}", styled_path.display());
            println!("Map view saved to: {}", view_path.display());
            print_summary(&zones, &params.bands, &params.metric_crs)?;
        }

        // ── Bands ────────────────────────────────────────────────────
        Commands::Bands { bands, json } => {
            let bands = read_bands(bands.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bands)?);
            } else {
                println!("{:<20} {:>10} {:>10}", "Label", "Inner (m)", "Outer (m)");
                for band in bands.iter() {
                    println!("{:<20} {:>10} {:>10}", band.label(), band.inner(), band.outer());
                }
                if !bands.is_ordered() {
                    println!("\nWarning: bands are not in increasing distance order");
                }
            }
        }

        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let features = load_features(&input).context("Failed to read input")?;

            let mut kinds: BTreeMap<&'static str, usize> = BTreeMap::new();
            let mut extent: Option<BoundingBox> = None;
            let mut total_length = 0.0;
            let mut total_area = 0.0;
            let mut null_count = 0;
            for feature in features.iter() {
                let Some(geometry) = &feature.geometry else {
                    null_count += 1;
                    continue;
                };
                *kinds.entry(geometry_kind(geometry)).or_default() += 1;
                total_length += length(geometry);
                total_area += area(geometry);
                if let Some(bb) = bounding_box(geometry) {
                    extent = Some(match extent {
                        None => bb,
                        Some(e) => e.extend(&bb),
                    });
                }
            }

            let crs = features.crs();
            let units = if crs.is_geographic() { "degrees" } else { "CRS units" };
            println!("File: {}", input.display());
            println!("Features: {}", features.len());
            println!("CRS: {} ({:?})", crs, crs.kind());
            println!("Geometry types:");
            for (kind, count) in &kinds {
                println!("  {}: {}", kind, count);
            }
            if null_count > 0 {
                println!("  null: {}", null_count);
            }
            if let Some(e) = extent {
                println!(
                    "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                    e.min_x, e.min_y, e.max_x, e.max_y
                );
            }
            println!("Total length: {:.4} {}", total_length, units);
            println!("Total area: {:.4} {}²", total_area, units);
        }
    }

    Ok(())
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
