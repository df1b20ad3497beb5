// File: crates/logview-demo/src/main.rs
// Summary: Demo loads well curves (CSV manifest or synthetic), builds a linked correlation panel and renders PNGs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use logview_core::renderer::SharedRenderer;
use logview_core::{
    BindingData, ChartError, ChartView, ContainerSize, CorrelationPanel, CurveSpec, DataSource, Gesture,
    LinkGroupRegistry, MemorySource, PixelPoint, PresentationConfig, RenderBinding, RendererEvent, Sample,
    SegmentedSeries, WellSpec, TRACK_INSETS,
};
use logview_render_skia::SkiaRasterRenderer;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// LAS-style null marker.
const NULL_VALUE: f64 = -999.25;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default = "default_track_width")]
    track_width: f32,
    #[serde(default = "default_track_height")]
    track_height: f32,
    wells: Vec<WellEntry>,
}

#[derive(Debug, Deserialize)]
struct WellEntry {
    id: String,
    name: String,
    #[serde(default)]
    tops: Vec<logview_core::WellTop>,
    curves: Vec<CurveEntry>,
}

#[derive(Debug, Deserialize)]
struct CurveEntry {
    curve_id: String,
    csv: PathBuf,
    #[serde(default)]
    mnemonic: Option<String>,
    #[serde(default)]
    unit: String,
}

fn default_track_width() -> f32 { 180.0 }
fn default_track_height() -> f32 { 720.0 }

/// Curves backed by two-column `depth,value` CSV files. Read on demand.
struct CsvSource {
    files: HashMap<String, (PathBuf, String, String)>,
}

impl CsvSource {
    fn from_manifest(manifest: &Manifest, base: &Path) -> Self {
        let mut files = HashMap::new();
        for c in manifest.wells.iter().flat_map(|w| &w.curves) {
            let mnemonic = c.mnemonic.clone().unwrap_or_else(|| c.curve_id.clone());
            files.insert(c.curve_id.clone(), (base.join(&c.csv), mnemonic, c.unit.clone()));
        }
        Self { files }
    }
}

impl DataSource for CsvSource {
    fn load_segmented_series(&self, curve_id: &str) -> logview_core::Result<SegmentedSeries> {
        let wrap = |source: anyhow::Error| ChartError::DataSource { curve_id: curve_id.to_string(), source };
        let (path, mnemonic, unit) = self.files.get(curve_id).ok_or_else(|| wrap(anyhow!("not in manifest")))?;
        let samples = load_curve_csv(path).map_err(wrap)?;
        Ok(SegmentedSeries::from_samples(curve_id, mnemonic.as_str(), unit.as_str(), &samples))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let out_dir = PathBuf::from("target/out");
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    match std::env::args().nth(1) {
        Some(raw) => {
            let path = PathBuf::from(raw);
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            let manifest: Manifest =
                serde_json::from_str(&text).with_context(|| format!("parsing manifest {}", path.display()))?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let source = CsvSource::from_manifest(&manifest, &base);
            let wells = manifest
                .wells
                .iter()
                .map(|w| {
                    let mut well = WellSpec::new(w.id.as_str(), w.name.as_str());
                    well.tops = w.tops.clone();
                    w.curves.iter().fold(well, |s, c| s.curve(CurveSpec::new(c.curve_id.as_str())))
                })
                .collect();
            run_panel(wells, &source, manifest.track_width, manifest.track_height, &out_dir)?;
        }
        None => {
            info!("no manifest given, using synthetic wells");
            let source = synthetic_source();
            let wells = vec![
                WellSpec::new("w1", "Alpha-1")
                    .curve(CurveSpec::new("w1-gr"))
                    .curve(CurveSpec::new("w1-rhob"))
                    .top("Top Sand", 1_420.0)
                    .top("Base Sand", 1_610.0),
                WellSpec::new("w2", "Alpha-2")
                    .curve(CurveSpec::new("w2-gr"))
                    .top("Top Sand", 1_465.0)
                    .top("Base Sand", 1_655.0),
            ];
            run_panel(wells, &source, default_track_width(), default_track_height(), &out_dir)?;
            run_crossplot(&source, &out_dir)?;
        }
    }
    Ok(())
}

fn run_panel(wells: Vec<WellSpec>, source: &dyn DataSource, track_width: f32, track_height: f32, out_dir: &Path) -> Result<()> {
    let mut registry = LinkGroupRegistry::new();
    let raster = Rc::new(RefCell::new(SkiaRasterRenderer::new().with_insets(TRACK_INSETS)));
    let shared: SharedRenderer = raster.clone();

    let mut panel = CorrelationPanel::new("correlation", &registry, shared, track_width, track_height);
    for well in wells {
        let id = well.id.clone();
        let tracks = panel.add_well(well, source, &mut registry);
        if tracks == 0 {
            warn!(well = %id, "no curves could be loaded");
        }
    }
    if panel.track_count() == 0 {
        anyhow::bail!("nothing to draw: no curves loaded");
    }

    let mut now = Instant::now();
    panel.frame(now);
    let full = out_dir.join("correlation_full.png");
    raster.borrow().render_panel_png(&panel, &full)?;
    info!(path = %full.display(), range = ?panel.visible_range(), "wrote panel");

    // Zoom in on the first track at mid-height, then move the pointer there.
    let first = panel.layout().into_iter().next().map(|slot| slot.chart_id);
    if let Some(chart_id) = first {
        let mid = PixelPoint::new(track_width / 2.0, track_height / 2.0);
        registry.handle_renderer_event(&chart_id, RendererEvent::Gesture(Gesture::Zoom { at: mid, factor: 0.4 }));
        registry.handle_renderer_event(&chart_id, RendererEvent::PointerMove(mid));
    }
    now += Duration::from_millis(16);
    panel.frame(now);
    let zoomed = out_dir.join("correlation_zoomed.png");
    raster.borrow().render_panel_png(&panel, &zoomed)?;
    info!(path = %zoomed.display(), range = ?panel.visible_range(), cursor = ?panel.cursor_depth(), "wrote zoomed panel");

    panel.dispose(&mut registry);
    Ok(())
}

fn run_crossplot(source: &dyn DataSource, out_dir: &Path) -> Result<()> {
    let data = BindingData::Crossplot {
        x: source.load_segmented_series("w1-rhob")?,
        y: source.load_segmented_series("w1-gr")?,
        color: Some(source.load_segmented_series("w1-gr")?),
    };
    let raster = Rc::new(RefCell::new(SkiaRasterRenderer::new()));
    let shared: SharedRenderer = raster.clone();
    let binding = RenderBinding::new(PresentationConfig::crossplot(true)).with_data(data);
    let mut view = ChartView::new("crossplot", binding, shared, ContainerSize::new(480.0, 480.0));
    view.frame(Instant::now())?;
    let handle = view.handle().ok_or_else(|| anyhow!("crossplot was not built"))?;
    let out = out_dir.join("crossplot.png");
    raster.borrow().render_png(handle, &out)?;
    info!(path = %out.display(), "wrote crossplot");
    Ok(())
}

/// Read `depth,value` rows. Empty, unparsable and `-999.25` values become nulls.
fn load_curve_csv(path: &Path) -> Result<Vec<Sample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("{}: row {}", path.display(), row + 1))?;
        let Some(depth) = rec.get(0).and_then(|s| s.parse::<f64>().ok()) else {
            warn!(path = %path.display(), row = row + 1, "skipping row without depth");
            continue;
        };
        let value = rec
            .get(1)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && (*v - NULL_VALUE).abs() > 1e-9);
        out.push(Sample::new(depth, value));
    }
    Ok(out)
}

fn synthetic_source() -> MemorySource {
    let gr = |id: &str, start: f64, shift: f64, gap: (usize, usize)| {
        let samples: Vec<Sample> = (0..8_000)
            .map(|i| {
                let d = start + i as f64 * 0.1524;
                let sand = if (1_420.0 + shift..1_610.0 + shift).contains(&d) { -45.0 } else { 0.0 };
                let v = 85.0 + sand + (i as f64 * 0.03).sin() * 12.0 + (i as f64 * 0.71).sin() * 4.0;
                Sample::new(d, if i >= gap.0 && i < gap.1 { None } else { Some(v) })
            })
            .collect();
        SegmentedSeries::from_samples(id, "GR", "gAPI", &samples)
    };
    let rhob: Vec<Sample> = (0..8_000)
        .map(|i| Sample::new(1_000.0 + i as f64 * 0.1524, Some(2.4 + (i as f64 * 0.05).cos() * 0.15)))
        .collect();
    MemorySource::new()
        .with(gr("w1-gr", 1_000.0, 0.0, (3_000, 3_400)))
        .with(gr("w2-gr", 1_050.0, 45.0, (5_200, 5_260)))
        .with(SegmentedSeries::from_samples("w1-rhob", "RHOB", "g/cc", &rhob))
}
