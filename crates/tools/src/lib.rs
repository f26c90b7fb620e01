//! Offline rendering helpers behind the `globe` binary.

use std::fs;
use std::path::{Path, PathBuf};

use formats::WorldDataset;
use foundation::time::Timestamp;
use globe::{Globe, GlobeConfig};
use layers::Surface;
use serde::Serialize;

/// One rendered tick, as listed in `render.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFrame {
    pub time_ms: f64,
    pub spin: f64,
    pub tilt: f64,
    pub file: String,
    /// blake3 of the straight-alpha RGBA8 pixels.
    pub blake3: String,
    pub layers: Vec<RenderedLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLayer {
    pub role: String,
    pub file: String,
    pub blake3: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderReport {
    pub width: u32,
    pub height: u32,
    pub frame_height: u32,
    pub frames: Vec<RenderedFrame>,
}

pub struct RenderOptions {
    pub out_dir: PathBuf,
    pub times: Vec<f64>,
    pub write_layers: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<GlobeConfig, String> {
    match path {
        None => Ok(GlobeConfig::default()),
        Some(p) => {
            let text = fs::read_to_string(p).map_err(|e| format!("read {p:?}: {e}"))?;
            GlobeConfig::from_json_str(&text).map_err(|e| format!("{p:?}: {e}"))
        }
    }
}

pub fn load_dataset(path: &Path) -> Result<WorldDataset, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    WorldDataset::from_json_str(&text).map_err(|e| format!("{path:?}: {e}"))
}

/// Renders the globe at each time (ms after start) and writes PNGs plus a
/// `render.json` report into `opts.out_dir`.
pub fn render(
    config: GlobeConfig,
    dataset: WorldDataset,
    opts: &RenderOptions,
) -> Result<RenderReport, String> {
    fs::create_dir_all(&opts.out_dir).map_err(|e| format!("create {:?}: {e}", opts.out_dir))?;

    let mut globe = Globe::setup(config, Timestamp::ZERO).map_err(|e| e.to_string())?;
    globe.dataset_loaded(Ok(dataset)).map_err(|e| e.to_string())?;

    let mut frames = Vec::with_capacity(opts.times.len());
    for &t in &opts.times {
        globe.tick(Timestamp(t)).map_err(|e| e.to_string())?;
        let rotation = globe.projection().rotation();

        let stem = frame_stem(t);
        let file = format!("{stem}.png");
        let digest = write_png(&globe.composite(), &opts.out_dir.join(&file))?;

        let mut layers = Vec::new();
        if opts.write_layers {
            for layer in globe.layers().iter() {
                let role = layer.role.name();
                let file = format!("{stem}_{role}.png");
                let digest = write_png(&layer.rendered(), &opts.out_dir.join(&file))?;
                layers.push(RenderedLayer {
                    role: role.to_string(),
                    file,
                    blake3: digest,
                });
            }
        }

        tracing::info!(time_ms = t, spin = rotation.spin, file = %file, "rendered frame");
        frames.push(RenderedFrame {
            time_ms: t,
            spin: rotation.spin,
            tilt: rotation.tilt,
            file,
            blake3: digest,
            layers,
        });
    }

    let report = RenderReport {
        width: globe.config().width,
        height: globe.config().height,
        frame_height: globe.frame_height(),
        frames,
    };
    let json = serde_json::to_vec_pretty(&report).map_err(|e| format!("encode report: {e}"))?;
    let report_path = opts.out_dir.join("render.json");
    fs::write(&report_path, json).map_err(|e| format!("write {report_path:?}: {e}"))?;
    Ok(report)
}

/// Lists what a dataset holds and whether its land collection resolves.
pub fn describe_dataset(dataset: &WorldDataset, land_object: &str) -> String {
    let mut out = String::new();
    let names = dataset.object_names();
    if names.is_empty() {
        out.push_str("bare GeoJSON object\n");
    } else {
        out.push_str(&format!("objects: {}\n", names.join(", ")));
    }
    match dataset.extract(land_object) {
        Ok(land) => out.push_str(&format!(
            "{land_object}: {} polygons, {} vertices\n",
            land.polygons().len(),
            land.geometry().vertex_count()
        )),
        Err(e) => out.push_str(&format!("{land_object}: {e}\n")),
    }
    out
}

fn write_png(surface: &Surface, path: &Path) -> Result<String, String> {
    let rgba = surface.to_rgba8();
    let digest = to_hex(blake3::hash(&rgba).as_bytes());
    let (width, height) = (surface.width(), surface.height());
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| format!("pixel buffer does not match {width}x{height}"))?;
    img.save(path).map_err(|e| format!("write {path:?}: {e}"))?;
    Ok(digest)
}

fn frame_stem(t: f64) -> String {
    format!("frame_{:08}", t.max(0.0).round() as u64)
}

pub fn to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}
