use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use formats::geojson;
use framing::{FilterSpec, FramingRequest, PanelSize, frame};
use symbology::palette::parse_hex;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "frame" => cmd_frame(args),
        _ => Err(usage()),
    }
}

fn cmd_frame(args: Vec<String>) -> Result<(), String> {
    // carta frame <input.geojson> [--attribute NAME --values A,B,...]
    //   [--label-attribute NAME] [--panel WxH] [--buffer F]
    //   [--out-working PATH] [--out-wgs84 PATH]
    if args.is_empty() {
        return Err(usage());
    }

    let input = PathBuf::from(&args[0]);
    let mut attribute: Option<String> = None;
    let mut values: Vec<String> = Vec::new();
    let mut label_attribute: Option<String> = None;
    let mut panel = PanelSize::default();
    let mut buffer: Option<f64> = None;
    let mut out_working: Option<PathBuf> = None;
    let mut out_wgs84: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--attribute" => attribute = Some(take_value(&args, &mut i)?),
            "--values" => {
                values = take_value(&args, &mut i)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "--label-attribute" => label_attribute = Some(take_value(&args, &mut i)?),
            "--panel" => panel = parse_panel(&take_value(&args, &mut i)?)?,
            "--buffer" => {
                buffer = Some(
                    take_value(&args, &mut i)?
                        .parse::<f64>()
                        .map_err(|e| format!("--buffer: {e}"))?,
                );
            }
            "--out-working" => out_working = Some(PathBuf::from(take_value(&args, &mut i)?)),
            "--out-wgs84" => out_wgs84 = Some(PathBuf::from(take_value(&args, &mut i)?)),
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
        i += 1;
    }

    let payload = fs::read_to_string(&input).map_err(|e| format!("read {input:?}: {e}"))?;
    let collection = geojson::from_geojson_str(&payload).map_err(|e| format!("parse: {e}"))?;
    info!(features = collection.len(), "dataset loaded");

    let mut request = FramingRequest {
        filter: attribute.map(|attribute| FilterSpec { attribute, values }),
        label_attribute,
        panel,
        ..FramingRequest::default()
    };
    if let Some(buffer) = buffer {
        request.scale.safety_buffer = buffer;
    }

    let report = frame(&collection, &request).map_err(|e| format!("framing: {e}"))?;

    if let Some(path) = out_working {
        write_geojson(&path, &report.working)?;
    }
    if let Some(path) = out_wgs84 {
        write_geojson(&path, &report.geographic)?;
    }

    let legend: Vec<_> = report
        .colors
        .entries()
        .iter()
        .map(|(value, hex)| {
            json!({
                "value": value,
                "color": hex,
                "rgba": parse_hex(hex),
            })
        })
        .collect();
    let labels: Vec<_> = report
        .labels
        .iter()
        .map(|l| {
            json!({
                "feature_id": l.feature_id,
                "text": l.text,
                "anchor": l.anchor,
                "area_m2": l.area_m2,
                "font_size_pt": l.class.font_size_pt,
                "padding": l.class.padding,
            })
        })
        .collect();

    let summary = json!({
        "source_crs": report.source_crs.to_string(),
        "features": report.working.len(),
        "filter_fell_back": report.filter_fell_back,
        "extent": {
            "min": report.extent.min,
            "max": report.extent.max,
        },
        "scale": report.scale,
        "viewport": report.viewport,
        "legend": legend,
        "labels": labels,
        "warnings": report.diagnostics.warnings,
    });
    let out = serde_json::to_string_pretty(&summary).map_err(|e| format!("encode: {e}"))?;
    println!("{out}");
    Ok(())
}

fn take_value(args: &[String], i: &mut usize) -> Result<String, String> {
    let flag = args[*i].clone();
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// `22x18` in centimeters.
fn parse_panel(raw: &str) -> Result<PanelSize, String> {
    let (w, h) = raw
        .split_once('x')
        .ok_or_else(|| format!("--panel expects WxH in cm, got {raw}"))?;
    let width_cm: f64 = w.parse().map_err(|e| format!("--panel width: {e}"))?;
    let height_cm: f64 = h.parse().map_err(|e| format!("--panel height: {e}"))?;
    if width_cm <= 0.0 || height_cm <= 0.0 {
        return Err("--panel dimensions must be positive".to_string());
    }
    Ok(PanelSize::new(width_cm, height_cm))
}

fn write_geojson(path: &PathBuf, collection: &formats::FeatureCollection) -> Result<(), String> {
    let value = geojson::to_geojson_value(collection);
    let payload = serde_json::to_string_pretty(&value).map_err(|e| format!("encode: {e}"))?;
    fs::write(path, payload).map_err(|e| format!("write {path:?}: {e}"))?;
    Ok(())
}

fn usage() -> String {
    [
        "carta — cartographic framing report generator",
        "",
        "usage:",
        "  carta frame <input.geojson> [options]",
        "",
        "options:",
        "  --attribute NAME        filter attribute column",
        "  --values A,B,...        accepted attribute values",
        "  --label-attribute NAME  attribute providing label text",
        "  --panel WxH             map panel size in cm (default 22x18)",
        "  --buffer F              safety buffer factor (default 1.3)",
        "  --out-working PATH      write filtered working-CRS GeoJSON",
        "  --out-wgs84 PATH        write filtered WGS84 GeoJSON",
    ]
    .join("\n")
}
