//! map-hatch - hatch fills and choropleth maps as plotter-ready SVG
//!
//! Usage:
//!   map-hatch hatch <region.wkt> --scale <s> --pattern <p> [--crs EPSG:n] [--stroke colour] [--out file.svg]
//!   map-hatch map <features.ron> --style <style.ron> [--out file.svg]
//!   map-hatch patterns

use std::env;
use std::fs;
use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use svg::Document;
use tracing::info;
use tracing_subscriber::EnvFilter;

use map_hatch::config::{load_features, Canvas, MapStyle, Stroke};
use map_hatch::prelude::{generate, Crs, Layer, MapCanvas, Pattern, Region};

const USAGE: &str = "\
Usage:
  map-hatch hatch <region.wkt> --scale <s> --pattern <p> [--crs EPSG:n] [--stroke colour] [--out file.svg]
  map-hatch map <features.ron> --style <style.ron> [--out file.svg]
  map-hatch patterns";

/// Pull `--name value` out of the argument list, leaving the positionals.
fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    match args.iter().position(|a| a == name) {
        None => Ok(None),
        Some(i) => {
            if i + 1 >= args.len() {
                bail!("{} needs a value", name);
            }
            let value = args.remove(i + 1);
            args.remove(i);
            Ok(Some(value))
        }
    }
}

fn write_output(doc: &Document, out: Option<String>) -> Result<()> {
    match out {
        Some(path) => {
            svg::save(&path, doc).with_context(|| format!("writing {}", path))?;
            info!(path = %path, "Wrote SVG");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            svg::write(&mut handle, doc).context("writing SVG to stdout")?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn run_hatch(mut args: Vec<String>) -> Result<()> {
    let scale: f64 = take_option(&mut args, "--scale")?
        .ok_or_else(|| anyhow!("--scale is required"))?
        .parse()
        .context("--scale must be a number")?;
    let pattern: Pattern = take_option(&mut args, "--pattern")?
        .unwrap_or_else(|| "horizontal".to_string())
        .parse()?;
    let crs: Crs = match take_option(&mut args, "--crs")? {
        Some(text) => text.parse().map_err(|e: String| anyhow!(e))?,
        None => Crs::irish_grid(),
    };
    let stroke = Stroke::new(
        &take_option(&mut args, "--stroke")?.unwrap_or_else(|| "black".to_string()),
        0.25,
    );
    let out = take_option(&mut args, "--out")?;
    let [path] = args.as_slice() else {
        bail!("expected exactly one region file\n{}", USAGE);
    };

    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let region = Region::from_wkt(&text, crs.clone()).with_context(|| format!("parsing {}", path))?;
    let hatch = generate(&region, scale, pattern)?;
    info!(parts = hatch.len(), length = hatch.total_length(), "Hatched region");

    let canvas = MapCanvas::fit_regions([&region], Canvas::default(), crs)?;
    let doc = canvas.render(&[
        Layer::Hatch {
            lines: &hatch,
            stroke: stroke.clone(),
        },
        Layer::Fill {
            region: &region,
            fill: None,
            stroke: Some(stroke),
        },
    ])?;
    write_output(&doc, out)
}

fn run_map(mut args: Vec<String>) -> Result<()> {
    let style_path =
        take_option(&mut args, "--style")?.ok_or_else(|| anyhow!("--style is required"))?;
    let out = take_option(&mut args, "--out")?;
    let [features_path] = args.as_slice() else {
        bail!("expected exactly one features file\n{}", USAGE);
    };

    let style = MapStyle::load(&style_path).with_context(|| format!("loading {}", style_path))?;
    let features = load_features(features_path, &style.crs)
        .with_context(|| format!("loading {}", features_path))?;
    let doc = map_hatch::render::render_choropleth(&features, &style)?;
    write_output(&doc, out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        bail!("{}", USAGE);
    }
    let command = args.remove(0);
    match command.as_str() {
        "hatch" => run_hatch(args),
        "map" => run_map(args),
        "patterns" => {
            for pattern in Pattern::ALL {
                println!("{}", pattern);
            }
            Ok(())
        }
        "-h" | "--help" | "help" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }
}
