//! Subcommand bodies. Each returns the JSON document printed under `--json`.

use crate::error::CliError;
use sakura_fx_clouds::{CloudField, CloudParams};
use sakura_fx_core::glam::DVec2;
use sakura_fx_core::{Bounds, Engine, FrameInput, RecordingSink, Seed};
use sakura_fx_engines::EngineKind;
use sakura_fx_petals::{PetalField, SpawnSource};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub fn parse_params(raw: &str) -> Result<Value, CliError> {
    let params: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}

/// Parses `"x,y"` in px.
pub fn parse_pointer(raw: &str) -> Result<DVec2, CliError> {
    let bad = || CliError::Input(format!("invalid --pointer '{raw}', expected X,Y"));
    let (x, y) = raw.split_once(',').ok_or_else(bad)?;
    let x: f64 = x.trim().parse().map_err(|_| bad())?;
    let y: f64 = y.trim().parse().map_err(|_| bad())?;
    Ok(DVec2::new(x, y))
}

pub fn list() -> Value {
    let engines: Vec<Value> = EngineKind::list_engines()
        .iter()
        .map(|name| json!({"name": name, "presets": EngineKind::presets(name)}))
        .collect();
    json!({ "engines": engines })
}

/// Replays `seed` and writes the final frame as a PNG.
pub fn render(seed: &Seed, output: &Path, save_seed: Option<&Path>) -> Result<Value, CliError> {
    let engine = EngineKind::from_seed(seed)?;
    let snapshot = engine.snapshot()?;
    sakura_fx_engines::snapshot::write_png(&snapshot, &engine.tint(), output)?;
    tracing::info!(
        engine = %seed.engine,
        frames = seed.frames,
        width = snapshot.width(),
        height = snapshot.height(),
        "wrote snapshot"
    );
    if let Some(path) = save_seed {
        fs::write(path, serde_json::to_string_pretty(seed)?)?;
        tracing::debug!(path = %path.display(), "saved seed");
    }
    Ok(json!({
        "engine": seed.engine,
        "width": seed.width,
        "height": seed.height,
        "frames": seed.frames,
        "seed": seed.seed,
        "output": output.display().to_string(),
    }))
}

pub fn load_seed(path: &Path) -> Result<Seed, CliError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| CliError::Input(format!("invalid seed file: {e}")))
}

/// Runs the cloud field `ticks` times, collecting each printed frame when
/// `every` is set and only the last one otherwise.
pub fn clouds(
    width: f64,
    height: f64,
    ticks: usize,
    params: &Value,
    every: bool,
) -> Result<Vec<String>, CliError> {
    let mut field = CloudField::for_viewport(width, height, CloudParams::from_json(params)?)?;
    let mut frames = Vec::new();
    if every {
        frames.push(field.render_text());
    }
    for _ in 0..ticks {
        field.scroll();
        if every {
            frames.push(field.render_text());
        }
    }
    if !every {
        frames.push(field.render_text());
    }
    tracing::debug!(columns = field.columns(), rows = field.rows(), ticks, "clouds done");
    Ok(frames)
}

pub struct PetalRun {
    pub width: f64,
    pub height: f64,
    pub frames: usize,
    pub seed: u64,
    pub pointer: Option<DVec2>,
    /// Excitation applied at the field center before the first frame.
    pub excite: Option<f64>,
}

/// One JSON line per frame with the transforms pushed and ids released.
pub fn petals(run: &PetalRun, params: &Value) -> Result<Vec<Value>, CliError> {
    let bounds = Bounds::new(run.width, run.height);
    let petal_params = sakura_fx_petals::PetalParams::from_json(params)?;
    let mut field = PetalField::new(bounds, run.seed, petal_params)?;
    if let Some(strength) = run.excite {
        let outcome = field.excite(strength, &SpawnSource::Screen(bounds.center()));
        tracing::info!(strength, spawned = outcome.spawned, evicted = outcome.evicted, "excited");
    }
    let mut input = FrameInput::idle(bounds);
    input.pointer = run.pointer;

    let mut sink = RecordingSink::new();
    let mut lines = Vec::with_capacity(run.frames + 1);
    for frame in 0..=run.frames {
        if frame > 0 {
            field.step(&input)?;
        }
        sink.clear();
        field.render(&mut sink);
        let applied: Vec<Value> = sink
            .applied
            .iter()
            .map(|(id, t)| json!({"id": id, "transform": t.css(), "opacity": t.opacity}))
            .collect();
        lines.push(json!({
            "frame": frame,
            "live": field.len(),
            "applied": applied,
            "removed": sink.removed,
        }));
    }
    Ok(lines)
}
