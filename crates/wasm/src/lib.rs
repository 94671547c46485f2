//! Browser bindings: mount an effect on a DOM element and drive it from
//! `requestAnimationFrame`.
//!
//! The host owns the loop. Each handle keeps its own clock, so calling
//! `frame(now)` with the rAF timestamp is all that is needed. Freeing a handle
//! (or letting it be garbage-collected) removes every element it created.

pub mod dom;

use dom::{DomTextSink, DomTransformSink};
use sakura_fx_clouds::{CloudField, CloudParams};
use sakura_fx_core::glam::{DMat4, DVec2, DVec3};
use sakura_fx_core::{Bounds, Camera, Engine, FrameClock, FrameInput};
use sakura_fx_petals::{PetalField, PetalParams, SpawnSource};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Installs the panic hook. Safe to call more than once.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    web_sys::console::log_1(&format!("sakura-fx {} ready", env!("CARGO_PKG_VERSION")).into());
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Accepts `undefined`, `null` or any JSON-compatible object.
fn params_from_js(params: &JsValue) -> Result<Value, JsError> {
    if params.is_undefined() || params.is_null() {
        return Ok(Value::Object(Default::default()));
    }
    let raw: String = js_sys::JSON::stringify(params)
        .map_err(|_| JsError::new("params are not serializable"))?
        .into();
    serde_json::from_str(&raw).map_err(|e| JsError::new(&e.to_string()))
}

/// Column-major 4x4 view-projection matrix, as three.js `elements` holds it.
fn camera_from(view_proj: &[f64]) -> Option<Camera> {
    let cols: &[f64; 16] = view_proj.try_into().ok()?;
    let m = DMat4::from_cols_array(cols);
    m.is_finite().then(|| Camera::from_view_proj(m))
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Falling petals rendered as absolutely positioned elements.
#[wasm_bindgen]
pub struct PetalFieldHandle {
    field: PetalField,
    sink: DomTransformSink,
    clock: Option<FrameClock>,
    pointer: Option<DVec2>,
}

#[wasm_bindgen]
impl PetalFieldHandle {
    /// `params` is a plain object (see `PetalParams`), e.g. `{preset: "snowfall"}`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: web_sys::Element,
        width: f64,
        height: f64,
        seed: u32,
        params: JsValue,
    ) -> Result<PetalFieldHandle, JsError> {
        let params = PetalParams::from_json(&params_from_js(&params)?).map_err(js_err)?;
        let field =
            PetalField::new(Bounds::new(width, height), seed as u64, params).map_err(js_err)?;
        let sink = DomTransformSink::new(container, "sakura-petal")
            .map_err(|_| JsError::new("container is not attached to a document"))?;
        let mut handle = Self {
            field,
            sink,
            clock: None,
            pointer: None,
        };
        handle.field.render(&mut handle.sink);
        Ok(handle)
    }

    /// Advances by the time since the previous call and pushes changed
    /// transforms. The first call only starts the clock.
    pub fn frame(&mut self, now_ms: f64) -> Result<(), JsError> {
        let delta = match self.clock.as_mut() {
            Some(clock) => clock.tick(now_ms),
            None => {
                self.clock = Some(FrameClock::new(now_ms));
                return Ok(());
            }
        };
        let input = FrameInput {
            delta,
            bounds: self.field.bounds(),
            pointer: self.pointer,
        };
        self.field.step(&input).map_err(js_err)?;
        self.field.render(&mut self.sink);
        Ok(())
    }

    /// Pointer position in container-local px.
    #[wasm_bindgen(js_name = setPointer)]
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, y);
        self.pointer = p.is_finite().then_some(p);
    }

    #[wasm_bindgen(js_name = clearPointer)]
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Burst at a container-local point. Returns the number of petals spawned.
    pub fn excite(&mut self, strength: f64, x: f64, y: f64) -> u32 {
        let outcome = self.field.excite(strength, &SpawnSource::Screen(DVec2::new(x, y)));
        outcome.spawned as u32
    }

    /// Burst at a scene point projected through `view_proj` (16 numbers,
    /// column-major). A malformed matrix spawns nothing.
    #[wasm_bindgen(js_name = exciteAnchor)]
    pub fn excite_anchor(
        &mut self,
        strength: f64,
        x: f64,
        y: f64,
        z: f64,
        view_proj: &[f64],
    ) -> u32 {
        let source = SpawnSource::Anchor {
            point: DVec3::new(x, y, z),
            camera: camera_from(view_proj),
        };
        self.field.excite(strength, &source).spawned as u32
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsError> {
        self.field.resize(Bounds::new(width, height)).map_err(js_err)?;
        self.field.render(&mut self.sink);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn live(&self) -> u32 {
        self.field.len() as u32
    }
}

impl Drop for PetalFieldHandle {
    fn drop(&mut self) {
        self.field.teardown(&mut self.sink);
    }
}

/// ASCII cloud backdrop written into an element's text.
#[wasm_bindgen]
pub struct CloudFieldHandle {
    field: CloudField,
    sink: DomTextSink,
}

#[wasm_bindgen]
impl CloudFieldHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: web_sys::Element,
        width: f64,
        height: f64,
        params: JsValue,
    ) -> Result<CloudFieldHandle, JsError> {
        let params = CloudParams::from_json(&params_from_js(&params)?).map_err(js_err)?;
        let field = CloudField::for_viewport(width, height, params).map_err(js_err)?;
        let mut handle = Self {
            field,
            sink: DomTextSink::new(element),
        };
        handle.field.render(&mut handle.sink);
        Ok(handle)
    }

    /// Scrolls and redraws when the tick interval has elapsed. Returns
    /// whether the text changed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let scrolled = self.field.tick_at(now_ms);
        if scrolled {
            self.field.render(&mut self.sink);
        }
        scrolled
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsError> {
        self.field.resize_viewport(width, height).map_err(js_err)?;
        self.field.render(&mut self.sink);
        Ok(())
    }

    pub fn text(&self) -> String {
        self.field.render_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_needs_sixteen_finite_numbers() {
        let identity = DMat4::IDENTITY.to_cols_array();
        assert!(camera_from(&identity).is_some());
        assert!(camera_from(&identity[..12]).is_none());
        let mut bad = identity;
        bad[3] = f64::NAN;
        assert!(camera_from(&bad).is_none());
    }

    #[test]
    fn identity_camera_projects_origin_to_center() {
        let camera = camera_from(&DMat4::IDENTITY.to_cols_array()).unwrap();
        let p = camera.project(DVec3::ZERO, Bounds::new(200.0, 100.0)).unwrap();
        assert_eq!(p, DVec2::new(100.0, 50.0));
    }
}
