//! DOM render backends.

use sakura_fx_core::{TextSink, Transform, TransformSink};
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

fn warn(what: &str, err: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(what), err);
}

/// One absolutely positioned element per entity id, created on first use
/// inside `container` and removed when the entity goes away.
pub struct DomTransformSink {
    document: Document,
    container: Element,
    class_name: String,
    nodes: HashMap<u64, HtmlElement>,
}

impl DomTransformSink {
    pub fn new(container: Element, class_name: &str) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container is not attached to a document"))?;
        Ok(Self {
            document,
            container,
            class_name: class_name.to_string(),
            nodes: HashMap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn create(&self) -> Result<HtmlElement, JsValue> {
        let node: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        node.set_class_name(&self.class_name);
        let style = node.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0")?;
        style.set_property("top", "0")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("will-change", "transform, opacity")?;
        self.container.append_child(&node)?;
        Ok(node)
    }

    fn write(node: &HtmlElement, t: &Transform) -> Result<(), JsValue> {
        let style = node.style();
        style.set_property("transform", &t.css())?;
        style.set_property("opacity", &t.opacity.to_string())
    }
}

impl TransformSink for DomTransformSink {
    fn apply(&mut self, id: u64, transform: &Transform) {
        if !self.nodes.contains_key(&id) {
            match self.create() {
                Ok(node) => {
                    self.nodes.insert(id, node);
                }
                Err(e) => return warn("sakura-fx: could not create element", &e),
            }
        }
        if let Some(node) = self.nodes.get(&id) {
            if let Err(e) = Self::write(node, transform) {
                warn("sakura-fx: could not style element", &e);
            }
        }
    }

    fn remove(&mut self, id: u64) {
        if let Some(node) = self.nodes.remove(&id) {
            node.remove();
        }
    }
}

impl Drop for DomTransformSink {
    fn drop(&mut self) {
        for (_, node) in self.nodes.drain() {
            node.remove();
        }
    }
}

/// Writes each frame into an element's text content, typically a `<pre>`.
pub struct DomTextSink {
    element: Element,
}

impl DomTextSink {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl TextSink for DomTextSink {
    fn set_text(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}
