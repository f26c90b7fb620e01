use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use formats::{DatasetError, WorldDataset};
use foundation::time::Timestamp;
use globe::{Globe, GlobeConfig, LAYER_COUNT};
use layers::LayerRole;

mod canvas;
mod raf;

use canvas::{CanvasLayer, CanvasLayers};

thread_local! {
    static GLOBE: RefCell<Option<Globe<CanvasLayers>>> = const { RefCell::new(None) };
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn log_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Mounts the globe into the element `container_id`: three stacked canvases,
/// the base drawn at once, the dataset fetched, and the animation started
/// when it arrives. Returns the height the outer frame was given.
///
/// `dataset_url` must serve GeoJSON (named collections or a bare land
/// collection); TopoJSON has to be converted first.
#[wasm_bindgen]
pub fn mount_globe(container_id: &str, dataset_url: Option<String>) -> Result<u32, JsValue> {
    let mut config = GlobeConfig::default();
    if let Some(url) = dataset_url {
        config.dataset_url = url;
    }
    let url = config.dataset_url.clone();
    let (width, height) = (config.width, config.height);

    let document = document()?;
    let container: HtmlElement = document
        .get_element_by_id(container_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{container_id}")))?
        .dyn_into()?;

    let mut layers = Vec::with_capacity(LAYER_COUNT);
    for index in 0..LAYER_COUNT {
        let role = LayerRole::for_index(index);
        let canvas = create_canvas(&document, width, height)?;
        let style = canvas.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0")?;
        style.set_property("top", "0")?;
        if role == LayerRole::Shadow && config.shadow_blur > 0.0 {
            canvas.set_class_name(&format!("{} blur", role.name()));
            style.set_property("filter", &format!("blur({}px)", config.shadow_blur))?;
        } else {
            canvas.set_class_name(role.name());
        }
        container.append_child(&canvas)?;
        layers.push(CanvasLayer::new(role, context_2d(&canvas)?, width, height));
    }

    let start = Timestamp(raf::performance_now());
    let globe = Globe::setup_with(config, start, CanvasLayers::new(layers))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let frame_height = globe.frame_height();
    let container_style = container.style();
    container_style.set_property("position", "relative")?;
    container_style.set_property("height", &format!("{frame_height}px"))?;

    GLOBE.with(|slot| {
        *slot.borrow_mut() = Some(globe);
    });

    spawn_local(async move {
        let result = fetch_dataset(&url).await;
        let running = GLOBE.with(|slot| {
            let mut slot = slot.borrow_mut();
            let Some(globe) = slot.as_mut() else {
                return false;
            };
            match globe.dataset_loaded(result) {
                Ok(()) => globe.state().is_running(),
                Err(err) => {
                    log_error(&format!("globe setup failed: {err}"));
                    false
                }
            }
        });
        if running {
            log(&format!("globe running with {url}"));
            raf::run(tick);
        }
    });

    Ok(frame_height)
}

/// One animation frame. Returns false to stop the loop.
fn tick(now_ms: f64) -> bool {
    GLOBE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let Some(globe) = slot.as_mut() else {
            return false;
        };
        match globe.tick(Timestamp(now_ms)) {
            Ok(_) => true,
            Err(err) => {
                log_error(&format!("globe frame failed: {err}"));
                false
            }
        }
    })
}

async fn fetch_dataset(url: &str) -> Result<WorldDataset, DatasetError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| DatasetError::Unavailable(e.to_string()))?;
    if !resp.ok() {
        return Err(DatasetError::Unavailable(format!(
            "{url}: HTTP {}",
            resp.status()
        )));
    }
    let text = resp
        .text()
        .await
        .map_err(|e| DatasetError::Unavailable(e.to_string()))?;
    WorldDataset::from_json_str(&text)
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn create_canvas(
    document: &Document,
    width: u32,
    height: u32,
) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()
        .map_err(JsValue::from)
}
