//! `requestAnimationFrame` driver.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// Calls `tick` with the frame timestamp (ms, `performance.now()` timebase)
/// on every animation frame until it returns false.
///
/// The closure keeps itself alive through the shared slot for the lifetime of
/// the page; once `tick` declines it simply stops re-registering.
pub(crate) fn run(mut tick: impl FnMut(f64) -> bool + 'static) {
    let slot: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let again = Rc::clone(&slot);

    let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
        if !tick(timestamp_ms) {
            return;
        }
        if let Some(cb) = again.borrow().as_ref() {
            request_animation_frame(cb.as_ref());
        }
    }) as Box<dyn FnMut(f64)>);

    request_animation_frame(closure.as_ref());
    *slot.borrow_mut() = Some(closure);
}
