use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use tank_core::bubbles::{Bubble, BubbleConfig, BubbleField};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

const MAX_BUBBLES: usize = 16;

/// Timer that feeds a `BubbleField` and mirrors it into `div.bubble` elements
pub struct BubbleLoop {
    interval_id: i32,
    _tick: Closure<dyn FnMut()>,
}

impl BubbleLoop {
    pub fn start(
        document: Document,
        container: HtmlElement,
        config: BubbleConfig,
        rng: Rc<RefCell<StdRng>>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let performance = window.performance().ok_or("no performance clock")?;
        let field = RefCell::new(BubbleField::<MAX_BUBBLES>::new(config, performance.now()));

        let tick = Closure::<dyn FnMut()>::new(move || {
            let now = performance.now();
            let mut field = field.borrow_mut();
            field.expire(now);
            if let Some(bubble) = field.tick(now, &mut *rng.borrow_mut()) {
                if let Err(err) = spawn_bubble(&document, &container, &bubble, config.lifetime_ms)
                {
                    crate::console_log!("bubble {} failed: {:?}", bubble.id, err);
                }
            }
        });

        // The field owns the cadence; this only polls it.
        let poll_ms = (config.interval_ms / 4.0).max(16.0) as i32;
        let interval_id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            poll_ms,
        )?;

        Ok(Self {
            interval_id,
            _tick: tick,
        })
    }

    pub fn stop(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.interval_id);
        }
    }
}

fn spawn_bubble(
    document: &Document,
    container: &HtmlElement,
    bubble: &Bubble,
    lifetime_ms: f64,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    let element = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()?;
    element.set_class_name("bubble");

    let style = element.style();
    let size = format!("{}px", bubble.size);
    style.set_property("left", &format!("{}%", bubble.left))?;
    style.set_property("width", &size)?;
    style.set_property("height", &size)?;
    style.set_property("animation-duration", &format!("{}s", bubble.rise_secs))?;
    container.append_child(&element)?;

    let removal = Closure::once_into_js(move || element.remove());
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        removal.unchecked_ref(),
        lifetime_ms as i32,
    )?;
    Ok(())
}
