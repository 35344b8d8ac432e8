use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::StdRng;
use tank_core::{Fish, PersonalityProfile, TankConfig};
use tank_shared::RenderFrame;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Revocable `requestAnimationFrame` registration.
///
/// The callback keeps a clone of its own handle so it can re-schedule
/// itself; `revoke` breaks that cycle by dropping the closure.
#[derive(Clone, Default)]
pub struct FrameHandle {
    stopped: Rc<Cell<bool>>,
    request_id: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameHandle {
    /// True while a frame is pending and the handle has not been revoked.
    pub fn is_active(&self) -> bool {
        !self.stopped.get() && self.request_id.get().is_some()
    }

    pub fn revoke(&self) {
        if self.stopped.replace(true) {
            return;
        }
        if let Some(id) = self.request_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        let _ = self.callback.borrow_mut().take();
    }

    fn schedule(&self) -> Result<(), JsValue> {
        if self.stopped.get() {
            return Ok(());
        }
        let window = web_sys::window().ok_or("no global window")?;
        let callback = self.callback.borrow();
        let callback = callback.as_ref().ok_or("frame callback released")?;
        let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.request_id.set(Some(id));
        Ok(())
    }
}

/// One fish element and the state driving it
pub struct Swimmer {
    pub element: HtmlElement,
    pub fish: Rc<RefCell<Fish>>,
    pub last_frame: Rc<RefCell<Option<RenderFrame>>>,
    pub handle: FrameHandle,
}

impl Swimmer {
    pub fn new(element: HtmlElement, fish: Fish) -> Self {
        Self {
            element,
            fish: Rc::new(RefCell::new(fish)),
            last_frame: Rc::new(RefCell::new(None)),
            handle: FrameHandle::default(),
        }
    }

    /// Start the per-frame loop. It runs until the handle is revoked or the
    /// element is detached from the document.
    pub fn start(
        &self,
        id: String,
        config: TankConfig,
        profile: PersonalityProfile,
        rng: Rc<RefCell<StdRng>>,
    ) -> Result<(), JsValue> {
        let image = self
            .element
            .query_selector(".fish-image")?
            .and_then(|image| image.dyn_into::<HtmlElement>().ok());
        let element = self.element.clone();
        let fish = self.fish.clone();
        let last_frame = self.last_frame.clone();
        let handle = self.handle.clone();

        let update = Closure::<dyn FnMut()>::new(move || {
            if handle.stopped.get() {
                return;
            }
            if !element.is_connected() {
                crate::console_log!("{} left the page, stopping", id);
                handle.revoke();
                return;
            }

            let state = fish
                .borrow_mut()
                .step(&profile, &config, &mut *rng.borrow_mut());
            let frame = RenderFrame::from_state(id.as_str(), &state);

            let result = apply_frame(&element, image.as_ref(), &frame).and_then(|_| handle.schedule());
            *last_frame.borrow_mut() = Some(frame);
            if let Err(err) = result {
                crate::console_log!("{} stopped: {:?}", id, err);
                handle.revoke();
            }
        });

        *self.handle.callback.borrow_mut() = Some(update);
        self.handle.schedule()
    }
}

/// Write one frame onto the fish element and its image.
pub fn apply_frame(
    element: &HtmlElement,
    image: Option<&HtmlElement>,
    frame: &RenderFrame,
) -> Result<(), JsValue> {
    let style = element.style();
    style.set_property("left", &format!("{}%", frame.left))?;
    style.set_property("top", &format!("{}%", frame.top))?;
    if let Some(image) = image {
        image.style().set_property("transform", &frame.transform())?;
    }
    Ok(())
}

/// Longest leading number of a CSS length such as `"42.5%"` or `"1e1%"`.
///
/// Zero and unparseable values count as unset, so the fish gets a random
/// starting spot instead.
pub fn parse_percent(value: &str) -> Option<f32> {
    let value = value.trim();
    let run = value
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(value.len());
    // "12em" must fall back to "12", so shrink until a prefix parses.
    (1..=run)
        .rev()
        .find_map(|end| value[..end].parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v != 0.0)
}
