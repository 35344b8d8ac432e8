use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlElement};

const POP_MS: i32 = 200;
const POP_TRANSFORM: &str = "scale(1.2)";

/// An event listener that stays registered for as long as it is kept
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach(
        target: &EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    pub fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

fn play_state(element: HtmlElement, state: &'static str) -> Closure<dyn FnMut(Event)> {
    Closure::new(move |_: Event| {
        let _ = element.style().set_property("animation-play-state", state);
    })
}

/// Pause the element's CSS animation while the pointer is over it.
pub fn hover_pause(element: &HtmlElement) -> Result<Vec<Listener>, JsValue> {
    Ok(vec![
        Listener::attach(element, "mouseenter", play_state(element.clone(), "paused"))?,
        Listener::attach(element, "mouseleave", play_state(element.clone(), "running"))?,
    ])
}

/// Briefly enlarge a fish when its link is clicked anywhere on the page.
pub fn click_pop(target: &EventTarget) -> Result<Listener, JsValue> {
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(clicked) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let fish = match clicked.closest(".fish-link") {
            Ok(Some(link)) => link.closest(".fish").ok().flatten(),
            _ => None,
        };
        if let Some(fish) = fish.and_then(|f| f.dyn_into::<HtmlElement>().ok()) {
            if let Err(err) = pop(&fish) {
                crate::console_log!("click feedback failed: {:?}", err);
            }
        }
    });
    Listener::attach(target, "click", callback)
}

fn pop(fish: &HtmlElement) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    fish.style().set_property("transform", POP_TRANSFORM)?;

    let fish = fish.clone();
    let reset = Closure::once_into_js(move || {
        let _ = fish.style().remove_property("transform");
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(reset.unchecked_ref(), POP_MS)?;
    Ok(())
}
