use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tank_core::bubbles::BubbleConfig;
use tank_core::{Fish, Personality, PersonalityProfile, TankConfig, Vector2D};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console(&format_args!($($t)*).to_string()))
}

#[doc(hidden)]
pub fn console(message: &str) {
    log(message);
}

pub mod bubbles;
pub mod feedback;
pub mod frame;

use bubbles::BubbleLoop;
use feedback::Listener;
use frame::{parse_percent, Swimmer};

/// Animates every `.fish` inside a tank element
#[wasm_bindgen]
pub struct TankAnimation {
    document: Document,
    swimmers: Vec<Swimmer>,
    bubble_container: Option<HtmlElement>,
    bubbles: Option<BubbleLoop>,
    listeners: Vec<Listener>,
    config: TankConfig,
    profile: PersonalityProfile,
    rng: Rc<RefCell<StdRng>>,
    started: bool,
}

#[wasm_bindgen]
impl TankAnimation {
    #[wasm_bindgen(constructor)]
    pub fn new(tank_selector: &str) -> Result<TankAnimation, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let tank = document
            .query_selector(tank_selector)?
            .ok_or("tank not found")?;
        Self::bind(document, &tank)
    }

    /// Start swimming, bubbles and pointer feedback. Calling it twice is a no-op.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        for (index, swimmer) in self.swimmers.iter().enumerate() {
            let id = match swimmer.element.id() {
                id if id.is_empty() => format!("fish-{}", index),
                id => id,
            };
            swimmer.start(id, self.config, self.profile, self.rng.clone())?;
            self.listeners.extend(feedback::hover_pause(&swimmer.element)?);
        }

        if let Some(container) = self.bubble_container.clone() {
            self.bubbles = Some(BubbleLoop::start(
                self.document.clone(),
                container,
                BubbleConfig::default(),
                self.rng.clone(),
            )?);
        }

        self.listeners.push(feedback::click_pop(&self.document)?);

        console_log!("Tank started with {} fish", self.swimmers.len());
        Ok(())
    }

    /// Revoke one fish's frame loop. Returns false for an unknown index.
    pub fn stop_fish(&mut self, index: usize) -> bool {
        match self.swimmers.get(index) {
            Some(swimmer) => {
                swimmer.handle.revoke();
                true
            }
            None => false,
        }
    }

    /// Revoke every frame loop, timer and listener.
    pub fn stop(&mut self) {
        for swimmer in &self.swimmers {
            swimmer.handle.revoke();
        }
        if let Some(bubbles) = self.bubbles.take() {
            bubbles.stop();
        }
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
    }

    pub fn fish_count(&self) -> usize {
        self.swimmers.len()
    }

    pub fn running_count(&self) -> usize {
        self.swimmers
            .iter()
            .filter(|swimmer| swimmer.handle.is_active())
            .count()
    }

    /// Stored (unwobbled) position of a fish as `[x, y]`.
    pub fn position(&self, index: usize) -> Option<Vec<f32>> {
        let swimmer = self.swimmers.get(index)?;
        let fish = swimmer.fish.borrow();
        Some(vec![fish.position.x, fish.position.y])
    }

    /// Last rendered frame of a fish as JSON.
    pub fn frame_json(&self, index: usize) -> Option<String> {
        let swimmer = self.swimmers.get(index)?;
        let frame = swimmer.last_frame.borrow();
        frame
            .as_ref()
            .and_then(|frame| serde_json::to_string(frame).ok())
    }
}

impl TankAnimation {
    fn bind(document: Document, tank: &Element) -> Result<Self, JsValue> {
        let config = TankConfig::default();
        let profile = PersonalityProfile::default();
        let mut rng = StdRng::from_entropy();

        let nodes = tank.query_selector_all(".fish")?;
        let mut swimmers = Vec::with_capacity(nodes.length() as usize);
        for index in 0..nodes.length() {
            let Some(node) = nodes.item(index) else {
                continue;
            };
            let element = node.dyn_into::<HtmlElement>()?;
            let key = element.dataset().get("personality").unwrap_or_default();
            let personality = Personality::from_key(&key);
            let position = initial_position(&element, &config, &mut rng);
            let fish = Fish::new(personality, Some(position), &profile, &config, &mut rng);

            let style = element.style();
            style.set_property("left", &format!("{}%", fish.position.x))?;
            style.set_property("top", &format!("{}%", fish.position.y))?;

            swimmers.push(Swimmer::new(element, fish));
        }

        let bubble_container = document
            .query_selector(".bubbles")?
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        console_log!("Bound tank with {} fish", swimmers.len());

        Ok(Self {
            document,
            swimmers,
            bubble_container,
            bubbles: None,
            listeners: Vec::new(),
            config,
            profile,
            rng: Rc::new(RefCell::new(rng)),
            started: false,
        })
    }
}

impl Drop for TankAnimation {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Starting position from inline `left`/`top`, random per unset axis.
fn initial_position<R: Rng + ?Sized>(
    element: &HtmlElement,
    config: &TankConfig,
    rng: &mut R,
) -> Vector2D {
    let random = config.spawn.sample(rng);
    let style = element.style();
    let x = style
        .get_property_value("left")
        .ok()
        .and_then(|value| parse_percent(&value))
        .unwrap_or(random.x);
    let y = style
        .get_property_value("top")
        .ok()
        .and_then(|value| parse_percent(&value))
        .unwrap_or(random.y);
    Vector2D::new(x, y)
}

/// Bind and start the tank on the current page, if there is one.
#[wasm_bindgen]
pub fn init_tank() -> Result<Option<TankAnimation>, JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    let document = window.document().ok_or("no document")?;
    let Some(tank) = document.query_selector(".tank")? else {
        return Ok(None);
    };

    let mut animation = TankAnimation::bind(document, &tank)?;
    animation.start()?;
    Ok(Some(animation))
}
