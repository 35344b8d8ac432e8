use tank_wasm::TankAnimation;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Build a `.tank` holding one `.fish` per personality and attach it to the body.
fn build_tank(id: &str, personalities: &[&str]) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let tank = document.create_element("div").unwrap();
    tank.set_id(id);
    tank.set_class_name("tank");

    for (index, personality) in personalities.iter().enumerate() {
        let fish = document
            .create_element("div")
            .unwrap()
            .dyn_into::<web_sys::HtmlElement>()
            .unwrap();
        fish.set_class_name("fish");
        fish.set_attribute("data-personality", personality).unwrap();
        if index == 0 {
            fish.style().set_property("left", "30%").unwrap();
            fish.style().set_property("top", "40%").unwrap();
        }

        let image = document.create_element("img").unwrap();
        image.set_class_name("fish-image");
        fish.append_child(&image).unwrap();
        tank.append_child(&fish).unwrap();
    }

    document.body().unwrap().append_child(&tank).unwrap();
    tank
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn test_missing_tank_is_an_error() {
    assert!(TankAnimation::new("#no-such-tank").is_err());
}

#[wasm_bindgen_test]
fn test_binds_every_fish_and_keeps_inline_position() {
    let tank = build_tank("bind-tank", &["slow", "fast", "wiggly"]);
    let animation = TankAnimation::new("#bind-tank").unwrap();

    assert_eq!(animation.fish_count(), 3);
    assert_eq!(animation.running_count(), 0);
    assert_eq!(animation.position(0), Some(vec![30.0, 40.0]));
    assert!(animation.position(3).is_none());

    tank.remove();
}

#[wasm_bindgen_test]
async fn test_frames_stay_in_bounds_and_stop_on_request() {
    let tank = build_tank("swim-tank", &["fast", "medium"]);
    let mut animation = TankAnimation::new("#swim-tank").unwrap();
    animation.start().unwrap();
    assert_eq!(animation.running_count(), 2);

    sleep(200).await;

    for index in 0..2 {
        let position = animation.position(index).unwrap();
        assert!(position[0] >= 2.0 && position[0] <= 88.0);
        assert!(position[1] >= 5.0 && position[1] <= 70.0);
        assert!(animation.frame_json(index).is_some());
    }

    assert!(animation.stop_fish(0));
    assert!(!animation.stop_fish(9));
    assert_eq!(animation.running_count(), 1);

    let frozen = animation.position(0).unwrap();
    sleep(100).await;
    assert_eq!(animation.position(0).unwrap(), frozen);

    animation.stop();
    assert_eq!(animation.running_count(), 0);
    tank.remove();
}

#[wasm_bindgen_test]
async fn test_detached_fish_stops_itself() {
    let tank = build_tank("detach-tank", &["medium"]);
    let mut animation = TankAnimation::new("#detach-tank").unwrap();
    animation.start().unwrap();

    tank.remove();
    sleep(100).await;

    assert_eq!(animation.running_count(), 0);
}

#[wasm_bindgen_test]
fn test_click_on_fish_link_enlarges_fish() {
    let document = web_sys::window().unwrap().document().unwrap();
    let tank = build_tank("click-tank", &["slow"]);
    let fish = tank
        .query_selector(".fish")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    let link = document
        .create_element("a")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    link.set_class_name("fish-link");
    fish.append_child(&link).unwrap();

    let mut animation = TankAnimation::new("#click-tank").unwrap();
    animation.start().unwrap();

    link.click();
    assert_eq!(
        fish.style().get_property_value("transform").unwrap(),
        "scale(1.2)"
    );

    animation.stop();
    tank.remove();
}

#[wasm_bindgen_test]
fn test_hover_pauses_fish_until_stopped() {
    let tank = build_tank("hover-tank", &["medium"]);
    let fish = tank
        .query_selector(".fish")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    let play_state = || fish.style().get_property_value("animation-play-state").unwrap();
    let hover = |kind: &str| {
        fish.dispatch_event(&web_sys::Event::new(kind).unwrap())
            .unwrap();
    };

    let mut animation = TankAnimation::new("#hover-tank").unwrap();
    animation.start().unwrap();

    hover("mouseenter");
    assert_eq!(play_state(), "paused");
    hover("mouseleave");
    assert_eq!(play_state(), "running");

    hover("mouseenter");
    animation.stop();
    hover("mouseleave");
    assert_eq!(play_state(), "paused");

    tank.remove();
}
