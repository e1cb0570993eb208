//! Coin Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use coin_dodge::autopilot::Autopilot;
    use coin_dodge::consts::FRAME_DT;
    use coin_dodge::engine::{LabelId, Scene, Stage};
    use coin_dodge::renderer::{RenderState, scene_vertices};
    use coin_dodge::sim::GameController;
    use coin_dodge::{Settings, canvas_scale, canvas_to_scene, scene_to_canvas};

    /// Game instance holding all state
    struct Game {
        scene: Scene,
        controller: GameController,
        render_state: Option<RenderState>,
        autopilot: Option<Autopilot>,
        last_time: f64,
        /// Canvas size in CSS pixels
        canvas_size: Vec2,
    }

    impl Game {
        fn new(settings: &Settings, seed: u64) -> Self {
            let mut scene = Scene::new(settings.screen_size());
            let mut controller = GameController::new(settings, seed);
            scene.present(&mut controller);
            Self {
                scene,
                controller,
                render_state: None,
                autopilot: None,
                last_time: 0.0,
                canvas_size: Vec2::ONE,
            }
        }

        /// Deliver a pointer position given in canvas CSS pixels
        fn pointer(&mut self, x: f32, y: f32) {
            // Demo mode owns the pointer
            if self.autopilot.is_some() {
                return;
            }
            let point = canvas_to_scene(Vec2::new(x, y), self.canvas_size, self.scene.size());
            self.scene.pointer_moved(Some(point), &mut self.controller);
        }

        /// Tap the "Play Again" control
        fn press_restart(&mut self) {
            let center = self
                .controller
                .hud()
                .and_then(|hud| hud.restart_frame(&self.scene))
                .map(|frame| frame.center());
            if let Some(point) = center {
                self.scene.pointer_moved(Some(point), &mut self.controller);
            }
        }

        fn toggle_autopilot(&mut self) {
            self.autopilot = match self.autopilot {
                Some(_) => None,
                None => Some(Autopilot::default()),
            };
            log::info!("Idle mode: {}", self.autopilot.is_some());
        }

        /// Advance the scene by one browser frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            if let Some(pilot) = self.autopilot.as_mut() {
                if let Some(point) = pilot.pointer(&self.scene, &self.controller, dt) {
                    self.scene.pointer_moved(Some(point), &mut self.controller);
                }
            }
            self.scene.advance(dt, &mut self.controller);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene_vertices(&self.scene)) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror the label nodes into the DOM overlay
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(hud) = self.controller.hud() else {
                return;
            };

            let labels: [(LabelId, &str); 4] = [
                (hud.lives, "hud-lives"),
                (hud.coins, "hud-coins"),
                (hud.game_over, "game-over"),
                (hud.restart, "restart-btn"),
            ];

            let screen = self.scene.size();
            let scale = canvas_scale(self.canvas_size, screen);

            for (id, element_id) in labels {
                let (Some(label), Some(el)) =
                    (self.scene.label(id), document.get_element_by_id(element_id))
                else {
                    continue;
                };

                if el.text_content().as_deref() != Some(label.text.as_str()) {
                    el.set_text_content(Some(&label.text));
                }
                let class = if label.visible { "hud-label" } else { "hud-label hidden" };
                let _ = el.set_attribute("class", class);

                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let at = scene_to_canvas(label.position, self.canvas_size, screen);
                    let [r, g, b, a] = label.color;
                    let style = el.style();
                    let _ = style.set_property("left", &format!("{:.1}px", at.x));
                    let _ = style.set_property("top", &format!("{:.1}px", at.y));
                    let _ = style.set_property("font-size", &format!("{:.1}px", label.font_size * scale));
                    let _ = style.set_property(
                        "color",
                        &format!(
                            "rgba({}, {}, {}, {})",
                            (r * 255.0) as u8,
                            (g * 255.0) as u8,
                            (b * 255.0) as u8,
                            a
                        ),
                    );
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Coin Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(&settings, seed)));
        game.borrow_mut().canvas_size = Vec2::new(client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let screen = settings.screen_size();
        let render_state = RenderState::new(surface, &adapter, width, height, (screen.x, screen.y)).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Coin Dodge running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.canvas_size = Vec2::new(
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                g.pointer(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start and move share the same mapping
        for event_name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    g.canvas_size = Vec2::new(
                        canvas_clone.client_width() as f32,
                        canvas_clone.client_height() as f32,
                    );
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    g.pointer(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "i" | "I" => g.toggle_autopilot(),
                    " " | "Enter" => g.press_restart(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// The DOM button sits over the canvas, so a click on it is forwarded
    /// as a pointer event inside the restart label.
    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().press_restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Seconds simulated by the headless run when none are given
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_RUN_SECONDS: f32 = 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use coin_dodge::Settings;

    env_logger::init();
    log::info!("Coin Dodge (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_from_path(std::path::Path::new(&path)),
        None => Settings::load(),
    };
    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        Some(Ok(s)) if s > 0.0 => s,
        Some(_) => {
            log::warn!("Invalid duration, using {} seconds", DEFAULT_RUN_SECONDS);
            DEFAULT_RUN_SECONDS
        }
        None => DEFAULT_RUN_SECONDS,
    };
    let seed = settings.seed.unwrap_or_else(clock_seed);

    log::info!("Seed: {}, running {} seconds", seed, seconds);
    let summary = headless::run(&settings, seed, seconds);
    println!(
        "{:.1}s simulated: {} coins, {} lives, {} restarts",
        seconds, summary.coins, summary.lives, summary.restarts
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot session without a window
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::BTreeMap;

    use coin_dodge::Settings;
    use coin_dodge::autopilot::Autopilot;
    use coin_dodge::consts::FRAME_DT;
    use coin_dodge::engine::{LabelId, Scene};
    use coin_dodge::sim::GameController;

    /// Final counters of a headless run
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Summary {
        pub coins: u32,
        pub lives: u32,
        pub restarts: u32,
    }

    pub fn run(settings: &Settings, seed: u64, seconds: f32) -> Summary {
        let mut scene = Scene::new(settings.screen_size());
        let mut controller = GameController::new(settings, seed);
        let mut pilot = Autopilot::default();
        scene.present(&mut controller);

        let mut shown = snapshot(&scene);
        let mut restarts = 0;
        let mut was_ended = false;

        let frames = (seconds / FRAME_DT).round() as u32;
        for _ in 0..frames {
            if let Some(point) = pilot.pointer(&scene, &controller, FRAME_DT) {
                scene.pointer_moved(Some(point), &mut controller);
            }
            scene.advance(FRAME_DT, &mut controller);

            let ended = controller.state().is_ended();
            if was_ended && !ended {
                restarts += 1;
            }
            was_ended = ended;

            // Log only labels that changed since the last frame
            let now = snapshot(&scene);
            for (id, (text, visible)) in &now {
                if shown.get(id) != Some(&(text.clone(), *visible)) {
                    if *visible {
                        log::info!("[{:6.2}s] {}", scene.time(), text);
                    } else {
                        log::debug!("[{:6.2}s] hidden: {}", scene.time(), text);
                    }
                }
            }
            shown = now;
        }

        Summary {
            coins: controller.state().coins(),
            lives: controller.state().lives(),
            restarts,
        }
    }

    fn snapshot(scene: &Scene) -> BTreeMap<LabelId, (String, bool)> {
        scene
            .labels()
            .map(|l| (l.id, (l.text.clone(), l.visible)))
            .collect()
    }

}
