//! Space Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use space_shooter::audio::WebAudio;
    use space_shooter::consts::MAX_FRAME_GAP_MS;
    use space_shooter::platform::{KeyboardState, ManualClock, Timeline};
    use space_shooter::renderer::{GpuSink, RenderState};
    use space_shooter::sim::{Session, SessionPhase};
    use space_shooter::{Game, Settings};

    type BrowserGame = Game<ManualClock, KeyboardState, GpuSink, WebAudio>;

    /// Game plus the browser-side frame bookkeeping
    struct App {
        game: BrowserGame,
        /// rAF timestamps mapped to game time
        timeline: Timeline,
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Space Shooter starting...");

        let settings = Settings::load();

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        document.set_title(&settings.title);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Backing store follows the device pixel ratio; game units stay fixed
        let dpr = window.device_pixel_ratio();
        let width = (settings.width as f64 * dpr) as u32;
        let height = (settings.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
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

        let render_state =
            match RenderState::new(surface, &adapter, width, height, settings.screen_size()).await {
                Ok(state) => state,
                Err(e) => {
                    log::error!("Failed to create device: {e}");
                    return;
                }
            };

        let audio = WebAudio::new(&settings);
        let session = Session::new(settings, seed);
        let game = Game::new(
            session,
            ManualClock::new(),
            KeyboardState::new(),
            GpuSink::new(render_state),
            audio,
        );
        let app = Rc::new(RefCell::new(App {
            game,
            timeline: Timeline::new(MAX_FRAME_GAP_MS),
        }));

        setup_input_handlers(app.clone());
        setup_focus_handlers(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Space Shooter running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut app = app.borrow_mut();
                // Browsers only start audio after a user gesture
                app.game.audio().resume();
                if app.game.input_mut().key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if app.borrow_mut().game.input_mut().key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drop held keys when the page loses focus so the ship doesn't keep drifting
    fn setup_focus_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().game.input_mut().release_all();
                    log::info!("Keys released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.input_mut().release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_running = {
            let mut app = app.borrow_mut();
            let now_ms = app.timeline.game_ms(time);
            app.game.clock_mut().set(now_ms);

            match app.game.run_frame() {
                Ok(SessionPhase::Running) => true,
                Ok(SessionPhase::Terminated) => {
                    let summary = app.game.summary(app.game.session().frame);
                    log::info!(
                        "Game over after {} ms - score {}",
                        summary.elapsed_ms,
                        summary.score
                    );
                    false
                }
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = app.game.sink().state.size;
                    app.game.sink_mut().state.resize(w, h);
                    true
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                    true
                }
                Err(e) => {
                    log::warn!("Render error: {:?}", e);
                    true
                }
            }
        };

        if keep_running {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use space_shooter::audio::SilentAudio;
    use space_shooter::consts::{HEADLESS_DT_MS, HEADLESS_MAX_FRAMES};
    use space_shooter::platform::{Autopilot, SteppedClock};
    use space_shooter::renderer::VertexBatch;
    use space_shooter::sim::Session;
    use space_shooter::{Game, Settings};

    env_logger::init();
    log::info!("Space Shooter (native) starting...");
    log::info!("No window on native - running a headless autopilot session (use the web build to play)");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!("Seed: {seed}");

    let session = Session::new(settings, seed);
    let mut game = Game::new(
        session,
        SteppedClock::new(HEADLESS_DT_MS),
        Autopilot::default(),
        VertexBatch::new(),
        SilentAudio::default(),
    );

    let Ok(summary) = game.run(HEADLESS_MAX_FRAMES);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Cannot serialize run summary: {e}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
