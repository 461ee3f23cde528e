//! Mixpour entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use mixpour::Settings;
    use mixpour::consts::*;
    use mixpour::renderer::{RenderState, build_scene};
    use mixpour::sim::{
        PointerButton, PointerEvent, ShakerMode, SimState, TickInput, Tuning, tick,
    };

    /// Game instance holding all state
    struct Game {
        state: SimState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, width: f32, height: f32, settings: Settings) -> Self {
            let mut tuning = Tuning::default();
            settings.apply_to_tuning(&mut tuning);

            Self {
                state: SimState::new(width, height, seed, tuning),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                settings,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Events belong to the first substep only
                self.input.events.clear();
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state, self.settings.droplets);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Remaining shaker volume
            if let Some(el) = document
                .query_selector("#hud-volume .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&format!("{:.2}", self.state.shaker.volume)));
            }

            // Glass fill percentage
            if let Some(el) = document.query_selector("#hud-fill .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!(
                    "{:.0}%",
                    self.state.glass.fill_amount * 100.0
                )));
            }

            // FPS
            if self.settings.show_fps {
                if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Phase prompt
            if let Some(el) = document.get_element_by_id("phase-prompt") {
                let prompt = match self.state.shaker.mode {
                    ShakerMode::Shaking => "Drag side to side to shake",
                    ShakerMode::Moving => "Carry the shaker over the glass",
                    ShakerMode::Pouring => "Drag up to tilt and pour",
                };
                el.set_text_content(Some(prompt));
            }
        }
    }

    fn push_event(game: &Rc<RefCell<Game>>, event: PointerEvent) {
        game.borrow_mut().input.events.push(event);
    }

    fn mouse_button(event: &MouseEvent) -> PointerButton {
        if event.button() == 0 {
            PointerButton::Primary
        } else {
            PointerButton::Secondary
        }
    }

    fn setup_mouse_input(game: Rc<RefCell<Game>>, canvas: &HtmlCanvasElement) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                push_event(
                    &game,
                    PointerEvent::ButtonDown {
                        pos,
                        button: mouse_button(&event),
                    },
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                push_event(
                    &game,
                    PointerEvent::ButtonUp {
                        pos,
                        button: mouse_button(&event),
                    },
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                push_event(&game, PointerEvent::Moved { pos });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_input(game: Rc<RefCell<Game>>, canvas: &HtmlCanvasElement) {
        fn touch_pos(event: &TouchEvent, canvas: &HtmlCanvasElement) -> Option<Vec2> {
            let touch = event
                .touches()
                .get(0)
                .or_else(|| event.changed_touches().get(0))?;
            let rect = canvas.get_bounding_client_rect();
            Some(Vec2::new(
                touch.client_x() as f32 - rect.left() as f32,
                touch.client_y() as f32 - rect.top() as f32,
            ))
        }

        let events: [(&str, fn(Vec2) -> PointerEvent); 3] = [
            ("touchstart", |pos| PointerEvent::ButtonDown {
                pos,
                button: PointerButton::Primary,
            }),
            ("touchmove", |pos| PointerEvent::Moved { pos }),
            ("touchend", |pos| PointerEvent::ButtonUp {
                pos,
                button: PointerButton::Primary,
            }),
        ];

        for (name, make) in events {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&event, &canvas_ref) {
                    push_event(&game, make(pos));
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        web_sys::window()
            .expect("no window")
            .request_animation_frame(f.as_ref().unchecked_ref())
            .expect("requestAnimationFrame failed");
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mixpour starting...");

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

        // Initialize game; the scene is laid out in CSS pixels
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            client_w as f32,
            client_h as f32,
            settings,
        )));

        log::info!("Scene initialized with seed: {}", seed);

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

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (client_w as f32, client_h as f32),
        )
        .await;
        game.borrow_mut().render_state = Some(render_state);

        setup_mouse_input(game.clone(), &canvas);
        setup_touch_input(game.clone(), &canvas);

        // Frame loop
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();

        *g.borrow_mut() = Some(Closure::new(move |time: f64| {
            {
                let mut game = game.borrow_mut();
                let dt = if game.last_time > 0.0 {
                    ((time - game.last_time) / 1000.0) as f32
                } else {
                    0.0
                };
                game.last_time = time;

                game.update(dt, time);
                game.render();
                game.update_hud();
            }
            request_animation_frame(f.borrow().as_ref().unwrap());
        }));

        request_animation_frame(g.borrow().as_ref().unwrap());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mixpour (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_pour_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted shake/carry/pour driving the simulation end to end
#[cfg(not(target_arch = "wasm32"))]
fn headless_pour_demo() {
    use glam::Vec2;
    use mixpour::consts::SIM_DT;
    use mixpour::sim::{
        PointerButton, PointerEvent, ShakerMode, SimState, TickInput, Tuning, tick,
    };

    let mut state = SimState::new(1280.0, 720.0, 0xC0C7A11, Tuning::default());

    let step = |state: &mut SimState, events: Vec<PointerEvent>| {
        tick(state, &TickInput { events }, SIM_DT);
    };
    let down = |x: f32, y: f32| PointerEvent::ButtonDown {
        pos: Vec2::new(x, y),
        button: PointerButton::Primary,
    };
    let up = |x: f32, y: f32| PointerEvent::ButtonUp {
        pos: Vec2::new(x, y),
        button: PointerButton::Primary,
    };
    let moved = |x: f32, y: f32| PointerEvent::Moved {
        pos: Vec2::new(x, y),
    };

    // Shake hard enough to pass the threshold
    step(&mut state, vec![down(400.0, 400.0)]);
    for i in 0..30 {
        let x = if i % 2 == 0 { 460.0 } else { 340.0 };
        step(&mut state, vec![moved(x, 400.0)]);
    }
    step(&mut state, vec![up(400.0, 400.0)]);
    log::info!("After shaking: mode {:?}", state.shaker.mode);
    assert_eq!(state.shaker.mode, ShakerMode::Moving);

    // Carry the shaker over the glass
    let over_glass = state.glass.rect.center() - Vec2::new(20.0, 200.0);
    step(&mut state, vec![down(400.0, 400.0)]);
    step(&mut state, vec![moved(over_glass.x, over_glass.y)]);
    step(&mut state, vec![up(over_glass.x, over_glass.y)]);
    log::info!("After carrying: mode {:?}", state.shaker.mode);
    assert_eq!(state.shaker.mode, ShakerMode::Pouring);

    // Tilt to full pour
    step(&mut state, vec![down(over_glass.x, over_glass.y)]);
    step(&mut state, vec![moved(over_glass.x, over_glass.y - 400.0)]);
    step(&mut state, vec![up(over_glass.x, over_glass.y - 400.0)]);

    // Pour until the shaker runs dry
    let mut seconds = 0;
    while state.shaker.volume > 0.0 && seconds < 30 {
        for _ in 0..60 {
            step(&mut state, vec![]);
        }
        seconds += 1;
        log::info!(
            "t+{seconds}s: volume {:.2}, fill {:.0}%, stream points {}",
            state.shaker.volume,
            state.glass.fill_amount * 100.0,
            state.glass.stream.len()
        );
    }

    println!(
        "Poured dry in {seconds}s; glass at {:.0}%",
        state.glass.fill_amount * 100.0
    );
}
