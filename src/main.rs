//! Meteor Storm entry point
//!
//! In the browser this wires the page controls to the simulation and runs
//! the animation loop. Natively it runs a headless storm and prints a
//! snapshot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, HtmlSelectElement};

    use meteor_storm::audio::SoundBoard;
    use meteor_storm::audio::web::WebAudio;
    use meteor_storm::overlay::{self, Overlay, OverlayBoard, OverlayTransition};
    use meteor_storm::present::{PresentationSink, route_events};
    use meteor_storm::renderer::{RenderState, build_scene};
    use meteor_storm::sim::{
        DestructionTier, FrameClock, Meteor, MeteorKind, Particle, SimEvent, Simulation,
        TickInput, Viewport,
    };
    use meteor_storm::{Settings, StormError};

    const CANVAS_ID: &str = "meteorCanvas";
    const STAR_COUNT: usize = 200;

    /// Canvas, overlays and labels of the page
    struct DomPresenter {
        document: Document,
        render_state: Option<RenderState>,
        overlays: OverlayBoard,
    }

    impl DomPresenter {
        fn new(document: Document) -> Self {
            Self {
                document,
                render_state: None,
                overlays: OverlayBoard::new(),
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// Attach a positioned effect element under `container`
        fn mount_effect(&self, container: &'static str, overlay: &Overlay) -> Result<(), StormError> {
            let parent = self
                .document
                .get_element_by_id(container)
                .ok_or(StormError::MissingElement(container))?;
            let Some(el) = create_div(&self.document, overlay.kind.css_class()) else {
                return Ok(());
            };
            el.set_id(&overlay.element_id());
            if let Some(rect) = overlay.rect {
                let style = el.style();
                let _ = style.set_property("left", &format!("{}px", rect.left));
                let _ = style.set_property("top", &format!("{}px", rect.top));
                let _ = style.set_property("width", &format!("{}px", rect.width));
                let _ = style.set_property("height", &format!("{}px", rect.height));
            }
            let _ = parent.append_child(&el);
            Ok(())
        }

        fn mount_notification(&self, overlay: &Overlay) -> Result<(), StormError> {
            let Some(parts) = overlay.kind.notification_parts() else {
                return Ok(());
            };
            let parent = self
                .document
                .get_element_by_id("notifications")
                .ok_or(StormError::MissingElement("notifications"))?;
            let Some(el) = create_div(&self.document, overlay.kind.css_class()) else {
                return Ok(());
            };
            el.set_id(&overlay.element_id());
            for (class, content) in parts {
                if let Some(child) = create_div(&self.document, class) {
                    child.set_text_content(Some(content));
                    let _ = el.append_child(&child);
                }
            }
            let _ = parent.append_child(&el);
            Ok(())
        }

        fn overlay_element(&self, id: u32) -> Option<Element> {
            self.document.get_element_by_id(&overlay::element_id(id))
        }

        /// Apply the overlay transitions due at `now_ms`
        fn advance_overlays(&mut self, now_ms: f64) {
            for transition in self.overlays.advance(now_ms) {
                match transition {
                    OverlayTransition::Reveal(id) => {
                        if let Some(el) = self.overlay_element(id) {
                            let _ = el.class_list().add_1("show");
                        }
                    }
                    OverlayTransition::Dismiss(id) => {
                        if let Some(el) = self.overlay_element(id) {
                            let _ = el.class_list().remove_1("show");
                        }
                    }
                    OverlayTransition::Remove(id) => {
                        if let Some(el) = self.overlay_element(id) {
                            el.remove();
                        }
                    }
                }
            }
        }
    }

    impl PresentationSink for DomPresenter {
        fn render_frame(&mut self, meteors: &[Meteor], particles: &[Particle], time_secs: f64) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(meteors, particles, render_state.viewport, time_secs);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    let viewport = render_state.viewport;
                    render_state.resize(w, h, viewport);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn show_flash(&mut self, x: f32, y: f32, size: f32) {
            let overlay = self.overlays.flash(x, y, size, js_sys::Date::now()).clone();
            if let Err(e) = self.mount_effect("impactEffects", &overlay) {
                log::warn!("{e}");
            }
        }

        fn show_shock_wave(&mut self, x: f32, y: f32, size: f32) {
            let overlay = self.overlays.shock_wave(x, y, size, js_sys::Date::now()).clone();
            if let Err(e) = self.mount_effect("shockWaves", &overlay) {
                log::warn!("{e}");
            }
        }

        fn show_notification(&mut self, title: &str, text: &str) {
            let overlay = self.overlays.notify(title, text, js_sys::Date::now()).clone();
            if let Err(e) = self.mount_notification(&overlay) {
                log::warn!("{e}");
            }
        }

        fn update_counters(&mut self, meteor_count: u32, impact_power: u64, tier: DestructionTier) {
            self.set_text("meteorCount", &meteor_count.to_string());
            self.set_text("impactPower", &impact_power.to_string());
            self.set_text("destructionLevel", tier.label());
        }

        fn clear_effects(&mut self) {
            for id in self.overlays.clear_effects() {
                if let Some(el) = self.overlay_element(id) {
                    el.remove();
                }
            }
        }

        fn set_session_active(&mut self, active: bool) {
            if let Some(el) = self.document.get_element_by_id("soundVisualizer") {
                let _ = el.class_list().toggle_with_force("active", active);
            }
        }

        fn set_sound_enabled(&mut self, enabled: bool) {
            if let Some(icon) = self.document.query_selector("#soundBtn .btn-icon").ok().flatten() {
                icon.set_text_content(Some(if enabled { "🔊" } else { "🔇" }));
            }
        }
    }

    /// App instance holding all state
    struct App {
        sim: Simulation,
        clock: FrameClock,
        presenter: DomPresenter,
        sound: SoundBoard,
    }

    impl App {
        fn route(&mut self, events: &[SimEvent]) {
            route_events(events, &self.sim, &mut self.presenter, &mut self.sound);
        }

        /// Route the events queued by a control call right away
        fn flush(&mut self) {
            let events = self.sim.drain_events();
            self.route(&events);
        }

        fn frame(&mut self, now_ms: f64) {
            let dt = self.clock.advance(now_ms);
            let input = TickInput {
                time_secs: js_sys::Date::now() / 1000.0,
            };
            let events = self.sim.tick(&input, dt);
            self.route(&events);

            self.presenter.advance_overlays(js_sys::Date::now());
            self.presenter
                .render_frame(self.sim.meteors(), self.sim.particles(), input.time_secs);
        }

        fn apply_settings(&mut self, settings: Settings) {
            self.sim.configure(settings);
            self.flush();
        }
    }

    fn create_div(document: &Document, class: &str) -> Option<HtmlElement> {
        let el: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_class_name(class);
        Some(el)
    }

    fn element(document: &Document, id: &'static str) -> Result<Element, StormError> {
        document
            .get_element_by_id(id)
            .ok_or(StormError::MissingElement(id))
    }

    fn typed_element<T: JsCast>(document: &Document, id: &'static str) -> Result<T, StormError> {
        element(document, id)?
            .dyn_into::<T>()
            .map_err(|_| StormError::MissingElement(id))
    }

    fn listen(target: &web_sys::EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Canvas size in CSS pixels and device pixels
    fn measure(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let viewport = Viewport::new(client_w as f32, client_h as f32);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (viewport, width, height)
    }

    fn create_star_field(document: &Document) -> Result<(), StormError> {
        let field = element(document, "starField")?;
        for _ in 0..STAR_COUNT {
            let Some(star) = create_div(document, "star") else {
                continue;
            };
            let size = rand::random::<f32>() * 2.0 + 1.0;
            let style = star.style();
            let _ = style.set_property("left", &format!("{}%", rand::random::<f32>() * 100.0));
            let _ = style.set_property("top", &format!("{}%", rand::random::<f32>() * 100.0));
            let _ = style.set_property("width", &format!("{size}px"));
            let _ = style.set_property("height", &format!("{size}px"));
            let _ = style.set_property("animation-delay", &format!("{}s", rand::random::<f32>() * 3.0));
            let _ = field.append_child(&star);
        }
        Ok(())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Meteor Storm starting...");

        if let Err(e) = start().await {
            log::error!("Meteor Storm failed to start: {e}");
        }
    }

    async fn start() -> Result<(), StormError> {
        let window = web_sys::window().ok_or(StormError::MissingElement("window"))?;
        let document = window.document().ok_or(StormError::MissingElement("document"))?;

        let canvas: HtmlCanvasElement = typed_element(&document, CANVAS_ID)?;
        let (viewport, width, height) = measure(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        create_star_field(&document)?;

        let sound = match WebAudio::new() {
            Ok(audio) => SoundBoard::new(Box::new(audio)),
            Err(e) => {
                log::warn!("{e}; continuing without sound");
                SoundBoard::silent()
            }
        };

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            sim: Simulation::new(seed, viewport),
            clock: FrameClock::new(),
            presenter: DomPresenter::new(document.clone()),
            sound,
        }));

        log::info!("Storm initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StormError::Gpu(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StormError::Gpu(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, viewport).await?;
        app.borrow_mut().presenter.render_state = Some(render_state);

        setup_buttons(&document, app.clone())?;
        setup_settings_controls(&document, app.clone())?;
        setup_resize(&window, canvas, app.clone());

        request_animation_frame(app);

        log::info!("Meteor Storm running!");
        Ok(())
    }

    fn bind_button(
        document: &Document,
        id: &'static str,
        app: Rc<RefCell<App>>,
        action: fn(&mut Simulation),
    ) -> Result<(), StormError> {
        let btn = element(document, id)?;
        listen(&btn, "click", move |_| {
            let mut app = app.borrow_mut();
            action(&mut app.sim);
            app.flush();
        });
        Ok(())
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) -> Result<(), StormError> {
        bind_button(document, "startBtn", app.clone(), Simulation::start)?;
        bind_button(document, "stopBtn", app.clone(), Simulation::stop)?;
        bind_button(document, "resetBtn", app.clone(), Simulation::reset)?;
        bind_button(document, "soundBtn", app, Simulation::toggle_sound)
    }

    fn setup_settings_controls(document: &Document, app: Rc<RefCell<App>>) -> Result<(), StormError> {
        // Meteor type
        {
            let select: HtmlSelectElement = typed_element(document, "meteorType")?;
            let app = app.clone();
            let select_clone = select.clone();
            listen(&select, "change", move |_| {
                match select_clone.value().parse::<MeteorKind>() {
                    Ok(kind) => {
                        let mut app = app.borrow_mut();
                        let settings = Settings {
                            meteor_kind: kind,
                            ..*app.sim.settings()
                        };
                        app.apply_settings(settings);
                    }
                    Err(e) => log::warn!("{e}"),
                }
            });
        }

        // Intensity slider
        {
            let slider: HtmlInputElement = typed_element(document, "intensity")?;
            let label = element(document, "intensityValue")?;
            let app = app.clone();
            let slider_clone = slider.clone();
            listen(&slider, "input", move |_| {
                let mut app = app.borrow_mut();
                let mut settings = *app.sim.settings();
                match settings.apply_intensity_str(&slider_clone.value()) {
                    Ok(level) => {
                        label.set_text_content(Some(&level.to_string()));
                        app.apply_settings(settings);
                    }
                    Err(e) => log::warn!("{e}"),
                }
            });
        }

        // Meteor size slider
        {
            let slider: HtmlInputElement = typed_element(document, "meteorSize")?;
            let label = element(document, "sizeValue")?;
            let slider_clone = slider.clone();
            listen(&slider, "input", move |_| {
                let mut app = app.borrow_mut();
                let mut settings = *app.sim.settings();
                match settings.apply_meteor_size_str(&slider_clone.value()) {
                    Ok(level) => {
                        label.set_text_content(Some(&level.to_string()));
                        app.apply_settings(settings);
                    }
                    Err(e) => log::warn!("{e}"),
                }
            });
        }

        Ok(())
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window_clone = window.clone();
        listen(window, "resize", move |_| {
            let (viewport, width, height) = measure(&window_clone, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut app = app.borrow_mut();
            app.sim.resize(viewport);
            if let Some(ref mut render_state) = app.presenter.render_state {
                render_state.resize(width, height, viewport);
            }
        });
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            animation_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn animation_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use meteor_storm::consts::NOMINAL_DT;
    use meteor_storm::sim::{SimEvent, Simulation, TickInput, Viewport};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(42);
    let seconds = args.next().and_then(|s| s.parse::<f64>().ok()).unwrap_or(30.0);

    log::info!("Meteor Storm (headless) seed={seed} seconds={seconds}");

    let mut sim = Simulation::new(seed, Viewport::new(1280.0, 720.0));
    sim.start();

    let ticks = (seconds / NOMINAL_DT as f64).round() as u64;
    for tick in 0..ticks {
        let input = TickInput {
            time_secs: tick as f64 * NOMINAL_DT as f64,
        };
        for event in sim.tick(&input, NOMINAL_DT) {
            if let SimEvent::TierChanged { tier } = event {
                log::info!("t={:.1}s destruction level {}", input.time_secs, tier);
            }
        }
    }

    match serde_json::to_string_pretty(&sim.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
