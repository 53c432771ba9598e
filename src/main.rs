//! Prize Wheel entry point
//!
//! Web: wires the engine to `#wheelCanvas` and the draw endpoints.
//! Native: runs a scripted draw against a simulated draw service.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, MouseEvent, Request, RequestInit, Response};

    use prize_wheel::platform::{KeyValueStore, LocalStorageStore, MemoryStore};
    use prize_wheel::web::{CanvasSurface, apply_rest, apply_spin};
    use prize_wheel::wheel::{ApiResponse, client_to_surface};
    use prize_wheel::{
        DrawOutcome, RedemptionLedger, SectorSpec, WheelEngine, WheelError, WheelSettings,
    };

    const CONFIG_URL: &str = "/api/wheel/config";
    const SPIN_URL: &str = "/api/lottery/spin";
    /// Written by the login flow; we only read it
    const TOKEN_KEY: &str = "userToken";

    struct App {
        engine: WheelEngine,
        canvas: HtmlCanvasElement,
        surface: CanvasSurface,
        /// A draw request is out or a spin is playing
        busy: bool,
    }

    fn to_js(e: WheelError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    async fn fetch_text(method: &str, url: &str, token: Option<&str>) -> Result<String, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let init = RequestInit::new();
        init.set_method(method);
        let request = Request::new_with_str_and_init(url, &init)?;
        request.headers().set("Content-Type", "application/json")?;
        if let Some(token) = token {
            request
                .headers()
                .set("Authorization", &format!("Bearer {token}"))?;
        }

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;
        JsFuture::from(response.text()?)
            .await?
            .as_string()
            .ok_or_else(|| JsValue::from_str("response body is not text"))
    }

    fn set_button(enabled: bool, text: &str) {
        let Some(btn) = document()
            .and_then(|d| d.get_element_by_id("spinButton"))
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };
        btn.set_disabled(!enabled);
        btn.set_text_content(Some(text));
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        let document = document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("wheelCanvas")
            .ok_or("missing #wheelCanvas")?
            .dyn_into()?;

        let settings = match LocalStorageStore::open() {
            Ok(store) => WheelSettings::load(&store),
            Err(_) => WheelSettings::default(),
        };
        let mut ledger = match LocalStorageStore::open() {
            Ok(store) => RedemptionLedger::open(store, settings.ledger_capacity),
            Err(e) => {
                log::warn!("localStorage unavailable ({e}), history will not persist");
                RedemptionLedger::open(MemoryStore::new(), settings.ledger_capacity)
            }
        };
        ledger.set_error_hook(|e| web_sys::console::error_1(&JsValue::from_str(&e.to_string())));

        let mut engine = WheelEngine::new(settings, ledger);
        let body = fetch_text("GET", CONFIG_URL, None).await?;
        let specs: Vec<SectorSpec> = ApiResponse::from_json(&body).map_err(to_js)?;
        engine.load_config(specs).map_err(to_js)?;

        let mut surface = CanvasSurface::new(&canvas)?;
        engine.paint(&mut surface).map_err(to_js)?;
        render_history(&engine);

        let app = Rc::new(RefCell::new(App {
            engine,
            canvas,
            surface,
            busy: false,
        }));
        setup_hover(app.clone());
        setup_spin_button(app);

        log::info!("Prize wheel ready");
        Ok(())
    }

    fn setup_hover(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };
        let Some(tooltip) = document.get_element_by_id("wheelTooltip") else {
            return;
        };
        let canvas = app.borrow().canvas.clone();

        {
            let tooltip = tooltip.clone();
            let canvas_el = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_el.get_bounding_client_rect();
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let box_center = Vec2::new(
                    (rect.left() + rect.width() / 2.0) as f32,
                    (rect.top() + rect.height() / 2.0) as f32,
                );
                let size = Vec2::new(canvas_el.width() as f32, canvas_el.height() as f32);
                let point =
                    client_to_surface(client, box_center, canvas_el.offset_width() as f32, size);

                let app = app.borrow();
                match app.engine.hover(point, size) {
                    Some(spec) => {
                        tooltip.set_text_content(Some(&format!("{} · {}%", spec.label, spec.weight)));
                        // Tooltip follows the pointer in page space, not surface space
                        let _ = tooltip.set_attribute(
                            "style",
                            &format!(
                                "left: {}px; top: {}px",
                                event.page_x() + 15,
                                event.page_y() + 15
                            ),
                        );
                        let _ = tooltip.class_list().add_1("show");
                    }
                    None => {
                        let _ = tooltip.class_list().remove_1("show");
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let _ = tooltip.class_list().remove_1("show");
        });
        let _ =
            canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_spin_button(app: Rc<RefCell<App>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("spinButton")) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = spin(app.clone()).await {
                    let message = e.as_string().unwrap_or_else(|| format!("{e:?}"));
                    log::error!("Draw failed: {message}");
                    alert(&message);
                    app.borrow_mut().busy = false;
                    set_button(true, "Spin");
                }
            });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    async fn spin(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let mut app = app.borrow_mut();
            if app.busy {
                return Ok(());
            }
            app.busy = true;
        }
        set_button(false, "Spinning...");

        let token = LocalStorageStore::open()
            .ok()
            .and_then(|store| store.get(TOKEN_KEY).ok().flatten());
        let body = fetch_text("POST", SPIN_URL, token.as_deref()).await?;

        let (trajectory, canvas) = {
            let mut app = app.borrow_mut();
            let trajectory = app.engine.begin_draw_from_json(&body).map_err(to_js)?;
            (trajectory, app.canvas.clone())
        };
        // The engine is spinning from here on; always schedule the reveal
        if let Err(e) = apply_spin(&canvas, &trajectory) {
            log::warn!("Spin animation unavailable: {e:?}");
        }
        schedule_reveal(app, js_sys::Date::now(), trajectory.duration_ms);
        Ok(())
    }

    /// Reveal the outcome once the animation has fully played
    fn schedule_reveal(app: Rc<RefCell<App>>, started: f64, delay_ms: u32) {
        let Some(window) = web_sys::window() else { return };
        let callback = Closure::once_into_js(move || {
            let elapsed = js_sys::Date::now() - started;
            let result = app.borrow_mut().engine.finish_draw(elapsed);
            match result {
                Ok(outcome) => {
                    {
                        let mut app = app.borrow_mut();
                        let _ = apply_rest(&app.canvas, app.engine.rest_angle());
                        app.busy = false;
                        let App { engine, surface, .. } = &mut *app;
                        let _ = engine.paint(surface);
                        render_history(engine);
                    }
                    show_result(&outcome);
                    set_button(true, "Spin");
                }
                Err(WheelError::SpinStillRunning { remaining_ms }) => {
                    schedule_reveal(app, started, remaining_ms);
                }
                Err(e) => {
                    log::error!("Could not settle spin: {e}");
                    app.borrow_mut().busy = false;
                    set_button(true, "Spin");
                }
            }
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms as i32,
        ) {
            log::error!("Could not schedule reveal: {e:?}");
        }
    }

    fn show_result(outcome: &DrawOutcome) {
        let Some(document) = document() else { return };
        if let Some(el) = document.get_element_by_id("resultInfo") {
            el.set_text_content(Some(&outcome.label));
        }
        if let Some(el) = document.get_element_by_id("resultCdk") {
            el.set_text_content(Some(&format!("Code: {}", outcome.code)));
        }
        if let Some(el) = document.get_element_by_id("resultModal") {
            let _ = el.set_attribute("style", "display: flex");
        }
    }

    fn render_history(engine: &WheelEngine) {
        let Some(document) = document() else { return };
        let Some(list) = document.get_element_by_id("historyList") else {
            return;
        };
        list.set_text_content(None);

        if engine.ledger().is_empty() {
            list.set_text_content(Some("No history yet"));
            return;
        }
        for entry in engine.ledger().list() {
            let Ok(item) = document.create_element("div") else {
                continue;
            };
            item.set_class_name("history-item");
            item.set_text_content(Some(&format!(
                "{}  {}  {}",
                entry.label,
                entry.display_date(),
                entry.code
            )));
            let _ = list.append_child(&item);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    if let Err(e) = wasm_app::run().await {
        log::error!("Prize wheel failed to start: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Prize Wheel (native) starting...");

    if let Err(e) = native_demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native_demo {
    use std::path::PathBuf;

    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use prize_wheel::platform::FileStore;
    use prize_wheel::renderer::MeshSurface;
    use prize_wheel::wheel::{ApiResponse, REFERENCE_ANGLE};
    use prize_wheel::{
        DrawOutcome, RedemptionLedger, Result, SectorLayout, SectorSpec, WheelEngine,
        WheelSettings, polar_to_cartesian,
    };

    /// What `GET /api/wheel/config` returns for the demo wheel
    const DEMO_CONFIG: &str = r#"{"success": true, "data": [
        {"label": "10000x", "probability": 1,  "level": "jackpot", "times": 10000},
        {"label": "5000x",  "probability": 5,  "level": "major",   "times": 5000},
        {"label": "1000x",  "probability": 10, "level": "minor",   "times": 1000},
        {"label": "500x",   "probability": 15, "level": "small",   "times": 500},
        {"label": "200x",   "probability": 30, "level": "tiny",    "times": 200},
        {"label": "100x",   "probability": 39, "level": "common",  "times": 100}
    ]}"#;

    const SURFACE_SIZE: f32 = 500.0;
    const FRAME_STEP_MS: u32 = 500;

    fn data_dir() -> PathBuf {
        std::env::var_os("PRIZE_WHEEL_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".prize-wheel"))
    }

    /// Stand-in for the draw service: weighted pick plus a random code
    fn simulated_draw(layout: &SectorLayout, rng: &mut Pcg32) -> DrawOutcome {
        let roll = rng.random_range(0..100u32);
        let sector = layout
            .sectors()
            .iter()
            .find(|s| roll < s.cumulative_weight + s.spec.weight)
            .unwrap_or(&layout.sectors()[0]);

        DrawOutcome {
            tier: sector.spec.tier.clone(),
            label: sector.spec.label.clone(),
            code: format!("{:08X}-{:04X}", rng.random::<u32>(), rng.random::<u16>()),
            times: sector.spec.times,
            quota: sector.spec.times.map(|t| u64::from(t) * 500),
        }
    }

    pub fn run() -> Result<()> {
        let store = FileStore::new(data_dir());
        let settings = WheelSettings::load(&store);
        let ledger = RedemptionLedger::open(store.clone(), settings.ledger_capacity);
        let mut engine = WheelEngine::new(settings, ledger);

        let specs: Vec<SectorSpec> = ApiResponse::from_json(DEMO_CONFIG)?;
        engine.load_config(specs)?;

        let mut mesh = MeshSurface::new(SURFACE_SIZE, SURFACE_SIZE);
        engine.paint(&mut mesh)?;
        println!(
            "Painted {} triangles ({} bytes of vertices)",
            mesh.triangle_count(),
            mesh.vertex_bytes().len()
        );
        for run in mesh.text_runs() {
            println!(
                "  label {:>7} at ({:6.1}, {:6.1}) {:>4}px",
                run.text, run.position.x, run.position.y, run.font_px
            );
        }

        // Hover straight under the pointer
        let size = Vec2::splat(SURFACE_SIZE);
        let top = size / 2.0 + polar_to_cartesian(150.0, REFERENCE_ANGLE);
        if let Some(spec) = engine.hover(top, size) {
            println!("Under the pointer before the spin: {}", spec.label);
        }

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut rng = Pcg32::seed_from_u64(seed);
        let outcome = simulated_draw(engine.layout().ok_or(prize_wheel::WheelError::NotConfigured)?, &mut rng);

        let trajectory = engine.begin_draw(outcome)?;
        let mut elapsed = 0;
        while elapsed < trajectory.duration_ms {
            if let Some(rotation) = engine.frame(f64::from(elapsed)) {
                println!("  t={elapsed:>5}ms rotation={rotation:8.1}°");
            }
            elapsed += FRAME_STEP_MS;
        }

        let won = engine.finish_draw(f64::from(trajectory.duration_ms))?;
        println!("Landed on {} (code {})", won.label, won.code);
        if let Some(spec) = engine.hover(top, size) {
            println!("Under the pointer after the spin: {}", spec.label);
        }

        println!("History ({} kept):", engine.ledger().len());
        for entry in engine.ledger().list().iter().take(10) {
            println!("  {}  {:>7}  {}", entry.display_date(), entry.label, entry.code);
        }
        Ok(())
    }
}
