//! Prize Wheel entry point
//!
//! Browser: drives the wheel view (canvas, buttons, winner modal) from a
//! requestAnimationFrame loop. Native: runs a headless draw over an entry
//! file and prints the winners.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use prize_wheel::effects::Celebration;
    use prize_wheel::platform::web::{self, CanvasSurface, HtmlImageLoader};
    use prize_wheel::renderer::{RenderGeneration, render};
    use prize_wheel::sim::{Command, WheelEngine, WheelEvent};
    use prize_wheel::{ConfigurationMissingError, EngineSettings, WheelLaunch};

    thread_local! {
        /// Running wheel view, for the exported JS hooks
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// Wheel view state
    struct App {
        engine: WheelEngine,
        surface: CanvasSurface,
        generation: RenderGeneration,
        effects_rng: Pcg32,
        last_time: f64,
    }

    impl App {
        fn apply(&mut self, command: Command) {
            let events = self.engine.handle(command);
            self.dispatch(events);
            self.sync_controls();
        }

        /// One animation frame: advance timers (a long gap counts as one
        /// clamped step), then move the wheel
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0)
            } else {
                0.0
            };
            self.last_time = time;

            let events = self.engine.advance_frame(dt);
            self.dispatch(events);
            self.surface.set_rotation(self.engine.display_rotation());
            self.sync_controls();
        }

        fn dispatch(&mut self, events: Vec<WheelEvent>) {
            for event in events {
                match event {
                    WheelEvent::SpinStarted {
                        target_index,
                        to_rotation,
                        ..
                    } => {
                        log::debug!("Spin toward segment {} ({:.1} deg)", target_index, to_rotation);
                        web::set_hidden("winner-modal", true);
                    }
                    WheelEvent::WinnerResolved {
                        winner,
                        number,
                        remaining,
                    } => {
                        web::set_text("winner-name", &winner);
                        web::set_text("winner-number", &format!("Winner #{}", number));
                        let more = if remaining > 0 {
                            format!("{} more to draw", remaining)
                        } else {
                            String::new()
                        };
                        web::set_text("winner-remaining", &more);
                        web::set_hidden("winner-list", true);
                        web::set_hidden("winner-modal", false);
                    }
                    WheelEvent::Celebrate(effect) => {
                        if let Some(burst) = Celebration::for_effect(effect, &mut self.effects_rng) {
                            if let Err(e) = web::spawn_celebration(&burst) {
                                log::warn!("Celebration failed: {:?}", e);
                            }
                        }
                    }
                    WheelEvent::EntriesChanged(entries) => self.redraw(entries),
                    WheelEvent::SequenceComplete { winners } => {
                        web::set_text("winner-list", &winners.join("\n"));
                        web::set_hidden("winner-list", winners.len() < 2);
                    }
                    WheelEvent::AnnouncementDismissed => web::set_hidden("winner-modal", true),
                    WheelEvent::ResetStarted | WheelEvent::ResetFinished => {}
                }
            }
        }

        /// Kick off a render; any render still waiting on images goes stale
        fn redraw(&self, entries: Vec<String>) {
            let mut surface = self.surface.clone();
            let customization = self.engine.customization().clone();
            let margin = self.engine.settings().wheel_margin;
            let token = self.generation.begin();
            wasm_bindgen_futures::spawn_local(async move {
                let report = render(
                    &mut surface,
                    &HtmlImageLoader,
                    &entries,
                    &customization,
                    margin,
                    &token,
                )
                .await;
                log::debug!("Wheel drawn: {:?}", report);
            });
        }

        fn sync_controls(&self) {
            web::set_disabled("spin-btn", !self.engine.can_spin());
            web::set_disabled("reset-btn", !self.engine.can_reset());
        }

        fn apply_customization(&self) {
            let c = self.engine.customization();
            web::set_text("wheel-title", &c.title);
            web::set_text("additional-text", &c.additional_text);
            web::set_hidden("additional-text", c.additional_text.is_empty());
            web::apply_button_style("spin-btn", &c.primary_button_style());
            web::apply_button_style("reset-btn", &c.secondary_button_style());
        }
    }

    /// Navigation state handed over by the configuration view
    fn launch_state() -> Result<WheelLaunch, ConfigurationMissingError> {
        let json = web_sys::window()
            .and_then(|w| w.history().ok())
            .and_then(|h| h.state().ok())
            .filter(|v| !v.is_null() && !v.is_undefined())
            .and_then(|v| js_sys::JSON::stringify(&v).ok())
            .map(String::from);
        WheelLaunch::from_state_json(json.as_deref())
    }

    fn settings_for(canvas: &HtmlCanvasElement) -> EngineSettings {
        match canvas.get_attribute("data-settings") {
            Some(json) => EngineSettings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring bad data-settings ({}), using defaults", e);
                EngineSettings::default()
            }),
            None => EngineSettings::default(),
        }
    }

    fn with_app(f: impl FnOnce(&mut App)) {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                f(&mut app.borrow_mut());
            }
        });
    }

    fn on_click(id: &str, command: Command) {
        let Some(el) = web::element(id) else {
            log::warn!("#{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let command = command.clone();
            with_app(|app| app.apply(command));
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let command = match event.key().as_str() {
                " " | "Enter" => Command::RequestSpin,
                "Escape" => Command::DismissWinner,
                "r" | "R" => Command::RequestReset,
                _ => return,
            };
            event.prevent_default();
            with_app(|app| app.apply(command));
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Prize Wheel starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let launch = match launch_state() {
            Ok(launch) => launch,
            Err(e) => {
                log::warn!("{}, returning to configuration", e);
                window.location().set_href("/")?;
                return Ok(());
            }
        };

        let canvas: HtmlCanvasElement = web::element("wheel-canvas")
            .ok_or_else(|| JsValue::from_str("no #wheel-canvas"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("#wheel-canvas is not a canvas"))?;
        let settings = settings_for(&canvas);
        let surface = CanvasSurface::new(canvas, settings.canvas_size)?;

        let seed = js_sys::Date::now() as u64;
        let entries = launch.entries.clone();
        let app = Rc::new(RefCell::new(App {
            engine: WheelEngine::new(launch, settings, seed),
            surface,
            generation: RenderGeneration::new(),
            effects_rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
            last_time: 0.0,
        }));
        log::info!("Wheel ready with {} entries (seed {})", entries.len(), seed);

        {
            let a = app.borrow();
            a.apply_customization();
            a.redraw(entries);
            a.sync_controls();
        }
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        on_click("spin-btn", Command::RequestSpin);
        on_click("reset-btn", Command::RequestReset);
        on_click("winner-close", Command::DismissWinner);
        setup_keyboard()?;

        web::set_hidden("loading", true);
        request_animation_frame(app);
        Ok(())
    }

    /// Programmatic spin (same rules as the button)
    #[wasm_bindgen]
    pub fn trigger_spin() {
        with_app(|app| app.apply(Command::RequestSpin));
    }

    #[wasm_bindgen]
    pub fn trigger_reset() {
        with_app(|app| app.apply(Command::RequestReset));
    }

    /// Text for the copy-to-clipboard button
    #[wasm_bindgen]
    pub fn winner_clipboard_text() -> Option<String> {
        let mut text = None;
        with_app(|app| text = app.engine.clipboard_text());
        text
    }

    /// Text for the "Copy All" button; available from the second winner on
    #[wasm_bindgen]
    pub fn all_winners_clipboard_text() -> Option<String> {
        let mut text = None;
        with_app(|app| text = app.engine.all_winners_text());
        text
    }

    /// Leaving the wheel view: stop every pending timer
    #[wasm_bindgen]
    pub fn end_session() {
        with_app(|app| app.engine.end_session());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::Read;

    use futures::FutureExt;
    use futures::executor::block_on;
    use futures::future::{self, LocalBoxFuture};

    use prize_wheel::assets::{ImageLoader, ImageRef};
    use prize_wheel::customization::Customization;
    use prize_wheel::entries::EntryImport;
    use prize_wheel::renderer::{RecordingSurface, RenderGeneration, SizedImage, render};
    use prize_wheel::sim::{Command, WheelEngine, WheelEvent};
    use prize_wheel::{AssetError, EngineSettings, WheelError, WheelLaunch};

    const USAGE: &str = "usage: prize-wheel [ENTRIES_FILE] [--winners N] [--seed N] [--labels]";

    /// Headless hosts have no image decoder
    struct NoImages;

    impl ImageLoader for NoImages {
        type Image = SizedImage;

        fn load(&self, src: &ImageRef) -> LocalBoxFuture<'static, Result<SizedImage, AssetError>> {
            future::ready(Err(AssetError::LoadFailed {
                src: src.to_string(),
                reason: "no image decoder in headless mode".into(),
            }))
            .boxed_local()
        }
    }

    struct Options {
        path: Option<String>,
        winners: i64,
        seed: Option<u64>,
        labels: bool,
    }

    fn parse_args(args: Vec<String>) -> Result<Options, String> {
        let mut options = Options {
            path: None,
            winners: 1,
            seed: None,
            labels: false,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--winners" | "-n" => {
                    let value = args.next().ok_or(USAGE)?;
                    options.winners = value.parse().map_err(|_| format!("bad winner count {value:?}"))?;
                }
                "--seed" => {
                    let value = args.next().ok_or(USAGE)?;
                    options.seed = Some(value.parse().map_err(|_| format!("bad seed {value:?}"))?);
                }
                "--labels" => options.labels = true,
                "-h" | "--help" => return Err(USAGE.to_string()),
                _ if options.path.is_none() && !arg.starts_with('-') => options.path = Some(arg),
                _ => return Err(USAGE.to_string()),
            }
        }
        Ok(options)
    }

    fn read_entries(path: Option<&str>) -> Result<EntryImport, Box<dyn std::error::Error>> {
        let import = match path {
            Some(path) => {
                let size = std::fs::metadata(path)?.len();
                let contents = std::fs::read_to_string(path)?;
                EntryImport::from_file(&contents, size).map_err(WheelError::from)?
            }
            None => {
                let mut contents = String::new();
                std::io::stdin().read_to_string(&mut contents)?;
                EntryImport::from_text(&contents).map_err(WheelError::from)?
            }
        };
        Ok(import)
    }

    pub fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
        let options = parse_args(args)?;
        let import = read_entries(options.path.as_deref())?;

        let mut customization = Customization::default();
        customization.set_number_of_winners(options.winners);
        let launch = WheelLaunch::new(import.entries, customization).map_err(WheelError::from)?;

        let settings = EngineSettings::default();
        let seed = options.seed.unwrap_or_else(rand::random);
        log::info!("Prize Wheel (native) seed {}", seed);

        if options.labels {
            let surface = RecordingSurface::new(settings.canvas_size, settings.canvas_size);
            let mut writer = surface.clone();
            let generation = RenderGeneration::new();
            block_on(render(
                &mut writer,
                &NoImages,
                &launch.entries,
                &launch.customization,
                settings.wheel_margin,
                &generation.begin(),
            ));
            for label in surface.texts() {
                println!("label: {}", label);
            }
        }

        let mut engine = WheelEngine::new(launch, settings, seed);
        let mut events = engine.handle(Command::RequestSpin);
        loop {
            for event in events {
                if let WheelEvent::WinnerResolved { winner, number, .. } = event {
                    println!("{}. {}", number, winner);
                }
            }
            match engine.next_due_in() {
                Some(dt) => events = engine.tick(dt),
                None => break,
            }
        }

        if let Some(text) = engine.clipboard_text() {
            log::info!("Winners:\n{}", text);
        }
        Ok(())
    }
}
