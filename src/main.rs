//! Neon Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, Event, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent,
        MouseEvent, TouchEvent,
    };

    use glam::Vec2;
    use neon_dash::auth::{Identity, LoginStatus, Session};
    use neon_dash::leaderboard::{LocalBackend, QueryKey, SubmissionState};
    use neon_dash::platform::now_ms;
    use neon_dash::renderer::{RenderState, build_scene};
    use neon_dash::sim::TickOutcome;
    use neon_dash::{App, QualityPreset, Screen, Settings, Tuning, ui};

    /// Leaderboard/toast refresh period; the query cache decides what to refetch
    const POLL_INTERVAL_MS: i32 = 1000;

    /// Game instance holding all state
    struct Game {
        app: App<LocalBackend>,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        /// Pending requestAnimationFrame handle while playing
        frame_handle: Option<i32>,
        /// Screen at the last DOM sync
        shown_screen: Option<Screen>,
    }

    impl Game {
        fn new(app: App<LocalBackend>, canvas: HtmlCanvasElement) -> Self {
            Self {
                app,
                render_state: None,
                canvas,
                frame_handle: None,
                shown_screen: None,
            }
        }

        /// Viewport in CSS pixels
        fn viewport(&self) -> Vec2 {
            Vec2::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// Match the backing store to the displayed size
        fn sync_canvas_size(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
            }
            if let Some(ref mut render_state) = self.render_state {
                render_state.pixel_ratio = dpr as f32;
                if render_state.size != (width, height) {
                    render_state.resize(width, height);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let viewport = self.viewport();
            let vertices = build_scene(self.app.run(), viewport, &self.app.settings);
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

        /// Stop the frame loop, if one is scheduled
        fn cancel_frame(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let Some(hud) = self.app.hud() else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-speed") {
                if self.app.settings.show_speed {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-speed .hud-value").ok().flatten() {
                        val.set_text_content(Some(&ui::format_speed_multiplier(hud.speed_multiplier)));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }

        /// Show the overlays for the current screen; only on change
        fn update_screens(&mut self, document: &Document) {
            let screen = self.app.screen();
            if self.shown_screen == Some(screen) {
                return;
            }
            self.shown_screen = Some(screen);

            set_visible(document, "menu", screen == Screen::Menu);
            set_visible(document, "hud", screen == Screen::Playing);
            set_visible(document, "game-over", matches!(screen, Screen::GameOver { .. }));

            if let Screen::GameOver { score } = screen {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&score.to_string()));
                }
                if let Some(input) = name_input(document) {
                    input.set_value(&self.app.settings.last_player_name);
                }
            }
        }

        /// Login controls and the submission form
        fn update_session(&self, document: &Document) {
            let session = &self.app.session;
            let logged_in = session.is_logged_in();

            set_visible(document, "login-btn", !logged_in);
            set_visible(document, "logout-btn", logged_in);
            if let Some(el) = document.get_element_by_id("login-btn") {
                let label = if session.is_logging_in() { "Connecting..." } else { "Login" };
                el.set_text_content(Some(label));
            }
            if let Some(el) = document.get_element_by_id("connected-label") {
                let text = session.identity().map(ui::connected_label).unwrap_or_default();
                el.set_text_content(Some(&text));
            }
            if let Some(el) = document.get_element_by_id("login-error") {
                match &session.status {
                    LoginStatus::LoginError(msg) => {
                        el.set_text_content(Some(msg));
                        let _ = el.set_attribute("class", "error");
                    }
                    _ => {
                        let _ = el.set_attribute("class", "error hidden");
                    }
                }
            }

            let submitted = self.app.submission.has_submitted();
            set_visible(document, "submit-form", self.app.can_submit());
            set_visible(document, "login-prompt", !logged_in);
            set_visible(document, "submitted-label", submitted);
            if let Some(el) = document.get_element_by_id("submit-btn") {
                let label = match self.app.submission.state() {
                    SubmissionState::Pending => "Submitting...",
                    SubmissionState::Failed => "Retry",
                    _ => "Submit Score",
                };
                el.set_text_content(Some(label));
            }
        }

        /// Rebuild the leaderboard panel from the query cache
        fn update_leaderboard(&self, document: &Document) {
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            list.set_text_content(None);

            let status = self.app.cache.status(QueryKey::leaderboard());
            if let Some(el) = document.get_element_by_id("leaderboard-message") {
                match ui::leaderboard_message(&status) {
                    Some(msg) => {
                        el.set_text_content(Some(msg));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            let neon_dash::leaderboard::QueryStatus::Loaded(entries) = status else {
                return;
            };
            for row in ui::leaderboard_rows(entries) {
                let Ok(li) = document.create_element("li") else {
                    continue;
                };
                let _ = li.set_attribute("class", "leaderboard-row");
                for (class, text) in [
                    (row.class, row.rank.to_string()),
                    ("name", row.label),
                    ("date", row.date),
                    ("score", row.score),
                ] {
                    if let Ok(span) = document.create_element("span") {
                        let _ = span.set_attribute("class", class);
                        span.set_text_content(Some(&text));
                        let _ = li.append_child(&span);
                    }
                }
                let _ = list.append_child(&li);
            }
        }

        fn update_toasts(&self, document: &Document) {
            let Some(container) = document.get_element_by_id("toasts") else {
                return;
            };
            container.set_text_content(None);
            for notice in self.app.toasts.visible() {
                if let Ok(el) = document.create_element("div") {
                    let _ = el.set_attribute("class", notice.kind.css_class());
                    let _ = el.set_attribute("data-toast-id", &notice.id.to_string());
                    el.set_text_content(Some(&notice.message));
                    let _ = container.append_child(&el);
                }
            }
        }

        /// Everything outside the HUD
        fn update_panels(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            self.update_screens(&document);
            self.update_session(&document);
            self.update_leaderboard(&document);
            self.update_toasts(&document);
        }

        /// Poll the leaderboard and expire toasts
        fn poll(&mut self) {
            self.app.poll(now_ms());
            self.update_panels();
        }

        fn login(&mut self) {
            self.app.session.begin_login();
            let identity = Session::load_remembered().unwrap_or_else(|| Identity::generate(&mut rand::rng()));
            self.app.login_remembered(identity, Session::remember);
        }

        fn logout(&mut self) {
            Session::forget();
            self.app.logout();
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if visible {
                el.class_list().remove_1("hidden")
            } else {
                el.class_list().add_1("hidden")
            };
        }
    }

    fn name_input(document: &Document) -> Option<HtmlInputElement> {
        document.get_element_by_id("player-name")?.dyn_into().ok()
    }

    fn seed() -> u64 {
        js_sys::Date::now() as u64
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Dash starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let app = App::new(
            Tuning::load(),
            Settings::load(),
            Session::new(),
            Some(LocalBackend::load()),
        );
        let game = Rc::new(RefCell::new(Game::new(app, canvas.clone())));

        if let Some(identity) = Session::load_remembered() {
            game.borrow_mut().app.login(identity);
        }

        // Initialize WebGPU; the DOM flow keeps working without it
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match init_renderer(&instance, canvas.clone(), width, height, dpr as f32).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(game.clone())?;
        setup_quality_select(game.clone())?;
        setup_toast_dismiss(game.clone())?;
        setup_polling(game.clone())?;

        {
            let mut g = game.borrow_mut();
            g.poll();
            g.render();
        }

        log::info!("Neon Dash ready");
        Ok(())
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        pixel_ratio: f32,
    ) -> Result<RenderState, String> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, pixel_ratio)
            .await
            .map_err(|e| e.to_string())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() != "Space" {
                    return;
                }
                let mut g = game.borrow_mut();
                // Leave space alone in the name field
                if g.app.is_playing() {
                    event.prevent_default();
                    g.app.request_jump();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().app.request_jump();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().app.request_jump();
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let owner = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => owner.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            g.sync_canvas_size();

            let width = g.viewport().x;
            let outcome = g.app.frame(width);
            g.render();

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
            if outcome.is_some_and(|o| o.is_game_over()) {
                g.update_panels();
            }
            matches!(outcome, Some(TickOutcome::Running { .. }))
        };

        if keep_running {
            request_animation_frame(game);
        }
    }

    /// Bind a click handler to the element with `id`, if present
    fn on_click(id: &str, game: Rc<RefCell<Game>>, handler: fn(&Rc<RefCell<Game>>)) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler(&game));
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        on_click("start-btn", game.clone(), |game| {
            let started = {
                let mut g = game.borrow_mut();
                g.cancel_frame();
                let started = g.app.start_game(seed());
                g.update_panels();
                started
            };
            if started {
                request_animation_frame(game.clone());
            }
        })?;

        on_click("retry-btn", game.clone(), |game| {
            let restarted = {
                let mut g = game.borrow_mut();
                g.cancel_frame();
                let restarted = g.app.restart(seed());
                g.update_panels();
                restarted
            };
            if restarted {
                request_animation_frame(game.clone());
            }
        })?;

        on_click("menu-btn", game.clone(), |game| {
            let mut g = game.borrow_mut();
            g.cancel_frame();
            g.app.back_to_menu();
            g.update_panels();
            g.render();
        })?;

        on_click("login-btn", game.clone(), |game| {
            let mut g = game.borrow_mut();
            g.login();
            g.poll();
        })?;

        on_click("logout-btn", game.clone(), |game| {
            let mut g = game.borrow_mut();
            g.logout();
            g.update_panels();
        })?;

        on_click("submit-btn", game, |game| {
            let mut g = game.borrow_mut();
            let name = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| name_input(&d))
                .map(|input| input.value())
                .unwrap_or_default();
            if let Err(e) = g.app.submit_score(&name, now_ms()) {
                log::debug!("Submission not recorded: {}", e);
            }
            g.poll();
        })?;

        Ok(())
    }

    fn setup_quality_select(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let Some(select) = document
            .get_element_by_id("quality")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return Ok(());
        };
        select.set_value(game.borrow().app.settings.quality.as_str());

        let target = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            let Some(preset) = QualityPreset::parse(&target.value()) else {
                return;
            };
            let mut g = game.borrow_mut();
            g.app.set_quality(preset);
            g.render();
        });
        select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Clicking a toast dismisses it
    fn setup_toast_dismiss(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let Some(container) = document.get_element_by_id("toasts") else {
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let id = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("data-toast-id"))
                .and_then(|id| id.parse().ok());
            if let Some(id) = id {
                let mut g = game.borrow_mut();
                g.app.toasts.dismiss(id);
                g.update_panels();
            }
        });
        container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_polling(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut()>::new(move || {
            // Skip the tick if a handler is mid-update
            if let Ok(mut g) = game.try_borrow_mut() {
                g.poll();
            }
        });
        window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            POLL_INTERVAL_MS,
        )?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Dash (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a simple bot plays a few runs and submits its scores
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_dash::auth::{Identity, Session};
    use neon_dash::consts::*;
    use neon_dash::leaderboard::{LocalBackend, QueryKey, QueryStatus};
    use neon_dash::platform::now_ms;
    use neon_dash::sim::{SimState, TickOutcome};
    use neon_dash::{App, Screen, Settings, Tuning, ui};

    const VIEWPORT_WIDTH: f32 = 1280.0;
    const RUNS: u64 = 3;
    /// A bot that never crashes gives up after this many frames
    const MAX_RUN_FRAMES: u64 = 100_000;
    /// Frames of lookahead before an obstacle reaches the player
    const JUMP_LEAD_FRAMES: f32 = 9.0;

    /// Jump when the next obstacle is about to reach the player
    fn should_jump(run: &SimState) -> bool {
        let player_right = PLAYER_X + PLAYER_SIZE;
        run.obstacles.iter().any(|o| {
            let gap = o.x - player_right;
            gap > 0.0 && gap < run.speed * JUMP_LEAD_FRAMES
        })
    }

    /// Play the current run to its end. `None` if it is still going after `max_frames`.
    fn play_run(app: &mut App<LocalBackend>, max_frames: u64) -> Option<u64> {
        for _ in 0..max_frames {
            if app.run().is_some_and(should_jump) {
                app.request_jump();
            }
            if let Some(TickOutcome::GameOver { score }) = app.frame(VIEWPORT_WIDTH) {
                return Some(score);
            }
        }
        None
    }

    pub fn run() {
        let mut app = App::new(
            Tuning::load(),
            Settings::default(),
            Session::new(),
            Some(LocalBackend::new()),
        );
        let identity = Identity::generate(&mut rand::rng());
        println!("Playing as {}", identity);
        app.login(identity);

        for i in 0..RUNS {
            let seed = now_ms() as u64 ^ i;
            let started = match app.screen() {
                Screen::Menu => app.start_game(seed),
                _ => app.restart(seed),
            };
            if !started {
                break;
            }

            let Some(score) = play_run(&mut app, MAX_RUN_FRAMES) else {
                let score = app.hud().map_or(0, |h| h.score);
                println!("Run {}: stopped after {} frames at score {}", i + 1, MAX_RUN_FRAMES, score);
                app.back_to_menu();
                continue;
            };
            println!("Run {}: score {}", i + 1, score);

            if let Err(e) = app.submit_score(&format!("bot-{}", i + 1), now_ms()) {
                log::warn!("Submit failed: {}", e);
            }
        }

        app.poll(now_ms());
        println!("\nLeaderboard");
        match app.cache.status(QueryKey::leaderboard()) {
            QueryStatus::Loaded(entries) => {
                for row in ui::leaderboard_rows(entries) {
                    println!("{:>3}. {:<20} {:>8}  {}", row.rank, row.label, row.score, row.date);
                }
            }
            status => println!("{}", ui::leaderboard_message(&status).unwrap_or_default()),
        }
    }

}
