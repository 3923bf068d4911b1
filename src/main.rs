//! Arcade Cabinet entry point
//!
//! On the web this runs the Pac-Man match inside the page's animation loop.
//! Natively it plays a headless demo match driven by the autopilot.

use arcade_cabinet::sim::{Game, GhostMode};

/// Text rendering of the board, one character per tile
fn board_text(game: &Game) -> String {
    let (w, h, _, _) = game.maze.dimensions();
    let mut rows: Vec<Vec<char>> = (0..h)
        .map(|y| {
            (0..w)
                .map(|x| match game.maze.classify(x, y) {
                    arcade_cabinet::sim::TileKind::Wall => '#',
                    arcade_cabinet::sim::TileKind::Door => '-',
                    arcade_cabinet::sim::TileKind::Walkable => ' ',
                })
                .collect()
        })
        .collect();

    let mut put = |x: i32, y: i32, c: char| {
        if let Some(cell) = rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *cell = c;
        }
    };
    for item in game.collectibles.iter().filter(|c| c.alive) {
        let c = match item.kind {
            arcade_cabinet::sim::CollectibleKind::Dot => '.',
            arcade_cabinet::sim::CollectibleKind::Pill => 'o',
        };
        put(
            arcade_cabinet::tile_of(item.pos.x),
            arcade_cabinet::tile_of(item.pos.y),
            c,
        );
    }
    for ghost in &game.ghosts {
        let tile = ghost.tile();
        let c = match ghost.mode {
            GhostMode::Frightened => 'w',
            GhostMode::Returning => '"',
            _ => ghost.id.name().chars().next().unwrap_or('g').to_ascii_uppercase(),
        };
        put(tile.x, tile.y, c);
    }
    let tile = game.player.tile();
    put(tile.x, tile.y, if game.player.alive { 'C' } else { 'x' });

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{KeyboardEvent, Request, RequestInit, RequestMode, Response};

    use arcade_cabinet::consts::*;
    use arcade_cabinet::highscores::{GameId, ScoreReporter, ScoreSubmission};
    use arcade_cabinet::settings::Settings;
    use arcade_cabinet::sim::{Direction, Game, GameEvent, TickInput};

    /// Scores API endpoint
    const SCORES_URL: &str = "/api/scores";

    /// Browser-side wrapper around a match
    struct Session {
        game: Game,
        settings: Settings,
        reporter: ScoreReporter,
        accumulator: u64,
        last_time: f64,
        input: TickInput,
    }

    impl Session {
        fn new(game: Game, settings: Settings) -> Self {
            let reporter = ScoreReporter::new(GameId::Pacman, settings.player_name.clone());
            Self {
                game,
                settings,
                reporter,
                accumulator: 0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: u64) {
            let step = self.settings.tick_ms;
            self.accumulator += dt_ms.min(100);

            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                self.game.tick(&self.input, step);
                self.accumulator -= step;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.toggle_modal = false;
                self.input.quit = false;
            }

            for event in self.game.drain_events() {
                self.handle_event(event);
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::GameOver { score } => {
                    if !self.settings.submit_scores {
                        return;
                    }
                    if let Some(submission) = self.reporter.submission(score) {
                        wasm_bindgen_futures::spawn_local(submit_score(submission));
                    }
                }
                GameEvent::Message(text) => set_text("message", &text),
                GameEvent::Aborted(err) => set_text("message", &format!("Match aborted: {err}")),
                _ => {}
            }
        }

        fn update_hud(&self) {
            let hud = self.game.hud();
            set_text("hud-score", &hud.score.to_string());
            set_text("hud-lives", &hud.lives.to_string());
            set_text("hud-level", &hud.level.to_string());
            set_text("board", &super::board_text(&self.game));
            if self.game.state.message.is_none() {
                set_text("message", "");
            }
        }
    }

    fn set_text(id: &str, text: &str) {
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id));
        if let Some(el) = el {
            el.set_text_content(Some(text));
        }
    }

    /// POST the final score; failures are logged and dropped
    async fn submit_score(submission: ScoreSubmission) {
        match post_score(&submission).await {
            Ok(()) => log::info!("Submitted score {}", submission.score),
            Err(err) => log::warn!("Score submission failed: {err:?}"),
        }
    }

    async fn post_score(submission: &ScoreSubmission) -> Result<(), JsValue> {
        let body = serde_json::to_string(submission)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::SameOrigin);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(SCORES_URL, &opts)?;
        request.headers().set("Content-Type", "application/json")?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
        }
        Ok(())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }

        log::info!("Arcade Cabinet starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Game::with_settings(&settings, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game initialized with seed: {}", game.seed());

        let session = Rc::new(RefCell::new(Session::new(game, settings)));
        setup_input_handlers(session.clone())?;
        request_animation_frame(session);

        log::info!("Arcade Cabinet running!");
        Ok(())
    }

    fn setup_input_handlers(session: Rc<RefCell<Session>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut s = session.borrow_mut();
            let direction = match event.key().as_str() {
                "ArrowUp" | "w" | "W" => Direction::Up,
                "ArrowDown" | "s" | "S" => Direction::Down,
                "ArrowLeft" | "a" | "A" => Direction::Left,
                "ArrowRight" | "d" | "D" => Direction::Right,
                "Escape" => {
                    s.input.toggle_modal = true;
                    return;
                }
                "q" | "Q" if s.game.state.modal_open => {
                    s.input.quit = true;
                    return;
                }
                _ => return,
            };
            event.prevent_default();
            s.input.direction = direction;
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(session: Rc<RefCell<Session>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(session, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(session: Rc<RefCell<Session>>, time: f64) {
        {
            let mut s = session.borrow_mut();

            let dt_ms = if s.last_time > 0.0 {
                (time - s.last_time).max(0.0) as u64
            } else {
                SIM_DT_MS
            };
            s.last_time = time;

            s.update(dt_ms);
            s.update_hud();
            if s.game.is_closed() {
                log::info!("Left the match");
                return;
            }
        }

        request_animation_frame(session);
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
    log::info!("Arcade Cabinet (native) starting headless demo...");

    if let Err(err) = run_demo() {
        log::error!("Demo failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Longest demo match (five simulated minutes)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_MAX_TICKS: u64 = 5 * 60 * 1000 / arcade_cabinet::consts::SIM_DT_MS;

#[cfg(not(target_arch = "wasm32"))]
fn run_demo() -> Result<(), arcade_cabinet::MatchError> {
    use arcade_cabinet::autopilot::{InputSource, Wanderer};
    use arcade_cabinet::highscores::GameId;
    use arcade_cabinet::sim::{GameEvent, TickInput};
    use arcade_cabinet::{LocalScoreBoard, ScoreReporter, ScoreService, Settings};

    let settings = Settings::load();
    let fallback_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut game = Game::with_settings(&settings, fallback_seed)?;
    let mut pilot = Wanderer;
    let mut board = LocalScoreBoard::load();
    let mut reporter = ScoreReporter::new(GameId::Pacman, settings.player_name.clone());

    for _ in 0..DEMO_MAX_TICKS {
        let input = TickInput {
            direction: pilot.next_direction(&game),
            ..Default::default()
        };
        game.tick(&input, settings.tick_ms);

        for event in game.drain_events() {
            match event {
                GameEvent::LevelChanged(level) => println!("Level {level}"),
                GameEvent::LivesChanged(lives) => println!("Lives: {lives}"),
                GameEvent::Aborted(err) => return Err(err),
                _ => log::debug!("{event:?}"),
            }
        }
        if game.state.phase.is_terminal() {
            break;
        }
    }

    let hud = game.hud();
    game.teardown();
    println!("{}", board_text(&game));
    println!(
        "Final: score {} on level {} ({:?})",
        hud.score, hud.level, hud.phase
    );

    if settings.submit_scores {
        match reporter.report(&mut board, hud.score) {
            Some(Ok(record)) => println!("Recorded score #{} for {}", record.id, record.player_name),
            Some(Err(err)) => log::warn!("Score rejected: {err}"),
            None => log::info!("Nothing to submit"),
        }
        board.save();
    }
    if let Ok(stats) = board.stats(GameId::Pacman) {
        println!(
            "pacman: {} plays, best {}, average {:.0}",
            stats.total_plays, stats.best_score, stats.avg_score
        );
    }
    Ok(())
}
