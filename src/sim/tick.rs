//! Fixed timestep match orchestrator
//!
//! [`Game`] owns the maze, the entities, the match state and every pending
//! timer, and advances them in a fixed order each tick:
//!
//! 1. modal / closed check
//! 2. due timers (ghost releases, level advance, message dismissal)
//! 3. level-transition freeze, death animation and respawn
//! 4. player, then overlap dispatch
//! 5. ghosts, then exit gating
//! 6. scatter/chase schedule
//! 7. level completion

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{BodyId, Outcome, OverlapBindings, dispatch};
use super::ghost::{Ghost, GhostContext, GhostId, GhostMode, GhostSignal};
use super::maze::{Collectible, Maze};
use super::motion::Direction;
use super::player::Player;
use super::schedule::{GlobalMode, ScheduleEvent};
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::{Task, Timers};
use crate::consts::*;
use crate::error::MatchError;
use crate::settings::Settings;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested direction from the input source
    pub direction: Direction,
    /// Open or close the exit-confirmation modal
    pub toggle_modal: bool,
    /// Leave the match (confirmed exit to menu)
    pub quit: bool,
}

/// Snapshot for the host's score/lives/level display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub dots_remaining: u32,
    pub phase: GamePhase,
}

/// One match of Pac-Man
#[derive(Debug, Clone)]
pub struct Game {
    pub state: GameState,
    pub maze: Maze,
    pub collectibles: Vec<Collectible>,
    pub player: Player,
    /// Ordered by [`GhostId::index`]
    pub ghosts: Vec<Ghost>,
    bindings: OverlapBindings,
    timers: Timers,
    rng: Pcg32,
    seed: u64,
    now_ms: u64,
    next_body: u32,
    closed: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// New match on the standard maze
    pub fn new(seed: u64) -> Result<Self, MatchError> {
        Ok(Self::with_maze(Maze::standard()?, seed, STARTING_LIVES))
    }

    /// New match configured from player settings
    pub fn with_settings(settings: &Settings, fallback_seed: u64) -> Result<Self, MatchError> {
        let settings = settings.validated();
        let seed = settings.seed.unwrap_or(fallback_seed);
        Ok(Self::with_maze(Maze::standard()?, seed, settings.starting_lives))
    }

    /// New match on any maze
    pub fn with_maze(maze: Maze, seed: u64, lives: u8) -> Self {
        let collectibles = maze.spawn_collectibles();
        let state = GameState::new(lives, collectibles.len() as u32, 0);
        let player = Player::spawn(BodyId(0), &maze);
        let ghosts = GhostId::ALL
            .iter()
            .zip(1u32..)
            .map(|(&id, body)| Ghost::new(id, BodyId(body), &maze))
            .collect();

        let mut game = Self {
            state,
            maze,
            collectibles,
            player,
            ghosts,
            bindings: OverlapBindings::default(),
            timers: Timers::default(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            now_ms: 0,
            next_body: GhostId::ALL.len() as u32 + 1,
            closed: false,
            events: Vec::new(),
        };
        game.spawn_player();
        game.start_round(false);
        log::info!(
            "Match started (seed {seed}, {} dots, {lives} lives)",
            game.state.total_dots
        );
        game
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Match clock in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn ghost(&self, id: GhostId) -> &Ghost {
        &self.ghosts[id.index()]
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn bound_player(&self) -> Option<BodyId> {
        self.bindings.bound()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score,
            lives: self.state.lives,
            level: self.state.level,
            dots_remaining: self.state.dots_remaining,
            phase: self.state.phase,
        }
    }

    /// Take the notifications queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the match by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt_ms: u64) {
        if self.closed {
            return;
        }
        if input.quit {
            self.teardown();
            return;
        }
        if input.toggle_modal {
            self.state.modal_open = !self.state.modal_open;
            log::debug!("Exit modal {}", if self.state.modal_open { "shown" } else { "hidden" });
        }
        if self.state.modal_open || self.state.phase.is_terminal() {
            return;
        }

        self.now_ms += dt_ms;
        if let Err(err) = self.step(input, dt_ms) {
            self.abort(err);
        }
    }

    fn step(&mut self, input: &TickInput, dt_ms: u64) -> Result<(), MatchError> {
        for task in self.timers.take_due(self.now_ms) {
            self.run_task(task)?;
        }

        match self.state.phase {
            GamePhase::LevelTransition => return Ok(()),
            GamePhase::Dying => {
                if self.player.death_finished() {
                    self.finish_death();
                } else {
                    self.player.update_death(dt_ms);
                }
                return Ok(());
            }
            GamePhase::GameOver | GamePhase::Aborted => return Ok(()),
            GamePhase::Playing => {}
        }

        let score_before = self.state.score;
        self.player.update(input.direction, &self.maze);
        self.resolve_contacts();
        if self.state.score != score_before {
            self.events.push(GameEvent::ScoreChanged(self.state.score));
        }
        if self.state.phase == GamePhase::Dying {
            return Ok(());
        }

        self.update_ghosts()?;
        self.gate_exits();
        self.advance_schedule();

        if self.state.dots_remaining == 0 && !self.state.level_complete {
            self.complete_level()?;
        }
        Ok(())
    }

    fn resolve_contacts(&mut self) {
        let contacts = self
            .bindings
            .detect(&self.player, &self.collectibles, &self.ghosts);
        for contact in contacts {
            match dispatch(contact, &mut self.state, &mut self.collectibles, &mut self.ghosts) {
                Outcome::PillEaten => self.enter_frightened(),
                Outcome::GhostEaten(id) => {
                    log::info!("{} eaten", id.name());
                    self.events.push(GameEvent::GhostEaten(id));
                }
                // Clearing the last dot wins over a simultaneous catch
                Outcome::PlayerCaught(id) if self.state.dots_remaining > 0 => {
                    self.kill_player(id);
                    return;
                }
                _ => {}
            }
        }
    }

    fn enter_frightened(&mut self) {
        self.state.schedule.enter_frightened(self.now_ms);
        for ghost in &mut self.ghosts {
            ghost.frighten();
        }
        log::info!("Power pill: ghosts frightened until {:?}ms", self.state.schedule.deadline_ms());
    }

    fn update_ghosts(&mut self) -> Result<(), MatchError> {
        let leader = &self.ghosts[GhostId::Blinky.index()];
        let leader_pos = leader.is_roaming().then(|| leader.pos());
        let ctx = GhostContext {
            maze: &self.maze,
            player_pos: self.player.pos(),
            player_facing: self.player.facing,
            leader_pos,
            global: self.state.schedule.current_mode(),
            frightened: self.state.schedule.is_paused(),
            dots_remaining: self.state.dots_remaining,
            level: self.state.level,
            now_ms: self.now_ms,
        };

        let mut arrived = Vec::new();
        for ghost in &mut self.ghosts {
            if ghost.update(&ctx, &mut self.rng) == GhostSignal::ReachedHome {
                arrived.push(ghost.id);
            }
        }
        for id in arrived {
            let delay = self
                .rng
                .random_range(GHOST_EXIT_DELAY_MIN_MS..=GHOST_EXIT_DELAY_MAX_MS);
            self.timers.schedule(self.now_ms + delay, Task::ReleaseGhost(id))?;
            log::debug!("{} leaves again in {delay}ms", id.name());
        }
        Ok(())
    }

    fn gate_exits(&mut self) {
        if self.state.flanker_due() {
            self.state.flanker_released = true;
            if self.ghosts[GhostId::Inky.index()].exit_home() {
                log::info!("inky released after {} dots", self.state.dots_eaten);
            }
        }
        if self.state.opportunist_due() {
            self.state.opportunist_released = true;
            if self.ghosts[GhostId::Clyde.index()].exit_home() {
                log::info!("clyde released with {} dots left", self.state.dots_remaining);
            }
        }
    }

    fn advance_schedule(&mut self) {
        match self.state.schedule.update(self.now_ms) {
            Some(ScheduleEvent::Entered(GlobalMode::Chase)) => {
                log::info!("Schedule step {}: chase", self.state.schedule.index());
                self.ghosts.iter_mut().for_each(Ghost::order_attack);
            }
            Some(ScheduleEvent::Entered(GlobalMode::Scatter)) => {
                log::info!("Schedule step {}: scatter", self.state.schedule.index());
                self.ghosts.iter_mut().for_each(Ghost::order_scatter);
            }
            Some(ScheduleEvent::FrightenedEnded) => {
                log::info!("Frightened mode over");
                self.ghosts.iter_mut().for_each(Ghost::calm);
            }
            None => {}
        }
    }

    fn run_task(&mut self, task: Task) -> Result<(), MatchError> {
        match task {
            Task::ReleaseGhost(id) => {
                if self.state.phase == GamePhase::Playing && self.ghosts[id.index()].exit_home() {
                    log::debug!("{} released", id.name());
                }
            }
            Task::AdvanceLevel => self.advance_level()?,
            Task::DismissMessage => self.state.message = None,
        }
        Ok(())
    }

    fn show_message(&mut self, text: String) -> Result<(), MatchError> {
        self.timers.cancel_where(|t| *t == Task::DismissMessage);
        self.timers.schedule(self.now_ms + MESSAGE_MS, Task::DismissMessage)?;
        self.events.push(GameEvent::Message(text.clone()));
        self.state.message = Some(text);
        Ok(())
    }

    fn complete_level(&mut self) -> Result<(), MatchError> {
        let level = self.state.level;
        self.state.level_complete = true;
        self.state.phase = GamePhase::LevelTransition;
        self.player.motion.direction = Direction::None;
        self.player.pending = None;
        self.ghosts.iter_mut().for_each(Ghost::stop);
        self.timers.cancel_where(|t| matches!(t, Task::ReleaseGhost(_)));

        log::info!("Level {level} complete, score {}", self.state.score);
        self.events.push(GameEvent::LevelComplete(level));
        self.show_message(format!("Level {level} complete!"))?;
        self.timers.schedule(self.now_ms + LEVEL_TRANSITION_MS, Task::AdvanceLevel)?;
        Ok(())
    }

    fn advance_level(&mut self) -> Result<(), MatchError> {
        let level = self.state.level + 1;
        self.collectibles = self.maze.spawn_collectibles();
        self.state
            .start_level(level, self.collectibles.len() as u32, self.now_ms);
        self.spawn_player();
        for ghost in &mut self.ghosts {
            ghost.reset(&self.maze);
        }
        self.start_round(false);

        log::info!("Level {level} started");
        self.events.push(GameEvent::LevelChanged(level));
        self.show_message(format!("Level {level}"))
    }

    fn kill_player(&mut self, by: GhostId) {
        self.player.kill();
        let lives = self.state.lose_life();
        self.state.phase = GamePhase::Dying;
        self.ghosts.iter_mut().for_each(Ghost::stop);
        self.timers.cancel_where(|t| matches!(t, Task::ReleaseGhost(_)));

        log::info!("Caught by {}, {lives} lives left", by.name());
        self.events.push(GameEvent::PlayerDied { caught_by: by });
        self.events.push(GameEvent::LivesChanged(lives));
    }

    fn finish_death(&mut self) {
        if self.state.lives == 0 {
            self.state.phase = GamePhase::GameOver;
            self.state.game_over = true;
            self.timers.cancel_all();
            self.bindings.unbind();
            log::info!("Game over, final score {}", self.state.score);
            self.events.push(GameEvent::GameOver {
                score: self.state.score,
            });
            return;
        }

        self.state.schedule.cancel_frightened(self.now_ms);
        self.state.reset_releases();
        self.spawn_player();
        for ghost in &mut self.ghosts {
            ghost.reset(&self.maze);
        }
        self.start_round(true);
        self.state.phase = GamePhase::Playing;
        log::info!("Respawned, {} lives left", self.state.lives);
    }

    /// Recreate the player entity with a fresh body and rebind its overlaps
    fn spawn_player(&mut self) {
        let body = BodyId(self.next_body);
        self.next_body += 1;
        self.player = Player::spawn(body, &self.maze);
        self.bindings.bind(body);
    }

    /// Orders issued at the start of every round
    fn start_round(&mut self, respawn: bool) {
        if respawn {
            self.ghosts[GhostId::Blinky.index()].order_attack();
        }
        self.ghosts[GhostId::Pinky.index()].exit_home();
    }

    /// Stop the match after a fatal error
    pub fn abort(&mut self, err: MatchError) {
        log::error!("Match aborted: {err}");
        self.timers.cancel_all();
        self.bindings.unbind();
        self.state.phase = GamePhase::Aborted;
        self.events.push(GameEvent::Aborted(err));
    }

    /// Leave the match: cancel every timer and drop the overlap bindings
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        let cancelled = self.timers.cancel_all();
        self.bindings.unbind();
        self.closed = true;
        log::info!("Match closed ({cancelled} timers cancelled)");
    }

    /// Count ghosts currently in `mode`
    pub fn ghosts_in(&self, mode: GhostMode) -> usize {
        self.ghosts.iter().filter(|g| g.mode == mode).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    /// Five dots in a row, the ghost house off to the right
    const CORRIDOR: [&str; 5] = [
        "##########",
        "#P.....  #",
        "########-#",
        "######  H#",
        "##########",
    ];

    fn corridor_game(seed: u64) -> Game {
        let maze = Maze::parse(&CORRIDOR, &[]).unwrap();
        let mut game = Game::with_maze(maze, seed, STARTING_LIVES);
        for ghost in &mut game.ghosts {
            ghost.stop();
        }
        // Nothing left to release them before the first chase order
        game.state.flanker_released = true;
        game.state.opportunist_released = true;
        game
    }

    fn right() -> TickInput {
        TickInput {
            direction: Direction::Right,
            ..Default::default()
        }
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_eating_every_dot_completes_level_once() {
        let mut game = corridor_game(1);
        assert_eq!(game.state.total_dots, 5);

        let mut cleared_at = None;
        for i in 0..200 {
            game.tick(&right(), SIM_DT_MS);
            if game.state.dots_remaining == 0 {
                cleared_at = Some(i);
                break;
            }
        }
        assert!(cleared_at.is_some());
        // Completion lands in the same tick as the last dot
        assert_eq!(game.state.phase, GamePhase::LevelTransition);
        assert_eq!(game.state.score, 5 * DOT_POINTS);

        for _ in 0..10 {
            game.tick(&right(), SIM_DT_MS);
        }
        let completions = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete(_)))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_level_advance_carries_score_and_lives() {
        let mut game = corridor_game(1);
        while game.state.phase != GamePhase::LevelTransition {
            game.tick(&right(), SIM_DT_MS);
        }
        let first_body = game.player.body;
        for _ in 0..(LEVEL_TRANSITION_MS / SIM_DT_MS + 2) {
            game.tick(&idle(), SIM_DT_MS);
        }
        assert_eq!(game.state.level, 2);
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert_eq!(game.state.dots_remaining, 5);
        assert_eq!(game.state.score, 5 * DOT_POINTS);
        assert_eq!(game.state.lives, STARTING_LIVES);
        assert_ne!(game.player.body, first_body);
        assert_eq!(game.bound_player(), Some(game.player.body));
        assert!(game.drain_events().contains(&GameEvent::LevelChanged(2)));
    }

    #[test]
    fn test_chasing_ghost_costs_one_life() {
        let mut game = Game::new(7).unwrap();
        let blinky = GhostId::Blinky.index();
        game.ghosts[blinky].mode = GhostMode::Chase;
        game.ghosts[blinky].motion.pos = game.player.pos();

        game.tick(&idle(), SIM_DT_MS);
        assert_eq!(game.state.lives, STARTING_LIVES - 1);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.phase, GamePhase::Dying);
        assert!(!game.player.alive);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LivesChanged(STARTING_LIVES - 1)));
        assert!(events.contains(&GameEvent::PlayerDied {
            caught_by: GhostId::Blinky
        }));
    }

    #[test]
    fn test_respawn_after_death_animation() {
        let mut game = Game::new(7).unwrap();
        let old_body = game.player.body;
        let blinky = GhostId::Blinky.index();
        game.ghosts[blinky].mode = GhostMode::Chase;
        game.ghosts[blinky].motion.pos = game.player.pos();
        game.tick(&idle(), SIM_DT_MS);

        for _ in 0..(DEATH_ANIMATION_MS / SIM_DT_MS + 3) {
            game.tick(&idle(), SIM_DT_MS);
        }
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert!(game.player.alive);
        assert_eq!(game.player.tile(), game.maze.player_start);
        assert_ne!(game.player.body, old_body);
        assert_eq!(game.bound_player(), Some(game.player.body));
        // Leader is ordered to attack, ambusher is on its way out
        assert_eq!(game.ghost(GhostId::Blinky).mode, GhostMode::Chase);
        assert_eq!(game.ghost(GhostId::Pinky).mode, GhostMode::ExitingHome);
        assert_eq!(game.ghost(GhostId::Inky).mode, GhostMode::AtHome);
    }

    #[test]
    fn test_last_life_ends_the_game() {
        let mut game = Game::new(7).unwrap();
        game.state.score = 1230;
        game.state.lives = 1;
        let blinky = GhostId::Blinky.index();
        game.ghosts[blinky].mode = GhostMode::Chase;
        game.ghosts[blinky].motion.pos = game.player.pos();

        for _ in 0..(DEATH_ANIMATION_MS / SIM_DT_MS + 5) {
            game.tick(&idle(), SIM_DT_MS);
        }
        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert!(game.state.game_over);
        assert_eq!(game.pending_timers(), 0);
        assert_eq!(game.bound_player(), None);
        assert!(game.drain_events().contains(&GameEvent::GameOver { score: 1230 }));
    }

    #[test]
    fn test_pill_frightens_and_only_the_touched_ghost_returns() {
        let mut game = Game::new(11).unwrap();
        let pill = IVec2::new(1, 23);
        game.player.motion.pos = game.maze.center_of(pill);

        let far = game.maze.center_of(IVec2::new(6, 5));
        for id in [GhostId::Blinky, GhostId::Pinky] {
            let ghost = &mut game.ghosts[id.index()];
            ghost.mode = GhostMode::Chase;
            ghost.attacking = true;
            ghost.motion.pos = far;
        }

        game.tick(&idle(), SIM_DT_MS);
        assert_eq!(game.state.score, PILL_POINTS);
        assert_eq!(game.ghost(GhostId::Blinky).mode, GhostMode::Frightened);
        assert_eq!(game.ghost(GhostId::Pinky).mode, GhostMode::Frightened);
        assert!(game.state.schedule.is_paused());

        game.ghosts[GhostId::Pinky.index()].motion.pos = game.player.pos();
        game.tick(&idle(), SIM_DT_MS);
        assert_eq!(game.ghost(GhostId::Pinky).mode, GhostMode::Returning);
        assert_eq!(game.ghost(GhostId::Blinky).mode, GhostMode::Frightened);
        assert_eq!(game.state.score, PILL_POINTS + GHOST_POINTS);
        assert!(game.drain_events().contains(&GameEvent::GhostEaten(GhostId::Pinky)));

        // Eyes reach the house and a release gets scheduled
        for _ in 0..300 {
            game.tick(&idle(), SIM_DT_MS);
            if game.ghost(GhostId::Pinky).mode == GhostMode::AtHome {
                break;
            }
        }
        assert_eq!(game.ghost(GhostId::Pinky).mode, GhostMode::AtHome);
        assert!(game.timers.is_pending(Task::ReleaseGhost(GhostId::Pinky)));
    }

    #[test]
    fn test_frightened_ends_back_in_schedule() {
        let mut game = Game::new(3).unwrap();
        game.player.motion.pos = game.maze.center_of(IVec2::new(1, 23));
        game.tick(&idle(), SIM_DT_MS);
        assert!(game.state.schedule.is_paused());
        assert_eq!(game.ghost(GhostId::Blinky).mode, GhostMode::Frightened);

        // Out of reach for the rest of the test
        game.bindings.unbind();
        let frightened = game.state.difficulty().frightened_ms;
        for _ in 0..(frightened / SIM_DT_MS + 2) {
            game.tick(&idle(), SIM_DT_MS);
        }
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert!(!game.state.schedule.is_paused());
        assert_eq!(game.ghosts_in(GhostMode::Frightened), 0);
        assert_eq!(game.ghost(GhostId::Blinky).mode, GhostMode::Scatter);
    }

    #[test]
    fn test_pill_frightens_a_ghost_still_leaving_home() {
        let mut game = Game::new(11).unwrap();
        assert_eq!(game.ghost(GhostId::Pinky).mode, GhostMode::ExitingHome);
        game.player.motion.pos = game.maze.center_of(IVec2::new(1, 23));
        game.tick(&idle(), SIM_DT_MS);
        assert!(game.state.schedule.is_paused());
        assert_eq!(game.ghost(GhostId::Pinky).mode, GhostMode::Frightened);
        assert_eq!(game.ghosts_in(GhostMode::Frightened), 2);

        // Keeps gliding out instead of wandering inside the house
        game.bindings.unbind();
        let doorway = game.maze.center_of(game.maze.doorway);
        let mut reached = false;
        for _ in 0..200 {
            game.tick(&idle(), SIM_DT_MS);
            let pinky = game.ghost(GhostId::Pinky);
            assert_eq!(pinky.mode, GhostMode::Frightened);
            if pinky.pos() == doorway {
                reached = true;
                break;
            }
            assert_eq!(pinky.pos().x, doorway.x);
        }
        assert!(reached);
    }

    #[test]
    fn test_modal_freezes_the_match() {
        let mut game = Game::new(5).unwrap();
        game.tick(&right(), SIM_DT_MS);
        let clock = game.now_ms();
        let pos = game.player.pos();

        game.tick(
            &TickInput {
                toggle_modal: true,
                ..right()
            },
            SIM_DT_MS,
        );
        for _ in 0..20 {
            game.tick(&right(), SIM_DT_MS);
        }
        assert!(game.state.modal_open);
        assert_eq!(game.now_ms(), clock);
        assert_eq!(game.player.pos(), pos);

        game.tick(
            &TickInput {
                toggle_modal: true,
                ..right()
            },
            SIM_DT_MS,
        );
        assert!(!game.state.modal_open);
        assert_eq!(game.now_ms(), clock + SIM_DT_MS);
    }

    #[test]
    fn test_teardown_cancels_pending_work() {
        let mut game = corridor_game(9);
        while game.state.phase != GamePhase::LevelTransition {
            game.tick(&right(), SIM_DT_MS);
        }
        assert_eq!(game.pending_timers(), 2);

        game.tick(
            &TickInput {
                quit: true,
                ..Default::default()
            },
            SIM_DT_MS,
        );
        assert!(game.is_closed());
        assert_eq!(game.pending_timers(), 0);
        assert_eq!(game.bound_player(), None);

        for _ in 0..500 {
            game.tick(&idle(), SIM_DT_MS);
        }
        assert_eq!(game.state.level, 1);
    }

    #[test]
    fn test_abort_stops_the_match() {
        let mut game = Game::new(5).unwrap();
        game.abort(MatchError::Asset("maze sprite sheet".into()));
        assert_eq!(game.state.phase, GamePhase::Aborted);
        let clock = game.now_ms();
        game.tick(&right(), SIM_DT_MS);
        assert_eq!(game.now_ms(), clock);
        assert!(matches!(
            game.drain_events().as_slice(),
            [GameEvent::Aborted(MatchError::Asset(_))]
        ));
    }

    #[test]
    fn test_determinism() {
        let script = [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ];
        let mut a = Game::new(99_999).unwrap();
        let mut b = Game::new(99_999).unwrap();
        for i in 0..2000 {
            let input = TickInput {
                direction: script[(i / 90) % script.len()],
                ..Default::default()
            };
            a.tick(&input, SIM_DT_MS);
            b.tick(&input, SIM_DT_MS);
        }
        assert_eq!(a.hud(), b.hud());
        assert_eq!(a.player.pos(), b.player.pos());
        for (ga, gb) in a.ghosts.iter().zip(&b.ghosts) {
            assert_eq!(ga.mode, gb.mode);
            assert_eq!(ga.pos(), gb.pos());
        }
    }
}
