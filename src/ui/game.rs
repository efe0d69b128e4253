use rand::Rng;

use super::grid::Grid;

pub const ROUND_SECONDS: u32 = 60;
pub const ANSWER_REWARD: u32 = 10;
pub const POINTS_PER_LEVEL: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick arrived while not in game mode.
    Ignored,
    Running(u32),
    /// Countdown ran out; it has already restarted at `ROUND_SECONDS`.
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reward {
    pub level_up: bool,
    pub cleared: (usize, usize),
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub time_left: u32,
    pub grid: Grid,
}

impl GameState {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        GameState {
            phase: GamePhase::Idle,
            score: 0,
            level: 1,
            time_left: ROUND_SECONDS,
            grid: Grid::generate(rng),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Entering game mode always starts a fresh countdown.
    pub fn enter(&mut self) {
        self.phase = GamePhase::Active;
        self.time_left = ROUND_SECONDS;
    }

    pub fn leave(&mut self) {
        self.phase = GamePhase::Idle;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Ignored;
        }
        if self.time_left <= 1 {
            self.time_left = ROUND_SECONDS;
            return TickOutcome::Expired;
        }
        self.time_left -= 1;
        TickOutcome::Running(self.time_left)
    }

    pub fn award_correct_answer<R: Rng>(&mut self, rng: &mut R) -> Reward {
        self.score = self.score.saturating_add(ANSWER_REWARD);
        let level_up = self.score > 0 && self.score % POINTS_PER_LEVEL == 0;
        if level_up {
            self.level = self.level.saturating_add(1);
        }
        let (grid, cleared) = self.grid.mark_cell_cleared(rng);
        self.grid = grid;
        Reward { level_up, cleared }
    }
}

/// Case-insensitive comparison; a missing expected answer never matches.
pub fn answers_match(submitted: &str, expected: Option<&str>) -> bool {
    expected.is_some_and(|expected| submitted.to_lowercase() == expected.to_lowercase())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn active_game() -> (GameState, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let mut game = GameState::new(&mut rng);
        game.enter();
        (game, rng)
    }

    #[test]
    fn sixty_ticks_expire_exactly_once() {
        let (mut game, _) = active_game();
        let outcomes: Vec<TickOutcome> = (0..60).map(|_| game.tick()).collect();

        let expiries = outcomes
            .iter()
            .filter(|outcome| **outcome == TickOutcome::Expired)
            .count();
        assert_eq!(expiries, 1);
        assert_eq!(outcomes[58], TickOutcome::Running(1));
        assert_eq!(outcomes[59], TickOutcome::Expired);
        assert_eq!(game.time_left, ROUND_SECONDS);
        assert!(game.is_active());
    }

    #[test]
    fn countdown_restarts_after_expiry() {
        let (mut game, _) = active_game();
        for _ in 0..60 {
            game.tick();
        }
        assert_eq!(game.tick(), TickOutcome::Running(59));
    }

    #[test]
    fn idle_game_ignores_ticks() {
        let (mut game, _) = active_game();
        game.tick();
        game.leave();
        assert_eq!(game.tick(), TickOutcome::Ignored);
        assert_eq!(game.time_left, 59);
    }

    #[test]
    fn entering_resets_the_countdown() {
        let (mut game, _) = active_game();
        for _ in 0..10 {
            game.tick();
        }
        game.leave();
        game.enter();
        assert_eq!(game.time_left, ROUND_SECONDS);
    }

    #[test]
    fn level_up_on_reaching_a_hundred() {
        let (mut game, mut rng) = active_game();
        game.score = 90;
        let reward = game.award_correct_answer(&mut rng);
        assert!(reward.level_up);
        assert_eq!(game.score, 100);
        assert_eq!(game.level, 2);
    }

    #[test]
    fn no_level_up_when_stepping_over_a_hundred() {
        let (mut game, mut rng) = active_game();
        game.score = 95;
        let reward = game.award_correct_answer(&mut rng);
        assert!(!reward.level_up);
        assert_eq!(game.score, 105);
        assert_eq!(game.level, 1);
    }

    #[test]
    fn reward_clears_the_reported_cell() {
        let (mut game, mut rng) = active_game();
        let reward = game.award_correct_answer(&mut rng);
        let (row, col) = reward.cleared;
        assert!(game.grid.get(row, col).is_some_and(|cell| cell.is_cleared()));
        assert_eq!(game.grid.cleared_count(), 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(answers_match("hello", Some("Hello")));
        assert!(answers_match("ÜBER", Some("über")));
        assert!(!answers_match("hello ", Some("Hello")));
        assert!(!answers_match("hello", None));
        assert!(!answers_match("", None));
    }
}
