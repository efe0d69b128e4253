use rand::Rng;

use super::game::{GameState, Reward, TickOutcome, answers_match};
use crate::gateway::Flashcard;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Card,
    Memorize,
    Game,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Card, ViewMode::Memorize, ViewMode::Game];

    /// Stack page name.
    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Card => "card",
            ViewMode::Memorize => "memorize",
            ViewMode::Game => "game",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Card => "Card",
            ViewMode::Memorize => "Memorize",
            ViewMode::Game => "Game",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChange {
    Unchanged,
    Switched,
    EnteredGame,
    LeftGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Not in game mode; the submission is dropped.
    Inactive,
    Mismatch,
    Correct(Reward),
}

/// Everything the study views mutate: the card list, the cursor into it,
/// the active mode and the quiz game.
#[derive(Clone, Debug)]
pub struct StudySession {
    pub cards: Vec<Flashcard>,
    pub index: usize,
    pub show_back: bool,
    pub mode: ViewMode,
    pub game: GameState,
}

impl StudySession {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        StudySession {
            cards: Vec::new(),
            index: 0,
            show_back: false,
            mode: ViewMode::Card,
            game: GameState::new(rng),
        }
    }

    /// Back to a signed-out session with a fresh board.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        *self = Self::new(rng);
    }

    pub fn set_cards(&mut self, cards: Vec<Flashcard>) {
        self.cards = cards;
        if self.index >= self.cards.len() {
            self.index = 0;
        }
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn has_cards(&self) -> bool {
        !self.cards.is_empty()
    }

    fn advance_index(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.cards.len();
    }

    pub fn next_card(&mut self) {
        self.advance_index();
        self.show_back = false;
    }

    pub fn toggle_reveal(&mut self) {
        if self.mode == ViewMode::Card && self.has_cards() {
            self.show_back = !self.show_back;
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) -> ModeChange {
        let previous = self.mode;
        if previous == mode {
            return ModeChange::Unchanged;
        }
        self.mode = mode;
        if mode == ViewMode::Game {
            self.game.enter();
            ModeChange::EnteredGame
        } else if previous == ViewMode::Game {
            self.game.leave();
            ModeChange::LeftGame
        } else {
            ModeChange::Switched
        }
    }

    /// Mode that Escape switches to. An open dialog keeps the key for itself.
    pub fn escape_target(&self, dialog_open: bool) -> Option<ViewMode> {
        (self.mode == ViewMode::Game && !dialog_open).then_some(ViewMode::Card)
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.game.tick()
    }

    pub fn submit_answer<R: Rng>(&mut self, submitted: &str, rng: &mut R) -> AnswerOutcome {
        if !self.game.is_active() {
            return AnswerOutcome::Inactive;
        }
        let expected = self.current_card().map(|card| card.back.as_str());
        if !answers_match(submitted, expected) {
            return AnswerOutcome::Mismatch;
        }
        let reward = self.game.award_correct_answer(rng);
        self.next_card();
        AnswerOutcome::Correct(reward)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::ui::game::{ANSWER_REWARD, ROUND_SECONDS};

    fn card(front: &str, back: &str) -> Flashcard {
        Flashcard::new("ana", front, back).unwrap()
    }

    fn session_with(cards: Vec<Flashcard>, seed: u64) -> (StudySession, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = StudySession::new(&mut rng);
        session.set_cards(cards);
        (session, rng)
    }

    fn deck() -> Vec<Flashcard> {
        vec![
            card("Hola", "Hello"),
            card("Gato", "Cat"),
            card("Perro", "Dog"),
        ]
    }

    #[test]
    fn single_card_correct_answer_wraps_to_itself() {
        let (mut session, mut rng) = session_with(vec![card("Hola", "Hello")], 1);
        session.set_mode(ViewMode::Game);

        let outcome = session.submit_answer("hello", &mut rng);

        assert!(matches!(outcome, AnswerOutcome::Correct(_)));
        assert_eq!(session.game.score, 10);
        assert_eq!(session.index, 0);
        assert_eq!(session.game.grid.cleared_count(), 1);
    }

    #[test]
    fn empty_deck_is_a_mismatch() {
        let (mut session, mut rng) = session_with(Vec::new(), 2);
        session.set_mode(ViewMode::Game);

        assert_eq!(session.submit_answer("anything", &mut rng), AnswerOutcome::Mismatch);
        assert_eq!(session.submit_answer("", &mut rng), AnswerOutcome::Mismatch);
        assert_eq!(session.game.score, 0);
        assert_eq!(session.index, 0);
    }

    #[test]
    fn answers_outside_game_mode_are_dropped() {
        let (mut session, mut rng) = session_with(deck(), 3);
        assert_eq!(session.submit_answer("hello", &mut rng), AnswerOutcome::Inactive);
        assert_eq!(session.game.score, 0);
    }

    #[test]
    fn mode_changes_drive_the_game_boundary() {
        let (mut session, _) = session_with(deck(), 4);
        assert_eq!(session.set_mode(ViewMode::Card), ModeChange::Unchanged);
        assert_eq!(session.set_mode(ViewMode::Memorize), ModeChange::Switched);
        assert_eq!(session.set_mode(ViewMode::Game), ModeChange::EnteredGame);
        assert!(session.game.is_active());
        session.tick();
        assert_eq!(session.set_mode(ViewMode::Card), ModeChange::LeftGame);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.set_mode(ViewMode::Game), ModeChange::EnteredGame);
        assert_eq!(session.game.time_left, ROUND_SECONDS);
    }

    #[test]
    fn escape_leaves_the_game_unless_a_dialog_is_open() {
        let (mut session, _) = session_with(deck(), 5);
        assert_eq!(session.escape_target(false), None);

        session.set_mode(ViewMode::Game);
        assert_eq!(session.escape_target(true), None);
        assert_eq!(session.escape_target(false), Some(ViewMode::Card));
    }

    #[test]
    fn next_card_wraps_and_hides_the_back() {
        let (mut session, _) = session_with(deck(), 5);
        session.toggle_reveal();
        assert!(session.show_back);
        session.next_card();
        assert!(!session.show_back);
        session.next_card();
        session.next_card();
        assert_eq!(session.index, 0);
    }

    #[test]
    fn reveal_only_applies_to_card_mode() {
        let (mut session, _) = session_with(deck(), 6);
        session.set_mode(ViewMode::Memorize);
        session.toggle_reveal();
        assert!(!session.show_back);

        let (mut empty, _) = session_with(Vec::new(), 6);
        empty.toggle_reveal();
        assert!(!empty.show_back);
        empty.next_card();
        assert_eq!(empty.index, 0);
    }

    #[test]
    fn shrinking_reload_resets_a_stale_index() {
        let (mut session, _) = session_with(deck(), 7);
        session.next_card();
        session.next_card();
        session.set_cards(vec![card("Hola", "Hello")]);
        assert_eq!(session.index, 0);
        assert_eq!(session.current_card().map(|c| c.front.as_str()), Some("Hola"));
    }

    #[test]
    fn reset_returns_to_a_fresh_session() {
        let (mut session, mut rng) = session_with(deck(), 8);
        session.set_mode(ViewMode::Game);
        session.submit_answer("hello", &mut rng);
        session.reset(&mut rng);

        assert!(session.cards.is_empty());
        assert_eq!(session.mode, ViewMode::Card);
        assert_eq!(session.game.score, 0);
        assert_eq!(session.game.level, 1);
        assert!(!session.game.is_active());
        assert_eq!(session.game.grid.cleared_count(), 0);
    }

    proptest! {
        #[test]
        fn matching_answers_score_and_advance(
            seed in any::<u64>(),
            start in 0usize..3,
            upper in any::<bool>(),
        ) {
            let (mut session, mut rng) = session_with(deck(), seed);
            session.index = start;
            session.set_mode(ViewMode::Game);
            let expected = session.current_card().unwrap().back.clone();
            let submitted = if upper { expected.to_uppercase() } else { expected.to_lowercase() };

            let outcome = session.submit_answer(&submitted, &mut rng);

            prop_assert!(matches!(outcome, AnswerOutcome::Correct(_)));
            prop_assert_eq!(session.game.score, ANSWER_REWARD);
            prop_assert_eq!(session.index, (start + 1) % 3);
        }

        #[test]
        fn mismatches_change_nothing(
            seed in any::<u64>(),
            start in 0usize..3,
            submitted in "[a-z]{0,8}",
        ) {
            let (mut session, mut rng) = session_with(deck(), seed);
            session.index = start;
            session.set_mode(ViewMode::Game);
            let expected = session.current_card().unwrap().back.to_lowercase();
            prop_assume!(submitted != expected);
            let before = session.clone();

            let outcome = session.submit_answer(&submitted, &mut rng);

            prop_assert_eq!(outcome, AnswerOutcome::Mismatch);
            prop_assert_eq!(session.game.score, before.game.score);
            prop_assert_eq!(session.game.level, before.game.level);
            prop_assert_eq!(&session.game.grid, &before.game.grid);
            prop_assert_eq!(session.index, before.index);
        }

        #[test]
        fn level_tracks_hundreds(correct in 0usize..40) {
            let (mut session, mut rng) = session_with(vec![card("Hola", "Hello")], 9);
            session.set_mode(ViewMode::Game);
            for _ in 0..correct {
                session.submit_answer("HELLO", &mut rng);
            }
            let score = correct as u32 * ANSWER_REWARD;
            prop_assert_eq!(session.game.score, score);
            prop_assert_eq!(session.game.level, 1 + score / 100);
        }
    }
}
