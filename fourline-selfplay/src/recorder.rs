//! Game recorder - engine-vs-engine games producing training records
//!
//! Both sides run the same MCTS configuration. Every move decision is
//! captured before it is applied, so a record always describes the board
//! the engine actually looked at.

use fourline_core::{GameState, TrainingRecord};
use fourline_mcts::{MctsConfig, MctsEngine};

/// Outcome of a single recorded game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// Winning side: `+1`, `-1`, or `0` for a draw
    pub winner: i8,
    /// Moves played
    pub plies: u32,
    /// One record per move decision, in game order
    pub records: Vec<TrainingRecord>,
}

impl GameOutcome {
    pub fn is_draw(&self) -> bool {
        self.winner == 0
    }
}

/// Self-play configuration
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Games to record
    pub games: usize,
    /// Engine settings shared by both sides
    pub engine: MctsConfig,
    /// Base seed for the per-move seed counter (None = 42)
    pub seed: Option<u64>,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            games: 100,
            engine: MctsConfig::medium(),
            seed: None,
        }
    }
}

impl SelfPlayConfig {
    /// Config recording `games` games with the given engine settings
    pub fn new(games: usize, engine: MctsConfig) -> Self {
        Self {
            games,
            engine,
            seed: None,
        }
    }

    /// Fix the base seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Runs engine-vs-engine games and collects training records
pub struct SelfPlayRecorder {
    config: SelfPlayConfig,
    seed_counter: u64,
}

impl SelfPlayRecorder {
    pub fn new(config: SelfPlayConfig) -> Self {
        let seed_counter = config.seed.unwrap_or(42);
        Self {
            config,
            seed_counter,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play one game to the end, recording each decision before the move
    /// is applied
    pub fn record_game(&mut self) -> GameOutcome {
        let mut state = GameState::new();
        let mut records = Vec::new();

        while !state.is_over() {
            let seed = self.next_seed();
            let engine = MctsEngine::new(self.config.engine.clone().with_seed(seed));
            let Some(outcome) = engine.search(&state) else {
                break;
            };

            records.push(TrainingRecord::from_state(&state, outcome.column));
            if state.play(outcome.column).is_err() {
                // The engine only proposes legal columns
                break;
            }
        }

        GameOutcome {
            winner: state.win(),
            plies: records.len() as u32,
            records,
        }
    }

    /// Record the configured number of games, reporting each finished
    /// game to `progress`
    pub fn record_all<F>(&mut self, mut progress: F) -> Vec<GameOutcome>
    where
        F: FnMut(usize, &GameOutcome),
    {
        let mut outcomes = Vec::with_capacity(self.config.games);
        for game in 0..self.config.games {
            let outcome = self.record_game();
            tracing::debug!(
                game = game + 1,
                winner = outcome.winner,
                plies = outcome.plies,
                "recorded game"
            );
            progress(game, &outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Get next seed and advance the counter
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter = self.seed_counter.wrapping_add(1);
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourline_core::COLS;

    fn quick_config() -> SelfPlayConfig {
        SelfPlayConfig::new(1, MctsConfig::default().with_iterations(40)).with_seed(42)
    }

    #[test]
    fn test_game_runs_to_completion() {
        let mut recorder = SelfPlayRecorder::new(quick_config());
        let outcome = recorder.record_game();

        assert!([-1, 0, 1].contains(&outcome.winner));
        assert!(outcome.plies >= 7, "a game cannot end before seven plies");
        assert_eq!(outcome.plies as usize, outcome.records.len());
    }

    #[test]
    fn test_records_replay_to_the_same_game() {
        let mut recorder = SelfPlayRecorder::new(quick_config());
        let outcome = recorder.record_game();

        // Replaying the recorded columns reproduces each decision point
        let mut state = GameState::new();
        for record in &outcome.records {
            assert_eq!(record.pieces, state.pieces());
            assert_eq!(record.turn, state.turn());
            assert!((record.column as usize) < COLS);
            state.play(record.column as usize).unwrap();
        }
        assert!(state.is_over());
        assert_eq!(state.win(), outcome.winner);
    }

    #[test]
    fn test_alternating_turns_in_records() {
        let mut recorder = SelfPlayRecorder::new(quick_config());
        let outcome = recorder.record_game();

        for (i, record) in outcome.records.iter().enumerate() {
            let expected = if i % 2 == 0 { 1 } else { -1 };
            assert_eq!(record.turn, expected);
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_game() {
        let a = SelfPlayRecorder::new(quick_config()).record_game();
        let b = SelfPlayRecorder::new(quick_config()).record_game();
        assert_eq!(a.records, b.records);
        assert_eq!(a.winner, b.winner);
    }

    #[test]
    fn test_record_all_reports_progress() {
        let config = SelfPlayConfig::new(2, MctsConfig::default().with_iterations(30)).with_seed(7);
        let mut recorder = SelfPlayRecorder::new(config);

        let mut seen = Vec::new();
        let outcomes = recorder.record_all(|game, outcome| seen.push((game, outcome.plies)));

        assert_eq!(outcomes.len(), 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, 0);
        assert_eq!(seen[1].0, 1);
    }
}
