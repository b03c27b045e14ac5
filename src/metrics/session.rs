use std::collections::VecDeque;

/// Number of recent scores kept for the rolling average
const SCORE_WINDOW: usize = 100;

/// Scores of the completed episodes in one session
///
/// Cancelled episodes are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetrics {
    pub games_played: u32,
    pub high_score: u32,
    pub last_score: Option<u32>,
    recent_scores: VecDeque<u32>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            games_played: 0,
            high_score: 0,
            last_score: None,
            recent_scores: VecDeque::with_capacity(SCORE_WINDOW),
        }
    }

    pub fn on_episode_end(&mut self, final_score: u32) {
        self.games_played += 1;
        self.last_score = Some(final_score);
        if final_score > self.high_score {
            self.high_score = final_score;
        }

        if self.recent_scores.len() == SCORE_WINDOW {
            self.recent_scores.pop_front();
        }
        self.recent_scores.push_back(final_score);
    }

    /// Mean score over the last [`SCORE_WINDOW`] completed episodes
    pub fn average_score(&self) -> f32 {
        if self.recent_scores.is_empty() {
            return 0.0;
        }
        self.recent_scores.iter().sum::<u32>() as f32 / self.recent_scores.len() as f32
    }

    pub fn format_summary(&self) -> String {
        format!(
            "games: {} | high score: {} | avg score: {:.2}",
            self.games_played,
            self.high_score,
            self.average_score()
        )
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
