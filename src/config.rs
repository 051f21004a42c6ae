use std::time::Duration;

/// Per-instance tuning for a quiz attempt.
///
/// The feedback windows and the star-threshold table are configuration,
/// not architecture: hosts may supply their own values. The incorrect
/// window is longer than the correct one so a learner has more time to
/// absorb a mistake.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// How long the reveal stays on screen after a correct answer.
    pub correct_feedback: Duration,
    /// How long the reveal stays on screen after an incorrect answer.
    pub incorrect_feedback: Duration,
    /// Descending `(percentage threshold, rating)` pairs. The first
    /// threshold the performance percentage meets or exceeds wins; below
    /// every threshold the rating is 0.
    pub star_thresholds: Vec<(u32, f32)>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            correct_feedback: Duration::from_millis(3000),
            incorrect_feedback: Duration::from_millis(5000),
            star_thresholds: vec![
                (95, 5.0),
                (85, 4.5),
                (75, 4.0),
                (65, 3.5),
                (55, 3.0),
                (45, 2.5),
                (35, 2.0),
                (25, 1.5),
                (15, 1.0),
                (5, 0.5),
            ],
        }
    }
}

impl QuizConfig {
    /// Feedback window for a selection with the given correctness.
    pub fn feedback_duration(&self, correct: bool) -> Duration {
        if correct {
            self.correct_feedback
        } else {
            self.incorrect_feedback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incorrect_window_is_longer() {
        let config = QuizConfig::default();
        assert!(config.feedback_duration(false) > config.feedback_duration(true));
    }

    #[test]
    fn test_default_thresholds_descend() {
        let config = QuizConfig::default();
        for pair in config.star_thresholds.windows(2) {
            assert!(pair[0].0 > pair[1].0);
            assert!(pair[0].1 > pair[1].1);
        }
    }
}
