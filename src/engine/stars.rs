//! Star rating and elapsed-time formatting.
//!
//! Pure functions over the attempt's derived numbers; nothing here reads
//! or caches state.

const FULL_STAR: char = '★';
const HALF_STAR: char = '◐';
const EMPTY_STAR: char = '☆';

/// Placeholder shown when no elapsed time exists yet.
pub const ELAPSED_PLACEHOLDER: &str = "--:--";

/// Map a performance percentage to a half-step rating in 0–5.
///
/// `thresholds` is a descending table of `(threshold, rating)` pairs;
/// the first threshold the percentage meets or exceeds determines the
/// rating. Below every threshold the rating is 0.
pub fn star_rating(percentage: u32, thresholds: &[(u32, f32)]) -> f32 {
    for &(threshold, rating) in thresholds {
        if percentage >= threshold {
            return rating;
        }
    }
    0.0
}

/// Render a rating as a fixed row of five glyphs (full/half/empty).
///
/// With zero questions the row is all-empty regardless of the rating.
pub fn render_stars(rating: f32, total_questions: usize) -> String {
    if total_questions == 0 {
        return std::iter::repeat(EMPTY_STAR).take(5).collect();
    }

    let rounded = (rating * 2.0).round() / 2.0;
    (0..5)
        .map(|i| {
            let position = i as f32;
            if rounded >= position + 1.0 {
                FULL_STAR
            } else if rounded >= position + 0.5 {
                HALF_STAR
            } else {
                EMPTY_STAR
            }
        })
        .collect()
}

/// Render elapsed seconds as zero-padded `MM:SS`.
///
/// `None` renders the `"--:--"` placeholder, which is distinct from the
/// literal zero duration `"00:00"`.
pub fn format_elapsed(seconds: Option<u64>) -> String {
    match seconds {
        None => ELAPSED_PLACEHOLDER.to_string(),
        Some(s) => format!("{:02}:{:02}", s / 60, s % 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuizConfig;

    fn thresholds() -> Vec<(u32, f32)> {
        QuizConfig::default().star_thresholds
    }

    #[test]
    fn test_rating_buckets() {
        let t = thresholds();
        assert_eq!(star_rating(100, &t), 5.0);
        assert_eq!(star_rating(95, &t), 5.0);
        assert_eq!(star_rating(94, &t), 4.5);
        assert_eq!(star_rating(50, &t), 2.5);
        assert_eq!(star_rating(5, &t), 0.5);
        assert_eq!(star_rating(4, &t), 0.0);
        assert_eq!(star_rating(0, &t), 0.0);
    }

    #[test]
    fn test_render_full_and_empty() {
        assert_eq!(render_stars(5.0, 10), "★★★★★");
        assert_eq!(render_stars(0.0, 10), "☆☆☆☆☆");
    }

    #[test]
    fn test_render_half_star() {
        assert_eq!(render_stars(2.5, 10), "★★◐☆☆");
        assert_eq!(render_stars(0.5, 10), "◐☆☆☆☆");
        assert_eq!(render_stars(4.5, 10), "★★★★◐");
    }

    #[test]
    fn test_render_rounds_to_half_steps() {
        assert_eq!(render_stars(2.3, 10), "★★◐☆☆");
        assert_eq!(render_stars(2.7, 10), "★★◐☆☆");
        assert_eq!(render_stars(2.8, 10), "★★★☆☆");
    }

    #[test]
    fn test_zero_questions_renders_all_empty() {
        assert_eq!(render_stars(5.0, 0), "☆☆☆☆☆");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Some(90)), "01:30");
        assert_eq!(format_elapsed(Some(0)), "00:00");
        assert_eq!(format_elapsed(Some(59)), "00:59");
        assert_eq!(format_elapsed(Some(3600)), "60:00");
        assert_eq!(format_elapsed(None), "--:--");
        assert_ne!(format_elapsed(None), format_elapsed(Some(0)));
    }
}
