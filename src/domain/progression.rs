//! Progression engine: titles, points and streak milestones.
//!
//! Pure functions over a static threshold table. Persistence is the caller's
//! responsibility; everything here is deterministic and synchronous.

/// Title thresholds, ascending and strictly increasing. The threshold-0 entry
/// guarantees every non-negative point total resolves to a title.
pub const TITLE_THRESHOLDS: &[(&str, i32)] = &[
    ("New Explorer", 0),
    ("Habit Scout", 50),
    ("Consistency Captain", 100),
    ("Rhythm Master", 200),
    ("Momentum Hero", 400),
    ("Zen Legend", 700),
];

/// Points awarded for a completed check-in.
pub const COMPLETION_POINTS: i32 = 10;
/// Bonus awarded every [`STREAK_MILESTONE`]th consecutive check-in.
pub const STREAK_BONUS_POINTS: i32 = 5;
/// Flat penalty applied when a habit is deleted.
pub const DELETION_PENALTY: i32 = -10;
/// Streak length at which the bonus fires (every multiple).
pub const STREAK_MILESTONE: i32 = 5;

/// Returns the highest-threshold title not exceeding `points`.
pub fn title_for_points(points: i32) -> &'static str {
    TITLE_THRESHOLDS
        .iter()
        .rev()
        .find(|(_, threshold)| points >= *threshold)
        .map(|(title, _)| *title)
        .unwrap_or(TITLE_THRESHOLDS[0].0)
}

/// Returns the next title above `points` and how many points are still needed.
/// `(None, 0)` once the maximum threshold is reached.
pub fn next_title(points: i32) -> (Option<&'static str>, i32) {
    TITLE_THRESHOLDS
        .iter()
        .find(|(_, threshold)| points < *threshold)
        .map(|(title, threshold)| (Some(*title), threshold - points))
        .unwrap_or((None, 0))
}

/// Applies a point delta, floor-clamped at zero, and recomputes the title.
/// This is the single path by which a user's points ever change.
pub fn apply_points_delta(points: i32, delta: i32) -> (i32, &'static str) {
    let new_points = (points + delta).max(0);
    (new_points, title_for_points(new_points))
}

/// Whether a streak value lands on a milestone worth a bonus.
pub fn is_streak_milestone(streak: i32) -> bool {
    streak > 0 && streak % STREAK_MILESTONE == 0
}
