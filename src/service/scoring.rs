use crate::models::session::ScoringSettings;

/// Result of scoring a single submitted answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOutcome {
    pub points: i32,
    pub new_streak: i32,
}

/// Computes the points for one answer. Pure, no side effects.
///
/// An incorrect answer earns nothing and resets the streak. A correct answer
/// starts at the configured base points; the speed bonus (when enabled) is
/// added before the streak multiplier (when enabled) is applied, and both
/// results are floored. Answering at or after the time limit earns no bonus.
/// The bonus and the final total are floored at zero, so misconfigured
/// settings can never subtract points.
pub fn score_answer(
    is_correct: bool,
    answer_time_ms: i64,
    previous_streak: i32,
    settings: &ScoringSettings,
) -> ScoreOutcome {
    if !is_correct {
        return ScoreOutcome {
            points: 0,
            new_streak: 0,
        };
    }

    let new_streak = previous_streak + 1;
    let mut points = settings.points_per_question;

    if settings.speed_bonus_enabled {
        points += speed_bonus(answer_time_ms, settings);
    }

    if settings.streak_multiplier_enabled {
        let multiplier = streak_multiplier(new_streak);
        points = (points as f64 * multiplier).floor() as i32;
    }

    ScoreOutcome {
        points: points.max(0),
        new_streak,
    }
}

fn speed_bonus(answer_time_ms: i64, settings: &ScoringSettings) -> i32 {
    let timer_ms = settings.question_timer_seconds as i64 * 1_000;
    if timer_ms <= 0 {
        return 0;
    }

    let ratio = ((timer_ms - answer_time_ms) as f64 / timer_ms as f64).max(0.0);
    let bonus = (ratio * settings.max_speed_bonus as f64).floor() as i32;
    bonus.max(0)
}

/// 1.0x at streak 1, +0.1x per additional streak step, capped at 2.0x
/// from streak 10 onwards.
fn streak_multiplier(streak: i32) -> f64 {
    (1.0 + (streak - 1) as f64 * 0.1).min(2.0)
}
