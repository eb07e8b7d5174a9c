#[cfg(test)]
mod tests {
    use crate::{
        models::session::ScoringSettings,
        service::scoring::{ScoreOutcome, score_answer},
    };

    fn default_settings() -> ScoringSettings {
        ScoringSettings {
            points_per_question: 1000,
            question_timer_seconds: 20,
            speed_bonus_enabled: true,
            max_speed_bonus: 500,
            streak_multiplier_enabled: true,
        }
    }

    #[test]
    fn incorrect_answer_earns_nothing_and_resets_streak() {
        let outcome = score_answer(false, 1_000, 5, &default_settings());

        assert_eq!(
            outcome,
            ScoreOutcome {
                points: 0,
                new_streak: 0
            }
        );
    }

    #[test]
    fn instant_answer_earns_full_speed_bonus() {
        let outcome = score_answer(true, 0, 0, &default_settings());

        assert_eq!(outcome.points, 1_500);
        assert_eq!(outcome.new_streak, 1);
    }

    #[test]
    fn answer_at_time_limit_earns_base_points_only() {
        let outcome = score_answer(true, 20_000, 0, &default_settings());

        assert_eq!(outcome.points, 1_000);
    }

    #[test]
    fn answer_past_time_limit_never_earns_negative_bonus() {
        let outcome = score_answer(true, 60_000, 0, &default_settings());

        assert_eq!(outcome.points, 1_000);
    }

    #[test]
    fn half_time_answer_earns_half_bonus() {
        let outcome = score_answer(true, 10_000, 0, &default_settings());

        assert_eq!(outcome.points, 1_250);
    }

    #[test]
    fn streak_multiplier_grows_with_streak() {
        // Second correct in a row, answered at the limit: 1000 * 1.1
        let second = score_answer(true, 20_000, 1, &default_settings());
        assert_eq!(second.points, 1_100);
        assert_eq!(second.new_streak, 2);

        // Third in a row: 1000 * 1.2
        let third = score_answer(true, 20_000, 2, &default_settings());
        assert_eq!(third.points, 1_200);
        assert_eq!(third.new_streak, 3);
    }

    #[test]
    fn streak_multiplier_caps_at_double() {
        let outcome = score_answer(true, 20_000, 19, &default_settings());

        assert_eq!(outcome.points, 2_000);
        assert_eq!(outcome.new_streak, 20);
    }

    #[test]
    fn speed_bonus_applies_before_streak_multiplier() {
        // Instant second correct: (1000 + 500) * 1.1
        let outcome = score_answer(true, 0, 1, &default_settings());

        assert_eq!(outcome.points, 1_650);
    }

    #[test]
    fn disabled_speed_bonus_is_ignored() {
        let settings = ScoringSettings {
            speed_bonus_enabled: false,
            ..default_settings()
        };

        let outcome = score_answer(true, 0, 0, &settings);
        assert_eq!(outcome.points, 1_000);
    }

    #[test]
    fn disabled_streak_multiplier_still_tracks_streak() {
        let settings = ScoringSettings {
            streak_multiplier_enabled: false,
            ..default_settings()
        };

        let outcome = score_answer(true, 20_000, 5, &settings);
        assert_eq!(outcome.points, 1_000);
        assert_eq!(outcome.new_streak, 6);
    }

    #[test]
    fn negative_max_speed_bonus_never_undercuts_base_points() {
        let settings = ScoringSettings {
            max_speed_bonus: -800,
            ..default_settings()
        };

        // An instant answer maximizes whatever bonus is configured; a
        // negative bonus floors at zero instead of eating into the base.
        let outcome = score_answer(true, 0, 0, &settings);
        assert_eq!(outcome.points, 1_000);
    }

    #[test]
    fn negative_base_points_floor_at_zero() {
        let settings = ScoringSettings {
            points_per_question: -500,
            speed_bonus_enabled: false,
            ..default_settings()
        };

        let outcome = score_answer(true, 1_000, 0, &settings);
        assert_eq!(outcome.points, 0);
        assert_eq!(outcome.new_streak, 1);
    }

    #[test]
    fn zero_timer_never_divides_by_zero() {
        let settings = ScoringSettings {
            question_timer_seconds: 0,
            ..default_settings()
        };

        let outcome = score_answer(true, 0, 0, &settings);
        assert_eq!(outcome.points, 1_000);
    }
}
