#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use validator::Validate;

    use crate::models::session::StartSessionRequest;

    fn request() -> StartSessionRequest {
        StartSessionRequest {
            quiz_id: Uuid::new_v4(),
            points_per_question: None,
            question_timer_seconds: None,
            speed_bonus_enabled: None,
            max_speed_bonus: None,
            streak_multiplier_enabled: None,
        }
    }

    #[test]
    fn defaults_only_request_is_valid() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn negative_points_per_question_is_rejected() {
        let request = StartSessionRequest {
            points_per_question: Some(-500),
            ..request()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn negative_max_speed_bonus_is_rejected() {
        let request = StartSessionRequest {
            max_speed_bonus: Some(-800),
            ..request()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn zero_question_timer_is_rejected() {
        let request = StartSessionRequest {
            question_timer_seconds: Some(0),
            ..request()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn sensible_overrides_are_accepted() {
        let request = StartSessionRequest {
            points_per_question: Some(2_000),
            question_timer_seconds: Some(30),
            max_speed_bonus: Some(0),
            ..request()
        };

        assert!(request.validate().is_ok());
    }
}
