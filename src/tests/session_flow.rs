#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::{
        models::{
            error::ServerError,
            session::{QuizSession, SessionStatus},
        },
        service::session_controller::{
            AdvanceDecision, decide_advance, ensure_no_active_session,
        },
    };

    fn session(status: SessionStatus, current_index: i32, total_questions: i32) -> QuizSession {
        let now = Utc::now();
        QuizSession {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            status,
            current_index,
            total_questions,
            points_per_question: 1_000,
            question_timer_seconds: 20,
            speed_bonus_enabled: true,
            max_speed_bonus: 500,
            streak_multiplier_enabled: true,
            question_started_at: now,
            started_at: now,
            finished_at: None,
        }
    }

    #[test]
    fn finished_session_never_yields_another_index() {
        let decision = decide_advance(&session(SessionStatus::Finished, 2, 10));

        assert_eq!(decision, AdvanceDecision::AlreadyFinished);
    }

    #[test]
    fn advance_moves_forward_by_exactly_one() {
        for index in 0..8 {
            let decision = decide_advance(&session(SessionStatus::Active, index, 10));
            assert_eq!(decision, AdvanceDecision::MoveTo(index + 1));
        }
    }

    #[test]
    fn last_question_finishes_instead_of_advancing() {
        let decision = decide_advance(&session(SessionStatus::Active, 9, 10));

        assert_eq!(decision, AdvanceDecision::Finish);
    }

    #[test]
    fn single_question_session_finishes_on_first_advance() {
        let decision = decide_advance(&session(SessionStatus::Active, 0, 1));

        assert_eq!(decision, AdvanceDecision::Finish);
    }

    #[test]
    fn live_session_blocks_question_edits() {
        let running = session(SessionStatus::Active, 0, 5);

        match ensure_no_active_session(Some(&running)) {
            Err(ServerError::Conflict(message)) => {
                assert!(message.contains(&running.id.to_string()));
            }
            other => panic!("Expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn no_session_allows_question_edits() {
        assert!(ensure_no_active_session(None).is_ok());
    }
}
