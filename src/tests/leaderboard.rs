#[cfg(test)]
mod tests {
    use crate::db::leaderboard::answer_credit_parts;

    #[test]
    fn correct_answer_credits_points_and_one_correct() {
        assert_eq!(answer_credit_parts(1_250, true), (1_250, 1));
    }

    #[test]
    fn incorrect_answer_credits_nothing() {
        // Only the attempt counter moves for a wrong answer; points stay
        // untouched even when the caller passes a non-zero value.
        assert_eq!(answer_credit_parts(1_250, false), (0, 0));
    }

    #[test]
    fn zero_point_correct_answer_still_counts_as_correct() {
        assert_eq!(answer_credit_parts(0, true), (0, 1));
    }
}
