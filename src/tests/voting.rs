#[cfg(test)]
mod tests {
    use crate::models::discussion::{VoteDirection, VoteOutcome};

    #[test]
    fn first_vote_is_added() {
        let outcome = VoteOutcome::resolve(None, VoteDirection::Up);
        assert_eq!(outcome, VoteOutcome::Added);
    }

    #[test]
    fn repeated_direction_toggles_the_vote_off() {
        let outcome = VoteOutcome::resolve(Some(VoteDirection::Up), VoteDirection::Up);
        assert_eq!(outcome, VoteOutcome::Removed);

        let outcome = VoteOutcome::resolve(Some(VoteDirection::Down), VoteDirection::Down);
        assert_eq!(outcome, VoteOutcome::Removed);
    }

    #[test]
    fn opposite_direction_switches_the_vote() {
        let outcome = VoteOutcome::resolve(Some(VoteDirection::Up), VoteDirection::Down);
        assert_eq!(outcome, VoteOutcome::Changed);

        let outcome = VoteOutcome::resolve(Some(VoteDirection::Down), VoteDirection::Up);
        assert_eq!(outcome, VoteOutcome::Changed);
    }
}
