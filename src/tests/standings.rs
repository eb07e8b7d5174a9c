#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::{
        models::leaderboard::SessionStandingRow,
        service::standings::{assign_ranks, fold_answer_stats},
    };

    fn row(nickname: &str, score: i32, joined_offset_secs: i64) -> SessionStandingRow {
        SessionStandingRow {
            participant_id: Uuid::new_v4(),
            nickname: nickname.to_string(),
            score,
            joined_at: Utc::now() + Duration::seconds(joined_offset_secs),
        }
    }

    #[test]
    fn ranks_are_dense_and_unique() {
        // Pre-sorted by (score desc, joined_at asc), as the query returns.
        let rows = vec![
            row("bea", 80, 0),
            row("cal", 80, 10),
            row("ann", 50, 5),
            row("dan", 30, 2),
        ];

        let entries = assign_ranks(rows);

        let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        // Tied scores, the earlier joiner outranks the later one.
        assert_eq!(entries[0].nickname, "bea");
        assert_eq!(entries[1].nickname, "cal");
    }

    #[test]
    fn empty_standings_yield_no_entries() {
        assert!(assign_ranks(Vec::new()).is_empty());
    }

    #[test]
    fn answer_stats_bucket_valid_selections() {
        let rows = vec![
            (Some("0".to_string()), true),
            (Some("0".to_string()), true),
            (Some("2".to_string()), false),
            (Some("3".to_string()), false),
        ];

        let stats = fold_answer_stats(&rows);

        assert_eq!(stats.option_counts, [2, 0, 1, 1]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.correct_count, 2);
    }

    #[test]
    fn answer_stats_count_blank_and_junk_selections_in_total_only() {
        let rows = vec![
            (Some("1".to_string()), true),
            (None, false),
            (Some("junk".to_string()), false),
            (Some("9".to_string()), false),
        ];

        let stats = fold_answer_stats(&rows);

        assert_eq!(stats.option_counts, [0, 1, 0, 0]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.correct_count, 1);
    }
}
