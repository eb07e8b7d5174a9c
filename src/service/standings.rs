use crate::models::{
    leaderboard::{SessionLeaderboardEntry, SessionStandingRow},
    session::AnswerStats,
};

/// Assigns dense 1..N ranks to standings already ordered by
/// (score desc, joined_at asc). Ties on score are broken by who joined
/// first; every rank is unique.
pub fn assign_ranks(rows: Vec<SessionStandingRow>) -> Vec<SessionLeaderboardEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(position, row)| SessionLeaderboardEntry {
            rank: position as u32 + 1,
            participant_id: row.participant_id,
            nickname: row.nickname,
            score: row.score,
            joined_at: row.joined_at,
        })
        .collect()
}

/// Buckets stored answer selections for one question. Selections are stored
/// as text and parsed back to an option index; anything outside 0-3 or
/// unparseable stays out of the buckets but still counts toward the total.
pub fn fold_answer_stats(rows: &[(Option<String>, bool)]) -> AnswerStats {
    let mut stats = AnswerStats {
        option_counts: [0; 4],
        total: 0,
        correct_count: 0,
    };

    for (selected, is_correct) in rows {
        stats.total += 1;
        if *is_correct {
            stats.correct_count += 1;
        }

        let Some(text) = selected else { continue };
        let Ok(index) = text.parse::<usize>() else {
            continue;
        };

        if let Some(bucket) = stats.option_counts.get_mut(index) {
            *bucket += 1;
        }
    }

    stats
}
