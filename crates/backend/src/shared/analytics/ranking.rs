use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A row that can be placed on a leaderboard
pub trait LeaderboardRow {
    fn display_name(&self) -> &str;
    fn set_rank(&mut self, rank: u32);
}

/// One sort criterion: a numeric projection and its direction
pub struct SortKey<T> {
    key: fn(&T) -> f64,
    order: SortOrder,
}

impl<T> SortKey<T> {
    pub fn asc(key: fn(&T) -> f64) -> Self {
        Self {
            key,
            order: SortOrder::Ascending,
        }
    }

    pub fn desc(key: fn(&T) -> f64) -> Self {
        Self {
            key,
            order: SortOrder::Descending,
        }
    }
}

/// Sort by `keys` in order, then by name ascending, and number the rows
/// from 1.
pub fn rank_rows<T: LeaderboardRow>(rows: &mut [T], keys: &[SortKey<T>]) {
    rows.sort_by(|a, b| {
        for SortKey { key, order } in keys {
            let ordering = key(a).total_cmp(&key(b));
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.display_name().cmp(b.display_name())
    });

    for (index, row) in rows.iter_mut().enumerate() {
        row.set_rank(index as u32 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        name: &'static str,
        score: f64,
        minutes: f64,
        rank: u32,
    }

    impl LeaderboardRow for Row {
        fn display_name(&self) -> &str {
            self.name
        }

        fn set_rank(&mut self, rank: u32) {
            self.rank = rank;
        }
    }

    fn row(name: &'static str, score: f64, minutes: f64) -> Row {
        Row {
            name,
            score,
            minutes,
            rank: 0,
        }
    }

    #[test]
    fn test_ties_break_on_next_key_then_name() {
        let mut rows = vec![
            row("Zainab", 5.0, 30.0),
            row("Bola", 5.0, 20.0),
            row("Ade", 5.0, 20.0),
            row("Kemi", 9.0, 50.0),
        ];
        rank_rows(
            &mut rows,
            &[
                SortKey::desc(|r: &Row| r.score),
                SortKey::asc(|r: &Row| r.minutes),
            ],
        );

        let order: Vec<(&str, u32)> = rows.iter().map(|r| (r.name, r.rank)).collect();
        assert_eq!(
            order,
            vec![("Kemi", 1), ("Ade", 2), ("Bola", 3), ("Zainab", 4)]
        );
    }
}
