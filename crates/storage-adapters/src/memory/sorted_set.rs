//! Score-ordered member set with rank and score range queries.

/// Members ordered by `(score, member)`. A member appears at most once;
/// re-adding it moves it to its new score.
#[derive(Debug, Default, Clone)]
pub struct ScoredSet {
    entries: Vec<(i64, u64)>,
}

impl ScoredSet {
    pub fn add(&mut self, score: i64, member: u64) {
        self.remove(member);
        let at = self
            .entries
            .partition_point(|entry| *entry < (score, member));
        self.entries.insert(at, (score, member));
    }

    pub fn remove(&mut self, member: u64) {
        self.entries.retain(|(_, m)| *m != member);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inclusive rank range. Negative indices count from the end.
    pub fn range(&self, start: i64, stop: i64, reverse: bool) -> Vec<u64> {
        let len = self.entries.len() as i64;
        let resolve = |index: i64| if index < 0 { len + index } else { index };
        let start = resolve(start).max(0);
        let stop = resolve(stop).min(len - 1);
        if len == 0 || start > stop {
            return Vec::new();
        }

        let members = self.entries.iter().map(|(_, member)| *member);
        let (start, stop) = (start as usize, stop as usize);
        if reverse {
            members.rev().skip(start).take(stop - start + 1).collect()
        } else {
            members.skip(start).take(stop - start + 1).collect()
        }
    }

    /// Members with `min <= score <= max`, ascending.
    pub fn range_by_score(&self, min: i64, max: i64) -> Vec<u64> {
        self.entries
            .iter()
            .filter(|(score, _)| (min..=max).contains(score))
            .map(|(_, member)| *member)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: &[(i64, u64)]) -> ScoredSet {
        let mut s = ScoredSet::default();
        for (score, member) in entries {
            s.add(*score, *member);
        }
        s
    }

    #[test]
    fn ranks_follow_scores() {
        let s = set(&[(30, 3), (10, 1), (20, 2)]);
        assert_eq!(s.range(0, -1, false), vec![1, 2, 3]);
        assert_eq!(s.range(0, 0, true), vec![3]);
        assert_eq!(s.range(1, 5, false), vec![2, 3]);
        assert_eq!(s.range(-2, -1, false), vec![2, 3]);
        assert!(s.range(5, 9, false).is_empty());
    }

    #[test]
    fn readding_moves_member() {
        let mut s = set(&[(10, 1), (20, 2)]);
        s.add(30, 1);
        assert_eq!(s.range(0, -1, false), vec![2, 1]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn score_range_is_inclusive() {
        let s = set(&[(10, 1), (20, 2), (30, 3)]);
        assert_eq!(s.range_by_score(10, 20), vec![1, 2]);
        assert!(s.range_by_score(31, 40).is_empty());
    }
}
