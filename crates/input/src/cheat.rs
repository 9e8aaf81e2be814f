//! Fixed-sequence cheat matcher.
//!
//! Keeps the last ten presses among the arrow keys, `A` and `B` and reports
//! once when they spell Up Up Down Down Left Right Left Right B A.

use log::debug;

use crate::map::Key;

/// The unlock sequence, oldest press first.
pub const CHEAT_SEQUENCE: [Key; 10] = [
    Key::Up,
    Key::Up,
    Key::Down,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::Left,
    Key::Right,
    Key::B,
    Key::A,
];

const LEN: usize = CHEAT_SEQUENCE.len();

#[derive(Debug, Clone, Default)]
pub struct CheatMatcher {
    presses: [Option<Key>; LEN],
    next: usize,
}

impl CheatMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Returns true when the sequence just completed;
    /// the history is cleared so the same presses never match twice.
    pub fn push(&mut self, key: Key) -> bool {
        self.presses[self.next] = Some(key);
        self.next = (self.next + 1) % LEN;

        // `next` now points at the oldest entry
        let matched = (0..LEN)
            .all(|i| self.presses[(self.next + i) % LEN] == Some(CHEAT_SEQUENCE[i]));
        if matched {
            debug!("cheat sequence matched");
            self.clear();
        }
        matched
    }

    pub fn clear(&mut self) {
        self.presses = [None; LEN];
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(matcher: &mut CheatMatcher, keys: &[Key]) -> Vec<bool> {
        keys.iter().map(|&k| matcher.push(k)).collect()
    }

    #[test]
    fn test_exact_sequence_matches_on_last_press() {
        let mut matcher = CheatMatcher::new();
        let results = feed(&mut matcher, &CHEAT_SEQUENCE);
        assert_eq!(results.iter().filter(|&&m| m).count(), 1);
        assert!(results[LEN - 1]);
    }

    #[test]
    fn test_sequence_after_noise_matches() {
        let mut matcher = CheatMatcher::new();
        feed(&mut matcher, &[Key::A, Key::Left, Key::Down]);
        let results = feed(&mut matcher, &CHEAT_SEQUENCE);
        assert!(results[LEN - 1]);
    }

    #[test]
    fn test_match_clears_history() {
        let mut matcher = CheatMatcher::new();
        feed(&mut matcher, &CHEAT_SEQUENCE);
        // one more A must not re-match using the old presses
        assert!(!matcher.push(Key::A));
    }

    #[test]
    fn test_wrong_order_does_not_match() {
        let mut matcher = CheatMatcher::new();
        let mut keys = CHEAT_SEQUENCE;
        keys.swap(8, 9);
        assert!(feed(&mut matcher, &keys).iter().all(|&m| !m));
    }

    #[test]
    fn test_interrupted_sequence_needs_restart() {
        let mut matcher = CheatMatcher::new();
        feed(&mut matcher, &CHEAT_SEQUENCE[..5]);
        matcher.push(Key::Up);
        assert!(feed(&mut matcher, &CHEAT_SEQUENCE[5..]).iter().all(|&m| !m));
        assert!(feed(&mut matcher, &CHEAT_SEQUENCE).iter().any(|&m| m));
    }
}
