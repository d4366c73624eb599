//! Linear stage sequencer
//!
//! Holds an ordered list of game-defined stage records and a cursor that only
//! moves on explicit `next_stage`/`previous_stage`/`goto_stage` calls.

#[derive(Debug, Clone)]
pub struct StageSequencer<S> {
    stages: Vec<S>,
    cursor: usize,
}

impl<S> Default for StageSequencer<S> {
    fn default() -> Self {
        Self {
            stages: Vec::new(),
            cursor: 0,
        }
    }
}

impl<S> StageSequencer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stage list and rewind to the first stage
    pub fn load_stages(&mut self, stages: Vec<S>) {
        self.stages = stages;
        self.cursor = 0;
        log::debug!("Loaded {} stages", self.stages.len());
    }

    pub fn current_stage(&self) -> Option<&S> {
        self.stages.get(self.cursor)
    }

    /// Advance by one; false (cursor unchanged) on the last stage
    pub fn next_stage(&mut self) -> bool {
        if self.cursor + 1 >= self.stages.len() {
            return false;
        }
        self.cursor += 1;
        log::debug!("Stage cursor -> {}", self.cursor);
        true
    }

    /// Step back by one; false (cursor unchanged) on the first stage
    pub fn previous_stage(&mut self) -> bool {
        if self.cursor == 0 || self.stages.is_empty() {
            return false;
        }
        self.cursor -= 1;
        log::debug!("Stage cursor -> {}", self.cursor);
        true
    }

    /// Jump to a stage index; false (cursor unchanged) when out of range
    pub fn goto_stage(&mut self, index: usize) -> bool {
        if index >= self.stages.len() {
            return false;
        }
        self.cursor = index;
        true
    }

    pub fn is_first_stage(&self) -> bool {
        !self.stages.is_empty() && self.cursor == 0
    }

    pub fn is_last_stage(&self) -> bool {
        !self.stages.is_empty() && self.cursor == self.stages.len() - 1
    }

    /// Zero-based cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// One-based stage number for display
    pub fn stage_number(&self) -> usize {
        self.cursor + 1
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_walk_to_last_stage() {
        let mut seq = StageSequencer::new();
        seq.load_stages(vec!["s0", "s1", "s2"]);
        assert!(seq.is_first_stage());
        assert!(seq.next_stage());
        assert!(seq.next_stage());
        assert!(seq.is_last_stage());
        assert_eq!(seq.stage_number(), 3);
        assert!(!seq.next_stage());
        assert_eq!(seq.cursor(), 2);
        assert_eq!(seq.current_stage(), Some(&"s2"));
    }

    #[test]
    fn test_previous_at_first_is_noop() {
        let mut seq = StageSequencer::new();
        seq.load_stages(vec![1, 2]);
        assert!(!seq.previous_stage());
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn test_goto_validates() {
        let mut seq = StageSequencer::new();
        seq.load_stages(vec![1, 2, 3]);
        assert!(seq.goto_stage(2));
        assert!(!seq.goto_stage(3));
        assert_eq!(seq.cursor(), 2);
    }

    #[test]
    fn test_reload_rewinds() {
        let mut seq = StageSequencer::new();
        seq.load_stages(vec![1, 2, 3]);
        seq.goto_stage(2);
        seq.load_stages(vec![4, 5]);
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.current_stage(), Some(&4));
    }

    #[test]
    fn test_empty_sequencer() {
        let mut seq: StageSequencer<u8> = StageSequencer::new();
        assert!(!seq.next_stage());
        assert!(!seq.previous_stage());
        assert!(!seq.is_last_stage());
        assert!(!seq.is_first_stage());
        assert!(seq.current_stage().is_none());
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_bounds(len in 1usize..10, moves in prop::collection::vec(0u8..3, 0..40)) {
            let mut seq = StageSequencer::new();
            seq.load_stages((0..len).collect());
            for m in moves {
                match m {
                    0 => { seq.next_stage(); }
                    1 => { seq.previous_stage(); }
                    _ => { seq.goto_stage(len / 2); }
                }
                prop_assert!(seq.cursor() < seq.stage_count());
                prop_assert_eq!(seq.is_last_stage(), seq.cursor() == len - 1);
            }
        }
    }
}
