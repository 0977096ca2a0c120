/// Level unlock and retry state machine
///
/// Tracks which level is being played and what happens on death and on goal
/// pickup. Records are read once at startup and written back only when a
/// level is completed (plus the level 1 unlock on load).
///
/// # Phases
///
/// ```text
///  LevelSelect --start/select--> Playing(id) --death--> Gate(id)
///                                   |   ^                  |
///                                   |   +---- resolved ----+   (success or failure)
///                                   |
///                                   +--goal, id+1 loaded--> Playing(id+1)
///                                   +--goal, last level---> Finished
/// ```
///
/// # Rust Learning Notes
///
/// - **Trait objects at the seams**: the store and the challenge gate are
///   passed in as `&mut dyn Trait`, so tests hand in fakes and nothing here
///   holds global state
/// - **Data-carrying enum variants**: `Playing(id)` and `Gate(id)` make it
///   impossible to be "playing" without knowing which level
use crate::level::LevelId;
use crate::progress::{LevelProgressRecord, MAX_STARS, PersistenceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LevelSelect,
    Playing(LevelId),
    /// Detour after a death; always returns to the same level
    Gate(LevelId),
    /// The last level was completed
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Succeeded,
    Failed,
}

/// The retry challenge shown after a death
///
/// The outcome comes back later through
/// [`LevelProgressionController::resolve_gate`].
pub trait ChallengeGate {
    fn on_died(&mut self, level_id: LevelId);
}

/// Gate that just remembers it was triggered; the front end resolves it
#[derive(Debug, Clone, Default)]
pub struct PendingChallenge {
    pending: Option<LevelId>,
    issued: u32,
}

impl PendingChallenge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<LevelId> {
        self.pending
    }

    pub fn take(&mut self) -> Option<LevelId> {
        self.pending.take()
    }

    /// Total number of challenges requested
    pub fn issued(&self) -> u32 {
        self.issued
    }
}

impl ChallengeGate for PendingChallenge {
    fn on_died(&mut self, level_id: LevelId) {
        self.pending = Some(level_id);
        self.issued += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOutcome {
    /// Now playing this level
    Advanced(LevelId),
    /// No further level; back to level select
    Finished,
}

/// One row of the level select screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSelectEntry {
    pub id: LevelId,
    pub unlocked: bool,
    pub stars: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    NoSuchLevel(LevelId),
    LevelLocked(LevelId),
    NotPlaying,
    NotInGate,
}

impl std::fmt::Display for ProgressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressError::NoSuchLevel(id) => write!(f, "No such level: {}", id),
            ProgressError::LevelLocked(id) => write!(f, "Level {} is locked", id),
            ProgressError::NotPlaying => write!(f, "No level is being played"),
            ProgressError::NotInGate => write!(f, "No challenge is pending"),
        }
    }
}

impl std::error::Error for ProgressError {}

/// Stars for finishing a level after `deaths` deaths in the same attempt.
pub fn stars_for_attempt(deaths: u32) -> u8 {
    match deaths {
        0 => MAX_STARS,
        1 => 2,
        _ => 1,
    }
}

#[derive(Debug, Clone)]
pub struct LevelProgressionController {
    /// Index 0 is level 1
    records: Vec<LevelProgressRecord>,
    phase: Phase,
    deaths: u32,
}

impl LevelProgressionController {
    /// Read the records of `level_count` levels and force level 1 unlocked.
    ///
    /// Missing or unreadable records fall back to the default record with a
    /// warning; nothing here is fatal.
    pub fn load(level_count: usize, store: &mut dyn PersistenceStore) -> Self {
        let mut controller = Self {
            records: Vec::new(),
            phase: Phase::LevelSelect,
            deaths: 0,
        };
        controller.read_records(level_count, store);
        controller
    }

    /// Re-read every record from `store`. The phase is kept.
    pub fn reload(&mut self, store: &mut dyn PersistenceStore) {
        let count = self.records.len();
        self.read_records(count, store);
    }

    fn read_records(&mut self, level_count: usize, store: &mut dyn PersistenceStore) {
        self.records = (1..=level_count as LevelId)
            .map(|id| match store.load(id) {
                Ok(Some(mut record)) => {
                    if record.stars_earned > MAX_STARS {
                        log::warn!(
                            "Level {} has {} stars stored, capping at {}",
                            id,
                            record.stars_earned,
                            MAX_STARS
                        );
                        record.stars_earned = MAX_STARS;
                    }
                    record
                }
                Ok(None) => LevelProgressRecord::default(),
                Err(e) => {
                    log::warn!("Progress for level {} unreadable, using defaults: {}", id, e);
                    LevelProgressRecord::default()
                }
            })
            .collect();

        match self.records.first_mut() {
            Some(first) if !first.unlocked => {
                first.unlocked = true;
                let record = *first;
                if let Err(e) = store.save(1, &record) {
                    log::error!("Failed to persist level 1 unlock: {}", e);
                }
            }
            Some(_) => {}
            None => log::warn!("No levels loaded; nothing can be unlocked"),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Level being played or retried, if any
    pub fn current_level(&self) -> Option<LevelId> {
        match self.phase {
            Phase::Playing(id) | Phase::Gate(id) => Some(id),
            Phase::LevelSelect | Phase::Finished => None,
        }
    }

    pub fn level_count(&self) -> usize {
        self.records.len()
    }

    pub fn contains(&self, id: LevelId) -> bool {
        id >= 1 && (id as usize) <= self.records.len()
    }

    pub fn record(&self, id: LevelId) -> Option<LevelProgressRecord> {
        if !self.contains(id) {
            return None;
        }
        self.records.get(id as usize - 1).copied()
    }

    fn record_mut(&mut self, id: LevelId) -> Option<&mut LevelProgressRecord> {
        if !self.contains(id) {
            return None;
        }
        self.records.get_mut(id as usize - 1)
    }

    /// Deaths so far in the current attempt
    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn lowest_unlocked(&self) -> Option<LevelId> {
        self.level_select().into_iter().find(|entry| entry.unlocked).map(|entry| entry.id)
    }

    pub fn level_select(&self) -> Vec<LevelSelectEntry> {
        self.records
            .iter()
            .zip(1..)
            .map(|(record, id)| LevelSelectEntry {
                id,
                unlocked: record.unlocked,
                stars: record.stars_earned,
            })
            .collect()
    }

    /// Enter gameplay: `requested` if given, else the lowest unlocked level.
    pub fn start(&mut self, requested: Option<LevelId>) -> Result<LevelId, ProgressError> {
        match requested {
            Some(id) => self.select_level(id),
            None => {
                let id = self.lowest_unlocked().ok_or(ProgressError::NoSuchLevel(1))?;
                self.select_level(id)
            }
        }
    }

    /// Play `id` if it exists and is unlocked.
    pub fn select_level(&mut self, id: LevelId) -> Result<LevelId, ProgressError> {
        let record = self.record(id).ok_or(ProgressError::NoSuchLevel(id))?;
        if !record.unlocked {
            return Err(ProgressError::LevelLocked(id));
        }

        if matches!(self.phase, Phase::Gate(_)) {
            log::debug!("Abandoning pending challenge to start level {}", id);
        }
        self.phase = Phase::Playing(id);
        self.deaths = 0;
        log::info!("Playing level {}", id);
        Ok(id)
    }

    /// The tracked entity died: enter the gate and notify the challenge.
    pub fn on_death(&mut self, gate: &mut dyn ChallengeGate) -> Result<LevelId, ProgressError> {
        let Phase::Playing(id) = self.phase else {
            return Err(ProgressError::NotPlaying);
        };

        self.phase = Phase::Gate(id);
        self.deaths += 1;
        log::info!("Died on level {} ({} this attempt)", id, self.deaths);
        gate.on_died(id);
        Ok(id)
    }

    /// Leave the gate. Either outcome resumes the same level.
    pub fn resolve_gate(&mut self, outcome: ChallengeOutcome) -> Result<LevelId, ProgressError> {
        let Phase::Gate(id) = self.phase else {
            return Err(ProgressError::NotInGate);
        };

        log::debug!("Challenge on level {} resolved: {:?}", id, outcome);
        self.phase = Phase::Playing(id);
        Ok(id)
    }

    /// The goal was picked up: rate the attempt, then unlock and move to the next level.
    ///
    /// Write failures are logged; the transition still happens.
    pub fn on_goal(&mut self, store: &mut dyn PersistenceStore) -> Result<GoalOutcome, ProgressError> {
        let Phase::Playing(id) = self.phase else {
            return Err(ProgressError::NotPlaying);
        };

        let stars = stars_for_attempt(self.deaths);
        if let Some(record) = self.record_mut(id) {
            record.award_stars(stars);
            let record = *record;
            persist(store, id, &record);
        }

        let next = id + 1;
        let outcome = match self.record_mut(next) {
            Some(record) => {
                record.unlocked = true;
                let record = *record;
                persist(store, next, &record);
                self.phase = Phase::Playing(next);
                log::info!("Level {} complete ({} stars), advancing to {}", id, stars, next);
                GoalOutcome::Advanced(next)
            }
            None => {
                self.phase = Phase::Finished;
                log::info!("Level {} complete ({} stars), no levels left", id, stars);
                GoalOutcome::Finished
            }
        };
        self.deaths = 0;
        Ok(outcome)
    }

    pub fn return_to_level_select(&mut self) {
        self.phase = Phase::LevelSelect;
        self.deaths = 0;
    }
}

fn persist(store: &mut dyn PersistenceStore, id: LevelId, record: &LevelProgressRecord) {
    if let Err(e) = store.save(id, record) {
        log::error!("Failed to save progress for level {}: {}", id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{MemoryStore, StoreError};

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    impl PersistenceStore for ReadOnlyStore {
        fn load(&self, id: LevelId) -> Result<Option<LevelProgressRecord>, StoreError> {
            self.0.load(id)
        }

        fn save(&mut self, _: LevelId, _: &LevelProgressRecord) -> Result<(), StoreError> {
            Err(StoreError::CorruptedData("read only".to_string()))
        }
    }

    /// Store that cannot read anything
    struct BrokenStore;

    impl PersistenceStore for BrokenStore {
        fn load(&self, _: LevelId) -> Result<Option<LevelProgressRecord>, StoreError> {
            Err(StoreError::CorruptedData("garbage".to_string()))
        }

        fn save(&mut self, _: LevelId, _: &LevelProgressRecord) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn locked() -> LevelProgressRecord {
        LevelProgressRecord {
            unlocked: false,
            stars_earned: 0,
        }
    }

    #[test]
    fn test_level_one_forced_unlocked() {
        let mut store = MemoryStore::new().with_record(1, locked());

        let progression = LevelProgressionController::load(3, &mut store);

        assert_eq!(progression.record(1).map(|r| r.unlocked), Some(true));
        assert_eq!(store.get(1).map(|r| r.unlocked), Some(true));
        assert_eq!(progression.record(2), Some(LevelProgressRecord::default()));
    }

    #[test]
    fn test_out_of_range_stars_are_capped() {
        let stored = LevelProgressRecord {
            unlocked: true,
            stars_earned: 7,
        };
        let mut store = MemoryStore::new().with_record(1, stored).with_record(2, stored);

        let progression = LevelProgressionController::load(2, &mut store);

        assert_eq!(progression.record(2).map(|r| r.stars_earned), Some(MAX_STARS));
        assert!(progression.level_select().iter().all(|e| e.stars == MAX_STARS));
    }

    #[test]
    fn test_unreadable_records_default() {
        let progression = LevelProgressionController::load(2, &mut BrokenStore);

        assert_eq!(progression.record(1).map(|r| r.unlocked), Some(true));
        assert_eq!(progression.record(2), Some(LevelProgressRecord::default()));
    }

    #[test]
    fn test_start_picks_lowest_unlocked() {
        let mut store = MemoryStore::new().with_record(3, LevelProgressRecord::unlocked());
        let mut progression = LevelProgressionController::load(3, &mut store);

        assert_eq!(progression.start(None), Ok(1));
        assert_eq!(progression.phase(), Phase::Playing(1));
        assert_eq!(progression.start(Some(3)), Ok(3));
    }

    #[test]
    fn test_select_rejects_locked_and_unknown() {
        let mut progression = LevelProgressionController::load(2, &mut MemoryStore::new());

        assert_eq!(progression.select_level(2), Err(ProgressError::LevelLocked(2)));
        assert_eq!(progression.select_level(5), Err(ProgressError::NoSuchLevel(5)));
        assert_eq!(progression.select_level(0), Err(ProgressError::NoSuchLevel(0)));
        assert_eq!(progression.phase(), Phase::LevelSelect);
    }

    #[test]
    fn test_death_enters_gate_and_returns() {
        let mut store = MemoryStore::new();
        let mut gate = PendingChallenge::new();
        let mut progression = LevelProgressionController::load(2, &mut store);
        progression.start(None).expect("level 1 unlocked");
        let writes = store.write_count();

        assert_eq!(progression.on_death(&mut gate), Ok(1));
        assert_eq!(progression.phase(), Phase::Gate(1));
        assert_eq!(gate.pending(), Some(1));

        // Dying again while gated is not a transition
        assert_eq!(progression.on_death(&mut gate), Err(ProgressError::NotPlaying));

        assert_eq!(progression.resolve_gate(ChallengeOutcome::Failed), Ok(1));
        assert_eq!(progression.phase(), Phase::Playing(1));
        assert_eq!(progression.resolve_gate(ChallengeOutcome::Succeeded), Err(ProgressError::NotInGate));

        // The gate never touches records
        assert_eq!(store.write_count(), writes);
        assert_eq!(gate.issued(), 1);
    }

    #[test]
    fn test_goal_advances_and_persists_unlock() {
        let mut store = MemoryStore::new()
            .with_record(1, LevelProgressRecord::unlocked())
            .with_record(3, LevelProgressRecord::unlocked());
        let mut progression = LevelProgressionController::load(4, &mut store);
        progression.select_level(3).expect("unlocked");

        assert_eq!(progression.on_goal(&mut store), Ok(GoalOutcome::Advanced(4)));

        assert_eq!(progression.phase(), Phase::Playing(4));
        assert_eq!(store.get(4).map(|r| r.unlocked), Some(true));
        assert_eq!(progression.record(4).map(|r| r.unlocked), Some(true));
    }

    #[test]
    fn test_goal_on_last_level_finishes_without_phantom_record() {
        let mut store = MemoryStore::new().with_record(3, LevelProgressRecord::unlocked());
        let mut progression = LevelProgressionController::load(3, &mut store);
        progression.select_level(3).expect("unlocked");

        assert_eq!(progression.on_goal(&mut store), Ok(GoalOutcome::Finished));

        assert_eq!(progression.phase(), Phase::Finished);
        assert!(!store.contains(4));
        assert_eq!(progression.current_level(), None);
    }

    #[test]
    fn test_goal_requires_playing() {
        let mut store = MemoryStore::new();
        let mut progression = LevelProgressionController::load(1, &mut store);

        assert_eq!(progression.on_goal(&mut store), Err(ProgressError::NotPlaying));
    }

    #[test]
    fn test_stars_reflect_deaths_and_keep_best() {
        let mut store = MemoryStore::new();
        let mut gate = PendingChallenge::new();
        let mut progression = LevelProgressionController::load(2, &mut store);

        progression.start(Some(1)).expect("unlocked");
        progression.on_death(&mut gate).expect("playing");
        progression.resolve_gate(ChallengeOutcome::Succeeded).expect("gated");
        progression.on_goal(&mut store).expect("playing");
        assert_eq!(progression.record(1).map(|r| r.stars_earned), Some(2));

        progression.start(Some(1)).expect("unlocked");
        progression.on_goal(&mut store).expect("playing");
        assert_eq!(store.get(1).map(|r| r.stars_earned), Some(3));

        progression.start(Some(1)).expect("unlocked");
        for _ in 0..3 {
            progression.on_death(&mut gate).expect("playing");
            progression.resolve_gate(ChallengeOutcome::Failed).expect("gated");
        }
        progression.on_goal(&mut store).expect("playing");
        assert_eq!(store.get(1).map(|r| r.stars_earned), Some(3));
    }

    #[test]
    fn test_stars_for_attempt() {
        assert_eq!(stars_for_attempt(0), 3);
        assert_eq!(stars_for_attempt(1), 2);
        assert_eq!(stars_for_attempt(2), 1);
        assert_eq!(stars_for_attempt(40), 1);
    }

    #[test]
    fn test_failed_write_still_advances() {
        let mut store = ReadOnlyStore(MemoryStore::new().with_record(1, LevelProgressRecord::unlocked()));
        let mut progression = LevelProgressionController::load(2, &mut store);
        progression.start(None).expect("unlocked");

        assert_eq!(progression.on_goal(&mut store), Ok(GoalOutcome::Advanced(2)));
        assert_eq!(progression.record(2).map(|r| r.unlocked), Some(true));
    }

    #[test]
    fn test_level_select_listing() {
        let mut store = MemoryStore::new().with_record(
            2,
            LevelProgressRecord {
                unlocked: true,
                stars_earned: 1,
            },
        );
        let progression = LevelProgressionController::load(3, &mut store);

        let entries = progression.level_select();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], LevelSelectEntry { id: 2, unlocked: true, stars: 1 });
        assert!(!entries[2].unlocked);
    }

    #[test]
    fn test_reload_reapplies_level_one() {
        let mut store = MemoryStore::new();
        let mut progression = LevelProgressionController::load(2, &mut store);
        store.save(1, &locked()).expect("saves");
        store.save(2, &LevelProgressRecord::unlocked()).expect("saves");

        progression.reload(&mut store);

        assert_eq!(progression.record(1).map(|r| r.unlocked), Some(true));
        assert_eq!(progression.record(2).map(|r| r.unlocked), Some(true));
    }

    #[test]
    fn test_empty_catalog() {
        let mut progression = LevelProgressionController::load(0, &mut MemoryStore::new());

        assert_eq!(progression.record(1), None);
        assert_eq!(progression.start(None), Err(ProgressError::NoSuchLevel(1)));
    }
}
