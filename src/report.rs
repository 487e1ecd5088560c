use crate::action::Action;
use crate::consts::REPORT_CAPACITY;
use crate::keycodes::KeyCode;

/// Size of the NKRO usage bitmap (one bit per usage id 0..=255).
pub const NKRO_BYTES: usize = 32;

/// Codes emitted in one scan cycle, no duplicates.
///
/// Kept in insertion order. The set is rebuilt every cycle, and the engine
/// inserts in key-index order, so a held code can move when a lower-index
/// key starts emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSet {
    codes: [Option<KeyCode>; REPORT_CAPACITY],
    len: usize,
}

impl ReportSet {
    pub const fn new() -> Self {
        Self {
            codes: [None; REPORT_CAPACITY],
            len: 0,
        }
    }

    /// Adds `code`, returning false if it was already present.
    ///
    /// # Panics
    /// Panics when the set is full. More distinct codes than physical keys
    /// means the keymap is broken; there is no sane report to send.
    pub fn insert(&mut self, code: KeyCode) -> bool {
        if self.contains(code) {
            return false;
        }
        assert!(
            self.len < REPORT_CAPACITY,
            "report overflow: more than {} simultaneous codes",
            REPORT_CAPACITY
        );
        self.codes[self.len] = Some(code);
        self.len += 1;
        true
    }

    pub fn contains(&self, code: KeyCode) -> bool {
        self.iter().any(|c| c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.codes[..self.len].iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// HID modifier byte for the modifiers in the set.
    pub fn modifiers(&self) -> u8 {
        self.iter()
            .filter_map(KeyCode::modifier_bit)
            .fold(0, |acc, bit| acc | bit)
    }

    pub fn to_nkro(&self) -> NkroReport {
        let mut report = NkroReport::default();
        for code in self.iter() {
            match code.modifier_bit() {
                Some(bit) => report.modifier |= bit,
                None => {
                    let usage = code.usage();
                    report.keys[(usage / 8) as usize] |= 1 << (usage % 8);
                }
            }
        }
        report
    }
}

impl Default for ReportSet {
    fn default() -> Self {
        Self::new()
    }
}

/// N-key-rollover keyboard report: modifier byte plus a usage bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NkroReport {
    pub modifier: u8,
    pub keys: [u8; NKRO_BYTES],
}

impl NkroReport {
    pub fn is_set(&self, code: KeyCode) -> bool {
        match code.modifier_bit() {
            Some(bit) => self.modifier & bit != 0,
            None => {
                let usage = code.usage();
                self.keys[(usage / 8) as usize] & (1 << (usage % 8)) != 0
            }
        }
    }
}

/// Collects the emitted codes of a scan cycle into a [`ReportSet`].
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    current: ReportSet,
    previous: ReportSet,
}

impl ReportAssembler {
    pub const fn new() -> Self {
        Self {
            current: ReportSet::new(),
            previous: ReportSet::new(),
        }
    }

    pub fn begin_cycle(&mut self) {
        self.current.clear();
    }

    /// Records the codes `action` emits. Layer control, config switches
    /// and `NoOp` carry nothing for the transport.
    pub fn add(&mut self, action: impl Into<Action>) {
        if let Some(basic) = action.into().basic() {
            for &code in basic.codes() {
                self.current.insert(code);
            }
        }
    }

    pub fn end_cycle(&mut self) -> ReportSet {
        self.previous = self.current;
        self.current
    }

    /// Report returned by the last `end_cycle`.
    pub fn last(&self) -> &ReportSet {
        &self.previous
    }
}
