/// Number of physical switch positions (3x12 split plus 6 thumb keys).
pub const NUM_KEYS: usize = 42;

/// Number of independent keymap tables that can be switched between.
pub const NUM_CONFIGS: usize = 3;

/// Number of layers per keymap table, base layer included.
pub const NUM_LAYERS: usize = 6;

/// Whether the board is split into two halves.
pub const IS_SPLIT: bool = true;

/// Layers that can sit on the stack above the base layer.
pub const MAX_ACTIVE_LAYERS: usize = NUM_LAYERS - 1;

/// Codes a single chord key emits at once.
pub const MAX_CHORD_CODES: usize = 3;

/// Every physical key emitting its largest chord at once.
pub const REPORT_CAPACITY: usize = NUM_KEYS * MAX_CHORD_CODES;

/// Consecutive identical samples required before a level is accepted.
pub const DEFAULT_DEBOUNCE_SAMPLES: u8 = 5;

/// Cycle ticks a tap-hold key must be held before it resolves as hold.
pub const DEFAULT_TAP_HOLD_TICKS: u32 = 200;

// Indices are stored as u8.
const _: () = assert!(NUM_KEYS <= u8::MAX as usize);
const _: () = assert!(NUM_LAYERS >= 1 && NUM_LAYERS <= u8::MAX as usize);
const _: () = assert!(NUM_CONFIGS >= 1 && NUM_CONFIGS <= u8::MAX as usize);
