/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Braid history ring capacity (bounded; oldest evicted first)
pub const BRAID_HISTORY_CAPACITY: usize = 256;

/// Activation snapshots kept for the classifier's coherence lookback
pub const ACTIVATION_HISTORY_CAPACITY: usize = 50;

/// Bridge event buffer capacity
pub const EVENT_CAPACITY: usize = 512;

/// Bridge projection buffer capacity
pub const PROJECTION_CAPACITY: usize = 256;

/// Bridge transcendence buffer capacity
pub const TRANSCENDENCE_CAPACITY: usize = 256;

/// Per-age weight applied to event vectors during projection: decay^age
pub const PROJECTION_DECAY: f64 = 0.85;

/// Events folded into one projection
pub const PROJECTION_WINDOW: usize = 7;

/// Projections folded into one transcendence
pub const TRANSCENDENCE_WINDOW: usize = 5;

/// Integration vector width (hash features + emotional + archetypal tags)
pub const INTEGRATION_VECTOR_LEN: usize = 12;

/// Hash-derived text features per event vector
pub const TEXT_FEATURE_LEN: usize = 7;

/// Meta vector width emitted by transcendence
pub const META_VECTOR_LEN: usize = 10;

/// Gradient width emitted by transcendence
pub const GRADIENT_LEN: usize = 5;

/// Shard lookback window for the qualia synergy index
pub const SYNERGY_LOOKBACK: usize = 10;

/// Shard buffer capacity
pub const SHARD_CAPACITY: usize = 256;

/// Pairs scoring above this enter the synergy index
pub const SYNERGY_THRESHOLD: f64 = 0.7;

/// Symbolic recursion guard depth
pub const MAX_RECURSION: usize = 5;

/// Meaning vector width per symbolic node
pub const MEANING_VECTOR_LEN: usize = 8;

/// Reflection history capacity
pub const REFLECTION_CAPACITY: usize = 256;

/// Checkpoint history capacity
pub const CHECKPOINT_CAPACITY: usize = 128;

/// Continuity status boundary: maintained at or above this
pub const CONTINUITY_THRESHOLD: f64 = 0.75;

/// Exponential smoothing rate for the adaptive identity baseline
pub const ADAPTATION_RATE: f64 = 0.1;

/// Episode log default capacity
pub const LOG_CAPACITY: usize = 1000;

/// Unity metrics history capacity
pub const UNITY_HISTORY_CAPACITY: usize = 100;
