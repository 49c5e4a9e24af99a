// src/config/constants.rs
//! System-wide configuration constants

/// Signal acquisition constants
pub mod signal {
    pub const DEFAULT_SAMPLING_HZ: f64 = 1000.0;
    pub const MIN_SAMPLING_HZ: f64 = 1.0;

    /// Column holding the sample timestamps in tabular input
    pub const TIME_COLUMN: &str = "Time_ms";
    pub const LEFT_SUFFIX: &str = "left";
    pub const RIGHT_SUFFIX: &str = "right";
    pub const ENVELOPE_SUFFIX: &str = "_envelope";
}

/// Bandpass filter constants
pub mod filters {
    pub const DEFAULT_LOW_CUTOFF_HZ: f64 = 20.0;
    pub const DEFAULT_HIGH_CUTOFF_HZ: f64 = 450.0;
    /// High cutoff used by the extended lower-limb panel
    pub const PANEL_HIGH_CUTOFF_HZ: f64 = 499.0;
    pub const DEFAULT_FILTER_ORDER: usize = 4;
    pub const MIN_FILTER_ORDER: usize = 1;
    pub const MAX_FILTER_ORDER: usize = 8;
    /// Edge padding factor applied to `2 * order + 1` for zero-phase filtering
    pub const PADDING_FACTOR: usize = 3;
}

/// RMS envelope constants
pub mod envelope {
    pub const DEFAULT_WINDOW_MS: f64 = 200.0;
}

/// Movement window constants
pub mod movement {
    pub const DEFAULT_START_MS: u64 = 1000;
    pub const DEFAULT_END_MS: u64 = 4000;
}

/// Asymmetry scoring constants
pub mod asymmetry {
    /// Stabilises the mean-activation denominator
    pub const EPSILON: f64 = 1e-6;
    pub const DEFAULT_THRESHOLD_PERCENT: f64 = 40.0;
    pub const OUTPUT_DECIMALS: i32 = 2;
}

/// Muscle sets used by the presets
pub mod muscles {
    pub const HIP_FLEXORS: &[&str] = &["iliacus", "psoas"];

    pub const LOWER_LIMB_PANEL: &[&str] = &[
        "tensor_fasciae_latae",
        "rectus_femoris",
        "vastus_lateralis",
        "tibialis_anterior",
        "soleus",
        "gastrocnemius",
        "biceps_femoris",
        "semitendinosus",
    ];
}

/// Configuration file locations and environment overrides
pub mod paths {
    pub const SYSTEM_CONFIG_PATH: &str = "/etc/emg-symmetry/config.toml";
    pub const USER_CONFIG_DIR: &str = ".config/emg-symmetry";
    pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
    pub const LOCAL_CONFIG_FILE: &str = "emg-symmetry.toml";

    pub const ENV_PREFIX: &str = "EMG_";
    /// Separates the section from the key: `EMG_FILTER__HIGH_HZ`
    pub const ENV_SECTION_SEPARATOR: &str = "__";
}
