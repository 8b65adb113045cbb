//! # Dispatcher Configuration

/// Default call-data limit per operation (128 KiB).
pub const DEFAULT_MAX_CALL_DATA_LEN: usize = 128 * 1024;

/// Dispatcher configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Longest call data accepted for a single operation
    pub max_call_data_len: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_call_data_len: DEFAULT_MAX_CALL_DATA_LEN,
        }
    }
}

impl DispatcherConfig {
    /// Create config for testing with a small call-data limit.
    pub fn for_testing() -> Self {
        Self {
            max_call_data_len: 1024,
        }
    }
}
