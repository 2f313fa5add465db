/// Default maximum accepted length prefix: 16 MiB.
pub const DEFAULT_MAX_LENGTH: usize = 16 * 1024 * 1024;

/// Controls decoding limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest length prefix a decoder accepts, in bytes for strings, byte
    /// buffers and big integers, or in elements for lists. Default: 16 MiB.
    pub max_length: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}
