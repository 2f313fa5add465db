use vmabi_codec::CodecConfig;

/// Separator between hex parts.
pub const DEFAULT_PARTS_SEPARATOR: &str = "@";

/// Controls argument serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerConfig {
    /// String placed between hex-encoded parts. Default: `@`.
    pub parts_separator: String,
    /// Limits applied when decoding each part.
    pub codec: CodecConfig,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            parts_separator: DEFAULT_PARTS_SEPARATOR.to_string(),
            codec: CodecConfig::default(),
        }
    }
}
