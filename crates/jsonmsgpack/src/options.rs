/// Configuration for the JSON → MessagePack encoder.
///
/// # Examples
///
/// ```rust
/// use jsonmsgpack::{EncoderOptions, encode_with};
///
/// let options = EncoderOptions {
///     max_depth: 8,
///     ..Default::default()
/// };
/// assert!(encode_with("[[[[[[[[[1]]]]]]]]]", &options).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Whether to accept any Unicode whitespace between tokens.
    ///
    /// By default only the four JSON whitespace characters are recognized:
    /// space (U+0020), line feed (U+000A), carriage return (U+000D), and
    /// horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Maximum number of simultaneously open objects and arrays.
    ///
    /// Bounds both the container stack of the tree builder and the lexer's
    /// frame stack. Decoding reads at most [`EncoderOptions::DEFAULT_MAX_DEPTH`]
    /// levels, so raising the limit produces documents the decoding functions
    /// reject.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl EncoderOptions {
    /// Default nesting limit, shared with the decoder.
    ///
    /// Kept low enough that the recursive decode and render paths stay
    /// well within a 2 MiB thread stack in debug builds.
    pub const DEFAULT_MAX_DEPTH: usize = 128;
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            allow_unicode_whitespace: false,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
