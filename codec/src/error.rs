pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer: expected {expected} bytes, {remaining} left")]
    UnexpectedEof { expected: usize, remaining: usize },
    #[error("invalid bool byte: {0:#04x}")]
    InvalidBool(u8),
    #[error("invalid utf-8 string")]
    InvalidUtf8,
    #[error("invalid uleb128 value")]
    InvalidUleb128,
    #[error("{0} trailing bytes left after decoding")]
    TrailingBytes(usize),
    #[error("unsupported element type: {0}")]
    UnsupportedElementType(String),
    #[error("invalid address: {0}")]
    InvalidAddress(&'static str),
    #[error("invalid {ty} value: {reason}")]
    InvalidValue { ty: &'static str, reason: String },
    #[error("invalid `{function}` result: {reason}")]
    InvalidShape {
        function: &'static str,
        reason: String,
    },
}
