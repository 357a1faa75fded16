#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
/// A set of coordinates to identify a precise spot in a source file.
///
/// Unlike `std::panic::Location`, this is an owned, (de)serializable value so it can
/// travel alongside the rest of the IR between compiler stages and into diagnostics.
pub struct Location {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset into the source file, used to build `proc_macro2`/`miette` spans
    /// without re-lexing the file.
    pub offset: usize,
    /// The path of the source file, relative to the crate root that was handed to `nuruc`.
    pub file: String,
}

impl Location {
    pub fn new(line: u32, column: u32, offset: usize, file: impl Into<String>) -> Self {
        Self {
            line,
            column,
            offset,
            file: file.into(),
        }
    }
}
