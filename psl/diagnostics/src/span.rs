/// The stable identifier of a schema file, as assigned by whoever loaded
/// the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FileId(pub u32);

impl FileId {
    /// Files built in memory without a real origin.
    pub const ZERO: FileId = FileId(0);
    pub const MAX: FileId = FileId(u32::MAX);
}

/// Represents a location in a schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file_id: FileId,
}

impl Span {
    /// Constructor.
    pub fn new(start: usize, end: usize, file_id: FileId) -> Span {
        Span { start, end, file_id }
    }

    /// Creates a new empty span.
    pub fn empty() -> Span {
        Span {
            start: 0,
            end: 0,
            file_id: FileId::MAX,
        }
    }

    /// Is the given position inside the span? (boundaries included)
    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position <= self.end
    }

    /// Is the given span overlapping with the current span.
    pub fn overlaps(self, other: Span) -> bool {
        self.file_id == other.file_id && (self.contains(other.start) || self.contains(other.end))
    }

    /// The number of bytes covered by the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<(FileId, std::ops::Range<usize>)> for Span {
    fn from((file_id, range): (FileId, std::ops::Range<usize>)) -> Self {
        Span {
            start: range.start,
            end: range.end,
            file_id,
        }
    }
}
