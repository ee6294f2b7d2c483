use std::ops::Range;

use derive_more::{AsMut, AsRef, Deref, DerefMut, From};

/// A byte range into the compiled source text.
#[derive(Default, Clone, Debug, PartialEq, Eq, Deref, DerefMut, AsRef, AsMut, From)]
pub struct Span(Range<usize>);

impl Span {
    pub fn new(range: Range<usize>) -> Self {
        Self(range)
    }
    pub fn empty_at(offset: usize) -> Self {
        Self(offset..offset)
    }
    pub fn range(&self) -> Range<usize> {
        self.0.clone()
    }
    pub fn extend(&self, other: &Span) -> Self {
        Self(self.start..other.end)
    }
}
