use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

/// The part of a strip a fill applies to.
///
/// Negative positions count back from the end of the strip, `-1` being the
/// last LED. Anything reaching past the end is clamped to the strip length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRange {
    /// Every LED.
    #[default]
    All,
    /// `length` LEDs starting at `start`; through the last LED when `length` is `None`.
    Start { start: i64, length: Option<i64> },
    /// A sequence range. An open `start` is 0, an open `end` is the end of the strip.
    Span {
        start: Option<i64>,
        end: Option<i64>,
        inclusive: bool,
    },
}

impl FillRange {
    pub fn start(start: i64) -> Self {
        Self::Start {
            start,
            length: None,
        }
    }

    pub fn start_len(start: i64, length: i64) -> Self {
        Self::Start {
            start,
            length: Some(length),
        }
    }

    /// Resolve against a strip of `len` LEDs, yielding the indices to write.
    ///
    /// A negative length or an interval that starts at or past its end
    /// resolves to an empty range; that is a no-op, not an error.
    pub fn resolve(self, len: usize) -> Range<usize> {
        let n = len as i64;
        let (begin, count) = match self {
            FillRange::All => (0, n),
            FillRange::Start { start, length } => {
                let begin = from_end(start, n);
                (begin, length.unwrap_or(n - begin))
            }
            FillRange::Span {
                start,
                end,
                inclusive,
            } => {
                let begin = from_end(start.unwrap_or(0), n);
                let end = match end {
                    Some(end) => {
                        let end = if end < 0 { end + n } else { end };
                        if inclusive {
                            end.saturating_add(1)
                        } else {
                            end
                        }
                    }
                    None => n,
                };
                (begin, end.saturating_sub(begin).max(0))
            }
        };

        if count < 0 {
            return 0..0;
        }
        let end = n.min(begin.saturating_add(count));
        if begin >= end {
            return 0..0;
        }
        begin as usize..end as usize
    }
}

fn from_end(index: i64, n: i64) -> i64 {
    if index < 0 {
        (n + index).max(0)
    } else {
        index
    }
}

impl From<RangeFull> for FillRange {
    fn from(_: RangeFull) -> Self {
        FillRange::All
    }
}

impl From<i64> for FillRange {
    fn from(start: i64) -> Self {
        FillRange::start(start)
    }
}

impl From<(i64, i64)> for FillRange {
    fn from((start, length): (i64, i64)) -> Self {
        FillRange::start_len(start, length)
    }
}

impl From<Range<i64>> for FillRange {
    fn from(r: Range<i64>) -> Self {
        FillRange::Span {
            start: Some(r.start),
            end: Some(r.end),
            inclusive: false,
        }
    }
}

impl From<RangeInclusive<i64>> for FillRange {
    fn from(r: RangeInclusive<i64>) -> Self {
        let (start, end) = r.into_inner();
        FillRange::Span {
            start: Some(start),
            end: Some(end),
            inclusive: true,
        }
    }
}

impl From<RangeFrom<i64>> for FillRange {
    fn from(r: RangeFrom<i64>) -> Self {
        FillRange::Span {
            start: Some(r.start),
            end: None,
            inclusive: false,
        }
    }
}

impl From<RangeTo<i64>> for FillRange {
    fn from(r: RangeTo<i64>) -> Self {
        FillRange::Span {
            start: None,
            end: Some(r.end),
            inclusive: false,
        }
    }
}

impl From<RangeToInclusive<i64>> for FillRange {
    fn from(r: RangeToInclusive<i64>) -> Self {
        FillRange::Span {
            start: None,
            end: Some(r.end),
            inclusive: true,
        }
    }
}
