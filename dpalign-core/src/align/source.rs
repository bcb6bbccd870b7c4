//! Packed per-cell source codes written by the fill sweep.
//!
//! Layout of one trace byte:
//! bits 0-1: direction of the best score (diag, up, left, stop)
//! bits 2-3: predecessor of the Ix (up) gap state
//! bits 4-5: predecessor of the Iy (left) gap state
//! bits 6-7: always zero

use crate::error::{BioError, BioResult};

const DIR_MASK: u8 = 0b11;
const IX_SHIFT: u8 = 2;
const IY_SHIFT: u8 = 4;
const RESERVED_MASK: u8 = 0b1100_0000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceDirection {
    Diagonal,
    Up,
    Left,
    Stop,
}

impl SourceDirection {
    #[inline]
    fn code(self) -> u8 {
        match self {
            SourceDirection::Diagonal => 0,
            SourceDirection::Up => 1,
            SourceDirection::Left => 2,
            SourceDirection::Stop => 3,
        }
    }
}

/// How an affine gap state was entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GapSource {
    /// Continued the same gap run.
    #[default]
    Extend,
    /// Opened after a match/substitution.
    OpenFromMatch,
    /// Opened right after a gap in the other sequence.
    OpenFromOther,
}

impl GapSource {
    #[inline]
    fn code(self) -> u8 {
        match self {
            GapSource::Extend => 0,
            GapSource::OpenFromMatch => 1,
            GapSource::OpenFromOther => 2,
        }
    }

    #[inline]
    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GapSource::Extend),
            1 => Some(GapSource::OpenFromMatch),
            2 => Some(GapSource::OpenFromOther),
            _ => None,
        }
    }
}

/// Decoded trace byte. Linear fills leave both gap sources at `Extend`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trace {
    pub best: SourceDirection,
    pub ix: GapSource,
    pub iy: GapSource,
}

impl Trace {
    pub const STOP: Trace = Trace {
        best: SourceDirection::Stop,
        ix: GapSource::Extend,
        iy: GapSource::Extend,
    };

    #[inline]
    pub fn new(best: SourceDirection) -> Self {
        Trace {
            best,
            ix: GapSource::Extend,
            iy: GapSource::Extend,
        }
    }

    #[inline]
    pub fn with_gaps(best: SourceDirection, ix: GapSource, iy: GapSource) -> Self {
        Trace { best, ix, iy }
    }

    #[inline]
    pub fn encode(self) -> u8 {
        self.best.code() | (self.ix.code() << IX_SHIFT) | (self.iy.code() << IY_SHIFT)
    }

    /// Fails with `TracebackBadSource` on any byte the fill sweep never writes.
    pub fn decode(code: u8, row: usize, col: usize) -> BioResult<Self> {
        let bad = || BioError::TracebackBadSource { code, row, col };
        if code & RESERVED_MASK != 0 {
            return Err(bad());
        }
        let best = match code & DIR_MASK {
            0 => SourceDirection::Diagonal,
            1 => SourceDirection::Up,
            2 => SourceDirection::Left,
            _ => SourceDirection::Stop,
        };
        let ix = GapSource::from_code((code >> IX_SHIFT) & DIR_MASK);
        let iy = GapSource::from_code((code >> IY_SHIFT) & DIR_MASK);
        match (ix, iy) {
            (Some(ix), Some(iy)) => Ok(Trace { best, ix, iy }),
            _ => Err(bad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_written_trace_decodes_back() {
        let dirs = [
            SourceDirection::Diagonal,
            SourceDirection::Up,
            SourceDirection::Left,
            SourceDirection::Stop,
        ];
        let gaps = [
            GapSource::Extend,
            GapSource::OpenFromMatch,
            GapSource::OpenFromOther,
        ];
        for &best in &dirs {
            for &ix in &gaps {
                for &iy in &gaps {
                    let t = Trace::with_gaps(best, ix, iy);
                    assert_eq!(Trace::decode(t.encode(), 1, 1).unwrap(), t);
                }
            }
        }
    }

    #[test]
    fn unwritten_codes_are_rejected() {
        for code in [0b0000_1100u8, 0b0011_0000, 0b0100_0000, 0xff] {
            match Trace::decode(code, 3, 4) {
                Err(BioError::TracebackBadSource { code: c, row, col }) => {
                    assert_eq!((c, row, col), (code, 3, 4));
                }
                other => panic!("code {code:#04x} decoded to {other:?}"),
            }
        }
    }

    #[test]
    fn stop_constant_is_plain_stop() {
        assert_eq!(Trace::STOP.encode(), 3);
        assert_eq!(Trace::new(SourceDirection::Left).encode(), 2);
    }
}
