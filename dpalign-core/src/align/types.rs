/// Byte written opposite a residue wherever an alignment places a gap.
pub const GAP_CODE: u8 = b'-';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlignmentMode {
    /// Needleman-Wunsch: both sequences end to end.
    Global,
    /// Smith-Waterman: best-scoring pair of substrings.
    Local,
    /// Semi-global: leading and trailing end gaps are free.
    Overlap,
}

impl AlignmentMode {
    pub fn name(self) -> &'static str {
        match self {
            AlignmentMode::Global => "Needleman-Wunsch",
            AlignmentMode::Local => "Smith-Waterman",
            AlignmentMode::Overlap => "Pairwise-Overlap",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AlignmentMode::Global => {
                "global alignment of two complete sequences, end gaps penalized"
            }
            AlignmentMode::Local => "local alignment of the best-scoring common region",
            AlignmentMode::Overlap => {
                "overlap alignment consuming at least one sequence, end gaps free"
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GapModel {
    /// Every gap position costs `gap_open`.
    Linear,
    /// First gap position costs `gap_open`, each further one `gap_extend`.
    #[default]
    Affine,
}

/// Memory layout of the score matrix during the fill sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatrixLayout {
    /// Full `(n+1) x (m+1)` score and source grids addressed by `(row, col)`.
    #[default]
    Dense,
    /// One score row plus a flat source grid addressed by linear cell index.
    Rolling,
}

/// CIGAR operations consume sequence coordinates.
/// Ins consumes the first sequence (gap in second), Del consumes the second (gap in first).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CigarOp {
    /// Consumes both sequences.
    Match,
    /// Consumes first, gap in second.
    Ins,
    /// Consumes second, gap in first.
    Del,
}

impl CigarOp {
    pub fn code(self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Ins => 'I',
            CigarOp::Del => 'D',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Cigar {
    pub ops: Vec<(CigarOp, usize)>,
}

impl Cigar {
    pub fn push(&mut self, op: CigarOp, len: usize) {
        if len == 0 {
            return;
        }
        if let Some((last_op, last_len)) = self.ops.last_mut() {
            if *last_op == op {
                *last_len += len;
                return;
            }
        }
        self.ops.push((op, len));
    }

    pub fn len(&self) -> usize {
        self.ops.iter().map(|(_, n)| *n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl std::fmt::Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (op, len) in &self.ops {
            write!(f, "{}{}", len, op.code())?;
        }
        Ok(())
    }
}

/// One optimal alignment of a pair of sequences.
///
/// Offsets are expressed in coordinates of the original inputs.
/// `start_offsets` and `end_offsets` bound (inclusively) the residues that
/// appear in the aligned rows; `first_offset`/`second_offset` say how far one
/// sequence must be shifted right so both alignment starts line up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentResult {
    pub first_aligned: Vec<u8>,
    pub second_aligned: Vec<u8>,
    pub score: i32,
    pub first_offset: usize,
    pub second_offset: usize,
    pub start_offsets: [usize; 2],
    pub end_offsets: [usize; 2],
    /// Gap codes inserted into the first and second aligned rows.
    pub insertions: [usize; 2],
}

impl AlignmentResult {
    pub fn aligned_len(&self) -> usize {
        self.first_aligned.len()
    }

    /// Signed shift of the second sequence relative to the first.
    pub fn offset_delta(&self) -> isize {
        self.second_offset as isize - self.first_offset as isize
    }

    pub fn ungapped_first(&self) -> Vec<u8> {
        ungapped(&self.first_aligned)
    }

    pub fn ungapped_second(&self) -> Vec<u8> {
        ungapped(&self.second_aligned)
    }

    pub fn cigar(&self) -> Cigar {
        let mut cigar = Cigar::default();
        for (&a, &b) in self.first_aligned.iter().zip(&self.second_aligned) {
            let op = if a == GAP_CODE {
                CigarOp::Del
            } else if b == GAP_CODE {
                CigarOp::Ins
            } else {
                CigarOp::Match
            };
            cigar.push(op, 1);
        }
        cigar
    }
}

fn ungapped(aligned: &[u8]) -> Vec<u8> {
    aligned.iter().copied().filter(|&b| b != GAP_CODE).collect()
}
