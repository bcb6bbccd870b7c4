use super::storage::NEG_INF;
use super::types::{GapModel, MatrixLayout, GAP_CODE};
use crate::error::{BioError, BioResult};

const UNMAPPED: u8 = 255;

/// Keeps every reachable score at least half the sentinel distance away from
/// `NEG_INF`, so sentinel arithmetic can never wrap or tie a real score.
const MAX_SAFE_SCORE: i64 = (i32::MAX / 8) as i64;

const BLOSUM62_SYMBOLS: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX*";

#[rustfmt::skip]
const BLOSUM62: [i32; 24 * 24] = [
//   A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];

/// Lookup for the built-in table, checked at compile time.
const BLOSUM62_MAP: [u8; 256] = blosum62_map();

const fn blosum62_map() -> [u8; 256] {
    let mut map = [UNMAPPED; 256];
    let mut i = 0;
    while i < BLOSUM62_SYMBOLS.len() {
        let b = BLOSUM62_SYMBOLS[i];
        assert!(map[b as usize] == UNMAPPED, "duplicate BLOSUM62 symbol");
        map[b as usize] = i as u8;
        map[b.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    map
}

/// Square substitution table over an explicit symbol set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreTable {
    symbols: Vec<u8>,
    map: [u8; 256],
    scores: Vec<i32>,
    worst: i32,
}

impl ScoreTable {
    pub fn new(symbols: &[u8], scores: Vec<i32>) -> BioResult<Self> {
        let n = symbols.len();
        if n == 0 || n >= UNMAPPED as usize {
            return Err(BioError::InvalidScoring {
                msg: format!("score table needs 1..=254 symbols, got {n}"),
            });
        }
        if scores.len() != n * n {
            return Err(BioError::InvalidScoring {
                msg: format!(
                    "score table for {n} symbols needs {} values, got {}",
                    n * n,
                    scores.len()
                ),
            });
        }
        let map = build_map(symbols)?;
        let worst = scores.iter().copied().min().unwrap_or(0);
        Ok(Self {
            symbols: symbols.to_vec(),
            map,
            scores,
            worst,
        })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[inline]
    fn index(&self, b: u8) -> Option<usize> {
        match self.map[b as usize] {
            UNMAPPED => None,
            v => Some(v as usize),
        }
    }

    /// Unknown residues score as the worst entry of the table.
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        match (self.index(a), self.index(b)) {
            (Some(i), Some(j)) => self.scores[i * self.symbols.len() + j],
            _ => self.worst,
        }
    }

    pub fn contains(&self, b: u8) -> bool {
        self.index(b).is_some()
    }
}

fn build_map(symbols: &[u8]) -> BioResult<[u8; 256]> {
    let mut map = [UNMAPPED; 256];
    for (i, &b) in symbols.iter().enumerate() {
        if map[b as usize] != UNMAPPED {
            return Err(BioError::InvalidScoring {
                msg: format!("duplicate symbol '{}' in score table", b as char),
            });
        }
        map[b as usize] = i as u8;
    }
    // be forgiving: lower case residues share the upper case row
    for &b in symbols {
        let lower = b.to_ascii_lowercase();
        if map[lower as usize] == UNMAPPED {
            map[lower as usize] = map[b as usize];
        }
    }
    Ok(map)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimilarityMatrix {
    /// Scores raw residue bytes: equal bytes match, anything else mismatches.
    Diagonal { match_score: i32, mismatch_score: i32 },
    Table(ScoreTable),
}

impl SimilarityMatrix {
    pub fn diagonal(match_score: i32, mismatch_score: i32) -> Self {
        SimilarityMatrix::Diagonal {
            match_score,
            mismatch_score,
        }
    }

    pub fn new(symbols: &[u8], scores: Vec<i32>) -> BioResult<Self> {
        ScoreTable::new(symbols, scores).map(SimilarityMatrix::Table)
    }

    pub fn blosum62() -> Self {
        SimilarityMatrix::Table(ScoreTable {
            symbols: BLOSUM62_SYMBOLS.to_vec(),
            map: BLOSUM62_MAP,
            scores: BLOSUM62.to_vec(),
            worst: -4,
        })
    }

    /// Parses NCBI-style matrix text: `#` comments, a header row of symbols,
    /// then one row per symbol, labelled, in header order.
    pub fn from_text(text: &str) -> BioResult<Self> {
        let mut header: Option<Vec<u8>> = None;
        let mut scores = Vec::new();
        let mut rows_seen = 0usize;
        let mut last_line = 0usize;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            last_line = line_no;
            let Some(symbols) = header.as_ref() else {
                header = Some(parse_symbols(line.split_whitespace(), line_no)?);
                continue;
            };

            let mut fields = line.split_whitespace();
            let label = parse_symbols(fields.next(), line_no)?;
            if rows_seen >= symbols.len() {
                return Err(matrix_error("more rows than header symbols", line_no));
            }
            if label[0] != symbols[rows_seen] {
                return Err(matrix_error(
                    format!(
                        "row '{}' out of order, expected '{}'",
                        label[0] as char, symbols[rows_seen] as char
                    ),
                    line_no,
                ));
            }
            let before = scores.len();
            for field in fields {
                let v: i32 = field
                    .parse()
                    .map_err(|_| matrix_error(format!("invalid score '{field}'"), line_no))?;
                scores.push(v);
            }
            if scores.len() - before != symbols.len() {
                return Err(matrix_error(
                    format!(
                        "expected {} scores, found {}",
                        symbols.len(),
                        scores.len() - before
                    ),
                    line_no,
                ));
            }
            rows_seen += 1;
        }

        let Some(symbols) = header else {
            return Err(matrix_error("missing header row", last_line));
        };
        if rows_seen != symbols.len() {
            return Err(matrix_error(
                format!("expected {} rows, found {rows_seen}", symbols.len()),
                last_line,
            ));
        }
        SimilarityMatrix::new(&symbols, scores)
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        match self {
            SimilarityMatrix::Diagonal {
                match_score,
                mismatch_score,
            } => {
                if a == b {
                    *match_score
                } else {
                    *mismatch_score
                }
            }
            SimilarityMatrix::Table(table) => table.score(a, b),
        }
    }

    /// Rejects gap codes, and residues a score table has no row for.
    pub fn validate_sequence(&self, seq: &[u8]) -> BioResult<()> {
        for (pos, &b) in seq.iter().enumerate() {
            let known = match self {
                SimilarityMatrix::Diagonal { .. } => true,
                SimilarityMatrix::Table(table) => table.contains(b),
            };
            if b == GAP_CODE || !known {
                return Err(BioError::InvalidChar { ch: b as char, pos });
            }
        }
        Ok(())
    }

    pub fn max_abs_score(&self) -> i64 {
        match self {
            SimilarityMatrix::Diagonal {
                match_score,
                mismatch_score,
            } => (*match_score as i64).abs().max((*mismatch_score as i64).abs()),
            SimilarityMatrix::Table(table) => table
                .scores
                .iter()
                .map(|&v| (v as i64).abs())
                .max()
                .unwrap_or(0),
        }
    }
}

fn parse_symbols<'a>(
    fields: impl IntoIterator<Item = &'a str>,
    line: usize,
) -> BioResult<Vec<u8>> {
    let mut out = Vec::new();
    for field in fields {
        match field.as_bytes() {
            [b] => out.push(*b),
            _ => return Err(matrix_error(format!("invalid symbol '{field}'"), line)),
        }
    }
    if out.is_empty() {
        return Err(matrix_error("missing symbol", line));
    }
    Ok(out)
}

fn matrix_error(msg: impl Into<String>, line: usize) -> BioError {
    BioError::MatrixFormat {
        msg: msg.into(),
        line,
    }
}

/// Substitution scores plus gap costs, and the DP layout to run them with.
///
/// Gap costs are negative numbers (`gap_open = -8`, not `8`). In linear mode
/// `gap_extend` mirrors `gap_open`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostModel {
    pub matrix: SimilarityMatrix,
    pub gap_open: i32,
    pub gap_extend: i32,
    pub gap_model: GapModel,
    pub layout: MatrixLayout,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::affine(SimilarityMatrix::diagonal(2, -2), -8, -1)
    }
}

impl CostModel {
    pub fn linear(matrix: SimilarityMatrix, gap: i32) -> Self {
        Self {
            matrix,
            gap_open: gap,
            gap_extend: gap,
            gap_model: GapModel::Linear,
            layout: MatrixLayout::Dense,
        }
    }

    pub fn affine(matrix: SimilarityMatrix, gap_open: i32, gap_extend: i32) -> Self {
        Self {
            matrix,
            gap_open,
            gap_extend,
            gap_model: GapModel::Affine,
            layout: MatrixLayout::Dense,
        }
    }

    pub fn with_layout(mut self, layout: MatrixLayout) -> Self {
        self.layout = layout;
        self
    }

    #[inline]
    pub fn similarity(&self, a: u8, b: u8) -> i32 {
        self.matrix.score(a, b)
    }

    pub fn is_affine(&self) -> bool {
        self.gap_model == GapModel::Affine
    }

    /// Cost of each gap position after the first.
    #[inline]
    pub fn extension_cost(&self) -> i32 {
        match self.gap_model {
            GapModel::Linear => self.gap_open,
            GapModel::Affine => self.gap_extend,
        }
    }

    /// Total cost of a gap run of `len` positions.
    #[inline]
    pub fn gap_run_cost(&self, len: usize) -> i32 {
        // lengths past i32::MAX are refused by check_score_bound
        match i32::try_from(len) {
            Ok(0) => 0,
            Ok(len) => self.gap_open + (len - 1) * self.extension_cost(),
            Err(_) => NEG_INF,
        }
    }

    pub fn max_abs_score(&self) -> i64 {
        self.matrix
            .max_abs_score()
            .max((self.gap_open as i64).abs())
            .max((self.extension_cost() as i64).abs())
    }

    /// Checks that no path through an `n x m` grid can approach the sentinel.
    pub fn check_score_bound(&self, first_len: usize, second_len: usize) -> BioResult<()> {
        let len = first_len.saturating_add(second_len);
        let bound = self
            .max_abs_score()
            .saturating_mul(i64::try_from(len).unwrap_or(i64::MAX));
        if i32::try_from(len).is_err() {
            return Err(BioError::ScoreOverflowRisk { bound, len });
        }
        if bound > MAX_SAFE_SCORE {
            return Err(BioError::ScoreOverflowRisk { bound, len });
        }
        Ok(())
    }

    pub(crate) fn warn_on_positive_gaps(&self) {
        if self.gap_open > 0 {
            log::warn!("gap open cost {} > 0, possible error", self.gap_open);
        }
        if self.is_affine() && self.gap_extend > 0 {
            log::warn!("gap extension cost {} > 0, possible error", self.gap_extend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_scores_raw_bytes() {
        let m = SimilarityMatrix::diagonal(5, -4);
        assert_eq!(m.score(b'A', b'A'), 5);
        assert_eq!(m.score(b'A', b'a'), -4);
        assert_eq!(m.max_abs_score(), 5);
    }

    #[test]
    fn blosum62_known_entries() {
        let m = SimilarityMatrix::blosum62();
        assert_eq!(m.score(b'W', b'W'), 11);
        assert_eq!(m.score(b'A', b'A'), 4);
        assert_eq!(m.score(b'C', b'C'), 9);
        assert_eq!(m.score(b'D', b'E'), 2);
        assert_eq!(m.score(b'w', b'W'), 11);
        assert_eq!(m.score(b'*', b'A'), -4);
        // unknown residue scores as the worst entry
        assert_eq!(m.score(b'J', b'A'), -4);
    }

    #[test]
    fn blosum62_map_covers_every_symbol() {
        let built = build_map(BLOSUM62_SYMBOLS).unwrap();
        assert_eq!(BLOSUM62_MAP, built);
        for (i, &b) in BLOSUM62_SYMBOLS.iter().enumerate() {
            assert_eq!(BLOSUM62_MAP[b as usize] as usize, i);
            assert_eq!(BLOSUM62_MAP[b.to_ascii_lowercase() as usize] as usize, i);
        }
        let m = SimilarityMatrix::blosum62();
        assert!(m.validate_sequence(b"ARNDCQEGHILKMFPSTWYVBZX*").is_ok());
        assert!(m.validate_sequence(b"arndcqeghilkmfpstwyvbzx").is_ok());
    }

    #[test]
    fn zero_costs_still_bound_lengths() {
        let zero = CostModel::linear(SimilarityMatrix::diagonal(0, 0), 0);
        assert_eq!(zero.max_abs_score(), 0);
        assert!(zero.check_score_bound(1000, 1000).is_ok());
        let too_long = i32::MAX as usize;
        assert!(matches!(
            zero.check_score_bound(too_long, 1),
            Err(BioError::ScoreOverflowRisk { bound: 0, .. })
        ));
        assert_eq!(zero.gap_run_cost(i32::MAX as usize), 0);
        assert_eq!(zero.gap_run_cost(usize::MAX), NEG_INF);
    }

    #[test]
    fn blosum62_is_symmetric() {
        let n = BLOSUM62_SYMBOLS.len();
        for i in 0..n {
            for j in 0..n {
                assert_eq!(BLOSUM62[i * n + j], BLOSUM62[j * n + i], "({i}, {j})");
            }
        }
    }

    #[test]
    fn table_rejects_bad_shape_and_duplicates() {
        assert!(matches!(
            SimilarityMatrix::new(b"AC", vec![1, 2, 3]),
            Err(BioError::InvalidScoring { .. })
        ));
        assert!(matches!(
            SimilarityMatrix::new(b"AA", vec![1, 0, 0, 1]),
            Err(BioError::InvalidScoring { .. })
        ));
    }

    #[test]
    fn parse_matrix_text() {
        let text = "# toy nucleotide matrix\n\
                    \n   A  C  G  T\n\
                    A  5 -4 -4 -4\n\
                    C -4  5 -4 -4\n\
                    G -4 -4  5 -4\n\
                    T -4 -4 -4  5\n";
        let m = SimilarityMatrix::from_text(text).unwrap();
        assert_eq!(m.score(b'A', b'A'), 5);
        assert_eq!(m.score(b'G', b'T'), -4);
        assert_eq!(m.score(b't', b't'), 5);
        assert!(m.validate_sequence(b"ACGTacgt").is_ok());
    }

    #[test]
    fn parse_matrix_text_errors() {
        let short_row = "  A C\nA 1 0\nC 0\n";
        match SimilarityMatrix::from_text(short_row).unwrap_err() {
            BioError::MatrixFormat { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other:?}"),
        }
        let out_of_order = "  A C\nC 1 0\nA 0 1\n";
        assert!(matches!(
            SimilarityMatrix::from_text(out_of_order),
            Err(BioError::MatrixFormat { line: 2, .. })
        ));
        let bad_value = "  A C\nA 1 x\nC 0 1\n";
        assert!(matches!(
            SimilarityMatrix::from_text(bad_value),
            Err(BioError::MatrixFormat { line: 2, .. })
        ));
        assert!(matches!(
            SimilarityMatrix::from_text("# only comments\n"),
            Err(BioError::MatrixFormat { .. })
        ));
        let missing_row = "  A C\nA 1 0\n";
        assert!(matches!(
            SimilarityMatrix::from_text(missing_row),
            Err(BioError::MatrixFormat { line: 2, .. })
        ));
    }

    #[test]
    fn validate_sequence_rejects_gaps_and_unknown() {
        let m = SimilarityMatrix::blosum62();
        match m.validate_sequence(b"MKJ").unwrap_err() {
            BioError::InvalidChar { ch, pos } => {
                assert_eq!(ch, 'J');
                assert_eq!(pos, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
        let d = SimilarityMatrix::diagonal(1, -1);
        assert!(matches!(
            d.validate_sequence(b"AC-T"),
            Err(BioError::InvalidChar { ch: '-', pos: 2 })
        ));
    }

    #[test]
    fn cost_model_defaults_and_bounds() {
        let cost = CostModel::default();
        assert_eq!(cost.gap_open, -8);
        assert_eq!(cost.gap_extend, -1);
        assert!(cost.is_affine());
        assert_eq!(cost.layout, MatrixLayout::Dense);

        let linear = CostModel::linear(SimilarityMatrix::diagonal(1, -1), -3)
            .with_layout(MatrixLayout::Rolling);
        assert_eq!(linear.extension_cost(), -3);
        assert_eq!(linear.gap_run_cost(0), 0);
        assert_eq!(linear.gap_run_cost(4), -12);
        assert_eq!(cost.gap_run_cost(4), -11);
        assert_eq!(linear.layout, MatrixLayout::Rolling);
        assert!(linear.check_score_bound(1000, 1000).is_ok());

        let huge = CostModel::linear(SimilarityMatrix::diagonal(1_000_000, -1), -1);
        assert!(matches!(
            huge.check_score_bound(1000, 1000),
            Err(BioError::ScoreOverflowRisk { .. })
        ));
    }
}
