//! Matrix Market format reader/writer
//!
//! Reads `coordinate` matrices with `real`, `integer` or `pattern` fields and
//! `general`, `symmetric` or `skew-symmetric` symmetry. Anything else with a
//! well-formed banner is reported as [`ParseError::Unsupported`] so batch
//! drivers can skip it.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::ParseError;
use crate::matrix::{CooMatrix, DynamicMatrix, SparseStorage};

/// Upper bound on entries reserved up front from the size line
const MAX_PREALLOCATED: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Symmetry {
    General,
    Symmetric,
    SkewSymmetric,
}

/// Reads a Matrix Market file into a COO-format matrix
pub fn read_matrix_market<P: AsRef<Path>>(path: P) -> Result<DynamicMatrix<f64>, ParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let coo = parse_matrix_market(BufReader::new(file))?;
    info!(
        path = %path.display(),
        nrows = coo.n_rows,
        ncols = coo.n_cols,
        nnz = coo.nnz(),
        "loaded matrix"
    );
    Ok(DynamicMatrix::Coo(coo))
}

/// Parses Matrix Market text from any buffered reader
///
/// Duplicate coordinates are summed; symmetric halves are mirrored.
pub fn parse_matrix_market<R: BufRead>(reader: R) -> Result<CooMatrix<f64>, ParseError> {
    let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (field, symmetry) = match lines.next() {
        Some((_, line)) => parse_banner(&line?)?,
        None => return Err(malformed(1, "empty file")),
    };

    // Size line: first line after the banner that is neither comment nor blank
    let mut size = None;
    for (n, line) in lines.by_ref() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        size = Some((n, parse_size(n, trimmed)?));
        break;
    }
    let (size_line, (n_rows, n_cols, nnz)) = size.ok_or_else(|| malformed(1, "missing size line"))?;

    if symmetry != Symmetry::General && n_rows != n_cols {
        return Err(malformed(size_line, "symmetric matrix must be square"));
    }

    let expanded = match symmetry {
        Symmetry::General => Some(nnz),
        _ => nnz.checked_mul(2),
    }
    .ok_or_else(|| malformed(size_line, "number of non-zeros overflows"))?;
    // The declared count is untrusted until the body has been read
    let mut triplets: Vec<(usize, usize, f64)> = Vec::with_capacity(expanded.min(MAX_PREALLOCATED));

    let mut read = 0;
    for (n, line) in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if read == nnz {
            return Err(malformed(n, format!("more than the declared {} entries", nnz)));
        }

        let mut parts = trimmed.split_whitespace();
        let row = parse_index(n, parts.next(), n_rows, "row")?;
        let col = parse_index(n, parts.next(), n_cols, "column")?;
        let val = match field {
            Field::Pattern => 1.0,
            Field::Real | Field::Integer => parts
                .next()
                .ok_or_else(|| malformed(n, "missing value"))?
                .parse::<f64>()
                .map_err(|e| malformed(n, format!("invalid value: {}", e)))?,
        };

        triplets.push((row, col, val));
        if row != col {
            match symmetry {
                Symmetry::General => {}
                Symmetry::Symmetric => triplets.push((col, row, val)),
                Symmetry::SkewSymmetric => triplets.push((col, row, -val)),
            }
        }
        read += 1;
    }

    if read != nnz {
        return Err(malformed(
            size_line,
            format!("expected {} entries, found {}", nnz, read),
        ));
    }

    debug!(?field, ?symmetry, entries = read, "parsed matrix market body");
    Ok(CooMatrix::from_triplets(n_rows, n_cols, triplets))
}

/// Writes a matrix in `coordinate real general` form with 1-based indices
pub fn write_matrix_market<P: AsRef<Path>>(path: P, matrix: &DynamicMatrix<f64>) -> std::io::Result<()> {
    let coo = matrix.to_coo();
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "%%MatrixMarket matrix coordinate real general")?;
    writeln!(out, "{} {} {}", coo.n_rows, coo.n_cols, coo.nnz())?;
    for (r, c, v) in coo.iter() {
        writeln!(out, "{} {} {}", r + 1, c + 1, v)?;
    }
    out.flush()
}

fn parse_banner(line: &str) -> Result<(Field, Symmetry), ParseError> {
    let tokens: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
    if tokens.first().map(String::as_str) != Some("%%matrixmarket") || tokens.len() != 5 {
        return Err(malformed(1, "missing %%MatrixMarket banner"));
    }

    if tokens[1] != "matrix" {
        return Err(ParseError::Unsupported(format!("object type '{}'", tokens[1])));
    }
    match tokens[2].as_str() {
        "coordinate" => {}
        "array" => return Err(ParseError::Unsupported("dense array layout".to_string())),
        other => return Err(malformed(1, format!("unknown layout '{}'", other))),
    }

    let field = match tokens[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" => Field::Pattern,
        "complex" => return Err(ParseError::Unsupported("complex values".to_string())),
        other => return Err(malformed(1, format!("unknown field '{}'", other))),
    };

    let symmetry = match tokens[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        "skew-symmetric" => Symmetry::SkewSymmetric,
        "hermitian" => return Err(ParseError::Unsupported("hermitian symmetry".to_string())),
        other => return Err(malformed(1, format!("unknown symmetry '{}'", other))),
    };

    Ok((field, symmetry))
}

fn parse_size(n: usize, line: &str) -> Result<(usize, usize, usize), ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(malformed(n, "size line must hold rows, columns and nonzeros"));
    }

    let parse = |s: &str, what: &str| {
        s.parse::<usize>()
            .map_err(|_| malformed(n, format!("invalid number of {}", what)))
    };
    Ok((
        parse(parts[0], "rows")?,
        parse(parts[1], "columns")?,
        parse(parts[2], "non-zeros")?,
    ))
}

/// Converts a 1-based index to 0-based, checking bounds
fn parse_index(n: usize, token: Option<&str>, bound: usize, what: &str) -> Result<usize, ParseError> {
    let idx = token
        .ok_or_else(|| malformed(n, format!("missing {} index", what)))?
        .parse::<usize>()
        .map_err(|_| malformed(n, format!("invalid {} index", what)))?;

    if idx == 0 || idx > bound {
        return Err(malformed(
            n,
            format!("{} index {} outside 1..={}", what, idx, bound),
        ));
    }
    Ok(idx - 1)
}

fn malformed(line: usize, reason: impl Into<String>) -> ParseError {
    ParseError::Malformed {
        line,
        reason: reason.into(),
    }
}
