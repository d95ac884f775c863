//! Plain text matrix format.
//!
//! ```text
//! matrix field=2 rows=2 cols=3
//! 1 0 1
//! 0 1 1
//! ```
//!
//! A file holds one or more matrices back to back. Blank lines and lines
//! starting with `#` are ignored.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{MtxError, Result};
use crate::field::Field;
use crate::matrix::Matrix;

/// Render one matrix, header included, with a trailing newline.
pub fn format_matrix(m: &Matrix) -> String {
    let mut out = format!(
        "matrix field={} rows={} cols={}\n",
        m.field().order(),
        m.rows(),
        m.cols()
    );
    for row in m.row_iter() {
        let line: Vec<String> = row.iter().map(u8::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Render several matrices back to back.
pub fn format_matrices(ms: &[Matrix]) -> String {
    ms.iter().map(format_matrix).collect()
}

/// Parse every matrix in `input`. Matrices over the same field share one
/// [`Field`] instance.
///
/// # Errors
///
/// Returns [`MtxError::Parse`] on malformed headers or rows, and the field
/// errors for unsupported orders or out-of-range entries.
pub fn parse_matrices(input: &str) -> Result<Vec<Matrix>> {
    let mut fields: HashMap<u32, Arc<Field>> = HashMap::new();
    let mut out = Vec::new();
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    while let Some((line_no, header)) = lines.next() {
        let (q, rows, cols) = parse_header(line_no, header)?;
        let field = match fields.get(&q) {
            Some(f) => f.clone(),
            None => {
                let f = Arc::new(Field::new(q)?);
                fields.insert(q, f.clone());
                f
            }
        };
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            let (line_no, line) = lines.next().ok_or_else(|| MtxError::Parse {
                line: line_no,
                message: format!("expected {rows} rows, found {r}"),
            })?;
            let before = data.len();
            for tok in line.split_whitespace() {
                let value: u32 = tok.parse().map_err(|_| MtxError::Parse {
                    line: line_no,
                    message: format!("not a number: {tok:?}"),
                })?;
                data.push(field.check(value)?);
            }
            if data.len() - before != cols {
                return Err(MtxError::Parse {
                    line: line_no,
                    message: format!("expected {cols} entries, found {}", data.len() - before),
                });
            }
        }
        out.push(Matrix::from_vec(field, rows, cols, data)?);
    }
    Ok(out)
}

/// Parse exactly one matrix.
///
/// # Errors
///
/// As [`parse_matrices`], plus a parse error if the input does not hold
/// exactly one matrix.
pub fn parse_matrix(input: &str) -> Result<Matrix> {
    let mut ms = parse_matrices(input)?;
    if ms.len() != 1 {
        return Err(MtxError::Parse {
            line: 1,
            message: format!("expected one matrix, found {}", ms.len()),
        });
    }
    ms.pop().ok_or_else(|| MtxError::Parse {
        line: 1,
        message: "empty input".into(),
    })
}

fn parse_header(line: usize, header: &str) -> Result<(u32, usize, usize)> {
    let err = |message: String| MtxError::Parse { line, message };
    let mut parts = header.split_whitespace();
    if parts.next() != Some("matrix") {
        return Err(err(format!("expected matrix header, found {header:?}")));
    }
    let (mut q, mut rows, mut cols) = (None, None, None);
    for part in parts {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| err(format!("malformed header field {part:?}")))?;
        let value: usize = value
            .parse()
            .map_err(|_| err(format!("malformed value in {part:?}")))?;
        match key {
            "field" => q = Some(value),
            "rows" => rows = Some(value),
            "cols" => cols = Some(value),
            _ => return Err(err(format!("unknown header field {key:?}"))),
        }
    }
    match (q, rows, cols) {
        (Some(q), Some(r), Some(c)) => {
            let q = u32::try_from(q).map_err(|_| MtxError::UnsupportedField(u32::MAX))?;
            Ok((q, r, c))
        }
        _ => Err(err("header needs field, rows and cols".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_it_formats() {
        let f = Arc::new(Field::new(5).unwrap());
        let m = Matrix::from_rows(f, &[vec![1, 2, 3], vec![4, 0, 1]]).unwrap();
        let text = format_matrix(&m);
        assert!(text.starts_with("matrix field=5 rows=2 cols=3\n1 2 3\n"));
        assert_eq!(parse_matrix(&text).unwrap(), m);
    }

    #[test]
    fn several_matrices_share_a_field() {
        let input = "# generators\nmatrix field=4 rows=1 cols=1\n3\n\nmatrix field=4 rows=1 cols=2\n0 2\n";
        let ms = parse_matrices(input).unwrap();
        assert_eq!(ms.len(), 2);
        assert!(Arc::ptr_eq(ms[0].field(), ms[1].field()));
        assert_eq!(ms[1].get(0, 1), 2);
    }

    #[test]
    fn reports_line_numbers() {
        let input = "matrix field=2 rows=2 cols=2\n1 0\n1\n";
        assert_eq!(
            parse_matrices(input),
            Err(MtxError::Parse {
                line: 3,
                message: "expected 2 entries, found 1".into()
            })
        );
        assert!(matches!(
            parse_matrices("matrix field=2 rows=1 cols=1\n2\n"),
            Err(MtxError::ElementOutOfRange { value: 2, q: 2 })
        ));
        assert!(matches!(
            parse_matrices("matrix field=6 rows=0 cols=0\n"),
            Err(MtxError::UnsupportedField(6))
        ));
    }
}
