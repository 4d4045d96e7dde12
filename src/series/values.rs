use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure reading a numeric value file.
#[derive(Debug, Error)]
pub enum ValueFileError {
    #[error("cannot read \"{path}\": {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("\"{path}\" line {line}: no column {column}")]
    MissingColumn {
        path: PathBuf,
        line: usize,
        column: usize,
    },
    #[error("\"{path}\" line {line}: cannot parse \"{value}\" as a number")]
    Parse {
        path: PathBuf,
        line: usize,
        value: String,
    },
    #[error("\"{path}\" contains no values")]
    Empty { path: PathBuf },
}

/// Reads one numeric column from a CSV file.
///
/// A leading row whose value does not parse is treated as a header and
/// skipped; any later unparsable value is an error.
///
/// # Errors
///
/// Returns a `ValueFileError` if the file cannot be read, a row is missing
/// the column, a value is not numeric, or no values were found.
pub fn read_values(path: &Path, column: usize) -> Result<Vec<f64>, ValueFileError> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| ValueFileError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    collect_values(rdr, path, column)
}

/// Same as [`read_values`] over any reader; `path` only labels errors.
pub fn parse_values(
    reader: impl Read,
    path: &Path,
    column: usize,
) -> Result<Vec<f64>, ValueFileError> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect_values(rdr, path, column)
}

fn collect_values<R: Read>(
    mut rdr: csv::Reader<R>,
    path: &Path,
    column: usize,
) -> Result<Vec<f64>, ValueFileError> {
    let mut values = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.map_err(|source| ValueFileError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = idx + 1;
        let field = record.get(column).ok_or(ValueFileError::MissingColumn {
            path: path.to_path_buf(),
            line,
            column,
        })?;
        match field.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) if idx == 0 => continue,
            Err(_) => {
                return Err(ValueFileError::Parse {
                    path: path.to_path_buf(),
                    line,
                    value: field.to_string(),
                });
            }
        }
    }

    if values.is_empty() {
        return Err(ValueFileError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(values)
}
