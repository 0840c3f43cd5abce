//! ESRI ASCII raster grids.
//!
//! A file is a short header of `key value` lines followed by `nrows` rows of
//! `ncols` values, northernmost row first:
//!
//! ```text
//! ncols        4
//! nrows        3
//! xllcorner    0.0
//! yllcorner    0.0
//! cellsize     10.0
//! NODATA_value -9999
//! 1 2 3 4
//! ...
//! ```
//!
//! Header keys are case-insensitive. The lower-left reference may be given
//! as a cell corner (`xllcorner`/`yllcorner`) or a cell center
//! (`xllcenter`/`yllcenter`); grid nodes sit at cell centers either way.
//! Values equal to `NODATA_value` are returned as read; [`count_nodata`]
//! reports how many there are.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use lakeflex_core::{GridError, RasterGrid, Spacing};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AsciiError {
    #[error("cannot access `{}`", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("header is missing `{key}`")]
    MissingKey { key: &'static str },

    #[error("header key `{key}` appears more than once")]
    DuplicateKey { key: String },

    #[error("`{token}` is not a valid value for `{key}`")]
    BadHeaderValue { key: String, token: String },

    #[error("`{token}` is not a number (value {index})")]
    BadValue { index: usize, token: String },

    #[error("expected {expected} values, found {found}")]
    ValueCount { expected: usize, found: usize },

    #[error("cells must be square to write ESRI ASCII, got dx={dx}, dy={dy}")]
    NonSquareCells { dx: f64, dy: f64 },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Header values of an ESRI ASCII grid, with the origin at a cell center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    pub ncols: usize,
    pub nrows: usize,
    pub x_center: f64,
    pub y_center: f64,
    pub cellsize: f64,
    pub nodata_value: Option<f64>,
}

#[derive(Debug, Default)]
struct RawHeader {
    ncols: Option<usize>,
    nrows: Option<usize>,
    x: Option<Corner>,
    y: Option<Corner>,
    cellsize: Option<f64>,
    nodata_value: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Corner {
    Corner(f64),
    Center(f64),
}

impl Corner {
    fn center(self, cellsize: f64) -> f64 {
        match self {
            Self::Corner(v) => v + 0.5 * cellsize,
            Self::Center(v) => v,
        }
    }
}

impl RawHeader {
    /// Records `key value`, returning false if `key` is not a header key.
    fn accept(&mut self, key: &str, token: &str) -> Result<bool, AsciiError> {
        let lower = key.to_ascii_lowercase();
        let bad = || AsciiError::BadHeaderValue {
            key: key.to_owned(),
            token: token.to_owned(),
        };
        let count = || token.parse::<usize>().map_err(|_| bad());
        let real = || {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(bad)
        };

        let filled = match lower.as_str() {
            "ncols" => self.ncols.replace(count()?).is_some(),
            "nrows" => self.nrows.replace(count()?).is_some(),
            "xllcorner" => self.x.replace(Corner::Corner(real()?)).is_some(),
            "xllcenter" => self.x.replace(Corner::Center(real()?)).is_some(),
            "yllcorner" => self.y.replace(Corner::Corner(real()?)).is_some(),
            "yllcenter" => self.y.replace(Corner::Center(real()?)).is_some(),
            "cellsize" => self.cellsize.replace(real()?).is_some(),
            "nodata_value" => self.nodata_value.replace(real()?).is_some(),
            _ => return Ok(false),
        };
        if filled {
            return Err(AsciiError::DuplicateKey { key: lower });
        }
        Ok(true)
    }

    fn finish(self) -> Result<Header, AsciiError> {
        let cellsize = self.cellsize.ok_or(AsciiError::MissingKey { key: "cellsize" })?;
        Ok(Header {
            ncols: self.ncols.ok_or(AsciiError::MissingKey { key: "ncols" })?,
            nrows: self.nrows.ok_or(AsciiError::MissingKey { key: "nrows" })?,
            x_center: self
                .x
                .ok_or(AsciiError::MissingKey { key: "xllcorner" })?
                .center(cellsize),
            y_center: self
                .y
                .ok_or(AsciiError::MissingKey { key: "yllcorner" })?
                .center(cellsize),
            cellsize,
            nodata_value: self.nodata_value,
        })
    }
}

/// Reads an ESRI ASCII file.
///
/// Returns a grid without fields and the node values in the grid's node order
/// (southern row first).
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a well-formed grid.
pub fn read_esri_ascii(path: impl AsRef<Path>) -> Result<(RasterGrid, Vec<f64>), AsciiError> {
    let (_, grid, values) = read_with_header(path)?;
    Ok((grid, values))
}

/// Reads an ESRI ASCII file, keeping its header.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a well-formed grid.
pub fn read_with_header(
    path: impl AsRef<Path>,
) -> Result<(Header, RasterGrid, Vec<f64>), AsciiError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AsciiError::File {
        path: path.to_owned(),
        source,
    })?;
    let (header, values) = read_from(BufReader::new(file))?;
    log::debug!(
        "read {}x{} grid from {} (cellsize {})",
        header.nrows,
        header.ncols,
        path.display(),
        header.cellsize,
    );
    Ok((header, grid_for(&header)?, values))
}

/// Number of values equal to the header's `NODATA_value`.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn count_nodata(header: &Header, values: &[f64]) -> usize {
    header
        .nodata_value
        .map_or(0, |nodata| values.iter().filter(|&&v| v == nodata).count())
}

/// Parses an ESRI ASCII grid from a reader.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a well-formed grid.
pub fn read_from<R: BufRead>(mut reader: R) -> Result<(Header, Vec<f64>), AsciiError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut tokens = text.split_whitespace();
    let mut raw = RawHeader::default();
    loop {
        let mut lookahead = tokens.clone();
        let (Some(key), Some(token)) = (lookahead.next(), lookahead.next()) else {
            break;
        };
        if !key.starts_with(|c: char| c.is_ascii_alphabetic()) || !raw.accept(key, token)? {
            break;
        }
        tokens = lookahead;
    }
    let header = raw.finish()?;

    let file_values = tokens
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| AsciiError::BadValue {
                index,
                token: token.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expected = header
        .nrows
        .checked_mul(header.ncols)
        .ok_or(GridError::TooLarge {
            rows: header.nrows,
            cols: header.ncols,
        })?;
    if file_values.len() != expected {
        return Err(AsciiError::ValueCount {
            expected,
            found: file_values.len(),
        });
    }

    // The file lists the northern row first; grid row zero is the southern.
    let values = file_values
        .chunks(header.ncols.max(1))
        .rev()
        .flatten()
        .copied()
        .collect();

    Ok((header, values))
}

/// Writes one grid field to an ESRI ASCII file.
///
/// # Errors
///
/// Returns an error if the field does not exist, the cells are not square,
/// or the file cannot be written.
pub fn write_esri_ascii(
    path: impl AsRef<Path>,
    grid: &RasterGrid,
    field: &str,
) -> Result<(), AsciiError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| AsciiError::File {
        path: path.to_owned(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, grid, field)?;
    writer.flush()?;
    log::debug!("wrote field `{field}` to {}", path.display());
    Ok(())
}

/// Writes one grid field in ESRI ASCII form to a writer.
///
/// # Errors
///
/// See [`write_esri_ascii`].
#[allow(clippy::float_cmp)]
pub fn write_to<W: Write>(writer: &mut W, grid: &RasterGrid, field: &str) -> Result<(), AsciiError> {
    let values = grid.field(field)?;
    let Spacing { dx, dy } = grid.spacing();
    if dx != dy {
        return Err(AsciiError::NonSquareCells { dx, dy });
    }

    let (rows, cols) = grid.shape();
    let [x0, y0] = grid.origin();
    writeln!(writer, "ncols {cols}")?;
    writeln!(writer, "nrows {rows}")?;
    writeln!(writer, "xllcenter {x0}")?;
    writeln!(writer, "yllcenter {y0}")?;
    writeln!(writer, "cellsize {dx}")?;

    for row in (0..rows).rev() {
        let line = values
            .row(row)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

fn grid_for(header: &Header) -> Result<RasterGrid, AsciiError> {
    Ok(
        RasterGrid::new((header.nrows, header.ncols), Spacing::uniform(header.cellsize))?
            .with_origin(header.x_center, header.y_center),
    )
}
