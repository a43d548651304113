/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Loading of graphs in [Matrix Market](https://math.nist.gov/MatrixMarket/formats.html)
//! coordinate format.
//!
//! A nonzero entry at row *i* and column *j* (both 1-based) becomes an arc
//! from node *i* − 1 to node *j* − 1; values, if present, are ignored. For
//! symmetric matrices both directions are added. The number of nodes is the
//! maximum between the number of rows and the number of columns.

use crate::graphs::vec_graph::VecGraph;
use dsi_progress_logger::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// The largest number of nodes accepted in a size line.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Errors that can occur while reading a Matrix Market file.
#[derive(Error, Debug)]
pub enum MtxError {
    /// An I/O error occurred.
    #[error("I/O error while reading the matrix: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with a Matrix Market banner.
    #[error("Missing %%MatrixMarket banner")]
    MissingBanner,

    /// The banner describes a format we do not support.
    #[error("Unsupported matrix format: {0}")]
    Unsupported(String),

    /// The size line is missing or malformed.
    #[error("Invalid size line {line}: {content:?}")]
    InvalidSize { line: usize, content: String },

    /// The size line declares more nodes than can be allocated.
    #[error("Size line {line} declares {nodes} nodes, which is too many")]
    TooLarge { line: usize, nodes: usize },

    /// An entry line is malformed.
    #[error("Invalid entry at line {line}: {content:?}")]
    InvalidEntry { line: usize, content: String },

    /// An entry refers to a row or column outside the declared size.
    #[error("Entry ({row}, {col}) at line {line} is out of bounds for a {rows}×{cols} matrix")]
    OutOfBounds {
        line: usize,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Reads a graph in Matrix Market coordinate format.
pub fn read_mtx(reader: impl BufRead) -> Result<VecGraph, MtxError> {
    let mut lines = reader.lines().enumerate();

    let symmetric = match lines.next() {
        Some((_, banner)) => parse_banner(&banner?)?,
        None => return Err(MtxError::MissingBanner),
    };

    let (size_line, rows, cols, entries) = loop {
        let Some((line, content)) = lines.next() else {
            return Err(MtxError::InvalidSize {
                line: 0,
                content: String::new(),
            });
        };
        let content = content?;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let fields = trimmed
            .split_whitespace()
            .map(str::parse::<usize>)
            .collect::<Result<Vec<_>, _>>();
        match fields.as_deref() {
            Ok(&[rows, cols, entries]) => break (line + 1, rows, cols, entries),
            _ => {
                return Err(MtxError::InvalidSize {
                    line: line + 1,
                    content,
                })
            }
        }
    };

    let nodes = rows.max(cols);
    if nodes > MAX_NODES {
        return Err(MtxError::TooLarge {
            line: size_line,
            nodes,
        });
    }
    let mut g = VecGraph::try_empty(nodes).map_err(|_| MtxError::TooLarge {
        line: size_line,
        nodes,
    })?;
    let mut pl = progress_logger![item_name = "entry", expected_updates = Some(entries)];
    pl.start("Reading entries...");
    for (line, content) in lines {
        let content = content?;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let (Some(Ok(row)), Some(Ok(col))) = (
            fields.next().map(str::parse::<usize>),
            fields.next().map(str::parse::<usize>),
        ) else {
            return Err(MtxError::InvalidEntry {
                line: line + 1,
                content,
            });
        };
        if row == 0 || col == 0 || row > rows || col > cols {
            return Err(MtxError::OutOfBounds {
                line: line + 1,
                row,
                col,
                rows,
                cols,
            });
        }
        g.add_arc(row - 1, col - 1);
        if symmetric {
            g.add_arc(col - 1, row - 1);
        }
        pl.light_update();
    }
    pl.done();

    Ok(g)
}

/// Loads a graph in Matrix Market coordinate format from a file.
pub fn load_mtx(path: impl AsRef<Path>) -> Result<VecGraph, MtxError> {
    let path = path.as_ref();
    log::info!("Loading graph from {}", path.display());
    let g = read_mtx(BufReader::new(File::open(path)?))?;
    log::info!("Loaded {} nodes and {} arcs", g.num_nodes(), g.num_arcs());
    Ok(g)
}

/// Parses the banner, returning whether the matrix is symmetric.
fn parse_banner(banner: &str) -> Result<bool, MtxError> {
    let fields = banner
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>();
    if fields.first().map(String::as_str) != Some("%%matrixmarket") {
        return Err(MtxError::MissingBanner);
    }
    match fields[1..]
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .as_slice()
    {
        ["matrix", "coordinate", "real" | "integer" | "pattern", symmetry] => match *symmetry {
            "general" => Ok(false),
            "symmetric" => Ok(true),
            _ => Err(MtxError::Unsupported(banner.to_owned())),
        },
        _ => Err(MtxError::Unsupported(banner.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner() {
        assert!(!parse_banner("%%MatrixMarket matrix coordinate real general").unwrap());
        assert!(parse_banner("%%MatrixMarket matrix coordinate pattern symmetric").unwrap());
        assert!(matches!(
            parse_banner("%%MatrixMarket matrix array real general"),
            Err(MtxError::Unsupported(_))
        ));
        assert!(matches!(
            parse_banner("1 2 3"),
            Err(MtxError::MissingBanner)
        ));
    }
}
