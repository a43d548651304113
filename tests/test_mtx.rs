/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use pagerank_par::prelude::*;
use pagerank_par::utils::mtx::{load_mtx, read_mtx, MtxError};
use std::io::{Cursor, Write};

#[test]
fn test_general() -> Result<()> {
    let mtx = "%%MatrixMarket matrix coordinate real general
% A comment
3 3 4

1 2 0.5
2 3 1.0
3 1 2.0
3 2 -1
";
    let g = read_mtx(Cursor::new(mtx))?;
    assert_eq!(g.num_nodes(), 3);
    assert_eq!(g.num_arcs(), 4);
    assert_eq!(g.successors(0), &[1]);
    assert_eq!(g.successors(1), &[2]);
    assert_eq!(g.successors(2), &[0, 1]);
    Ok(())
}

#[test]
fn test_symmetric_pattern() -> Result<()> {
    let mtx = "%%MatrixMarket matrix coordinate pattern symmetric
4 4 2
2 1
4 4
";
    let g = read_mtx(Cursor::new(mtx))?;
    assert_eq!(g.num_nodes(), 4);
    assert!(g.has_arc(1, 0) && g.has_arc(0, 1));
    assert!(g.has_arc(3, 3));
    assert_eq!(g.num_arcs(), 3);
    Ok(())
}

#[test]
fn test_rectangular() -> Result<()> {
    let g = read_mtx(Cursor::new(
        "%%MatrixMarket matrix coordinate integer general\n2 5 1\n1 5 7\n",
    ))?;
    assert_eq!(g.num_nodes(), 5);
    assert!(g.has_arc(0, 4));
    Ok(())
}

#[test]
fn test_errors() {
    assert!(matches!(
        read_mtx(Cursor::new("")),
        Err(MtxError::MissingBanner)
    ));
    assert!(matches!(
        read_mtx(Cursor::new("%%MatrixMarket matrix array real general\n")),
        Err(MtxError::Unsupported(_))
    ));
    assert!(matches!(
        read_mtx(Cursor::new("%%MatrixMarket matrix coordinate real general\n3 3\n")),
        Err(MtxError::InvalidSize { line: 2, .. })
    ));
    assert!(matches!(
        read_mtx(Cursor::new(
            "%%MatrixMarket matrix coordinate real general\n% c\n1000000000000 1 0\n"
        )),
        Err(MtxError::TooLarge {
            line: 3,
            nodes: 1_000_000_000_000
        })
    ));
    assert!(matches!(
        read_mtx(Cursor::new(
            "%%MatrixMarket matrix coordinate real general\n3 3 1\n1 x 1.0\n"
        )),
        Err(MtxError::InvalidEntry { line: 3, .. })
    ));
    assert!(matches!(
        read_mtx(Cursor::new(
            "%%MatrixMarket matrix coordinate real general\n3 3 1\n% c\n4 1 1.0\n"
        )),
        Err(MtxError::OutOfBounds {
            line: 4,
            row: 4,
            ..
        })
    ));
}

#[test]
fn test_load_and_rank() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        "%%MatrixMarket matrix coordinate pattern general\n3 3 3\n1 2\n2 3\n3 1\n"
    )?;
    file.flush()?;
    let mut g = load_mtx(file.path())?;
    add_self_loops(&mut g, |_, _| true);
    let res = Sequential.solve(&transpose_with_degree(&g), None, &Options::default());
    for &r in res.ranks.iter() {
        assert!((r - 1.0 / 3.0).abs() < 1E-12);
    }

    assert!(matches!(
        load_mtx(file.path().with_extension("missing")),
        Err(MtxError::Io(_))
    ));
    Ok(())
}
