/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Plain text data sets: one sample per line, features separated by whitespace.
//!
//! Blank lines and anything after a `#` are ignored.

use crate::FailResult;

use ::ndarray::Array2;
use ::std::io::{BufRead, BufReader, Read, Write};

pub fn read(r: impl Read) -> FailResult<Array2<f64>> {
    let mut width = None;
    let mut nrows = 0;
    let mut data = vec![];

    for (lineno, line) in BufReader::new(r).lines().enumerate() {
        let line = line?;
        let line = line.split('#').next().unwrap_or("");
        if line.trim().is_empty() {
            continue;
        }

        let start = data.len();
        for word in line.split_whitespace() {
            match word.parse::<f64>() {
                Ok(x) => data.push(x),
                Err(e) => bail!("line {}: bad value {:?}: {}", lineno + 1, word, e),
            }
        }

        let count = data.len() - start;
        match width {
            None => width = Some(count),
            Some(width) => ensure!(
                width == count,
                "line {}: expected {} values, found {}", lineno + 1, width, count,
            ),
        }
        nrows += 1;
    }
    Ok(Array2::from_shape_vec((nrows, width.unwrap_or(0)), data)?)
}

pub fn write(mut w: impl Write, data: &Array2<f64>) -> FailResult<()> {
    for row in data.outer_iter() {
        let words: Vec<_> = row.iter().map(|x| x.to_string()).collect();
        writeln!(w, "{}", words.join(" "))?;
    }
    Ok(())
}
