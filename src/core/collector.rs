//! Single consumer of the result queue

use crate::error::{Result, Sha3SumError};
use crate::manifest::{write_line, ResultLine};
use crossbeam::channel::Receiver;
use std::io::Write;

/// Writes result lines in the order they arrive
pub struct Collector<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> Collector<W> {
    /// Create a collector writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Drain `results` until it is closed and empty.
    ///
    /// Returns the number of lines written. No buffering or reordering:
    /// output order is completion order.
    pub fn drain(mut self, results: &Receiver<ResultLine>) -> Result<u64> {
        for line in results.iter() {
            write_line(&mut self.writer, &line).map_err(Sha3SumError::Output)?;
            self.written += 1;
        }

        self.writer.flush().map_err(Sha3SumError::Output)?;
        Ok(self.written)
    }
}
