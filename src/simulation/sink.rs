//! Destinations for streamed trial results.

use std::io::Write;

use crate::error::{Error, Result};

use super::SimulationResult;

/// Receives trial results in batches from the writer thread.
///
/// Only one thread ever touches a sink, so implementations need `Send`
/// but not `Sync`.
pub trait ResultSink: Send {
    /// Persists one batch.
    fn write_batch(&mut self, batch: &[SimulationResult]) -> Result<()>;

    /// Called once after the last batch.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes results as one JSON array, flushing after each batch.
#[derive(Debug)]
pub struct JsonArrayWriter<W: Write + Send> {
    writer: W,
    written: usize,
    finished: bool,
}

impl<W: Write + Send> JsonArrayWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            finished: false,
        }
    }

    /// Results written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultSink for JsonArrayWriter<W> {
    fn write_batch(&mut self, batch: &[SimulationResult]) -> Result<()> {
        if self.finished {
            return Err(Error::Sink("write after finish".into()));
        }
        for result in batch {
            let sep = if self.written == 0 { "[\n" } else { ",\n" };
            self.writer.write_all(sep.as_bytes())?;
            serde_json::to_writer(&mut self.writer, result)?;
            self.written += 1;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        let tail = if self.written == 0 { "[]\n" } else { "\n]\n" };
        self.writer.write_all(tail.as_bytes())?;
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }
}

/// Keeps results in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub results: Vec<SimulationResult>,
    /// Number of batches received.
    pub batches: usize,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for CollectingSink {
    fn write_batch(&mut self, batch: &[SimulationResult]) -> Result<()> {
        self.results.extend_from_slice(batch);
        self.batches += 1;
        Ok(())
    }
}
