//! File output handle
//!
//! A `FileOutput` owns the sink's single open file, optionally in front of a
//! reusable in-memory buffer. The buffer is handed back on `finish()` so the
//! next file reuses the allocation instead of growing a fresh one.

use std::fs::File;
use std::io::{self, Write};

use bytes::BytesMut;

/// The sink's open file, direct or behind an in-memory buffer
#[derive(Debug)]
pub(crate) struct FileOutput {
    file: File,
    buffer: Option<BytesMut>,
    capacity: usize,
}

impl FileOutput {
    /// Unbuffered output: every write goes straight to the file
    pub fn direct(file: File) -> Self {
        Self {
            file,
            buffer: None,
            capacity: 0,
        }
    }

    /// Buffered output: writes accumulate in `buffer` and drain to the file
    /// once `capacity` bytes are pending, or on flush
    pub fn buffered(file: File, buffer: BytesMut, capacity: usize) -> Self {
        Self {
            file,
            buffer: Some(buffer),
            capacity,
        }
    }

    /// Write a payload, returning the number of payload bytes accepted
    pub fn write(&mut self, payload: &[u8]) -> io::Result<usize> {
        match &mut self.buffer {
            Some(buffer) => {
                buffer.extend_from_slice(payload);
                if buffer.len() >= self.capacity {
                    self.drain()?;
                }
            }
            None => self.file.write_all(payload)?,
        }
        Ok(payload.len())
    }

    /// Flush primitive: drain the buffer when buffered, otherwise sync the
    /// file to storage
    pub fn flush(&mut self) -> io::Result<()> {
        match self.buffer {
            Some(_) => self.drain(),
            None => self.file.sync_data(),
        }
    }

    /// Bytes currently pending in the buffer (0 when unbuffered)
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.buffer.as_ref().map_or(0, BytesMut::len)
    }

    /// Drain pending bytes and close the file, handing the (cleared) buffer
    /// back for reuse by the next file
    pub fn finish(mut self) -> (Option<BytesMut>, io::Result<()>) {
        let result = match self.buffer {
            Some(_) => self.drain(),
            None => Ok(()),
        };
        (self.buffer.take(), result)
    }

    fn drain(&mut self) -> io::Result<()> {
        if let Some(buffer) = &mut self.buffer {
            if !buffer.is_empty() {
                self.file.write_all(buffer)?;
                buffer.clear();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;
