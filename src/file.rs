//! [`SegyFile`] binds the two file headers and the stream length to one
//! opened input stream.
//!
//! Opening checks only what every operation needs: the stream holds at least
//! the 3600 header bytes and the textual header decodes.  Sample-count and
//! size consistency are left to the caller.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, SegyError};
use crate::header::{BinaryHeader, TextualHeader, TraceGeometry, TraceHeader, FILE_HEADER_SIZE};
use crate::scanner::{TraceRecord, TraceScanner};

#[derive(Debug)]
pub struct SegyFile<R> {
    reader:        R,
    pub file_size: u64,
    pub textual:   TextualHeader,
    pub binary:    BinaryHeader,
}

impl SegyFile<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> SegyFile<R> {
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        if file_size < FILE_HEADER_SIZE as u64 {
            return Err(SegyError::TooSmall { size: file_size });
        }
        let textual = TextualHeader::read(&mut reader)?;
        let binary  = BinaryHeader::read(&mut reader)?;
        Ok(Self { reader, file_size, textual, binary })
    }

    pub fn geometry(&self) -> TraceGeometry {
        self.binary.geometry()
    }

    /// A fresh scanner over this file's traces.
    pub fn scanner(&mut self) -> TraceScanner<&mut R> {
        let fallback = self.binary.num_samples();
        TraceScanner::new(&mut self.reader, self.file_size, fallback)
    }

    pub fn scan_traces(&mut self) -> Result<Vec<TraceRecord>> {
        let records = self.scanner()
            .map(|t| t.map(|t| t.record))
            .collect::<std::io::Result<Vec<TraceRecord>>>()?;
        Ok(records)
    }

    /// Re-read the header of a scanned trace and leave the stream at its
    /// first sample.
    pub fn read_trace_header(&mut self, record: &TraceRecord) -> Result<TraceHeader> {
        self.reader.seek(SeekFrom::Start(record.position))?;
        Ok(TraceHeader::read(&mut self.reader)?)
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
