//! The two rewrite strategies.
//!
//! Both follow the same two-phase shape:
//!
//! 1. **prepare**: read and check everything needed from the input.  Any
//!    failure here happens before an output stream exists.
//! 2. **write**: one sequential pass over the input, one sequential write
//!    to the output.
//!
//! [`fixup`] standardizes structure and sample encoding; [`grid`] re-labels
//! traces onto a synthetic square inline/crossline grid and assumes the
//! samples are already float32.  Run Fix-Up first when they are not.

use log::info;

use crate::error::{Result, SegyError};
use crate::header::BinaryHeader;

pub mod fixup;
pub mod grid;

pub use fixup::{fix_up, fix_up_file, FixUpPlan, FixUpSummary};
pub use grid::{standardize_grid, standardize_grid_file, GridPlan, GridSummary};

/// Progress is reported once per this many traces.
pub const PROGRESS_INTERVAL: u64 = 1000;

pub type ProgressFn<'a> = dyn FnMut(u64 /*done*/, u64 /*total*/) + 'a;

/// Coarse progress counter; logs and invokes the optional callback every
/// [`PROGRESS_INTERVAL`] traces.
pub(crate) struct Progress<'a, 'b> {
    callback: Option<&'a mut ProgressFn<'b>>,
    done:     u64,
    total:    u64,
}

impl<'a, 'b> Progress<'a, 'b> {
    pub(crate) fn new(callback: Option<&'a mut ProgressFn<'b>>, total: u64) -> Self {
        Self { callback, done: 0, total }
    }

    pub(crate) fn advance(&mut self) {
        self.done += 1;
        if self.done % PROGRESS_INTERVAL == 0 {
            info!("Processed {}/{} traces", self.done, self.total);
            if let Some(ref mut cb) = self.callback {
                cb(self.done, self.total);
            }
        }
    }

    pub(crate) fn done(&self) -> u64 {
        self.done
    }
}

/// Both rewriters refuse a header that declares no samples per trace.
pub(crate) fn require_samples(binary: &BinaryHeader) -> Result<u16> {
    match binary.num_samples() {
        0 => Err(SegyError::InvalidSampleCount(0)),
        n => Ok(n),
    }
}
