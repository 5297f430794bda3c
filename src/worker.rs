//! Running a fill off the calling thread.
//!
//! A fill can take a while, so an interactive host should hand it to a worker and wait for the
//! single result on a channel. Each worker owns its crossword and its own domains, so several
//! fills can run at once without sharing any search state.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::crossword::Crossword;
use crate::search::{find_fill, FillFailure, FillSuccess, SolverConfig};

pub type FillResult = Result<FillSuccess, FillFailure>;

/// The receiving end of a background fill.
pub struct FillHandle {
    receiver: Receiver<FillResult>,
    thread: JoinHandle<Crossword>,
}

/// Start filling `crossword` on a new thread.
pub fn spawn_fill(crossword: Crossword, config: SolverConfig) -> FillHandle {
    let (sender, receiver) = mpsc::channel();

    let thread = thread::spawn(move || {
        let result = find_fill(&crossword, config);
        debug!("Background fill finished: {}", if result.is_ok() { "filled" } else { "no fill" });

        // The host may have dropped the handle; the result just goes nowhere then.
        let _ = sender.send(result);
        crossword
    });

    FillHandle { receiver, thread }
}

impl FillHandle {
    /// Block until the fill finishes. Returns `None` only if the worker died without sending a
    /// result.
    pub fn wait(self) -> Option<FillResult> {
        let result = self.receiver.recv().ok();
        let _ = self.thread.join();
        result
    }

    /// Block until the fill finishes, then also hand the crossword back.
    pub fn wait_with_crossword(self) -> Option<(FillResult, Crossword)> {
        let result = self.receiver.recv().ok()?;
        let crossword = self.thread.join().ok()?;
        Some((result, crossword))
    }

    /// The result, if the fill has finished.
    pub fn try_result(&self) -> Option<FillResult> {
        self.receiver.try_recv().ok()
    }
}
