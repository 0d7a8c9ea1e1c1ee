//! Counts one-shot results and turns them into the process exit status.

use crate::ProcessExit;
use crate::app::download_orchestrator::DownloadRun;

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct BatchTally {
    completed: usize,
    failed: usize,
    interrupted: bool,
}

impl BatchTally {
    pub(crate) fn record(&mut self, run: DownloadRun) {
        match run {
            DownloadRun::Succeeded => self.completed += 1,
            DownloadRun::Failed => self.failed += 1,
            DownloadRun::Interrupted => self.interrupted = true,
        }
    }

    /// Input that was never attempted because it is not an http(s) URL.
    pub(crate) fn record_rejected(&mut self) {
        self.failed += 1;
    }

    /// 0 when nothing failed, 2 when some did, 1 when all did, 130 on Ctrl-C.
    pub(crate) fn exit(&self) -> ProcessExit {
        if self.interrupted {
            ProcessExit::Interrupted
        } else if self.failed == 0 {
            ProcessExit::Success
        } else if self.completed > 0 {
            ProcessExit::Partial
        } else {
            ProcessExit::Failure
        }
    }
}
