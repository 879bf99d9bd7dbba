//! Stage progress on stderr

use mathkid_core::{Stage, StageObserver};
use std::io::{self, Write};

/// Prints one status line per pipeline stage
#[derive(Default)]
pub struct StageReporter;

impl StageReporter {
    pub fn new() -> Self {
        Self
    }

    fn set_message(&self, msg: &str) {
        eprint!("\r{:<50}", msg);
        io::stderr().flush().ok();
    }

    fn finish(&self, msg: &str) {
        eprintln!("\r{:<50}", msg);
    }
}

impl StageObserver for StageReporter {
    fn on_stage(&self, stage: Stage) {
        match stage {
            Stage::Idle => {}
            Stage::Done | Stage::Failed => self.finish(stage.description()),
            _ => self.set_message(&format!("{}...", stage.description())),
        }
    }
}
