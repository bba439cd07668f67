use dockql::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress events as an indicatif spinner or bar on
/// stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self { pb }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| match progress {
            Progress::ScoringStart => {
                pb.reset();
                pb.set_length(0);
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                pb.set_message("Scoring decoy...");
            }
            Progress::ScoringFinish => {
                pb.disable_steady_tick();
                pb.finish_and_clear();
            }
            Progress::BatchStart { decoys } => {
                pb.reset();
                pb.set_length(decoys);
                pb.set_position(0);
                pb.set_message("Scoring batch");
                pb.set_style(Self::bar_style());
            }
            Progress::DecoyScored => {
                pb.inc(1);
            }
            Progress::BatchFinish => {
                pb.finish_and_clear();
            }
            Progress::Note(msg) => {
                if pb.is_finished() {
                    eprintln!("  {}", msg);
                } else {
                    pb.println(format!("  {}", msg));
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
