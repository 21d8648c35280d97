use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use residb::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress events as an indicatif spinner or bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<DisplayState>>,
}

struct DisplayState {
    bar: ProgressBar,
    phase: Option<&'static str>,
}

impl DisplayState {
    fn start_phase(&mut self, name: &'static str) {
        self.phase = Some(name);
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_style(spinner_style());
        self.bar
            .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.bar.set_message(name);
    }

    fn finish_phase(&mut self) {
        self.bar.disable_steady_tick();
        let label = self.phase.take().unwrap_or("Done");
        self.bar.finish_with_message(format!("✓ {}", label));
    }

    fn start_task(&mut self, total_steps: u64) {
        self.bar.disable_steady_tick();
        self.bar.reset();
        self.bar.set_length(total_steps);
        self.bar.set_style(bar_style());
    }

    fn finish_task(&mut self) {
        if let Some(total) = self.bar.length() {
            self.bar.set_position(total);
        }
        self.bar.finish();
    }

    fn message(&mut self, text: String) {
        if self.bar.is_finished() {
            self.bar.set_message(text);
        } else {
            self.bar.println(format!("  {}", text));
        }
    }
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        bar.finish_and_clear();
        Self {
            state: Arc::new(Mutex::new(DisplayState { bar, phase: None })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();
        Box::new(move |event: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress display mutex was poisoned; dropping event.");
                return;
            };
            match event {
                Progress::PhaseStart { name } => state.start_phase(name),
                Progress::PhaseFinish => state.finish_phase(),
                Progress::TaskStart { total_steps } => state.start_task(total_steps),
                Progress::TaskIncrement => state.bar.inc(1),
                Progress::TaskFinish => state.finish_task(),
                Progress::Message(text) => state.message(text),
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<28} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("##-")
}
