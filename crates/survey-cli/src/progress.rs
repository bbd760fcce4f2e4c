//! Per-question progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use survey_pivot::PivotObserver;

const TEMPLATE: &str = "  Pivoting {bar:40.cyan/blue} {pos}/{len} questions [{elapsed_precise}] {msg}";

/// Advances a progress bar as questions are pivoted.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    /// A bar drawn on stderr, or a hidden one when `visible` is false.
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        bar.set_style(style);
        Self { bar }
    }
}

impl PivotObserver for ProgressObserver {
    fn on_start(&mut self, questions: usize) {
        self.bar.set_length(questions as u64);
        self.bar.set_position(0);
    }

    fn on_question(&mut self, question: &str, _rows: usize) {
        self.bar.set_message(question.to_string());
        self.bar.inc(1);
    }

    fn on_finish(&mut self) {
        self.bar.finish_and_clear();
    }
}
