use crate::engine::{ObstEngine, ScanWindow, DEFAULT_PARALLEL_MIN_WIDTH};
use crate::probability::Distribution;

pub struct ObstEngineBuilder<'a> {
    dist: &'a Distribution,
    window: Option<ScanWindow>,
    parallel_min_width: Option<usize>,
}

impl<'a> ObstEngineBuilder<'a> {
    pub fn new(dist: &'a Distribution) -> Self {
        Self {
            dist,
            window: None,
            parallel_min_width: None,
        }
    }
    pub fn with_window(mut self, window: ScanWindow) -> Self {
        self.window = Some(window);
        self
    }
    pub fn with_knuth_window(self) -> Self {
        self.with_window(ScanWindow::Knuth)
    }
    pub fn with_parallel_min_width(mut self, width: usize) -> Self {
        self.parallel_min_width = Some(width);
        self
    }
    pub fn build(self) -> ObstEngine<'a> {
        ObstEngine::with_options(
            self.dist,
            self.window.unwrap_or_default(),
            self.parallel_min_width.unwrap_or(DEFAULT_PARALLEL_MIN_WIDTH),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist() -> Distribution {
        Distribution::new(vec!["k".to_string()], vec![1.0], vec![0.0, 0.0]).unwrap()
    }

    #[test]
    fn defaults_match_engine_new() {
        let d = dist();
        let engine = ObstEngineBuilder::new(&d).build();
        assert_eq!(engine.window(), ScanWindow::Full);
        assert_eq!(engine.parallel_min_width(), DEFAULT_PARALLEL_MIN_WIDTH);
    }

    #[test]
    fn options_are_applied() {
        let d = dist();
        let engine = ObstEngineBuilder::new(&d)
            .with_knuth_window()
            .with_parallel_min_width(0)
            .build();
        assert_eq!(engine.window(), ScanWindow::Knuth);
        assert_eq!(engine.parallel_min_width(), 1);
    }
}
