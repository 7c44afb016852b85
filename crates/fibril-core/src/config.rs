use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// The work loop yields once the deadline reports less than this.
    pub yield_threshold: Duration,
    /// Hand host nodes created by a superseded pass to `Host::dispose`.
    pub dispose_abandoned: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            dispose_abandoned: true,
        }
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yield_threshold(mut self, threshold: Duration) -> Self {
        self.yield_threshold = threshold;
        self
    }

    pub fn dispose_abandoned(mut self, dispose: bool) -> Self {
        self.dispose_abandoned = dispose;
        self
    }
}
