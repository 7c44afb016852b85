use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("host operation failed during {phase}: {source}")]
    Host {
        phase: Phase,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Render,
    Commit,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Render => f.write_str("render"),
            Phase::Commit => f.write_str("commit"),
        }
    }
}

impl RenderError {
    pub(crate) fn render<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        RenderError::Host {
            phase: Phase::Render,
            source: Box::new(e),
        }
    }

    pub(crate) fn commit<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        RenderError::Host {
            phase: Phase::Commit,
            source: Box::new(e),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            RenderError::Host { phase, .. } => *phase,
        }
    }
}
