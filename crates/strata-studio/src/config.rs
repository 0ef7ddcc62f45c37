use clap::Parser;
use strata_doc::Frame;
use strata_doc::logging::LoggingConfig;

/// Print the back-to-front cel order of the demo document.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "strata-studio")]
#[command(version)]
pub struct StudioConfig {
    /// Plan only this frame (all frames if omitted)
    #[arg(short, long)]
    pub frame: Option<u32>,

    /// Trace the planner
    #[arg(short, long)]
    pub verbose: bool,

    /// Log filter in `env_logger` syntax; wins over `--verbose`
    #[arg(long, env = "STRATA_LOG")]
    pub log_filter: Option<String>,
}

impl StudioConfig {
    pub fn frame(&self) -> Option<Frame> {
        self.frame.map(Frame)
    }

    pub fn logging(&self) -> LoggingConfig {
        match (&self.log_filter, self.verbose) {
            (Some(filter), _) => LoggingConfig::with_filter(filter.clone()),
            (None, true) => LoggingConfig::with_filter("info,strata_doc=trace"),
            (None, false) => LoggingConfig::default(),
        }
    }
}
