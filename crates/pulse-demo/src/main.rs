mod app;
mod config;
mod scene;

use anyhow::Result;
use pulse_engine::device::GpuInit;
use pulse_engine::logging::{LoggingConfig, init_logging};
use pulse_engine::window::Runtime;

use crate::app::PulseApp;
use crate::config::DemoConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::from_env();
    let runtime = config.runtime.clone();

    Runtime::run(runtime, GpuInit::default(), PulseApp::new(config))
}
