//! Host simulator: the controller on stdin/stdout, strips rendered as log
//! lines on stderr.
//!
//! ```text
//! ledstrip-sim [config.json]
//! LEDSTRIP_LOG=debug ledstrip-sim
//! ```

use std::rc::Rc;

use anyhow::{Context, Result};
use log::info;

use ledstrip::adapters::delay::ReactorDelay;
use ledstrip::adapters::log_sink::LogPixelSink;
use ledstrip::adapters::logger::StderrLogger;
use ledstrip::adapters::stdio::StdioTransport;
use ledstrip::adapters::time::Uptime;
use ledstrip::config::ControllerConfig;
use ledstrip::scheduler::Executor;
use ledstrip::strip::PixelSink;
use ledstrip::Controller;

fn load_config() -> Result<ControllerConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            ControllerConfig::from_json(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(ControllerConfig::default()),
    }
}

fn main() -> Result<()> {
    StderrLogger::init()?;
    let uptime = Uptime::new();
    let cfg = load_config()?;

    let sinks: Vec<Box<dyn PixelSink>> = cfg
        .strips
        .iter()
        .enumerate()
        .map(|(i, s)| Box::new(LogPixelSink::new(i, s.order)) as Box<dyn PixelSink>)
        .collect();

    let executor = Rc::new(Executor::new());
    let controller = Controller::from_config(
        &cfg,
        StdioTransport::spawn()?,
        sinks,
        Rc::clone(&executor),
        Rc::new(ReactorDelay),
        uptime.seed(),
    )?;
    controller.spawn(cfg.poll_interval_ms);

    info!("ledstrip-sim v{}: {} strips, try $help", env!("CARGO_PKG_VERSION"), cfg.strips.len());
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
