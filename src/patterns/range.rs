//! Solid colour over a run of pixels: `range,<start>,<count>,<r>,<g>,<b>`.

use std::rc::Rc;

use futures_lite::future::BoxedLocal;
use log::warn;

use crate::command::{args, Command, ExecContext, StopFlag};
use crate::error::ArgError;
use crate::protocol::tokenizer::CommandLine;
use crate::strip::LedStrip;

use super::begin;

pub struct Range {
    strip: Rc<LedStrip>,
    stop: StopFlag,
}

struct Span {
    start: usize,
    count: usize,
    rgb: [u8; 3],
}

impl Span {
    fn from_fields(fields: &[String]) -> Result<Self, ArgError> {
        Ok(Self {
            start: args::field(fields, 1)?,
            count: args::field(fields, 2)?,
            rgb: args::fields(fields, 3)?,
        })
    }
}

impl Range {
    pub fn new(strip: Rc<LedStrip>) -> Self {
        Self {
            strip,
            stop: StopFlag::new(),
        }
    }
}

impl Command for Range {
    fn help(&self) -> &'static str {
        "set range to color <range,start,num,r,g,b>"
    }

    fn run(self: Rc<Self>, _ctx: ExecContext, fields: CommandLine) -> BoxedLocal<()> {
        Box::pin(async move {
            let span = match Span::from_fields(&fields) {
                Ok(s) => s,
                Err(e) => {
                    warn!("range: {}", e);
                    return;
                }
            };

            let me: Rc<dyn Command> = self.clone();
            let Some(mut strip) = begin(&self.strip, me).await else {
                return;
            };

            let [r, g, b] = span.rgb;
            let color = strip.order().pack(r, g, b);
            strip.fill_range(span.start, span.count, color);
            strip.show();
            self.stop.arm();
        })
    }

    fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}
