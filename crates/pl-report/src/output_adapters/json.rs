//! json.rs - JSON output adapter for machine-readable output.

use crate::error::ReportError;
use crate::output_adapters::{OutputAdapter, RenderContext};

#[derive(Default)]
pub struct JsonAdapter {}

impl JsonAdapter {
    pub fn new() -> Self {
        Self {}
    }
}

impl OutputAdapter for JsonAdapter {
    fn render(&self, ctx: &RenderContext) -> Result<String, ReportError> {
        // The whole report is emitted; color and item limits do not apply.
        Ok(serde_json::to_string_pretty(ctx.report)?)
    }

    fn name(&self) -> &str {
        "json"
    }
}
