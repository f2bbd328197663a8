use crate::actions::{ActionContext, WaitOptions};
use crate::error::Result;
use std::time::Duration;

pub fn perform(ctx: &ActionContext<'_>, options: &WaitOptions) -> Result<()> {
    ctx.pause(Duration::from_millis(options.duration_ms));
    Ok(())
}
