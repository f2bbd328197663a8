use crate::actions::ActionContext;
use crate::error::Result;

/// Scroll into view, settle, highlight, then click
pub fn perform(ctx: &ActionContext<'_>, target_id: &str) -> Result<()> {
    ctx.locate(target_id)?;
    ctx.prepare(target_id)?;
    ctx.driver.click(target_id)
}
