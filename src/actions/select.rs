use crate::actions::ActionContext;
use crate::error::Result;
use crate::page::DomEvent;

/// Set a select's value (option value or visible text) and fire `change`
pub fn perform(ctx: &ActionContext<'_>, target_id: &str, value: &str) -> Result<()> {
    ctx.locate(target_id)?;
    ctx.reveal(target_id)?;
    ctx.driver.set_value(target_id, value)?;
    ctx.driver.dispatch(target_id, DomEvent::Change)
}
