use crate::actions::ActionContext;
use crate::error::Result;
use crate::page::DomEvent;

pub fn perform(ctx: &ActionContext<'_>, target_id: &str, checked: bool) -> Result<()> {
    ctx.locate(target_id)?;
    ctx.reveal(target_id)?;
    ctx.driver.set_checked(target_id, checked)?;
    ctx.driver.dispatch(target_id, DomEvent::Change)
}
