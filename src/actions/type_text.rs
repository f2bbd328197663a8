//! TYPE action
//!
//! Text goes in as one bulk insertion (`insertText` editing command with a
//! native value-setter fallback) followed by `input`, `change` and `blur`, so
//! controlled inputs in reactive frameworks see the final value.

use crate::actions::ActionContext;
use crate::error::Result;
use crate::page::DomEvent;

const EVENTS: [DomEvent; 3] = [DomEvent::Input, DomEvent::Change, DomEvent::Blur];

pub fn perform(ctx: &ActionContext<'_>, target_id: &str, value: &str) -> Result<()> {
    ctx.locate(target_id)?;
    ctx.prepare(target_id)?;

    let driver = ctx.driver;
    driver.focus(target_id)?;
    driver.clear_value(target_id)?;
    driver.insert_text(target_id, value)?;

    for event in EVENTS {
        driver.dispatch(target_id, event)?;
    }
    Ok(())
}
