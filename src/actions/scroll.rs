use crate::actions::{ActionContext, ScrollDirection, ScrollOptions};
use crate::error::Result;

/// Signed vertical offset for a scroll request
pub fn delta(options: &ScrollOptions) -> f64 {
    let amount = options.amount.abs();
    match options.direction {
        ScrollDirection::Up => -amount,
        ScrollDirection::Down => amount,
    }
}

/// Smooth-scroll the window, then give lazy content time to render
pub fn perform(ctx: &ActionContext<'_>, options: &ScrollOptions) -> Result<()> {
    ctx.driver.scroll_window(delta(options))?;
    ctx.pause(ctx.timings.scroll_settle());
    Ok(())
}
