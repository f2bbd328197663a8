use crate::actions::{check, click, open_url, scroll, select, type_text, wait};
use crate::actions::{Action, ActionContext, ActionKind, ActionResult};
use crate::config::Timings;
use crate::page::PageDriver;

/// Carries out actions against a live document.
///
/// Failures never escape as errors: each action yields an [`ActionResult`],
/// and a failed action without `continueOnError` ends the sequence.
#[derive(Debug, Clone, Default)]
pub struct ActionExecutor {
    timings: Timings,
}

impl ActionExecutor {
    pub fn new(timings: Timings) -> Self {
        Self { timings }
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Execute a single action
    pub fn execute(&self, driver: &dyn PageDriver, action: &Action) -> ActionResult {
        let ctx = ActionContext::new(driver, &self.timings);
        log::debug!("Executing {} {}", action.name(), action.description);

        let outcome = match &action.kind {
            ActionKind::Click { target_id } => click::perform(&ctx, target_id),
            ActionKind::Type { target_id, value } => type_text::perform(&ctx, target_id, value),
            ActionKind::Select { target_id, value } => select::perform(&ctx, target_id, value),
            ActionKind::Check { target_id, options } => check::perform(&ctx, target_id, options.checked),
            ActionKind::Scroll { options } => scroll::perform(&ctx, options),
            ActionKind::Wait { options } => wait::perform(&ctx, options),
            ActionKind::OpenUrl { value } => open_url::perform(&ctx, value),
        };

        match outcome {
            Ok(()) => ActionResult::success(action.clone()),
            Err(e) => {
                log::warn!("{} failed: {}", action.name(), e);
                ActionResult::failure(action.clone(), e.to_string())
            }
        }
    }

    /// Execute actions strictly in order, pausing after each one.
    ///
    /// Stops after the first failure unless that action allows continuing, and
    /// always stops after a successful OPEN_URL since the document it would act on is gone.
    pub fn execute_sequence(&self, driver: &dyn PageDriver, actions: &[Action]) -> Vec<ActionResult> {
        let ctx = ActionContext::new(driver, &self.timings);
        let mut results = Vec::with_capacity(actions.len());

        for (i, action) in actions.iter().enumerate() {
            let result = self.execute(driver, action);
            let halt = !result.success && !action.continue_on_error;
            results.push(result);

            ctx.pause(self.timings.inter_action());

            let remaining = actions.len() - i - 1;
            if halt {
                log::info!("Halting plan after failed {}, skipping {} action(s)", action.name(), remaining);
                break;
            }
            if action.is_navigation() && results.last().is_some_and(|r| r.success) {
                if remaining > 0 {
                    log::info!("Navigation issued, dropping {} remaining action(s)", remaining);
                }
                break;
            }
        }

        results
    }
}
