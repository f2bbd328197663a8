//! Turns an intent plus a page snapshot into an ordered action plan.
//!
//! The reasoning service is asked first. Anything short of a parseable plan
//! (transport failure, refusal, malformed reply) falls through to the
//! deterministic [`FallbackResolver`].

pub mod fallback;
pub mod reasoning;

pub use fallback::FallbackResolver;
pub use reasoning::{OpenAiReasoner, PlanRequest, ReasoningService, parse_plan};

use crate::actions::Action;
use crate::config::ReasoningConfig;
use crate::dom::PageSnapshot;
use std::sync::Arc;

pub struct PlanResolver {
    reasoner: Option<Arc<dyn ReasoningService>>,
    fallback: FallbackResolver,
    max_elements: usize,
}

impl PlanResolver {
    /// Resolver that only uses the deterministic matcher
    pub fn fallback_only() -> Self {
        Self {
            reasoner: None,
            fallback: FallbackResolver::new(),
            max_elements: ReasoningConfig::default().max_elements,
        }
    }

    /// Resolver backed by the given reasoning service
    pub fn with_reasoner(reasoner: Arc<dyn ReasoningService>, max_elements: usize) -> Self {
        Self {
            reasoner: Some(reasoner),
            fallback: FallbackResolver::new(),
            max_elements,
        }
    }

    /// Build from configuration, using the reasoning service only when it is
    /// enabled and has credentials
    pub fn from_config(config: &ReasoningConfig) -> Self {
        if !config.enabled {
            return Self::fallback_only();
        }

        match OpenAiReasoner::new(config) {
            Ok(reasoner) => {
                log::info!("Using reasoning service model {}", reasoner.model());
                Self::with_reasoner(Arc::new(reasoner), config.max_elements)
            }
            Err(e) => {
                log::warn!("Reasoning service unavailable, using fallback matcher only: {}", e);
                Self::fallback_only()
            }
        }
    }

    pub fn has_reasoner(&self) -> bool {
        self.reasoner.is_some()
    }

    pub async fn resolve(&self, intent: &str, snapshot: &PageSnapshot) -> Vec<Action> {
        if let Some(reasoner) = &self.reasoner {
            let request = PlanRequest::from_snapshot(intent, snapshot, self.max_elements);
            match reasoner.generate_plan(&request).await {
                Ok(reply) => match parse_plan(&reply) {
                    Some(plan) => {
                        log::debug!("Reasoning service planned {} action(s)", plan.len());
                        return plan;
                    }
                    None => log::warn!("Reasoning reply contained no action array, falling back"),
                },
                Err(e) => log::warn!("Reasoning service failed, falling back: {}", e),
            }
        }

        self.fallback.resolve(intent, snapshot)
    }
}
