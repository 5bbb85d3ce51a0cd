//! Per-model pricing for completion requests.
//!
//! Prices are USD per 1000 tokens. Models are matched by family prefix, the
//! longest matching prefix wins, and unlisted models use the fallback tier.

/// Prompt and completion prices in USD per 1000 tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub prompt_per_1k: f64,
    pub completion_per_1k: f64,
}

impl ModelPricing {
    pub const fn new(prompt_per_1k: f64, completion_per_1k: f64) -> Self {
        Self {
            prompt_per_1k,
            completion_per_1k,
        }
    }

    /// Compute the cost of one request.
    pub fn cost(&self, prompt_tokens: usize, completion_tokens: usize) -> f64 {
        (prompt_tokens as f64 * self.prompt_per_1k
            + completion_tokens as f64 * self.completion_per_1k)
            / 1000.0
    }
}

const PRICE_TABLE: &[(&str, ModelPricing)] = &[
    ("gpt-4o-mini", ModelPricing::new(0.000_15, 0.000_6)),
    ("gpt-4o", ModelPricing::new(0.002_5, 0.01)),
    ("gpt-4-32k", ModelPricing::new(0.06, 0.12)),
    ("gpt-4-turbo", ModelPricing::new(0.01, 0.03)),
    ("gpt-4", ModelPricing::new(0.03, 0.06)),
    ("gpt-3.5-turbo", ModelPricing::new(0.001, 0.002)),
];

/// Applied when no table entry matches the model name.
const FALLBACK_PRICING: ModelPricing = ModelPricing::new(0.001, 0.002);

/// Look up pricing for a model by family prefix.
pub fn pricing_for(model: &str) -> ModelPricing {
    PRICE_TABLE
        .iter()
        .filter(|(prefix, _)| model.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, pricing)| *pricing)
        .unwrap_or(FALLBACK_PRICING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        // "gpt-4o-mini-2024-07-18" matches both gpt-4o and gpt-4o-mini.
        let pricing = pricing_for("gpt-4o-mini-2024-07-18");
        assert_eq!(pricing, pricing_for("gpt-4o-mini"));
        assert!(pricing.prompt_per_1k < pricing_for("gpt-4o").prompt_per_1k);
    }

    #[test]
    fn model_variants_match_their_family() {
        assert_eq!(pricing_for("gpt-4-0613"), pricing_for("gpt-4"));
        assert_eq!(pricing_for("gpt-4-32k-0613"), pricing_for("gpt-4-32k"));
    }

    #[test]
    fn unknown_models_use_the_fallback_tier() {
        assert_eq!(pricing_for("some-local-model"), FALLBACK_PRICING);
    }

    #[test]
    fn cost_is_per_thousand_tokens() {
        let pricing = ModelPricing::new(0.03, 0.06);
        let cost = pricing.cost(1000, 500);
        assert!((cost - 0.06).abs() < 1e-9);
    }
}
