//! Cost estimation per 1K tokens, selected by model-name prefix.

/// USD per 1K tokens for a family of models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub prefix: &'static str,
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

const TURBO_INPUT: f64 = 0.01;
const TURBO_OUTPUT: f64 = 0.03;

/// Checked in order; the first matching prefix wins, so more specific prefixes come first.
pub const PRICING_TIERS: &[ModelPricing] = &[
    ModelPricing { prefix: "gpt-4-turbo", input_per_1k: TURBO_INPUT, output_per_1k: TURBO_OUTPUT },
    ModelPricing { prefix: "gpt-4-1106", input_per_1k: TURBO_INPUT, output_per_1k: TURBO_OUTPUT },
    ModelPricing { prefix: "gpt-4-0125", input_per_1k: TURBO_INPUT, output_per_1k: TURBO_OUTPUT },
    ModelPricing { prefix: "gpt-4o", input_per_1k: TURBO_INPUT, output_per_1k: TURBO_OUTPUT },
    ModelPricing { prefix: "gpt-4", input_per_1k: 0.03, output_per_1k: 0.06 },
    ModelPricing { prefix: "gpt-3.5", input_per_1k: 0.0005, output_per_1k: 0.0015 },
];

/// Unknown models are priced at the base GPT-4 tier.
pub fn pricing_for(model: &str) -> ModelPricing {
    let model = model.to_lowercase();
    PRICING_TIERS
        .iter()
        .find(|tier| model.starts_with(tier.prefix))
        .copied()
        .unwrap_or(ModelPricing {
            prefix: "gpt-4",
            input_per_1k: 0.03,
            output_per_1k: 0.06,
        })
}

/// `(prompt/1000)*input + (completion/1000)*output`, rounded to 4 decimal places.
pub fn estimate_cost(model: &str, prompt_tokens: u32, completion_tokens: u32) -> f64 {
    let pricing = pricing_for(model);
    let cost = (prompt_tokens as f64 / 1000.0) * pricing.input_per_1k
        + (completion_tokens as f64 / 1000.0) * pricing.output_per_1k;
    (cost * 10_000.0).round() / 10_000.0
}
