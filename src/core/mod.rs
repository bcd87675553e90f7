// Core proxy exports
pub mod extract;
pub mod fallback;
pub mod normalizer;
pub mod prompts;
pub mod proxy;
pub mod resolver;

pub use extract::{extract_error_message, extract_suggestion, NO_SUGGESTION};
pub use fallback::{call_with_fallback, not_available_message};
pub use normalizer::{normalize_messages, normalize_request, NormalizeError};
pub use prompts::{describe_wine, food_for_wine_prompt, wine_for_food_prompt};
pub use proxy::PairingProxy;
pub use resolver::{normalise_model, ModelResolver, MODEL_NAMESPACE};
