//! Default request bodies per endpoint.
//!
//! `build_template` is pure: the same endpoint and model hint always yield
//! the same value. The match is exhaustive over [`EndpointId`], so adding a
//! catalog entry without deciding its template fails to compile.

use serde_json::{Value, json};

use crate::catalog::EndpointId;

const GREETING: &str = "Hello from SnapLLM.";

fn user_message(content: &str) -> Value {
    json!({ "role": "user", "content": content })
}

/// Builds the canonical body for an endpoint, or `None` if it has none.
#[must_use]
pub fn build_template(id: EndpointId, model_hint: &str) -> Option<Value> {
    let template = match id {
        EndpointId::Health
        | EndpointId::ApiInfo
        | EndpointId::ServerMetrics
        | EndpointId::ConfigGet
        | EndpointId::ConfigRecommendations
        | EndpointId::ModelsList
        | EndpointId::OpenAiModels
        | EndpointId::CacheStats
        | EndpointId::ImageFetch
        | EndpointId::ContextsList
        | EndpointId::ContextsStats
        | EndpointId::ContextGet
        | EndpointId::CacheClear
        | EndpointId::ModelDelete
        | EndpointId::ContextDelete => return None,

        EndpointId::ConfigUpdate => json!({
            "default_models_path": "models",
            "max_models": 4,
            "default_ram_budget_mb": 16384,
            "default_strategy": "balanced",
        }),
        EndpointId::ModelLoad => json!({
            "model_id": model_hint,
            "file_path": "models/model.gguf",
            "model_type": "auto",
            "cache_only": false,
        }),
        EndpointId::ModelSwitch | EndpointId::ModelUnload => json!({ "model_id": model_hint }),
        EndpointId::ModelsScan => json!({ "path": "models" }),

        EndpointId::ChatCompletions => json!({
            "model": model_hint,
            "messages": [user_message(GREETING)],
            "max_tokens": 256,
            "temperature": 0.7,
            "stream": false,
        }),
        EndpointId::Messages => json!({
            "model": model_hint,
            "max_tokens": 256,
            "messages": [user_message(GREETING)],
        }),
        EndpointId::Generate => json!({
            "model": model_hint,
            "prompt": "Write a haiku about fast model switching.",
            "max_tokens": 128,
            "temperature": 0.8,
        }),
        EndpointId::GenerateBatch => json!({
            "model": model_hint,
            "batch": [
                [user_message("Summarize the benefits of KV cache reuse in one sentence.")],
                [user_message("Translate 'good morning' into French.")],
            ],
            "max_tokens": 128,
        }),

        EndpointId::VisionGenerate => json!({
            "model": model_hint,
            "prompt": "Describe this image.",
            "image": "<base64-image-data>",
            "max_tokens": 256,
        }),

        EndpointId::DiffusionGenerate => json!({
            "model": model_hint,
            "prompt": "A lighthouse on a cliff at sunset, oil painting",
            "negative_prompt": "",
            "width": 512,
            "height": 512,
            "steps": 20,
            "cfg_scale": 7.0,
            "seed": -1,
        }),
        EndpointId::DiffusionVideo => json!({
            "model": model_hint,
            "prompt": "Waves rolling onto a beach",
            "num_frames": 16,
            "fps": 8,
            "width": 512,
            "height": 512,
        }),

        EndpointId::ContextIngest => json!({
            "model_id": model_hint,
            "name": "product-docs",
            "content": "SnapLLM keeps several models resident and switches between them in milliseconds.",
            "ttl_seconds": 86400,
            "priority": "normal",
        }),
        EndpointId::ContextQuery => json!({
            "query": "How fast is model switching?",
            "max_tokens": 256,
            "temperature": 0.7,
        }),
        EndpointId::ContextPromote => json!({ "tier": "hot" }),
        EndpointId::ContextDemote => json!({ "tier": "cold" }),
    };
    Some(template)
}

/// Returns the template pretty-printed as draft text, or an empty string.
#[must_use]
pub fn template_text(id: EndpointId, model_hint: &str) -> String {
    build_template(id, model_hint)
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::EndpointCatalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn chat_completions_template() {
        let template = build_template(EndpointId::ChatCompletions, "llama-7b").unwrap();
        assert_eq!(template["model"], "llama-7b");
        let messages = template["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Hello from SnapLLM.");
        assert_eq!(template["max_tokens"], 256);
    }

    #[test]
    fn get_endpoints_have_no_template() {
        for endpoint in EndpointCatalog::builtin().list() {
            if !endpoint.method.carries_body() {
                assert_eq!(build_template(endpoint.id, "m"), None, "{}", endpoint.id);
            }
        }
        assert_eq!(build_template(EndpointId::CacheClear, "m"), None);
    }

    #[test]
    fn templates_are_deterministic() {
        for endpoint in EndpointCatalog::builtin().list() {
            assert_eq!(
                build_template(endpoint.id, "qwen"),
                build_template(endpoint.id, "qwen")
            );
        }
    }

    #[test]
    fn model_hint_lands_in_model_or_model_id() {
        let load = build_template(EndpointId::ModelLoad, "mistral").unwrap();
        assert_eq!(load["model_id"], "mistral");

        let ingest = build_template(EndpointId::ContextIngest, "mistral").unwrap();
        assert_eq!(ingest["model_id"], "mistral");

        let image = build_template(EndpointId::DiffusionGenerate, "sdxl").unwrap();
        assert_eq!(image["model"], "sdxl");
    }

    #[test]
    fn batch_is_an_array_of_message_arrays() {
        let batch = build_template(EndpointId::GenerateBatch, "m").unwrap();
        let conversations = batch["batch"].as_array().unwrap();
        assert_eq!(conversations.len(), 2);
        assert!(conversations.iter().all(|c| c[0]["role"] == "user"));
    }

    #[test]
    fn template_text_parses_back_to_template() {
        let text = template_text(EndpointId::VisionGenerate, "llava");
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(Some(parsed), build_template(EndpointId::VisionGenerate, "llava"));
        assert_eq!(template_text(EndpointId::Health, "llava"), "");
    }
}
