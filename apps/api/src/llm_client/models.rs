//! Fixed model catalogue: display name → Gemini model id. The first entry is
//! the default.

use serde::Serialize;

pub const MODEL_CATALOG: &[ModelInfo] = &[
    ModelInfo {
        display_name: "Gemini 3.0 Flash Preview",
        id: "gemini-3-flash-preview",
    },
    ModelInfo {
        display_name: "Gemini 2.5 Flash",
        id: "gemini-2.5-flash",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub display_name: &'static str,
    pub id: &'static str,
}

pub fn default_model() -> ModelInfo {
    MODEL_CATALOG[0]
}

/// Looks a model up by display name or id. `None` selects the default.
pub fn resolve_model(requested: Option<&str>) -> Option<ModelInfo> {
    match requested.map(str::trim).filter(|r| !r.is_empty()) {
        None => Some(default_model()),
        Some(name) => MODEL_CATALOG
            .iter()
            .find(|m| m.display_name == name || m.id == name)
            .copied(),
    }
}
