use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::models::guide::ExpressionGuide;
use crate::models::program::ReactionRecord;
use crate::programs::ProgramLibrary;

/// Loads the expression guide.
///
/// The `_merged` sibling of `path` is preferred when present. A missing file
/// is not an error: an empty guide is returned and every prompt block uses its
/// built-in default. A file that exists but cannot be parsed is an error.
pub fn load_guide(path: &Path) -> Result<ExpressionGuide> {
    let Some(resolved) = guide_candidates(path).into_iter().find(|p| p.is_file()) else {
        warn!(
            "Expression guide not found at {}; prompts will use built-in defaults",
            path.display()
        );
        return Ok(ExpressionGuide::default());
    };

    let raw = std::fs::read_to_string(&resolved)
        .with_context(|| format!("Failed to read expression guide {}", resolved.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Expression guide {} is not valid JSON", resolved.display()))?;

    let guide = ExpressionGuide::from_value(&value);
    info!(
        "Expression guide loaded from {} ({} sections)",
        resolved.display(),
        guide.len()
    );
    Ok(guide)
}

fn guide_candidates(path: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        let merged = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}_merged.{ext}"),
            None => format!("{stem}_merged"),
        };
        candidates.push(path.with_file_name(merged));
    }
    candidates.push(path.to_path_buf());
    candidates
}

/// Loads program history: program name → records in source order.
pub fn load_programs(path: &Path) -> Result<ProgramLibrary> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read program data {}", path.display()))?;
    let programs: BTreeMap<String, Vec<ReactionRecord>> = serde_json::from_str(&raw)
        .with_context(|| format!("Program data {} has an unexpected format", path.display()))?;

    let library = ProgramLibrary::new(programs);
    info!("Loaded {} programs from {}", library.len(), path.display());
    Ok(library)
}
