//! Mapping canonical input roles onto a model's declared input names.
//!
//! Exported models disagree on input naming, so each canonical role
//! (`input_ids` / `attention_mask` / `token_type_ids`) is matched
//! case-insensitively against the declared set. When none of the canonical
//! names exist at all, the ids array is bound to the model's first declared
//! input as a best-effort fallback. No shape validation happens here;
//! mismatches surface downstream as inference errors.

use tracing::debug;

/// Canonical name for the token-id input.
pub const IDS_INPUT: &str = "input_ids";
/// Canonical name for the attention-mask input.
pub const ATTENTION_MASK_INPUT: &str = "attention_mask";
/// Canonical name for the segment-id input.
pub const TOKEN_TYPE_IDS_INPUT: &str = "token_type_ids";

/// Resolved mapping from input roles to the model's declared input names.
///
/// Computed once at load time; the model's input signature is fixed for the
/// session's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBinding {
    ids: Option<String>,
    attention_mask: Option<String>,
    token_type_ids: Option<String>,
}

impl InputBinding {
    /// Resolve the binding against the model's declared input names.
    pub fn resolve(declared: &[String]) -> Self {
        let find = |canonical: &str| {
            declared
                .iter()
                .find(|name| name.eq_ignore_ascii_case(canonical))
                .cloned()
        };

        let mut binding = Self {
            ids: find(IDS_INPUT),
            attention_mask: find(ATTENTION_MASK_INPUT),
            token_type_ids: find(TOKEN_TYPE_IDS_INPUT),
        };

        if binding.ids.is_none()
            && binding.attention_mask.is_none()
            && binding.token_type_ids.is_none()
        {
            // No canonical name matched; feed the ids to whatever comes first.
            binding.ids = declared.first().cloned();
            if let Some(name) = &binding.ids {
                debug!(input = %name, "no canonical input names; binding ids to first declared input");
            }
        }

        binding
    }

    /// Declared name bound to the token-id role, if any.
    pub fn ids(&self) -> Option<&str> {
        self.ids.as_deref()
    }

    /// Declared name bound to the attention-mask role, if any.
    pub fn attention_mask(&self) -> Option<&str> {
        self.attention_mask.as_deref()
    }

    /// Declared name bound to the segment-id role, if any.
    pub fn token_type_ids(&self) -> Option<&str> {
        self.token_type_ids.as_deref()
    }
}
