//! Output resolution: turning a model's named output set into one vector.
//!
//! Exported transformer models disagree on output naming and pooling
//! convention, so extraction is an ordered strategy table evaluated once per
//! call, first match wins. An explicitly pooled/CLS vector is the strongest
//! signal; mean-pooled hidden states come next; a flattened float tensor is
//! the last resort. When nothing matches the result is an empty vector, not
//! an error.

use tracing::debug;

use crate::backend::NamedTensor;

/// Output names signalling an explicitly pooled whole-sequence vector.
const POOLED_MARKERS: &[&str] = &["pooler", "pooled", "cls"];

/// Output names signalling per-position hidden states.
const HIDDEN_MARKERS: &[&str] = &["last_hidden", "sequence_output", "hidden_states", "output"];

/// One extraction strategy: a match predicate plus an extractor.
struct Strategy {
    label: &'static str,
    applies: fn(&NamedTensor) -> bool,
    extract: fn(&NamedTensor) -> Option<Vec<f32>>,
}

/// Ordered strategy table; earlier entries take priority.
const STRATEGIES: &[Strategy] = &[
    Strategy {
        label: "pooled-output",
        applies: pooled_applies,
        extract: extract_pooled,
    },
    Strategy {
        label: "mean-pooled-hidden",
        applies: hidden_applies,
        extract: extract_mean_pooled,
    },
    Strategy {
        label: "float-fallback",
        applies: any_applies,
        extract: extract_flattened,
    },
];

/// Resolve the embedding vector from a model's output set.
pub fn resolve_embedding(outputs: &[NamedTensor]) -> Vec<f32> {
    for strategy in STRATEGIES {
        for tensor in outputs {
            if !(strategy.applies)(tensor) {
                continue;
            }
            if let Some(vector) = (strategy.extract)(tensor) {
                debug!(
                    strategy = strategy.label,
                    output = %tensor.name,
                    dims = vector.len(),
                    "resolved embedding"
                );
                return vector;
            }
        }
    }

    debug!("no extraction strategy matched; returning empty vector");
    Vec::new()
}

fn name_contains_any(name: &str, markers: &[&str]) -> bool {
    let lower = name.to_ascii_lowercase();
    markers.iter().any(|marker| lower.contains(marker))
}

fn pooled_applies(tensor: &NamedTensor) -> bool {
    if !name_contains_any(&tensor.name, POOLED_MARKERS) {
        return false;
    }
    match tensor.shape.as_slice() {
        [_h] => true,
        [1, _h] => true,
        _ => false,
    }
}

fn extract_pooled(tensor: &NamedTensor) -> Option<Vec<f32>> {
    match tensor.shape.as_slice() {
        // [H]: copy directly.
        [_h] => Some(tensor.data.clone()),
        // [1, H]: copy row 0.
        [1, h] => {
            let hidden = usize::try_from(*h).ok()?;
            tensor.data.get(..hidden).map(<[f32]>::to_vec)
        }
        _ => None,
    }
}

fn hidden_applies(tensor: &NamedTensor) -> bool {
    name_contains_any(&tensor.name, HIDDEN_MARKERS)
        && matches!(tensor.shape.as_slice(), [1, _s, _h])
}

/// Unweighted mean across all sequence positions of a `[1, S, H]` tensor.
///
/// Deliberately ignores the attention mask, so padding positions are averaged
/// in too. Preserved legacy behavior, flagged in the tests.
fn extract_mean_pooled(tensor: &NamedTensor) -> Option<Vec<f32>> {
    let [1, s, h] = tensor.shape.as_slice() else {
        return None;
    };
    let seq_len = usize::try_from(*s).ok()?;
    let hidden = usize::try_from(*h).ok()?;
    if seq_len == 0 || tensor.data.len() < seq_len * hidden {
        return None;
    }

    let mut vector = vec![0.0f32; hidden];
    for position in 0..seq_len {
        let start = position * hidden;
        for (acc, &value) in vector.iter_mut().zip(&tensor.data[start..start + hidden]) {
            *acc += value;
        }
    }
    for value in &mut vector {
        *value /= seq_len as f32;
    }
    Some(vector)
}

fn any_applies(_tensor: &NamedTensor) -> bool {
    true
}

fn extract_flattened(tensor: &NamedTensor) -> Option<Vec<f32>> {
    Some(tensor.data.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(name: &str, shape: &[i64], data: &[f32]) -> NamedTensor {
        NamedTensor {
            name: name.into(),
            shape: shape.to_vec(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn pooled_rank2_copies_row_zero() {
        let outputs = vec![tensor("pooler_output", &[1, 4], &[0.1, 0.2, 0.3, 0.4])];
        assert_eq!(resolve_embedding(&outputs), vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn pooled_rank1_copies_directly() {
        let outputs = vec![tensor("cls_embedding", &[3], &[1.0, 2.0, 3.0])];
        assert_eq!(resolve_embedding(&outputs), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn pooled_matching_is_case_insensitive() {
        let outputs = vec![tensor("Pooled_Embedding", &[1, 2], &[5.0, 6.0])];
        assert_eq!(resolve_embedding(&outputs), vec![5.0, 6.0]);
    }

    #[test]
    fn pooled_beats_mean_pooled_hidden() {
        let outputs = vec![
            tensor(
                "last_hidden_state",
                &[1, 3, 4],
                &[
                    1.0, 1.0, 1.0, 1.0, //
                    2.0, 2.0, 2.0, 2.0, //
                    3.0, 3.0, 3.0, 3.0,
                ],
            ),
            tensor("pooler_output", &[1, 4], &[9.0, 9.0, 9.0, 9.0]),
        ];
        assert_eq!(resolve_embedding(&outputs), vec![9.0, 9.0, 9.0, 9.0]);
    }

    #[test]
    fn mean_pool_correctness() {
        let outputs = vec![tensor(
            "last_hidden_state",
            &[1, 2, 3],
            &[1.0, 2.0, 3.0, 3.0, 4.0, 5.0],
        )];
        assert_eq!(resolve_embedding(&outputs), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn mean_pool_accepts_alternate_names() {
        for name in ["sequence_output", "hidden_states", "encoder_output"] {
            let outputs = vec![tensor(name, &[1, 1, 2], &[4.0, 6.0])];
            assert_eq!(resolve_embedding(&outputs), vec![4.0, 6.0], "name: {name}");
        }
    }

    #[test]
    fn mean_pool_averages_padding_positions_too() {
        // The second position is padding in the source sequence, yet it is
        // still averaged in. Legacy behavior preserved on purpose: the
        // resolver never sees the attention mask.
        let outputs = vec![tensor(
            "last_hidden_state",
            &[1, 2, 2],
            &[2.0, 2.0, 0.0, 0.0],
        )];
        assert_eq!(resolve_embedding(&outputs), vec![1.0, 1.0]);
    }

    #[test]
    fn hidden_requires_batch_of_one() {
        // [2, S, H] does not match the mean-pool strategy; it falls through
        // to the flatten fallback.
        let outputs = vec![tensor(
            "last_hidden_state",
            &[2, 1, 2],
            &[1.0, 2.0, 3.0, 4.0],
        )];
        assert_eq!(resolve_embedding(&outputs), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn fallback_flattens_row_major() {
        let outputs = vec![tensor("logits_2d", &[2, 2], &[1.0, 2.0, 3.0, 4.0])];
        assert_eq!(resolve_embedding(&outputs), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn fallback_takes_first_output() {
        let outputs = vec![
            tensor("alpha", &[2], &[1.0, 2.0]),
            tensor("beta", &[2], &[3.0, 4.0]),
        ];
        assert_eq!(resolve_embedding(&outputs), vec![1.0, 2.0]);
    }

    #[test]
    fn no_outputs_yields_empty_vector() {
        assert!(resolve_embedding(&[]).is_empty());
    }

    #[test]
    fn pooled_name_with_wrong_rank_degrades() {
        // A rank-3 "pooler" tensor does not satisfy the pooled strategy, but
        // its name contains "output"-free markers only, so it lands in the
        // flatten fallback.
        let outputs = vec![tensor("pooler_stack", &[1, 2, 2], &[1.0, 2.0, 3.0, 4.0])];
        assert_eq!(resolve_embedding(&outputs), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn zero_length_sequence_degrades_to_flatten() {
        let outputs = vec![tensor("last_hidden_state", &[1, 0, 4], &[])];
        assert!(resolve_embedding(&outputs).is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mean_pool_length_equals_hidden_dim(
                seq_len in 1usize..8,
                hidden in 1usize..16,
            ) {
                let data: Vec<f32> = (0..seq_len * hidden).map(|i| i as f32).collect();
                let outputs = vec![tensor(
                    "last_hidden_state",
                    &[1, seq_len as i64, hidden as i64],
                    &data,
                )];
                prop_assert_eq!(resolve_embedding(&outputs).len(), hidden);
            }

            #[test]
            fn constant_rows_mean_pool_to_themselves(
                seq_len in 1usize..8,
                row in proptest::collection::vec(-100.0f32..100.0, 1..16),
            ) {
                let mut data = Vec::with_capacity(seq_len * row.len());
                for _ in 0..seq_len {
                    data.extend_from_slice(&row);
                }
                let outputs = vec![tensor(
                    "last_hidden_state",
                    &[1, seq_len as i64, row.len() as i64],
                    &data,
                )];
                let resolved = resolve_embedding(&outputs);
                for (got, want) in resolved.iter().zip(&row) {
                    prop_assert!((got - want).abs() < 1e-4);
                }
            }
        }
    }
}
