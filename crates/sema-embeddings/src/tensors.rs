//! Per-call input tensor construction.
//!
//! A token-id sequence becomes three parallel `[1, seqLen]` arrays: the ids
//! themselves, an attention mask, and all-zero segment ids. No truncation or
//! length enforcement happens here; bounding the sequence to the model's
//! maximum is the caller's job.

/// The three input arrays for a single inference call.
///
/// All three share the same logical shape `[1, seq_len]` and are stored as
/// flat row-major buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputTensorSet {
    /// Token ids.
    pub ids: Vec<i64>,
    /// 1 for real tokens, 0 for padding positions.
    pub attention_mask: Vec<i64>,
    /// Segment ids; constant 0 (single-segment input only).
    pub token_type_ids: Vec<i64>,
}

impl InputTensorSet {
    /// Build the input arrays for `token_ids`.
    ///
    /// Positions holding `pad_id` are masked out of the attention mask.
    pub fn build(token_ids: &[i64], pad_id: i64) -> Self {
        let ids = token_ids.to_vec();
        let attention_mask = token_ids
            .iter()
            .map(|&id| i64::from(id != pad_id))
            .collect();
        let token_type_ids = vec![0; token_ids.len()];
        Self {
            ids,
            attention_mask,
            token_type_ids,
        }
    }

    /// Sequence length shared by all three arrays.
    pub fn seq_len(&self) -> usize {
        self.ids.len()
    }

    /// Logical tensor shape, `[1, seq_len]`.
    pub fn shape(&self) -> [usize; 2] {
        [1, self.seq_len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_convention() {
        let tensors = InputTensorSet::build(&[5, 0, 7], 0);
        assert_eq!(tensors.ids, vec![5, 0, 7]);
        assert_eq!(tensors.attention_mask, vec![1, 0, 1]);
        assert_eq!(tensors.token_type_ids, vec![0, 0, 0]);
    }

    #[test]
    fn custom_pad_id() {
        let tensors = InputTensorSet::build(&[5, 1, 7, 1], 1);
        assert_eq!(tensors.attention_mask, vec![1, 0, 1, 0]);
        // id 0 is a real token when the pad id is 1
        let tensors = InputTensorSet::build(&[0, 1], 1);
        assert_eq!(tensors.attention_mask, vec![1, 0]);
    }

    #[test]
    fn empty_sequence() {
        let tensors = InputTensorSet::build(&[], 0);
        assert_eq!(tensors.seq_len(), 0);
        assert_eq!(tensors.shape(), [1, 0]);
        assert!(tensors.ids.is_empty());
        assert!(tensors.attention_mask.is_empty());
        assert!(tensors.token_type_ids.is_empty());
    }

    #[test]
    fn shape_is_batch_of_one() {
        let tensors = InputTensorSet::build(&[9, 8, 7, 6], 0);
        assert_eq!(tensors.shape(), [1, 4]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arrays_share_length(ids in proptest::collection::vec(0i64..50_000, 0..128)) {
                let tensors = InputTensorSet::build(&ids, 0);
                prop_assert_eq!(tensors.ids.len(), tensors.attention_mask.len());
                prop_assert_eq!(tensors.ids.len(), tensors.token_type_ids.len());
                prop_assert_eq!(tensors.seq_len(), ids.len());
            }

            #[test]
            fn mask_marks_exactly_pad_positions(
                ids in proptest::collection::vec(0i64..16, 0..128),
                pad_id in 0i64..16,
            ) {
                let tensors = InputTensorSet::build(&ids, pad_id);
                for (i, &id) in ids.iter().enumerate() {
                    let expected = i64::from(id != pad_id);
                    prop_assert_eq!(tensors.attention_mask[i], expected);
                }
            }

            #[test]
            fn type_ids_always_zero(ids in proptest::collection::vec(0i64..50_000, 0..128)) {
                let tensors = InputTensorSet::build(&ids, 0);
                prop_assert!(tensors.token_type_ids.iter().all(|&t| t == 0));
            }
        }
    }
}
