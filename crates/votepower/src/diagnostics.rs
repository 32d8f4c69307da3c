//! Injectable reporting for non-fatal roster anomalies

use votepower_sharding::{SerializedPublicKey, ShardId};

/// Receives anomalies the roster builder tolerates
pub trait DiagnosticSink {
    /// A slot repeated an identity already in the roster; the slot was skipped.
    fn duplicate_identity(&self, shard_id: ShardId, slot_index: usize, key: &SerializedPublicKey);
}

/// Default sink, reports through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn duplicate_identity(&self, shard_id: ShardId, slot_index: usize, key: &SerializedPublicKey) {
        tracing::warn!(
            shard = %shard_id,
            slot = slot_index,
            key = %key,
            "duplicate BLS key found in committee, skipping slot"
        );
    }
}
