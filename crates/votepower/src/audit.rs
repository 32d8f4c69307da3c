//! Committee audit: harmony-operated genesis accounts must hold their slots
//!
//! Run when validating an epoch transition, not on the consensus hot path.

use std::collections::BTreeSet;

use tracing::debug;
use votepower_sharding::{Instance, SerializedPublicKey, ShardId, Slot};

use crate::{Error, Result};

/// Check every harmony-operated account assigned to `shard_id` is in `slots`
///
/// Position `j` of a shard maps to account `shard_id + j * num_shards`.
/// Fails on the first account that is missing.
pub fn check_protocol_accounts_present(
    instance: &dyn Instance,
    shard_id: ShardId,
    slots: &[Slot],
) -> Result<()> {
    let num_shards = instance.num_shards() as usize;
    let accounts = instance.hmy_accounts();
    let present: BTreeSet<&SerializedPublicKey> = slots.iter().map(|s| &s.bls_public_key).collect();

    for position in 0..instance.num_harmony_operated_nodes_per_shard() {
        let index = shard_id.0 as usize + position * num_shards;
        let account = accounts
            .get(index)
            .ok_or(Error::ProtocolAccountIndexOutOfRange {
                shard_id,
                index,
                available: accounts.len(),
            })?;

        let key = SerializedPublicKey::from_hex(&account.bls_public_key)
            .map_err(|source| Error::InvalidKeyMaterial { index, source })?;

        if !present.contains(&key) {
            return Err(Error::MissingProtocolAccountInSlots { shard_id, key });
        }
    }

    debug!(
        shard = %shard_id,
        checked = instance.num_harmony_operated_nodes_per_shard(),
        "harmony accounts present in slots"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use votepower_sharding::{derive_genesis_accounts, Address, GenesisAccount, ShardingInstance};

    // 2 shards, 2 harmony nodes each: shard 0 owns accounts 0 and 2
    fn instance(accounts: Vec<GenesisAccount>) -> ShardingInstance {
        ShardingInstance::new(2, 4, 2, "0.68".parse().unwrap(), accounts).unwrap()
    }

    fn slot_for(account: &GenesisAccount) -> Slot {
        Slot::harmony(
            Address([0; 20]),
            SerializedPublicKey::from_hex(&account.bls_public_key).unwrap(),
        )
    }

    #[test]
    fn test_interleaved_accounts_present() {
        let accounts = derive_genesis_accounts("audit", 4);
        let inst = instance(accounts.clone());

        let shard0 = vec![slot_for(&accounts[0]), slot_for(&accounts[2])];
        let shard1 = vec![slot_for(&accounts[3]), slot_for(&accounts[1])];
        check_protocol_accounts_present(&inst, ShardId(0), &shard0).unwrap();
        check_protocol_accounts_present(&inst, ShardId(1), &shard1).unwrap();
    }

    #[test]
    fn test_missing_account_names_key() {
        let accounts = derive_genesis_accounts("audit", 4);
        let inst = instance(accounts.clone());

        let slots = vec![slot_for(&accounts[0]), slot_for(&accounts[1])];
        let expected = SerializedPublicKey::from_hex(&accounts[2].bls_public_key).unwrap();
        match check_protocol_accounts_present(&inst, ShardId(0), &slots) {
            Err(Error::MissingProtocolAccountInSlots { shard_id, key }) => {
                assert_eq!(shard_id, ShardId(0));
                assert_eq!(key, expected);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_shard_beyond_account_list() {
        let accounts = derive_genesis_accounts("audit", 4);
        let inst = instance(accounts);
        assert!(matches!(
            check_protocol_accounts_present(&inst, ShardId(3), &[]),
            Err(Error::ProtocolAccountIndexOutOfRange { index: 3, available: 4, .. })
        ));
    }

    #[test]
    fn test_bad_key_material() {
        let mut accounts = derive_genesis_accounts("audit", 4);
        accounts[2].bls_public_key = "not hex".into();
        let inst = instance(accounts.clone());
        let slots = vec![slot_for(&accounts[0])];
        assert!(matches!(
            check_protocol_accounts_present(&inst, ShardId(0), &slots),
            Err(Error::InvalidKeyMaterial { index: 2, .. })
        ));
    }
}
