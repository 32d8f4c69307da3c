//! Epoch-indexed sharding schedules

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Epoch, Instance, ShardingInstance};

/// Resolves the sharding policy in force at an epoch
pub trait Schedule {
    fn instance_for_epoch(&self, epoch: Epoch) -> &dyn Instance;
}

/// Sharding instance taking effect at `start_epoch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start_epoch: Epoch,
    pub instance: ShardingInstance,
}

/// Table-driven [`Schedule`]
///
/// The entry with the greatest `start_epoch <= epoch` applies. Entries start
/// at epoch 0 and are strictly increasing, so every epoch resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpochSchedule {
    entries: Vec<ScheduleEntry>,
}

impl EpochSchedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Result<Self, ConfigError> {
        let first = entries.first().ok_or(ConfigError::EmptySchedule)?;
        if first.start_epoch != 0 {
            return Err(ConfigError::ScheduleStartsLate(first.start_epoch));
        }
        for pair in entries.windows(2) {
            if pair[1].start_epoch <= pair[0].start_epoch {
                return Err(ConfigError::UnorderedSchedule(pair[1].start_epoch));
            }
        }
        Ok(Self { entries })
    }

    /// Load a schedule from JSON, validating every instance
    ///
    /// ```json
    /// { "entries": [ { "start_epoch": 0, "instance": { ... } } ] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct Raw {
            entries: Vec<ScheduleEntry>,
        }

        let raw: Raw = serde_json::from_str(json)?;
        Self::new(raw.entries)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Concrete instance for an epoch
    pub fn sharding_instance(&self, epoch: Epoch) -> &ShardingInstance {
        // index 0 starts at epoch 0, so partition_point is at least 1
        let idx = self.entries.partition_point(|e| e.start_epoch <= epoch);
        &self.entries[idx - 1].instance
    }
}

impl Schedule for EpochSchedule {
    fn instance_for_epoch(&self, epoch: Epoch) -> &dyn Instance {
        self.sharding_instance(epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenesisAccount;
    use votepower_numeric::Dec;

    fn instance(harmony: &str) -> ShardingInstance {
        let accounts = vec![GenesisAccount {
            address: "0x00".into(),
            bls_public_key: "00".into(),
        }];
        ShardingInstance::new(1, 4, 1, harmony.parse().unwrap(), accounts).unwrap()
    }

    #[test]
    fn test_instance_for_epoch_picks_latest_start() {
        let schedule = EpochSchedule::new(vec![
            ScheduleEntry { start_epoch: 0, instance: instance("1") },
            ScheduleEntry { start_epoch: 10, instance: instance("0.68") },
            ScheduleEntry { start_epoch: 20, instance: instance("0.49") },
        ])
        .unwrap();

        let harmony = |epoch| schedule.instance_for_epoch(epoch).harmony_vote_percent();
        assert_eq!(harmony(0), Dec::one());
        assert_eq!(harmony(9), Dec::one());
        assert_eq!(harmony(10), "0.68".parse().unwrap());
        assert_eq!(harmony(19), "0.68".parse().unwrap());
        assert_eq!(harmony(u64::MAX), "0.49".parse().unwrap());
    }

    #[test]
    fn test_schedule_validation() {
        assert!(matches!(EpochSchedule::new(vec![]), Err(ConfigError::EmptySchedule)));
        assert!(matches!(
            EpochSchedule::new(vec![ScheduleEntry { start_epoch: 5, instance: instance("1") }]),
            Err(ConfigError::ScheduleStartsLate(5))
        ));
        assert!(matches!(
            EpochSchedule::new(vec![
                ScheduleEntry { start_epoch: 0, instance: instance("1") },
                ScheduleEntry { start_epoch: 0, instance: instance("1") },
            ]),
            Err(ConfigError::UnorderedSchedule(0))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "entries": [
                {
                    "start_epoch": 0,
                    "instance": {
                        "num_shards": 1,
                        "num_nodes_per_shard": 4,
                        "num_harmony_operated_nodes_per_shard": 1,
                        "harmony_vote_percent": "0.6",
                        "external_vote_percent": "0.4",
                        "hmy_accounts": [
                            { "address": "0x01", "bls_public_key": "01" }
                        ]
                    }
                }
            ]
        }"#;
        let schedule = EpochSchedule::from_json(json).unwrap();
        assert_eq!(
            schedule.instance_for_epoch(42).external_vote_percent(),
            "0.4".parse().unwrap()
        );

        assert!(matches!(EpochSchedule::from_json("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            EpochSchedule::from_json(r#"{"entries": []}"#),
            Err(ConfigError::EmptySchedule)
        ));
    }
}
