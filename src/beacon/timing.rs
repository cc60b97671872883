//! Slot and epoch arithmetic for the beacon chain
//!
//! Sync committee lookups are windowed per epoch: every slot in an epoch
//! resolves to the same `state_id` (the epoch's first slot), so all 32 slots
//! share one committee answer.

/// Slots per epoch on mainnet
pub const SLOTS_PER_EPOCH: u64 = 32;

/// Epoch containing `slot`
pub fn epoch_of(slot: u64) -> u64 {
    slot / SLOTS_PER_EPOCH
}

/// First slot of `epoch`
pub fn epoch_start_slot(epoch: u64) -> u64 {
    epoch * SLOTS_PER_EPOCH
}

/// Sync committee query coordinates for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitteeWindow {
    pub epoch: u64,
    /// State to query, always the epoch's first slot
    pub state_id: u64,
}

impl CommitteeWindow {
    pub fn for_slot(slot: u64) -> Self {
        let epoch = epoch_of(slot);
        Self {
            epoch,
            state_id: epoch_start_slot(epoch),
        }
    }
}
