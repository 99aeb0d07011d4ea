// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Waveform memory layout of a sequencer.
//!
//! Every distinct waveform of a resource is placed in either the playback
//! (`awg`) or the acquisition (`acq`) bank. Within a bank, waveforms receive
//! consecutive indices in the order they were first seen; index `k` occupies
//! the memory slots `2k` (I) and `2k + 1` (Q). Indices are never reused.

use indexmap::{IndexMap, IndexSet};
use numeric_array::NumericArray;
use q1asm_generator::{Bank, WaveIndex};

use crate::signature::ContentKey;
use crate::waveform_cache::WaveformCache;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct BankAllocation {
    pub index: WaveIndex,
    pub samples: NumericArray,
}

impl BankAllocation {
    pub fn index_i(&self) -> WaveIndex {
        2 * self.index
    }

    pub fn index_q(&self) -> WaveIndex {
        2 * self.index + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryBank {
    bank: Bank,
    allocations: IndexMap<ContentKey, BankAllocation>,
}

impl MemoryBank {
    pub fn new(bank: Bank) -> Self {
        MemoryBank {
            bank,
            allocations: IndexMap::new(),
        }
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn get(&self, key: &ContentKey) -> Option<&BankAllocation> {
        self.allocations.get(key)
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Number of memory slots in use, two per waveform.
    pub fn slots(&self) -> usize {
        2 * self.allocations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContentKey, &BankAllocation)> {
        self.allocations.iter()
    }

    fn insert(&mut self, key: &ContentKey, samples: &NumericArray) -> Result<WaveIndex> {
        if let Some(existing) = self.allocations.get(key) {
            return Ok(existing.index);
        }
        let index = WaveIndex::try_from(self.allocations.len())
            .map_err(|_| Error::new("Waveform index does not fit into 32 bits"))?;
        self.allocations.insert(
            key.clone(),
            BankAllocation {
                index,
                samples: samples.clone(),
            },
        );
        Ok(index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveformMemory {
    pub awg: MemoryBank,
    pub acq: MemoryBank,
}

impl Default for WaveformMemory {
    fn default() -> Self {
        WaveformMemory {
            awg: MemoryBank::new(Bank::Awg),
            acq: MemoryBank::new(Bank::Acq),
        }
    }
}

impl WaveformMemory {
    /// Assign memory indices to all waveforms sampled for a resource.
    ///
    /// Waveforms whose key is in `acquisitions` go to the acquisition bank.
    /// With a `capacity` (in slots), a bank requiring more slots fails.
    pub fn allocate(
        resource: &str,
        cache: &WaveformCache,
        acquisitions: &IndexSet<ContentKey>,
        capacity: Option<u32>,
    ) -> Result<Self> {
        let mut memory = WaveformMemory::default();
        for (key, samples) in cache.iter() {
            let bank = if acquisitions.contains(key) {
                &mut memory.acq
            } else {
                &mut memory.awg
            };
            bank.insert(key, samples)?;
        }
        if let Some(capacity) = capacity {
            for bank in [&memory.awg, &memory.acq] {
                if bank.slots() > capacity as usize {
                    return Err(Error::BankCapacityExceeded {
                        resource: resource.to_string(),
                        bank: bank.bank(),
                        required: bank.slots(),
                        capacity,
                    });
                }
            }
        }
        Ok(memory)
    }

    /// Find the bank and slot of a waveform.
    pub fn lookup(&self, key: &ContentKey) -> Option<(Bank, &BankAllocation)> {
        self.acq
            .get(key)
            .map(|allocation| (Bank::Acq, allocation))
            .or_else(|| self.awg.get(key).map(|allocation| (Bank::Awg, allocation)))
    }
}
