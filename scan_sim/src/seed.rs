use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

// =============================================================================
// RUN SEED
// =============================================================================

/// Master seed for one run.
///
/// Every trial gets its own generator, seeded from
/// `SHA-256(master || n || m || trials || trial_index)`, so no generator is
/// ever shared between concurrently running trials and a fixed seed
/// reproduces the whole table regardless of scheduling.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SweepSeed {
    seed: u64,
    master: [u8; 32],
}

impl SweepSeed {
    pub fn from_u64(seed: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.to_be_bytes());
        Self {
            seed,
            master: hasher.finalize().into(),
        }
    }

    /// Draws a fresh seed from the thread-local OS-seeded generator.
    pub fn random() -> Self {
        Self::from_u64(rand::thread_rng().gen())
    }

    /// The `u64` this seed was derived from; logging it makes a run repeatable.
    pub fn value(&self) -> u64 {
        self.seed
    }

    // Hex digest of the master seed, recorded in the run manifest
    pub fn master_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.master);
        format!("{:x}", hasher.finalize())
    }

    pub fn trial_seed(&self, n: u32, m: u32, trials: u32, trial_index: u32) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.master);
        hasher.update(n.to_be_bytes());
        hasher.update(m.to_be_bytes());
        hasher.update(trials.to_be_bytes());
        hasher.update(trial_index.to_be_bytes());
        hasher.finalize().into()
    }

    pub fn trial_rng(&self, n: u32, m: u32, trials: u32, trial_index: u32) -> ChaCha8Rng {
        ChaCha8Rng::from_seed(self.trial_seed(n, m, trials, trial_index))
    }
}
