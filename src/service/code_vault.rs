use std::{
    sync::Arc,
    time::{Duration, SystemTime, SystemTimeError, UNIX_EPOCH},
};

use dashmap::DashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error};

// Unambiguous uppercase alphabet, no O/0 or I/1 confusion on projected
// screens.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const MAX_GENERATION_ATTEMPTS: usize = 100;

/// Active codes expire after this many seconds if never released.
const CODE_TTL_SECS: u64 = 86_400;

#[derive(Debug, thiserror::Error)]
pub enum CodeVaultError {
    #[error("Failed to generate a collision-free code")]
    Exhausted,

    #[error("Failed to get created at time: {0}")]
    TimeError(#[from] SystemTimeError),
}

#[derive(Debug)]
struct VaultValue {
    timestamp: u64,
}

/// In-memory registry of join codes handed out for published quizzes and
/// hackathon teams. Generation is generate-check-regenerate against the
/// active set; the database unique constraint is the backstop for codes
/// surviving a restart.
pub struct CodeVault {
    code_length: usize,
    active_codes: Arc<DashMap<String, VaultValue>>,
}

impl CodeVault {
    pub fn new(code_length: usize) -> Self {
        let vault = Self {
            code_length,
            active_codes: Arc::new(DashMap::new()),
        };

        vault.spawn_vault_cleanup();
        vault
    }

    /// Generates and registers a code that collides with no currently
    /// active code.
    pub fn create_code(&self) -> Result<String, CodeVaultError> {
        let mut rng = ChaCha8Rng::from_os_rng();

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code: String = (0..self.code_length)
                .map(|_| {
                    let idx = rng.random_range(0..CODE_ALPHABET.len());
                    CODE_ALPHABET[idx] as char
                })
                .collect();

            if self.active_codes.contains_key(&code) {
                continue;
            }

            let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
            self.active_codes.insert(code.clone(), VaultValue { timestamp });
            return Ok(code);
        }

        Err(CodeVaultError::Exhausted)
    }

    /// Re-registers a code loaded from the database, e.g. after a restart.
    pub fn adopt_code(&self, code: &str) -> Result<(), CodeVaultError> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        self.active_codes
            .insert(code.to_owned(), VaultValue { timestamp });
        Ok(())
    }

    pub fn is_active(&self, code: &str) -> bool {
        self.active_codes.contains_key(code)
    }

    pub fn release_code(&self, code: &str) {
        self.active_codes.remove(code);
    }

    fn spawn_vault_cleanup(&self) {
        let mut interval = tokio::time::interval(Duration::from_secs(3_600));
        let active_codes = self.active_codes.clone();

        tokio::spawn(async move {
            loop {
                interval.tick().await;
                debug!("CodeVault is cleaning up its codes");

                let Ok(time) = SystemTime::now().duration_since(UNIX_EPOCH) else {
                    error!("Failed to obtain system time when cleaning up the vault");
                    continue;
                };

                let timeout_threshold = time.as_secs().saturating_sub(CODE_TTL_SECS);
                active_codes.retain(|_, value| value.timestamp > timeout_threshold);
            }
        });
    }
}
