//! Rotating `User-Agent` identity strings
//!
//! One random generator lives for the whole run and is shared by every
//! request; it is seeded once, from entropy or from a configured seed.

use crate::config::UserAgentConfig;
use crate::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Pool of identity strings, one picked uniformly per request
#[derive(Debug)]
pub struct UserAgentPool {
    agents: Vec<String>,
    rng: Mutex<StdRng>,
}

impl UserAgentPool {
    /// Creates a pool over `agents`, seeded deterministically when `seed` is set
    ///
    /// # Returns
    ///
    /// * `Ok(UserAgentPool)` - Pool ready for use
    /// * `Err(ConfigError)` - `agents` was empty
    pub fn new(agents: Vec<String>, seed: Option<u64>) -> Result<Self, ConfigError> {
        if agents.is_empty() {
            return Err(ConfigError::Validation(
                "at least one user agent is required".to_string(),
            ));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            agents,
            rng: Mutex::new(rng),
        })
    }

    /// Builds a pool from the `[user-agent]` configuration section
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, ConfigError> {
        Self::new(config.agents.clone(), config.seed)
    }

    /// Picks one identity string at random
    pub fn pick(&self) -> &str {
        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(0..self.agents.len())
        };
        &self.agents[index]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
