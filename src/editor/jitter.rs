// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the small offset that keeps consecutively added nodes from stacking exactly.
pub trait Jitter {
    /// Returns a value in `[0, bound)`, or `0.0` when `bound` is not positive.
    fn sample(&mut self, bound: f64) -> f64;
}

#[derive(Debug)]
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Jitter for RandomJitter {
    fn sample(&mut self, bound: f64) -> f64 {
        if bound > 0.0 {
            self.rng.random_range(0.0..bound)
        } else {
            0.0
        }
    }
}

/// Always returns the same offset, clamped to `[0, bound]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn sample(&mut self, bound: f64) -> f64 {
        if bound > 0.0 {
            self.0.clamp(0.0, bound)
        } else {
            0.0
        }
    }
}
