//! Quadrant Energy Register
//!
//! ## Overview
//!
//! Each processed window adds one cycle's worth of energy to a register keyed
//! by the signs of active and reactive power:
//!
//! ```text
//!                      +Q
//!                       │
//!           Q2 (-P, +Q) │ Q1 (+P, +Q)
//!       ───────────────-┼-─────────────── +P
//!           Q3 (-P, -Q) │ Q4 (+P, -Q)
//!                       │
//! ```
//!
//! The window is assumed to last one measured cycle, so the increment is
//! `power · (1 / f)` joules, converted to kWh. Buckets only ever grow: a
//! negative power is stored as its magnitude in the matching quadrant.
//!
//! ## Zero Power
//!
//! A window where either power is exactly zero sits on an axis and belongs to
//! no quadrant. It is skipped entirely, including the half of the reading
//! that was not zero.
//!
//! ## Ownership
//!
//! [`EnergyAccumulator`] is a plain owned value. It is mutated through
//! `&mut self` only; callers that share one across threads wrap it in their
//! own lock. Nothing is persisted.

use crate::{
    constants::metering::JOULES_PER_KWH,
    errors::{MetrologyError, MetrologyResult},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Power-plane quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Quadrant {
    /// Importing, positive reactive
    Q1,
    /// Exporting, positive reactive
    Q2,
    /// Exporting, negative reactive
    Q3,
    /// Importing, negative reactive
    Q4,
}

impl Quadrant {
    /// All quadrants in register order
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Quadrant of a power reading, `None` on either axis
    pub fn from_signs(active_w: f64, reactive_var: f64) -> Option<Self> {
        if active_w > 0.0 {
            if reactive_var > 0.0 {
                Some(Self::Q1)
            } else if reactive_var < 0.0 {
                Some(Self::Q4)
            } else {
                None
            }
        } else if active_w < 0.0 {
            if reactive_var > 0.0 {
                Some(Self::Q2)
            } else if reactive_var < 0.0 {
                Some(Self::Q3)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Register slot, 0 for Q1 through 3 for Q4
    pub fn index(&self) -> usize {
        match self {
            Self::Q1 => 0,
            Self::Q2 => 1,
            Self::Q3 => 2,
            Self::Q4 => 3,
        }
    }
}

/// Accumulated energy per quadrant, in kWh (active) and kVARh (reactive)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnergyTotals {
    /// Active energy, indexed by [`Quadrant::index`]
    pub active: [f64; 4],
    /// Reactive energy, indexed by [`Quadrant::index`]
    pub reactive: [f64; 4],
}

impl EnergyTotals {
    /// Active energy in one quadrant
    pub fn active_in(&self, quadrant: Quadrant) -> f64 {
        self.active[quadrant.index()]
    }

    /// Reactive energy in one quadrant
    pub fn reactive_in(&self, quadrant: Quadrant) -> f64 {
        self.reactive[quadrant.index()]
    }

    /// Active energy drawn from the grid (Q1 + Q4)
    pub fn imported(&self) -> f64 {
        self.active_in(Quadrant::Q1) + self.active_in(Quadrant::Q4)
    }

    /// Active energy returned to the grid (Q2 + Q3)
    pub fn exported(&self) -> f64 {
        self.active_in(Quadrant::Q2) + self.active_in(Quadrant::Q3)
    }

    /// Net active energy, imported minus exported
    pub fn active_balance(&self) -> f64 {
        self.imported() - self.exported()
    }

    /// Reactive energy in Q1 + Q3
    pub fn inductive(&self) -> f64 {
        self.reactive_in(Quadrant::Q1) + self.reactive_in(Quadrant::Q3)
    }

    /// Reactive energy in Q2 + Q4
    pub fn capacitive(&self) -> f64 {
        self.reactive_in(Quadrant::Q2) + self.reactive_in(Quadrant::Q4)
    }

    /// Net reactive energy, `(Q1 + Q2) - (Q3 + Q4)`
    pub fn reactive_balance(&self) -> f64 {
        (self.reactive_in(Quadrant::Q1) + self.reactive_in(Quadrant::Q2))
            - (self.reactive_in(Quadrant::Q3) + self.reactive_in(Quadrant::Q4))
    }
}

/// Running quadrant energy register
#[derive(Debug, Clone, Default)]
pub struct EnergyAccumulator {
    totals: EnergyTotals,
    windows: u64,
}

impl EnergyAccumulator {
    /// Zeroed register
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one cycle of energy at `frequency_hz`
    ///
    /// Returns the quadrant that was updated, or `None` when either power is
    /// zero. A frequency that cannot give a cycle duration is an error and
    /// leaves the register untouched.
    pub fn accumulate(
        &mut self,
        active_w: f64,
        reactive_var: f64,
        frequency_hz: f64,
    ) -> MetrologyResult<Option<Quadrant>> {
        if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
            return Err(MetrologyError::InvalidFrequency {
                frequency: frequency_hz,
            });
        }

        let Some(quadrant) = Quadrant::from_signs(active_w, reactive_var) else {
            log_trace!("Energy skipped: P = {}, Q = {} lies on an axis", active_w, reactive_var);
            return Ok(None);
        };

        let period_s = 1.0 / frequency_hz;
        let slot = quadrant.index();

        // Signs are carried by the quadrant, buckets hold magnitudes
        self.totals.active[slot] += libm::fabs(to_kwh(active_w, period_s));
        self.totals.reactive[slot] += libm::fabs(to_kwh(reactive_var, period_s));
        self.windows += 1;

        Ok(Some(quadrant))
    }

    /// Current totals
    pub fn totals(&self) -> &EnergyTotals {
        &self.totals
    }

    /// Copy of the current totals
    pub fn snapshot(&self) -> EnergyTotals {
        self.totals
    }

    /// Windows that contributed energy since creation or the last reset
    pub fn windows(&self) -> u64 {
        self.windows
    }

    /// Zero every bucket
    pub fn reset(&mut self) {
        log_debug!("Energy register reset after {} windows", self.windows);
        *self = Self::default();
    }
}

fn to_kwh(power: f64, period_s: f64) -> f64 {
    power * period_s / JOULES_PER_KWH
}
