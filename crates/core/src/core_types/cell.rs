use crate::core_types::lattice::LatticeIndex;
use crate::core_types::settings::FireSettings;
use crate::core_types::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// Combustion state of a cell or of a whole object
///
/// Transitions only run forward: `Normal → OnFire → BurntDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FireState {
    #[default]
    Normal,
    OnFire,
    BurntDown,
}

/// Outcome of advancing a cell's burn timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnProgress {
    /// Cell is on fire and has burn time left
    StillBurning,
    /// Cell crossed its burn duration this call and is now burnt down
    JustBurntOut,
    /// Cell is not on fire (never ignited or already burnt down); nothing advanced
    NotApplicable,
}

impl BurnProgress {
    /// Boolean view where only a fresh burnout counts as "no longer valid"
    pub fn is_still_valid(self) -> bool {
        !matches!(self, BurnProgress::JustBurntOut)
    }
}

/// Thresholds copied into every cell of a grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSettings {
    pub ignition_temperature: f32,
    pub temperature_change_per_tick: f32,
    pub burn_duration: f32,
}

/// Clamp a heating or burning increment so accumulators never decrease
///
/// Negative, NaN and infinite amounts count as no progress.
pub(crate) fn forward_amount(amount: f32) -> f32 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

impl From<&FireSettings> for CellSettings {
    fn from(settings: &FireSettings) -> Self {
        CellSettings {
            ignition_temperature: settings.ignition_temperature,
            temperature_change_per_tick: settings.temperature_change_per_tick,
            burn_duration: settings.burn_duration,
        }
    }
}

/// One flammable sample point of an object
#[derive(Debug, Clone, PartialEq)]
pub struct FireCell {
    index: LatticeIndex,
    position: Vec3,
    radius: f32,
    settings: CellSettings,

    state: FireState,
    temperature: f32,  // accumulated while Normal
    burning_time: f32, // accumulated while OnFire (s)
}

impl FireCell {
    pub fn new(index: LatticeIndex, position: Vec3, radius: f32, settings: CellSettings) -> Self {
        FireCell {
            index,
            position,
            radius,
            settings,
            state: FireState::Normal,
            temperature: 0.0,
            burning_time: 0.0,
        }
    }

    /// Add `delta_temperature` and ignite once the threshold is reached
    ///
    /// Returns `true` only on the call that moves the cell to `OnFire`. Cells that
    /// are already on fire or burnt down are left untouched and return `false`.
    /// A negative or non-finite delta adds nothing.
    pub fn advance_toward_ignition(&mut self, delta_temperature: f32) -> bool {
        if self.state != FireState::Normal {
            return false;
        }
        self.temperature += forward_amount(delta_temperature);
        if self.temperature >= self.settings.ignition_temperature {
            self.state = FireState::OnFire;
            return true;
        }
        false
    }

    /// Heat the cell by its configured per-tick delta
    pub fn heat(&mut self) -> bool {
        self.advance_toward_ignition(self.settings.temperature_change_per_tick)
    }

    /// Add `elapsed` seconds of burning and burn out once the duration is reached
    ///
    /// A negative or non-finite `elapsed` adds nothing.
    pub fn advance_burning(&mut self, elapsed: f32) -> BurnProgress {
        if self.state != FireState::OnFire {
            return BurnProgress::NotApplicable;
        }
        self.burning_time += forward_amount(elapsed);
        if self.burning_time >= self.settings.burn_duration {
            self.state = FireState::BurntDown;
            return BurnProgress::JustBurntOut;
        }
        BurnProgress::StillBurning
    }

    pub fn index(&self) -> LatticeIndex {
        self.index
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn settings(&self) -> &CellSettings {
        &self.settings
    }

    pub fn state(&self) -> FireState {
        self.state
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn burning_time(&self) -> f32 {
        self.burning_time
    }

    /// Never ignited, so it may still catch fire
    pub fn is_flammable(&self) -> bool {
        self.state == FireState::Normal
    }
}
