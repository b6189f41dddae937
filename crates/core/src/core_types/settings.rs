use crate::error::FireError;
use serde::{Deserialize, Serialize};

/// How many ignitions a single tick may process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnitionPacing {
    /// Every cell that crosses its ignition threshold ignites in the same tick
    #[default]
    AllEligible,
    /// The active-set scan stops after the first ignition of the tick.
    /// Cells after it in scan order are not advanced at all that tick.
    SingleIgnitionPerTick,
}

/// Fire behavior block for one flammable object
///
/// Supplied when the object's grid is built and copied into every cell;
/// changing it afterwards has no effect on an existing grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireSettings {
    /// Accumulated temperature at which a cell ignites
    pub ignition_temperature: f32,
    /// Temperature added to a heating cell every tick
    pub temperature_change_per_tick: f32,
    /// Seconds a cell burns before it is burnt down
    pub burn_duration: f32,
    /// Number of cells fitted along the reference axis of the object bounds
    pub grid_resolution: u32,
    /// Ignition throttling policy
    pub ignition_pacing: IgnitionPacing,
}

impl Default for FireSettings {
    fn default() -> Self {
        FireSettings {
            ignition_temperature: 100.0,
            temperature_change_per_tick: 25.0,
            burn_duration: 3.0,
            grid_resolution: 4,
            ignition_pacing: IgnitionPacing::AllEligible,
        }
    }
}

impl FireSettings {
    /// Dry brush: catches within two ticks and is gone in a second
    pub fn dry_brush() -> Self {
        FireSettings {
            ignition_temperature: 40.0,
            temperature_change_per_tick: 20.0,
            burn_duration: 1.0,
            grid_resolution: 6,
            ..FireSettings::default()
        }
    }

    /// Hardwood: slow to catch, burns long
    pub fn hardwood() -> Self {
        FireSettings {
            ignition_temperature: 300.0,
            temperature_change_per_tick: 15.0,
            burn_duration: 12.0,
            grid_resolution: 4,
            ..FireSettings::default()
        }
    }

    pub fn with_ignition_temperature(mut self, value: f32) -> Self {
        self.ignition_temperature = value;
        self
    }

    pub fn with_temperature_change_per_tick(mut self, value: f32) -> Self {
        self.temperature_change_per_tick = value;
        self
    }

    pub fn with_burn_duration(mut self, value: f32) -> Self {
        self.burn_duration = value;
        self
    }

    pub fn with_grid_resolution(mut self, value: u32) -> Self {
        self.grid_resolution = value;
        self
    }

    pub fn with_ignition_pacing(mut self, pacing: IgnitionPacing) -> Self {
        self.ignition_pacing = pacing;
        self
    }

    /// Check that every field can drive the lattice and the cell state machine
    ///
    /// # Errors
    /// Returns [`FireError::InvalidSettings`] for a zero resolution, a
    /// negative / non-finite threshold or delta, or a zero delta paired with a
    /// positive ignition temperature (cells would heat forever).
    pub fn validate(&self) -> Result<(), FireError> {
        if self.grid_resolution == 0 {
            return Err(FireError::InvalidSettings {
                reason: "grid_resolution must be at least 1".to_string(),
            });
        }
        let scalars = [
            ("ignition_temperature", self.ignition_temperature),
            ("temperature_change_per_tick", self.temperature_change_per_tick),
            ("burn_duration", self.burn_duration),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(FireError::InvalidSettings {
                    reason: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        if self.temperature_change_per_tick == 0.0 && self.ignition_temperature > 0.0 {
            return Err(FireError::InvalidSettings {
                reason: format!(
                    "temperature_change_per_tick is 0, cells never reach ignition_temperature {}",
                    self.ignition_temperature
                ),
            });
        }
        Ok(())
    }

    /// Parse a behavior block from JSON; missing fields take their defaults
    ///
    /// # Errors
    /// Returns [`FireError::InvalidSettings`] if the document does not parse or
    /// the parsed block fails [`FireSettings::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, FireError> {
        let settings: FireSettings =
            serde_json::from_str(json).map_err(|e| FireError::InvalidSettings {
                reason: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize as pretty-printed JSON
    ///
    /// # Errors
    /// Returns [`FireError::InvalidSettings`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, FireError> {
        serde_json::to_string_pretty(self).map_err(|e| FireError::InvalidSettings {
            reason: e.to_string(),
        })
    }
}
