//! Filter parameters and their valid ranges.
//!
//! Every filter reads its numeric arguments from one shared [`ParameterSet`].
//! Values are range-checked on assignment, so filters can trust what they
//! read.

use crate::core::error::{FiltrawyError, FiltrawyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;

/// Name of a filter parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamName {
    /// Brightness scale and power-law gamma.
    Intensity,
    /// Binarization cut-off.
    Threshold,
    /// Warm/cool shift.
    Temperature,
    /// Saturation multiplier.
    Saturation,
    /// Vignette falloff strength.
    Vignette,
    /// Radius of blur and rank windows.
    BlurRadius,
    /// Edge-preserving smoothing strength.
    DenoiseStrength,
}

impl ParamName {
    /// All parameters in display order.
    pub const ALL: [ParamName; 7] = [
        ParamName::Intensity,
        ParamName::Threshold,
        ParamName::Temperature,
        ParamName::Saturation,
        ParamName::Vignette,
        ParamName::BlurRadius,
        ParamName::DenoiseStrength,
    ];

    /// Identifier used in parameter files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            ParamName::Intensity => "intensity",
            ParamName::Threshold => "threshold",
            ParamName::Temperature => "temperature",
            ParamName::Saturation => "saturation",
            ParamName::Vignette => "vignette",
            ParamName::BlurRadius => "blur_radius",
            ParamName::DenoiseStrength => "denoise_strength",
        }
    }

    /// Definition (range, default, description) of this parameter.
    pub fn definition(self) -> ParameterDefinition {
        match self {
            ParamName::Intensity => ParameterDefinition::new(self, "Intensity", 1.0, 0.0, 2.0)
                .with_description("Brightness scale for color pass-through, gamma for power law"),
            ParamName::Threshold => ParameterDefinition::new(self, "Threshold", 127.0, 0.0, 255.0)
                .with_description("Binarization cut-off on grayscale")
                .integer(),
            ParamName::Temperature => {
                ParameterDefinition::new(self, "Temperature", 0.0, -100.0, 100.0)
                    .with_description("Negative is cooler (blue), positive is warmer (red)")
                    .integer()
            }
            ParamName::Saturation => ParameterDefinition::new(self, "Saturation", 1.0, 0.0, 2.0)
                .with_description("Saturation multiplier (0 = grayscale, 1 = original)"),
            ParamName::Vignette => ParameterDefinition::new(self, "Vignette", 0.5, 0.0, 1.0)
                .with_description("Vignette falloff strength"),
            ParamName::BlurRadius => ParameterDefinition::new(self, "Blur Radius", 5.0, 1.0, 21.0)
                .with_description("Neighborhood radius; kernel size is 2 * radius + 1")
                .integer(),
            ParamName::DenoiseStrength => {
                ParameterDefinition::new(self, "Denoise Strength", 10.0, 0.0, 30.0)
                    .with_description("Edge-preserving smoothing strength (0 = off)")
                    .integer()
            }
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ParamName {
    type Err = FiltrawyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ParamName::ALL
            .into_iter()
            .find(|p| p.id() == normalized)
            .ok_or_else(|| FiltrawyError::UnknownParameter(s.to_string()))
    }
}

/// Static description of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDefinition {
    /// Parameter name.
    pub name: ParamName,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Value used when nothing was set.
    pub default_value: f64,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Whether fractional values are rounded to whole numbers.
    pub integer: bool,
    /// Description for documentation and tooltips.
    pub description: &'static str,
}

impl ParameterDefinition {
    fn new(name: ParamName, display_name: &'static str, default_value: f64, min: f64, max: f64) -> Self {
        Self {
            name,
            display_name,
            default_value,
            min,
            max,
            integer: false,
            description: "",
        }
    }

    fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Check a value against the range, returning the stored form.
    pub fn validate(&self, value: f64) -> FiltrawyResult<f64> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(FiltrawyError::ParameterOutOfRange {
                name: self.name.id(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        let value = if self.integer { value.round() } else { value };
        // Folds -0.0 into 0.0 so equal sets hash equally.
        Ok(value + 0.0)
    }
}

/// Current values of every filter parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    intensity: f64,
    threshold: f64,
    temperature: f64,
    saturation: f64,
    vignette: f64,
    blur_radius: f64,
    denoise_strength: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            intensity: ParamName::Intensity.definition().default_value,
            threshold: ParamName::Threshold.definition().default_value,
            temperature: ParamName::Temperature.definition().default_value,
            saturation: ParamName::Saturation.definition().default_value,
            vignette: ParamName::Vignette.definition().default_value,
            blur_radius: ParamName::BlurRadius.definition().default_value,
            denoise_strength: ParamName::DenoiseStrength.definition().default_value,
        }
    }
}

impl ParameterSet {
    /// Parameters at their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a parameter.
    pub fn get(&self, name: ParamName) -> f64 {
        match name {
            ParamName::Intensity => self.intensity,
            ParamName::Threshold => self.threshold,
            ParamName::Temperature => self.temperature,
            ParamName::Saturation => self.saturation,
            ParamName::Vignette => self.vignette,
            ParamName::BlurRadius => self.blur_radius,
            ParamName::DenoiseStrength => self.denoise_strength,
        }
    }

    /// Set a parameter, rejecting values outside its range.
    ///
    /// Returns whether the stored value changed.
    pub fn set(&mut self, name: ParamName, value: f64) -> FiltrawyResult<bool> {
        let value = name.definition().validate(value)?;
        let slot = match name {
            ParamName::Intensity => &mut self.intensity,
            ParamName::Threshold => &mut self.threshold,
            ParamName::Temperature => &mut self.temperature,
            ParamName::Saturation => &mut self.saturation,
            ParamName::Vignette => &mut self.vignette,
            ParamName::BlurRadius => &mut self.blur_radius,
            ParamName::DenoiseStrength => &mut self.denoise_strength,
        };
        let changed = *slot != value;
        *slot = value;
        Ok(changed)
    }

    /// Builder-style [`ParameterSet::set`].
    pub fn with(mut self, name: ParamName, value: f64) -> FiltrawyResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Set a parameter by its string id.
    pub fn set_by_name(&mut self, name: &str, value: f64) -> FiltrawyResult<bool> {
        self.set(name.parse()?, value)
    }

    /// Check every value against its range.
    ///
    /// Needed after deserialization, which bypasses [`ParameterSet::set`].
    pub fn validate(&self) -> FiltrawyResult<()> {
        for name in ParamName::ALL {
            name.definition().validate(self.get(name))?;
        }
        Ok(())
    }

    /// Brightness scale, also the power-law gamma.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Binarization cut-off.
    pub fn threshold(&self) -> u8 {
        self.threshold.round().clamp(0.0, 255.0) as u8
    }

    /// Color temperature shift in `[-100, 100]`.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Saturation multiplier.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Vignette strength in `[0, 1]`.
    pub fn vignette(&self) -> f64 {
        self.vignette
    }

    /// Blur radius as a whole number of pixels (at least 1).
    pub fn blur_radius(&self) -> u32 {
        self.blur_radius.round().max(1.0) as u32
    }

    /// Denoise strength; zero disables smoothing.
    pub fn denoise_strength(&self) -> u32 {
        self.denoise_strength.round().max(0.0) as u32
    }

    /// Re-apply every value through [`ParameterSet::set`], rounding integer
    /// parameters and rejecting anything out of range.
    pub fn normalized(self) -> FiltrawyResult<Self> {
        let mut params = Self::default();
        for name in ParamName::ALL {
            params.set(name, self.get(name))?;
        }
        Ok(params)
    }

    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> FiltrawyResult<Self> {
        let params: ParameterSet = serde_json::from_str(json)?;
        params.normalized()
    }

    /// Parse from TOML and validate.
    pub fn from_toml(text: &str) -> FiltrawyResult<Self> {
        let params: ParameterSet = toml::from_str(text)?;
        params.normalized()
    }

    /// Load a parameter file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> FiltrawyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            Self::from_toml(&text)
        } else {
            Self::from_json(&text)
        }
    }
}

impl Eq for ParameterSet {}

// Values are range-checked and finite, so hashing the bit patterns agrees
// with `PartialEq`.
impl Hash for ParameterSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for name in ParamName::ALL {
            self.get(name).to_bits().hash(state);
        }
    }
}
