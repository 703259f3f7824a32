use crate::error::OrganError;
use crate::substance::SubstanceId;

/// Clamp bounds shared by every [`Composition`](crate::Composition).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SubstanceLimits {
	/// Quantities below this collapse to exactly zero.
	pub precision: f64,
	pub max: f64,
}

impl SubstanceLimits {
	pub fn clamp(&self, value: f64) -> f64 {
		let value = value.max(0.).min(self.max);
		if value < self.precision {
			0.
		} else {
			value
		}
	}
}

impl Default for SubstanceLimits {
	fn default() -> Self {
		SubstanceLimits {
			precision: 1e-3,
			max: 150.,
		}
	}
}

/// Metabolic and growth constants of one liver variant.
#[derive(Debug, Clone, PartialEq)]
pub struct LiverKinetics {
	pub vmax: f64,
	pub km: f64,
	/// Fraction of matrix fuel and inhibitor pulled in every tick.
	pub fract_uptake: f64,
	/// Fraction of local fuel routed to glycolysis.
	pub fract_glucose: f64,
	pub division_energy: f64,
	pub min_cycles: u32,
	pub cycle_range: u32,
}

impl LiverKinetics {
	pub fn healthy() -> Self {
		LiverKinetics {
			vmax: 1.2,
			km: 1.5,
			fract_uptake: 0.1,
			fract_glucose: 0.5,
			division_energy: 20.,
			min_cycles: 250,
			cycle_range: 100,
		}
	}

	pub fn cancer() -> Self {
		LiverKinetics {
			vmax: 1.0,
			km: 0.8,
			fract_uptake: 0.3,
			fract_glucose: 0.9,
			division_energy: 25.,
			min_cycles: 60,
			cycle_range: 30,
		}
	}

	fn validate(&self, prefix: &'static str) -> Result<(), OrganError> {
		positive(prefix, "vmax", self.vmax)?;
		positive(prefix, "km", self.km)?;
		unit_interval(prefix, "fract_uptake", self.fract_uptake)?;
		unit_interval(prefix, "fract_glucose", self.fract_glucose)?;
		non_negative(prefix, "division_energy", self.division_energy)?;
		check(
			prefix,
			"cycle_range",
			self.min_cycles.checked_add(self.cycle_range).is_some(),
			"overflows min_cycles",
		)?;
		Ok(())
	}
}

/// How capillary deposits reach the matrix layer of their target sites.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DepositMode {
	/// Deposits are buffered and absorbed once every site has been updated,
	/// so a tick does not depend on the sweep order.
	Staged,
	/// Deposits land as soon as the depositing site finishes its update.
	/// Sites later in the sweep see them within the same tick.
	Immediate,
}

/// Parameters of an organ simulation, read-only once the organ is built.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganConfig {
	pub grid_side: usize,
	/// Physical side length of the organ, used to map positions onto sites.
	pub organ_size: f64,
	/// Tick length in seconds used by [`Organ::step`](crate::Organ::step).
	pub fixed_step: f64,
	pub seed: u64,

	pub substance: SubstanceLimits,
	pub base_fuel: f64,
	pub base_inhibitor: f64,
	/// Increments used by step-wise baseline adjustment, indexed by substance.
	pub baseline_steps: [f64; 3],

	pub diffusion_constant: f64,
	pub diffusion_radius: usize,
	pub deposit_mode: DepositMode,

	pub artery_width: usize,
	pub capillary_start_row: usize,
	pub capillary_min_spacing: usize,
	pub capillary_seed_probability: f64,
	pub capillary_max_length: usize,

	pub initial_atp: f64,
	pub atp_decay_rate: f64,
	pub upkeep_min: f64,
	pub upkeep_max: f64,
	pub division_cost: f64,
	pub healthy: LiverKinetics,
	pub cancer: LiverKinetics,
}

impl OrganConfig {
	/// Default parameters for a grid with `grid_side` sites per side. Vessel
	/// layout constants scale with the grid.
	pub fn with_grid_side(grid_side: usize) -> Self {
		OrganConfig {
			grid_side,
			artery_width: (3 * grid_side / 100).max(1),
			capillary_max_length: (grid_side / 2).saturating_sub(4),
			..OrganConfig::default()
		}
	}

	pub fn cell_size(&self) -> f64 {
		self.organ_size / self.grid_side as f64
	}

	pub fn kinetics(&self, cancer: bool) -> &LiverKinetics {
		if cancer {
			&self.cancer
		} else {
			&self.healthy
		}
	}

	pub fn baseline_step(&self, id: SubstanceId) -> f64 {
		self.baseline_steps[id as usize]
	}

	pub fn validate(&self) -> Result<(), OrganError> {
		if self.grid_side == 0 {
			return Err(OrganError::InvalidGridSize {
				side: self.grid_side,
			});
		}
		positive("", "organ_size", self.organ_size)?;
		positive("", "fixed_step", self.fixed_step)?;
		positive("", "substance.max", self.substance.max)?;
		positive("", "substance.precision", self.substance.precision)?;
		if self.substance.precision >= self.substance.max {
			return Err(invalid(
				"substance.precision",
				"must be smaller than substance.max",
			));
		}
		non_negative("", "base_fuel", self.base_fuel)?;
		non_negative("", "base_inhibitor", self.base_inhibitor)?;
		for &step in self.baseline_steps.iter() {
			non_negative("", "baseline_steps", step)?;
		}
		positive("", "diffusion_constant", self.diffusion_constant)?;
		if self.artery_width == 0 || self.artery_width > self.grid_side {
			return Err(invalid("artery_width", "must lie in [1, grid_side]"));
		}
		unit_interval("", "capillary_seed_probability", self.capillary_seed_probability)?;
		non_negative("", "initial_atp", self.initial_atp)?;
		non_negative("", "atp_decay_rate", self.atp_decay_rate)?;
		non_negative("", "upkeep_min", self.upkeep_min)?;
		if !(self.upkeep_max >= self.upkeep_min) {
			return Err(invalid("upkeep_max", "must not be below upkeep_min"));
		}
		non_negative("", "division_cost", self.division_cost)?;
		self.healthy.validate("healthy.")?;
		self.cancer.validate("cancer.")?;
		Ok(())
	}
}

impl Default for OrganConfig {
	fn default() -> Self {
		OrganConfig {
			grid_side: 100,
			organ_size: 1000.,
			fixed_step: 0.05,
			seed: 0,
			substance: SubstanceLimits::default(),
			base_fuel: 3.,
			base_inhibitor: 0.,
			baseline_steps: [0.5, 0.5, 0.5],
			diffusion_constant: 5.,
			diffusion_radius: 3,
			deposit_mode: DepositMode::Staged,
			artery_width: 3,
			capillary_start_row: 4,
			capillary_min_spacing: 4,
			capillary_seed_probability: 1. / 3.,
			capillary_max_length: 46,
			initial_atp: 100.,
			atp_decay_rate: 40.,
			upkeep_min: 0.05,
			upkeep_max: 0.15,
			division_cost: 5.,
			healthy: LiverKinetics::healthy(),
			cancer: LiverKinetics::cancer(),
		}
	}
}

fn invalid(name: &'static str, reason: &str) -> OrganError {
	OrganError::InvalidParameter {
		name,
		reason: reason.to_string(),
	}
}

fn check(prefix: &'static str, name: &'static str, ok: bool, reason: &str) -> Result<(), OrganError> {
	if ok {
		Ok(())
	} else {
		Err(OrganError::InvalidParameter {
			name,
			reason: format!("{}{} {}", prefix, name, reason),
		})
	}
}

fn positive(prefix: &'static str, name: &'static str, v: f64) -> Result<(), OrganError> {
	check(prefix, name, v.is_finite() && v > 0., "must be finite and positive")
}

fn non_negative(prefix: &'static str, name: &'static str, v: f64) -> Result<(), OrganError> {
	check(prefix, name, v.is_finite() && v >= 0., "must be finite and non-negative")
}

fn unit_interval(prefix: &'static str, name: &'static str, v: f64) -> Result<(), OrganError> {
	check(prefix, name, (0. ..=1.).contains(&v), "must lie in [0, 1]")
}
