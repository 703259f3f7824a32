use std::convert::TryFrom;
use std::fmt;
use std::ops::{AddAssign, Mul, SubAssign};

use approx::AbsDiffEq;

use crate::config::SubstanceLimits;
use crate::error::OrganError;

/// The three diffusible substances carried by every tissue unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SubstanceId {
	GrowthFactor = 0,
	Fuel = 1,
	Inhibitor = 2,
}

impl SubstanceId {
	pub const ALL: [SubstanceId; 3] = [
		SubstanceId::GrowthFactor,
		SubstanceId::Fuel,
		SubstanceId::Inhibitor,
	];

	/// Next substance in display order: fuel, inhibitor, growth factor.
	pub fn next(self) -> SubstanceId {
		match self {
			SubstanceId::Fuel => SubstanceId::Inhibitor,
			SubstanceId::Inhibitor => SubstanceId::GrowthFactor,
			SubstanceId::GrowthFactor => SubstanceId::Fuel,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			SubstanceId::GrowthFactor => "growth factor",
			SubstanceId::Fuel => "fuel",
			SubstanceId::Inhibitor => "inhibitor",
		}
	}
}

impl TryFrom<u8> for SubstanceId {
	type Error = OrganError;

	fn try_from(index: u8) -> Result<Self, Self::Error> {
		match index {
			0 => Ok(SubstanceId::GrowthFactor),
			1 => Ok(SubstanceId::Fuel),
			2 => Ok(SubstanceId::Inhibitor),
			_ => Err(OrganError::InvalidSubstance { index }),
		}
	}
}

impl fmt::Display for SubstanceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Per-substance offsets added to what the bloodstream injects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Baselines([f64; 3]);

impl Baselines {
	pub fn get(&self, id: SubstanceId) -> f64 {
		self.0[id as usize]
	}

	pub fn set(&mut self, id: SubstanceId, value: f64) {
		self.0[id as usize] = value;
	}
}

/// Local mixture of the three substances, stored as fractions of a total
/// concentration.
///
/// The fractions sum to one whenever the total exceeds the precision of the
/// attached [`SubstanceLimits`] and are all zero otherwise. Every quantity is
/// clamped to `[0, max]` and snapped to zero below the precision, so the only
/// way to change a composition is through the quantity-wise operations below.
#[derive(Debug, Clone, Copy)]
pub struct Composition {
	fract_growth_factor: f64,
	fract_fuel: f64,
	fract_inhibitor: f64,
	total: f64,
	limits: SubstanceLimits,
}

impl Composition {
	/// Builds a composition from raw quantities, clamping each one first.
	pub fn new(growth_factor: f64, fuel: f64, inhibitor: f64, limits: SubstanceLimits) -> Self {
		let mut c = Composition::empty(limits);
		c.set_quantities(
			limits.clamp(growth_factor),
			limits.clamp(fuel),
			limits.clamp(inhibitor),
		);
		c
	}

	pub fn empty(limits: SubstanceLimits) -> Self {
		Composition {
			fract_growth_factor: 0.,
			fract_fuel: 0.,
			fract_inhibitor: 0.,
			total: 0.,
			limits,
		}
	}

	pub fn limits(&self) -> SubstanceLimits {
		self.limits
	}

	pub fn quantity(&self, id: SubstanceId) -> f64 {
		self.total * self.fraction(id)
	}

	pub fn fraction(&self, id: SubstanceId) -> f64 {
		match id {
			SubstanceId::GrowthFactor => self.fract_growth_factor,
			SubstanceId::Fuel => self.fract_fuel,
			SubstanceId::Inhibitor => self.fract_inhibitor,
		}
	}

	pub fn total(&self) -> f64 {
		self.total
	}

	/// Scales the quantity of one substance by `multiplier`. The scaled
	/// quantity snaps to zero below the precision.
	pub fn update(&mut self, id: SubstanceId, multiplier: f64) {
		let mut q = self.quantities();
		q[id as usize] *= multiplier;
		self.set_clamped(q);
	}

	pub fn is_null(&self) -> bool {
		SubstanceId::ALL
			.iter()
			.all(|&id| self.quantity(id) < self.limits.precision)
	}

	/// Moves `fraction` of substance `id` from `self` into `receiver`.
	///
	/// The other two substances are untouched on both sides. Nothing moves
	/// when the source holds less than the precision threshold.
	pub fn uptake_on_gradient(&mut self, fraction: f64, receiver: &mut Composition, id: SubstanceId) {
		let available = self.quantity(id);
		if available < self.limits.precision {
			return;
		}
		let mut q = [0.; 3];
		q[id as usize] = fraction * available;
		let moved = Composition::new(q[0], q[1], q[2], self.limits);
		*receiver += moved;
		*self -= moved;
	}

	fn quantities(&self) -> [f64; 3] {
		[
			self.quantity(SubstanceId::GrowthFactor),
			self.quantity(SubstanceId::Fuel),
			self.quantity(SubstanceId::Inhibitor),
		]
	}

	fn set_clamped(&mut self, q: [f64; 3]) {
		let l = self.limits;
		self.set_quantities(l.clamp(q[0]), l.clamp(q[1]), l.clamp(q[2]));
	}

	fn set_quantities(&mut self, growth_factor: f64, fuel: f64, inhibitor: f64) {
		let total = growth_factor + fuel + inhibitor;
		if total.abs() < self.limits.precision {
			self.fract_growth_factor = 0.;
			self.fract_fuel = 0.;
			self.fract_inhibitor = 0.;
			self.total = 0.;
		} else {
			self.fract_growth_factor = growth_factor / total;
			self.fract_fuel = fuel / total;
			self.fract_inhibitor = inhibitor / total;
			self.total = total;
		}
	}
}

impl Default for Composition {
	fn default() -> Self {
		Composition::empty(SubstanceLimits::default())
	}
}

impl AddAssign<Composition> for Composition {
	fn add_assign(&mut self, rhs: Composition) {
		let (a, b) = (self.quantities(), rhs.quantities());
		self.set_clamped([a[0] + b[0], a[1] + b[1], a[2] + b[2]]);
	}
}

impl SubAssign<Composition> for Composition {
	fn sub_assign(&mut self, rhs: Composition) {
		let (a, b) = (self.quantities(), rhs.quantities());
		self.set_clamped([a[0] - b[0], a[1] - b[1], a[2] - b[2]]);
	}
}

impl Mul<f64> for Composition {
	type Output = Composition;

	fn mul(self, coeff: f64) -> Composition {
		let q = self.quantities();
		Composition::new(q[0] * coeff, q[1] * coeff, q[2] * coeff, self.limits)
	}
}

impl AbsDiffEq for Composition {
	type Epsilon = f64;

	fn default_epsilon() -> f64 {
		SubstanceLimits::default().precision
	}

	fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
		SubstanceId::ALL
			.iter()
			.all(|&id| (self.quantity(id) - other.quantity(id)).abs() < epsilon)
	}
}

impl PartialEq for Composition {
	fn eq(&self, other: &Self) -> bool {
		self.abs_diff_eq(other, self.limits.precision)
	}
}

impl fmt::Display for Composition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[{}] = {}, [{}] = {}, [{}] = {}",
			SubstanceId::GrowthFactor,
			self.quantity(SubstanceId::GrowthFactor),
			SubstanceId::Fuel,
			self.quantity(SubstanceId::Fuel),
			SubstanceId::Inhibitor,
			self.quantity(SubstanceId::Inhibitor),
		)
	}
}
