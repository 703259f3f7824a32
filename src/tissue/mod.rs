//! Tissue units living on a [`Site`](crate::Site): the passive matrix, liver
//! cells (healthy or cancerous) and blood vessels.
//!
//! Units never touch another site. Anything that crosses a site boundary
//! (diffusion deposits, division into a neighbour) is recorded in
//! [`SiteEffects`] and carried out by the [`Organ`](crate::Organ) once the
//! site has finished its update.

mod liver;
mod matrix;
mod vessel;

pub use liver::{Liver, LiverKind};
pub use matrix::Matrix;
pub use vessel::{attenuation, Vessel, VesselKind};

use rand_pcg::Pcg64;

use crate::config::OrganConfig;
use crate::site::GridCoord;
use crate::substance::{Baselines, Composition, SubstanceId};

/// Random source threaded through generation and every tick.
pub type SimRng = Pcg64;

/// Shared contract of every per-site biological unit.
pub trait TissueUnit {
	fn composition(&self) -> &Composition;
	fn composition_mut(&mut self) -> &mut Composition;
	fn position(&self) -> GridCoord;
	fn update(&mut self, ctx: &mut TickContext<'_>);

	fn glucose_like(&self) -> f64 {
		self.composition().quantity(SubstanceId::Fuel)
	}

	fn growth_factor(&self) -> f64 {
		self.composition().quantity(SubstanceId::GrowthFactor)
	}

	fn inhibitor(&self) -> f64 {
		self.composition().quantity(SubstanceId::Inhibitor)
	}

	fn absorb(&mut self, substance: Composition) {
		*self.composition_mut() += substance;
	}

	fn uptake_on_gradient(&mut self, fraction: f64, other: &mut dyn TissueUnit, id: SubstanceId) {
		self.composition_mut()
			.uptake_on_gradient(fraction, other.composition_mut(), id);
	}
}

/// A request from a liver unit to divide into a neighbouring site.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpansionRequest {
	Liver(GridCoord),
	Cancer(GridCoord),
}

/// Cross-site effects produced while one site updates.
#[derive(Debug, Default)]
pub struct SiteEffects {
	deposits: Vec<(GridCoord, Composition)>,
	expansion: Option<ExpansionRequest>,
}

impl SiteEffects {
	/// Routes a diffusion deposit to the matrix layer of the site at `coord`.
	pub fn absorb_at(&mut self, coord: GridCoord, substance: Composition) {
		self.deposits.push((coord, substance));
	}

	pub fn request_liver_expansion(&mut self, origin: GridCoord) {
		self.expansion = Some(ExpansionRequest::Liver(origin));
	}

	pub fn request_cancer_expansion(&mut self, origin: GridCoord) {
		self.expansion = Some(ExpansionRequest::Cancer(origin));
	}

	pub fn deposits(&self) -> &[(GridCoord, Composition)] {
		&self.deposits
	}

	pub fn expansion(&self) -> Option<ExpansionRequest> {
		self.expansion
	}

	pub(crate) fn take_deposits(&mut self) -> std::vec::Drain<'_, (GridCoord, Composition)> {
		self.deposits.drain(..)
	}

	pub(crate) fn take_expansion(&mut self) -> Option<ExpansionRequest> {
		self.expansion.take()
	}
}

/// Organ-wide state a site needs for one tick.
pub struct TickEnv<'a> {
	pub dt: f64,
	pub config: &'a OrganConfig,
	pub baselines: &'a Baselines,
	pub rng: &'a mut SimRng,
	pub effects: &'a mut SiteEffects,
}

impl<'e> TickEnv<'e> {
	/// Narrows the environment to one unit. Liver units also receive the
	/// matrix of their own site to feed from.
	pub fn context<'a>(&'a mut self, matrix: Option<&'a mut Matrix>) -> TickContext<'a> {
		TickContext {
			dt: self.dt,
			config: self.config,
			baselines: self.baselines,
			rng: &mut *self.rng,
			effects: &mut *self.effects,
			matrix,
		}
	}
}

/// What a unit sees during its update.
pub struct TickContext<'a> {
	/// Tick length in seconds.
	pub dt: f64,
	pub config: &'a OrganConfig,
	pub baselines: &'a Baselines,
	pub rng: &'a mut SimRng,
	pub effects: &'a mut SiteEffects,
	pub matrix: Option<&'a mut Matrix>,
}

impl TickContext<'_> {
	pub fn is_out(&self, coord: GridCoord) -> bool {
		coord.is_out(self.config.grid_side)
	}

	/// Substance injected by the bloodstream: configured base levels shifted
	/// by the organ's baseline offsets.
	pub fn source_composition(&self) -> Composition {
		Composition::new(
			self.baselines.get(SubstanceId::GrowthFactor),
			self.config.base_fuel + self.baselines.get(SubstanceId::Fuel),
			self.config.base_inhibitor + self.baselines.get(SubstanceId::Inhibitor),
			self.config.substance,
		)
	}
}
