use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::config::{LiverKinetics, OrganConfig};
use crate::site::GridCoord;
use crate::substance::{Composition, SubstanceId};
use crate::tissue::{SimRng, TickContext, TissueUnit};

/// Inhibition constant of glycolysis.
const GLYCOLYSIS_INHIBITION: f64 = 0.6;
/// Share of local fuel reaching either pathway.
const FUEL_AVAILABILITY: f64 = 0.8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LiverKind {
	Healthy,
	/// Glycolysis-only metabolism, invades any neighbour.
	Cancer,
}

/// A hepatocyte: feeds on the matrix of its site, turns fuel into ATP and
/// divides into a neighbouring site once it has enough energy and has lived
/// long enough.
#[derive(Debug, Clone)]
pub struct Liver {
	site: GridCoord,
	kind: LiverKind,
	composition: Composition,
	atp: f64,
	cycle: u32,
	cycle_target: u32,
}

impl Liver {
	pub fn new(site: GridCoord, kind: LiverKind, config: &OrganConfig, rng: &mut SimRng) -> Self {
		let mut liver = Liver {
			site,
			kind,
			composition: Composition::empty(config.substance),
			atp: config.initial_atp,
			cycle: 0,
			cycle_target: 0,
		};
		liver.cycle_target = liver.draw_cycle_target(config.kinetics(liver.is_cancer()), rng);
		liver
	}

	pub fn with_atp(mut self, atp: f64) -> Self {
		self.atp = atp;
		self
	}

	pub fn kind(&self) -> LiverKind {
		self.kind
	}

	pub fn is_cancer(&self) -> bool {
		self.kind == LiverKind::Cancer
	}

	pub fn atp(&self) -> f64 {
		self.atp
	}

	pub fn cycle(&self) -> u32 {
		self.cycle
	}

	pub fn cycle_target(&self) -> u32 {
		self.cycle_target
	}

	/// Michaelis-Menten rate of the Krebs cycle. Vmax also scales the
	/// substrate term.
	pub fn krebs(&self, dt: f64, k: &LiverKinetics) -> f64 {
		let s = k.vmax * (self.glucose_like() * FUEL_AVAILABILITY);
		dt * (k.vmax * s) / (s + k.km)
	}

	/// Michaelis-Menten rate of glycolysis under competitive inhibition.
	pub fn glycolysis(&self, dt: f64, k: &LiverKinetics) -> f64 {
		let s = self.glucose_like() * k.fract_glucose * FUEL_AVAILABILITY;
		let i = self.inhibitor();
		let dt_ms = dt * 1000.;
		(0.1 * dt_ms) * (k.vmax * s) / (s + k.km * (1. + i / GLYCOLYSIS_INHIBITION))
	}

	pub fn atp_synthesis(&self, dt: f64, k: &LiverKinetics) -> f64 {
		match self.kind {
			LiverKind::Healthy => self.krebs(dt, k) + self.glycolysis(dt, k),
			LiverKind::Cancer => self.glycolysis(dt, k),
		}
	}

	pub fn can_divide(&self, k: &LiverKinetics) -> bool {
		self.atp >= k.division_energy && self.cycle >= self.cycle_target
	}

	fn draw_cycle_target(&self, k: &LiverKinetics, rng: &mut SimRng) -> u32 {
		rng.gen_range(k.min_cycles..=k.min_cycles + k.cycle_range)
	}

	fn finish_division(&mut self, k: &LiverKinetics, rng: &mut SimRng) {
		self.cycle = 0;
		self.cycle_target = self.draw_cycle_target(k, rng);
	}
}

impl TissueUnit for Liver {
	fn composition(&self) -> &Composition {
		&self.composition
	}

	fn composition_mut(&mut self) -> &mut Composition {
		&mut self.composition
	}

	fn position(&self) -> GridCoord {
		self.site
	}

	fn update(&mut self, ctx: &mut TickContext<'_>) {
		let config = ctx.config;
		let k = config.kinetics(self.is_cancer());
		self.cycle += 1;

		if self.atp > 0. {
			self.atp *= 1. - (-config.atp_decay_rate * ctx.dt).exp();
			self.atp -= Uniform::new_inclusive(config.upkeep_min, config.upkeep_max).sample(&mut *ctx.rng);
		}

		if let Some(matrix) = ctx.matrix.as_deref_mut() {
			matrix.uptake_on_gradient(k.fract_uptake, &mut *self, SubstanceId::Fuel);
			matrix.uptake_on_gradient(k.fract_uptake, &mut *self, SubstanceId::Inhibitor);
		}

		self.atp += self.atp_synthesis(ctx.dt, k);
		if self.atp < 0. {
			self.atp = 0.;
		}

		if self.can_divide(k) {
			self.atp -= config.division_cost;
			match self.kind {
				LiverKind::Healthy => ctx.effects.request_liver_expansion(self.site),
				LiverKind::Cancer => ctx.effects.request_cancer_expansion(self.site),
			}
			self.finish_division(k, ctx.rng);
		}
	}
}
