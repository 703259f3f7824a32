//! The organ grid: owns every site, runs the per-tick sweep and answers the
//! queries of the layers that display or perturb it.

mod generation;

pub use generation::is_in_liver;

use log::trace;
use ndarray::{Array2, Zip};
use ndarray_stats::QuantileExt;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::{DepositMode, OrganConfig};
use crate::error::OrganError;
use crate::site::{GridCoord, Occupancy, Site};
use crate::substance::{Baselines, Composition, SubstanceId};
use crate::tissue::{ExpansionRequest, SimRng, SiteEffects, TickEnv, VesselKind};

/// A point in physical organ space, as used by the agent layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicalPosition {
	pub x: f64,
	pub y: f64,
}

impl PhysicalPosition {
	pub fn new(x: f64, y: f64) -> Self {
		PhysicalPosition { x, y }
	}
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct OrganCensus {
	pub matrix_only: usize,
	pub liver: usize,
	pub cancer: usize,
	pub vessel: usize,
}

pub struct Organ {
	config: OrganConfig,
	sites: Array2<Site>,
	displayed: SubstanceId,
	baselines: Baselines,
	rng: SimRng,
	// deposits waiting for the end of the sweep in staged mode
	staged: Array2<Composition>,
	effects: SiteEffects,
	ticks: u64,
}

impl Organ {
	/// Builds the grid and lays out the liver and its blood supply.
	pub fn new(config: OrganConfig) -> Result<Self, OrganError> {
		let mut organ = Organ::blank(config)?;
		organ.generate();
		Ok(organ)
	}

	pub fn blank(config: OrganConfig) -> Result<Self, OrganError> {
		config.validate()?;
		let n = config.grid_side;
		let limits = config.substance;
		let sites = Array2::from_shape_fn((n, n), |(x, y)| {
			Site::new(GridCoord::new(x as i32, y as i32), limits)
		});
		Ok(Organ {
			sites,
			displayed: SubstanceId::Fuel,
			baselines: Baselines::default(),
			rng: SimRng::seed_from_u64(config.seed),
			staged: Array2::from_elem((n, n), Composition::empty(limits)),
			effects: SiteEffects::default(),
			ticks: 0,
			config,
		})
	}

	pub fn config(&self) -> &OrganConfig {
		&self.config
	}

	pub fn grid_side(&self) -> usize {
		self.config.grid_side
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn is_out(&self, coord: GridCoord) -> bool {
		coord.is_out(self.config.grid_side)
	}

	pub fn site(&self, coord: GridCoord) -> Option<&Site> {
		if self.is_out(coord) {
			None
		} else {
			Some(&self.sites[coord.index()])
		}
	}

	pub fn sites(&self) -> &Array2<Site> {
		&self.sites
	}

	pub fn step(&mut self) {
		self.advance(self.config.fixed_step);
	}

	/// Advances every site by `dt` seconds in a fixed sweep order, `x` major.
	///
	/// Expansion requests are honoured as soon as the requesting site is done.
	/// Diffusion deposits follow [`DepositMode`].
	pub fn advance(&mut self, dt: f64) {
		let n = self.config.grid_side;
		for x in 0..n {
			for y in 0..n {
				let mut env = TickEnv {
					dt,
					config: &self.config,
					baselines: &self.baselines,
					rng: &mut self.rng,
					effects: &mut self.effects,
				};
				self.sites[[x, y]].update(&mut env);
				self.apply_effects();
			}
		}

		if self.config.deposit_mode == DepositMode::Staged {
			let limits = self.config.substance;
			Zip::from(&mut self.sites)
				.and(&mut self.staged)
				.for_each(|site, staged| {
					if !staged.is_null() {
						site.absorb(*staged);
					}
					*staged = Composition::empty(limits);
				});
		}
		self.ticks += 1;
	}

	fn apply_effects(&mut self) {
		let mut effects = std::mem::take(&mut self.effects);
		for (coord, substance) in effects.take_deposits() {
			self.absorb_at(coord, substance);
		}
		match effects.take_expansion() {
			Some(ExpansionRequest::Liver(origin)) => self.expand_liver(origin),
			Some(ExpansionRequest::Cancer(origin)) => self.expand_cancer(origin),
			None => {}
		}
		self.effects = effects;
	}

	/// Routes a deposit to the matrix layer at `coord`. Deposits outside the
	/// grid are dropped.
	pub fn absorb_at(&mut self, coord: GridCoord, substance: Composition) {
		if self.is_out(coord) {
			return;
		}
		match self.config.deposit_mode {
			DepositMode::Staged => self.staged[coord.index()] += substance,
			DepositMode::Immediate => self.sites[coord.index()].absorb(substance),
		}
	}

	/// Grows healthy liver into one free cardinal neighbour inside the liver
	/// region, if any.
	pub fn expand_liver(&mut self, origin: GridCoord) {
		let n = self.config.grid_side;
		let candidates: Vec<GridCoord> = origin
			.neighbors()
			.iter()
			.copied()
			.filter(|&c| !c.is_out(n) && is_in_liver(c, n) && !self.sites[c.index()].has_liver())
			.collect();
		if let Some(&target) = candidates.choose(&mut self.rng) {
			trace!("liver expands from {:?} to {:?}", origin, target);
			self.sites[target.index()].set_liver(&self.config, &mut self.rng);
		}
	}

	/// Grows the tumor into any cardinal neighbour, taking over whatever liver
	/// cell lives there.
	pub fn expand_cancer(&mut self, origin: GridCoord) {
		let n = self.config.grid_side;
		let candidates: Vec<GridCoord> = origin
			.neighbors()
			.iter()
			.copied()
			.filter(|&c| !c.is_out(n))
			.collect();
		if let Some(&target) = candidates.choose(&mut self.rng) {
			trace!("cancer expands from {:?} to {:?}", origin, target);
			self.sites[target.index()].set_cancer(&self.config, &mut self.rng);
		}
	}

	pub fn set_liver_at(&mut self, coord: GridCoord) {
		if !self.is_out(coord) {
			self.sites[coord.index()].set_liver(&self.config, &mut self.rng);
		}
	}

	pub fn set_vessel_at(&mut self, coord: GridCoord, kind: VesselKind) {
		if !self.is_out(coord) {
			self.sites[coord.index()].set_vessel(kind, self.config.substance);
		}
	}

	pub fn set_cancer_at(&mut self, coord: GridCoord) {
		if !self.is_out(coord) {
			self.sites[coord.index()].set_cancer(&self.config, &mut self.rng);
		}
	}

	pub fn to_grid_coord(&self, pos: PhysicalPosition) -> GridCoord {
		let cell = self.config.cell_size();
		GridCoord::new((pos.x / cell).floor() as i32, (pos.y / cell).floor() as i32)
	}

	/// Plants a tumor cell under a physical position. Positions off the grid
	/// are ignored.
	pub fn place_cancer_at(&mut self, pos: PhysicalPosition) {
		let coord = self.to_grid_coord(pos);
		self.set_cancer_at(coord);
	}

	pub fn displayed_substance(&self) -> SubstanceId {
		self.displayed
	}

	pub fn set_displayed_substance(&mut self, id: SubstanceId) {
		self.displayed = id;
	}

	pub fn next_displayed_substance(&mut self) -> SubstanceId {
		self.displayed = self.displayed.next();
		self.displayed
	}

	pub fn baseline(&self, id: SubstanceId) -> f64 {
		self.baselines.get(id)
	}

	/// Sets a baseline offset, clamped to plus or minus the substance maximum.
	pub fn set_baseline(&mut self, id: SubstanceId, value: f64) {
		let max = self.config.substance.max;
		self.baselines.set(id, value.max(-max).min(max));
	}

	pub fn adjust_baseline(&mut self, id: SubstanceId, delta: f64) {
		self.set_baseline(id, self.baseline(id) + delta);
	}

	pub fn increase_baseline(&mut self, id: SubstanceId) {
		self.adjust_baseline(id, self.config.baseline_step(id));
	}

	pub fn decrease_baseline(&mut self, id: SubstanceId) {
		self.adjust_baseline(id, -self.config.baseline_step(id));
	}

	pub fn concentration_at(&self, coord: GridCoord, id: SubstanceId) -> Option<f64> {
		self.site(coord).map(|s| s.ecm_quantity(id))
	}

	/// Matrix quantity of the displayed substance relative to the maximum.
	pub fn concentration_ratio_at(&self, coord: GridCoord) -> Option<f64> {
		self.concentration_at(coord, self.displayed)
			.map(|q| q / self.config.substance.max)
	}

	pub fn occupancy_at(&self, coord: GridCoord) -> Option<Occupancy> {
		self.site(coord).map(Site::occupancy)
	}

	pub fn concentration_map(&self) -> Array2<f64> {
		let id = self.displayed;
		let max = self.config.substance.max;
		self.sites.map(|s| s.ecm_quantity(id) / max)
	}

	pub fn occupancy_map(&self) -> Array2<Occupancy> {
		self.sites.map(Site::occupancy)
	}

	pub fn peak_concentration(&self, id: SubstanceId) -> f64 {
		let quantities = self.sites.map(|s| s.ecm_quantity(id));
		quantities.max().map(|&q| q).unwrap_or(0.)
	}

	pub fn count_sites(&self, occupancy: Occupancy) -> usize {
		self.sites.iter().filter(|s| s.occupancy() == occupancy).count()
	}

	pub fn census(&self) -> OrganCensus {
		let mut census = OrganCensus::default();
		for site in self.sites.iter() {
			match site.occupancy() {
				Occupancy::MatrixOnly => census.matrix_only += 1,
				Occupancy::Liver => census.liver += 1,
				Occupancy::Cancer => census.cancer += 1,
				Occupancy::Vessel => census.vessel += 1,
			}
		}
		census
	}
}
