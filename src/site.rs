use crate::config::{OrganConfig, SubstanceLimits};
use crate::substance::{Composition, SubstanceId};
use crate::tissue::{Liver, LiverKind, Matrix, SimRng, TickEnv, TissueUnit, Vessel, VesselKind};

/// Integer position of a site. Components may fall outside the grid while
/// neighbourhoods are being explored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridCoord {
	pub x: i32,
	pub y: i32,
}

impl GridCoord {
	pub fn new(x: i32, y: i32) -> Self {
		GridCoord { x, y }
	}

	pub fn offset(self, dx: i32, dy: i32) -> Self {
		GridCoord::new(self.x + dx, self.y + dy)
	}

	pub fn is_out(self, side: usize) -> bool {
		let side = side as i32;
		self.x < 0 || self.y < 0 || self.x >= side || self.y >= side
	}

	/// Cardinal neighbours, right, left, down, up.
	pub fn neighbors(self) -> [GridCoord; 4] {
		[
			self.offset(1, 0),
			self.offset(-1, 0),
			self.offset(0, 1),
			self.offset(0, -1),
		]
	}

	pub(crate) fn index(self) -> [usize; 2] {
		[self.x as usize, self.y as usize]
	}
}

/// Display category of a site, highest priority first when layers overlap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Occupancy {
	Vessel = 3,
	Cancer = 2,
	Liver = 1,
	MatrixOnly = 0,
}

/// One cell of the organ grid, stacking a matrix layer, an optional liver
/// cell and an optional vessel.
#[derive(Debug, Clone)]
pub struct Site {
	coord: GridCoord,
	matrix: Matrix,
	liver: Option<Liver>,
	vessel: Option<Vessel>,
	cancer: bool,
}

impl Site {
	pub fn new(coord: GridCoord, limits: SubstanceLimits) -> Self {
		Site {
			coord,
			matrix: Matrix::new(coord, limits),
			liver: None,
			vessel: None,
			cancer: false,
		}
	}

	pub fn coord(&self) -> GridCoord {
		self.coord
	}

	pub fn matrix(&self) -> &Matrix {
		&self.matrix
	}

	pub fn liver(&self) -> Option<&Liver> {
		self.liver.as_ref()
	}

	pub fn vessel(&self) -> Option<&Vessel> {
		self.vessel.as_ref()
	}

	pub fn has_liver(&self) -> bool {
		self.liver.is_some()
	}

	pub fn has_vessel(&self) -> bool {
		self.vessel.is_some()
	}

	pub fn has_cancer(&self) -> bool {
		self.cancer
	}

	pub fn occupancy(&self) -> Occupancy {
		if self.has_vessel() {
			Occupancy::Vessel
		} else if self.cancer {
			Occupancy::Cancer
		} else if self.has_liver() {
			Occupancy::Liver
		} else {
			Occupancy::MatrixOnly
		}
	}

	pub fn ecm_quantity(&self, id: SubstanceId) -> f64 {
		self.matrix.composition().quantity(id)
	}

	/// Installs a healthy liver cell unless one is already present.
	pub fn set_liver(&mut self, config: &OrganConfig, rng: &mut SimRng) {
		if self.liver.is_none() {
			self.liver = Some(Liver::new(self.coord, LiverKind::Healthy, config, rng));
		}
	}

	pub fn set_vessel(&mut self, kind: VesselKind, limits: SubstanceLimits) {
		if self.vessel.is_none() {
			self.vessel = Some(Vessel::new(self.coord, kind, limits));
		}
	}

	/// Replaces whatever liver cell is here with a cancerous one.
	pub fn set_cancer(&mut self, config: &OrganConfig, rng: &mut SimRng) {
		if !self.cancer {
			self.liver = Some(Liver::new(self.coord, LiverKind::Cancer, config, rng));
			self.cancer = true;
		}
	}

	/// Installs a prepared liver cell, replacing any existing one.
	pub fn install_liver(&mut self, liver: Liver) {
		self.cancer = liver.is_cancer();
		self.liver = Some(liver);
	}

	pub fn absorb(&mut self, substance: Composition) {
		self.matrix.absorb(substance);
	}

	/// Advances every layer by one tick: matrix, then liver, then vessel.
	/// A liver cell left without energy dies and takes the cancer flag
	/// with it.
	pub fn update(&mut self, env: &mut TickEnv<'_>) {
		let Site {
			matrix,
			liver,
			vessel,
			cancer,
			..
		} = self;

		matrix.update(&mut env.context(None));

		let dead = match liver.as_mut() {
			Some(cell) => {
				cell.update(&mut env.context(Some(matrix)));
				cell.atp() <= 0.
			}
			None => false,
		};
		if dead {
			*liver = None;
			*cancer = false;
		}

		if let Some(vessel) = vessel.as_mut() {
			vessel.update(&mut env.context(None));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::substance::Baselines;
	use crate::tissue::SiteEffects;
	use rand::SeedableRng;

	fn update(site: &mut Site, config: &OrganConfig, rng: &mut SimRng) -> SiteEffects {
		let baselines = Baselines::default();
		let mut effects = SiteEffects::default();
		{
			let mut env = TickEnv {
				dt: config.fixed_step,
				config,
				baselines: &baselines,
				rng,
				effects: &mut effects,
			};
			site.update(&mut env);
		}
		effects
	}

	#[test]
	fn set_liver_is_idempotent() {
		let config = OrganConfig::with_grid_side(10);
		let mut rng = SimRng::seed_from_u64(0);
		let mut site = Site::new(GridCoord::new(1, 1), config.substance);
		site.set_liver(&config, &mut rng);
		update(&mut site, &config, &mut rng);
		let before = site.liver().cloned().unwrap();

		site.set_liver(&config, &mut rng);
		let after = site.liver().unwrap();
		assert_eq!(after.atp(), before.atp());
		assert_eq!(after.cycle(), before.cycle());
		assert_eq!(after.cycle_target(), before.cycle_target());
		assert_eq!(after.kind(), LiverKind::Healthy);
	}

	#[test]
	fn cancer_replaces_healthy_cell() {
		let config = OrganConfig::with_grid_side(10);
		let mut rng = SimRng::seed_from_u64(1);
		let mut site = Site::new(GridCoord::new(1, 1), config.substance);
		site.set_liver(&config, &mut rng);
		assert_eq!(site.occupancy(), Occupancy::Liver);
		site.set_cancer(&config, &mut rng);
		assert!(site.has_cancer());
		assert!(site.liver().unwrap().is_cancer());
		assert_eq!(site.occupancy(), Occupancy::Cancer);

		// a second call keeps the existing tumor cell
		update(&mut site, &config, &mut rng);
		let cycle = site.liver().unwrap().cycle();
		site.set_cancer(&config, &mut rng);
		assert_eq!(site.liver().unwrap().cycle(), cycle);
	}

	#[test]
	fn starved_cancer_cell_dies_and_clears_flag() {
		let config = OrganConfig::with_grid_side(10);
		let mut rng = SimRng::seed_from_u64(2);
		let coord = GridCoord::new(3, 3);
		let mut site = Site::new(coord, config.substance);
		site.install_liver(Liver::new(coord, LiverKind::Cancer, &config, &mut rng).with_atp(0.));
		assert!(site.has_cancer());

		update(&mut site, &config, &mut rng);
		assert!(!site.has_liver());
		assert!(!site.has_cancer());
		assert_eq!(site.occupancy(), Occupancy::MatrixOnly);
	}

	#[test]
	fn vessel_is_set_once() {
		let config = OrganConfig::with_grid_side(10);
		let mut site = Site::new(GridCoord::new(0, 0), config.substance);
		site.set_vessel(VesselKind::Artery, config.substance);
		site.set_vessel(VesselKind::Capillary, config.substance);
		assert_eq!(site.vessel().unwrap().kind(), VesselKind::Artery);
		assert_eq!(site.occupancy(), Occupancy::Vessel);
	}

	#[test]
	fn liver_feeds_from_own_matrix() {
		let config = OrganConfig::with_grid_side(10);
		let mut rng = SimRng::seed_from_u64(3);
		let mut site = Site::new(GridCoord::new(2, 2), config.substance);
		site.set_liver(&config, &mut rng);
		site.absorb(Composition::new(0., 10., 0., config.substance));
		update(&mut site, &config, &mut rng);
		assert!(site.ecm_quantity(SubstanceId::Fuel) < 10.);
		assert!(site.liver().unwrap().glucose_like() > 0.);
	}

	#[test]
	fn capillary_site_reports_its_deposits() {
		let config = OrganConfig::with_grid_side(10);
		let mut rng = SimRng::seed_from_u64(4);
		let mut site = Site::new(GridCoord::new(5, 5), config.substance);
		site.set_vessel(VesselKind::Capillary, config.substance);
		let effects = update(&mut site, &config, &mut rng);
		assert!(!effects.deposits().is_empty());
		assert!(effects
			.deposits()
			.iter()
			.any(|(c, _)| *c == GridCoord::new(5, 5)));
	}

	#[test]
	fn neighbors_and_bounds() {
		let c = GridCoord::new(0, 4);
		let n = c.neighbors();
		assert_eq!(n[0], GridCoord::new(1, 4));
		assert!(n[1].is_out(5));
		assert!(n[2].is_out(5));
		assert!(!n[3].is_out(5));
	}
}
