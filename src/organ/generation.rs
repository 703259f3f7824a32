use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::organ::Organ;
use crate::site::{GridCoord, Occupancy};
use crate::tissue::VesselKind;

/// Whether `coord` lies in the liver lens: the intersection of the discs of
/// radius `n + 1` centred on the corners `(0, n)` and `(n, 0)`.
pub fn is_in_liver(coord: GridCoord, n: usize) -> bool {
	let (x, y, n) = (i64::from(coord.x), i64::from(coord.y), n as i64);
	let r2 = (n + 1) * (n + 1);
	x * x + (y - n) * (y - n) < r2 && (x - n) * (x - n) + y * y < r2
}

impl Organ {
	pub(crate) fn generate(&mut self) {
		self.create_liver();
		self.create_blood_system();
		let census = self.census();
		debug!(
			"generated {0}x{0} organ: {1} liver sites, {2} vessel sites",
			self.grid_side(),
			census.liver,
			census.vessel
		);
	}

	fn create_liver(&mut self) {
		let n = self.grid_side();
		for x in 0..n {
			for y in 0..n {
				let coord = GridCoord::new(x as i32, y as i32);
				if is_in_liver(coord, n) {
					self.set_liver_at(coord);
				}
			}
		}
	}

	/// Columns `[left, right]` covered by the artery, centred on the grid.
	pub fn artery_columns(&self) -> (usize, usize) {
		let n = self.grid_side();
		let width = self.config().artery_width;
		let left = (n / 2).saturating_sub(width / 2);
		let right = (left + width - 1).min(n - 1);
		(left, right)
	}

	fn create_blood_system(&mut self) {
		let n = self.grid_side();
		let (left, right) = self.artery_columns();
		self.generate_artery(left, right);
		debug!("artery spans columns {}..={}", left, right);

		let start = self.config().capillary_start_row;
		let max_per_side = n.saturating_sub(start) / 3;
		let mut starts_left = Vec::new();
		let mut starts_right = Vec::new();

		for y in start..n.saturating_sub(1) {
			if left > 0 {
				let x = left - 1;
				if starts_left.len() <= max_per_side && self.try_seed_capillary(x, y) {
					starts_left.push(GridCoord::new(x as i32, y as i32));
				}
			}
			if right + 1 < n {
				let x = right + 1;
				if starts_right.len() <= max_per_side && self.try_seed_capillary(x, y) {
					starts_right.push(GridCoord::new(x as i32, y as i32));
				}
			}
		}
		debug!(
			"capillary seeds: {} left, {} right",
			starts_left.len(),
			starts_right.len()
		);

		for &seed in starts_right.iter() {
			let length = self.grow_capillary(seed, 1);
			debug!("capillary from {:?} grew {} sites", seed, length);
		}
		for &seed in starts_left.iter() {
			let length = self.grow_capillary(seed, -1);
			debug!("capillary from {:?} grew {} sites", seed, length);
		}
	}

	fn generate_artery(&mut self, left: usize, right: usize) {
		let n = self.grid_side();
		for x in left..=right {
			for y in 0..n {
				self.set_vessel_at(GridCoord::new(x as i32, y as i32), VesselKind::Artery);
			}
		}
	}

	// seeds only if no vessel lies within the minimum spacing above
	fn try_seed_capillary(&mut self, x: usize, y: usize) -> bool {
		let spacing = self.config().capillary_min_spacing;
		let far_enough = (1..spacing)
			.filter_map(|i| y.checked_sub(i))
			.all(|row| !self.sites[[x, row]].has_vessel());
		let p = self.config().capillary_seed_probability;
		if far_enough && self.rng.gen_bool(p) {
			self.set_vessel_at(GridCoord::new(x as i32, y as i32), VesselKind::Capillary);
			true
		} else {
			false
		}
	}

	/// Grows a capillary from `seed` as a random walk biased towards
	/// horizontal direction `dir`. Returns the number of sites it covers.
	fn grow_capillary(&mut self, seed: GridCoord, dir: i32) -> usize {
		let max_length = self.config().capillary_max_length;
		let mut position = seed;
		let mut length = 1;
		for _ in 0..max_length {
			if length >= max_length {
				break;
			}
			if let Some(next) = self.capillary_step(position, dir) {
				position = next;
				self.set_vessel_at(next, VesselKind::Capillary);
				length += 1;
			}
		}
		length
	}

	fn blocks_capillary(&self, coord: GridCoord) -> bool {
		self.site(coord).map_or(true, |s| s.has_vessel())
	}

	// None when the walk stays put
	fn capillary_step(&mut self, position: GridCoord, dir: i32) -> Option<GridCoord> {
		let up = position.offset(0, -1);
		let down = position.offset(0, 1);
		let forward = position.offset(dir, 0);
		if self.blocks_capillary(up) && self.blocks_capillary(down) && self.blocks_capillary(forward) {
			return None;
		}

		let weighted = [forward, forward, forward, forward, up, down];
		let free: Vec<GridCoord> = weighted
			.iter()
			.copied()
			.filter(|&c| !self.blocks_capillary(c))
			.collect();
		let mut next = *free.choose(&mut self.rng)?;

		// keep off the last row unless the walk is boxed in there
		let edge = self.grid_side() as i32 - 1;
		if next.y >= edge {
			let doubles_back =
				self.blocks_capillary(next.offset(0, -2)) && self.blocks_capillary(forward);
			if doubles_back {
				return None;
			}
			let inner: Vec<GridCoord> = free.iter().copied().filter(|c| c.y < edge).collect();
			next = *inner.choose(&mut self.rng)?;
		}

		if next.y >= self.config().capillary_start_row as i32 && next != position {
			Some(next)
		} else {
			None
		}
	}

	/// Number of capillary sites laid down by generation.
	pub fn capillary_count(&self) -> usize {
		self.sites()
			.iter()
			.filter(|s| s.occupancy() == Occupancy::Vessel)
			.filter(|s| s.vessel().map(|v| v.kind()) == Some(VesselKind::Capillary))
			.count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::OrganConfig;

	fn organ(side: usize, seed: u64) -> Organ {
		let mut config = OrganConfig::with_grid_side(side);
		config.seed = seed;
		Organ::new(config).unwrap()
	}

	#[test]
	fn liver_lens_shape() {
		let n = 10;
		assert!(is_in_liver(GridCoord::new(5, 5), n));
		assert!(is_in_liver(GridCoord::new(0, 0), n));
		assert!(is_in_liver(GridCoord::new(9, 9), n));
		assert!(!is_in_liver(GridCoord::new(0, 9), n));
		assert!(!is_in_liver(GridCoord::new(9, 0), n));
		// symmetric about the diagonal
		for x in 0..n as i32 {
			for y in 0..n as i32 {
				assert_eq!(
					is_in_liver(GridCoord::new(x, y), n),
					is_in_liver(GridCoord::new(y, x), n)
				);
			}
		}
	}

	#[test]
	fn artery_band_spans_full_height() {
		let organ = organ(40, 1);
		let (left, right) = organ.artery_columns();
		assert_eq!(right - left + 1, organ.config().artery_width);
		for x in left..=right {
			for y in 0..40 {
				let site = &organ.sites()[[x, y]];
				assert_eq!(site.vessel().map(|v| v.kind()), Some(VesselKind::Artery));
			}
		}
	}

	#[test]
	fn capillaries_stay_below_start_row() {
		let organ = organ(50, 2);
		let start = organ.config().capillary_start_row;
		assert!(organ.capillary_count() > 0);
		for ((_, y), site) in organ.sites().indexed_iter() {
			if site.vessel().map(|v| v.kind()) == Some(VesselKind::Capillary) {
				assert!(y >= start);
				assert!(y < 49);
			}
		}
	}

	#[test]
	fn capillaries_respect_length_limit() {
		let mut config = OrganConfig::with_grid_side(30);
		config.capillary_max_length = 3;
		config.capillary_seed_probability = 1.;
		let organ = Organ::new(config).unwrap();
		let (left, right) = organ.artery_columns();
		// every capillary site in the flanking columns is at least counted
		// here, and each seed adds at most two sites on top of itself
		let capillaries = organ.capillary_count();
		let seed_sites = (0..30)
			.map(|y| {
				organ.sites()[[left - 1, y]].has_vessel() as usize
					+ organ.sites()[[right + 1, y]].has_vessel() as usize
			})
			.sum::<usize>();
		assert!(seed_sites > 0);
		assert!(capillaries <= seed_sites * 3);
	}

	#[test]
	fn generation_is_deterministic_for_a_seed() {
		let a = organ(40, 7);
		let b = organ(40, 7);
		assert_eq!(a.occupancy_map(), b.occupancy_map());
	}

	#[test]
	fn liver_fills_the_lens() {
		let organ = organ(20, 3);
		for ((x, y), site) in organ.sites().indexed_iter() {
			let inside = is_in_liver(GridCoord::new(x as i32, y as i32), 20);
			assert_eq!(site.has_liver(), inside);
		}
	}
}
