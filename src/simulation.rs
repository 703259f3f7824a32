use std::time::Instant;

use log::{debug, info, warn};

use crate::config::OrganConfig;
use crate::error::OrganError;
use crate::organ::{Organ, PhysicalPosition};

/// Number of sites currently holding a tumor cell, vessels included.
pub fn count_cancer_sites(organ: &Organ) -> usize {
	organ.sites().iter().filter(|s| s.has_cancer()).count()
}

/// Advances `organ` by `ticks` fixed steps, logging how long the sweep took.
pub fn run_ticks(organ: &mut Organ, ticks: u64) {
	let start = Instant::now();
	for _ in 0..ticks {
		organ.step();
	}
	debug!(
		"{} ticks in {} ms ({} total)",
		ticks,
		start.elapsed().as_millis(),
		organ.ticks()
	);
}

/// Generates an organ, optionally plants a tumor and runs it until at least
/// `target_cancer_sites` sites are cancerous or `max_ticks` have passed.
pub fn simulate(
	config: OrganConfig,
	cancer_at: Option<PhysicalPosition>,
	target_cancer_sites: usize,
	max_ticks: u64,
) -> Result<Organ, OrganError> {
	info!("Initializing organ..");
	let start = Instant::now();
	let mut organ = Organ::new(config)?;
	info!(
		"organ of side {} ready in {} ms",
		organ.grid_side(),
		start.elapsed().as_millis()
	);

	if let Some(pos) = cancer_at {
		organ.place_cancer_at(pos);
		info!("tumor planted at {:?}", organ.to_grid_coord(pos));
	}

	let report_every = (max_ticks / 10).max(1);
	loop {
		let cancer = count_cancer_sites(&organ);
		if cancer >= target_cancer_sites {
			info!("reached {} cancer sites after {} ticks", cancer, organ.ticks());
			break;
		}
		if organ.ticks() >= max_ticks {
			warn!(
				"stopped at tick limit {} with {} of {} cancer sites",
				max_ticks, cancer, target_cancer_sites
			);
			break;
		}
		if organ.ticks() % report_every == 0 {
			info!("tick {}: {} cancer sites", organ.ticks(), cancer);
		}
		organ.step();
	}
	Ok(organ)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tissue::VesselKind;

	// centre of the first capillary site, where the fuel supply is richest
	fn capillary_position(config: &OrganConfig) -> PhysicalPosition {
		let organ = Organ::new(config.clone()).unwrap();
		let site = organ
			.sites()
			.iter()
			.find(|s| s.vessel().map(|v| v.kind()) == Some(VesselKind::Capillary))
			.expect("generated organ has capillaries");
		let cell = config.cell_size();
		let coord = site.coord();
		PhysicalPosition::new((coord.x as f64 + 0.5) * cell, (coord.y as f64 + 0.5) * cell)
	}

	#[test]
	fn simulate_tumor() {
		let mut config = OrganConfig::with_grid_side(30);
		config.capillary_seed_probability = 1.;
		let position = capillary_position(&config);
		let min_cell_number = 3;
		let organ = simulate(config, Some(position), min_cell_number, 20_000).unwrap();
		assert!(count_cancer_sites(&organ) >= min_cell_number, "Not enough cancer sites at end of simulation.");
	}

	#[test]
	fn tick_limit_stops_the_run() {
		let config = OrganConfig::with_grid_side(10);
		let organ = simulate(config, None, 1, 5).unwrap();
		assert_eq!(organ.ticks(), 5);
		assert_eq!(count_cancer_sites(&organ), 0);
	}

	#[test]
	fn run_ticks_counts_steps() {
		let mut organ = Organ::new(OrganConfig::with_grid_side(10)).unwrap();
		run_ticks(&mut organ, 3);
		assert_eq!(organ.ticks(), 3);
	}
}
