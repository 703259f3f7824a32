use std::env;
use std::time::Instant;

use log::info;

use organ_model::{count_cancer_sites, Organ, OrganConfig, OrganError, PhysicalPosition};

fn arg<T: std::str::FromStr>(args: &[String], i: usize, default: T) -> T {
	args.get(i).and_then(|a| a.parse().ok()).unwrap_or(default)
}

fn main() -> Result<(), OrganError> {
	env_logger::init();
	let args: Vec<String> = env::args().collect();
	let grid_side = arg(&args, 1, 100usize);
	let ticks = arg(&args, 2, 1000u64);
	let seed = arg(&args, 3, 0u64);

	let mut config = OrganConfig::with_grid_side(grid_side);
	config.seed = seed;
	let center = config.organ_size / 2.;

	let start = Instant::now();
	let mut organ = Organ::new(config)?;
	info!("generate: {} ms", start.elapsed().as_millis());
	organ.place_cancer_at(PhysicalPosition::new(center, center));

	for tick in 0..ticks {
		let start = Instant::now();
		organ.step();
		if tick % 100 == 0 {
			info!(
				"tick {}: {} ms, {} cancer sites",
				tick,
				start.elapsed().as_millis(),
				count_cancer_sites(&organ)
			);
		}
	}

	let census = organ.census();
	println!(
		"after {} ticks: {} matrix, {} liver, {} cancer, {} vessel",
		organ.ticks(),
		census.matrix_only,
		census.liver,
		census.cancer,
		census.vessel
	);
	Ok(())
}
