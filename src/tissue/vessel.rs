use crate::config::SubstanceLimits;
use crate::site::GridCoord;
use crate::substance::Composition;
use crate::tissue::{TickContext, TissueUnit};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VesselKind {
	/// Static high-source band, does not diffuse.
	Artery,
	/// Spreads the injected substance over a square neighbourhood.
	Capillary,
}

/// Fraction of a source reaching a site `distance` grid units away after
/// `dt` seconds, from the closed-form solution of the heat equation.
pub fn attenuation(distance: f64, diffusion_constant: f64, dt: f64) -> f64 {
	0.5 * (1. - libm::erf(distance / (4. * diffusion_constant * dt).sqrt()))
}

#[derive(Debug, Clone)]
pub struct Vessel {
	site: GridCoord,
	kind: VesselKind,
	composition: Composition,
}

impl Vessel {
	pub fn new(site: GridCoord, kind: VesselKind, limits: SubstanceLimits) -> Self {
		Vessel {
			site,
			kind,
			composition: Composition::empty(limits),
		}
	}

	pub fn kind(&self) -> VesselKind {
		self.kind
	}
}

impl TissueUnit for Vessel {
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
		let source = ctx.source_composition();
		self.composition = source;
		if self.kind != VesselKind::Capillary {
			return;
		}

		let r = ctx.config.diffusion_radius as i32;
		for i in -r..=r {
			for j in -r..=r {
				let target = self.site.offset(i, j);
				if ctx.is_out(target) {
					continue;
				}
				let distance = f64::from(i * i + j * j).sqrt();
				let diffused = source * attenuation(distance, ctx.config.diffusion_constant, ctx.dt);
				if !diffused.is_null() {
					ctx.effects.absorb_at(target, diffused);
				}
			}
		}
	}
}
