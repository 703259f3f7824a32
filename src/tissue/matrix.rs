use crate::config::SubstanceLimits;
use crate::site::GridCoord;
use crate::substance::Composition;
use crate::tissue::{TickContext, TissueUnit};

/// Extracellular matrix. Present on every site; it only accumulates what
/// diffuses into it and what liver cells leave behind.
#[derive(Debug, Clone)]
pub struct Matrix {
	site: GridCoord,
	composition: Composition,
}

impl Matrix {
	pub fn new(site: GridCoord, limits: SubstanceLimits) -> Self {
		Matrix {
			site,
			composition: Composition::empty(limits),
		}
	}
}

impl TissueUnit for Matrix {
	fn composition(&self) -> &Composition {
		&self.composition
	}

	fn composition_mut(&mut self) -> &mut Composition {
		&mut self.composition
	}

	fn position(&self) -> GridCoord {
		self.site
	}

	fn update(&mut self, _ctx: &mut TickContext<'_>) {}
}
