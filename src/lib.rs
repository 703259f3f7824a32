//! Grid model of a liver section: a substance-carrying matrix, healthy and
//! cancerous liver cells, and the arteries and capillaries that feed them.

mod config;
mod error;
mod organ;
mod simulation;
mod site;
mod substance;
pub mod tissue;

#[cfg(feature = "python")]
mod python;

pub use config::{DepositMode, LiverKinetics, OrganConfig, SubstanceLimits};
pub use error::OrganError;
pub use organ::{is_in_liver, Organ, OrganCensus, PhysicalPosition};
pub use simulation::{count_cancer_sites, run_ticks, simulate};
pub use site::{GridCoord, Occupancy, Site};
pub use substance::{Baselines, Composition, SubstanceId};
pub use tissue::{Liver, LiverKind, Matrix, TissueUnit, Vessel, VesselKind};
