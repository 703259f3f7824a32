use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use numpy::PyArray2;

use crate::config::{DepositMode, OrganConfig};
use crate::error::OrganError;
use crate::organ::PhysicalPosition;
use crate::simulation::{count_cancer_sites, simulate};
use crate::substance::SubstanceId;
use std::convert::TryFrom;

impl From<OrganError> for PyErr {
    fn from(err: OrganError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Organ parameters exposed to Python. Everything not listed keeps the
/// defaults scaled to `grid_side`.
#[pyclass]
#[derive(Clone)]
pub struct OrganModel {
    config: OrganConfig,
    #[pyo3(get, set)]
    displayed_substance: u8,
}

#[pymethods]
impl OrganModel {
    #[new]
    fn new(grid_side: usize, seed: u64) -> Self {
        let mut config = OrganConfig::with_grid_side(grid_side);
        config.seed = seed;
        OrganModel {
            config,
            displayed_substance: SubstanceId::Fuel as u8,
        }
    }

    fn set_diffusion(&mut self, constant: f64, radius: usize) {
        self.config.diffusion_constant = constant;
        self.config.diffusion_radius = radius;
    }

    fn set_base_levels(&mut self, fuel: f64, inhibitor: f64) {
        self.config.base_fuel = fuel;
        self.config.base_inhibitor = inhibitor;
    }

    fn set_immediate_deposits(&mut self, immediate: bool) {
        self.config.deposit_mode = if immediate {
            DepositMode::Immediate
        } else {
            DepositMode::Staged
        };
    }
}

/// Runs an organ for up to `ticks` steps with a tumor planted at
/// `(cancer_x, cancer_y)` in physical units. Returns the concentration map of
/// the displayed substance and the occupancy map.
#[pyfunction]
fn run(
    py: Python,
    model: OrganModel,
    ticks: u64,
    cancer_x: f64,
    cancer_y: f64,
    target_cancer_sites: usize,
) -> PyResult<(&PyArray2<f64>, &PyArray2<i32>)> {
    let displayed = SubstanceId::try_from(model.displayed_substance)?;
    let position = PhysicalPosition::new(cancer_x, cancer_y);
    let mut organ = simulate(model.config, Some(position), target_cancer_sites, ticks)?;
    organ.set_displayed_substance(displayed);
    log::info!("python run ended with {} cancer sites", count_cancer_sites(&organ));

    let concentration = organ.concentration_map();
    let occupancy = organ.occupancy_map().mapv(|o| o as i32);
    Ok((
        numpy::PyArray::from_array(py, &concentration),
        numpy::PyArray::from_array(py, &occupancy),
    ))
}

#[pymodule]
fn organ_model(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<OrganModel>()?;
    m.add_function(wrap_pyfunction!(run, m)?)?;
    Ok(())
}
