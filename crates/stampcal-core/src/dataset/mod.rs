pub mod config;
mod assembler;
mod params;
mod sample;
mod types;

pub use assembler::{n_body_catalog, random_pixel_locations, select_active_sources, DatasetAssembler};
pub use params::{colors, init_source, perturb_params, SourceParams};
pub use sample::{
    n_body_star, sample_ce, sample_galaxy_catalog, sample_galaxy_fluxes, sample_star_catalog,
    three_body_catalog,
};
pub use types::{ArgsBuilder, Dataset, SceneCompositor};
