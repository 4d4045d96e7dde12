pub mod loader;
/// Grid conversions between coarse source data and the simulation timestep.
pub mod resample;
/// Headerless single-column numeric files.
pub mod values;

pub use loader::{LoadError, RunDataset, hours_axis, load_run};
pub use resample::{ResampleError, interpolate_linear, upsample_nearest};
pub use values::{ValueFileError, read_values};
