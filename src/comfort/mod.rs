pub mod classify;
pub mod model;
pub mod normal;

pub use classify::{
    ComfortError, classify, in_band, occupied_in_band, occupied_percent, percent_of_time,
};
pub use model::{AdaptiveComfortModel, BandKind, ComfortBand, clamp_bound};
