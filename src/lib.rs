pub mod error;
pub mod io;
pub mod logging;
pub mod model;

pub use error::{Error, Result};
pub use model::histogram::{AgeHistogram, OutOfRange, Proportion};
pub use model::mortality::{MortalityEstimate, MortalityInputs};
