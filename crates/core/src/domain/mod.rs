pub mod crop;
pub mod fertilizer;
pub mod soil;

pub use crop::CropProfile;
pub use fertilizer::{FertilizerProduct, NpkTriple};
pub use soil::SoilProfile;
