pub mod gauge;
pub mod input;

pub use gauge::{lcc_gauge, nutrient_gauge, Nutrient};
pub use input::{InputWidget, SelectWidget};
