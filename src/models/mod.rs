pub mod color;
pub mod dosage;
pub mod fertilizer;
pub mod history;
pub mod observation;
pub mod recommendation;

pub use color::*;
pub use dosage::*;
pub use fertilizer::*;
pub use history::*;
pub use observation::*;
pub use recommendation::*;
