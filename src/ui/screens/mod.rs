pub mod calculator;
pub mod history;
pub mod results;

pub use calculator::CalculatorScreen;
pub use history::HistoryScreen;
pub use results::ResultsScreen;
