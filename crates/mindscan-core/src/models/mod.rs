pub mod answer;
pub mod assessment;
pub mod result;
