pub mod check;
pub mod indent;
