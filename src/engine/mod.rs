pub mod calculator;
pub mod lifecycle;
pub mod profiles;
