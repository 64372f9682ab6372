pub mod check;
pub mod crop;
pub mod frames;
