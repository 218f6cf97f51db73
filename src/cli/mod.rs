pub mod doctor;
pub mod infer;
pub mod knowledge;
pub mod rule;
