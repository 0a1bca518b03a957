pub mod doctor;
pub mod install;
pub mod resolve;
