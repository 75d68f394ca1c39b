pub mod doctor;
pub mod host;
pub mod worker;
