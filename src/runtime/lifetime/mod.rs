pub mod shutdown;
pub mod startup;
pub mod sweeper;
