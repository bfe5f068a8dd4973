pub mod fifo;
pub mod logging;
