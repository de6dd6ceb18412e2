pub mod bus;
pub mod event;
pub mod sink;
