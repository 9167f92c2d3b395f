//! Storage operations. Every function takes the connection it runs on; the
//! caller decides where that connection comes from and when it is released.

pub mod attendance;
pub mod employee;
pub mod summary;
