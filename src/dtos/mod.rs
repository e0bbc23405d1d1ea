pub mod authdtos;
pub mod propertydtos;
pub mod uploaddtos;
