pub mod junit;
pub mod xml;
