pub mod gradient;
pub mod map;
pub mod track;
