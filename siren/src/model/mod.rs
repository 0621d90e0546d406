pub mod demand;
pub mod error;
pub mod feature;
pub mod fieldname;
pub mod lag;
pub mod predict;
pub mod spatial;
pub mod temporal;
pub mod train;
