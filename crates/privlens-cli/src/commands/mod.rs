pub mod map;
pub mod reconcile;
pub mod tables_check;
