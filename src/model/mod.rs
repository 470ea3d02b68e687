pub mod returns;
pub mod storage_center;
