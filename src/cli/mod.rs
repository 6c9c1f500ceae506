pub mod fx;
pub mod indicators;
pub mod oecd;
pub mod stock;
pub mod ui;
