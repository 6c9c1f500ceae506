pub mod alpha_vantage;
pub mod oecd;
pub mod world_bank;
pub mod yahoo_finance;
