//! 入出力まわりの共通モジュール

pub mod discovery;
pub mod io;
pub mod output;
