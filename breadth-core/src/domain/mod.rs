//! Domain types for the breadth dashboard

pub mod breadth;
pub mod table;

pub use breadth::{
    round2, BreadthHistory, BreadthLevel, BreadthOutput, BreadthPoint, BreadthSnapshot,
    HistoryRange, MaWindow, DEFAULT_STRONG_THRESHOLD, DEFAULT_WEAK_THRESHOLD, MA_WINDOWS,
};
pub use table::{PriceRow, PriceTable, TableError};
