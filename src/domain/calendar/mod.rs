//! Calendar grid builder

pub mod grid;

pub use grid::{
    build_month, days_in_month, month_label, reservation_for_day, CalendarCell, MonthGrid,
    GRID_CELLS, MONTH_NAMES,
};
