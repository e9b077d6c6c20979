//! # oos-calendar
//!
//! Calendar arithmetic for the out-of-season analysis axis: the year is
//! stripped from every observation date, leaving a `MM-DD` label that is
//! treated as a position on a circular year.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["valid_date string"] -->|"parse_valid_date()"| B["NaiveDate"]
//!     B -->|"MonthDay::from_date()"| C["MonthDay (MM-DD)"]
//!     C -->|".doy()"| D["leap-year DOY (1..=366)"]
//!     D -->|"circular_distance()"| E["days apart on a 365-day cycle"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use oos_calendar::{MonthDay, circular_distance, parse_valid_date};
//!
//! let date = parse_valid_date("2021-12-28").unwrap();
//! let md = MonthDay::from_date(date);
//! assert_eq!(md.to_string(), "12-28");
//!
//! let jan3: MonthDay = "01-03".parse().unwrap();
//! assert_eq!(circular_distance(md, jan3), 6);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month_day` | `MonthDay` label and leap-year day-of-year tables |
//! | `distance` | Circular distance between labels |
//! | `date` | Parsing of observation date strings |
//! | `error` | Error types |

mod date;
mod distance;
mod error;
mod month_day;

pub use date::parse_valid_date;
pub use distance::{CYCLE_DAYS, circular_distance};
pub use error::CalendarError;
pub use month_day::MonthDay;
