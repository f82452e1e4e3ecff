//! Data types shared by the workbook reader, the grid normalizer and the view.

mod cell;
mod workbook;

pub use cell::*;
pub use workbook::*;
