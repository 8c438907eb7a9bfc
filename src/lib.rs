//! Translate KiCad schematics into Falstad circuit simulator text.
//!
//! ```no_run
//! let input = std::fs::read_to_string("amplifier.kicad_sch").unwrap();
//! let netlist = kicad_falstad::convert(&input).unwrap();
//! netlist.write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod coords;
pub mod device;
pub mod error;
pub mod orient;
pub mod record;
pub mod schematic;
mod sexpr;
pub mod translate;
pub mod value;

pub use error::{ParseError, Skip, ValueError};
pub use record::Record;
pub use schematic::{Component, Pin, Point, Schematic, Wire};
pub use translate::{translate, Category, Netlist, CATEGORIES};

/// Parse a `.kicad_sch` document and translate it with the default categories
pub fn convert(input: &str) -> Result<Netlist, ParseError> {
    let schematic: Schematic = input.parse()?;
    Ok(translate(&schematic, CATEGORIES))
}
