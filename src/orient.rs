//! Orientation resolution for multi-pin devices.
//!
//! Falstad draws transistors, op-amps, potentiometers and switches with a
//! different pin layout than KiCad. The functions here work out which
//! schematic pin lands on which Falstad terminal and add the short leads
//! needed to bridge the two layouts. Everything is computed from copies of
//! the pin locations; the schematic model is never touched.

use crate::coords::{map, GridPoint};
use crate::record::Record;
use crate::schematic::Point;

mod transistor;

pub use transistor::{resolve_transistor, swap_flag, Terminals, TransistorLayout};

/// Distance in millimetres under which two schematic points coincide
pub const TOLERANCE: f64 = 0.01;

/// Lead length added to each op-amp input
pub const OPAMP_LEAD: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn from_degrees(angle: f64) -> Option<Self> {
        match angle {
            a if a == 0.0 => Some(Rotation::R0),
            a if a == 90.0 => Some(Rotation::R90),
            a if a == 180.0 => Some(Rotation::R180),
            a if a == 270.0 => Some(Rotation::R270),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Rotation::R0 | Rotation::R180)
    }
}

/// Diode endpoints in drawing order.
///
/// KiCad diodes rotated to 90° or 270° can report anode and cathode in the
/// opposite vertical order; those are drawn from the cathode end instead.
pub fn diode(angle: f64, anode: Point, cathode: Point) -> Record {
    let flipped = match Rotation::from_degrees(angle) {
        Some(Rotation::R270) => anode.y < cathode.y,
        Some(Rotation::R90) => anode.y > cathode.y,
        _ => false,
    };
    let (anode, cathode) = if flipped {
        (cathode, anode)
    } else {
        (anode, cathode)
    };
    Record::Diode {
        anode: map(anode),
        cathode: map(cathode),
    }
}

/// Op-amp record plus the two input leads, or `None` when the inputs and
/// output are not laid out horizontally.
pub fn op_amp(inverting: Point, non_inverting: Point, output: Point) -> Option<Vec<Record>> {
    let inputs = inverting.midpoint(non_inverting);
    if (inputs.y - output.y).abs() >= TOLERANCE {
        return None;
    }

    let swap = inverting.y >= non_inverting.y;
    let sign = if swap { 1 } else { -1 };
    let inverting = map(inverting);
    let non_inverting = map(non_inverting);

    Some(vec![
        Record::Wire {
            start: inverting,
            end: inverting + (0, -OPAMP_LEAD * sign),
        },
        Record::Wire {
            start: non_inverting,
            end: non_inverting + (0, OPAMP_LEAD * sign),
        },
        Record::OpAmp {
            inputs: map(inputs),
            output: map(output),
            swap,
        },
    ])
}

/// Bend point of a potentiometer drawn from one end.
///
/// The two candidates combine the wiper with the far end on opposite axes.
/// One of them sits on the symbol anchor (the middle of the resistor body);
/// the other is the corner Falstad needs to place the wiper.
pub fn potentiometer_corner(anchor: Point, wiper: Point, far_end: Point) -> Point {
    let along = Point::new(wiper.x, far_end.y);
    let across = Point::new(far_end.x, wiper.y);
    if along.distance(anchor) < TOLERANCE {
        across
    } else {
        along
    }
}

/// SPDT switch anchored at the common pin, throwing toward the middle of
/// the two outer pins.
pub fn spdt_switch(a: Point, common: Point, c: Point) -> Record {
    Record::Switch {
        common: map(common),
        throw: map(a.midpoint(c)),
    }
}

pub(crate) fn lead(start: GridPoint, end: GridPoint) -> Record {
    Record::Wire { start, end }
}
