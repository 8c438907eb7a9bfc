//! Transistor terminal resolution.
//!
//! KiCad transistors spread collector, emitter and base on three leads; the
//! Falstad symbol has the base on one side and collector/emitter on short
//! stubs either side of a junction. Two leads join the KiCad pins to that
//! junction, and the swap bit flips the Falstad symbol when its fixed
//! drawing would otherwise put collector and emitter the wrong way round.
//! MOSFETs and JFETs use the same layout with drain, source and gate.

use super::{lead, Rotation};
use crate::coords::{map, GridPoint};
use crate::device::{Polarity, TransistorKind};
use crate::record::Record;
use crate::schematic::Point;

/// Length of each lead from a KiCad pin to the Falstad junction
pub const LEAD: i64 = 16;

/// Collector, emitter and base locations (drain, source, gate for FETs)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Terminals {
    pub collector: Point,
    pub emitter: Point,
    pub base: Point,
}

impl Terminals {
    /// Point reflection of all three terminals through `anchor`
    pub fn reflect_through(self, anchor: Point) -> Terminals {
        Terminals {
            collector: self.collector.reflect_through(anchor),
            emitter: self.emitter.reflect_through(anchor),
            base: self.base.reflect_through(anchor),
        }
    }

    /// Some vertical KiCad symbols report their pins mirrored relative to
    /// the rotation; those are reflected through the anchor first.
    fn needs_reflection(&self, rotation: Rotation) -> bool {
        match rotation {
            Rotation::R90 => self.collector.x > self.emitter.x,
            Rotation::R270 => self.collector.x < self.emitter.x,
            Rotation::R0 | Rotation::R180 => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransistorLayout {
    /// Terminals after any reflection
    pub terminals: Terminals,
    pub junction: GridPoint,
    /// Collector and emitter leads, in that order
    pub leads: [Record; 2],
    pub swap: bool,
}

/// Whether collector and emitter must be drawn swapped
pub fn swap_flag(polarity: Polarity, rotation: Rotation, terminals: &Terminals) -> bool {
    let Terminals {
        collector: c,
        emitter: e,
        ..
    } = terminals;
    match polarity {
        Polarity::N => match rotation {
            Rotation::R90 => c.x < e.x,
            Rotation::R0 | Rotation::R180 => c.y > e.y,
            Rotation::R270 => false,
        },
        Polarity::P => match rotation {
            Rotation::R270 => c.x > e.x,
            Rotation::R0 => c.y < e.y,
            Rotation::R90 | Rotation::R180 => false,
        },
    }
}

pub fn resolve_transistor(
    terminals: Terminals,
    anchor: Point,
    rotation: Rotation,
    polarity: Polarity,
) -> TransistorLayout {
    let terminals = if terminals.needs_reflection(rotation) {
        terminals.reflect_through(anchor)
    } else {
        terminals
    };
    let Terminals {
        collector: c,
        emitter: e,
        base: b,
    } = terminals;

    let (junction, c_offset) = if rotation.is_horizontal() {
        let side = if c.y > e.y { -1 } else { 1 };
        (map(Point::new(c.x, b.y)), (0, -LEAD * side))
    } else {
        let side = if c.x > e.x { -1 } else { 1 };
        (map(Point::new(b.x, c.y)), (-LEAD * side, 0))
    };
    let e_offset = (-c_offset.0, -c_offset.1);

    TransistorLayout {
        terminals,
        junction,
        leads: [
            lead(map(c), junction + c_offset),
            lead(map(e), junction + e_offset),
        ],
        swap: swap_flag(polarity, rotation, &terminals),
    }
}

impl TransistorLayout {
    pub fn record(&self, kind: TransistorKind) -> Record {
        let base = map(self.terminals.base);
        let junction = self.junction;
        let code = kind.structure() | (i32::from(self.swap) << 3);
        match kind {
            TransistorKind::Bjt(_) => Record::Bjt {
                base,
                junction,
                swap: self.swap,
                structure: kind.structure(),
            },
            TransistorKind::Mosfet(_) => Record::Mosfet {
                gate: base,
                junction,
                code,
            },
            TransistorKind::Jfet(_) => Record::Jfet {
                gate: base,
                junction,
                code,
            },
        }
    }

    /// Leads followed by the device record
    pub fn into_records(self, kind: TransistorKind) -> Vec<Record> {
        let record = self.record(kind);
        let [collector, emitter] = self.leads;
        vec![collector, emitter, record]
    }
}
