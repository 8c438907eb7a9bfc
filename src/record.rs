//! Falstad text records, one per output line.

use std::fmt::Display;

use crate::coords::GridPoint;

/// First line of every document: timestep and display settings
pub const HEADER: &str = "$ 3 0.000005 10.20027730826997 50 5 43 5e-11";

/// Length of the synthetic lead drawn from ground and supply symbols
pub const POWER_LEAD: i64 = 16;

/// A component value in base units, printed in shortest round-trip form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnitude(pub f64);

impl Display for Magnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.0;
        if !value.is_finite() {
            return write!(f, "{value}");
        }
        if value == 0.0 {
            return write!(f, "{}", if value.is_sign_negative() { "-0.0" } else { "0.0" });
        }

        let sci = format!("{:e}", value.abs());
        let Some((mantissa, exponent)) = sci.split_once('e') else {
            return write!(f, "{value}");
        };
        let exponent: i32 = exponent.parse().map_err(|_| std::fmt::Error)?;
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        let sign = if value < 0.0 { "-" } else { "" };

        if !(-4..16).contains(&exponent) {
            let (head, tail) = digits.split_at(1);
            let exp_sign = if exponent < 0 { '-' } else { '+' };
            return if tail.is_empty() {
                write!(f, "{sign}{head}e{exp_sign}{:02}", exponent.abs())
            } else {
                write!(f, "{sign}{head}.{tail}e{exp_sign}{:02}", exponent.abs())
            };
        }

        if exponent < 0 {
            let zeros = "0".repeat((-exponent - 1) as usize);
            return write!(f, "{sign}0.{zeros}{digits}");
        }

        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            let zeros = "0".repeat(int_len - digits.len());
            write!(f, "{sign}{digits}{zeros}.0")
        } else {
            let (int, frac) = digits.split_at(int_len);
            write!(f, "{sign}{int}.{frac}")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Wire {
        start: GridPoint,
        end: GridPoint,
    },
    Resistor {
        start: GridPoint,
        end: GridPoint,
        ohms: f64,
    },
    Capacitor {
        start: GridPoint,
        end: GridPoint,
        farads: f64,
    },
    Inductor {
        start: GridPoint,
        end: GridPoint,
        henries: f64,
    },
    Bjt {
        base: GridPoint,
        junction: GridPoint,
        swap: bool,
        structure: i32,
    },
    Mosfet {
        gate: GridPoint,
        junction: GridPoint,
        code: i32,
    },
    Jfet {
        gate: GridPoint,
        junction: GridPoint,
        code: i32,
    },
    /// Drawn from `anode` to `cathode`
    Diode {
        anode: GridPoint,
        cathode: GridPoint,
    },
    Ground {
        at: GridPoint,
    },
    Supply {
        at: GridPoint,
        volts: f64,
    },
    OpAmp {
        inputs: GridPoint,
        output: GridPoint,
        swap: bool,
    },
    Potentiometer {
        end: GridPoint,
        corner: GridPoint,
        ohms: f64,
        label: String,
    },
    Switch {
        common: GridPoint,
        throw: GridPoint,
    },
}

impl Record {
    pub fn tag(&self) -> &'static str {
        match self {
            Record::Wire { .. } => "w",
            Record::Resistor { .. } => "r",
            Record::Capacitor { .. } => "c",
            Record::Inductor { .. } => "l",
            Record::Bjt { .. } => "t",
            Record::Mosfet { .. } => "f",
            Record::Jfet { .. } => "j",
            Record::Diode { .. } => "d",
            Record::Ground { .. } => "g",
            Record::Supply { .. } => "R",
            Record::OpAmp { .. } => "a",
            Record::Potentiometer { .. } => "174",
            Record::Switch { .. } => "S",
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.tag())?;
        match self {
            Record::Wire { start, end } => write!(f, "{start} {end} 0"),
            Record::Resistor { start, end, ohms } => {
                write!(f, "{start} {end} 0 {}", Magnitude(*ohms))
            }
            Record::Capacitor { start, end, farads } => {
                write!(f, "{start} {end} 0 {} 0 0.001", Magnitude(*farads))
            }
            Record::Inductor {
                start,
                end,
                henries,
            } => write!(f, "{start} {end} 0 {} 0 0", Magnitude(*henries)),
            Record::Bjt {
                base,
                junction,
                swap,
                structure,
            } => write!(
                f,
                "{base} {junction} {} {structure} 0 0 100 default",
                u8::from(*swap)
            ),
            Record::Mosfet {
                gate,
                junction,
                code,
            } => write!(f, "{gate} {junction} {code} 1.5 0.02"),
            Record::Jfet {
                gate,
                junction,
                code,
            } => write!(f, "{gate} {junction} {code} -4 0.00125"),
            Record::Diode { anode, cathode } => write!(f, "{anode} {cathode} 2 default"),
            Record::Ground { at } => write!(f, "{at} {} 0 0", *at + (0, POWER_LEAD)),
            Record::Supply { at, volts } => write!(
                f,
                "{at} {} 0 0 40 {} 0 0 0.5",
                *at + (0, -POWER_LEAD),
                Magnitude(*volts)
            ),
            Record::OpAmp {
                inputs,
                output,
                swap,
            } => write!(
                f,
                "{inputs} {output} {} 12 -12 1000000 0 0 100000",
                10 + u8::from(*swap)
            ),
            Record::Potentiometer {
                end,
                corner,
                ohms,
                label,
            } => write!(f, "{end} {corner} 1 {} 0.5 {label}", Magnitude(*ohms)),
            Record::Switch { common, throw } => write!(f, "{common} {throw} 0 0 false 0 2"),
        }
    }
}
