//! Walks the schematic category by category and collects Falstad records.

use std::io::{self, Write};

use log::{debug, info, warn};

use crate::coords::map;
use crate::device::DeviceKind;
use crate::error::Skip;
use crate::orient::{self, Rotation, Terminals};
use crate::record::{Record, HEADER};
use crate::schematic::{Component, Point, Schematic};
use crate::value::parse_value;

/// Turns one component into its records, or explains why it was left out
pub type Handler = fn(&Component) -> Result<Vec<Record>, Skip>;

/// Components whose reference starts with `prefix` go through `handler`
#[derive(Clone, Copy)]
pub struct Category {
    pub prefix: &'static str,
    pub handler: Handler,
}

/// Supported categories, in output order
pub const CATEGORIES: &[Category] = &[
    Category {
        prefix: "R",
        handler: resistor,
    },
    Category {
        prefix: "C",
        handler: capacitor,
    },
    Category {
        prefix: "L",
        handler: inductor,
    },
    Category {
        prefix: "Q",
        handler: transistor,
    },
    Category {
        prefix: "D",
        handler: diode,
    },
    Category {
        prefix: "#PWR",
        handler: power,
    },
    Category {
        prefix: "U",
        handler: op_amp,
    },
    Category {
        prefix: "SW",
        handler: switch,
    },
];

/// Translation result: records in output order and the components left out
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Netlist {
    pub records: Vec<Record>,
    pub skipped: Vec<Skip>,
}

impl Netlist {
    /// Header line followed by one line per record
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{HEADER}")?;
        for record in &self.records {
            writeln!(out, "{record}")?;
        }
        Ok(())
    }
}

/// Wires first, in file order, then components grouped by `categories`
pub fn translate(schematic: &Schematic, categories: &[Category]) -> Netlist {
    let mut netlist = Netlist::default();

    netlist
        .records
        .extend(schematic.wires.iter().map(|wire| Record::Wire {
            start: map(wire.start),
            end: map(wire.end),
        }));

    for category in categories {
        for comp in schematic.components_with_prefix(category.prefix) {
            debug!("{}: {} ({})", category.prefix, comp.reference, comp.lib_id);
            match (category.handler)(comp) {
                Ok(records) => netlist.records.extend(records),
                Err(skip) => {
                    warn!("{skip}");
                    netlist.skipped.push(skip);
                }
            }
        }
    }

    info!(
        "Translated {} wires into {} records, skipped {} components",
        schematic.wires.len(),
        netlist.records.len(),
        netlist.skipped.len()
    );
    netlist
}

fn value(comp: &Component, text: &str) -> Result<f64, Skip> {
    parse_value(text).map_err(|source| Skip::Value {
        reference: comp.reference.clone(),
        source,
    })
}

fn pin(comp: &Component, name: &str) -> Result<Point, Skip> {
    comp.pin(name)
        .map(|pin| pin.location)
        .ok_or_else(|| Skip::MissingPin {
            reference: comp.reference.clone(),
            pin: name.to_owned(),
        })
}

fn pin_number(comp: &Component, number: &str) -> Result<Point, Skip> {
    comp.pin_by_number(number)
        .map(|pin| pin.location)
        .ok_or_else(|| Skip::MissingPin {
            reference: comp.reference.clone(),
            pin: number.to_owned(),
        })
}

fn two_pins(comp: &Component) -> Result<(Point, Point), Skip> {
    match &comp.pins[..] {
        [a, b] => Ok((a.location, b.location)),
        pins => Err(Skip::PinCount {
            reference: comp.reference.clone(),
            expected: 2,
            found: pins.len(),
        }),
    }
}

fn unsupported(comp: &Component) -> Skip {
    Skip::UnsupportedDevice {
        reference: comp.reference.clone(),
        lib_id: comp.lib_id.clone(),
    }
}

fn resistor(comp: &Component) -> Result<Vec<Record>, Skip> {
    if comp.kind == DeviceKind::Potentiometer {
        return potentiometer(comp);
    }
    let (start, end) = two_pins(comp)?;
    Ok(vec![Record::Resistor {
        start: map(start),
        end: map(end),
        ohms: value(comp, &comp.value)?,
    }])
}

fn potentiometer(comp: &Component) -> Result<Vec<Record>, Skip> {
    let end = pin_number(comp, "1")?;
    let wiper = pin_number(comp, "2")?;
    let far_end = pin_number(comp, "3")?;
    let corner = orient::potentiometer_corner(comp.position, wiper, far_end);
    Ok(vec![Record::Potentiometer {
        end: map(end),
        corner: map(corner),
        ohms: value(comp, &comp.value)?,
        label: comp.reference.clone(),
    }])
}

fn capacitor(comp: &Component) -> Result<Vec<Record>, Skip> {
    let (start, end) = two_pins(comp)?;
    Ok(vec![Record::Capacitor {
        start: map(start),
        end: map(end),
        farads: value(comp, &comp.value)?,
    }])
}

fn inductor(comp: &Component) -> Result<Vec<Record>, Skip> {
    let (start, end) = two_pins(comp)?;
    Ok(vec![Record::Inductor {
        start: map(start),
        end: map(end),
        henries: value(comp, &comp.value)?,
    }])
}

fn transistor(comp: &Component) -> Result<Vec<Record>, Skip> {
    let DeviceKind::Transistor(kind) = comp.kind else {
        return Err(Skip::UnknownTransistor {
            reference: comp.reference.clone(),
            lib_id: comp.lib_id.clone(),
        });
    };
    let rotation = Rotation::from_degrees(comp.angle).ok_or_else(|| Skip::InvalidOrientation {
        reference: comp.reference.clone(),
        angle: comp.angle,
    })?;
    let [collector, emitter, base] = kind.terminal_names();
    let terminals = Terminals {
        collector: pin(comp, collector)?,
        emitter: pin(comp, emitter)?,
        base: pin(comp, base)?,
    };
    let layout = orient::resolve_transistor(terminals, comp.position, rotation, kind.polarity());
    Ok(layout.into_records(kind))
}

fn diode(comp: &Component) -> Result<Vec<Record>, Skip> {
    let anode = pin(comp, "A")?;
    let cathode = pin(comp, "K")?;
    Ok(vec![orient::diode(comp.angle, anode, cathode)])
}

fn power(comp: &Component) -> Result<Vec<Record>, Skip> {
    let at = map(comp.position);
    match comp.kind {
        DeviceKind::Ground => Ok(vec![Record::Ground { at }]),
        DeviceKind::Supply => {
            // Strip the unit, e.g. `+5V`
            let mut volts = comp.value.chars();
            volts.next_back();
            Ok(vec![Record::Supply {
                at,
                volts: value(comp, volts.as_str())?,
            }])
        }
        _ => Err(unsupported(comp)),
    }
}

fn op_amp(comp: &Component) -> Result<Vec<Record>, Skip> {
    if comp.kind != DeviceKind::OpAmp {
        return Err(unsupported(comp));
    }
    for pin in &comp.pins {
        if !matches!(pin.name.as_str(), "-" | "+" | "~") {
            warn!("Unknown opamp pin {} on {}", pin.name, comp.reference);
        }
    }
    let inverting = pin(comp, "-")?;
    let non_inverting = pin(comp, "+")?;
    let output = pin(comp, "~")?;
    orient::op_amp(inverting, non_inverting, output).ok_or_else(|| Skip::VerticalOpAmp {
        reference: comp.reference.clone(),
    })
}

fn switch(comp: &Component) -> Result<Vec<Record>, Skip> {
    if comp.kind != DeviceKind::SpdtSwitch {
        return Err(unsupported(comp));
    }
    let a = pin(comp, "A")?;
    let common = pin(comp, "B")?;
    let c = pin(comp, "C")?;
    Ok(vec![orient::spdt_switch(a, common, c)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use crate::schematic::{Pin, Wire};

    fn component(reference: &str, lib_id: &str, value: &str, pins: &[(&str, f64, f64)]) -> Component {
        Component {
            reference: reference.to_owned(),
            lib_id: lib_id.to_owned(),
            value: value.to_owned(),
            angle: 0.0,
            position: Point::default(),
            pins: pins
                .iter()
                .enumerate()
                .map(|(i, (name, x, y))| Pin {
                    name: (*name).to_owned(),
                    number: (i + 1).to_string(),
                    location: Point::new(*x, *y),
                })
                .collect(),
            kind: DeviceKind::classify(lib_id, value),
        }
    }

    fn lines(netlist: &Netlist) -> Vec<String> {
        netlist.records.iter().map(|r| r.to_string()).collect()
    }

    fn npn(reference: &str) -> Component {
        component(
            reference,
            "Device:Q_NPN_BCE",
            "Q_NPN_BCE",
            &[("B", -5.08, 0.0), ("C", 2.54, -5.08), ("E", 2.54, 5.08)],
        )
    }

    #[test]
    fn resistor_end_to_end() {
        let sch = Schematic {
            wires: vec![],
            components: vec![component(
                "R1",
                "Device:R",
                "4.7k",
                &[("~", 0.0, 0.0), ("~", 0.0, 2.54)],
            )],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(lines(&netlist), vec!["r 0 0 0 16 0 4700.0"]);

        let mut out = Vec::new();
        netlist.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{HEADER}\nr 0 0 0 16 0 4700.0\n")
        );
    }

    #[test]
    fn npn_with_collector_on_top() {
        let sch = Schematic {
            wires: vec![],
            components: vec![npn("Q1")],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(
            lines(&netlist),
            vec![
                "w 16 -32 16 -16 0",
                "w 16 32 16 16 0",
                "t -32 0 16 0 0 1 0 0 100 default",
            ]
        );
    }

    #[test]
    fn unknown_transistor_is_skipped() {
        let mut unknown = npn("Q2");
        unknown.lib_id = "Transistor_BJT:BC547".to_owned();
        unknown.kind = DeviceKind::classify(&unknown.lib_id, &unknown.value);
        let sch = Schematic {
            wires: vec![],
            components: vec![npn("Q1"), unknown],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(netlist.records.len(), 3);
        assert_eq!(
            netlist.skipped,
            vec![Skip::UnknownTransistor {
                reference: "Q2".to_owned(),
                lib_id: "Transistor_BJT:BC547".to_owned(),
            }]
        );
    }

    #[test]
    fn invalid_rotation_is_skipped() {
        let mut q = npn("Q1");
        q.angle = 45.0;
        let sch = Schematic {
            wires: vec![],
            components: vec![q],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert!(netlist.records.is_empty());
        assert_eq!(netlist.skipped[0].reference(), "Q1");
        assert!(matches!(
            netlist.skipped[0],
            Skip::InvalidOrientation { angle, .. } if angle == 45.0
        ));
    }

    #[test]
    fn wires_come_before_components_in_category_order() {
        let sch = Schematic {
            wires: vec![Wire {
                start: Point::new(0.0, 0.0),
                end: Point::new(2.54, 0.0),
            }],
            components: vec![
                component("C1", "Device:C", "100n", &[("~", 0.0, 0.0), ("~", 0.0, 2.54)]),
                component("L1", "Device:L", "10mH", &[("1", 0.0, 0.0), ("2", 2.54, 0.0)]),
                component("R1", "Device:R", "1k", &[("~", 0.0, 0.0), ("~", 2.54, 0.0)]),
            ],
        };
        assert_eq!(
            lines(&translate(&sch, CATEGORIES)),
            vec![
                "w 0 0 16 0 0",
                "r 0 0 16 0 0 1000.0",
                "c 0 0 0 16 0 1e-07 0 0.001",
                "l 0 0 16 0 0 0.01 0 0",
            ]
        );

        let reordered = [CATEGORIES[2], CATEGORIES[0]];
        assert_eq!(
            lines(&translate(&sch, &reordered)),
            vec!["w 0 0 16 0 0", "l 0 0 16 0 0 0.01 0 0", "r 0 0 16 0 0 1000.0"]
        );
    }

    #[test]
    fn power_symbols() {
        let mut gnd = component("#PWR01", "power:GND", "GND", &[("GND", 0.0, 0.0)]);
        gnd.position = Point::new(2.54, 2.54);
        let mut vcc = component("#PWR02", "power:+5V", "+5V", &[("+5V", 0.0, 0.0)]);
        vcc.position = Point::new(2.54, 0.0);
        let mut bad = component("#PWR03", "power:VCC", "VCC", &[("VCC", 0.0, 0.0)]);
        bad.position = Point::new(5.08, 0.0);
        let sch = Schematic {
            wires: vec![],
            components: vec![gnd, vcc, bad],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(
            lines(&netlist),
            vec!["g 16 16 16 32 0 0", "R 16 0 16 -16 0 0 40 5.0 0 0 0.5"]
        );
        assert_eq!(
            netlist.skipped,
            vec![Skip::Value {
                reference: "#PWR03".to_owned(),
                source: ValueError::InvalidMantissa("VC".to_owned()),
            }]
        );
    }

    #[test]
    fn op_amp_pins_are_required() {
        let full = component(
            "U1",
            "Amplifier_Operational:TL072",
            "TL072",
            &[("-", 0.0, -2.54), ("+", 0.0, 2.54), ("~", 15.24, 0.0), ("V+", 5.0, -5.0)],
        );
        let partial = component(
            "U2",
            "Amplifier_Operational:TL072",
            "TL072",
            &[("V+", 0.0, -2.54), ("V-", 0.0, 2.54)],
        );
        let logic = component("U3", "74xx:74HC00", "74HC00", &[]);
        let sch = Schematic {
            wires: vec![],
            components: vec![full, partial, logic],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(netlist.records.len(), 3);
        assert_eq!(
            netlist
                .skipped
                .iter()
                .map(Skip::reference)
                .collect::<Vec<_>>(),
            vec!["U2", "U3"]
        );
        assert!(matches!(netlist.skipped[0], Skip::MissingPin { ref pin, .. } if pin == "-"));
    }

    #[test]
    fn potentiometer_and_switch() {
        let mut pot = component(
            "RV1",
            "Device:R_Potentiometer",
            "10k",
            &[("1", 0.0, -3.81), ("2", 2.54, 0.0), ("3", 0.0, 3.81)],
        );
        pot.position = Point::new(0.0, 0.0);
        let sw = component(
            "SW1",
            "Switch:SW_SPDT",
            "SW_SPDT",
            &[("A", 5.08, -2.54), ("B", 0.0, 0.0), ("C", 5.08, 2.54)],
        );
        let sch = Schematic {
            wires: vec![],
            components: vec![sw, pot],
        };
        assert_eq!(
            lines(&translate(&sch, CATEGORIES)),
            vec![
                "174 0 -24 16 24 1 10000.0 0.5 RV1",
                "S 0 0 32 0 0 0 false 0 2",
            ]
        );
    }

    #[test]
    fn out_of_range_value_is_skipped() {
        let sch = Schematic {
            wires: vec![],
            components: vec![component(
                "R1",
                "Device:R",
                "1.79769e308",
                &[("~", 0.0, 0.0), ("~", 0.0, 2.54)],
            )],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert!(netlist.records.is_empty());
        assert_eq!(
            netlist.skipped,
            vec![Skip::Value {
                reference: "R1".to_owned(),
                source: ValueError::NonFinite("1.79769e308".to_owned()),
            }]
        );
    }

    #[test]
    fn two_terminal_parts_need_two_pins() {
        let good = component("C1", "Device:C", "100n", &[("~", 0.0, 0.0), ("~", 0.0, 2.54)]);
        let polarized = component(
            "C2",
            "Device:C_Polarized_3",
            "10u",
            &[("+", 0.0, 0.0), ("-", 0.0, 2.54), ("NC", 2.54, 0.0)],
        );
        let lonely = component("L1", "Device:L", "10mH", &[("1", 0.0, 0.0)]);
        let sch = Schematic {
            wires: vec![],
            components: vec![good, polarized, lonely],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(lines(&netlist), vec!["c 0 0 0 16 0 1e-07 0 0.001"]);
        assert_eq!(
            netlist.skipped,
            vec![
                Skip::PinCount {
                    reference: "C2".to_owned(),
                    expected: 2,
                    found: 3,
                },
                Skip::PinCount {
                    reference: "L1".to_owned(),
                    expected: 2,
                    found: 1,
                },
            ]
        );
    }

    #[test]
    fn only_spdt_switches_are_drawn() {
        let spdt = component(
            "SW1",
            "Switch:SW_SPDT",
            "SW_SPDT",
            &[("A", 5.08, -2.54), ("B", 0.0, 0.0), ("C", 5.08, 2.54)],
        );
        let push = component("SW2", "Switch:SW_Push", "SW_Push", &[("1", 0.0, 0.0), ("2", 5.08, 0.0)]);
        let sch = Schematic {
            wires: vec![],
            components: vec![spdt, push],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(lines(&netlist), vec!["S 0 0 32 0 0 0 false 0 2"]);
        assert_eq!(
            netlist.skipped,
            vec![Skip::UnsupportedDevice {
                reference: "SW2".to_owned(),
                lib_id: "Switch:SW_Push".to_owned(),
            }]
        );
    }

    #[test]
    fn vertical_op_amp_is_skipped() {
        let upright = component(
            "U1",
            "Amplifier_Operational:TL072",
            "TL072",
            &[("-", -2.54, 0.0), ("+", 2.54, 0.0), ("~", 0.0, -7.62)],
        );
        let sch = Schematic {
            wires: vec![],
            components: vec![upright],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert!(netlist.records.is_empty());
        assert_eq!(
            netlist.skipped,
            vec![Skip::VerticalOpAmp {
                reference: "U1".to_owned(),
            }]
        );
    }

    #[test]
    fn diode_needs_anode_and_cathode() {
        let good = component("D1", "Device:D", "1N4148", &[("K", 0.0, 0.0), ("A", 5.08, 0.0)]);
        let no_cathode = component("D2", "Device:D", "1N4148", &[("A", 0.0, 0.0), ("2", 5.08, 0.0)]);
        let no_anode = component("D3", "Device:D", "1N4148", &[("K", 0.0, 0.0)]);
        let sch = Schematic {
            wires: vec![],
            components: vec![good, no_cathode, no_anode],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(lines(&netlist), vec!["d 32 0 0 0 2 default"]);
        assert_eq!(
            netlist.skipped,
            vec![
                Skip::MissingPin {
                    reference: "D2".to_owned(),
                    pin: "K".to_owned(),
                },
                Skip::MissingPin {
                    reference: "D3".to_owned(),
                    pin: "A".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn jfet_end_to_end() {
        let j = component(
            "Q1",
            "Device:Q_NJFET_DSG",
            "Q_NJFET_DSG",
            &[("G", -5.08, 0.0), ("D", 2.54, -5.08), ("S", 2.54, 5.08)],
        );
        let sch = Schematic {
            wires: vec![],
            components: vec![j],
        };
        let netlist = translate(&sch, CATEGORIES);
        assert_eq!(
            lines(&netlist),
            vec![
                "w 16 -32 16 -16 0",
                "w 16 32 16 16 0",
                "j -32 0 16 0 32 -4 0.00125",
            ]
        );
        assert!(netlist.skipped.is_empty());
    }

    #[test]
    fn mosfet_packs_swap_into_code() {
        let m = component(
            "Q1",
            "Device:Q_PMOS_GSD",
            "Q_PMOS_GSD",
            &[("G", -5.08, 0.0), ("S", 2.54, 5.08), ("D", 2.54, -5.08)],
        );
        let sch = Schematic {
            wires: vec![],
            components: vec![m],
        };
        let out = lines(&translate(&sch, CATEGORIES));
        assert_eq!(out[2], "f -32 0 16 0 41 1.5 0.02");
    }
}
