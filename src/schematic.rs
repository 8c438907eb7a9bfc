//! Read-only schematic model, built from a KiCad `.kicad_sch` file.
//!
//! Coordinates stay in schematic space (millimetres, y pointing down).

use std::collections::HashMap;
use std::str::FromStr;

use crate::device::DeviceKind;
use crate::error::ParseError;
use crate::sexpr::SExpr;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Point reflection through `anchor`
    pub fn reflect_through(self, anchor: Point) -> Point {
        Point::new(2.0 * anchor.x - self.x, 2.0 * anchor.y - self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub name: String,
    pub number: String,
    pub location: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wire {
    pub start: Point,
    pub end: Point,
}

/// A placed symbol instance
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub reference: String,
    pub lib_id: String,
    pub value: String,
    /// Rotation in degrees, counter-clockwise on screen
    pub angle: f64,
    pub position: Point,
    pub pins: Vec<Pin>,
    pub kind: DeviceKind,
}

impl Component {
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.name == name)
    }

    pub fn pin_by_number(&self, number: &str) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.number == number)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schematic {
    pub wires: Vec<Wire>,
    pub components: Vec<Component>,
}

impl Schematic {
    /// Components whose reference designator starts with `prefix`, in file order
    pub fn components_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Component> + 'a {
        self.components
            .iter()
            .filter(move |comp| comp.reference.starts_with(prefix))
    }
}

impl FromStr for Schematic {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let root = SExpr::try_from(input)?;
        Schematic::try_from(&root)
    }
}

impl<'a> TryFrom<&SExpr<'a>> for Schematic {
    type Error = ParseError;

    fn try_from(root: &SExpr<'a>) -> Result<Self, Self::Error> {
        if root.label() != Some("kicad_sch") {
            return Err(ParseError::MissingChild("kicad_sch".to_owned()));
        }
        let library: HashMap<&str, &SExpr> = match root.child("lib_symbols") {
            Ok(lib_symbols) => lib_symbols
                .children("symbol")
                .filter_map(|symbol| Some((symbol.strings().next()?, symbol)))
                .collect(),
            Err(_) => HashMap::new(),
        };

        let wires = root
            .children("wire")
            .map(wire)
            .collect::<Result<_, _>>()?;

        let components = root
            .children("symbol")
            .map(|symbol| component(symbol, &library))
            .collect::<Result<_, _>>()?;

        Ok(Schematic { wires, components })
    }
}

fn point(xy: &SExpr) -> Result<Point, ParseError> {
    match xy.numbers()?[..] {
        [x, y, ..] => Ok(Point::new(x, y)),
        _ => Err(ParseError::MissingValue()),
    }
}

fn wire(wire: &SExpr) -> Result<Wire, ParseError> {
    let mut xy = wire.child("pts")?.children("xy");
    let start = point(xy.next().ok_or(ParseError::MissingChild("xy".to_owned()))?)?;
    let end = point(xy.next().ok_or(ParseError::MissingChild("xy".to_owned()))?)?;
    Ok(Wire { start, end })
}

fn property<'a>(symbol: &SExpr<'a>, name: &str) -> Result<&'a str, ParseError> {
    symbol
        .children("property")
        .find_map(|prop| {
            let mut strings = prop.strings();
            (strings.next() == Some(name)).then(|| strings.next()).flatten()
        })
        .ok_or_else(|| ParseError::MissingChild(format!("property {name}")))
}

fn component(symbol: &SExpr, library: &HashMap<&str, &SExpr>) -> Result<Component, ParseError> {
    let lib_id = symbol.value("lib_id")?;
    let lib_name = symbol.value("lib_name").unwrap_or(lib_id);
    let lib_symbol = library
        .get(lib_name)
        .ok_or_else(|| ParseError::MissingLibSymbol(lib_name.to_owned()))?;

    let at = symbol.child("at")?.numbers()?;
    let (position, angle) = match at[..] {
        [x, y] => (Point::new(x, y), 0.0),
        [x, y, angle, ..] => (Point::new(x, y), angle),
        _ => return Err(ParseError::MissingValue()),
    };
    let placement = Placement {
        position,
        angle,
        mirror: symbol.value("mirror").ok(),
    };

    let unit = number_or(symbol, "unit", 1)?;
    let style = match symbol.value("body_style") {
        Ok(_) => number_or(symbol, "body_style", 1)?,
        Err(_) => number_or(symbol, "convert", 1)?,
    };

    let mut pins = Vec::new();
    for sub_symbol in lib_symbol.children("symbol") {
        let Some((sub_unit, sub_style)) = sub_symbol.strings().next().and_then(unit_and_style)
        else {
            continue;
        };
        if (sub_unit != 0 && sub_unit != unit) || (sub_style != 0 && sub_style != style) {
            continue;
        }
        for pin in sub_symbol.children("pin") {
            let local = point(pin.child("at")?)?;
            pins.push(Pin {
                name: pin.value("name")?.to_owned(),
                number: pin.value("number")?.to_owned(),
                location: placement.place(local),
            });
        }
    }

    let reference = property(symbol, "Reference")?.to_owned();
    let value = property(symbol, "Value")?.to_owned();
    let kind = DeviceKind::classify(lib_id, &value);

    Ok(Component {
        reference,
        lib_id: lib_id.to_owned(),
        value,
        angle,
        position,
        pins,
        kind,
    })
}

fn number_or(symbol: &SExpr, label: &str, default: u32) -> Result<u32, ParseError> {
    match symbol.value(label) {
        Ok(s) => s
            .parse()
            .map_err(|_| ParseError::InvalidNumber(s.to_owned())),
        Err(_) => Ok(default),
    }
}

/// `R_1_1` -> `(1, 1)`
fn unit_and_style(name: &str) -> Option<(u32, u32)> {
    let mut parts = name.rsplitn(3, '_');
    let style = parts.next()?.parse().ok()?;
    let unit = parts.next()?.parse().ok()?;
    parts.next()?;
    Some((unit, style))
}

struct Placement<'a> {
    position: Point,
    angle: f64,
    mirror: Option<&'a str>,
}

impl Placement<'_> {
    /// Library coordinates (y up) to schematic coordinates (y down)
    fn place(&self, local: Point) -> Point {
        let (x, y) = (local.x, -local.y);
        let turns = self.angle.rem_euclid(360.0);
        let (x, y) = if turns == 0.0 {
            (x, y)
        } else if turns == 90.0 {
            (y, -x)
        } else if turns == 180.0 {
            (-x, -y)
        } else if turns == 270.0 {
            (-y, x)
        } else {
            let (sin, cos) = turns.to_radians().sin_cos();
            (x * cos + y * sin, -x * sin + y * cos)
        };
        let (x, y) = match self.mirror {
            Some("x") => (x, -y),
            Some("y") => (-x, y),
            _ => (x, y),
        };
        Point::new(self.position.x + x, self.position.y + y)
    }
}
