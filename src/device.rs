//! Device subtypes, decided once from a component's library identifier.

/// Transistor channel or junction polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    N,
    P,
}

/// Transistor family and polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransistorKind {
    Bjt(Polarity),
    Mosfet(Polarity),
    Jfet(Polarity),
}

impl TransistorKind {
    /// Library identifier fragments, in match order
    const TABLE: [(&'static str, TransistorKind); 6] = [
        ("NPN", TransistorKind::Bjt(Polarity::N)),
        ("PNP", TransistorKind::Bjt(Polarity::P)),
        ("NMOS", TransistorKind::Mosfet(Polarity::N)),
        ("PMOS", TransistorKind::Mosfet(Polarity::P)),
        ("NJFET", TransistorKind::Jfet(Polarity::N)),
        ("PJFET", TransistorKind::Jfet(Polarity::P)),
    ];

    pub fn from_lib_id(lib_id: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(fragment, _)| lib_id.contains(fragment))
            .map(|(_, kind)| *kind)
    }

    pub fn polarity(self) -> Polarity {
        match self {
            TransistorKind::Bjt(p) | TransistorKind::Mosfet(p) | TransistorKind::Jfet(p) => p,
        }
    }

    /// Falstad structure code: `1`/`-1` for NPN/PNP, `32`/`33` for N/P channel FETs
    pub fn structure(self) -> i32 {
        match self {
            TransistorKind::Bjt(Polarity::N) => 1,
            TransistorKind::Bjt(Polarity::P) => -1,
            TransistorKind::Mosfet(Polarity::N) | TransistorKind::Jfet(Polarity::N) => 32,
            TransistorKind::Mosfet(Polarity::P) | TransistorKind::Jfet(Polarity::P) => 33,
        }
    }

    /// Pin names for the collector, emitter and base roles
    pub fn terminal_names(self) -> [&'static str; 3] {
        match self {
            TransistorKind::Bjt(_) => ["C", "E", "B"],
            TransistorKind::Mosfet(_) | TransistorKind::Jfet(_) => ["D", "S", "G"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Potentiometer,
    Transistor(TransistorKind),
    OpAmp,
    SpdtSwitch,
    Ground,
    Supply,
    Generic,
}

impl DeviceKind {
    pub fn classify(lib_id: &str, value: &str) -> Self {
        if let Some(symbol) = lib_id.strip_prefix("power:") {
            let ground = value == "GND" || symbol.starts_with("GND") || symbol == "Earth";
            return if ground {
                DeviceKind::Ground
            } else {
                DeviceKind::Supply
            };
        }
        if lib_id.contains("Potentiometer") {
            return DeviceKind::Potentiometer;
        }
        if let Some(kind) = TransistorKind::from_lib_id(lib_id) {
            return DeviceKind::Transistor(kind);
        }
        if lib_id.contains("Amplifier_Operational") {
            return DeviceKind::OpAmp;
        }
        if lib_id.contains("SPDT") {
            return DeviceKind::SpdtSwitch;
        }
        DeviceKind::Generic
    }
}
