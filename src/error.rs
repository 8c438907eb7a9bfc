use thiserror::Error;

/// Schematic parse errors
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("SExpr {0} not found")]
    MissingChild(String),
    #[error("Value not found")]
    MissingValue(),
    #[error("Invalid number {0:?}")]
    InvalidNumber(String),
    #[error("Library symbol {0} not found")]
    MissingLibSymbol(String),
    #[error("Unexpected end of file at {at:?}")]
    UnexpectedEof { at: logos::Span },
    #[error("Expected {expected} but found {found} at {at:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        at: logos::Span,
    },
    #[error("Unknown token {found} at {at:?}")]
    UnknownToken { found: String, at: logos::Span },
}

/// Component value errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("empty value")]
    Empty,
    #[error("invalid mantissa in {0:?}")]
    InvalidMantissa(String),
    #[error("value {0:?} is not finite")]
    NonFinite(String),
    #[error("value {0:?} is zero")]
    Zero(String),
}

/// Reasons a single component is left out of the output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Skip {
    #[error("Invalid orientation {angle} for {reference}")]
    InvalidOrientation { reference: String, angle: f64 },
    #[error("Unknown transistor type {lib_id} for {reference}")]
    UnknownTransistor { reference: String, lib_id: String },
    #[error("Unsupported device {lib_id} for {reference}")]
    UnsupportedDevice { reference: String, lib_id: String },
    #[error("Ignoring vertical opamp {reference}")]
    VerticalOpAmp { reference: String },
    #[error("Missing pin {pin} on {reference}")]
    MissingPin { reference: String, pin: String },
    #[error("Expected {expected} pins on {reference}, found {found}")]
    PinCount {
        reference: String,
        expected: usize,
        found: usize,
    },
    #[error("Bad value for {reference}: {source}")]
    Value {
        reference: String,
        #[source]
        source: ValueError,
    },
}

impl Skip {
    /// Reference designator of the skipped component
    pub fn reference(&self) -> &str {
        match self {
            Skip::InvalidOrientation { reference, .. }
            | Skip::UnknownTransistor { reference, .. }
            | Skip::UnsupportedDevice { reference, .. }
            | Skip::VerticalOpAmp { reference }
            | Skip::MissingPin { reference, .. }
            | Skip::PinCount { reference, .. }
            | Skip::Value { reference, .. } => reference,
        }
    }
}
