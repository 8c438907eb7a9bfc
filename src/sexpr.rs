#[cfg(test)]
use std::fmt::Display;

use crate::error::ParseError;

mod lexer;
mod parser;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SExpr<'a> {
    SExpr(&'a str, Box<[SExpr<'a>]>),
    String(&'a str),
}

#[cfg(test)]
impl<'a> Display for SExpr<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::SExpr(label, children) => {
                write!(f, "({}", label)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
            SExpr::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl<'a> SExpr<'a> {
    pub fn label(&self) -> Option<&'a str> {
        match self {
            SExpr::SExpr(label, _) => Some(label),
            SExpr::String(_) => None,
        }
    }

    /// First string child of the first child labeled `label`
    pub fn value(&self, label: &str) -> Result<&'a str, ParseError> {
        self.child(label)?
            .strings()
            .next()
            .ok_or(ParseError::MissingValue())
    }

    /// Direct string children, skipping nested lists
    pub fn strings<'b>(&'b self) -> impl Iterator<Item = &'a str> + 'b {
        let children: &'b [SExpr<'a>] = match self {
            SExpr::String(_) => &[],
            SExpr::SExpr(_, children) => children,
        };
        children.iter().filter_map(|child| match child {
            SExpr::String(s) => Some(*s),
            SExpr::SExpr(_, _) => None,
        })
    }

    /// Direct string children parsed as numbers
    pub fn numbers(&self) -> Result<Vec<f64>, ParseError> {
        self.strings()
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber(s.to_owned()))
            })
            .collect()
    }

    pub fn children<'b, 'c>(&'b self, label: &'c str) -> LabeledChildIterator<'a, 'b, 'c> {
        let iter = match self {
            SExpr::String(_) => None,
            SExpr::SExpr(_, children) => Some(children.iter()),
        };
        LabeledChildIterator { iter, label }
    }

    pub fn child<'b>(&self, label: &'b str) -> Result<&SExpr<'a>, ParseError> {
        let mut iter = self.children(label);
        iter.next()
            .ok_or(ParseError::MissingChild(label.to_owned()))
    }
}

#[derive(Debug)]
pub struct LabeledChildIterator<'a, 'b, 'c> {
    iter: Option<std::slice::Iter<'b, SExpr<'a>>>,
    label: &'c str,
}

impl<'a, 'b, 'c> Iterator for LabeledChildIterator<'a, 'b, 'c> {
    type Item = &'b SExpr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let iter = self.iter.as_mut()?;
        loop {
            let item = iter.next();
            match &item {
                None => return None,
                Some(SExpr::String(_)) => continue,
                Some(SExpr::SExpr(label, _)) => {
                    if *label == self.label {
                        return item;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_data {
        ($fname:expr) => {
            std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/test/",
                $fname
            ))
            .unwrap()
        };
    }

    #[test]
    fn sexpr_can_parse_full_file() {
        let i = test_data!("amplifier.kicad_sch");
        let root = SExpr::try_from(i.as_str()).unwrap();
        assert_eq!(root.label(), Some("kicad_sch"));
    }

    #[test]
    fn sexpr_children_by_name_works() {
        let i = r#"(a (b "1") (c "2") (b "3"))"#;
        let root = SExpr::try_from(i).unwrap();

        let mut iter = root.children("b");
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
    }

    #[test]
    fn sexpr_value_and_numbers() {
        let root = SExpr::try_from(r#"(symbol (lib_id "Device:R") (at 10.16 -2.54 90))"#).unwrap();
        assert_eq!(root.value("lib_id").unwrap(), "Device:R");
        assert_eq!(
            root.child("at").unwrap().numbers().unwrap(),
            vec![10.16, -2.54, 90.0]
        );
        assert_eq!(
            root.value("mirror"),
            Err(ParseError::MissingChild("mirror".to_owned()))
        );
    }

    #[test]
    fn sexpr_bad_number_is_reported() {
        let root = SExpr::try_from("(at 1 x)").unwrap();
        assert_eq!(
            root.numbers(),
            Err(ParseError::InvalidNumber("x".to_owned()))
        );
    }
}
