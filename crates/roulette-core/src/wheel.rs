//! Single-zero (European) roulette wheel.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pockets on the wheel (0-36).
pub const POCKET_COUNT: u8 = 37;

/// Highest pocket number.
pub const MAX_ROLL: u8 = POCKET_COUNT - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::Green => "green",
            Color::Red => "red",
            Color::Black => "black",
        })
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parity::None => "none",
            Parity::Odd => "odd",
            Parity::Even => "even",
        })
    }
}

/// One pocket of the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pocket {
    pub number: u8,
    pub color: Color,
    pub parity: Parity,
}

// Red numbers on a European wheel.
const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

impl Pocket {
    /// Look up a pocket by number.
    pub fn from_number(number: u8) -> Result<Self> {
        if number > MAX_ROLL {
            return Err(CoreError::InvalidPocket(number));
        }

        if number == 0 {
            return Ok(Self {
                number,
                color: Color::Green,
                parity: Parity::None,
            });
        }

        let color = if RED_NUMBERS.contains(&number) {
            Color::Red
        } else {
            Color::Black
        };
        let parity = if number % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        };

        Ok(Self {
            number,
            color,
            parity,
        })
    }

    /// Map a uniform float in `[0, 1)` onto a pocket.
    pub fn from_unit_float(value: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&value) {
            return Err(CoreError::InvalidUnitFloat(value));
        }
        let index = (value * f64::from(POCKET_COUNT)).floor() as u8;
        Self::from_number(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_green() {
        let pocket = Pocket::from_number(0).unwrap();
        assert_eq!(pocket.color, Color::Green);
        assert_eq!(pocket.parity, Parity::None);
    }

    #[test]
    fn test_color_counts() {
        let pockets: Vec<_> = (0..=MAX_ROLL)
            .map(|n| Pocket::from_number(n).unwrap())
            .collect();
        let red = pockets.iter().filter(|p| p.color == Color::Red).count();
        let black = pockets.iter().filter(|p| p.color == Color::Black).count();
        assert_eq!(red, 18);
        assert_eq!(black, 18);
    }

    #[test]
    fn test_known_pockets() {
        let p11 = Pocket::from_number(11).unwrap();
        assert_eq!((p11.color, p11.parity), (Color::Black, Parity::Odd));

        let p12 = Pocket::from_number(12).unwrap();
        assert_eq!((p12.color, p12.parity), (Color::Red, Parity::Even));

        let p19 = Pocket::from_number(19).unwrap();
        assert_eq!((p19.color, p19.parity), (Color::Red, Parity::Odd));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            Pocket::from_number(37),
            Err(CoreError::InvalidPocket(37))
        ));
        assert!(Pocket::from_unit_float(1.0).is_err());
    }

    #[test]
    fn test_unit_float_mapping() {
        assert_eq!(Pocket::from_unit_float(0.0).unwrap().number, 0);
        assert_eq!(Pocket::from_unit_float(0.999_999).unwrap().number, 36);
        assert_eq!(Pocket::from_unit_float(0.5).unwrap().number, 18);
    }
}
