//! Well-known text reading and writing for the three supported geometry
//! types. This is the persistence text format; coordinates are written
//! with full `f64` precision so decoding restores the exact values.

use std::fmt::Write as _;

use geo::{Coord, LineString, Polygon};

use crate::error::{DecodeError, Result};
use crate::geometry::Geometry;

/// Encode a geometry as WKT, e.g. `POINT(35 39)`.
pub fn write(geometry: &Geometry) -> String {
    let mut out = String::new();
    match geometry {
        Geometry::Point(p) => {
            out.push_str("POINT(");
            write_coord(&mut out, p.0);
            out.push(')');
        }
        Geometry::LineString(ls) => {
            out.push_str("LINESTRING");
            write_ring(&mut out, &ls.0);
        }
        Geometry::Polygon(poly) => {
            out.push_str("POLYGON(");
            write_ring(&mut out, &poly.exterior().0);
            for interior in poly.interiors() {
                out.push(',');
                write_ring(&mut out, &interior.0);
            }
            out.push(')');
        }
    }
    out
}

fn write_coord(out: &mut String, c: Coord) {
    // Writing to a String cannot fail.
    let _ = write!(out, "{} {}", c.x, c.y);
}

fn write_ring(out: &mut String, coords: &[Coord]) {
    out.push('(');
    for (i, c) in coords.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_coord(out, *c);
    }
    out.push(')');
}

/// Decode WKT into a geometry.
pub fn read(text: &str) -> Result<Geometry> {
    let mut parser = Parser::new(text);
    let keyword = parser.word("geometry type")?;
    let geometry = match keyword.to_ascii_uppercase().as_str() {
        "POINT" => {
            parser.empty_check(&keyword, 1)?;
            parser.expect(Token::Open)?;
            let c = parser.coord()?;
            parser.expect(Token::Close)?;
            Geometry::Point(c.into())
        }
        "LINESTRING" => {
            parser.empty_check(&keyword, 2)?;
            let coords = parser.coord_list()?;
            if coords.len() < 2 {
                return Err(DecodeError::TooFewCoordinates {
                    geometry: "LINESTRING".to_string(),
                    required: 2,
                    found: coords.len(),
                });
            }
            Geometry::LineString(LineString::new(coords))
        }
        "POLYGON" => {
            parser.empty_check(&keyword, 3)?;
            parser.expect(Token::Open)?;
            let mut rings = vec![parser.ring()?];
            while parser.peek() == Some(Token::Comma) {
                parser.next();
                rings.push(parser.ring()?);
            }
            parser.expect(Token::Close)?;
            let exterior = rings.remove(0);
            Geometry::Polygon(Polygon::new(exterior, rings))
        }
        _ => return Err(DecodeError::unknown_geometry_type(keyword)),
    };
    parser.finish()?;
    Ok(geometry)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Comma,
    Word(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Word(w) => w.clone(),
        }
    }
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut word = String::new();
        for ch in text.chars() {
            let punct = match ch {
                '(' => Some(Token::Open),
                ')' => Some(Token::Close),
                ',' => Some(Token::Comma),
                _ => None,
            };
            if punct.is_some() || ch.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                if let Some(tok) = punct {
                    tokens.push(tok);
                }
            } else {
                word.push(ch);
            }
        }
        if !word.is_empty() {
            tokens.push(Token::Word(word));
        }
        Self {
            text,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).cloned()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn end_error(&self) -> DecodeError {
        DecodeError::UnexpectedEnd {
            value: self.text.to_string(),
        }
    }

    fn expect(&mut self, wanted: Token) -> Result<()> {
        match self.next() {
            Some(tok) if tok == wanted => Ok(()),
            Some(tok) => Err(DecodeError::unexpected(wanted.describe(), tok.describe())),
            None => Err(self.end_error()),
        }
    }

    fn word(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w),
            Some(tok) => Err(DecodeError::unexpected(what, tok.describe())),
            None => Err(self.end_error()),
        }
    }

    /// Reject `<TYPE> EMPTY`; features always carry coordinates.
    fn empty_check(&mut self, keyword: &str, required: usize) -> Result<()> {
        if let Some(Token::Word(w)) = self.peek() {
            if w.eq_ignore_ascii_case("EMPTY") {
                return Err(DecodeError::TooFewCoordinates {
                    geometry: keyword.to_ascii_uppercase(),
                    required,
                    found: 0,
                });
            }
        }
        Ok(())
    }

    fn number(&mut self) -> Result<f64> {
        let w = self.word("number")?;
        let value: f64 = w.parse().map_err(|_| DecodeError::invalid_number(&w))?;
        if !value.is_finite() {
            return Err(DecodeError::NonFiniteCoordinate { value: w });
        }
        Ok(value)
    }

    fn coord(&mut self) -> Result<Coord> {
        let x = self.number()?;
        let y = self.number()?;
        if let Some(Token::Word(extra)) = self.peek() {
            return Err(DecodeError::Dimension {
                found: 3,
                value: format!("{} {} {}", x, y, extra),
            });
        }
        Ok(Coord { x, y })
    }

    fn coord_list(&mut self) -> Result<Vec<Coord>> {
        self.expect(Token::Open)?;
        let mut coords = vec![self.coord()?];
        loop {
            match self.next() {
                Some(Token::Comma) => coords.push(self.coord()?),
                Some(Token::Close) => break,
                Some(tok) => return Err(DecodeError::unexpected(", or )", tok.describe())),
                None => return Err(self.end_error()),
            }
        }
        Ok(coords)
    }

    fn ring(&mut self) -> Result<LineString<f64>> {
        let coords = self.coord_list()?;
        let distinct = if coords.len() > 1 && coords.first() == coords.last() {
            coords.len() - 1
        } else {
            coords.len()
        };
        if distinct < 3 {
            return Err(DecodeError::TooFewCoordinates {
                geometry: "POLYGON".to_string(),
                required: 3,
                found: distinct,
            });
        }
        Ok(LineString::new(coords))
    }

    fn finish(&mut self) -> Result<()> {
        if self.pos < self.tokens.len() {
            let rest: Vec<String> = self.tokens[self.pos..].iter().map(Token::describe).collect();
            return Err(DecodeError::TrailingInput {
                value: rest.join(" "),
            });
        }
        Ok(())
    }
}
