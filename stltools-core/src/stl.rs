//! STL file parser for binary and ASCII formats
//!
//! Binary layout:
//!
//! ```text
//! UINT8[80]    header (free text, often "solid <name>")
//! UINT32       number of facets
//! foreach facet
//!     REAL32[3] normal (ignored, recomputed from the vertices)
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     REAL32[3] vertex 3
//!     UINT16    attribute byte count
//! end
//! ```
//!
//! ASCII files are `solid <name>`, a list of
//! `facet normal / outer loop / vertex x3 / endloop / endfacet` blocks,
//! and `endsolid <name>`.
use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::{tag_no_case, take},
    character::complete::{multispace0, multispace1, not_line_ending, space0},
    combinator::cut,
    multi::{count, many0},
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use tracing::debug;

use crate::error::{StlError, StlResult};
use crate::geometry::{Facet, RawMesh, Vertex};

/// Size of the free-form binary header.
const HEADER_SIZE: usize = 80;

/// Size of one binary facet record.
const FACET_SIZE: usize = 50;

/// Name used when neither the file nor its path provide one.
const UNNAMED: &str = "unnamed";

/// Load an STL file (binary or ASCII).
///
/// When the file carries no solid name, the file stem is used.
pub fn load<P: AsRef<Path>>(path: P) -> StlResult<RawMesh> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| StlError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let fallback = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(UNNAMED);
    let mesh = parse_stl(&data, fallback)?;

    debug!(path = %path.display(), name = %mesh.name, facets = mesh.len(), "loaded STL");
    Ok(mesh)
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8], fallback_name: &str) -> StlResult<RawMesh> {
    let mut mesh = if has_binary_size(data) {
        parse_binary_stl(data)?
    } else if starts_with_solid(data) {
        // Some binary exporters also start their header with "solid".
        match parse_ascii_stl(&String::from_utf8_lossy(data)) {
            Ok(mesh) => mesh,
            Err(ascii_err) => parse_binary_stl(data).map_err(|_| ascii_err)?,
        }
    } else {
        parse_binary_stl(data)?
    };

    if mesh.name.is_empty() {
        mesh.name = if fallback_name.is_empty() {
            UNNAMED.to_string()
        } else {
            fallback_name.to_string()
        };
    }
    Ok(mesh)
}

/// True when the data length matches the facet count in a binary header exactly.
fn has_binary_size(data: &[u8]) -> bool {
    match binary_header(data) {
        Ok((body, (_, announced))) => {
            body.len() as u64 == u64::from(announced) * FACET_SIZE as u64
        }
        Err(_) => false,
    }
}

fn starts_with_solid(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    data[start..]
        .get(..5)
        .map_or(false, |word| word.eq_ignore_ascii_case(b"solid"))
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> StlResult<RawMesh> {
    let (body, (header, announced)) =
        binary_header(data).map_err(|_| StlError::TooShort { len: data.len() })?;

    let expected = announced as usize;
    let found = body.len() / FACET_SIZE;
    if found < expected {
        return Err(StlError::Truncated { expected, found });
    }

    let (_, facets) = count(binary_facet, expected)(body)
        .map_err(|_| StlError::Truncated { expected, found })?;

    Ok(RawMesh {
        name: header_name(header),
        facets,
    })
}

fn binary_header(input: &[u8]) -> IResult<&[u8], (&[u8], u32)> {
    tuple((take(HEADER_SIZE), le_u32))(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, _normal) = binary_vertex(input)?;
    let (input, v0) = binary_vertex(input)?;
    let (input, v1) = binary_vertex(input)?;
    let (input, v2) = binary_vertex(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, Facet::new(v0, v1, v2)))
}

fn binary_vertex(input: &[u8]) -> IResult<&[u8], Vertex> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vertex::new(f64::from(x), f64::from(y), f64::from(z))))
}

/// Solid name from a binary header: text up to the first NUL, without a
/// leading `solid` keyword.
fn header_name(header: &[u8]) -> String {
    let end = header.iter().position(|&b| b == 0).unwrap_or(header.len());
    let text = String::from_utf8_lossy(&header[..end]);
    let text = text.trim();
    let text = match text.get(..5) {
        Some(word) if word.eq_ignore_ascii_case("solid") => &text[5..],
        _ => text,
    };
    text.trim().to_string()
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> StlResult<RawMesh> {
    match ascii_solid(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(syntax_error(input, e.input)),
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(input, "")),
    }
}

fn syntax_error(text: &str, rest: &str) -> StlError {
    let offset = text.len() - rest.len();
    let line = text[..offset].matches('\n').count() + 1;
    let message = match rest.split_whitespace().next() {
        Some(token) => format!("unexpected '{token}'"),
        None => "unexpected end of file".to_string(),
    };
    StlError::Syntax { line, message }
}

fn ascii_solid(input: &str) -> IResult<&str, RawMesh> {
    let (input, _) = preceded(multispace0, tag_no_case("solid"))(input)?;
    let (input, name) = preceded(space0, not_line_ending)(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag_no_case("endsolid"))(input)?;

    Ok((
        input,
        RawMesh {
            name: name.trim().to_string(),
            facets,
        },
    ))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag_no_case("facet"))(input)?;
    cut(ascii_facet_body)(input)
}

fn ascii_facet_body(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace1, tag_no_case("normal"))(input)?;
    let (input, _normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag_no_case("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag_no_case("loop"))(input)?;
    let (input, v0) = ascii_vertex(input)?;
    let (input, v1) = ascii_vertex(input)?;
    let (input, v2) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag_no_case("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag_no_case("endfacet"))(input)?;

    Ok((input, Facet::new(v0, v1, v2)))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag_no_case("vertex"))(input)?;
    ascii_vector(input)
}

fn ascii_vector(input: &str) -> IResult<&str, Vertex> {
    let (input, x) = preceded(multispace1, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, Vertex::new(x, y, z)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    fn binary_stl(header: &[u8], facets: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data[..header.len()].copy_from_slice(header);
        data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
        for facet in facets {
            data.extend(std::iter::repeat(0u8).take(12));
            for v in facet {
                for c in v {
                    data.extend_from_slice(&c.to_le_bytes());
                }
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    const UNIT: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set facet count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.len(), 0);
        assert_eq!(mesh.name, "");
    }

    #[test]
    fn test_parse_ascii() {
        let mesh = parse_ascii_stl(TRIANGLE).unwrap();
        assert_eq!(mesh.name, "tri");
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.facets[0].vertices()[1], Vertex::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_ascii_exponents_and_case() {
        let text = "SOLID\nFacet Normal 0.0e0 0 -1.0E+00\nOuter Loop\nVertex 1.5e-3 -2 3E2\n\
                    VERTEX 0 0 0\nvertex 1 1 1\nENDLOOP\nENDFACET\nENDSOLID\n";
        let mesh = parse_ascii_stl(text).unwrap();
        assert_eq!(mesh.name, "");
        assert_eq!(mesh.facets[0].vertices()[0], Vertex::new(1.5e-3, -2.0, 300.0));
    }

    #[test]
    fn test_ascii_syntax_error_reports_line() {
        let broken = TRIANGLE.replace("vertex 1 0 0", "vertex 1 zero 0");
        match parse_ascii_stl(&broken) {
            Err(StlError::Syntax { line, message }) => {
                assert_eq!(line, 5);
                assert!(message.contains("zero"), "{message}");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_ascii_missing_endsolid() {
        let text = TRIANGLE.replace("endsolid tri\n", "");
        assert!(matches!(parse_ascii_stl(&text), Err(StlError::Syntax { .. })));
    }

    #[test]
    fn test_ascii_and_binary_agree() {
        let ascii = parse_stl(TRIANGLE.as_bytes(), "x").unwrap();
        let binary = parse_stl(&binary_stl(b"solid tri", &[UNIT]), "x").unwrap();
        assert_eq!(ascii, binary);
    }

    #[test]
    fn test_binary_with_solid_header() {
        let data = binary_stl(b"solid  part-7  ", &[UNIT, UNIT]);
        let mesh = parse_stl(&data, "fallback").unwrap();
        assert_eq!(mesh.name, "part-7");
        assert_eq!(mesh.len(), 2);
    }

    #[test]
    fn test_truncated_binary() {
        let mut data = binary_stl(b"", &[UNIT, UNIT]);
        data.truncate(data.len() - 10);
        assert!(matches!(
            parse_stl(&data, "x"),
            Err(StlError::Truncated { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(parse_stl(b"", "x"), Err(StlError::TooShort { len: 0 })));
        assert!(matches!(parse_stl(b"garbage", "x"), Err(StlError::TooShort { len: 7 })));
    }

    #[test]
    fn test_fallback_name() {
        let mesh = parse_stl(&binary_stl(b"", &[UNIT]), "bracket").unwrap();
        assert_eq!(mesh.name, "bracket");
        let mesh = parse_stl(&binary_stl(b"", &[UNIT]), "").unwrap();
        assert_eq!(mesh.name, UNNAMED);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.stl");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&binary_stl(b"", &[UNIT])).unwrap();

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.name, "widget");
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load("nonexistent_file_12345.stl");
        match result {
            Err(StlError::Io { path, .. }) => {
                assert!(path.to_string_lossy().contains("nonexistent"))
            }
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
