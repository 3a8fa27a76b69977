//! Positional arguments of `stl2ps`: `[OUTFILE] [AXIS ANGLE]...`
use std::fmt;
use std::path::PathBuf;

use stltools_core::Xform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// `x`, `y` or `z`, either case.
    pub fn parse(token: &str) -> Option<Axis> {
        match token {
            "x" | "X" => Some(Axis::X),
            "y" | "Y" => Some(Axis::Y),
            "z" | "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// A rotation in degrees about one coordinate axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub axis: Axis,
    pub degrees: f64,
}

/// Result of reading the arguments that follow the input file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewArgs {
    pub outfile: Option<PathBuf>,
    pub rotations: Vec<Rotation>,
    /// Arguments that were skipped, with the reason
    pub warnings: Vec<String>,
}

impl ViewArgs {
    /// Read `[OUTFILE] [AXIS ANGLE]...`.
    ///
    /// The first token is the output file unless it names an axis. Unknown
    /// tokens are skipped one at a time; an axis whose angle is not a finite
    /// number is skipped together with that angle.
    pub fn parse(tokens: &[String]) -> Self {
        let mut view = ViewArgs::default();
        let mut rest = tokens;

        if let Some(first) = rest.first() {
            if Axis::parse(first).is_none() {
                view.outfile = Some(PathBuf::from(first));
                rest = &rest[1..];
            }
        }

        while let Some(token) = rest.first() {
            let Some(axis) = Axis::parse(token) else {
                view.warnings.push(format!("Unknown argument '{token}' ignored."));
                rest = &rest[1..];
                continue;
            };
            let Some(angle) = rest.get(1) else {
                view.warnings.push(format!("Rotation about {axis} has no angle, ignored."));
                break;
            };
            match angle.parse::<f64>() {
                Ok(degrees) if degrees.is_finite() => view.rotations.push(Rotation { axis, degrees }),
                _ => view.warnings.push(format!("Argument '{angle}' is not a number, ignored.")),
            }
            rest = &rest[2..];
        }

        view
    }

    /// Compose the rotations in the order they were given.
    pub fn xform(&self) -> Xform {
        let mut xform = Xform::new();
        for r in &self.rotations {
            match r.axis {
                Axis::X => xform.rotx(r.degrees),
                Axis::Y => xform.roty(r.degrees),
                Axis::Z => xform.rotz(r.degrees),
            };
        }
        xform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stltools_core::Vertex;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(ViewArgs::parse(&[]), ViewArgs::default());
    }

    #[test]
    fn test_outfile_and_rotations() {
        let view = ViewArgs::parse(&tokens(&["out.ps", "x", "30", "Z", "-45.5"]));
        assert_eq!(view.outfile, Some(PathBuf::from("out.ps")));
        assert_eq!(
            view.rotations,
            vec![
                Rotation { axis: Axis::X, degrees: 30.0 },
                Rotation { axis: Axis::Z, degrees: -45.5 },
            ]
        );
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn test_axis_first_means_no_outfile() {
        let view = ViewArgs::parse(&tokens(&["y", "90"]));
        assert_eq!(view.outfile, None);
        assert_eq!(view.rotations.len(), 1);
    }

    #[test]
    fn test_bad_tokens_are_skipped() {
        let view = ViewArgs::parse(&tokens(&["x", "ten", "w", "y", "10", "z"]));
        assert_eq!(view.rotations, vec![Rotation { axis: Axis::Y, degrees: 10.0 }]);
        assert_eq!(view.warnings.len(), 3);
        assert!(view.warnings[0].contains("'ten' is not a number"));
        assert!(view.warnings[1].contains("Unknown argument 'w'"));
        assert!(view.warnings[2].contains("about z has no angle"));
    }

    #[test]
    fn test_non_finite_angle_is_rejected() {
        let view = ViewArgs::parse(&tokens(&["x", "inf", "y", "NaN"]));
        assert!(view.rotations.is_empty());
        assert_eq!(view.warnings.len(), 2);
    }

    #[test]
    fn test_xform_follows_argument_order() {
        let view = ViewArgs::parse(&tokens(&["z", "90", "x", "90"]));
        let p = view.xform().apply_point(&Vertex::new(1.0, 0.0, 0.0));
        assert!((p - Vertex::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }
}
