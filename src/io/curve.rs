//! JSON reading of knot fragments and writing of generated curves.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::lace::{KnotFragment, LaceCurves};

/// Read a knot fragment from a JSON file.
///
/// ```json
/// {
///   "bevel_depth": 0.01,
///   "splines": [
///     { "name": "left",  "points": [{ "position": [-1, 0, 0], "handle_left": [-1.1, 0, 0], "handle_right": [-0.9, 0, 0] }] },
///     { "name": "right", "points": [{ "position": [1, 0, 0], "handle_left": [0.9, 0, 0], "handle_right": [1.1, 0, 0] }] }
///   ]
/// }
/// ```
pub fn load_knot<P: AsRef<Path>>(path: P) -> Result<KnotFragment> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let fragment: KnotFragment = serde_json::from_reader(reader)?;
    debug!(
        "loaded knot fragment with {} spline(s) from {}",
        fragment.splines.len(),
        path.as_ref().display()
    );
    Ok(fragment)
}

/// Write generated curves as pretty-printed JSON.
pub fn save_curves<P: AsRef<Path>>(curves: &LaceCurves, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, curves)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaceError;
    use crate::lace::{ControlPoint, HoleCurve, LaceResult, PointKind};
    use nalgebra::Point3;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("lacework_curve_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_load_knot() {
        let path = temp_path("knot.json");
        fs::write(
            &path,
            r#"{"bevel_depth": 0.02, "splines": [
                {"name": "a", "points": [{"position": [0, 0, 0], "handle_left": [0, 0, 0], "handle_right": [0, 0, 0]}]},
                {"name": "b", "points": []}
            ]}"#,
        )
        .unwrap();

        let fragment = load_knot(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(fragment.splines.len(), 2);
        assert!((fragment.bevel_depth - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_load_knot_malformed() {
        let path = temp_path("bad.json");
        fs::write(&path, "{\"splines\": 3}").unwrap();

        let result = load_knot(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(LaceError::Json(_))));
    }

    #[test]
    fn test_save_curves() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let lace = LaceResult {
            points: vec![ControlPoint::new(PointKind::Side, p, p, p)],
            cyclic: true,
        };
        let curves = LaceCurves {
            hole: Some(HoleCurve::from_lace(&lace)),
            lace,
            bevel_depth: 0.01,
        };

        let path = temp_path("curves.json");
        save_curves(&curves, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let back: LaceCurves = serde_json::from_str(&text).unwrap();
        assert_eq!(back, curves);
    }
}
