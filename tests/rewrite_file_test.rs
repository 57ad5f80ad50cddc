//! Whole-pipeline test through the library facade: file in, file out.

use std::fs;
use std::io::BufWriter;

use duelkit::{AvoidancePlanner, MachineProfile, StreamWriter};
use tempfile::TempDir;

fn rewrite_file(input_path: &std::path::Path, output_path: &std::path::Path) {
    let profile = MachineProfile::default();
    let input = fs::read_to_string(input_path).unwrap();
    let file = fs::File::create(output_path).unwrap();
    let mut writer = StreamWriter::new(BufWriter::new(file));
    let mut planner = AvoidancePlanner::new(&profile, &mut writer);
    planner.play(&input).unwrap();
    drop(planner);
    writer.flush().unwrap();
}

#[test]
fn test_file_rewrite_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("sliced.gcode");
    let once = dir.path().join("ready.gcode");
    let twice = dir.path().join("ready_again.gcode");

    fs::write(
        &input,
        "T0\nG0 X10 Y10\nG1 X150 Y10\nG1 X150 Y150 E14 F1200\nT1\nG0 X150 Y150\nG1 X15 Y150\n",
    )
    .unwrap();

    rewrite_file(&input, &once);
    rewrite_file(&once, &twice);

    let first = fs::read_to_string(&once).unwrap();
    let second = fs::read_to_string(&twice).unwrap();
    assert!(first.contains("duelkit"));
    assert_eq!(second, first);
}
