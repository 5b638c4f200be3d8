//! Shared fixtures for the integration tests.
//!
//! Writes small order / rule tables into a temporary directory so the loaders
//! can be exercised against real files.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

pub const ORDERS_CSV: &str = "\
Row ID,Order Date,Market,Category,Sub-Category,Ship Mode,Sales,Profit,Quantity,Segment
1,2023-01-05,US,Technology,Phones,Standard Class,100.0,20.5,2,Consumer
2,2023-01-20,EU,Furniture,Chairs,Second Class,40.0,-5.0,1,Corporate
3,2023-02-10,EU,Technology,Phones,First Class,50.0,10.0,3,Home Office
4,2023-02-28,APAC,Office Supplies,Paper,Same Day,12.5,3.25,5,Consumer
5,2023-03-15,US,Furniture,Phones,Standard Class,80.0,8.0,4,Corporate
";

pub const RULES_CSV: &str = "\
antecedents,consequents,support,confidence,lift
\"frozenset({'whole milk'})\",\"frozenset({'rolls/buns'})\",0.056,0.22,1.21
\"frozenset({'yogurt', 'whole milk'})\",\"frozenset({'soda'})\",0.011,0.15,0.82
\"frozenset({'whole milk'})\",\"frozenset({'soda'})\",0.040,0.16,0.91
";

/// Write `contents` to `name` inside a fresh temp dir.
///
/// Returns `(path, TempDir)`. Keep the `TempDir` alive while the file is used.
pub fn write_fixture(name: &str, contents: &str) -> (PathBuf, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (path, dir)
}
