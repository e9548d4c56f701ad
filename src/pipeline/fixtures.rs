//! Small on-disk input sets for pipeline tests

use std::fs;
use tempfile::{tempdir, TempDir};

pub const ASSUMPTIONS: &str = "\
service_line,percentage_shift_to_community
Cardiology,0.2
Urology,0.5
";

pub const GROWTH: &str = "\
age_band,2021,2022,2023,2024,2025
A.000-004,0.10,0.05,0.0,0.0,0.0
B.005-009,0.0,0.0,0.0,0.0,0.0
";

pub const ACUTE: &str = "\
domain,year,hospital_name,region,service_line,sex,age_band,activity
acute,2020,Hospital one,East,Cardiology,Female,A.000-004,100
acute,2020,Hospital one,East,Cardiology,Female,B.005-009,200
acute,2020,Hospital two,West,Dermatology,Male,R.085+,40
";

pub const COMMUNITY: &str = "\
domain,year,hospital_name,region,service_line,sex,age_band,activity
community,2020,Hospital one,East,Cardiology,Female,B.005-009,50
community,2020,Hospital three,North,Urology,Male,B.005-009,
";

/// A temporary directory holding the given files, removed when dropped
pub fn write_inputs(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

/// The standard four input files
pub fn standard_inputs() -> TempDir {
    write_inputs(&[
        ("assumptions.csv", ASSUMPTIONS),
        ("population_growth.csv", GROWTH),
        ("acute_hospital_activity.csv", ACUTE),
        ("community_activity.csv", COMMUNITY),
    ])
}
