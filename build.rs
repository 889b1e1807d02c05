//! Build script for detecting system dependencies and providing installation guidance.
//!
//! Checks for pkg-config, the OpenCV development libraries and the stock Haar
//! cascade files, and prints hints if any of them are missing.

use std::env;
use std::path::Path;
use std::process::Command;

const CASCADE_DIRS: [&str; 3] = [
    "/usr/share/opencv4/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    check_pkg_config();
    check_opencv();
    check_cascades();

    println!(
        "cargo:rustc-env=BUILD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
}

fn pkg_config(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_pkg_config() {
    match pkg_config(&["--version"]) {
        Some(version) => println!("cargo:warning=Found pkg-config version: {version}"),
        None => {
            println!("cargo:warning=pkg-config not found. This is required to find system libraries.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install pkg-config");
            println!("cargo:warning=On macOS: brew install pkg-config");
        }
    }
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    let version = pkg_config(&["--modversion", "opencv4"]).or_else(|| pkg_config(&["--modversion", "opencv"]));
    match version {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev");
            println!("cargo:warning=On macOS: brew install opencv");
        }
    }
}

// Only a hint: the cascade directory can be overridden at runtime with --cascades.
fn check_cascades() {
    if !CASCADE_DIRS
        .iter()
        .any(|dir| Path::new(dir).join("haarcascade_frontalface_default.xml").exists())
    {
        println!("cargo:warning=Haar cascade files not found in the usual locations.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install opencv-data");
    }
}
