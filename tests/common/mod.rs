//! Shared fixtures for integration tests: scratch studies and fake
//! simulator binaries written as shell scripts.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Contents of a freshly created study's `settings/generaldata.ini`.
pub const GENERAL_DATA: &str = "[general]\nmode = Economy\nnbyears = 10\n\n\
                                [optimization]\ninclude-exportmps = none\n\
                                include-unfeasible-problem-behavior = error-verbose\n";

/// Solver stand-in: records its arguments, prints the output folder, copies
/// `<study>/fixture/*` into it and reports the weeks listed in
/// `<study>/unfeasible-weeks.txt` according to the configured behavior.
const FAKE_SOLVER: &str = r#"#!/bin/sh
study=""
while [ $# -gt 0 ]; do
    case "$1" in
        -i) shift; study="$1" ;;
    esac
    shift
done
out="$study/output/20240101-0000eco"
mkdir -p "$out"
behavior=$(sed -n 's/^include-unfeasible-problem-behavior *= *//p' "$study/settings/generaldata.ini")
echo "[solver][infos] Antares Solver (fake)"
echo "[solver][infos] Output folder : $out"
if [ -d "$study/fixture" ]; then
    cp -R "$study/fixture/." "$out/"
fi
if [ -f "$study/unfeasible-weeks.txt" ]; then
    while read -r year week; do
        echo "[solver][warns] Year $year, week $week : the weekly problem is unfeasible"
        case "$behavior" in
            *verbose) : > "$out/problem-$year-$week--optim-nb-1.mps" ;;
        esac
        case "$behavior" in
            error-*) echo "[solver][fatal] stopping on unfeasible problem"; exit 1 ;;
        esac
    done < "$study/unfeasible-weeks.txt"
fi
echo "[solver][infos] Simulation done"
exit 0
"#;

/// Modeler stand-in: copies `<study>/fixture/*` into `<study>/output`.
const FAKE_MODELER: &str = r#"#!/bin/sh
study="$1"
mkdir -p "$study/output"
if [ -d "$study/fixture" ]; then
    cp -R "$study/fixture/." "$study/output/"
fi
echo "[modeler] done"
exit 0
"#;

/// A scratch workspace holding fake binaries and one study.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Self { dir };
        fs::create_dir_all(ws.study().join("settings")).expect("create settings");
        fs::write(ws.general_data(), GENERAL_DATA).expect("write generaldata.ini");
        ws
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn study(&self) -> PathBuf {
        self.root().join("study")
    }

    pub fn general_data(&self) -> PathBuf {
        self.study().join("settings").join("generaldata.ini")
    }

    pub fn solver(&self) -> PathBuf {
        write_script(&self.root().join("bin"), "antares-solver", FAKE_SOLVER)
    }

    pub fn modeler(&self) -> PathBuf {
        write_script(&self.root().join("bin"), "antares-modeler", FAKE_MODELER)
    }

    /// Adds a file the fake binaries copy into the results folder.
    pub fn fixture_file(&self, relative: &str, content: &str) {
        let path = self.study().join("fixture").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(path, content).expect("write fixture");
    }

    /// Weeks the fake solver reports as unfeasible, in order.
    pub fn unfeasible_weeks(&self, weeks: &[(u32, u32)]) {
        let text: String = weeks.iter().map(|(y, w)| format!("{y} {w}\n")).collect();
        fs::write(self.study().join("unfeasible-weeks.txt"), text).expect("write weeks");
    }

    pub fn read_general_data(&self) -> String {
        fs::read_to_string(self.general_data()).expect("read generaldata.ini")
    }
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(dir).expect("create bin dir");
    let path = dir.join(name);
    fs::write(&path, body).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}
