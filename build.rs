use regex::Regex;
use std::process::Command;

fn main() {
    let build = get_version().unwrap_or(format!("{} (Cargo)", env!("CARGO_PKG_VERSION")));

    println!("cargo:rustc-env=PLACER_BUILD={}", &build);
}

fn get_version() -> Result<String, Box<dyn std::error::Error>> {
    let re = Regex::new(r"v([0-9.]+)-([0-9]+)-g([a-f0-9]+)")?;
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=7"])
        .output()?;

    if !output.status.success() {
        return Err("not a git checkout".into());
    }

    let output_str = String::from_utf8(output.stdout)?;

    Ok(re.replace_all(output_str.trim(), "${1}.r${2}.${3}").into_owned())
}
