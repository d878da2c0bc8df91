use std::{env, fs};
use std::path::Path;

use const_gen::{const_declaration, CompileConst};

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?;
    let dest_path = Path::new(&out_dir).join("const_gen.rs");

    let version = format!("v{}", env::var("CARGO_PKG_VERSION")?);
    // long version also shows what the binary was built for
    let long_version = format!("{}\ntarget: {}\nprofile: {}",
        version,
        env::var("TARGET")?,
        env::var("PROFILE")?
    );
    let const_declarations = vec![
        const_declaration!(pub VERSION = version),
        const_declaration!(pub LONG_VERSION = long_version),
    ].join("\n");

    fs::write(&dest_path, const_declarations)?;
    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
