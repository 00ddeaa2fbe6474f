fn main() {
    let date = chrono::Local::now().format("%Y-%m-%d");
    println!("cargo:rustc-env=TYPEFORGE_BUILD_DATE={date}");
    println!("cargo:rerun-if-changed=build.rs");
}
