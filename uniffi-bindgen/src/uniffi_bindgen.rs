//! Generates the Swift and Kotlin bindings for `legacy-storage`.

fn main() {
    uniffi::uniffi_bindgen_main();
}
