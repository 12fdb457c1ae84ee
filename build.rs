use std::env;

fn main() {
    // Build-time defaults for StoreConfig::default()
    // Both values are parsed at runtime; malformed values fall back to the defaults.

    // Magic byte written by validate() (decimal or 0x-prefixed hex)
    if let Ok(magic) = env::var("EEPROM_MAGIC") {
        println!("cargo:rustc-env=EEPROM_MAGIC={}", magic);
        println!("cargo:warning=Using EEPROM_MAGIC from environment: {}", magic);
    } else {
        println!("cargo:rustc-env=EEPROM_MAGIC=0x7e");
    }

    // Largest block size the target's EEPROM supports
    if let Ok(max_size) = env::var("EEPROM_MAX_SIZE") {
        println!("cargo:rustc-env=EEPROM_MAX_SIZE={}", max_size);
        println!(
            "cargo:warning=Using EEPROM_MAX_SIZE from environment: {}",
            max_size
        );
    } else {
        println!("cargo:rustc-env=EEPROM_MAX_SIZE=4096");
    }

    println!("cargo:rerun-if-env-changed=EEPROM_MAGIC");
    println!("cargo:rerun-if-env-changed=EEPROM_MAX_SIZE");
}
