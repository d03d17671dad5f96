fn main() {
    // ESP-IDF build environment propagation (no-op for host-target builds).
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
