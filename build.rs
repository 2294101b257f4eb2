fn main() {
    // Only the device image needs the ESP-IDF environment; host builds skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
