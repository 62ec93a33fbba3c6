//! Device identity derived from the ESP32 factory MAC address.
//!
//! A station normally reports the device id it was configured with.  When
//! that is blank the id falls back to `Press-XXYYZZ` (last 3 MAC bytes in
//! uppercase hex), which is stable across reboots.

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(feature = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: the buffer is exactly the 6 bytes the call writes.
    unsafe {
        esp_idf_sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(feature = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// `Press-XXYYZZ` from the last 3 MAC bytes.
pub fn mac_device_id(mac: &MacAddress) -> String {
    format!("Press-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5])
}

/// The configured id, or the MAC-derived one when the configured id is blank.
pub fn resolve_device_id(configured: &str, mac: &MacAddress) -> String {
    let configured = configured.trim();
    if configured.is_empty() {
        mac_device_id(mac)
    } else {
        configured.to_string()
    }
}
